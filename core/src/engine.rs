//! The pet engine: the one entry point a UI shell talks to.
//!
//! The engine owns exactly one active session (profile id + ledger). Every
//! operation runs against that session through `&mut self`, so there is a
//! single writer per profile by construction.
//!
//! RULES:
//!   - The ledger in memory is authoritative for the session.
//!   - After every ledger mutation the snapshot is written through to the
//!     store. A failed write is logged and dropped, never retried.
//!   - Notifier failures are logged and dropped; the reminder is lost.
//!   - Pulls always debit before rolling.
//!   - Switching profile replaces the session before anything else runs.

use crate::{
    clock::{Clock, ManualClock},
    command::{CommandReply, PlayerCommand},
    config::EngineConfig,
    draw_engine::{ConvertSummary, DrawEngine, DrawResult},
    error::{PetError, PetResult},
    event::{EventLogEntry, PetEvent},
    ledger::{FeedOutcome, Ledger},
    mood::{self, AccrualReport},
    notifier::{MemoryNotifier, Notifier},
    reminder::{self, PlannedReminder},
    rng::{DrawRng, RngBank, RngSlot},
    settings::{Intensity, Settings, Tone},
    snapshot::ProfileSnapshot,
    store::PetStore,
    task::{NewTask, Task, TaskPatch},
    types::{profile_key, ProfileId, TaskId, TriggerHandle},
};

struct Session {
    profile_id: ProfileId,
    ledger:     Ledger,
}

pub struct PetEngine {
    pub config: EngineConfig,
    pub store:  PetStore,
    clock:      Box<dyn Clock>,
    notifier:   Box<dyn Notifier>,
    rng:        DrawRng,
    settings:   Settings,
    session:    Session,
}

impl PetEngine {
    /// Validate config, load settings and open the session for `identity`
    /// (which also runs a mood accrual pass for it).
    pub fn open(
        config: EngineConfig,
        store: PetStore,
        clock: Box<dyn Clock>,
        notifier: Box<dyn Notifier>,
        seed: u64,
        identity: Option<&str>,
    ) -> PetResult<Self> {
        config.validate()?;

        let settings = match store.load_settings() {
            Ok(saved) => saved.unwrap_or_default(),
            Err(e) => {
                log::warn!("engine: could not read settings, using defaults: {e}");
                Settings::default()
            }
        };

        let session = Session {
            profile_id: profile_key(identity),
            ledger: Ledger::new(&config.economy.pet_defaults),
        };

        let mut engine = Self {
            rng: RngBank::new(seed).for_slot(RngSlot::Gacha),
            config,
            store,
            clock,
            notifier,
            settings,
            session,
        };
        engine.hydrate();
        engine.run_accrual();
        Ok(engine)
    }

    /// In-memory engine with test config for the guest profile.
    /// The caller keeps clones of `clock` and `notifier` to drive and inspect it.
    pub fn build_test(seed: u64, clock: ManualClock, notifier: MemoryNotifier) -> PetResult<Self> {
        let store = PetStore::in_memory()?;
        store.migrate()?;
        Self::open(
            EngineConfig::default_test(),
            store,
            Box::new(clock),
            Box::new(notifier),
            seed,
            None,
        )
    }

    // ── Read access ────────────────────────────────────────────

    pub fn profile_id(&self) -> &str {
        &self.session.profile_id
    }

    pub fn ledger(&self) -> &Ledger {
        &self.session.ledger
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn events(&self) -> PetResult<Vec<EventLogEntry>> {
        self.store.events_for_profile(&self.session.profile_id)
    }

    // ── Session lifecycle ──────────────────────────────────────

    /// Drop the current session, load `identity`'s saved state, then run
    /// accrual for the new profile.
    pub fn switch_profile(&mut self, identity: Option<&str>) -> Option<AccrualReport> {
        let profile_id = profile_key(identity);
        log::info!("engine: switching profile {} -> {profile_id}", self.session.profile_id);
        self.session = Session {
            profile_id,
            ledger: Ledger::new(&self.config.economy.pet_defaults),
        };
        self.hydrate();
        self.run_accrual()
    }

    /// App came to the foreground.
    pub fn on_foreground(&mut self) -> Option<AccrualReport> {
        self.run_accrual()
    }

    fn hydrate(&mut self) {
        let defaults = &self.config.economy.pet_defaults;
        let ledger = match self.store.load_profile_state(&self.session.profile_id) {
            Ok(Some(json)) => ProfileSnapshot::restore(&json, defaults),
            Ok(None) => Ledger::new(defaults),
            Err(e) => {
                log::warn!("engine: could not load profile {}: {e}", self.session.profile_id);
                Ledger::new(defaults)
            }
        };
        self.session.ledger = ledger;

        let starter_seeded = match self.config.starter_item().cloned() {
            Some(starter) => self.session.ledger.ensure_starter(&starter),
            None => false,
        };
        self.persist();
        self.record(PetEvent::ProfileLoaded {
            profile_id: self.session.profile_id.clone(),
            starter_seeded,
        });
    }

    fn run_accrual(&mut self) -> Option<AccrualReport> {
        let now = self.clock.now_ms();
        let report = match mood::run_accrual(
            &self.store,
            &self.session.profile_id,
            self.settings.intensity,
            &mut self.session.ledger,
            now,
        ) {
            Ok(report) => report,
            Err(e) => {
                log::warn!("engine: mood accrual failed for {}: {e}", self.session.profile_id);
                return None;
            }
        };

        if let Some(r) = report.as_ref().filter(|r| r.applied) {
            self.persist();
            let pet = self.session.ledger.pet();
            let (happiness, left_at) = (pet.happiness, pet.left_at);
            self.record(PetEvent::MoodPenaltyApplied {
                points: r.points,
                overdue_minutes: r.overdue_minutes,
                happiness,
            });
            if let Some(at) = left_at.filter(|_| happiness == 0) {
                log::info!("engine: {}'s pet has left", self.session.profile_id);
                self.record(PetEvent::PetLeft { at });
            }
        }
        report
    }

    // ── Write-through helpers ──────────────────────────────────

    fn persist(&self) {
        let snapshot = ProfileSnapshot::of(&self.session.ledger);
        let result = serde_json::to_string(&snapshot)
            .map_err(PetError::from)
            .and_then(|json| {
                self.store
                    .save_profile_state(&self.session.profile_id, &json, self.clock.now_ms())
            });
        if let Err(e) = result {
            log::warn!("engine: persist failed for {}: {e}", self.session.profile_id);
        }
    }

    fn record(&self, event: PetEvent) {
        let entry = serde_json::to_string(&event).map(|payload| EventLogEntry {
            id: None,
            profile_id: self.session.profile_id.clone(),
            at_ms: self.clock.now_ms(),
            event_type: event.type_name().to_string(),
            payload,
        });
        let result = entry
            .map_err(PetError::from)
            .and_then(|entry| self.store.append_event(&entry));
        if let Err(e) = result {
            log::warn!("engine: event log write failed: {e}");
        }
    }

    // ── Currency ───────────────────────────────────────────────

    /// Simulated gem purchase. Nothing is charged.
    pub fn buy_gems(&mut self, amount: u64) {
        self.grant_gems(amount, "shop");
    }

    fn grant_gems(&mut self, amount: u64, reason: &str) {
        self.session.ledger.credit(amount);
        self.persist();
        self.record(PetEvent::GemsCredited { amount, reason: reason.into() });
    }

    pub fn spend_gems(&mut self, amount: u64) -> bool {
        if !self.session.ledger.debit(amount) {
            return false;
        }
        self.persist();
        self.record(PetEvent::GemsDebited { amount, reason: "spend".into() });
        true
    }

    // ── Gacha ──────────────────────────────────────────────────

    pub fn pull_once(&mut self) -> Option<DrawResult> {
        let cost = self.config.economy.single_draw_cost;
        let result = DrawEngine::new(&self.config).single_draw(&mut self.session.ledger, &mut self.rng)?;
        self.persist();
        self.record(PetEvent::GemsDebited { amount: cost, reason: "pull_once".into() });
        self.record_draw(&result);
        Some(result)
    }

    pub fn pull_ten(&mut self) -> Option<Vec<DrawResult>> {
        let cost = self.config.economy.batch_draw_cost;
        let results = DrawEngine::new(&self.config).batch_draw(&mut self.session.ledger, &mut self.rng)?;
        self.persist();
        self.record(PetEvent::GemsDebited { amount: cost, reason: "pull_ten".into() });
        for result in &results {
            self.record_draw(result);
        }
        Some(results)
    }

    fn record_draw(&self, result: &DrawResult) {
        self.record(PetEvent::ItemDrawn {
            item_id: result.item.id.clone(),
            rarity: result.item.rarity,
            duplicate: result.duplicate,
            gems_awarded: result.gems_awarded,
        });
    }

    pub fn convert_duplicates(&mut self) -> ConvertSummary {
        let summary = DrawEngine::new(&self.config).convert_duplicates(&mut self.session.ledger);
        self.persist();
        if summary.total_gems > 0 {
            self.record(PetEvent::DuplicatesConverted {
                removed: summary.lines.iter().map(|l| l.removed).sum(),
                total_gems: summary.total_gems,
            });
        }
        summary
    }

    /// Empty the collection. The starter creature comes straight back so
    /// the pet always has an owned species.
    pub fn clear_inventory(&mut self) {
        self.session.ledger.clear_inventory();
        if let Some(starter) = self.config.starter_item().cloned() {
            self.session.ledger.ensure_starter(&starter);
        }
        self.persist();
        self.record(PetEvent::InventoryCleared);
    }

    // ── Pet care ───────────────────────────────────────────────

    /// `None` when the pet has left; feed it again after reconciling.
    pub fn feed(&mut self, amount: u32) -> Option<FeedOutcome> {
        let outcome = self
            .session
            .ledger
            .feed(amount, self.config.economy.level_up_happiness)?;
        self.persist();
        self.record(PetEvent::PetFed { happiness: outcome.happiness, level: outcome.level });
        if outcome.leveled_up {
            log::info!("engine: pet reached level {}", outcome.level);
            self.record(PetEvent::PetLeveledUp { level: outcome.level });
        }
        Some(outcome)
    }

    /// Spend the food price, then feed. Nothing is charged for an absent pet.
    pub fn buy_food(&mut self) -> Option<FeedOutcome> {
        if self.session.ledger.pet().is_estranged() {
            return None;
        }
        let (cost, happiness) = (self.config.economy.food_cost, self.config.economy.food_happiness);
        if !self.session.ledger.debit(cost) {
            return None;
        }
        self.record(PetEvent::GemsDebited { amount: cost, reason: "food".into() });
        self.feed(u32::from(happiness))
    }

    pub fn rename_pet(&mut self, name: &str) -> bool {
        if !self.session.ledger.rename(name) {
            return false;
        }
        self.persist();
        let name = self.session.ledger.pet().name.clone();
        self.record(PetEvent::PetRenamed { name });
        true
    }

    pub fn equip(&mut self, item_id: &str) -> bool {
        if !self.session.ledger.equip(item_id) {
            return false;
        }
        self.persist();
        self.record(PetEvent::AccessoryEquipped { item_id: item_id.into() });
        true
    }

    pub fn unequip(&mut self, item_id: &str) -> bool {
        if !self.session.ledger.unequip(item_id) {
            return false;
        }
        self.persist();
        self.record(PetEvent::AccessoryUnequipped { item_id: item_id.into() });
        true
    }

    pub fn set_active_creature(&mut self, item_id: &str) -> bool {
        if !self.session.ledger.set_active_creature(item_id) {
            return false;
        }
        self.persist();
        let species = self.session.ledger.pet().species.clone();
        self.record(PetEvent::SpeciesChanged { species });
        true
    }

    /// Direct happiness penalty at the current clock time.
    pub fn apply_mood_penalty(&mut self, points: u64) -> bool {
        let now = self.clock.now_ms();
        if !self.session.ledger.apply_mood_penalty(points, now) {
            return false;
        }
        self.persist();
        let pet = self.session.ledger.pet();
        let (happiness, left) = (pet.happiness, pet.left_at);
        self.record(PetEvent::MoodPenaltyApplied { points, overdue_minutes: 0, happiness });
        if let Some(at) = left {
            self.record(PetEvent::PetLeft { at });
        }
        true
    }

    /// Pay to bring the pet back. `cost` defaults to the configured price.
    pub fn reconcile_pet(&mut self, cost: Option<u64>) -> bool {
        let cost = cost.unwrap_or(self.config.economy.reconcile_cost);
        let happiness = self.config.economy.reconcile_happiness;
        if !self.session.ledger.reconcile(cost, happiness) {
            return false;
        }
        self.persist();
        self.record(PetEvent::PetReconciled { cost });
        true
    }

    // ── Settings ───────────────────────────────────────────────

    pub fn set_intensity(&mut self, intensity: Intensity) {
        self.settings.intensity = intensity;
        self.save_settings();
    }

    pub fn set_tone(&mut self, tone: Tone) {
        self.settings.tone = tone;
        self.save_settings();
    }

    fn save_settings(&self) {
        if let Err(e) = self.store.save_settings(&self.settings) {
            log::warn!("engine: settings write failed: {e}");
        }
    }

    // ── Tasks ──────────────────────────────────────────────────

    pub fn list_tasks(&self) -> PetResult<Vec<Task>> {
        self.store.tasks_for_profile(&self.session.profile_id)
    }

    pub fn task(&self, id: TaskId) -> PetResult<Task> {
        self.store
            .task(&self.session.profile_id, id)?
            .ok_or(PetError::TaskNotFound { id })
    }

    /// Reminders the current settings would schedule for `task` right now.
    pub fn plan_reminders(&self, task: &Task) -> Vec<PlannedReminder> {
        reminder::plan(
            task,
            self.settings.intensity,
            self.settings.tone,
            &self.session.ledger.pet().name,
            self.clock.now_ms(),
        )
    }

    /// Register planned reminders; failures are skipped.
    fn schedule_reminders(&mut self, task: &Task) -> Vec<TriggerHandle> {
        let planned = self.plan_reminders(task);
        let mut handles = Vec::with_capacity(planned.len());
        for p in &planned {
            match self.notifier.schedule(p.trigger_at, &p.title, &p.body) {
                Ok(handle) => handles.push(handle),
                Err(e) => log::warn!("engine: reminder for task {} not scheduled: {e}", task.id),
            }
        }
        if !planned.is_empty() {
            self.record(PetEvent::RemindersScheduled {
                task_id: task.id,
                scheduled: handles.len(),
                planned: planned.len(),
            });
        }
        handles
    }

    fn cancel_reminders(&mut self, task: &Task) {
        if task.trigger_handles.is_empty() {
            return;
        }
        let failed = self.notifier.cancel_all(&task.trigger_handles);
        if failed > 0 {
            log::warn!("engine: {failed} reminder(s) for task {} could not be cancelled", task.id);
        }
    }

    /// Write a task whose handles were just scheduled. If the row cannot be
    /// written the handles would be unreachable, so they are cancelled first.
    fn store_scheduled(&mut self, task: &Task) -> PetResult<()> {
        if let Err(e) = self.store.update_task(&self.session.profile_id, task) {
            log::warn!("engine: task {} not saved, cancelling its reminders: {e}", task.id);
            self.cancel_reminders(task);
            return Err(e);
        }
        Ok(())
    }

    pub fn add_task(&mut self, new_task: NewTask) -> PetResult<TaskId> {
        let id = self.store.insert_task(&self.session.profile_id, &new_task)?;
        let mut task = self.task(id)?;
        if task.due_at.is_some() {
            task.trigger_handles = self.schedule_reminders(&task);
            self.store_scheduled(&task)?;
        }
        self.record(PetEvent::TaskCreated { task_id: id });
        Ok(id)
    }

    /// Completing cancels reminders and pays the completion reward.
    /// Reopening a dated task schedules fresh reminders.
    pub fn toggle_complete(&mut self, id: TaskId) -> PetResult<Task> {
        let mut task = self.task(id)?;
        task.completed = !task.completed;

        if task.completed {
            self.cancel_reminders(&task);
            task.trigger_handles.clear();
            self.store.update_task(&self.session.profile_id, &task)?;
            self.record(PetEvent::TaskCompleted { task_id: id });
            self.grant_gems(self.config.economy.completion_reward, "task_completed");
        } else {
            task.trigger_handles = if task.due_at.is_some() {
                self.schedule_reminders(&task)
            } else {
                Vec::new()
            };
            self.store_scheduled(&task)?;
            self.record(PetEvent::TaskReopened { task_id: id });
        }
        Ok(task)
    }

    /// Title or deadline edits replace the task's reminders. A change to
    /// `completed` goes through `toggle_complete` so reminders and the
    /// completion reward are handled the same way.
    pub fn edit_task(&mut self, id: TaskId, mut patch: TaskPatch) -> PetResult<Task> {
        let completion = patch.completed.take();
        let mut task = self.task(id)?;
        let reschedule = patch.touches_schedule();

        if reschedule {
            self.cancel_reminders(&task);
            task.trigger_handles.clear();
        }
        patch.apply(&mut task);
        if reschedule && task.due_at.is_some() && !task.completed {
            task.trigger_handles = self.schedule_reminders(&task);
        }

        self.store_scheduled(&task)?;
        self.record(PetEvent::TaskEdited { task_id: id });

        match completion {
            Some(done) if done != task.completed => self.toggle_complete(id),
            _ => Ok(task),
        }
    }

    /// Cancel reminders, then delete. Returns false for an unknown id.
    pub fn remove_task(&mut self, id: TaskId) -> PetResult<bool> {
        let Some(task) = self.store.task(&self.session.profile_id, id)? else {
            return Ok(false);
        };
        self.cancel_reminders(&task);
        let removed = self.store.delete_task(&self.session.profile_id, id)?;
        if removed {
            self.record(PetEvent::TaskRemoved { task_id: id });
        }
        Ok(removed)
    }

    // ── Commands ───────────────────────────────────────────────

    pub fn submit_command(&mut self, command: PlayerCommand) -> PetResult<CommandReply> {
        let reply = match command {
            PlayerCommand::SwitchProfile { identity } => CommandReply::Accrual {
                report: self.switch_profile(identity.as_deref()),
            },
            PlayerCommand::Foreground => CommandReply::Accrual { report: self.on_foreground() },
            PlayerCommand::PullOnce => CommandReply::Draw { result: self.pull_once() },
            PlayerCommand::PullTen => CommandReply::Batch { results: self.pull_ten() },
            PlayerCommand::ConvertDuplicates => CommandReply::Converted {
                summary: self.convert_duplicates(),
            },
            PlayerCommand::ClearInventory => {
                self.clear_inventory();
                CommandReply::Done { ok: true }
            }
            PlayerCommand::BuyGems { amount } => {
                self.buy_gems(amount);
                CommandReply::Done { ok: true }
            }
            PlayerCommand::BuyFood => CommandReply::Fed { outcome: self.buy_food() },
            PlayerCommand::Feed { amount } => CommandReply::Fed { outcome: self.feed(amount) },
            PlayerCommand::RenamePet { name } => CommandReply::Done { ok: self.rename_pet(&name) },
            PlayerCommand::Equip { item_id } => CommandReply::Done { ok: self.equip(&item_id) },
            PlayerCommand::Unequip { item_id } => CommandReply::Done { ok: self.unequip(&item_id) },
            PlayerCommand::SetActiveCreature { item_id } => CommandReply::Done {
                ok: self.set_active_creature(&item_id),
            },
            PlayerCommand::ReconcilePet { cost } => CommandReply::Done { ok: self.reconcile_pet(cost) },
            PlayerCommand::AddTask { task } => CommandReply::TaskCreated { task_id: self.add_task(task)? },
            PlayerCommand::ToggleComplete { task_id } => {
                self.toggle_complete(task_id)?;
                CommandReply::Tasks { tasks: self.list_tasks()? }
            }
            PlayerCommand::EditTask { task_id, patch } => {
                self.edit_task(task_id, patch)?;
                CommandReply::Tasks { tasks: self.list_tasks()? }
            }
            PlayerCommand::RemoveTask { task_id } => CommandReply::Done { ok: self.remove_task(task_id)? },
            PlayerCommand::ListTasks => CommandReply::Tasks { tasks: self.list_tasks()? },
            PlayerCommand::PreviewReminders { task_id } => {
                let task = self.task(task_id)?;
                CommandReply::Reminders { planned: self.plan_reminders(&task) }
            }
            PlayerCommand::SetIntensity { intensity } => {
                self.set_intensity(intensity);
                CommandReply::Done { ok: true }
            }
            PlayerCommand::SetTone { tone } => {
                self.set_tone(tone);
                CommandReply::Done { ok: true }
            }
        };
        Ok(reply)
    }
}
