//! pet-runner: headless driver for the task-pet engine.
//!
//! Usage:
//!   pet-runner --db pet.db --profile alice@example.com
//!   pet-runner --db pet.db --ipc-mode
//!
//! In IPC mode each stdin line is one JSON request; each reply is one
//! JSON line on stdout.

use anyhow::Result;
use taskpet_core::{
    clock::SystemClock,
    command::{CommandReply, PlayerCommand},
    config::EngineConfig,
    engine::PetEngine,
    ledger::Pet,
    notifier::{MemoryNotifier, ScheduledNotification},
    settings::Settings,
    store::PetStore,
    task::Task,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    GetState,
    Command { command: PlayerCommand },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    profile_id: String,
    now_ms: i64,
    gems: u64,
    pet: Pet,
    inventory_size: usize,
    settings: Settings,
    tasks: Vec<Task>,
    pending_reminders: Vec<ScheduledNotification>,
}

#[derive(serde::Serialize)]
struct IpcResponse {
    reply: Option<CommandReply>,
    state: UiState,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", default_seed());
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = string_arg(&args, "--db").unwrap_or(":memory:");
    let data_dir = string_arg(&args, "--data-dir").unwrap_or("./data");
    let profile = string_arg(&args, "--profile");

    if !ipc_mode {
        println!("Task Pet: pet-runner");
        println!("  seed:      {seed}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!("  profile:   {}", profile.unwrap_or("guest"));
        println!();
    }

    let config = EngineConfig::load(data_dir)?;
    let store = PetStore::open(db)?;
    store.migrate()?;

    let notifier = MemoryNotifier::new();
    let mut engine = PetEngine::open(
        config,
        store,
        Box::new(SystemClock),
        Box::new(notifier.clone()),
        seed,
        profile,
    )?;

    if ipc_mode {
        run_ipc_loop(&mut engine, &notifier)?;
    } else {
        print_summary(&engine, &notifier)?;
    }
    Ok(())
}

fn run_ipc_loop(engine: &mut PetEngine, notifier: &MemoryNotifier) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let request: IpcRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        let reply = match request {
            IpcRequest::Quit => break,
            IpcRequest::GetState => None,
            IpcRequest::Command { command } => match engine.submit_command(command) {
                Ok(reply) => Some(reply),
                Err(e) => {
                    log::warn!("command failed: {e}");
                    writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                    stdout.flush()?;
                    continue;
                }
            },
        };

        let response = IpcResponse { reply, state: build_ui_state(engine, notifier)? };
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state(engine: &PetEngine, notifier: &MemoryNotifier) -> Result<UiState> {
    let ledger = engine.ledger();
    Ok(UiState {
        profile_id: engine.profile_id().to_string(),
        now_ms: engine.now_ms(),
        gems: ledger.gems(),
        pet: ledger.pet().clone(),
        inventory_size: ledger.inventory().len(),
        settings: engine.settings(),
        tasks: engine.list_tasks()?,
        pending_reminders: notifier.pending(),
    })
}

fn print_summary(engine: &PetEngine, notifier: &MemoryNotifier) -> Result<()> {
    let ledger = engine.ledger();
    let pet = ledger.pet();
    let settings = engine.settings();

    println!("=== PROFILE ===");
    println!("  profile:    {}", engine.profile_id());
    println!("  gems:       {}", ledger.gems());
    println!("  intensity:  {:?}", settings.intensity);
    println!("  tone:       {:?}", settings.tone);

    println!();
    println!("=== PET ===");
    println!("  name:       {} the {}", pet.name, pet.species);
    println!("  level:      {}", pet.level);
    println!("  happiness:  {}/100", pet.happiness);
    match pet.left_at.and_then(chrono::DateTime::from_timestamp_millis) {
        Some(at) => println!("  status:     left at {}", at.to_rfc3339()),
        None => println!("  status:     home"),
    }
    if !pet.equipped_accessories.is_empty() {
        println!("  wearing:    {}", pet.equipped_accessories.join(", "));
    }

    println!();
    println!("=== COLLECTION ({} items) ===", ledger.inventory().len());
    for item in ledger.inventory() {
        println!("  [{:>2}] {:<14} {:?}", item.rarity.code(), item.name, item.category);
    }

    println!();
    let tasks = engine.list_tasks()?;
    println!("=== TASKS ({}) ===", tasks.len());
    let now = engine.now_ms();
    for task in &tasks {
        let due = task
            .due_at
            .and_then(chrono::DateTime::from_timestamp_millis)
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| "no deadline".into());
        let mark = if task.completed {
            "x"
        } else if task.is_overdue(now) {
            "!"
        } else {
            " "
        };
        println!("  [{mark}] #{:<4} {:<30} {due}", task.id, task.title);
    }

    let pending = notifier.pending();
    if !pending.is_empty() {
        println!();
        println!("=== REMINDERS SCHEDULED THIS RUN ({}) ===", pending.len());
        for n in pending {
            println!("  {} | {}", n.trigger_at, n.body);
        }
    }
    Ok(())
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn default_seed() -> u64 {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0) as u64
}
