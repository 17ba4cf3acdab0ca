//! Task-pet reward engine.
//!
//! Completing tasks earns gems, gems buy gacha pulls, pulls fill a
//! collection that dresses up a virtual pet, and overdue tasks make the
//! pet unhappy until it leaves. `engine::PetEngine` is the entry point.

pub mod catalog;
pub mod clock;
pub mod command;
pub mod config;
pub mod draw_engine;
pub mod engine;
pub mod error;
pub mod event;
pub mod ledger;
pub mod mood;
pub mod notifier;
pub mod reminder;
pub mod rng;
pub mod settings;
pub mod snapshot;
pub mod store;
pub mod task;
pub mod types;
