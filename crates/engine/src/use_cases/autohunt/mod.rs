//! Autohunt: opt-in registry and the periodic scheduler that hunts for
//! registered players.

mod error;
mod registry;
mod scheduler;

pub use error::AutoHuntError;
pub use registry::AutoHuntRegistry;
pub use scheduler::{AutoHuntScheduler, TickReport};
