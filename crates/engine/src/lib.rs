//! ZooHunt engine library.
//!
//! ## Structure
//!
//! - `use_cases/` - Hunts, autohunt scheduling, achievements, daily rewards
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
