pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;
pub mod tester;

pub use policy::ManagerStyle;
pub use seeds::{SeedInfo, resolve_seed_inputs};
pub use simulation::{GameSummary, SimulationConfig, fingerprint, replay_summary, run_game};
pub use tester::*;
