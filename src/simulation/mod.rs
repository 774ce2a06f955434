//! Flow simulation, leak and excess detection, and the engine that runs them

pub mod engine;
pub mod events;
pub mod excess;
pub mod flow;
pub mod leak;
pub mod runner;
pub mod snapshot;
pub mod state;

pub use engine::{Engine, Intent};
pub use events::EngineEvent;
pub use flow::{FlowSource, RandomFlow};
pub use leak::LeakSeverity;
pub use runner::{spawn, EngineHandle};
pub use snapshot::Snapshot;
pub use state::SimulationState;
