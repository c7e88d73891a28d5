mod error;
pub mod handlers;
pub mod messages;
mod orchestrator;
pub mod selection;
pub mod tracing;
pub mod transport;

pub use error::BotError;
pub use orchestrator::{builder::OrchestratorBuilder, Mode, Orchestrator, Outcome};
