pub mod orchestration;

pub use orchestration::{handle_event, EventOutcome, WorkflowResult};
