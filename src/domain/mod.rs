//! Core domain types for adjutant

mod invocation;
mod turn;

pub use invocation::{ToolId, ToolInvocation};
pub use turn::{Interpretation, Outcome, Utterance};
