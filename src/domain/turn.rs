//! Per-turn types produced by the command interpreter.

use serde::{Deserialize, Serialize};

use super::invocation::ToolInvocation;

/// One transcribed voice turn, consumed exactly once by the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance(String);

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Raw transcript text
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Lower-cased view used for matching.
    ///
    /// Lower-casing is the only normalization applied; punctuation and
    /// whitespace are left untouched.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl From<&str> for Utterance {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// What the session should do after the acknowledgment is spoken
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Run the tool in the background; its result is logged, not spoken
    Dispatch(ToolInvocation),

    /// Run the tool and speak its result as the response (greeting)
    DispatchAndSpeak(ToolInvocation),

    /// Extraction needs more information from the user; speak this and
    /// issue no tool call
    Clarify(String),

    /// Extraction failed after the acknowledgment was already spoken;
    /// the failure has been logged and the tool call is skipped
    Skip,

    /// Nothing to run; the acknowledgment is the whole response
    AckOnly,
}

/// Interpreter output for one utterance
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    /// Name of the rule that fired (exactly one always does)
    pub rule: &'static str,

    /// Spoken acknowledgment, emitted before any tool work starts
    pub ack: Option<String>,

    /// What to do next
    pub outcome: Outcome,
}

impl Interpretation {
    /// The resolved invocation, if this turn produced one
    pub fn invocation(&self) -> Option<&ToolInvocation> {
        match &self.outcome {
            Outcome::Dispatch(invocation) | Outcome::DispatchAndSpeak(invocation) => {
                Some(invocation)
            }
            _ => None,
        }
    }
}
