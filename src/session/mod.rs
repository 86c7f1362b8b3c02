//! Session boundary: one utterance in, spoken lines out.
//!
//! The hosting audio transport is external; it hands the assistant one
//! transcribed utterance at a time and renders whatever the assistant
//! speaks. [`Assistant::handle_utterance`] is that single inbound
//! entrypoint. A turn is processed to completion before the next one is
//! accepted; recognized tools run in the background and log their result.
//!
//! No failure inside a turn reaches the host: the outermost boundary
//! catches errors and panics alike, answers with one generic apology, and
//! discards the turn.

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::Config;
use crate::domain::{Outcome, Utterance};
use crate::interpreter::Interpreter;
use crate::tools::{ToolContext, ToolRegistry};

/// Spoken when a turn fails in an unexpected way
pub const APOLOGY: &str = "Apologies, I couldn't process that command.";

/// Outbound seam to the hosting session's voice output
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str);
}

/// Speaker for the CLI host: prints spoken lines to stdout
pub struct StdoutSpeaker;

#[async_trait]
impl Speaker for StdoutSpeaker {
    async fn speak(&self, text: &str) {
        println!("assistant> {text}");
    }
}

/// The assistant core: interpreter plus tool registry behind one
/// turn-at-a-time entrypoint
pub struct Assistant {
    interpreter: Interpreter,
    registry: Arc<ToolRegistry>,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl Assistant {
    /// Assistant wired with the standard tools and real transports
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            Interpreter::new(config.default_city.clone()),
            Arc::new(ToolRegistry::with_defaults(config)),
        )
    }

    /// Assistant from explicit parts (used by tests to inject stubs)
    pub fn with_parts(interpreter: Interpreter, registry: Arc<ToolRegistry>) -> Self {
        Self {
            interpreter,
            registry,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// Handle one utterance.
    ///
    /// Speaks the acknowledgment (and clarification or greeting, when the
    /// turn calls for one) through `speaker`. Never returns an error and
    /// never panics across this boundary; an unexpected failure is logged
    /// and answered with [`APOLOGY`].
    pub async fn handle_utterance(&self, text: &str, speaker: &dyn Speaker) {
        let utterance = Utterance::new(text);
        let cx = ToolContext::new();

        let turn = std::panic::AssertUnwindSafe(self.process(&utterance, &cx, speaker))
            .catch_unwind()
            .await;

        match turn {
            Ok(()) => {}
            Err(_) => {
                error!(turn = %cx.turn_id, "turn panicked");
                speaker.speak(APOLOGY).await;
            }
        }
    }

    async fn process(&self, utterance: &Utterance, cx: &ToolContext, speaker: &dyn Speaker) {
        let interpretation = self.interpreter.interpret(utterance);
        info!(
            turn = %cx.turn_id,
            rule = interpretation.rule,
            "utterance interpreted"
        );

        if let Some(ack) = &interpretation.ack {
            speaker.speak(ack).await;
        }

        match interpretation.outcome {
            Outcome::Dispatch(invocation) => {
                let registry = self.registry.clone();
                let cx = cx.clone();
                let tool = invocation.tool();
                let handle = tokio::spawn(async move {
                    let result = registry.dispatch(invocation, &cx).await;
                    info!(turn = %cx.turn_id, %tool, result = %result, "tool finished");
                });
                self.track(handle).await;
            }
            Outcome::DispatchAndSpeak(invocation) => {
                let result = self.registry.dispatch(invocation, cx).await;
                speaker.speak(&result).await;
            }
            Outcome::Clarify(message) => {
                speaker.speak(&message).await;
            }
            Outcome::Skip | Outcome::AckOnly => {}
        }
    }

    async fn track(&self, handle: JoinHandle<()>) {
        let mut in_flight = self.in_flight.lock().await;
        in_flight.retain(|pending| !pending.is_finished());
        in_flight.push(handle);
    }

    /// Wait for background tool work to finish (shutdown path)
    pub async fn drain(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight.drain(..).collect()
        };
        for handle in handles {
            let _ = handle.await;
        }
    }
}

/// Read utterances from stdin until EOF or an exit word, one turn at a
/// time, speaking through `speaker`.
pub async fn run_repl(assistant: &Assistant, speaker: &dyn Speaker) -> anyhow::Result<()> {
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == "exit" || text == "quit" {
            break;
        }
        assistant.handle_utterance(text, speaker).await;
    }

    assistant.drain().await;
    Ok(())
}
