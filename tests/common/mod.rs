//! Shared test utilities for session turn tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use adjutant::domain::{ToolId, ToolInvocation};
use adjutant::session::Speaker;
use adjutant::tools::{Tool, ToolContext};

/// Speaker that records every spoken line
#[derive(Default)]
pub struct RecordingSpeaker {
    lines: Mutex<Vec<String>>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn speak(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}

/// Tool stub that records invocations and notifies each call
pub struct RecordingTool {
    id: ToolId,
    result: String,
    panic_on_call: bool,
    pub calls: Mutex<Vec<ToolInvocation>>,
    pub called: Notify,
}

impl RecordingTool {
    pub fn new(id: ToolId, result: &str) -> Arc<Self> {
        Arc::new(Self {
            id,
            result: result.to_string(),
            panic_on_call: false,
            calls: Mutex::new(Vec::new()),
            called: Notify::new(),
        })
    }

    /// A tool that panics when called, for boundary tests
    pub fn panicking(id: ToolId) -> Arc<Self> {
        Arc::new(Self {
            id,
            result: String::new(),
            panic_on_call: true,
            calls: Mutex::new(Vec::new()),
            called: Notify::new(),
        })
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn id(&self) -> ToolId {
        self.id
    }

    async fn call(&self, invocation: ToolInvocation, _cx: &ToolContext) -> String {
        self.calls.lock().unwrap().push(invocation);
        self.called.notify_one();
        if self.panic_on_call {
            panic!("stub tool failure");
        }
        self.result.clone()
    }
}
