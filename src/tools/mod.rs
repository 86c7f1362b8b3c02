//! Tool execution and registration.
//!
//! Tools are the terminal actions of recognized voice commands. Every tool
//! implements the [`Tool`] trait: an async call that takes the typed
//! invocation plus an opaque per-turn context and returns a single
//! human-readable string. Failures never cross the trait boundary as
//! errors - a tool converts everything it can go wrong on into a
//! failure-flagged result string.
//!
//! The [`ToolRegistry`] maps tool identifiers to trait objects and is the
//! only path the interpreter side uses to reach a tool.

mod calendar;
mod email;
mod greet;
mod open_app;
mod search;
mod weather;

pub use calendar::{
    CalendarApi, CalendarError, EventRequest, GoogleCalendar, ScheduleTask, ScheduledEvent,
};
pub use email::{MailError, MailTransport, OutgoingMail, SendEmail, SmtpStarttlsMailer};
pub use greet::GreetUser;
pub use open_app::{AppLauncher, OpenApp, ProcessLauncher};
pub use search::{BrowserOpener, PlatformBrowser, SearchWeb};
pub use weather::{CurrentConditions, GetWeather, WeatherClient, WttrClient};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{ToolId, ToolInvocation};

/// Opaque per-invocation context handed to every tool call
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Id of the voice turn that produced the invocation
    pub turn_id: Uuid,
}

impl ToolContext {
    pub fn new() -> Self {
        Self {
            turn_id: Uuid::new_v4(),
        }
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for dispatchable tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool id
    fn id(&self) -> ToolId;

    /// Run the tool.
    ///
    /// Always returns a result string; failures are encoded in the string,
    /// never raised to the caller.
    async fn call(&self, invocation: ToolInvocation, cx: &ToolContext) -> String;
}

/// Result string for an invocation routed to the wrong tool
pub(crate) fn wrong_arguments(id: ToolId) -> String {
    format!("Tool '{id}' received arguments for a different tool.")
}

/// Central registry mapping tool ids to implementations.
///
/// `Clone`-able and shareable across tasks: tools are stored as
/// `Arc<dyn Tool>`.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: HashMap<ToolId, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry with no tools registered
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry wired with every standard tool and its real
    /// transport, configured from `config`.
    pub fn with_defaults(config: &Config) -> Self {
        let mut registry = Self::new();

        registry.register(Arc::new(OpenApp::new(Arc::new(ProcessLauncher))));
        registry.register(Arc::new(GetWeather::new(Arc::new(WttrClient::new()))));
        registry.register(Arc::new(SearchWeb::new(Arc::new(PlatformBrowser))));
        registry.register(Arc::new(SendEmail::from_config(config)));
        registry.register(Arc::new(ScheduleTask::new(Arc::new(GoogleCalendar::new(
            config.calendar_token_path.clone(),
        )))));
        registry.register(Arc::new(GreetUser::new()));

        registry
    }

    /// Register a tool, replacing any previous entry with the same id
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.id(), tool);
    }

    /// Retrieve a tool by id
    pub fn get(&self, id: ToolId) -> Option<Arc<dyn Tool>> {
        self.tools.get(&id).cloned()
    }

    /// Ids of all registered tools
    pub fn ids(&self) -> Vec<ToolId> {
        self.tools.keys().copied().collect()
    }

    /// Dispatch an invocation to its tool.
    ///
    /// An unregistered tool id yields a failure string, mirroring the
    /// tool-level contract that dispatch never raises.
    pub async fn dispatch(&self, invocation: ToolInvocation, cx: &ToolContext) -> String {
        let id = invocation.tool();
        match self.get(id) {
            Some(tool) => tool.call(invocation, cx).await,
            None => format!("No tool registered for '{id}'."),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
