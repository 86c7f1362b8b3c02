//! Tool identifiers and resolved invocations.

use serde::{Deserialize, Serialize};

/// Identifier for a registered tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolId {
    OpenApp,
    GetWeather,
    SearchWeb,
    SendEmail,
    ScheduleTask,
    GreetUser,
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolId::OpenApp => write!(f, "open_app"),
            ToolId::GetWeather => write!(f, "get_weather"),
            ToolId::SearchWeb => write!(f, "search_web"),
            ToolId::SendEmail => write!(f, "send_email"),
            ToolId::ScheduleTask => write!(f, "schedule_task"),
            ToolId::GreetUser => write!(f, "greet_user"),
        }
    }
}

/// A resolved tool call: which tool to run and the arguments extracted
/// from the utterance.
///
/// One variant per tool keeps dispatch a tagged match instead of a chain
/// of runtime string checks, so rule precedence stays explicit and
/// testable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolInvocation {
    OpenApp {
        app_name: String,
    },
    GetWeather {
        city: String,
    },
    SearchWeb {
        query: String,
    },
    SendEmail {
        to: String,
        subject: String,
        body: String,
        cc: Option<String>,
    },
    ScheduleTask {
        title: String,
        description: String,
        minutes_from_now: i64,
    },
    GreetUser {
        name: Option<String>,
    },
}

impl ToolInvocation {
    /// The tool this invocation targets
    pub fn tool(&self) -> ToolId {
        match self {
            ToolInvocation::OpenApp { .. } => ToolId::OpenApp,
            ToolInvocation::GetWeather { .. } => ToolId::GetWeather,
            ToolInvocation::SearchWeb { .. } => ToolId::SearchWeb,
            ToolInvocation::SendEmail { .. } => ToolId::SendEmail,
            ToolInvocation::ScheduleTask { .. } => ToolId::ScheduleTask,
            ToolInvocation::GreetUser { .. } => ToolId::GreetUser,
        }
    }
}
