//! Time-of-day greeting tool.

use async_trait::async_trait;
use chrono::{Local, Timelike};

use super::{Tool, ToolContext, wrong_arguments};
use crate::domain::{ToolId, ToolInvocation};

/// Name used when the invocation carries none
const DEFAULT_NAME: &str = "User";

/// Greeting word for an hour of the day (0-23)
fn greeting_for_hour(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    }
}

/// Tool that greets the user by local time of day
pub struct GreetUser;

impl GreetUser {
    pub fn new() -> Self {
        Self
    }

    fn greet(&self, name: Option<&str>) -> String {
        let name = name.unwrap_or(DEFAULT_NAME);
        let greeting = greeting_for_hour(Local::now().hour());
        format!("{greeting}, {name}!")
    }
}

impl Default for GreetUser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for GreetUser {
    fn id(&self) -> ToolId {
        ToolId::GreetUser
    }

    async fn call(&self, invocation: ToolInvocation, _cx: &ToolContext) -> String {
        match invocation {
            ToolInvocation::GreetUser { name } => self.greet(name.as_deref()),
            _ => wrong_arguments(self.id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_bands() {
        assert_eq!(greeting_for_hour(0), "Good morning");
        assert_eq!(greeting_for_hour(11), "Good morning");
        assert_eq!(greeting_for_hour(12), "Good afternoon");
        assert_eq!(greeting_for_hour(17), "Good afternoon");
        assert_eq!(greeting_for_hour(18), "Good evening");
        assert_eq!(greeting_for_hour(23), "Good evening");
    }

    #[tokio::test]
    async fn test_greet_uses_default_name() {
        let tool = GreetUser::new();
        let result = tool
            .call(
                ToolInvocation::GreetUser { name: None },
                &ToolContext::new(),
            )
            .await;

        assert!(result.starts_with("Good "));
        assert!(result.ends_with(", User!"));
    }

    #[tokio::test]
    async fn test_greet_uses_given_name() {
        let tool = GreetUser::new();
        let result = tool
            .call(
                ToolInvocation::GreetUser {
                    name: Some("Maya".to_string()),
                },
                &ToolContext::new(),
            )
            .await;

        assert!(result.ends_with(", Maya!"));
    }
}
