//! Utterance interpretation: ordered keyword rules over the transcript.
//!
//! The utterance is lower-cased and checked against substring triggers in
//! a fixed priority order; the first matching rule wins and the final
//! rule always matches, so exactly one rule fires per utterance. There is
//! no intent scoring and no backtracking - this is deliberate keyword
//! matching, not language understanding.

mod extract;

pub use extract::{EmailArgs, ExtractError, ScheduleArgs};

use tracing::warn;

use crate::domain::{Interpretation, Outcome, ToolInvocation, Utterance};

/// Acknowledgment for a weather request
pub const ACK_WEATHER: &str = "Check! Getting the weather.";
/// Acknowledgment for a web search
pub const ACK_SEARCH: &str = "Will do, searching the web.";
/// Acknowledgment for an email command
pub const ACK_EMAIL: &str = "Check! Sending your email.";
/// Acknowledgment for a scheduling command
pub const ACK_SCHEDULE: &str = "Got it! Scheduling that in your calendar.";
/// Spoken when no rule but the fallback matches
pub const FALLBACK_ACK: &str = "Hmm, not sure what that means.";
/// Spoken when a scheduling command has no explicit duration
pub const CLARIFY_DURATION: &str = "Please specify the time, like 'in 10 minutes'.";
/// Spoken when the duration is present but unparseable
pub const CLARIFY_SCHEDULE_FAILED: &str = "I couldn't set that schedule.";

/// Command family a rule resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    OpenApp,
    Weather,
    Search,
    Email,
    Schedule,
    Greet,
    Fallback,
}

/// Trigger predicate over the normalized utterance
#[derive(Debug, Clone, Copy)]
enum Trigger {
    /// Utterance starts with the literal prefix
    Prefix(&'static str),
    /// Utterance contains the literal substring
    Contains(&'static str),
    /// Utterance contains any of the literal substrings
    ContainsAny(&'static [&'static str]),
    /// Always matches (fallback, must be last)
    Always,
}

impl Trigger {
    fn matches(&self, text: &str) -> bool {
        match self {
            Trigger::Prefix(prefix) => text.starts_with(prefix),
            Trigger::Contains(needle) => text.contains(needle),
            Trigger::ContainsAny(needles) => needles.iter().any(|needle| text.contains(needle)),
            Trigger::Always => true,
        }
    }
}

/// One entry in the ordered rule table
struct Rule {
    name: &'static str,
    trigger: Trigger,
    family: Family,
}

/// Rule-based command interpreter
pub struct Interpreter {
    rules: Vec<Rule>,
    default_city: String,
}

impl Interpreter {
    /// Create an interpreter with the standard rule table.
    ///
    /// `default_city` is used when a weather request names no city.
    pub fn new(default_city: impl Into<String>) -> Self {
        let rules = vec![
            Rule {
                name: "open_app",
                trigger: Trigger::Prefix("open "),
                family: Family::OpenApp,
            },
            Rule {
                name: "weather",
                trigger: Trigger::Contains("weather"),
                family: Family::Weather,
            },
            Rule {
                name: "web_search",
                trigger: Trigger::Contains("search for"),
                family: Family::Search,
            },
            Rule {
                name: "email",
                trigger: Trigger::Contains("send email"),
                family: Family::Email,
            },
            Rule {
                name: "schedule",
                trigger: Trigger::ContainsAny(&["schedule", "remind me"]),
                family: Family::Schedule,
            },
            Rule {
                name: "greeting",
                trigger: Trigger::ContainsAny(&["hello", "hi"]),
                family: Family::Greet,
            },
            Rule {
                name: "fallback",
                trigger: Trigger::Always,
                family: Family::Fallback,
            },
        ];

        Self {
            rules,
            default_city: default_city.into(),
        }
    }

    /// Interpret one utterance into an acknowledgment and an outcome
    pub fn interpret(&self, utterance: &Utterance) -> Interpretation {
        let text = utterance.normalized();

        for rule in &self.rules {
            if rule.trigger.matches(&text) {
                return self.apply(rule, &text);
            }
        }

        // The table ends with an Always rule, so this is unreachable; keep
        // the fallback semantics anyway rather than panic.
        Interpretation {
            rule: "fallback",
            ack: Some(FALLBACK_ACK.to_string()),
            outcome: Outcome::AckOnly,
        }
    }

    fn apply(&self, rule: &Rule, text: &str) -> Interpretation {
        let (ack, outcome) = match rule.family {
            Family::OpenApp => {
                let app_name = extract::app_name(text);
                (
                    Some(format!("Roger that, opening {app_name}.")),
                    Outcome::Dispatch(ToolInvocation::OpenApp { app_name }),
                )
            }
            Family::Weather => {
                let city = extract::weather_city(text)
                    .unwrap_or_else(|| self.default_city.clone());
                (
                    Some(ACK_WEATHER.to_string()),
                    Outcome::Dispatch(ToolInvocation::GetWeather { city }),
                )
            }
            Family::Search => {
                let query = extract::search_query(text);
                (
                    Some(ACK_SEARCH.to_string()),
                    Outcome::Dispatch(ToolInvocation::SearchWeb { query }),
                )
            }
            Family::Email => {
                // The acknowledgment is spoken before extraction runs and
                // is not conditioned on its success; a parse failure only
                // skips the send.
                let outcome = match extract::email(text) {
                    Ok(args) => Outcome::Dispatch(ToolInvocation::SendEmail {
                        to: args.to,
                        subject: args.subject,
                        body: args.body,
                        cc: None,
                    }),
                    Err(err) => {
                        warn!(utterance = text, error = %err, "failed to parse email command");
                        Outcome::Skip
                    }
                };
                (Some(ACK_EMAIL.to_string()), outcome)
            }
            Family::Schedule => {
                let outcome = match extract::schedule(text) {
                    Ok(args) => Outcome::Dispatch(ToolInvocation::ScheduleTask {
                        title: args.title.clone(),
                        description: args.title,
                        minutes_from_now: args.minutes,
                    }),
                    Err(ExtractError::MissingDuration) => {
                        Outcome::Clarify(CLARIFY_DURATION.to_string())
                    }
                    Err(err) => {
                        warn!(utterance = text, error = %err, "failed to parse schedule command");
                        Outcome::Clarify(CLARIFY_SCHEDULE_FAILED.to_string())
                    }
                };
                (Some(ACK_SCHEDULE.to_string()), outcome)
            }
            Family::Greet => (
                None,
                Outcome::DispatchAndSpeak(ToolInvocation::GreetUser { name: None }),
            ),
            Family::Fallback => (Some(FALLBACK_ACK.to_string()), Outcome::AckOnly),
        };

        Interpretation {
            rule: rule.name,
            ack,
            outcome,
        }
    }
}
