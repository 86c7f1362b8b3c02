//! Calendar scheduling tool.
//!
//! Events are inserted into the user's primary calendar through the
//! OAuth-protected REST endpoint. The credential token lives in a local
//! JSON cache across process runs; an expired token is refreshed against
//! the token endpoint and the cache rewritten before the insert.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use super::{Tool, ToolContext, wrong_arguments};
use crate::domain::{ToolId, ToolInvocation};
use crate::http;

/// Named time zone stamped onto every event
pub const EVENT_TIME_ZONE: &str = "Asia/Manila";
const TIME_ZONE_OFFSET_SECS: i32 = 8 * 3600;

/// Fixed event length
pub const EVENT_DURATION_MINUTES: i64 = 30;

const EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";

/// Tokens this close to expiry are refreshed anyway
const EXPIRY_SKEW_SECS: i64 = 60;

/// Spoken/logged result when scheduling fails for any transport reason
const SCHEDULE_FAILURE: &str = "I couldn't add that to your calendar.";

/// Calendar failure, split only where the result string differs
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("calendar token cache not found at {0}")]
    NotConfigured(PathBuf),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Event resource ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRequest {
    pub summary: String,
    pub description: String,
    pub start_rfc3339: String,
    pub end_rfc3339: String,
    pub time_zone: String,
}

/// What the remote calendar reported back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub html_link: Option<String>,
}

/// Seam to the remote calendar service
pub trait CalendarApi: Send + Sync {
    fn insert_event(&self, event: &EventRequest) -> Result<ScheduledEvent, CalendarError>;
}

/// Cached OAuth token set, persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenCache {
    access_token: String,
    refresh_token: String,
    client_id: String,
    client_secret: String,
    token_uri: String,
    expiry: DateTime<Utc>,
}

impl TokenCache {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry <= now + Duration::seconds(EXPIRY_SKEW_SECS)
    }
}

/// Google-style calendar client with a file-backed token cache
pub struct GoogleCalendar {
    token_path: PathBuf,
    agent: ureq::Agent,
}

impl GoogleCalendar {
    pub fn new(token_path: PathBuf) -> Self {
        Self {
            token_path,
            agent: http::agent(),
        }
    }

    fn load_token(&self) -> Result<TokenCache> {
        let raw = fs::read_to_string(&self.token_path).with_context(|| {
            format!("cannot read token cache at {}", self.token_path.display())
        })?;
        serde_json::from_str(&raw).context("token cache is not valid JSON")
    }

    fn save_token(&self, token: &TokenCache) -> Result<()> {
        if let Some(parent) = self.token_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(token).context("cannot serialize token cache")?;
        fs::write(&self.token_path, raw).with_context(|| {
            format!("cannot write token cache at {}", self.token_path.display())
        })
    }

    fn refresh(&self, token: &TokenCache) -> Result<TokenCache> {
        let response = self
            .agent
            .post(&token.token_uri)
            .send_form(&[
                ("client_id", token.client_id.as_str()),
                ("client_secret", token.client_secret.as_str()),
                ("refresh_token", token.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .context("token refresh request failed")?;
        let json: serde_json::Value = response
            .into_json()
            .context("token refresh response was not JSON")?;

        let access_token = json
            .get("access_token")
            .and_then(|value| value.as_str())
            .ok_or_else(|| anyhow!("token refresh response has no access_token"))?
            .to_string();
        let expires_in = json
            .get("expires_in")
            .and_then(|value| value.as_i64())
            .unwrap_or(3600);

        Ok(TokenCache {
            access_token,
            expiry: Utc::now() + Duration::seconds(expires_in),
            ..token.clone()
        })
    }

    /// Valid access token, refreshing and rewriting the cache if needed
    fn access_token(&self) -> Result<String> {
        let token = self.load_token()?;
        if token.is_expired(Utc::now()) {
            let refreshed = self.refresh(&token)?;
            self.save_token(&refreshed)?;
            Ok(refreshed.access_token)
        } else {
            Ok(token.access_token)
        }
    }
}

impl CalendarApi for GoogleCalendar {
    fn insert_event(&self, event: &EventRequest) -> Result<ScheduledEvent, CalendarError> {
        if !self.token_path.exists() {
            return Err(CalendarError::NotConfigured(self.token_path.clone()));
        }

        let access_token = self.access_token()?;
        let payload = serde_json::json!({
            "summary": event.summary,
            "description": event.description,
            "start": { "dateTime": event.start_rfc3339, "timeZone": event.time_zone },
            "end": { "dateTime": event.end_rfc3339, "timeZone": event.time_zone },
        });

        let response = self
            .agent
            .post(EVENTS_URL)
            .set("Authorization", &format!("Bearer {access_token}"))
            .send_json(payload)
            .context("event insert request failed")?;
        let json: serde_json::Value = response
            .into_json()
            .context("event insert response was not JSON")?;

        let html_link = json
            .get("htmlLink")
            .and_then(|value| value.as_str())
            .map(String::from);
        Ok(ScheduledEvent { html_link })
    }
}

/// Build the event resource for a start offset from `now`
fn event_request(
    title: &str,
    description: &str,
    minutes_from_now: i64,
    now: DateTime<Utc>,
) -> EventRequest {
    let zone = FixedOffset::east_opt(TIME_ZONE_OFFSET_SECS).unwrap();
    let start = now.with_timezone(&zone) + Duration::minutes(minutes_from_now);
    let end = start + Duration::minutes(EVENT_DURATION_MINUTES);

    EventRequest {
        summary: title.to_string(),
        description: description.to_string(),
        start_rfc3339: start.to_rfc3339(),
        end_rfc3339: end.to_rfc3339(),
        time_zone: EVENT_TIME_ZONE.to_string(),
    }
}

/// Tool that schedules a calendar event a number of minutes from now
pub struct ScheduleTask {
    api: Arc<dyn CalendarApi>,
}

impl ScheduleTask {
    pub fn new(api: Arc<dyn CalendarApi>) -> Self {
        Self { api }
    }

    async fn schedule(&self, title: String, description: String, minutes_from_now: i64) -> String {
        let event = event_request(&title, &description, minutes_from_now, Utc::now());

        let api = self.api.clone();
        match tokio::task::spawn_blocking(move || api.insert_event(&event)).await {
            Ok(Ok(scheduled)) => {
                info!(title = %title, minutes_from_now, "calendar event created");
                match scheduled.html_link {
                    Some(link) => format!("Event '{title}' scheduled: {link}"),
                    None => format!("Event '{title}' scheduled."),
                }
            }
            Ok(Err(CalendarError::NotConfigured(path))) => {
                error!(title = %title, path = %path.display(), "calendar token cache missing");
                "Calendar is not configured.".to_string()
            }
            Ok(Err(CalendarError::Other(err))) => {
                error!(title = %title, error = %err, "failed to schedule event");
                SCHEDULE_FAILURE.to_string()
            }
            Err(err) => {
                error!(title = %title, error = %err, "calendar task failed");
                SCHEDULE_FAILURE.to_string()
            }
        }
    }
}

#[async_trait]
impl Tool for ScheduleTask {
    fn id(&self) -> ToolId {
        ToolId::ScheduleTask
    }

    async fn call(&self, invocation: ToolInvocation, _cx: &ToolContext) -> String {
        match invocation {
            ToolInvocation::ScheduleTask {
                title,
                description,
                minutes_from_now,
            } => self.schedule(title, description, minutes_from_now).await,
            _ => wrong_arguments(self.id()),
        }
    }
}
