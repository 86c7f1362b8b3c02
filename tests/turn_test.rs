//! Full-turn tests through the assistant session boundary.
//!
//! These drive `handle_utterance` end to end with a recording speaker and
//! stub tools: acknowledgment ordering, extraction failure handling, the
//! fallback path, and the promise that no tool failure or panic escapes
//! the turn boundary.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use adjutant::domain::{ToolId, ToolInvocation};
use adjutant::interpreter::{
    ACK_EMAIL, ACK_SCHEDULE, ACK_WEATHER, CLARIFY_DURATION, FALLBACK_ACK, Interpreter,
};
use adjutant::session::{APOLOGY, Assistant};
use adjutant::tools::ToolRegistry;

use common::{RecordingSpeaker, RecordingTool};

fn assistant_with(tools: &[Arc<RecordingTool>]) -> Assistant {
    let mut registry = ToolRegistry::new();
    for tool in tools {
        registry.register(tool.clone());
    }
    Assistant::with_parts(Interpreter::new("manila"), Arc::new(registry))
}

#[tokio::test]
async fn test_weather_turn_acks_then_dispatches_in_background() {
    let weather = RecordingTool::new(ToolId::GetWeather, "Sunny in paris: 31°C.");
    let assistant = assistant_with(&[weather.clone()]);
    let speaker = RecordingSpeaker::new();

    assistant.handle_utterance("weather in paris", &speaker).await;

    // The acknowledgment is already out when handle_utterance returns
    assert_eq!(speaker.lines(), vec![ACK_WEATHER.to_string()]);

    timeout(Duration::from_secs(2), weather.called.notified())
        .await
        .expect("weather tool was not called");
    assistant.drain().await;

    let calls = weather.calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![ToolInvocation::GetWeather {
            city: "paris".to_string()
        }]
    );

    // Fire-and-forget: the tool result is logged, never spoken
    assert_eq!(speaker.lines(), vec![ACK_WEATHER.to_string()]);
}

#[tokio::test]
async fn test_email_turn_passes_extracted_arguments() {
    let email = RecordingTool::new(ToolId::SendEmail, "Email sent successfully to bob");
    let assistant = assistant_with(&[email.clone()]);
    let speaker = RecordingSpeaker::new();

    assistant
        .handle_utterance("send email to bob subject hi message see you later", &speaker)
        .await;

    timeout(Duration::from_secs(2), email.called.notified())
        .await
        .expect("email tool was not called");
    assistant.drain().await;

    let calls = email.calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![ToolInvocation::SendEmail {
            to: "bob".to_string(),
            subject: "hi".to_string(),
            body: "see you later".to_string(),
            cc: None,
        }]
    );
}

#[tokio::test]
async fn test_email_parse_failure_acks_but_skips_send() {
    let email = RecordingTool::new(ToolId::SendEmail, "unused");
    let assistant = assistant_with(&[email.clone()]);
    let speaker = RecordingSpeaker::new();

    assistant
        .handle_utterance("send email to bob about the meeting", &speaker)
        .await;
    assistant.drain().await;

    // Spoken first, extraction attempted after, send skipped on failure
    assert_eq!(speaker.lines(), vec![ACK_EMAIL.to_string()]);
    assert!(email.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_schedule_without_duration_clarifies_instead_of_guessing() {
    let calendar = RecordingTool::new(ToolId::ScheduleTask, "unused");
    let assistant = assistant_with(&[calendar.clone()]);
    let speaker = RecordingSpeaker::new();

    assistant
        .handle_utterance("schedule meeting tomorrow", &speaker)
        .await;
    assistant.drain().await;

    assert_eq!(
        speaker.lines(),
        vec![ACK_SCHEDULE.to_string(), CLARIFY_DURATION.to_string()]
    );
    assert!(calendar.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_fallback_speaks_and_issues_no_tool_call() {
    let assistant = assistant_with(&[]);
    let speaker = RecordingSpeaker::new();

    assistant
        .handle_utterance("what time does the game start", &speaker)
        .await;
    assistant.drain().await;

    assert_eq!(speaker.lines(), vec![FALLBACK_ACK.to_string()]);
}

#[tokio::test]
async fn test_greeting_result_is_spoken() {
    let greet = RecordingTool::new(ToolId::GreetUser, "Good evening, User!");
    let assistant = assistant_with(&[greet.clone()]);
    let speaker = RecordingSpeaker::new();

    assistant.handle_utterance("hello there", &speaker).await;

    assert_eq!(speaker.lines(), vec!["Good evening, User!".to_string()]);
    assert_eq!(greet.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_panicking_tool_yields_apology_and_session_survives() {
    let greet = RecordingTool::panicking(ToolId::GreetUser);
    let assistant = assistant_with(&[greet]);
    let speaker = RecordingSpeaker::new();

    assistant.handle_utterance("hello there", &speaker).await;
    assert_eq!(speaker.lines(), vec![APOLOGY.to_string()]);

    // The next turn still works
    assistant
        .handle_utterance("complete gibberish here", &speaker)
        .await;
    assert_eq!(
        speaker.lines(),
        vec![APOLOGY.to_string(), FALLBACK_ACK.to_string()]
    );
}

#[tokio::test]
async fn test_same_utterance_yields_same_acknowledgment() {
    let weather = RecordingTool::new(ToolId::GetWeather, "report");
    let assistant = assistant_with(&[weather]);
    let speaker = RecordingSpeaker::new();

    assistant.handle_utterance("weather in tokyo", &speaker).await;
    assistant.handle_utterance("weather in tokyo", &speaker).await;
    assistant.drain().await;

    assert_eq!(
        speaker.lines(),
        vec![ACK_WEATHER.to_string(), ACK_WEATHER.to_string()]
    );
}
