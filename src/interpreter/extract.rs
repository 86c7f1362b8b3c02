//! Argument extraction for matched command families.
//!
//! Extraction works on the already lower-cased utterance and is purely
//! positional: literal prefixes, infixes and marker tokens. The email
//! grammar assumes marker order `to < subject < message` and mis-slices
//! when a subject or body contains one of the marker words; that rigidity
//! is a known limitation of the command grammar and is kept as-is.

use thiserror::Error;

/// Why extraction failed for a recognized command
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("missing '{0}' marker")]
    MissingMarker(&'static str),

    #[error("no recipient after the 'to' marker")]
    MissingRecipient,

    #[error("no explicit duration; both ' in ' and ' minutes' are required")]
    MissingDuration,

    #[error("cannot parse a minute count from '{0}'")]
    BadMinutes(String),
}

/// Extracted email fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailArgs {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Extracted scheduling fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleArgs {
    pub title: String,
    pub minutes: i64,
}

/// Everything after the `"open "` prefix, recognized app or not
pub fn app_name(text: &str) -> String {
    text.strip_prefix("open ").unwrap_or(text).to_string()
}

/// The city named after a `"weather in "` infix, if any
pub fn weather_city(text: &str) -> Option<String> {
    const INFIX: &str = "weather in ";
    let start = text.find(INFIX)? + INFIX.len();
    let city = text[start..].trim();
    if city.is_empty() {
        None
    } else {
        Some(city.to_string())
    }
}

/// Everything after the `"search for"` keyword
pub fn search_query(text: &str) -> String {
    const KEYWORD: &str = "search for";
    match text.find(KEYWORD) {
        Some(start) => {
            let rest = &text[start + KEYWORD.len()..];
            rest.strip_prefix(' ').unwrap_or(rest).to_string()
        }
        None => String::new(),
    }
}

/// Tokenized marker scan for `to`/`subject`/`message`.
///
/// Tokens are produced by splitting on single spaces; the recipient is the
/// one token after `to`, the subject spans from after `subject` up to the
/// `message` marker, and the body is everything after `message`.
pub fn email(text: &str) -> Result<EmailArgs, ExtractError> {
    let parts: Vec<&str> = text.split(' ').collect();
    let position = |marker: &str| parts.iter().position(|part| *part == marker);

    let to_index = position("to").ok_or(ExtractError::MissingMarker("to"))? + 1;
    let subject_index = position("subject").ok_or(ExtractError::MissingMarker("subject"))? + 1;
    let message_index = position("message").ok_or(ExtractError::MissingMarker("message"))? + 1;

    let to = parts
        .get(to_index)
        .ok_or(ExtractError::MissingRecipient)?
        .to_string();
    let subject = parts
        .get(subject_index..message_index - 1)
        .unwrap_or(&[])
        .join(" ");
    let body = parts.get(message_index..).unwrap_or(&[]).join(" ");

    Ok(EmailArgs { to, subject, body })
}

/// Split on `" in "`: the left side minus the scheduling keywords is the
/// title, the right side up to `" minutes"` is the minute count.
pub fn schedule(text: &str) -> Result<ScheduleArgs, ExtractError> {
    if !(text.contains(" in ") && text.contains(" minutes")) {
        return Err(ExtractError::MissingDuration);
    }

    // Guarded by the contains check above
    let (left, right) = text.split_once(" in ").unwrap();

    let title = left
        .replace("schedule", "")
        .replace("remind me to", "")
        .trim()
        .to_string();

    let amount = right
        .split_once(" minutes")
        .map(|(amount, _)| amount)
        .unwrap_or(right)
        .trim();
    let minutes: i64 = amount
        .parse()
        .map_err(|_| ExtractError::BadMinutes(amount.to_string()))?;

    Ok(ScheduleArgs { title, minutes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_name_is_remainder_after_prefix() {
        assert_eq!(app_name("open notepad"), "notepad");
        assert_eq!(app_name("open some unknown tool"), "some unknown tool");
        // Two spaces survive; the utterance is not re-tokenized
        assert_eq!(app_name("open  notepad"), " notepad");
    }

    #[test]
    fn test_weather_city_after_infix() {
        assert_eq!(weather_city("weather in paris"), Some("paris".to_string()));
        assert_eq!(
            weather_city("what's the weather in new york"),
            Some("new york".to_string())
        );
    }

    #[test]
    fn test_weather_city_absent_without_infix() {
        assert_eq!(weather_city("what's the weather"), None);
        assert_eq!(weather_city("weather in "), None);
    }

    #[test]
    fn test_search_query_after_keyword() {
        assert_eq!(search_query("search for best pizza"), "best pizza");
        assert_eq!(
            search_query("please search for rust async traits"),
            "rust async traits"
        );
        assert_eq!(search_query("search for"), "");
    }

    #[test]
    fn test_email_extraction_in_marker_order() {
        let args = email("send email to bob subject hi message see you later").unwrap();
        assert_eq!(args.to, "bob");
        assert_eq!(args.subject, "hi");
        assert_eq!(args.body, "see you later");
    }

    #[test]
    fn test_email_multi_word_subject_and_body() {
        let args =
            email("send email to alice subject lunch plans message meet at noon tomorrow").unwrap();
        assert_eq!(args.to, "alice");
        assert_eq!(args.subject, "lunch plans");
        assert_eq!(args.body, "meet at noon tomorrow");
    }

    #[test]
    fn test_email_missing_marker_fails() {
        assert_eq!(
            email("send email to bob message hello"),
            Err(ExtractError::MissingMarker("subject"))
        );
        assert_eq!(
            email("send email subject hi message hello"),
            Err(ExtractError::MissingMarker("to"))
        );
        assert_eq!(
            email("send email to bob subject hi"),
            Err(ExtractError::MissingMarker("message"))
        );
    }

    #[test]
    fn test_email_missing_recipient_fails() {
        // "to" is the last token, so there is nothing after it
        assert_eq!(
            email("send email subject hi message hello to"),
            Err(ExtractError::MissingRecipient)
        );
    }

    #[test]
    fn test_email_markers_out_of_order_misslice() {
        // Known grammar limitation: markers are located by first position,
        // not validated for order, so a reversed command yields an empty
        // subject rather than an error.
        let args = email("send email to bob message hello subject hi").unwrap();
        assert_eq!(args.to, "bob");
        assert_eq!(args.subject, "");
        assert_eq!(args.body, "hello subject hi");
    }

    #[test]
    fn test_schedule_title_and_minutes() {
        let args = schedule("schedule meeting in 10 minutes").unwrap();
        assert_eq!(args.title, "meeting");
        assert_eq!(args.minutes, 10);
    }

    #[test]
    fn test_schedule_strips_remind_me_to() {
        let args = schedule("remind me to buy milk in 5 minutes").unwrap();
        assert_eq!(args.title, "buy milk");
        assert_eq!(args.minutes, 5);
    }

    #[test]
    fn test_schedule_without_duration_fails() {
        assert_eq!(
            schedule("schedule meeting tomorrow"),
            Err(ExtractError::MissingDuration)
        );
        assert_eq!(
            schedule("remind me to stretch"),
            Err(ExtractError::MissingDuration)
        );
    }

    #[test]
    fn test_schedule_non_numeric_minutes_fails() {
        assert_eq!(
            schedule("schedule standup in ten minutes"),
            Err(ExtractError::BadMinutes("ten".to_string()))
        );
    }

    #[test]
    fn test_schedule_trailing_words_after_minutes() {
        let args = schedule("schedule review in 15 minutes please").unwrap();
        assert_eq!(args.title, "review");
        assert_eq!(args.minutes, 15);
    }
}
