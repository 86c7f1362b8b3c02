//! Adjutant - voice-command personal assistant core.
//!
//! Adjutant receives transcribed voice commands from a hosting audio
//! session, classifies each one by keyword matching against an ordered
//! rule table, and dispatches the matched command to a named async tool:
//! open a local application, fetch weather, search the web, send an
//! email, schedule a calendar event, or greet the user. The spoken
//! acknowledgment goes out before the tool runs; tool results are logged.
//!
//! ## Structure
//!
//! - **interpreter**: ordered first-match-wins keyword rules plus the
//!   per-family argument extraction
//! - **tools**: the registry of async tools and their transport seams
//! - **session**: the turn boundary between the hosting transport and the
//!   core, including the CLI REPL host
//!
//! Matching is deliberately shallow - lower-cased substring checks, no
//! intent scoring - and every tool converts its failures into a
//! human-readable result string rather than raising.

pub mod config;
pub mod domain;
pub mod http;
pub mod interpreter;
pub mod session;
pub mod tools;

pub use domain::*;
