//! Shared HTTP agent for outbound tool calls.
//!
//! Every network-calling tool goes through one agent carrying the same
//! fixed short timeout, so a stalled endpoint cannot hold a voice turn's
//! background work open indefinitely.

use std::time::Duration;

/// Bound applied to connect, read, and write on every outbound request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the shared agent with the standard timeout policy
pub fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(REQUEST_TIMEOUT)
        .timeout_read(REQUEST_TIMEOUT)
        .timeout_write(REQUEST_TIMEOUT)
        .build()
}
