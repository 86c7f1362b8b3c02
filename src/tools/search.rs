//! Web search tool.
//!
//! The search action is a browser launch: the query is URL-encoded onto a
//! fixed search-engine URL and handed to the platform opener.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};
use url::Url;

use super::{Tool, ToolContext, wrong_arguments};
use crate::domain::{ToolId, ToolInvocation};

/// Search engine the query is appended to
pub const SEARCH_ENGINE_URL: &str = "https://duckduckgo.com/";

/// Seam to the default-browser launch
pub trait BrowserOpener: Send + Sync {
    /// Open `url` in the user's default browser, detached
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Opener using the per-platform shell command
pub struct PlatformBrowser;

impl BrowserOpener for PlatformBrowser {
    #[allow(unreachable_code)]
    fn open(&self, url: &str) -> std::io::Result<()> {
        #[cfg(target_os = "macos")]
        {
            return std::process::Command::new("open").arg(url).spawn().map(|_| ());
        }

        #[cfg(target_os = "linux")]
        {
            return std::process::Command::new("xdg-open")
                .arg(url)
                .spawn()
                .map(|_| ());
        }

        #[cfg(target_os = "windows")]
        {
            return std::process::Command::new("cmd")
                .args(["/C", "start", "", url])
                .spawn()
                .map(|_| ());
        }

        let _ = url;
        Err(std::io::Error::other("no browser opener for this platform"))
    }
}

/// Tool that runs a web search by launching the browser
pub struct SearchWeb {
    browser: Arc<dyn BrowserOpener>,
}

impl SearchWeb {
    pub fn new(browser: Arc<dyn BrowserOpener>) -> Self {
        Self { browser }
    }

    fn search(&self, query: &str) -> String {
        let url = match Url::parse_with_params(SEARCH_ENGINE_URL, [("q", query)]) {
            Ok(url) => url,
            Err(err) => {
                error!(query, error = %err, "failed to build search url");
                return format!("An error occurred while searching the web for '{query}'.");
            }
        };

        match self.browser.open(url.as_str()) {
            Ok(()) => {
                info!(query, url = %url, "search opened in browser");
                format!("Searching the web for '{query}'.")
            }
            Err(err) => {
                error!(query, error = %err, "failed to open browser");
                format!("An error occurred while searching the web for '{query}'.")
            }
        }
    }
}

#[async_trait]
impl Tool for SearchWeb {
    fn id(&self) -> ToolId {
        ToolId::SearchWeb
    }

    async fn call(&self, invocation: ToolInvocation, _cx: &ToolContext) -> String {
        match invocation {
            ToolInvocation::SearchWeb { query } => self.search(&query),
            _ => wrong_arguments(self.id()),
        }
    }
}
