//! Local application launcher tool.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use tracing::{error, info};

use super::{Tool, ToolContext, wrong_arguments};
use crate::domain::{ToolId, ToolInvocation};

/// Static name -> executable path table. Paths are expanded against the
/// environment before launch.
static APPS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("notepad", r"%WINDIR%\System32\notepad.exe"),
        ("calculator", r"%WINDIR%\System32\calc.exe"),
        (
            "chrome",
            r"%PROGRAMFILES%\Google\Chrome\Application\chrome.exe",
        ),
    ])
});

/// Seam to the OS process spawn
pub trait AppLauncher: Send + Sync {
    /// Start the executable at `path`, detached
    fn spawn(&self, path: &str) -> std::io::Result<()>;
}

/// Launcher that spawns a real local process
pub struct ProcessLauncher;

impl AppLauncher for ProcessLauncher {
    fn spawn(&self, path: &str) -> std::io::Result<()> {
        tokio::process::Command::new(path).spawn().map(|_| ())
    }
}

/// Tool that opens a local application by name
pub struct OpenApp {
    launcher: Arc<dyn AppLauncher>,
}

impl OpenApp {
    pub fn new(launcher: Arc<dyn AppLauncher>) -> Self {
        Self { launcher }
    }

    fn open(&self, app_name: &str) -> String {
        let Some(path) = APPS.get(app_name.to_lowercase().as_str()) else {
            return format!("App '{app_name}' not recognized.");
        };

        let expanded = expand_env_vars(path);
        match self.launcher.spawn(&expanded) {
            Ok(()) => {
                info!(app = app_name, "app opened");
                format!("{app_name} opened successfully!")
            }
            Err(err) => {
                error!(app = app_name, error = %err, "failed to open app");
                format!("Failed to open {app_name}: {err}")
            }
        }
    }
}

#[async_trait]
impl Tool for OpenApp {
    fn id(&self) -> ToolId {
        ToolId::OpenApp
    }

    async fn call(&self, invocation: ToolInvocation, _cx: &ToolContext) -> String {
        match invocation {
            ToolInvocation::OpenApp { app_name } => self.open(&app_name),
            _ => wrong_arguments(self.id()),
        }
    }
}

/// Expand `%VAR%`, `${VAR}` and `$VAR` references from the environment.
/// References to unset variables are left verbatim.
fn expand_env_vars(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('%') {
            if let Some(end) = after.find('%') {
                if let Ok(value) = std::env::var(&after[..end]) {
                    out.push_str(&value);
                    rest = &after[end + 1..];
                    continue;
                }
            }
            out.push('%');
            rest = after;
        } else if let Some(after) = rest.strip_prefix("${") {
            if let Some(end) = after.find('}') {
                if let Ok(value) = std::env::var(&after[..end]) {
                    out.push_str(&value);
                    rest = &after[end + 1..];
                    continue;
                }
            }
            out.push_str("${");
            rest = after;
        } else if let Some(after) = rest.strip_prefix('$') {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            if end > 0 {
                if let Ok(value) = std::env::var(&after[..end]) {
                    out.push_str(&value);
                    rest = &after[end..];
                    continue;
                }
            }
            out.push('$');
            rest = after;
        } else {
            let next = rest.find(['%', '$']).unwrap_or(rest.len());
            out.push_str(&rest[..next]);
            rest = &rest[next..];
        }
    }

    out
}
