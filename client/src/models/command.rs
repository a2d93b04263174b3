//! Remote command models

use std::fmt;

use serde::{Deserialize, Serialize};

/// Request body of `/api/command`
#[derive(Debug, Clone, Serialize)]
pub struct CommandRequest {
    pub command: String,
    pub dir: String,
}

/// Captured result of a remote command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommandResult {
    /// Standard output
    #[serde(default)]
    pub output: Option<String>,

    /// Standard error
    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub exit_code: i32,
}

impl CommandResult {
    /// Standard output with trailing whitespace removed, empty when absent
    pub fn trimmed_output(&self) -> &str {
        self.output.as_deref().unwrap_or_default().trim_end()
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\r\n{}\r\nExitCode: {}",
            self.output.as_deref().unwrap_or_default(),
            self.error.as_deref().unwrap_or_default(),
            self.exit_code
        )
    }
}
