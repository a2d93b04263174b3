//! Remote command execution

use tracing::debug;

use crate::errors::{ensure_not_blank, KuduError};
use crate::http::client::KuduClient;
use crate::models::command::{CommandRequest, CommandResult};

/// Command endpoint
pub const COMMAND_PATH: &str = "/api/command";

impl KuduClient {
    /// Run `command` in the remote `directory` (e.g. `site`) and capture
    /// its output
    ///
    /// The command is quoted and `arguments` are appended verbatim. A
    /// non-zero exit code is returned in the result, not raised.
    pub async fn execute_command(
        &self,
        command: &str,
        directory: &str,
        arguments: Option<&str>,
    ) -> Result<CommandResult, KuduError> {
        ensure_not_blank(command, "command")?;
        ensure_not_blank(directory, "directory")?;

        let request = CommandRequest {
            command: render_command(command, arguments),
            dir: directory.to_string(),
        };
        debug!("Executing command in {}: {}", request.dir, request.command);

        self.post_json(COMMAND_PATH, &request).await
    }
}

fn render_command(command: &str, arguments: Option<&str>) -> String {
    let quoted = format!("\"{}\"", command.trim_matches('"'));
    match arguments.map(str::trim).filter(|a| !a.is_empty()) {
        Some(arguments) => format!("{quoted} {arguments}"),
        None => quoted,
    }
}
