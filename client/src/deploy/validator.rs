//! Post-deployment validation

use tracing::{debug, info, warn};

use crate::deploy::fsm::{ValidationEvent, ValidationFsm, ValidationState};
use crate::errors::KuduError;
use crate::http::client::KuduClient;
use crate::models::command::CommandResult;

/// Remote shell the validation command runs in
pub const VALIDATION_SHELL: &str = "powershell";

/// Remote working directory of the validation command
pub const VALIDATION_DIRECTORY: &str = "site";

/// Fetches a just-deployed marker through the site's own host name and
/// compares it with the expected value
pub struct PostDeployValidator<'a> {
    client: &'a KuduClient,
    fsm: ValidationFsm,
}

impl<'a> PostDeployValidator<'a> {
    pub fn new(client: &'a KuduClient) -> Self {
        Self {
            client,
            fsm: ValidationFsm::new(),
        }
    }

    /// Get the current validation state
    pub fn state(&self) -> &ValidationState {
        self.fsm.state()
    }

    /// Mark validation as disabled
    pub fn skip(&mut self) -> Result<(), KuduError> {
        info!("Skipping post deployment validation");
        self.fsm
            .process(ValidationEvent::Skip)
            .map_err(KuduError::Internal)
    }

    /// Fetch `relative_url` from the site and require it to equal `expected`
    pub async fn validate(
        &mut self,
        relative_url: &str,
        expected: &str,
    ) -> Result<CommandResult, KuduError> {
        self.fsm
            .process(ValidationEvent::Start)
            .map_err(KuduError::Internal)?;

        info!("Validating deployment through {}", relative_url);
        let result = self
            .client
            .execute_command(
                VALIDATION_SHELL,
                VALIDATION_DIRECTORY,
                Some(&validation_arguments(relative_url)),
            )
            .await?;

        debug!(
            "Output:\r\n{}\r\nError:\r\n{}\r\nExitCode: {}",
            result.output.as_deref().unwrap_or_default(),
            result.error.as_deref().unwrap_or_default(),
            result.exit_code
        );
        if !result.succeeded() {
            warn!("Validation command exited with code {}", result.exit_code);
        }

        match compare(expected, &result) {
            Ok(()) => {
                self.fsm
                    .process(ValidationEvent::Matched)
                    .map_err(KuduError::Internal)?;
                info!("Deployment validated");
                Ok(result)
            }
            Err(e) => {
                self.fsm
                    .process(ValidationEvent::Mismatched(e.to_string()))
                    .map_err(KuduError::Internal)?;
                Err(e)
            }
        }
    }
}

/// Arguments making the remote shell fetch `relative_url` from the site
pub fn validation_arguments(relative_url: &str) -> String {
    format!(
        "-Command \"$ProgressPreference = 'SilentlyContinue';Invoke-RestMethod https://%WEBSITE_HOSTNAME%/{};exit $LastExitCode\"",
        relative_url.trim_start_matches('/')
    )
}

/// Exact match of `expected` against stdout without trailing whitespace
pub fn compare(expected: &str, result: &CommandResult) -> Result<(), KuduError> {
    let actual = result.trimmed_output();
    if actual != expected {
        return Err(KuduError::ValidationMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
            exit_code: result.exit_code,
        });
    }
    Ok(())
}
