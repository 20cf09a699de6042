//! Command execution inside containers

use crate::runtime::{ContainerRuntime, ExecSpec, RuntimeError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised by [`ExecutionBridge`]
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Command execution timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Options for a single execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOptions {
    pub working_dir: Option<String>,
    pub user: Option<String>,
    pub env: Option<Vec<String>>,
    /// Written to the process and then closed
    pub stdin: Option<String>,
    pub timeout_secs: u64,
}

impl ExecOptions {
    /// Options with only a deadline set
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            working_dir: None,
            user: None,
            env: None,
            stdin: None,
            timeout_secs,
        }
    }
}

/// Result of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub exit_code: i64,
}

impl ExecutionOutcome {
    pub fn stdout_text(&self) -> String {
        self.stdout.concat()
    }

    pub fn stderr_text(&self) -> String {
        self.stderr.concat()
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// Report text for the container the command ran in
    ///
    /// A stream block is only included when it has non-blank content.
    pub fn render(&self, container: &str) -> String {
        let mut text = format!(
            "Command executed in container {}\nExit code: {}\n\n",
            container, self.exit_code
        );

        let stdout = self.stdout_text();
        if !stdout.trim().is_empty() {
            text.push_str(&format!("STDOUT:\n{}\n", stdout));
        }

        let stderr = self.stderr_text();
        if !stderr.trim().is_empty() {
            text.push_str(&format!("\nSTDERR:\n{}\n", stderr));
        }

        text.trim().to_string()
    }
}

/// Split a command line with shell word rules
pub fn tokenize(command: &str) -> Result<Vec<String>, ExecError> {
    let argv = shell_words::split(command).map_err(|e| ExecError::InvalidCommand(e.to_string()))?;
    if argv.is_empty() {
        return Err(ExecError::InvalidCommand("Command is empty".to_string()));
    }
    Ok(argv)
}

/// Runs commands in containers under a hard deadline
#[derive(Clone)]
pub struct ExecutionBridge {
    runtime: Arc<dyn ContainerRuntime>,
}

impl ExecutionBridge {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }

    /// Tokenize `command` and run it
    pub async fn execute(
        &self,
        container: &str,
        command: &str,
        options: ExecOptions,
    ) -> Result<ExecutionOutcome, ExecError> {
        let argv = tokenize(command)?;
        self.execute_argv(container, argv, options).await
    }

    /// Run an already split command
    pub async fn execute_argv(
        &self,
        container: &str,
        argv: Vec<String>,
        options: ExecOptions,
    ) -> Result<ExecutionOutcome, ExecError> {
        if argv.is_empty() {
            return Err(ExecError::InvalidCommand("Command is empty".to_string()));
        }

        let seconds = options.timeout_secs;
        let spec = ExecSpec {
            cmd: argv,
            working_dir: options.working_dir,
            user: options.user,
            env: options.env,
            stdin: options.stdin,
        };

        debug!(container, program = %spec.cmd[0], timeout_secs = seconds, "Running command");
        let output = tokio::time::timeout(
            Duration::from_secs(seconds),
            self.runtime.exec(container, spec),
        )
        .await
        .map_err(|_| ExecError::Timeout { seconds })??;

        match output.exit_code {
            Some(exit_code) => Ok(ExecutionOutcome {
                stdout: output.stdout,
                stderr: output.stderr,
                exit_code,
            }),
            None => {
                warn!(container, "Command finished without an exit code");
                Err(ExecError::Timeout { seconds })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{ExecOutput, MockContainerRuntime};
    use mockall::predicate::eq;

    fn bridge(mock: MockContainerRuntime) -> ExecutionBridge {
        ExecutionBridge::new(Arc::new(mock))
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize(r#"sh -c "echo 'a b'""#).unwrap(),
            vec!["sh", "-c", "echo 'a b'"]
        );
        assert!(matches!(
            tokenize("echo \"unterminated"),
            Err(ExecError::InvalidCommand(_))
        ));
        assert!(matches!(tokenize("   "), Err(ExecError::InvalidCommand(_))));
    }

    #[test]
    fn test_render_omits_blank_streams() {
        let outcome = ExecutionOutcome {
            stdout: vec!["hello\n".into()],
            stderr: vec!["  \n".into()],
            exit_code: 0,
        };
        assert_eq!(
            outcome.render("web"),
            "Command executed in container web\nExit code: 0\n\nSTDOUT:\nhello"
        );

        let outcome = ExecutionOutcome {
            stdout: vec![],
            stderr: vec!["boom".into()],
            exit_code: 2,
        };
        assert_eq!(
            outcome.render("web"),
            "Command executed in container web\nExit code: 2\n\n\nSTDERR:\nboom"
        );
    }

    #[tokio::test]
    async fn test_streams_stay_separate() {
        let mut mock = MockContainerRuntime::new();
        mock.expect_exec()
            .withf(|id, spec| id == "web" && spec.cmd == ["sh", "-c", "echo out; echo err >&2"])
            .times(1)
            .returning(|_, _| {
                Ok(ExecOutput {
                    stdout: vec!["out".into()],
                    stderr: vec!["err".into()],
                    exit_code: Some(0),
                })
            });

        let outcome = bridge(mock)
            .execute("web", "sh -c 'echo out; echo err >&2'", ExecOptions::with_timeout(5))
            .await
            .unwrap();

        assert_eq!(outcome.stdout, vec!["out"]);
        assert_eq!(outcome.stderr, vec!["err"]);
        assert!(outcome.succeeded());
    }

    #[tokio::test]
    async fn test_missing_exit_code_is_timeout() {
        let mut mock = MockContainerRuntime::new();
        mock.expect_exec().returning(|_, _| Ok(ExecOutput::default()));

        let err = bridge(mock)
            .execute("web", "true", ExecOptions::with_timeout(3))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecError::Timeout { seconds: 3 }));
    }

    #[tokio::test]
    async fn test_runtime_errors_pass_through() {
        let mut mock = MockContainerRuntime::new();
        mock.expect_exec()
            .with(eq("ghost"), mockall::predicate::always())
            .returning(|_, _| Err(RuntimeError::NotFound("No such container: ghost".into())));

        let err = bridge(mock)
            .execute("ghost", "ls", ExecOptions::with_timeout(3))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecError::Runtime(RuntimeError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stdin_is_forwarded() {
        let mut mock = MockContainerRuntime::new();
        mock.expect_exec()
            .withf(|_, spec| spec.stdin.as_deref() == Some("data") && spec.user.as_deref() == Some("1000"))
            .returning(|_, _| {
                Ok(ExecOutput {
                    stdout: vec!["data".into()],
                    stderr: vec![],
                    exit_code: Some(0),
                })
            });

        let options = ExecOptions {
            user: Some("1000".into()),
            stdin: Some("data".into()),
            ..ExecOptions::with_timeout(3)
        };
        let outcome = bridge(mock).execute("web", "cat", options).await.unwrap();
        assert_eq!(outcome.stdout_text(), "data");
    }
}
