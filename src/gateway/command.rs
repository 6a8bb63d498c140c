use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use serde_json::Value;
use tracing::debug;

use super::SimulationGateway;
use crate::error::GatewayError;

/// Runs an external program as the simulation engine.
///
/// The system document is written to the program's stdin as JSON and the
/// result document is read from its stdout. The child runs until it exits;
/// a [`super::GatewayPolicy`] deadline does not terminate it.
#[derive(Debug, Clone)]
pub struct CommandGateway {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandGateway {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl SimulationGateway for CommandGateway {
    fn run(&self, document: &Value) -> Result<Value, GatewayError> {
        let input = serde_json::to_vec(document)
            .map_err(|e| GatewayError::Failed(format!("cannot encode document: {e}")))?;

        debug!(program = %self.program.display(), bytes = input.len(), "spawning simulation engine");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                GatewayError::Transient(format!(
                    "cannot start \"{}\": {e}",
                    self.program.display()
                ))
            })?;

        // stdin is fed from its own thread while stdout is drained here.
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || stdin.write_all(&input))
        });

        let output = child
            .wait_with_output()
            .map_err(|e| GatewayError::Transient(format!("engine did not finish: {e}")))?;

        let write_error = writer.and_then(|w| w.join().ok()).and_then(Result::err);
        if let Some(e) = write_error.filter(|_| output.status.success()) {
            return Err(GatewayError::Failed(format!("cannot send document: {e}")));
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GatewayError::Failed(format!(
                "engine exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| GatewayError::Unparseable(e.to_string()))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use serde_json::json;

    use super::*;

    fn sh(script: &str) -> CommandGateway {
        CommandGateway::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[test]
    fn echoes_through_cat() {
        let doc = json!({"components": {"grd1": {"type": "grid"}}});
        assert_eq!(CommandGateway::new("cat", Vec::new()).run(&doc), Ok(doc));
    }

    #[test]
    fn non_zero_exit_is_a_failure() {
        let out = sh("cat >/dev/null; echo boom >&2; exit 3").run(&json!({}));
        match out {
            Err(GatewayError::Failed(msg)) => assert!(msg.contains("boom"), "{msg}"),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn garbage_output_is_unparseable() {
        let out = sh("cat >/dev/null; echo not-json").run(&json!({}));
        assert!(matches!(out, Err(GatewayError::Unparseable(_))));
    }

    #[test]
    fn missing_program_is_transient() {
        let out = CommandGateway::new("/nonexistent/engine", Vec::new()).run(&json!({}));
        assert!(matches!(out, Err(GatewayError::Transient(_))));
    }
}
