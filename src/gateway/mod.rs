//! The external simulation engine and the policy used to call it.
//!
//! The engine is opaque: it takes the system document as JSON and answers
//! with a JSON result document. Calls are blocking; [`GatewayPolicy`] adds a
//! caller-supplied deadline and a single retry of transient failures.

mod command;

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::GatewayError;

pub use command::CommandGateway;

/// An external simulation engine.
pub trait SimulationGateway: Send + Sync {
    /// Runs the engine on a system document and returns its result document.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] describing why no result was produced.
    fn run(&self, document: &Value) -> Result<Value, GatewayError>;
}

/// Adapts a closure into a [`SimulationGateway`].
pub struct FnGateway<F>(pub F);

impl<F> SimulationGateway for FnGateway<F>
where
    F: Fn(&Value) -> Result<Value, GatewayError> + Send + Sync,
{
    fn run(&self, document: &Value) -> Result<Value, GatewayError> {
        (self.0)(document)
    }
}

/// Deadline and retry policy for one simulation run.
///
/// The deadline bounds how long the caller waits, not the call itself. A
/// timed-out attempt keeps running on its worker thread until the gateway
/// returns; a [`CommandGateway`] child process is not killed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayPolicy {
    /// Maximum wait per attempt; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Extra attempts after a transient failure.
    pub retries: u32,
}

impl Default for GatewayPolicy {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(300)),
            retries: 1,
        }
    }
}

/// Calls the gateway under `policy`.
///
/// Only [`GatewayError::Transient`] failures are retried. A timed-out call is
/// abandoned on its worker thread and reported as [`GatewayError::Timeout`].
///
/// # Errors
///
/// Returns the error of the last attempt.
pub fn call(
    gateway: &Arc<dyn SimulationGateway>,
    document: &Value,
    policy: &GatewayPolicy,
) -> Result<Value, GatewayError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        debug!(attempt, "calling simulation gateway");
        match call_once(gateway, document, policy.timeout) {
            Err(e) if e.is_transient() && attempt <= policy.retries => {
                warn!(attempt, error = %e, "transient gateway failure, retrying");
            }
            other => return other,
        }
    }
}

fn call_once(
    gateway: &Arc<dyn SimulationGateway>,
    document: &Value,
    timeout: Option<Duration>,
) -> Result<Value, GatewayError> {
    let Some(timeout) = timeout else {
        return gateway.run(document);
    };

    let (tx, rx) = mpsc::channel();
    let worker = Arc::clone(gateway);
    let document = document.clone();
    thread::Builder::new()
        .name("simulation-gateway".to_string())
        .spawn(move || {
            // The receiver is gone if the caller already timed out.
            let _ = tx.send(worker.run(&document));
        })
        .map_err(|e| GatewayError::Transient(format!("cannot start gateway worker: {e}")))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(GatewayError::Timeout(timeout)),
        Err(RecvTimeoutError::Disconnected) => Err(GatewayError::Failed(
            "gateway worker stopped without answering".to_string(),
        )),
    }
}
