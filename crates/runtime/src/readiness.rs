//! One-shot readiness of an asynchronously initialized capability.
//!
//! The rendering backend comes up asynchronously (adapter, device, surface).
//! Instead of polling shared state, the caller awaits a single future that
//! resolves to the capability handle, or to an error once a deadline passes.

use std::fmt::Display;
use std::future::Future;
use std::pin::pin;

use futures_util::future::{Either, select};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReadinessError {
    #[error("rendering capability did not become ready within {waited_ms} ms")]
    TimedOut { waited_ms: u32 },
    #[error("rendering capability failed to initialize: {0}")]
    Failed(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Readiness {
    pub timeout_ms: u32,
}

impl Default for Readiness {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

impl Readiness {
    pub fn with_timeout_ms(timeout_ms: u32) -> Self {
        Self { timeout_ms }
    }

    /// Races `init` against `deadline`.
    ///
    /// `deadline` must resolve after `self.timeout_ms`; it is supplied by the
    /// host so this stays independent of any particular timer. When both are
    /// ready on the same poll, `init` wins.
    pub async fn wait<T, E, F, D>(&self, init: F, deadline: D) -> Result<T, ReadinessError>
    where
        F: Future<Output = Result<T, E>>,
        D: Future<Output = ()>,
        E: Display,
    {
        let init = pin!(init);
        let deadline = pin!(deadline);

        match select(init, deadline).await {
            Either::Left((Ok(handle), _)) => Ok(handle),
            Either::Left((Err(err), _)) => {
                tracing::error!(error = %err, "capability initialization failed");
                Err(ReadinessError::Failed(err.to_string()))
            }
            Either::Right(((), _)) => {
                tracing::error!(timeout_ms = self.timeout_ms, "capability readiness timed out");
                Err(ReadinessError::TimedOut {
                    waited_ms: self.timeout_ms,
                })
            }
        }
    }
}
