use scout_common::error::{ResolutionError, SessionError};
use scout_engine::assertions::AssertionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    // ============================================================
    // Lookup Errors
    // ============================================================
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("Timed out after {timeout_ms}ms waiting for {target}")]
    Timeout { target: String, timeout_ms: u64 },

    #[error("{0} not found")]
    NotFound(String),

    // ============================================================
    // Interaction Errors
    // ============================================================
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Assertion(#[from] AssertionError),

    #[error("Verification failed: {0}")]
    Verification(String),
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Step '{step}' failed: {source}")]
    Step {
        step: String,
        #[source]
        source: PageError,
    },

    #[error("Check failed: {0}")]
    Check(String),
}

impl ScenarioError {
    /// `map_err` adapter naming the step that failed.
    pub fn step<E: Into<PageError>>(step: impl Into<String>) -> impl FnOnce(E) -> ScenarioError {
        let step = step.into();
        move |source| ScenarioError::Step {
            step,
            source: source.into(),
        }
    }
}
