use scout_common::error::ResolutionError;
use scout_common::locator::LocatorStrategy;
use scout_common::protocol::ElementHandle;

/// Element found by a chain, with the strategy that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub handle: ElementHandle,
    pub strategy: LocatorStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The strategy ran and matched nothing.
    NoMatch,
    /// The lookup itself failed; the message is kept for diagnostics.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub strategy: LocatorStrategy,
    pub outcome: AttemptOutcome,
}

impl Attempt {
    fn describe(&self) -> String {
        match &self.outcome {
            AttemptOutcome::NoMatch => self.strategy.to_string(),
            AttemptOutcome::Failed(msg) => format!("{} (failed: {})", self.strategy, msg),
        }
    }
}

/// Every strategy of a chain was tried without a match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exhausted {
    pub attempts: Vec<Attempt>,
}

impl Exhausted {
    /// Every lookup failed, so the chain says nothing about the element.
    /// An empty chain is conclusive: there is nothing to find.
    pub fn is_inconclusive(&self) -> bool {
        !self.attempts.is_empty()
            && self
                .attempts
                .iter()
                .all(|a| matches!(a.outcome, AttemptOutcome::Failed(_)))
    }
}

/// Outcome of resolving a chain. `NotFound` is an ordinary value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    Found(Resolved),
    NotFound(Exhausted),
}

impl ResolutionResult {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn found(&self) -> Option<&Resolved> {
        match self {
            Self::Found(r) => Some(r),
            Self::NotFound(_) => None,
        }
    }

    pub fn into_found(self) -> Option<Resolved> {
        match self {
            Self::Found(r) => Some(r),
            Self::NotFound(_) => None,
        }
    }

    pub fn handle(&self) -> Option<&ElementHandle> {
        self.found().map(|r| &r.handle)
    }

    pub fn strategy_used(&self) -> Option<&LocatorStrategy> {
        self.found().map(|r| &r.strategy)
    }

    /// Turn `NotFound` into a hard failure naming `target` and every strategy
    /// that was attempted.
    pub fn require(self, target: impl Into<String>) -> Result<Resolved, ResolutionError> {
        match self {
            Self::Found(r) => Ok(r),
            Self::NotFound(exhausted) => {
                let reason = if exhausted.attempts.is_empty() {
                    "locator chain is empty".to_string()
                } else {
                    "element not found with any locator strategy".to_string()
                };
                Err(ResolutionError {
                    target: target.into(),
                    reason,
                    attempted: exhausted.attempts.iter().map(Attempt::describe).collect(),
                })
            }
        }
    }
}
