//! Locator Resolver
//!
//! Walks a [`LocatorChain`] in order and returns the first strategy that finds
//! an element. A strategy whose lookup fails is recorded and skipped; the chain
//! is never aborted by a single bad strategy.

use super::chain::LocatorChain;
use super::result::{Attempt, AttemptOutcome, Exhausted, ResolutionResult, Resolved};
use super::snapshot::ElementSnapshot;
use crate::session::Session;
use scout_common::locator::LocatorStrategy;
use tracing::{debug, warn};

pub struct Resolver<'a, S: Session + ?Sized> {
    session: &'a mut S,
}

impl<'a, S: Session + ?Sized> Resolver<'a, S> {
    pub fn new(session: &'a mut S) -> Self {
        Self { session }
    }

    /// Access the underlying session, e.g. to interact with a resolved handle.
    pub fn session(&mut self) -> &mut S {
        &mut *self.session
    }

    /// Resolve `chain` against the current UI state.
    pub async fn resolve(&mut self, chain: &LocatorChain) -> ResolutionResult {
        let mut attempts = Vec::with_capacity(chain.len());

        for strategy in chain {
            match self.session.find_elements(strategy).await {
                Ok(handles) => match handles.into_iter().next() {
                    Some(handle) => {
                        debug!(target_chain = %chain, %strategy, element = %handle, "resolved");
                        return ResolutionResult::Found(Resolved {
                            handle,
                            strategy: strategy.clone(),
                        });
                    }
                    None => {
                        debug!(%strategy, "no match");
                        attempts.push(Attempt {
                            strategy: strategy.clone(),
                            outcome: AttemptOutcome::NoMatch,
                        });
                    }
                },
                Err(e) if e.is_missing() => {
                    debug!(%strategy, "no match ({})", e);
                    attempts.push(Attempt {
                        strategy: strategy.clone(),
                        outcome: AttemptOutcome::NoMatch,
                    });
                }
                Err(e) => {
                    warn!(%strategy, "strategy failed, trying next: {}", e);
                    attempts.push(Attempt {
                        strategy: strategy.clone(),
                        outcome: AttemptOutcome::Failed(e.to_string()),
                    });
                }
            }
        }

        debug!(target_chain = %chain, tried = attempts.len(), "not found");
        ResolutionResult::NotFound(Exhausted { attempts })
    }

    /// Collect every element matching `strategy` right now.
    ///
    /// A failing lookup yields an empty snapshot.
    pub async fn resolve_all(&mut self, strategy: &LocatorStrategy) -> ElementSnapshot {
        let handles = match self.session.find_elements(strategy).await {
            Ok(handles) => handles,
            Err(e) => {
                if !e.is_missing() {
                    warn!(%strategy, "bulk lookup failed: {}", e);
                }
                Vec::new()
            }
        };
        debug!(%strategy, count = handles.len(), "collected snapshot");
        ElementSnapshot::new(strategy.clone(), handles)
    }

    pub async fn is_present(&mut self, chain: &LocatorChain) -> bool {
        self.resolve(chain).await.is_found()
    }
}
