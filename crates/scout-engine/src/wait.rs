//! Wait Engine
//!
//! Cooperative polling on top of the [`Resolver`]: every poll re-resolves its
//! target from scratch (handles go stale), evaluates the condition, and either
//! returns or sleeps until the next tick. Timing out is an ordinary outcome.
//!
//! Dropping a wait future stops polling at the next tick; nothing is spawned.

use crate::resolution::{LocatorChain, ResolutionResult, Resolver};
use crate::session::Session;
use scout_common::protocol::ElementHandle;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Default wait timeout (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl WaitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout = Duration::from_millis(timeout_ms);
        self
    }

    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval = Duration::from_millis(poll_interval_ms);
        self
    }
}

/// What "gone" means for a [`WaitCondition::Gone`] wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoneMode {
    /// The element no longer exists in the tree.
    #[default]
    Detached,
    /// The element does not exist, or exists but is not displayed.
    Hidden,
}

/// Future returned by a predicate for one poll.
pub type PredicateFuture<'s> = Pin<Box<dyn Future<Output = bool> + Send + 's>>;

pub enum WaitCondition<'p, S: ?Sized> {
    Visible,
    Clickable,
    Gone(GoneMode),
    /// Caller-supplied check against the session; the target is not
    /// resolved for predicate waits.
    Predicate(Box<dyn for<'s> FnMut(&'s mut S) -> PredicateFuture<'s> + Send + 'p>),
}

impl<'p, S: ?Sized> WaitCondition<'p, S> {
    pub fn predicate<F>(f: F) -> Self
    where
        F: for<'s> FnMut(&'s mut S) -> PredicateFuture<'s> + Send + 'p,
    {
        Self::Predicate(Box::new(f))
    }
}

impl<S: ?Sized> fmt::Debug for WaitCondition<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visible => f.write_str("Visible"),
            Self::Clickable => f.write_str("Clickable"),
            Self::Gone(mode) => write!(f, "Gone({:?})", mode),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Satisfied,
    TimedOut,
}

impl WaitOutcome {
    pub fn is_satisfied(self) -> bool {
        self == WaitOutcome::Satisfied
    }
}

/// What a wait re-evaluates on every poll.
#[derive(Debug, Clone, Copy)]
pub enum WaitTarget<'t> {
    /// Re-resolve the chain each poll.
    Chain(&'t LocatorChain),
    /// Re-query a handle; a stale handle counts as absent.
    Handle(&'t ElementHandle),
    /// No element; only predicate conditions can hold.
    Session,
}

impl<'t> From<&'t LocatorChain> for WaitTarget<'t> {
    fn from(chain: &'t LocatorChain) -> Self {
        WaitTarget::Chain(chain)
    }
}

impl<'t> From<&'t ElementHandle> for WaitTarget<'t> {
    fn from(handle: &'t ElementHandle) -> Self {
        WaitTarget::Handle(handle)
    }
}

impl fmt::Display for WaitTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitTarget::Chain(chain) => write!(f, "{}", chain),
            WaitTarget::Handle(handle) => write!(f, "element {}", handle),
            WaitTarget::Session => f.write_str("session"),
        }
    }
}

/// State of the target observed by one poll.
enum Observed {
    Absent,
    Present(ElementHandle),
    /// The session could not answer; no condition is considered satisfied.
    Unknown,
}

/// Deadline bookkeeping shared by every polling loop.
struct Ticker {
    started: Instant,
    options: WaitOptions,
    polls: u32,
}

impl Ticker {
    fn start(options: WaitOptions) -> Self {
        Self {
            started: Instant::now(),
            options,
            polls: 0,
        }
    }

    fn expired(&self) -> bool {
        self.started.elapsed() >= self.options.timeout
    }

    /// Sleep one interval, never past the deadline.
    async fn tick(&mut self) {
        let remaining = self.options.timeout.saturating_sub(self.started.elapsed());
        let interval = self.options.poll_interval.max(Duration::from_millis(1));
        tokio::time::sleep(interval.min(remaining)).await;
    }
}

pub struct WaitEngine<'a, S: Session + ?Sized> {
    resolver: Resolver<'a, S>,
    defaults: WaitOptions,
}

impl<'a, S: Session + ?Sized> WaitEngine<'a, S> {
    pub fn new(session: &'a mut S) -> Self {
        Self::with_defaults(session, WaitOptions::default())
    }

    pub fn with_defaults(session: &'a mut S, defaults: WaitOptions) -> Self {
        Self {
            resolver: Resolver::new(session),
            defaults,
        }
    }

    pub fn defaults(&self) -> WaitOptions {
        self.defaults
    }

    pub fn resolver(&mut self) -> &mut Resolver<'a, S> {
        &mut self.resolver
    }

    /// Poll `target` until `condition` holds or the timeout elapses.
    ///
    /// `options` overrides the engine defaults for this call only.
    pub async fn wait_for(
        &mut self,
        target: WaitTarget<'_>,
        mut condition: WaitCondition<'_, S>,
        options: Option<WaitOptions>,
    ) -> WaitOutcome {
        let mut ticker = Ticker::start(options.unwrap_or(self.defaults));
        loop {
            ticker.polls += 1;
            if self.evaluate(target, &mut condition).await {
                debug!(%target, ?condition, polls = ticker.polls, "wait satisfied");
                return WaitOutcome::Satisfied;
            }
            if ticker.expired() {
                debug!(%target, ?condition, polls = ticker.polls, "wait timed out");
                return WaitOutcome::TimedOut;
            }
            ticker.tick().await;
        }
    }

    pub async fn wait_visible(
        &mut self,
        chain: &LocatorChain,
        options: Option<WaitOptions>,
    ) -> WaitOutcome {
        self.wait_for(chain.into(), WaitCondition::Visible, options)
            .await
    }

    pub async fn wait_clickable(
        &mut self,
        chain: &LocatorChain,
        options: Option<WaitOptions>,
    ) -> WaitOutcome {
        self.wait_for(chain.into(), WaitCondition::Clickable, options)
            .await
    }

    /// Poll `predicate` against the session until it returns true.
    pub async fn wait_until<F>(
        &mut self,
        predicate: F,
        options: Option<WaitOptions>,
    ) -> WaitOutcome
    where
        F: for<'s> FnMut(&'s mut S) -> PredicateFuture<'s> + Send,
    {
        self.wait_for(WaitTarget::Session, WaitCondition::predicate(predicate), options)
            .await
    }

    /// Wait for `target` to disappear. The caller picks what "gone" means.
    pub async fn wait_gone(
        &mut self,
        target: WaitTarget<'_>,
        mode: GoneMode,
        options: Option<WaitOptions>,
    ) -> WaitOutcome {
        self.wait_for(target, WaitCondition::Gone(mode), options)
            .await
    }

    async fn evaluate(
        &mut self,
        target: WaitTarget<'_>,
        condition: &mut WaitCondition<'_, S>,
    ) -> bool {
        if let WaitCondition::Predicate(predicate) = condition {
            return predicate(self.resolver.session()).await;
        }

        let element = match self.observe(target).await {
            Observed::Unknown => return false,
            Observed::Absent => {
                return matches!(condition, WaitCondition::Gone(_));
            }
            Observed::Present(element) => element,
        };

        let session = self.resolver.session();
        match condition {
            WaitCondition::Gone(GoneMode::Detached) => false,
            WaitCondition::Gone(GoneMode::Hidden) => match session.is_displayed(&element).await {
                Ok(displayed) => !displayed,
                Err(e) => e.is_missing(),
            },
            WaitCondition::Visible => session.is_displayed(&element).await.unwrap_or(false),
            WaitCondition::Clickable => {
                session.is_displayed(&element).await.unwrap_or(false)
                    && session.is_enabled(&element).await.unwrap_or(false)
            }
            WaitCondition::Predicate(_) => false,
        }
    }

    async fn observe(&mut self, target: WaitTarget<'_>) -> Observed {
        match target {
            WaitTarget::Chain(chain) => match self.resolver.resolve(chain).await {
                ResolutionResult::Found(resolved) => Observed::Present(resolved.handle),
                ResolutionResult::NotFound(exhausted) if exhausted.is_inconclusive() => {
                    debug!(%chain, "every lookup failed");
                    Observed::Unknown
                }
                ResolutionResult::NotFound(_) => Observed::Absent,
            },
            WaitTarget::Handle(handle) => {
                // Any element query doubles as an existence check.
                match self.resolver.session().is_displayed(handle).await {
                    Ok(_) => Observed::Present(handle.clone()),
                    Err(e) if e.is_missing() => Observed::Absent,
                    Err(e) => {
                        debug!(element = %handle, "existence check failed: {}", e);
                        Observed::Unknown
                    }
                }
            }
            WaitTarget::Session => Observed::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeElement, FakeSession, Mutation};
    use scout_common::error::SessionError;
    use scout_common::locator::LocatorStrategy;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    const POLL: Duration = Duration::from_millis(500);

    fn opts(timeout_ms: u64) -> Option<WaitOptions> {
        Some(WaitOptions::new().with_timeout_ms(timeout_ms))
    }

    fn button_chain() -> LocatorChain {
        LocatorChain::named("button 0")
            .or(LocatorStrategy::resource_id("io.appium.android.apis:id/button0"))
            .or(LocatorStrategy::text("0"))
    }

    #[tokio::test(start_paused = true)]
    async fn visible_satisfied_within_one_poll_of_appearing() {
        let mut session = FakeSession::new();
        let appears_at = Duration::from_millis(1_200);
        session.at(
            appears_at,
            Mutation::AddKeyed("button0".into(), FakeElement::button("0")),
        );

        let started = Instant::now();
        let outcome = WaitEngine::new(&mut session)
            .wait_visible(&button_chain(), opts(5_000))
            .await;
        let elapsed = started.elapsed();

        assert_eq!(outcome, WaitOutcome::Satisfied);
        assert!(elapsed >= appears_at);
        assert!(elapsed < appears_at + POLL, "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn never_visible_times_out_at_deadline() {
        let mut session = FakeSession::new();
        session.add(FakeElement::button("0").hidden());

        let started = Instant::now();
        let outcome = WaitEngine::new(&mut session)
            .wait_visible(&button_chain(), opts(2_000))
            .await;
        let elapsed = started.elapsed();

        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert!(elapsed >= Duration::from_millis(2_000));
        assert!(elapsed < Duration::from_millis(2_000) + POLL);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_not_multiple_of_interval() {
        let mut session = FakeSession::new();
        let started = Instant::now();
        let outcome = WaitEngine::new(&mut session)
            .wait_visible(&button_chain(), opts(1_300))
            .await;
        let elapsed = started.elapsed();

        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert!(elapsed >= Duration::from_millis(1_300));
        assert!(elapsed < Duration::from_millis(1_800));
    }

    #[tokio::test(start_paused = true)]
    async fn gone_on_absent_element_is_immediate() {
        let mut session = FakeSession::new();
        let started = Instant::now();
        let outcome = WaitEngine::new(&mut session)
            .wait_gone((&button_chain()).into(), GoneMode::Detached, opts(10_000))
            .await;
        assert_eq!(outcome, WaitOutcome::Satisfied);
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(session.find_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn gone_modes_differ_for_hidden_element() {
        let mut session = FakeSession::new();
        session.add(FakeElement::button("0").hidden());
        let chain = button_chain();

        let detached = WaitEngine::new(&mut session)
            .wait_gone((&chain).into(), GoneMode::Detached, opts(1_000))
            .await;
        assert_eq!(detached, WaitOutcome::TimedOut);

        let hidden = WaitEngine::new(&mut session)
            .wait_gone((&chain).into(), GoneMode::Hidden, opts(1_000))
            .await;
        assert_eq!(hidden, WaitOutcome::Satisfied);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_handle_counts_as_gone() {
        let mut session = FakeSession::new();
        let handle = session.add(FakeElement::button("2"));
        session.at(Duration::from_millis(700), Mutation::Remove(handle.clone()));

        let outcome = WaitEngine::new(&mut session)
            .wait_gone((&handle).into(), GoneMode::Detached, opts(3_000))
            .await;
        assert_eq!(outcome, WaitOutcome::Satisfied);
    }

    #[tokio::test(start_paused = true)]
    async fn clickable_requires_enabled() {
        let mut session = FakeSession::new();
        let delete = session.add_keyed("delete", FakeElement::button("Delete").disabled());
        session.at(Duration::from_millis(1_000), Mutation::SetEnabled(delete, true));
        let chain = LocatorChain::from(LocatorStrategy::text("Delete"));

        let mut engine = WaitEngine::new(&mut session);
        assert_eq!(
            engine.wait_clickable(&chain, opts(500)).await,
            WaitOutcome::TimedOut
        );
        assert_eq!(
            engine.wait_clickable(&chain, opts(2_000)).await,
            WaitOutcome::Satisfied
        );
    }

    #[tokio::test(start_paused = true)]
    async fn session_errors_never_escape_a_wait() {
        let mut session = FakeSession::new();
        let strategy = LocatorStrategy::text("0");
        session.add(FakeElement::button("0"));
        session.fail_strategy(strategy.clone(), SessionError::NotReady);

        let outcome = WaitEngine::new(&mut session)
            .wait_visible(&LocatorChain::from(strategy), opts(1_000))
            .await;
        assert_eq!(outcome, WaitOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn gone_on_failing_chain_times_out() {
        let mut session = FakeSession::new();
        let strategy = LocatorStrategy::text("0");
        session.add(FakeElement::button("0"));
        session.fail_strategy(
            strategy.clone(),
            SessionError::Command {
                command: "find_elements".into(),
                message: "socket hang up".into(),
            },
        );

        let outcome = WaitEngine::new(&mut session)
            .wait_gone(
                (&LocatorChain::from(strategy)).into(),
                GoneMode::Detached,
                opts(2_000),
            )
            .await;
        assert_eq!(outcome, WaitOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn predicate_queries_the_session_until_true() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut session = FakeSession::new();
        session.at(
            Duration::from_millis(1_200),
            Mutation::Add(FakeElement::text_view("Ready")),
        );

        let outcome = WaitEngine::new(&mut session)
            .wait_for(
                (&button_chain()).into(),
                WaitCondition::predicate(move |s: &mut FakeSession| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Box::pin(async move {
                        s.page_source()
                            .await
                            .map(|source| source.contains("text=\"Ready\""))
                            .unwrap_or(false)
                    })
                }),
                opts(10_000),
            )
            .await;
        assert_eq!(outcome, WaitOutcome::Satisfied);
        // Polls at 0, 500, 1000 and 1500ms.
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(session.find_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn predicate_wait_honours_interval() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut session = FakeSession::new();
        let options = WaitOptions::new()
            .with_timeout_ms(1_000)
            .with_poll_interval_ms(100);

        let outcome = WaitEngine::new(&mut session)
            .wait_until(
                move |_: &mut FakeSession| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Box::pin(async { false })
                },
                Some(options),
            )
            .await;
        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert_eq!(calls.load(Ordering::SeqCst), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_wait_stops_polling() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut session = FakeSession::new();

        {
            let mut engine = WaitEngine::new(&mut session);
            let wait = engine.wait_until(
                move |_: &mut FakeSession| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Box::pin(async { false })
                },
                opts(60_000),
            );
            let aborted = tokio::time::timeout(Duration::from_millis(1_100), wait).await;
            assert!(aborted.is_err());
        }

        let seen = calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(calls.load(Ordering::SeqCst), seen);
    }
}
