//! Assertions on live elements.
//!
//! Each check reads the element once; use the wait engine first when the UI
//! is still settling. A caller-supplied message replaces the default one.

use crate::resolution::{LocatorChain, Resolver};
use crate::session::Session;
use scout_common::error::SessionError;
use scout_common::protocol::ElementHandle;
use std::fmt;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionKind {
    Displayed,
    Text,
    TextContains,
    Exists,
    Enabled,
}

impl fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssertionKind::Displayed => "displayed",
            AssertionKind::Text => "text",
            AssertionKind::TextContains => "text contains",
            AssertionKind::Exists => "exists",
            AssertionKind::Enabled => "enabled",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum AssertionError {
    #[error("Assertion failed ({kind}): {message}")]
    Failed { kind: AssertionKind, message: String },

    #[error("Assertion could not be evaluated: {0}")]
    Session(#[from] SessionError),
}

impl AssertionError {
    pub fn kind(&self) -> Option<AssertionKind> {
        match self {
            AssertionError::Failed { kind, .. } => Some(*kind),
            AssertionError::Session(_) => None,
        }
    }
}

fn fail(kind: AssertionKind, message: Option<&str>, default: impl FnOnce() -> String) -> AssertionError {
    AssertionError::Failed {
        kind,
        message: message.map(str::to_string).unwrap_or_else(default),
    }
}

/// Gone elements fail the assertion instead of surfacing a session error.
fn read<T>(
    result: Result<T, SessionError>,
    kind: AssertionKind,
    message: Option<&str>,
    element: &ElementHandle,
) -> Result<T, AssertionError> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_missing() => Err(fail(kind, message, || {
            format!("Element {} no longer exists", element)
        })),
        Err(e) => Err(e.into()),
    }
}

pub async fn assert_displayed<S: Session + ?Sized>(
    session: &mut S,
    element: &ElementHandle,
    message: Option<&str>,
) -> Result<(), AssertionError> {
    let kind = AssertionKind::Displayed;
    let displayed = read(session.is_displayed(element).await, kind, message, element)?;
    if !displayed {
        return Err(fail(kind, message, || "Element is not displayed".to_string()));
    }
    info!("Assert passed: Element is displayed");
    Ok(())
}

pub async fn assert_text<S: Session + ?Sized>(
    session: &mut S,
    element: &ElementHandle,
    expected: &str,
    message: Option<&str>,
) -> Result<(), AssertionError> {
    let kind = AssertionKind::Text;
    let actual = read(session.text(element).await, kind, message, element)?;
    if actual != expected {
        return Err(fail(kind, message, || {
            format!("Expected text \"{}\" but found \"{}\"", expected, actual)
        }));
    }
    info!("Assert passed: Text matches \"{}\"", expected);
    Ok(())
}

pub async fn assert_text_contains<S: Session + ?Sized>(
    session: &mut S,
    element: &ElementHandle,
    expected: &str,
    message: Option<&str>,
) -> Result<(), AssertionError> {
    let kind = AssertionKind::TextContains;
    let actual = read(session.text(element).await, kind, message, element)?;
    if !actual.contains(expected) {
        return Err(fail(kind, message, || {
            format!(
                "Expected text to contain \"{}\" but found \"{}\"",
                expected, actual
            )
        }));
    }
    info!("Assert passed: Text contains \"{}\"", expected);
    Ok(())
}

/// Passes when any strategy of `chain` currently finds an element.
pub async fn assert_exists<S: Session + ?Sized>(
    session: &mut S,
    chain: &LocatorChain,
    message: Option<&str>,
) -> Result<(), AssertionError> {
    if !Resolver::new(session).is_present(chain).await {
        return Err(fail(AssertionKind::Exists, message, || {
            format!("Element does not exist: {}", chain)
        }));
    }
    info!("Assert passed: Element exists");
    Ok(())
}

pub async fn assert_enabled<S: Session + ?Sized>(
    session: &mut S,
    element: &ElementHandle,
    message: Option<&str>,
) -> Result<(), AssertionError> {
    let kind = AssertionKind::Enabled;
    let enabled = read(session.is_enabled(element).await, kind, message, element)?;
    if !enabled {
        return Err(fail(kind, message, || "Element is not enabled".to_string()));
    }
    info!("Assert passed: Element is enabled");
    Ok(())
}
