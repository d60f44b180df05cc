use super::api_demos::TEXT_VIEW;
use super::base::{BasePage, menu_item};
use crate::error::PageError;
use regex::Regex;
use scout_common::locator::{LocatorStrategy, UiSelector};
use scout_engine::{LocatorChain, Session, WaitOptions};
use tracing::{debug, info, warn};

/// Number of numbered steps on the Accessibility Service screen.
pub const SERVICE_STEPS: usize = 8;

/// The Accessibility section menu.
pub struct AccessibilityPage<'a, S: Session + ?Sized> {
    base: BasePage<'a, S>,
}

impl<'a, S: Session + ?Sized> AccessibilityPage<'a, S> {
    pub fn new(session: &'a mut S, wait: WaitOptions) -> Self {
        Self {
            base: BasePage::new(session, wait),
        }
    }

    fn service_item() -> LocatorChain {
        menu_item("Accessibility Service")
    }

    fn custom_view_item() -> LocatorChain {
        LocatorChain::named("Custom View")
            .or(LocatorStrategy::accessibility_id("Custom View"))
            .or(UiSelector::new().text("Custom View"))
    }

    pub async fn navigate_to_accessibility(&mut self) -> Result<(), PageError> {
        info!("Step: Navigate to Accessibility menu");
        self.base.click(&menu_item("Accessibility")).await?;
        info!("Navigated to Accessibility menu");
        Ok(())
    }

    pub async fn navigate_to_accessibility_service(&mut self) -> Result<(), PageError> {
        info!("Step: Navigate to Accessibility Service");
        self.base.click(&Self::service_item()).await?;
        info!("Navigated to Accessibility Service");
        Ok(())
    }

    pub async fn navigate_to_custom_view(&mut self) -> Result<(), PageError> {
        info!("Step: Navigate to Custom View");
        self.base.click(&Self::custom_view_item()).await?;
        info!("Navigated to Custom View");
        Ok(())
    }

    pub async fn verify_accessibility_menu_displayed(&mut self) -> bool {
        self.base.is_displayed(&Self::service_item()).await
    }
}

/// The Accessibility Service screen: numbered setup instructions.
pub struct AccessibilityServicePage<'a, S: Session + ?Sized> {
    base: BasePage<'a, S>,
}

impl<'a, S: Session + ?Sized> AccessibilityServicePage<'a, S> {
    pub fn new(session: &'a mut S, wait: WaitOptions) -> Self {
        Self {
            base: BasePage::new(session, wait),
        }
    }

    pub async fn verify_step_present(&mut self, step: usize) -> Result<bool, PageError> {
        let source = self.base.session().page_source().await?;
        Ok(step_present(&source, step))
    }

    /// Wait until the page source shows step `step`.
    pub async fn wait_for_step(&mut self, step: usize) -> bool {
        let Some(marker) = step_marker(step) else {
            return false;
        };
        self.base
            .waits()
            .wait_until(
                move |session: &mut S| {
                    let marker = marker.clone();
                    Box::pin(async move {
                        session
                            .page_source()
                            .await
                            .map(|source| marker.is_match(&source))
                            .unwrap_or(false)
                    })
                },
                None,
            )
            .await
            .is_satisfied()
    }

    /// Presence of steps `1..=total`, in order, once the last step has
    /// rendered or the wait has run out.
    pub async fn verify_all_steps(&mut self, total: usize) -> Result<Vec<bool>, PageError> {
        info!("Verifying {} steps in Accessibility Service", total);
        if !self.wait_for_step(total).await {
            warn!("Step {} did not appear, checking what is on screen", total);
        }
        let source = self.base.session().page_source().await?;
        let results: Vec<bool> = (1..=total)
            .map(|step| {
                let present = step_present(&source, step);
                info!(
                    "  Step {}: {}",
                    step,
                    if present { "Found" } else { "Not found" }
                );
                present
            })
            .collect();
        Ok(results)
    }

    /// Text following each "N. " marker in the page source, for every step
    /// that has one.
    pub async fn step_texts(&mut self) -> Result<Vec<String>, PageError> {
        let source = self.base.session().page_source().await?;
        Ok(extract_step_texts(&source, SERVICE_STEPS))
    }
}

/// "N. " not preceded by another digit, so step 1 never matches "11. " or
/// the "1.0" of an XML declaration.
fn step_marker(step: usize) -> Option<Regex> {
    Regex::new(&format!(r"(?:^|[^0-9]){}\. ", step)).ok()
}

pub fn step_present(source: &str, step: usize) -> bool {
    step_marker(step).is_some_and(|re| re.is_match(source))
}

/// Step text runs until the end of the XML attribute, a line break, or an
/// encoded line break.
pub fn extract_step_texts(source: &str, total: usize) -> Vec<String> {
    (1..=total)
        .filter_map(|step| {
            let pattern = format!(r#"(?:^|[^0-9]){}\. ([^<"\n&]+)"#, step);
            let re = Regex::new(&pattern).ok()?;
            re.captures(source)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|text| !text.is_empty())
        })
        .collect()
}

/// Expected instructions on the Custom View screen.
pub const CUSTOM_VIEW_INSTRUCTIONS: [&str; 3] = [
    "1. Enable TalkBack",
    "2. Enable Explore-by-Touch",
    "3. Touch explore/poke the buttons",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionCheck {
    pub step1: bool,
    pub step2: bool,
    pub step3: bool,
}

impl InstructionCheck {
    pub fn all_present(&self) -> bool {
        self.step1 && self.step2 && self.step3
    }
}

/// The Custom View screen.
pub struct CustomViewPage<'a, S: Session + ?Sized> {
    base: BasePage<'a, S>,
}

impl<'a, S: Session + ?Sized> CustomViewPage<'a, S> {
    pub fn new(session: &'a mut S, wait: WaitOptions) -> Self {
        Self {
            base: BasePage::new(session, wait),
        }
    }

    /// The instruction block, found by its first line or, failing that, by
    /// scanning every TextView on screen.
    pub async fn instructional_text(&mut self) -> Result<String, PageError> {
        let first = CUSTOM_VIEW_INSTRUCTIONS[0];
        let chain = LocatorChain::named("instructions").or(UiSelector::new().text_contains(first));
        if let Some(found) = self.base.resolver().resolve(&chain).await.into_found() {
            debug!("Instructions found via textContains");
            return Ok(self.base.session().text(&found.handle).await?);
        }

        debug!("textContains lookup failed, scanning TextViews");
        let snapshot = self
            .base
            .resolver()
            .resolve_all(&LocatorStrategy::class_name(TEXT_VIEW))
            .await;
        for handle in snapshot {
            match self.base.session().text(&handle).await {
                Ok(text) if text.contains(first) => return Ok(text),
                Ok(_) => {}
                Err(e) => debug!(element = %handle, "unreadable TextView: {}", e),
            }
        }
        Err(PageError::NotFound("Instructional text".into()))
    }

    pub async fn verify_all_instructions(&mut self) -> Result<InstructionCheck, PageError> {
        let text = self.instructional_text().await?;
        let normalized = text.replace("\\n", "\n");
        let normalized = normalized.trim();
        let [a, b, c] = CUSTOM_VIEW_INSTRUCTIONS.map(|line| normalized.contains(line));
        let check = InstructionCheck {
            step1: a,
            step2: b,
            step3: c,
        };
        info!(
            "Instructions found: step1={} step2={} step3={}",
            check.step1, check.step2, check.step3
        );
        Ok(check)
    }

    pub async fn verify_text_contains(&mut self, expected: &str) -> Result<bool, PageError> {
        Ok(self.instructional_text().await?.contains(expected))
    }
}
