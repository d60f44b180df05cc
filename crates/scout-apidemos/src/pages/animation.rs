use super::base::{BasePage, menu_item};
use crate::error::PageError;
use scout_common::locator::{LocatorStrategy, UiSelector};
use scout_engine::{GoneMode, LocatorChain, Session, WaitOptions, WaitTarget};
use std::collections::BTreeMap;
use tracing::info;

pub const BUTTON: &str = "android.widget.Button";

/// Buttons 0..=3 on the Hide-Show Animations screen.
pub const BUTTON_IDS: [u8; 4] = [0, 1, 2, 3];

/// The Animation section menu.
pub struct AnimationPage<'a, S: Session + ?Sized> {
    base: BasePage<'a, S>,
}

impl<'a, S: Session + ?Sized> AnimationPage<'a, S> {
    pub fn new(session: &'a mut S, wait: WaitOptions) -> Self {
        Self {
            base: BasePage::new(session, wait),
        }
    }

    fn hide_show_item() -> LocatorChain {
        LocatorChain::named("Hide-Show Animations")
            .or(LocatorStrategy::accessibility_id("Hide-Show Animations"))
            .or(UiSelector::new().text("Hide-Show Animations"))
    }

    pub async fn navigate_to_animation(&mut self) -> Result<(), PageError> {
        info!("Step: Navigate to Animation menu");
        self.base.click(&menu_item("Animation")).await?;
        info!("Navigated to Animation menu");
        Ok(())
    }

    pub async fn navigate_to_hide_show_animations(&mut self) -> Result<(), PageError> {
        info!("Step: Navigate to Hide-Show Animations");
        self.base.click(&Self::hide_show_item()).await?;
        info!("Navigated to Hide-Show Animations");
        Ok(())
    }

    pub async fn verify_animation_menu_displayed(&mut self) -> bool {
        self.base.is_displayed(&Self::hide_show_item()).await
    }
}

/// Locator chain for numbered button `id`: resource id, text, description,
/// then position among all buttons.
pub fn button_chain(id: u8) -> LocatorChain {
    LocatorChain::named(format!("button {}", id))
        .or(UiSelector::new().resource_id(format!("io.appium.android.apis:id/button{}", id)))
        .or(UiSelector::new().text(id.to_string()))
        .or(UiSelector::new().description(id.to_string()))
        .or(UiSelector::new()
            .class_name(BUTTON)
            .instance(usize::from(id)))
}

fn show_buttons_chain() -> LocatorChain {
    LocatorChain::named("Show Buttons")
        .or(UiSelector::new().text("Show Buttons"))
        .or(UiSelector::new().description("Show Buttons"))
        .or(UiSelector::new().text_contains("Show"))
}

/// The Hide-Show Animations screen.
pub struct HideShowAnimationsPage<'a, S: Session + ?Sized> {
    base: BasePage<'a, S>,
}

impl<'a, S: Session + ?Sized> HideShowAnimationsPage<'a, S> {
    pub fn new(session: &'a mut S, wait: WaitOptions) -> Self {
        Self {
            base: BasePage::new(session, wait),
        }
    }

    pub fn base(&mut self) -> &mut BasePage<'a, S> {
        &mut self.base
    }

    /// Tap button `id` and wait for that element to disappear.
    ///
    /// The tapped element itself is tracked; the positional fallback would
    /// otherwise match the next button along once this one is gone.
    pub async fn hide_button(&mut self, id: u8) -> Result<(), PageError> {
        info!("Step: Tap button {} and validate it's gone", id);
        let chain = button_chain(id);
        let resolved = self
            .base
            .resolver()
            .resolve(&chain)
            .await
            .require(chain.to_string())?;
        info!("  Button {} found by {}", id, resolved.strategy.kind());

        self.base.session().click(&resolved.handle).await?;
        let gone = self
            .base
            .waits()
            .wait_gone(WaitTarget::Handle(&resolved.handle), GoneMode::Hidden, None)
            .await;
        if !gone.is_satisfied() {
            return Err(PageError::Verification(format!(
                "Button {} should be hidden but is still visible",
                id
            )));
        }
        info!("Button {} successfully hidden", id);
        Ok(())
    }

    pub async fn show_all_buttons(&mut self) -> Result<(), PageError> {
        info!("Step: Tap \"Show Buttons\" and verify all buttons are back");
        let chain = show_buttons_chain();
        if !self.base.exists(&chain).await {
            return Err(PageError::NotFound("\"Show Buttons\" button".into()));
        }
        self.base.click(&chain).await?;
        info!("Clicked \"Show Buttons\"");
        Ok(())
    }

    pub async fn is_button_visible(&mut self, id: u8) -> bool {
        self.base
            .waits()
            .wait_visible(&button_chain(id), None)
            .await
            .is_satisfied()
    }

    /// Wait for every id in `ids` to be visible; fails on the first that isn't.
    pub async fn verify_all_buttons_visible(
        &mut self,
        ids: &[u8],
    ) -> Result<BTreeMap<u8, bool>, PageError> {
        info!("Verifying all buttons are visible again:");
        let mut results = BTreeMap::new();
        for &id in ids {
            let visible = self.is_button_visible(id).await;
            info!("  Button {} visible: {}", id, visible);
            results.insert(id, visible);
            if !visible {
                return Err(PageError::Verification(format!(
                    "Button {} should be visible but is not found",
                    id
                )));
            }
        }
        info!("All buttons successfully restored");
        Ok(results)
    }
}
