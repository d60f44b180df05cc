use super::base::{BasePage, menu_item};
use crate::error::PageError;
use scout_common::locator::{LocatorStrategy, UiSelector};
use scout_engine::{LocatorChain, Session, WaitOptions};
use tracing::{debug, error, info};

pub const LIST_VIEW: &str = "android.widget.ListView";
pub const TEXT_VIEW: &str = "android.widget.TextView";

/// The ApiDemos home screen: a scrolling list of sections.
pub struct ApiDemosPage<'a, S: Session + ?Sized> {
    base: BasePage<'a, S>,
}

impl<'a, S: Session + ?Sized> ApiDemosPage<'a, S> {
    pub fn new(session: &'a mut S, wait: WaitOptions) -> Self {
        Self {
            base: BasePage::new(session, wait),
        }
    }

    pub fn base(&mut self) -> &mut BasePage<'a, S> {
        &mut self.base
    }

    fn list_view() -> LocatorChain {
        LocatorChain::named("section list")
            .or(LocatorStrategy::class_name(LIST_VIEW))
            .or(UiSelector::new().class_name(LIST_VIEW))
    }

    /// True once the section list is on screen within `timeout_ms`.
    pub async fn verify_app_launched(&mut self, timeout_ms: u64) -> bool {
        let options = self.base.wait_options().with_timeout_ms(timeout_ms);
        match self
            .base
            .wait_for_element(&Self::list_view(), Some(options))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                error!("App failed to launch: {}", e);
                false
            }
        }
    }

    /// Scroll `text` into view if needed, then tap it.
    pub async fn click_menu_item(&mut self, text: &str) -> Result<(), PageError> {
        let target = LocatorStrategy::from(UiSelector::new().text(text));
        if let Err(e) = self.base.scroll_to(&target).await {
            debug!("scroll to '{}' skipped: {}", text, e);
        }
        self.base.click(&menu_item(text)).await
    }

    pub async fn find_menu_item_containing(&mut self, partial: &str) -> bool {
        let chain = LocatorChain::named(format!("item containing '{}'", partial))
            .or(UiSelector::new().text_contains(partial));
        self.base.is_displayed(&chain).await
    }

    /// Texts of every non-empty TextView currently on screen.
    pub async fn menu_items(&mut self) -> Vec<String> {
        let snapshot = self
            .base
            .resolver()
            .resolve_all(&LocatorStrategy::class_name(TEXT_VIEW))
            .await;
        let mut texts = Vec::with_capacity(snapshot.len());
        for handle in snapshot {
            // Rows recycled mid-scan are skipped.
            if let Ok(text) = self.base.session().text(&handle).await
                && !text.is_empty()
            {
                texts.push(text);
            }
        }
        texts
    }

    pub async fn navigate_to_section(&mut self, section: &str) -> Result<(), PageError> {
        self.click_menu_item(section).await?;
        info!("Navigated to {}", section);
        Ok(())
    }
}
