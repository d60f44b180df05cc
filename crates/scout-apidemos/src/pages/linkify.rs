use super::base::{BasePage, menu_item};
use crate::error::PageError;
use scout_common::locator::{LocatorStrategy, UiSelector};
use scout_engine::{LocatorChain, Session, WaitOptions};
use tracing::info;

/// Text -> Linkify: four linkified TextViews, `text1` through `text4`.
pub struct LinkifyPage<'a, S: Session + ?Sized> {
    base: BasePage<'a, S>,
}

pub const TEXT_ELEMENTS: [u8; 4] = [1, 2, 3, 4];

fn text_chain(number: u8) -> LocatorChain {
    let id = format!("io.appium.android.apis:id/text{}", number);
    LocatorChain::named(format!("text {}", number))
        .or(UiSelector::new().resource_id(id.as_str()))
        .or(LocatorStrategy::resource_id(id))
}

impl<'a, S: Session + ?Sized> LinkifyPage<'a, S> {
    pub fn new(session: &'a mut S, wait: WaitOptions) -> Self {
        Self {
            base: BasePage::new(session, wait),
        }
    }

    pub async fn navigate_to_text_menu(&mut self) -> Result<(), PageError> {
        info!("Step: Navigate to Text menu");
        self.base.click(&menu_item("Text")).await?;
        info!("Navigated to Text menu");
        Ok(())
    }

    pub async fn navigate_to_linkify(&mut self) -> Result<(), PageError> {
        info!("Step: Navigate to Linkify");
        self.base.click(&menu_item("Linkify")).await?;
        info!("Navigated to Linkify");
        Ok(())
    }

    /// Text of element `number` (1..=4).
    pub async fn text_element(&mut self, number: u8) -> Result<String, PageError> {
        if !TEXT_ELEMENTS.contains(&number) {
            return Err(PageError::NotFound(format!("Text element {}", number)));
        }
        let text = self.base.text(&text_chain(number)).await?;
        info!("  Text {}: \"{}\"", number, text);
        Ok(text)
    }

    pub async fn all_text_elements(&mut self) -> Result<[String; 4], PageError> {
        info!("Verifying all text elements:");
        Ok([
            self.text_element(1).await?,
            self.text_element(2).await?,
            self.text_element(3).await?,
            self.text_element(4).await?,
        ])
    }

    pub async fn is_text_element_displayed(&mut self, number: u8) -> bool {
        TEXT_ELEMENTS.contains(&number) && self.base.is_displayed(&text_chain(number)).await
    }

    pub async fn verify_all_text_elements_displayed(&mut self) -> bool {
        info!("Verifying all text elements are displayed:");
        for number in TEXT_ELEMENTS {
            let displayed = self.is_text_element_displayed(number).await;
            info!(
                "  Text {}: {}",
                number,
                if displayed { "Displayed" } else { "Not displayed" }
            );
            if !displayed {
                return false;
            }
        }
        info!("All text elements are displayed");
        true
    }
}
