use crate::error::PageError;
use scout_common::locator::{LocatorStrategy, UiSelector};
use scout_common::protocol::ElementHandle;
use scout_engine::gestures::{Gestures, SwipeDirection};
use scout_engine::screenshot::ScreenshotStore;
use scout_engine::{LocatorChain, Resolver, Session, WaitEngine, WaitOptions};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Shared plumbing for every page object: waiting, tapping, reading.
pub struct BasePage<'a, S: Session + ?Sized> {
    session: &'a mut S,
    wait: WaitOptions,
}

impl<'a, S: Session + ?Sized> BasePage<'a, S> {
    pub fn new(session: &'a mut S, wait: WaitOptions) -> Self {
        Self { session, wait }
    }

    pub fn session(&mut self) -> &mut S {
        &mut *self.session
    }

    pub fn wait_options(&self) -> WaitOptions {
        self.wait
    }

    pub fn resolver(&mut self) -> Resolver<'_, S> {
        Resolver::new(&mut *self.session)
    }

    pub fn waits(&mut self) -> WaitEngine<'_, S> {
        WaitEngine::with_defaults(&mut *self.session, self.wait)
    }

    /// Wait until `chain` is displayed and return its element.
    pub async fn wait_for_element(
        &mut self,
        chain: &LocatorChain,
        options: Option<WaitOptions>,
    ) -> Result<ElementHandle, PageError> {
        let options = options.unwrap_or(self.wait);
        if !self.waits().wait_visible(chain, Some(options)).await.is_satisfied() {
            return Err(PageError::Timeout {
                target: chain.to_string(),
                timeout_ms: options.timeout.as_millis() as u64,
            });
        }
        let resolved = self.resolver().resolve(chain).await.require(chain.to_string())?;
        Ok(resolved.handle)
    }

    pub async fn click(&mut self, chain: &LocatorChain) -> Result<(), PageError> {
        let element = self.wait_for_element(chain, None).await?;
        self.session.click(&element).await?;
        debug!(target_chain = %chain, "clicked");
        Ok(())
    }

    pub async fn send_keys(&mut self, chain: &LocatorChain, text: &str) -> Result<(), PageError> {
        let element = self.wait_for_element(chain, None).await?;
        self.session.set_value(&element, text).await?;
        Ok(())
    }

    pub async fn text(&mut self, chain: &LocatorChain) -> Result<String, PageError> {
        let element = self.wait_for_element(chain, None).await?;
        Ok(self.session.text(&element).await?)
    }

    /// Single check, no waiting. Any failure reads as "not displayed".
    pub async fn is_displayed(&mut self, chain: &LocatorChain) -> bool {
        match self.resolver().resolve(chain).await.into_found() {
            Some(resolved) => self
                .session
                .is_displayed(&resolved.handle)
                .await
                .unwrap_or(false),
            None => false,
        }
    }

    pub async fn exists(&mut self, chain: &LocatorChain) -> bool {
        self.resolver().is_present(chain).await
    }

    pub async fn scroll_to(&mut self, strategy: &LocatorStrategy) -> Result<(), PageError> {
        self.session.scroll_into_view(strategy).await?;
        Ok(())
    }

    pub async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    pub async fn swipe(&mut self, direction: SwipeDirection) -> Result<(), PageError> {
        Gestures::new(&mut *self.session)
            .swipe_direction(direction)
            .await?;
        Ok(())
    }

    pub async fn capture(
        &mut self,
        store: &ScreenshotStore,
        name: &str,
    ) -> Result<PathBuf, PageError> {
        Ok(store.capture(&mut *self.session, name).await?)
    }
}

/// Chain for a list entry shown with `text`: exact UiSelector text first,
/// then the accessibility id ApiDemos sets on most entries.
pub fn menu_item(text: &str) -> LocatorChain {
    LocatorChain::named(text)
        .or(UiSelector::new().text(text))
        .or(LocatorStrategy::accessibility_id(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_engine::testing::{FakeElement, FakeSession, Mutation};

    #[tokio::test(start_paused = true)]
    async fn click_waits_for_element_to_appear() {
        let mut session = FakeSession::new();
        session.at(
            Duration::from_millis(700),
            Mutation::AddKeyed("views".into(), FakeElement::text_view("Views")),
        );
        let mut page = BasePage::new(&mut session, WaitOptions::new());
        page.click(&menu_item("Views")).await.unwrap();
        assert_eq!(session.clicks(), [ElementHandle::new("views")]);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_element_times_out_with_target() {
        let mut session = FakeSession::new();
        let mut page = BasePage::new(&mut session, WaitOptions::new().with_timeout_ms(1_000));
        let err = page
            .wait_for_element(&menu_item("Graphics"), None)
            .await
            .unwrap_err();
        match err {
            PageError::Timeout { target, timeout_ms } => {
                assert_eq!(target, "Graphics");
                assert_eq!(timeout_ms, 1_000);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn hidden_element_is_not_displayed() {
        let mut session = FakeSession::new();
        session.add(FakeElement::text_view("Media").hidden());
        let mut page = BasePage::new(&mut session, WaitOptions::new());
        assert!(page.exists(&menu_item("Media")).await);
        assert!(!page.is_displayed(&menu_item("Media")).await);
    }

    #[tokio::test]
    async fn send_keys_replaces_text() {
        let mut session = FakeSession::new();
        let field = session.add(
            FakeElement::new("android.widget.EditText").resource_id("io.appium.android.apis:id/edit"),
        );
        let chain = LocatorChain::from(LocatorStrategy::resource_id("edit"));
        let mut page = BasePage::new(&mut session, WaitOptions::new());
        page.send_keys(&chain, "hello").await.unwrap();
        assert_eq!(page.text(&chain).await.unwrap(), "hello");
        assert_eq!(session.element(&field).unwrap().text, "hello");
    }
}
