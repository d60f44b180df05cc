use super::base::{BasePage, menu_item};
use crate::error::PageError;
use scout_common::locator::UiSelector;
use scout_engine::{LocatorChain, Session, WaitOptions};
use tracing::info;

/// The Content section menu.
pub struct ContentPage<'a, S: Session + ?Sized> {
    base: BasePage<'a, S>,
}

impl<'a, S: Session + ?Sized> ContentPage<'a, S> {
    pub fn new(session: &'a mut S, wait: WaitOptions) -> Self {
        Self {
            base: BasePage::new(session, wait),
        }
    }

    pub async fn navigate_to_content(&mut self) -> Result<(), PageError> {
        self.base.click(&menu_item("Content")).await?;
        info!("Navigated to Content menu");
        Ok(())
    }

    pub async fn navigate_to_storage(&mut self) -> Result<(), PageError> {
        self.base.click(&menu_item("Storage")).await?;
        info!("Navigated to Storage submenu");
        Ok(())
    }
}

/// Content -> Storage.
pub struct StoragePage<'a, S: Session + ?Sized> {
    base: BasePage<'a, S>,
}

impl<'a, S: Session + ?Sized> StoragePage<'a, S> {
    pub fn new(session: &'a mut S, wait: WaitOptions) -> Self {
        Self {
            base: BasePage::new(session, wait),
        }
    }

    pub async fn navigate_to_external_storage(&mut self) -> Result<(), PageError> {
        self.base.click(&menu_item("External Storage")).await?;
        info!("Navigated to External Storage");
        Ok(())
    }
}

/// Outcome of tapping one Create button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateDeleteResult {
    pub create_success: bool,
    pub delete_exists: bool,
    pub delete_enabled: bool,
}

/// Content -> Storage -> External Storage: three Create/Delete pairs.
pub struct ExternalStoragePage<'a, S: Session + ?Sized> {
    base: BasePage<'a, S>,
}

fn create_button(instance: usize) -> LocatorChain {
    LocatorChain::named(format!("Create #{}", instance))
        .or(UiSelector::new().text("Create").instance(instance))
}

fn delete_button(instance: usize) -> LocatorChain {
    LocatorChain::named(format!("Delete #{}", instance))
        .or(UiSelector::new().text("Delete").instance(instance))
}

impl<'a, S: Session + ?Sized> ExternalStoragePage<'a, S> {
    pub fn new(session: &'a mut S, wait: WaitOptions) -> Self {
        Self {
            base: BasePage::new(session, wait),
        }
    }

    pub fn base(&mut self) -> &mut BasePage<'a, S> {
        &mut self.base
    }

    pub async fn tap_create_button(&mut self, instance: usize) -> Result<(), PageError> {
        self.base.click(&create_button(instance)).await?;
        info!("Tapped Create button instance {}", instance);
        Ok(())
    }

    pub async fn delete_button_exists(&mut self, instance: usize) -> bool {
        self.base.exists(&delete_button(instance)).await
    }

    /// False when the button does not exist.
    pub async fn is_delete_button_enabled(&mut self, instance: usize) -> Result<bool, PageError> {
        let Some(found) = self
            .base
            .resolver()
            .resolve(&delete_button(instance))
            .await
            .into_found()
        else {
            info!("Delete button instance {} not found", instance);
            return Ok(false);
        };
        let enabled = self.base.session().is_enabled(&found.handle).await?;
        info!("Delete button instance {} enabled state: {}", instance, enabled);
        Ok(enabled)
    }

    /// Tap Create `instance`, give its Delete button time to become
    /// clickable, and report the Delete button's state.
    pub async fn validate_create_delete_flow(
        &mut self,
        instance: usize,
    ) -> Result<CreateDeleteResult, PageError> {
        self.tap_create_button(instance).await?;
        // Timing out is fine here; the state below is what gets reported.
        self.base
            .waits()
            .wait_clickable(&delete_button(instance), None)
            .await;

        let delete_exists = self.delete_button_exists(instance).await;
        let delete_enabled = if delete_exists {
            self.is_delete_button_enabled(instance).await?
        } else {
            false
        };
        Ok(CreateDeleteResult {
            create_success: true,
            delete_exists,
            delete_enabled,
        })
    }
}
