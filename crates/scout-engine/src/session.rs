use async_trait::async_trait;
use scout_common::error::SessionError;
use scout_common::locator::LocatorStrategy;
use scout_common::protocol::{ElementHandle, Orientation, Rect, WindowSize};

/// The Session trait is the interface the resolver, the wait engine and the
/// page objects drive. Its lifecycle belongs to the caller.
///
/// Lookups report absence as an empty result, never as an error. Element
/// queries on a handle whose view is gone return [`SessionError::StaleElement`].
#[async_trait]
pub trait Session: Send + Sync {
    /// Open the session (connect to the automation server, start the app).
    async fn launch(&mut self) -> Result<(), SessionError>;

    /// Close the session and release server-side resources.
    async fn close(&mut self) -> Result<(), SessionError>;

    /// Check if the session accepts commands.
    async fn is_ready(&self) -> bool;

    /// All elements currently matching `strategy`, in tree order.
    async fn find_elements(
        &mut self,
        strategy: &LocatorStrategy,
    ) -> Result<Vec<ElementHandle>, SessionError>;

    async fn is_displayed(&mut self, element: &ElementHandle) -> Result<bool, SessionError>;

    async fn is_enabled(&mut self, element: &ElementHandle) -> Result<bool, SessionError>;

    async fn text(&mut self, element: &ElementHandle) -> Result<String, SessionError>;

    async fn click(&mut self, element: &ElementHandle) -> Result<(), SessionError>;

    /// Capture a PNG screenshot of the device screen.
    async fn screenshot(&mut self) -> Result<Vec<u8>, SessionError>;

    /// Replace the element's value with `text`.
    async fn set_value(&mut self, _element: &ElementHandle, _text: &str) -> Result<(), SessionError> {
        Err(SessionError::NotSupported("set_value".into()))
    }

    async fn element_rect(&mut self, _element: &ElementHandle) -> Result<Rect, SessionError> {
        Err(SessionError::NotSupported("element_rect".into()))
    }

    /// Scroll the first scrollable container until an element matching
    /// `strategy` is on screen.
    async fn scroll_into_view(&mut self, _strategy: &LocatorStrategy) -> Result<(), SessionError> {
        Err(SessionError::NotSupported("scroll_into_view".into()))
    }

    /// Raw UI hierarchy as XML.
    async fn page_source(&mut self) -> Result<String, SessionError> {
        Err(SessionError::NotSupported("page_source".into()))
    }

    async fn window_size(&mut self) -> Result<WindowSize, SessionError> {
        Err(SessionError::NotSupported("window_size".into()))
    }

    /// Perform a W3C action sequence (the `actions` array of the request body).
    async fn perform_actions(&mut self, _actions: serde_json::Value) -> Result<(), SessionError> {
        Err(SessionError::NotSupported("perform_actions".into()))
    }

    async fn release_actions(&mut self) -> Result<(), SessionError> {
        Err(SessionError::NotSupported("release_actions".into()))
    }

    /// Press the device back button.
    async fn back(&mut self) -> Result<(), SessionError> {
        Err(SessionError::NotSupported("back".into()))
    }

    async fn hide_keyboard(&mut self) -> Result<(), SessionError> {
        Err(SessionError::NotSupported("hide_keyboard".into()))
    }

    async fn is_keyboard_shown(&mut self) -> Result<bool, SessionError> {
        Err(SessionError::NotSupported("is_keyboard_shown".into()))
    }

    async fn orientation(&mut self) -> Result<Orientation, SessionError> {
        Err(SessionError::NotSupported("orientation".into()))
    }

    async fn set_orientation(&mut self, _orientation: Orientation) -> Result<(), SessionError> {
        Err(SessionError::NotSupported("set_orientation".into()))
    }

    async fn current_activity(&mut self) -> Result<String, SessionError> {
        Err(SessionError::NotSupported("current_activity".into()))
    }

    async fn current_package(&mut self) -> Result<String, SessionError> {
        Err(SessionError::NotSupported("current_package".into()))
    }

    async fn activate_app(&mut self, _app_id: &str) -> Result<(), SessionError> {
        Err(SessionError::NotSupported("activate_app".into()))
    }

    async fn terminate_app(&mut self, _app_id: &str) -> Result<(), SessionError> {
        Err(SessionError::NotSupported("terminate_app".into()))
    }

    async fn device_time(&mut self) -> Result<String, SessionError> {
        Err(SessionError::NotSupported("device_time".into()))
    }
}
