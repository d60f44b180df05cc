use crate::session::Session;
use scout_common::error::SessionError;
use scout_common::protocol::Orientation;
use tracing::{debug, info};

/// Device-level conveniences on top of a [`Session`].
pub struct Device<'a, S: Session + ?Sized> {
    session: &'a mut S,
}

impl<'a, S: Session + ?Sized> Device<'a, S> {
    pub fn new(session: &'a mut S) -> Self {
        Self { session }
    }

    /// Hide the soft keyboard. A keyboard that is not showing is not an error.
    pub async fn hide_keyboard(&mut self) {
        match self.session.hide_keyboard().await {
            Ok(()) => info!("Keyboard hidden"),
            Err(e) => debug!("Keyboard not visible or already hidden: {}", e),
        }
    }

    /// Errors read as "not visible".
    pub async fn is_keyboard_visible(&mut self) -> bool {
        self.session.is_keyboard_shown().await.unwrap_or(false)
    }

    pub async fn press_back(&mut self) -> Result<(), SessionError> {
        self.session.back().await?;
        info!("Pressed back button");
        Ok(())
    }

    pub async fn orientation(&mut self) -> Result<Orientation, SessionError> {
        self.session.orientation().await
    }

    pub async fn set_orientation(&mut self, orientation: Orientation) -> Result<(), SessionError> {
        self.session.set_orientation(orientation).await?;
        info!("Orientation set to {}", orientation);
        Ok(())
    }

    pub async fn current_activity(&mut self) -> Result<String, SessionError> {
        self.session.current_activity().await
    }

    pub async fn current_package(&mut self) -> Result<String, SessionError> {
        self.session.current_package().await
    }

    pub async fn launch_app(&mut self, app_id: &str) -> Result<(), SessionError> {
        self.session.activate_app(app_id).await?;
        info!("App launched: {}", app_id);
        Ok(())
    }

    pub async fn close_app(&mut self, app_id: &str) -> Result<(), SessionError> {
        self.session.terminate_app(app_id).await?;
        info!("App closed: {}", app_id);
        Ok(())
    }

    /// Close then relaunch `app_id`.
    pub async fn reset_app(&mut self, app_id: &str) -> Result<(), SessionError> {
        self.close_app(app_id).await?;
        self.launch_app(app_id).await?;
        info!("App reset");
        Ok(())
    }

    pub async fn device_time(&mut self) -> Result<String, SessionError> {
        self.session.device_time().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSession;

    const APP: &str = "io.appium.android.apis";

    #[tokio::test]
    async fn hide_keyboard_tolerates_missing_keyboard() {
        let mut session = FakeSession::new();
        let mut device = Device::new(&mut session);
        assert!(!device.is_keyboard_visible().await);
        device.hide_keyboard().await;

        session.show_keyboard();
        let mut device = Device::new(&mut session);
        assert!(device.is_keyboard_visible().await);
        device.hide_keyboard().await;
        assert!(!device.is_keyboard_visible().await);
    }

    #[tokio::test]
    async fn keyboard_query_error_reads_as_hidden() {
        let mut session = FakeSession::offline();
        assert!(!Device::new(&mut session).is_keyboard_visible().await);
    }

    #[tokio::test]
    async fn reset_app_closes_then_launches() {
        let mut session = FakeSession::new();
        let mut device = Device::new(&mut session);
        device.close_app(APP).await.unwrap();
        assert!(!session.running_apps().contains(APP));

        Device::new(&mut session).reset_app(APP).await.unwrap();
        assert!(session.running_apps().contains(APP));
    }

    #[tokio::test]
    async fn orientation_round_trips_through_session() {
        let mut session = FakeSession::new();
        let mut device = Device::new(&mut session);
        assert_eq!(device.orientation().await.unwrap(), Orientation::Portrait);
        device.set_orientation(Orientation::Landscape).await.unwrap();
        assert_eq!(device.orientation().await.unwrap(), Orientation::Landscape);
    }

    #[tokio::test]
    async fn press_back_reaches_session() {
        let mut session = FakeSession::new();
        Device::new(&mut session).press_back().await.unwrap();
        assert_eq!(session.back_presses(), 1);
    }

    #[tokio::test]
    async fn reports_foreground_app() {
        let mut session = FakeSession::new();
        let mut device = Device::new(&mut session);
        assert_eq!(device.current_package().await.unwrap(), APP);
        assert_eq!(device.current_activity().await.unwrap(), ".ApiDemos");
        assert!(device.device_time().await.unwrap().starts_with("2026-"));
    }
}
