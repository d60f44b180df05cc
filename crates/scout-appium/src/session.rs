use crate::command::{
    AppiumCommand, element_handles, expect_bool, expect_string, scroll_expression,
};
use crate::server::{self, DEFAULT_PROBE_ATTEMPTS};
use async_trait::async_trait;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder};
use scout_common::error::SessionError;
use scout_common::locator::LocatorStrategy;
use scout_common::protocol::{ElementHandle, Orientation, Rect, WindowSize};
use scout_engine::config::AppiumConfig;
use scout_engine::session::Session;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

/// [`Session`] backed by a remote Appium server.
pub struct AppiumSession {
    client: Option<Client>,
    server_url: String,
    capabilities: Map<String, Value>,
    probe_attempts: u32,
}

impl AppiumSession {
    pub fn new(server_url: impl Into<String>, capabilities: Map<String, Value>) -> Self {
        Self {
            client: None,
            server_url: server_url.into(),
            capabilities,
            probe_attempts: DEFAULT_PROBE_ATTEMPTS,
        }
    }

    pub fn from_config(config: &AppiumConfig) -> Result<Self, SessionError> {
        let capabilities = config.capabilities.to_json_map()?;
        Ok(Self::new(config.server_url(), capabilities))
    }

    pub fn with_probe_attempts(mut self, attempts: u32) -> Self {
        self.probe_attempts = attempts;
        self
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn client(&self) -> Result<&Client, SessionError> {
        self.client.as_ref().ok_or(SessionError::NotReady)
    }

    async fn issue(&self, name: &str, cmd: AppiumCommand) -> Result<Value, SessionError> {
        debug!(command = name, method = %cmd.method(), path = cmd.path(), "issue");
        self.client()?
            .issue_cmd(cmd)
            .await
            .map_err(|e| map_cmd_error(name, e))
    }

    async fn device(&self, name: &str, endpoint: &str) -> Result<Value, SessionError> {
        self.issue(name, AppiumCommand::get(format!("appium/device/{}", endpoint)))
            .await
    }

    async fn app_command(&self, name: &str, endpoint: &str, app_id: &str) -> Result<(), SessionError> {
        self.issue(
            name,
            AppiumCommand::post(
                format!("appium/device/{}", endpoint),
                json!({ "appId": app_id }),
            ),
        )
        .await?;
        Ok(())
    }
}

/// Translate a WebDriver failure into the session vocabulary.
fn map_cmd_error(command: &str, err: CmdError) -> SessionError {
    if let CmdError::WaitTimeout = err {
        return SessionError::Timeout {
            operation: command.to_string(),
        };
    }
    if let CmdError::Standard(wd) = &err {
        match &wd.error {
            ErrorStatus::NoSuchElement => return SessionError::NoSuchElement(wd.message.to_string()),
            ErrorStatus::StaleElementReference => {
                return SessionError::StaleElement(wd.message.to_string());
            }
            ErrorStatus::InvalidSelector => {
                return SessionError::InvalidSelector {
                    selector: wd.message.to_string(),
                };
            }
            ErrorStatus::ElementNotInteractable => {
                return SessionError::NotInteractable {
                    id: String::new(),
                    reason: wd.message.to_string(),
                };
            }
            ErrorStatus::Timeout => {
                return SessionError::Timeout {
                    operation: command.to_string(),
                };
            }
            _ => {}
        }
    }
    SessionError::Command {
        command: command.to_string(),
        message: err.to_string(),
    }
}

#[async_trait]
impl Session for AppiumSession {
    async fn launch(&mut self) -> Result<(), SessionError> {
        if self.client.is_some() {
            return Ok(());
        }
        server::wait_for_server(&self.server_url, self.probe_attempts).await?;

        info!("Creating Appium session at {}...", self.server_url);
        let client = ClientBuilder::native()
            .capabilities(self.capabilities.clone())
            .connect(&self.server_url)
            .await
            .map_err(|e| {
                SessionError::Connect(format!(
                    "Failed to create session at {}: {}",
                    self.server_url, e
                ))
            })?;
        self.client = Some(client);
        info!("Appium session created");
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        if let Some(client) = self.client.take() {
            client.close().await.map_err(|e| map_cmd_error("close", e))?;
            info!("Appium session closed");
        }
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    async fn find_elements(
        &mut self,
        strategy: &LocatorStrategy,
    ) -> Result<Vec<ElementHandle>, SessionError> {
        let value = self
            .issue("find_elements", AppiumCommand::find_elements(strategy))
            .await?;
        element_handles("find_elements", &value)
    }

    async fn is_displayed(&mut self, element: &ElementHandle) -> Result<bool, SessionError> {
        let value = self
            .issue("is_displayed", AppiumCommand::element(element, "displayed"))
            .await?;
        expect_bool("is_displayed", &value)
    }

    async fn is_enabled(&mut self, element: &ElementHandle) -> Result<bool, SessionError> {
        let value = self
            .issue("is_enabled", AppiumCommand::element(element, "enabled"))
            .await?;
        expect_bool("is_enabled", &value)
    }

    async fn text(&mut self, element: &ElementHandle) -> Result<String, SessionError> {
        let value = self
            .issue("text", AppiumCommand::element(element, "text"))
            .await?;
        expect_string("text", &value)
    }

    async fn click(&mut self, element: &ElementHandle) -> Result<(), SessionError> {
        self.issue(
            "click",
            AppiumCommand::post(format!("element/{}/click", element.id()), json!({})),
        )
        .await?;
        Ok(())
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, SessionError> {
        self.client()?
            .screenshot()
            .await
            .map_err(|e| map_cmd_error("screenshot", e))
    }

    async fn set_value(&mut self, element: &ElementHandle, text: &str) -> Result<(), SessionError> {
        self.issue(
            "clear",
            AppiumCommand::post(format!("element/{}/clear", element.id()), json!({})),
        )
        .await?;
        self.issue(
            "set_value",
            AppiumCommand::post(
                format!("element/{}/value", element.id()),
                json!({ "text": text }),
            ),
        )
        .await?;
        Ok(())
    }

    async fn element_rect(&mut self, element: &ElementHandle) -> Result<Rect, SessionError> {
        let value = self
            .issue("element_rect", AppiumCommand::element(element, "rect"))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn scroll_into_view(&mut self, strategy: &LocatorStrategy) -> Result<(), SessionError> {
        let scroll = LocatorStrategy::ui_automator(scroll_expression(strategy));
        let handles = self.find_elements(&scroll).await?;
        if handles.is_empty() {
            return Err(SessionError::NoSuchElement(strategy.to_string()));
        }
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String, SessionError> {
        self.client()?
            .source()
            .await
            .map_err(|e| map_cmd_error("page_source", e))
    }

    async fn window_size(&mut self) -> Result<WindowSize, SessionError> {
        let value = self
            .issue("window_size", AppiumCommand::get("window/rect"))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn perform_actions(&mut self, actions: Value) -> Result<(), SessionError> {
        self.issue(
            "perform_actions",
            AppiumCommand::post("actions", json!({ "actions": actions })),
        )
        .await?;
        Ok(())
    }

    async fn release_actions(&mut self) -> Result<(), SessionError> {
        self.issue("release_actions", AppiumCommand::delete("actions"))
            .await?;
        Ok(())
    }

    async fn back(&mut self) -> Result<(), SessionError> {
        self.issue("back", AppiumCommand::post("back", json!({})))
            .await?;
        Ok(())
    }

    async fn hide_keyboard(&mut self) -> Result<(), SessionError> {
        self.issue(
            "hide_keyboard",
            AppiumCommand::post("appium/device/hide_keyboard", json!({})),
        )
        .await?;
        Ok(())
    }

    async fn is_keyboard_shown(&mut self) -> Result<bool, SessionError> {
        let value = self.device("is_keyboard_shown", "is_keyboard_shown").await?;
        expect_bool("is_keyboard_shown", &value)
    }

    async fn orientation(&mut self) -> Result<Orientation, SessionError> {
        let value = self
            .issue("orientation", AppiumCommand::get("orientation"))
            .await?;
        expect_string("orientation", &value)?
            .parse()
            .map_err(|detail| SessionError::UnexpectedResponse {
                command: "orientation".into(),
                detail,
            })
    }

    async fn set_orientation(&mut self, orientation: Orientation) -> Result<(), SessionError> {
        self.issue(
            "set_orientation",
            AppiumCommand::post("orientation", json!({ "orientation": orientation })),
        )
        .await?;
        Ok(())
    }

    async fn current_activity(&mut self) -> Result<String, SessionError> {
        let value = self.device("current_activity", "current_activity").await?;
        expect_string("current_activity", &value)
    }

    async fn current_package(&mut self) -> Result<String, SessionError> {
        let value = self.device("current_package", "current_package").await?;
        expect_string("current_package", &value)
    }

    async fn activate_app(&mut self, app_id: &str) -> Result<(), SessionError> {
        self.app_command("activate_app", "activate_app", app_id).await
    }

    async fn terminate_app(&mut self, app_id: &str) -> Result<(), SessionError> {
        self.app_command("terminate_app", "terminate_app", app_id)
            .await
    }

    async fn device_time(&mut self) -> Result<String, SessionError> {
        let value = self.device("device_time", "system_time").await?;
        expect_string("device_time", &value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn commands_before_launch_are_not_ready() {
        let mut session = AppiumSession::new("http://localhost:4723", Map::new());
        assert!(!session.is_ready().await);
        let err = session
            .find_elements(&LocatorStrategy::accessibility_id("App"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NotReady));
        // Closing a session that never launched is a no-op.
        session.close().await.unwrap();
    }

    fn webdriver(status: ErrorStatus, message: &'static str) -> CmdError {
        CmdError::Standard(fantoccini::error::WebDriver::new(status, message))
    }

    #[test]
    fn missing_elements_map_to_missing() {
        let err = map_cmd_error(
            "find_elements",
            webdriver(ErrorStatus::NoSuchElement, "no such element"),
        );
        assert!(matches!(&err, SessionError::NoSuchElement(msg) if msg == "no such element"));
        assert!(err.is_missing());

        let err = map_cmd_error(
            "is_displayed",
            webdriver(ErrorStatus::StaleElementReference, "element is not attached"),
        );
        assert!(matches!(err, SessionError::StaleElement(_)));
        assert!(err.is_missing());
    }

    #[test]
    fn other_webdriver_errors_keep_their_meaning() {
        let err = map_cmd_error(
            "find_elements",
            webdriver(ErrorStatus::InvalidSelector, "textContains"),
        );
        assert!(
            matches!(&err, SessionError::InvalidSelector { selector } if selector == "textContains")
        );
        assert!(!err.is_missing());

        let err = map_cmd_error("click", webdriver(ErrorStatus::Timeout, "timed out"));
        assert!(matches!(&err, SessionError::Timeout { operation } if operation == "click"));

        let err = map_cmd_error(
            "page_source",
            webdriver(ErrorStatus::UnknownError, "instrumentation crashed"),
        );
        assert!(
            matches!(&err, SessionError::Command { command, .. } if command == "page_source")
        );
        assert!(!err.is_missing());
    }

    #[test]
    fn from_config_carries_capabilities() {
        let config = AppiumConfig::default().with_app_path("/apps/ApiDemos-debug.apk");
        let session = AppiumSession::from_config(&config).unwrap();
        assert_eq!(session.server_url(), "http://localhost:4723");
        assert_eq!(session.capabilities["appium:app"], "/apps/ApiDemos-debug.apk");
    }
}
