use crate::wait::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS, WaitOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub appium: AppiumConfig,
    #[serde(default)]
    pub wait: WaitConfig,
    #[serde(default)]
    pub screenshots: ScreenshotConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

/// Which kind of device the capabilities target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceProfile {
    Emulator,
    Real,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppiumConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl Default for AppiumConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            port: default_port(),
            log_level: default_log_level(),
            capabilities: Capabilities::default(),
        }
    }
}

impl AppiumConfig {
    pub fn for_profile(profile: DeviceProfile) -> Self {
        let mut config = Self::default();
        if profile == DeviceProfile::Real {
            config.capabilities.device_name = "REAL_DEVICE_ID".to_string();
        }
        config
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.hostname, self.port)
    }

    pub fn with_app_path(mut self, app: impl Into<String>) -> Self {
        self.capabilities.app = app.into();
        self
    }

    pub fn with_device_name(mut self, device_name: impl Into<String>) -> Self {
        self.capabilities.device_name = device_name.into();
        self
    }
}

fn default_hostname() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    4723
}

fn default_log_level() -> String {
    "info".to_string()
}

/// W3C capabilities sent when the session is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(rename = "platformName", default = "default_platform_name")]
    pub platform_name: String,
    #[serde(rename = "appium:deviceName", default = "default_device_name")]
    pub device_name: String,
    #[serde(rename = "appium:automationName", default = "default_automation_name")]
    pub automation_name: String,
    #[serde(rename = "appium:app", default)]
    pub app: String,
    #[serde(
        rename = "appium:appPackage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub app_package: Option<String>,
    #[serde(
        rename = "appium:appActivity",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub app_activity: Option<String>,
    #[serde(rename = "appium:noReset", default)]
    pub no_reset: bool,
    #[serde(rename = "appium:fullReset", default)]
    pub full_reset: bool,
    #[serde(rename = "appium:autoGrantPermissions", default = "default_true")]
    pub auto_grant_permissions: bool,
    #[serde(
        rename = "appium:newCommandTimeout",
        default = "default_new_command_timeout"
    )]
    pub new_command_timeout: u64,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            platform_name: default_platform_name(),
            device_name: default_device_name(),
            automation_name: default_automation_name(),
            app: String::new(),
            app_package: None,
            app_activity: None,
            no_reset: false,
            full_reset: false,
            auto_grant_permissions: true,
            new_command_timeout: default_new_command_timeout(),
        }
    }
}

impl Capabilities {
    /// Capabilities as the JSON object a WebDriver client expects.
    /// An empty `appium:app` is dropped so an installed app can be used.
    pub fn to_json_map(
        &self,
    ) -> Result<serde_json::Map<String, serde_json::Value>, serde_json::Error> {
        let mut map = match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        if self.app.is_empty() {
            map.remove("appium:app");
        }
        Ok(map)
    }
}

fn default_platform_name() -> String {
    "Android".to_string()
}

fn default_device_name() -> String {
    "emulator-5554".to_string()
}

fn default_automation_name() -> String {
    "UiAutomator2".to_string()
}

fn default_true() -> bool {
    true
}

fn default_new_command_timeout() -> u64 {
    300
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitConfig {
    #[serde(default = "default_wait_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_wait_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl From<&WaitConfig> for WaitOptions {
    fn from(config: &WaitConfig) -> Self {
        WaitOptions::new()
            .with_timeout_ms(config.timeout_ms)
            .with_poll_interval_ms(config.poll_interval_ms)
    }
}

fn default_wait_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenshotConfig {
    #[serde(default = "default_screenshot_dir")]
    pub dir: PathBuf,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            dir: default_screenshot_dir(),
        }
    }
}

fn default_screenshot_dir() -> PathBuf {
    PathBuf::from("screenshots")
}

/// Named timeouts used by scenarios, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_short")]
    pub short: u64,
    #[serde(default = "default_medium")]
    pub medium: u64,
    #[serde(default = "default_long")]
    pub long: u64,
    #[serde(default = "default_very_long")]
    pub very_long: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            short: default_short(),
            medium: default_medium(),
            long: default_long(),
            very_long: default_very_long(),
        }
    }
}

fn default_short() -> u64 {
    5000
}

fn default_medium() -> u64 {
    10000
}

fn default_long() -> u64 {
    15000
}

fn default_very_long() -> u64 {
    30000
}
