use super::schema::ScoutConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Environment variable overriding the target device.
pub const DEVICE_NAME_ENV: &str = "DEVICE_NAME";
/// Environment variable overriding the app under test.
pub const APP_PATH_ENV: &str = "APP_PATH";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from default locations:
    /// 1. ./scout.yaml
    /// 2. ~/.scout/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<ScoutConfig, ConfigError> {
        let local_config = PathBuf::from("./scout.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".scout").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        debug!("No config file found, using defaults");
        Ok(ScoutConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<ScoutConfig, ConfigError> {
        info!("Loading config from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        let config: ScoutConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `DEVICE_NAME` / `APP_PATH` from the process environment.
    pub fn apply_env(config: ScoutConfig) -> ScoutConfig {
        Self::apply_overrides(
            config,
            std::env::var(DEVICE_NAME_ENV).ok(),
            std::env::var(APP_PATH_ENV).ok(),
        )
    }

    /// Apply explicit overrides; empty values are ignored.
    pub fn apply_overrides(
        mut config: ScoutConfig,
        device_name: Option<String>,
        app_path: Option<String>,
    ) -> ScoutConfig {
        if let Some(device) = device_name.filter(|d| !d.is_empty()) {
            config.appium = config.appium.with_device_name(device);
        }
        if let Some(app) = app_path.filter(|a| !a.is_empty()) {
            config.appium = config.appium.with_app_path(app);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{AppiumConfig, DeviceProfile};
    use crate::wait::WaitOptions;
    use std::time::Duration;

    #[tokio::test]
    async fn partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scout.yaml");
        std::fs::write(
            &path,
            "appium:\n  port: 4725\n  capabilities:\n    appium:deviceName: Pixel_7\nwait:\n  timeout_ms: 15000\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from(&path).await.unwrap();
        assert_eq!(config.appium.port, 4725);
        assert_eq!(config.appium.hostname, "localhost");
        assert_eq!(config.appium.capabilities.device_name, "Pixel_7");
        assert_eq!(config.appium.capabilities.automation_name, "UiAutomator2");
        assert!(config.appium.capabilities.auto_grant_permissions);
        assert_eq!(config.wait.timeout_ms, 15000);
        assert_eq!(config.wait.poll_interval_ms, 500);
        assert_eq!(config.screenshots.dir, PathBuf::from("screenshots"));

        let options = WaitOptions::from(&config.wait);
        assert_eq!(options.timeout, Duration::from_secs(15));
    }

    #[tokio::test]
    async fn malformed_yaml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scout.yaml");
        std::fs::write(&path, "appium: [1, 2").unwrap();
        let err = ConfigLoader::load_from(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = ConfigLoader::load_from(Path::new("/definitely/not/here.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn overrides_replace_device_and_app() {
        let config = ConfigLoader::apply_overrides(
            ScoutConfig::default(),
            Some("R58M123".into()),
            Some("/tmp/ApiDemos-debug.apk".into()),
        );
        assert_eq!(config.appium.capabilities.device_name, "R58M123");
        assert_eq!(config.appium.capabilities.app, "/tmp/ApiDemos-debug.apk");

        let untouched =
            ConfigLoader::apply_overrides(ScoutConfig::default(), Some(String::new()), None);
        assert_eq!(untouched.appium.capabilities.device_name, "emulator-5554");
    }

    #[test]
    fn capabilities_use_appium_prefix() {
        let caps = AppiumConfig::for_profile(DeviceProfile::Emulator)
            .with_app_path("/apps/ApiDemos.apk")
            .capabilities
            .to_json_map()
            .unwrap();
        assert_eq!(caps["platformName"], "Android");
        assert_eq!(caps["appium:app"], "/apps/ApiDemos.apk");
        assert_eq!(caps["appium:newCommandTimeout"], 300);
        assert!(!caps.contains_key("appium:appPackage"));
    }

    #[test]
    fn empty_app_is_omitted() {
        let caps = AppiumConfig::for_profile(DeviceProfile::Real)
            .capabilities
            .to_json_map()
            .unwrap();
        assert!(!caps.contains_key("appium:app"));
        assert_eq!(caps["appium:deviceName"], "REAL_DEVICE_ID");
    }

    #[test]
    fn server_url_from_host_and_port() {
        assert_eq!(AppiumConfig::default().server_url(), "http://localhost:4723");
    }
}
