//! Named end-to-end flows over the ApiDemos app.
//!
//! Each scenario drives one live session from the home list to a screen,
//! checks what it finds there, and captures screenshots along the way. A
//! failing step ends the scenario; the report carries the error text.

mod flows;

use crate::error::ScenarioError;
use scout_engine::screenshot::ScreenshotStore;
use scout_engine::{ScoutConfig, Session, WaitOptions};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    AccessibilityService,
    CustomView,
    ExternalStorage,
    HideShowAnimations,
    Linkify,
    AppLaunch,
}

impl Scenario {
    pub const ALL: [Scenario; 6] = [
        Scenario::AppLaunch,
        Scenario::AccessibilityService,
        Scenario::CustomView,
        Scenario::ExternalStorage,
        Scenario::HideShowAnimations,
        Scenario::Linkify,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::AccessibilityService => "accessibility-service",
            Scenario::CustomView => "custom-view",
            Scenario::ExternalStorage => "external-storage",
            Scenario::HideShowAnimations => "hide-show-animations",
            Scenario::Linkify => "linkify",
            Scenario::AppLaunch => "app-launch",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Scenario::AccessibilityService => {
                "Accessibility > Accessibility Service shows setup steps 1-8"
            }
            Scenario::CustomView => "Accessibility > Custom View shows its three instructions",
            Scenario::ExternalStorage => {
                "Content > Storage > External Storage enables Delete after each Create"
            }
            Scenario::HideShowAnimations => {
                "Animation > Hide-Show Animations hides buttons 0-3 and shows them again"
            }
            Scenario::Linkify => "Text > Linkify displays text1 through text4",
            Scenario::AppLaunch => "ApiDemos launches and its section list responds",
        }
    }

    /// Run the scenario to completion. Failures are reported, not returned.
    pub async fn run<S: Session + ?Sized>(
        self,
        session: &mut S,
        config: &ScoutConfig,
    ) -> ScenarioReport {
        info!("Running scenario: {}", self.name());
        let mut ctx = ScenarioContext::new(session, config);
        let outcome = match self {
            Scenario::AccessibilityService => flows::accessibility_service(&mut ctx).await,
            Scenario::CustomView => flows::custom_view(&mut ctx).await,
            Scenario::ExternalStorage => flows::external_storage(&mut ctx).await,
            Scenario::HideShowAnimations => flows::hide_show_animations(&mut ctx).await,
            Scenario::Linkify => flows::linkify(&mut ctx).await,
            Scenario::AppLaunch => flows::app_launch(&mut ctx).await,
        };
        let screenshots = ctx.into_screenshots();

        match outcome {
            Ok(()) => {
                info!("Scenario {} passed", self.name());
                ScenarioReport::passed(self, screenshots)
            }
            Err(e) => {
                error!("Scenario {} failed: {}", self.name(), e);
                ScenarioReport::failed(self, e.to_string()).with_screenshots(screenshots)
            }
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| ScenarioError::UnknownScenario(s.to_string()))
    }
}

/// Outcome of one scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub screenshots: Vec<PathBuf>,
}

impl ScenarioReport {
    pub fn passed(scenario: Scenario, screenshots: Vec<PathBuf>) -> Self {
        Self {
            name: scenario.name().to_string(),
            passed: true,
            message: None,
            screenshots,
        }
    }

    /// A failure with no screenshots, e.g. when the session never started.
    pub fn failed(scenario: Scenario, message: impl Into<String>) -> Self {
        Self {
            name: scenario.name().to_string(),
            passed: false,
            message: Some(message.into()),
            screenshots: Vec::new(),
        }
    }

    pub fn with_screenshots(mut self, screenshots: Vec<PathBuf>) -> Self {
        self.screenshots = screenshots;
        self
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "PASS" } else { "FAIL" };
        write!(f, "{} {}", status, self.name)?;
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

/// What a flow works with: the session, the config, and the screenshots
/// captured so far.
pub struct ScenarioContext<'a, S: Session + ?Sized> {
    session: &'a mut S,
    config: &'a ScoutConfig,
    store: ScreenshotStore,
    screenshots: Vec<PathBuf>,
}

impl<'a, S: Session + ?Sized> ScenarioContext<'a, S> {
    pub fn new(session: &'a mut S, config: &'a ScoutConfig) -> Self {
        Self {
            session,
            config,
            store: ScreenshotStore::from(&config.screenshots),
            screenshots: Vec::new(),
        }
    }

    pub fn session(&mut self) -> &mut S {
        &mut *self.session
    }

    pub fn config(&self) -> &ScoutConfig {
        self.config
    }

    pub fn wait(&self) -> WaitOptions {
        WaitOptions::from(&self.config.wait)
    }

    /// The configured polling with a named timeout from `timeouts`.
    pub fn wait_within(&self, timeout_ms: u64) -> WaitOptions {
        self.wait().with_timeout_ms(timeout_ms)
    }

    /// Capture a screenshot named `name`. A failed capture is logged and the
    /// flow carries on.
    pub async fn capture(&mut self, name: &str) {
        match self.store.capture(&mut *self.session, name).await {
            Ok(path) => self.screenshots.push(path),
            Err(e) => warn!("Screenshot '{}' not saved: {}", name, e),
        }
    }

    pub fn into_screenshots(self) -> Vec<PathBuf> {
        self.screenshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for scenario in Scenario::ALL {
            assert_eq!(scenario.name().parse::<Scenario>().unwrap(), scenario);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "settings".parse::<Scenario>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown scenario: settings");
    }

    #[test]
    fn report_display_includes_failure_message() {
        let report = ScenarioReport {
            name: "linkify".into(),
            passed: false,
            message: Some("Check failed: text3 missing".into()),
            screenshots: vec![],
        };
        assert_eq!(report.to_string(), "FAIL linkify: Check failed: text3 missing");
    }

    #[test]
    fn passing_report_omits_message_in_json() {
        let report = ScenarioReport {
            name: "app-launch".into(),
            passed: true,
            message: None,
            screenshots: vec![PathBuf::from("screenshots/app-launched.png")],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("message").is_none());
        assert_eq!(json["screenshots"][0], "screenshots/app-launched.png");
    }
}
