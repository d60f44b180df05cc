//! Raw W3C / Appium commands issued through fantoccini.
//!
//! fantoccini covers the browser subset of WebDriver; Appium's mobile
//! strategies and `/appium/device/*` endpoints go through [`AppiumCommand`].

use fantoccini::wd::WebDriverCompatibleCommand;
use http::Method;
use scout_common::error::SessionError;
use scout_common::locator::{LocatorStrategy, UiSelector};
use scout_common::protocol::ElementHandle;
use serde_json::{Value, json};

/// W3C element reference key.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52f-4a07b4d4b0c3";

/// Legacy JSONWP element reference key, still sent by some drivers.
const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// A session-scoped command: `{method} /session/{id}/{path}`.
#[derive(Debug, Clone)]
pub struct AppiumCommand {
    method: Method,
    path: String,
    body: Option<Value>,
}

impl AppiumCommand {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    /// POST with a JSON body. WebDriver requires a body even when empty.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            body: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// `POST elements` for `strategy`.
    pub fn find_elements(strategy: &LocatorStrategy) -> Self {
        let (using, value) = wire_locator(strategy);
        Self::post("elements", json!({ "using": using, "value": value }))
    }

    pub fn element(element: &ElementHandle, attribute: &str) -> Self {
        Self::get(format!("element/{}/{}", element.id(), attribute))
    }
}

impl WebDriverCompatibleCommand for AppiumCommand {
    fn endpoint(
        &self,
        base_url: &url::Url,
        session_id: Option<&str>,
    ) -> Result<url::Url, url::ParseError> {
        let base = match session_id {
            Some(id) => base_url.join(&format!("session/{}/", id))?,
            None => base_url.clone(),
        };
        base.join(&self.path)
    }

    fn method_and_body(&self, _request_url: &url::Url) -> (Method, Option<String>) {
        let body = match &self.body {
            Some(body) => Some(body.to_string()),
            None if self.method == Method::POST => Some("{}".to_string()),
            None => None,
        };
        (self.method.clone(), body)
    }
}

/// Appium `using` / `value` pair for a strategy.
///
/// Text strategies have no native Appium equivalent and are sent as XPath.
pub fn wire_locator(strategy: &LocatorStrategy) -> (&'static str, String) {
    match strategy {
        LocatorStrategy::AccessibilityId(v) => ("accessibility id", v.clone()),
        LocatorStrategy::ResourceId(v) => ("id", v.clone()),
        LocatorStrategy::UiAutomator(v) => ("-android uiautomator", v.clone()),
        LocatorStrategy::ClassName(v) => ("class name", v.clone()),
        LocatorStrategy::TextEquals(v) => ("xpath", format!("//*[@text={}]", xpath_literal(v))),
        LocatorStrategy::TextContains(v) => (
            "xpath",
            format!("//*[contains(@text, {})]", xpath_literal(v)),
        ),
    }
}

/// Quote `value` as an XPath 1.0 string literal.
///
/// XPath 1.0 has no escape syntax, so a value holding both quote kinds is
/// assembled with `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }
    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// `UiScrollable` expression that scrolls until `strategy` matches.
pub fn scroll_expression(strategy: &LocatorStrategy) -> String {
    let target = match strategy {
        LocatorStrategy::AccessibilityId(v) => UiSelector::new().description(v.as_str()),
        LocatorStrategy::ResourceId(v) => UiSelector::new().resource_id(v.as_str()),
        LocatorStrategy::ClassName(v) => UiSelector::new().class_name(v.as_str()),
        LocatorStrategy::TextEquals(v) => UiSelector::new().text(v.as_str()),
        LocatorStrategy::TextContains(v) => UiSelector::new().text_contains(v.as_str()),
        LocatorStrategy::UiAutomator(expr) => {
            return format!(
                "new UiScrollable({}).scrollIntoView({})",
                UiSelector::new().scrollable(true),
                expr
            );
        }
    };
    UiSelector::scroll_into_view(&target)
}

/// Extract the element id from a W3C element reference.
pub fn element_handle(value: &Value) -> Option<ElementHandle> {
    value
        .get(ELEMENT_KEY)
        .or_else(|| value.get(LEGACY_ELEMENT_KEY))
        .and_then(Value::as_str)
        .map(ElementHandle::new)
}

/// Decode the `value` of a `POST elements` response.
pub fn element_handles(command: &str, value: &Value) -> Result<Vec<ElementHandle>, SessionError> {
    let items = value
        .as_array()
        .ok_or_else(|| SessionError::UnexpectedResponse {
            command: command.to_string(),
            detail: format!("expected an array, got {}", value),
        })?;
    items
        .iter()
        .map(|item| {
            element_handle(item).ok_or_else(|| SessionError::UnexpectedResponse {
                command: command.to_string(),
                detail: format!("not an element reference: {}", item),
            })
        })
        .collect()
}

pub fn expect_bool(command: &str, value: &Value) -> Result<bool, SessionError> {
    value
        .as_bool()
        .ok_or_else(|| SessionError::UnexpectedResponse {
            command: command.to_string(),
            detail: format!("expected a boolean, got {}", value),
        })
}

pub fn expect_string(command: &str, value: &Value) -> Result<String, SessionError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| SessionError::UnexpectedResponse {
            command: command.to_string(),
            detail: format!("expected a string, got {}", value),
        })
}
