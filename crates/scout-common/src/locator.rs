use serde::{Deserialize, Serialize};
use std::fmt;

/// A single way of addressing a UI element.
///
/// Strategies carry no identity beyond their tag and value; two strategies with
/// the same tag and value are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "using", content = "value", rename_all = "snake_case")]
pub enum LocatorStrategy {
    /// Accessibility label (`content-desc` on Android).
    AccessibilityId(String),
    /// Android resource id, either fully qualified (`pkg:id/name`) or bare.
    ResourceId(String),
    /// Raw `UiSelector` / `UiScrollable` expression.
    UiAutomator(String),
    /// Widget class, e.g. `android.widget.TextView`.
    ClassName(String),
    /// Exact visible text.
    TextEquals(String),
    /// Visible text containing the value.
    TextContains(String),
}

impl LocatorStrategy {
    pub fn accessibility_id(value: impl Into<String>) -> Self {
        Self::AccessibilityId(value.into())
    }

    pub fn resource_id(value: impl Into<String>) -> Self {
        Self::ResourceId(value.into())
    }

    pub fn ui_automator(value: impl Into<String>) -> Self {
        Self::UiAutomator(value.into())
    }

    pub fn class_name(value: impl Into<String>) -> Self {
        Self::ClassName(value.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::TextEquals(value.into())
    }

    pub fn text_contains(value: impl Into<String>) -> Self {
        Self::TextContains(value.into())
    }

    /// Short tag used in logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AccessibilityId(_) => "accessibility id",
            Self::ResourceId(_) => "resource id",
            Self::UiAutomator(_) => "uiautomator",
            Self::ClassName(_) => "class name",
            Self::TextEquals(_) => "text",
            Self::TextContains(_) => "text contains",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::AccessibilityId(v)
            | Self::ResourceId(v)
            | Self::UiAutomator(v)
            | Self::ClassName(v)
            | Self::TextEquals(v)
            | Self::TextContains(v) => v,
        }
    }
}

impl fmt::Display for LocatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind(), self.value())
    }
}

impl From<UiSelector> for LocatorStrategy {
    fn from(selector: UiSelector) -> Self {
        Self::UiAutomator(selector.to_string())
    }
}

/// One clause of a `UiSelector` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorClause {
    Text(String),
    TextContains(String),
    ResourceId(String),
    Description(String),
    ClassName(String),
    Instance(usize),
    Scrollable(bool),
}

/// Builder for Android `UiSelector` expressions.
///
/// ```
/// use scout_common::UiSelector;
/// let expr = UiSelector::new().text("Create").instance(1).to_string();
/// assert_eq!(expr, r#"new UiSelector().text("Create").instance(1)"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiSelector {
    clauses: Vec<SelectorClause>,
}

impl UiSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.with(SelectorClause::Text(text.into()))
    }

    pub fn text_contains(self, text: impl Into<String>) -> Self {
        self.with(SelectorClause::TextContains(text.into()))
    }

    pub fn resource_id(self, id: impl Into<String>) -> Self {
        self.with(SelectorClause::ResourceId(id.into()))
    }

    pub fn description(self, desc: impl Into<String>) -> Self {
        self.with(SelectorClause::Description(desc.into()))
    }

    pub fn class_name(self, class: impl Into<String>) -> Self {
        self.with(SelectorClause::ClassName(class.into()))
    }

    pub fn instance(self, index: usize) -> Self {
        self.with(SelectorClause::Instance(index))
    }

    pub fn scrollable(self, scrollable: bool) -> Self {
        self.with(SelectorClause::Scrollable(scrollable))
    }

    pub fn clauses(&self) -> &[SelectorClause] {
        &self.clauses
    }

    fn with(mut self, clause: SelectorClause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// `UiScrollable` expression that scrolls the first scrollable container
    /// until `target` is on screen.
    pub fn scroll_into_view(target: &UiSelector) -> String {
        format!(
            "new UiScrollable({}).scrollIntoView({})",
            UiSelector::new().scrollable(true),
            target
        )
    }
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

impl fmt::Display for UiSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("new UiSelector()")?;
        for clause in &self.clauses {
            match clause {
                SelectorClause::Text(v) => write!(f, ".text({})", quoted(v))?,
                SelectorClause::TextContains(v) => write!(f, ".textContains({})", quoted(v))?,
                SelectorClause::ResourceId(v) => write!(f, ".resourceId({})", quoted(v))?,
                SelectorClause::Description(v) => write!(f, ".description({})", quoted(v))?,
                SelectorClause::ClassName(v) => write!(f, ".className({})", quoted(v))?,
                SelectorClause::Instance(i) => write!(f, ".instance({})", i)?,
                SelectorClause::Scrollable(b) => write!(f, ".scrollable({})", b)?,
            }
        }
        Ok(())
    }
}
