//! In-memory [`Session`] for tests.
//!
//! `FakeSession` models a flat UI tree. Elements can be mutated directly, on
//! click, on back, or on a schedule measured with `tokio::time`, so waits can
//! be driven deterministically under a paused clock.

use crate::session::Session;
use async_trait::async_trait;
use regex::Regex;
use scout_common::error::SessionError;
use scout_common::locator::{LocatorStrategy, SelectorClause};
use scout_common::protocol::{ElementHandle, Orientation, Rect, WindowSize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use std::time::Duration;
use tokio::time::Instant;

pub const BUTTON: &str = "android.widget.Button";
pub const TEXT_VIEW: &str = "android.widget.TextView";

#[derive(Debug, Clone, PartialEq)]
pub struct FakeElement {
    pub class: String,
    pub text: String,
    pub resource_id: Option<String>,
    pub content_desc: Option<String>,
    pub displayed: bool,
    pub enabled: bool,
    pub rect: Rect,
}

impl FakeElement {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            text: String::new(),
            resource_id: None,
            content_desc: None,
            displayed: true,
            enabled: true,
            rect: Rect {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 50.0,
            },
        }
    }

    pub fn text_view(text: impl Into<String>) -> Self {
        Self::new(TEXT_VIEW).text(text)
    }

    pub fn button(text: impl Into<String>) -> Self {
        Self::new(BUTTON).text(text)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.content_desc = Some(desc.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    fn matches_resource_id(&self, wanted: &str) -> bool {
        self.resource_id
            .as_deref()
            .map(|rid| rid == wanted || rid.ends_with(&format!("/{}", wanted)))
            .unwrap_or(false)
    }

    fn matches_clause(&self, clause: &SelectorClause) -> bool {
        match clause {
            SelectorClause::Text(t) => self.text == *t,
            SelectorClause::TextContains(t) => self.text.contains(t.as_str()),
            SelectorClause::ResourceId(id) => self.matches_resource_id(id),
            SelectorClause::Description(d) => self.content_desc.as_deref() == Some(d.as_str()),
            SelectorClause::ClassName(c) => self.class == *c,
            // Scrollable containers are not modelled; instance is positional.
            SelectorClause::Scrollable(_) | SelectorClause::Instance(_) => true,
        }
    }
}

/// A change to the fake UI tree.
#[derive(Debug, Clone)]
pub enum Mutation {
    Add(FakeElement),
    AddKeyed(String, FakeElement),
    Remove(ElementHandle),
    SetDisplayed(ElementHandle, bool),
    SetEnabled(ElementHandle, bool),
    SetText(ElementHandle, String),
    /// Navigate: every current handle goes stale.
    ReplaceScreen(Vec<(String, FakeElement)>),
}

#[derive(Debug)]
pub struct FakeSession {
    ready: bool,
    elements: Vec<(ElementHandle, FakeElement)>,
    next_id: usize,
    started: Instant,
    scheduled: Vec<(Duration, Mutation)>,
    on_click: HashMap<ElementHandle, Vec<Mutation>>,
    on_back: Vec<Mutation>,
    failing: HashMap<LocatorStrategy, SessionError>,
    find_calls: usize,
    clicks: Vec<ElementHandle>,
    actions: Vec<serde_json::Value>,
    released: usize,
    screenshots: usize,
    back_presses: usize,
    window: WindowSize,
    keyboard_shown: bool,
    orientation: Orientation,
    activity: String,
    package: String,
    running_apps: HashSet<String>,
}

impl Default for FakeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSession {
    pub fn new() -> Self {
        Self {
            ready: true,
            elements: Vec::new(),
            next_id: 0,
            started: Instant::now(),
            scheduled: Vec::new(),
            on_click: HashMap::new(),
            on_back: Vec::new(),
            failing: HashMap::new(),
            find_calls: 0,
            clicks: Vec::new(),
            actions: Vec::new(),
            released: 0,
            screenshots: 0,
            back_presses: 0,
            window: WindowSize {
                width: 1080,
                height: 1920,
            },
            keyboard_shown: false,
            orientation: Orientation::Portrait,
            activity: ".ApiDemos".to_string(),
            package: "io.appium.android.apis".to_string(),
            running_apps: HashSet::from(["io.appium.android.apis".to_string()]),
        }
    }

    /// A session that must be launched before use.
    pub fn offline() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }

    pub fn add(&mut self, element: FakeElement) -> ElementHandle {
        self.next_id += 1;
        let handle = ElementHandle::new(format!("el-{}", self.next_id));
        self.elements.push((handle.clone(), element));
        handle
    }

    pub fn add_keyed(&mut self, key: &str, element: FakeElement) -> ElementHandle {
        let handle = ElementHandle::new(key);
        self.elements.push((handle.clone(), element));
        handle
    }

    pub fn element(&self, handle: &ElementHandle) -> Option<&FakeElement> {
        self.elements
            .iter()
            .find(|(h, _)| h == handle)
            .map(|(_, e)| e)
    }

    /// Apply `mutation` once `delay` has elapsed since the session was created.
    pub fn at(&mut self, delay: Duration, mutation: Mutation) {
        self.scheduled.push((delay, mutation));
    }

    pub fn on_click(&mut self, handle: &ElementHandle, mutations: Vec<Mutation>) {
        self.on_click.insert(handle.clone(), mutations);
    }

    pub fn on_back(&mut self, mutations: Vec<Mutation>) {
        self.on_back = mutations;
    }

    pub fn fail_strategy(&mut self, strategy: LocatorStrategy, error: SessionError) {
        self.failing.insert(strategy, error);
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window = WindowSize { width, height };
    }

    pub fn show_keyboard(&mut self) {
        self.keyboard_shown = true;
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls
    }

    pub fn clicks(&self) -> &[ElementHandle] {
        &self.clicks
    }

    pub fn performed_actions(&self) -> &[serde_json::Value] {
        &self.actions
    }

    pub fn released_actions(&self) -> usize {
        self.released
    }

    pub fn screenshots_taken(&self) -> usize {
        self.screenshots
    }

    pub fn back_presses(&self) -> usize {
        self.back_presses
    }

    pub fn running_apps(&self) -> &HashSet<String> {
        &self.running_apps
    }

    pub fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::Add(element) => {
                self.add(element);
            }
            Mutation::AddKeyed(key, element) => {
                self.add_keyed(&key, element);
            }
            Mutation::Remove(handle) => self.elements.retain(|(h, _)| *h != handle),
            Mutation::SetDisplayed(handle, displayed) => {
                if let Some(el) = self.element_mut(&handle) {
                    el.displayed = displayed;
                }
            }
            Mutation::SetEnabled(handle, enabled) => {
                if let Some(el) = self.element_mut(&handle) {
                    el.enabled = enabled;
                }
            }
            Mutation::SetText(handle, text) => {
                if let Some(el) = self.element_mut(&handle) {
                    el.text = text;
                }
            }
            Mutation::ReplaceScreen(elements) => {
                self.elements = elements
                    .into_iter()
                    .map(|(key, el)| (ElementHandle::new(key), el))
                    .collect();
            }
        }
    }

    fn element_mut(&mut self, handle: &ElementHandle) -> Option<&mut FakeElement> {
        self.elements
            .iter_mut()
            .find(|(h, _)| h == handle)
            .map(|(_, e)| e)
    }

    /// Apply every scheduled mutation that is due.
    fn sync(&mut self) {
        let elapsed = self.started.elapsed();
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.scheduled)
            .into_iter()
            .partition(|(at, _)| *at <= elapsed);
        self.scheduled = pending;
        for (_, mutation) in due {
            self.apply(mutation);
        }
    }

    fn ensure_ready(&mut self) -> Result<(), SessionError> {
        if !self.ready {
            return Err(SessionError::NotReady);
        }
        self.sync();
        Ok(())
    }

    fn live(&self, handle: &ElementHandle) -> Result<&FakeElement, SessionError> {
        self.element(handle)
            .ok_or_else(|| SessionError::StaleElement(handle.to_string()))
    }

    fn matching(&self, strategy: &LocatorStrategy) -> Result<Vec<ElementHandle>, SessionError> {
        let all = self.elements.iter();
        let found = match strategy {
            LocatorStrategy::AccessibilityId(v) => all
                .filter(|(_, e)| e.content_desc.as_deref() == Some(v.as_str()))
                .map(|(h, _)| h.clone())
                .collect(),
            LocatorStrategy::ResourceId(v) => all
                .filter(|(_, e)| e.matches_resource_id(v))
                .map(|(h, _)| h.clone())
                .collect(),
            LocatorStrategy::ClassName(v) => all
                .filter(|(_, e)| e.class == *v)
                .map(|(h, _)| h.clone())
                .collect(),
            LocatorStrategy::TextEquals(v) => all
                .filter(|(_, e)| e.text == *v)
                .map(|(h, _)| h.clone())
                .collect(),
            LocatorStrategy::TextContains(v) => all
                .filter(|(_, e)| e.text.contains(v.as_str()))
                .map(|(h, _)| h.clone())
                .collect(),
            LocatorStrategy::UiAutomator(expr) => {
                let clauses = parse_ui_automator(expr)?;
                let instance = clauses.iter().rev().find_map(|c| match c {
                    SelectorClause::Instance(i) => Some(*i),
                    _ => None,
                });
                let hits = all
                    .filter(|(_, e)| clauses.iter().all(|c| e.matches_clause(c)))
                    .map(|(h, _)| h.clone());
                match instance {
                    Some(i) => hits.skip(i).take(1).collect(),
                    None => hits.collect(),
                }
            }
        };
        Ok(found)
    }

    fn render_source(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\" ?>\n<hierarchy rotation=\"0\">\n",
        );
        for (index, (_, el)) in self.elements.iter().enumerate() {
            xml.push_str(&format!(
                "  <{class} index=\"{index}\" class=\"{class}\" text=\"{text}\" resource-id=\"{rid}\" content-desc=\"{desc}\" enabled=\"{enabled}\" displayed=\"{displayed}\" />\n",
                class = el.class,
                index = index,
                text = xml_escape(&el.text),
                rid = xml_escape(el.resource_id.as_deref().unwrap_or("")),
                desc = xml_escape(el.content_desc.as_deref().unwrap_or("")),
                enabled = el.enabled,
                displayed = el.displayed,
            ));
        }
        xml.push_str("</hierarchy>\n");
        xml
    }
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn clause_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\.(\w+)\((?:"((?:[^"\\]|\\.)*)"|(\d+)|(true|false))\)"#)
            .unwrap_or_else(|e| panic!("clause regex: {}", e))
    })
}

/// Parse the subset of `UiSelector` / `UiScrollable` syntax that
/// [`scout_common::UiSelector`] produces.
pub fn parse_ui_automator(expr: &str) -> Result<Vec<SelectorClause>, SessionError> {
    let invalid = || SessionError::InvalidSelector {
        selector: expr.to_string(),
    };

    let expr = expr.trim();
    let selector = if expr.starts_with("new UiScrollable(") {
        let start = expr.find(".scrollIntoView(").ok_or_else(invalid)? + ".scrollIntoView(".len();
        expr[start..].strip_suffix(')').ok_or_else(invalid)?
    } else {
        expr
    };

    let mut rest = selector.strip_prefix("new UiSelector()").ok_or_else(invalid)?;
    let mut clauses = Vec::new();
    while !rest.is_empty() {
        let caps = clause_regex().captures(rest).ok_or_else(invalid)?;
        let whole = caps.get(0).ok_or_else(invalid)?;
        let method = &caps[1];
        let string_arg = caps
            .get(2)
            .map(|m| m.as_str().replace("\\\"", "\"").replace("\\\\", "\\"));
        let number_arg = caps.get(3).and_then(|m| m.as_str().parse::<usize>().ok());
        let bool_arg = caps.get(4).map(|m| m.as_str() == "true");

        let clause = match (method, string_arg, number_arg, bool_arg) {
            ("text", Some(s), _, _) => SelectorClause::Text(s),
            ("textContains", Some(s), _, _) => SelectorClause::TextContains(s),
            ("resourceId", Some(s), _, _) => SelectorClause::ResourceId(s),
            ("description", Some(s), _, _) => SelectorClause::Description(s),
            ("className", Some(s), _, _) => SelectorClause::ClassName(s),
            ("instance", _, Some(n), _) => SelectorClause::Instance(n),
            ("scrollable", _, _, Some(b)) => SelectorClause::Scrollable(b),
            _ => return Err(invalid()),
        };
        clauses.push(clause);
        rest = &rest[whole.end()..];
    }
    Ok(clauses)
}

#[async_trait]
impl Session for FakeSession {
    async fn launch(&mut self) -> Result<(), SessionError> {
        self.ready = true;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.ready = false;
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.ready
    }

    async fn find_elements(
        &mut self,
        strategy: &LocatorStrategy,
    ) -> Result<Vec<ElementHandle>, SessionError> {
        self.ensure_ready()?;
        self.find_calls += 1;
        if let Some(err) = self.failing.get(strategy) {
            return Err(err.clone());
        }
        self.matching(strategy)
    }

    async fn is_displayed(&mut self, element: &ElementHandle) -> Result<bool, SessionError> {
        self.ensure_ready()?;
        Ok(self.live(element)?.displayed)
    }

    async fn is_enabled(&mut self, element: &ElementHandle) -> Result<bool, SessionError> {
        self.ensure_ready()?;
        Ok(self.live(element)?.enabled)
    }

    async fn text(&mut self, element: &ElementHandle) -> Result<String, SessionError> {
        self.ensure_ready()?;
        Ok(self.live(element)?.text.clone())
    }

    async fn click(&mut self, element: &ElementHandle) -> Result<(), SessionError> {
        self.ensure_ready()?;
        self.live(element)?;
        self.clicks.push(element.clone());
        if let Some(mutations) = self.on_click.get(element).cloned() {
            for mutation in mutations {
                self.apply(mutation);
            }
        }
        Ok(())
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, SessionError> {
        self.ensure_ready()?;
        self.screenshots += 1;
        Ok(b"\x89PNG\r\n\x1a\nfake".to_vec())
    }

    async fn set_value(&mut self, element: &ElementHandle, text: &str) -> Result<(), SessionError> {
        self.ensure_ready()?;
        self.live(element)?;
        self.apply(Mutation::SetText(element.clone(), text.to_string()));
        Ok(())
    }

    async fn element_rect(&mut self, element: &ElementHandle) -> Result<Rect, SessionError> {
        self.ensure_ready()?;
        Ok(self.live(element)?.rect)
    }

    async fn scroll_into_view(&mut self, strategy: &LocatorStrategy) -> Result<(), SessionError> {
        self.ensure_ready()?;
        let handle = self
            .matching(strategy)?
            .into_iter()
            .next()
            .ok_or_else(|| SessionError::NoSuchElement(strategy.to_string()))?;
        self.apply(Mutation::SetDisplayed(handle, true));
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String, SessionError> {
        self.ensure_ready()?;
        Ok(self.render_source())
    }

    async fn window_size(&mut self) -> Result<WindowSize, SessionError> {
        self.ensure_ready()?;
        Ok(self.window)
    }

    async fn perform_actions(&mut self, actions: serde_json::Value) -> Result<(), SessionError> {
        self.ensure_ready()?;
        self.actions.push(actions);
        Ok(())
    }

    async fn release_actions(&mut self) -> Result<(), SessionError> {
        self.ensure_ready()?;
        self.released += 1;
        Ok(())
    }

    async fn back(&mut self) -> Result<(), SessionError> {
        self.ensure_ready()?;
        self.back_presses += 1;
        for mutation in std::mem::take(&mut self.on_back) {
            self.apply(mutation);
        }
        Ok(())
    }

    async fn hide_keyboard(&mut self) -> Result<(), SessionError> {
        self.ensure_ready()?;
        if !self.keyboard_shown {
            return Err(SessionError::Command {
                command: "hide_keyboard".into(),
                message: "Soft keyboard not present, cannot hide keyboard".into(),
            });
        }
        self.keyboard_shown = false;
        Ok(())
    }

    async fn is_keyboard_shown(&mut self) -> Result<bool, SessionError> {
        self.ensure_ready()?;
        Ok(self.keyboard_shown)
    }

    async fn orientation(&mut self) -> Result<Orientation, SessionError> {
        self.ensure_ready()?;
        Ok(self.orientation)
    }

    async fn set_orientation(&mut self, orientation: Orientation) -> Result<(), SessionError> {
        self.ensure_ready()?;
        self.orientation = orientation;
        Ok(())
    }

    async fn current_activity(&mut self) -> Result<String, SessionError> {
        self.ensure_ready()?;
        Ok(self.activity.clone())
    }

    async fn current_package(&mut self) -> Result<String, SessionError> {
        self.ensure_ready()?;
        Ok(self.package.clone())
    }

    async fn activate_app(&mut self, app_id: &str) -> Result<(), SessionError> {
        self.ensure_ready()?;
        self.running_apps.insert(app_id.to_string());
        self.package = app_id.to_string();
        Ok(())
    }

    async fn terminate_app(&mut self, app_id: &str) -> Result<(), SessionError> {
        self.ensure_ready()?;
        self.running_apps.remove(app_id);
        Ok(())
    }

    async fn device_time(&mut self) -> Result<String, SessionError> {
        self.ensure_ready()?;
        Ok("2026-10-16T09:30:00+00:00".to_string())
    }
}
