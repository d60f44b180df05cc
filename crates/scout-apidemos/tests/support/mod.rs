//! A scripted stand-in for the ApiDemos app on top of `FakeSession`.
//!
//! Every screen is a flat list of keyed elements. Tapping a menu entry swaps
//! the whole screen, so handles from the previous screen go stale the way
//! they do on a device.

#![allow(dead_code)]

use scout_common::protocol::ElementHandle;
use scout_engine::ScoutConfig;
use scout_engine::testing::{FakeElement, FakeSession, Mutation};
use std::path::Path;

pub const PACKAGE: &str = "io.appium.android.apis";

pub const SERVICE_STEPS: [&str; 8] = [
    "1. Enable ClockBack",
    "2. Enable TalkBack",
    "3. Enable Explore by Touch",
    "4. Enable accessibility from web scripts",
    "5. Enable accessibility from the shell",
    "6. Enable accessibility from the shell by printing the event text",
    "7. Query the content provider from the shell",
    "8. Query the settings from the shell",
];

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Config with screenshots under `dir` and short waits.
pub fn test_config(dir: &Path) -> ScoutConfig {
    let mut config = ScoutConfig::default();
    config.screenshots.dir = dir.to_path_buf();
    config.wait.timeout_ms = 2_000;
    config.wait.poll_interval_ms = 100;
    config.timeouts.short = 1_000;
    config.timeouts.medium = 2_000;
    config.timeouts.long = 3_000;
    config.timeouts.very_long = 4_000;
    config
}

fn entry(text: &str) -> FakeElement {
    FakeElement::text_view(text).desc(text)
}

fn handle(key: &str) -> ElementHandle {
    ElementHandle::new(key)
}

fn screen(elements: Vec<(&str, FakeElement)>) -> Vec<(String, FakeElement)> {
    elements
        .into_iter()
        .map(|(key, el)| (key.to_string(), el))
        .collect()
}

pub fn home() -> Vec<(String, FakeElement)> {
    screen(vec![
        ("home-list", FakeElement::new("android.widget.ListView")),
        ("home-access-prime", entry("Access'ibility")),
        ("home-accessibility", entry("Accessibility")),
        ("home-animation", entry("Animation")),
        ("home-app", entry("App")),
        ("home-content", entry("Content")),
        ("home-graphics", entry("Graphics")),
        ("home-text", entry("Text")),
        ("home-views", entry("Views")),
    ])
}

fn access_prime() -> Vec<(String, FakeElement)> {
    screen(vec![(
        "prime-body",
        FakeElement::text_view("Accessibility with a quote in the label"),
    )])
}

fn accessibility_menu() -> Vec<(String, FakeElement)> {
    screen(vec![
        ("acc-node-provider", entry("Accessibility Node Provider")),
        ("acc-node-querying", entry("Accessibility Node Querying")),
        ("acc-service", entry("Accessibility Service")),
        ("acc-custom-view", entry("Custom View")),
    ])
}

fn accessibility_service() -> Vec<(String, FakeElement)> {
    SERVICE_STEPS
        .iter()
        .enumerate()
        .map(|(i, step)| (format!("service-step-{}", i + 1), FakeElement::text_view(*step)))
        .collect()
}

fn custom_view() -> Vec<(String, FakeElement)> {
    screen(vec![
        (
            "custom-instructions",
            FakeElement::text_view(
                "1. Enable TalkBack\n2. Enable Explore-by-Touch\n3. Touch explore/poke the buttons",
            ),
        ),
        ("custom-button", FakeElement::button("")),
    ])
}

fn animation_menu() -> Vec<(String, FakeElement)> {
    screen(vec![
        ("anim-bouncing", entry("Bouncing Balls")),
        ("anim-hide-show", entry("Hide-Show Animations")),
    ])
}

fn hide_show() -> Vec<(String, FakeElement)> {
    let mut elements = vec![(
        "show-buttons".to_string(),
        FakeElement::button("Show Buttons"),
    )];
    for id in 0..4 {
        elements.push((
            format!("button-{}", id),
            FakeElement::button(id.to_string())
                .resource_id(format!("{}:id/button{}", PACKAGE, id)),
        ));
    }
    elements
}

fn content_menu() -> Vec<(String, FakeElement)> {
    screen(vec![
        ("content-assets", entry("Assets")),
        ("content-storage", entry("Storage")),
    ])
}

fn storage_menu() -> Vec<(String, FakeElement)> {
    screen(vec![("storage-external", entry("External Storage"))])
}

fn external_storage() -> Vec<(String, FakeElement)> {
    let mut elements = Vec::new();
    for i in 0..3 {
        elements.push((format!("create-{}", i), FakeElement::button("Create")));
        elements.push((format!("delete-{}", i), FakeElement::button("Delete").disabled()));
    }
    elements
}

fn text_menu() -> Vec<(String, FakeElement)> {
    screen(vec![
        ("text-keyevent", entry("KeyEventText")),
        ("text-linkify", entry("Linkify")),
    ])
}

fn linkify() -> Vec<(String, FakeElement)> {
    [
        "text1: http://www.google.com",
        "text2: email me at someone@example.com",
        "text3: call 555-1212",
        "text4: visit www.android.com",
    ]
    .iter()
    .enumerate()
    .map(|(i, text)| {
        let key = format!("linkify-text{}", i + 1);
        let el = FakeElement::text_view(*text)
            .resource_id(format!("{}:id/text{}", PACKAGE, i + 1));
        (key, el)
    })
    .collect()
}

/// A session sitting on the ApiDemos home list with every navigation path
/// the scenarios use wired up.
pub fn api_demos() -> FakeSession {
    let mut session = FakeSession::new();
    session.apply(Mutation::ReplaceScreen(home()));

    let navigation = [
        ("home-access-prime", access_prime()),
        ("home-accessibility", accessibility_menu()),
        ("home-animation", animation_menu()),
        ("home-content", content_menu()),
        ("home-text", text_menu()),
        ("acc-service", accessibility_service()),
        ("acc-custom-view", custom_view()),
        ("anim-hide-show", hide_show()),
        ("content-storage", storage_menu()),
        ("storage-external", external_storage()),
        ("text-linkify", linkify()),
    ];
    for (key, next) in navigation {
        session.on_click(&handle(key), vec![Mutation::ReplaceScreen(next)]);
    }
    session.on_back(vec![Mutation::ReplaceScreen(home())]);

    for id in 0..4 {
        let button = handle(&format!("button-{}", id));
        session.on_click(&button, vec![Mutation::SetDisplayed(button.clone(), false)]);
    }
    session.on_click(
        &handle("show-buttons"),
        (0..4)
            .map(|id| Mutation::SetDisplayed(handle(&format!("button-{}", id)), true))
            .collect(),
    );

    for i in 0..3 {
        session.on_click(
            &handle(&format!("create-{}", i)),
            vec![Mutation::SetEnabled(handle(&format!("delete-{}", i)), true)],
        );
    }
    session
}
