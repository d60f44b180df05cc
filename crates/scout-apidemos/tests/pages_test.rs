mod support;

use scout_apidemos::PageError;
use scout_apidemos::pages::{
    AccessibilityPage, AccessibilityServicePage, AnimationPage, ApiDemosPage, CustomViewPage, ExternalStoragePage,
    HideShowAnimationsPage, LinkifyPage,
};
use scout_common::error::SessionError;
use scout_common::locator::{LocatorStrategy, UiSelector};
use scout_common::protocol::ElementHandle;
use scout_engine::WaitOptions;
use scout_engine::testing::{FakeElement, FakeSession, Mutation};
use std::time::Duration;
use support::{api_demos, init_tracing};

fn wait() -> WaitOptions {
    WaitOptions::new()
        .with_timeout_ms(2_000)
        .with_poll_interval_ms(100)
}

#[tokio::test(start_paused = true)]
async fn menu_items_lists_visible_section_names() {
    init_tracing();
    let mut session = api_demos();
    let items = ApiDemosPage::new(&mut session, wait()).menu_items().await;
    assert_eq!(
        items,
        [
            "Access'ibility",
            "Accessibility",
            "Animation",
            "App",
            "Content",
            "Graphics",
            "Text",
            "Views"
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn app_launch_is_detected_once_list_appears() {
    init_tracing();
    let mut session = FakeSession::new();
    session.at(
        Duration::from_millis(1_500),
        Mutation::ReplaceScreen(support::home()),
    );
    let mut page = ApiDemosPage::new(&mut session, wait());
    assert!(page.verify_app_launched(5_000).await);
}

#[tokio::test(start_paused = true)]
async fn click_menu_item_scrolls_offscreen_entry_into_view() {
    init_tracing();
    let mut session = api_demos();
    session.apply(Mutation::SetDisplayed(ElementHandle::new("home-views"), false));

    ApiDemosPage::new(&mut session, wait())
        .click_menu_item("Views")
        .await
        .unwrap();

    assert_eq!(session.clicks(), [ElementHandle::new("home-views")]);
}

#[tokio::test(start_paused = true)]
async fn hide_button_tracks_the_tapped_element() {
    init_tracing();
    let mut session = api_demos();
    AnimationPage::new(&mut session, wait())
        .navigate_to_animation()
        .await
        .unwrap();
    AnimationPage::new(&mut session, wait())
        .navigate_to_hide_show_animations()
        .await
        .unwrap();

    let mut page = HideShowAnimationsPage::new(&mut session, wait());
    page.hide_button(0).await.unwrap();
    assert!(!page.is_button_visible(0).await);
    assert!(page.is_button_visible(1).await);
}

#[tokio::test(start_paused = true)]
async fn custom_view_falls_back_to_scanning_text_views() {
    init_tracing();
    let mut session = FakeSession::new();
    // Device rejects the textContains lookup; only the scan can find it.
    session.add(FakeElement::text_view(
        "Intro\\n1. Enable TalkBack\\n2. Enable Explore-by-Touch\\n3. Touch explore/poke the buttons",
    ));
    session.fail_strategy(
        LocatorStrategy::from(UiSelector::new().text_contains("1. Enable TalkBack")),
        SessionError::InvalidSelector {
            selector: "textContains".into(),
        },
    );

    let check = CustomViewPage::new(&mut session, wait())
        .verify_all_instructions()
        .await
        .unwrap();
    assert!(check.all_present());
}

#[tokio::test(start_paused = true)]
async fn custom_view_without_instructions_is_not_found() {
    init_tracing();
    let mut session = FakeSession::new();
    session.add(FakeElement::text_view("Something else"));

    let err = CustomViewPage::new(&mut session, wait())
        .instructional_text()
        .await
        .unwrap_err();
    assert!(matches!(err, PageError::NotFound(_)));
}

#[tokio::test(start_paused = true)]
async fn accessibility_menu_is_recognised() {
    init_tracing();
    let mut session = api_demos();
    let mut page = AccessibilityPage::new(&mut session, wait());
    assert!(!page.verify_accessibility_menu_displayed().await);
    page.navigate_to_accessibility().await.unwrap();
    assert!(page.verify_accessibility_menu_displayed().await);
}

#[tokio::test(start_paused = true)]
async fn delete_button_state_follows_create() {
    init_tracing();
    let mut session = FakeSession::new();
    session.apply(Mutation::ReplaceScreen(vec![
        ("create-0".into(), FakeElement::button("Create")),
        ("delete-0".into(), FakeElement::button("Delete").disabled()),
    ]));
    session.on_click(
        &ElementHandle::new("create-0"),
        vec![Mutation::SetEnabled(ElementHandle::new("delete-0"), true)],
    );

    let mut page = ExternalStoragePage::new(&mut session, wait());
    assert!(!page.is_delete_button_enabled(0).await.unwrap());
    assert!(!page.is_delete_button_enabled(5).await.unwrap());

    let result = page.validate_create_delete_flow(0).await.unwrap();
    assert!(result.create_success);
    assert!(result.delete_exists);
    assert!(result.delete_enabled);
}

#[tokio::test(start_paused = true)]
async fn linkify_rejects_unknown_text_element() {
    init_tracing();
    let mut session = api_demos();
    let mut page = LinkifyPage::new(&mut session, wait());
    let err = page.text_element(7).await.unwrap_err();
    assert_eq!(err.to_string(), "Text element 7 not found");
    assert!(!page.is_text_element_displayed(1).await);
}

#[tokio::test(start_paused = true)]
async fn service_steps_are_read_once_they_render() {
    init_tracing();
    let mut session = FakeSession::new();
    let steps = support::SERVICE_STEPS
        .iter()
        .enumerate()
        .map(|(i, step)| (format!("service-step-{}", i + 1), FakeElement::text_view(*step)))
        .collect();
    session.at(Duration::from_millis(1_500), Mutation::ReplaceScreen(steps));

    let results = AccessibilityServicePage::new(&mut session, wait())
        .verify_all_steps(8)
        .await
        .unwrap();
    assert_eq!(results, vec![true; 8]);
}

#[tokio::test(start_paused = true)]
async fn screen_without_numbered_steps_has_none() {
    init_tracing();
    let mut session = FakeSession::new();
    session.add(FakeElement::text_view("Nothing numbered here"));

    let mut page = AccessibilityServicePage::new(&mut session, wait());
    assert!(!page.verify_step_present(1).await.unwrap());
    assert_eq!(page.verify_all_steps(8).await.unwrap(), vec![false; 8]);
}
