use super::ScenarioContext;
use crate::error::ScenarioError;
use crate::pages::accessibility::SERVICE_STEPS;
use crate::pages::animation::BUTTON_IDS;
use crate::pages::api_demos::LIST_VIEW;
use crate::pages::{
    AccessibilityPage, AccessibilityServicePage, AnimationPage, ApiDemosPage, ContentPage,
    CustomViewPage, ExternalStoragePage, HideShowAnimationsPage, LinkifyPage, StoragePage,
};
use scout_common::locator::{LocatorStrategy, UiSelector};
use scout_engine::assertions;
use scout_engine::{Device, LocatorChain, Session};
use tracing::info;

/// Create/Delete pairs on the External Storage screen.
const STORAGE_PAIRS: usize = 3;

pub(super) async fn app_launch<S: Session + ?Sized>(
    ctx: &mut ScenarioContext<'_, S>,
) -> Result<(), ScenarioError> {
    let wait = ctx.wait();
    let launch_timeout = ctx.config().timeouts.long;

    info!("Step 1: Verify app launched");
    if !ApiDemosPage::new(ctx.session(), wait)
        .verify_app_launched(launch_timeout)
        .await
    {
        return Err(ScenarioError::Check(format!(
            "section list not visible within {}ms",
            launch_timeout
        )));
    }
    ctx.capture("app-launched").await;

    let mut device = Device::new(ctx.session());
    let activity = device
        .current_activity()
        .await
        .map_err(ScenarioError::step("read current activity"))?;
    let package = device
        .current_package()
        .await
        .map_err(ScenarioError::step("read current package"))?;
    info!("Current activity: {}", activity);
    info!("Current package: {}", package);
    if activity.is_empty() || package.is_empty() {
        return Err(ScenarioError::Check(
            "current activity or package is empty".into(),
        ));
    }

    info!("Step 2: Open a section and come back");
    let mut home = ApiDemosPage::new(ctx.session(), wait);
    if !home.find_menu_item_containing("Access").await {
        return Err(ScenarioError::Check(
            "no menu item containing \"Access\"".into(),
        ));
    }
    let access = LocatorChain::named("item containing 'Access'")
        .or(UiSelector::new().text_contains("Access"));
    home.base()
        .click(&access)
        .await
        .map_err(ScenarioError::step("open Access section"))?;
    Device::new(ctx.session())
        .press_back()
        .await
        .map_err(ScenarioError::step("return to section list"))?;

    info!("Step 3: Read the section list");
    let list = LocatorChain::named("section list").or(LocatorStrategy::class_name(LIST_VIEW));
    let mut home = ApiDemosPage::new(ctx.session(), wait);
    home.base()
        .wait_for_element(&list, None)
        .await
        .map_err(ScenarioError::step("section list after back"))?;
    let items = home.menu_items().await;
    info!("Found {} menu items", items.len());
    if items.is_empty() {
        return Err(ScenarioError::Check("section list has no items".into()));
    }
    ctx.capture("list-view").await;
    Ok(())
}

pub(super) async fn accessibility_service<S: Session + ?Sized>(
    ctx: &mut ScenarioContext<'_, S>,
) -> Result<(), ScenarioError> {
    let wait = ctx.wait();

    AccessibilityPage::new(ctx.session(), wait)
        .navigate_to_accessibility()
        .await
        .map_err(ScenarioError::step("navigate to Accessibility"))?;
    ctx.capture("accessibility-menu").await;

    AccessibilityPage::new(ctx.session(), wait)
        .navigate_to_accessibility_service()
        .await
        .map_err(ScenarioError::step("navigate to Accessibility Service"))?;
    ctx.capture("accessibility-service").await;

    info!("Step 3: Validate steps 1-{} are visible", SERVICE_STEPS);
    let steps_wait = ctx.wait_within(ctx.config().timeouts.medium);
    let mut page = AccessibilityServicePage::new(ctx.session(), steps_wait);
    let results = page
        .verify_all_steps(SERVICE_STEPS)
        .await
        .map_err(ScenarioError::step("read service steps"))?;
    for text in page
        .step_texts()
        .await
        .map_err(ScenarioError::step("read service step texts"))?
    {
        info!("  {}", text);
    }

    let missing: Vec<String> = results
        .iter()
        .enumerate()
        .filter(|(_, found)| !**found)
        .map(|(index, _)| (index + 1).to_string())
        .collect();
    info!("Found: {}/{} steps", results.len() - missing.len(), SERVICE_STEPS);
    if !missing.is_empty() {
        return Err(ScenarioError::Check(format!(
            "steps not found: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

pub(super) async fn custom_view<S: Session + ?Sized>(
    ctx: &mut ScenarioContext<'_, S>,
) -> Result<(), ScenarioError> {
    let wait = ctx.wait();

    AccessibilityPage::new(ctx.session(), wait)
        .navigate_to_accessibility()
        .await
        .map_err(ScenarioError::step("navigate to Accessibility"))?;
    ctx.capture("accessibility-menu-customview").await;

    AccessibilityPage::new(ctx.session(), wait)
        .navigate_to_custom_view()
        .await
        .map_err(ScenarioError::step("navigate to Custom View"))?;
    ctx.capture("custom-view-page").await;

    info!("Step 3: Verify instructional text");
    let check = CustomViewPage::new(ctx.session(), wait)
        .verify_all_instructions()
        .await
        .map_err(ScenarioError::step("read instructions"))?;
    if !check.all_present() {
        return Err(ScenarioError::Check(format!(
            "instructions incomplete: step1={} step2={} step3={}",
            check.step1, check.step2, check.step3
        )));
    }
    Ok(())
}

pub(super) async fn external_storage<S: Session + ?Sized>(
    ctx: &mut ScenarioContext<'_, S>,
) -> Result<(), ScenarioError> {
    let wait = ctx.wait();

    ContentPage::new(ctx.session(), wait)
        .navigate_to_content()
        .await
        .map_err(ScenarioError::step("navigate to Content"))?;
    ctx.capture("content-menu").await;

    ContentPage::new(ctx.session(), wait)
        .navigate_to_storage()
        .await
        .map_err(ScenarioError::step("navigate to Storage"))?;
    ctx.capture("storage-menu").await;

    StoragePage::new(ctx.session(), wait)
        .navigate_to_external_storage()
        .await
        .map_err(ScenarioError::step("navigate to External Storage"))?;
    ctx.capture("external-storage-initial").await;

    let delete_wait = ctx.wait_within(ctx.config().timeouts.short);
    for instance in 0..STORAGE_PAIRS {
        info!("Step: Tap \"Create\" button {}", instance);
        let result = ExternalStoragePage::new(ctx.session(), delete_wait)
            .validate_create_delete_flow(instance)
            .await
            .map_err(ScenarioError::step(format!("Create button {}", instance)))?;
        ctx.capture(&format!("after-create-{}", instance)).await;

        if !result.delete_exists {
            return Err(ScenarioError::Check(format!(
                "Delete button {} not found after Create",
                instance
            )));
        }
        if !result.delete_enabled {
            return Err(ScenarioError::Check(format!(
                "Delete button {} still disabled after Create",
                instance
            )));
        }
        info!("Delete button {} is enabled after Create", instance);
    }
    Ok(())
}

pub(super) async fn hide_show_animations<S: Session + ?Sized>(
    ctx: &mut ScenarioContext<'_, S>,
) -> Result<(), ScenarioError> {
    let wait = ctx.wait();

    let mut menu = AnimationPage::new(ctx.session(), wait);
    menu.navigate_to_animation()
        .await
        .map_err(ScenarioError::step("navigate to Animation"))?;
    menu.navigate_to_hide_show_animations()
        .await
        .map_err(ScenarioError::step("navigate to Hide-Show Animations"))?;
    ctx.capture("hide-show-animations-page").await;

    let animation_wait = ctx.wait_within(ctx.config().timeouts.very_long);
    for id in BUTTON_IDS {
        HideShowAnimationsPage::new(ctx.session(), animation_wait)
            .hide_button(id)
            .await
            .map_err(ScenarioError::step(format!("hide button {}", id)))?;
        ctx.capture(&format!("button-{}-hidden", id)).await;
    }

    let mut page = HideShowAnimationsPage::new(ctx.session(), animation_wait);
    page.show_all_buttons()
        .await
        .map_err(ScenarioError::step("show all buttons"))?;
    page.verify_all_buttons_visible(&BUTTON_IDS)
        .await
        .map_err(ScenarioError::step("buttons visible again"))?;
    ctx.capture("all-buttons-shown").await;
    Ok(())
}

pub(super) async fn linkify<S: Session + ?Sized>(
    ctx: &mut ScenarioContext<'_, S>,
) -> Result<(), ScenarioError> {
    let wait = ctx.wait();

    LinkifyPage::new(ctx.session(), wait)
        .navigate_to_text_menu()
        .await
        .map_err(ScenarioError::step("navigate to Text"))?;
    ctx.capture("text-menu").await;

    LinkifyPage::new(ctx.session(), wait)
        .navigate_to_linkify()
        .await
        .map_err(ScenarioError::step("navigate to Linkify"))?;
    ctx.capture("linkify-page").await;

    info!("Step 3: Verify text elements");
    let mut page = LinkifyPage::new(ctx.session(), wait);
    let texts = page
        .all_text_elements()
        .await
        .map_err(ScenarioError::step("read text elements"))?;
    if let Some(index) = texts.iter().position(|text| text.is_empty()) {
        return Err(ScenarioError::Check(format!("text{} is empty", index + 1)));
    }
    if !page.verify_all_text_elements_displayed().await {
        return Err(ScenarioError::Check(
            "not every text element is displayed".into(),
        ));
    }

    let first = LocatorChain::named("text 1")
        .or(LocatorStrategy::resource_id("io.appium.android.apis:id/text1"));
    assertions::assert_exists(ctx.session(), &first, Some("text1 should exist"))
        .await
        .map_err(ScenarioError::step("text1 exists"))?;
    Ok(())
}
