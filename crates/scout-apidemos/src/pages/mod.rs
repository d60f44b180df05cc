//! Page objects for the ApiDemos screens.
//!
//! Each page borrows the session for as long as it lives. Build a page, use
//! it, drop it; the next screen gets a fresh page over the same session.

pub mod accessibility;
pub mod animation;
pub mod api_demos;
pub mod base;
pub mod content;
pub mod linkify;

pub use accessibility::{AccessibilityPage, AccessibilityServicePage, CustomViewPage};
pub use animation::{AnimationPage, HideShowAnimationsPage};
pub use api_demos::ApiDemosPage;
pub use base::BasePage;
pub use content::{ContentPage, ExternalStoragePage, StoragePage};
pub use linkify::LinkifyPage;
