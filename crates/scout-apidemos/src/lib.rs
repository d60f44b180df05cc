//! Page objects and scripted scenarios for the Android ApiDemos app.

pub mod error;
pub mod pages;
pub mod scenarios;

pub use error::{PageError, ScenarioError};
pub use scenarios::{Scenario, ScenarioContext, ScenarioReport};
