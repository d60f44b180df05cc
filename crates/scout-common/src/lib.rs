pub mod error;
pub mod locator;
pub mod protocol;

pub use error::{ResolutionError, SessionError};
pub use locator::{LocatorStrategy, UiSelector};
pub use protocol::{ElementHandle, Orientation, Point, Rect, WindowSize};
