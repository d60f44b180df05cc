pub mod assertions;
pub mod config;
pub mod device;
pub mod gestures;
pub mod resolution;
pub mod screenshot;
pub mod session;
pub mod wait;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use scout_common::error;
pub use scout_common::locator;
pub use scout_common::protocol;

pub use resolution::{LocatorChain, ResolutionResult, Resolver};
pub use session::Session;
pub use wait::{
    GoneMode, PredicateFuture, WaitCondition, WaitEngine, WaitOptions, WaitOutcome, WaitTarget,
};
pub use assertions::AssertionError;
pub use config::{ConfigError, ConfigLoader, ScoutConfig};
pub use device::Device;
pub use gestures::{Gestures, SwipeDirection};
pub use screenshot::ScreenshotStore;
