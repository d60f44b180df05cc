pub mod loader;
pub mod schema;

pub use loader::{ConfigError, ConfigLoader};
pub use schema::{
    AppiumConfig, Capabilities, DeviceProfile, ScoutConfig, ScreenshotConfig, TimeoutConfig,
    WaitConfig,
};
