pub mod command;
pub mod server;
pub mod session;

pub use session::AppiumSession;
