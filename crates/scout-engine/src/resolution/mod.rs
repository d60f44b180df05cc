pub mod chain;
pub mod resolver;
pub mod result;
pub mod snapshot;

pub use chain::LocatorChain;
pub use resolver::Resolver;
pub use result::{Attempt, AttemptOutcome, Exhausted, ResolutionResult, Resolved};
pub use snapshot::ElementSnapshot;
