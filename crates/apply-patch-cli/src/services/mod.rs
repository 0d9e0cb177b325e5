//! Service layer for business logic with dependency injection.
//!
//! Services accept trait-based dependencies, enabling testing with mock
//! implementations.

pub mod apply;

#[cfg(test)]
pub mod test_mocks;

pub use apply::{ApplyOutcome, ApplyService, Notifier, SkipReason};
