//! Shared helpers for unit tests: a recording command runner, scratch
//! project fixtures and a few filesystem assertions.

pub mod assertions;
pub mod fixtures;
pub mod mocks;

pub use fixtures::ProjectFixture;
pub use mocks::RecordingRunner;
