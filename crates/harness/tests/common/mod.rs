
/// Config, image and harness helpers.
pub mod harness;

/// Mock DUTs and memory ports.
pub mod mocks;
