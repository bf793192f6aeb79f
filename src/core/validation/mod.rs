//! Local validation run before a request is sent
//!
//! Failures here are recoverable: the request is blocked and the caller
//! receives a `ValidationError` describing what to fix.

pub mod filters;
pub mod upload;
pub mod validators;

pub use upload::validate_upload;
