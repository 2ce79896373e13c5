//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! tracing and credential hygiene.

pub mod credential;
pub mod trace;

pub use credential::ClearStaleCredential;
pub use trace::Trace;
