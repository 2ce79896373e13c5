//! Quill backend library: a multi-user publishing core.
//!
//! The [`domain`] owns accounts, signed identity tokens, session resolution,
//! authorization and the post lifecycle. [`inbound`] adapts it to HTTP and
//! [`outbound`] supplies storage and password hashing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
