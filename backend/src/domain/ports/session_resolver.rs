//! Driving port turning a raw request credential into an identity.

use async_trait::async_trait;

use crate::domain::{Error, SessionResolution};

/// Classifies a request as anonymous or authenticated.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Resolve the credential carried by a request, if any.
    ///
    /// Invalid credentials resolve to an anonymous identity and ask the
    /// adapter to clear them; only store failures are errors.
    async fn resolve(&self, credential: Option<&str>) -> Result<SessionResolution, Error>;
}
