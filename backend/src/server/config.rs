//! HTTP server configuration object and helpers.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use quill::domain::TokenSecret;
use quill::inbound::http::credential_config::CredentialSettings;
use quill::inbound::http::session::CredentialCookies;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;

/// Listener settings loaded via OrthoConfig from `QUILL_*` variables,
/// configuration files and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "QUILL")]
pub struct ServerSettings {
    /// Address to bind; all interfaces when unset.
    pub host: Option<IpAddr>,
    /// Port to bind; 8080 when unset.
    pub port: Option<u16>,
    /// Serve Swagger UI at `/docs`; defaults to on in debug builds only.
    pub docs: Option<bool>,
}

impl ServerSettings {
    /// Socket address the server listens on.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Whether the OpenAPI document and Swagger UI are served.
    pub fn docs_enabled(&self) -> bool {
        self.docs.unwrap_or(cfg!(debug_assertions))
    }
}

/// Everything needed to build the HTTP server.
pub struct ServerConfig {
    pub(crate) secret: TokenSecret,
    pub(crate) cookies: CredentialCookies,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) docs: bool,
}

impl ServerConfig {
    /// Combine credential settings with the listener address.
    #[must_use]
    pub fn new(credentials: CredentialSettings, bind_addr: SocketAddr) -> Self {
        let CredentialSettings {
            secret,
            cookie_secure,
        } = credentials;
        Self {
            secret,
            cookies: CredentialCookies::new(cookie_secure),
            bind_addr,
            docs: cfg!(debug_assertions),
        }
    }

    /// Override whether Swagger UI is served.
    #[must_use]
    pub fn with_docs(mut self, docs: bool) -> Self {
        self.docs = docs;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
