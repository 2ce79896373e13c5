//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use quill::{ApiDoc, Trace};
use quill::inbound::http::configure;
use quill::inbound::http::health::{HealthState, live, ready};
use quill::inbound::http::session::CredentialCookies;
use quill::inbound::http::state::HttpState;
use quill::middleware::ClearStaleCredential;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    cookies: CredentialCookies,
    docs: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        cookies,
        docs,
    } = deps;

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(ClearStaleCredential::new(cookies))
        .wrap(Trace)
        .configure(configure)
        .service(ready)
        .service(live)
        .configure(|cfg| {
            if docs {
                cfg.service(
                    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()),
                );
            }
        })
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        secret,
        cookies,
        bind_addr,
        docs,
    } = config;
    let http_state = web::Data::new(build_http_state(secret, cookies));

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            cookies,
            docs,
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, secure_cookies = cookies.is_secure(), "server listening");
    health_state.mark_ready();
    Ok(server)
}
