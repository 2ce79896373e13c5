//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers only translate between JSON and domain calls; identity comes from
//! the [`session`] extractors and every decision is made by the domain.

use actix_web::web;

pub mod accounts;
pub mod credential_config;
pub mod error;
pub mod feeds;
pub mod health;
pub mod posts;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

/// Versioned prefix for every API route.
pub const API_PREFIX: &str = "/api/v1";

/// Register the API scope and JSON body handling.
///
/// Expects [`state::HttpState`] to be registered as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
            .service(accounts::register)
            .service(accounts::login)
            .service(accounts::logout)
            .service(feeds::home)
            .service(feeds::dashboard)
            .service(posts::list_posts)
            .service(posts::list_my_posts)
            .service(posts::create_post)
            .service(posts::edit_post_form)
            .service(posts::read_post)
            .service(posts::update_post)
            .service(posts::delete_post)
            .service(posts::add_comment)
            .service(posts::toggle_like),
    );
}
