//! Landing feeds: the public home page and a signed-in user's dashboard.
//!
//! ```text
//! GET /api/v1/home
//! GET /api/v1/dashboard
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Dashboard, Error, PostSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{RequireUser, SessionContext};
use crate::inbound::http::state::HttpState;

/// Newest published posts for the home page.
#[derive(Debug, Serialize, ToSchema)]
pub struct HomeFeed {
    /// At most ten summaries, newest first.
    pub posts: Vec<PostSummary>,
}

/// Home page feed.
#[utoipa::path(
    get,
    path = "/api/v1/home",
    responses(
        (status = 200, description = "Home feed", body = HomeFeed),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["feeds"],
    operation_id = "homeFeed",
    security((), ("token" = []))
)]
#[get("/home")]
pub async fn home(
    state: web::Data<HttpState>,
    _session: SessionContext,
) -> ApiResult<web::Json<HomeFeed>> {
    let posts = state.posts_query.home_feed().await?;
    Ok(web::Json(HomeFeed { posts }))
}

/// The caller's own newest posts and the newest published posts.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = Dashboard),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["feeds"],
    operation_id = "dashboard",
    security(("token" = []))
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    caller: RequireUser,
) -> ApiResult<web::Json<Dashboard>> {
    let dashboard = state.posts_query.dashboard(caller.identity()).await?;
    Ok(web::Json(dashboard))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::Value;

    use crate::domain::PostStatus;
    use crate::inbound::http::test_utils::{TestHarness, init_api};

    #[actix_web::test]
    async fn home_lists_ten_newest_published_posts() {
        let harness = TestHarness::new();
        let author = harness.seed_user("ada_l").await;
        for n in 0..12 {
            harness
                .seed_post(&author, &format!("post {n}"), PostStatus::Published)
                .await;
        }
        harness
            .seed_post(&author, "hidden", PostStatus::Draft)
            .await;
        let app = init_api!(harness.state.clone()).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/api/v1/home").to_request())
                .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        let posts = body["posts"].as_array().expect("posts array");
        assert_eq!(posts.len(), 10);
        assert_eq!(posts[0]["title"], "post 11");
        assert_eq!(posts[0]["author"]["username"], "ada_l");
    }

    #[actix_web::test]
    async fn dashboard_requires_login() {
        let harness = TestHarness::new();
        let app = init_api!(harness.state.clone()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/dashboard").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn dashboard_shows_own_drafts_and_recent_posts() {
        let harness = TestHarness::new();
        let ada = harness.seed_user("ada_l").await;
        let grace = harness.seed_user("grace").await;
        harness.seed_post(&ada, "my draft", PostStatus::Draft).await;
        for n in 0..4 {
            harness
                .seed_post(&grace, &format!("grace {n}"), PostStatus::Published)
                .await;
        }
        let app = init_api!(harness.state.clone()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/dashboard")
                .cookie(harness.cookie_for(&ada))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        let own = body["userPosts"].as_array().expect("own posts");
        assert_eq!(own.len(), 1);
        assert_eq!(own[0]["title"], "my draft");
        assert_eq!(own[0]["status"], "draft");
        let recent = body["recentPosts"].as_array().expect("recent posts");
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0]["title"], "grace 3");
    }
}
