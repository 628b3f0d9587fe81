use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api::errors::ApiError;
use crate::api::handlers::{auth as auth_handlers, avatars, posts, users};
use crate::config::Config;
use crate::state::AppState;

/// Builds the full application router with its middleware stack
pub fn router(state: AppState, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(auth_handlers::health_check))
        // Account routes
        .route("/signup", post(auth_handlers::signup))
        .route("/login", post(auth_handlers::login))
        .route("/logout", post(auth_handlers::logout))
        .route("/token/check", post(auth_handlers::check_token))
        .route("/users/:username", delete(users::delete_user))
        // Post routes
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/posts/:id",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        // Author routes
        .route("/author/:id", get(users::get_profile))
        .route("/author/:id/posts", get(posts::list_author_posts))
        .route("/avatars/:filename", get(avatars::get_avatar));

    // Middleware
    with_request_timeout(
        routes.layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        config.request_timeout,
    )
    .layer(TraceLayer::new_for_http())
    .layer(cors)
    // Shared state
    .with_state(state)
}

/// Aborts requests running longer than `timeout` with a JSON 408
fn with_request_timeout<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::map_response(timeout_as_json))
}

/// `TimeoutLayer` answers with an empty body; give it the usual error shape
async fn timeout_as_json(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        tracing::warn!("Request timed out");
        ApiError::new(StatusCode::REQUEST_TIMEOUT, "Request timed out.").into_response()
    } else {
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn slow_request_gets_json_timeout() {
        let app = with_request_timeout(
            Router::new().route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            ),
            Duration::from_millis(10),
        );

        let response = app
            .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Request timed out."})
        );
    }

    #[tokio::test]
    async fn fast_request_passes_through() {
        let app = with_request_timeout(
            Router::new().route("/fast", get(|| async { "done" })),
            Duration::from_secs(5),
        );

        let response = app
            .oneshot(Request::get("/fast").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"done");
    }
}
