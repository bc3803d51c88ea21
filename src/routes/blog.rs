/**
 * Blog Routes
 * Page data for the blog listing
 */
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::posts::{self, PostSummary};
use crate::routes::ErrorResponse;
use crate::state::AppState;

/// Response for GET /api/blog
#[derive(Debug, Serialize, Deserialize)]
pub struct BlogIndexResponse {
    pub posts: Vec<PostSummary>,
}

/// GET /api/blog - All posts, newest first
///
/// Rebuilt from disk on every request.
pub async fn list_posts(State(state): State<AppState>) -> impl IntoResponse {
    let root = state.content_dir.as_ref().clone();

    match posts::load_index_async(root).await {
        Ok(posts) => (StatusCode::OK, Json(BlogIndexResponse { posts })).into_response(),
        Err(e) => {
            tracing::error!("Post index task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatBackend;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use std::fs;
    use std::path::Path;
    use tower::ServiceExt;

    fn test_router(root: &Path) -> Router {
        Router::new()
            .route("/api/blog", get(list_posts))
            .with_state(AppState::new(root, ChatBackend::Canned))
    }

    async fn get_index(app: Router) -> (StatusCode, BlogIndexResponse) {
        let req = Request::get("/api/blog").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn write_post(root: &Path, slug: &str, date: &str) {
        let dir = root.join(slug);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("+page.md"),
            format!(
                "---\ntitle: {slug}\ndate: {date}\nauthor: Kozu\n---\n\nSome words.\n"
            ),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_list_posts_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), "new-year", "2024-01-01");
        write_post(tmp.path(), "summer", "2024-06-01");

        let (status, body) = get_index(test_router(tmp.path())).await;
        assert_eq!(status, StatusCode::OK);
        let slugs: Vec<&str> = body.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["summer", "new-year"]);
        assert_eq!(body.posts[0].metadata.date.as_deref(), Some("2024-06-01"));
        assert_eq!(body.posts[0].metadata.author.as_deref(), Some("Kozu"));
    }

    #[tokio::test]
    async fn test_list_reflects_current_disk_state() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), "first", "2023-05-05");

        let (_, before) = get_index(test_router(tmp.path())).await;
        assert_eq!(before.posts.len(), 1);

        write_post(tmp.path(), "second", "2023-06-06");
        let (_, after) = get_index(test_router(tmp.path())).await;
        assert_eq!(after.posts.len(), 2);
        assert_eq!(after.posts[0].slug, "second");
    }

    #[tokio::test]
    async fn test_missing_content_dir_lists_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, body) = get_index(test_router(&tmp.path().join("absent"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.posts.is_empty());
    }
}
