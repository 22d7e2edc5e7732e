//! HTTP server publishing the sitemaps next to the static site.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use vidmap_core::{Config, CoreError};
use vidmap_generator::{SitemapBuilder, SitemapVariant};

use crate::source::{SourceError, VideoSource};

/// Content type of the sitemap responses.
pub const XML_CONTENT_TYPE: &str = "application/xml";

/// Shared, read-only server state.
#[derive(Debug)]
pub struct ServerState<S> {
    config: Config,
    source: S,
}

impl<S: VideoSource> ServerState<S> {
    pub fn new(config: Config, source: S) -> Self {
        Self { config, source }
    }
}

/// Request-fatal errors. Both answer with a plain-text 500.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("Failed to load videos: {0}")]
    Source(#[from] SourceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Config(err) => {
                tracing::error!(%err, "sitemap requested without a usable site URL");
            }
            ApiError::Source(err) => {
                tracing::error!(%err, "failed to fetch videos for sitemap");
            }
        }
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Create the server router.
pub fn create_router<S: VideoSource>(state: Arc<ServerState<S>>) -> Router {
    let public_dir = state.config.server.public_dir.clone();

    Router::new()
        .route(
            &format!("/{}", SitemapVariant::Image.file_name()),
            get(image_sitemap::<S>),
        )
        .route(
            &format!("/{}", SitemapVariant::Video.file_name()),
            get(video_sitemap::<S>),
        )
        .route("/health", get(health))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn image_sitemap<S: VideoSource>(
    State(state): State<Arc<ServerState<S>>>,
) -> Result<Response, ApiError> {
    render(&state, SitemapVariant::Image).await
}

async fn video_sitemap<S: VideoSource>(
    State(state): State<Arc<ServerState<S>>>,
) -> Result<Response, ApiError> {
    render(&state, SitemapVariant::Video).await
}

async fn render<S: VideoSource>(
    state: &ServerState<S>,
    variant: SitemapVariant,
) -> Result<Response, ApiError> {
    let builder = SitemapBuilder::from_config(&state.config)?;
    let videos = state.source.fetch_all().await?;

    let output = builder.build(variant, &videos);
    if output.skipped > 0 {
        tracing::info!(
            variant = variant.as_str(),
            skipped = output.skipped,
            "some videos were left out of the sitemap"
        );
    }

    Ok(([(header::CONTENT_TYPE, XML_CONTENT_TYPE)], output.xml).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::Request,
    };
    use tower::ServiceExt;
    use vidmap_core::{VideoRecord, video::parse_catalog};

    use super::*;
    use crate::source::JsonFileSource;

    struct StaticSource(Vec<VideoRecord>);

    impl VideoSource for StaticSource {
        async fn fetch_all(&self) -> Result<Vec<VideoRecord>, SourceError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl VideoSource for FailingSource {
        async fn fetch_all(&self) -> Result<Vec<VideoRecord>, SourceError> {
            Err(SourceError::Read {
                path: "videos.json".into(),
                source: std::io::Error::other("upstream down"),
            })
        }
    }

    fn config(base_url: Option<&str>) -> Config {
        let mut config = Config::default();
        config.site.base_url = base_url.map(str::to_string);
        config.server.public_dir = "/nonexistent/public".to_string();
        config
    }

    fn videos() -> Vec<VideoRecord> {
        parse_catalog(
            r#"[{"id": "42", "title": "Cat Video", "description": "A cat",
                 "thumbnail": "/thumbs/42.jpg",
                 "embedUrl": "https://cdn.example.com/embed/42"}]"#,
        )
        .expect("parse")
    }

    async fn get_path(router: Router, path: &str) -> (StatusCode, String, String) {
        let response = router
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    fn router<S: VideoSource>(config: Config, source: S) -> Router {
        create_router(Arc::new(ServerState::new(config, source)))
    }

    #[tokio::test]
    async fn test_video_sitemap_route() {
        let app = router(config(Some("https://example.com")), StaticSource(videos()));

        let (status, content_type, body) =
            get_path(app, "/video-sitemap.xml").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, XML_CONTENT_TYPE);
        assert!(body.contains("xmlns:video="));
        assert!(body.contains("<video:duration>126</video:duration>"));
    }

    #[tokio::test]
    async fn test_image_sitemap_route() {
        let app = router(config(Some("https://example.com/")), StaticSource(videos()));

        let (status, content_type, body) =
            get_path(app, "/image-sitemap.xml").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, XML_CONTENT_TYPE);
        assert!(body.contains("<image:caption>Logo example.com</image:caption>"));
        assert!(body.contains("<loc>https://example.com/video/cat-video-42/</loc>"));
    }

    #[tokio::test]
    async fn test_missing_site_url_is_500() {
        let app = router(config(None), StaticSource(videos()));

        let (status, content_type, body) =
            get_path(app, "/video-sitemap.xml").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(content_type.starts_with("text/plain"));
        assert_eq!(body, "Site URL is not defined in configuration.");
        assert!(!body.contains("<urlset"));
    }

    #[tokio::test]
    async fn test_source_failure_is_500() {
        let app = router(config(Some("https://example.com")), FailingSource);

        let (status, _, body) = get_path(app, "/image-sitemap.xml").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("Failed to load videos"));
        assert!(body.contains("upstream down"));
        assert!(!body.contains("<urlset"));
    }

    #[tokio::test]
    async fn test_malformed_catalog_entries_are_left_out() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("videos.json");
        std::fs::write(
            &path,
            r#"[null, {"id": "42", "title": "Cat Video", "description": "A cat",
                "thumbnail": "/thumbs/42.jpg", "embedUrl": "/embed/42"}, "junk"]"#,
        )
        .expect("write catalog");

        let app = router(
            config(Some("https://example.com")),
            JsonFileSource::new(&path),
        );

        let (status, content_type, body) =
            get_path(app, "/video-sitemap.xml").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, XML_CONTENT_TYPE);
        assert_eq!(body.matches("<url>").count(), 1);
        assert!(body.contains("<loc>https://example.com/video/cat-video-42/</loc>"));
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(config(None), StaticSource(Vec::new()));

        let (status, _, body) = get_path(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
