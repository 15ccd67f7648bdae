use axum::{extract::OriginalUri, response::Html};

#[cfg(feature = "tracing")]
use tracing::debug;

const INDEX: &str = include_str!("views/index.html");

pub async fn index(OriginalUri(_uri): OriginalUri) -> Html<&'static str> {
    #[cfg(feature = "tracing")]
    debug!(path = %_uri.path(), "Rendering landing page");
    Html(INDEX)
}
