use axum::extract::{OriginalUri, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;

use atlas_shared::AppError;

use crate::AppState;

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Page not found</title>
<style>
  body { margin: 0; min-height: 100vh; display: flex; align-items: center; justify-content: center;
         font-family: system-ui, -apple-system, sans-serif; background: #f8fafc; color: #0f172a; }
  main { text-align: center; padding: 2rem; }
  h1 { font-size: 4rem; margin: 0; }
  p { color: #475569; }
  a { display: inline-block; margin-top: 1rem; padding: .6rem 1.2rem; border-radius: .5rem;
      background: #0f172a; color: #fff; text-decoration: none; }
</style>
</head>
<body>
<main>
  <h1>404</h1>
  <p>Page not found</p>
  <p>The page you are looking for does not exist or has been moved.</p>
  <a href="{home_url}">Go back home</a>
</main>
</body>
</html>
"#;

/// Fallback for every unmatched route.
pub async fn not_found(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    tracing::debug!(path = %uri.path(), "no route matched");

    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if prefers_json(accept) {
        return AppError::not_found("resource not found").into_response();
    }

    (StatusCode::NOT_FOUND, Html(render(&state.config.home_url))).into_response()
}

pub fn render(home_url: &str) -> String {
    PAGE.replace("{home_url}", &escape_html(home_url))
}

/// True when the Accept header ranks `application/json` above `text/html`.
fn prefers_json(accept: &str) -> bool {
    let mut json_q = 0.0f32;
    let mut html_q = 0.0f32;

    for range in accept.split(',') {
        let mut parts = range.split(';').map(str::trim);
        let media = parts.next().unwrap_or("").to_ascii_lowercase();
        let q = parts
            .find_map(|p| p.strip_prefix("q="))
            .and_then(|q| q.parse::<f32>().ok())
            .unwrap_or(1.0);

        match media.as_str() {
            "application/json" => json_q = json_q.max(q),
            "text/html" => html_q = html_q.max(q),
            _ => {}
        }
    }

    json_q > html_q
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
