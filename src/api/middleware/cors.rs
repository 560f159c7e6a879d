//! Cross-origin policy for the browser dashboard.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Creates the CORS layer.
///
/// With an allow-list only those origins are accepted. Without one the
/// request origin is mirrored back, which keeps credentialed requests
/// working from any dashboard host during development.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    let allow_origin = match allowed_origins {
        Some(origins) => {
            let values: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            AllowOrigin::list(values)
        }
        None => AllowOrigin::mirror_request(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
