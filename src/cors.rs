use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use http::{HeaderName, HeaderValue, Method, StatusCode, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::settings::Settings;

pub const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

const ALLOWED_HEADERS: [HeaderName; 2] = [header::CONTENT_TYPE, header::ACCEPT];

/// Credentials are allowed, so the origin can never be a wildcard.
pub fn cors_layer(settings: &Settings) -> Result<CorsLayer, header::InvalidHeaderValue> {
    let origin = HeaderValue::from_str(&settings.cors_origin)?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS)
        .allow_credentials(true))
}

/// `CorsLayer` only sends the allowed methods and headers on preflights;
/// these layers add them to every other response as well.
pub fn allow_list_layers() -> Result<
    (
        SetResponseHeaderLayer<HeaderValue>,
        SetResponseHeaderLayer<HeaderValue>,
    ),
    header::InvalidHeaderValue,
> {
    let methods = join_values(ALLOWED_METHODS.iter().map(Method::as_str))?;
    let headers = join_values(ALLOWED_HEADERS.iter().map(HeaderName::as_str))?;
    Ok((
        SetResponseHeaderLayer::if_not_present(header::ACCESS_CONTROL_ALLOW_METHODS, methods),
        SetResponseHeaderLayer::if_not_present(header::ACCESS_CONTROL_ALLOW_HEADERS, headers),
    ))
}

fn join_values<'a>(
    items: impl Iterator<Item = &'a str>,
) -> Result<HeaderValue, header::InvalidHeaderValue> {
    HeaderValue::from_str(&items.collect::<Vec<_>>().join(","))
}

/// Preflights answer `204 No Content` instead of the layer's `200`.
pub async fn preflight_no_content(request: Request, next: Next) -> Response {
    let preflight = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}
