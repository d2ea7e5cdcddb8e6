//! Route pattern extraction utilities.

use actix_web::HttpRequest;

/// Label for requests that matched no route
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Matched route pattern (`/requests/{id}`) rather than the concrete path
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}
