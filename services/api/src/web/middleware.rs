//! services/api/src/web/middleware.rs
//!
//! Identity middleware. Signing in is optional, so a missing or stale session
//! cookie downgrades the request to anonymous instead of rejecting it. A
//! session that cannot be checked at all fails the request, so a signed-in
//! user's notes never land in the anonymous history.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use study_notes_core::ports::PortError;
use tracing::{error, warn};

use crate::web::state::{AppState, CurrentUser};

/// Name of the cookie carrying the auth session id.
pub const SESSION_COOKIE: &str = "session";

/// Extracts the auth session id from the `Cookie` header, if any.
pub fn session_id(headers: &HeaderMap) -> Option<&str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    cookie_header.split(';').find_map(|c| {
        c.trim()
            .strip_prefix(SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
            .filter(|id| !id.is_empty())
    })
}

/// Middleware that resolves the session cookie to a user, when there is one.
///
/// Inserts a `CurrentUser` into the request extensions, or answers 503 when
/// the session store cannot be reached.
pub async fn optional_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let user_id = match session_id(req.headers()) {
        Some(auth_session_id) => match state.accounts.validate_auth_session(auth_session_id).await {
            Ok(user_id) => Some(user_id),
            Err(PortError::Unauthorized) => {
                warn!("Ignoring expired or unknown auth session");
                None
            }
            Err(e) => {
                error!("Failed to validate auth session: {:?}", e);
                return Err((
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Could not verify your session, please try again".to_string(),
                ));
            }
        },
        None => None,
    };

    req.extensions_mut().insert(CurrentUser(user_id));
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn finds_session_among_other_cookies() {
        let h = headers("theme=dark; session=abc-123; lang=en");
        assert_eq!(session_id(&h), Some("abc-123"));
    }

    #[test]
    fn ignores_similarly_named_and_empty_cookies() {
        assert_eq!(session_id(&headers("session_hint=x")), None);
        assert_eq!(session_id(&headers("session=")), None);
        assert_eq!(session_id(&HeaderMap::new()), None);
    }
}
