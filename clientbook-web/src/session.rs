use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};

use clientbook_data::db::sessions::{self, Flash, Session};
use clientbook_data::db::users::User;

use crate::error::WebError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "clientbook_session";

/// Extract the session token from the request's Cookie header, if present.
pub fn cookie_token(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((name, token)) = pair.trim().split_once('=') {
                if name == SESSION_COOKIE && !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }
    None
}

/// Set-Cookie value for a session token.
pub fn session_cookie(token: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token)
}

/// Per-request session wiring shared by all HTML handlers.
///
/// Resolves the visitor's session from the cookie, creating a fresh one
/// when the cookie is missing or stale. `finish` must wrap the handler's
/// response so a freshly minted token reaches the browser.
pub struct PageContext {
    session: Session,
    set_cookie: Option<String>,
    pub user: Option<User>,
    pub flashes: Vec<Flash>,
}

impl PageContext {
    /// Wiring for form submissions: session and user only. Pending flash
    /// messages stay queued for the page the client is redirected to.
    pub async fn enter(state: &AppState, headers: &HeaderMap) -> Result<Self, WebError> {
        let conn = state.conn().await;

        let existing = match cookie_token(headers) {
            Some(token) => sessions::find(&conn, &token)?,
            None => None,
        };
        let (session, set_cookie) = match existing {
            Some(session) => (session, None),
            None => {
                let session = sessions::create(&conn)?;
                let cookie = session_cookie(&session.token);
                (session, Some(cookie))
            }
        };
        let user = sessions::current_user(&conn, &session.token)?;

        Ok(Self {
            session,
            set_cookie,
            user,
            flashes: Vec::new(),
        })
    }

    /// Wiring for rendered pages: also drains the session's flash queue.
    pub async fn load(state: &AppState, headers: &HeaderMap) -> Result<Self, WebError> {
        let mut ctx = Self::enter(state, headers).await?;
        let flashes = {
            let conn = state.conn().await;
            sessions::take_flashes(&conn, &ctx.session.token)?
        };
        ctx.flashes = flashes;
        Ok(ctx)
    }

    pub fn token(&self) -> &str {
        &self.session.token
    }

    /// Attach the Set-Cookie header (when a session was created) and
    /// convert the handler's result into a response.
    pub fn finish(self, resp: impl IntoResponse) -> Response {
        let mut resp = resp.into_response();
        if let Some(cookie) = self.set_cookie {
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                resp.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        resp
    }
}
