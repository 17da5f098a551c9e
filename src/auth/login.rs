//! Login handshake and anonymous reachability probe.

use serde::Serialize;

use crate::auth::session::{AuthSession, CSRF_COOKIE, SESSION_COOKIE};
use crate::clients::{DataType, HttpClient, HttpError, HttpMethod, HttpRequest, RestError};
use crate::config::Credentials;

/// Path of the session login endpoint.
pub const LOGIN_PATH: &str = "rest-auth/login/";

/// Path probed by anonymous connections.
pub const PROBE_PATH: &str = "api/";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Logs in with username and password and returns the issued session.
///
/// Both the `sessionid` and the `csrftoken` cookie must be present in the
/// response.
///
/// # Errors
///
/// Returns [`RestError::AuthenticationFailed`] if the server rejects the
/// credentials, cannot be reached, or omits one of the cookies.
pub async fn login(
    http_client: &HttpClient,
    credentials: &Credentials,
) -> Result<AuthSession, RestError> {
    let body = serde_json::to_value(LoginRequest {
        username: credentials.username.as_ref(),
        password: credentials.password.as_ref(),
    })
    .map_err(|e| RestError::AuthenticationFailed {
        reason: e.to_string(),
    })?;

    let request = HttpRequest::builder(HttpMethod::Post, LOGIN_PATH)
        .body(body)
        .body_type(DataType::Json)
        .build()
        .map_err(|e| RestError::Http(e.into()))?;

    let response = http_client
        .request(request)
        .await
        .map_err(|e| RestError::AuthenticationFailed {
            reason: match e {
                HttpError::Response(e) if matches!(e.code, 400 | 401 | 403) => {
                    format!("Response HTTP status code {}. Invalid credentials?", e.code)
                }
                other => other.to_string(),
            },
        })?;

    let missing = |name: &str| RestError::AuthenticationFailed {
        reason: format!("Missing '{name}' cookie in login response"),
    };
    let session_id = response
        .cookie(SESSION_COOKIE)
        .ok_or_else(|| missing(SESSION_COOKIE))?;
    let csrf_token = response
        .cookie(CSRF_COOKIE)
        .ok_or_else(|| missing(CSRF_COOKIE))?;

    tracing::debug!(username = credentials.username.as_ref(), "logged in");
    Ok(AuthSession::new(session_id, csrf_token))
}

/// Checks that the server is reachable without logging in.
///
/// Any HTTP answer counts as reachable; only transport failures fail.
///
/// # Errors
///
/// Returns [`RestError::AuthenticationFailed`] if the server cannot be reached.
pub async fn probe(http_client: &HttpClient) -> Result<(), RestError> {
    let request = HttpRequest::builder(HttpMethod::Get, PROBE_PATH)
        .build()
        .map_err(|e| RestError::Http(e.into()))?;

    match http_client.request(request).await {
        Ok(_) | Err(HttpError::Response(_)) => Ok(()),
        Err(e) => Err(RestError::AuthenticationFailed {
            reason: format!("Server not accessible: {e}"),
        }),
    }
}
