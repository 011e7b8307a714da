// Error module: the failure half of every API call. A call either yields
// the decoded record or an `ErrorResponse` carrying the observed status
// code and the error body the service sent back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Outcome of a single API call: the decoded record, or the remote error.
pub type ClientResponse<T> = Result<T, ErrorResponse>;

/// Status codes documented by the image API. Anything else is kept
/// numerically in `Other` so unexpected codes are never lost.
///
/// `Other(0)` means no response was received at all (connection refused,
/// DNS failure, request could not be built).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum StatusCode {
    Success,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    UnprocessableEntity,
    RateLimiting,
    InternalError,
    Other(u16),
}

impl StatusCode {
    pub const NO_RESPONSE: StatusCode = StatusCode::Other(0);

    /// Map a numeric code onto the closed set, falling back to `Other`.
    pub fn from_u16(code: u16) -> Self {
        match code {
            200 => StatusCode::Success,
            400 => StatusCode::BadRequest,
            401 => StatusCode::Unauthorized,
            403 => StatusCode::Forbidden,
            404 => StatusCode::NotFound,
            422 => StatusCode::UnprocessableEntity,
            429 => StatusCode::RateLimiting,
            500 => StatusCode::InternalError,
            other => StatusCode::Other(other),
        }
    }

    pub fn as_u16(self) -> u16 {
        match self {
            StatusCode::Success => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::UnprocessableEntity => 422,
            StatusCode::RateLimiting => 429,
            StatusCode::InternalError => 500,
            StatusCode::Other(code) => code,
        }
    }

    /// Only an exact 200 counts as success; 201 and 204 do not.
    pub fn is_success(self) -> bool {
        self == StatusCode::Success
    }

    /// Short human readable reason, used when the remote body has no message.
    pub fn reason(self) -> &'static str {
        match self {
            StatusCode::Success => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::UnprocessableEntity => "Unprocessable Entity",
            StatusCode::RateLimiting => "Too Many Requests",
            StatusCode::InternalError => "Internal Server Error",
            StatusCode::Other(0) => "No response received",
            StatusCode::Other(code) => reqwest::StatusCode::from_u16(code)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown status"),
        }
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode::from_u16(code)
    }
}

impl From<StatusCode> for u16 {
    fn from(code: StatusCode) -> Self {
        code.as_u16()
    }
}

impl From<reqwest::StatusCode> for StatusCode {
    fn from(code: reqwest::StatusCode) -> Self {
        StatusCode::from_u16(code.as_u16())
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// HTTP methods the API reports back in error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(()),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Error body as documented by the API, e.g.
/// `{"message": "This method requires authentication", "request": "/api/images", "method": "GET"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub request: String,
    pub method: HttpMethod,
}

/// What the service may actually send. Every field is optional so that a
/// partial body like `{"message": "Not Found"}` still decodes.
#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    request: Option<String>,
    #[serde(default)]
    method: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>, method: HttpMethod, request: impl Into<String>) -> Self {
        ErrorBody {
            message: message.into(),
            request: request.into(),
            method,
        }
    }

    /// Decode an error body, filling whatever the service left out from the
    /// request that was sent. Non-JSON bodies become the message verbatim.
    pub(crate) fn from_remote(
        body: &[u8],
        status: StatusCode,
        method: HttpMethod,
        request: &str,
    ) -> Self {
        match serde_json::from_slice::<RemoteErrorBody>(body) {
            Ok(remote) => ErrorBody {
                message: remote
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| status.reason().to_string()),
                request: remote
                    .request
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| request.to_string()),
                method: remote
                    .method
                    .and_then(|m| m.parse().ok())
                    .unwrap_or(method),
            },
            Err(_) => {
                let text = String::from_utf8_lossy(body);
                let text = text.trim();
                let message = if text.is_empty() {
                    status.reason().to_string()
                } else {
                    text.to_string()
                };
                ErrorBody::new(message, method, request)
            }
        }
    }
}

/// The error branch of a `ClientResponse`: observed status plus error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{status_code}: {} ({} {})", .body.message, .body.method, .body.request)]
pub struct ErrorResponse {
    pub status_code: StatusCode,
    pub body: ErrorBody,
}

impl ErrorResponse {
    pub fn new(status_code: StatusCode, body: ErrorBody) -> Self {
        ErrorResponse { status_code, body }
    }

    /// A non-200 answer from the service.
    pub(crate) fn from_remote(
        status_code: StatusCode,
        body: &[u8],
        method: HttpMethod,
        request: &str,
    ) -> Self {
        ErrorResponse::new(
            status_code,
            ErrorBody::from_remote(body, status_code, method, request),
        )
    }

    /// The request never got an answer.
    pub(crate) fn no_response(method: HttpMethod, request: &str, message: impl Into<String>) -> Self {
        ErrorResponse::new(
            StatusCode::NO_RESPONSE,
            ErrorBody::new(message, method, request),
        )
    }

    /// A response arrived but its body could not be read or decoded.
    pub(crate) fn undecodable(
        status_code: StatusCode,
        method: HttpMethod,
        request: &str,
        cause: impl fmt::Display,
    ) -> Self {
        ErrorResponse::new(
            status_code,
            ErrorBody::new(format!("invalid response body: {}", cause), method, request),
        )
    }

    pub fn is_no_response(&self) -> bool {
        self.status_code == StatusCode::NO_RESPONSE
    }
}
