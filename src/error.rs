//! Error taxonomy for the client.

use serde_json::Value;

/// Everything this crate can fail with.
///
/// Configuration problems surface at construction, before any network I/O.
/// Authentication covers rejected logins and requests issued without an
/// active token. Request carries the transport-level evidence (status code,
/// raw body) for everything else that went wrong on the wire. Validation is
/// the schema layer rejecting a payload shape, pinpointing the field.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("authentication error: {0}")]
    Authentication(String),

    #[error("{}", render_request(.message, .status, .body))]
    Request {
        message: String,
        status: Option<u16>,
        body: Option<String>,
    },

    #[error("validation failed at {path}: {detail}")]
    Validation { path: String, detail: String },
}

impl Error {
    /// Validation error for a field that received an out-of-contract value.
    pub(crate) fn validation(path: &str, expected: &str, received: &Value) -> Error {
        Error::Validation {
            path: path.to_string(),
            detail: format!("{}, received {}", expected, preview(received)),
        }
    }
}

fn render_request(message: &str, status: &Option<u16>, body: &Option<String>) -> String {
    let mut out = message.to_string();
    if let Some(code) = status {
        out.push_str(&format!(" - status code: {}", code));
    }
    if let Some(text) = body {
        out.push_str(&format!(" - response: {}", text));
    }
    out
}

/* Bodies can be arbitrarily large; keep error messages readable. */
fn preview(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() > 120 {
        let mut cut: String = text.chars().take(120).collect();
        cut.push('…');
        cut
    } else {
        text
    }
}
