//! Structured response returned to the invoking platform.
//!
//! The shape mirrors the proxy-integration output contract: a numeric
//! `statusCode` and a `body` string that itself holds a JSON document with a
//! `"message"` field. Only two responses ever leave the handler; see
//! [`Response::not_found`] and [`Response::server_error`].

use serde::{Deserialize, Serialize};

/// Response envelope handed back to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// HTTP-style status code.
    pub status_code: u16,
    /// JSON document with a `"message"` field, pre-serialised.
    pub body: String,
}

impl Response {
    fn with_message(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: serde_json::json!({ "message": message }).to_string(),
        }
    }

    /// The response returned after a fully successful conversion.
    pub fn not_found() -> Self {
        Self::with_message(404, "File not found")
    }

    /// The response returned for any error caught at the top level.
    ///
    /// The error's textual form is embedded in the body so the caller sees
    /// what failed without access to the logs.
    pub fn server_error(err: &impl std::fmt::Display) -> Self {
        Self::with_message(500, &format!("some error happened: {err}"))
    }

    /// Parse the `"message"` field back out of the body, if present.
    pub fn message(&self) -> Option<String> {
        serde_json::from_str::<serde_json::Value>(&self.body)
            .ok()?
            .get("message")?
            .as_str()
            .map(str::to_string)
    }
}
