//! HTTP request/response values and response decoding.
//!
//! # Design
//! Requests and responses are plain data. Services build an `HttpRequest`,
//! hand it to the client's `Transport`, and decode the `HttpResponse` with
//! `parse_json`. Keeping the wire step behind data values lets tests swap the
//! transport for canned responses without a socket.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, RemoteError, Result};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute, query string included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Error payload returned by the API on failure.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    description: String,
}

/// Map a status other than `expected` to `Error::Remote`.
pub(crate) fn check_status(response: &HttpResponse, expected: u16) -> Result<()> {
    if response.status == expected {
        return Ok(());
    }
    match serde_json::from_str::<ErrorResponse>(&response.body) {
        Ok(payload) if !payload.message.is_empty() => Err(RemoteError::Api {
            status: response.status,
            message: payload.message,
            description: payload.description,
        }
        .into()),
        _ => Err(RemoteError::Raw {
            status: response.status,
            body: response.body.clone(),
        }
        .into()),
    }
}

pub(crate) fn parse_json<T: DeserializeOwned>(response: &HttpResponse, expected: u16) -> Result<T> {
    check_status(response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| Error::Deserialization(e.to_string()))
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn expected_status_passes() {
        assert!(check_status(&response(202, ""), 202).is_ok());
    }

    #[test]
    fn error_payload_is_decoded() {
        let err = check_status(
            &response(400, r#"{"message":"bad request","description":"size too large"}"#),
            200,
        )
        .unwrap_err();
        match err {
            Error::Remote(RemoteError::Api {
                status,
                message,
                description,
            }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad request");
                assert_eq!(description, "size too large");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_message_falls_back_to_raw() {
        let err = check_status(&response(500, r#"{"description":"x"}"#), 200).unwrap_err();
        assert_eq!(err.to_string(), r#"500 error: {"description":"x"}"#);
    }

    #[test]
    fn non_json_body_falls_back_to_raw() {
        let err = check_status(&response(503, "unavailable"), 200).unwrap_err();
        assert!(matches!(
            err,
            Error::Remote(RemoteError::Raw { status: 503, .. })
        ));
    }

    #[test]
    fn malformed_success_body_is_a_deserialization_error() {
        let err = parse_json::<serde_json::Value>(&response(200, "not json"), 200).unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost/x".to_string(),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
            body: None,
        };
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.header("authorization"), None);
    }
}
