use axum::http::{header::CONTENT_TYPE, HeaderMap};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Form field carrying the JSON document on create and update
pub const JSON_INPUT_FIELD: &str = "json_input";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("request body is not a form submission")]
    NotAForm,

    #[error("form field `{}` is missing", JSON_INPUT_FIELD)]
    MissingField,

    #[error("invalid JSON input: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// A write request's payload: the raw text as submitted, and the decoded model
/// when it parsed. The raw text is kept so a failed form can be shown again as typed.
#[derive(Debug)]
pub struct Submission<M> {
    pub raw: Option<String>,
    pub model: Result<M, DecodeError>,
}

/// Pull `json_input` out of a form-encoded body and deserialize it.
pub fn decode_form<M: DeserializeOwned>(headers: &HeaderMap, body: &[u8]) -> Submission<M> {
    match json_input(headers, body) {
        Ok(raw) => {
            let model = decode(&raw);
            Submission {
                raw: Some(raw),
                model,
            }
        }
        Err(e) => Submission {
            raw: None,
            model: Err(e),
        },
    }
}

/// Raw text of the `json_input` form field
pub fn json_input(headers: &HeaderMap, body: &[u8]) -> Result<String, DecodeError> {
    let is_form = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
        .unwrap_or(false);
    if !is_form {
        return Err(DecodeError::NotAForm);
    }

    url::form_urlencoded::parse(body)
        .find(|(name, _)| name == JSON_INPUT_FIELD)
        .map(|(_, value)| value.into_owned())
        .ok_or(DecodeError::MissingField)
}

/// Deserialize one model from JSON text; nothing partial survives a failure
pub fn decode<M: DeserializeOwned>(raw: &str) -> Result<M, DecodeError> {
    Ok(serde_json::from_str(raw)?)
}
