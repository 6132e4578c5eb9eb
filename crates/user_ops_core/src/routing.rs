use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::contract::{
    RequestBody, COGNITO_DELETE_QUERY_TYPE, SCHEDULED_EVENT_DETAIL_TYPE, SCHEDULER_SOURCE,
};

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Request payload must be a JSON object")]
    EventNotObject,
    #[error("Request body must be a JSON object")]
    BodyNotObject,
    #[error("Malformed JSON body: {0}")]
    MalformedBody(#[source] serde_json::Error),
    #[error("Malformed request: {0}")]
    MalformedRequest(#[source] serde_json::Error),
}

/// The three shapes a request body can arrive in.
#[derive(Debug, Clone, PartialEq)]
pub enum EventBody<'a> {
    /// `body` is JSON text that still needs decoding.
    Encoded(&'a str),
    /// `body` is already a structured value.
    Structured(&'a Value),
    /// No usable `body`; the event itself is the request.
    WholeEvent(&'a Value),
}

impl<'a> EventBody<'a> {
    pub fn from_event(event: &'a Value) -> Result<Self, ContractError> {
        let Some(object) = event.as_object() else {
            return Err(ContractError::EventNotObject);
        };

        match object.get("body") {
            None | Some(Value::Null) => Ok(Self::WholeEvent(event)),
            Some(Value::String(text)) => Ok(Self::Encoded(text)),
            Some(body) => Ok(Self::Structured(body)),
        }
    }

    pub fn into_request(self) -> Result<RequestBody, ContractError> {
        let decoded;
        let value = match self {
            Self::Encoded(text) => {
                decoded =
                    serde_json::from_str::<Value>(text).map_err(ContractError::MalformedBody)?;
                &decoded
            }
            Self::Structured(value) | Self::WholeEvent(value) => value,
        };

        if !value.is_object() {
            return Err(ContractError::BodyNotObject);
        }

        RequestBody::deserialize(value).map_err(ContractError::MalformedRequest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    WarmUp,
    Delete { user_id: Option<String> },
    Query { statement: Option<String> },
}

pub fn is_warm_up_event(event: &Value) -> bool {
    event.get("source").and_then(Value::as_str) == Some(SCHEDULER_SOURCE)
        && event.get("detail-type").and_then(Value::as_str) == Some(SCHEDULED_EVENT_DETAIL_TYPE)
}

pub fn normalize_event(event: &Value) -> Result<RequestBody, ContractError> {
    EventBody::from_event(event)?.into_request()
}

pub fn classify_event(event: &Value) -> Result<Route, ContractError> {
    if is_warm_up_event(event) {
        return Ok(Route::WarmUp);
    }

    let request = normalize_event(event)?;
    if request.query_type() == COGNITO_DELETE_QUERY_TYPE {
        return Ok(Route::Delete {
            user_id: request.user_id,
        });
    }

    Ok(Route::Query {
        statement: request.query.filter(|text| !text.is_empty()),
    })
}
