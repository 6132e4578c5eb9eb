use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const DEFAULT_QUERY_TYPE: &str = "default";
pub const COGNITO_DELETE_QUERY_TYPE: &str = "cognito_delete";
pub const DEFAULT_STATEMENT: &str = "SELECT * FROM users WHERE deleted_at IS NULL";
pub const RESULT_TABLE: &str = "users";

pub const SCHEDULER_SOURCE: &str = "aws.events";
pub const SCHEDULED_EVENT_DETAIL_TYPE: &str = "Scheduled Event";

/// A single materialized row, keyed by column name in result-description order.
pub type RowObject = Map<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestBody {
    /// Absent and `null` both mean [`DEFAULT_QUERY_TYPE`].
    #[serde(rename = "queryType", default)]
    pub query_type: Option<String>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

impl RequestBody {
    pub fn query_type(&self) -> &str {
        self.query_type.as_deref().unwrap_or(DEFAULT_QUERY_TYPE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl ApiGatewayResponse {
    /// Decodes `body` back into JSON. Bodies built by this crate always decode.
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResult {
    pub table: String,
    pub count: usize,
    pub data: Vec<RowObject>,
}

impl QueryResult {
    pub fn from_rows(data: Vec<RowObject>) -> Self {
        Self {
            table: RESULT_TABLE.to_string(),
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuerySuccessBody {
    pub message: String,
    pub result: QueryResult,
    pub database: Option<String>,
    pub host: Option<String>,
}

pub fn warm_up_response() -> ApiGatewayResponse {
    json_response(200, json!({"message": "Lambda warmed up successfully"}))
}

pub fn missing_user_id_response() -> ApiGatewayResponse {
    delete_response(400, false, "userId is required".to_string())
}

pub fn user_deleted_response(user_id: &str) -> ApiGatewayResponse {
    delete_response(200, true, format!("User {user_id} deleted from Cognito"))
}

pub fn user_already_deleted_response() -> ApiGatewayResponse {
    delete_response(
        200,
        true,
        "User not found in Cognito (already deleted)".to_string(),
    )
}

pub fn delete_failed_response(error: &str) -> ApiGatewayResponse {
    delete_response(500, false, format!("Failed to delete from Cognito: {error}"))
}

pub fn query_success_response(
    rows: Vec<RowObject>,
    database: Option<&str>,
    host: Option<&str>,
) -> ApiGatewayResponse {
    let body = QuerySuccessBody {
        message: "Query executed successfully".to_string(),
        result: QueryResult::from_rows(rows),
        database: database.map(str::to_string),
        host: host.map(str::to_string),
    };
    match serde_json::to_value(&body) {
        Ok(value) => json_response(200, value),
        Err(error) => boundary_error_response(&error.to_string()),
    }
}

/// Envelope for any failure caught by the dispatcher's top-level boundary.
pub fn boundary_error_response(error: &str) -> ApiGatewayResponse {
    json_response(
        500,
        json!({
            "message": "Error executing query",
            "error": error,
        }),
    )
}

fn delete_response(status_code: u16, success: bool, message: String) -> ApiGatewayResponse {
    json_response(
        status_code,
        json!({
            "success": success,
            "message": message,
        }),
    )
}

fn json_response(status_code: u16, payload: Value) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        body: payload.to_string(),
    }
}
