use async_trait::async_trait;
use serde_json::{Number, Value};
use sqlx::postgres::{PgConnectOptions, PgRow, PgValueFormat};
use sqlx::{
    Column, ConnectOptions, Connection, Executor, PgConnection, Row, TypeInfo, ValueRef,
};
use thiserror::Error;
use tracing::log::LevelFilter;
use tracing::{debug, warn};
use user_ops_core::config::StoreConfig;
use user_ops_core::contract::RowObject;

#[derive(Debug, Error)]
pub enum DataStoreError {
    #[error("{0}")]
    Connect(#[source] sqlx::Error),
    #[error("{0}")]
    Execute(#[source] sqlx::Error),
    #[error("failed to read column '{column}': {message}")]
    Decode { column: String, message: String },
}

/// Executes raw statement text and returns the materialized rows.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn fetch_rows(&self, statement: &str) -> Result<Vec<RowObject>, DataStoreError>;
}

/// Opens one PostgreSQL connection per call and closes it before returning.
#[derive(Debug, Clone)]
pub struct PostgresDataStore {
    config: StoreConfig,
}

impl PostgresDataStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .port(self.config.port)
            .log_statements(LevelFilter::Debug);
        if let Some(host) = &self.config.host {
            options = options.host(host);
        }
        if let Some(database) = &self.config.database {
            options = options.database(database);
        }
        if let Some(user) = &self.config.user {
            options = options.username(user);
        }
        if let Some(password) = &self.config.password {
            options = options.password(password);
        }
        options
    }
}

#[async_trait]
impl DataStore for PostgresDataStore {
    async fn fetch_rows(&self, statement: &str) -> Result<Vec<RowObject>, DataStoreError> {
        let mut connection = self
            .connect_options()
            .connect()
            .await
            .map_err(DataStoreError::Connect)?;

        let outcome = run_statement(&mut connection, statement).await;

        // Closed on every path once connected.
        if let Err(error) = connection.close().await {
            warn!(error = %error, "failed to close data store connection");
        }

        outcome
    }
}

async fn run_statement(
    connection: &mut PgConnection,
    statement: &str,
) -> Result<Vec<RowObject>, DataStoreError> {
    debug!(statement, "executing statement");
    let rows = Executor::fetch_all(&mut *connection, sqlx::raw_sql(statement))
        .await
        .map_err(DataStoreError::Execute)?;

    rows.iter().map(row_to_object).collect()
}

fn row_to_object(row: &PgRow) -> Result<RowObject, DataStoreError> {
    let mut object = RowObject::new();
    for (index, column) in row.columns().iter().enumerate() {
        let decode_error = |message: String| DataStoreError::Decode {
            column: column.name().to_string(),
            message,
        };

        let raw = row
            .try_get_raw(index)
            .map_err(|error| decode_error(error.to_string()))?;

        let value = if raw.is_null() {
            Value::Null
        } else {
            let type_name = raw.type_info().name().to_string();
            match raw.format() {
                PgValueFormat::Text => {
                    let text = raw
                        .as_str()
                        .map_err(|error| decode_error(error.to_string()))?;
                    json_from_text(&type_name, text)
                }
                // Not produced by the simple query protocol.
                PgValueFormat::Binary => {
                    let bytes = raw
                        .as_bytes()
                        .map_err(|error| decode_error(error.to_string()))?;
                    Value::String(String::from_utf8_lossy(bytes).into_owned())
                }
            }
        };

        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}

/// Maps a column's text rendering to JSON.
///
/// Booleans, integers, finite floats and JSON documents become native JSON
/// values. Everything else, timestamps and numerics included, is kept as the
/// database's own textual rendering.
pub fn json_from_text(type_name: &str, text: &str) -> Value {
    match type_name {
        "BOOL" => match text {
            "t" | "true" => Value::Bool(true),
            "f" | "false" => Value::Bool(false),
            _ => Value::String(text.to_string()),
        },
        "INT2" | "INT4" | "INT8" | "OID" => text
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(text.to_string())),
        "FLOAT4" | "FLOAT8" => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(text.to_string())),
        "JSON" | "JSONB" => {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        }
        _ => Value::String(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use user_ops_core::contract::DEFAULT_STATEMENT;

    use super::*;

    #[test]
    fn integers_become_numbers() {
        assert_eq!(json_from_text("INT4", "1"), json!(1));
        assert_eq!(json_from_text("INT8", "-9000000000"), json!(-9_000_000_000_i64));
    }

    #[test]
    fn booleans_use_postgres_text_form() {
        assert_eq!(json_from_text("BOOL", "t"), json!(true));
        assert_eq!(json_from_text("BOOL", "f"), json!(false));
    }

    #[test]
    fn non_finite_floats_are_stringified() {
        assert_eq!(json_from_text("FLOAT8", "1.5"), json!(1.5));
        assert_eq!(json_from_text("FLOAT8", "NaN"), json!("NaN"));
        assert_eq!(json_from_text("FLOAT4", "Infinity"), json!("Infinity"));
    }

    #[test]
    fn json_columns_are_embedded() {
        assert_eq!(
            json_from_text("JSONB", "{\"theme\": \"dark\"}"),
            json!({"theme": "dark"})
        );
    }

    #[test]
    fn temporal_and_numeric_values_are_stringified() {
        assert_eq!(
            json_from_text("TIMESTAMPTZ", "2024-03-01 09:30:00+00"),
            json!("2024-03-01 09:30:00+00")
        );
        assert_eq!(json_from_text("DATE", "2024-03-01"), json!("2024-03-01"));
        assert_eq!(json_from_text("NUMERIC", "12.50"), json!("12.50"));
        assert_eq!(
            json_from_text("UUID", "7f1c0a52-4a43-4c4e-9a0a-3f1f3c6c1d2e"),
            json!("7f1c0a52-4a43-4c4e-9a0a-3f1f3c6c1d2e")
        );
    }

    #[test]
    fn connect_options_default_port() {
        let store = PostgresDataStore::new(StoreConfig::default());
        assert_eq!(store.connect_options().get_port(), 5432);
    }

    #[test]
    fn statement_logging_stays_at_debug() {
        let store = PostgresDataStore::new(StoreConfig::default());
        let rendered = format!("{:?}", store.connect_options());
        assert!(rendered.contains("statements_level: Debug"));
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn statement_future_is_send() {
        // Type-checked only; the connection is never driven.
        fn check(connection: &mut PgConnection) {
            assert_send(&run_statement(connection, "SELECT 1 AS x"));
        }
        let _ = check;
    }

    #[test]
    fn fetch_rows_future_is_send() {
        let store = PostgresDataStore::new(StoreConfig::default());
        let future = store.fetch_rows(DEFAULT_STATEMENT);
        assert_send(&future);
    }
}
