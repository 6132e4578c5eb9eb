//! Runs against a real PostgreSQL server configured through the usual
//! `DB_HOST`/`DB_NAME`/`DB_USER`/`DB_PASSWORD`/`DB_PORT` variables.
//!
//! Ignored by default; run with `cargo run -p xtask -- live-test`.

use serde_json::json;
use user_ops_core::config::AppConfig;
use user_ops_lambda::adapters::data_store::{DataStore, PostgresDataStore};

fn live_store() -> PostgresDataStore {
    let config = AppConfig::from_env().expect("live test configuration");
    PostgresDataStore::new(config.store)
}

#[tokio::test]
#[ignore]
async fn select_literal_returns_single_row() {
    let rows = live_store()
        .fetch_rows("SELECT 1 AS x")
        .await
        .expect("query should succeed");

    assert_eq!(rows.len(), 1);
    assert_eq!(serde_json::Value::Object(rows[0].clone()), json!({"x": 1}));
}

#[tokio::test]
#[ignore]
async fn columns_follow_statement_order_and_temporal_values_are_text() {
    let rows = live_store()
        .fetch_rows(
            "SELECT 'b'::text AS zeta, TIMESTAMPTZ '2024-03-01 09:30:00+00' AS alpha, \
             12.50::numeric AS amount, NULL::int AS missing, true AS flag",
        )
        .await
        .expect("query should succeed");

    let columns: Vec<&str> = rows[0].keys().map(String::as_str).collect();
    assert_eq!(columns, vec!["zeta", "alpha", "amount", "missing", "flag"]);
    assert!(rows[0]["alpha"].is_string());
    assert_eq!(rows[0]["amount"], json!("12.50"));
    assert_eq!(rows[0]["missing"], serde_json::Value::Null);
    assert_eq!(rows[0]["flag"], json!(true));
}

#[tokio::test]
#[ignore]
async fn invalid_statement_surfaces_execute_error() {
    let error = live_store()
        .fetch_rows("SELEC nonsense")
        .await
        .expect_err("statement should fail");

    assert!(error.to_string().contains("syntax error"));
}
