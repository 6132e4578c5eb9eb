use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};
use user_ops_core::config::AppConfig;
use user_ops_core::contract::{
    boundary_error_response, delete_failed_response, missing_user_id_response,
    query_success_response, user_already_deleted_response, user_deleted_response,
    warm_up_response, ApiGatewayResponse, DEFAULT_STATEMENT,
};
use user_ops_core::routing::{classify_event, ContractError, Route};

use crate::adapters::data_store::{DataStore, DataStoreError};
use crate::adapters::identity::{IdentityError, IdentityService};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error(transparent)]
    DataStore(#[from] DataStoreError),
}

/// Routes one inbound event and always produces a response envelope.
///
/// Failures that escape a route are reported through a single boundary as a
/// 500 carrying the error text.
pub async fn handle_event(
    event: Value,
    config: &AppConfig,
    identity: &dyn IdentityService,
    store: &dyn DataStore,
) -> ApiGatewayResponse {
    match dispatch(&event, config, identity, store).await {
        Ok(response) => response,
        Err(dispatch_error) => {
            error!(error = %dispatch_error, "request failed");
            boundary_error_response(&dispatch_error.to_string())
        }
    }
}

async fn dispatch(
    event: &Value,
    config: &AppConfig,
    identity: &dyn IdentityService,
    store: &dyn DataStore,
) -> Result<ApiGatewayResponse, DispatchError> {
    match classify_event(event)? {
        Route::WarmUp => {
            info!("warm-up ping received from scheduler");
            Ok(warm_up_response())
        }
        Route::Delete { user_id } => Ok(delete_user(user_id.as_deref(), config, identity).await),
        Route::Query { statement } => run_query(statement.as_deref(), config, store).await,
    }
}

async fn delete_user(
    user_id: Option<&str>,
    config: &AppConfig,
    identity: &dyn IdentityService,
) -> ApiGatewayResponse {
    let Some(user_id) = user_id.filter(|value| !value.is_empty()) else {
        return missing_user_id_response();
    };

    let Some(user_pool_id) = config.identity.user_pool_id.as_deref() else {
        warn!(user_id, "delete requested without a configured user pool");
        return delete_failed_response("USER_POOL_ID is not configured");
    };

    match identity.admin_delete_user(user_pool_id, user_id).await {
        Ok(()) => {
            info!(user_id, "user deleted from identity pool");
            user_deleted_response(user_id)
        }
        Err(IdentityError::UserNotFound) => {
            info!(user_id, "user already absent from identity pool");
            user_already_deleted_response()
        }
        Err(IdentityError::Service(message)) => {
            error!(user_id, error = %message, "identity pool delete failed");
            delete_failed_response(&message)
        }
    }
}

async fn run_query(
    statement: Option<&str>,
    config: &AppConfig,
    store: &dyn DataStore,
) -> Result<ApiGatewayResponse, DispatchError> {
    let statement = statement.unwrap_or(DEFAULT_STATEMENT);
    let rows = store.fetch_rows(statement).await?;
    info!(row_count = rows.len(), "query executed");

    Ok(query_success_response(
        rows,
        config.store.database.as_deref(),
        config.store.host.as_deref(),
    ))
}
