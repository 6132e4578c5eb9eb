use aws_config::{BehaviorVersion, Region};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{info, info_span, Instrument};
use user_ops_core::config::AppConfig;
use user_ops_lambda::adapters::data_store::PostgresDataStore;
use user_ops_lambda::adapters::identity::CognitoIdentityService;
use user_ops_lambda::handlers::dispatch::handle_event;
use user_ops_lambda::logging::init_logging;

struct RuntimeDependencies {
    config: AppConfig,
    identity: CognitoIdentityService,
    store: PostgresDataStore,
}

async fn build_dependencies() -> Result<RuntimeDependencies, Error> {
    let config = AppConfig::from_env()?;

    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = config.identity.region.clone() {
        loader = loader.region(Region::new(region));
    }
    let aws_config = loader.load().await;

    info!(
        user_pool_configured = config.identity.user_pool_id.is_some(),
        db_host = config.store.host.as_deref().unwrap_or("<unset>"),
        db_port = config.store.port,
        "runtime configured"
    );

    Ok(RuntimeDependencies {
        identity: CognitoIdentityService::new(aws_sdk_cognitoidentityprovider::Client::new(
            &aws_config,
        )),
        store: PostgresDataStore::new(config.store.clone()),
        config,
    })
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<Value, Error> {
    let span = info_span!("invocation", request_id = %event.context.request_id);
    let response = handle_event(event.payload, &deps.config, &deps.identity, &deps.store)
        .instrument(span)
        .await;
    serde_json::to_value(response)
        .map_err(|error| Error::from(format!("failed to serialize api response: {error}")))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();
    let deps = build_dependencies().await?;
    let deps = &deps;
    lambda_runtime::run(service_fn(move |event| handle_request(event, deps))).await
}
