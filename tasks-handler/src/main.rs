use std::sync::Arc;

use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use tracing::Instrument as _;

use tasks_handler::config::{HandlerConfig, StoreBackend};
use tasks_handler::dynamodb::DynamoDbTaskStore;
use tasks_handler::store::{InMemoryTaskStore, TaskStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cfg = HandlerConfig::from_env()?;
    tracing::info!(store = ?cfg.store, "starting");

    // Built once per execution environment and reused by every invocation it serves.
    let store: Arc<dyn TaskStore> = match cfg.store {
        StoreBackend::DynamoDb => {
            let store = DynamoDbTaskStore::from_config(&cfg).await;
            tracing::info!(table = %store.table_name(), "using DynamoDB store");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; tasks are lost when the environment is recycled");
            Arc::new(InMemoryTaskStore::new())
        }
    };

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let store = Arc::clone(&store);
        async move {
            let (payload, context) = event.into_parts();
            let span = tracing::info_span!("invocation", request_id = %context.request_id);
            let response = tasks_handler::handle_event(store.as_ref(), &payload)
                .instrument(span)
                .await;
            Ok::<_, lambda_runtime::Error>(response)
        }
    }))
    .await
    .map_err(|err| anyhow::anyhow!(err))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // CloudWatch stamps every line already.
    let log_format = std::env::var("AWS_LAMBDA_LOG_FORMAT").unwrap_or_default();
    if log_format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .without_time()
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .without_time()
            .init();
    }
}
