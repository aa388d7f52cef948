//! DynamoDB implementation of [`TaskStore`].
//!
//! The table uses `id` (String) as its partition key. `titulo`, `descricao` and `data` are stored
//! as `S` attributes when set and as `NULL` attributes when absent. `data` is a DynamoDB reserved
//! word, so every expression addresses it through the `#dt` placeholder.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use crate::config::HandlerConfig;
use crate::store::{StoreError, TaskStore};
use crate::task::{Task, TaskFields};

const ATTR_ID: &str = "id";
const ATTR_TITULO: &str = "titulo";
const ATTR_DESCRICAO: &str = "descricao";
const ATTR_DATA: &str = "data";

const UPDATE_EXPRESSION: &str = "SET titulo = :t, descricao = :d, #dt = :dt";
const DATE_FILTER_EXPRESSION: &str = "#dt = :dt";

type Item = HashMap<String, AttributeValue>;

/// [`TaskStore`] backed by a single DynamoDB table.
#[derive(Debug, Clone)]
pub struct DynamoDbTaskStore {
    client: Client,
    table_name: String,
}

impl DynamoDbTaskStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Build a client using standard AWS credential resolution plus the config overrides.
    pub async fn from_config(cfg: &HandlerConfig) -> Self {
        let mut loader = aws_config::from_env();
        if let Some(region) = &cfg.aws_region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(endpoint) = &cfg.dynamodb_endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_cfg = loader.load().await;
        Self::new(Client::new(&sdk_cfg), cfg.table_name.clone())
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

fn map_sdk_error<E>(operation: &'static str, err: E) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StoreError::Backend {
        operation,
        message: DisplayErrorContext(&err).to_string(),
        source: Some(Box::new(err)),
    }
}

fn optional_string(value: Option<&String>) -> AttributeValue {
    match value {
        Some(s) => AttributeValue::S(s.clone()),
        None => AttributeValue::Null(true),
    }
}

fn task_to_item(task: &Task) -> Item {
    HashMap::from([
        (ATTR_ID.to_string(), AttributeValue::S(task.id.clone())),
        (ATTR_TITULO.to_string(), optional_string(task.titulo.as_ref())),
        (ATTR_DESCRICAO.to_string(), optional_string(task.descricao.as_ref())),
        (ATTR_DATA.to_string(), optional_string(task.data.as_ref())),
    ])
}

fn read_optional(item: &Item, id: &str, name: &str) -> Result<Option<String>, StoreError> {
    match item.get(name) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(AttributeValue::S(s)) => Ok(Some(s.clone())),
        Some(other) => Err(StoreError::MalformedItem {
            id: id.to_string(),
            message: format!("attribute {name} is not a string: {other:?}"),
        }),
    }
}

fn task_from_item(item: &Item) -> Result<Task, StoreError> {
    let id = item
        .get(ATTR_ID)
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| StoreError::MalformedItem {
            id: "<unknown>".to_string(),
            message: "missing string id attribute".to_string(),
        })?;

    Ok(Task {
        id: id.clone(),
        titulo: read_optional(item, id, ATTR_TITULO)?,
        descricao: read_optional(item, id, ATTR_DESCRICAO)?,
        data: read_optional(item, id, ATTR_DATA)?,
    })
}

#[async_trait]
impl TaskStore for DynamoDbTaskStore {
    async fn put(&self, task: &Task) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(task_to_item(task)))
            .send()
            .await
            .map_err(|err| map_sdk_error("PutItem", err))?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Task>, StoreError> {
        let out = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|err| map_sdk_error("GetItem", err))?;

        out.item().map(task_from_item).transpose()
    }

    async fn update(&self, id: &str, fields: TaskFields) -> Result<(), StoreError> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, AttributeValue::S(id.to_string()))
            .update_expression(UPDATE_EXPRESSION)
            .expression_attribute_names("#dt", ATTR_DATA)
            .expression_attribute_values(":t", optional_string(fields.titulo.as_ref()))
            .expression_attribute_values(":d", optional_string(fields.descricao.as_ref()))
            .expression_attribute_values(":dt", optional_string(fields.data.as_ref()))
            .send()
            .await
            .map_err(|err| map_sdk_error("UpdateItem", err))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|err| map_sdk_error("DeleteItem", err))?;
        Ok(())
    }

    async fn scan_by_date(&self, date: &str) -> Result<Vec<Task>, StoreError> {
        let mut tasks = Vec::new();
        let mut exclusive_start_key = None;
        let mut pages = 0usize;

        loop {
            let out = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression(DATE_FILTER_EXPRESSION)
                .expression_attribute_names("#dt", ATTR_DATA)
                .expression_attribute_values(":dt", AttributeValue::S(date.to_string()))
                .set_exclusive_start_key(exclusive_start_key.take())
                .send()
                .await
                .map_err(|err| map_sdk_error("Scan", err))?;
            pages += 1;

            for item in out.items() {
                tasks.push(task_from_item(item)?);
            }

            match out.last_evaluated_key() {
                Some(last_key) if !last_key.is_empty() => {
                    exclusive_start_key = Some(last_key.clone());
                }
                _ => break,
            }
        }

        tracing::debug!(date = %date, pages, matches = tasks.len(), "scan by date finished");
        Ok(tasks)
    }
}
