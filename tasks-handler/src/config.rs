//! Handler configuration loaded from the Lambda environment.

use std::str::FromStr;

const DEFAULT_TABLE_NAME: &str = "Tasks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Which [`crate::store::TaskStore`] implementation backs the handler.
pub enum StoreBackend {
    #[default]
    DynamoDb,
    /// Process-local map. Useful for `cargo lambda watch` without AWS credentials.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dynamodb" | "ddb" => Ok(Self::DynamoDb),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => anyhow::bail!("unknown store backend: {other}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// DynamoDB table holding the tasks (`TASKS_TABLE_NAME`).
    pub table_name: String,
    /// Storage backend (`TASKS_STORE`).
    pub store: StoreBackend,
    /// Optional AWS region override for the DynamoDB client (`TASKS_AWS_REGION`).
    pub aws_region: Option<String>,
    /// Optional endpoint override, e.g. DynamoDB Local (`TASKS_DYNAMODB_ENDPOINT`).
    pub dynamodb_endpoint: Option<String>,
}

impl HandlerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let table_name = var("TASKS_TABLE_NAME").unwrap_or_else(|| DEFAULT_TABLE_NAME.into());

        let store = match var("TASKS_STORE") {
            Some(raw) => raw
                .parse()
                .map_err(|err| anyhow::anyhow!("invalid TASKS_STORE ({raw}): {err}"))?,
            None => StoreBackend::default(),
        };

        let dynamodb_endpoint = var("TASKS_DYNAMODB_ENDPOINT");
        if let Some(endpoint) = &dynamodb_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                anyhow::bail!("invalid TASKS_DYNAMODB_ENDPOINT ({endpoint}): expected an http(s) url");
            }
        }

        Ok(Self {
            table_name,
            store,
            aws_region: var("TASKS_AWS_REGION"),
            dynamodb_endpoint,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_for_unset_variables() {
        let cfg = HandlerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.table_name, "Tasks");
        assert_eq!(cfg.store, StoreBackend::DynamoDb);
        assert!(cfg.aws_region.is_none());
        assert!(cfg.dynamodb_endpoint.is_none());
    }

    #[test]
    fn reads_overrides() {
        let cfg = HandlerConfig::from_lookup(lookup(&[
            ("TASKS_TABLE_NAME", "tasks-dev"),
            ("TASKS_STORE", "Memory"),
            ("TASKS_AWS_REGION", "sa-east-1"),
            ("TASKS_DYNAMODB_ENDPOINT", "http://localhost:8000"),
        ]))
        .unwrap();
        assert_eq!(cfg.table_name, "tasks-dev");
        assert_eq!(cfg.store, StoreBackend::Memory);
        assert_eq!(cfg.aws_region.as_deref(), Some("sa-east-1"));
        assert_eq!(cfg.dynamodb_endpoint.as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let cfg = HandlerConfig::from_lookup(lookup(&[("TASKS_TABLE_NAME", "  ")])).unwrap();
        assert_eq!(cfg.table_name, "Tasks");
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = HandlerConfig::from_lookup(lookup(&[("TASKS_STORE", "redis")])).unwrap_err();
        assert!(err.to_string().contains("TASKS_STORE"));
    }

    #[test]
    fn rejects_endpoint_without_scheme() {
        let err = HandlerConfig::from_lookup(lookup(&[("TASKS_DYNAMODB_ENDPOINT", "localhost:8000")]))
            .unwrap_err();
        assert!(err.to_string().contains("TASKS_DYNAMODB_ENDPOINT"));
    }
}
