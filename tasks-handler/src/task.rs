//! The task record and the request body used to create or overwrite it.

use serde::{Deserialize, Serialize};

/// A stored task.
///
/// Field names are the wire names (`titulo`, `descricao`, `data`). `data` is an opaque string: it
/// is compared for equality but never parsed as a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

impl Task {
    /// Mint a task with a fresh UUID v4 id.
    pub fn new(fields: TaskFields) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), fields)
    }

    pub fn with_id(id: impl Into<String>, fields: TaskFields) -> Self {
        Self {
            id: id.into(),
            titulo: fields.titulo,
            descricao: fields.descricao,
            data: fields.data,
        }
    }

    /// Overwrite every caller-owned field. The id is left untouched.
    pub fn apply(&mut self, fields: TaskFields) {
        self.titulo = fields.titulo;
        self.descricao = fields.descricao;
        self.data = fields.data;
    }
}

/// Caller-supplied task fields (POST and PUT bodies). Every field is optional and unknown keys
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskFields {
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tasks_get_distinct_ids() {
        let a = Task::new(TaskFields::default());
        let b = Task::new(TaskFields::default());
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn serializes_absent_fields_as_null() {
        let task = Task::with_id(
            "t-1",
            TaskFields {
                titulo: Some("Buy milk".into()),
                ..Default::default()
            },
        );
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": "t-1", "titulo": "Buy milk", "descricao": null, "data": null})
        );
    }

    #[test]
    fn apply_overwrites_all_fields_and_keeps_id() {
        let mut task = Task::with_id(
            "t-1",
            TaskFields {
                titulo: Some("a".into()),
                descricao: Some("b".into()),
                data: Some("01/01/2025".into()),
            },
        );
        task.apply(TaskFields {
            titulo: Some("c".into()),
            ..Default::default()
        });
        assert_eq!(task.id, "t-1");
        assert_eq!(task.titulo.as_deref(), Some("c"));
        assert!(task.descricao.is_none());
        assert!(task.data.is_none());
    }

    #[test]
    fn fields_ignore_unknown_keys_and_reject_wrong_types() {
        let fields: TaskFields =
            serde_json::from_str(r#"{"titulo":"x","prioridade":3,"data":null}"#).unwrap();
        assert_eq!(fields.titulo.as_deref(), Some("x"));
        assert!(fields.data.is_none());

        assert!(serde_json::from_str::<TaskFields>(r#"{"titulo": 5}"#).is_err());
        assert!(serde_json::from_str::<TaskFields>("[1, 2]").is_err());
    }
}
