//! Operation classification and dispatch.
//!
//! Routing is a first-match-wins classification over method + path shape:
//!
//! | Method | Path                               | Operation    |
//! |--------|------------------------------------|--------------|
//! | POST   | `/tasks`                           | create       |
//! | GET    | `/tasks/{id}`                      | read         |
//! | PUT    | `/tasks/{id}`                      | update       |
//! | DELETE | `/tasks/{id}`                      | delete       |
//! | GET    | `/tasks_by_date` (prefix)          | list by date |
//!
//! Anything else is answered with 400 "Rota não suportada".

use http::{Method, StatusCode};
use serde_json::Value;

use crate::event::TaskRequest;
use crate::response::{
    TaskResponse, ERR_INVALID_JSON, ERR_STORAGE, MSG_DATE_REQUIRED, MSG_TASK_DELETED,
    MSG_TASK_NOT_FOUND, MSG_TASK_UPDATED, MSG_UNSUPPORTED_ROUTE,
};
use crate::store::{StoreError, TaskStore};
use crate::task::{Task, TaskFields};

const TASKS_PATH: &str = "/tasks";
const TASK_ITEM_PREFIX: &str = "/tasks/";
const TASKS_BY_DATE_PATH: &str = "/tasks_by_date";
const DATE_QUERY_PARAM: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of classifying a request.
pub enum Route<'a> {
    Create,
    Read { id: &'a str },
    Update { id: &'a str },
    Delete { id: &'a str },
    ListByDate,
    Unsupported,
}

impl Route<'_> {
    fn name(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read { .. } => "read",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::ListByDate => "list_by_date",
            Self::Unsupported => "unsupported",
        }
    }

    /// Task id addressed by item routes.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Read { id } | Self::Update { id } | Self::Delete { id } => Some(*id),
            _ => None,
        }
    }
}

/// Classify a request. The table order matters: the first matching row wins.
pub fn classify(req: &TaskRequest) -> Route<'_> {
    let Some(method) = &req.method else {
        return Route::Unsupported;
    };
    let path = req.path.as_str();
    let is_item_path = path.starts_with(TASK_ITEM_PREFIX);

    let route = if *method == Method::POST && path == TASKS_PATH {
        Route::Create
    } else if *method == Method::GET && is_item_path {
        Route::Read {
            id: req.resource_id(),
        }
    } else if *method == Method::PUT && is_item_path {
        Route::Update {
            id: req.resource_id(),
        }
    } else if *method == Method::DELETE && is_item_path {
        Route::Delete {
            id: req.resource_id(),
        }
    } else if *method == Method::GET && path.starts_with(TASKS_BY_DATE_PATH) {
        Route::ListByDate
    } else {
        Route::Unsupported
    };

    // DynamoDB rejects empty key values, so `/tasks/` addresses nothing.
    match route {
        Route::Read { id } | Route::Update { id } | Route::Delete { id } if id.is_empty() => {
            Route::Unsupported
        }
        route => route,
    }
}

/// Entry point for one Lambda invocation: log the raw event, normalize it and dispatch it.
pub async fn handle_event(store: &dyn TaskStore, event: &Value) -> TaskResponse {
    tracing::info!(event = %event, "received event");

    match TaskRequest::from_event(event) {
        Ok(req) => dispatch(store, &req).await,
        Err(err) => {
            tracing::warn!(error = %err, "event is not an API Gateway proxy event");
            TaskResponse::msg(StatusCode::BAD_REQUEST, MSG_UNSUPPORTED_ROUTE)
        }
    }
}

/// Route a normalized request and perform its storage operation.
pub async fn dispatch(store: &dyn TaskStore, req: &TaskRequest) -> TaskResponse {
    let has_body = matches!(&req.method, Some(m) if *m == Method::POST || *m == Method::PUT);
    let fields = if has_body {
        match req.parse_fields() {
            Ok(fields) => fields,
            Err(err) => {
                tracing::warn!(error = %err, path = %req.path, "rejecting malformed body");
                return TaskResponse::error(StatusCode::BAD_REQUEST, ERR_INVALID_JSON);
            }
        }
    } else {
        TaskFields::default()
    };

    let route = classify(req);
    tracing::debug!(route = route.name(), path = %req.path, "classified request");

    let result = match &route {
        Route::Create => create(store, fields).await,
        Route::Read { id } => read(store, id).await,
        Route::Update { id } => update(store, id, fields).await,
        Route::Delete { id } => delete(store, id).await,
        Route::ListByDate => match req.query(DATE_QUERY_PARAM) {
            Some(date) => list_by_date(store, date).await,
            None => Ok(TaskResponse::msg(StatusCode::BAD_REQUEST, MSG_DATE_REQUIRED)),
        },
        Route::Unsupported => {
            tracing::info!(method = ?req.method, path = %req.path, "unsupported route");
            Ok(TaskResponse::msg(StatusCode::BAD_REQUEST, MSG_UNSUPPORTED_ROUTE))
        }
    };

    result.unwrap_or_else(|err| {
        tracing::error!(
            error = %err,
            route = route.name(),
            id = route.id().unwrap_or_default(),
            path = %req.path,
            "storage operation failed"
        );
        TaskResponse::error(StatusCode::INTERNAL_SERVER_ERROR, ERR_STORAGE)
    })
}

async fn create(store: &dyn TaskStore, fields: TaskFields) -> Result<TaskResponse, StoreError> {
    let task = Task::new(fields);
    store.put(&task).await?;
    tracing::info!(id = %task.id, "task created");
    Ok(TaskResponse::json(StatusCode::CREATED, &task))
}

async fn read(store: &dyn TaskStore, id: &str) -> Result<TaskResponse, StoreError> {
    Ok(match store.get(id).await? {
        Some(task) => TaskResponse::json(StatusCode::OK, &task),
        None => TaskResponse::msg(StatusCode::NOT_FOUND, MSG_TASK_NOT_FOUND),
    })
}

async fn update(
    store: &dyn TaskStore,
    id: &str,
    fields: TaskFields,
) -> Result<TaskResponse, StoreError> {
    store.update(id, fields).await?;
    tracing::info!(id = %id, "task updated");
    Ok(TaskResponse::msg(StatusCode::OK, MSG_TASK_UPDATED))
}

async fn delete(store: &dyn TaskStore, id: &str) -> Result<TaskResponse, StoreError> {
    store.delete(id).await?;
    tracing::info!(id = %id, "task deleted");
    Ok(TaskResponse::msg(StatusCode::OK, MSG_TASK_DELETED))
}

async fn list_by_date(store: &dyn TaskStore, date: &str) -> Result<TaskResponse, StoreError> {
    let tasks = store.scan_by_date(date).await?;
    Ok(TaskResponse::json(StatusCode::OK, &tasks))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_route(method: Method, path: &str, expected: Route<'_>) {
        let req = TaskRequest::new(method.clone(), path);
        assert_eq!(classify(&req), expected, "{method} {path}");
    }

    #[test]
    fn classifies_each_operation() {
        assert_route(Method::POST, "/tasks", Route::Create);
        assert_route(Method::GET, "/tasks/1", Route::Read { id: "1" });
        assert_route(Method::PUT, "/tasks/1", Route::Update { id: "1" });
        assert_route(Method::DELETE, "/tasks/1", Route::Delete { id: "1" });
        assert_route(Method::GET, "/tasks_by_date", Route::ListByDate);
        assert_route(Method::GET, "/tasks_by_date/extra", Route::ListByDate);
    }

    #[test]
    fn unmatched_shapes_are_unsupported() {
        assert_route(Method::POST, "/tasks/1", Route::Unsupported);
        assert_route(Method::GET, "/tasks", Route::Unsupported);
        assert_route(Method::PUT, "/tasks", Route::Unsupported);
        assert_route(Method::DELETE, "/tasks", Route::Unsupported);
        assert_route(Method::PATCH, "/tasks/123", Route::Unsupported);
        assert_route(Method::POST, "/tasks_by_date", Route::Unsupported);
        assert_route(Method::GET, "/other", Route::Unsupported);
    }

    #[test]
    fn empty_id_is_unsupported() {
        assert_route(Method::GET, "/tasks/", Route::Unsupported);
        assert_route(Method::DELETE, "/tasks/", Route::Unsupported);
    }

    #[test]
    fn missing_method_is_unsupported() {
        let req = TaskRequest {
            path: "/tasks".to_string(),
            ..Default::default()
        };
        assert_eq!(classify(&req), Route::Unsupported);
    }

    #[test]
    fn nested_item_path_uses_last_segment() {
        assert_route(Method::GET, "/tasks/a/b", Route::Read { id: "b" });
    }

    #[test]
    fn only_item_routes_carry_an_id() {
        assert_eq!(Route::Read { id: "1" }.id(), Some("1"));
        assert_eq!(Route::Update { id: "2" }.id(), Some("2"));
        assert_eq!(Route::Delete { id: "3" }.id(), Some("3"));
        assert_eq!(Route::Create.id(), None);
        assert_eq!(Route::ListByDate.id(), None);
        assert_eq!(Route::Unsupported.id(), None);
    }

    #[test]
    fn path_parameter_overrides_segment() {
        let req = TaskRequest::new(Method::PUT, "/tasks/ignored").with_path_parameter("id", "abc");
        assert_eq!(classify(&req), Route::Update { id: "abc" });
    }
}
