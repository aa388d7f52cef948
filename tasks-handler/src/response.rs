//! API Gateway proxy response returned by the handler.

use std::collections::HashMap;

use http::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};

pub const MSG_TASK_NOT_FOUND: &str = "Tarefa não encontrada";
pub const MSG_TASK_UPDATED: &str = "Tarefa atualizada";
pub const MSG_TASK_DELETED: &str = "Tarefa excluída";
pub const MSG_DATE_REQUIRED: &str = "Parâmetro 'data' é obrigatório";
pub const MSG_UNSUPPORTED_ROUTE: &str = "Rota não suportada";
pub const ERR_INVALID_JSON: &str = "Corpo da requisição não é um JSON válido";
pub const ERR_STORAGE: &str = "Erro interno ao acessar o armazenamento";
pub const ERR_INTERNAL: &str = "Erro interno";

fn json_headers() -> HashMap<String, String> {
    HashMap::from([("content-type".to_string(), "application/json".to_string())])
}

/// Response in the shape API Gateway expects from a proxy integration (v1 and v2 payloads).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TaskResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    /// JSON document, serialized.
    pub body: String,
    #[serde(rename = "isBase64Encoded")]
    pub is_base64_encoded: bool,
}

impl TaskResponse {
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Self {
        let body = match serde_json::to_string(body) {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize response body");
                return Self::error(StatusCode::INTERNAL_SERVER_ERROR, ERR_INTERNAL);
            }
        };

        Self {
            status_code: status.as_u16(),
            headers: json_headers(),
            body,
            is_base64_encoded: false,
        }
    }

    /// `{"msg": ...}` acknowledgement or rejection.
    pub fn msg(status: StatusCode, msg: &str) -> Self {
        Self::json(status, &json!({ "msg": msg }))
    }

    /// `{"error": ...}` failure.
    pub fn error(status: StatusCode, error: &str) -> Self {
        Self {
            status_code: status.as_u16(),
            headers: json_headers(),
            body: json!({ "error": error }).to_string(),
            is_base64_encoded: false,
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Parse the body back into JSON. Mostly useful to callers inspecting responses.
    pub fn body_json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msg_response_shape() {
        let resp = TaskResponse::msg(StatusCode::NOT_FOUND, MSG_TASK_NOT_FOUND);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.body_json().unwrap(),
            json!({ "msg": "Tarefa não encontrada" })
        );
        assert_eq!(
            resp.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn serializes_as_proxy_response() {
        let resp = TaskResponse::error(StatusCode::BAD_REQUEST, ERR_INVALID_JSON);
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["statusCode"], 400);
        assert_eq!(value["isBase64Encoded"], false);
        assert_eq!(
            serde_json::from_str::<Value>(value["body"].as_str().unwrap()).unwrap(),
            json!({ "error": ERR_INVALID_JSON })
        );
    }
}
