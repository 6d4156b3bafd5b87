use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Wrapper for API responses that renders the success envelope
/// `{success, message?, count?, data?}`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    data: Option<T>,
    message: Option<String>,
    count: Option<usize>,
    status_code: StatusCode,
}

impl ApiResponse<()> {
    /// A response that carries only a message, e.g. after a delete
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: Some(message.into()),
            count: None,
            status_code: StatusCode::OK,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
            count: None,
            status_code: StatusCode::OK,
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            ..Self::success(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

fn build_envelope(
    data: Option<&impl Serialize>,
    message: Option<&str>,
    count: Option<usize>,
) -> Result<Value, serde_json::Error> {
    let mut envelope = Map::new();
    envelope.insert("success".to_string(), Value::Bool(true));
    if let Some(message) = message {
        envelope.insert("message".to_string(), Value::String(message.to_string()));
    }
    if let Some(count) = count {
        envelope.insert("count".to_string(), Value::from(count));
    }
    if let Some(data) = data {
        envelope.insert("data".to_string(), serde_json::to_value(data)?);
    }
    Ok(Value::Object(envelope))
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let envelope = match build_envelope(
            self.data.as_ref(),
            self.message.as_deref(),
            self.count,
        ) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "Failed to format response"
                    })),
                )
                    .into_response();
            }
        };

        (self.status_code, Json(envelope)).into_response()
    }
}

/// Handler return type: a success envelope or the mapped error envelope
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_with_data_only() {
        let body = build_envelope(Some(&json!({"id": 1})), None, None).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], 1);
        assert!(body.get("message").is_none());
        assert!(body.get("count").is_none());
    }

    #[test]
    fn envelope_with_message_and_count() {
        let body = build_envelope(Some(&json!([1, 2])), Some("ok"), Some(2)).unwrap();
        assert_eq!(body["message"], "ok");
        assert_eq!(body["count"], 2);
    }

    #[test]
    fn envelope_message_only() {
        let body = build_envelope(None::<&Value>, Some("Note deleted successfully"), None).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Note deleted successfully");
        assert!(body.get("data").is_none());
    }
}
