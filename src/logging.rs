//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// The number of bytes of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED_FIELDS: [&str; 3] = ["password", "new_password", "confirm_password"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full body is logged at the `debug` level.
/// Password fields in request bodies are never logged, whatever the content type.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_text = match body_to_text(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    log_request(&parts, &redact_passwords(&body_text));

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_text = match body_to_text(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

async fn body_to_text(body: Body) -> Result<String, axum::Error> {
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok(String::from_utf8_lossy(&body_bytes).to_string())
}

const REDACTED_BODY: &str = "<body redacted: may contain a password>";

/// Replace the value of any password field in a JSON object with asterisks.
///
/// Any other text that mentions a password field, such as malformed JSON or a
/// form body, is replaced entirely by a placeholder.
fn redact_passwords(body_text: &str) -> String {
    let Ok(Value::Object(mut object)) = serde_json::from_str::<Value>(body_text) else {
        if REDACTED_FIELDS.iter().any(|field| body_text.contains(field)) {
            return REDACTED_BODY.to_owned();
        }

        return body_text.to_owned();
    };

    for field in REDACTED_FIELDS {
        if let Some(value) = object.get_mut(field) {
            *value = Value::String("********".to_owned());
        }
    }

    Value::Object(object).to_string()
}

/// The longest prefix of `text` that fits in [LOG_BODY_LENGTH_LIMIT] bytes.
fn truncate(text: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {}...",
            parts.method,
            parts.uri,
            truncate(body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {}...",
            parts.status,
            truncate(body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, middleware, routing::post};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use super::{
        LOG_BODY_LENGTH_LIMIT, REDACTED_BODY, logging_middleware, redact_passwords, truncate,
    };

    #[test]
    fn redacts_password_fields() {
        let got = redact_passwords(r#"{"username":"alice","password":"hunter2"}"#);
        let got: Value = serde_json::from_str(&got).unwrap();

        assert_eq!(got, json!({"username": "alice", "password": "********"}));
    }

    #[test]
    fn leaves_other_json_alone() {
        let text = r#"{"name":"Countdown","amount":"12.50"}"#;
        let got: Value = serde_json::from_str(&redact_passwords(text)).unwrap();

        assert_eq!(got, json!({"name": "Countdown", "amount": "12.50"}));
    }

    #[test]
    fn plain_text_without_passwords_is_unchanged() {
        assert_eq!(redact_passwords("year=2025"), "year=2025");
        assert_eq!(redact_passwords(""), "");
    }

    #[test]
    fn malformed_json_with_password_is_redacted() {
        let got = redact_passwords(r#"{"username":"test","password":"hunter2",}"#);

        assert!(!got.contains("hunter2"), "password leaked into log: {got}");
        assert_eq!(got, REDACTED_BODY);
    }

    #[test]
    fn form_body_with_password_is_redacted() {
        let got = redact_passwords("username=test&new_password=hunter2&remember_me=on");

        assert!(!got.contains("hunter2"), "password leaked into log: {got}");
    }

    #[test]
    fn password_inside_nested_json_is_redacted() {
        let got = redact_passwords(r#"[{"password":"hunter2"}]"#);

        assert!(!got.contains("hunter2"), "password leaked into log: {got}");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "é".repeat(LOG_BODY_LENGTH_LIMIT);

        let got = truncate(&text);

        assert!(got.len() <= LOG_BODY_LENGTH_LIMIT);
        assert_eq!(got.chars().count(), LOG_BODY_LENGTH_LIMIT / 2);
    }

    #[tokio::test]
    async fn passes_body_through_unchanged() {
        let app = Router::new()
            .route("/echo", post(|Json(body): Json<Value>| async move { Json(body) }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app);
        let body = json!({"username": "alice", "password": "hunter2"});

        let response = server.post("/echo").json(&body).await;

        response.assert_status_ok();
        response.assert_json(&body);
    }

    #[tokio::test]
    async fn passes_text_body_through_after_redacting_log() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app);
        let body = r#"{"username":"test","password":"hunter2",}"#;

        let response = server.post("/echo").text(body).await;

        response.assert_status_ok();
        response.assert_text(body);
    }
}
