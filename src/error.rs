use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

/// One entry of a 422 body, shaped as `{loc, msg, type, input}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    pub loc: Vec<&'static str>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub input: serde_json::Value,
}

impl FieldError {
    pub fn int_parsing(source: &'static str, field: &'static str, input: &str) -> Self {
        Self {
            loc: vec![source, field],
            msg: "Input should be a valid integer, unable to parse string as an integer"
                .to_string(),
            kind: "int_parsing",
            input: json!(input),
        }
    }

    /// The query string as a whole could not be decoded, e.g. a repeated key.
    pub fn query_parsing(msg: String) -> Self {
        Self { loc: vec!["query"], msg, kind: "query_parsing", input: serde_json::Value::Null }
    }

    pub fn greater_than_equal(
        source: &'static str,
        field: &'static str,
        input: &str,
        bound: u64,
    ) -> Self {
        Self {
            loc: vec![source, field],
            msg: format!("Input should be greater than or equal to {bound}"),
            kind: "greater_than_equal",
            input: json!(input),
        }
    }

    pub fn less_than_equal(
        source: &'static str,
        field: &'static str,
        input: &str,
        bound: u64,
    ) -> Self {
        Self {
            loc: vec![source, field],
            msg: format!("Input should be less than or equal to {bound}"),
            kind: "less_than_equal",
            input: json!(input),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("request validation failed")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(detail) => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": detail }))).into_response()
            },
            AppError::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": errors })))
                    .into_response()
            },
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal Server Error" })),
                )
                    .into_response()
            },
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
