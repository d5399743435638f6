use std::collections::BTreeMap;
use std::process::{ExitCode, Termination};

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use error_stack::Report;
use kernel::KernelError;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub enum ErrorStatus {
    Kernel(Report<KernelError>),
    Validation(ValidationProblem),
}

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus::Kernel(e)
    }
}

impl From<ValidationProblem> for ErrorStatus {
    fn from(problem: ValidationProblem) -> Self {
        ErrorStatus::Validation(problem)
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> Response {
        let report = match self {
            ErrorStatus::Validation(problem) => return problem.into_response(),
            ErrorStatus::Kernel(report) => report,
        };
        match report.current_context() {
            KernelError::Unauthenticated => {
                tracing::debug!("rejected request: {report:?}");
                StatusCode::UNAUTHORIZED.into_response()
            }
            KernelError::InvalidArgument { field } => {
                tracing::warn!("rejected request: {report:?}");
                let field = request_field(field);
                let message = format!("The {field} field is required.");
                ValidationProblem::new()
                    .with_error(field, message)
                    .into_response()
            }
            KernelError::PhonebookNotFound { .. } => {
                tracing::warn!("rejected request: {report:?}");
                (StatusCode::BAD_REQUEST, "User Phonebook not found").into_response()
            }
            KernelError::StorageConstraint => {
                tracing::warn!("rejected request: {report:?}");
                StatusCode::BAD_REQUEST.into_response()
            }
            KernelError::Timeout => {
                tracing::error!("storage unavailable: {report:?}");
                StatusCode::SERVICE_UNAVAILABLE.into_response()
            }
            KernelError::Internal => {
                tracing::error!("request failed: {report:?}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Converts a snake_case argument name to the camelCase key used in request bodies.
fn request_field(field: &str) -> String {
    let mut parts = field.split('_');
    let mut name = parts.next().unwrap_or_default().to_owned();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}

static VALIDATION_TYPE: &str = "https://tools.ietf.org/html/rfc7231#section-6.5.1";
static VALIDATION_TITLE: &str = "One or more validation errors occurred.";

/// Body of a 400 response for a request that failed field validation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationProblem {
    r#type: &'static str,
    title: &'static str,
    status: u16,
    trace_id: String,
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationProblem {
    pub fn new() -> Self {
        Self {
            r#type: VALIDATION_TYPE,
            title: VALIDATION_TITLE,
            status: StatusCode::BAD_REQUEST.as_u16(),
            trace_id: Uuid::new_v4().simple().to_string(),
            errors: BTreeMap::new(),
        }
    }

    pub fn with_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add_error(field, message);
        self
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Default for ValidationProblem {
    fn default() -> Self {
        Self::new()
    }
}

impl From<JsonRejection> for ValidationProblem {
    fn from(rejection: JsonRejection) -> Self {
        ValidationProblem::new().with_error("$", rejection.body_text())
    }
}

impl IntoResponse for ValidationProblem {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, axum::Json(self)).into_response()
    }
}
