use std::fmt;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

use crate::entities::claim::SplitError;
use crate::interfaces::repositories::ledger_ifce::LedgerError;
use crate::interfaces::repositories::task_ifce::TaskStoreError;
use crate::middleware::ctx::Ctx;
use crate::services::claim_service::ClaimError;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CtxError {
    pub error: AppError,
    pub req_id: Uuid,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppError {
    Generic { description: String },
    Validation { description: String },
    AuthorizationFail,
    EntityFailIdNotFound { ident: String },
    InvalidTaskId { value: String },
    TaskInactive { task_id: String },
    AlreadyClaimed { user_id: String, task_id: String },
    UnsupportedMediaType,
    StoreUnavailable { source: String },
    PartialFailure { source: String },
    Config { source: String },
    Internal { source: String },
    Serde { source: String },
    SurrealDb { source: String },
}

/// Carries the req_id reported to the client and implements IntoResponse.
pub type CtxResult<T> = core::result::Result<T, CtxError>;
/// Any error raised before a response is composed.
pub type AppResult<T> = core::result::Result<T, AppError>;

impl std::error::Error for AppError {}

impl CtxError {
    pub fn from<T: Into<AppError>>(ctx: &Ctx) -> impl FnOnce(T) -> CtxError + '_ {
        |err| ctx.to_ctx_error(err.into())
    }

    pub fn status_code(&self) -> StatusCode {
        self.error.status_code()
    }
}

impl From<AppError> for CtxError {
    fn from(value: AppError) -> Self {
        CtxError {
            req_id: Uuid::new_v4(),
            error: value,
        }
    }
}

const TRY_AGAIN: &str = "Service temporarily unavailable, please try again later";
const INTERNAL: &str = "Internal error";

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic { description } => write!(f, "{description}"),
            Self::Validation { description } => write!(f, "{description}"),
            Self::AuthorizationFail => write!(f, "not authorized"),
            Self::EntityFailIdNotFound { ident } => write!(f, "Record id= {ident} not found"),
            Self::InvalidTaskId { value } => write!(f, "Invalid task id: {value}"),
            Self::TaskInactive { task_id } => write!(f, "Task {task_id} is no longer active"),
            Self::AlreadyClaimed { task_id, .. } => {
                write!(f, "Reward for task {task_id} was already claimed")
            }
            Self::UnsupportedMediaType => write!(f, "Unsupported content type"),
            Self::StoreUnavailable { .. } => write!(f, "{TRY_AGAIN}"),
            Self::Serde { source } => write!(f, "Serde error - {source}"),
            Self::PartialFailure { .. }
            | Self::Config { .. }
            | Self::Internal { .. }
            | Self::SurrealDb { .. } => {
                write!(f, "{INTERNAL}")
            }
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Generic { .. }
            | AppError::Validation { .. }
            | AppError::InvalidTaskId { .. }
            | AppError::TaskInactive { .. }
            | AppError::Serde { .. } => StatusCode::BAD_REQUEST,
            AppError::AuthorizationFail => StatusCode::UNAUTHORIZED,
            AppError::EntityFailIdNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::AlreadyClaimed { .. } => StatusCode::CONFLICT,
            AppError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::PartialFailure { .. }
            | AppError::Config { .. }
            | AppError::Internal { .. }
            | AppError::SurrealDb { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponseBody {
    pub status: String,
    pub message: String,
}

impl ErrorResponseBody {
    pub fn new(message: String) -> Self {
        ErrorResponseBody {
            status: "error".to_string(),
            message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let ctx_error: CtxError = self.into();
        ctx_error.into_response()
    }
}

impl IntoResponse for CtxError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            error!(req_id = %self.req_id, "->> into_response - {:?}", self.error);
        } else {
            warn!(req_id = %self.req_id, "->> into_response - {:?}", self.error);
        }
        let body = ErrorResponseBody::new(self.error.to_string());
        let mut response = (status_code, Json(body)).into_response();
        // the real error for the trace layer
        response.extensions_mut().insert(self.error);
        response
    }
}

// External Errors
impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde {
            source: value.to_string(),
        }
    }
}

impl From<surrealdb::Error> for AppError {
    fn from(value: surrealdb::Error) -> Self {
        Self::SurrealDb {
            source: value.to_string(),
        }
    }
}

impl From<CtxError> for AppError {
    fn from(value: CtxError) -> Self {
        value.error
    }
}

impl From<SplitError> for AppError {
    fn from(value: SplitError) -> Self {
        Self::Config {
            source: value.to_string(),
        }
    }
}

impl From<TaskStoreError> for AppError {
    fn from(value: TaskStoreError) -> Self {
        match value {
            TaskStoreError::InvalidData(description) => Self::Validation { description },
            TaskStoreError::Store(source) => Self::StoreUnavailable { source },
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(value: LedgerError) -> Self {
        match value {
            LedgerError::DuplicateClaim { user_id, task_id } => Self::AlreadyClaimed {
                user_id: user_id.to_string(),
                task_id: task_id.to_string(),
            },
            LedgerError::InvalidAmount(amount) => Self::Validation {
                description: format!("amount {amount} can not be stored"),
            },
            LedgerError::Store(source) => Self::StoreUnavailable { source },
        }
    }
}

impl From<ClaimError> for AppError {
    fn from(value: ClaimError) -> Self {
        match value {
            ClaimError::InvalidTaskId(value) => Self::InvalidTaskId { value },
            ClaimError::TaskNotFound(task_id) => Self::EntityFailIdNotFound {
                ident: task_id.to_string(),
            },
            ClaimError::TaskInactive(task_id) => Self::TaskInactive {
                task_id: task_id.to_string(),
            },
            ClaimError::AlreadyClaimed { user_id, task_id } => Self::AlreadyClaimed {
                user_id: user_id.to_string(),
                task_id: task_id.to_string(),
            },
            ClaimError::StoreUnavailable(source) => Self::StoreUnavailable { source },
            ClaimError::PartialFailure(source) => Self::PartialFailure { source },
        }
    }
}
