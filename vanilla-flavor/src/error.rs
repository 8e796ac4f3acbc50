//! JSON-RPC error handling
//!
//! Maps failures at every stage of a call (body parsing, envelope checks,
//! parameter decoding, the plugin itself) to JSON-RPC error objects.

use tracing::{error, warn};
use vanilla_common::rpc::{code, ErrorObject};

/// RPC error types with standardized error objects
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// -32700: body is not JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// -32600: JSON but not a valid request envelope
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// -32602: params do not match the method's shape
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// -32000: the plugin rejected the call
    #[error(transparent)]
    Plugin(#[from] vanilla_common::Error),
}

impl RpcError {
    pub fn code(&self) -> i64 {
        match self {
            RpcError::Parse(_) => code::PARSE_ERROR,
            RpcError::InvalidRequest(_) => code::INVALID_REQUEST,
            RpcError::MethodNotFound(_) => code::METHOD_NOT_FOUND,
            RpcError::InvalidParams(_) => code::INVALID_PARAMS,
            RpcError::Internal(_) => code::INTERNAL_ERROR,
            RpcError::Plugin(_) => code::PLUGIN_ERROR,
        }
    }

    /// Convert error to a JSON-RPC error object
    pub fn to_error_object(&self) -> ErrorObject {
        match self {
            RpcError::Parse(_) | RpcError::InvalidRequest(_) | RpcError::MethodNotFound(_) => {
                warn!("Rejected RPC request: {}", self)
            }
            RpcError::Internal(_) => error!("Internal RPC error: {}", self),
            RpcError::InvalidParams(_) | RpcError::Plugin(_) => {}
        }

        ErrorObject {
            code: self.code(),
            message: self.to_string(),
            data: None,
        }
    }
}
