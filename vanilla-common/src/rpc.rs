//! JSON-RPC 2.0 wire types for talking to flavor plugins

use crate::{AllocationMethod, Any, Health, InstanceDescription, InstanceSpec, InterfaceSpec};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// Method names served by a flavor plugin
pub mod method {
    pub const IMPLEMENTS: &str = "Plugin.Implements";
    pub const VALIDATE: &str = "Flavor.Validate";
    pub const PREPARE: &str = "Flavor.Prepare";
    pub const HEALTHY: &str = "Flavor.Healthy";
    pub const DRAIN: &str = "Flavor.Drain";
}

/// Standard JSON-RPC error codes, plus the application error code
pub mod code {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const PLUGIN_ERROR: i64 = -32000;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Value,
}

impl Request {
    pub fn new<P: Serialize>(method: &str, params: &P, id: u64) -> serde_json::Result<Self> {
        Ok(Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.to_string(),
            params: serde_json::to_value(params)?,
            id: Value::from(id),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
    #[serde(default)]
    pub id: Value,
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn failure(id: Value, error: ErrorObject) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl std::fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementsResponse {
    #[serde(rename = "APIs")]
    pub apis: Vec<InterfaceSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ValidateRequest {
    #[serde(rename = "Type")]
    pub kind: String,
    pub properties: Any,
    pub allocation: AllocationMethod,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PrepareRequest {
    #[serde(rename = "Type")]
    pub kind: String,
    pub properties: Any,
    pub spec: InstanceSpec,
    pub allocation: AllocationMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrepareResponse {
    #[serde(rename = "Type", default)]
    pub kind: String,
    pub spec: InstanceSpec,
}

/// Parameters of both `Flavor.Healthy` and `Flavor.Drain`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct InstanceRequest {
    #[serde(rename = "Type")]
    pub kind: String,
    pub properties: Any,
    pub instance: InstanceDescription,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthyResponse {
    #[serde(rename = "Type", default)]
    pub kind: String,
    pub health: Health,
}

/// Result of `Flavor.Validate` and `Flavor.Drain`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OkResponse {
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "OK")]
    pub ok: bool,
}
