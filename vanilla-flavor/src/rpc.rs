//! JSON-RPC server for flavor plugins
//!
//! Serves any [`FlavorPlugin`] over HTTP: `POST /` takes a JSON-RPC 2.0
//! request, `GET /health` is a liveness probe for the server process itself.

use crate::error::RpcError;
use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use vanilla_common::rpc::{
    method, HealthyResponse, ImplementsResponse, InstanceRequest, OkResponse, PrepareRequest,
    PrepareResponse, Request, Response, ValidateRequest, JSONRPC_VERSION,
};
use vanilla_common::{FlavorPlugin, InterfaceSpec};

/// Shared router state
#[derive(Clone)]
pub struct RpcState {
    plugin: Arc<dyn FlavorPlugin>,
    name: Arc<str>,
}

impl RpcState {
    pub fn new(plugin: Arc<dyn FlavorPlugin>, name: &str) -> Self {
        Self {
            plugin,
            name: Arc::from(name),
        }
    }
}

/// Build the plugin router
pub fn router(plugin: Arc<dyn FlavorPlugin>, name: &str) -> Router {
    Router::new()
        .route("/", post(handle_rpc))
        .route("/health", get(health_check))
        .with_state(RpcState::new(plugin, name))
        .layer(TraceLayer::new_for_http())
}

async fn handle_rpc(State(state): State<RpcState>, body: Bytes) -> Json<Response> {
    Json(dispatch(state.plugin.as_ref(), &body))
}

async fn health_check(State(state): State<RpcState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "name": state.name.as_ref(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Decode a raw request body, run the call, and build the response envelope
pub fn dispatch(plugin: &dyn FlavorPlugin, body: &[u8]) -> Response {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => return failure(Value::Null, RpcError::Parse(e.to_string())),
    };

    let request: Request = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => return failure(Value::Null, RpcError::InvalidRequest(e.to_string())),
    };

    if request.jsonrpc != JSONRPC_VERSION {
        return failure(
            request.id,
            RpcError::InvalidRequest(format!("unsupported jsonrpc version '{}'", request.jsonrpc)),
        );
    }

    tracing::debug!(method = %request.method, id = %request.id, "RPC call");

    match call(plugin, &request.method, request.params) {
        Ok(result) => Response::success(request.id, result),
        Err(err) => {
            tracing::warn!(method = %request.method, error = %err, "RPC call failed");
            failure(request.id, err)
        }
    }
}

fn failure(id: Value, err: RpcError) -> Response {
    Response::failure(id, err.to_error_object())
}

fn call(plugin: &dyn FlavorPlugin, name: &str, params: Value) -> Result<Value, RpcError> {
    match name {
        method::IMPLEMENTS => encode(&ImplementsResponse {
            apis: vec![InterfaceSpec::flavor()],
        }),
        method::VALIDATE => {
            let req: ValidateRequest = decode_params(params)?;
            plugin.validate(&req.properties, &req.allocation)?;
            encode(&OkResponse {
                kind: req.kind,
                ok: true,
            })
        }
        method::PREPARE => {
            let req: PrepareRequest = decode_params(params)?;
            let spec = plugin.prepare(&req.properties, &req.spec, &req.allocation)?;
            encode(&PrepareResponse {
                kind: req.kind,
                spec,
            })
        }
        method::HEALTHY => {
            let req: InstanceRequest = decode_params(params)?;
            let health = plugin.healthy(&req.properties, &req.instance)?;
            encode(&HealthyResponse {
                kind: req.kind,
                health,
            })
        }
        method::DRAIN => {
            let req: InstanceRequest = decode_params(params)?;
            plugin.drain(&req.properties, &req.instance)?;
            encode(&OkResponse {
                kind: req.kind,
                ok: true,
            })
        }
        other => Err(RpcError::MethodNotFound(other.to_string())),
    }
}

/// Params arrive either as an object or as a one-element array holding it
fn decode_params<T: DeserializeOwned>(params: Value) -> Result<T, RpcError> {
    let params = match params {
        Value::Array(mut items) if items.len() == 1 => items.remove(0),
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(params).map_err(|e| RpcError::InvalidParams(e.to_string()))
}

fn encode<T: Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::Internal(e.to_string()))
}
