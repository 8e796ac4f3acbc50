///! Flavor plugin commands

use crate::api::RpcClient;
use crate::input::load_document;
use crate::output::{print_single, print_success, OutputFormat};
use anyhow::Result;
use clap::Args;
use std::path::Path;
use vanilla_common::rpc::{
    method, HealthyResponse, ImplementsResponse, InstanceRequest, OkResponse, PrepareRequest,
    PrepareResponse, ValidateRequest,
};
use vanilla_common::{AllocationMethod, Any, Health, InstanceDescription, InstanceSpec, LogicalId};

/// Allocation of the group the call is made for
#[derive(Args, Debug, Default)]
pub struct AllocationArgs {
    /// Group size, for interchangeable members
    #[arg(long)]
    pub size: Option<u32>,

    /// Logical ID of a member with a stable identity (repeatable)
    #[arg(long = "logical-id")]
    pub logical_ids: Vec<String>,
}

impl AllocationArgs {
    pub fn to_allocation(&self) -> AllocationMethod {
        AllocationMethod {
            size: self.size,
            logical_ids: self.logical_ids.iter().map(LogicalId::new).collect(),
        }
    }
}

fn load_properties(path: &Path) -> Result<Any> {
    Ok(Any::from_value(load_document(path)?))
}

pub async fn implements(client: &RpcClient, output: &str) -> Result<()> {
    let response: ImplementsResponse = client
        .call(method::IMPLEMENTS, &serde_json::json!({}))
        .await?;
    print_single(&response, OutputFormat::from_str(output))
}

pub async fn validate(
    client: &RpcClient,
    properties: &Path,
    allocation: &AllocationArgs,
) -> Result<()> {
    let request = ValidateRequest {
        properties: load_properties(properties)?,
        allocation: allocation.to_allocation(),
        ..Default::default()
    };

    let _: OkResponse = client.call(method::VALIDATE, &request).await?;
    print_success(&format!("{} is a valid flavor configuration", properties.display()));
    Ok(())
}

pub async fn prepare(
    client: &RpcClient,
    properties: &Path,
    spec: &Path,
    allocation: &AllocationArgs,
    output: &str,
) -> Result<()> {
    let request = prepare_request(properties, spec, allocation)?;
    let response: PrepareResponse = client.call(method::PREPARE, &request).await?;
    print_single(&response.spec, OutputFormat::from_str(output))
}

pub async fn healthy(
    client: &RpcClient,
    properties: &Path,
    instance: &Path,
    output: &str,
) -> Result<()> {
    let request = instance_request(properties, instance)?;
    let instance_id = request.instance.id.clone();

    let response: HealthyResponse = client.call(method::HEALTHY, &request).await?;
    match response.health {
        Health::Healthy => print_success(&format!("Instance {} is healthy", instance_id)),
        other => print_single(
            &serde_json::json!({ "ID": instance_id, "Health": other.to_string() }),
            OutputFormat::from_str(output),
        )?,
    }
    Ok(())
}

pub async fn drain(client: &RpcClient, properties: &Path, instance: &Path) -> Result<()> {
    let request = instance_request(properties, instance)?;
    let instance_id = request.instance.id.clone();

    let _: OkResponse = client.call(method::DRAIN, &request).await?;
    print_success(&format!("Instance {} drained", instance_id));
    Ok(())
}

fn prepare_request(
    properties: &Path,
    spec: &Path,
    allocation: &AllocationArgs,
) -> Result<PrepareRequest> {
    let spec: InstanceSpec = load_document(spec)?;
    Ok(PrepareRequest {
        properties: load_properties(properties)?,
        spec,
        allocation: allocation.to_allocation(),
        ..Default::default()
    })
}

fn instance_request(properties: &Path, instance: &Path) -> Result<InstanceRequest> {
    let instance: InstanceDescription = load_document(instance)?;
    Ok(InstanceRequest {
        properties: load_properties(properties)?,
        instance,
        ..Default::default()
    })
}
