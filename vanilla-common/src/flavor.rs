//! Flavor plugin SPI
//!
//! A flavor gives otherwise generic instances their behavioral identity
//! (boot script, tags). The group orchestrator calls a flavor at four points
//! in an instance's lifecycle: spec validation, pre-provision preparation,
//! post-provision health checks, and pre-termination drain.

use crate::{AllocationMethod, Any, InstanceDescription, InstanceSpec, Result};
use serde::{Deserialize, Serialize};

/// Name of the flavor interface advertised during the plugin handshake
pub const INTERFACE_NAME: &str = "Flavor";

/// Version of the flavor interface
pub const INTERFACE_VERSION: &str = "0.1.0";

/// Interface implemented by a plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InterfaceSpec {
    pub name: String,
    pub version: String,
}

impl InterfaceSpec {
    pub fn flavor() -> Self {
        Self {
            name: INTERFACE_NAME.to_string(),
            version: INTERFACE_VERSION.to_string(),
        }
    }
}

/// Health of a provisioned instance as seen by its flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Health {
    /// The flavor cannot tell yet
    Unknown,
    Healthy,
    Unhealthy,
}

impl From<Health> for u8 {
    fn from(health: Health) -> Self {
        match health {
            Health::Unknown => 0,
            Health::Healthy => 1,
            Health::Unhealthy => 2,
        }
    }
}

impl TryFrom<u8> for Health {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Health::Unknown),
            1 => Ok(Health::Healthy),
            2 => Ok(Health::Unhealthy),
            other => Err(format!("unknown health state {}", other)),
        }
    }
}

impl std::fmt::Display for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Healthy => write!(f, "healthy"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Flavor plugin trait - implement this for custom flavors.
///
/// Every operation is synchronous and must not block; the orchestrator may
/// call any of them concurrently for different instances.
pub trait FlavorPlugin: Send + Sync {
    /// Check that `properties` is a valid configuration for this flavor
    fn validate(&self, properties: &Any, allocation: &AllocationMethod) -> Result<()>;

    /// Report the health of a running instance
    fn healthy(&self, properties: &Any, instance: &InstanceDescription) -> Result<Health>;

    /// Prepare an instance for termination
    fn drain(&self, properties: &Any, instance: &InstanceDescription) -> Result<()>;

    /// Customize an instance spec before it is provisioned.
    ///
    /// Returns a new spec; `spec` itself is left untouched, so on error the
    /// caller still holds the original. Must be called once per instance.
    fn prepare(
        &self,
        properties: &Any,
        spec: &InstanceSpec,
        allocation: &AllocationMethod,
    ) -> Result<InstanceSpec>;
}
