//! Common types shared between the flavor plugin server and its clients

pub mod flavor;
pub mod rpc;

pub use flavor::{FlavorPlugin, Health, InterfaceSpec};

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Opaque properties blob carried in group specs.
///
/// The payload stays untyped until a plugin decodes it into its own schema
/// with [`Any::decode`]. Decoding happens on demand, so nothing is cached
/// between calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Any(serde_json::Value);

impl Any {
    pub fn from_value(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Parse a JSON document into an opaque blob
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map(Self)
            .map_err(Error::ConfigDecode)
    }

    /// Decode the blob into `T`.
    ///
    /// Properties are always an object. A `null` blob (absent properties)
    /// decodes as an empty object, so schemas whose fields all have defaults
    /// accept it; any other non-object value is rejected.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let decoded = match &self.0 {
            serde_json::Value::Null => {
                serde_json::from_value(serde_json::Value::Object(serde_json::Map::new()))
            }
            value @ serde_json::Value::Object(_) => T::deserialize(value),
            other => Err(<serde_json::Error as de::Error>::invalid_type(
                unexpected(other),
                &"a properties object",
            )),
        };
        decoded.map_err(Error::ConfigDecode)
    }
}

fn unexpected(value: &serde_json::Value) -> de::Unexpected<'_> {
    match value {
        serde_json::Value::Null => de::Unexpected::Unit,
        serde_json::Value::Bool(b) => de::Unexpected::Bool(*b),
        serde_json::Value::Number(_) => de::Unexpected::Other("number"),
        serde_json::Value::String(s) => de::Unexpected::Str(s),
        serde_json::Value::Array(_) => de::Unexpected::Seq,
        serde_json::Value::Object(_) => de::Unexpected::Map,
    }
}

/// Deserialize a field, treating an explicit `null` like an absent value.
///
/// Use with `#[serde(default, deserialize_with = "null_as_default")]`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Stable identity of a group member that is not interchangeable ("pet")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalId(pub String);

impl LogicalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Resource attached to an instance at creation (volume, NIC, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Type")]
    pub kind: String,
}

/// Descriptor of an instance about to be provisioned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceSpec {
    /// Provisioner-specific properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Any>,

    /// Instance tags; `None` when no tag has been set yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,

    /// Bootstrap script run at first boot
    #[serde(default, deserialize_with = "null_as_default")]
    pub init: String,

    #[serde(rename = "LogicalID", default, skip_serializing_if = "Option::is_none")]
    pub logical_id: Option<LogicalId>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub attachments: Vec<Attachment>,
}

/// Read-only view of a provisioned instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceDescription {
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(rename = "LogicalID", default, skip_serializing_if = "Option::is_none")]
    pub logical_id: Option<LogicalId>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: BTreeMap<String, String>,
}

/// How members of a group are allocated.
///
/// Either a plain `size` for interchangeable members or an explicit list of
/// logical IDs for members with a stable identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AllocationMethod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    #[serde(
        rename = "LogicalIDs",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub logical_ids: Vec<LogicalId>,
}

impl AllocationMethod {
    pub fn cattle(size: u32) -> Self {
        Self {
            size: Some(size),
            logical_ids: Vec::new(),
        }
    }

    pub fn pets<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            size: None,
            logical_ids: ids.into_iter().map(LogicalId::new).collect(),
        }
    }
}

/// Flavor SPI error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid flavor properties: {0}")]
    ConfigDecode(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Schema {
        #[serde(rename = "Init")]
        init: Vec<String>,
    }

    #[test]
    fn test_null_any_decodes_as_empty_object() {
        let schema: Schema = Any::default().decode().unwrap();
        assert!(schema.init.is_empty());
    }

    #[test]
    fn test_any_decode_error_is_config_decode() {
        let any = Any::from_value(json!({ "Init": 42 }));
        let err = any.decode::<Schema>().unwrap_err();
        assert!(matches!(err, Error::ConfigDecode(_)));
        assert!(err.to_string().starts_with("Invalid flavor properties"));
    }

    #[test]
    fn test_non_object_properties_are_rejected() {
        for value in [json!([]), json!([["a"]]), json!("Init"), json!(3), json!(true)] {
            let err = Any::from_value(value).decode::<Schema>().unwrap_err();
            assert!(matches!(err, Error::ConfigDecode(_)));
        }
    }

    #[test]
    fn test_null_collections_decode_as_empty() {
        let spec: InstanceSpec =
            serde_json::from_value(json!({ "Init": null, "Attachments": null })).unwrap();
        assert_eq!(spec.init, "");
        assert!(spec.attachments.is_empty());

        let instance: InstanceDescription =
            serde_json::from_value(json!({ "ID": "i-1", "Tags": null })).unwrap();
        assert!(instance.tags.is_empty());

        let allocation: AllocationMethod =
            serde_json::from_value(json!({ "Size": 3, "LogicalIDs": null })).unwrap();
        assert_eq!(allocation, AllocationMethod::cattle(3));
    }

    #[test]
    fn test_instance_spec_wire_names() {
        let spec = InstanceSpec {
            tags: Some(BTreeMap::from([("env".to_string(), "prod".to_string())])),
            init: "echo hi".to_string(),
            logical_id: Some(LogicalId::new("db-1")),
            attachments: vec![Attachment {
                id: "vol-1".to_string(),
                kind: "ebs".to_string(),
            }],
            ..Default::default()
        };

        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            value,
            json!({
                "Tags": { "env": "prod" },
                "Init": "echo hi",
                "LogicalID": "db-1",
                "Attachments": [{ "ID": "vol-1", "Type": "ebs" }]
            })
        );
    }

    #[test]
    fn test_instance_spec_without_tags_stays_unset() {
        let spec: InstanceSpec = serde_json::from_value(json!({ "Init": "" })).unwrap();
        assert!(spec.tags.is_none());
        assert!(spec.properties.is_none());
    }

    #[test]
    fn test_allocation_method_shapes() {
        let cattle = serde_json::to_value(AllocationMethod::cattle(3)).unwrap();
        assert_eq!(cattle, json!({ "Size": 3 }));

        let pets = serde_json::to_value(AllocationMethod::pets(["a", "b"])).unwrap();
        assert_eq!(pets, json!({ "LogicalIDs": ["a", "b"] }));
    }
}
