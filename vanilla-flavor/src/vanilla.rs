//! Vanilla flavor
//!
//! Treats every member of a group identically: the same init fragments are
//! appended to each instance's boot script and the same tags are stamped on
//! each instance, whatever the allocation method.

use serde::Deserialize;
use std::collections::BTreeMap;
use vanilla_common::{
    null_as_default, AllocationMethod, Any, FlavorPlugin, Health, InstanceDescription,
    InstanceSpec, Result,
};

/// Model of the flavor properties section of a group spec.
///
/// Keys are matched in their canonical, lowercase and uppercase spellings,
/// the way group specs written for case-insensitive decoders spell them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Spec {
    /// Script fragments appended to the instance's init, in order
    #[serde(alias = "init", alias = "INIT", deserialize_with = "null_as_default")]
    pub init: Vec<String>,

    /// Tags stamped onto every instance of this flavor
    #[serde(alias = "tags", alias = "TAGS", deserialize_with = "null_as_default")]
    pub tags: BTreeMap<String, String>,
}

/// Flavor plugin that doesn't do very much
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VanillaFlavor;

/// Create the vanilla flavor plugin
pub fn new_plugin() -> VanillaFlavor {
    VanillaFlavor
}

impl FlavorPlugin for VanillaFlavor {
    fn validate(&self, properties: &Any, _allocation: &AllocationMethod) -> Result<()> {
        properties.decode::<Spec>().map(|_| ())
    }

    fn healthy(&self, _properties: &Any, _instance: &InstanceDescription) -> Result<Health> {
        Ok(Health::Healthy)
    }

    fn drain(&self, _properties: &Any, _instance: &InstanceDescription) -> Result<()> {
        Ok(())
    }

    fn prepare(
        &self,
        properties: &Any,
        spec: &InstanceSpec,
        _allocation: &AllocationMethod,
    ) -> Result<InstanceSpec> {
        let flavor: Spec = properties.decode()?;
        let mut instance = spec.clone();

        let mut lines: Vec<&str> = Vec::with_capacity(flavor.init.len() + 1);
        if !spec.init.is_empty() {
            lines.push(&spec.init);
        }
        lines.extend(flavor.init.iter().map(String::as_str));
        instance.init = lines.join("\n");

        if !flavor.tags.is_empty() {
            instance
                .tags
                .get_or_insert_with(BTreeMap::new)
                .extend(flavor.tags.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        tracing::debug!(
            fragments = flavor.init.len(),
            tags = flavor.tags.len(),
            "Prepared instance spec"
        );

        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vanilla_common::{Error, LogicalId};

    fn props(value: serde_json::Value) -> Any {
        Any::from_value(value)
    }

    fn spec_with(init: &str, tags: Option<&[(&str, &str)]>) -> InstanceSpec {
        InstanceSpec {
            init: init.to_string(),
            tags: tags.map(|pairs| {
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_accepts_full_config() {
        let properties = props(json!({
            "Init": ["apt-get update", "apt-get install -y nginx"],
            "Tags": { "role": "web" }
        }));
        assert!(VanillaFlavor.validate(&properties, &AllocationMethod::cattle(3)).is_ok());
    }

    #[test]
    fn test_validate_accepts_empty_and_absent_config() {
        let allocation = AllocationMethod::default();
        assert!(VanillaFlavor.validate(&props(json!({})), &allocation).is_ok());
        assert!(VanillaFlavor.validate(&Any::default(), &allocation).is_ok());
        assert!(VanillaFlavor
            .validate(&props(json!({ "Init": null, "Tags": null })), &allocation)
            .is_ok());
    }

    #[test]
    fn test_validate_ignores_unknown_fields() {
        let properties = props(json!({ "Init": [], "Extra": 42 }));
        assert!(VanillaFlavor.validate(&properties, &AllocationMethod::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_malformed_init() {
        let allocation = AllocationMethod::default();
        for bad in [json!({ "Init": "echo hi" }), json!({ "Init": 7 }), json!({ "Init": [1, 2] })] {
            let err = VanillaFlavor.validate(&props(bad), &allocation).unwrap_err();
            assert!(matches!(err, Error::ConfigDecode(_)));
        }
    }

    #[test]
    fn test_validate_rejects_array_properties() {
        let allocation = AllocationMethod::default();
        for bad in [json!([]), json!([["a"]]), json!([["a", "b"], { "k": "v" }])] {
            let err = VanillaFlavor.validate(&props(bad), &allocation).unwrap_err();
            assert!(matches!(err, Error::ConfigDecode(_)));
        }
    }

    #[test]
    fn test_prepare_rejects_array_properties() {
        let spec = spec_with("x", None);
        let err = VanillaFlavor
            .prepare(
                &props(json!([["a", "b"], { "k": "v" }])),
                &spec,
                &AllocationMethod::default(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::ConfigDecode(_)));
    }

    #[test]
    fn test_prepare_accepts_lowercase_keys() {
        let properties = props(json!({ "init": ["a"], "tags": { "k": "v" } }));
        let out = VanillaFlavor
            .prepare(&properties, &spec_with("", None), &AllocationMethod::default())
            .unwrap();
        assert_eq!(out.init, "a");
        assert_eq!(
            out.tags,
            Some(BTreeMap::from([("k".to_string(), "v".to_string())]))
        );

        let spec: Spec = props(json!({ "INIT": ["b"] })).decode().unwrap();
        assert_eq!(spec.init, vec!["b".to_string()]);
    }

    #[test]
    fn test_validate_rejects_malformed_tags() {
        let properties = props(json!({ "Tags": { "count": 3 } }));
        let err = VanillaFlavor
            .validate(&properties, &AllocationMethod::default())
            .unwrap_err();
        assert!(matches!(err, Error::ConfigDecode(_)));
    }

    #[test]
    fn test_prepare_without_existing_init() {
        let properties = props(json!({ "Init": ["a", "b"] }));
        let out = VanillaFlavor
            .prepare(&properties, &spec_with("", None), &AllocationMethod::default())
            .unwrap();
        assert_eq!(out.init, "a\nb");
    }

    #[test]
    fn test_prepare_keeps_existing_init_first() {
        let properties = props(json!({ "Init": ["a", "b"] }));
        let out = VanillaFlavor
            .prepare(&properties, &spec_with("x", None), &AllocationMethod::default())
            .unwrap();
        assert_eq!(out.init, "x\na\nb");
    }

    #[test]
    fn test_prepare_without_fragments_keeps_init() {
        let out = VanillaFlavor
            .prepare(&props(json!({})), &spec_with("x", None), &AllocationMethod::default())
            .unwrap();
        assert_eq!(out.init, "x");

        let out = VanillaFlavor
            .prepare(&props(json!({})), &spec_with("", None), &AllocationMethod::default())
            .unwrap();
        assert_eq!(out.init, "");
        assert!(out.tags.is_none());
    }

    #[test]
    fn test_prepare_config_tags_win() {
        let properties = props(json!({ "Tags": { "env": "staging", "role": "web" } }));
        let spec = spec_with("", Some(&[("env", "prod"), ("owner", "ops")]));
        let out = VanillaFlavor
            .prepare(&properties, &spec, &AllocationMethod::default())
            .unwrap();

        let tags = out.tags.unwrap();
        assert_eq!(tags.len(), 3);
        assert_eq!(tags["env"], "staging");
        assert_eq!(tags["role"], "web");
        assert_eq!(tags["owner"], "ops");
    }

    #[test]
    fn test_prepare_initializes_missing_tags() {
        let properties = props(json!({ "Tags": { "k": "v" } }));
        let out = VanillaFlavor
            .prepare(&properties, &spec_with("", None), &AllocationMethod::default())
            .unwrap();
        assert_eq!(
            out.tags,
            Some(BTreeMap::from([("k".to_string(), "v".to_string())]))
        );
    }

    #[test]
    fn test_prepare_preserves_other_fields() {
        let spec = InstanceSpec {
            properties: Some(props(json!({ "instance_type": "m5.large" }))),
            logical_id: Some(LogicalId::new("db-1")),
            ..spec_with("boot", None)
        };
        let out = VanillaFlavor
            .prepare(
                &props(json!({ "Init": ["run"] })),
                &spec,
                &AllocationMethod::pets(["db-1"]),
            )
            .unwrap();

        assert_eq!(out.properties, spec.properties);
        assert_eq!(out.logical_id, spec.logical_id);
        assert_eq!(out.init, "boot\nrun");
    }

    #[test]
    fn test_prepare_decode_failure_leaves_spec_untouched() {
        let spec = spec_with("x", Some(&[("env", "prod")]));
        let before = spec.clone();
        let err = VanillaFlavor
            .prepare(&props(json!({ "Init": "a" })), &spec, &AllocationMethod::default())
            .unwrap_err();

        assert!(matches!(err, Error::ConfigDecode(_)));
        assert_eq!(spec, before);
    }

    #[test]
    fn test_prepare_twice_duplicates_fragments() {
        let properties = props(json!({ "Init": ["a", "b"] }));
        let allocation = AllocationMethod::default();
        let once = VanillaFlavor
            .prepare(&properties, &spec_with("x", None), &allocation)
            .unwrap();
        let twice = VanillaFlavor.prepare(&properties, &once, &allocation).unwrap();
        assert_eq!(twice.init, "x\na\nb\na\nb");
    }

    #[test]
    fn test_healthy_and_drain_are_constant() {
        let instance = InstanceDescription {
            id: "i-123".to_string(),
            ..Default::default()
        };
        for properties in [Any::default(), props(json!({ "Init": "not a list" }))] {
            assert_eq!(
                VanillaFlavor.healthy(&properties, &instance).unwrap(),
                Health::Healthy
            );
            assert!(VanillaFlavor.drain(&properties, &instance).is_ok());
        }
    }
}
