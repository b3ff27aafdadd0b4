use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::transformation::TransformationType;

/// Parameter object of a single transformation type: field name to value.
///
/// `serde_json::Map` keeps its keys sorted, so parameter objects iterate
/// and serialize deterministically.
pub type ParamObject = serde_json::Map<String, Value>;

/// Mapping from transformation type to its parameter object.
///
/// Used both for the committed configuration of an image and for the
/// pending (not yet applied) delta. A type that is absent has not been
/// configured for the image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformationConfig(BTreeMap<TransformationType, ParamObject>);

impl TransformationConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration holding a single type.
    pub fn single(ty: TransformationType, params: ParamObject) -> Self {
        let mut config = Self::new();
        config.insert(ty, params);
        config
    }

    /// Returns `true` if no type is configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of configured types.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether `ty` is configured.
    pub fn contains(&self, ty: TransformationType) -> bool {
        self.0.contains_key(&ty)
    }

    /// The parameter object of `ty`, if configured.
    pub fn get(&self, ty: TransformationType) -> Option<&ParamObject> {
        self.0.get(&ty)
    }

    /// A single field of `ty`, if configured.
    pub fn field(&self, ty: TransformationType, field: &str) -> Option<&Value> {
        self.0.get(&ty).and_then(|params| params.get(field))
    }

    /// Replace the parameter object of `ty`, returning the previous one.
    pub fn insert(&mut self, ty: TransformationType, params: ParamObject) -> Option<ParamObject> {
        self.0.insert(ty, params)
    }

    /// Set one field of `ty`, creating the parameter object if absent.
    pub fn set_field(&mut self, ty: TransformationType, field: impl Into<String>, value: Value) {
        self.0.entry(ty).or_default().insert(field.into(), value);
    }

    /// Remove `ty` from the configuration.
    pub fn remove(&mut self, ty: TransformationType) -> Option<ParamObject> {
        self.0.remove(&ty)
    }

    /// Configured types in canonical order.
    pub fn types(&self) -> impl Iterator<Item = TransformationType> + '_ {
        self.0.keys().copied()
    }

    /// Iterate `(type, params)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (TransformationType, &ParamObject)> {
        self.0.iter().map(|(ty, params)| (*ty, params))
    }

    /// Consume into the underlying map.
    pub fn into_inner(self) -> BTreeMap<TransformationType, ParamObject> {
        self.0
    }
}

impl From<BTreeMap<TransformationType, ParamObject>> for TransformationConfig {
    fn from(map: BTreeMap<TransformationType, ParamObject>) -> Self {
        Self(map)
    }
}

impl FromIterator<(TransformationType, ParamObject)> for TransformationConfig {
    fn from_iter<I: IntoIterator<Item = (TransformationType, ParamObject)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> ParamObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn set_field_creates_type_entry() {
        let mut config = TransformationConfig::new();
        assert!(config.is_empty());
        config.set_field(TransformationType::Remove, "to", json!("dog"));
        assert!(config.contains(TransformationType::Remove));
        assert_eq!(config.field(TransformationType::Remove, "to"), Some(&json!("dog")));
        assert_eq!(config.len(), 1);
    }

    #[test]
    fn set_field_overwrites_existing_value() {
        let mut config = TransformationConfig::new();
        config.set_field(TransformationType::Recolor, "prompt", json!("sky"));
        config.set_field(TransformationType::Recolor, "prompt", json!("car"));
        assert_eq!(config.field(TransformationType::Recolor, "prompt"), Some(&json!("car")));
    }

    #[test]
    fn serializes_as_keyed_object() {
        let config = TransformationConfig::single(
            TransformationType::Fill,
            params(json!({"aspectRatio": "1:1"})),
        );
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value, json!({"fill": {"aspectRatio": "1:1"}}));
    }

    #[test]
    fn deserializes_from_wire_form() {
        let config: TransformationConfig =
            serde_json::from_value(json!({"recolor": {"color": "red"}, "restore": {"restore": true}}))
                .unwrap();
        assert_eq!(
            config.types().collect::<Vec<_>>(),
            vec![TransformationType::Restore, TransformationType::Recolor]
        );
    }

    #[test]
    fn unknown_type_key_fails_to_deserialize() {
        let result: Result<TransformationConfig, _> =
            serde_json::from_value(json!({"sharpen": {"amount": 2}}));
        assert!(result.is_err());
    }

    #[test]
    fn iteration_is_canonical() {
        let config: TransformationConfig = [
            (TransformationType::Recolor, ParamObject::new()),
            (TransformationType::Fill, ParamObject::new()),
            (TransformationType::Restore, ParamObject::new()),
        ]
        .into_iter()
        .collect();
        let order: Vec<_> = config.iter().map(|(ty, _)| ty).collect();
        assert_eq!(
            order,
            vec![
                TransformationType::Restore,
                TransformationType::Fill,
                TransformationType::Recolor,
            ]
        );
    }
}
