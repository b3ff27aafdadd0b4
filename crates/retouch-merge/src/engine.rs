use serde_json::Value;
use tracing::debug;

use retouch_registry::TransformationTypeRegistry;
use retouch_types::{ParamObject, TransformationConfig};

use crate::error::MergeError;

/// Deep-merge `delta` into `base`, producing a new configuration.
///
/// Merge semantics:
/// - absent delta: `base` is returned unchanged
/// - type in both: parameter objects merge key-by-key
/// - type only in delta: adopted verbatim
/// - type only in base: kept verbatim
///
/// Neither input is touched, so a caller can drop the delta afterwards
/// without affecting the configuration it was merged into.
pub fn merge(
    base: &TransformationConfig,
    delta: Option<&TransformationConfig>,
) -> TransformationConfig {
    let Some(delta) = delta else {
        return base.clone();
    };

    let mut merged = base.clone();
    for (ty, delta_params) in delta.iter() {
        let params = match merged.remove(ty) {
            Some(base_params) => merge_params(base_params, delta_params),
            None => delta_params.clone(),
        };
        merged.insert(ty, params);
    }
    merged
}

/// Merge one parameter object into another; fields of `delta` win.
pub fn merge_params(mut base: ParamObject, delta: &ParamObject) -> ParamObject {
    for (key, delta_value) in delta {
        let merged = match base.remove(key) {
            Some(base_value) => merge_value(base_value, delta_value),
            None => delta_value.clone(),
        };
        base.insert(key.clone(), merged);
    }
    base
}

/// Merge a single value.
///
/// - Objects: deep-merge by key (recursive)
/// - Arrays: replaced, never concatenated
/// - Scalars: delta wins
pub fn merge_value(base: Value, delta: &Value) -> Value {
    match (base, delta) {
        (Value::Object(base_map), Value::Object(delta_map)) => {
            Value::Object(merge_params(base_map, delta_map))
        }
        (_, delta) => delta.clone(),
    }
}

/// Merge engine bound to a registry, so results can be shape-checked.
#[derive(Clone, Copy, Debug)]
pub struct MergeEngine<'a> {
    registry: &'a TransformationTypeRegistry,
}

impl<'a> MergeEngine<'a> {
    pub fn new(registry: &'a TransformationTypeRegistry) -> Self {
        Self { registry }
    }

    /// Unvalidated merge; see [`merge`].
    pub fn merge(
        &self,
        base: &TransformationConfig,
        delta: Option<&TransformationConfig>,
    ) -> TransformationConfig {
        merge(base, delta)
    }

    /// Merge and check the result against the registry shapes.
    ///
    /// Fails with [`MergeError::InvalidConfig`] if any parameter object of
    /// the result carries an undeclared field or a value of the wrong kind.
    pub fn merge_validated(
        &self,
        base: &TransformationConfig,
        delta: Option<&TransformationConfig>,
    ) -> Result<TransformationConfig, MergeError> {
        let merged = merge(base, delta);
        self.registry.validate(&merged)?;
        debug!(
            types = merged.len(),
            delta_types = delta.map_or(0, TransformationConfig::len),
            "configuration merged"
        );
        Ok(merged)
    }
}
