use serde_json::{json, Value};

use retouch_types::{ParamObject, TransformationConfig, TransformationType};

use crate::error::{RegistryError, RegistryResult};
use crate::shape::{FieldKind, FieldSpec, TypeSpec};

/// Flat credit cost applied to every transformation type unless overridden.
pub const DEFAULT_FEE: i64 = 1;

/// Static lookup table from transformation type to its [`TypeSpec`].
///
/// Built once at startup and shared read-only (wrap it in an `Arc` to hand
/// it to several sessions).
#[derive(Clone, Debug)]
pub struct TransformationTypeRegistry {
    // Indexed by the type's position in `TransformationType::ALL`.
    specs: Vec<TypeSpec>,
}

impl TransformationTypeRegistry {
    /// The standard registry: every type with its built-in shape and the
    /// flat [`DEFAULT_FEE`].
    pub fn standard() -> Self {
        Self {
            specs: TransformationType::ALL.into_iter().map(builtin_spec).collect(),
        }
    }

    /// Set the fee of every type.
    pub fn with_default_fee(mut self, fee: i64) -> Self {
        for spec in &mut self.specs {
            spec.fee = fee;
        }
        self
    }

    /// Override the fee of a single type.
    pub fn with_fee(mut self, ty: TransformationType, fee: i64) -> Self {
        self.specs[ty as usize].fee = fee;
        self
    }

    /// Resolve a wire key to its transformation type.
    pub fn resolve(&self, key: &str) -> RegistryResult<TransformationType> {
        key.parse()
            .map_err(|_| RegistryError::UnknownType(key.to_string()))
    }

    /// The spec for a wire key; fails with [`RegistryError::UnknownType`]
    /// for keys outside the closed set.
    pub fn shape_of(&self, key: &str) -> RegistryResult<&TypeSpec> {
        let ty = self.resolve(key)?;
        Ok(self.spec(ty))
    }

    /// The spec for an already-resolved type.
    pub fn spec(&self, ty: TransformationType) -> &TypeSpec {
        &self.specs[ty as usize]
    }

    /// Credit cost of committing `ty`.
    pub fn fee(&self, ty: TransformationType) -> i64 {
        self.spec(ty).fee
    }

    /// Default parameters staged when `ty` is first selected.
    pub fn defaults(&self, ty: TransformationType) -> ParamObject {
        self.spec(ty).defaults.clone()
    }

    /// Fields the editing form exposes for `ty`.
    pub fn ui_fields(&self, ty: TransformationType) -> Vec<&FieldSpec> {
        self.spec(ty).ui_fields().collect()
    }

    /// Check every parameter object of `config` against its type's shape.
    pub fn validate(&self, config: &TransformationConfig) -> RegistryResult<()> {
        for (ty, params) in config.iter() {
            self.spec(ty).validate_params(params)?;
        }
        Ok(())
    }
}

impl Default for TransformationTypeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn object(value: Value) -> ParamObject {
    match value {
        Value::Object(map) => map,
        _ => ParamObject::new(),
    }
}

fn builtin_spec(ty: TransformationType) -> TypeSpec {
    let (title, subtitle, icon, fields, defaults) = match ty {
        TransformationType::Restore => (
            "Restore Image",
            "Refine images by removing noise and imperfections",
            "image.svg",
            vec![FieldSpec::fixed("restore", FieldKind::Flag)],
            json!({"restore": true}),
        ),
        TransformationType::RemoveBackground => (
            "Background Remove",
            "Removes the background of the image using AI",
            "camera.svg",
            vec![FieldSpec::fixed("removeBackground", FieldKind::Flag)],
            json!({"removeBackground": true}),
        ),
        TransformationType::Fill => (
            "Generative Fill",
            "Enhance an image's dimensions using AI outpainting",
            "stars.svg",
            vec![
                FieldSpec::fixed("fillBackground", FieldKind::Flag),
                FieldSpec::editable("aspectRatio", FieldKind::Text, "Aspect Ratio"),
            ],
            json!({"fillBackground": true}),
        ),
        TransformationType::Remove => (
            "Object Remove",
            "Identify and eliminate objects from images",
            "scan.svg",
            vec![
                FieldSpec::editable("prompt", FieldKind::Text, "Object to remove"),
                FieldSpec::fixed("to", FieldKind::Text),
                FieldSpec::fixed("removeShadow", FieldKind::Flag),
                FieldSpec::fixed("multiple", FieldKind::Flag),
            ],
            json!({"prompt": "", "removeShadow": true, "multiple": true}),
        ),
        TransformationType::Recolor => (
            "Object Recolor",
            "Identify and recolor objects from the image",
            "filter.svg",
            vec![
                FieldSpec::editable("prompt", FieldKind::Text, "Object to recolor"),
                FieldSpec::editable("color", FieldKind::Text, "Replacement Color"),
                FieldSpec::fixed("multiple", FieldKind::Flag),
            ],
            json!({"prompt": "", "color": "", "multiple": true}),
        ),
    };

    TypeSpec {
        ty,
        title,
        subtitle,
        icon,
        fields,
        defaults: object(defaults),
        fee: DEFAULT_FEE,
    }
}
