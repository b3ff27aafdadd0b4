use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use retouch_types::{ParamObject, TransformationType};

use crate::error::{RegistryError, RegistryResult};

// ---------------------------------------------------------------------------
// FieldKind
// ---------------------------------------------------------------------------

/// The kind of value a declared parameter field holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Flag,
    Number,
    List,
    Object,
}

impl FieldKind {
    /// Whether `value` is of this kind. `null` is never accepted.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::Flag => value.is_boolean(),
            Self::Number => value.is_number(),
            Self::List => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Flag => "a flag",
            Self::Number => "a number",
            Self::List => "a list",
            Self::Object => "an object",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// FieldSpec
// ---------------------------------------------------------------------------

/// A declared parameter field of a transformation type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Form label when the field is user-editable; `None` for fields that
    /// only ever carry their default.
    pub label: Option<&'static str>,
}

impl FieldSpec {
    pub const fn fixed(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            label: None,
        }
    }

    pub const fn editable(name: &'static str, kind: FieldKind, label: &'static str) -> Self {
        Self {
            name,
            kind,
            label: Some(label),
        }
    }

    pub fn is_editable(&self) -> bool {
        self.label.is_some()
    }
}

// ---------------------------------------------------------------------------
// TypeSpec
// ---------------------------------------------------------------------------

/// Everything the registry knows about one transformation type.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeSpec {
    pub ty: TransformationType,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub icon: &'static str,
    pub fields: Vec<FieldSpec>,
    /// Parameters staged when the type is first selected.
    pub defaults: ParamObject,
    /// Credit cost of committing this type.
    pub fee: i64,
}

impl TypeSpec {
    /// The declared field called `name`.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields the editing form exposes, in declaration order.
    pub fn ui_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.is_editable())
    }

    /// Check a parameter object against this shape.
    ///
    /// Every present field must be declared and hold a value of its
    /// declared kind. Absent fields are fine: a configuration only carries
    /// what has been set so far.
    pub fn validate_params(&self, params: &ParamObject) -> RegistryResult<()> {
        for (name, value) in params {
            let spec = self.field(name).ok_or_else(|| RegistryError::UndeclaredField {
                ty: self.ty,
                field: name.clone(),
            })?;
            if !spec.kind.accepts(value) {
                return Err(RegistryError::KindMismatch {
                    ty: self.ty,
                    field: name.clone(),
                    expected: spec.kind,
                });
            }
        }
        Ok(())
    }
}
