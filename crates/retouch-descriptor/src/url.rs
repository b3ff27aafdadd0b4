use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use retouch_types::{ParamObject, TransformationType};

use crate::descriptor::RequestDescriptor;

/// Where rendered images are served from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    pub base_url: String,
    pub cloud_name: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://res.cloudinary.com".into(),
            cloud_name: "demo".into(),
        }
    }
}

impl DeliveryConfig {
    pub fn new(base_url: impl Into<String>, cloud_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            cloud_name: cloud_name.into(),
        }
    }
}

impl RequestDescriptor {
    /// Render the delivery URL for this descriptor.
    ///
    /// `{base_url}/{cloud_name}/image/upload/{segments}/{public_id}` with one
    /// segment per enabled transformation in canonical type order, followed
    /// by the size segment. Parameters inside a segment are sorted by name.
    pub fn to_url(&self, delivery: &DeliveryConfig) -> String {
        let mut segments: Vec<String> = self
            .transformations
            .iter()
            .filter_map(|(ty, params)| effect_segment(ty, params))
            .collect();

        let padded = self
            .transformations
            .get(TransformationType::Fill)
            .is_some_and(|params| enabled(params, "fillBackground"));
        segments.push(if padded {
            format!("c_pad,w_{},h_{}", self.width, self.height)
        } else {
            format!("w_{},h_{}", self.width, self.height)
        });

        format!(
            "{}/{}/image/upload/{}/{}",
            delivery.base_url.trim_end_matches('/'),
            delivery.cloud_name,
            segments.join("/"),
            self.public_id
        )
    }
}

/// The flag that switches a parameterless effect on, if the type has one.
fn toggle_field(ty: TransformationType) -> Option<&'static str> {
    match ty {
        TransformationType::Restore => Some("restore"),
        TransformationType::RemoveBackground => Some("removeBackground"),
        TransformationType::Fill => Some("fillBackground"),
        TransformationType::Remove | TransformationType::Recolor => None,
    }
}

fn effect_name(ty: TransformationType) -> &'static str {
    match ty {
        TransformationType::Restore => "e_gen_restore",
        TransformationType::RemoveBackground => "e_background_removal",
        TransformationType::Fill => "b_gen_fill",
        TransformationType::Remove => "e_gen_remove",
        TransformationType::Recolor => "e_gen_recolor",
    }
}

// A missing toggle counts as on: selecting the type is what enables it.
fn enabled(params: &ParamObject, toggle: &str) -> bool {
    !matches!(params.get(toggle), Some(Value::Bool(false)))
}

fn effect_segment(ty: TransformationType, params: &ParamObject) -> Option<String> {
    if let Some(toggle) = toggle_field(ty) {
        return enabled(params, toggle).then(|| effect_name(ty).to_string());
    }

    let mut keys: Vec<&String> = params.keys().collect();
    keys.sort();
    let rendered: Vec<String> = keys
        .into_iter()
        .filter_map(|key| render_value(&params[key]).map(|v| format!("{}_{v}", kebab(key))))
        .collect();

    Some(if rendered.is_empty() {
        effect_name(ty).to_string()
    } else {
        format!("{}:{}", effect_name(ty), rendered.join(";"))
    })
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(escape(s)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(render_value).collect();
            (!parts.is_empty()).then(|| format!("({})", parts.join(";")))
        }
        Value::Null | Value::Object(_) => None,
    }
}

fn kebab(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// Percent-encode everything outside the unreserved set so free text cannot
// break the segment structure.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'~') {
            out.push(byte as char);
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::derive;
    use retouch_types::{ImageAttributes, TransformationConfig};
    use serde_json::json;

    fn url_for(config: Value) -> String {
        let committed: TransformationConfig = serde_json::from_value(config).unwrap();
        derive(&ImageAttributes::new("samples/dog", 640, 480), &committed)
            .unwrap()
            .to_url(&DeliveryConfig::default())
    }

    #[test]
    fn bare_image_has_only_a_size_segment() {
        assert_eq!(
            url_for(json!({})),
            "https://res.cloudinary.com/demo/image/upload/w_640,h_480/samples/dog"
        );
    }

    #[test]
    fn fill_pads_to_the_preset() {
        assert_eq!(
            url_for(json!({"fill": {"aspectRatio": "1:1", "fillBackground": true}})),
            "https://res.cloudinary.com/demo/image/upload/b_gen_fill/c_pad,w_1000,h_1000/samples/dog"
        );
    }

    #[test]
    fn parameters_are_sorted_and_kebab_cased() {
        assert_eq!(
            url_for(json!({"remove": {"prompt": "dog", "removeShadow": true, "multiple": true}})),
            "https://res.cloudinary.com/demo/image/upload/\
             e_gen_remove:multiple_true;prompt_dog;remove-shadow_true/w_640,h_480/samples/dog"
        );
    }

    #[test]
    fn segments_follow_canonical_type_order() {
        let url = url_for(json!({
            "recolor": {"prompt": "car", "color": "red"},
            "restore": {"restore": true},
        }));
        let restore = url.find("e_gen_restore").unwrap();
        let recolor = url.find("e_gen_recolor").unwrap();
        assert!(restore < recolor);
        assert!(url.contains("e_gen_recolor:color_red;prompt_car/"));
    }

    #[test]
    fn disabled_toggles_and_empty_text_are_omitted() {
        let url = url_for(json!({
            "restore": {"restore": false},
            "recolor": {"prompt": "", "color": "blue"},
        }));
        assert!(!url.contains("e_gen_restore"));
        assert!(url.contains("e_gen_recolor:color_blue/"));
    }

    #[test]
    fn free_text_is_escaped() {
        let url = url_for(json!({"remove": {"prompt": "red car; big/small"}}));
        assert!(url.contains("prompt_red%20car%3B%20big%2Fsmall"));
    }

    #[test]
    fn list_values_are_grouped() {
        let url = url_for(json!({"remove": {"prompt": ["dog", "cat"]}}));
        assert!(url.contains("e_gen_remove:prompt_(dog;cat)/"));
    }

    #[test]
    fn base_url_trailing_slash_is_tolerated() {
        let d = derive(&ImageAttributes::new("a", 1, 2), &TransformationConfig::new()).unwrap();
        let url = d.to_url(&DeliveryConfig::new("https://cdn.example.com/", "acme"));
        assert_eq!(url, "https://cdn.example.com/acme/image/upload/w_1,h_2/a");
    }
}
