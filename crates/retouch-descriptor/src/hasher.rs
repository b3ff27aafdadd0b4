use crate::error::{DescriptorError, DescriptorResult};

/// Domain-separated BLAKE3 hasher producing hex digests.
///
/// The domain tag is prepended to every input, so a descriptor and some
/// other document with identical JSON never share a fingerprint.
#[derive(Clone, Copy, Debug)]
pub struct Fingerprinter {
    domain: &'static str,
}

impl Fingerprinter {
    /// Hasher for request descriptors.
    pub const DESCRIPTOR: Self = Self {
        domain: "retouch-descriptor-v1",
    };
    /// Hasher for committed configurations on their own.
    pub const CONFIG: Self = Self {
        domain: "retouch-config-v1",
    };

    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hex digest of `data` under this domain.
    pub fn hash(&self, data: &[u8]) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        hex::encode(hasher.finalize().as_bytes())
    }

    /// Hex digest of the JSON encoding of `value`.
    ///
    /// `serde_json` maps keep their keys sorted, so equal values always
    /// encode to the same bytes.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> DescriptorResult<String> {
        let data =
            serde_json::to_vec(value).map_err(|e| DescriptorError::Serialization(e.to_string()))?;
        Ok(self.hash(&data))
    }

    pub fn domain(&self) -> &str {
        self.domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hash_is_deterministic_hex() {
        let a = Fingerprinter::DESCRIPTOR.hash(b"fill");
        assert_eq!(a, Fingerprinter::DESCRIPTOR.hash(b"fill"));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn domains_separate() {
        assert_ne!(
            Fingerprinter::DESCRIPTOR.hash(b"same"),
            Fingerprinter::CONFIG.hash(b"same")
        );
        assert_eq!(Fingerprinter::new("x").domain(), "x");
    }

    #[test]
    fn json_key_order_does_not_matter() {
        let a = json!({"prompt": "dog", "multiple": true});
        let b = json!({"multiple": true, "prompt": "dog"});
        assert_eq!(
            Fingerprinter::CONFIG.hash_json(&a).unwrap(),
            Fingerprinter::CONFIG.hash_json(&b).unwrap()
        );
    }
}
