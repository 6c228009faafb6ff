//! Group key encoding
//!
//! Normalizes a namespace plus a dimension mapping into the string key that
//! identifies an aggregation group.
//!
//! Key format: `<namespace> <name1>:<value1>,<name2>:<value2>`
//!
//! Examples:
//! - `emf-test-ns1 ` (no dimensions)
//! - `emf-test-ns1 dimKey1:dimVal1,dimKey2:dimVal2`

use super::types::{DimensionSet, Dimensions};

/// Encodes group keys from namespace and dimensions
pub struct DimensionKeyEncoder;

impl DimensionKeyEncoder {
    /// Sorted dimension names of a mapping
    pub fn dimension_set(dimensions: &Dimensions) -> DimensionSet {
        DimensionSet::from_dimensions(dimensions)
    }

    /// Encode the group key for a namespace and dimension mapping
    pub fn encode(namespace: &str, dimensions: &Dimensions) -> String {
        let dim_set = Self::dimension_set(dimensions);
        Self::encode_with_set(namespace, dimensions, &dim_set)
    }

    /// Encode using an already computed dimension set
    ///
    /// Names in `dim_set` missing from `dimensions` encode with an empty value.
    pub fn encode_with_set(
        namespace: &str,
        dimensions: &Dimensions,
        dim_set: &DimensionSet,
    ) -> String {
        let pairs = dim_set
            .iter()
            .map(|name| {
                let value = dimensions.get(name).map(String::as_str).unwrap_or("");
                format!("{}:{}", name, value)
            })
            .collect::<Vec<_>>()
            .join(",");
        format!("{} {}", namespace, pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(pairs: &[(&str, &str)]) -> Dimensions {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_encode_no_dimensions() {
        let key = DimensionKeyEncoder::encode("emf-test-ns1", &Dimensions::new());
        assert_eq!(key, "emf-test-ns1 ");
    }

    #[test]
    fn test_encode_sorted_pairs() {
        let key = DimensionKeyEncoder::encode(
            "ns",
            &dims(&[("dimKey2", "dimVal2"), ("dimKey1", "dimVal1")]),
        );
        assert_eq!(key, "ns dimKey1:dimVal1,dimKey2:dimVal2");
    }

    #[test]
    fn test_same_dimensions_same_key() {
        // Same pairs inserted in different order should produce same key
        let mut d1 = Dimensions::new();
        d1.insert("a".to_string(), "1".to_string());
        d1.insert("b".to_string(), "2".to_string());
        let mut d2 = Dimensions::new();
        d2.insert("b".to_string(), "2".to_string());
        d2.insert("a".to_string(), "1".to_string());

        assert_eq!(
            DimensionKeyEncoder::encode("ns", &d1),
            DimensionKeyEncoder::encode("ns", &d2)
        );
    }

    #[test]
    fn test_different_values_different_key() {
        let key1 = DimensionKeyEncoder::encode("ns", &dims(&[("host", "web01")]));
        let key2 = DimensionKeyEncoder::encode("ns", &dims(&[("host", "web02")]));
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_namespace_is_part_of_key() {
        let d = dims(&[("host", "web01")]);
        assert_ne!(
            DimensionKeyEncoder::encode("ns1", &d),
            DimensionKeyEncoder::encode("ns2", &d)
        );
    }

    #[test]
    fn test_encode_with_set_missing_value() {
        let set = DimensionSet::from_names(["host"]);
        let key = DimensionKeyEncoder::encode_with_set("ns", &Dimensions::new(), &set);
        assert_eq!(key, "ns host:");
    }
}
