//! EMF document rendering
//!
//! Field order is fixed: the `_aws` metadata block comes first, followed by
//! every dimension and metric field in ascending name order. A value field
//! literally named `_aws` is shadowed by the metadata block.
//!
//! `_aws` leads even when a field sorts below it by byte value: uppercase
//! names and anything else under `_` (0x5F) still come after the metadata
//! block. Consumers key on field names, so only byte-level comparisons of
//! output can tell the difference.

use super::types::{FieldValue, Metadata};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Top-level field holding the metadata block
pub const METADATA_FIELD: &str = "_aws";

/// Borrowed view of one group, serialized as a single flat JSON object
struct Document<'a> {
    meta: &'a Metadata,
    values: &'a BTreeMap<String, FieldValue>,
}

impl Serialize for Document<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self
            .values
            .iter()
            .filter(|(name, _)| name.as_str() != METADATA_FIELD);

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(METADATA_FIELD, self.meta)?;
        for (name, value) in fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Serialize metadata and values as a one-line EMF document
pub fn render_document(
    meta: &Metadata,
    values: &BTreeMap<String, FieldValue>,
) -> serde_json::Result<String> {
    serde_json::to_string(&Document { meta, values })
}
