//! Core EMF document types
//!
//! These mirror the `_aws` metadata block of the CloudWatch Embedded Metric
//! Format. Field names are serialized in PascalCase, and empty `Unit` /
//! zero `StorageResolution` are omitted from the output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dimension name -> dimension value, as supplied by callers of `record`.
pub type Dimensions = HashMap<String, String>;

/// Identity and presentation of a single metric
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDefinition {
    /// Metric name, unique within a namespace + dimension group
    pub name: String,

    /// Free-form unit (e.g. "Bytes/Second"), omitted when empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,

    /// Storage resolution in seconds (1 or 60), omitted when zero
    #[serde(default, skip_serializing_if = "is_zero")]
    pub storage_resolution: u32,
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

impl MetricDefinition {
    /// Create a definition with no unit and default resolution
    pub fn new(name: impl Into<String>) -> Self {
        MetricDefinition {
            name: name.into(),
            unit: String::new(),
            storage_resolution: 0,
        }
    }

    /// Set unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Set storage resolution
    pub fn with_storage_resolution(mut self, storage_resolution: u32) -> Self {
        self.storage_resolution = storage_resolution;
        self
    }
}

/// Sorted list of dimension names
///
/// Always sorted lexicographically so that `{a:1,b:2}` and `{b:2,a:1}`
/// produce the same set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionSet(Vec<String>);

impl DimensionSet {
    /// Build the sorted set of names from a dimension mapping
    pub fn from_dimensions(dimensions: &Dimensions) -> Self {
        let mut names: Vec<String> = dimensions.keys().cloned().collect();
        names.sort();
        DimensionSet(names)
    }

    /// Build from names, sorting them
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        DimensionSet(names)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One namespace's declaration block
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDirective {
    pub namespace: String,

    /// Empty for dimensionless groups, otherwise exactly one set
    #[serde(default)]
    pub dimensions: Vec<DimensionSet>,

    /// Insertion-ordered; a redefined metric keeps its position
    #[serde(default)]
    pub metrics: Vec<MetricDefinition>,
}

impl MetricDirective {
    pub fn new(namespace: impl Into<String>) -> Self {
        MetricDirective {
            namespace: namespace.into(),
            dimensions: Vec::new(),
            metrics: Vec::new(),
        }
    }

    /// Replace the definition with the same name in place, or append it
    pub fn upsert_metric(&mut self, metric: MetricDefinition) {
        match self.metrics.iter_mut().find(|m| m.name == metric.name) {
            Some(existing) => *existing = metric,
            None => self.metrics.push(metric),
        }
    }

    /// Set the dimension sets from the latest recorded dimension names
    pub fn set_dimensions(&mut self, dim_set: &DimensionSet) {
        self.dimensions = if dim_set.is_empty() {
            Vec::new()
        } else {
            vec![dim_set.clone()]
        };
    }
}

/// The `_aws` block of an EMF document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "CloudWatchMetrics", default)]
    pub cloud_watch_metrics: Vec<MetricDirective>,

    /// Milliseconds since epoch, stamped at render time
    #[serde(rename = "Timestamp", default)]
    pub timestamp: i64,
}

impl Metadata {
    /// Find the directive for a namespace, creating it if absent
    pub fn directive_mut(&mut self, namespace: &str) -> &mut MetricDirective {
        let index = match self
            .cloud_watch_metrics
            .iter()
            .position(|d| d.namespace == namespace)
        {
            Some(index) => index,
            None => {
                self.cloud_watch_metrics.push(MetricDirective::new(namespace));
                self.cloud_watch_metrics.len() - 1
            }
        };
        &mut self.cloud_watch_metrics[index]
    }
}

/// A flat top-level field value of an EMF document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Dimension value
    Text(String),
    /// Metric value
    Number(i64),
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}
