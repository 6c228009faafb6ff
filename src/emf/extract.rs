//! Metric extraction from rendered EMF documents
//!
//! Reads documents back the way the CloudWatch Logs extraction pipeline
//! does: decode `_aws`, resolve every declared dimension and metric against
//! the flat top-level fields, and index the result by namespace, dimension
//! key and metric name. Used to verify what a batch of log events would
//! publish.

use super::error::{EmfError, Result};
use super::key_encoder::DimensionKeyEncoder;
use super::log_events::{LogEvent, LogEventSink};
use super::render::METADATA_FIELD;
use super::types::{DimensionSet, Dimensions, Metadata, MetricDefinition, MetricDirective};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// A metric as published by the extraction pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedMetric {
    pub definition: MetricDefinition,
    pub value: f64,
}

/// Expected metric for [`MetricExtractor::require`]
#[derive(Debug, Clone, Default)]
pub struct RequiredMetric {
    pub namespace: String,
    pub dimensions: Dimensions,
    pub name: String,
    pub unit: String,
    pub storage_resolution: u32,
    pub value: f64,
}

impl RequiredMetric {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, value: f64) -> Self {
        RequiredMetric {
            namespace: namespace.into(),
            name: name.into(),
            value,
            ..Default::default()
        }
    }

    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_storage_resolution(mut self, storage_resolution: u32) -> Self {
        self.storage_resolution = storage_resolution;
        self
    }
}

/// metric name -> metric
type MetricTable = HashMap<String, ExtractedMetric>;

/// In-memory stand-in for the log-metrics extraction pipeline
#[derive(Debug, Default)]
pub struct MetricExtractor {
    /// namespace -> dimension key -> metrics
    namespaces: HashMap<String, HashMap<String, MetricTable>>,
}

impl MetricExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one rendered EMF document and index its metrics
    pub fn ingest(&mut self, message: &str) -> Result<()> {
        let root: Value = serde_json::from_str(message)?;
        let root = root.as_object().ok_or(EmfError::NotAnObject)?;

        let meta = root
            .get(METADATA_FIELD)
            .ok_or(EmfError::MissingMetadata)?;
        let metadata: Metadata = serde_json::from_value(meta.clone())?;

        for directive in &metadata.cloud_watch_metrics {
            self.add_directive(root, directive)?;
        }
        Ok(())
    }

    fn add_directive(
        &mut self,
        root: &Map<String, Value>,
        directive: &MetricDirective,
    ) -> Result<()> {
        // Every declared set contributes its names to one flat key
        let names: Vec<&String> = directive
            .dimensions
            .iter()
            .flat_map(|set| set.iter())
            .collect();

        let mut dimensions = Dimensions::new();
        for name in &names {
            let value = root
                .get(name.as_str())
                .ok_or_else(|| EmfError::MissingDimension(name.to_string()))?;
            let text = value.as_str().ok_or_else(|| EmfError::DimensionNotString {
                name: name.to_string(),
                value: value.to_string(),
            })?;
            dimensions.insert(name.to_string(), text.to_string());
        }
        let dim_set = DimensionSet::from_names(names.iter().map(|n| n.as_str()));
        let dim_key =
            DimensionKeyEncoder::encode_with_set(&directive.namespace, &dimensions, &dim_set);

        for definition in &directive.metrics {
            let value = root
                .get(&definition.name)
                .ok_or_else(|| EmfError::MissingMetric(definition.name.clone()))?;
            let number = value.as_f64().ok_or_else(|| EmfError::MetricNotNumeric {
                name: definition.name.clone(),
                value: value.to_string(),
            })?;

            debug!(
                namespace = %directive.namespace,
                group = %dim_key,
                metric = %definition.name,
                "Extracted metric"
            );
            self.namespaces
                .entry(directive.namespace.clone())
                .or_default()
                .entry(dim_key.clone())
                .or_default()
                .insert(
                    definition.name.clone(),
                    ExtractedMetric {
                        definition: definition.clone(),
                        value: number,
                    },
                );
        }
        Ok(())
    }

    /// Look up an extracted metric
    pub fn get(
        &self,
        namespace: &str,
        dimensions: &Dimensions,
        name: &str,
    ) -> Option<&ExtractedMetric> {
        let dim_key = DimensionKeyEncoder::encode(namespace, dimensions);
        self.namespaces.get(namespace)?.get(&dim_key)?.get(name)
    }

    /// Number of distinct metrics extracted
    pub fn len(&self) -> usize {
        self.namespaces
            .values()
            .flat_map(|groups| groups.values())
            .map(|metrics| metrics.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that a metric was published with the expected definition and value
    pub fn require(&self, req: &RequiredMetric) -> Result<()> {
        let groups = self
            .namespaces
            .get(&req.namespace)
            .ok_or_else(|| EmfError::NamespaceNotFound(req.namespace.clone()))?;
        let dim_key = DimensionKeyEncoder::encode(&req.namespace, &req.dimensions);
        let metrics = groups
            .get(&dim_key)
            .ok_or_else(|| EmfError::DimensionsNotFound(dim_key.clone()))?;
        let metric = metrics
            .get(&req.name)
            .ok_or_else(|| EmfError::MetricNotFound(req.name.clone()))?;

        if metric.definition.unit != req.unit {
            return Err(EmfError::UnitMismatch {
                expected: req.unit.clone(),
                actual: metric.definition.unit.clone(),
            });
        }
        if metric.definition.storage_resolution != req.storage_resolution {
            return Err(EmfError::ResolutionMismatch {
                expected: req.storage_resolution,
                actual: metric.definition.storage_resolution,
            });
        }
        if metric.value != req.value {
            return Err(EmfError::ValueMismatch {
                expected: req.value,
                actual: metric.value,
            });
        }
        Ok(())
    }
}

impl LogEventSink for MetricExtractor {
    type Error = EmfError;

    /// Ingest every event, stopping at the first invalid document
    fn put_log_events(&mut self, events: &[LogEvent]) -> Result<()> {
        for event in events {
            self.ingest(&event.message)?;
        }
        Ok(())
    }
}
