//! EMF metric aggregation
//!
//! Holds the latest value of every recorded metric, grouped by namespace and
//! dimension mapping, and renders one EMF document per group.
//!
//! Values are last-write-wins. Rendering does not clear state: a group that
//! is not re-recorded before the next render is emitted again with its old
//! values. Call [`Aggregator::reset`] between cycles if that is undesired.

use super::clock::{NowMillis, Options};
use super::key_encoder::DimensionKeyEncoder;
use super::log_events::{to_cli_json, to_log_events, LogEvent, PutLogEventsInput};
use super::render::render_document;
use super::types::{Dimensions, FieldValue, Metadata, MetricDefinition};
use super::Result;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};
use tracing::{debug, error, trace};

/// One aggregation unit: a namespace plus a concrete dimension mapping
#[derive(Debug, Default)]
struct Group {
    meta: Metadata,
    /// Dimension and metric fields, merged flat at render time
    values: BTreeMap<String, FieldValue>,
}

impl Group {
    fn render(&mut self, key: &str, timestamp: i64) -> Option<String> {
        self.meta.timestamp = timestamp;
        match render_document(&self.meta, &self.values) {
            Ok(doc) => Some(doc),
            Err(e) => {
                error!(group = %key, error = %e, "Failed to serialize EMF group");
                None
            }
        }
    }
}

/// Thread-safe EMF metric aggregator
///
/// `record`, `reset` and rendering each hold a single lock over the whole
/// table, so they never observe each other's partial state.
pub struct Aggregator {
    table: Mutex<HashMap<String, Group>>,
    now_millis: NowMillis,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Aggregator {
    /// Create an empty aggregator
    pub fn new(options: Options) -> Self {
        Aggregator {
            table: Mutex::new(HashMap::new()),
            now_millis: options.into_now_millis(),
        }
    }

    /// Current time according to the configured clock
    pub fn now_millis(&self) -> i64 {
        (self.now_millis)()
    }

    /// Discard all groups
    pub fn reset(&self) {
        let mut table = self.table.lock();
        let dropped = table.len();
        *table = HashMap::new();
        debug!(groups = dropped, "Reset EMF aggregator");
    }

    /// Record a metric value
    ///
    /// Inputs are stored as given: empty names or colliding dimension and
    /// metric names are not rejected. A dimension named like a metric in the
    /// same group overwrites it in the flat value map.
    pub fn record(
        &self,
        namespace: &str,
        metric: MetricDefinition,
        dimensions: &Dimensions,
        value: i64,
    ) {
        let dim_set = DimensionKeyEncoder::dimension_set(dimensions);
        let key = DimensionKeyEncoder::encode_with_set(namespace, dimensions, &dim_set);
        trace!(group = %key, metric = %metric.name, value, "Recording metric");

        let mut table = self.table.lock();
        let group = table.entry(key).or_default();

        let metric_name = metric.name.clone();
        let directive = group.meta.directive_mut(namespace);
        directive.upsert_metric(metric);
        directive.set_dimensions(&dim_set);

        group.values.insert(metric_name, FieldValue::Number(value));
        for (name, dim_value) in dimensions {
            group
                .values
                .insert(name.clone(), FieldValue::Text(dim_value.clone()));
        }
    }

    /// Render every group with the current time
    ///
    /// Order across groups is unspecified.
    pub fn render(&self) -> Vec<String> {
        self.render_at(self.now_millis())
    }

    /// Render every group with an explicit timestamp
    pub fn render_at(&self, timestamp: i64) -> Vec<String> {
        let mut table = self.table.lock();
        let docs: Vec<String> = table
            .iter_mut()
            .filter_map(|(key, group)| group.render(key, timestamp))
            .collect();
        debug!(groups = docs.len(), timestamp, "Rendered EMF documents");
        docs
    }

    /// Render the single group reached by `namespace` and `dimensions`
    pub fn render_group(&self, namespace: &str, dimensions: &Dimensions) -> Option<String> {
        let key = DimensionKeyEncoder::encode(namespace, dimensions);
        let timestamp = self.now_millis();
        let mut table = self.table.lock();
        table
            .get_mut(&key)
            .and_then(|group| group.render(&key, timestamp))
    }

    /// Write each rendered document on its own line
    pub fn write_lines<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for doc in self.render() {
            writeln!(writer, "{}", doc)?;
        }
        writer.flush()
    }

    /// Write each rendered document to stdout
    pub fn print_lines(&self) -> io::Result<()> {
        let stdout = io::stdout();
        self.write_lines(stdout.lock())
    }

    /// Render as CloudWatch Logs input events
    ///
    /// The clock is read once; every event and every `_aws.Timestamp`
    /// carries the same value.
    pub fn log_events(&self) -> Vec<LogEvent> {
        let timestamp = self.now_millis();
        to_log_events(self.render_at(timestamp), timestamp)
    }

    /// Render as the JSON array accepted by `aws logs put-log-events`
    pub fn cli_json(&self) -> Result<String> {
        Ok(to_cli_json(&self.log_events())?)
    }

    /// Current log events addressed to `log_group`/`log_stream`
    pub fn put_log_events_input(&self, log_group: &str, log_stream: &str) -> PutLogEventsInput {
        PutLogEventsInput::new(log_group, log_stream, self.log_events())
    }

    /// Number of groups
    pub fn group_count(&self) -> usize {
        self.table.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.lock().is_empty()
    }

    /// Total metric definitions and dimension sets across all directives
    pub fn count(&self) -> (usize, usize) {
        let table = self.table.lock();
        table
            .values()
            .flat_map(|group| group.meta.cloud_watch_metrics.iter())
            .fold((0, 0), |(metrics, dimensions), directive| {
                (
                    metrics + directive.metrics.len(),
                    dimensions + directive.dimensions.len(),
                )
            })
    }
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("groups", &self.group_count())
            .finish()
    }
}
