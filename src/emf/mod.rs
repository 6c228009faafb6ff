//! CloudWatch Embedded Metric Format aggregation
//!
//! - **Aggregator**: latest value per (namespace, dimensions, metric), thread-safe
//! - **Renderer**: one single-line EMF JSON document per group
//! - **DimensionKeyEncoder**: order-independent group keys
//! - **MetricExtractor**: parses rendered documents back for verification

mod aggregator;
mod clock;
mod error;
mod extract;
mod key_encoder;
mod log_events;
mod render;
mod types;

pub use aggregator::Aggregator;
pub use clock::{default_now_millis, Clock, NowMillis, Options, SimulatedClock, SystemClock};
pub use error::{EmfError, Result};
pub use extract::{ExtractedMetric, MetricExtractor, RequiredMetric};
pub use key_encoder::DimensionKeyEncoder;
pub use log_events::{to_cli_json, to_log_events, LogEvent, LogEventSink, PutLogEventsInput};
pub use render::{render_document, METADATA_FIELD};
pub use types::{
    DimensionSet, Dimensions, FieldValue, Metadata, MetricDefinition, MetricDirective,
};
