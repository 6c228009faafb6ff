pub mod config;
pub mod emf;
pub mod observability;

pub use config::{ConfigError, EmfConfig, LogFormat, OutputMode};
pub use emf::{
    Aggregator, DimensionSet, Dimensions, EmfError, LogEvent, LogEventSink, Metadata,
    MetricDefinition, MetricDirective, MetricExtractor, Options, PutLogEventsInput,
};
