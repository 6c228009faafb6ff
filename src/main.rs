use aws_emf::emf::{Aggregator, Dimensions, MetricDefinition, Options};
use aws_emf::observability::init_tracing;
use aws_emf::{EmfConfig, OutputMode};
use std::path::PathBuf;
use tracing::info;

fn dimensions(pairs: &[(&str, &str)]) -> Dimensions {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = EmfConfig::load(config_path.as_deref())?;

    init_tracing(config.log_format, &config.log_level)?;
    info!(
        log_group = %config.log_group,
        log_stream = %config.log_stream,
        output = ?config.output,
        "Starting EMF example"
    );

    let metrics = Aggregator::new(Options::default());

    let dim1 = dimensions(&[("dimKey1", "dimVal1")]);
    let dim2 = dimensions(&[("dimKey1", "dimVal1"), ("dimKey2", "dimVal2")]);
    let none = Dimensions::new();

    let metric1 = MetricDefinition::new("metric1")
        .with_unit("Bytes/Second")
        .with_storage_resolution(1);
    let metric2 = MetricDefinition::new("metric2");

    // Drop values from a previous cycle that are not re-recorded below
    metrics.reset();

    metrics.record("emf-test-ns1", metric1.clone(), &none, 10);
    metrics.record("emf-test-ns1", metric1.clone(), &dim1, 20);
    metrics.record("emf-test-ns1", metric1.clone(), &dim2, 30);
    metrics.record("emf-test-ns1", metric2, &none, 40);
    metrics.record("emf-test-ns2", metric1, &none, 50);

    match config.output {
        OutputMode::Lines => metrics.print_lines()?,
        OutputMode::LogEvents => {
            for event in metrics.log_events() {
                println!("{}", serde_json::to_string(&event)?);
            }
        }
        OutputMode::CliJson => println!("{}", metrics.cli_json()?),
        OutputMode::PutLogEventsInput => {
            let input = metrics.put_log_events_input(&config.log_group, &config.log_stream);
            println!("{}", input.to_json()?);
        }
    }

    let (metric_count, dimension_count) = metrics.count();
    info!(
        groups = metrics.group_count(),
        metrics = metric_count,
        dimension_sets = dimension_count,
        "Emitted EMF documents"
    );
    Ok(())
}
