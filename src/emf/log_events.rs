//! Log-event output for delivery to CloudWatch Logs
//!
//! Each rendered document becomes one [`LogEvent`]. A batch can also be
//! encoded as the JSON array accepted by `aws logs put-log-events
//! --log-events`, or addressed to a log group and stream as a
//! [`PutLogEventsInput`] (the `--cli-input-json` shape).

use serde::{Deserialize, Serialize};

/// One rendered EMF document paired with its timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Milliseconds since epoch
    pub timestamp: i64,
    /// The EMF JSON line
    pub message: String,
}

impl LogEvent {
    pub fn new(message: impl Into<String>, timestamp: i64) -> Self {
        LogEvent {
            timestamp,
            message: message.into(),
        }
    }
}

/// Pair every message with the same timestamp
pub fn to_log_events(messages: Vec<String>, timestamp: i64) -> Vec<LogEvent> {
    messages
        .into_iter()
        .map(|message| LogEvent::new(message, timestamp))
        .collect()
}

/// Encode events as a JSON array of `{"timestamp":..,"message":..}`
pub fn to_cli_json(events: &[LogEvent]) -> serde_json::Result<String> {
    serde_json::to_string(events)
}

/// One PutLogEvents request: a batch addressed to a group and stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutLogEventsInput {
    pub log_group_name: String,
    pub log_stream_name: String,
    pub log_events: Vec<LogEvent>,
}

impl PutLogEventsInput {
    pub fn new(
        log_group_name: impl Into<String>,
        log_stream_name: impl Into<String>,
        log_events: Vec<LogEvent>,
    ) -> Self {
        PutLogEventsInput {
            log_group_name: log_group_name.into(),
            log_stream_name: log_stream_name.into(),
            log_events,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Hand the batch to a sink
    pub fn deliver<S: LogEventSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.put_log_events(&self.log_events)
    }
}

/// Log-delivery collaborator accepting batches of log events
///
/// Implementations own retries, batch splitting and rate limiting.
pub trait LogEventSink {
    type Error;

    /// Deliver one batch
    fn put_log_events(&mut self, events: &[LogEvent]) -> Result<(), Self::Error>;
}

impl LogEventSink for Vec<LogEvent> {
    type Error = std::convert::Infallible;

    fn put_log_events(&mut self, events: &[LogEvent]) -> Result<(), Self::Error> {
        self.extend_from_slice(events);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_json_field_order() {
        let events = vec![LogEvent::new(r#"{"a":1}"#, 10)];
        let json = to_cli_json(&events).unwrap();
        assert_eq!(json, r#"[{"timestamp":10,"message":"{\"a\":1}"}]"#);
    }

    #[test]
    fn test_cli_json_empty() {
        assert_eq!(to_cli_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_to_log_events_shares_timestamp() {
        let events = to_log_events(vec!["a".to_string(), "b".to_string()], 99);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.timestamp == 99));
        assert_eq!(events[1].message, "b");
    }

    #[test]
    fn test_put_log_events_input_json() {
        let input = PutLogEventsInput::new("group-a", "stream-a", vec![LogEvent::new("m", 5)]);
        assert_eq!(
            input.to_json().unwrap(),
            r#"{"logGroupName":"group-a","logStreamName":"stream-a","logEvents":[{"timestamp":5,"message":"m"}]}"#
        );
    }

    #[test]
    fn test_put_log_events_input_deliver() {
        let input = PutLogEventsInput::new(
            "g",
            "s",
            vec![LogEvent::new("a", 1), LogEvent::new("b", 1)],
        );
        let mut sink: Vec<LogEvent> = Vec::new();
        input.deliver(&mut sink).unwrap();
        assert_eq!(sink, input.log_events);
    }

    #[test]
    fn test_log_event_line_json() {
        let json = serde_json::to_string(&LogEvent::new("x", 7)).unwrap();
        assert_eq!(json, r#"{"timestamp":7,"message":"x"}"#);
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<LogEvent> = Vec::new();
        sink.put_log_events(&[LogEvent::new("x", 1)]).unwrap();
        sink.put_log_events(&[LogEvent::new("y", 2)]).unwrap();
        assert_eq!(sink.len(), 2);
    }
}
