//! Chronological log reading across a function's log streams.
//!
//! Streams are consumed one at a time, oldest-last-event first, each
//! read from its head until the platform returns an empty page.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use lambdeploy_cloud::{GetLogEventsRequest, LogSource, OutputLogEvent};
use lambdeploy_core::LogEvent;
use tracing::debug;

use crate::error::{DeployError, DeployResult};

/// Log group the platform writes a function's output to.
pub fn log_group_name(app: &str) -> String {
    format!("/aws/lambda/{app}")
}

/// Forward-only reader over every event of an application.
///
/// Not restartable: construct a new reader to read again.
pub struct LogReader<'a, L: ?Sized> {
    logs: &'a L,
    group: String,
    pending: VecDeque<String>,
    active: Option<String>,
    next_token: Option<String>,
    done: bool,
}

impl<'a, L: LogSource + ?Sized> LogReader<'a, L> {
    /// List the application's streams, ordered by last event time.
    pub fn open(logs: &'a L, app: &str) -> DeployResult<Self> {
        let group = log_group_name(app);
        let streams = logs.describe_log_streams(&group)?;
        debug!(group = %group, streams = streams.len(), "opened log group");

        Ok(Self {
            logs,
            group,
            pending: streams.into_iter().map(|s| s.log_stream_name).collect(),
            active: None,
            next_token: None,
            done: false,
        })
    }

    /// Next page of events. An empty batch means every stream is exhausted.
    pub fn next_batch(&mut self) -> DeployResult<Vec<LogEvent>> {
        loop {
            let stream = match &self.active {
                Some(stream) => stream.clone(),
                None => match self.pending.pop_front() {
                    Some(stream) => {
                        self.next_token = None;
                        self.active = Some(stream.clone());
                        stream
                    }
                    None => return Ok(Vec::new()),
                },
            };

            let page = self.logs.get_log_events(&GetLogEventsRequest {
                log_group_name: self.group.clone(),
                log_stream_name: stream.clone(),
                next_token: self.next_token.clone(),
                start_from_head: true,
                limit: None,
            })?;

            if page.events.is_empty() {
                debug!(stream = %stream, "log stream exhausted");
                self.active = None;
                continue;
            }

            self.next_token = Some(page.next_forward_token);
            return page
                .events
                .iter()
                .map(|ev| to_log_event(&stream, ev))
                .collect();
        }
    }
}

impl<L: LogSource + ?Sized> Iterator for LogReader<'_, L> {
    type Item = DeployResult<Vec<LogEvent>>;

    /// Yields non-empty batches; stops after the last one or the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_batch() {
            Ok(batch) if batch.is_empty() => {
                self.done = true;
                None
            }
            Ok(batch) => Some(Ok(batch)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn to_log_event(stream: &str, ev: &OutputLogEvent) -> DeployResult<LogEvent> {
    let timestamp: DateTime<Utc> = DateTime::from_timestamp_millis(ev.timestamp)
        .ok_or(DeployError::InvalidTimestamp(ev.timestamp))?;
    Ok(LogEvent {
        partition: stream.to_string(),
        timestamp,
        message: ev.message.trim_end().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambdeploy_cloud::{InputLogEvent, LocalCloud};

    #[test]
    fn translates_events() {
        let ev = OutputLogEvent {
            timestamp: 1_500_000_000_123,
            message: "START RequestId: 42\n\t".to_string(),
            ingestion_time: 0,
        };
        let out = to_log_event("2024/01/01/[$LATEST]abc", &ev).unwrap();
        assert_eq!(out.partition, "2024/01/01/[$LATEST]abc");
        assert_eq!(out.message, "START RequestId: 42");
        assert_eq!(out.timestamp.timestamp_millis(), 1_500_000_000_123);
    }

    #[test]
    fn missing_group_fails_on_open() {
        let cloud = LocalCloud::open_in_memory().unwrap();
        assert!(LogReader::open(&cloud, "ghost").is_err());
    }

    #[test]
    fn paginates_within_a_stream() {
        let cloud = LocalCloud::open_in_memory().unwrap().with_page_size(2);
        let events: Vec<InputLogEvent> = (1..=5)
            .map(|t| InputLogEvent {
                timestamp: t,
                message: format!("line {t}\n"),
            })
            .collect();
        cloud
            .put_log_events(&log_group_name("api"), "s1", &events)
            .unwrap();

        let mut reader = LogReader::open(&cloud, "api").unwrap();
        let sizes: Vec<usize> = (0..4).map(|_| reader.next_batch().unwrap().len()).collect();
        assert_eq!(sizes, vec![2, 2, 1, 0]);
        assert!(reader.next_batch().unwrap().is_empty());
    }

    #[test]
    fn iterator_stops_at_end() {
        let cloud = LocalCloud::open_in_memory().unwrap();
        cloud
            .put_log_events(
                &log_group_name("api"),
                "s1",
                &[InputLogEvent {
                    timestamp: 7,
                    message: "only".to_string(),
                }],
            )
            .unwrap();

        let batches: Vec<_> = LogReader::open(&cloud, "api")
            .unwrap()
            .collect::<DeployResult<_>>()
            .unwrap();
        assert_eq!(batches, vec![vec![LogEvent {
            partition: "s1".to_string(),
            timestamp: DateTime::from_timestamp_millis(7).unwrap(),
            message: "only".to_string(),
        }]]);
    }
}
