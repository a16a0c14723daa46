//! Driver loop connecting standard input to the loader and the checkpoint
//! relay.
//!
//! Control flow is strictly sequential: each message is fully handled
//! before the next line is read, and every warehouse or loader call
//! completes before the driver proceeds. Nothing here spawns tasks.

use snafu::prelude::*;
use std::io::{BufRead, Write};
use tracing::debug;

use crate::checkpoint::StateEmitter;
use crate::error::{MalformedMessageSnafu, ReadLineSnafu, TargetError};
use crate::incoming::Message;
use crate::loader::RecordLoader;

/// Statistics about a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub records: u64,
    pub schemas: u64,
    pub checkpoints_emitted: u64,
    pub commits: u64,
}

/// Stream messages from `input` until end of input.
///
/// Records and schemas are handed to the loader. A state message first
/// commits the loader, then is acknowledged through the emitter: a
/// checkpoint is only ever emitted after the durable commit of the work it
/// covers. A final commit runs when input ends.
///
/// Malformed lines fail the run with the offending line number.
pub async fn run_pipeline<R, W, L>(
    input: R,
    loader: &mut L,
    emitter: &mut StateEmitter<W>,
) -> Result<PipelineStats, TargetError>
where
    R: BufRead,
    W: Write,
    L: RecordLoader,
{
    let mut stats = PipelineStats::default();

    for (number, line) in input.lines().enumerate() {
        let line = line.context(ReadLineSnafu)?;
        if line.trim().is_empty() {
            continue;
        }

        let message =
            Message::parse(&line).context(MalformedMessageSnafu { line: number + 1 })?;

        match message {
            Message::Schema { stream, schema } => {
                loader.apply_schema(&stream, schema).await?;
                stats.schemas += 1;
            }
            Message::Record { stream, record } => {
                loader.load(&stream, record).await?;
                stats.records += 1;
            }
            Message::State { value } => {
                loader.commit().await?;
                stats.commits += 1;
                emitter.emit(Some(&value))?;
                stats.checkpoints_emitted += 1;
            }
        }
    }

    // Flush whatever trails the last checkpoint.
    loader.commit().await?;
    stats.commits += 1;

    debug!(?stats, "Input drained");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use crate::error::{CommitSnafu, LoaderError};

    /// Loader that appends every call to a shared event log.
    struct LoggingLoader {
        events: Arc<Mutex<Vec<String>>>,
        fail_commit: bool,
    }

    #[async_trait]
    impl RecordLoader for LoggingLoader {
        async fn apply_schema(&mut self, stream: &str, _schema: Value) -> Result<(), LoaderError> {
            self.events.lock().unwrap().push(format!("schema:{stream}"));
            Ok(())
        }

        async fn load(&mut self, stream: &str, _record: Value) -> Result<(), LoaderError> {
            self.events.lock().unwrap().push(format!("record:{stream}"));
            Ok(())
        }

        async fn commit(&mut self) -> Result<(), LoaderError> {
            if self.fail_commit {
                return CommitSnafu {
                    message: "upload rejected",
                }
                .fail();
            }
            self.events.lock().unwrap().push("commit".to_string());
            Ok(())
        }
    }

    /// Writer that appends an "emit" event for every acknowledgement line.
    struct LoggingWriter {
        events: Arc<Mutex<Vec<String>>>,
        buffer: Vec<u8>,
    }

    impl Write for LoggingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if buf.contains(&b'\n') {
                self.events.lock().unwrap().push("emit".to_string());
            }
            self.buffer.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn input() -> String {
        [
            json!({"type": "SCHEMA", "stream": "orders", "schema": {"properties": {}}}).to_string(),
            json!({"type": "RECORD", "stream": "orders", "record": {"id": 1}}).to_string(),
            json!({"type": "RECORD", "stream": "orders", "record": {"id": 2}}).to_string(),
            json!({"type": "STATE", "value": {"bookmarks": {"orders": 2}}}).to_string(),
            json!({"type": "RECORD", "stream": "orders", "record": {"id": 3}}).to_string(),
        ]
        .join("\n")
    }

    #[tokio::test]
    async fn test_commit_happens_before_acknowledgement() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut loader = LoggingLoader {
            events: events.clone(),
            fail_commit: false,
        };
        let mut emitter = StateEmitter::new(
            LoggingWriter {
                events: events.clone(),
                buffer: Vec::new(),
            },
            None,
        );

        let stats = run_pipeline(Cursor::new(input()), &mut loader, &mut emitter)
            .await
            .unwrap();

        assert_eq!(stats.records, 3);
        assert_eq!(stats.schemas, 1);
        assert_eq!(stats.checkpoints_emitted, 1);
        assert_eq!(stats.commits, 2);

        let output = String::from_utf8(emitter.into_inner().buffer).unwrap();
        assert_eq!(output.lines().count(), 1);

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "schema:orders",
                "record:orders",
                "record:orders",
                "commit",
                "emit",
                "record:orders",
                "commit",
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_commit_suppresses_acknowledgement() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut loader = LoggingLoader {
            events: events.clone(),
            fail_commit: true,
        };
        let mut emitter = StateEmitter::new(Vec::new(), None);

        let err = run_pipeline(Cursor::new(input()), &mut loader, &mut emitter)
            .await
            .unwrap_err();

        assert!(matches!(err, TargetError::Loader { .. }));
        assert!(emitter.into_inner().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_line_fails_with_line_number() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut loader = LoggingLoader {
            events,
            fail_commit: false,
        };
        let mut emitter = StateEmitter::new(Vec::new(), None);

        let input = "\n{\"type\": \"STATE\", \"value\": {}}\nnot json\n";
        let err = run_pipeline(Cursor::new(input), &mut loader, &mut emitter)
            .await
            .unwrap_err();

        match err {
            TargetError::MalformedMessage { line, .. } => assert_eq!(line, 3),
            other => panic!("Expected MalformedMessage, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_input_still_commits_once() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut loader = LoggingLoader {
            events: events.clone(),
            fail_commit: false,
        };
        let mut emitter = StateEmitter::new(Vec::new(), None);

        let stats = run_pipeline(Cursor::new(""), &mut loader, &mut emitter)
            .await
            .unwrap();

        assert_eq!(stats.commits, 1);
        assert_eq!(stats.checkpoints_emitted, 0);
        assert_eq!(*events.lock().unwrap(), vec!["commit"]);
    }
}
