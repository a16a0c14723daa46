//! State checkpoint relay.
//!
//! Progress checkpoints arrive from upstream after each durably committed
//! unit of work. `StateEmitter` writes each one as a single JSON line to the
//! acknowledgement writer (standard output in production) and, when
//! configured, appends the same line to a local state file.
//!
//! The emitter treats state as an opaque snapshot and never inspects or
//! deduplicates what it is handed. Whether the covered work is actually
//! durable is the caller's contract.

use serde_json::Value;
use snafu::prelude::*;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::error::{AckWriteSnafu, CheckpointError, EncodeSnafu, StateFileAppendSnafu};

/// Writes acknowledged state checkpoints to an output stream.
pub struct StateEmitter<W: Write> {
    out: W,
    state_file: Option<PathBuf>,
}

impl StateEmitter<io::Stdout> {
    /// Emitter for the production acknowledgement channel.
    pub fn stdout(state_file: Option<PathBuf>) -> Self {
        Self::new(io::stdout(), state_file)
    }
}

impl<W: Write> StateEmitter<W> {
    pub fn new(out: W, state_file: Option<PathBuf>) -> Self {
        Self { out, state_file }
    }

    /// Emit a state checkpoint.
    ///
    /// `None` means upstream had nothing to acknowledge; nothing is written.
    /// The acknowledgement line is flushed before this returns. The state
    /// file is opened in append mode on every call, and a failed append is
    /// an error, never swallowed.
    pub fn emit(&mut self, state: Option<&Value>) -> Result<(), CheckpointError> {
        let Some(state) = state else {
            return Ok(());
        };

        let line = serde_json::to_string(state).context(EncodeSnafu)?;
        debug!("Emitting state {line}");

        writeln!(self.out, "{line}").context(AckWriteSnafu)?;
        self.out.flush().context(AckWriteSnafu)?;

        if let Some(path) = &self.state_file {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .context(StateFileAppendSnafu { path: path.clone() })?;
            writeln!(file, "{line}").context(StateFileAppendSnafu { path: path.clone() })?;
            file.flush()
                .context(StateFileAppendSnafu { path: path.clone() })?;
        }

        Ok(())
    }

    /// Consume the emitter, returning the acknowledgement writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
