//! Process backend
//!
//! Drives a candidate store running as a child process. Every adapter call
//! becomes one command line on the child's stdin; only `lookup` reads a
//! response. Mutations are fire-and-forget, so a candidate's mutation bugs
//! surface at the next divergent lookup or in the final dump.
//!
//! # Lifecycle
//!
//! ```text
//! spawn ──► put/get/... ──► finish: close stdin ─► read dump ─► reap ─► parse
//!                      └──► abort:  kill ─► reap
//! ```
//!
//! The child and both pipe pumps are acquired together in [`ProcessStore::spawn`]
//! and released together by `finish` or `abort`. `Drop` repeats the release
//! for stores that are unwound by a panic.

mod config;
mod pipes;

pub use config::{ProcessConfig, DEFAULT_LOOKUP_TIMEOUT, DEFAULT_SHUTDOWN_TIMEOUT};

use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use kvdiff_core::{HarnessError, Key, Result, StoreSnapshot, Value};
use kvdiff_wire::{encode_request, parse_dump, parse_lookup_response, Request};

use crate::adapter::{KvStore, StoreLauncher};
use pipes::{CommandWriter, LineReader};

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// How long to wait for an exit status once the child's stdout has closed
const EXIT_GRACE: Duration = Duration::from_millis(250);

/// Candidate store reached through its stdin/stdout
pub struct ProcessStore {
    child: Child,
    writer: CommandWriter,
    reader: LineReader,
    lookup_timeout: Duration,
    shutdown_timeout: Duration,
    commands_sent: u64,
    released: bool,
}

impl ProcessStore {
    /// Start the candidate and attach to its stdin and stdout
    ///
    /// stderr is inherited for diagnostics.
    ///
    /// # Errors
    /// `Config` if the configuration is invalid, `ProcessFailure` if the
    /// child cannot be started or its pipes cannot be attached.
    pub fn spawn(config: &ProcessConfig) -> Result<Self> {
        config.validate()?;
        let program = config.program.display().to_string();

        let mut child = Command::new(&config.program)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| HarnessError::process(format!("failed to spawn {}: {}", program, e)))?;

        let pipes = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => CommandWriter::spawn(stdin)
                .and_then(|writer| LineReader::spawn(stdout).map(|reader| (writer, reader))),
            _ => Err(io::Error::new(
                io::ErrorKind::Other,
                "stdio pipes were not captured",
            )),
        };

        let (writer, reader) = match pipes {
            Ok(pipes) => pipes,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(HarnessError::process(format!(
                    "failed to attach to {}: {}",
                    program, e
                )));
            }
        };

        debug!(program = %program, pid = child.id(), "spawned candidate");

        Ok(ProcessStore {
            child,
            writer,
            reader,
            lookup_timeout: config.lookup_timeout,
            shutdown_timeout: config.shutdown_timeout,
            commands_sent: 0,
            released: false,
        })
    }

    /// OS process id of the candidate
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Commands written so far
    pub fn commands_sent(&self) -> u64 {
        self.commands_sent
    }

    fn send(&mut self, request: Request) -> Result<()> {
        trace!(pid = self.child.id(), command = %request, "send");
        match self.writer.send(encode_request(&request)) {
            Ok(()) => {
                self.commands_sent += 1;
                Ok(())
            }
            Err(e) => Err(self.pipe_failure("writing commands", e)),
        }
    }

    fn pipe_failure(&mut self, action: &str, e: io::Error) -> HarnessError {
        let hint = self.exit_hint();
        HarnessError::process(format!(
            "{} failed after {} commands: {}{}",
            action, self.commands_sent, e, hint
        ))
    }

    fn read_error(&mut self, waiting_for: &str, e: io::Error) -> HarnessError {
        if e.kind() == io::ErrorKind::InvalidData {
            HarnessError::protocol(waiting_for, format!("non-UTF-8 output: {}", e))
        } else {
            self.pipe_failure(&format!("reading {}", waiting_for), e)
        }
    }

    /// Exit status suffix for error messages, if the child has exited
    fn exit_hint(&mut self) -> String {
        // stdout can close a moment before the exit status is available
        let deadline = Instant::now() + EXIT_GRACE;
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => return format!(" (candidate {})", status),
                Ok(None) if Instant::now() < deadline => thread::sleep(EXIT_POLL_INTERVAL),
                _ => return String::new(),
            }
        }
    }

    /// Close stdin, collect the dump, reap, then parse
    fn shutdown(&mut self) -> Result<StoreSnapshot> {
        let deadline = Instant::now() + self.shutdown_timeout;
        self.writer.close();

        let mut dump = String::new();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.reader.next_line(remaining) {
                Ok(Ok(line)) => dump.push_str(&line),
                Ok(Err(e)) => return Err(self.read_error("final dump", e)),
                Err(RecvTimeoutError::Timeout) => {
                    return Err(HarnessError::timeout(self.shutdown_timeout, "final dump"))
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.reader.join();

        let status = self.reap(deadline)?;
        self.released = true;
        debug!(
            pid = self.child.id(),
            status = %status,
            commands = self.commands_sent,
            "candidate exited"
        );

        if !status.success() {
            self.writer.detach();
            return Err(HarnessError::process(format!(
                "candidate {} after {} commands",
                status, self.commands_sent
            )));
        }
        if let Err(e) = self.writer.join() {
            return Err(HarnessError::process(format!(
                "candidate exited before reading all {} commands: {}",
                self.commands_sent, e
            )));
        }
        if dump.trim().is_empty() {
            return Err(HarnessError::process(
                "candidate exited without writing a final dump",
            ));
        }

        parse_dump(&dump)
    }

    fn reap(&mut self, deadline: Instant) -> Result<ExitStatus> {
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) if Instant::now() < deadline => thread::sleep(EXIT_POLL_INTERVAL),
                Ok(None) => {
                    return Err(HarnessError::timeout(
                        self.shutdown_timeout,
                        "candidate exit",
                    ))
                }
                Err(e) => {
                    return Err(HarnessError::process(format!(
                        "failed to wait for candidate: {}",
                        e
                    )))
                }
            }
        }
    }

    /// Kill the child if it is still running, reap it, and drop both pumps
    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let pid = self.child.id();
        match self.child.try_wait() {
            Ok(Some(status)) => debug!(pid, status = %status, "candidate already exited"),
            _ => {
                if let Err(e) = self.child.kill() {
                    warn!(pid, error = %e, "failed to kill candidate");
                }
                match self.child.wait() {
                    Ok(status) => debug!(pid, status = %status, "killed candidate"),
                    Err(e) => warn!(pid, error = %e, "failed to reap candidate"),
                }
            }
        }

        // Both pumps see a closed pipe now and exit on their own.
        self.writer.detach();
        self.reader.detach();
    }
}

impl KvStore for ProcessStore {
    fn put(&mut self, key: Key, value: Value) -> Result<()> {
        self.send(Request::Insert { key, value })
    }

    fn get(&mut self, key: Key) -> Result<Option<Value>> {
        self.send(Request::Lookup { key })?;

        let line = match self.reader.next_line(self.lookup_timeout) {
            Ok(Ok(line)) => line,
            Ok(Err(e)) => return Err(self.read_error("lookup response", e)),
            Err(RecvTimeoutError::Timeout) => {
                return Err(HarnessError::timeout(
                    self.lookup_timeout,
                    format!("response to lookup {}", key),
                ))
            }
            Err(RecvTimeoutError::Disconnected) => {
                let hint = self.exit_hint();
                return Err(HarnessError::process(format!(
                    "candidate closed its output with a lookup pending after {} commands{}",
                    self.commands_sent, hint
                )));
            }
        };

        trace!(pid = self.child.id(), response = line.trim_end(), "recv");
        parse_lookup_response(&line)
    }

    fn increment(&mut self, key: Key) -> Result<()> {
        self.send(Request::Increment { key })
    }

    fn delete(&mut self, key: Key) -> Result<()> {
        self.send(Request::Delete { key })
    }

    fn clear(&mut self) -> Result<()> {
        self.send(Request::Clear)
    }

    fn compact(&mut self) -> Result<()> {
        self.send(Request::Compact)
    }

    fn finish(mut self) -> Result<StoreSnapshot> {
        let result = self.shutdown();
        self.release();
        result
    }

    fn abort(mut self) {
        debug!(
            pid = self.child.id(),
            commands = self.commands_sent,
            "aborting candidate"
        );
        self.release();
    }
}

impl Drop for ProcessStore {
    fn drop(&mut self) {
        self.release();
    }
}

impl StoreLauncher for ProcessConfig {
    type Store = ProcessStore;

    fn launch(&self) -> Result<ProcessStore> {
        ProcessStore::spawn(self)
    }

    fn describe(&self) -> String {
        if self.args.is_empty() {
            self.program.display().to_string()
        } else {
            format!("{} {}", self.program.display(), self.args.join(" "))
        }
    }
}
