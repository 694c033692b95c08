//! Pipe pumps for the candidate's stdin and stdout
//!
//! Each end of the child's stdio is owned by a dedicated thread so that the
//! harness never blocks on the pipe itself:
//!
//! - [`CommandWriter`] drains an unbounded queue of command lines into stdin.
//!   A send completes once the line is queued; the pump flushes whenever the
//!   queue runs dry, so a `lookup` is on the wire before its response is
//!   awaited.
//! - [`LineReader`] forwards stdout line by line, letting callers bound each
//!   wait with `recv_timeout`.
//!
//! A single queue and a single pump per direction keep write order and
//! response order intact.

use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process::{ChildStdin, ChildStdout};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Queue feeding the candidate's stdin
pub(crate) struct CommandWriter {
    tx: Option<Sender<String>>,
    handle: Option<JoinHandle<io::Result<()>>>,
}

impl CommandWriter {
    pub(crate) fn spawn(stdin: ChildStdin) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel::<String>();
        let handle = thread::Builder::new()
            .name("kvdiff-stdin".to_string())
            .spawn(move || pump_commands(stdin, rx))?;
        Ok(CommandWriter {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Queue one line
    ///
    /// Fails only if the pump has stopped, in which case the pump's own error
    /// (typically `BrokenPipe`) is returned.
    pub(crate) fn send(&mut self, line: String) -> io::Result<()> {
        let tx = self.tx.as_ref().ok_or_else(closed)?;
        if tx.send(line).is_ok() {
            return Ok(());
        }
        self.tx = None;
        match self.join() {
            Ok(()) => Err(closed()),
            Err(e) => Err(e),
        }
    }

    /// Close stdin once everything queued so far has been written
    pub(crate) fn close(&mut self) {
        self.tx = None;
    }

    /// Close and wait for the pump; returns its write error, if any
    pub(crate) fn join(&mut self) -> io::Result<()> {
        self.close();
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or_else(|_| {
                Err(io::Error::new(io::ErrorKind::Other, "stdin pump panicked"))
            }),
            None => Ok(()),
        }
    }

    /// Close without waiting; the pump exits once its next write fails
    pub(crate) fn detach(&mut self) {
        self.close();
        self.handle.take();
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "candidate input is closed")
}

fn pump_commands(stdin: ChildStdin, rx: Receiver<String>) -> io::Result<()> {
    let mut out = BufWriter::new(stdin);
    while let Ok(line) = rx.recv() {
        out.write_all(line.as_bytes())?;
        while let Ok(more) = rx.try_recv() {
            out.write_all(more.as_bytes())?;
        }
        out.flush()?;
    }
    // dropping `out` afterwards closes the pipe: end-of-input for the candidate
    out.flush()
}

/// Line stream from the candidate's stdout
pub(crate) struct LineReader {
    rx: Receiver<io::Result<String>>,
    handle: Option<JoinHandle<()>>,
}

impl LineReader {
    pub(crate) fn spawn(stdout: ChildStdout) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("kvdiff-stdout".to_string())
            .spawn(move || pump_lines(stdout, tx))?;
        Ok(LineReader {
            rx,
            handle: Some(handle),
        })
    }

    /// Next line (terminator included), bounded by `timeout`
    ///
    /// `Disconnected` means the candidate closed its stdout.
    pub(crate) fn next_line(
        &self,
        timeout: Duration,
    ) -> Result<io::Result<String>, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Wait for the pump after EOF has been observed
    pub(crate) fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Stop tracking the pump; it exits when the pipe closes
    pub(crate) fn detach(&mut self) {
        self.handle.take();
    }
}

fn pump_lines(stdout: ChildStdout, tx: Sender<io::Result<String>>) {
    let mut reader = BufReader::new(stdout);
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                if tx.send(Ok(line)).is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = tx.send(Err(e));
                break;
            }
        }
    }
}
