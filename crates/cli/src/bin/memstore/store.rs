//! Fixture store state machine

use rustc_hash::FxHashMap;

use kvdiff_core::{Key, Value};
use kvdiff_wire::{encode_dump, encode_lookup_response, Request};

use crate::fault::{FaultConfig, FaultKind};

/// Exit status used by the `crash` fault
pub const CRASH_EXIT_CODE: i32 = 101;

/// What the command loop should do after one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Nothing to write
    Continue,
    /// Write this response line
    Reply(String),
    /// Exit immediately with this status
    Exit(i32),
    /// Abort the process
    Abort,
    /// Stop answering forever
    Hang,
}

/// In-memory store speaking the line protocol
pub struct MemStore {
    entries: FxHashMap<Key, Value>,
    fault: FaultConfig,
    processed: u64,
}

impl MemStore {
    pub fn new(fault: FaultConfig) -> Self {
        MemStore {
            entries: FxHashMap::default(),
            fault,
            processed: 0,
        }
    }

    fn armed(&self, kind: FaultKind) -> bool {
        self.fault.armed(kind, self.processed)
    }

    /// Apply one request
    pub fn handle(&mut self, request: Request) -> Step {
        if self.armed(FaultKind::Crash) {
            return Step::Exit(CRASH_EXIT_CODE);
        }
        if self.armed(FaultKind::Abort) {
            return Step::Abort;
        }

        let step = match request {
            Request::Insert { key, value } => {
                self.entries.insert(key, value);
                Step::Continue
            }
            Request::Lookup { key } => {
                if self.armed(FaultKind::HangLookup) {
                    Step::Hang
                } else if self.armed(FaultKind::GarbageLookup) {
                    Step::Reply("???\n".to_string())
                } else {
                    Step::Reply(encode_lookup_response(self.entries.get(&key).copied()))
                }
            }
            Request::Increment { key } => {
                match self.entries.get_mut(&key) {
                    Some(value) => *value = value.wrapping_add(1),
                    None => {
                        let initial = if self.armed(FaultKind::IncrementFromZero) { 0 } else { 1 };
                        self.entries.insert(key, initial);
                    }
                }
                Step::Continue
            }
            Request::Delete { key } => {
                if !self.armed(FaultKind::IgnoreDelete) {
                    self.entries.remove(&key);
                }
                Step::Continue
            }
            Request::Clear => {
                self.entries.clear();
                Step::Continue
            }
            Request::Compact => {
                if self.armed(FaultKind::CompactDropsKey) {
                    if let Some(smallest) = self.entries.keys().min().copied() {
                        self.entries.remove(&smallest);
                    }
                }
                self.entries.shrink_to_fit();
                Step::Continue
            }
        };

        self.processed += 1;
        step
    }

    /// Final dump, in key order
    pub fn dump(&self) -> String {
        let mut entries: Vec<(Key, Value)> = self.entries.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_unstable();
        if self.armed(FaultKind::DuplicateDump) {
            if let Some(&first) = entries.first() {
                entries.push(first);
            }
        }
        encode_dump(entries)
    }
}
