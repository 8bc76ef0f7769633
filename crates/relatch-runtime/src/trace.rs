#![forbid(unsafe_code)]

//! Diagnostic render/click trace.
//!
//! The whole point of the stable-callback pattern is observable: a
//! memoized child must render once at mount and then never again while
//! its props hold still. [`TraceLog`] records exactly when components
//! actually rendered and what each click observed, so tests (and the
//! demo binary) can assert on it.
//!
//! Records are kept in memory; [`TraceLog::export_jsonl`] writes them out
//! as JSONL — a header line, one line per event, and a summary line —
//! with hand-rolled JSON escaping.
//!
//! # Invariants
//!
//! 1. Events appear in the order they were recorded.
//! 2. Clones share one log; a record through any clone is visible to all.
//! 3. The JSONL export is deterministic for a given event sequence.

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::rc::Rc;

/// One diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// The root component ran an actual render pass.
    AppRendered { count: u64 },
    /// A memoized block ran an actual render (not a skip).
    BlockRendered { label: String, color: String },
    /// A click handler fired and observed `count`.
    Clicked { count: u64 },
}

impl TraceEvent {
    fn to_jsonl(&self, idx: usize) -> String {
        match self {
            Self::AppRendered { count } => {
                format!(r#"{{"event":"app_rendered","idx":{idx},"count":{count}}}"#)
            }
            Self::BlockRendered { label, color } => format!(
                r#"{{"event":"block_rendered","idx":{},"label":"{}","color":"{}"}}"#,
                idx,
                json_escape(label),
                json_escape(color)
            ),
            Self::Clicked { count } => {
                format!(r#"{{"event":"clicked","idx":{idx},"count":{count}}}"#)
            }
        }
    }
}

/// Shared, in-order event log. Clones share the same storage.
#[derive(Clone, Default)]
pub struct TraceLog {
    events: Rc<RefCell<Vec<TraceEvent>>>,
}

impl std::fmt::Debug for TraceLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceLog")
            .field("events", &self.events.borrow().len())
            .finish()
    }
}

impl TraceLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn record(&self, event: TraceEvent) {
        tracing::debug!(?event, "trace");
        self.events.borrow_mut().push(event);
    }

    /// Snapshot of all events in record order.
    #[must_use]
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// How many actual renders a given block label has recorded.
    #[must_use]
    pub fn block_renders(&self, label: &str) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, TraceEvent::BlockRendered { label: l, .. } if l == label))
            .count()
    }

    /// The counts observed by clicks, in click order.
    #[must_use]
    pub fn clicked_counts(&self) -> Vec<u64> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                TraceEvent::Clicked { count } => Some(*count),
                _ => None,
            })
            .collect()
    }

    /// Drop all recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Write the log as JSONL: header, events, summary.
    pub fn export_jsonl(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        let mut writer = BufWriter::new(file);
        self.write_jsonl(&mut writer)?;
        writer.flush()
    }

    /// Write the log as JSONL to any writer.
    pub fn write_jsonl(&self, out: &mut impl Write) -> io::Result<()> {
        let events = self.events.borrow();
        writeln!(
            out,
            r#"{{"event":"trace_header","schema_version":"relatch-trace-v1","total_events":{}}}"#,
            events.len()
        )?;
        for (idx, event) in events.iter().enumerate() {
            writeln!(out, "{}", event.to_jsonl(idx))?;
        }
        let clicks = events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Clicked { .. }))
            .count();
        let renders = events.len() - clicks;
        writeln!(
            out,
            r#"{{"event":"trace_summary","renders":{renders},"clicks":{clicks}}}"#
        )
    }
}

fn json_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 8);
    for ch in input.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write as _;
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
