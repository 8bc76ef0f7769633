#![forbid(unsafe_code)]

//! Memoized display block.
//!
//! A [`Block`] is the leaf the whole pattern protects: a label, a color,
//! and a supplied click handler. Rendering goes through [`Memo`], gated
//! on [`BlockProps`]'s shallow equality — value equality for text and
//! color, identity for the handler. An actual render (not a skip)
//! records a [`TraceEvent::BlockRendered`], which is how tests observe
//! whether memoization held.
//!
//! Output is a pure [`BlockView`]; drawing it anywhere is someone else's
//! job.

use relatch_core::{Memo, ShallowEq, StableCallback};
use relatch_runtime::{TraceEvent, TraceLog};

/// Block background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Orange,
    Red,
}

impl Color {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs to a block render.
#[derive(Debug, Clone)]
pub struct BlockProps {
    pub text: String,
    pub color: Color,
    pub on_click: StableCallback,
}

impl ShallowEq for BlockProps {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.color == other.color
            && StableCallback::ptr_eq(&self.on_click, &other.on_click)
    }
}

/// Pure render output: what the block would display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockView {
    pub text: String,
    pub color: Color,
}

/// A memoized leaf with a click region.
pub struct Block {
    memo: Memo<BlockProps, BlockView>,
    handler: StableCallback,
}

impl Block {
    /// Create a block named `name` (the label used in the trace), wired
    /// to `on_click`.
    ///
    /// The handler is mandatory at construction, the same way a
    /// [`StableCallback`] requires its initial body: there is no
    /// handlerless state for a click to hit.
    #[must_use]
    pub fn new(name: &'static str, trace: TraceLog, on_click: StableCallback) -> Self {
        let memo = Memo::new(move |props: &BlockProps| {
            trace.record(TraceEvent::BlockRendered {
                label: name.to_string(),
                color: props.color.as_str().to_string(),
            });
            BlockView {
                text: props.text.clone(),
                color: props.color,
            }
        });
        Self {
            memo,
            handler: on_click,
        }
    }

    /// Render for `props`, skipping if they are shallow-equal to the
    /// previous render's props. Adopts the props' handler for subsequent
    /// clicks.
    pub fn render(&mut self, props: BlockProps) -> BlockView {
        self.handler = props.on_click.clone();
        self.memo.render(props)
    }

    /// Dispatch a click to the handler supplied by the latest render
    /// (or, before the first render, the one supplied at construction).
    pub fn click(&self) {
        self.handler.invoke();
    }

    /// Number of actual renders (skips excluded).
    #[must_use]
    pub fn renders(&self) -> u64 {
        self.memo.renders()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
