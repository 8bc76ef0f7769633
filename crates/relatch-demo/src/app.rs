#![forbid(unsafe_code)]

//! Root component: wires the trampoline, the counter, and the two blocks.
//!
//! # Render cycle
//!
//! Each render pass reads the committed count, builds a *fresh* click
//! closure over it, and registers an effect that publishes that closure
//! into the long-lived trampoline after commit. The trampoline handle
//! passed to the log block therefore never changes identity, while every
//! click through it observes the count committed by the latest cycle.
//!
//! The add block gets the counter's update trigger, which is built once
//! and schedules a `prev + 1` transition — it needs no republishing at
//! all.
//!
//! Both blocks keep static texts, so after the mount render their props
//! are shallow-equal forever and the memo gate skips every subsequent
//! pass.

use relatch_core::StableCallback;
use relatch_runtime::{Component, RenderCx, StateSet, TraceEvent, TraceLog};

use crate::block::{Block, BlockProps, BlockView, Color};
use crate::counter::Counter;

pub const LOG_BLOCK: &str = "log";
pub const ADD_BLOCK: &str = "add";

const LOG_TEXT: &str = "Click me to log the current count";
const ADD_TEXT: &str = "Click me to add to the count";

/// Committed output of one app render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppView {
    pub count: u64,
    pub log: BlockView,
    pub add: BlockView,
}

/// The demo's single component tree.
pub struct CounterApp {
    counter: Counter,
    on_log_click: StableCallback,
    log_block: Block,
    add_block: Block,
    trace: TraceLog,
}

impl CounterApp {
    /// Build the app, registering its state with `states`.
    ///
    /// The trampoline starts with a body equivalent to what the mount
    /// render will publish (a click at count 0), so the slot is never
    /// empty even before the first cycle completes.
    #[must_use]
    pub fn new(states: &mut StateSet, trace: TraceLog) -> Self {
        let counter = Counter::new(states);
        let initial_trace = trace.clone();
        let on_log_click = StableCallback::new(move || {
            initial_trace.record(TraceEvent::Clicked { count: 0 });
        });
        let log_block = Block::new(LOG_BLOCK, trace.clone(), on_log_click.clone());
        let add_block = Block::new(ADD_BLOCK, trace.clone(), counter.on_increment());
        Self {
            counter,
            on_log_click,
            log_block,
            add_block,
            trace,
        }
    }

    /// Click the orange log block.
    pub fn click_log(&self) {
        self.log_block.click();
    }

    /// Click the red add block.
    pub fn click_add(&self) {
        self.add_block.click();
    }

    /// The trampoline handle given to the log block (identity-stable).
    #[must_use]
    pub fn on_log_click(&self) -> StableCallback {
        self.on_log_click.clone()
    }

    /// The update trigger given to the add block (identity-stable).
    #[must_use]
    pub fn on_add_click(&self) -> StableCallback {
        self.counter.on_increment()
    }

    #[must_use]
    pub fn counter(&self) -> &Counter {
        &self.counter
    }

    /// Actual render count of the log block.
    #[must_use]
    pub fn log_renders(&self) -> u64 {
        self.log_block.renders()
    }

    /// Actual render count of the add block.
    #[must_use]
    pub fn add_renders(&self) -> u64 {
        self.add_block.renders()
    }
}

impl Component for CounterApp {
    type View = AppView;

    fn render(&mut self, cx: &mut RenderCx<'_>) -> AppView {
        let count = self.counter.current();
        tracing::debug!(count, frame = cx.frame(), "app render pass");
        self.trace.record(TraceEvent::AppRendered { count });

        // Fresh closure over this pass's committed count; published into
        // the stable trampoline only after commit.
        let trace = self.trace.clone();
        let fresh = move || trace.record(TraceEvent::Clicked { count });
        let trampoline = self.on_log_click.clone();
        cx.after_commit(move || trampoline.publish(fresh));

        let log = self.log_block.render(BlockProps {
            text: LOG_TEXT.to_string(),
            color: Color::Orange,
            on_click: self.on_log_click.clone(),
        });
        let add = self.add_block.render(BlockProps {
            text: ADD_TEXT.to_string(),
            color: Color::Red,
            on_click: self.counter.on_increment(),
        });

        AppView { count, log, add }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
