#![forbid(unsafe_code)]

//! The counter store.
//!
//! One `u64` owned by a [`StateCell`], mutated only through the `prev + 1`
//! transition. The update trigger is built once at construction over the
//! cell's [`StateUpdater`], so it captures no per-render state and its
//! identity never changes.

use relatch_core::{StableCallback, StateCell};
use relatch_runtime::StateSet;

/// A single non-negative count with a stable increment trigger.
pub struct Counter {
    cell: StateCell<u64>,
    on_increment: StableCallback,
}

impl Counter {
    /// Register the count (initialized to 0) with `states` and build the
    /// increment trigger.
    #[must_use]
    pub fn new(states: &mut StateSet) -> Self {
        let cell = states.state(0u64);
        let updater = cell.updater();
        // Built once; the body never needs replacing because the
        // transition reads the previous value at apply time.
        let on_increment = StableCallback::new(move || {
            updater.schedule(|prev| prev + 1);
        });
        Self { cell, on_increment }
    }

    /// The latest committed count.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.cell.get()
    }

    /// Schedule `count -> count + 1` against the value at apply time.
    pub fn increment(&self) {
        self.on_increment.invoke();
    }

    /// The stable update trigger (a clone sharing identity).
    #[must_use]
    pub fn on_increment(&self) -> StableCallback {
        self.on_increment.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
