#![forbid(unsafe_code)]

//! Identity-stable trampoline over a mutable callback slot.
//!
//! # Design
//!
//! [`StableCallback`] separates a handler's *identity* from its *body*. The
//! handle (and every clone of it) wraps one shared slot; `invoke()` calls
//! whatever the slot currently holds. A render pass builds a fresh closure
//! over current state, and the post-commit effect phase swaps it in via
//! [`publish()`](StableCallback::publish). Memoized consumers keyed on
//! handler identity never see a change, yet every invocation observes the
//! freshest behavior.
//!
//! # Invariants
//!
//! 1. The slot is never empty. `new()` requires an initial function, so
//!    there is no `Option` in the slot and no unpublished-invoke failure
//!    mode to handle at runtime.
//! 2. Identity ([`ptr_eq`](StableCallback::ptr_eq)) is fixed at
//!    construction and survives any number of `publish()` calls.
//! 3. A publish through any clone is observed by all clones on the next
//!    `invoke()`.
//!
//! # Failure Modes
//!
//! - **Publish during invoke**: the published body is swapped in only
//!   after the running invocation returns (the slot borrow is released
//!   before the body runs), so re-entrant publish does not panic.

use std::cell::RefCell;
use std::rc::Rc;

type Slot = Rc<RefCell<Rc<dyn Fn()>>>;

/// An identity-stable, no-argument callback whose body can be replaced.
///
/// Cloning produces a new handle to the **same** slot. Identity is the
/// slot's `Rc` pointer, checked with [`StableCallback::ptr_eq`].
pub struct StableCallback {
    slot: Slot,
}

impl Clone for StableCallback {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl std::fmt::Debug for StableCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StableCallback")
            .field("slot", &Rc::as_ptr(&self.slot))
            .finish()
    }
}

impl StableCallback {
    /// Create a trampoline holding `initial` as its first body.
    ///
    /// The initial function is mandatory: a cell that could be invoked
    /// before its first publish is prevented by construction, not checked
    /// at runtime.
    #[must_use]
    pub fn new(initial: impl Fn() + 'static) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Rc::new(initial))),
        }
    }

    /// Replace the held body with `f`.
    ///
    /// Called once per completed render pass, from the effect phase, with
    /// the freshest closure over current state. Side effect only.
    pub fn publish(&self, f: impl Fn() + 'static) {
        tracing::trace!(slot = ?Rc::as_ptr(&self.slot), "publish callback body");
        *self.slot.borrow_mut() = Rc::new(f);
    }

    /// Invoke the currently held body.
    ///
    /// The slot borrow is dropped before the body runs, so the body may
    /// itself `publish()` or `invoke()` without a re-entrant borrow panic.
    pub fn invoke(&self) {
        let body = Rc::clone(&self.slot.borrow());
        body();
    }

    /// Whether two handles share one slot (reference identity).
    ///
    /// This is the equality memoized consumers gate on.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.slot, &b.slot)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
