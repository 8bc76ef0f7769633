#![forbid(unsafe_code)]

//! Commit-time state with functional updates.
//!
//! # Design
//!
//! [`StateCell<T>`] holds one committed value and a FIFO queue of pending
//! transitions. A transition is a pure `FnOnce(&T) -> T` applied against
//! the value as it stands *when the queue is flushed*, never against a
//! snapshot captured when the transition was scheduled. Scheduling three
//! increments inside one event therefore yields `+3`, even though all
//! three closures were built before any of them ran.
//!
//! The queue is flushed by the owning scheduler through the [`Commit`]
//! trait at commit time. Handlers only ever schedule; they never mutate
//! the committed value directly.
//!
//! [`StateUpdater<T>`] is the stable scheduling handle handed to
//! consumers: it captures no per-render state, so its identity (and the
//! identity of anything built over it once) never changes across renders.
//!
//! # Invariants
//!
//! 1. `get()` returns the committed value only; pending transitions are
//!    invisible until the next commit.
//! 2. Transitions apply in FIFO order, each observing the previous one's
//!    result.
//! 3. A commit whose final value equals the previous committed value is a
//!    no-op: no version bump, `commit()` returns false.
//! 4. `version()` increments by exactly 1 per value-changing commit.
//!
//! # Failure Modes
//!
//! - **Transition panics**: the committed value is untouched (the flush
//!   works on a clone and stores it only after the whole queue applies).
//!   Transitions consumed before the panic are lost.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Transition queue entry: pure function of the previous value.
type Transition<T> = Box<dyn FnOnce(&T) -> T>;

struct StateInner<T> {
    committed: T,
    pending: VecDeque<Transition<T>>,
    version: u64,
}

/// A single piece of state mutated only through queued pure transitions.
///
/// Cloning a `StateCell` creates a new handle to the **same** inner state.
pub struct StateCell<T> {
    inner: Rc<RefCell<StateInner<T>>>,
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("StateCell")
            .field("committed", &inner.committed)
            .field("pending", &inner.pending.len())
            .field("version", &inner.version)
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> StateCell<T> {
    /// Create a cell committed to `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StateInner {
                committed: initial,
                pending: VecDeque::new(),
                version: 0,
            })),
        }
    }

    /// The latest committed value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().committed.clone()
    }

    /// Access the committed value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().committed)
    }

    /// Schedule a transition to run against the previous value at commit
    /// time.
    ///
    /// The closure must be pure: its only input is the reference it is
    /// given, which is the result of all transitions queued before it.
    pub fn enqueue(&self, transition: impl FnOnce(&T) -> T + 'static) {
        self.inner.borrow_mut().pending.push_back(Box::new(transition));
    }

    /// Whether any transitions are queued.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().pending.is_empty()
    }

    /// Monotonic version; increments by 1 per value-changing commit.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// A stable scheduling handle capturing no per-render state.
    #[must_use]
    pub fn updater(&self) -> StateUpdater<T> {
        StateUpdater {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Type-erased commit hook, implemented by every [`StateCell<T>`].
///
/// The scheduler tracks registered cells as `Rc<dyn Commit>` and flushes
/// them at commit time without knowing their value types.
pub trait Commit {
    /// Apply all queued transitions in FIFO order.
    ///
    /// Returns true if the committed value changed. An empty queue, or a
    /// queue whose net effect leaves the value equal, returns false and
    /// does not bump the version.
    fn commit(&self) -> bool;

    /// Whether a commit would have work to do.
    fn is_pending(&self) -> bool;
}

impl<T: Clone + PartialEq + 'static> Commit for StateCell<T> {
    fn commit(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.pending.is_empty() {
            return false;
        }

        let mut next = inner.committed.clone();
        while let Some(transition) = inner.pending.pop_front() {
            next = transition(&next);
        }

        if next == inner.committed {
            return false;
        }
        inner.committed = next;
        inner.version += 1;
        tracing::trace!(version = inner.version, "state commit");
        true
    }

    fn is_pending(&self) -> bool {
        self.has_pending()
    }
}

/// Stable handle for scheduling transitions on a [`StateCell<T>`].
///
/// Clones share identity with the handle they were cloned from; see
/// [`StateUpdater::ptr_eq`].
pub struct StateUpdater<T> {
    inner: Rc<RefCell<StateInner<T>>>,
}

impl<T> Clone for StateUpdater<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> StateUpdater<T> {
    /// Schedule a transition on the underlying cell.
    pub fn schedule(&self, transition: impl FnOnce(&T) -> T + 'static) {
        self.inner.borrow_mut().pending.push_back(Box::new(transition));
    }

    /// Whether two updaters target the same cell (reference identity).
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
