#![forbid(unsafe_code)]

//! Core reactive primitives for relatch.
//!
//! Three small pieces that together make the "stable handler, fresh state"
//! pattern possible:
//!
//! - [`StableCallback`]: an identity-stable trampoline over a mutable
//!   callback slot. Consumers that compare handlers by identity (memoized
//!   children) see the same handle forever, while the body it delegates to
//!   is swapped after every completed render.
//! - [`StateCell`]: a committed value plus a FIFO queue of pure transition
//!   functions. Transitions read the previous value at apply time, never a
//!   snapshot captured when the transition was built.
//! - [`Memo`]: a render-skip gate keyed on [`ShallowEq`] props equality.
//!
//! # Architecture
//!
//! Everything here is `Rc<RefCell<..>>`-shared, single-threaded state. The
//! owning scheduler serializes all access (one render pass at a time,
//! commit before effects, effects before the next event), so no locking is
//! needed and none is provided.
//!
//! # Invariants
//!
//! 1. A [`StableCallback`] slot is never empty: construction requires an
//!    initial function, so `invoke()` has no null-dispatch path.
//! 2. Clones of a `StableCallback` share one slot and compare identical
//!    under [`StableCallback::ptr_eq`].
//! 3. [`StateCell`] version increments exactly once per commit that changes
//!    the value; committing to an equal value is a no-op.
//! 4. Queued transitions are applied in FIFO order, each seeing the result
//!    of the previous one.
//! 5. [`Memo::render`] invokes its render function only when the new props
//!    fail `shallow_eq` against the previous props (or on first render).

pub mod callback;
pub mod memo;
pub mod state;

pub use callback::StableCallback;
pub use memo::{Memo, ShallowEq};
pub use state::{Commit, StateCell, StateUpdater};
