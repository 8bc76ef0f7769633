#![forbid(unsafe_code)]

//! The two-block counter demo.
//!
//! One root component, two memoized blocks:
//!
//! - The **log block** (orange) is wired to a stable trampoline. Clicking
//!   it records the count that was committed at click time — not the
//!   count that existed when the handler body was built — because the
//!   effect phase of every render republishes a fresh body into the
//!   trampoline.
//! - The **add block** (red) is wired to the counter's stable update
//!   trigger, which schedules a `prev + 1` transition.
//!
//! Neither block ever re-renders after mount: their texts are static and
//! both handlers are identity-stable, so the memo gate holds no matter
//! how often the parent re-renders.

pub mod app;
pub mod block;
pub mod counter;

pub use app::{AppView, CounterApp};
pub use block::{Block, BlockProps, BlockView, Color};
pub use counter::Counter;
