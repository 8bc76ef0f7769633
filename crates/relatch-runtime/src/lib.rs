#![forbid(unsafe_code)]

//! Single-threaded scheduler and diagnostic trace for relatch.
//!
//! This crate is the stand-in for the host UI framework: it owns the
//! render → commit → effect cycle and serializes everything on one
//! thread. A [`Runtime`] drives a [`Component`]:
//!
//! - **render**: the component reads committed state and produces a
//!   candidate view plus fresh closures. No external side effects.
//! - **commit**: the runtime stores the view and flushes queued state
//!   transitions.
//! - **effects**: closures registered during render via
//!   [`RenderCx::after_commit`] run. This is the only point where a fresh
//!   closure may cross into a stable callback slot.
//!
//! The cycle runs to completion before the next event is processed, so a
//! callback published in the effect phase is always in place before any
//! later interaction can invoke it.
//!
//! [`trace`] provides the render/click diagnostic log the demo uses to
//! observe whether memoization actually held.

pub mod scheduler;
pub mod trace;

pub use scheduler::{Component, RenderCx, Runtime, StateSet};
pub use trace::{TraceEvent, TraceLog};
