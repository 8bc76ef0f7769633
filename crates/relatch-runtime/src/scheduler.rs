#![forbid(unsafe_code)]

//! Render → commit → effect cycle, serialized on one thread.
//!
//! # Design
//!
//! [`Runtime`] owns a [`Component`] and the [`StateSet`] of cells the
//! component registered before mount. One cycle is:
//!
//! 1. **render** — `component.render(cx)` produces a candidate view and
//!    may register post-commit effects on the [`RenderCx`]. Render is a
//!    pure pass over committed state.
//! 2. **commit** — the view becomes the runtime's current view.
//! 3. **effects** — registered closures run in registration order.
//!
//! [`Runtime::mount`] performs one full cycle before returning, so any
//! callback published from the first effect phase is in place before the
//! first possible interaction. [`Runtime::pump`] flushes queued state
//! transitions and runs a cycle only when a committed value actually
//! changed; [`Runtime::rerender`] runs a cycle unconditionally, modeling
//! a parent-driven re-render with unchanged state.
//!
//! # Invariants
//!
//! 1. Exactly one cycle runs at a time; cycles never interleave.
//! 2. Effects of cycle N run before any event that follows cycle N.
//! 3. State transitions queued by event handlers are applied before the
//!    render pass that observes them.
//! 4. A pump with no pending transitions, or whose transitions leave
//!    every committed value unchanged, does not render.
//! 5. `frame()` counts completed cycles.

use std::rc::Rc;

use relatch_core::{Commit, StateCell};

/// Per-render context handed to [`Component::render`].
///
/// Its only capability is registering effects for the post-commit phase.
pub struct RenderCx<'a> {
    effects: &'a mut Vec<Box<dyn FnOnce()>>,
    frame: u64,
}

impl RenderCx<'_> {
    /// Register a closure to run after this render pass commits.
    ///
    /// This is the only sanctioned place for a render pass's fresh
    /// closures to cross into mutable cells.
    pub fn after_commit(&mut self, f: impl FnOnce() + 'static) {
        self.effects.push(Box::new(f));
    }

    /// Index of the cycle this render pass belongs to (0 at mount).
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// A unit of UI driven by a [`Runtime`].
pub trait Component {
    /// The committed output of a render pass.
    type View;

    /// Produce a candidate view from committed state.
    ///
    /// Must not perform external side effects; use
    /// [`RenderCx::after_commit`] for anything that mutates shared cells.
    fn render(&mut self, cx: &mut RenderCx<'_>) -> Self::View;
}

/// The set of state cells a runtime flushes at commit time.
///
/// This is the state-registration primitive: [`StateSet::state`] creates
/// a cell, tracks it for commit, and hands it back as the (value, setter)
/// pair.
#[derive(Default)]
pub struct StateSet {
    cells: Vec<Rc<dyn Commit>>,
}

impl StateSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new state cell initialized to `initial`.
    pub fn state<T: Clone + PartialEq + 'static>(&mut self, initial: T) -> StateCell<T> {
        let cell = StateCell::new(initial);
        self.cells.push(Rc::new(cell.clone()));
        cell
    }

    /// Whether any tracked cell has queued transitions.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.cells.iter().any(|c| c.is_pending())
    }

    /// Flush every tracked cell; true if any committed value changed.
    fn flush(&self) -> bool {
        let mut changed = false;
        for cell in &self.cells {
            changed |= cell.commit();
        }
        changed
    }
}

/// Drives a [`Component`] through serialized render cycles.
pub struct Runtime<C: Component> {
    component: C,
    states: StateSet,
    view: C::View,
    frame: u64,
}

impl<C: Component> Runtime<C> {
    /// Mount the component: run the initial render → commit → effect
    /// cycle so the first view and all first-publish effects are in place
    /// before any interaction.
    pub fn mount(mut component: C, states: StateSet) -> Self {
        let (view, effects) = Self::render_pass(&mut component, 0);
        let mut runtime = Self {
            component,
            states,
            view,
            frame: 0,
        };
        Self::run_effects(effects);
        runtime.frame = 1;
        tracing::debug!("mounted");
        runtime
    }

    /// Apply queued state transitions; if any committed value changed,
    /// run one render cycle. Returns whether a cycle ran.
    pub fn pump(&mut self) -> bool {
        if !self.states.flush() {
            return false;
        }
        self.render_cycle();
        true
    }

    /// Run one render cycle regardless of state, modeling a parent
    /// re-render with unchanged inputs.
    pub fn rerender(&mut self) {
        self.render_cycle();
    }

    /// The committed view from the most recent cycle.
    #[must_use]
    pub fn view(&self) -> &C::View {
        &self.view
    }

    /// The component being driven.
    #[must_use]
    pub fn component(&self) -> &C {
        &self.component
    }

    /// Number of completed render cycles (1 after mount).
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    fn render_cycle(&mut self) {
        let (view, effects) = Self::render_pass(&mut self.component, self.frame);
        // Commit: the candidate view becomes the visible one.
        self.view = view;
        Self::run_effects(effects);
        self.frame += 1;
        tracing::debug!(frame = self.frame, "render cycle complete");
    }

    fn render_pass(component: &mut C, frame: u64) -> (C::View, Vec<Box<dyn FnOnce()>>) {
        let mut effects = Vec::new();
        let mut cx = RenderCx {
            effects: &mut effects,
            frame,
        };
        let view = component.render(&mut cx);
        (view, effects)
    }

    fn run_effects(effects: Vec<Box<dyn FnOnce()>>) {
        for effect in effects {
            effect();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use relatch_core::StableCallback;

    /// Counts renders and publishes a fresh closure each pass.
    struct Probe {
        count: StateCell<u64>,
        on_probe: StableCallback,
        seen: Rc<Cell<u64>>,
        renders: Rc<Cell<u64>>,
        last_frame: Rc<Cell<u64>>,
    }

    impl Component for Probe {
        type View = u64;

        fn render(&mut self, cx: &mut RenderCx<'_>) -> u64 {
            self.renders.set(self.renders.get() + 1);
            self.last_frame.set(cx.frame());
            let count = self.count.get();

            let seen = Rc::clone(&self.seen);
            let fresh = move || seen.set(count);
            let trampoline = self.on_probe.clone();
            cx.after_commit(move || trampoline.publish(fresh));

            count
        }
    }

    fn probe() -> (Runtime<Probe>, StateCell<u64>, Rc<Cell<u64>>, Rc<Cell<u64>>) {
        let mut states = StateSet::new();
        let count = states.state(0u64);
        let seen = Rc::new(Cell::new(u64::MAX));
        let renders = Rc::new(Cell::new(0));
        let component = Probe {
            count: count.clone(),
            on_probe: StableCallback::new(|| {}),
            seen: Rc::clone(&seen),
            renders: Rc::clone(&renders),
            last_frame: Rc::new(Cell::new(u64::MAX)),
        };
        (Runtime::mount(component, states), count, seen, renders)
    }

    #[test]
    fn mount_runs_one_full_cycle() {
        let (runtime, _, seen, renders) = probe();
        assert_eq!(runtime.frame(), 1);
        assert_eq!(*runtime.view(), 0);
        assert_eq!(renders.get(), 1);

        // The mount effect already published; invoking observes count 0.
        runtime.component().on_probe.invoke();
        assert_eq!(seen.get(), 0);
    }

    #[test]
    fn pump_without_pending_does_nothing() {
        let (mut runtime, _, _, renders) = probe();
        assert!(!runtime.pump());
        assert_eq!(runtime.frame(), 1);
        assert_eq!(renders.get(), 1);
    }

    #[test]
    fn pump_applies_transitions_then_renders() {
        let (mut runtime, count, _, _) = probe();
        count.enqueue(|prev| prev + 1);
        count.enqueue(|prev| prev + 1);

        assert!(runtime.pump());
        assert_eq!(*runtime.view(), 2);
        assert_eq!(runtime.frame(), 2);
    }

    #[test]
    fn pump_with_net_equal_transitions_skips_render() {
        let (mut runtime, count, _, renders) = probe();
        count.enqueue(|prev| prev + 1);
        count.enqueue(|prev| prev - 1);

        assert!(!runtime.pump());
        assert_eq!(renders.get(), 1);
    }

    #[test]
    fn effects_publish_fresh_closures() {
        let (mut runtime, count, seen, _) = probe();

        count.enqueue(|prev| prev + 5);
        assert!(runtime.pump());

        // The cycle's effect phase republished before pump returned.
        runtime.component().on_probe.invoke();
        assert_eq!(seen.get(), 5);
    }

    #[test]
    fn rerender_runs_without_state_change() {
        let (mut runtime, _, _, renders) = probe();
        runtime.rerender();
        runtime.rerender();
        assert_eq!(renders.get(), 3);
        assert_eq!(runtime.frame(), 3);
    }

    #[test]
    fn render_cx_reports_cycle_index() {
        let (mut runtime, count, _, _) = probe();
        // Mount render is cycle 0.
        assert_eq!(runtime.component().last_frame.get(), 0);

        count.enqueue(|prev| prev + 1);
        runtime.pump();
        assert_eq!(runtime.component().last_frame.get(), 1);

        runtime.rerender();
        assert_eq!(runtime.component().last_frame.get(), 2);
    }

    #[test]
    fn trampoline_identity_stable_across_cycles() {
        let (mut runtime, count, _, _) = probe();
        let before = runtime.component().on_probe.clone();

        for i in 0..10 {
            if i % 2 == 0 {
                count.enqueue(|prev| prev + 1);
                runtime.pump();
            } else {
                runtime.rerender();
            }
        }
        assert!(StableCallback::ptr_eq(&before, &runtime.component().on_probe));
    }
}
