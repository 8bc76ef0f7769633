//! Scripted scenarios through the counter app.
//!
//! Each test mounts a fresh app, drives it through clicks and forced
//! re-renders, and asserts on the committed view and the diagnostic
//! trace. The interesting claims are the negative ones: the memoized
//! blocks must *not* re-render, and the stable handles must *not* change
//! identity, no matter what the parent does.

use relatch_core::StableCallback;
use relatch_demo::app::{ADD_BLOCK, LOG_BLOCK};
use relatch_demo::{Color, CounterApp};
use relatch_runtime::{Runtime, StateSet, TraceEvent, TraceLog};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn mount() -> (Runtime<CounterApp>, TraceLog) {
    let trace = TraceLog::new();
    let mut states = StateSet::new();
    let app = CounterApp::new(&mut states, trace.clone());
    (Runtime::mount(app, states), trace)
}

fn click_add(runtime: &mut Runtime<CounterApp>) {
    runtime.component().click_add();
    runtime.pump();
}

fn click_log(runtime: &mut Runtime<CounterApp>) {
    runtime.component().click_log();
    runtime.pump();
}

// ---------------------------------------------------------------------------
// The headline scenario
// ---------------------------------------------------------------------------

/// Mount at 0, click add three times, then click log once: the view
/// shows 3 and the logged click observed 3.
#[test]
fn three_adds_then_log_observes_three() {
    let (mut runtime, trace) = mount();
    assert_eq!(runtime.view().count, 0);

    click_add(&mut runtime);
    click_add(&mut runtime);
    click_add(&mut runtime);
    assert_eq!(runtime.view().count, 3);

    click_log(&mut runtime);
    assert_eq!(trace.clicked_counts(), vec![3]);
}

#[test]
fn log_click_never_sees_construction_time_count() {
    let (mut runtime, trace) = mount();

    // The body the log handler had at mount closed over count 0. After
    // five increments, a click must observe 5, not 0.
    for _ in 0..5 {
        click_add(&mut runtime);
    }
    click_log(&mut runtime);
    assert_eq!(trace.clicked_counts(), vec![5]);

    // And again after more increments: always the at-click value.
    click_add(&mut runtime);
    click_log(&mut runtime);
    assert_eq!(trace.clicked_counts(), vec![5, 6]);
}

#[test]
fn log_clicks_do_not_change_the_count() {
    let (mut runtime, _) = mount();

    click_log(&mut runtime);
    click_log(&mut runtime);
    assert_eq!(runtime.view().count, 0);

    // A log click queues no transitions, so pump reports no cycle.
    runtime.component().click_log();
    assert!(!runtime.pump());
}

// ---------------------------------------------------------------------------
// Identity stability
// ---------------------------------------------------------------------------

#[test]
fn trampoline_identity_stable_across_re_renders() {
    let (mut runtime, _) = mount();
    let before = runtime.component().on_log_click();

    for _ in 0..20 {
        runtime.rerender();
    }
    click_add(&mut runtime);

    let after = runtime.component().on_log_click();
    assert!(StableCallback::ptr_eq(&before, &after));
}

#[test]
fn update_trigger_identity_stable_across_re_renders() {
    let (mut runtime, _) = mount();
    let before = runtime.component().on_add_click();

    for _ in 0..20 {
        runtime.rerender();
    }
    click_add(&mut runtime);

    let after = runtime.component().on_add_click();
    assert!(StableCallback::ptr_eq(&before, &after));
}

// ---------------------------------------------------------------------------
// Memoization held
// ---------------------------------------------------------------------------

#[test]
fn unchanged_props_render_blocks_exactly_once() {
    let (mut runtime, trace) = mount();

    // Two parent re-renders with nothing changed.
    runtime.rerender();
    runtime.rerender();

    assert_eq!(trace.block_renders(LOG_BLOCK), 1);
    assert_eq!(trace.block_renders(ADD_BLOCK), 1);
    assert_eq!(runtime.component().log_renders(), 1);
    assert_eq!(runtime.component().add_renders(), 1);
}

#[test]
fn count_changes_do_not_re_render_blocks() {
    let (mut runtime, trace) = mount();

    for _ in 0..10 {
        click_add(&mut runtime);
    }

    // The app re-rendered per increment; the blocks did not.
    assert_eq!(runtime.view().count, 10);
    assert!(trace.events().iter().filter(|e| matches!(e, TraceEvent::AppRendered { .. })).count() >= 11);
    assert_eq!(trace.block_renders(LOG_BLOCK), 1);
    assert_eq!(trace.block_renders(ADD_BLOCK), 1);
}

// ---------------------------------------------------------------------------
// View content
// ---------------------------------------------------------------------------

#[test]
fn view_is_stable_data() {
    let (mut runtime, _) = mount();
    let mounted = runtime.view().clone();

    runtime.rerender();
    assert_eq!(*runtime.view(), mounted);

    click_add(&mut runtime);
    let after = runtime.view();
    assert_eq!(after.count, 1);
    // Block views are unchanged; only the count differs.
    assert_eq!(after.log, mounted.log);
    assert_eq!(after.add, mounted.add);
    assert_eq!(after.log.color, Color::Orange);
    assert_eq!(after.add.color, Color::Red);
}

#[test]
fn trace_orders_renders_before_clicks() {
    let (mut runtime, trace) = mount();
    click_add(&mut runtime);
    click_log(&mut runtime);

    let events = trace.events();
    // Mount: app render + two block renders. Then one app render per
    // increment, then the click record.
    assert_eq!(events[0], TraceEvent::AppRendered { count: 0 });
    assert_eq!(
        events.last(),
        Some(&TraceEvent::Clicked { count: 1 })
    );
}
