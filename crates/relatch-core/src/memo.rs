#![forbid(unsafe_code)]

//! Render-skip gate keyed on shallow props equality.
//!
//! # Design
//!
//! [`Memo<P, V>`] wraps a render function and caches the last `(props,
//! view)` pair. A call to [`render()`](Memo::render) re-invokes the render
//! function only when the incoming props fail [`ShallowEq`] against the
//! cached props; otherwise the cached view is returned untouched. The
//! whole stable-callback pattern exists to make this gate hold across
//! parent re-renders, so the gate itself is an explicit equality check,
//! not something inferred.
//!
//! [`ShallowEq`] is shallow on purpose: value equality for plain data,
//! reference identity for callbacks. A props struct implements it by
//! comparing each field with the strongest cheap equality available.
//!
//! # Invariants
//!
//! 1. The render function runs on first `render()` and whenever
//!    `shallow_eq` fails; never otherwise.
//! 2. `renders()` counts actual render-function invocations, not calls to
//!    `render()`.
//! 3. A skipped render returns a view clone identical to the cached one.

/// Shallow structural equality for memoization gating.
///
/// Implementations compare plain fields by value and callback fields by
/// identity. Deep equality is deliberately not required.
pub trait ShallowEq {
    fn shallow_eq(&self, other: &Self) -> bool;
}

/// Caches the last props and view of a render function, skipping
/// re-renders for shallow-equal props.
pub struct Memo<P, V> {
    render: Box<dyn Fn(&P) -> V>,
    last: Option<(P, V)>,
    renders: u64,
}

impl<P: std::fmt::Debug, V> std::fmt::Debug for Memo<P, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memo")
            .field("last_props", &self.last.as_ref().map(|(p, _)| p))
            .field("renders", &self.renders)
            .finish()
    }
}

impl<P: ShallowEq, V: Clone> Memo<P, V> {
    /// Wrap a render function. Nothing is rendered until the first
    /// [`render()`](Memo::render) call.
    #[must_use]
    pub fn new(render: impl Fn(&P) -> V + 'static) -> Self {
        Self {
            render: Box::new(render),
            last: None,
            renders: 0,
        }
    }

    /// Produce the view for `props`, re-rendering only if the props
    /// changed under [`ShallowEq`].
    pub fn render(&mut self, props: P) -> V {
        if let Some((last_props, last_view)) = &self.last {
            if props.shallow_eq(last_props) {
                tracing::trace!(renders = self.renders, "memo skip");
                return last_view.clone();
            }
        }
        let view = (self.render)(&props);
        self.renders += 1;
        self.last = Some((props, view.clone()));
        view
    }

    /// Number of actual render-function invocations so far.
    #[must_use]
    pub fn renders(&self) -> u64 {
        self.renders
    }

    /// The cached view from the last actual render, if any.
    #[must_use]
    pub fn cached(&self) -> Option<&V> {
        self.last.as_ref().map(|(_, v)| v)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
