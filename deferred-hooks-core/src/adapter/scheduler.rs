//! The Reactive Scheduler Capability
//!
//! The adapter never decides *when* anything runs. It hands a closure and a
//! comparison list to a [`ReactiveScheduler`], the host runtime's hook
//! primitives passed in explicitly instead of reached through globals.
//!
//! A scheduler promises, per call site:
//!
//! - the closure runs only when the comparison list differs from the one
//!   given at the same call site in the previous render;
//! - it runs at most once per render;
//! - for effects, a cleanup returned by the previous run is called before
//!   the next run and on unmount.

use std::fmt::{self, Debug};
use std::sync::Arc;

use super::deps::Deps;
use super::handle::RefTarget;

/// When an effect runs relative to paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectTiming {
    /// After the render commits and the frame is painted.
    Passive,
    /// Synchronously after commit, before paint.
    Layout,
}

/// A function an effect leaves behind to undo itself.
pub struct Cleanup(Box<dyn FnOnce() + Send>);

impl Cleanup {
    /// Wrap a teardown function.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self(Box::new(f))
    }

    /// Run the teardown.
    pub fn run(self) {
        (self.0)();
    }
}

impl Debug for Cleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cleanup")
    }
}

/// What an effect's function may return.
pub trait IntoCleanup {
    /// Convert into an optional cleanup.
    fn into_cleanup(self) -> Option<Cleanup>;
}

impl IntoCleanup for () {
    fn into_cleanup(self) -> Option<Cleanup> {
        None
    }
}

impl IntoCleanup for Cleanup {
    fn into_cleanup(self) -> Option<Cleanup> {
        Some(self)
    }
}

impl IntoCleanup for Option<Cleanup> {
    fn into_cleanup(self) -> Option<Cleanup> {
        self
    }
}

/// The zero-argument closure an effect registration hands to the host.
pub type EffectFn = Box<dyn FnOnce() -> Option<Cleanup> + Send>;

/// A shared zero-argument function, as returned by memoized-callback hooks.
///
/// Clones share the same allocation, so "the host reused the callback" is
/// observable with [`Callback::ptr_eq`].
pub struct Callback<R> {
    inner: Arc<dyn Fn() -> R + Send + Sync>,
}

impl<R> Callback<R> {
    /// Wrap a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Call the function.
    pub fn call(&self) -> R {
        (self.inner)()
    }

    /// Whether both callbacks are the same function value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<R> Clone for Callback<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> Debug for Callback<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("ptr", &Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

/// The host runtime's hook primitives.
///
/// Every method consumes exactly one hook call site, in call order, whether
/// or not its closure ends up running.
pub trait ReactiveScheduler {
    /// Host misuse errors (hook order violations and the like).
    type Error;

    /// Register an effect that runs when `deps` changed.
    fn schedule_effect<D>(
        &self,
        timing: EffectTiming,
        effect: EffectFn,
        deps: D,
    ) -> Result<(), Self::Error>
    where
        D: Deps;

    /// Return `callback`, or the callback from the previous render when
    /// `deps` did not change.
    fn memoize_callback<R, D>(
        &self,
        callback: Callback<R>,
        deps: D,
    ) -> Result<Callback<R>, Self::Error>
    where
        R: 'static,
        D: Deps;

    /// Return `create()`, or the cached value when `deps` did not change.
    fn memoize_value<T, D, F>(&self, create: F, deps: D) -> Result<T, Self::Error>
    where
        T: Clone + Send + Sync + 'static,
        D: Deps,
        F: FnOnce() -> T;

    /// Point `target` at `create()` when `deps` changed. A missing target
    /// still occupies the call site.
    fn expose_handle<T, D>(
        &self,
        target: Option<&RefTarget<T>>,
        create: Box<dyn FnOnce() -> T + Send>,
        deps: D,
    ) -> Result<(), Self::Error>
    where
        T: Send + Sync + 'static,
        D: Deps;
}
