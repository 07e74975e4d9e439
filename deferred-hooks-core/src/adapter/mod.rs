//! Deferred Invocation Adapter
//!
//! Host hook primitives take one list that plays two roles: the values a
//! function closes over and the values that decide whether it runs again.
//! This module separates them. Every entry point takes
//!
//! - a user function,
//! - an argument list applied positionally when the host runs the hook,
//! - optionally, a comparison list handed to the host instead.
//!
//! Without a comparison list the argument list is compared, which is exactly
//! what the native primitive would do. With one, the arguments are free to
//! change without re-running anything.
//!
//! # Entry Points
//!
//! | Function | Host primitive |
//! |---|---|
//! | [`use_effect`] / [`use_effect_with`] | effect after commit |
//! | [`use_layout_effect`] / [`use_layout_effect_with`] | effect before paint |
//! | [`use_callback`] / [`use_callback_with`] | memoized callback |
//! | [`use_memo`] / [`use_memo_with`] | memoized value |
//! | [`use_imperative_handle`] / [`use_imperative_handle_with`] | imperative handle |
//!
//! All of them are shorthands for the [`Deferred`] builder, which also
//! covers the rarer shapes: an effect whose function may be absent, and a
//! hook that runs on every render.
//!
//! # Example
//!
//! ```rust,ignore
//! fn set_title(count: u32) {
//!     document_title(format!("You clicked {count} times"));
//! }
//!
//! // Runs whenever `count` changes, receiving it as its argument.
//! use_effect(scope, set_title, (count,))?;
//!
//! // Receives `count` but only runs again when `user_id` changes.
//! use_effect_with(scope, set_title, (count,), (user_id,))?;
//! ```

mod args;
mod deps;
mod handle;
mod scheduler;

pub use args::{Apply, ApplyOnce, Args};
pub use deps::{Comparison, Deps, EveryRender, Explicit, Identity, Inherit};
pub use handle::{HandleRef, RefTarget};
pub use scheduler::{Callback, Cleanup, EffectFn, EffectTiming, IntoCleanup, ReactiveScheduler};

/// A user function that is always present.
#[derive(Debug, Clone, Copy)]
pub struct Present<F>(F);

/// A user function that may be absent. Only effects accept one; the
/// produced closure does nothing when it is missing.
#[derive(Debug, Clone, Copy)]
pub struct Optional<F>(Option<F>);

/// How an effect function is turned into the closure the host stores.
pub trait EffectCreate<A> {
    /// Bind the function to its arguments.
    fn bind(self, args: A) -> EffectFn;
}

impl<F, A> EffectCreate<A> for Present<F>
where
    A: ApplyOnce<F> + Send + 'static,
    A::Output: IntoCleanup,
    F: Send + 'static,
{
    fn bind(self, args: A) -> EffectFn {
        let create = self.0;
        Box::new(move || args.apply_once(create).into_cleanup())
    }
}

impl<F, A> EffectCreate<A> for Optional<F>
where
    A: ApplyOnce<F> + Send + 'static,
    A::Output: IntoCleanup,
    F: Send + 'static,
{
    fn bind(self, args: A) -> EffectFn {
        match self.0 {
            Some(create) => Present(create).bind(args),
            None => {
                tracing::trace!("effect registered without a function, using a no-op");
                Box::new(|| None)
            }
        }
    }
}

/// A user function waiting for its arguments, comparison list and host.
///
/// `K` is the function ([`Present`] or [`Optional`]), `A` the argument
/// tuple, `C` the comparison rule ([`Inherit`] or [`Explicit`]).
///
/// ```rust,ignore
/// Deferred::new(render_chart)
///     .args((data.clone(), width))
///     .compare((Identity::from(data), width))
///     .layout_effect(scope)?;
///
/// Deferred::maybe(props.on_mount)
///     .args((id,))
///     .effect(scope)?;
/// ```
#[derive(Debug, Clone)]
pub struct Deferred<K, A = (), C = Inherit> {
    create: K,
    args: A,
    compare: C,
}

impl<F> Deferred<Present<F>> {
    /// Wrap a user function. Arguments default to `()`, and the comparison
    /// list defaults to the arguments.
    pub fn new(create: F) -> Self {
        Self {
            create: Present(create),
            args: (),
            compare: Inherit,
        }
    }
}

impl<F> Deferred<Optional<F>> {
    /// Wrap an effect function that may be absent.
    pub fn maybe(create: Option<F>) -> Self {
        Self {
            create: Optional(create),
            args: (),
            compare: Inherit,
        }
    }
}

impl<K, A, C> Deferred<K, A, C> {
    /// Set the positional arguments.
    pub fn args<A2>(self, args: A2) -> Deferred<K, A2, C> {
        Deferred {
            create: self.create,
            args,
            compare: self.compare,
        }
    }

    /// Compare `deps` instead of the arguments.
    pub fn compare<D: Deps>(self, deps: D) -> Deferred<K, A, Explicit<D>> {
        Deferred {
            create: self.create,
            args: self.args,
            compare: Explicit(deps),
        }
    }

    /// Run on every render.
    pub fn every_render(self) -> Deferred<K, A, Explicit<EveryRender>> {
        self.compare(EveryRender)
    }

    /// Split into the produced closure's parts and the comparison list the
    /// host sees. The list is resolved first, since it may borrow the
    /// arguments.
    fn resolve(self) -> (K, A, C::Deps)
    where
        C: Comparison<A>,
    {
        let deps = self.compare.resolve(&self.args);
        (self.create, self.args, deps)
    }
}

impl<K, A, C> Deferred<K, A, C>
where
    K: EffectCreate<A>,
    C: Comparison<A>,
{
    /// Register as an effect that runs after commit.
    pub fn effect<S>(self, scheduler: &S) -> Result<(), S::Error>
    where
        S: ReactiveScheduler + ?Sized,
    {
        self.schedule(scheduler, EffectTiming::Passive)
    }

    /// Register as an effect that runs before paint.
    pub fn layout_effect<S>(self, scheduler: &S) -> Result<(), S::Error>
    where
        S: ReactiveScheduler + ?Sized,
    {
        self.schedule(scheduler, EffectTiming::Layout)
    }

    fn schedule<S>(self, scheduler: &S, timing: EffectTiming) -> Result<(), S::Error>
    where
        S: ReactiveScheduler + ?Sized,
    {
        let (create, args, deps) = self.resolve();
        scheduler.schedule_effect(timing, create.bind(args), deps)
    }
}

impl<F, A, C> Deferred<Present<F>, A, C>
where
    C: Comparison<A>,
{
    /// Produce a zero-argument callback that calls the function with the
    /// captured arguments. The host hands back the previous render's
    /// callback while the comparison list is unchanged.
    pub fn callback<S>(self, scheduler: &S) -> Result<Callback<A::Output>, S::Error>
    where
        S: ReactiveScheduler + ?Sized,
        A: Apply<F> + Send + Sync + 'static,
        A::Output: 'static,
        F: Send + Sync + 'static,
    {
        let (Present(create), args, deps) = self.resolve();
        let callback = Callback::new(move || args.apply(&create));
        scheduler.memoize_callback(callback, deps)
    }

    /// Produce the function's result, recomputed only when the comparison
    /// list changed.
    pub fn memo<S>(self, scheduler: &S) -> Result<A::Output, S::Error>
    where
        S: ReactiveScheduler + ?Sized,
        A: ApplyOnce<F>,
        A::Output: Clone + Send + Sync + 'static,
    {
        let (Present(create), args, deps) = self.resolve();
        scheduler.memoize_value(move || args.apply_once(create), deps)
    }

    /// Expose the function's result through `target`. An absent target
    /// still occupies the hook call site.
    pub fn imperative_handle<S>(
        self,
        scheduler: &S,
        target: Option<&RefTarget<A::Output>>,
    ) -> Result<(), S::Error>
    where
        S: ReactiveScheduler + ?Sized,
        A: ApplyOnce<F> + Send + 'static,
        A::Output: Send + Sync + 'static,
        F: Send + 'static,
    {
        let (Present(create), args, deps) = self.resolve();
        scheduler.expose_handle(target, Box::new(move || args.apply_once(create)), deps)
    }
}

/// Run `create(args…)` after commit whenever `args` changed.
pub fn use_effect<S, F, A>(scheduler: &S, create: F, args: A) -> Result<(), S::Error>
where
    S: ReactiveScheduler + ?Sized,
    A: Deps + ApplyOnce<F>,
    A::Output: IntoCleanup,
    F: Send + 'static,
{
    Deferred::new(create).args(args).effect(scheduler)
}

/// Run `create(args…)` after commit whenever `compare` changed.
pub fn use_effect_with<S, F, A, D>(
    scheduler: &S,
    create: F,
    args: A,
    compare: D,
) -> Result<(), S::Error>
where
    S: ReactiveScheduler + ?Sized,
    A: ApplyOnce<F> + Send + 'static,
    A::Output: IntoCleanup,
    F: Send + 'static,
    D: Deps,
{
    Deferred::new(create).args(args).compare(compare).effect(scheduler)
}

/// Run `create(args…)` before paint whenever `args` changed.
pub fn use_layout_effect<S, F, A>(scheduler: &S, create: F, args: A) -> Result<(), S::Error>
where
    S: ReactiveScheduler + ?Sized,
    A: Deps + ApplyOnce<F>,
    A::Output: IntoCleanup,
    F: Send + 'static,
{
    Deferred::new(create).args(args).layout_effect(scheduler)
}

/// Run `create(args…)` before paint whenever `compare` changed.
pub fn use_layout_effect_with<S, F, A, D>(
    scheduler: &S,
    create: F,
    args: A,
    compare: D,
) -> Result<(), S::Error>
where
    S: ReactiveScheduler + ?Sized,
    A: ApplyOnce<F> + Send + 'static,
    A::Output: IntoCleanup,
    F: Send + 'static,
    D: Deps,
{
    Deferred::new(create)
        .args(args)
        .compare(compare)
        .layout_effect(scheduler)
}

/// A callback for `f(args…)`, re-created only when `args` changed.
pub fn use_callback<S, F, A>(scheduler: &S, f: F, args: A) -> Result<Callback<A::Output>, S::Error>
where
    S: ReactiveScheduler + ?Sized,
    A: Deps + Apply<F>,
    A::Output: 'static,
    F: Send + Sync + 'static,
{
    Deferred::new(f).args(args).callback(scheduler)
}

/// A callback for `f(args…)`, re-created only when `compare` changed.
pub fn use_callback_with<S, F, A, D>(
    scheduler: &S,
    f: F,
    args: A,
    compare: D,
) -> Result<Callback<A::Output>, S::Error>
where
    S: ReactiveScheduler + ?Sized,
    A: Apply<F> + Send + Sync + 'static,
    A::Output: 'static,
    F: Send + Sync + 'static,
    D: Deps,
{
    Deferred::new(f).args(args).compare(compare).callback(scheduler)
}

/// `create(args…)`, recomputed only when `args` changed.
pub fn use_memo<S, F, A>(scheduler: &S, create: F, args: A) -> Result<A::Output, S::Error>
where
    S: ReactiveScheduler + ?Sized,
    A: Deps + ApplyOnce<F>,
    A::Output: Clone + Send + Sync + 'static,
{
    Deferred::new(create).args(args).memo(scheduler)
}

/// `create(args…)`, recomputed only when `compare` changed.
pub fn use_memo_with<S, F, A, D>(
    scheduler: &S,
    create: F,
    args: A,
    compare: D,
) -> Result<A::Output, S::Error>
where
    S: ReactiveScheduler + ?Sized,
    A: ApplyOnce<F>,
    A::Output: Clone + Send + Sync + 'static,
    D: Deps,
{
    Deferred::new(create).args(args).compare(compare).memo(scheduler)
}

/// Expose `create(args…)` through `target` whenever `args` changed.
pub fn use_imperative_handle<S, F, A>(
    scheduler: &S,
    target: Option<&RefTarget<A::Output>>,
    create: F,
    args: A,
) -> Result<(), S::Error>
where
    S: ReactiveScheduler + ?Sized,
    A: Deps + ApplyOnce<F>,
    A::Output: Send + Sync + 'static,
    F: Send + 'static,
{
    Deferred::new(create)
        .args(args)
        .imperative_handle(scheduler, target)
}

/// Expose `create(args…)` through `target` whenever `compare` changed.
pub fn use_imperative_handle_with<S, F, A, D>(
    scheduler: &S,
    target: Option<&RefTarget<A::Output>>,
    create: F,
    args: A,
    compare: D,
) -> Result<(), S::Error>
where
    S: ReactiveScheduler + ?Sized,
    A: ApplyOnce<F> + Send + 'static,
    A::Output: Send + Sync + 'static,
    F: Send + 'static,
    D: Deps,
{
    Deferred::new(create)
        .args(args)
        .compare(compare)
        .imperative_handle(scheduler, target)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
