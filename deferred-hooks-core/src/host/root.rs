//! Host Root
//!
//! A `HostRoot` is one mounted component instance. It owns the hook slots
//! and drives the render/commit cycle:
//!
//! 1. `render` runs any passive effects left over from the previous commit,
//!    then calls the component body with a fresh [`RenderScope`].
//!
//! 2. Hooks called by the body compare their comparison lists against the
//!    committed slots and stage updates. Nothing is committed yet.
//!
//! 3. If the body succeeds and called the same number of hooks as last
//!    time, the staged updates are committed and the layout phase runs
//!    before `render` returns.
//!
//! 4. Passive effects run on `flush_effects`, at the start of the next
//!    render, or before unmount.
//!
//! # Thread Safety
//!
//! The root is driven from one thread. Slots sit behind a lock so that
//! effects and cleanups can reach back into the root (to read its state or
//! unmount it) without deadlocking; the lock is never held while user code
//! runs.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::effect::{run_phase, EffectQueue};
use super::scope::{RenderScope, RenderWork};
use super::slot::{Displaced, HookKind, Slot};
use crate::config::HostConfig;
use crate::error::HookError;

/// Unique identifier for a root, used in log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RootId(u64);

impl RootId {
    /// Generate a new unique root ID.
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "root#{}", self.0)
    }
}

/// Committed state of a root.
pub(crate) struct RootState {
    pub(crate) slots: Vec<Slot>,
    mounted: bool,
    unmounted: bool,
    renders: u64,
    pending_passive: EffectQueue,
}

/// One component instance and its hook slots.
///
/// # Example
///
/// ```rust,ignore
/// let root = HostRoot::new(HostConfig::default());
///
/// for count in [0, 0, 1] {
///     root.render(|scope| use_effect(scope, set_title, (count,)))?;
///     root.flush_effects();
/// }
/// ```
pub struct HostRoot {
    id: RootId,
    config: HostConfig,
    pub(crate) state: Mutex<RootState>,
}

impl HostRoot {
    /// Create an unmounted root. The first `render` mounts it.
    pub fn new(config: HostConfig) -> Self {
        Self {
            id: RootId::next(),
            config,
            state: Mutex::new(RootState {
                slots: Vec::new(),
                mounted: false,
                unmounted: false,
                renders: 0,
                pending_passive: EffectQueue::new(),
            }),
        }
    }

    /// Get the root's unique ID.
    pub fn id(&self) -> RootId {
        self.id
    }

    /// The configuration the root was created with.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Render the component body and commit the result.
    ///
    /// Layout effects and imperative handles have run by the time this
    /// returns. Passive effects are queued unless the config flushes them.
    /// On error nothing is committed.
    pub fn render<V, B>(&self, body: B) -> Result<V, HookError>
    where
        B: FnOnce(&RenderScope<'_>) -> Result<V, HookError>,
    {
        if self.state.lock().unmounted {
            return Err(HookError::Unmounted);
        }

        // The previous commit's passive effects always run before the next render.
        self.flush_effects();

        let (mounting, previous_len, pass) = {
            let state = self.state.lock();
            (!state.mounted, state.slots.len(), state.renders + 1)
        };

        let _span = tracing::debug_span!("render", root = %self.id, pass, mounting).entered();
        debug!(hooks = previous_len, "render started");

        let scope = RenderScope::new(self, mounting, previous_len);
        let value = body(&scope)?;
        let work = scope.finish()?;

        self.commit(work);

        if self.config.flush_passive_on_render {
            self.flush_effects();
        }
        Ok(value)
    }

    fn commit(&self, work: RenderWork) {
        let RenderWork {
            staged,
            layout,
            passive,
        } = work;

        let (displaced, stale): (Vec<Displaced>, EffectQueue) = {
            let mut state = self.state.lock();
            let displaced = staged
                .into_iter()
                .enumerate()
                .filter_map(|(index, update)| update.apply(&mut state.slots, index))
                .collect();
            state.mounted = true;
            state.renders += 1;
            let stale = std::mem::replace(&mut state.pending_passive, passive);

            debug!(
                hooks = state.slots.len(),
                layout = layout.len(),
                passive = state.pending_passive.len(),
                "committed"
            );
            (displaced, stale)
        };
        drop((displaced, stale));

        run_phase(self, layout);
        trace!(root = %self.id, "painted");
    }

    /// Run queued passive effects. Returns how many ran.
    pub fn flush_effects(&self) -> usize {
        let pending = std::mem::take(&mut self.state.lock().pending_passive);
        let count = pending.len();

        if count > 0 {
            debug!(root = %self.id, effects = count, "flushing passive effects");
            run_phase(self, pending);
        }
        count
    }

    /// Tear the component down.
    ///
    /// Pending passive effects run first, so every effect that ran gets its
    /// cleanup. Then layout cleanups (including clearing imperative handles)
    /// run in hook order, then passive cleanups in hook order. Rendering
    /// afterwards fails with [`HookError::Unmounted`].
    pub fn unmount(&self) {
        if self.state.lock().unmounted {
            return;
        }
        self.flush_effects();

        let (slots, stale) = {
            let mut state = self.state.lock();
            if state.unmounted {
                return;
            }
            state.unmounted = true;
            state.mounted = false;
            (
                std::mem::take(&mut state.slots),
                std::mem::take(&mut state.pending_passive),
            )
        };
        drop(stale);

        let mut layout = Vec::new();
        let mut passive = Vec::new();
        for (index, slot) in slots.into_iter().enumerate() {
            if let Slot::Effect {
                kind,
                cleanup: Some(cleanup),
                ..
            } = slot
            {
                if kind == HookKind::Effect {
                    passive.push((index, kind, cleanup));
                } else {
                    layout.push((index, kind, cleanup));
                }
            }
        }

        debug!(root = %self.id, cleanups = layout.len() + passive.len(), "unmounting");
        for (index, kind, cleanup) in layout.into_iter().chain(passive) {
            trace!(root = %self.id, hook = index, %kind, "running cleanup");
            cleanup.run();
        }
    }

    /// Whether the root has committed a render and not been unmounted.
    pub fn is_mounted(&self) -> bool {
        self.state.lock().mounted
    }

    /// Number of committed renders.
    pub fn render_count(&self) -> u64 {
        self.state.lock().renders
    }

    /// Number of hook slots committed.
    pub fn hook_count(&self) -> usize {
        self.state.lock().slots.len()
    }

    /// Whether passive effects are waiting for a flush.
    pub fn has_pending_effects(&self) -> bool {
        !self.state.lock().pending_passive.is_empty()
    }
}

impl Default for HostRoot {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

impl Drop for HostRoot {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl fmt::Debug for HostRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("HostRoot")
            .field("id", &self.id)
            .field("mounted", &state.mounted)
            .field("renders", &state.renders)
            .field("hooks", &state.slots.len())
            .field("pending_passive", &state.pending_passive.len())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{
        use_effect, use_effect_with, use_imperative_handle, use_layout_effect, use_memo, Cleanup,
        Deferred, HandleRef, RefTarget,
    };
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::Arc;

    type Log = Arc<Mutex<Vec<String>>>;

    fn log() -> Log {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().clone()
    }

    /// An effect that logs its run and its cleanup under `name`.
    fn logged(log: &Log, name: &'static str) -> impl FnOnce(i32) -> Cleanup + Send + 'static {
        let log = log.clone();
        move |n: i32| {
            log.lock().push(format!("{name}:run:{n}"));
            let log = log.clone();
            Cleanup::new(move || log.lock().push(format!("{name}:cleanup:{n}")))
        }
    }

    #[test]
    fn layout_effects_run_before_render_returns() {
        let root = HostRoot::default();
        let events = log();

        root.render(|s| {
            use_effect(s, logged(&events, "passive"), (1,))?;
            use_layout_effect(s, logged(&events, "layout"), (1,))
        })
        .unwrap();

        assert_eq!(entries(&events), vec!["layout:run:1"]);
        assert!(root.has_pending_effects());

        assert_eq!(root.flush_effects(), 1);
        assert_eq!(entries(&events), vec!["layout:run:1", "passive:run:1"]);
        assert!(!root.has_pending_effects());
        assert_eq!(root.flush_effects(), 0);
    }

    #[test]
    fn pending_passive_effects_run_before_next_render() {
        let root = HostRoot::default();
        let events = log();

        root.render(|s| use_effect(s, logged(&events, "a"), (1,))).unwrap();
        root.render(|s| use_effect(s, logged(&events, "a"), (2,))).unwrap();

        assert_eq!(entries(&events), vec!["a:run:1"]);
        root.flush_effects();
        assert_eq!(entries(&events), vec!["a:run:1", "a:cleanup:1", "a:run:2"]);
    }

    #[test]
    fn cleanups_of_a_phase_run_before_its_effects() {
        let root = HostRoot::new(HostConfig::default().flush_passive_on_render(true));
        let events = log();

        for n in [1, 2] {
            root.render(|s| {
                use_effect(s, logged(&events, "a"), (n,))?;
                use_effect(s, logged(&events, "b"), (n,))
            })
            .unwrap();
        }

        assert_eq!(
            entries(&events),
            vec!["a:run:1", "b:run:1", "a:cleanup:1", "b:cleanup:1", "a:run:2", "b:run:2"]
        );
    }

    #[test]
    fn more_hooks_than_previous_render_is_an_error() {
        let root = HostRoot::default();
        root.render(|s| use_memo(s, || 1, ())).unwrap();

        let err = root
            .render(|s| {
                use_memo(s, || 1, ())?;
                use_memo(s, || 2, ())
            })
            .unwrap_err();
        assert_eq!(err, HookError::MoreHooksThanPreviousRender { previous: 1 });
    }

    #[test]
    fn fewer_hooks_than_previous_render_is_an_error() {
        let root = HostRoot::default();
        root.render(|s| {
            use_memo(s, || 1, ())?;
            use_memo(s, || 2, ())
        })
        .unwrap();

        let err = root.render(|s| use_memo(s, || 1, ())).unwrap_err();
        assert_eq!(
            err,
            HookError::FewerHooksThanPreviousRender {
                previous: 2,
                rendered: 1
            }
        );
    }

    #[test]
    fn changing_hook_kind_is_an_error() {
        let root = HostRoot::default();
        root.render(|s| use_memo(s, || 1, ())).unwrap();

        let err = root.render(|s| use_effect(s, || {}, ())).unwrap_err();
        assert_eq!(
            err,
            HookError::KindChanged {
                index: 0,
                previous: HookKind::Memo,
                next: HookKind::Effect
            }
        );
    }

    #[test]
    fn failed_render_commits_nothing() {
        let root = HostRoot::new(HostConfig::default().flush_passive_on_render(true));
        let events = log();

        root.render(|s| use_effect(s, logged(&events, "a"), (1,))).unwrap();

        let err = root
            .render(|s| {
                use_effect(s, logged(&events, "a"), (2,))?;
                Err::<(), _>(HookError::Unmounted)
            })
            .unwrap_err();
        assert_eq!(err, HookError::Unmounted);
        assert_eq!(root.render_count(), 1);
        assert_eq!(entries(&events), vec!["a:run:1"]);

        // The committed list is still (1,), so (2,) is a change.
        root.render(|s| use_effect(s, logged(&events, "a"), (2,))).unwrap();
        assert_eq!(entries(&events), vec!["a:run:1", "a:cleanup:1", "a:run:2"]);
    }

    #[test]
    fn unmount_runs_layout_cleanups_then_passive_cleanups() {
        let root = HostRoot::default();
        let events = log();

        root.render(|s| {
            use_effect(s, logged(&events, "passive"), (1,))?;
            use_layout_effect(s, logged(&events, "layout"), (1,))
        })
        .unwrap();

        root.unmount();
        assert_eq!(
            entries(&events),
            vec![
                "layout:run:1",
                "passive:run:1",
                "layout:cleanup:1",
                "passive:cleanup:1"
            ]
        );
        assert!(!root.is_mounted());
        assert_eq!(root.render(|_| Ok(())), Err(HookError::Unmounted));

        // Idempotent.
        root.unmount();
        assert_eq!(entries(&events).len(), 4);
    }

    #[test]
    fn dropping_a_root_unmounts_it() {
        let events = log();
        {
            let root = HostRoot::new(HostConfig::default().flush_passive_on_render(true));
            root.render(|s| use_effect(s, logged(&events, "a"), (1,))).unwrap();
        }
        assert_eq!(entries(&events), vec!["a:run:1", "a:cleanup:1"]);
    }

    #[test]
    fn deps_type_change_counts_as_change() {
        let root = HostRoot::new(HostConfig::default().flush_passive_on_render(true));
        let events = log();

        root.render(|s| use_effect_with(s, logged(&events, "a"), (1,), (1u8,))).unwrap();
        root.render(|s| use_effect_with(s, logged(&events, "a"), (2,), (1u16,))).unwrap();

        assert_eq!(entries(&events), vec!["a:run:1", "a:cleanup:1", "a:run:2"]);
    }

    #[test]
    fn strict_deps_types_rejects_type_change() {
        let root = HostRoot::new(HostConfig::default().strict_deps_types(true));

        root.render(|s| use_effect_with(s, |_: i32| {}, (1,), (1u8,))).unwrap();
        let err = root
            .render(|s| use_effect_with(s, |_: i32| {}, (1,), (1u16,)))
            .unwrap_err();

        assert!(matches!(err, HookError::DepsTypeChanged { index: 0, .. }));
    }

    #[test]
    fn memo_value_type_change_is_an_error() {
        let root = HostRoot::default();
        root.render(|s| use_memo(s, || 1u8, ())).unwrap();

        let err = root.render(|s| use_memo(s, || 1u16, ())).unwrap_err();
        assert!(matches!(err, HookError::ValueTypeChanged { index: 0, .. }));
    }

    #[test]
    fn imperative_handle_follows_its_ref() {
        let root = HostRoot::default();
        let first = HandleRef::new();
        let second = HandleRef::new();

        let render = |target: &HandleRef<i32>, n: i32| {
            let target = RefTarget::from(target);
            root.render(|s| use_imperative_handle(s, Some(&target), |n: i32| n * 2, (n,)))
        };

        render(&first, 1).unwrap();
        assert_eq!(first.current(), Some(2));

        // Same ref, same args: untouched.
        first.replace(Some(99));
        render(&first, 1).unwrap();
        assert_eq!(first.current(), Some(99));

        // New ref: the old one is cleared, the new one is set.
        render(&second, 1).unwrap();
        assert_eq!(first.current(), None);
        assert_eq!(second.current(), Some(2));

        root.unmount();
        assert_eq!(second.current(), None);
    }

    #[test]
    fn absent_ref_keeps_the_hook_slot() {
        let root = HostRoot::default();

        root.render(|s| use_imperative_handle(s, None::<&RefTarget<i32>>, |n: i32| n, (1,)))
            .unwrap();
        root.render(|s| use_imperative_handle(s, None::<&RefTarget<i32>>, |n: i32| n, (2,)))
            .unwrap();

        assert_eq!(root.hook_count(), 1);
    }

    #[test]
    fn every_render_runs_every_render() {
        let root = HostRoot::new(HostConfig::default().flush_passive_on_render(true));
        let events = log();

        for _ in 0..3 {
            let events = events.clone();
            root.render(|s| {
                Deferred::new(move || events.lock().push("ran".to_string()))
                    .every_render()
                    .effect(s)
            })
            .unwrap();
        }

        assert_eq!(entries(&events).len(), 3);
    }

    #[test]
    fn resized_comparison_list_counts_as_change() {
        for warn in [true, false] {
            let root = HostRoot::new(
                HostConfig::default()
                    .warn_on_deps_resize(warn)
                    .flush_passive_on_render(true),
            );
            let events = log();

            for deps in [vec![7], vec![7, 8], vec![7, 8], vec![7]] {
                let n = deps.len() as i32;
                root.render(|s| use_effect_with(s, logged(&events, "a"), (n,), deps))
                    .unwrap();
            }

            assert_eq!(
                entries(&events),
                vec!["a:run:1", "a:cleanup:1", "a:run:2", "a:cleanup:2", "a:run:1"]
            );
        }
    }

    #[test]
    fn panicking_effect_stops_its_phase() {
        let root = HostRoot::default();
        let events = log();

        let render = |n: i32| {
            root.render(|s| {
                let first = events.clone();
                use_effect(
                    s,
                    move |n: i32| {
                        if n == 2 {
                            panic!("effect failed");
                        }
                        first.lock().push(format!("a:run:{n}"));
                    },
                    (n,),
                )?;
                use_effect(s, logged(&events, "b"), (n,))
            })
        };

        render(1).unwrap();
        root.flush_effects();
        render(2).unwrap();

        let flushed = catch_unwind(AssertUnwindSafe(|| root.flush_effects()));
        assert!(flushed.is_err());
        assert!(!root.has_pending_effects());
        assert_eq!(entries(&events), vec!["a:run:1", "b:run:1", "b:cleanup:1"]);

        // `b` recorded its new list but never ran, so nothing is left to clean up.
        render(2).unwrap();
        root.flush_effects();
        root.unmount();
        assert_eq!(entries(&events), vec!["a:run:1", "b:run:1", "b:cleanup:1"]);
    }

    #[test]
    fn root_ids_are_unique() {
        let a = HostRoot::default();
        let b = HostRoot::default();
        assert_ne!(a.id(), b.id());
        assert!(a.id().to_string().starts_with("root#"));
    }
}
