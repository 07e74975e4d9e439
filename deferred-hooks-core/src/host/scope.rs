//! Render Scope
//!
//! A `RenderScope` is the hook context for one render pass. It is the
//! [`ReactiveScheduler`] the adapter's entry points are called with.
//!
//! Each hook call claims the next slot index. On the first render the slot
//! is created. On later renders the slot's kind must match and its stored
//! comparison list decides whether the hook's closure runs.
//!
//! The root's lock is held only to copy a [`Snapshot`] out of the slot.
//! Comparing lists and cloning cached values happen after it is released.

use std::any::type_name;
use std::cell::{Cell, RefCell};
use std::sync::Arc;

use tracing::{trace, warn};

use super::effect::{EffectQueue, PendingEffect};
use super::root::HostRoot;
use super::slot::{HookKind, Snapshot, Staged, StoredDeps};
use crate::adapter::{
    Callback, Cleanup, Deps, EffectFn, EffectTiming, ReactiveScheduler, RefTarget,
};
use crate::error::HookError;

/// Everything a finished render hands to the commit.
pub(crate) struct RenderWork {
    pub(crate) staged: Vec<Staged>,
    pub(crate) layout: EffectQueue,
    pub(crate) passive: EffectQueue,
}

/// Hook context for a single render pass of a [`HostRoot`].
pub struct RenderScope<'r> {
    root: &'r HostRoot,
    mounting: bool,
    previous_len: usize,
    cursor: Cell<usize>,
    staged: RefCell<Vec<Staged>>,
    layout: RefCell<EffectQueue>,
    passive: RefCell<EffectQueue>,
}

impl<'r> RenderScope<'r> {
    pub(crate) fn new(root: &'r HostRoot, mounting: bool, previous_len: usize) -> Self {
        Self {
            root,
            mounting,
            previous_len,
            cursor: Cell::new(0),
            staged: RefCell::new(Vec::with_capacity(previous_len)),
            layout: RefCell::new(EffectQueue::new()),
            passive: RefCell::new(EffectQueue::new()),
        }
    }

    /// Whether this is the component's first render.
    pub fn is_mounting(&self) -> bool {
        self.mounting
    }

    /// Number of hooks called so far in this render.
    pub fn hooks_called(&self) -> usize {
        self.cursor.get()
    }

    /// Check the hook count and hand the staged work to the commit.
    pub(crate) fn finish(self) -> Result<RenderWork, HookError> {
        let rendered = self.cursor.get();
        if !self.mounting && rendered < self.previous_len {
            return Err(HookError::FewerHooksThanPreviousRender {
                previous: self.previous_len,
                rendered,
            });
        }

        Ok(RenderWork {
            staged: self.staged.into_inner(),
            layout: self.layout.into_inner(),
            passive: self.passive.into_inner(),
        })
    }

    fn claim(&self) -> Result<usize, HookError> {
        let index = self.cursor.get();
        if !self.mounting && index >= self.previous_len {
            return Err(HookError::MoreHooksThanPreviousRender {
                previous: self.previous_len,
            });
        }

        self.cursor.set(index + 1);
        self.staged.borrow_mut().push(Staged::Unchanged);
        Ok(index)
    }

    fn stage(&self, index: usize, update: Staged) {
        if let Some(slot) = self.staged.borrow_mut().get_mut(index) {
            *slot = update;
        }
    }

    fn previous_slot(&self, index: usize, kind: HookKind) -> Result<Snapshot, HookError> {
        let state = self.root.state.lock();
        let slot = state.slots.get(index).ok_or(HookError::MoreHooksThanPreviousRender {
            previous: state.slots.len(),
        })?;

        if slot.kind() != kind {
            return Err(HookError::KindChanged {
                index,
                previous: slot.kind(),
                next: kind,
            });
        }
        Ok(slot.snapshot())
    }

    fn deps_changed<D: Deps>(
        &self,
        index: usize,
        previous: &dyn StoredDeps,
        next: &D,
    ) -> Result<bool, HookError> {
        let config = self.root.config();

        let Some(previous) = previous.as_any().downcast_ref::<D>() else {
            if config.strict_deps_types {
                return Err(HookError::DepsTypeChanged {
                    index,
                    previous: previous.type_name(),
                    next: type_name::<D>(),
                });
            }
            warn!(
                root = %self.root.id(),
                hook = index,
                previous = previous.type_name(),
                next = type_name::<D>(),
                "comparison list changed type between renders"
            );
            return Ok(true);
        };

        let (previous_len, next_len) = (Deps::len(previous), Deps::len(next));
        if config.warn_on_deps_resize && previous_len != next_len {
            warn!(
                root = %self.root.id(),
                hook = index,
                previous = previous_len,
                next = next_len,
                "comparison list changed size between renders"
            );
        }

        Ok(!next.shallow_eq(previous))
    }

    fn register_effect<D: Deps>(
        &self,
        kind: HookKind,
        effect: EffectFn,
        deps: D,
        target: Option<usize>,
    ) -> Result<(), HookError> {
        let index = self.claim()?;

        let changed = if self.mounting {
            true
        } else {
            let previous = self.previous_slot(index, kind)?;
            let deps_changed = self.deps_changed(index, previous.deps.as_ref(), &deps)?;
            deps_changed || previous.target != target
        };

        if !changed {
            trace!(root = %self.root.id(), hook = index, %kind, "comparison list unchanged, skipping");
            return Ok(());
        }

        trace!(root = %self.root.id(), hook = index, %kind, "queued");
        self.stage(
            index,
            Staged::Effect {
                kind,
                deps: Arc::new(deps),
                target,
            },
        );

        let pending = PendingEffect {
            index,
            kind,
            run: effect,
        };
        match kind.timing() {
            Some(EffectTiming::Passive) => self.passive.borrow_mut().push(pending),
            _ => self.layout.borrow_mut().push(pending),
        }
        Ok(())
    }

    fn memoize<T, D, F>(&self, kind: HookKind, create: F, deps: D) -> Result<T, HookError>
    where
        T: Clone + Send + Sync + 'static,
        D: Deps,
        F: FnOnce() -> T,
    {
        let index = self.claim()?;

        if !self.mounting {
            let previous = self.previous_slot(index, kind)?;

            if !self.deps_changed(index, previous.deps.as_ref(), &deps)? {
                if let Some((value, value_type)) = &previous.value {
                    return match value.downcast_ref::<T>() {
                        Some(value) => {
                            trace!(root = %self.root.id(), hook = index, %kind, "reusing cached value");
                            Ok(value.clone())
                        }
                        None => Err(HookError::ValueTypeChanged {
                            index,
                            previous: *value_type,
                            requested: type_name::<T>(),
                        }),
                    };
                }
            }
        }

        trace!(root = %self.root.id(), hook = index, %kind, "computing");
        let value = create();

        self.stage(
            index,
            Staged::Cached {
                kind,
                deps: Arc::new(deps),
                value: Arc::new(value.clone()),
                value_type: type_name::<T>(),
            },
        );
        Ok(value)
    }
}

impl ReactiveScheduler for RenderScope<'_> {
    type Error = HookError;

    fn schedule_effect<D>(
        &self,
        timing: EffectTiming,
        effect: EffectFn,
        deps: D,
    ) -> Result<(), HookError>
    where
        D: Deps,
    {
        self.register_effect(HookKind::for_timing(timing), effect, deps, None)
    }

    fn memoize_callback<R, D>(&self, callback: Callback<R>, deps: D) -> Result<Callback<R>, HookError>
    where
        R: 'static,
        D: Deps,
    {
        self.memoize(HookKind::Callback, move || callback, deps)
    }

    fn memoize_value<T, D, F>(&self, create: F, deps: D) -> Result<T, HookError>
    where
        T: Clone + Send + Sync + 'static,
        D: Deps,
        F: FnOnce() -> T,
    {
        self.memoize(HookKind::Memo, create, deps)
    }

    fn expose_handle<T, D>(
        &self,
        target: Option<&RefTarget<T>>,
        create: Box<dyn FnOnce() -> T + Send>,
        deps: D,
    ) -> Result<(), HookError>
    where
        T: Send + Sync + 'static,
        D: Deps,
    {
        let key = target.map(RefTarget::key);

        let effect: EffectFn = match target.cloned() {
            Some(target) => Box::new(move || {
                target.assign(Some(create()));
                Some(Cleanup::new(move || target.assign(None)))
            }),
            None => Box::new(|| None),
        };

        self.register_effect(HookKind::ImperativeHandle, effect, deps, key)
    }
}
