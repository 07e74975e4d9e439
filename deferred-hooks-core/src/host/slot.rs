//! Hook Slots
//!
//! A component's hooks are identified by call order. Slot `i` holds what the
//! `i`-th hook call left behind at the last commit: its comparison list and
//! either a cleanup (effects) or a cached value (memos and callbacks).
//!
//! During a render nothing is written to the slots. Each hook call stages
//! its update, and the whole batch is applied at commit, so a render that
//! fails leaves the committed state untouched.
//!
//! Comparison lists and cached values are user types whose `PartialEq`,
//! `Clone` and `Drop` may call back into the root. Slots therefore hold them
//! behind `Arc`s: readers take a [`Snapshot`] under the lock and compare
//! after releasing it, and commits hand back what they replaced as
//! [`Displaced`] so it is dropped outside the lock.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use crate::adapter::{Cleanup, Deps, EffectTiming};

/// What kind of hook occupies a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Effect after commit.
    Effect,
    /// Effect before paint.
    LayoutEffect,
    /// Imperative handle, applied with layout effects.
    ImperativeHandle,
    /// Memoized value.
    Memo,
    /// Memoized callback.
    Callback,
}

impl HookKind {
    pub(crate) fn for_timing(timing: EffectTiming) -> Self {
        match timing {
            EffectTiming::Passive => Self::Effect,
            EffectTiming::Layout => Self::LayoutEffect,
        }
    }

    /// The commit phase this hook's closure runs in, if it runs in one.
    pub fn timing(self) -> Option<EffectTiming> {
        match self {
            Self::Effect => Some(EffectTiming::Passive),
            Self::LayoutEffect | Self::ImperativeHandle => Some(EffectTiming::Layout),
            Self::Memo | Self::Callback => None,
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Effect => "effect",
            Self::LayoutEffect => "layout effect",
            Self::ImperativeHandle => "imperative handle",
            Self::Memo => "memo",
            Self::Callback => "callback",
        };
        f.write_str(name)
    }
}

/// A comparison list with its concrete type erased.
pub(crate) trait StoredDeps: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn len(&self) -> usize;
    fn type_name(&self) -> &'static str;
}

impl<D: Deps> StoredDeps for D {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn len(&self) -> usize {
        Deps::len(self)
    }

    fn type_name(&self) -> &'static str {
        type_name::<D>()
    }
}

pub(crate) type SharedDeps = Arc<dyn StoredDeps>;
pub(crate) type SharedValue = Arc<dyn Any + Send + Sync>;

/// Committed state of one hook call site.
pub(crate) enum Slot {
    Effect {
        kind: HookKind,
        deps: SharedDeps,
        /// Identity of the ref an imperative handle was delivered to.
        target: Option<usize>,
        cleanup: Option<Cleanup>,
    },
    Cached {
        kind: HookKind,
        deps: SharedDeps,
        value: SharedValue,
        value_type: &'static str,
    },
}

/// A slot's comparison inputs, detached from the root's lock.
pub(crate) struct Snapshot {
    pub(crate) deps: SharedDeps,
    pub(crate) target: Option<usize>,
    pub(crate) value: Option<(SharedValue, &'static str)>,
}

/// What a commit took out of the slots. Must be dropped with the root's
/// lock released.
pub(crate) enum Displaced {
    Deps(SharedDeps),
    Slot(Slot),
}

impl Slot {
    pub(crate) fn kind(&self) -> HookKind {
        match self {
            Self::Effect { kind, .. } | Self::Cached { kind, .. } => *kind,
        }
    }

    /// Clone out everything a render compares against.
    pub(crate) fn snapshot(&self) -> Snapshot {
        match self {
            Self::Effect { deps, target, .. } => Snapshot {
                deps: Arc::clone(deps),
                target: *target,
                value: None,
            },
            Self::Cached {
                deps,
                value,
                value_type,
                ..
            } => Snapshot {
                deps: Arc::clone(deps),
                target: None,
                value: Some((Arc::clone(value), *value_type)),
            },
        }
    }

    pub(crate) fn take_cleanup(&mut self) -> Option<Cleanup> {
        match self {
            Self::Effect { cleanup, .. } => cleanup.take(),
            Self::Cached { .. } => None,
        }
    }
}

/// An update to one slot, produced during render and applied at commit.
pub(crate) enum Staged {
    /// Comparison list matched; keep the slot as is.
    Unchanged,
    /// Effect will run; record its new comparison list. The old cleanup stays
    /// in the slot until the effect phase runs it.
    Effect {
        kind: HookKind,
        deps: SharedDeps,
        target: Option<usize>,
    },
    /// Freshly computed memo or callback.
    Cached {
        kind: HookKind,
        deps: SharedDeps,
        value: SharedValue,
        value_type: &'static str,
    },
}

impl Staged {
    /// Write the update into `slots`, returning whatever it replaced.
    pub(crate) fn apply(self, slots: &mut Vec<Slot>, index: usize) -> Option<Displaced> {
        let fresh = match self {
            Self::Unchanged => return None,
            Self::Effect { kind, deps, target } => {
                if let Some(Slot::Effect {
                    deps: slot_deps,
                    target: slot_target,
                    ..
                }) = slots.get_mut(index)
                {
                    *slot_target = target;
                    return Some(Displaced::Deps(std::mem::replace(slot_deps, deps)));
                }
                Slot::Effect {
                    kind,
                    deps,
                    target,
                    cleanup: None,
                }
            }
            Self::Cached {
                kind,
                deps,
                value,
                value_type,
            } => Slot::Cached {
                kind,
                deps,
                value,
                value_type,
            },
        };

        match slots.get_mut(index) {
            Some(slot) => Some(Displaced::Slot(std::mem::replace(slot, fresh))),
            None => {
                slots.push(fresh);
                None
            }
        }
    }
}
