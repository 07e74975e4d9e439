//! Effect Phases
//!
//! Effects whose comparison list changed are queued during render and run
//! at commit, in two phases:
//!
//! 1. Layout phase, right after the slots are committed and before paint.
//!    Layout effects and imperative handles run here.
//! 2. Passive phase, after paint. Plain effects run here, when the host is
//!    flushed or when the next render starts, whichever comes first.
//!
//! Within a phase every stale cleanup runs first, in hook order, and then
//! every effect runs, in hook order. A cleanup therefore always runs before
//! the next invocation of the same effect.
//!
//! A panicking effect unwinds out of the phase. Cleanups of later entries
//! have already run by then but their effects have not, so those slots hold
//! the new comparison list and no cleanup. They run again the next time
//! their list changes, and unmount has nothing left to clean up for them.

use smallvec::SmallVec;
use tracing::trace;

use super::root::HostRoot;
use super::slot::{HookKind, Slot};
use crate::adapter::EffectFn;

/// An effect waiting for its phase.
pub(crate) struct PendingEffect {
    pub(crate) index: usize,
    pub(crate) kind: HookKind,
    pub(crate) run: EffectFn,
}

/// Effects queued for one phase of one commit.
pub(crate) type EffectQueue = SmallVec<[PendingEffect; 4]>;

/// Run one phase worth of effects against `root`'s slots.
///
/// The slot lock is never held while user code runs.
pub(crate) fn run_phase(root: &HostRoot, queue: EffectQueue) {
    for entry in &queue {
        let stale = root
            .state
            .lock()
            .slots
            .get_mut(entry.index)
            .and_then(Slot::take_cleanup);

        if let Some(cleanup) = stale {
            trace!(root = %root.id(), hook = entry.index, kind = %entry.kind, "running cleanup");
            cleanup.run();
        }
    }

    for entry in queue {
        trace!(root = %root.id(), hook = entry.index, kind = %entry.kind, "running effect");
        let Some(cleanup) = (entry.run)() else {
            continue;
        };

        // The slot can be gone if the effect unmounted its own root.
        let orphan = {
            let mut state = root.state.lock();
            match state.slots.get_mut(entry.index) {
                Some(Slot::Effect { cleanup: slot, .. }) => {
                    *slot = Some(cleanup);
                    None
                }
                _ => Some(cleanup),
            }
        };

        if let Some(cleanup) = orphan {
            cleanup.run();
        }
    }
}
