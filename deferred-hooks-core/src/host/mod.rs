//! Reference Host
//!
//! A minimal hook runtime implementing the [`ReactiveScheduler`] contract,
//! so the adapter can be exercised without a real UI framework.
//!
//! # Model
//!
//! A [`HostRoot`] is a single component instance. Each call to
//! [`HostRoot::render`] runs the component body once with a
//! [`RenderScope`]; hooks are matched to slots purely by call order, the
//! same rule every hook-based UI runtime uses.
//!
//! | Hook | Slot holds | Runs |
//! |---|---|---|
//! | effect | comparison list, cleanup | passive phase, after paint |
//! | layout effect | comparison list, cleanup | layout phase, before paint |
//! | imperative handle | comparison list, ref identity | layout phase |
//! | memo | comparison list, value | during render |
//! | callback | comparison list, callback | during render |
//!
//! Comparison uses [`Deps::shallow_eq`](crate::adapter::Deps::shallow_eq).
//! The host does not track reads, batch updates, or reconcile children;
//! it exists to honor the collaborator contract and nothing more.
//!
//! [`ReactiveScheduler`]: crate::adapter::ReactiveScheduler

mod effect;
mod root;
mod scope;
mod slot;

pub use root::{HostRoot, RootId};
pub use scope::RenderScope;
pub use slot::HookKind;
