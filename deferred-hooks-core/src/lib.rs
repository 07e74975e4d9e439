//! Deferred Hooks Core
//!
//! This crate provides an adapter over the hook primitives of a reactive UI
//! runtime: effects, layout effects, memoized callbacks, memoized values and
//! imperative handles.
//!
//! A native hook takes one list that is both what the function closes over
//! and what decides whether it runs again. The adapter splits that list in
//! two:
//!
//! - an argument list, applied positionally to the function when it runs;
//! - an optional comparison list, handed to the runtime for change
//!   detection. When omitted, the argument list is compared instead.
//!
//! # Architecture
//!
//! - `adapter`: the entry points, argument application, comparison lists and
//!   the [`ReactiveScheduler`](adapter::ReactiveScheduler) trait a runtime
//!   implements
//! - `host`: a small reference runtime implementing that trait, used to
//!   drive components in tests and demos
//! - `config`: host configuration
//! - `error`: host error types
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use deferred_hooks_core::adapter::use_effect;
//! use deferred_hooks_core::host::HostRoot;
//!
//! let title = Arc::new(Mutex::new(String::new()));
//! let root = HostRoot::default();
//!
//! for count in [0u32, 0, 1] {
//!     let title = title.clone();
//!     root.render(|scope| {
//!         use_effect(
//!             scope,
//!             move |n: u32| *title.lock().unwrap() = format!("You clicked {n} times"),
//!             (count,),
//!         )
//!     })
//!     .unwrap();
//!     root.flush_effects();
//! }
//!
//! assert_eq!(*title.lock().unwrap(), "You clicked 1 times");
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod host;

pub use adapter::{
    use_callback, use_callback_with, use_effect, use_effect_with, use_imperative_handle,
    use_imperative_handle_with, use_layout_effect, use_layout_effect_with, use_memo,
    use_memo_with, Callback, Cleanup, Deferred, Deps, EffectTiming, HandleRef, Identity,
    ReactiveScheduler, RefTarget,
};
pub use config::HostConfig;
pub use error::{ConfigError, HookError};
pub use host::{HookKind, HostRoot, RenderScope};
