//! Error types.
//!
//! The adapter itself cannot fail. Everything here comes from the reference
//! host: hook-order misuse and bad configuration.

use thiserror::Error;

use crate::host::HookKind;

/// Misuse of the hook call-site contract, detected by the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    #[error("rendered more hooks than during the previous render ({previous})")]
    MoreHooksThanPreviousRender { previous: usize },

    #[error("rendered fewer hooks than during the previous render ({rendered} of {previous})")]
    FewerHooksThanPreviousRender { previous: usize, rendered: usize },

    #[error("hook {index} changed from {previous} to {next} between renders")]
    KindChanged {
        index: usize,
        previous: HookKind,
        next: HookKind,
    },

    #[error("hook {index} cached a {previous} but was read as a {requested}")]
    ValueTypeChanged {
        index: usize,
        previous: &'static str,
        requested: &'static str,
    },

    #[error("hook {index} compared a {previous} before and a {next} now")]
    DepsTypeChanged {
        index: usize,
        previous: &'static str,
        next: &'static str,
    },

    #[error("component was unmounted")]
    Unmounted,
}

/// Failure loading a [`HostConfig`](crate::config::HostConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid host config: {0}")]
    Parse(#[from] serde_json::Error),
}
