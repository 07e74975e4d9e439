//! Title Counter Demo
//!
//! A click counter that mirrors its count into a "document title" three
//! ways: a named function plus an argument list, an inline closure over the
//! count, and an inline closure that takes the count as an argument.
//!
//! Run with: `RUST_LOG=deferred_hooks_core=trace cargo run --example title_counter`

use std::sync::Arc;

use deferred_hooks_core::adapter::{use_effect, use_effect_with, Cleanup};
use deferred_hooks_core::{HookError, HostRoot, RenderScope};
use parking_lot::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Default)]
struct Document {
    title: Arc<Mutex<String>>,
}

impl Document {
    fn set_title(&self, title: String) {
        info!(%title, "title updated");
        *self.title.lock() = title;
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.title, &other.title)
    }
}

fn show_count(doc: Document, label: &'static str, count: u32) -> Cleanup {
    doc.set_title(format!("[{label}] You clicked {count} times"));
    Cleanup::new(move || info!(label, count, "previous title retired"))
}

fn counter(scope: &RenderScope<'_>, doc: &Document, count: u32) -> Result<(), HookError> {
    // A named function with its arguments listed beside it.
    use_effect(scope, show_count, (doc.clone(), "fn", count))?;

    // An inline closure that captures the count, compared on it.
    let captured = doc.clone();
    use_effect_with(
        scope,
        move || captured.set_title(format!("[capture] You clicked {count} times")),
        (),
        (count,),
    )?;

    // An inline closure that takes the count as an argument.
    let target = doc.clone();
    use_effect(
        scope,
        move |n: u32| target.set_title(format!("[arg] You clicked {n} times")),
        (count,),
    )
}

fn main() -> Result<(), HookError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let doc = Document::default();
    let root = HostRoot::default();

    for count in [0, 0, 1, 2, 2] {
        info!(count, "render");
        root.render(|scope| counter(scope, &doc, count))?;
        root.flush_effects();
    }

    root.unmount();
    info!(title = %doc.title.lock(), "done");
    Ok(())
}
