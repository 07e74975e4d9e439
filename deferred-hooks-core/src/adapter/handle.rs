//! Imperative Handle Targets
//!
//! An imperative handle is a value a component exposes to whoever holds a
//! ref to it. A ref comes in two shapes:
//!
//! - a [`HandleRef`], a shared cell whose `current` slot the host fills in;
//! - a callback, called with `Some(handle)` when the handle is set and with
//!   `None` when it is cleared.
//!
//! [`RefTarget`] is the union of the two. The host compares targets by
//! identity, so passing a different ref counts as a change.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Counter for generating unique ref IDs.
static REF_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_ref_id() -> u64 {
    REF_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A shared cell holding the handle a component exposed, if any.
///
/// # Example
///
/// ```rust,ignore
/// let input_ref = HandleRef::<InputHandle>::new();
///
/// // ... a component registers an imperative handle against it ...
///
/// if let Some(handle) = input_ref.current() {
///     handle.focus();
/// }
/// ```
pub struct HandleRef<T> {
    /// Unique identifier for this ref.
    id: u64,

    /// The exposed handle. `None` until the host sets it.
    current: Arc<RwLock<Option<T>>>,
}

impl<T> HandleRef<T> {
    /// Create an empty ref.
    pub fn new() -> Self {
        Self {
            id: next_ref_id(),
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Get the ref's unique ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get a clone of the current handle.
    pub fn current(&self) -> Option<T>
    where
        T: Clone,
    {
        self.current.read().clone()
    }

    /// Borrow the current handle.
    pub fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.current.read().as_ref())
    }

    /// Whether a handle is set.
    pub fn is_set(&self) -> bool {
        self.current.read().is_some()
    }

    /// Replace the current handle, returning the old one.
    pub fn replace(&self, value: Option<T>) -> Option<T> {
        std::mem::replace(&mut *self.current.write(), value)
    }

    fn same_cell(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.current, &other.current)
    }

    fn key(&self) -> usize {
        Arc::as_ptr(&self.current) as usize
    }
}

impl<T> Default for HandleRef<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for HandleRef<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            current: Arc::clone(&self.current),
        }
    }
}

impl<T: Debug> Debug for HandleRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleRef")
            .field("id", &self.id)
            .field("current", &*self.current.read())
            .finish()
    }
}

type RefCallback<T> = Arc<dyn Fn(Option<T>) + Send + Sync>;

/// Where an imperative handle is delivered.
pub enum RefTarget<T> {
    /// Store the handle in a shared cell.
    Cell(HandleRef<T>),
    /// Hand the handle to a function.
    Callback(RefCallback<T>),
}

impl<T> RefTarget<T> {
    /// A callback target.
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(Option<T>) + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(f))
    }

    /// Deliver a handle, or clear it with `None`.
    pub fn assign(&self, value: Option<T>) {
        match self {
            Self::Cell(cell) => {
                cell.replace(value);
            }
            Self::Callback(f) => f(value),
        }
    }

    /// Whether both targets deliver to the same place.
    pub fn same_target(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Cell(a), Self::Cell(b)) => a.same_cell(b),
            (Self::Callback(a), Self::Callback(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Address-based identity, stable across clones.
    pub fn key(&self) -> usize {
        match self {
            Self::Cell(cell) => cell.key(),
            Self::Callback(f) => Arc::as_ptr(f).cast::<()>() as usize,
        }
    }
}

impl<T> Clone for RefTarget<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Cell(cell) => Self::Cell(cell.clone()),
            Self::Callback(f) => Self::Callback(Arc::clone(f)),
        }
    }
}

impl<T> From<HandleRef<T>> for RefTarget<T> {
    fn from(cell: HandleRef<T>) -> Self {
        Self::Cell(cell)
    }
}

impl<T> From<&HandleRef<T>> for RefTarget<T> {
    fn from(cell: &HandleRef<T>) -> Self {
        Self::Cell(cell.clone())
    }
}

impl<T> Debug for RefTarget<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell(cell) => f.debug_tuple("Cell").field(&cell.id).finish(),
            Self::Callback(_) => f.write_str("Callback"),
        }
    }
}
