//! Comparison Lists
//!
//! A comparison list decides whether a hook's function runs again. The host
//! keeps the list from the previous render at each call site and compares it
//! element by element against the new one.
//!
//! # Equality
//!
//! Elements are compared shallowly with `PartialEq`. For values whose
//! equality should be "same allocation" rather than "same contents", wrap
//! them in [`Identity`].
//!
//! # Fallback
//!
//! When a caller gives no explicit comparison list, the argument list is the
//! comparison list. That rule is encoded in the type system: [`Inherit`]
//! resolves to a clone of the arguments, [`Explicit`] resolves to the list
//! the caller supplied. See [`Comparison`].

use std::fmt::{self, Debug};
use std::ops::Deref;
use std::sync::Arc;

/// A list of values compared against the previous render's list.
pub trait Deps: Clone + Send + Sync + 'static {
    /// Returns true when every element equals the corresponding element of
    /// `previous`.
    fn shallow_eq(&self, previous: &Self) -> bool;

    /// Number of elements in the list.
    fn len(&self) -> usize;

    /// Whether the list has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! impl_deps_for_tuple {
    ($len:expr; $($ty:ident $idx:tt),*) => {
        impl<$($ty,)*> Deps for ($($ty,)*)
        where
            $($ty: PartialEq + Clone + Send + Sync + 'static,)*
        {
            #[allow(unused_variables)]
            fn shallow_eq(&self, previous: &Self) -> bool {
                true $(&& self.$idx == previous.$idx)*
            }

            fn len(&self) -> usize {
                $len
            }
        }
    };
}

impl_deps_for_tuple!(0;);
impl_deps_for_tuple!(1; A 0);
impl_deps_for_tuple!(2; A 0, B 1);
impl_deps_for_tuple!(3; A 0, B 1, C 2);
impl_deps_for_tuple!(4; A 0, B 1, C 2, D 3);
impl_deps_for_tuple!(5; A 0, B 1, C 2, D 3, E 4);
impl_deps_for_tuple!(6; A 0, B 1, C 2, D 3, E 4, G 5);
impl_deps_for_tuple!(7; A 0, B 1, C 2, D 3, E 4, G 5, H 6);
impl_deps_for_tuple!(8; A 0, B 1, C 2, D 3, E 4, G 5, H 6, I 7);
impl_deps_for_tuple!(9; A 0, B 1, C 2, D 3, E 4, G 5, H 6, I 7, J 8);
impl_deps_for_tuple!(10; A 0, B 1, C 2, D 3, E 4, G 5, H 6, I 7, J 8, K 9);
impl_deps_for_tuple!(11; A 0, B 1, C 2, D 3, E 4, G 5, H 6, I 7, J 8, K 9, L 10);
impl_deps_for_tuple!(12; A 0, B 1, C 2, D 3, E 4, G 5, H 6, I 7, J 8, K 9, L 10, M 11);

/// Runtime-length lists. A change in length counts as a change.
impl<T> Deps for Vec<T>
where
    T: PartialEq + Clone + Send + Sync + 'static,
{
    fn shallow_eq(&self, previous: &Self) -> bool {
        self.len() == previous.len() && self.iter().zip(previous).all(|(a, b)| a == b)
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl<T, const N: usize> Deps for [T; N]
where
    T: PartialEq + Clone + Send + Sync + 'static,
{
    fn shallow_eq(&self, previous: &Self) -> bool {
        self.iter().zip(previous).all(|(a, b)| a == b)
    }

    fn len(&self) -> usize {
        N
    }
}

/// A comparison list that never matches, so the function runs every render.
///
/// This is what a host does for a hook registered with no dependency list
/// at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EveryRender;

impl Deps for EveryRender {
    fn shallow_eq(&self, _previous: &Self) -> bool {
        false
    }

    fn len(&self) -> usize {
        0
    }
}

/// A value compared by allocation identity instead of by contents.
///
/// Two `Identity` values are equal only when they point at the same `Arc`.
/// Cloning keeps the identity.
pub struct Identity<T: ?Sized>(Arc<T>);

impl<T> Identity<T> {
    /// Allocate a new identity around `value`.
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl<T: ?Sized> Identity<T> {
    /// Borrow the shared allocation.
    pub fn as_arc(&self) -> &Arc<T> {
        &self.0
    }
}

impl<T: ?Sized> From<Arc<T>> for Identity<T> {
    fn from(value: Arc<T>) -> Self {
        Self(value)
    }
}

impl<T: ?Sized> Clone for Identity<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> PartialEq for Identity<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized> Eq for Identity<T> {}

impl<T: ?Sized> Deref for Identity<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + Debug> Debug for Identity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Identity").field(&&*self.0).finish()
    }
}

/// No explicit comparison list: compare the argument list itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inherit;

/// An explicit comparison list, independent of the argument list.
#[derive(Debug, Clone, Copy)]
pub struct Explicit<D>(pub D);

/// Resolves the comparison list that reaches the host for argument list `A`.
pub trait Comparison<A> {
    /// The list handed to the host.
    type Deps: Deps;

    /// Produce the effective comparison list.
    fn resolve(self, args: &A) -> Self::Deps;
}

impl<A: Deps> Comparison<A> for Inherit {
    type Deps = A;

    fn resolve(self, args: &A) -> A {
        args.clone()
    }
}

impl<A, D: Deps> Comparison<A> for Explicit<D> {
    type Deps = D;

    fn resolve(self, _args: &A) -> D {
        self.0
    }
}
