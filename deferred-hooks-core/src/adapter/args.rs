//! Positional Argument Lists
//!
//! An argument list is a tuple whose arity and element types are fixed at the
//! call site. `()` is the empty list, `(count,)` a list of one, and so on up
//! to twelve elements.
//!
//! Two application modes exist:
//!
//! - [`ApplyOnce`] moves every element into an `FnOnce`. Effects, memoized
//!   values and imperative handles run their function at most once per
//!   produced closure, so they use this.
//! - [`Apply`] clones every element into an `Fn`. A memoized callback may be
//!   called any number of times with the same captured arguments.
//!
//! Elements are always passed in tuple order, and nothing beyond the tuple is
//! ever passed.

/// A tuple usable as a positional argument list.
pub trait Args {
    /// Number of positional arguments.
    const ARITY: usize;
}

/// Consume an argument list by calling `F` with its elements.
pub trait ApplyOnce<F>: Args {
    /// What `F` returns.
    type Output;

    /// Call `f` with the elements of `self`, in order.
    fn apply_once(self, f: F) -> Self::Output;
}

/// Call `F` with clones of an argument list's elements.
pub trait Apply<F>: Args {
    /// What `F` returns.
    type Output;

    /// Call `f` with clones of the elements of `self`, in order.
    fn apply(&self, f: &F) -> Self::Output;
}

macro_rules! impl_args {
    ($arity:expr; $($ty:ident $idx:tt),*) => {
        impl<$($ty,)*> Args for ($($ty,)*) {
            const ARITY: usize = $arity;
        }

        impl<Func, Out, $($ty,)*> ApplyOnce<Func> for ($($ty,)*)
        where
            Func: FnOnce($($ty),*) -> Out,
        {
            type Output = Out;

            fn apply_once(self, f: Func) -> Out {
                f($(self.$idx),*)
            }
        }

        impl<Func, Out, $($ty: Clone,)*> Apply<Func> for ($($ty,)*)
        where
            Func: Fn($($ty),*) -> Out,
        {
            type Output = Out;

            fn apply(&self, f: &Func) -> Out {
                f($(self.$idx.clone()),*)
            }
        }
    };
}

impl_args!(0;);
impl_args!(1; A 0);
impl_args!(2; A 0, B 1);
impl_args!(3; A 0, B 1, C 2);
impl_args!(4; A 0, B 1, C 2, D 3);
impl_args!(5; A 0, B 1, C 2, D 3, E 4);
impl_args!(6; A 0, B 1, C 2, D 3, E 4, G 5);
impl_args!(7; A 0, B 1, C 2, D 3, E 4, G 5, H 6);
impl_args!(8; A 0, B 1, C 2, D 3, E 4, G 5, H 6, I 7);
impl_args!(9; A 0, B 1, C 2, D 3, E 4, G 5, H 6, I 7, J 8);
impl_args!(10; A 0, B 1, C 2, D 3, E 4, G 5, H 6, I 7, J 8, K 9);
impl_args!(11; A 0, B 1, C 2, D 3, E 4, G 5, H 6, I 7, J 8, K 9, L 10);
impl_args!(12; A 0, B 1, C 2, D 3, E 4, G 5, H 6, I 7, J 8, K 9, L 10, M 11);
