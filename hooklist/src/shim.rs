//! Cell shim so that `loom` can track every access to link fields.

pub(crate) mod cell {
    #[cfg(not(feature = "loom"))]
    #[repr(transparent)]
    pub(crate) struct UnsafeCell<T> {
        cell: core::cell::UnsafeCell<T>,
    }

    #[cfg(not(feature = "loom"))]
    impl<T> UnsafeCell<T> {
        pub(crate) const fn new(value: T) -> Self {
            Self {
                cell: core::cell::UnsafeCell::new(value),
            }
        }

        #[inline(always)]
        pub(crate) unsafe fn with<F, R>(&self, f: F) -> R
        where
            F: FnOnce(&T) -> R,
        {
            unsafe { f(&*self.cell.get()) }
        }

        #[inline(always)]
        pub(crate) unsafe fn with_mut<F, R>(&self, f: F) -> R
        where
            F: FnOnce(&mut T) -> R,
        {
            unsafe { f(&mut *self.cell.get()) }
        }
    }

    #[cfg(feature = "loom")]
    #[repr(transparent)]
    pub(crate) struct UnsafeCell<T> {
        inner: loom::cell::UnsafeCell<T>,
    }

    #[cfg(feature = "loom")]
    impl<T> UnsafeCell<T> {
        pub(crate) fn new(value: T) -> Self {
            Self {
                inner: loom::cell::UnsafeCell::new(value),
            }
        }

        #[inline(always)]
        pub(crate) unsafe fn with<F, R>(&self, f: F) -> R
        where
            F: FnOnce(&T) -> R,
        {
            // SAFETY: the caller upholds the aliasing rules; loom records the
            // immutable access for the duration of the closure.
            self.inner.with(|ptr| unsafe { f(&*ptr) })
        }

        #[inline(always)]
        pub(crate) unsafe fn with_mut<F, R>(&self, f: F) -> R
        where
            F: FnOnce(&mut T) -> R,
        {
            // SAFETY: as above, for the mutable access.
            self.inner.with_mut(|ptr| unsafe { f(&mut *ptr) })
        }
    }
}
