use crate::shim::cell::UnsafeCell;
use core::fmt;
use core::ptr::NonNull;

/// 侵入式链表的链接节点，必须嵌入在数据结构中使用。
///
/// A `Link` records the list membership of exactly one object: a back and a
/// forward pointer to neighbouring links plus an explicit membership flag.
/// It knows nothing about the type that embeds it; the [`Adapter`] of the
/// list maps between the two.
///
/// The sole element of a one-element list has neither neighbour, so
/// membership is tracked by the flag rather than inferred from the pointers.
///
/// `Link` is `Send` but deliberately not `Sync`: lists mutate links through
/// shared references, so an object embedding a `Link` cannot be shared
/// across threads.
///
/// [`Adapter`]: crate::Adapter
pub struct Link {
    // 使用 UnsafeCell 允许在只有 &Link 引用时修改指针
    pub(crate) prev: UnsafeCell<Option<NonNull<Link>>>,
    pub(crate) next: UnsafeCell<Option<NonNull<Link>>>,
    pub(crate) linked: UnsafeCell<bool>,
}

impl Link {
    /// Creates an unlinked record.
    #[cfg(not(feature = "loom"))]
    pub const fn new() -> Self {
        Self {
            prev: UnsafeCell::new(None),
            next: UnsafeCell::new(None),
            linked: UnsafeCell::new(false),
        }
    }

    /// Creates an unlinked record.
    #[cfg(feature = "loom")]
    pub fn new() -> Self {
        Self {
            prev: UnsafeCell::new(None),
            next: UnsafeCell::new(None),
            linked: UnsafeCell::new(false),
        }
    }

    /// 检查节点是否链接在某个列表中。
    #[inline]
    pub fn is_linked(&self) -> bool {
        unsafe { self.linked.with(|l| *l) }
    }

    /// Clears both neighbour pointers and the membership flag without
    /// touching the neighbours themselves.
    ///
    /// # Safety
    /// No live list may still reach this record. Intended for records whose
    /// list was leaked with `mem::forget`.
    pub unsafe fn force_unlink(&self) {
        self.reset();
    }

    #[inline]
    pub(crate) fn prev(&self) -> Option<NonNull<Link>> {
        unsafe { self.prev.with(|p| *p) }
    }

    #[inline]
    pub(crate) fn next(&self) -> Option<NonNull<Link>> {
        unsafe { self.next.with(|n| *n) }
    }

    #[inline]
    pub(crate) fn set_prev(&self, prev: Option<NonNull<Link>>) {
        unsafe { self.prev.with_mut(|p| *p = prev) }
    }

    #[inline]
    pub(crate) fn set_next(&self, next: Option<NonNull<Link>>) {
        unsafe { self.next.with_mut(|n| *n = next) }
    }

    /// Marks the record as adopted by a list.
    #[inline]
    pub(crate) fn mark_linked(&self) {
        unsafe { self.linked.with_mut(|l| *l = true) }
    }

    #[inline]
    pub(crate) fn reset(&self) {
        self.set_prev(None);
        self.set_next(None);
        unsafe { self.linked.with_mut(|l| *l = false) }
    }
}

impl Default for Link {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("linked", &self.is_linked())
            .field("prev", &self.prev())
            .field("next", &self.next())
            .finish()
    }
}

// 链接节点只在持有它的线程上被修改
unsafe impl Send for Link {}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unlinked() {
        let link = Link::new();
        assert!(!link.is_linked());
        assert!(link.prev().is_none());
        assert!(link.next().is_none());

        let link = Link::default();
        assert!(!link.is_linked());
    }

    #[test]
    fn test_reset_clears_everything() {
        let a = Link::new();
        let b = Link::new();

        a.set_next(Some(NonNull::from(&b)));
        b.set_prev(Some(NonNull::from(&a)));
        a.mark_linked();
        b.mark_linked();
        assert!(a.is_linked());

        unsafe { a.force_unlink() };
        assert!(!a.is_linked());
        assert!(a.next().is_none());
        // force_unlink never touches the neighbour
        assert_eq!(b.prev(), Some(NonNull::from(&a)));
    }

    #[test]
    fn test_debug_shows_state() {
        let link = Link::new();
        let out = format!("{:?}", link);
        assert!(out.contains("linked: false"));
    }
}
