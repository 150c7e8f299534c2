use crate::adapter::Adapter;
use crate::cursor::{Cursor, CursorMut};
use crate::error::ListError;
use crate::iter::Iter;
use crate::link::Link;
use core::marker::PhantomData;
use core::mem;
use core::ptr::{self, NonNull};
use tracing::trace;

/// An intrusive doubly linked list over caller-owned objects.
///
/// The list stores only the head, the tail and a count. Elements are
/// borrowed as `&'a A::Value` for as long as the list exists, so the borrow
/// checker guarantees that no linked object is moved or dropped while the
/// list can still reach it. Dropping the list unlinks every element; the
/// objects themselves are never touched beyond their [`Link`].
pub struct LinkedList<'a, A: Adapter> {
    pub(crate) head: Option<NonNull<Link>>,
    pub(crate) tail: Option<NonNull<Link>>,
    pub(crate) adapter: A,
    pub(crate) len: usize,
    _marker: PhantomData<&'a A::Value>,
}

impl<'a, A: Adapter> LinkedList<'a, A> {
    #[inline]
    pub const fn new(adapter: A) -> Self {
        Self {
            head: None,
            tail: None,
            adapter,
            len: 0,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Returns the first element, or [`ListError::Empty`].
    #[inline]
    pub fn front(&self) -> Result<&'a A::Value, ListError> {
        self.head
            .map(|head| unsafe { self.value_of(head) })
            .ok_or(ListError::Empty)
    }

    /// Returns the last element, or [`ListError::Empty`].
    #[inline]
    pub fn back(&self) -> Result<&'a A::Value, ListError> {
        self.tail
            .map(|tail| unsafe { self.value_of(tail) })
            .ok_or(ListError::Empty)
    }

    /// 将节点添加到头部
    pub fn push_front(&mut self, value: &'a A::Value) -> Result<(), ListError> {
        let link = self.adopt(value)?;
        unsafe { self.link_run_before(link, link, 1, self.head) };
        Ok(())
    }

    /// 将节点添加到尾部
    pub fn push_back(&mut self, value: &'a A::Value) -> Result<(), ListError> {
        let link = self.adopt(value)?;
        unsafe { self.link_run_before(link, link, 1, None) };
        Ok(())
    }

    /// 从头部移除节点
    ///
    /// Returns `None` on an empty list instead of failing, so draining loops
    /// can be written as `while let Some(v) = list.pop_front()`.
    #[inline]
    pub fn pop_front(&mut self) -> Option<&'a A::Value> {
        let head = self.head?;
        unsafe {
            self.unlink_node(head);
            Some(self.value_of(head))
        }
    }

    /// 从尾部移除节点
    #[inline]
    pub fn pop_back(&mut self) -> Option<&'a A::Value> {
        let tail = self.tail?;
        unsafe {
            self.unlink_node(tail);
            Some(self.value_of(tail))
        }
    }

    /// Unlinks every element. O(n).
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        trace!(len = self.len, "clearing list");
        while self.pop_back().is_some() {}
    }

    /// Exchanges the contents of two lists in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.head, &mut other.head);
        mem::swap(&mut self.tail, &mut other.tail);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Appends the whole of `other` after the tail of this list in O(1),
    /// leaving `other` empty. Relative order is not interleaved: this is a
    /// concatenation, not a sorted merge.
    pub fn merge(&mut self, other: &mut Self) {
        let Some((first, last, count)) = other.take_all() else {
            return;
        };
        trace!(count, len = self.len, "merging list");
        unsafe { self.link_run_before(first, last, count, None) };
    }

    /// Unlinks every element for which `pred` returns `true`, visiting each
    /// element exactly once from front to back. Returns how many were removed.
    pub fn remove_if<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&A::Value) -> bool,
    {
        let mut removed = 0;
        let mut current = self.head;

        while let Some(link_ptr) = current {
            let value = unsafe { self.value_of(link_ptr) };
            if pred(value) {
                current = unsafe { self.unlink_node(link_ptr) };
                removed += 1;
            } else {
                current = unsafe { link_ptr.as_ref().next() };
            }
        }

        if removed > 0 {
            trace!(removed, len = self.len, "remove_if");
        }
        removed
    }

    /// Removes consecutive duplicates, keeping the first of each run.
    pub fn unique(&mut self) -> usize
    where
        A::Value: PartialEq,
    {
        self.unique_by(|kept, candidate| kept == candidate)
    }

    /// Removes every element for which `same(previous, current)` holds,
    /// where `previous` is the closest element before it that was kept.
    pub fn unique_by<F>(&mut self, mut same: F) -> usize
    where
        F: FnMut(&A::Value, &A::Value) -> bool,
    {
        let Some(mut kept) = self.head else {
            return 0;
        };
        let mut removed = 0;
        let mut current = unsafe { kept.as_ref().next() };

        while let Some(link_ptr) = current {
            let (previous, candidate) = unsafe { (self.value_of(kept), self.value_of(link_ptr)) };
            if same(previous, candidate) {
                current = unsafe { self.unlink_node(link_ptr) };
                removed += 1;
            } else {
                kept = link_ptr;
                current = unsafe { link_ptr.as_ref().next() };
            }
        }

        if removed > 0 {
            trace!(removed, len = self.len, "unique");
        }
        removed
    }

    /// Returns `true` if `value` is an element of this list. O(n).
    pub fn contains(&self, value: &A::Value) -> bool {
        let target = unsafe { self.adapter.get_link(NonNull::from(value)) };
        let mut current = self.head;
        while let Some(link_ptr) = current {
            if link_ptr == target {
                return true;
            }
            current = unsafe { link_ptr.as_ref().next() };
        }
        false
    }

    /// Unlinks `value` from this list in O(1). Returns `false` if it was not
    /// linked at all.
    ///
    /// # Safety
    /// If `value` is linked, it must be linked into this list.
    pub unsafe fn remove(&mut self, value: &A::Value) -> bool {
        let link = self.adapter.link(value);
        if !link.is_linked() {
            return false;
        }
        unsafe { self.unlink_node(NonNull::from(link)) };
        true
    }

    /// Detaches `value` from its neighbours without reference to any list.
    ///
    /// The neighbours are relinked to each other and the record is cleared,
    /// but no list's count, head or tail is updated. This is only meant for
    /// chains that no live list tracks; use [`LinkedList::remove`] for
    /// elements of a list. No-op if `value` is not linked.
    ///
    /// # Safety
    /// No live list may have `value` as its head or tail or count it in its
    /// length, and every neighbour of `value` must still be alive.
    pub unsafe fn unlink(adapter: &A, value: &A::Value) {
        let link = adapter.link(value);
        if !link.is_linked() {
            return;
        }
        let prev = link.prev();
        let next = link.next();
        unsafe {
            if let Some(prev_ptr) = prev {
                prev_ptr.as_ref().set_next(next);
            }
            if let Some(next_ptr) = next {
                next_ptr.as_ref().set_prev(prev);
            }
        }
        link.reset();
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, 'a, A> {
        Iter::new(self)
    }

    /// 获取头部 Cursor (只读)
    #[inline]
    pub fn cursor(&self) -> Cursor<'_, 'a, A> {
        Cursor::new(self, self.head)
    }

    #[inline]
    pub fn cursor_back(&self) -> Cursor<'_, 'a, A> {
        Cursor::new(self, self.tail)
    }

    /// Read-only cursor at the end position.
    #[inline]
    pub fn cursor_end(&self) -> Cursor<'_, 'a, A> {
        Cursor::new(self, None)
    }

    /// 获取头部 Cursor (可变)
    #[inline]
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, 'a, A> {
        let head = self.head;
        CursorMut::new(self, head)
    }

    #[inline]
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, 'a, A> {
        let tail = self.tail;
        CursorMut::new(self, tail)
    }

    /// Mutable cursor at the end position; inserting there appends.
    #[inline]
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, 'a, A> {
        CursorMut::new(self, None)
    }

    /// 根据数据指针创建 Cursor，用于 O(1) 定位。
    ///
    /// # Safety
    /// `value` must be linked into this list.
    #[inline]
    pub unsafe fn cursor_mut_from_value(&mut self, value: &'a A::Value) -> CursorMut<'_, 'a, A> {
        let link = unsafe { self.adapter.get_link(NonNull::from(value)) };
        CursorMut::new(self, Some(link))
    }

    /// Asserts as many of the list's invariants as possible, panicking on
    /// the first violation. O(n).
    pub fn assert_valid(&self) {
        let Some(head) = self.head else {
            assert!(
                self.tail.is_none(),
                "if the list's head is null, the tail must also be null"
            );
            assert_eq!(self.len, 0, "an empty list must have a zero length");
            return;
        };
        let tail = self
            .tail
            .unwrap_or_else(|| panic!("if the list has a head, it must also have a tail"));

        unsafe {
            assert_eq!(head.as_ref().prev(), None, "head must not have a prev link");
            assert_eq!(tail.as_ref().next(), None, "tail must not have a next link");
        }

        let mut count = 0;
        let mut prev = None;
        let mut current = Some(head);
        while let Some(link_ptr) = current {
            let link = unsafe { link_ptr.as_ref() };
            assert!(link.is_linked(), "reachable link is not marked linked; link={:?}", link);
            assert_eq!(link.prev(), prev, "broken back link; link={:?}", link);
            assert_ne!(link.next(), Some(link_ptr), "link points to itself; link={:?}", link);
            count += 1;
            assert!(count <= self.len, "more links reachable than the list length");
            prev = current;
            current = link.next();
        }

        assert_eq!(prev, Some(tail), "walking forward from head must end at tail");
        assert_eq!(count, self.len, "reachable links must match the list length");
    }

    /// Checks that `value` is free to join a list and returns its link.
    fn adopt(&self, value: &'a A::Value) -> Result<NonNull<Link>, ListError> {
        let link_ptr = unsafe { self.adapter.get_link(NonNull::from(value)) };
        let link = unsafe { link_ptr.as_ref() };
        if link.is_linked() {
            trace!(link = ?link_ptr, "rejecting insert of a linked element");
            return Err(ListError::AlreadyLinked);
        }
        link.mark_linked();
        Ok(link_ptr)
    }

    #[inline]
    pub(crate) unsafe fn value_of(&self, link: NonNull<Link>) -> &'a A::Value {
        unsafe { self.adapter.get_value(link).as_ref() }
    }

    #[inline]
    pub(crate) fn link_of(&self, value: &'a A::Value) -> NonNull<Link> {
        unsafe { self.adapter.get_link(NonNull::from(value)) }
    }

    /// Empties the list and hands back its chain as `(first, last, count)`.
    pub(crate) fn take_all(&mut self) -> Option<(NonNull<Link>, NonNull<Link>, usize)> {
        let first = self.head.take()?;
        let last = self.tail.take()?;
        let count = mem::replace(&mut self.len, 0);
        Some((first, last, count))
    }

    /// Detaches `link_ptr`, repairs its neighbours and clears it. Returns the
    /// record that followed it.
    ///
    /// # Safety
    /// `link_ptr` must be an element of this list.
    pub(crate) unsafe fn unlink_node(&mut self, link_ptr: NonNull<Link>) -> Option<NonNull<Link>> {
        let link = unsafe { link_ptr.as_ref() };
        let next = link.next();
        unsafe { self.unlink_run(link_ptr, link_ptr, 1) };
        // 清理被移除节点的连接状态
        link.reset();
        next
    }

    /// Cuts the run `first..=last` of `count` records out of this list. The
    /// run keeps its inner links and membership flags, and its outer ends are
    /// cleared.
    ///
    /// # Safety
    /// `first..=last` must be a run of exactly `count` elements of this list.
    pub(crate) unsafe fn unlink_run(&mut self, first: NonNull<Link>, last: NonNull<Link>, count: usize) {
        unsafe {
            let before = first.as_ref().prev();
            let after = last.as_ref().next();

            match before {
                Some(prev_ptr) => prev_ptr.as_ref().set_next(after),
                None => self.head = after,
            }
            match after {
                Some(next_ptr) => next_ptr.as_ref().set_prev(before),
                None => self.tail = before,
            }

            first.as_ref().set_prev(None);
            last.as_ref().set_next(None);
        }
        self.len -= count;
    }

    /// Links a detached run `first..=last` of `count` records immediately
    /// before `pos`, or at the tail when `pos` is `None`.
    ///
    /// # Safety
    /// The run must be marked linked and reachable from no list, and `pos`
    /// must be an element of this list.
    pub(crate) unsafe fn link_run_before(
        &mut self,
        first: NonNull<Link>,
        last: NonNull<Link>,
        count: usize,
        pos: Option<NonNull<Link>>,
    ) {
        unsafe {
            let before = match pos {
                Some(pos_ptr) => pos_ptr.as_ref().prev(),
                None => self.tail,
            };

            first.as_ref().set_prev(before);
            last.as_ref().set_next(pos);

            match before {
                Some(prev_ptr) => prev_ptr.as_ref().set_next(Some(first)),
                None => self.head = Some(first),
            }
            match pos {
                Some(pos_ptr) => pos_ptr.as_ref().set_prev(Some(last)),
                None => self.tail = Some(last),
            }
        }
        self.len += count;
    }
}

impl<'a, A: Adapter + Default> Default for LinkedList<'a, A> {
    fn default() -> Self {
        Self::new(A::default())
    }
}

impl<'a, A: Adapter> Drop for LinkedList<'a, A> {
    fn drop(&mut self) {
        // 清理链表防止 Link 数据残留
        self.clear();
    }
}

impl<'l, 'a, A: Adapter> IntoIterator for &'l LinkedList<'a, A> {
    type Item = &'a A::Value;
    type IntoIter = Iter<'l, 'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, A: Adapter> core::fmt::Debug for LinkedList<'a, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LinkedList")
            .field("len", &self.len)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}

impl<'a, A: Adapter> PartialEq for LinkedList<'a, A>
where
    A::Value: PartialEq,
{
    /// Element-wise comparison of the linked values.
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other) || (self.len == other.len && self.iter().eq(other.iter()))
    }
}
