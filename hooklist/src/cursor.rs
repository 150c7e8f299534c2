use crate::adapter::Adapter;
use crate::error::ListError;
use crate::link::Link;
use crate::list::LinkedList;
use core::ptr::NonNull;
use tracing::trace;

/// A read-only position in a [`LinkedList`].
///
/// A cursor either points at an element or sits at the end position, which
/// lies past the tail and before the head. Moving past either end lands on
/// the end position; moving from the end position stays there.
///
/// Two cursors are equal when they point at the same link, or are both at
/// the end position.
pub struct Cursor<'l, 'a, A: Adapter> {
    list: &'l LinkedList<'a, A>,
    current: Option<NonNull<Link>>, // 当前指向的 Link
}

impl<'l, 'a, A: Adapter> Cursor<'l, 'a, A> {
    #[inline]
    pub(crate) fn new(list: &'l LinkedList<'a, A>, current: Option<NonNull<Link>>) -> Self {
        Self { list, current }
    }

    /// 获取当前指向的元素引用
    #[inline]
    pub fn get(&self) -> Option<&'a A::Value> {
        self.current.map(|link| unsafe { self.list.value_of(link) })
    }

    #[inline]
    pub fn peek_next(&self) -> Option<&'a A::Value> {
        let next = self.current.and_then(|link| unsafe { link.as_ref().next() })?;
        Some(unsafe { self.list.value_of(next) })
    }

    #[inline]
    pub fn peek_prev(&self) -> Option<&'a A::Value> {
        let prev = self.current.and_then(|link| unsafe { link.as_ref().prev() })?;
        Some(unsafe { self.list.value_of(prev) })
    }

    // 移动到下一个
    #[inline]
    pub fn move_next(&mut self) {
        if let Some(curr) = self.current {
            self.current = unsafe { curr.as_ref().next() };
        }
    }

    // 移动到上一个
    #[inline]
    pub fn move_prev(&mut self) {
        if let Some(curr) = self.current {
            self.current = unsafe { curr.as_ref().prev() };
        }
    }

    /// `true` at the end position.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.current.is_none()
    }
}

impl<'l, 'a, A: Adapter> Clone for Cursor<'l, 'a, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'l, 'a, A: Adapter> Copy for Cursor<'l, 'a, A> {}

impl<'l, 'a, A: Adapter> PartialEq for Cursor<'l, 'a, A> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<'l, 'a, A: Adapter> Eq for Cursor<'l, 'a, A> {}

impl<'l, 'a, A: Adapter> core::fmt::Debug for Cursor<'l, 'a, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor").field("current", &self.current).finish()
    }
}

/// A position in a [`LinkedList`] with exclusive access to the list.
///
/// Besides navigation, this is where positional edits live: insertion
/// before the cursor, removal at the cursor and the splice family that
/// moves elements in from another list.
pub struct CursorMut<'l, 'a, A: Adapter> {
    list: &'l mut LinkedList<'a, A>,
    current: Option<NonNull<Link>>, // 当前指向的 Link
}

impl<'l, 'a, A: Adapter> CursorMut<'l, 'a, A> {
    #[inline]
    pub(crate) fn new(list: &'l mut LinkedList<'a, A>, current: Option<NonNull<Link>>) -> Self {
        Self { list, current }
    }

    /// 获取当前指向的元素引用
    #[inline]
    pub fn get(&self) -> Option<&'a A::Value> {
        self.current.map(|link| unsafe { self.list.value_of(link) })
    }

    #[inline]
    pub fn peek_next(&self) -> Option<&'a A::Value> {
        self.as_cursor().peek_next()
    }

    #[inline]
    pub fn peek_prev(&self) -> Option<&'a A::Value> {
        self.as_cursor().peek_prev()
    }

    // 移动到下一个
    #[inline]
    pub fn move_next(&mut self) {
        if let Some(curr) = self.current {
            self.current = unsafe { curr.as_ref().next() };
        }
    }

    // 移动到上一个
    #[inline]
    pub fn move_prev(&mut self) {
        if let Some(curr) = self.current {
            self.current = unsafe { curr.as_ref().prev() };
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.current.is_none()
    }

    /// A read-only view of the same position.
    #[inline]
    pub fn as_cursor(&self) -> Cursor<'_, 'a, A> {
        Cursor::new(self.list, self.current)
    }

    /// The list this cursor edits.
    #[inline]
    pub fn list(&self) -> &LinkedList<'a, A> {
        self.list
    }

    /// Links `value` immediately before the cursor. At the head this is a
    /// `push_front`, at the end position a `push_back`. The cursor keeps
    /// pointing at the same element.
    pub fn insert_before(&mut self, value: &'a A::Value) -> Result<(), ListError> {
        match self.current {
            None => self.list.push_back(value),
            Some(pos) if Some(pos) == self.list.head => self.list.push_front(value),
            Some(pos) => {
                let link = self.adopt(value)?;
                unsafe { self.list.link_run_before(link, link, 1, Some(pos)) };
                Ok(())
            }
        }
    }

    /// Links `value` immediately after the cursor. At the end position the
    /// value becomes the new head.
    pub fn insert_after(&mut self, value: &'a A::Value) -> Result<(), ListError> {
        match self.current {
            None => self.list.push_front(value),
            Some(pos) => {
                let link = self.adopt(value)?;
                let after = unsafe { pos.as_ref().next() };
                unsafe { self.list.link_run_before(link, link, 1, after) };
                Ok(())
            }
        }
    }

    /// 移除当前指向的元素，并将游标移动到下一个元素。
    ///
    /// Returns the unlinked element, or [`ListError::InvalidPosition`] at
    /// the end position.
    #[inline]
    pub fn remove(&mut self) -> Result<&'a A::Value, ListError> {
        let current = self.current.ok_or(ListError::InvalidPosition)?;
        unsafe {
            self.current = self.list.unlink_node(current);
            Ok(self.list.value_of(current))
        }
    }

    /// Moves every element of `other` to just before the cursor, or to the
    /// tail at the end position, in O(1). `other` is left empty.
    pub fn splice_before(&mut self, other: &mut LinkedList<'a, A>) {
        let Some((first, last, count)) = other.take_all() else {
            return;
        };
        trace!(count, "splicing list before cursor");
        unsafe { self.list.link_run_before(first, last, count, self.current) };
    }

    /// Moves the element under `source` to just before this cursor in O(1).
    /// `source` advances to the element that followed the moved one.
    pub fn splice_one_before(
        &mut self,
        source: &mut CursorMut<'_, 'a, A>,
    ) -> Result<&'a A::Value, ListError> {
        let Some(link) = source.current else {
            trace!("splice_one_before: source cursor at end position");
            return Err(ListError::InvalidPosition);
        };
        unsafe {
            source.current = link.as_ref().next();
            source.list.unlink_run(link, link, 1);
            self.list.link_run_before(link, link, 1, self.current);
            Ok(self.list.value_of(link))
        }
    }

    /// Moves the run that starts at `source` and stops before `last` (the
    /// source's tail when `last` is `None`) to just before this cursor.
    ///
    /// The run's tail and length are found in a single forward walk, so this
    /// is O(k) in the length of the run. If `last` is not reached before the
    /// end of the source list, nothing is moved and
    /// [`ListError::InvalidPosition`] is returned. On success `source` is left
    /// at `last` and the number of moved elements is returned.
    pub fn splice_range_before(
        &mut self,
        source: &mut CursorMut<'_, 'a, A>,
        last: Option<&'a A::Value>,
    ) -> Result<usize, ListError> {
        let stop = last.map(|value| self.list.link_of(value));

        let Some(first) = source.current else {
            return match stop {
                None => Ok(0),
                Some(_) => Err(ListError::InvalidPosition),
            };
        };
        if Some(first) == stop {
            return Ok(0);
        }

        // 单次遍历：同时求出区间尾部与长度
        let mut run_tail = first;
        let mut count = 1;
        loop {
            let next = unsafe { run_tail.as_ref().next() };
            if next == stop {
                break;
            }
            match next {
                Some(next) => {
                    run_tail = next;
                    count += 1;
                }
                None => {
                    trace!(walked = count, "splice_range_before: range end not found");
                    return Err(ListError::InvalidPosition);
                }
            }
        }

        trace!(count, "splicing range before cursor");
        unsafe {
            source.list.unlink_run(first, run_tail, count);
            self.list.link_run_before(first, run_tail, count, self.current);
        }
        source.current = stop;
        Ok(count)
    }

    fn adopt(&self, value: &'a A::Value) -> Result<NonNull<Link>, ListError> {
        let link_ptr = self.list.link_of(value);
        let link = unsafe { link_ptr.as_ref() };
        if link.is_linked() {
            trace!(link = ?link_ptr, "rejecting insert of a linked element");
            return Err(ListError::AlreadyLinked);
        }
        link.mark_linked();
        Ok(link_ptr)
    }
}

impl<'l, 'a, A: Adapter> core::fmt::Debug for CursorMut<'l, 'a, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CursorMut")
            .field("current", &self.current)
            .field("len", &self.list.len)
            .finish()
    }
}
