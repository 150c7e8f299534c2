//! Stable merge sort over the link chain.
//!
//! The chain is treated as singly linked while it is being sorted: runs are
//! split by length, sorted recursively, and merged by relinking `next`
//! pointers only. The `prev` pointers and the tail are rebuilt in a single
//! pass at the end. No element is copied and nothing is allocated.

use crate::adapter::Adapter;
use crate::link::Link;
use crate::list::LinkedList;
use core::cmp::Ordering;
use core::ptr::NonNull;
use tracing::trace;

impl<'a, A: Adapter> LinkedList<'a, A> {
    /// Sorts the list by the values' natural order. Stable, O(n log n).
    pub fn sort(&mut self)
    where
        A::Value: Ord,
    {
        self.sort_by(|a, b| a.cmp(b));
    }

    /// Sorts the list by a key extracted from each value. Stable.
    pub fn sort_by_key<K, F>(&mut self, mut f: F)
    where
        K: Ord,
        F: FnMut(&A::Value) -> K,
    {
        self.sort_by(|a, b| f(a).cmp(&f(b)));
    }

    /// Sorts the list with a comparator. Elements that compare equal keep
    /// their relative order.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&A::Value, &A::Value) -> Ordering,
    {
        if self.len < 2 {
            return;
        }
        trace!(len = self.len, "sorting list");

        // merge_sort 只改写 next，comparator panic 时沿 prev 从原 tail 恢复
        let guard = RestoreOnUnwind { tail: self.tail };
        let adapter = &self.adapter;
        let mut less = |a: NonNull<Link>, b: NonNull<Link>| unsafe {
            compare(adapter.get_value(a).as_ref(), adapter.get_value(b).as_ref()) == Ordering::Less
        };
        let sorted = unsafe { merge_sort(self.head, self.len, &mut less) };
        core::mem::forget(guard);

        // 重建 prev 指针与 tail
        let mut prev = None;
        let mut current = sorted;
        while let Some(link_ptr) = current {
            let link = unsafe { link_ptr.as_ref() };
            link.set_prev(prev);
            prev = current;
            current = link.next();
        }

        self.head = sorted;
        self.tail = prev;
    }
}

/// Relinks `next` pointers from the untouched `prev` chain, putting the list
/// back in its pre-sort order if the comparator unwinds.
struct RestoreOnUnwind {
    tail: Option<NonNull<Link>>,
}

impl Drop for RestoreOnUnwind {
    fn drop(&mut self) {
        let Some(mut current) = self.tail else {
            return;
        };
        unsafe {
            current.as_ref().set_next(None);
            while let Some(prev) = current.as_ref().prev() {
                prev.as_ref().set_next(Some(current));
                current = prev;
            }
        }
    }
}

/// Sorts the `len` records reachable through `next` from `head` and returns
/// the new head. The result is terminated by a `None` next pointer.
///
/// # Safety
/// At least `len` records must be reachable from `head`, and the chain must
/// not be reachable through any list while it is being sorted.
unsafe fn merge_sort(
    head: Option<NonNull<Link>>,
    len: usize,
    less: &mut dyn FnMut(NonNull<Link>, NonNull<Link>) -> bool,
) -> Option<NonNull<Link>> {
    if len < 2 {
        return head;
    }

    let left_len = len / 2;
    let mut left_tail = head?;
    for _ in 1..left_len {
        left_tail = unsafe { left_tail.as_ref().next() }?;
    }
    let right = unsafe { left_tail.as_ref().next() };
    unsafe { left_tail.as_ref().set_next(None) };

    unsafe {
        let left = merge_sort(head, left_len, less);
        let right = merge_sort(right, len - left_len, less);
        merge_runs(left, right, less)
    }
}

/// Merges two sorted, `None`-terminated runs by relinking the smaller head
/// forward each time, then appends whatever remains.
///
/// # Safety
/// Both runs must be disjoint, valid chains.
unsafe fn merge_runs(
    mut left: Option<NonNull<Link>>,
    mut right: Option<NonNull<Link>>,
    less: &mut dyn FnMut(NonNull<Link>, NonNull<Link>) -> bool,
) -> Option<NonNull<Link>> {
    let mut head = None;
    let mut tail: Option<NonNull<Link>> = None;

    while let (Some(l), Some(r)) = (left, right) {
        // 相等时取左侧，保证稳定
        let pick = if less(r, l) {
            right = unsafe { r.as_ref().next() };
            r
        } else {
            left = unsafe { l.as_ref().next() };
            l
        };
        match tail {
            Some(t) => unsafe { t.as_ref().set_next(Some(pick)) },
            None => head = Some(pick),
        }
        tail = Some(pick);
    }

    let rest = left.or(right);
    match tail {
        Some(t) => unsafe { t.as_ref().set_next(rest) },
        None => head = rest,
    }
    head
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use crate::{Link, LinkedList};
    use std::cmp::Ordering;
    use std::panic::{self, AssertUnwindSafe};

    #[derive(Debug)]
    struct Entry {
        key: u8,
        seq: usize,
        link: Link,
    }

    impl PartialEq for Entry {
        fn eq(&self, other: &Self) -> bool {
            self.key == other.key
        }
    }

    impl Eq for Entry {}

    impl PartialOrd for Entry {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Entry {
        fn cmp(&self, other: &Self) -> Ordering {
            self.key.cmp(&other.key)
        }
    }

    crate::intrusive_adapter!(EntryAdapter = Entry { link: Link });

    fn entries(keys: &[u8]) -> Vec<Entry> {
        keys.iter()
            .enumerate()
            .map(|(seq, &key)| Entry {
                key,
                seq,
                link: Link::new(),
            })
            .collect()
    }

    fn keys(list: &LinkedList<'_, EntryAdapter>) -> Vec<u8> {
        list.iter().map(|e| e.key).collect()
    }

    #[test]
    fn test_sort_orders_and_relinks() {
        let items = entries(&[5, 3, 9, 1, 7, 2, 8]);
        let mut list = LinkedList::new(EntryAdapter);
        for e in &items {
            list.push_back(e).unwrap();
        }

        list.sort();

        assert_eq!(keys(&list), [1, 2, 3, 5, 7, 8, 9]);
        assert_eq!(list.len(), 7);
        assert_eq!(list.front().unwrap().key, 1);
        assert_eq!(list.back().unwrap().key, 9);
        let backwards: Vec<_> = list.iter().rev().map(|e| e.key).collect();
        assert_eq!(backwards, [9, 8, 7, 5, 3, 2, 1]);
        list.assert_valid();
    }

    #[test]
    fn test_sort_is_stable() {
        let items = entries(&[2, 1, 2, 1, 0, 2, 1]);
        let mut list = LinkedList::new(EntryAdapter);
        for e in &items {
            list.push_back(e).unwrap();
        }

        list.sort();

        let order: Vec<_> = list.iter().map(|e| (e.key, e.seq)).collect();
        assert_eq!(
            order,
            [(0, 4), (1, 1), (1, 3), (1, 6), (2, 0), (2, 2), (2, 5)]
        );
        list.assert_valid();
    }

    #[test]
    fn test_sort_idempotent() {
        let items = entries(&[4, 4, 1, 3, 0]);
        let mut list = LinkedList::new(EntryAdapter);
        for e in &items {
            list.push_back(e).unwrap();
        }

        list.sort();
        let once: Vec<_> = list.iter().map(|e| e.seq).collect();
        list.sort();
        let twice: Vec<_> = list.iter().map(|e| e.seq).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_by_descending() {
        let items = entries(&[1, 3, 2]);
        let mut list = LinkedList::new(EntryAdapter);
        for e in &items {
            list.push_back(e).unwrap();
        }

        list.sort_by(|a, b| b.key.cmp(&a.key));
        assert_eq!(keys(&list), [3, 2, 1]);

        list.sort_by_key(|e| e.seq);
        assert_eq!(keys(&list), [1, 3, 2]);
        list.assert_valid();
    }

    #[test]
    fn test_sort_panicking_comparator_keeps_order() {
        let items = entries(&[5, 4, 3, 2, 1, 0]);
        let mut list = LinkedList::new(EntryAdapter);
        for e in &items {
            list.push_back(e).unwrap();
        }

        let mut calls = 0;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            list.sort_by(|a, b| {
                calls += 1;
                if calls == 4 {
                    panic!("comparator failed");
                }
                a.key.cmp(&b.key)
            });
        }));
        assert!(result.is_err());

        list.assert_valid();
        assert_eq!(list.len(), 6);
        assert_eq!(keys(&list), [5, 4, 3, 2, 1, 0]);
        let backwards: Vec<_> = list.iter().rev().map(|e| e.key).collect();
        assert_eq!(backwards, [0, 1, 2, 3, 4, 5]);

        list.sort();
        assert_eq!(keys(&list), [0, 1, 2, 3, 4, 5]);
        list.assert_valid();
    }

    #[test]
    fn test_sort_small_lists() {
        let items = entries(&[2, 1]);
        let mut list = LinkedList::new(EntryAdapter);
        list.sort();
        assert!(list.is_empty());

        list.push_back(&items[0]).unwrap();
        list.sort();
        assert_eq!(keys(&list), [2]);

        list.push_back(&items[1]).unwrap();
        list.sort();
        assert_eq!(keys(&list), [1, 2]);
        list.assert_valid();
    }
}
