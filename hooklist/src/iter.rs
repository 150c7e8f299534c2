use crate::adapter::Adapter;
use crate::link::Link;
use crate::list::LinkedList;
use core::iter::FusedIterator;
use core::ptr::NonNull;

/// Borrowing iterator over the elements of a [`LinkedList`], front to back.
pub struct Iter<'l, 'a, A: Adapter> {
    list: &'l LinkedList<'a, A>,
    head: Option<NonNull<Link>>,
    tail: Option<NonNull<Link>>,
    len: usize,
}

impl<'l, 'a, A: Adapter> Iter<'l, 'a, A> {
    pub(crate) fn new(list: &'l LinkedList<'a, A>) -> Self {
        Self {
            list,
            head: list.head,
            tail: list.tail,
            len: list.len,
        }
    }
}

impl<'l, 'a, A: Adapter> Iterator for Iter<'l, 'a, A> {
    type Item = &'a A::Value;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let link = self.head?;
        self.len -= 1;
        unsafe {
            self.head = link.as_ref().next();
            Some(self.list.value_of(link))
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'l, 'a, A: Adapter> DoubleEndedIterator for Iter<'l, 'a, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let link = self.tail?;
        self.len -= 1;
        unsafe {
            self.tail = link.as_ref().prev();
            Some(self.list.value_of(link))
        }
    }
}

impl<'l, 'a, A: Adapter> ExactSizeIterator for Iter<'l, 'a, A> {}

impl<'l, 'a, A: Adapter> FusedIterator for Iter<'l, 'a, A> {}

impl<'l, 'a, A: Adapter> Clone for Iter<'l, 'a, A> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use crate::{Link, LinkedList};

    struct Item {
        n: u32,
        link: Link,
    }

    crate::intrusive_adapter!(ItemAdapter = Item { link: Link });

    #[test]
    fn test_iter_both_ends() {
        let items: Vec<_> = (1..=4)
            .map(|n| Item {
                n,
                link: Link::new(),
            })
            .collect();
        let mut list = LinkedList::new(ItemAdapter);
        for item in &items {
            list.push_back(item).unwrap();
        }

        let mut iter = list.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next().map(|i| i.n), Some(1));
        assert_eq!(iter.next_back().map(|i| i.n), Some(4));
        assert_eq!(iter.len(), 2);

        let rest: Vec<_> = iter.clone().map(|i| i.n).collect();
        assert_eq!(rest, [2, 3]);

        assert_eq!(iter.next_back().map(|i| i.n), Some(3));
        assert_eq!(iter.next().map(|i| i.n), Some(2));
        assert!(iter.next().is_none());
        assert!(iter.next_back().is_none());

        let reversed: Vec<_> = list.iter().rev().map(|i| i.n).collect();
        assert_eq!(reversed, [4, 3, 2, 1]);

        let total: u32 = (&list).into_iter().map(|i| i.n).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn test_iter_empty() {
        let list: LinkedList<'_, ItemAdapter> = LinkedList::default();
        assert_eq!(list.iter().count(), 0);
        assert!(list.iter().next_back().is_none());
    }
}
