use crate::link::Link;
use core::ptr::NonNull;

/// 适配器 Trait，用于定义对象与 Link 之间的映射关系
///
/// An adapter is a compile-time descriptor for one `(Value, link field)`
/// pair. It carries the constant byte offset of the embedded [`Link`] inside
/// `Value` and translates between the two by pointer arithmetic alone, so it
/// works for any instance regardless of the state of its other fields.
///
/// Implement it with [`intrusive_adapter!`](crate::intrusive_adapter) rather
/// than by hand; the macro computes the offset with `core::mem::offset_of!`
/// and rejects a field that is not a `Link`.
///
/// # Safety
/// `LINK_OFFSET` must be the offset of a field of type `Link` inside
/// `Value`. Every provided method relies on it.
pub unsafe trait Adapter {
    /// 链表存储的数据类型
    type Value;

    /// Byte distance from the start of `Value` to its `Link` field.
    const LINK_OFFSET: usize;

    /// 给定数据指针，返回该数据中 Link 字段的指针
    ///
    /// # Safety
    /// `value` must point to a live `Value`.
    #[inline]
    unsafe fn get_link(&self, value: NonNull<Self::Value>) -> NonNull<Link> {
        unsafe {
            let raw = value.as_ptr().cast::<u8>().add(Self::LINK_OFFSET);
            NonNull::new_unchecked(raw.cast::<Link>())
        }
    }

    /// 给定 Link 指针，返回包含该 Link 的数据指针
    ///
    /// # Safety
    /// `link` must point to the link field of a live `Value`, and its
    /// provenance must cover the whole `Value`.
    #[inline]
    unsafe fn get_value(&self, link: NonNull<Link>) -> NonNull<Self::Value> {
        unsafe {
            let raw = link.as_ptr().cast::<u8>().sub(Self::LINK_OFFSET);
            NonNull::new_unchecked(raw.cast::<Self::Value>())
        }
    }

    /// Returns the link embedded in `value`.
    #[inline]
    fn link<'v>(&self, value: &'v Self::Value) -> &'v Link {
        unsafe { self.get_link(NonNull::from(value)).as_ref() }
    }

    /// Resolves the object owning `link`. An absent link resolves to `None`.
    ///
    /// # Safety
    /// A present `link` must be the designated link field of a `Value`, with
    /// the same provenance requirement as [`Adapter::get_value`].
    #[inline]
    unsafe fn owner_of<'v>(&self, link: Option<&'v Link>) -> Option<&'v Self::Value> {
        link.map(|link| unsafe { self.get_value(NonNull::from(link)).as_ref() })
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;

    #[repr(C)]
    struct Pair {
        tag: u8,
        weight: u64,
        link: Link,
    }

    struct PairAdapter;

    unsafe impl Adapter for PairAdapter {
        type Value = Pair;
        const LINK_OFFSET: usize = core::mem::offset_of!(Pair, link);
    }

    #[test]
    fn test_offset_matches_layout() {
        // u8 padded up to the u64 alignment, then the u64 itself
        assert_eq!(PairAdapter::LINK_OFFSET, 16);
    }

    #[test]
    fn test_link_and_owner_round_trip() {
        let pair = Pair {
            tag: 7,
            weight: 99,
            link: Link::new(),
        };
        let adapter = PairAdapter;

        let link = adapter.link(&pair);
        assert!(core::ptr::eq(link, &pair.link));

        unsafe {
            let value = adapter.get_value(adapter.get_link(NonNull::from(&pair)));
            assert!(core::ptr::eq(value.as_ptr(), &pair));
            assert_eq!(value.as_ref().tag, 7);
            assert_eq!(value.as_ref().weight, 99);
        }
    }

    #[test]
    fn test_owner_of_absent_link() {
        let adapter = PairAdapter;
        let owner = unsafe { adapter.owner_of(None) };
        assert!(owner.is_none());
    }

    #[test]
    fn test_owner_of_present_link() {
        let pair = Pair {
            tag: 3,
            weight: 42,
            link: Link::new(),
        };
        let adapter = PairAdapter;

        let link = adapter.link(&pair);
        let owner = unsafe { adapter.owner_of(Some(link)) }.unwrap();
        assert!(core::ptr::eq(owner, &pair));
        assert_eq!(owner.tag, 3);
        assert_eq!(owner.weight, 42);
    }
}
