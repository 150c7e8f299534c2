/// Recovers a `*const Container` from a pointer to one of its fields.
///
/// Pure address arithmetic: the result is only meaningful if `$ptr` really
/// points at `$field` of a `$Container`, and dereferencing it is up to the
/// caller.
#[macro_export]
macro_rules! container_of {
    ($ptr:expr, $Container:ty, $field:ident) => {{
        let ptr = $ptr as *const _ as *const u8;
        let offset = core::mem::offset_of!($Container, $field);
        #[allow(unused_unsafe)]
        unsafe {
            ptr.sub(offset) as *const $Container
        }
    }};
}

/// 宏用于自动生成 `Adapter` 实现
///
/// Declares a unit adapter type for `$Node` whose link lives in
/// `$link_field`. The offset is computed at compile time and the field is
/// checked to be a [`Link`](crate::Link).
///
/// # Example
///
/// ```rust
/// use hooklist::{intrusive_adapter, Link, LinkedList};
///
/// pub struct Job {
///     id: u32,
///     link: Link,
/// }
///
/// intrusive_adapter!(pub JobAdapter = Job { link: Link });
///
/// let a = Job { id: 1, link: Link::new() };
/// let b = Job { id: 2, link: Link::new() };
///
/// let mut queue = LinkedList::new(JobAdapter);
/// queue.push_back(&a).unwrap();
/// queue.push_back(&b).unwrap();
/// assert_eq!(queue.front().unwrap().id, 1);
/// ```
#[macro_export]
macro_rules! intrusive_adapter {
    ($vis:vis $Adapter:ident = $Node:ty { $link_field:ident : Link }) => {
        #[derive(Clone, Copy, Debug, Default)]
        $vis struct $Adapter;

        const _: () = {
            // 编译期检查：字段必须是 Link
            #[allow(dead_code)]
            fn assert_link_field(node: &$Node) -> &$crate::Link {
                &node.$link_field
            }
        };

        unsafe impl $crate::Adapter for $Adapter {
            type Value = $Node;
            const LINK_OFFSET: usize = core::mem::offset_of!($Node, $link_field);
        }
    };
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use crate::{Adapter, Link};

    #[repr(C)]
    struct TestStruct {
        a: u8,
        b: u32,
        c: u64,
        link: Link,
    }

    crate::intrusive_adapter!(TestAdapter = TestStruct { link: Link });

    #[test]
    fn test_container_of() {
        let val = TestStruct {
            a: 1,
            b: 2,
            c: 3,
            link: Link::new(),
        };
        let ptr_b = &val.b as *const u32;

        unsafe {
            let ptr_struct = container_of!(ptr_b, TestStruct, b);
            assert_eq!(&(*ptr_struct).a as *const _, &val.a as *const _);
            assert_eq!((*ptr_struct).c, 3);
        }
    }

    #[test]
    fn test_adapter_offset() {
        // a: 0, b: 4..8, c: 8..16, link from 16
        assert_eq!(TestAdapter::LINK_OFFSET, 16);
        assert_eq!(
            TestAdapter::LINK_OFFSET,
            core::mem::offset_of!(TestStruct, link)
        );
    }

    #[test]
    fn test_adapter_resolves_owner() {
        let val = TestStruct {
            a: 9,
            b: 8,
            c: 7,
            link: Link::new(),
        };
        let adapter = TestAdapter;
        let link = adapter.link(&val);

        let owner = container_of!(link, TestStruct, link);
        assert!(core::ptr::eq(owner, &val));
        assert_eq!(val.a, 9);
    }
}
