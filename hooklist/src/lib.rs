//! An intrusive doubly linked list.
//!
//! Objects carry their own [`Link`] and the list only rewires those links:
//! it never allocates, copies or frees an element. An [`Adapter`], usually
//! declared with [`intrusive_adapter!`], maps between an object and its
//! embedded link by a compile-time field offset.
//!
//! ```rust
//! use hooklist::{intrusive_adapter, Link, LinkedList};
//!
//! struct Node {
//!     value: i32,
//!     link: Link,
//! }
//!
//! intrusive_adapter!(NodeAdapter = Node { link: Link });
//!
//! let nodes: Vec<Node> = [3, 1, 2]
//!     .into_iter()
//!     .map(|value| Node { value, link: Link::new() })
//!     .collect();
//!
//! let mut list = LinkedList::new(NodeAdapter);
//! for node in &nodes {
//!     list.push_back(node).unwrap();
//! }
//! list.sort_by_key(|n| n.value);
//!
//! let sorted: Vec<i32> = list.iter().map(|n| n.value).collect();
//! assert_eq!(sorted, [1, 2, 3]);
//! ```
//!
//! Elements are borrowed for the list's lifetime, so an object cannot be
//! moved or dropped while it is linked. The list is single-threaded: `Link`
//! is not `Sync`, which keeps every list on the thread that built it.

mod adapter;
mod cursor;
mod error;
mod iter;
mod link;
mod list;
mod macros;
mod shim;
mod sort;

pub use adapter::Adapter;
pub use cursor::{Cursor, CursorMut};
pub use error::ListError;
pub use iter::Iter;
pub use link::Link;
pub use list::LinkedList;
