#![no_std]

//! `U8Map`: a zero-allocation hash map for byte keys and byte values,
//! using a client-provided buffer.
//!
//! `U8Map` is a separate-chaining hash table that lives entirely inside a
//! single byte buffer handed over at construction. It performs no dynamic
//! allocation, owns no storage, and never resizes: when the buffer is
//! exhausted, insertion fails cleanly and the caller decides what to do.
//!
//! This crate is `no_std` compatible and works in embedded and constrained
//! environments.
//!
//! Buffer layout: `[bucket array][arena]`. Each bucket holds the head and
//! tail of a chain of records; records are stored inline in the arena as
//! `[next | capacity | key_size | value_size | key bytes | value bytes]`
//! and linked by offsets, so the layout has no pointers into itself.
//!
//! # Storage Reuse
//!
//! Removed records join a free list and are recycled first-fit for later
//! insertions. The arena's bump pointer only ever advances; reuse happens
//! in place, without compaction. A record keeps the full capacity it was
//! carved with, so removing and reinserting entries of the same sizes
//! consumes no new arena bytes.
//!
//! # Performance Characteristics
//!
//! - `insert()`, `get()`, `remove()`, `contains_key()`: O(chain length at
//!   the target bucket), about O(len / bucket_count) under uniform hashing
//! - allocation on insert: O(free-list length) worst case
//! - `next_item()`, iterator step: O(1) amortized over a full traversal
//! - no operation is O(buffer size) and none allocates or performs I/O
//!
//! # Examples
//!
//! ```
//! use u8map::U8Map;
//!
//! let mut buffer = [0u8; 1024];
//! let mut map = U8Map::with_default_config(&mut buffer).unwrap();
//!
//! map.insert(b"name", b"Alice").unwrap();
//! map.insert(b"age", b"30").unwrap();
//!
//! assert_eq!(map.get(b"name"), Some(&b"Alice"[..]));
//! assert_eq!(map.len(), 2);
//!
//! assert!(map.remove(b"age"));
//! assert!(!map.contains_key(b"age"));
//! ```
//!
//! Overwriting a key with a value that fits the stored one rewrites it in
//! place and consumes nothing:
//!
//! ```
//! # use u8map::U8Map;
//! let mut buffer = [0u8; 1024];
//! let mut map = U8Map::with_default_config(&mut buffer).unwrap();
//!
//! map.insert(b"k", b"alpha").unwrap();
//! let remaining = map.available_bytes();
//!
//! map.insert(b"k", b"beta").unwrap();
//! assert_eq!(map.get(b"k"), Some(&b"beta"[..]));
//! assert_eq!(map.available_bytes(), remaining);
//! ```
//!
//! # Iteration
//!
//! Two styles are available. The borrowing iterator freezes the map for
//! the duration of the traversal:
//!
//! ```
//! # use u8map::U8Map;
//! let mut buffer = [0u8; 1024];
//! let mut map = U8Map::with_default_config(&mut buffer).unwrap();
//! map.insert(b"one", b"1").unwrap();
//! map.insert(b"two", b"2").unwrap();
//!
//! for (key, value) in &map {
//!     assert!(!key.is_empty());
//!     assert!(!value.is_empty());
//! }
//! assert_eq!(map.iter().count(), 2);
//! ```
//!
//! The stateful cursor keeps its position in the map itself, which suits
//! callers that cannot hold a borrow across the whole traversal. It visits
//! each entry at most once and stays at the end until reset:
//!
//! ```
//! # use u8map::U8Map;
//! let mut buffer = [0u8; 1024];
//! let mut map = U8Map::with_default_config(&mut buffer).unwrap();
//! map.insert(b"one", b"1").unwrap();
//! map.insert(b"two", b"2").unwrap();
//!
//! map.reset_cursor();
//! let mut seen = 0;
//! while let Some((_key, _value)) = map.next_item() {
//!     seen += 1;
//! }
//! assert_eq!(seen, 2);
//! assert_eq!(map.next_item(), None);
//! ```
//!
//! # Custom Configuration
//!
//! The hash function and bucket count are pluggable per map:
//!
//! ```
//! use u8map::{U8Map, U8MapConfig};
//!
//! fn first_byte(key: &[u8]) -> u32 {
//!     u32::from(key[0])
//! }
//!
//! let mut buffer = [0u8; 512];
//! let config = U8MapConfig { hash: first_byte, bucket_count: 16 };
//! let mut map = U8Map::new(&mut buffer, config).unwrap();
//! map.insert(b"x", b"y").unwrap();
//! assert!(map.contains_key(b"x"));
//! ```

mod arena;
mod config;
mod core;
mod error;
mod iter;
mod layout;

pub use crate::config::{fnv1a_32, HashFn, U8MapConfig};
pub use crate::core::U8Map;
pub use crate::error::U8MapError;
pub use crate::iter::U8MapIter;
