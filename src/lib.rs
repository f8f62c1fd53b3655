//! This crate provides the [`TagVec`] data structure: a growable array that
//! can start its life in a buffer provided by the caller (typically on the
//! stack), and transparently moves to memory it allocates itself once that
//! buffer is full.
//! The caller's buffer is never resized nor deallocated by the vector.
//!
//! Whether the storage is borrowed or owned is tracked by a single bit, stored
//! in the same word as the capacity.
//!
//! ## Basic usage
//!
//! ```rust
//! use core::mem::MaybeUninit;
//! use tag_vec::TagVec;
//!
//! let mut buffer = [MaybeUninit::uninit(); 4];
//! let mut vec: TagVec<'_, u8> = TagVec::from_buffer(&mut buffer);
//! vec.extend_from_slice(b"abcd")?; // fits in the buffer, nothing is allocated.
//! assert!(vec.is_borrowed());
//!
//! vec.push(b'e')?; // the buffer is full: the elements are moved to the heap.
//! assert!(vec.is_owned());
//! assert_eq!(vec, *b"abcde");
//! # Ok::<(), tag_vec::TryReserveError>(())
//! ```
//!
//! A `TagVec` can also be created without any storage, or with a precise
//! owned capacity:
//! ```rust
//! # use tag_vec::TagVec;
//! let empty: TagVec<'_, u32> = TagVec::new(); // does not allocate.
//! let owned: TagVec<'_, u32> = TagVec::with_capacity(16)?; // allocates exactly 16 slots.
//! # Ok::<(), tag_vec::TryReserveError>(())
//! ```
//!
//! ## Allocators
//!
//! Every vector carries an [`Allocator`]. The default one, [`Global`], uses the
//! global allocator and grows owned blocks with `realloc`.
//! Operations that may allocate return a [`TryReserveError`] on failure and
//! leave the vector unchanged.
//!
//! ## Metadata format
//!
//! The capacity and ownership flag are stored in a metadata value implementing
//! [`raw::Meta`]. [`lean::Meta`] (the default) packs them in one word, while
//! [`wide::Meta`] uses a word and a `bool`.
//! In both cases the maximum capacity is `usize::MAX >> 1`.
pub mod alloc;
pub mod error;
pub mod raw;
pub mod generic;
pub mod lean;
pub mod wide;

pub use alloc::{
	Allocator,
	AllocError,
	Global
};
pub use error::TryReserveError;
pub use lean::{
	TagVec,
	AlignedTagVec
};
