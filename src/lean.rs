use crate::alloc::Global;

const OWNED: usize = 1 << (usize::BITS - 1);

/// Capacity and ownership flag packed in a single `usize`.
///
/// The top bit is the ownership flag, the remaining bits hold the capacity.
/// The maximum capacity is hence `usize::MAX >> 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Meta {
	data: usize
}

unsafe impl crate::raw::Meta for Meta {
	const MAX_CAPACITY: usize = !OWNED;

	fn new(capacity: usize, owned: bool) -> Self {
		assert!(capacity <= Self::MAX_CAPACITY, "capacity (is {}) exceeds the maximum capacity (which is {})", capacity, Self::MAX_CAPACITY);

		Meta {
			data: capacity | if owned { OWNED } else { 0 }
		}
	}

	fn capacity(&self) -> usize {
		self.data & !OWNED
	}

	fn is_owned(&self) -> bool {
		self.data & OWNED != 0
	}

	fn set(&mut self, capacity: usize, owned: bool) {
		*self = <Self as crate::raw::Meta>::new(capacity, owned)
	}
}

pub type TagVec<'a, T, A = Global> = crate::generic::TagVec<'a, Meta, T, A, 0>;
pub type AlignedTagVec<'a, T, const ALIGN: usize, A = Global> = crate::generic::TagVec<'a, Meta, T, A, ALIGN>;
