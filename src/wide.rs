use crate::alloc::Global;

/// Capacity and ownership flag stored in separate fields.
///
/// Same limits as [`lean::Meta`](crate::lean::Meta), one more word of footprint,
/// but no masking on access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Meta {
	capacity: usize,
	owned: bool
}

unsafe impl crate::raw::Meta for Meta {
	const MAX_CAPACITY: usize = std::isize::MAX as usize;

	fn new(capacity: usize, owned: bool) -> Self {
		assert!(capacity <= Self::MAX_CAPACITY, "capacity (is {}) exceeds the maximum capacity (which is {})", capacity, Self::MAX_CAPACITY);
		Meta {
			capacity,
			owned
		}
	}

	fn capacity(&self) -> usize {
		self.capacity
	}

	fn is_owned(&self) -> bool {
		self.owned
	}

	fn set(&mut self, capacity: usize, owned: bool) {
		assert!(capacity <= Self::MAX_CAPACITY, "capacity (is {}) exceeds the maximum capacity (which is {})", capacity, Self::MAX_CAPACITY);
		self.capacity = capacity;
		self.owned = owned
	}
}

pub type TagVec<'a, T, A = Global> = crate::generic::TagVec<'a, Meta, T, A, 0>;
pub type AlignedTagVec<'a, T, const ALIGN: usize, A = Global> = crate::generic::TagVec<'a, Meta, T, A, ALIGN>;
