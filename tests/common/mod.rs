#![allow(dead_code)]
use std::{
	alloc::Layout,
	cell::{
		Cell,
		RefCell
	},
	ptr::NonNull
};
use tag_vec::{
	Allocator,
	AllocError,
	Global
};

/// Allocator wrapping [`Global`] that records what the vector asks of it.
///
/// Deallocating or remapping a block it did not hand out panics, which catches
/// any attempt to free a borrowed buffer.
#[derive(Default)]
pub struct Counting {
	allocations: Cell<usize>,
	deallocations: Cell<usize>,
	remaps: Cell<usize>,
	refused_remaps: Cell<usize>,
	refuse_remap: Cell<bool>,

	/// Number of allocations still allowed, `None` for no limit.
	budget: Cell<Option<usize>>,

	/// Addresses of the live blocks.
	blocks: RefCell<Vec<usize>>
}

impl Counting {
	pub fn new() -> Self {
		Self::default()
	}

	/// Allocator whose `remap` always fails.
	pub fn without_remap() -> Self {
		let alloc = Self::default();
		alloc.refuse_remap.set(true);
		alloc
	}

	pub fn set_refuse_remap(&self, refuse: bool) {
		self.refuse_remap.set(refuse)
	}

	/// Only allow `n` more allocations.
	pub fn set_budget(&self, n: usize) {
		self.budget.set(Some(n))
	}

	pub fn allocations(&self) -> usize {
		self.allocations.get()
	}

	pub fn deallocations(&self) -> usize {
		self.deallocations.get()
	}

	pub fn remaps(&self) -> usize {
		self.remaps.get()
	}

	pub fn refused_remaps(&self) -> usize {
		self.refused_remaps.get()
	}

	pub fn live_blocks(&self) -> usize {
		self.blocks.borrow().len()
	}

	fn forget_block(&self, ptr: NonNull<u8>) {
		let mut blocks = self.blocks.borrow_mut();
		let addr = ptr.as_ptr() as usize;
		match blocks.iter().position(|&b| b == addr) {
			Some(i) => {
				blocks.swap_remove(i);
			},
			None => panic!("block at {:#x} was not allocated by this allocator", addr)
		}
	}

	fn check_block(&self, ptr: NonNull<u8>) {
		let addr = ptr.as_ptr() as usize;
		assert!(self.blocks.borrow().contains(&addr), "block at {:#x} was not allocated by this allocator", addr);
	}
}

unsafe impl Allocator for Counting {
	fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
		if let Some(budget) = self.budget.get() {
			if budget == 0 {
				return Err(AllocError)
			}
			self.budget.set(Some(budget - 1));
		}

		let ptr = Global.allocate(layout)?;
		self.allocations.set(self.allocations.get() + 1);
		self.blocks.borrow_mut().push(ptr.as_ptr() as usize);
		Ok(ptr)
	}

	unsafe fn remap(&self, ptr: NonNull<u8>, layout: Layout, new_size: usize) -> Option<NonNull<u8>> {
		self.check_block(ptr);
		if self.refuse_remap.get() {
			self.refused_remaps.set(self.refused_remaps.get() + 1);
			return None
		}

		let new_ptr = Global.remap(ptr, layout, new_size)?;
		self.forget_block(ptr);
		self.blocks.borrow_mut().push(new_ptr.as_ptr() as usize);
		self.remaps.set(self.remaps.get() + 1);
		Some(new_ptr)
	}

	unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
		self.forget_block(ptr);
		self.deallocations.set(self.deallocations.get() + 1);
		Global.deallocate(ptr, layout)
	}
}
