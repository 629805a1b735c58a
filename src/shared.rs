//! Manually counted shares of one value.
//!
//! A `Shared<T>` may be cloned freely; cloning hands out another reference to the
//! same slot but does not touch the share count. The value is dropped exactly once:
//! when `decrease` brings the count from 1 to 0, or on an explicit `dispose`.
//! After that the count is pinned at `DISPOSED` and every further call is a no-op.
//!
//! The count starts at 0. A handle that is never `increase`d is therefore never
//! disposed through the counter; the value is still dropped with the last clone.

use {
	core::cell::{Cell, Ref, RefCell},
	std::rc::Rc,
};

pub const DISPOSED: isize = -1;

pub struct Shared<T>(Rc<Slot<T>>);

struct Slot<T> {
	count: Cell<isize>,
	value: RefCell<Option<T>>,
}

impl<T> Shared<T> {
	pub fn new(value: T) -> Self {
		Self(Rc::new(Slot { count: Cell::new(0), value: RefCell::new(Some(value)) }))
	}

	pub fn increase(&self) {
		let count = self.0.count.get();
		if count == DISPOSED {
			return;
		}
		self.0.count.set(count + 1);
	}

	pub fn decrease(&self) {
		let count = self.0.count.get();
		if count == DISPOSED {
			return;
		}
		self.0.count.set(count - 1);
		if count - 1 == 0 {
			self.dispose();
		}
	}

	pub fn dispose(&self) {
		self.0.count.set(DISPOSED);
		let value = self.0.value.borrow_mut().take();
		drop(value);
	}

	#[inline]
	pub fn count(&self) -> isize {
		self.0.count.get()
	}

	#[inline]
	pub fn isDisposed(&self) -> bool {
		self.count() == DISPOSED
	}

	/// `None` once disposed.
	pub fn value(&self) -> Option<Ref<'_, T>> {
		Ref::filter_map(self.0.value.borrow(), Option::as_ref).ok()
	}

	#[inline]
	pub fn ptrEq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl<T> Clone for Shared<T> {
	fn clone(&self) -> Self {
		Self(Rc::clone(&self.0))
	}
}

impl<T> core::fmt::Debug for Shared<T> {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Shared").field("count", &self.count()).finish_non_exhaustive()
	}
}
