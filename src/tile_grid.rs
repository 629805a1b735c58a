use {
	crate::{Error, PixelBuffer, Result, Shared},
	glam::IVec2,
	std::collections::HashMap,
};

pub type Tile = Shared<PixelBuffer>;

/// Tiles keyed by grid coordinate, plus a fallback for in-bounds holes.
///
/// Every handle stored here owns one share of its tile: `set` consumes a share the
/// caller already took with `increase`, `setFallback` takes its own. Dropping the
/// grid gives all of them back.
#[derive(Default)]
pub struct TileGrid {
	entries: HashMap<[i32; 2], Tile>,
	fallback: Option<Tile>,
}

impl TileGrid {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `tile` at `at`, or removes the entry when `tile` is `None`.
	/// Returns the replaced entry without releasing its share.
	pub fn set(&mut self, at: IVec2, tile: Option<Tile>) -> Option<Tile> {
		match tile {
			Some(tile) => self.entries.insert(at.to_array(), tile),
			None => self.entries.remove(&at.to_array()),
		}
	}

	pub fn get(&self, at: IVec2) -> Option<&Tile> {
		self.entries.get(&at.to_array()).or(self.fallback.as_ref())
	}

	pub fn fallback(&self) -> Option<&Tile> {
		self.fallback.as_ref()
	}

	pub fn setFallback(&mut self, tile: Option<Tile>) {
		if let Some(previous) = self.fallback.take() {
			previous.decrease();
		}
		if let Some(tile) = &tile {
			tile.increase();
		}
		self.fallback = tile;
	}

	#[inline]
	pub fn isEmpty(&self) -> bool {
		self.entries.is_empty()
	}

	/// `(leftTop, rightBottom)`, both inclusive. The fallback plays no part.
	pub fn boundingBox(&self) -> Result<(IVec2, IVec2)> {
		let mut points = self.entries.keys().map(|&key| IVec2::from_array(key));
		let first = points.next().ok_or(Error::EmptyGrid)?;
		Ok(points.fold((first, first), |(lt, rb), point| (lt.min(point), rb.max(point))))
	}

	/// Largest side among the entries; disposed tiles are not counted.
	pub fn unitSize(&self) -> Result<usize> {
		if self.isEmpty() {
			return Err(Error::EmptyGrid);
		}
		Ok(self
			.entries
			.values()
			.filter_map(|tile| tile.value().map(|buffer| buffer.width.max(buffer.height)))
			.max()
			.unwrap_or(0))
	}

	/// Releases every share the grid holds. Same as dropping it.
	pub fn dispose(self) {
		drop(self);
	}
}

impl Drop for TileGrid {
	fn drop(&mut self) {
		if let Some(fallback) = self.fallback.take() {
			fallback.decrease();
		}
		for (_, tile) in self.entries.drain() {
			tile.decrease();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tile(width: usize, height: usize) -> Tile {
		Shared::new(PixelBuffer::fromWidthHeight(width, height).unwrap())
	}

	fn owned(tile: &Tile) -> Option<Tile> {
		tile.increase();
		Some(tile.clone())
	}

	#[test]
	fn empty_grid_has_no_bounds() {
		let grid = TileGrid::new();
		assert!(grid.isEmpty());
		assert!(matches!(grid.boundingBox(), Err(Error::EmptyGrid)));
		assert!(matches!(grid.unitSize(), Err(Error::EmptyGrid)));
	}

	#[test]
	fn bounds_span_all_entries_but_not_the_fallback() {
		let mut grid = TileGrid::new();
		let a = tile(4, 4);
		for at in [IVec2::new(-2, 5), IVec2::new(3, -1), IVec2::new(0, 0)] {
			_ = grid.set(at, owned(&a));
		}
		grid.setFallback(Some(tile(64, 64)));
		assert_eq!(grid.boundingBox().unwrap(), (IVec2::new(-2, -1), IVec2::new(3, 5)));
		assert_eq!(grid.unitSize().unwrap(), 4);
	}

	#[test]
	fn unit_size_is_the_largest_side() {
		let mut grid = TileGrid::new();
		_ = grid.set(IVec2::new(0, 0), owned(&tile(4, 4)));
		_ = grid.set(IVec2::new(1, 0), owned(&tile(3, 9)));
		_ = grid.set(IVec2::new(2, 0), owned(&tile(7, 2)));
		assert_eq!(grid.unitSize().unwrap(), 9);
	}

	#[test]
	fn explicit_entries_override_the_fallback() {
		let (a, f) = (tile(2, 2), tile(2, 2));
		let mut grid = TileGrid::new();
		_ = grid.set(IVec2::new(0, 0), owned(&a));
		_ = grid.set(IVec2::new(2, 2), owned(&a));
		assert!(grid.get(IVec2::new(1, 1)).is_none());
		grid.setFallback(Some(f.clone()));
		assert!(grid.get(IVec2::new(0, 0)).unwrap().ptrEq(&a));
		for at in [IVec2::new(1, 0), IVec2::new(0, 1), IVec2::new(1, 1), IVec2::new(2, 1)] {
			assert!(grid.get(at).unwrap().ptrEq(&f));
		}
	}

	#[test]
	fn set_none_removes_without_releasing() {
		let a = tile(2, 2);
		let mut grid = TileGrid::new();
		_ = grid.set(IVec2::new(1, 1), owned(&a));
		let removed = grid.set(IVec2::new(1, 1), None).unwrap();
		assert!(removed.ptrEq(&a));
		assert_eq!(a.count(), 1);
		assert!(grid.isEmpty());
	}

	#[test]
	fn overwritten_entry_is_returned_unreleased() {
		let (a, b) = (tile(2, 2), tile(2, 2));
		let mut grid = TileGrid::new();
		_ = grid.set(IVec2::ZERO, owned(&a));
		let replaced = grid.set(IVec2::ZERO, owned(&b)).unwrap();
		assert!(replaced.ptrEq(&a));
		assert_eq!(a.count(), 1);
		replaced.decrease();
		assert!(a.isDisposed());
	}

	#[test]
	fn set_fallback_moves_shares() {
		let (f, g) = (tile(2, 2), tile(2, 2));
		let mut grid = TileGrid::new();
		grid.setFallback(Some(f.clone()));
		assert_eq!(f.count(), 1);
		grid.setFallback(Some(g.clone()));
		assert!(f.isDisposed());
		assert_eq!(g.count(), 1);
		grid.setFallback(None);
		assert!(g.isDisposed());
		assert!(grid.fallback().is_none());
	}

	#[test]
	fn dispose_releases_each_share_once() {
		let (a, f) = (tile(2, 2), tile(2, 2));
		let [mut first, mut second] = [TileGrid::new(), TileGrid::new()];
		_ = first.set(IVec2::new(0, 0), owned(&a));
		_ = second.set(IVec2::new(5, 5), owned(&a));
		first.setFallback(Some(f.clone()));
		second.setFallback(Some(f.clone()));
		first.dispose();
		assert_eq!((a.count(), f.count()), (1, 1));
		second.dispose();
		assert!(a.isDisposed() && f.isDisposed());
	}

	#[test]
	fn storing_twice_without_a_second_increase_is_a_caller_error() {
		let a = tile(2, 2);
		a.increase(); // held by the caller
		a.increase(); // handed to the grid, but stored twice below
		let mut grid = TileGrid::new();
		_ = grid.set(IVec2::new(0, 0), Some(a.clone()));
		_ = grid.set(IVec2::new(1, 0), Some(a.clone()));
		grid.dispose();
		// the grid gave back two shares; the caller's own share went with them
		assert!(a.isDisposed());
		assert!(a.value().is_none());
	}
}
