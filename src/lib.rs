#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

pub mod classify;
pub mod compositor;
pub mod config;
pub mod error;
pub mod pixel_buffer;
pub mod png_stream;
pub mod shared;
pub mod source;
pub mod tile_grid;

pub use {
	error::{Error, Result},
	pixel_buffer::PixelBuffer,
	shared::Shared,
	tile_grid::TileGrid,
};

/// Pixel-space point or size, `[x, y]` / `[width, height]`.
pub type Vec2 = [usize; 2];
/// `[point, dimensions]`.
pub type Rectangle = [Vec2; 2];

pub const X: usize = 0;
pub const Y: usize = 1;
pub const WIDTH: usize = 0;
pub const HEIGHT: usize = 1;
pub const POINT: usize = 0;
pub const DIMENSIONS: usize = 1;

pub trait Vec2Ext {
	fn add(self, other: Self) -> Self;
	fn sub(self, other: Self) -> Self;
	fn mul(self, factor: usize) -> Self;
	fn minEach(self, other: Self) -> Self;
	fn area(self) -> usize;
}

impl Vec2Ext for Vec2 {
	#[inline]
	fn add(self, other: Self) -> Self {
		[self[X] + other[X], self[Y] + other[Y]]
	}
	#[inline]
	fn sub(self, other: Self) -> Self {
		[self[X] - other[X], self[Y] - other[Y]]
	}
	#[inline]
	fn mul(self, factor: usize) -> Self {
		[self[X] * factor, self[Y] * factor]
	}
	#[inline]
	fn minEach(self, other: Self) -> Self {
		[self[X].min(other[X]), self[Y].min(other[Y])]
	}
	#[inline]
	fn area(self) -> usize {
		self[WIDTH] * self[HEIGHT]
	}
}
