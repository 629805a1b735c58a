use crate::{
	source::Resample, Error, Rectangle, Result, Vec2, Vec2Ext, DIMENSIONS, POINT, X, Y,
};

/// Fully transparent; also what a freshly allocated buffer holds.
pub const TRANSPARENT: u32 = 0;

/// Row-major packed pixels. Each word is `0xAARRGGBB`, i.e. the bytes B, G, R, A
/// when laid out little-endian.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
	pub width: usize,
	pub height: usize,
	pixels: Vec<u32>,
}

impl PixelBuffer {
	pub fn fromWidthHeight(width: usize, height: usize) -> Result<Self> {
		let len = match width.checked_mul(height) {
			Some(len) if len != 0 => len,
			_ => return Err(Error::InvalidDimensions { width, height }),
		};
		Ok(Self { width, height, pixels: vec![TRANSPARENT; len] })
	}

	pub fn fromWidthPixels(width: usize, pixels: Vec<u32>) -> Result<Self> {
		let height = if width == 0 { 0 } else { pixels.len() / width };
		if height == 0 || width * height != pixels.len() {
			return Err(Error::InvalidDimensions { width, height });
		}
		Ok(Self { width, height, pixels })
	}

	/// A buffer of exactly `dimensions` holding `source` resampled by `resampler`.
	/// Same-sized requests are served with a plain copy.
	pub fn fromSource<R: Resample + ?Sized>(source: &Self, dimensions: Vec2, resampler: &R) -> Result<Self> {
		if dimensions == source.dimensions() {
			return Ok(source.clone());
		}
		let resampled = resampler.resample(source, dimensions)?;
		debug_assert_eq!(resampled.dimensions(), dimensions);
		Ok(resampled)
	}

	#[inline]
	pub fn dimensions(&self) -> Vec2 {
		[self.width, self.height]
	}

	#[inline]
	pub fn pixels(&self) -> &[u32] {
		&self.pixels
	}

	#[inline]
	pub fn offset(&self, point: Vec2) -> usize {
		point[Y] * self.width + point[X]
	}

	#[inline]
	pub fn pixel(&self, point: Vec2) -> u32 {
		self.pixels[self.offset(point)]
	}

	#[inline]
	pub fn setPixel(&mut self, point: Vec2, color: u32) {
		let offset = self.offset(point);
		self.pixels[offset] = color;
	}

	pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u32]> + '_ {
		self.pixels.chunks_exact(self.width)
	}

	/// Copies `rect[DIMENSIONS]` pixels starting at this buffer's origin into `dst` at
	/// `rect[POINT]`. The rectangle must fit both buffers.
	pub fn copyRect(&self, dst: &mut Self, rect: Rectangle) {
		let [width, height] = rect[DIMENSIONS];
		debug_assert!(width <= self.width && height <= self.height);
		debug_assert!({
			let end = rect[POINT].add(rect[DIMENSIONS]);
			end[X] <= dst.width && end[Y] <= dst.height
		});
		let (mut srcOffset, mut dstOffset) = (0, dst.offset(rect[POINT]));
		for _ in 0..height {
			dst.pixels[dstOffset..dstOffset + width].copy_from_slice(&self.pixels[srcOffset..srcOffset + width]);
			srcOffset += self.width;
			dstOffset += dst.width;
		}
	}

	/// `copyRect` clipped to whatever part of this buffer fits `dst` at `point`.
	pub fn copyAt(&self, dst: &mut Self, point: Vec2) {
		if point[X] >= dst.width || point[Y] >= dst.height {
			return;
		}
		self.copyRect(dst, [point, self.dimensions().minEach(dst.dimensions().sub(point))]);
	}

	pub fn fill(&mut self, color: u32, rect: Rectangle) {
		let [width, height] = rect[DIMENSIONS];
		let mut offset = self.offset(rect[POINT]);
		if width == self.width {
			self.pixels[offset..offset + rect[DIMENSIONS].area()].fill(color);
		} else {
			for _ in 0..height {
				self.pixels[offset..offset + width].fill(color);
				offset += self.width;
			}
		}
	}
}

impl core::fmt::Debug for PixelBuffer {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "PixelBuffer({}x{})", self.width, self.height)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn numbered(width: usize, height: usize) -> PixelBuffer {
		PixelBuffer::fromWidthPixels(width, (1..=(width * height) as u32).collect()).unwrap()
	}

	#[test]
	fn zero_sized_buffers_are_rejected() {
		for [width, height] in [[0, 4], [4, 0], [0, 0]] {
			assert!(matches!(
				PixelBuffer::fromWidthHeight(width, height),
				Err(Error::InvalidDimensions { .. })
			));
		}
		assert!(matches!(
			PixelBuffer::fromWidthHeight(usize::MAX, 2),
			Err(Error::InvalidDimensions { .. })
		));
		assert!(PixelBuffer::fromWidthPixels(3, vec![0; 7]).is_err());
	}

	#[test]
	fn new_buffer_is_transparent() {
		let buffer = PixelBuffer::fromWidthHeight(3, 2).unwrap();
		assert_eq!(buffer.pixels(), &[TRANSPARENT; 6]);
		assert_eq!(buffer.rows().len(), 2);
	}

	#[test]
	fn copy_rect_touches_only_the_target_region() {
		let src = numbered(3, 2);
		let mut dst = PixelBuffer::fromWidthPixels(6, vec![0xDEAD_BEEF; 30]).unwrap();
		let [ox, oy] = [2, 1];
		src.copyRect(&mut dst, [[ox, oy], [3, 2]]);
		for y in 0..dst.height {
			for x in 0..dst.width {
				let inside = (ox..ox + 3).contains(&x) && (oy..oy + 2).contains(&y);
				let expected = if inside { src.pixel([x - ox, y - oy]) } else { 0xDEAD_BEEF };
				assert_eq!(dst.pixel([x, y]), expected, "({x}, {y})");
			}
		}
	}

	#[test]
	fn copy_rect_takes_the_top_left_part_of_the_source() {
		let src = numbered(4, 4);
		let mut dst = PixelBuffer::fromWidthHeight(4, 4).unwrap();
		src.copyRect(&mut dst, [[1, 1], [2, 3]]);
		assert_eq!(dst.pixel([1, 1]), src.pixel([0, 0]));
		assert_eq!(dst.pixel([2, 3]), src.pixel([1, 2]));
		assert_eq!(dst.pixel([3, 1]), TRANSPARENT);
		assert_eq!(dst.pixel([0, 0]), TRANSPARENT);
	}

	#[test]
	fn copy_at_clips_to_destination() {
		let src = numbered(4, 4);
		let mut dst = PixelBuffer::fromWidthHeight(5, 5).unwrap();
		src.copyAt(&mut dst, [3, 2]);
		assert_eq!(dst.pixel([3, 2]), src.pixel([0, 0]));
		assert_eq!(dst.pixel([4, 4]), src.pixel([1, 2]));
		assert_eq!(dst.pixels().iter().filter(|&&px| px != TRANSPARENT).count(), 2 * 3);

		let mut untouched = PixelBuffer::fromWidthHeight(2, 2).unwrap();
		src.copyAt(&mut untouched, [2, 0]);
		assert_eq!(untouched.pixels(), &[TRANSPARENT; 4]);
	}

	#[test]
	fn fill_full_width_rows() {
		let mut buffer = numbered(4, 4);
		let before = buffer.clone();
		buffer.fill(7, [[0, 1], [4, 2]]);
		for y in 0..4 {
			for x in 0..4 {
				let expected = if (1..3).contains(&y) { 7 } else { before.pixel([x, y]) };
				assert_eq!(buffer.pixel([x, y]), expected);
			}
		}
	}

	#[test]
	fn fill_partial_rows() {
		let mut buffer = numbered(5, 4);
		let before = buffer.clone();
		buffer.fill(7, [[1, 1], [3, 2]]);
		for y in 0..4 {
			for x in 0..5 {
				let inside = (1..4).contains(&x) && (1..3).contains(&y);
				let expected = if inside { 7 } else { before.pixel([x, y]) };
				assert_eq!(buffer.pixel([x, y]), expected);
			}
		}
	}

	#[test]
	fn both_fill_paths_agree() {
		let [mut fast, mut slow] = [numbered(4, 3), numbered(4, 3)];
		fast.fill(9, [[0, 0], [4, 3]]);
		for y in 0..3 {
			slow.fill(9, [[0, y], [2, 1]]);
			slow.fill(9, [[2, y], [2, 1]]);
		}
		assert_eq!(fast, slow);
	}

	#[test]
	fn same_size_source_is_copied_without_resampling() {
		struct Refuse;
		impl Resample for Refuse {
			fn resample(&self, _: &PixelBuffer, _: Vec2) -> Result<PixelBuffer> {
				panic!("resampler called for an identity resize");
			}
		}
		let src = numbered(3, 3);
		assert_eq!(PixelBuffer::fromSource(&src, [3, 3], &Refuse).unwrap(), src);
	}
}
