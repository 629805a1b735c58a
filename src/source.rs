//! Turning source files into pixel buffers, and resizing them.

use {
	crate::{Error, PixelBuffer, Result, Vec2, HEIGHT, WIDTH},
	image::{imageops, RgbaImage},
	png::{ColorType, Transformations},
	std::{
		fs::File,
		io::{BufReader, Read},
		path::Path,
	},
};

#[inline(always)]
pub fn argb(r: u8, g: u8, b: u8, a: u8) -> u32 {
	u32::from_be_bytes([a, r, g, b])
}

impl PixelBuffer {
	/// Decodes any PNG, normalising it to 8-bit channels with alpha.
	pub fn fromPNG<R: Read>(reader: R) -> Result<Self> {
		let mut decoder = png::Decoder::new(reader);
		decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
		let mut png = decoder.read_info()?;
		let mut data = vec![0; png.output_buffer_size()];
		let info = png.next_frame(&mut data)?;
		let data = &data[..info.buffer_size()];
		let pixels = match info.color_type {
			ColorType::Rgba => data.chunks_exact(4).map(|c| argb(c[0], c[1], c[2], c[3])).collect(),
			ColorType::Rgb => data.chunks_exact(3).map(|c| argb(c[0], c[1], c[2], u8::MAX)).collect(),
			ColorType::GrayscaleAlpha => data.chunks_exact(2).map(|c| argb(c[0], c[0], c[0], c[1])).collect(),
			ColorType::Grayscale => data.iter().map(|&v| argb(v, v, v, u8::MAX)).collect(),
			ColorType::Indexed => return Err(Error::UnsupportedSource("palette was not expanded".into())),
		};
		Self::fromWidthPixels(info.width as _, pixels)
	}

	pub fn fromPNGFile(path: &Path) -> Result<Self> {
		Self::fromPNG(BufReader::new(File::open(path)?))
	}
}

/// Produces a buffer of exactly the requested size from arbitrary source pixels.
pub trait Resample {
	fn resample(&self, source: &PixelBuffer, dimensions: Vec2) -> Result<PixelBuffer>;
}

/// Catmull-Rom bicubic filtering through the `image` crate. Samples beyond the
/// source edge are clamped to it, so cell borders do not bleed in transparency.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bicubic;

impl Resample for Bicubic {
	fn resample(&self, source: &PixelBuffer, dimensions: Vec2) -> Result<PixelBuffer> {
		let invalid = || Error::InvalidDimensions { width: dimensions[WIDTH], height: dimensions[HEIGHT] };
		let [width, height] = dimensions.map(u32::try_from);
		let (width, height) = (width.map_err(|_| invalid())?, height.map_err(|_| invalid())?);
		if width == 0 || height == 0 {
			return Err(invalid());
		}
		let rgba = RgbaImage::from_raw(
			source.width as _,
			source.height as _,
			source.pixels().iter().flat_map(|&px| rgbaBytes(px)).collect(),
		)
		.ok_or_else(|| Error::InvalidDimensions { width: source.width, height: source.height })?;
		// edge samples are clamped, not mirrored; either way no transparency bleeds in
		let resized = imageops::resize(&rgba, width, height, imageops::FilterType::CatmullRom);
		PixelBuffer::fromWidthPixels(
			width as _,
			resized.into_raw().chunks_exact(4).map(|c| argb(c[0], c[1], c[2], c[3])).collect(),
		)
	}
}

#[inline(always)]
fn rgbaBytes(pixel: u32) -> [u8; 4] {
	let [a, r, g, b] = pixel.to_be_bytes();
	[r, g, b, a]
}
