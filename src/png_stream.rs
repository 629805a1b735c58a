//! PNG output that never holds the whole compressed image.
//!
//! Scanlines are reordered into RGBA and pushed through a zlib stream whose sink cuts
//! the compressed bytes into IDAT chunks of roughly `approxIdatSize` bytes, each with
//! its own CRC. Only filter type 0 is used.

use {
	crate::{Error, PixelBuffer, Result},
	byteorder::{WriteBytesExt, BE},
	core::mem,
	crc32fast::Hasher,
	flate2::{write::ZlibEncoder, Compression},
	std::io::{self, Write},
};

pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];
#[rustfmt::skip]
pub const IEND: [u8; 12] = [
	0x00, 0x00, 0x00, 0x00, b'I', b'E', b'N', b'D',
	0xAE, 0x42, 0x60, 0x82,
];
const IDAT: &[u8; 4] = b"IDAT";

pub const MAX_IDAT_BUDGET: usize = 1 << 30;
pub const DEFAULT_IDAT_BUDGET: usize = 1 << 24;
/// PNG caps width and height at 2^31 - 1.
pub const MAX_DIMENSION: usize = i32::MAX as usize;

#[derive(Clone, Copy, Debug)]
pub struct EncodeOptions {
	pub compression: Compression,
	pub approxIdatSize: usize,
}

impl EncodeOptions {
	pub fn new(compressionLevel: u32, approxIdatSize: usize) -> Result<Self> {
		if compressionLevel > 9 {
			return Err(Error::InvalidCompressionLevel(compressionLevel));
		}
		if !(1..=MAX_IDAT_BUDGET).contains(&approxIdatSize) {
			return Err(Error::InvalidChunkBudget(approxIdatSize));
		}
		Ok(Self { compression: Compression::new(compressionLevel), approxIdatSize })
	}
}

impl Default for EncodeOptions {
	fn default() -> Self {
		Self { compression: Compression::best(), approxIdatSize: DEFAULT_IDAT_BUDGET }
	}
}

/// `0xAARRGGBB` to `0xAABBGGRR`, whose little-endian bytes are R, G, B, A.
#[inline(always)]
pub fn toPngOrder(pixel: u32) -> u32 {
	(pixel & 0xFF00_FF00) | (pixel & 0x00FF_00FF).rotate_right(16)
}

/// Writes `buffer` as a truecolor-with-alpha PNG and hands `destination` back.
pub fn writePNG<W: Write>(buffer: &PixelBuffer, mut destination: W, options: EncodeOptions) -> Result<W> {
	let [width, height] = buffer.dimensions();
	if width > MAX_DIMENSION || height > MAX_DIMENSION {
		return Err(Error::InvalidDimensions { width, height });
	}
	writeHeader(&mut destination, width as _, height as _)?;
	let mut body = ZlibEncoder::new(IdatWriter::new(destination, options.approxIdatSize), options.compression);
	{
		let line = &mut vec![0_u8; 1 + width * 4];
		for row in buffer.rows() {
			for (bytes, &pixel) in line[1..].chunks_exact_mut(4).zip(row) {
				bytes.copy_from_slice(&toPngOrder(pixel).to_le_bytes());
			}
			body.write_all(line)?;
		}
	}
	let mut destination = body.finish()?.finish()?;
	destination.write_all(&IEND)?;
	Ok(destination)
}

fn writeHeader<W: Write>(destination: &mut W, width: u32, height: u32) -> io::Result<()> {
	let header = &mut Vec::with_capacity(33);
	header.extend_from_slice(&SIGNATURE);
	header.write_u32::<BE>(13)?;
	header.extend_from_slice(b"IHDR");
	header.write_u32::<BE>(width)?;
	header.write_u32::<BE>(height)?;
	// bit depth, color type RGBA, compression, filter, interlace
	header.extend_from_slice(&[8, 6, 0, 0, 0]);
	let crc = crc32fast::hash(&header[12..]);
	header.write_u32::<BE>(crc)?;
	destination.write_all(header)
}

/// Sink for the zlib stream: collects bytes and emits them as IDAT chunks.
pub struct IdatWriter<W: Write> {
	base: W,
	pending: Vec<u8>,
	crc: Hasher,
	approxSize: usize,
}

impl<W: Write> IdatWriter<W> {
	pub fn new(base: W, approxSize: usize) -> Self {
		let approxSize = approxSize.clamp(1, MAX_IDAT_BUDGET);
		Self { base, pending: Vec::with_capacity(approxSize), crc: seededCrc(), approxSize }
	}

	fn flushChunk(&mut self) -> io::Result<()> {
		if self.pending.is_empty() {
			return Ok(());
		}
		self.base.write_u32::<BE>(self.pending.len() as _)?;
		self.base.write_all(IDAT)?;
		self.base.write_all(&self.pending)?;
		self.base.write_u32::<BE>(mem::replace(&mut self.crc, seededCrc()).finalize())?;
		self.pending.clear();
		Ok(())
	}

	/// Emits whatever is still pending and returns the underlying writer.
	pub fn finish(mut self) -> io::Result<W> {
		self.flushChunk()?;
		Ok(self.base)
	}
}

fn seededCrc() -> Hasher {
	let mut crc = Hasher::new();
	crc.update(IDAT);
	crc
}

impl<W: Write> Write for IdatWriter<W> {
	fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
		if self.pending.len() + bytes.len() > self.approxSize {
			self.flushChunk()?;
		}
		let bytes = &bytes[..bytes.len().min(self.approxSize)];
		self.crc.update(bytes);
		self.pending.extend_from_slice(bytes);
		Ok(bytes.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		self.flushChunk()?;
		self.base.flush()
	}
}
