use {std::io, thiserror::Error};

#[derive(Debug, Error)]
pub enum Error {
	#[error("invalid pixel buffer dimensions {width}x{height}")]
	InvalidDimensions { width: usize, height: usize },

	#[error("{columns}x{rows} cells of {unit} pixels do not fit in memory")]
	Oversized { columns: usize, rows: usize, unit: usize },

	#[error("tile grid has no entries")]
	EmptyGrid,

	#[error("compression level {0} is outside 0..=9")]
	InvalidCompressionLevel(u32),

	#[error("approximate IDAT size {0} is outside 1..={max}", max = crate::png_stream::MAX_IDAT_BUDGET)]
	InvalidChunkBudget(usize),

	#[error("unsupported source image: {0}")]
	UnsupportedSource(String),

	#[error("file name pattern {pattern:?}: {source}")]
	Pattern { pattern: String, source: regex::Error },

	#[error("configuration: {0}")]
	Config(#[from] toml::de::Error),

	#[error(transparent)]
	Decode(#[from] png::DecodingError),

	#[error(transparent)]
	Io(#[from] io::Error),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
