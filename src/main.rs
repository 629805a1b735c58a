#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	anyhow::{Context, Result},
	clap::Parser,
	std::path::PathBuf,
	tile_map_merge::{classify::Mode, compositor, config::Config},
	tracing::info,
	tracing_subscriber::EnvFilter,
};

/// Stitches coordinate-named tiles into one PNG per map.
#[derive(Parser, Debug)]
struct Args {
	inputDir: PathBuf,
	outputDir: PathBuf,
	/// `ui-map` (1) or `terrain` (2); ignored when the config defines its own patterns
	#[clap(long, default_value = "ui-map")]
	mode: Mode,
	/// TOML file with `compressionLevel`, `approxIdatSize` and `[[definition]]` tables
	#[clap(long)]
	config: Option<PathBuf>,
	/// zlib effort, 0 (fastest) to 9 (smallest)
	#[clap(long)]
	compressionLevel: Option<u32>,
	/// Bytes of compressed data per IDAT chunk, roughly
	#[clap(long)]
	approxIdatSize: Option<usize>,
}

fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_writer(std::io::stderr)
		.init();
	let Args { inputDir, outputDir, mode, config, compressionLevel, approxIdatSize } = Args::parse();
	let mut config = match &config {
		Some(path) => Config::fromFile(path).with_context(|| format!("{}", path.display()))?,
		None => Config::default(),
	};
	if let Some(compressionLevel) = compressionLevel {
		config.compressionLevel = compressionLevel;
	}
	if let Some(approxIdatSize) = approxIdatSize {
		config.approxIdatSize = approxIdatSize;
	}
	let definitions = config.mapDefinitions(mode)?;
	let outputs = compositor::run(&config, &definitions, &inputDir, &outputDir)
		.with_context(|| format!("{} -> {}", inputDir.display(), outputDir.display()))?;
	info!("{} merged image(s) written", outputs.len());
	Ok(())
}
