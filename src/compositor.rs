//! Grid to image: one merged PNG per group.

use {
	crate::{
		classify::{Classified, MapDefinition, Role},
		config::Config,
		pixel_buffer::TRANSPARENT,
		png_stream::{self, EncodeOptions},
		source::{Bicubic, Resample},
		tile_grid::Tile,
		Error, PixelBuffer, Result, Shared, TileGrid, Vec2, Vec2Ext,
	},
	glam::IVec2,
	std::{
		collections::BTreeMap,
		fs::{self, File},
		io::BufWriter,
		path::{Path, PathBuf},
	},
	tracing::{debug, info, warn},
};

pub struct Composite {
	pub buffer: PixelBuffer,
	/// Grid size in cells, `[columns, rows]`.
	pub cells: Vec2,
}

/// Draws every cell of `grid` into a fresh buffer, then releases the grid.
/// Returns `None` for a grid without entries.
pub fn composite<R: Resample + ?Sized>(grid: TileGrid, resampler: &R) -> Result<Option<Composite>> {
	if grid.isEmpty() {
		return Ok(None);
	}
	let (lt, rb) = grid.boundingBox()?;
	let unit = grid.unitSize()?;
	let span = |from: i32, to: i32| (i64::from(to) - i64::from(from)) as usize;
	let cells = [span(lt.x, rb.x) + 1, span(lt.y, rb.y) + 1];
	let oversized = || Error::Oversized { columns: cells[0], rows: cells[1], unit };
	let width = cells[0].checked_mul(unit).ok_or_else(oversized)?;
	let height = cells[1].checked_mul(unit).ok_or_else(oversized)?;
	let mut buffer = PixelBuffer::fromWidthHeight(width, height)?;
	for y in lt.y..=rb.y {
		for x in lt.x..=rb.x {
			let rect = [[span(lt.x, x), span(lt.y, y)].mul(unit), [unit, unit]];
			debug!("{x},{y}:{rect:?}");
			match grid.get(IVec2::new(x, y)).and_then(Shared::value) {
				None => buffer.fill(TRANSPARENT, rect),
				Some(tile) => PixelBuffer::fromSource(&tile, [unit, unit], resampler)?.copyRect(&mut buffer, rect),
			}
		}
	}
	grid.dispose();
	Ok(Some(Composite { buffer, cells }))
}

/// `Merged_{name}_{columns}x{rows}@{width}x{height}.png`
pub fn outputFileName(name: &str, composite: &Composite) -> String {
	let ([columns, rows], [width, height]) = (composite.cells, composite.buffer.dimensions());
	format!("Merged_{name}_{columns}x{rows}@{width}x{height}.png")
}

/// Composites one group and writes it into `outputDir`. The file is written under a
/// temporary name and only renamed into place once complete.
pub fn mergeGroup<R: Resample + ?Sized>(
	name: &str,
	grid: TileGrid,
	resampler: &R,
	outputDir: &Path,
	options: EncodeOptions,
) -> Result<Option<PathBuf>> {
	let Some(composite) = composite(grid, resampler)? else {
		return Ok(None);
	};
	let output = outputDir.join(outputFileName(name, &composite));
	info!("{}", output.display());
	publish(&output, |file| png_stream::writePNG(&composite.buffer, file, options).map(|_| ()))?;
	Ok(Some(output))
}

/// Runs `write` against `<output>.part` and renames the result onto `output`. On
/// failure the part file is removed and `output` is left untouched.
fn publish(output: &Path, write: impl FnOnce(&mut BufWriter<File>) -> Result<()>) -> Result<()> {
	let partial = output.with_extension("png.part");
	let written = (|| -> Result<()> {
		let mut file = BufWriter::new(File::create(&partial)?);
		write(&mut file)?;
		file.into_inner().map_err(|err| err.into_error())?.sync_all()?;
		Ok(())
	})();
	if let Err(err) = written {
		if let Err(removeErr) = fs::remove_file(&partial) {
			warn!("{}: {removeErr}", partial.display());
		}
		return Err(err);
	}
	fs::rename(&partial, output)?;
	Ok(())
}

/// Grids by group name, in name order.
#[derive(Default)]
pub struct Groups(BTreeMap<String, TileGrid>);

impl Groups {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `tile` in the role `classified` describes, taking the share that role
	/// needs. A primary entry that replaces an earlier one releases it.
	pub fn add(&mut self, classified: Classified, tile: &Tile) {
		let grid = self.0.entry(classified.group).or_default();
		match classified.role {
			Role::Fallback => grid.setFallback(Some(tile.clone())),
			Role::Primary(at) => {
				tile.increase();
				if let Some(replaced) = grid.set(at, Some(tile.clone())) {
					warn!("tile at {at} given twice");
					replaced.decrease();
				}
			}
		}
	}

	pub fn get(&self, name: &str) -> Option<&TileGrid> {
		self.0.get(name)
	}
}

impl IntoIterator for Groups {
	type Item = (String, TileGrid);
	type IntoIter = std::collections::btree_map::IntoIter<String, TileGrid>;
	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

/// Classifies the files directly inside `inputDir` (sorted by name) and loads each
/// file that plays at least one role, once.
pub fn collect(inputDir: &Path, definitions: &[MapDefinition]) -> Result<Groups> {
	let mut paths = Vec::new();
	for entry in fs::read_dir(inputDir)? {
		let path = entry?.path();
		// follows symlinks
		if path.is_file() {
			paths.push(path);
		}
	}
	paths.sort();
	let mut groups = Groups::new();
	for path in paths {
		let Some(fileName) = path.file_name().and_then(|name| name.to_str()) else {
			continue;
		};
		let roles: Vec<_> = definitions.iter().flat_map(|definition| definition.classify(fileName)).collect();
		if roles.is_empty() {
			continue;
		}
		info!("{}", path.display());
		let tile = Shared::new(PixelBuffer::fromPNGFile(&path)?);
		for classified in roles {
			groups.add(classified, &tile);
		}
	}
	Ok(groups)
}

/// The whole job: collect, then merge group by group. Returns the files written.
pub fn run(config: &Config, definitions: &[MapDefinition], inputDir: &Path, outputDir: &Path) -> Result<Vec<PathBuf>> {
	let options = config.encodeOptions()?;
	let groups = collect(inputDir, definitions)?;
	let mut outputs = Vec::new();
	for (name, grid) in groups {
		info!("{name}");
		if let Some(output) = mergeGroup(&name, grid, &Bicubic, outputDir, options)? {
			outputs.push(output);
		}
	}
	Ok(outputs)
}
