use {
	crate::{
		classify::{DefinitionConfig, MapDefinition, Mode},
		png_stream::{EncodeOptions, DEFAULT_IDAT_BUDGET},
		Result,
	},
	serde::Deserialize,
	std::{fs, path::Path},
};

/// Settings read from a TOML file. Anything left out keeps its default.
///
/// ```toml
/// compressionLevel = 6
/// approxIdatSize = 1048576
///
/// [[definition]]
/// primary = '^Tile_(?P<x>-?\d+)_(?P<y>-?\d+)_(?P<name>\w+)\.png$'
/// negY = true
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub compressionLevel: u32,
	pub approxIdatSize: usize,
	#[serde(rename = "definition")]
	pub definitions: Vec<DefinitionConfig>,
}

impl Default for Config {
	fn default() -> Self {
		Self { compressionLevel: 9, approxIdatSize: DEFAULT_IDAT_BUDGET, definitions: Vec::new() }
	}
}

impl Config {
	pub fn fromTOML(toml: &str) -> Result<Self> {
		Ok(toml::from_str(toml)?)
	}

	pub fn fromFile(path: &Path) -> Result<Self> {
		Self::fromTOML(&fs::read_to_string(path)?)
	}

	pub fn encodeOptions(&self) -> Result<EncodeOptions> {
		EncodeOptions::new(self.compressionLevel, self.approxIdatSize)
	}

	/// The configured definitions, or the preset for `mode` when there are none.
	pub fn mapDefinitions(&self, mode: Mode) -> Result<Vec<MapDefinition>> {
		if self.definitions.is_empty() {
			return Ok(vec![MapDefinition::try_from(&mode.definition())?]);
		}
		self.definitions.iter().map(MapDefinition::try_from).collect()
	}
}

#[cfg(test)]
mod tests {
	use {super::*, crate::Error};

	#[test]
	fn empty_file_is_all_defaults() {
		assert_eq!(Config::fromTOML("").unwrap(), Config::default());
		let options = Config::default().encodeOptions().unwrap();
		assert_eq!(options.approxIdatSize, DEFAULT_IDAT_BUDGET);
		assert_eq!(options.compression.level(), 9);
	}

	#[test]
	fn definitions_replace_the_preset() {
		let config = Config::fromTOML(
			r#"
			compressionLevel = 3
			[[definition]]
			primary = '^T_(?P<x>\d+)_(?P<y>\d+)_(?P<name>\w+)\.png$'
			negY = true
			"#,
		)
		.unwrap();
		assert_eq!(config.compressionLevel, 3);
		let definitions = config.mapDefinitions(Mode::UiMap).unwrap();
		assert_eq!(definitions.len(), 1);
		assert!(definitions[0].negY && !definitions[0].negX && definitions[0].fallback.is_none());
	}

	#[test]
	fn preset_is_used_without_definitions() {
		let definitions = Config::default().mapDefinitions(Mode::UiMap).unwrap();
		assert!(definitions[0].fallback.is_some());
	}

	#[test]
	fn bad_values_are_reported() {
		assert!(matches!(Config::fromTOML("compressionLevel = 'max'"), Err(Error::Config(_))));
		assert!(matches!(Config::fromTOML("colour = 1"), Err(Error::Config(_))));
		let config = Config { approxIdatSize: 0, ..Config::default() };
		assert!(matches!(config.encodeOptions(), Err(Error::InvalidChunkBudget(0))));
	}
}
