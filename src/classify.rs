//! Deriving `(group, role)` from a source file name.

use {
	crate::{Error, Result},
	core::str::FromStr,
	glam::IVec2,
	regex::{Captures, Regex},
	serde::Deserialize,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Role {
	Primary(IVec2),
	Fallback,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Classified {
	pub group: String,
	pub role: Role,
}

/// How one family of file names maps onto grids. `primary` must capture `name`, `x`
/// and `y`; `fallback` only `name`. Coordinates are transformed in order: swap, then
/// negate.
#[derive(Clone, Debug)]
pub struct MapDefinition {
	pub primary: Regex,
	pub fallback: Option<Regex>,
	pub flipXY: bool,
	pub negX: bool,
	pub negY: bool,
}

/// The serialised form of a `MapDefinition`, as found in a config file.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DefinitionConfig {
	pub primary: String,
	#[serde(default)]
	pub fallback: Option<String>,
	#[serde(default)]
	pub flipXY: bool,
	#[serde(default)]
	pub negX: bool,
	#[serde(default)]
	pub negY: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
	UiMap,
	Terrain,
}

impl FromStr for Mode {
	type Err = String;
	fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
		match s {
			"1" | "ui-map" => Ok(Self::UiMap),
			"2" | "terrain" => Ok(Self::Terrain),
			_ => Err(format!("unknown mode {s:?}, expected `ui-map` or `terrain`")),
		}
	}
}

impl Mode {
	pub fn definition(self) -> DefinitionConfig {
		match self {
			Self::UiMap => DefinitionConfig {
				primary: r"^UI_(?P<name>Map.+)_(?P<x>-?[0-9]+)_(?P<y>-?[0-9]+)\.png$".into(),
				fallback: Some(r"^UI_(?P<name>Map.+)_None\.png$".into()),
				flipXY: true,
				negX: true,
				negY: true,
			},
			Self::Terrain => DefinitionConfig {
				primary: r"^BigWorldTerrain_(?P<x>-?[0-9]+)_(?P<y>-?[0-9]+)\.bin_(?P<name>.+)\.png$".into(),
				fallback: None,
				flipXY: false,
				negX: false,
				negY: true,
			},
		}
	}
}

fn compile(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| Error::Pattern { pattern: pattern.into(), source })
}

impl TryFrom<&DefinitionConfig> for MapDefinition {
	type Error = Error;
	fn try_from(config: &DefinitionConfig) -> Result<Self> {
		Ok(Self {
			primary: compile(&config.primary)?,
			fallback: config.fallback.as_deref().map(compile).transpose()?,
			flipXY: config.flipXY,
			negX: config.negX,
			negY: config.negY,
		})
	}
}

impl MapDefinition {
	/// Every role `fileName` plays. Empty when it matches nothing usable; a primary
	/// match whose coordinates do not parse as `i32` is dropped.
	pub fn classify(&self, fileName: &str) -> Vec<Classified> {
		let mut roles = Vec::with_capacity(2);
		let fallback = self.fallback.as_ref().and_then(|fallback| fallback.captures(fileName));
		if let Some(name) = fallback.as_ref().and_then(|captures| captures.name("name")) {
			roles.push(Classified { group: name.as_str().into(), role: Role::Fallback });
		}
		if let Some((group, at)) = self.primary.captures(fileName).and_then(|captures| self.coordinate(&captures)) {
			roles.push(Classified { group, role: Role::Primary(at) });
		}
		roles
	}

	fn coordinate(&self, captures: &Captures<'_>) -> Option<(String, IVec2)> {
		let parse = |key: &str| captures.name(key)?.as_str().parse::<i32>().ok();
		let mut at = IVec2::new(parse("x")?, parse("y")?);
		if self.flipXY {
			at = IVec2::new(at.y, at.x);
		}
		if self.negX {
			at.x = at.x.checked_neg()?;
		}
		if self.negY {
			at.y = at.y.checked_neg()?;
		}
		Some((captures.name("name")?.as_str().into(), at))
	}
}
