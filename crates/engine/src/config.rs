//! Typed decoration options.
//!
//! Options are read from TOML once, at load time. Top-level keys form the
//! global scope; `[languages.<id>]` tables override any subset per language.
//! A value that fails validation is logged and replaced by its default, so
//! the engine never sees an unvalidated option.
//!
//! ```toml
//! indent_mode = "smart"
//! token_color_map = { TODO = "#FF8800", self = "none" }
//!
//! [languages.markdown]
//! enabled = false
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use phitint_color::HexColor;
use rustc_hash::FxHashMap;
use strum::{Display, EnumString, IntoStaticStr};
use toml::{Table, Value};
use tracing::warn;

use crate::error::{ConfigError, Result};

/// How a category treats regular and cursor-related ("active") entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum EmphasisMode {
	/// Category disabled.
	None,
	/// Regular entries only.
	Light,
	/// Active entries only.
	Smart,
	/// Regular entries plus emphasized active entries.
	Full,
}

impl EmphasisMode {
	pub fn is_enabled(self) -> bool {
		self != Self::None
	}

	pub fn shows_regular(self) -> bool {
		matches!(self, Self::Light | Self::Full)
	}

	pub fn shows_active(self) -> bool {
		matches!(self, Self::Smart | Self::Full)
	}
}

/// Which editors share one strong-token set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ActiveScope {
	Editor,
	Document,
	Window,
}

/// Overview-ruler lane for a decoration's marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum OverviewLane {
	Left,
	Center,
	Right,
	Full,
}

/// When the "document too large" advisory may be raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
pub enum OverLimitNotice {
	#[strum(serialize = "none")]
	Never,
	#[strum(serialize = "until 16x")]
	Until16x,
	#[strum(serialize = "until 256x")]
	Until256x,
	#[strum(serialize = "always")]
	Always,
}

impl OverLimitNotice {
	/// Whether a document at `ratio` times the limit gets the advisory.
	pub fn admits(self, ratio: f64) -> bool {
		match self {
			Self::Never => false,
			Self::Until16x => ratio < 16.0,
			Self::Until256x => ratio < 256.0,
			Self::Always => true,
		}
	}
}

/// Whether planning is restricted to the visible ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ClipMode {
	None,
	Smart,
	Always,
}

impl ClipMode {
	pub fn applies(self, ratio: f64) -> bool {
		match self {
			Self::None => false,
			Self::Smart => ratio >= 1.0,
			Self::Always => true,
		}
	}
}

/// Indentation unit: inferred per document or forced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentSetting {
	Auto,
	Tab,
	Spaces(u8),
}

impl IndentSetting {
	/// The forced unit text, or `None` to infer it.
	pub fn unit_text(self) -> Option<String> {
		match self {
			Self::Auto => None,
			Self::Tab => Some("\t".to_string()),
			Self::Spaces(n) => Some(" ".repeat(usize::from(n))),
		}
	}
}

impl FromStr for IndentSetting {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"auto" => return Ok(Self::Auto),
			"tab" => return Ok(Self::Tab),
			"1 space" => return Ok(Self::Spaces(1)),
			_ => {}
		}
		s.strip_suffix(" spaces")
			.and_then(|n| n.parse::<u8>().ok())
			.filter(|n| (2..=8).contains(n))
			.map(Self::Spaces)
			.ok_or_else(|| format!("expected auto, tab, or \"N spaces\" with N in 1..=8, got {s:?}"))
	}
}

impl fmt::Display for IndentSetting {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Auto => f.write_str("auto"),
			Self::Tab => f.write_str("tab"),
			Self::Spaces(1) => f.write_str("1 space"),
			Self::Spaces(n) => write!(f, "{n} spaces"),
		}
	}
}

/// Result of looking a token or symbol up in a colour override map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOverride {
	/// No entry: use the category base colour and the derived hue.
	Derived,
	/// Entry with a colour: use it with hue index 0.
	Fixed(HexColor),
	/// Entry set to `"none"`: emit nothing.
	Suppressed,
}

/// Per-token or per-symbol colour overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorOverrides(FxHashMap<String, Option<HexColor>>);

impl ColorOverrides {
	pub fn insert(&mut self, key: impl Into<String>, color: Option<HexColor>) {
		self.0.insert(key.into(), color);
	}

	pub fn lookup(&self, key: &str) -> ColorOverride {
		match self.0.get(key) {
			None => ColorOverride::Derived,
			Some(Some(color)) => ColorOverride::Fixed(*color),
			Some(None) => ColorOverride::Suppressed,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Alpha levels, one byte each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphas {
	pub spaces: u8,
	pub spaces_active: u8,
	pub spaces_error: u8,
	pub blank_lines: u8,
	pub symbol: u8,
	pub token: u8,
	pub token_active: u8,
}

impl Default for Alphas {
	fn default() -> Self {
		Self {
			spaces: 64,
			spaces_active: 128,
			spaces_error: 192,
			blank_lines: 48,
			symbol: 48,
			token: 32,
			token_active: 96,
		}
	}
}

/// Overview markers; `None` disables the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lanes {
	pub indent_error: Option<OverviewLane>,
	pub active_token: Option<OverviewLane>,
	pub trailing_spaces_error: Option<OverviewLane>,
	pub blank_lines: Option<OverviewLane>,
}

impl Default for Lanes {
	fn default() -> Self {
		Self {
			indent_error: Some(OverviewLane::Left),
			active_token: Some(OverviewLane::Center),
			trailing_spaces_error: Some(OverviewLane::Right),
			blank_lines: None,
		}
	}
}

/// Fully validated options for one scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
	pub enabled: bool,
	pub enabled_panels: bool,
	pub file_size_limit: usize,
	pub basic_delay: Duration,
	pub additional_delay: Duration,
	pub clip_delay: Duration,
	pub base_color: HexColor,
	pub space_base_color: Option<HexColor>,
	pub space_error_color: HexColor,
	pub symbol_base_color: Option<HexColor>,
	pub symbol_color_map: ColorOverrides,
	pub token_base_color: Option<HexColor>,
	pub token_color_map: ColorOverrides,
	pub indent_mode: EmphasisMode,
	pub token_mode: EmphasisMode,
	pub line_enabled: bool,
	pub blank_lines_enabled: bool,
	/// Read from the global scope only.
	pub active_scope: ActiveScope,
	pub indent_error_enabled: bool,
	pub trailing_spaces_error_enabled: bool,
	pub body_spaces_enabled: bool,
	pub trailing_spaces_enabled: bool,
	pub symbol_enabled: bool,
	pub lanes: Lanes,
	pub alphas: Alphas,
	pub indent: IndentSetting,
	pub over_limit_notice: OverLimitNotice,
	pub clip_by_visible_range: ClipMode,
}

impl Default for Options {
	fn default() -> Self {
		let base_color = HexColor::new(0x56, 0x79, 0xC9);
		Self {
			enabled: true,
			enabled_panels: false,
			file_size_limit: 1_048_576,
			basic_delay: Duration::from_millis(10),
			additional_delay: Duration::from_millis(200),
			clip_delay: Duration::from_millis(3),
			base_color,
			space_base_color: None,
			space_error_color: HexColor::new(0xDD, 0x44, 0x44),
			symbol_base_color: None,
			symbol_color_map: ColorOverrides::default(),
			token_base_color: None,
			token_color_map: ColorOverrides::default(),
			indent_mode: EmphasisMode::Full,
			token_mode: EmphasisMode::Smart,
			line_enabled: true,
			blank_lines_enabled: true,
			active_scope: ActiveScope::Window,
			indent_error_enabled: true,
			trailing_spaces_error_enabled: false,
			body_spaces_enabled: true,
			trailing_spaces_enabled: true,
			symbol_enabled: false,
			lanes: Lanes::default(),
			alphas: Alphas::default(),
			indent: IndentSetting::Auto,
			over_limit_notice: OverLimitNotice::Until16x,
			clip_by_visible_range: ClipMode::Smart,
		}
	}
}

impl Options {
	pub fn space_base(&self) -> HexColor {
		self.space_base_color.unwrap_or(self.base_color)
	}

	pub fn symbol_base(&self) -> HexColor {
		self.symbol_base_color.unwrap_or(self.base_color)
	}

	pub fn token_base(&self) -> HexColor {
		self.token_base_color.unwrap_or(self.base_color)
	}

	/// Whether any category needs the indent model.
	pub fn needs_indent_model(&self) -> bool {
		self.indent_mode.is_enabled() || self.line_enabled
	}

	/// Resolves one scope: keys present in `table` win, others come from `inherited`.
	fn resolve(table: &Table, scope: &str, inherited: &Options) -> Self {
		let defaults = Options::default();
		let r = Reader { table, scope };
		r.warn_unknown_keys();
		let ms = |key, inherited: Duration, default: Duration, min, max| {
			Duration::from_millis(r.int(key, millis(inherited), millis(default), min, max) as u64)
		};
		Self {
			enabled: r.flag("enabled", inherited.enabled, defaults.enabled),
			enabled_panels: r.flag("enabled_panels", inherited.enabled_panels, defaults.enabled_panels),
			file_size_limit: r.int(
				"file_size_limit",
				inherited.file_size_limit as i64,
				defaults.file_size_limit as i64,
				10_240,
				16_777_216,
			) as usize,
			basic_delay: ms("basic_delay", inherited.basic_delay, defaults.basic_delay, 1, 1500),
			additional_delay: ms(
				"additional_delay",
				inherited.additional_delay,
				defaults.additional_delay,
				0,
				1500,
			),
			clip_delay: ms("clip_delay", inherited.clip_delay, defaults.clip_delay, 0, 1500),
			base_color: r.color("base_color", inherited.base_color, defaults.base_color),
			space_base_color: r.optional_color("space_base_color", inherited.space_base_color),
			space_error_color: r.color(
				"space_error_color",
				inherited.space_error_color,
				defaults.space_error_color,
			),
			symbol_base_color: r.optional_color("symbol_base_color", inherited.symbol_base_color),
			symbol_color_map: r.color_map("symbol_color_map", &inherited.symbol_color_map),
			token_base_color: r.optional_color("token_base_color", inherited.token_base_color),
			token_color_map: r.color_map("token_color_map", &inherited.token_color_map),
			indent_mode: r.choice("indent_mode", inherited.indent_mode, defaults.indent_mode),
			token_mode: r.choice("token_mode", inherited.token_mode, defaults.token_mode),
			line_enabled: r.flag("line_enabled", inherited.line_enabled, defaults.line_enabled),
			blank_lines_enabled: r.flag(
				"blank_lines_enabled",
				inherited.blank_lines_enabled,
				defaults.blank_lines_enabled,
			),
			active_scope: r.choice("active_scope", inherited.active_scope, defaults.active_scope),
			indent_error_enabled: r.flag(
				"indent_error_enabled",
				inherited.indent_error_enabled,
				defaults.indent_error_enabled,
			),
			trailing_spaces_error_enabled: r.flag(
				"trailing_spaces_error_enabled",
				inherited.trailing_spaces_error_enabled,
				defaults.trailing_spaces_error_enabled,
			),
			body_spaces_enabled: r.flag(
				"body_spaces_enabled",
				inherited.body_spaces_enabled,
				defaults.body_spaces_enabled,
			),
			trailing_spaces_enabled: r.flag(
				"trailing_spaces_enabled",
				inherited.trailing_spaces_enabled,
				defaults.trailing_spaces_enabled,
			),
			symbol_enabled: r.flag("symbol_enabled", inherited.symbol_enabled, defaults.symbol_enabled),
			lanes: Lanes {
				indent_error: r.lane("indent_error_lane", inherited.lanes.indent_error, defaults.lanes.indent_error),
				active_token: r.lane("active_token_lane", inherited.lanes.active_token, defaults.lanes.active_token),
				trailing_spaces_error: r.lane(
					"trailing_spaces_error_lane",
					inherited.lanes.trailing_spaces_error,
					defaults.lanes.trailing_spaces_error,
				),
				blank_lines: r.lane("blank_lines_lane", inherited.lanes.blank_lines, defaults.lanes.blank_lines),
			},
			alphas: Alphas {
				spaces: r.alpha("spaces_alpha", inherited.alphas.spaces, defaults.alphas.spaces),
				spaces_active: r.alpha(
					"spaces_active_alpha",
					inherited.alphas.spaces_active,
					defaults.alphas.spaces_active,
				),
				spaces_error: r.alpha(
					"spaces_error_alpha",
					inherited.alphas.spaces_error,
					defaults.alphas.spaces_error,
				),
				blank_lines: r.alpha(
					"blank_lines_alpha",
					inherited.alphas.blank_lines,
					defaults.alphas.blank_lines,
				),
				symbol: r.alpha("symbol_alpha", inherited.alphas.symbol, defaults.alphas.symbol),
				token: r.alpha("token_alpha", inherited.alphas.token, defaults.alphas.token),
				token_active: r.alpha(
					"token_active_alpha",
					inherited.alphas.token_active,
					defaults.alphas.token_active,
				),
			},
			indent: r.choice("indent", inherited.indent, defaults.indent),
			over_limit_notice: r.choice(
				"over_limit_notice",
				inherited.over_limit_notice,
				defaults.over_limit_notice,
			),
			clip_by_visible_range: r.choice(
				"clip_by_visible_range",
				inherited.clip_by_visible_range,
				defaults.clip_by_visible_range,
			),
		}
	}
}

fn millis(d: Duration) -> i64 {
	i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

const KNOWN_KEYS: &[&str] = &[
	"enabled",
	"enabled_panels",
	"file_size_limit",
	"basic_delay",
	"additional_delay",
	"clip_delay",
	"base_color",
	"space_base_color",
	"space_error_color",
	"symbol_base_color",
	"symbol_color_map",
	"token_base_color",
	"token_color_map",
	"indent_mode",
	"token_mode",
	"line_enabled",
	"blank_lines_enabled",
	"active_scope",
	"indent_error_enabled",
	"trailing_spaces_error_enabled",
	"body_spaces_enabled",
	"trailing_spaces_enabled",
	"symbol_enabled",
	"indent_error_lane",
	"active_token_lane",
	"trailing_spaces_error_lane",
	"blank_lines_lane",
	"spaces_alpha",
	"spaces_active_alpha",
	"spaces_error_alpha",
	"blank_lines_alpha",
	"symbol_alpha",
	"token_alpha",
	"token_active_alpha",
	"indent",
	"over_limit_notice",
	"clip_by_visible_range",
];

/// String used in TOML to spell an absent colour or lane.
const NONE: &str = "none";

/// Typed access to one scope's table.
struct Reader<'a> {
	table: &'a Table,
	scope: &'a str,
}

impl Reader<'_> {
	fn warn_unknown_keys(&self) {
		for key in self.table.keys() {
			if key != "languages" && !KNOWN_KEYS.contains(&key.as_str()) {
				warn!(scope = self.scope, key = %key, "ignoring unknown option");
			}
		}
	}

	fn invalid<T: fmt::Debug>(&self, key: &str, value: &Value, default: T) -> T {
		warn!(
			scope = self.scope,
			key,
			value = %value,
			default = ?default,
			"invalid option value, using default"
		);
		default
	}

	fn flag(&self, key: &str, inherited: bool, default: bool) -> bool {
		match self.table.get(key) {
			None => inherited,
			Some(Value::Boolean(b)) => *b,
			Some(v) => self.invalid(key, v, default),
		}
	}

	fn int(&self, key: &str, inherited: i64, default: i64, min: i64, max: i64) -> i64 {
		match self.table.get(key) {
			None => inherited,
			Some(Value::Integer(n)) => (*n).clamp(min, max),
			Some(v) => self.invalid(key, v, default),
		}
	}

	fn alpha(&self, key: &str, inherited: u8, default: u8) -> u8 {
		self.int(key, i64::from(inherited), i64::from(default), 0, 255) as u8
	}

	fn color(&self, key: &str, inherited: HexColor, default: HexColor) -> HexColor {
		match self.table.get(key) {
			None => inherited,
			Some(value @ Value::String(s)) => s
				.parse()
				.unwrap_or_else(|_| self.invalid(key, value, default)),
			Some(v) => self.invalid(key, v, default),
		}
	}

	fn optional_color(&self, key: &str, inherited: Option<HexColor>) -> Option<HexColor> {
		match self.table.get(key) {
			None => inherited,
			Some(Value::String(s)) if s == NONE => None,
			Some(value @ Value::String(s)) => match s.parse() {
				Ok(color) => Some(color),
				Err(_) => self.invalid(key, value, None),
			},
			Some(v) => self.invalid(key, v, None),
		}
	}

	fn choice<T>(&self, key: &str, inherited: T, default: T) -> T
	where
		T: FromStr + fmt::Debug,
	{
		match self.table.get(key) {
			None => inherited,
			Some(value @ Value::String(s)) => match s.parse() {
				Ok(choice) => choice,
				Err(_) => self.invalid(key, value, default),
			},
			Some(v) => self.invalid(key, v, default),
		}
	}

	fn lane(
		&self,
		key: &str,
		inherited: Option<OverviewLane>,
		default: Option<OverviewLane>,
	) -> Option<OverviewLane> {
		match self.table.get(key) {
			None => inherited,
			Some(Value::String(s)) if s == NONE => None,
			Some(value @ Value::String(s)) => match s.parse() {
				Ok(lane) => Some(lane),
				Err(_) => self.invalid(key, value, default),
			},
			Some(v) => self.invalid(key, v, default),
		}
	}

	/// Whole-map validation: one bad entry rejects the map.
	fn color_map(&self, key: &str, inherited: &ColorOverrides) -> ColorOverrides {
		let Some(value) = self.table.get(key) else {
			return inherited.clone();
		};
		let Value::Table(entries) = value else {
			return self.invalid(key, value, ColorOverrides::default());
		};
		let mut map = ColorOverrides::default();
		for (name, entry) in entries {
			let color = match entry {
				Value::String(s) if s == NONE => None,
				Value::String(s) => match s.parse() {
					Ok(color) => Some(color),
					Err(_) => return self.invalid(key, value, ColorOverrides::default()),
				},
				_ => return self.invalid(key, value, ColorOverrides::default()),
			};
			map.insert(name.clone(), color);
		}
		map
	}
}

/// Global options plus per-language overrides.
#[derive(Debug, Clone, Default)]
pub struct Config {
	global: Arc<Options>,
	languages: FxHashMap<String, Arc<Options>>,
}

impl Config {
	pub fn new(global: Options) -> Self {
		Self {
			global: Arc::new(global),
			languages: FxHashMap::default(),
		}
	}

	/// Adds or replaces the options for one language.
	pub fn with_language(mut self, language: impl Into<String>, options: Options) -> Self {
		self.languages.insert(language.into(), Arc::new(options));
		self
	}

	pub fn from_toml_str(src: &str) -> Result<Self> {
		let root: Table = src.parse()?;
		let global = Options::resolve(&root, "global", &Options::default());
		let mut config = Self::new(global);

		match root.get("languages") {
			None => {}
			Some(Value::Table(languages)) => {
				for (language, value) in languages {
					let Value::Table(table) = value else {
						warn!(language = %language, "language options must be a table, ignoring");
						continue;
					};
					let options = Options::resolve(table, language, &config.global);
					config.languages.insert(language.clone(), Arc::new(options));
				}
			}
			Some(v) => {
				warn!(value = %v, "`languages` must be a table, ignoring");
			}
		}
		Ok(config)
	}

	pub fn load(path: &Path) -> Result<Self> {
		let src = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&src)
	}

	pub fn global(&self) -> &Arc<Options> {
		&self.global
	}

	/// Options for `language`, falling back to the global scope.
	pub fn options(&self, language: &str) -> Arc<Options> {
		self.languages
			.get(language)
			.unwrap_or(&self.global)
			.clone()
	}
}
