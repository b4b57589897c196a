//! Site configuration module.
//!
//! Handles loading, validating, and merging `site.toml`. The file is
//! optional; when present it sits at the project root and overrides the stock
//! defaults key by key.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! data_dir = "data/recipes"   # One record per .json / .toml file
//! template_dir = "templates"  # layout.hbs, recipe.hbs, index.hbs, partials/
//! output_dir = "dist"         # Wiped and regenerated on every build
//! listing_title = "Recipes"   # pageTitle of index.html
//!
//! [templates]
//! shell = "layout.hbs"
//! item = "recipe.hbs"
//! listing = "index.hbs"
//!
//! [assets]
//! root = "static"             # Where the named files below live
//! files = ["style.css", "favicon.ico", "CNAME", "robots.txt", "404.html"]
//! images_dir = "images"       # Copied wholesale to <output>/images/
//!
//! [defaults]                  # Shell context defaults, shadowed by records
//! siteName = "My Recipes"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! output_dir = "docs"
//! ```
//!
//! Unknown keys are rejected to catch typos early. The `[defaults]` table is
//! the one exception: its keys are free-form template context.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Name of the config file looked up at the project root.
pub const CONFIG_FILE: &str = "site.toml";

/// Site configuration loaded from `site.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory holding one data file per record.
    pub data_dir: String,
    /// Directory holding the page templates and `partials/`.
    pub template_dir: String,
    /// Output directory. Cleared completely at the start of every build.
    pub output_dir: String,
    /// `pageTitle` of the listing page. Record data never overrides it.
    pub listing_title: String,
    /// File names of the three page templates.
    pub templates: TemplatesConfig,
    /// Static files copied verbatim into the output.
    pub assets: AssetsConfig,
    /// Values available to the shell template on every page, shadowed by
    /// same-named record fields.
    pub defaults: toml::Table,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            data_dir: "data/recipes".to_string(),
            template_dir: "templates".to_string(),
            output_dir: "dist".to_string(),
            listing_title: "Recipes".to_string(),
            templates: TemplatesConfig::default(),
            assets: AssetsConfig::default(),
            defaults: toml::Table::new(),
        }
    }
}

/// Template file names, relative to `template_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesConfig {
    /// Outer page layout. Receives `body`, `pageTitle`, and `recipes`.
    pub shell: String,
    /// Single record view.
    pub item: String,
    /// Landing page content. Rendered with an empty context.
    pub listing: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            shell: "layout.hbs".to_string(),
            item: "recipe.hbs".to_string(),
            listing: "index.hbs".to_string(),
        }
    }
}

/// Static asset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Directory the named files are looked up in.
    pub root: String,
    /// Named files copied to the output root. Missing ones are skipped with
    /// a warning.
    pub files: Vec<String>,
    /// Directory whose files are copied to `<output>/images/`.
    pub images_dir: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: "static".to_string(),
            files: [
                "style.css",
                "favicon.ico",
                "CNAME",
                "robots.txt",
                "404.html",
                "about.html",
                "og-image.jpg",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            images_dir: "images".to_string(),
        }
    }
}

/// Config paths resolved against a project root.
#[derive(Debug, Clone, PartialEq)]
pub struct SitePaths {
    pub root: PathBuf,
    pub data: PathBuf,
    pub templates: PathBuf,
    pub output: PathBuf,
    pub asset_root: PathBuf,
    pub images: PathBuf,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("data_dir", &self.data_dir),
            ("template_dir", &self.template_dir),
            ("output_dir", &self.output_dir),
            ("templates.shell", &self.templates.shell),
            ("templates.item", &self.templates.item),
            ("templates.listing", &self.templates.listing),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        for name in &self.assets.files {
            if name.is_empty() || name == ".." || name.contains(['/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "assets.files entry {name:?} must be a plain file name"
                )));
            }
        }
        Ok(())
    }

    /// Resolve every configured directory against `root`.
    ///
    /// Absolute paths in the config (or set from the command line) are kept
    /// as they are.
    pub fn paths(&self, root: &Path) -> SitePaths {
        SitePaths {
            root: root.to_path_buf(),
            data: root.join(&self.data_dir),
            templates: root.join(&self.template_dir),
            output: root.join(&self.output_dir),
            asset_root: root.join(&self.assets.root),
            images: root.join(&self.assets.images_dir),
        }
    }

    /// The `[defaults]` table as template context.
    pub fn default_context(&self) -> serde_json::Map<String, serde_json::Value> {
        match crate::records::toml_to_json(toml::Value::Table(self.defaults.clone())) {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        }
    }
}

impl SitePaths {
    /// Refuse output locations that would make the clear step delete inputs.
    ///
    /// Both sides are made absolute and resolved before comparing, so `.`,
    /// `..` and symlinked ancestors cannot hide an overlap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let output = resolve_path(&self.output)?;
        let inputs = [
            ("project root", &self.root),
            ("data_dir", &self.data),
            ("template_dir", &self.templates),
            ("assets.root", &self.asset_root),
            ("assets.images_dir", &self.images),
        ];
        for (label, input) in inputs {
            if resolve_path(input)?.starts_with(&output) {
                return Err(ConfigError::Validation(format!(
                    "output_dir {} would overwrite {label} {}",
                    self.output.display(),
                    input.display()
                )));
            }
        }
        Ok(())
    }
}

/// Absolute form of `path` with `.` and `..` removed and the longest
/// existing prefix canonicalized. The path itself need not exist.
fn resolve_path(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = normalize_lexically(&std::path::absolute(path)?);

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return Ok(missing.iter().rev().fold(canonical, |acc, name| acc.join(name)));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(absolute),
        }
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `site.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `site.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `site.toml` in the given project root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `site.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Recipe Press Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Paths are relative to this file.
#
# Unknown keys will cause an error.

# One record per file. Recognized extensions: .json, .toml
data_dir = "data/recipes"

# Holds the shell, item, and listing templates plus an optional partials/
# directory. Every partials/**/*.hbs file is usable as {{> name}}.
template_dir = "templates"

# Cleared completely at the start of every build, then regenerated.
output_dir = "dist"

# pageTitle of index.html. Record data never overrides it.
listing_title = "Recipes"

# ---------------------------------------------------------------------------
# Template file names (inside template_dir)
# ---------------------------------------------------------------------------
[templates]
# Page layout. Context: pageTitle, body, recipes, plus the record's fields.
shell = "layout.hbs"
# Single recipe view. Context: the record.
item = "recipe.hbs"
# Landing page content. Context: empty.
listing = "index.hbs"

# ---------------------------------------------------------------------------
# Static assets
# ---------------------------------------------------------------------------
[assets]
# Directory holding the named files below.
root = "static"

# Copied byte-for-byte to the output root. Missing files print a warning
# and the build carries on.
files = ["style.css", "favicon.ico", "CNAME", "robots.txt", "404.html", "about.html", "og-image.jpg"]

# Every file directly inside this directory is copied to <output>/images/.
images_dir = "images"

# ---------------------------------------------------------------------------
# Shell defaults
# ---------------------------------------------------------------------------
# Free-form values merged beneath every page's context. A record with the
# same key wins on its own page.
[defaults]
# siteName = "My Recipes"
# featuredImage = "images/default.jpg"
"##
}
