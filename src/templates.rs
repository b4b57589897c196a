//! Template loading and rendering.
//!
//! Pages are produced from three Handlebars templates read from the project's
//! template directory at build time:
//!
//! | Kind | Default file | Context |
//! |------|--------------|---------|
//! | [`TemplateKind::Shell`] | `layout.hbs` | page title, body, full recipe list, record fields |
//! | [`TemplateKind::Item`] | `recipe.hbs` | one record |
//! | [`TemplateKind::Listing`] | `index.hbs` | empty |
//!
//! Any `*.hbs` file under `partials/` is registered as a partial named by its
//! path relative to that directory, without the extension:
//!
//! ```text
//! templates/
//! ├── layout.hbs
//! ├── recipe.hbs
//! ├── index.hbs
//! └── partials/
//!     ├── nav.hbs          # {{> nav}}
//!     └── cards/teaser.hbs # {{> cards/teaser}}
//! ```
//!
//! ## Missing keys
//!
//! The registry runs in non-strict mode: a lookup of a key that is absent
//! from the context renders as nothing instead of failing. Templates rely on
//! this to treat optional record fields (`featuredImage`, `notes`, ...) as
//! "not set".
//!
//! ## Helpers
//!
//! On top of the Handlebars built-ins (`if`, `each`, `with`, `eq`, ...) a
//! `markdown` helper renders a string field as HTML:
//! `{{markdown intro}}`. Its output is written straight to the page and is
//! never escaped, so the double-brace form is the one to use. A missing
//! field renders as nothing.

use handlebars::{Context, Handlebars, Helper, HelperResult, Output, RenderContext};
use pulldown_cmark::{Parser, html as md_html};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::TemplatesConfig;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("{kind} template not found at {path}: {source}")]
    NotFound {
        kind: String,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid {kind} template: {source}")]
    Syntax {
        kind: String,
        source: handlebars::TemplateError,
    },
    #[error("failed to render {kind} template: {source}")]
    Render {
        kind: String,
        source: handlebars::RenderError,
    },
    #[error("failed to read partials in {path}: {source}")]
    Partials {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("failed to read partial {path}: {source}")]
    PartialRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The three page templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Shell,
    Item,
    Listing,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [Self::Shell, Self::Item, Self::Listing];

    /// Registry name, also used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Shell => "shell",
            Self::Item => "item",
            Self::Listing => "listing",
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Directory under the template dir whose `*.hbs` files become partials.
pub const PARTIALS_DIR: &str = "partials";

/// Compiled templates, ready to render.
pub struct Templates {
    registry: Handlebars<'static>,
    partials: Vec<String>,
}

impl Templates {
    /// Compile templates from in-memory sources.
    pub fn from_sources(shell: &str, item: &str, listing: &str) -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_helper("markdown", Box::new(markdown_helper));

        let sources = [
            (TemplateKind::Shell, shell),
            (TemplateKind::Item, item),
            (TemplateKind::Listing, listing),
        ];
        for (kind, source) in sources {
            registry
                .register_template_string(kind.name(), source)
                .map_err(|source| TemplateError::Syntax {
                    kind: kind.to_string(),
                    source,
                })?;
        }

        Ok(Self {
            registry,
            partials: Vec::new(),
        })
    }

    /// Read and compile the three templates named in `files` from `dir`, plus
    /// any partials under `dir/partials/`.
    pub fn load(dir: &Path, files: &TemplatesConfig) -> Result<Self, TemplateError> {
        let read = |kind: TemplateKind, file: &str| {
            let path = dir.join(file);
            fs::read_to_string(&path).map_err(|source| TemplateError::NotFound {
                kind: kind.to_string(),
                path,
                source,
            })
        };
        let shell = read(TemplateKind::Shell, &files.shell)?;
        let item = read(TemplateKind::Item, &files.item)?;
        let listing = read(TemplateKind::Listing, &files.listing)?;

        let mut templates = Self::from_sources(&shell, &item, &listing)?;
        templates.load_partials(&dir.join(PARTIALS_DIR))?;
        log::debug!(
            "compiled templates from {} ({} partials)",
            dir.display(),
            templates.partials.len()
        );
        Ok(templates)
    }

    /// Register every `*.hbs` file under `dir` as a partial. A missing
    /// directory is not an error.
    fn load_partials(&mut self, dir: &Path) -> Result<(), TemplateError> {
        if !dir.is_dir() {
            return Ok(());
        }
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|source| TemplateError::Partials {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("hbs")
            {
                continue;
            }
            let name = partial_name(dir, path);
            let source = fs::read_to_string(path).map_err(|source| TemplateError::PartialRead {
                path: path.to_path_buf(),
                source,
            })?;
            self.register_partial(&name, &source)?;
        }
        Ok(())
    }

    /// Register a partial usable as `{{> name}}`.
    pub fn register_partial(&mut self, name: &str, source: &str) -> Result<(), TemplateError> {
        self.registry
            .register_partial(name, source)
            .map_err(|source| TemplateError::Syntax {
                kind: format!("partial {name}"),
                source,
            })?;
        log::trace!("registered partial {name}");
        self.partials.push(name.to_string());
        Ok(())
    }

    /// Names of registered partials, in registration order.
    pub fn partials(&self) -> &[String] {
        &self.partials
    }

    /// Render one of the page templates with `context`.
    pub fn render<T: Serialize>(
        &self,
        kind: TemplateKind,
        context: &T,
    ) -> Result<String, TemplateError> {
        self.registry
            .render(kind.name(), context)
            .map_err(|source| TemplateError::Render {
                kind: kind.to_string(),
                source,
            })
    }
}

/// Partial name from its path: relative to the partials dir, `/`-separated,
/// extension dropped.
fn partial_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path).with_extension("");
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Render markdown source to an HTML fragment.
pub fn markdown_to_html(source: &str) -> String {
    let parser = Parser::new(source);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}

/// `{{markdown field}}`: non-string or missing values render as nothing.
fn markdown_helper<'reg, 'rc>(
    h: &Helper<'rc>,
    _: &'reg Handlebars<'reg>,
    _: &'rc Context,
    _: &mut RenderContext<'reg, 'rc>,
    out: &mut dyn Output,
) -> HelperResult {
    let source = h.param(0).and_then(|p| p.value().as_str()).unwrap_or("");
    if !source.is_empty() {
        out.write(&markdown_to_html(source))?;
    }
    Ok(())
}
