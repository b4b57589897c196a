//! # Recipe Press
//!
//! A minimal static site generator for recipe collections. Each recipe is one
//! data file; each data file becomes one HTML page. A listing page ties them
//! together, and a fixed set of static files is copied alongside.
//!
//! # Architecture: One Straight Pipeline
//!
//! ```text
//! data/recipes/*.json ─┐
//!                      ├─ load ─ sort ─ render ─┬─ dist/<slug>.html
//! templates/*.hbs ─────┘                        └─ dist/index.html
//! static/, images/ ──────────────── copy ─────────── dist/...
//! ```
//!
//! Every build starts by wiping the output directory and runs each step to
//! completion before the next. There is no incremental mode and no cache:
//! recipe sites are small, and a full rebuild keeps the output an exact
//! function of the inputs.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`generate`] | Build orchestration: clear, compile, load, sort, write, copy |
//! | [`records`] | Record loading from `.json` / `.toml` data files |
//! | [`collate`] | Locale-style headline ordering (stable) |
//! | [`templates`] | Handlebars registry: shell, item, listing, partials, helpers |
//! | [`render`] | Page composition and context layering |
//! | [`assets`] | Named static files and the images directory |
//! | [`config`] | `site.toml` loading, merging over stock defaults, validation |
//! | [`types`] | The [`types::Record`] shared by every stage |
//! | [`output`] | CLI output formatting for build and check |
//!
//! # Design Decisions
//!
//! ## Runtime Templates
//!
//! Templates live in the project, not in the binary, so a site's look can
//! change without recompiling. Handlebars is logic-light (conditionals,
//! loops, partials, helpers) and runs in non-strict mode: a key absent from
//! the context renders as nothing. Recipe files vary in which optional fields
//! they carry, and templates lean on that to skip sections.
//!
//! ## Context Shadowing
//!
//! The shell template sees `[defaults]` from `site.toml`, then the record's
//! own fields on top, then `body` and `recipes` on top of those. A recipe can
//! override its page title or hero image by setting `pageTitle` or
//! `featuredImage` in its data file. It can never replace the rendered body
//! or the navigation list. See [`render`].
//!
//! ## No Rollback
//!
//! A failed build leaves whatever was written before the failure. Records and
//! templates are loaded before any page is written, so the common failures
//! (bad JSON, bad template) leave an empty output directory.

pub mod assets;
pub mod collate;
pub mod config;
pub mod generate;
pub mod output;
pub mod records;
pub mod render;
pub mod templates;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
