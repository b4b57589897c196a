//! Site build orchestration.
//!
//! One build is a straight line of steps, each finishing before the next
//! starts:
//!
//! ```text
//! 1. clear     dist/                      (remove, recreate)
//! 2. compile   templates/*.hbs            (fatal on syntax error)
//! 3. load      data/recipes/*.{json,toml} (fatal on parse error)
//! 4. sort      by headline
//! 5. write     dist/<slug>.html           (one per record)
//! 6. write     dist/index.html
//! 7. copy      static/<named files>, images/* → dist/images/
//! ```
//!
//! ## Failure Model
//!
//! Any error ends the build. Nothing is retried or skipped except the two
//! optional asset cases (a missing named file, a missing images directory),
//! which are reported as warnings. There is no rollback: output written
//! before the failing step stays on disk.
//!
//! ## Progress
//!
//! Each step reports a [`BuildEvent`] over an optional channel. The build
//! itself never prints; the CLI formats events with
//! [`crate::output::format_build_event`].

use crate::assets::{self, AssetError, AssetEvent};
use crate::collate;
use crate::config::{ConfigError, SiteConfig, SitePaths};
use crate::records::{self, LoadError};
use crate::render::PageRenderer;
use crate::templates::{TemplateError, Templates};
use crate::types::Record;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to clear output directory {path}: {source}")]
    Clear {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("Data error: {0}")]
    Load(#[from] LoadError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}

/// Progress reported while a build runs.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    OutputCleared { path: PathBuf },
    TemplatesCompiled { partials: usize },
    RecordsLoaded { count: usize },
    /// Two records share a slug; the later one (in sorted order) wins.
    DuplicateSlug { slug: String },
    /// A record's page would be `index.html`; the listing takes that file
    /// and the record page is not written.
    SlugShadowedByListing { slug: String },
    PageWritten {
        filename: String,
        headline: Option<String>,
    },
    Asset(AssetEvent),
    Complete(BuildSummary),
}

impl BuildEvent {
    pub fn is_warning(&self) -> bool {
        match self {
            Self::DuplicateSlug { .. } | Self::SlugShadowedByListing { .. } => true,
            Self::Asset(event) => event.is_warning(),
            _ => false,
        }
    }
}

/// Counts for a finished build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildSummary {
    pub output: PathBuf,
    /// Distinct page files left in the output: record pages plus
    /// `index.html`.
    pub pages: usize,
    pub assets_copied: usize,
    pub assets_missing: usize,
    pub images_copied: usize,
}

/// File name of the listing page.
pub const LISTING_FILENAME: &str = "index.html";

fn emit(events: &Option<Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = events {
        // The receiver going away only means nobody is watching.
        tx.send(event).ok();
    }
}

/// Run a full build of the project at `root`.
pub fn build(
    root: &Path,
    config: &SiteConfig,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildSummary, BuildError> {
    let paths = config.paths(root);
    paths.validate()?;

    clear_output(&paths.output)?;
    emit(
        &events,
        BuildEvent::OutputCleared {
            path: paths.output.clone(),
        },
    );

    let (templates, records) = prepare(&paths, config, &events)?;

    let mut summary = BuildSummary {
        output: paths.output.clone(),
        ..BuildSummary::default()
    };

    let renderer = PageRenderer::new(
        &templates,
        &records,
        config.default_context(),
        &config.listing_title,
    );

    let mut written: HashSet<String> = HashSet::new();
    for record in &records {
        let html = renderer.record_page(record)?;
        let filename = record.page_filename();
        if filename == LISTING_FILENAME {
            emit(
                &events,
                BuildEvent::SlugShadowedByListing {
                    slug: record.slug.clone(),
                },
            );
            continue;
        }
        if written.contains(&filename) {
            emit(
                &events,
                BuildEvent::DuplicateSlug {
                    slug: record.slug.clone(),
                },
            );
        }
        write_page(&paths.output.join(&filename), &html)?;
        written.insert(filename.clone());
        emit(
            &events,
            BuildEvent::PageWritten {
                filename,
                headline: Some(record.headline.clone()),
            },
        );
    }

    let listing = renderer.listing_page()?;
    write_page(&paths.output.join(LISTING_FILENAME), &listing)?;
    written.insert(LISTING_FILENAME.to_string());
    summary.pages = written.len();
    emit(
        &events,
        BuildEvent::PageWritten {
            filename: LISTING_FILENAME.to_string(),
            headline: None,
        },
    );

    let mut report = |event: AssetEvent| {
        if matches!(event, AssetEvent::Missing { .. }) {
            summary.assets_missing += 1;
        }
        emit(&events, BuildEvent::Asset(event));
    };
    let assets_copied = assets::copy_manifest(
        &paths.asset_root,
        &config.assets.files,
        &paths.output,
        &mut report,
    )?;
    let images_copied = assets::copy_images(&paths.images, &paths.output, &mut report)?;
    summary.assets_copied = assets_copied;
    summary.images_copied = images_copied;

    emit(&events, BuildEvent::Complete(summary.clone()));
    Ok(summary)
}

/// Compile templates and load records without touching the output
/// directory. Returns the records in page order.
pub fn check(root: &Path, config: &SiteConfig) -> Result<Vec<Record>, BuildError> {
    let paths = config.paths(root);
    let (_, records) = prepare(&paths, config, &None)?;
    Ok(records)
}

/// Steps 2–4: compile, load, sort.
fn prepare(
    paths: &SitePaths,
    config: &SiteConfig,
    events: &Option<Sender<BuildEvent>>,
) -> Result<(Templates, Vec<Record>), BuildError> {
    let templates = Templates::load(&paths.templates, &config.templates)?;
    emit(
        events,
        BuildEvent::TemplatesCompiled {
            partials: templates.partials().len(),
        },
    );

    let mut records = records::load_records(&paths.data)?;
    collate::sort_records(&mut records);
    emit(
        events,
        BuildEvent::RecordsLoaded {
            count: records.len(),
        },
    );
    Ok((templates, records))
}

/// Remove the output directory if it exists, then create it empty.
fn clear_output(output: &Path) -> Result<(), BuildError> {
    let clear_err = |source| BuildError::Clear {
        path: output.to_path_buf(),
        source,
    };
    if output.exists() {
        fs::remove_dir_all(output).map_err(clear_err)?;
    }
    fs::create_dir_all(output).map_err(clear_err)?;
    Ok(())
}

fn write_page(path: &Path, html: &str) -> Result<(), BuildError> {
    fs::write(path, html).map_err(|source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    })
}
