//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every generated page is shown by its headline first, with the file it was
//! written to as secondary context. Assets are shown by name. Warnings are
//! prefixed with `warning:` so they stand out and can be grepped.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Loaded 3 recipes
//! Banana Bread → banana-bread.html
//! Crème Brûlée → creme-brulee.html
//! Shakshuka → shakshuka.html
//! Listing → index.html
//! Copied style.css
//! warning: robots.txt not found in static/, skipping
//! Copied images/banana-bread.jpg
//! Generated 4 pages, copied 1 asset (1 missing), 1 image → dist
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 Banana Bread → banana-bread.html
//! 002 Crème Brûlée → creme-brulee.html
//! ```
//!
//! # Architecture
//!
//! `format_*` functions return `Vec<String>` and do no I/O, so they are unit
//! tested directly. The CLI decides which stream a line goes to, using
//! [`BuildEvent::is_warning`].

use crate::assets::{AssetEvent, IMAGES_OUTPUT_DIR};
use crate::generate::{BuildEvent, BuildSummary};
use crate::types::Record;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// `1 page`, `2 pages`.
fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Format one build event as display lines. Most events are a single line;
/// setup events that only matter for debugging produce none.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::OutputCleared { .. } | BuildEvent::TemplatesCompiled { .. } => Vec::new(),
        BuildEvent::RecordsLoaded { count } => {
            vec![format!("Loaded {}", plural(*count, "recipe", "recipes"))]
        }
        BuildEvent::DuplicateSlug { slug } => vec![format!(
            "warning: duplicate slug {slug:?}, a later recipe overwrites {slug}.html"
        )],
        BuildEvent::SlugShadowedByListing { slug } => vec![format!(
            "warning: slug {slug:?} collides with the listing page, skipping {slug}.html"
        )],
        BuildEvent::PageWritten { filename, headline } => match headline {
            Some(h) => vec![format!("{} \u{2192} {}", h, filename)],
            None => vec![format!("Listing \u{2192} {}", filename)],
        },
        BuildEvent::Asset(asset) => vec![format_asset_event(asset)],
        BuildEvent::Complete(summary) => vec![format_summary(summary)],
    }
}

fn format_asset_event(event: &AssetEvent) -> String {
    match event {
        AssetEvent::Copied { name } => format!("Copied {name}"),
        AssetEvent::Missing { name, root } => format!(
            "warning: {name} not found in {}/, skipping",
            root.display()
        ),
        AssetEvent::ImageCopied { name } => format!("Copied {IMAGES_OUTPUT_DIR}/{name}"),
        AssetEvent::ImagesDirMissing { path } => format!(
            "warning: images directory {}/ not found, skipping",
            path.display()
        ),
    }
}

/// Closing line of a successful build.
pub fn format_summary(summary: &BuildSummary) -> String {
    let mut assets = format!(
        "copied {}",
        plural(summary.assets_copied, "asset", "assets")
    );
    if summary.assets_missing > 0 {
        assets.push_str(&format!(" ({} missing)", summary.assets_missing));
    }
    format!(
        "Generated {}, {}, {} \u{2192} {}",
        plural(summary.pages, "page", "pages"),
        assets,
        plural(summary.images_copied, "image", "images"),
        summary.output.display()
    )
}

/// Format `check` output: records in page order with their output files.
pub fn format_check_output(records: &[Record]) -> Vec<String> {
    if records.is_empty() {
        return vec!["No recipes found".to_string()];
    }
    records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "{} {} \u{2192} {}",
                format_index(i + 1),
                r.headline,
                r.page_filename()
            )
        })
        .collect()
}

pub fn print_check_output(records: &[Record]) {
    for line in format_check_output(records) {
        println!("{}", line);
    }
}
