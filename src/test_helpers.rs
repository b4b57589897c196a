//! Shared test utilities for the recipe-press test suite.
//!
//! Provides a fixture project, small writers for records and templates, and
//! readers for inspecting generated output.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! build(tmp.path(), &SiteConfig::default(), None).unwrap();
//!
//! let html = read(&tmp.path().join("dist/index.html"));
//! assert_eq!(nav_headlines(&html).len(), fixture_record_count());
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::records::is_data_file;

// =========================================================================
// Fixture setup
// =========================================================================

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site")
}

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    copy_dir_recursive(&fixtures_root(), tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Number of record files in the fixture data directory.
pub fn fixture_record_count() -> usize {
    fs::read_dir(data_dir(&fixtures_root()))
        .unwrap()
        .filter(|e| is_data_file(&e.as_ref().unwrap().path()))
        .count()
}

/// Default data directory under a project root.
pub fn data_dir(root: &Path) -> PathBuf {
    root.join("data/recipes")
}

/// Write a record file into the project's default data directory.
pub fn write_record(root: &Path, name: &str, content: &str) {
    let dir = data_dir(root);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), content).unwrap();
}

/// Write bare-bones shell, item, and listing templates under `root/templates`.
pub fn write_minimal_templates(root: &Path) {
    let dir = root.join("templates");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("layout.hbs"), "<title>{{pageTitle}}</title>{{{body}}}").unwrap();
    fs::write(dir.join("recipe.hbs"), "<h1>{{headline}}</h1>").unwrap();
    fs::write(dir.join("index.hbs"), "<p>index</p>").unwrap();
}

// =========================================================================
// Output readers
// =========================================================================

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
}

/// Names of the `.html` files directly inside `dir`, sorted.
pub fn html_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".html") && n != "404.html")
        .collect();
    names.sort();
    names
}

/// Every file under `dir` with its bytes, keyed by relative path.
pub fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).unwrap().to_path_buf();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

/// Link texts inside the page's `<nav class="site-nav">`, in document order.
pub fn nav_headlines(html: &str) -> Vec<String> {
    let start = html
        .find(r#"<nav class="site-nav">"#)
        .unwrap_or_else(|| panic!("no site nav in page:\n{html}"));
    let nav = &html[start..];
    let nav = &nav[..nav.find("</nav>").unwrap()];

    nav.split("<a href=")
        .skip(1)
        .map(|link| {
            let text = &link[link.find('>').unwrap() + 1..];
            text[..text.find("</a>").unwrap()].to_string()
        })
        .collect()
}
