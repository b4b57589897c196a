//! End-to-end tests against the built `recipe-press` binary.
//!
//! Each test copies `fixtures/site/` into a temp directory and runs the CLI
//! on it, checking exit status, console output, and the generated tree.

use assert_cmd::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn recipe_press() -> Command {
    Command::new(env!("CARGO_BIN_EXE_recipe-press"))
}

fn copy_dir_recursive(src: &Path, dst: &Path) {
    for entry in fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            fs::create_dir_all(&dst_path).unwrap();
            copy_dir_recursive(&src_path, &dst_path);
        } else {
            fs::copy(&src_path, &dst_path).unwrap();
        }
    }
}

fn fixture_project() -> TempDir {
    let tmp = TempDir::new().expect("temp dir");
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path());
    tmp
}

fn root_arg(tmp: &TempDir) -> &str {
    tmp.path().to_str().expect("utf8 temp path")
}

#[test]
fn build_generates_site_and_reports_progress() {
    let project = fixture_project();

    recipe_press()
        .args(["--root", root_arg(&project), "build"])
        .assert()
        .success()
        .stdout(contains("Loaded 4 recipes"))
        .stdout(contains("Banana Bread \u{2192} banana-bread.html"))
        .stdout(contains("Listing \u{2192} index.html"))
        .stdout(contains("Copied style.css"))
        .stdout(contains("Copied images/creme-brulee.jpg"))
        .stdout(contains("Generated 5 pages"))
        .stderr(contains("warning: about.html not found"))
        .stderr(contains("warning: og-image.jpg not found"));

    let dist = project.path().join("dist");
    for file in [
        "index.html",
        "banana-bread.html",
        "creme-brulee.html",
        "shakshuka.html",
        "zucchini-fritters.html",
        "style.css",
        "CNAME",
        "robots.txt",
        "404.html",
        "favicon.ico",
        "images/banana-bread.jpg",
    ] {
        assert!(dist.join(file).is_file(), "missing {file}");
    }
    assert!(!dist.join("notes.html").exists());
}

#[test]
fn site_toml_drives_listing_title_and_defaults() {
    let project = fixture_project();

    recipe_press()
        .args(["--root", root_arg(&project), "build"])
        .assert()
        .success();

    let dist = project.path().join("dist");
    let index = fs::read_to_string(dist.join("index.html")).unwrap();
    assert!(index.contains("<title>Test Kitchen Recipes</title>"));
    assert!(index.contains("<header>Test Kitchen</header>"));

    let shakshuka = fs::read_to_string(dist.join("shakshuka.html")).unwrap();
    assert!(shakshuka.contains("<title>Shakshuka</title>"));
    assert!(shakshuka.contains("<header>Test Kitchen</header>"));
    assert!(shakshuka.contains("<li>4 eggs</li>"));
}

#[test]
fn malformed_record_exits_non_zero() {
    let project = fixture_project();
    fs::write(
        project.path().join("data/recipes/broken.json"),
        r#"{"slug": "broken", "headline": "#,
    )
    .unwrap();

    recipe_press()
        .args(["--root", root_arg(&project), "build"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("error:"))
        .stderr(contains("broken.json"));

    assert!(!project.path().join("dist/banana-bread.html").exists());
}

#[test]
fn template_syntax_error_exits_non_zero() {
    let project = fixture_project();
    fs::write(project.path().join("templates/index.hbs"), "{{#if x}}").unwrap();

    recipe_press()
        .args(["--root", root_arg(&project), "build"])
        .assert()
        .failure()
        .stderr(contains("invalid listing template"));
}

#[test]
fn empty_data_dir_builds_listing_only() {
    let project = TempDir::new().unwrap();
    let templates = project.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    fs::create_dir_all(project.path().join("data/recipes")).unwrap();
    fs::write(templates.join("layout.hbs"), "{{{body}}}").unwrap();
    fs::write(templates.join("recipe.hbs"), "").unwrap();
    fs::write(templates.join("index.hbs"), "nothing yet").unwrap();

    recipe_press()
        .args(["--root", root_arg(&project), "build"])
        .assert()
        .success()
        .stdout(contains("Loaded 0 recipes"))
        .stderr(contains("warning: images directory"));

    let entries: Vec<String> = fs::read_dir(project.path().join("dist"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["index.html"]);
}

#[test]
fn output_flag_overrides_config() {
    let project = fixture_project();
    let out = TempDir::new().unwrap();
    let target = out.path().join("public");

    recipe_press()
        .args([
            "--root",
            root_arg(&project),
            "--output",
            target.to_str().unwrap(),
            "build",
        ])
        .assert()
        .success();

    assert!(target.join("index.html").is_file());
    assert!(!project.path().join("dist").exists());
}

#[test]
fn output_over_project_root_is_refused() {
    let project = fixture_project();

    recipe_press()
        .current_dir(project.path())
        .args(["--output", ".", "build"])
        .assert()
        .failure()
        .stderr(contains("would overwrite project root"));

    assert!(project.path().join("data/recipes/banana-bread.json").is_file());
    assert!(project.path().join("templates/layout.hbs").is_file());
}

#[test]
fn output_climbing_to_project_root_is_refused() {
    let project = fixture_project();
    let name = project.path().file_name().unwrap().to_str().unwrap();
    fs::write(
        project.path().join("site.toml"),
        format!("output_dir = \"../{name}\"\n"),
    )
    .unwrap();

    recipe_press()
        .args(["--root", root_arg(&project), "build"])
        .assert()
        .failure()
        .stderr(contains("would overwrite"));

    assert!(project.path().join("data/recipes/banana-bread.json").is_file());
}

#[test]
fn unknown_config_key_exits_non_zero() {
    let project = fixture_project();
    fs::write(project.path().join("site.toml"), "ouput_dir = \"docs\"\n").unwrap();

    recipe_press()
        .args(["--root", root_arg(&project), "build"])
        .assert()
        .failure()
        .stderr(contains("unknown field"));
}

#[test]
fn check_lists_recipes_without_writing() {
    let project = fixture_project();

    recipe_press()
        .args(["--root", root_arg(&project), "check"])
        .assert()
        .success()
        .stdout(contains("001 Banana Bread \u{2192} banana-bread.html"))
        .stdout(contains("002 Crème Brûlée \u{2192} creme-brulee.html"))
        .stdout(contains("004 zucchini fritters \u{2192} zucchini-fritters.html"))
        .stdout(contains("==> Templates and recipes are valid"));

    assert!(!project.path().join("dist").exists());
}

#[test]
fn gen_config_prints_stock_config() {
    recipe_press()
        .arg("gen-config")
        .assert()
        .success()
        .stdout(contains("listing_title = \"Recipes\""))
        .stdout(contains("[assets]"));
}
