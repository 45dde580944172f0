mod common;

use std::sync::Arc;

use tempfile::TempDir;

use common::*;
use cdb_queue::models::contrib::ContribType;
use cdb_queue::models::version::CachedVersionCatalog;
use cdb_queue::store::VersionCatalog;
use cdb_queue::tools::{FsPackageStore, ToolError, ToolInput, VersionTestTool};

/// Store directory holding a release package for each of `versions`.
fn package_dir(versions: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let packages = dir.path().join("phpbb_packages");
    std::fs::create_dir_all(&packages).unwrap();
    for v in versions {
        std::fs::write(packages.join(format!("phpBB-{v}.zip")), b"PK\x03\x04").unwrap();
    }
    dir
}

fn tool(fx: &Fixture, dir: &TempDir) -> (VersionTestTool, Arc<CachedVersionCatalog>) {
    let catalog = Arc::new(CachedVersionCatalog::new(fx.store.clone()));
    let tool = VersionTestTool::new(
        fx.store.clone(),
        catalog.clone(),
        Arc::new(FsPackageStore::new(dir.path())),
    );
    (tool, catalog)
}

fn filters(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Two mods and a style, each with one revision.
fn seed(fx: &Fixture) -> (i64, i64, i64) {
    let mod_a = fx.add_contrib(ContribType::Mod, "Mod A");
    let mod_b = fx.add_contrib(ContribType::Mod, "Mod B");
    let style = fx.add_contrib(ContribType::Style, "Style");
    let rev_a = fx.add_revision(mod_a, "1.0.0", true, 100);
    let rev_b = fx.add_revision(mod_b, "2.0.0", false, 200);
    let rev_s = fx.add_revision(style, "1.0.0", true, 300);
    (rev_a, rev_b, rev_s)
}

fn tagged_with(fx: &Fixture, branch: i32, point: &str) -> Vec<i64> {
    let mut ids: Vec<i64> = fx
        .store
        .lock()
        .version_tags
        .iter()
        .filter(|r| r.tag.branch == branch && r.tag.point == point)
        .map(|r| r.tag.revision_id)
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn test_malformed_version_is_rejected() {
    let fx = Fixture::new();
    let dir = package_dir(&["3.1.10"]);
    let (tool, _) = tool(&fx, &dir);

    for bad in ["", "3.1", "31.10", "3-1-10"] {
        let err = tool.run(bad, &[]).await.unwrap_err();
        assert!(matches!(err, ToolError::NoVersionSelected), "{bad:?}");
    }
    assert_eq!(fx.store.lock().insert_calls, 0);
}

#[tokio::test]
async fn test_missing_package_is_reported_with_path() {
    let fx = Fixture::new();
    seed(&fx);
    let dir = package_dir(&[]);
    let (tool, _) = tool(&fx, &dir);

    let err = tool.run("3.1.11", &[]).await.unwrap_err();
    let ToolError::PackageMissing(path) = err else {
        panic!("expected missing package");
    };
    assert!(path.ends_with("phpbb_packages/phpBB-3.1.11.zip"));
    assert_eq!(fx.store.lock().insert_calls, 0);
}

#[tokio::test]
async fn test_package_name_is_sanitised() {
    let fx = Fixture::new();
    let (rev_a, rev_b, _) = seed(&fx);
    let dir = package_dir(&["3.1.10"]);
    let (tool, _) = tool(&fx, &dir);

    // Stray characters are dropped from the file name only; the tag keeps
    // the raw point release.
    let count = tool.run("3.1.10 ", &[]).await.unwrap();
    assert_eq!(count, 2);
    assert_eq!(tagged_with(&fx, 31, "10 "), vec![rev_a, rev_b]);
}

#[tokio::test]
async fn test_tags_all_testable_revisions_without_filter() {
    let fx = Fixture::new();
    let (rev_a, rev_b, rev_s) = seed(&fx);
    let dir = package_dir(&["3.1.10"]);
    let (tool, _) = tool(&fx, &dir);

    let count = tool.run("3.1.10", &filters(&["0"])).await.unwrap();
    assert_eq!(count, 2);

    let tagged = tagged_with(&fx, 31, "10");
    assert_eq!(tagged, vec![rev_a, rev_b]);
    assert!(!tagged.contains(&rev_s));
    assert_eq!(fx.store.lock().insert_calls, 1);
}

#[tokio::test]
async fn test_filters_restrict_and_deduplicate() {
    let fx = Fixture::new();
    let (rev_a, rev_b, rev_s) = seed(&fx);
    let mod_a = fx.store.lock().revisions[&rev_a].contrib_id;
    let style = fx.store.lock().revisions[&rev_s].contrib_id;

    // rev_a is tagged with both filter versions, rev_b with neither.
    fx.tag_revision(mod_a, rev_a, 31, "5");
    fx.tag_revision(mod_a, rev_a, 31, "7");
    fx.tag_revision(style, rev_s, 31, "5");

    let dir = package_dir(&["3.1.8"]);
    let (tool, _) = tool(&fx, &dir);

    let count = tool.run("3.1.8", &filters(&["315", "317"])).await.unwrap();
    assert_eq!(count, 1);
    assert_eq!(tagged_with(&fx, 31, "8"), vec![rev_a]);
    assert!(!tagged_with(&fx, 31, "8").contains(&rev_b));
}

#[tokio::test]
async fn test_already_tagged_revisions_are_skipped() {
    let fx = Fixture::new();
    let (rev_a, rev_b, _) = seed(&fx);
    let mod_a = fx.store.lock().revisions[&rev_a].contrib_id;
    fx.tag_revision(mod_a, rev_a, 31, "10");

    let dir = package_dir(&["3.1.10"]);
    let (tool, _) = tool(&fx, &dir);

    let count = tool.run("3.1.10", &[]).await.unwrap();
    assert_eq!(count, 1);
    assert_eq!(tagged_with(&fx, 31, "10"), vec![rev_a, rev_b]);

    // Second run finds nothing left to do and writes nothing.
    let err = tool.run("3.1.10", &[]).await.unwrap_err();
    assert!(matches!(err, ToolError::NothingToUpdate));
    assert_eq!(fx.store.lock().insert_calls, 1);
}

#[tokio::test]
async fn test_no_testable_types_means_nothing_to_update() {
    let fx = Fixture::new();
    seed(&fx);
    let dir = package_dir(&["3.1.10"]);
    let (tool, _) = tool(&fx, &dir);
    let tool = tool.with_types(vec![ContribType::Style, ContribType::Translation]);

    let err = tool.run("3.1.10", &[]).await.unwrap_err();
    assert!(matches!(err, ToolError::NothingToUpdate));
    assert_eq!(err.code(), "NO_REVISIONS_UPDATED");
    assert_eq!(fx.store.lock().insert_calls, 0);
}

#[tokio::test]
async fn test_filter_matching_nothing_means_nothing_to_update() {
    let fx = Fixture::new();
    seed(&fx);
    let dir = package_dir(&["3.1.10"]);
    let (tool, _) = tool(&fx, &dir);

    let err = tool.run("3.1.10", &filters(&["309"])).await.unwrap_err();
    assert!(matches!(err, ToolError::NothingToUpdate));
    assert_eq!(fx.store.lock().insert_calls, 0);
}

#[tokio::test]
async fn test_unknown_version_invalidates_catalog() {
    let fx = Fixture::new();
    let (rev_a, _, _) = seed(&fx);
    let mod_a = fx.store.lock().revisions[&rev_a].contrib_id;
    fx.tag_revision(mod_a, rev_a, 31, "9");

    let dir = package_dir(&["3.1.9", "3.1.10"]);
    let (tool, catalog) = tool(&fx, &dir);

    // Known version: catalog stays warm.
    tool.run("3.1.9", &[]).await.unwrap();
    assert!(catalog.is_cached());

    // New version: cache dropped, not repopulated by the run.
    tool.run("3.1.10", &[]).await.unwrap();
    assert!(!catalog.is_cached());

    let versions = catalog.versions().await.unwrap();
    assert_eq!(versions.get("3110").map(String::as_str), Some("3.1.10"));
    assert_eq!(versions.get("319").map(String::as_str), Some("3.1.9"));
}

#[tokio::test]
async fn test_version_options_start_with_no_restriction() {
    let fx = Fixture::new();
    let (rev_a, _, _) = seed(&fx);
    let mod_a = fx.store.lock().revisions[&rev_a].contrib_id;
    fx.tag_revision(mod_a, rev_a, 30, "14");
    fx.tag_revision(mod_a, rev_a, 31, "10");

    let dir = package_dir(&[]);
    let (tool, _) = tool(&fx, &dir);

    let options = tool.version_options().await.unwrap();
    let pairs: Vec<(&str, &str, bool)> = options
        .iter()
        .map(|o| (o.value.as_str(), o.label.as_str(), o.selected))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("0", "-----", true),
            ("3014", "3.0.14", false),
            ("3110", "3.1.10", false),
        ]
    );
}

#[test]
fn test_form_body_with_repeated_filters() {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(
        "csrf_token=t&new_phpbb_version=3.1.10&limit_phpbb_version=0&limit_phpbb_version=319",
    )
    .unwrap();
    let input = ToolInput::from_pairs(&pairs);
    assert_eq!(input.new_version, "3.1.10");
    assert_eq!(input.limit_versions, filters(&["0", "319"]));
}
