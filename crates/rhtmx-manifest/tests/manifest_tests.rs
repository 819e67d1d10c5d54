//! Integration tests for rhtmx-manifest
//!
//! Every test builds a real pages tree on disk and runs the full
//! walk → sort → compile pipeline over it.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use rhtmx_manifest::*;
use tempfile::TempDir;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "---\n---\n").unwrap();
}

fn pages(files: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for file in files {
        touch(dir.path(), file);
    }
    dir
}

fn components(manifest: &ManifestData) -> Vec<&str> {
    manifest.components().collect()
}

fn blog_site() -> TempDir {
    pages(&[
        "index.astro",
        "about.astro",
        "blog/index.astro",
        "blog/index.json.astro",
        "blog/[slug].astro",
        "blog/[...rest].astro",
        ".well-known/security.astro",
    ])
}

// ============================================================================
// Table order
// ============================================================================

#[test]
fn test_table_order_follows_specificity() {
    let site = blog_site();
    let manifest = build_manifest(site.path()).unwrap();

    assert_eq!(
        components(&manifest),
        vec![
            "index.astro",
            ".well-known/security.astro",
            "about.astro",
            "blog/index.json.astro",
            "blog/index.astro",
            "blog/[slug].astro",
            "blog/[...rest].astro",
        ]
    );
}

#[test]
fn test_order_is_deterministic_across_builds() {
    let site = blog_site();
    let first = build_manifest(site.path()).unwrap();
    let second = build_manifest(site.path()).unwrap();
    assert_eq!(components(&first), components(&second));
}

#[test]
fn test_nested_directories_are_depth_first() {
    let site = pages(&[
        "docs/index.astro",
        "docs/guides/install.astro",
        "docs/[page].astro",
        "docs/api.astro",
    ]);
    let manifest = build_manifest(site.path()).unwrap();

    assert_eq!(
        components(&manifest),
        vec![
            "docs/index.astro",
            "docs/guides/install.astro",
            "docs/api.astro",
            "docs/[page].astro",
        ]
    );
}

// ============================================================================
// Route data
// ============================================================================

#[test]
fn test_static_route_has_path() {
    let site = blog_site();
    let manifest = build_manifest(site.path()).unwrap();

    let about = manifest.route_for_component("about.astro").unwrap();
    assert_eq!(about.path.as_deref(), Some("/about"));
    assert!(about.params.is_empty());
    assert!(!about.is_dynamic());

    let root = manifest.route_for_component("index.astro").unwrap();
    assert_eq!(root.path.as_deref(), Some("/"));
}

#[test]
fn test_dynamic_route_params() {
    let site = blog_site();
    let manifest = build_manifest(site.path()).unwrap();

    let slug = manifest.route_for_component("blog/[slug].astro").unwrap();
    assert_eq!(slug.path, None);
    assert_eq!(slug.params, vec![ParamName::new("slug")]);
    assert_eq!(slug.generator().template(), "/blog/:slug");

    let rest = manifest.route_for_component("blog/[...rest].astro").unwrap();
    assert_eq!(rest.params, vec![ParamName::rest("rest")]);
    assert_eq!(rest.param_names().collect::<Vec<_>>(), vec!["rest"]);
}

#[test]
fn test_index_suffix_folds_into_parent() {
    let site = pages(&["foo/index.json.astro", "[lang]/index.xml.astro"]);
    let manifest = build_manifest(site.path()).unwrap();

    let json = manifest.route_for_component("foo/index.json.astro").unwrap();
    assert_eq!(json.path.as_deref(), Some("/foo.json"));
    assert!(json.pattern.is_match("/foo.json"));

    let xml = manifest.route_for_component("[lang]/index.xml.astro").unwrap();
    assert_eq!(xml.path, None);
    assert_eq!(xml.generator().template(), "/:lang.xml");
    let path = xml.generate(&Params::new().with("lang", "en")).unwrap();
    assert_eq!(path, "/en.xml");
}

#[test]
fn test_params_accumulate_through_directories() {
    let site = pages(&["[org]/[repo]/issues/[number].astro"]);
    let manifest = build_manifest(site.path()).unwrap();

    let route = &manifest.routes()[0];
    assert_eq!(
        route.params,
        vec![
            ParamName::new("org"),
            ParamName::new("repo"),
            ParamName::new("number"),
        ]
    );
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_hidden_entries_are_skipped() {
    let site = pages(&[
        "about.astro",
        ".draft.astro",
        ".git/[a][b].astro",
        ".well-known/change-password.astro",
    ]);
    let manifest = build_manifest(site.path()).unwrap();

    assert_eq!(
        components(&manifest),
        vec![".well-known/change-password.astro", "about.astro"]
    );
}

#[test]
fn test_unrecognized_extensions_are_skipped() {
    let site = pages(&["about.astro", "README", "notes.astro~"]);
    let manifest = build_manifest(site.path()).unwrap();
    assert_eq!(components(&manifest), vec!["about.astro"]);
}

#[test]
fn test_configured_page_extensions() {
    let site = pages(&["about.astro", "notes.md", "styles.css"]);
    let manifest = ManifestBuilder::new(site.path())
        .with_page_extensions(["astro", "md"])
        .build()
        .unwrap();

    assert_eq!(components(&manifest), vec!["about.astro", "notes.md"]);
}

#[test]
fn test_components_relative_to_project_root() {
    let project = pages(&["src/pages/about.astro", "src/pages/blog/[slug].astro"]);
    let manifest = ManifestBuilder::from_config(project.path(), &RoutingConfig::default())
        .build()
        .unwrap();

    assert_eq!(
        components(&manifest),
        vec!["src/pages/about.astro", "src/pages/blog/[slug].astro"]
    );
    assert_eq!(
        manifest.routes()[1].generator().template(),
        "/blog/:slug"
    );
}

// ============================================================================
// Build failures
// ============================================================================

fn invalid_reason(files: &[&str]) -> (String, InvalidRouteReason) {
    let site = pages(files);
    match build_manifest(site.path()) {
        Err(RouteError::InvalidRoute { file, reason }) => (file, reason),
        other => panic!("expected InvalidRoute, got {:?}", other),
    }
}

#[test]
fn test_adjacent_parameters_abort_build() {
    let (file, reason) = invalid_reason(&["about.astro", "[a][b].astro"]);
    assert_eq!(file, "[a][b].astro");
    assert_eq!(reason, InvalidRouteReason::AdjacentParameters);
}

#[test]
fn test_rest_not_standalone_aborts_build() {
    let (file, reason) = invalid_reason(&["docs/pre-[...rest].astro"]);
    assert_eq!(file, "docs/pre-[...rest].astro");
    assert_eq!(reason, InvalidRouteReason::RestNotStandalone);
}

#[test]
fn test_invalid_directory_name_aborts_build() {
    let (file, reason) = invalid_reason(&["[bad/page.astro"]);
    assert_eq!(file, "[bad");
    assert_eq!(reason, InvalidRouteReason::UnbalancedBrackets);
}

#[test]
fn test_repeated_parameter_name_aborts_build() {
    let (file, reason) = invalid_reason(&["[id]/[id].astro"]);
    assert_eq!(file, "[id]/[id].astro");
    assert_eq!(reason, InvalidRouteReason::DuplicateParameter);

    let (file, reason) = invalid_reason(&["[id]-[id].astro"]);
    assert_eq!(file, "[id]-[id].astro");
    assert_eq!(reason, InvalidRouteReason::DuplicateParameter);
}

#[test]
fn test_missing_pages_dir_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = build_manifest(dir.path().join("missing"));
    assert!(matches!(result, Err(RouteError::Io { .. })));
}

#[test]
fn test_empty_pages_dir() {
    let dir = TempDir::new().unwrap();
    let manifest = build_manifest(dir.path()).unwrap();
    assert!(manifest.is_empty());
    assert!(manifest.match_route("/").is_none());
}
