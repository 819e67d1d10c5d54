//! Manifest builder
//!
//! Walks a pages directory depth-first, ordering siblings with
//! [`compare_items`] before recursing, and emits one [`RouteData`] per page
//! file. The resulting table order is the match priority order.
//!
//! ```text
//! src/pages/
//! ├── index.astro            → /
//! ├── about.astro            → /about
//! ├── feed.json/
//! └── blog/
//!     ├── index.astro        → /blog
//!     ├── index.json.astro   → /blog.json
//!     ├── [slug].astro       → /blog/:slug
//!     └── [...rest].astro    → /blog/*rest
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::RoutingConfig;
use crate::error::{InvalidRouteReason, Result, RouteError};
use crate::params::{ParamName, Params};
use crate::route::pattern::{self, RouteGenerator, RouteMatcher, SegmentTree};
use crate::route::segment::Part;
use crate::route::specificity::{compare_items, extension_of, Item};

/// One compiled page route
#[derive(Debug, Clone)]
pub struct RouteData {
    /// Anchored request matcher
    pub pattern: RouteMatcher,
    /// Declared parameters, in capture order
    pub params: Vec<ParamName>,
    /// Literal path when the route has no dynamic segment
    pub path: Option<String>,
    /// Page file, slash-separated and relative to the project root
    pub component: String,
    generator: RouteGenerator,
}

impl RouteData {
    /// Builds the concrete path for `params`
    pub fn generate(&self, params: &Params) -> Result<String> {
        self.generator.generate(params)
    }

    pub fn generator(&self) -> &RouteGenerator {
        &self.generator
    }

    /// Whether resolving this route needs the component's static paths
    pub fn is_dynamic(&self) -> bool {
        self.path.is_none()
    }

    /// Parameter names as written in file names (`slug`, `...path`)
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|param| param.name.as_str())
    }
}

/// Ordered, immutable route table
#[derive(Debug, Clone, Default)]
pub struct ManifestData {
    routes: Vec<RouteData>,
}

impl ManifestData {
    /// Routes in match-priority order
    pub fn routes(&self) -> &[RouteData] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Page files in table order
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|route| route.component.as_str())
    }

    /// Route compiled from a given page file
    pub fn route_for_component(&self, component: &str) -> Option<&RouteData> {
        self.routes.iter().find(|route| route.component == component)
    }
}

/// Builds a [`ManifestData`] from a pages directory
///
/// # Examples
///
/// ```no_run
/// use rhtmx_manifest::ManifestBuilder;
///
/// let manifest = ManifestBuilder::new("src/pages")
///     .with_root(".")
///     .with_trailing_slash(false)
///     .build()
///     .unwrap();
///
/// for route in manifest.routes() {
///     println!("{} -> {}", route.generator().template(), route.component);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    root: PathBuf,
    pages: PathBuf,
    routing: RoutingConfig,
}

impl ManifestBuilder {
    /// Builder for `pages`, with component paths relative to `pages` itself
    pub fn new(pages: impl Into<PathBuf>) -> Self {
        let pages = pages.into();
        Self {
            root: pages.clone(),
            pages,
            routing: RoutingConfig::default(),
        }
    }

    /// Builder for `<project_root>/<routing.pages_dir>`
    pub fn from_config(project_root: impl Into<PathBuf>, routing: &RoutingConfig) -> Self {
        let root = project_root.into();
        Self {
            pages: root.join(&routing.pages_dir),
            root,
            routing: routing.clone(),
        }
    }

    /// Directory that component paths are made relative to
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_trailing_slash(mut self, trailing_slash: bool) -> Self {
        self.routing.trailing_slash = trailing_slash;
        self
    }

    pub fn with_page_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routing.page_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pages_dir(&self) -> &Path {
        &self.pages
    }

    /// Walks the pages directory and compiles every page
    ///
    /// Synchronous, single pass. The first invalid entry aborts the build.
    pub fn build(&self) -> Result<ManifestData> {
        let mut routes = Vec::new();
        self.walk(&self.pages, &Vec::new(), &mut routes)?;

        info!(routes = routes.len(), pages = ?self.pages, "Route manifest built");
        Ok(ManifestData { routes })
    }

    fn walk(&self, dir: &Path, parent: &SegmentTree, routes: &mut Vec<RouteData>) -> Result<()> {
        let mut items = self.list_items(dir)?;
        items.sort_by(compare_items);

        for item in items {
            let segments = child_segments(parent, &item);

            if item.is_dir {
                self.walk(&dir.join(&item.basename), &segments, routes)?;
            } else if item.is_page {
                routes.push(self.compile_route(&item, &segments)?);
            }
        }

        Ok(())
    }

    /// Lists the visible entries of one directory as unsorted items
    fn list_items(&self, dir: &Path) -> Result<Vec<Item>> {
        let mut items = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.map_err(|source| RouteError::Io {
                path: dir.to_path_buf(),
                source,
            })?;

            let basename = entry.file_name().to_string_lossy().into_owned();
            if basename.starts_with('.') && basename != ".well-known" {
                continue;
            }

            let is_dir = entry.file_type().is_dir();
            if !is_dir && !self.routing.is_page_extension(extension_of(&basename)) {
                continue;
            }

            let file = self.relative_file(entry.path());
            items.push(Item::new(&basename, &file, is_dir)?);
        }

        Ok(items)
    }

    fn compile_route(&self, item: &Item, segments: &SegmentTree) -> Result<RouteData> {
        let (matcher, generator) = pattern::compile(segments, self.routing.trailing_slash)?;
        let params = pattern::param_names(segments);

        let mut seen = HashSet::with_capacity(params.len());
        if params.iter().any(|param| !seen.insert(param.name.as_str())) {
            return Err(RouteError::invalid(&item.file, InvalidRouteReason::DuplicateParameter));
        }

        debug!(
            component = %item.file,
            pattern = matcher.as_str(),
            template = %generator.template(),
            params = ?params,
            "Route discovered"
        );

        Ok(RouteData {
            pattern: matcher,
            params,
            path: pattern::static_path(segments),
            component: item.file.clone(),
            generator,
        })
    }

    fn relative_file(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Segment tree for a child item (pure function)
///
/// Index files map onto their parent. An index file with a route suffix
/// (`index.json.astro`) folds the suffix into the parent's last segment:
/// appended to a trailing literal, or pushed as a new literal part after a
/// parameter.
pub fn child_segments(parent: &[Vec<Part>], item: &Item) -> SegmentTree {
    let mut segments = parent.to_vec();

    if !item.is_index {
        segments.push(item.parts.clone());
        return segments;
    }

    if item.route_suffix.is_empty() {
        return segments;
    }

    match segments.last_mut() {
        Some(last) => match last.last_mut() {
            Some(Part::Static(text)) => text.push_str(&item.route_suffix),
            _ => last.push(Part::Static(item.route_suffix.clone())),
        },
        None => segments.push(item.parts.clone()),
    }

    segments
}

/// Builds the manifest for a pages directory with default routing options
pub fn build_manifest(pages_root: impl AsRef<Path>) -> Result<ManifestData> {
    ManifestBuilder::new(pages_root.as_ref()).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, file: &str) -> Item {
        Item::new(name, file, false).unwrap()
    }

    fn stat(text: &str) -> Part {
        Part::Static(text.to_string())
    }

    #[test]
    fn test_plain_index_maps_to_parent() {
        let parent = vec![vec![stat("blog")]];
        let segments = child_segments(&parent, &item("index.astro", "blog/index.astro"));
        assert_eq!(segments, parent);
    }

    #[test]
    fn test_index_suffix_folds_into_literal() {
        let parent = vec![vec![stat("foo")]];
        let segments = child_segments(&parent, &item("index.json.astro", "foo/index.json.astro"));
        assert_eq!(segments, vec![vec![stat("foo.json")]]);
    }

    #[test]
    fn test_index_suffix_after_param_adds_part() {
        let parent = vec![vec![Part::Param("id".to_string())]];
        let segments = child_segments(&parent, &item("index.json.astro", "[id]/index.json.astro"));
        assert_eq!(
            segments,
            vec![vec![Part::Param("id".to_string()), stat(".json")]]
        );
    }

    #[test]
    fn test_root_index_suffix_becomes_segment() {
        let segments = child_segments(&[], &item("index.json.astro", "index.json.astro"));
        assert_eq!(segments, vec![vec![stat("index.json")]]);
    }

    #[test]
    fn test_non_index_appends_segment() {
        let parent = vec![vec![stat("blog")]];
        let segments = child_segments(&parent, &item("[slug].astro", "blog/[slug].astro"));
        assert_eq!(
            segments,
            vec![vec![stat("blog")], vec![Part::Param("slug".to_string())]]
        );
    }
}
