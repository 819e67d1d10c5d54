//! Request matching against a route table
//!
//! Routes are tried in table order and the first whose pattern accepts the
//! path wins. Pass the raw, still-encoded path without a query string;
//! captured parameters are percent-decoded here.

use tracing::trace;

use crate::manifest::{ManifestData, RouteData};
use crate::params::Params;
use crate::route::pattern::extract_params;

/// Result of matching a request path
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    /// The winning route
    pub route: &'a RouteData,
    /// Decoded parameters, keyed by name; unmatched rest parameters are unset
    pub params: Params,
}

impl<'a> RouteMatch<'a> {
    pub fn component(&self) -> &'a str {
        &self.route.component
    }

    /// Whether the match still needs a static-path membership check
    pub fn is_dynamic(&self) -> bool {
        self.route.is_dynamic()
    }
}

/// Finds the first route whose pattern accepts `path`
///
/// # Examples
///
/// ```no_run
/// use rhtmx_manifest::{build_manifest, match_route};
///
/// let manifest = build_manifest("src/pages").unwrap();
/// if let Some(found) = match_route(manifest.routes(), "/blog/hello") {
///     println!("{} {:?}", found.route.component, found.params.get("slug"));
/// }
/// ```
pub fn match_route<'a>(routes: &'a [RouteData], path: &str) -> Option<RouteMatch<'a>> {
    let found = routes.iter().find_map(|route| {
        route.pattern.captures(path).map(|captures| RouteMatch {
            route,
            params: extract_params(&captures, &route.params),
        })
    });

    match &found {
        Some(found) => trace!(path, component = %found.route.component, "Route matched"),
        None => trace!(path, "No route matched"),
    }

    found
}

impl ManifestData {
    /// Shorthand for [`match_route`] over this table
    pub fn match_route(&self, path: &str) -> Option<RouteMatch<'_>> {
        match_route(self.routes(), path)
    }
}
