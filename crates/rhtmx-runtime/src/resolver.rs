//! Request resolution and build-time path enumeration
//!
//! Matching a dynamic route's pattern is not enough: the extracted params
//! must also be one of the combinations the component declared through its
//! [`StaticPathsProvider`](crate::StaticPathsProvider).

use std::sync::Arc;

use rhtmx_manifest::{ManifestData, RouteData, RouteMatch};
use tracing::debug;

use crate::cache::{StaticPathCache, StaticPathSet};
use crate::error::ResolveError;
use crate::provider::{Props, ProviderRegistry, StaticPathsContext, StaticPathsProvider};

/// Why a request resolved to nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    /// No route pattern accepts the path
    NoRoute,
    /// A dynamic route matched but its static paths do not include the params
    NoStaticPath { component: String },
}

/// Outcome of resolving one request path
#[derive(Debug)]
pub enum Resolution<'a> {
    Found {
        route_match: RouteMatch<'a>,
        /// Props of the matching static path (empty for literal routes)
        props: Props,
    },
    NotFound(NotFound),
}

impl<'a> Resolution<'a> {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found { .. })
    }

    /// Component of the resolved page
    pub fn component(&self) -> Option<&'a str> {
        match self {
            Resolution::Found { route_match, .. } => Some(route_match.component()),
            Resolution::NotFound(_) => None,
        }
    }
}

/// Resolves requests against one manifest snapshot
///
/// The resolver is pinned to the cache generation current at creation, so
/// a snapshot outlived by a rebuild never writes into the new cache.
#[derive(Debug, Clone)]
pub struct Resolver {
    manifest: Arc<ManifestData>,
    cache: Arc<StaticPathCache>,
    generation: u64,
    providers: Arc<ProviderRegistry>,
}

impl Resolver {
    pub fn new(
        manifest: Arc<ManifestData>,
        cache: Arc<StaticPathCache>,
        providers: Arc<ProviderRegistry>,
    ) -> Self {
        let generation = cache.generation();
        Self {
            manifest,
            cache,
            generation,
            providers,
        }
    }

    pub fn manifest(&self) -> &ManifestData {
        &self.manifest
    }

    /// Matches `path` and checks dynamic matches against their static paths
    ///
    /// Literal routes never consult the cache. Provider failures are returned
    /// as errors, never folded into [`NotFound`].
    pub async fn resolve(&self, path: &str) -> Result<Resolution<'_>, ResolveError> {
        let Some(route_match) = self.manifest.match_route(path) else {
            debug!(path, "No route for request");
            return Ok(Resolution::NotFound(NotFound::NoRoute));
        };

        if !route_match.is_dynamic() {
            return Ok(Resolution::Found {
                route_match,
                props: Props::new(),
            });
        }

        let paths = self.static_paths(route_match.route).await?;
        let declared = paths
            .iter()
            .find(|static_path| static_path.params == route_match.params);

        match declared {
            Some(static_path) => Ok(Resolution::Found {
                props: static_path.props.clone(),
                route_match,
            }),
            None => {
                let component = route_match.component().to_string();
                debug!(path, component = %component, "Route matched but no static path declared");
                Ok(Resolution::NotFound(NotFound::NoStaticPath { component }))
            }
        }
    }

    /// Static paths of a dynamic route, computed once per component
    pub async fn static_paths(&self, route: &RouteData) -> Result<Arc<StaticPathSet>, ResolveError> {
        let provider = self
            .providers
            .get(&route.component)
            .ok_or_else(|| ResolveError::MissingProvider {
                component: route.component.clone(),
            })?;

        self.cache
            .get_or_try_init_in(self.generation, &route.component, || {
                run_provider(route, provider)
            })
            .await
    }

    /// Concrete paths a route renders at build time
    ///
    /// A literal route yields its own path. A dynamic route yields one
    /// generated path per declared static path, in declaration order.
    pub async fn enumerate_paths(&self, route: &RouteData) -> Result<Vec<String>, ResolveError> {
        if let Some(path) = &route.path {
            return Ok(vec![path.clone()]);
        }

        let paths = self.static_paths(route).await?;
        let generated = paths
            .iter()
            .map(|static_path| route.generate(&static_path.params))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(generated)
    }

    /// [`enumerate_paths`](Self::enumerate_paths) over the whole table, in table order
    pub async fn enumerate_all(&self) -> Result<Vec<String>, ResolveError> {
        let mut all = Vec::new();
        for route in self.manifest.routes() {
            all.extend(self.enumerate_paths(route).await?);
        }
        Ok(all)
    }
}

async fn run_provider(
    route: &RouteData,
    provider: Arc<dyn StaticPathsProvider>,
) -> Result<StaticPathSet, ResolveError> {
    let mut ctx = StaticPathsContext::new(route);
    let paths = provider
        .static_paths(&mut ctx)
        .await
        .map_err(|err| ResolveError::from_provider(&route.component, err))?;

    debug!(component = %route.component, count = paths.len(), "Static paths generated");
    Ok(paths)
}
