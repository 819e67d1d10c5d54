//! Site runtime: the current manifest plus everything derived from it

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use notify::Event;
use rhtmx_manifest::{Config, ManifestBuilder, ManifestData, RouteError, RoutingConfig};
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::cache::StaticPathCache;
use crate::provider::{ProviderRegistry, StaticPathsProvider};
use crate::resolver::Resolver;
use crate::watcher::{classify, PageChange};

/// Owns the route table, the static-path cache and the providers
///
/// The manifest is replaced wholesale on rebuild; resolvers keep the
/// snapshot they were created with.
///
/// # Examples
///
/// ```no_run
/// use rhtmx_manifest::{Params, RoutingConfig};
/// use rhtmx_runtime::{Resolution, SiteRuntime, StaticPath};
///
/// # async fn run() -> anyhow::Result<()> {
/// let runtime = SiteRuntime::new(".", &RoutingConfig::default())?.with_provider(
///     "src/pages/blog/[slug].astro",
///     vec![StaticPath::new(Params::new().with("slug", "hello"))],
/// );
///
/// let resolver = runtime.resolver().await;
/// if let Resolution::Found { route_match, .. } = resolver.resolve("/blog/hello").await? {
///     println!("render {}", route_match.component());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SiteRuntime {
    builder: ManifestBuilder,
    manifest: RwLock<Arc<ManifestData>>,
    cache: Arc<StaticPathCache>,
    providers: Arc<ProviderRegistry>,
}

impl SiteRuntime {
    /// Builds the initial manifest for `<project_root>/<routing.pages_dir>`
    pub fn new(project_root: impl Into<PathBuf>, routing: &RoutingConfig) -> Result<Self, RouteError> {
        let root = project_root.into();
        let root = root.canonicalize().unwrap_or(root);

        let builder = ManifestBuilder::from_config(root, routing);
        let manifest = builder.build()?;

        Ok(Self {
            builder,
            manifest: RwLock::new(Arc::new(manifest)),
            cache: Arc::new(StaticPathCache::new()),
            providers: Arc::new(ProviderRegistry::new()),
        })
    }

    pub fn from_config(project_root: impl Into<PathBuf>, config: &Config) -> Result<Self, RouteError> {
        Self::new(project_root, &config.routing)
    }

    /// Registers the static-paths provider for a dynamic page
    pub fn with_provider(
        mut self,
        component: impl Into<String>,
        provider: impl StaticPathsProvider + 'static,
    ) -> Self {
        Arc::make_mut(&mut self.providers).register(component, provider);
        self
    }

    pub fn with_providers(mut self, providers: ProviderRegistry) -> Self {
        self.providers = Arc::new(providers);
        self
    }

    /// Canonical project root; component keys are relative to it
    pub fn root(&self) -> &Path {
        self.builder.root()
    }

    pub fn pages_dir(&self) -> &Path {
        self.builder.pages_dir()
    }

    /// Current manifest snapshot
    pub async fn manifest(&self) -> Arc<ManifestData> {
        Arc::clone(&*self.manifest.read().await)
    }

    /// Resolver over the current manifest snapshot
    pub async fn resolver(&self) -> Resolver {
        let manifest = self.manifest.read().await;
        Resolver::new(
            Arc::clone(&*manifest),
            Arc::clone(&self.cache),
            Arc::clone(&self.providers),
        )
    }

    pub fn cache(&self) -> &StaticPathCache {
        &self.cache
    }

    /// Rebuilds the manifest from disk and empties the cache
    ///
    /// On failure the previous manifest stays in place.
    pub async fn rebuild(&self) -> Result<(), RouteError> {
        let manifest = match self.builder.build() {
            Ok(manifest) => manifest,
            Err(err) => {
                error!("Failed to rebuild route manifest: {}", err);
                return Err(err);
            }
        };

        let routes = manifest.len();
        let mut current = self.manifest.write().await;
        self.cache.clear().await;
        *current = Arc::new(manifest);
        drop(current);

        info!(routes, "Route manifest rebuilt");
        Ok(())
    }

    /// Drops the cached static paths of one component
    pub async fn invalidate(&self, component: &str) -> bool {
        info!(component, "Static paths invalidated");
        self.cache.invalidate(component).await
    }

    /// Component key for a changed file
    ///
    /// `None` for files outside the project root and for hidden files.
    pub fn component_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(self.root()).ok()?;

        let mut pieces = Vec::new();
        for component in relative.components() {
            let Component::Normal(name) = component else {
                return None;
            };
            let name = name.to_string_lossy();
            if name.starts_with('.') && name != ".well-known" {
                return None;
            }
            pieces.push(name.into_owned());
        }

        (!pieces.is_empty()).then(|| pieces.join("/"))
    }

    /// Applies a batch of file changes
    ///
    /// A structural change under the pages directory rebuilds the whole
    /// manifest, which also empties the cache. Otherwise each modified file
    /// invalidates its own key.
    pub async fn apply(&self, changes: &[PageChange]) -> Result<(), RouteError> {
        let relevant: Vec<(&PageChange, String)> = changes
            .iter()
            .filter_map(|change| {
                self.component_for(change.path())
                    .map(|component| (change, component))
            })
            .collect();

        let pages = self.pages_dir();
        if relevant.iter().any(|(change, _)| {
            matches!(change, PageChange::Structure(path) if path.starts_with(pages))
        }) {
            return self.rebuild().await;
        }

        for (_, component) in relevant {
            self.invalidate(&component).await;
        }
        Ok(())
    }

    /// Applies one watcher event
    pub async fn handle_event(&self, event: &Event) -> Result<(), RouteError> {
        self.apply(&classify(event)).await
    }
}
