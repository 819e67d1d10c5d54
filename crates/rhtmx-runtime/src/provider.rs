//! Static-paths capability for dynamic routes
//!
//! A page with a dynamic segment declares which parameter combinations it
//! actually renders. Each such page registers a [`StaticPathsProvider`]
//! under its component path.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use rhtmx_manifest::{Params, RouteData};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PaginateError;
use crate::paginate::{self, Page, PageSize};

/// Props handed to a page for one static path
pub type Props = Map<String, Value>;

/// One parameter combination a dynamic route renders
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticPath {
    pub params: Params,
    #[serde(default)]
    pub props: Props,
}

impl StaticPath {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            props: Props::new(),
        }
    }

    /// Builder-style prop insert
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }
}

/// State for one static-paths pass over one route
///
/// Pagination is allowed once per pass.
pub struct StaticPathsContext<'a> {
    route: &'a RouteData,
    paginate_calls: usize,
}

impl<'a> StaticPathsContext<'a> {
    pub fn new(route: &'a RouteData) -> Self {
        Self {
            route,
            paginate_calls: 0,
        }
    }

    /// Route whose static paths are being generated
    pub fn route(&self) -> &'a RouteData {
        self.route
    }

    /// Paginates `items` over this route
    ///
    /// A second call in the same pass fails with [`PaginateError::DuplicateCall`].
    pub fn paginate<T: Clone>(
        &mut self,
        items: &[T],
        page_size: impl Into<PageSize>,
    ) -> std::result::Result<Vec<Page<T>>, PaginateError> {
        self.paginate_with(items, page_size, &Params::new())
    }

    /// Like [`paginate`](Self::paginate), for routes with parameters besides `page`
    pub fn paginate_with<T: Clone>(
        &mut self,
        items: &[T],
        page_size: impl Into<PageSize>,
        base: &Params,
    ) -> std::result::Result<Vec<Page<T>>, PaginateError> {
        self.paginate_calls += 1;
        if self.paginate_calls > 1 {
            return Err(PaginateError::DuplicateCall);
        }

        Ok(paginate::paginate(self.route, items, page_size.into(), base)?)
    }
}

/// Declares the static paths of one dynamic page
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use rhtmx_manifest::Params;
/// use rhtmx_runtime::{StaticPath, StaticPathsContext, StaticPathsProvider};
///
/// struct Posts;
///
/// #[async_trait]
/// impl StaticPathsProvider for Posts {
///     async fn static_paths(
///         &self,
///         _ctx: &mut StaticPathsContext<'_>,
///     ) -> anyhow::Result<Vec<StaticPath>> {
///         Ok(vec![
///             StaticPath::new(Params::new().with("slug", "hello")).with_prop("title", "Hello"),
///             StaticPath::new(Params::new().with("slug", "world")).with_prop("title", "World"),
///         ])
///     }
/// }
/// ```
#[async_trait]
pub trait StaticPathsProvider: Send + Sync {
    async fn static_paths(&self, ctx: &mut StaticPathsContext<'_>) -> Result<Vec<StaticPath>>;
}

/// Fixed list of static paths
#[async_trait]
impl StaticPathsProvider for Vec<StaticPath> {
    async fn static_paths(&self, _ctx: &mut StaticPathsContext<'_>) -> Result<Vec<StaticPath>> {
        Ok(self.clone())
    }
}

/// Providers keyed by component path
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn StaticPathsProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        component: impl Into<String>,
        provider: impl StaticPathsProvider + 'static,
    ) {
        self.providers.insert(component.into(), Arc::new(provider));
    }

    pub fn get(&self, component: &str) -> Option<Arc<dyn StaticPathsProvider>> {
        self.providers.get(component).cloned()
    }

    pub fn contains(&self, component: &str) -> bool {
        self.providers.contains_key(component)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("components", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}
