//! # RHTMX Runtime
//!
//! Request-time half of file-based routing. Given a manifest built by
//! `rhtmx-manifest`, this crate decides whether a request resolves to a page:
//!
//! - **Static paths**: dynamic pages declare the parameter combinations they
//!   render through a [`StaticPathsProvider`]; a pattern match outside that
//!   set is a not-found
//! - **Single-flight cache**: each provider runs once per component, and
//!   concurrent requests wait for the run in flight
//! - **Pagination**: [`StaticPathsContext::paginate`] splits data into pages
//!   with ready-made page URLs
//! - **Hot reload**: [`ManifestWatcher`] rebuilds the manifest when pages are
//!   added or removed, and invalidates one component when it is edited
//!
//! ## Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use rhtmx_manifest::Config;
//! use rhtmx_runtime::{
//!     ManifestWatcher, PageSize, Resolution, SiteRuntime, StaticPath, StaticPathsContext,
//!     StaticPathsProvider,
//! };
//! use std::sync::Arc;
//!
//! struct BlogPages;
//!
//! #[async_trait]
//! impl StaticPathsProvider for BlogPages {
//!     async fn static_paths(&self, ctx: &mut StaticPathsContext<'_>) -> anyhow::Result<Vec<StaticPath>> {
//!         let posts = vec!["first", "second", "third"];
//!         let mut paths = Vec::new();
//!         for page in ctx.paginate(&posts, PageSize::Items(2))? {
//!             paths.push(page.into_static_path()?);
//!         }
//!         Ok(paths)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default()?;
//!     let runtime = Arc::new(
//!         SiteRuntime::from_config(".", &config)?
//!             .with_provider("src/pages/blog/[...page].astro", BlogPages),
//!     );
//!     let _watcher = ManifestWatcher::from_config(Arc::clone(&runtime), &config.dev)?;
//!
//!     let resolver = runtime.resolver().await;
//!     match resolver.resolve("/blog/2").await? {
//!         Resolution::Found { route_match, props } => {
//!             println!("{} {:?}", route_match.component(), props.get("page"));
//!         }
//!         Resolution::NotFound(reason) => println!("404: {:?}", reason),
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod paginate;
pub mod provider;
pub mod resolver;
pub mod runtime;
pub mod watcher;

pub use cache::{CacheStats, StaticPathCache, StaticPathSet};
pub use error::{PaginateError, ResolveError};
pub use paginate::{Page, PageInfo, PageSize, PageUrls, DEFAULT_PAGE_SIZE};
pub use provider::{Props, ProviderRegistry, StaticPath, StaticPathsContext, StaticPathsProvider};
pub use resolver::{NotFound, Resolution, Resolver};
pub use runtime::SiteRuntime;
pub use watcher::{ManifestWatcher, PageChange};
