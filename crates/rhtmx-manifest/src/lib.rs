//! # RHTMX Manifest
//!
//! File-based route manifest for RHTMX sites. A pages directory is walked
//! once and compiled into an ordered route table:
//!
//! - Static routes (`about.astro` → `/about`)
//! - Dynamic parameters (`[slug].astro` → `/:slug`)
//! - Mixed segments (`post-[id].json.astro` → `/post-:id.json`)
//! - Rest parameters (`[...path].astro` → `/*path`, also matches the parent)
//! - Index folding (`blog/index.json.astro` → `/blog.json`)
//!
//! Table order is match priority: static beats dynamic beats rest at every
//! level, so the first matching route is the most specific one.
//!
//! ## Example
//!
//! ```no_run
//! use rhtmx_manifest::{build_manifest, Params};
//!
//! let manifest = build_manifest("src/pages").unwrap();
//!
//! let found = manifest.match_route("/blog/hello-world").unwrap();
//! assert_eq!(found.params.get("slug"), Some("hello-world"));
//!
//! let path = found.route.generate(&Params::new().with("slug", "other")).unwrap();
//! assert_eq!(path, "/blog/other");
//! ```

pub mod config;
pub mod error;
pub mod manifest;
pub mod matcher;
pub mod params;
pub mod route;

pub use config::{Config, DevConfig, RoutingConfig};
pub use error::{InvalidRouteReason, Result, RouteError};
pub use manifest::{build_manifest, ManifestBuilder, ManifestData, RouteData};
pub use matcher::{match_route, RouteMatch};
pub use params::{ParamName, ParamValue, Params};
