//! Pagination of static-path data
//!
//! Splits a list into pages and computes each page's URLs through the owning
//! route's generator. The route is expected to take the page number through a
//! rest parameter named `page` (`blog/[...page].astro`), so page 1 lives at
//! the route's base URL.

use rhtmx_manifest::{ParamValue, Params, RouteData, RouteError};
use serde::Serialize;
use serde_json::Value;

use crate::provider::StaticPath;

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Name of the route parameter that carries the page number
pub const PAGE_PARAM: &str = "page";

/// Items per page
///
/// `Items(0)` behaves like the default size. `Unbounded` puts every item on
/// a single page and serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "Option<usize>")]
pub enum PageSize {
    Items(usize),
    Unbounded,
}

impl PageSize {
    fn normalized(self) -> Self {
        match self {
            PageSize::Items(0) => PageSize::Items(DEFAULT_PAGE_SIZE),
            other => other,
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::Items(DEFAULT_PAGE_SIZE)
    }
}

impl From<usize> for PageSize {
    fn from(size: usize) -> Self {
        PageSize::Items(size)
    }
}

impl From<PageSize> for Option<usize> {
    fn from(size: PageSize) -> Self {
        match size {
            PageSize::Items(size) => Some(size),
            PageSize::Unbounded => None,
        }
    }
}

/// Page position within the whole collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub size: PageSize,
    /// 1-based
    pub current: usize,
    pub last: usize,
}

/// Links to this page and its neighbours
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageUrls {
    pub current: String,
    /// Unset on the last page
    pub next: Option<String>,
    /// Unset on the first page
    pub prev: Option<String>,
}

/// One page of paginated data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Index of the first item on this page
    pub start: usize,
    /// Index of the last item on this page, inclusive (`-1` when empty)
    pub end: isize,
    pub total: usize,
    pub page: PageInfo,
    pub url: PageUrls,
    /// Route parameters of this page
    #[serde(skip)]
    pub params: Params,
}

impl<T: Serialize> Page<T> {
    /// Static path entry for this page: its params, and the page as the
    /// `page` prop
    pub fn into_static_path(self) -> serde_json::Result<StaticPath> {
        let params = self.params.clone();
        let page = serde_json::to_value(&self)?;

        let mut props = serde_json::Map::new();
        props.insert(PAGE_PARAM.to_string(), page);
        Ok(StaticPath { params, props })
    }
}

/// Splits `items` into pages for `route`
///
/// `base` carries the route's other parameters and is copied onto every page.
/// Page 1 leaves `page` unset; later pages set it to the page number.
///
/// # Examples
///
/// ```no_run
/// use rhtmx_manifest::{build_manifest, Params};
/// use rhtmx_runtime::paginate::{paginate, PageSize};
///
/// let manifest = build_manifest("src/pages").unwrap();
/// let route = manifest.route_for_component("blog/[...page].astro").unwrap();
///
/// let posts: Vec<u32> = (0..23).collect();
/// let pages = paginate(route, &posts, PageSize::Items(10), &Params::new()).unwrap();
///
/// assert_eq!(pages.len(), 3);
/// assert_eq!(pages[1].url.current, "/blog/2");
/// ```
pub fn paginate<T: Clone>(
    route: &RouteData,
    items: &[T],
    page_size: PageSize,
    base: &Params,
) -> Result<Vec<Page<T>>, RouteError> {
    let size = page_size.normalized();
    let total = items.len();
    let last = match size {
        PageSize::Items(per_page) => total.div_ceil(per_page).max(1),
        PageSize::Unbounded => 1,
    };

    (1..=last)
        .map(|current| {
            let (start, stop) = match size {
                PageSize::Items(per_page) => {
                    let start = (current - 1) * per_page;
                    (start, (start + per_page).min(total))
                }
                PageSize::Unbounded => (0, total),
            };

            let url = PageUrls {
                current: route.generate(&page_params(base, current))?,
                next: if current == last {
                    None
                } else {
                    Some(route.generate(&page_params(base, current + 1))?)
                },
                prev: if current == 1 {
                    None
                } else {
                    Some(route.generate(&page_params(base, current - 1))?)
                },
            };

            Ok(Page {
                data: items[start..stop].to_vec(),
                start,
                end: stop as isize - 1,
                total,
                page: PageInfo {
                    size,
                    current,
                    last,
                },
                url,
                params: page_params(base, current),
            })
        })
        .collect()
}

fn page_params(base: &Params, page: usize) -> Params {
    let value = if page > 1 {
        ParamValue::Set(page.to_string())
    } else {
        ParamValue::Unset
    };
    base.clone().with(PAGE_PARAM, value)
}

/// Reads the `page` prop back out of a static path's props
pub fn page_prop(props: &serde_json::Map<String, Value>) -> Option<&Value> {
    props.get(PAGE_PARAM)
}
