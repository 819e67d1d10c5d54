/// Specificity ordering for sibling filesystem entries
///
/// The order produced here is both the walk order and, transitively, the
/// match priority of the final route table: routes are tried in table order
/// and the first match wins.

use std::cmp::Ordering;

use super::segment::{parse_segment, Part};
use crate::error::Result;

/// One directory entry visited during the manifest walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// File or directory name, e.g. `index.json.astro`
    pub basename: String,
    /// Extension including the dot, e.g. `.astro` (empty for most directories)
    pub ext: String,
    /// Parsed route segment
    pub parts: Vec<Part>,
    /// Slash-separated path relative to the project root
    pub file: String,
    pub is_dir: bool,
    /// File whose name starts with `index.`
    pub is_index: bool,
    /// File with a recognized page extension
    pub is_page: bool,
    /// Qualifier between the base name and the extension, e.g. `.json`
    pub route_suffix: String,
}

impl Item {
    /// Builds the item for a directory entry
    ///
    /// Directories contribute their full name as the segment; files drop
    /// their extension first.
    pub fn new(basename: &str, file: &str, is_dir: bool) -> Result<Self> {
        let ext = extension_of(basename);
        let segment = if is_dir {
            basename
        } else {
            &basename[..basename.len() - ext.len()]
        };

        Ok(Item {
            basename: basename.to_string(),
            ext: ext.to_string(),
            parts: parse_segment(segment, file)?,
            file: file.to_string(),
            is_dir,
            is_index: !is_dir && basename.starts_with("index."),
            is_page: !is_dir,
            route_suffix: route_suffix_of(basename, ext).to_string(),
        })
    }
}

/// Extension of a base name, leading-dot names have none
///
/// `index.json.astro` → `.astro`, `.well-known` → ``, `about` → ``
pub fn extension_of(basename: &str) -> &str {
    match basename.rfind('.') {
        Some(0) | None => "",
        Some(dot) => &basename[dot..],
    }
}

/// Text between the first dot and the extension
///
/// `index.json.astro` → `.json`, `index.astro` → ``
fn route_suffix_of<'a>(basename: &'a str, ext: &str) -> &'a str {
    let end = basename.len() - ext.len();
    match basename.find('.') {
        Some(start) if start < end => &basename[start..end],
        _ => "",
    }
}

/// Whether a relative path contains a rest-parameter marker anywhere
fn is_spread_path(file: &str) -> bool {
    file.contains("[...")
}

/// Total order over sibling items (pure function)
///
/// Rules, applied in sequence until one decides:
///
/// 1. **Index vs non-index**: an index file sorts first, unless its own path
///    contains a rest marker, in which case it sorts last
/// 2. **Part by part**: the item that runs out of parts first sorts after the
///    other (`[slug].json` before `[slug]`)
/// 3. **Two rest parts**: the non-index item sorts first
/// 4. **Rest vs non-rest**: non-rest sorts first
/// 5. **Parameter vs literal**: literal sorts first
/// 6. **Two literals**: longer text first, then lexicographic
/// 7. **Tiebreak**: page files before directories, then by relative path
///
/// Resulting precedence: literal routes, then parameterized routes, then
/// catch-all routes.
///
/// # Examples
///
/// ```
/// use rhtmx_manifest::route::specificity::{compare_items, Item};
/// use std::cmp::Ordering;
///
/// let index = Item::new("index.astro", "blog/index.astro", false).unwrap();
/// let slug = Item::new("[slug].astro", "blog/[slug].astro", false).unwrap();
/// let rest = Item::new("[...rest].astro", "blog/[...rest].astro", false).unwrap();
///
/// assert_eq!(compare_items(&index, &slug), Ordering::Less);
/// assert_eq!(compare_items(&slug, &rest), Ordering::Less);
/// ```
pub fn compare_items(a: &Item, b: &Item) -> Ordering {
    if a.is_index != b.is_index {
        return if a.is_index {
            if is_spread_path(&a.file) {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        } else if is_spread_path(&b.file) {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    let longest = a.parts.len().max(b.parts.len());
    for i in 0..longest {
        let (a_part, b_part) = match (a.parts.get(i), b.parts.get(i)) {
            (None, _) => return Ordering::Greater,
            (_, None) => return Ordering::Less,
            (Some(a_part), Some(b_part)) => (a_part, b_part),
        };

        if let Some(order) = compare_parts(a, a_part, b, b_part) {
            return order;
        }
    }

    b.is_page
        .cmp(&a.is_page)
        .then_with(|| a.file.cmp(&b.file))
}

/// Rules 3-6 for one position; `None` means the parts tie
fn compare_parts(a: &Item, a_part: &Part, b: &Item, b_part: &Part) -> Option<Ordering> {
    match (a_part, b_part) {
        (Part::Rest(_), Part::Rest(_)) => {
            (a.is_index != b.is_index).then(|| a.is_index.cmp(&b.is_index))
        }
        (Part::Rest(_), _) => Some(Ordering::Greater),
        (_, Part::Rest(_)) => Some(Ordering::Less),
        (Part::Param(_), Part::Static(_)) => Some(Ordering::Greater),
        (Part::Static(_), Part::Param(_)) => Some(Ordering::Less),
        (Part::Param(_), Part::Param(_)) => None,
        (Part::Static(a_text), Part::Static(b_text)) => (a_text != b_text).then(|| {
            b_text
                .len()
                .cmp(&a_text.len())
                .then_with(|| a_text.cmp(b_text))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn file(name: &str) -> Item {
        Item::new(name, &format!("pages/{}", name), false).unwrap()
    }

    fn dir(name: &str) -> Item {
        Item::new(name, &format!("pages/{}", name), true).unwrap()
    }

    fn sorted(mut items: Vec<Item>) -> Vec<String> {
        items.sort_by(compare_items);
        items.into_iter().map(|item| item.basename).collect()
    }

    #[rstest]
    #[case("index.json.astro", ".astro", ".json")]
    #[case("index.astro", ".astro", "")]
    #[case("[slug].astro", ".astro", "")]
    #[case("feed.xml.md", ".md", ".xml")]
    fn test_item_naming(#[case] basename: &str, #[case] ext: &str, #[case] suffix: &str) {
        let item = file(basename);
        assert_eq!(item.ext, ext);
        assert_eq!(item.route_suffix, suffix);
    }

    #[test]
    fn test_extension_of_hidden_and_plain() {
        assert_eq!(extension_of(".well-known"), "");
        assert_eq!(extension_of("about"), "");
        assert_eq!(extension_of("v1.2"), ".2");
    }

    #[test]
    fn test_directory_keeps_full_name() {
        let item = dir("v1.2");
        assert_eq!(item.parts, vec![Part::Static("v1.2".to_string())]);
        assert!(!item.is_index);
        assert!(!item.is_page);
    }

    #[test]
    fn test_index_param_rest_order() {
        let order = sorted(vec![file("[...rest].astro"), file("[slug].astro"), file("index.astro")]);
        assert_eq!(order, vec!["index.astro", "[slug].astro", "[...rest].astro"]);
    }

    #[test]
    fn test_literal_before_param() {
        let order = sorted(vec![file("[id].astro"), file("new.astro")]);
        assert_eq!(order, vec!["new.astro", "[id].astro"]);
    }

    #[test]
    fn test_longer_literal_first_then_alphabetical() {
        let order = sorted(vec![file("b.astro"), file("about.astro"), file("a.astro")]);
        assert_eq!(order, vec!["about.astro", "a.astro", "b.astro"]);
    }

    #[test]
    fn test_more_parts_sort_first() {
        let order = sorted(vec![file("[slug].astro"), file("[slug].json.astro")]);
        assert_eq!(order, vec!["[slug].json.astro", "[slug].astro"]);
    }

    #[test]
    fn test_page_before_directory_with_same_name() {
        let order = sorted(vec![dir("blog"), file("blog.astro")]);
        assert_eq!(order, vec!["blog.astro", "blog"]);
    }

    #[test]
    fn test_spread_index_sorts_after_sibling() {
        let index = Item::new("index.astro", "pages/[...all]/index.astro", false).unwrap();
        let other = Item::new("about.astro", "pages/[...all]/about.astro", false).unwrap();
        assert_eq!(compare_items(&index, &other), Ordering::Greater);
        assert_eq!(compare_items(&other, &index), Ordering::Less);
    }

    #[test]
    fn test_two_rest_siblings_fall_back_to_path() {
        let a = dir("[...a]");
        let b = file("[...b].astro");
        assert_eq!(compare_items(&b, &a), Ordering::Less);
        assert_eq!(compare_items(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_order_is_antisymmetric() {
        let items = vec![
            file("index.astro"),
            file("index.json.astro"),
            file("about.astro"),
            file("[id].astro"),
            file("[id].json.astro"),
            file("[...rest].astro"),
            dir("blog"),
            dir("[category]"),
            dir("[...all]"),
        ];

        for a in &items {
            for b in &items {
                assert_eq!(compare_items(a, b), compare_items(b, a).reverse(), "{} vs {}", a.file, b.file);
            }
        }
    }
}
