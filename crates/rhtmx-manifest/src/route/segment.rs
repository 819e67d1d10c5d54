/// Segment parsing for file-based routes
///
/// Turns one directory or file base name into an ordered list of typed
/// [`Part`]s. Pure functions: same input → same output, no side effects.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{InvalidRouteReason, Result, RouteError};

/// `[name]` or `[name(annotation)]`, lazily matched so adjacent groups split
static PARAM_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.+?\(.+?\)|.+?)\]").expect("valid param token regex"));

static PARAM_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\.\.\.)?[a-zA-Z0-9_$]+$").expect("valid param name regex"));

static REST_WITH_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s).+\[\.\.\.[^\]]+\]").expect("valid rest prefix regex"));

static REST_WITH_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[\.\.\.[^\]]+\].+").expect("valid rest suffix regex"));

/// One token of a path segment
///
/// Sum type mirroring the three shapes a file name can take:
///
/// - `about` → `Static("about")`
/// - `[slug]` → `Param("slug")`
/// - `[...path]` → `Rest("path")`
///
/// A `Rest` part is always the only part of its segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Part {
    /// Literal text, matched exactly
    Static(String),
    /// Named parameter capturing one non-`/` run
    Param(String),
    /// Rest parameter capturing zero or more trailing segments
    Rest(String),
}

impl Part {
    /// Literal text or parameter name (without the `...` prefix)
    pub fn content(&self) -> &str {
        match self {
            Part::Static(text) | Part::Param(text) | Part::Rest(text) => text,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Part::Static(_))
    }

    pub fn is_spread(&self) -> bool {
        matches!(self, Part::Rest(_))
    }
}

/// Parses a path segment into parts (pure function)
///
/// `file` is the relative path of the entry being parsed and only appears in
/// error messages.
///
/// # Rejections
///
/// Each one is a [`RouteError::InvalidRoute`] carrying `file`:
///
/// 1. Empty segment
/// 2. Adjacent parameter groups: `[a][b]`
/// 3. Unbalanced brackets: `[a`
/// 4. Rest parameter mixed with other text: `x[...rest]`, `[...rest]x`
/// 5. Parameter name outside `^[a-zA-Z0-9_$]+$`
///
/// # Examples
///
/// ```
/// use rhtmx_manifest::route::segment::{parse_segment, Part};
///
/// let parts = parse_segment("[slug].json", "blog/[slug].json.astro").unwrap();
/// assert_eq!(
///     parts,
///     vec![Part::Param("slug".to_string()), Part::Static(".json".to_string())]
/// );
///
/// assert!(parse_segment("[a][b]", "pages/[a][b].astro").is_err());
/// ```
pub fn parse_segment(segment: &str, file: &str) -> Result<Vec<Part>> {
    validate_segment(segment, file)?;

    let mut parts = Vec::new();
    let mut cursor = 0;

    for captures in PARAM_TOKEN.captures_iter(segment) {
        let (Some(whole), Some(token)) = (captures.get(0), captures.get(1)) else {
            continue;
        };

        push_static(&mut parts, &segment[cursor..whole.start()]);
        parts.push(parse_param(token.as_str(), file)?);
        cursor = whole.end();
    }

    push_static(&mut parts, &segment[cursor..]);
    Ok(parts)
}

/// Structural checks that run before tokenizing
fn validate_segment(segment: &str, file: &str) -> Result<()> {
    let reject = |reason| Err(RouteError::invalid(file, reason));

    if segment.is_empty() {
        return reject(InvalidRouteReason::EmptySegment);
    }

    if segment.contains("][") {
        return reject(InvalidRouteReason::AdjacentParameters);
    }

    if segment.matches('[').count() != segment.matches(']').count() {
        return reject(InvalidRouteReason::UnbalancedBrackets);
    }

    if REST_WITH_PREFIX.is_match(segment) || REST_WITH_SUFFIX.is_match(segment) {
        return reject(InvalidRouteReason::RestNotStandalone);
    }

    Ok(())
}

fn push_static(parts: &mut Vec<Part>, text: &str) {
    if !text.is_empty() {
        parts.push(Part::Static(text.to_string()));
    }
}

/// Parses the inside of one `[...]` group
///
/// A trailing parenthesized matcher annotation, `[id(\d+)]`, is stripped
/// before the name is validated.
fn parse_param(token: &str, file: &str) -> Result<Part> {
    let name = strip_annotation(token);

    if !PARAM_NAME.is_match(name) {
        return Err(RouteError::invalid(
            file,
            InvalidRouteReason::InvalidParameterName,
        ));
    }

    Ok(match name.strip_prefix("...") {
        Some(rest) => Part::Rest(rest.to_string()),
        None => Part::Param(name.to_string()),
    })
}

fn strip_annotation(token: &str) -> &str {
    match token.find('(') {
        Some(open) if token.ends_with(')') => &token[..open],
        _ => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn stat(text: &str) -> Part {
        Part::Static(text.to_string())
    }

    fn param(name: &str) -> Part {
        Part::Param(name.to_string())
    }

    #[test]
    fn test_parse_static() {
        assert_eq!(parse_segment("about", "about.astro").unwrap(), vec![stat("about")]);
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_segment("[id]", "[id].astro").unwrap(), vec![param("id")]);
    }

    #[test]
    fn test_parse_rest() {
        assert_eq!(
            parse_segment("[...path]", "[...path].astro").unwrap(),
            vec![Part::Rest("path".to_string())]
        );
    }

    #[test]
    fn test_parse_mixed_runs_keep_source_order() {
        let parts = parse_segment("post-[id]-v[version].min", "x.astro").unwrap();
        assert_eq!(
            parts,
            vec![stat("post-"), param("id"), stat("-v"), param("version"), stat(".min")]
        );
    }

    #[test]
    fn test_parse_strips_matcher_annotation() {
        assert_eq!(
            parse_segment(r"[id(\d+)]", "x.astro").unwrap(),
            vec![param("id")]
        );
    }

    #[test]
    fn test_parse_dollar_and_underscore_names() {
        assert_eq!(
            parse_segment("[$_x1]", "x.astro").unwrap(),
            vec![param("$_x1")]
        );
    }

    #[rstest]
    #[case("[a][b]", InvalidRouteReason::AdjacentParameters)]
    #[case("a[b", InvalidRouteReason::UnbalancedBrackets)]
    #[case("a]b", InvalidRouteReason::UnbalancedBrackets)]
    #[case("[...slug]x", InvalidRouteReason::RestNotStandalone)]
    #[case("x[...slug]", InvalidRouteReason::RestNotStandalone)]
    #[case("[sl-ug]", InvalidRouteReason::InvalidParameterName)]
    #[case("[..slug]", InvalidRouteReason::InvalidParameterName)]
    #[case("", InvalidRouteReason::EmptySegment)]
    fn test_parse_rejections(#[case] segment: &str, #[case] expected: InvalidRouteReason) {
        match parse_segment(segment, "pages/bad.astro") {
            Err(RouteError::InvalidRoute { file, reason }) => {
                assert_eq!(file, "pages/bad.astro");
                assert_eq!(reason, expected);
            }
            other => panic!("expected InvalidRoute, got {:?}", other),
        }
    }

    #[test]
    fn test_part_predicates() {
        assert!(!stat("a").is_dynamic());
        assert!(param("a").is_dynamic());
        assert!(!param("a").is_spread());
        let rest = Part::Rest("a".to_string());
        assert!(rest.is_dynamic() && rest.is_spread());
        assert_eq!(rest.content(), "a");
    }
}
