/// Pattern compilation for routes
///
/// One segment tree (`Vec<Vec<Part>>`, one entry per path segment) is compiled
/// into two artifacts that always agree on parameter order:
///
/// - [`RouteMatcher`]: anchored regex, one capture per dynamic part
/// - [`RouteGenerator`]: token template that fills parameters back in
///
/// Both escape literal text with the same rule, so for routes without rest
/// parameters `generate(extract(match(generate(p)))) == generate(p)`.

use regex::{Captures, Regex};

use super::segment::Part;
use crate::error::{Result, RouteError};
use crate::params::{ParamName, ParamValue, Params};

/// Ordered per-segment parts of one route, root to leaf
pub type SegmentTree = Vec<Vec<Part>>;

/// Makes literal text safe for a URL path
///
/// `?` and `#` would end the path, so they are percent-encoded. Already
/// encoded brackets are restored so `%5Bid%5D` and `[id]` agree.
pub fn escape_literal(text: &str) -> String {
    text.replace('?', "%3F")
        .replace('#', "%23")
        .replace("%5B", "[")
        .replace("%5D", "]")
}

/// Compiled request matcher
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    regex: Regex,
}

impl RouteMatcher {
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub fn captures<'p>(&self, path: &'p str) -> Option<Captures<'p>> {
        self.regex.captures(path)
    }

    /// Regex source, e.g. `^/blog/([^/]+?)/?$`
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Param(String),
    Rest(String),
}

/// Path generator: the inverse of [`RouteMatcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGenerator {
    segments: Vec<Vec<Token>>,
}

impl RouteGenerator {
    /// Fills the template with `params`
    ///
    /// Set values are percent-encoded (rest values piece by piece, keeping
    /// `/`). An unset rest parameter drops its whole segment; an unset named
    /// parameter is [`RouteError::MissingParam`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_manifest::route::pattern::compile;
    /// use rhtmx_manifest::route::segment::Part;
    /// use rhtmx_manifest::Params;
    ///
    /// let tree = vec![
    ///     vec![Part::Static("docs".to_string())],
    ///     vec![Part::Rest("path".to_string())],
    /// ];
    /// let (_, generator) = compile(&tree, false).unwrap();
    ///
    /// assert_eq!(generator.generate(&Params::new()).unwrap(), "/docs");
    /// let params = Params::new().with("path", "a/b c");
    /// assert_eq!(generator.generate(&params).unwrap(), "/docs/a/b%20c");
    /// ```
    pub fn generate(&self, params: &Params) -> Result<String> {
        let mut path = String::new();

        for segment in &self.segments {
            if let Some(Token::Rest(name)) = segment.first() {
                if let Some(value) = params.get(name) {
                    path.push('/');
                    path.push_str(&encode_rest(value));
                }
                continue;
            }

            path.push('/');
            for token in segment {
                match token {
                    Token::Literal(text) => path.push_str(text),
                    Token::Param(name) => {
                        let value = params.get(name).ok_or_else(|| RouteError::MissingParam {
                            name: name.clone(),
                        })?;
                        path.push_str(&urlencoding::encode(value));
                    }
                    Token::Rest(name) => {
                        if let Some(value) = params.get(name) {
                            path.push_str(&encode_rest(value));
                        }
                    }
                }
            }
        }

        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }

    /// Human-readable template like `/blog/:slug` or `/docs/*path`
    pub fn template(&self) -> String {
        let rendered: String = self
            .segments
            .iter()
            .map(|segment| {
                let body: String = segment
                    .iter()
                    .map(|token| match token {
                        Token::Literal(text) => text.clone(),
                        Token::Param(name) => format!(":{}", name),
                        Token::Rest(name) => format!("*{}", name),
                    })
                    .collect();
                format!("/{}", body)
            })
            .collect();

        if rendered.is_empty() {
            "/".to_string()
        } else {
            rendered
        }
    }
}

fn encode_rest(value: &str) -> String {
    value
        .split('/')
        .map(|piece| urlencoding::encode(piece).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Compiles a segment tree into matcher and generator (pure function)
///
/// With `trailing_slash`, every non-root matcher also accepts one trailing
/// `/`, and rest captures stop short of it. An empty tree matches `/` only.
///
/// # Examples
///
/// ```
/// use rhtmx_manifest::route::pattern::compile;
/// use rhtmx_manifest::route::segment::Part;
///
/// let tree = vec![
///     vec![Part::Static("blog".to_string())],
///     vec![Part::Param("slug".to_string())],
/// ];
/// let (matcher, _) = compile(&tree, false).unwrap();
/// assert_eq!(matcher.as_str(), "^/blog/([^/]+?)$");
/// assert!(matcher.is_match("/blog/hello"));
/// assert!(!matcher.is_match("/blog/a/b"));
/// ```
pub fn compile(segments: &[Vec<Part>], trailing_slash: bool) -> Result<(RouteMatcher, RouteGenerator)> {
    let mut source = String::from("^");
    let rest_capture = if trailing_slash { "(.*?)" } else { "(.*)" };
    let mut generator = Vec::with_capacity(segments.len());

    for segment in segments {
        if let Some(Part::Rest(name)) = segment.first() {
            source.push_str("(?:/");
            source.push_str(rest_capture);
            source.push_str(")?");
            generator.push(vec![Token::Rest(name.clone())]);
            continue;
        }

        source.push('/');
        let mut tokens = Vec::with_capacity(segment.len());
        for part in segment {
            match part {
                Part::Static(text) => {
                    let escaped = escape_literal(text);
                    source.push_str(&regex::escape(&escaped));
                    tokens.push(Token::Literal(escaped));
                }
                Part::Param(name) => {
                    source.push_str("([^/]+?)");
                    tokens.push(Token::Param(name.clone()));
                }
                Part::Rest(name) => {
                    source.push_str(rest_capture);
                    tokens.push(Token::Rest(name.clone()));
                }
            }
        }
        generator.push(tokens);
    }

    if segments.is_empty() {
        source.push('/');
    }
    if trailing_slash && !segments.is_empty() {
        source.push_str("/?");
    }
    source.push('$');

    let regex = Regex::new(&source)?;
    Ok((RouteMatcher { regex }, RouteGenerator { segments: generator }))
}

/// Parameter names in capture order
pub fn param_names(segments: &[Vec<Part>]) -> Vec<ParamName> {
    segments
        .iter()
        .flat_map(|segment| match segment.first() {
            Some(Part::Rest(name)) => vec![ParamName::rest(name.clone())],
            _ => segment
                .iter()
                .filter_map(|part| match part {
                    Part::Static(_) => None,
                    Part::Param(name) => Some(ParamName::new(name.clone())),
                    Part::Rest(name) => Some(ParamName::rest(name.clone())),
                })
                .collect(),
        })
        .collect()
}

/// Literal path when every segment is a single literal part
///
/// `None` as soon as any segment is dynamic or has several parts.
pub fn static_path(segments: &[Vec<Part>]) -> Option<String> {
    let literals: Option<Vec<&str>> = segments
        .iter()
        .map(|segment| match segment.as_slice() {
            [Part::Static(text)] => Some(text.as_str()),
            _ => None,
        })
        .collect();

    literals.map(|literals| format!("/{}", literals.join("/")))
}

/// Decodes capture groups into a parameter map
///
/// Captures are correlated with `names` by position. Values are
/// percent-decoded; an absent or empty rest capture is unset.
pub fn extract_params(captures: &Captures<'_>, names: &[ParamName]) -> Params {
    names
        .iter()
        .enumerate()
        .map(|(i, param)| {
            let raw = captures.get(i + 1).map(|m| m.as_str()).unwrap_or("");
            let value = if param.rest && raw.is_empty() {
                ParamValue::Unset
            } else {
                ParamValue::from(decode(raw))
            };
            (param.name.clone(), value)
        })
        .collect()
}

fn decode(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}
