//! Request-time errors

use rhtmx_manifest::RouteError;
use thiserror::Error;

/// Failure of a pagination call inside a static-paths pass
#[derive(Debug, Error)]
pub enum PaginateError {
    /// `paginate` was already called during this pass
    #[error("paginate() can only be called once per static paths pass")]
    DuplicateCall,

    /// A page URL could not be generated from the owning route
    #[error("Failed to generate page URL: {0}")]
    Route(#[from] RouteError),
}

/// Errors returned while resolving a request or enumerating paths
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The component called `paginate` more than once in one pass
    #[error("paginate() was called more than once while generating static paths for {component}")]
    DuplicatePaginateCall { component: String },

    /// A dynamic route has no static-paths provider
    #[error("No static paths provider registered for {component}")]
    MissingProvider { component: String },

    /// The component's static-paths provider failed
    #[error("Static paths provider for {component} failed: {source}")]
    Upstream {
        component: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error(transparent)]
    Route(#[from] RouteError),
}

impl ResolveError {
    /// Maps an error returned by a provider onto the typed taxonomy
    ///
    /// A duplicate pagination call surfaces as [`ResolveError::DuplicatePaginateCall`]
    /// even when the provider wrapped it in context. Everything else is passed
    /// through untouched as [`ResolveError::Upstream`].
    pub(crate) fn from_provider(component: &str, err: anyhow::Error) -> Self {
        match err.downcast_ref::<PaginateError>() {
            Some(PaginateError::DuplicateCall) => ResolveError::DuplicatePaginateCall {
                component: component.to_string(),
            },
            _ => ResolveError::Upstream {
                component: component.to_string(),
                source: err.into(),
            },
        }
    }

    /// Component the error is attributed to, if any
    pub fn component(&self) -> Option<&str> {
        match self {
            ResolveError::DuplicatePaginateCall { component }
            | ResolveError::MissingProvider { component }
            | ResolveError::Upstream { component, .. } => Some(component),
            ResolveError::Route(err) => err.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_duplicate_call_is_recognized() {
        let err = anyhow::Error::from(PaginateError::DuplicateCall);
        let resolved = ResolveError::from_provider("src/pages/blog/[...page].astro", err);
        assert!(matches!(
            resolved,
            ResolveError::DuplicatePaginateCall { ref component } if component == "src/pages/blog/[...page].astro"
        ));
    }

    #[test]
    fn test_duplicate_call_through_context() {
        let result: std::result::Result<(), PaginateError> = Err(PaginateError::DuplicateCall);
        let err = result.context("while paginating posts").unwrap_err();
        assert!(matches!(
            ResolveError::from_provider("a.astro", err),
            ResolveError::DuplicatePaginateCall { .. }
        ));
    }

    #[test]
    fn test_other_errors_are_upstream() {
        let err = anyhow::anyhow!("database unavailable");
        let resolved = ResolveError::from_provider("a.astro", err);
        assert_eq!(resolved.component(), Some("a.astro"));
        match resolved {
            ResolveError::Upstream { source, .. } => {
                assert_eq!(source.to_string(), "database unavailable")
            }
            other => panic!("expected Upstream, got {:?}", other),
        }
    }
}
