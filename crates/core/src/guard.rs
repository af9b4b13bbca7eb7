//! Route access decisions.
//!
//! The guard is a plain function evaluated once per navigation. It never
//! looks at token expiry: a user being present in the session is the whole
//! authentication predicate.

use url::form_urlencoded;

/// Path of the sign-in page.
pub const SIGN_IN_PATH: &str = "/sign-in";

/// Default landing page after sign-in.
pub const HOME_PATH: &str = "/";

/// Query parameter carrying the post-login return location.
pub const REDIRECT_PARAM: &str = "redirect";

/// Who may see a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Requires an authenticated user.
    Protected,
    /// Only for anonymous users (sign-in).
    PublicOnly,
    /// Anyone.
    Public,
}

/// Result of evaluating the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Render the route.
    Proceed,
    /// Send to sign-in, returning to `redirect` afterwards.
    RedirectToSignIn { redirect: String },
    /// Leave a public-only page.
    RedirectAway { to: String },
}

impl GuardOutcome {
    /// Target location for redirects, `None` for [`GuardOutcome::Proceed`].
    #[must_use]
    pub fn location(&self) -> Option<String> {
        match self {
            Self::Proceed => None,
            Self::RedirectToSignIn { redirect } => Some(sign_in_location(Some(redirect))),
            Self::RedirectAway { to } => Some(to.clone()),
        }
    }
}

/// Decide what to do with a navigation to `location` (path and query).
///
/// `redirect_to` is the caller-supplied target for leaving public-only
/// pages; unsafe targets fall back to [`HOME_PATH`].
#[must_use]
pub fn evaluate(
    access: RouteAccess,
    is_authenticated: bool,
    location: &str,
    redirect_to: Option<&str>,
) -> GuardOutcome {
    match (access, is_authenticated) {
        (RouteAccess::Protected, false) => GuardOutcome::RedirectToSignIn {
            redirect: location.to_string(),
        },
        (RouteAccess::PublicOnly, true) => GuardOutcome::RedirectAway {
            to: redirect_to
                .and_then(sanitize_redirect)
                .unwrap_or(HOME_PATH)
                .to_string(),
        },
        _ => GuardOutcome::Proceed,
    }
}

/// Accept only same-origin absolute paths.
#[must_use]
pub fn sanitize_redirect(target: &str) -> Option<&str> {
    let valid = target.starts_with('/')
        && !target.starts_with("//")
        && !target.starts_with("/\\")
        && !target.chars().any(char::is_control);
    valid.then_some(target)
}

/// The sign-in URL, optionally carrying a return location.
#[must_use]
pub fn sign_in_location(redirect: Option<&str>) -> String {
    match redirect.and_then(sanitize_redirect) {
        Some(target) if target != HOME_PATH && !target.starts_with(SIGN_IN_PATH) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair(REDIRECT_PARAM, target)
                .finish();
            format!("{SIGN_IN_PATH}?{query}")
        }
        _ => SIGN_IN_PATH.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_on_protected_route_goes_to_sign_in_with_redirect() {
        let outcome = evaluate(RouteAccess::Protected, false, "/branches?page=2", None);
        assert_eq!(
            outcome,
            GuardOutcome::RedirectToSignIn {
                redirect: "/branches?page=2".to_string()
            }
        );
        assert_eq!(
            outcome.location().as_deref(),
            Some("/sign-in?redirect=%2Fbranches%3Fpage%3D2")
        );
    }

    #[test]
    fn test_authenticated_on_sign_in_goes_home() {
        let outcome = evaluate(RouteAccess::PublicOnly, true, "/sign-in", None);
        assert_eq!(outcome, GuardOutcome::RedirectAway { to: "/".to_string() });
    }

    #[test]
    fn test_authenticated_on_sign_in_uses_supplied_target() {
        let outcome = evaluate(RouteAccess::PublicOnly, true, "/sign-in", Some("/fleet-types"));
        assert_eq!(outcome.location().as_deref(), Some("/fleet-types"));
    }

    #[test]
    fn test_open_redirects_are_rejected() {
        for target in ["https://evil.test", "//evil.test", "/\\evil.test", "evil", "/a\nb"] {
            let outcome = evaluate(RouteAccess::PublicOnly, true, "/sign-in", Some(target));
            assert_eq!(outcome.location().as_deref(), Some("/"), "{target}");
        }
    }

    #[test]
    fn test_proceed_cases() {
        assert_eq!(evaluate(RouteAccess::Protected, true, "/", None), GuardOutcome::Proceed);
        assert_eq!(evaluate(RouteAccess::PublicOnly, false, "/sign-in", None), GuardOutcome::Proceed);
        assert_eq!(evaluate(RouteAccess::Public, false, "/health", None), GuardOutcome::Proceed);
        assert_eq!(evaluate(RouteAccess::Public, true, "/health", None), GuardOutcome::Proceed);
        assert_eq!(GuardOutcome::Proceed.location(), None);
    }

    #[test]
    fn test_sign_in_location_skips_trivial_redirects() {
        assert_eq!(sign_in_location(None), "/sign-in");
        assert_eq!(sign_in_location(Some("/")), "/sign-in");
        assert_eq!(sign_in_location(Some("/sign-in?redirect=%2F")), "/sign-in");
    }
}
