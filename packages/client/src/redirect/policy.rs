//! Per-request redirect policy

use std::fmt;
use std::sync::Arc;

use http::{HeaderMap, StatusCode};

use super::attempt::{Action, Attempt, TooManyRedirects};
use super::headers::{remove_sensitive_headers, set_referer};
use crate::Url;
use crate::config::defaults::ConfigDefaults;
use crate::config::value::{Shared, SharedRedirectController};

/// Decides whether a redirect hop is followed.
///
/// Installed through the `RedirectController` tunable; only consulted once
/// following is enabled and the chain is below its limit.
pub trait RedirectController: fmt::Debug + Send + Sync + 'static {
    fn redirect(&self, attempt: Attempt<'_>) -> Action;
}

struct FnController<F>(F);

impl<F> fmt::Debug for FnController<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnController")
    }
}

impl<F> RedirectController for FnController<F>
where
    F: Fn(Attempt<'_>) -> Action + Send + Sync + 'static,
{
    fn redirect(&self, attempt: Attempt<'_>) -> Action {
        (self.0)(attempt)
    }
}

/// Wrap a closure as a shareable redirect controller
pub fn custom<F>(f: F) -> SharedRedirectController
where
    F: Fn(Attempt<'_>) -> Action + Send + Sync + 'static,
{
    let controller: Arc<dyn RedirectController> = Arc::new(FnController(f));
    Shared::new(controller)
}

/// The resolved redirect behaviour for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    follow: bool,
    max: u32,
    controller: Option<SharedRedirectController>,
}

impl Default for Policy {
    fn default() -> Self {
        Self::new(
            ConfigDefaults::FOLLOW_REDIRECTS,
            ConfigDefaults::MAX_REDIRECTS,
            None,
        )
    }
}

impl Policy {
    pub fn new(follow: bool, max: u32, controller: Option<SharedRedirectController>) -> Self {
        Self {
            follow,
            max,
            controller,
        }
    }

    pub fn follow_redirects(&self) -> bool {
        self.follow
    }

    pub fn max_redirects(&self) -> u32 {
        self.max
    }

    pub fn controller(&self) -> Option<&SharedRedirectController> {
        self.controller.as_ref()
    }

    /// Decide the fate of a redirect to `next` after `previous` hops
    pub fn check(&self, status: StatusCode, next: &Url, previous: &[Url]) -> Action {
        let attempt = Attempt::new(status, next, previous);
        if !self.follow {
            return attempt.stop();
        }
        if previous.len() >= self.max as usize {
            return attempt.error(TooManyRedirects);
        }
        match &self.controller {
            Some(controller) => controller.redirect(attempt),
            None => attempt.follow(),
        }
    }

    /// Adjust the outgoing headers for a followed hop
    pub fn prepare_headers(&self, headers: &mut HeaderMap, next: &Url, previous: &[Url]) {
        remove_sensitive_headers(headers, next, previous);
        set_referer(headers, next, previous);
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;
    use http::header::{AUTHORIZATION, COOKIE, REFERER};

    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("test url")
    }

    #[test]
    fn test_disabled_policy_stops() {
        let policy = Policy::new(false, 5, None);
        let action = policy.check(StatusCode::FOUND, &url("http://a/next"), &[]);
        assert!(action.is_stop());
    }

    #[test]
    fn test_limit_reached_is_error() {
        let policy = Policy::new(true, 2, None);
        let chain = [url("http://a/1"), url("http://a/2")];
        let action = policy.check(StatusCode::FOUND, &url("http://a/3"), &chain);
        let err = action.error().expect("limit must fail the chain");
        assert_eq!(err.to_string(), "too many redirects");
    }

    #[test]
    fn test_default_follows() {
        let action = Policy::default().check(StatusCode::MOVED_PERMANENTLY, &url("http://a/"), &[]);
        assert!(action.is_follow());
    }

    #[test]
    fn test_controller_decides() {
        let controller = custom(|attempt| {
            if attempt.url().host_str() == Some("blocked.example") {
                attempt.stop()
            } else {
                attempt.follow()
            }
        });
        let policy = Policy::new(true, 5, Some(controller));
        let prev = [url("http://a/")];
        assert!(policy.check(StatusCode::FOUND, &url("http://blocked.example/"), &prev).is_stop());
        assert!(policy.check(StatusCode::FOUND, &url("http://ok.example/"), &prev).is_follow());
    }

    #[test]
    fn test_cross_host_strips_credentials() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer x"));
        headers.insert(COOKIE, HeaderValue::from_static("a=b"));

        let prev = [url("https://user:pw@a.example/start#frag")];
        Policy::default().prepare_headers(&mut headers, &url("https://b.example/"), &prev);

        assert!(!headers.contains_key(AUTHORIZATION));
        assert!(!headers.contains_key(COOKIE));
        assert_eq!(headers[REFERER], "https://a.example/start");
    }

    #[test]
    fn test_same_host_keeps_credentials() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer x"));
        let prev = [url("https://a.example/one")];
        Policy::default().prepare_headers(&mut headers, &url("https://a.example/two"), &prev);
        assert!(headers.contains_key(AUTHORIZATION));
    }

    #[test]
    fn test_downgrade_has_no_referer() {
        let mut headers = HeaderMap::new();
        let prev = [url("https://a.example/")];
        Policy::default().prepare_headers(&mut headers, &url("http://a.example/"), &prev);
        assert!(!headers.contains_key(REFERER));
    }
}
