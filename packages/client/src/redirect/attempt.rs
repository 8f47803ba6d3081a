//! Attempt and Action types for redirect handling

use std::error::Error as StdError;
use std::fmt;

use http::StatusCode;

use crate::Url;

/// The next hop of a redirect chain and every URL requested before it
#[derive(Debug)]
pub struct Attempt<'a> {
    pub(crate) status: StatusCode,
    pub(crate) next: &'a Url,
    pub(crate) previous: &'a [Url],
}

/// What to do with a redirect response
#[derive(Debug)]
pub struct Action {
    pub(crate) inner: ActionKind,
}

#[derive(Debug)]
pub(crate) enum ActionKind {
    Follow,
    Stop,
    Error(Box<dyn StdError + Send + Sync>),
}

impl<'a> Attempt<'a> {
    pub fn new(status: StatusCode, next: &'a Url, previous: &'a [Url]) -> Self {
        Self {
            status,
            next,
            previous,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The URL the response points at
    pub fn url(&self) -> &Url {
        self.next
    }

    /// URLs already requested in this chain, oldest first
    pub fn previous(&self) -> &[Url] {
        self.previous
    }

    pub fn follow(self) -> Action {
        Action {
            inner: ActionKind::Follow,
        }
    }

    /// Hand the redirect response itself back to the caller
    pub fn stop(self) -> Action {
        Action {
            inner: ActionKind::Stop,
        }
    }

    pub fn error<E: Into<Box<dyn StdError + Send + Sync>>>(self, error: E) -> Action {
        Action {
            inner: ActionKind::Error(error.into()),
        }
    }
}

impl Action {
    pub fn is_follow(&self) -> bool {
        matches!(self.inner, ActionKind::Follow)
    }

    pub fn is_stop(&self) -> bool {
        matches!(self.inner, ActionKind::Stop)
    }

    /// The failure, if the chain should end with an error
    pub fn error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match &self.inner {
            ActionKind::Error(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    /// Consume the action, turning an error outcome into `Err`
    pub fn into_result(self) -> Result<bool, Box<dyn StdError + Send + Sync>> {
        match self.inner {
            ActionKind::Follow => Ok(true),
            ActionKind::Stop => Ok(false),
            ActionKind::Error(e) => Err(e),
        }
    }
}

/// The chain reached its configured maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooManyRedirects;

impl fmt::Display for TooManyRedirects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("too many redirects")
    }
}

impl StdError for TooManyRedirects {}
