//! Redirect handling
//!
//! Whether and how far a request follows redirects is resolved like any other
//! tunable; the result is a [`Policy`] built per request.

mod attempt;
mod headers;
mod policy;

pub use attempt::{Action, Attempt, TooManyRedirects};
pub use policy::{Policy, RedirectController, custom};
