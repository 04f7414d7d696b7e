//! The host's response hooks.
//!
//! The gate decides; the host renders. Everything that produces an actual
//! HTTP response goes through [`Responder`].

use std::fmt;

/// Produces responses on behalf of the gate.
///
/// A host typically implements this on a per-request response builder: each
/// call replaces the pending response with a redirect or an error page. The
/// gate ignores whatever the implementation does with the call.
///
/// # Examples
///
/// ```
/// use access_gate::{Denial, DenialKind, Responder};
///
/// #[derive(Default)]
/// struct Reply {
///     location: Option<String>,
/// }
///
/// impl Responder for Reply {
///     fn access_denied(&mut self, denial: &Denial) {
///         let target = match denial.kind() {
///             DenialKind::Unauthenticated => "/account/login",
///             _ => "/security/access_denied",
///         };
///         self.redirect_to(target);
///     }
///
///     fn redirect_to(&mut self, target: &str) {
///         self.location = Some(target.to_string());
///     }
///
///     fn redirect_to_uri(&mut self, uri: &str) {
///         self.location = Some(uri.to_string());
///     }
/// }
/// ```
pub trait Responder {
    /// Produces the denial response, usually a redirect to a login page or a
    /// forbidden page.
    fn access_denied(&mut self, denial: &Denial);

    /// Redirects to a named target such as a route or controller action.
    fn redirect_to(&mut self, target: &str);

    /// Redirects to a literal URI previously captured from a request.
    fn redirect_to_uri(&mut self, uri: &str);
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialKind {
    /// No principal is bound to the session
    Unauthenticated,
    /// A principal is bound but the authorization policy rejected it
    Unauthorized,
    /// Handler code raised the forbidden signal
    Forbidden,
}

impl fmt::Display for DenialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialKind::Unauthenticated => write!(f, "unauthenticated"),
            DenialKind::Unauthorized => write!(f, "unauthorized"),
            DenialKind::Forbidden => write!(f, "forbidden"),
        }
    }
}

/// Details handed to [`Responder::access_denied`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    kind: DenialKind,
    uri: String,
    authenticated: bool,
}

impl Denial {
    pub(crate) fn new(kind: DenialKind, uri: impl Into<String>, authenticated: bool) -> Self {
        Self {
            kind,
            uri: uri.into(),
            authenticated,
        }
    }

    /// The reason for the denial.
    pub fn kind(&self) -> DenialKind {
        self.kind
    }

    /// URI of the denied request.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Whether a principal was bound when the denial happened.
    ///
    /// Hosts use this to choose between "please log in" and "you may not
    /// do that".
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} access to '{}'", self.kind, self.uri)
    }
}

/// Which branch [`ReturnLocationStash::redirect_back_or_default`](crate::ReturnLocationStash::redirect_back_or_default) took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// Went back to the stashed URI, which is now cleared
    Back(String),
    /// Nothing was stashed; went to the default target
    Default(String),
}

impl Redirect {
    /// The location that was redirected to.
    pub fn location(&self) -> &str {
        match self {
            Redirect::Back(uri) => uri,
            Redirect::Default(target) => target,
        }
    }
}
