use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::request::Request;

type RequestPredicate = Arc<dyn Fn(&Request) -> bool + Send + Sync>;
type PrincipalPredicate<P> = Arc<dyn Fn(&Request, &P) -> bool + Send + Sync>;

/// The deployment-specific predicates the gate consults.
///
/// Each predicate defaults to `true`:
/// - `protect`: does this request need a principal at all?
/// - `authorize`: may this principal perform this request?
/// - `store_location`: should a denial remember the URI for later?
///
/// # Examples
///
/// ```
/// use access_gate::{exempt_actions, Policy, Request};
///
/// struct User { admin: bool }
///
/// let policy = Policy::new()
///     .protect(exempt_actions(["login", "about"]))
///     .authorize(|_req: &Request, user: &User| user.admin)
///     .store_location(|req: &Request| !req.uri().starts_with("/api/"));
///
/// let login = Request::new("req-1", "/login").with_action("login");
/// assert!(!policy.is_protected(&login));
///
/// let api = Request::new("req-2", "/api/orders").with_action("index");
/// assert!(policy.is_protected(&api));
/// assert!(!policy.should_store_location(&api));
/// assert!(!policy.is_authorized(&api, &User { admin: false }));
/// ```
pub struct Policy<P> {
    protect: Option<RequestPredicate>,
    authorize: Option<PrincipalPredicate<P>>,
    store_location: Option<RequestPredicate>,
}

impl<P> Policy<P> {
    /// Creates a policy that protects everything, authorizes every
    /// authenticated principal and stashes every denied URI.
    pub fn new() -> Self {
        Self {
            protect: None,
            authorize: None,
            store_location: None,
        }
    }

    /// Sets the predicate deciding whether a request is protected.
    pub fn protect<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.protect = Some(Arc::new(predicate));
        self
    }

    /// Sets the predicate deciding whether the principal may proceed.
    pub fn authorize<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Request, &P) -> bool + Send + Sync + 'static,
    {
        self.authorize = Some(Arc::new(predicate));
        self
    }

    /// Sets the predicate deciding whether a denied URI is stashed.
    pub fn store_location<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.store_location = Some(Arc::new(predicate));
        self
    }

    /// Returns true if the request needs an authorized principal.
    pub fn is_protected(&self, request: &Request) -> bool {
        self.protect.as_ref().is_none_or(|f| f(request))
    }

    /// Returns true if `principal` may perform `request`.
    pub fn is_authorized(&self, request: &Request, principal: &P) -> bool {
        self.authorize.as_ref().is_none_or(|f| f(request, principal))
    }

    /// Returns true if a denial of `request` should stash its URI.
    pub fn should_store_location(&self, request: &Request) -> bool {
        self.store_location.as_ref().is_none_or(|f| f(request))
    }
}

/// Builds a `protect` predicate that leaves the named actions open.
///
/// Requests without an action name stay protected.
///
/// # Examples
///
/// ```
/// use access_gate::{exempt_actions, Request};
///
/// let protect = exempt_actions(["login"]);
/// assert!(!protect(&Request::new("req-1", "/login").with_action("login")));
/// assert!(protect(&Request::new("req-2", "/orders").with_action("index")));
/// ```
pub fn exempt_actions<I, S>(actions: I) -> impl Fn(&Request) -> bool + Send + Sync + 'static
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let open: HashSet<String> = actions.into_iter().map(Into::into).collect();
    move |request: &Request| request.action().is_none_or(|action| !open.contains(action))
}

impl<P> Default for Policy<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for Policy<P> {
    fn clone(&self) -> Self {
        Self {
            protect: self.protect.clone(),
            authorize: self.authorize.clone(),
            store_location: self.store_location.clone(),
        }
    }
}

impl<P> fmt::Debug for Policy<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("protect", &self.protect.is_some())
            .field("authorize", &self.authorize.is_some())
            .field("store_location", &self.store_location.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(action: Option<&str>) -> Request {
        let request = Request::new("req-pol", "/x");
        match action {
            Some(a) => request.with_action(a),
            None => request,
        }
    }

    #[test]
    fn defaults_are_permissive_and_protective() {
        let policy: Policy<u32> = Policy::new();
        let request = req(None);

        assert!(policy.is_protected(&request));
        assert!(policy.is_authorized(&request, &1));
        assert!(policy.should_store_location(&request));
    }

    #[test]
    fn exempt_actions_opens_only_named_actions() {
        let protect = exempt_actions(["login", "about"]);

        assert!(!protect(&req(Some("login"))));
        assert!(!protect(&req(Some("about"))));
        assert!(protect(&req(Some("orders"))));
        assert!(protect(&req(None)));
    }

    #[test]
    fn authorize_sees_principal() {
        let policy: Policy<u32> = Policy::new().authorize(|_: &Request, id: &u32| *id == 1);

        assert!(policy.is_authorized(&req(None), &1));
        assert!(!policy.is_authorized(&req(None), &2));
    }

    #[test]
    fn debug_reports_which_predicates_are_set() {
        let policy: Policy<u32> = Policy::new().protect(|_: &Request| false);
        let out = format!("{:?}", policy);
        assert!(out.contains("protect: true"));
        assert!(out.contains("authorize: false"));
    }
}
