use crate::context::RequestContext;
use crate::resolver::PrincipalResolver;
use crate::session::Session;

/// Read-only access to the acting principal for template and view code.
///
/// Views can ask who is logged in but cannot log anyone in or out.
///
/// # Examples
///
/// ```
/// use access_gate::{AuthorizationGate, MemorySession, PrincipalResolver, Request, RequestContext, Session};
///
/// let gate = AuthorizationGate::new(PrincipalResolver::new(
///     |id: &str| Some(format!("user #{id}")),
///     |name: &String| name.trim_start_matches("user #").to_string(),
/// ));
/// let mut session = MemorySession::new();
/// session.insert("user_id", "3".to_string());
/// let ctx = RequestContext::new(Request::new("req-1", "/"));
///
/// let view = gate.view(&ctx, &session);
/// assert!(view.is_authenticated());
/// assert_eq!(view.current_principal().map(String::as_str), Some("user #3"));
/// ```
pub struct PrincipalView<'a, P> {
    resolver: &'a PrincipalResolver<P>,
    ctx: &'a RequestContext<P>,
    session: &'a dyn Session,
}

impl<'a, P> PrincipalView<'a, P> {
    pub(crate) fn new(
        resolver: &'a PrincipalResolver<P>,
        ctx: &'a RequestContext<P>,
        session: &'a dyn Session,
    ) -> Self {
        Self {
            resolver,
            ctx,
            session,
        }
    }

    /// Returns true if a principal is bound to this request.
    pub fn is_authenticated(&self) -> bool {
        self.resolver.is_authenticated(self.ctx, self.session)
    }

    /// Returns the acting principal, if any.
    pub fn current_principal(&self) -> Option<&'a P> {
        self.resolver.current_principal(self.ctx, self.session)
    }
}
