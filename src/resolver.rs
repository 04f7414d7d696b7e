//! Principal resolution with per-request memoization.

use std::fmt;
use std::sync::Arc;

use crate::audit::{AuditEvent, AuditEventKind, AuditOutcome, AuditSink};
use crate::context::RequestContext;
use crate::request::Request;
use crate::session::{Session, SessionKeys};

/// Looks a principal up by the identifier stored in the session.
///
/// Returning `None` is normal: the account may have been deleted or disabled
/// since the session was created. Any `Fn(&str) -> Option<P>` closure is a
/// lookup.
pub trait PrincipalLookup<P>: Send + Sync {
    /// Resolves `id` into a principal.
    fn resolve_by_id(&self, id: &str) -> Option<P>;
}

impl<P, F> PrincipalLookup<P> for F
where
    F: Fn(&str) -> Option<P> + Send + Sync,
{
    fn resolve_by_id(&self, id: &str) -> Option<P> {
        self(id)
    }
}

type ToId<P> = Arc<dyn Fn(&P) -> String + Send + Sync>;
type PrincipalHook<P> = Arc<dyn Fn(&Request, Option<&P>) + Send + Sync>;

/// Resolves and memoizes the acting principal for one request.
///
/// The resolver itself is shared by every request; the memo lives in the
/// [`RequestContext`]. Within one request the lookup runs at most once no
/// matter how often [`current_principal`](Self::current_principal) is called.
///
/// # Examples
///
/// ```
/// use access_gate::{MemorySession, PrincipalResolver, Request, RequestContext, Session};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct User { id: u64, name: String }
///
/// let resolver = PrincipalResolver::new(
///     |id: &str| (id == "42").then(|| User { id: 42, name: "Ada".into() }),
///     |user: &User| user.id.to_string(),
/// );
///
/// let mut session = MemorySession::new();
/// session.insert("user_id", "42".to_string());
///
/// let ctx = RequestContext::new(Request::new("req-1", "/"));
/// assert_eq!(resolver.current_principal(&ctx, &session).map(|u| u.name.as_str()), Some("Ada"));
/// ```
pub struct PrincipalResolver<P> {
    lookup: Arc<dyn PrincipalLookup<P>>,
    to_id: ToId<P>,
    on_principal_set: Option<PrincipalHook<P>>,
    audit: Option<Arc<dyn AuditSink>>,
    keys: SessionKeys,
}

impl<P> PrincipalResolver<P> {
    /// Creates a resolver from a lookup and the function that turns a
    /// principal back into the identifier stored in the session.
    pub fn new<L, F>(lookup: L, to_id: F) -> Self
    where
        L: PrincipalLookup<P> + 'static,
        F: Fn(&P) -> String + Send + Sync + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
            to_id: Arc::new(to_id),
            on_principal_set: None,
            audit: None,
            keys: SessionKeys::default(),
        }
    }

    /// Registers a hook run after every [`set_current_principal`](Self::set_current_principal).
    ///
    /// Typical uses are audit logging of logins and logouts. The hook sees
    /// the new principal, or `None` on logout.
    pub fn on_principal_set<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Request, Option<&P>) + Send + Sync + 'static,
    {
        self.on_principal_set = Some(Arc::new(hook));
        self
    }

    /// Records a login or logout event in `sink` on every
    /// [`set_current_principal`](Self::set_current_principal).
    pub fn audit(mut self, sink: impl AuditSink + 'static) -> Self {
        self.audit = Some(Arc::new(sink));
        self
    }

    pub(crate) fn audit_sink(&self) -> Option<&Arc<dyn AuditSink>> {
        self.audit.as_ref()
    }

    /// Overrides the session key names.
    pub fn session_keys(mut self, keys: SessionKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Returns the session key names in use.
    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    /// Returns true if a principal is bound to this request.
    pub fn is_authenticated(&self, ctx: &RequestContext<P>, session: &dyn Session) -> bool {
        self.current_principal(ctx, session).is_some()
    }

    /// Returns the acting principal, resolving it from the session on first
    /// use.
    ///
    /// When the session holds no identifier nothing is memoized, so a later
    /// call still notices an identifier written by the host.
    pub fn current_principal<'c>(
        &self,
        ctx: &'c RequestContext<P>,
        session: &dyn Session,
    ) -> Option<&'c P> {
        if let Some(memo) = ctx.memo().get() {
            return memo.as_ref();
        }

        let id = session.get(self.keys.user_id())?;
        ctx.memo()
            .get_or_init(|| {
                let principal = self.lookup.resolve_by_id(&id);
                if principal.is_none() {
                    tracing::debug!(
                        request_id = %ctx.request_id(),
                        user_id = %id,
                        "session names a principal that no longer resolves"
                    );
                }
                principal
            })
            .as_ref()
    }

    /// Binds `principal` to the session and to this request.
    ///
    /// `None` logs the principal out: the identifier is removed from the
    /// session. The memo is overwritten directly, bypassing the lookup.
    pub fn set_current_principal(
        &self,
        ctx: &mut RequestContext<P>,
        session: &mut dyn Session,
        principal: Option<P>,
    ) {
        let event = match &principal {
            Some(p) => {
                let id = (self.to_id)(p);
                tracing::debug!(request_id = %ctx.request_id(), user_id = %id, "principal bound");
                session.insert(self.keys.user_id(), id.clone());
                AuditEvent::new(
                    ctx.request_id(),
                    Some(id),
                    AuditEventKind::Login,
                    AuditOutcome::Success,
                )
            }
            None => {
                tracing::debug!(request_id = %ctx.request_id(), "principal cleared");
                let previous = session.remove(self.keys.user_id());
                AuditEvent::new(
                    ctx.request_id(),
                    previous,
                    AuditEventKind::Logout,
                    AuditOutcome::Success,
                )
            }
        };

        if let Some(sink) = &self.audit {
            sink.record(event.with_uri(ctx.request().uri()));
        }

        ctx.replace_memo(principal);

        if let Some(hook) = &self.on_principal_set {
            let current = ctx.memo().get().and_then(Option::as_ref);
            hook(ctx.request(), current);
        }
    }

    /// Converts a principal into its session identifier.
    pub fn principal_to_id(&self, principal: &P) -> String {
        (self.to_id)(principal)
    }
}

impl<P> Clone for PrincipalResolver<P> {
    fn clone(&self) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
            to_id: Arc::clone(&self.to_id),
            on_principal_set: self.on_principal_set.clone(),
            audit: self.audit.clone(),
            keys: self.keys.clone(),
        }
    }
}

impl<P> fmt::Debug for PrincipalResolver<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrincipalResolver")
            .field("keys", &self.keys)
            .field("on_principal_set", &self.on_principal_set.is_some())
            .field("audit", &self.audit.is_some())
            .finish_non_exhaustive()
    }
}
