use crate::audit::{AuditEvent, AuditEventKind, AuditOutcome, AuditSink};
use crate::context::RequestContext;
use crate::error::HandlerError;
use crate::interceptor::{ErrorInterceptor, Outcome};
use crate::policy::Policy;
use crate::request::Request;
use crate::resolver::PrincipalResolver;
use crate::response::{Denial, DenialKind, Redirect, Responder};
use crate::session::{Session, SessionKeys};
use crate::stash::ReturnLocationStash;
use crate::state::GateState;
use crate::view::PrincipalView;

/// The per-request authorization gate.
///
/// One gate is built at startup and shared by every request. For each
/// request the host creates a [`RequestContext`] and calls
/// [`check_authorization`](Self::check_authorization) (or
/// [`dispatch`](Self::dispatch)) before the handler runs.
///
/// # Examples
///
/// ```
/// use access_gate::testing::RecordingResponder;
/// use access_gate::{
///     exempt_actions, AuthorizationGate, GateState, MemorySession, PrincipalResolver, Request,
///     RequestContext, Session,
/// };
///
/// let gate = AuthorizationGate::new(PrincipalResolver::new(
///     |id: &str| id.parse::<u64>().ok(),
///     |id: &u64| id.to_string(),
/// ))
/// .protect(exempt_actions(["login"]));
///
/// let mut session = MemorySession::new();
/// let mut responder = RecordingResponder::new();
///
/// // Anonymous request to a protected page is denied and its URI stashed.
/// let ctx = RequestContext::new(Request::new("req-1", "/orders").with_action("index"));
/// assert!(!gate.check_authorization(&ctx, &mut session, &mut responder));
/// assert_eq!(ctx.gate_state(), GateState::Denied);
/// assert_eq!(session.get("return_to").as_deref(), Some("/orders"));
///
/// // The login page is open.
/// let ctx = RequestContext::new(Request::new("req-2", "/login").with_action("login"));
/// assert!(gate.check_authorization(&ctx, &mut session, &mut responder));
/// ```
#[derive(Debug, Clone)]
pub struct AuthorizationGate<P> {
    resolver: PrincipalResolver<P>,
    stash: ReturnLocationStash,
    policy: Policy<P>,
}

impl<P> AuthorizationGate<P> {
    /// Creates a gate with the default policy: every request is protected,
    /// every authenticated principal is authorized and every denied URI is
    /// stashed.
    pub fn new(resolver: PrincipalResolver<P>) -> Self {
        let stash = ReturnLocationStash::new().session_keys(resolver.keys().clone());
        Self {
            resolver,
            stash,
            policy: Policy::new(),
        }
    }

    /// Replaces the whole policy.
    pub fn policy(mut self, policy: Policy<P>) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the predicate deciding whether a request is protected.
    pub fn protect<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.policy = self.policy.protect(predicate);
        self
    }

    /// Sets the predicate deciding whether the principal may proceed.
    pub fn authorize<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Request, &P) -> bool + Send + Sync + 'static,
    {
        self.policy = self.policy.authorize(predicate);
        self
    }

    /// Sets the predicate deciding whether a denied URI is stashed.
    pub fn store_location<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.policy = self.policy.store_location(predicate);
        self
    }

    /// Overrides the session key names for both the resolver and the stash.
    pub fn session_keys(mut self, keys: SessionKeys) -> Self {
        self.stash = self.stash.session_keys(keys.clone());
        self.resolver = self.resolver.session_keys(keys);
        self
    }

    /// Records logins, logouts and denials in `sink`.
    pub fn audit(mut self, sink: impl AuditSink + 'static) -> Self {
        self.resolver = self.resolver.audit(sink);
        self
    }

    /// Returns the principal resolver.
    pub fn resolver(&self) -> &PrincipalResolver<P> {
        &self.resolver
    }

    /// Returns the return-location stash.
    pub fn stash(&self) -> &ReturnLocationStash {
        &self.stash
    }

    /// Returns true if the request needs an authorized principal.
    pub fn is_protected(&self, ctx: &RequestContext<P>) -> bool {
        self.policy.is_protected(ctx.request())
    }

    /// Returns true if a principal is bound and the policy authorizes it.
    pub fn is_authorized(&self, ctx: &RequestContext<P>, session: &dyn Session) -> bool {
        self.resolver
            .current_principal(ctx, session)
            .is_some_and(|p| self.policy.is_authorized(ctx.request(), p))
    }

    /// Returns true if a denial of this request should stash its URI.
    pub fn should_store_location(&self, ctx: &RequestContext<P>) -> bool {
        self.policy.should_store_location(ctx.request())
    }

    /// See [`PrincipalResolver::is_authenticated`].
    pub fn is_authenticated(&self, ctx: &RequestContext<P>, session: &dyn Session) -> bool {
        self.resolver.is_authenticated(ctx, session)
    }

    /// See [`PrincipalResolver::current_principal`].
    pub fn current_principal<'c>(
        &self,
        ctx: &'c RequestContext<P>,
        session: &dyn Session,
    ) -> Option<&'c P> {
        self.resolver.current_principal(ctx, session)
    }

    /// See [`PrincipalResolver::set_current_principal`].
    pub fn set_current_principal(
        &self,
        ctx: &mut RequestContext<P>,
        session: &mut dyn Session,
        principal: Option<P>,
    ) {
        self.resolver.set_current_principal(ctx, session, principal)
    }

    /// See [`ReturnLocationStash::redirect_back_or_default`].
    pub fn redirect_back_or_default(
        &self,
        session: &mut dyn Session,
        responder: &mut dyn Responder,
        default: &str,
    ) -> Redirect {
        self.stash.redirect_back_or_default(session, responder, default)
    }

    /// Decides whether the request may reach its handler.
    ///
    /// 1. Unprotected requests pass without touching the session.
    /// 2. Authenticated and authorized principals pass.
    /// 3. Anything else is denied: the URI is stashed (unless the policy
    ///    says otherwise), `access_denied` is called once and `false` is
    ///    returned.
    ///
    /// The outcome is recorded as the context's [`GateState`]. A context the
    /// gate has already decided keeps that decision: later calls return it
    /// without consulting the session or the responder again.
    pub fn check_authorization(
        &self,
        ctx: &RequestContext<P>,
        session: &mut dyn Session,
        responder: &mut dyn Responder,
    ) -> bool {
        let request = ctx.request();

        let state = ctx.gate_state();
        if state.is_decided() {
            tracing::debug!(
                request_id = %request.request_id(),
                state = %state,
                "gate already decided"
            );
            return state == GateState::Allowed;
        }

        if !self.policy.is_protected(request) {
            tracing::debug!(
                request_id = %request.request_id(),
                uri = %request.uri(),
                "request not protected"
            );
            ctx.set_gate_state(GateState::Allowed);
            return true;
        }

        let kind = match self.resolver.current_principal(ctx, session) {
            Some(principal) if self.policy.is_authorized(request, principal) => {
                tracing::debug!(
                    request_id = %request.request_id(),
                    uri = %request.uri(),
                    "request authorized"
                );
                ctx.set_gate_state(GateState::Allowed);
                return true;
            }
            Some(_) => DenialKind::Unauthorized,
            None => DenialKind::Unauthenticated,
        };

        if self.policy.should_store_location(request) {
            self.stash.store(session, request.uri());
        }

        self.deny(ctx, session, responder, kind);
        false
    }

    /// Runs the gate and, if it passes, the handler behind the error
    /// interceptor.
    ///
    /// This is the "run before dispatch" registration point: a host routes
    /// every protected handler through it. The handler is not called when
    /// the gate denies.
    ///
    /// # Errors
    ///
    /// Returns the handler's own error unchanged when it is anything other
    /// than [`Forbidden`](crate::Forbidden).
    ///
    /// # Examples
    ///
    /// ```
    /// use access_gate::testing::RecordingResponder;
    /// use access_gate::{
    ///     AuthorizationGate, Forbidden, HandlerError, MemorySession, Outcome, PrincipalResolver,
    ///     Request, RequestContext, Session,
    /// };
    ///
    /// let gate = AuthorizationGate::new(PrincipalResolver::new(
    ///     |id: &str| id.parse::<u64>().ok(),
    ///     |id: &u64| id.to_string(),
    /// ));
    ///
    /// let mut session = MemorySession::new();
    /// session.insert("user_id", "7".to_string());
    /// let mut responder = RecordingResponder::new();
    ///
    /// let mut ctx = RequestContext::new(Request::new("req-1", "/invoices/9"));
    /// let outcome = gate.dispatch(&mut ctx, &mut session, &mut responder, |_, _, _| {
    ///     Err::<(), HandlerError<std::io::Error>>(Forbidden.into())
    /// });
    ///
    /// assert!(matches!(outcome, Ok(Outcome::Denied)));
    /// assert_eq!(responder.denial_count(), 1);
    /// ```
    pub fn dispatch<T, E, F>(
        &self,
        ctx: &mut RequestContext<P>,
        session: &mut dyn Session,
        responder: &mut dyn Responder,
        handler: F,
    ) -> Result<Outcome<T>, E>
    where
        F: FnOnce(
            &mut RequestContext<P>,
            &mut dyn Session,
            &mut dyn Responder,
        ) -> Result<T, HandlerError<E>>,
    {
        if !self.check_authorization(ctx, session, responder) {
            return Ok(Outcome::Denied);
        }

        let result = handler(ctx, session, responder);
        self.interceptor().intercept(ctx, session, responder, result)
    }

    /// Returns the error interceptor bound to this gate.
    pub fn interceptor(&self) -> ErrorInterceptor<'_, P> {
        ErrorInterceptor::new(self)
    }

    /// Returns a read-only view of the principal for template code.
    pub fn view<'a>(
        &'a self,
        ctx: &'a RequestContext<P>,
        session: &'a dyn Session,
    ) -> PrincipalView<'a, P> {
        PrincipalView::new(&self.resolver, ctx, session)
    }

    /// The single denial path shared by the gate and the interceptor.
    pub(crate) fn deny(
        &self,
        ctx: &RequestContext<P>,
        session: &dyn Session,
        responder: &mut dyn Responder,
        kind: DenialKind,
    ) {
        let request = ctx.request();
        let principal_id = self
            .resolver
            .current_principal(ctx, session)
            .map(|p| self.resolver.principal_to_id(p));
        let denial = Denial::new(kind, request.uri(), principal_id.is_some());

        tracing::info!(
            request_id = %request.request_id(),
            uri = %request.uri(),
            reason = %kind,
            "access denied"
        );

        if let Some(sink) = self.resolver.audit_sink() {
            sink.record(
                AuditEvent::new(
                    request.request_id(),
                    principal_id,
                    AuditEventKind::AccessDenied,
                    AuditOutcome::Denied,
                )
                .with_uri(request.uri())
                .with_reason(kind),
            );
        }

        ctx.set_gate_state(GateState::Denied);
        responder.access_denied(&denial);
    }
}
