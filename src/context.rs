use std::cell::{Cell, OnceCell};

use crate::request::Request;
use crate::state::GateState;

/// Per-request state: the request metadata, the memoized principal and the
/// gate's decision.
///
/// A `RequestContext` is created empty when a request arrives and dropped
/// when the response is sent. It is deliberately `!Sync`: the memo is a plain
/// `OnceCell` and must never be shared between requests or threads.
///
/// The principal slot has three observable states:
/// - not resolved yet (no lookup has happened)
/// - resolved to `None` (the session named an id the lookup could not find,
///   or the principal was explicitly cleared)
/// - resolved to `Some(principal)`
///
/// # Examples
///
/// ```
/// use access_gate::{GateState, Request, RequestContext};
///
/// let ctx: RequestContext<String> = RequestContext::new(Request::new("req-1", "/orders"));
///
/// assert_eq!(ctx.request().uri(), "/orders");
/// assert_eq!(ctx.gate_state(), GateState::Unchecked);
/// assert!(!ctx.is_principal_resolved());
/// ```
#[derive(Debug)]
pub struct RequestContext<P> {
    request: Request,
    principal: OnceCell<Option<P>>,
    gate_state: Cell<GateState>,
}

impl<P> RequestContext<P> {
    /// Creates a fresh context for `request` with nothing resolved.
    pub fn new(request: Request) -> Self {
        Self {
            request,
            principal: OnceCell::new(),
            gate_state: Cell::new(GateState::Unchecked),
        }
    }

    /// Returns the request this context belongs to.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Returns the request ID for this context.
    pub fn request_id(&self) -> &str {
        self.request.request_id()
    }

    /// Returns the gate's decision for this request.
    ///
    /// The first decision is final: once the state leaves
    /// [`GateState::Unchecked`] it never changes.
    pub fn gate_state(&self) -> GateState {
        self.gate_state.get()
    }

    /// Returns true once the principal slot has been filled, even if it was
    /// filled with `None`.
    pub fn is_principal_resolved(&self) -> bool {
        self.principal.get().is_some()
    }

    /// Forgets the memoized principal without touching the session.
    ///
    /// The next resolution reads the session again. Test suites use this to
    /// simulate a logged-out request after a login performed earlier in the
    /// same test.
    pub fn reset_principal(&mut self) {
        self.principal = OnceCell::new();
    }

    pub(crate) fn memo(&self) -> &OnceCell<Option<P>> {
        &self.principal
    }

    pub(crate) fn replace_memo(&mut self, principal: Option<P>) {
        self.principal = OnceCell::from(principal);
    }

    pub(crate) fn set_gate_state(&self, state: GateState) {
        if !self.gate_state.get().is_decided() {
            self.gate_state.set(state);
        }
    }
}
