//! Handler-level filter for the forbidden signal.

use crate::context::RequestContext;
use crate::error::HandlerError;
use crate::gate::AuthorizationGate;
use crate::response::{DenialKind, Responder};
use crate::session::Session;

/// What happened to a request that went through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The handler ran to completion
    Completed(T),
    /// The request was denied, either by the gate or by the handler raising
    /// [`Forbidden`](crate::Forbidden). The responder already holds the
    /// denial response.
    Denied,
}

impl<T> Outcome<T> {
    /// Returns true if the request was denied.
    pub fn is_denied(&self) -> bool {
        matches!(self, Outcome::Denied)
    }

    /// Returns the handler's value, if it completed.
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Denied => None,
        }
    }
}

/// Converts [`Forbidden`](crate::Forbidden) raised by handler code into the
/// gate's denial response.
///
/// Obtained from [`AuthorizationGate::interceptor`]. Hosts that call their
/// handlers themselves wrap each result with [`intercept`](Self::intercept);
/// [`AuthorizationGate::dispatch`] does this automatically.
#[derive(Debug)]
pub struct ErrorInterceptor<'g, P> {
    gate: &'g AuthorizationGate<P>,
}

impl<'g, P> ErrorInterceptor<'g, P> {
    pub(crate) fn new(gate: &'g AuthorizationGate<P>) -> Self {
        Self { gate }
    }

    /// Filters a handler result.
    ///
    /// - `Ok(value)` becomes `Ok(Outcome::Completed(value))`.
    /// - `Err(HandlerError::Forbidden(_))` calls `access_denied` once and
    ///   becomes `Ok(Outcome::Denied)`; the signal goes no further. A
    ///   context the gate already allowed keeps its [`GateState`](crate::GateState).
    /// - `Err(HandlerError::Other(e))` becomes `Err(e)`, untouched.
    ///
    /// # Errors
    ///
    /// Returns the handler's non-forbidden error unchanged.
    pub fn intercept<T, E>(
        &self,
        ctx: &RequestContext<P>,
        session: &dyn Session,
        responder: &mut dyn Responder,
        result: Result<T, HandlerError<E>>,
    ) -> Result<Outcome<T>, E> {
        match result {
            Ok(value) => Ok(Outcome::Completed(value)),
            Err(HandlerError::Forbidden(_)) => {
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    uri = %ctx.request().uri(),
                    "handler raised forbidden"
                );
                self.gate.deny(ctx, session, responder, DenialKind::Forbidden);
                Ok(Outcome::Denied)
            }
            Err(HandlerError::Other(err)) => Err(err),
        }
    }
}
