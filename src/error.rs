use thiserror::Error;

/// The forbidden signal.
///
/// Handler code returns this when it discovers, part-way through, that the
/// current principal must not see the result. The
/// [`ErrorInterceptor`](crate::ErrorInterceptor) turns it into the same
/// denial response the gate produces. It carries no payload.
///
/// # Examples
///
/// ```
/// use access_gate::{Forbidden, HandlerError};
///
/// fn show_invoice(owner: u32, viewer: u32) -> Result<String, HandlerError<std::io::Error>> {
///     if owner != viewer {
///         return Err(Forbidden.into());
///     }
///     Ok(format!("invoice for {owner}"))
/// }
///
/// assert!(show_invoice(1, 2).unwrap_err().is_forbidden());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("access forbidden")]
pub struct Forbidden;

/// Error type for handlers run behind the gate.
///
/// `Forbidden` is intercepted and converted into a denial. Anything else is
/// handed back to the host unchanged.
#[derive(Debug, Error)]
pub enum HandlerError<E> {
    /// The handler requested denial treatment
    #[error(transparent)]
    Forbidden(#[from] Forbidden),
    /// Any other failure, owned by the host's error pipeline
    #[error(transparent)]
    Other(E),
}

impl<E> HandlerError<E> {
    /// Returns true if this is the forbidden signal.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, HandlerError::Forbidden(_))
    }
}
