//! Per-request gate decision state.

use std::fmt;

/// Where a request stands with respect to the authorization gate.
///
/// Every [`RequestContext`](crate::RequestContext) starts `Unchecked`.
/// The first evaluation of the gate moves it to `Allowed` or `Denied`, and
/// both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    /// The gate has not run for this request yet
    #[default]
    Unchecked,
    /// The gate let the request through
    Allowed,
    /// The gate stopped the request
    Denied,
}

impl GateState {
    /// Returns true once the gate has reached a decision.
    pub fn is_decided(self) -> bool {
        !matches!(self, GateState::Unchecked)
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateState::Unchecked => write!(f, "unchecked"),
            GateState::Allowed => write!(f, "allowed"),
            GateState::Denied => write!(f, "denied"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unchecked() {
        assert_eq!(GateState::default(), GateState::Unchecked);
        assert!(!GateState::default().is_decided());
    }

    #[test]
    fn allowed_and_denied_are_decided() {
        assert!(GateState::Allowed.is_decided());
        assert!(GateState::Denied.is_decided());
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(GateState::Denied.to_string(), "denied");
    }
}
