//! Per-request authorization gate.
//!
//! This crate decides, before any handler logic runs, whether a request may
//! proceed. It provides:
//! - **Principal resolution**: the acting principal is looked up from the
//!   session once per request and memoized
//! - **The gate**: configurable `protect` / `authorize` / `store_location`
//!   predicates and a single denial path
//! - **Return locations**: a denied URI is stashed so the client can be sent
//!   back after logging in
//! - **Forbidden interception**: handlers raise [`Forbidden`] mid-way and get
//!   the same denial treatment as the gate
//!
//! Routing, session transport, user storage and page rendering stay with the
//! host: it implements [`Session`], [`Responder`] and a [`PrincipalLookup`].
//!
//! # Core Types
//!
//! - [`AuthorizationGate`]: the decision procedure, built once and shared
//! - [`PrincipalResolver`]: memoizing principal lookup
//! - [`ReturnLocationStash`]: single-slot "return to" memory
//! - [`RequestContext`]: per-request memo and gate state
//! - [`ErrorInterceptor`]: converts [`Forbidden`] into a denial
//!
//! # Examples
//!
//! ```
//! use access_gate::testing::RecordingResponder;
//! use access_gate::{
//!     exempt_actions, AuthorizationGate, MemorySession, PrincipalResolver, Redirect, Request,
//!     RequestContext, Session,
//! };
//!
//! #[derive(Debug, Clone)]
//! struct User {
//!     id: u64,
//! }
//!
//! let gate = AuthorizationGate::new(PrincipalResolver::new(
//!     |id: &str| id.parse::<u64>().ok().map(|id| User { id }),
//!     |user: &User| user.id.to_string(),
//! ))
//! .protect(exempt_actions(["login"]));
//!
//! let mut session = MemorySession::new();
//! let mut responder = RecordingResponder::new();
//!
//! // 1. Anonymous visit to /orders is denied and remembered.
//! let ctx = RequestContext::new(Request::new("req-1", "/orders"));
//! assert!(!gate.check_authorization(&ctx, &mut session, &mut responder));
//!
//! // 2. The login action binds the principal and sends the client back.
//! let mut ctx = RequestContext::new(Request::new("req-2", "/login").with_action("login"));
//! assert!(gate.check_authorization(&ctx, &mut session, &mut responder));
//! gate.set_current_principal(&mut ctx, &mut session, Some(User { id: 42 }));
//! let redirect = gate.redirect_back_or_default(&mut session, &mut responder, "/home");
//! assert_eq!(redirect, Redirect::Back("/orders".to_string()));
//!
//! // 3. The next visit to /orders passes.
//! let ctx = RequestContext::new(Request::new("req-3", "/orders"));
//! assert!(gate.check_authorization(&ctx, &mut session, &mut responder));
//! assert_eq!(session.get("user_id").as_deref(), Some("42"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
mod context;
mod error;
mod gate;
mod interceptor;
mod policy;
mod request;
mod resolver;
mod response;
mod session;
mod stash;
mod state;
pub mod testing;
mod view;

pub use context::RequestContext;
pub use error::{Forbidden, HandlerError};
pub use gate::AuthorizationGate;
pub use interceptor::{ErrorInterceptor, Outcome};
pub use policy::{exempt_actions, Policy};
pub use request::Request;
pub use resolver::{PrincipalLookup, PrincipalResolver};
pub use response::{Denial, DenialKind, Redirect, Responder};
pub use session::{MemorySession, Session, SessionKeys, DEFAULT_RETURN_TO_KEY, DEFAULT_USER_ID_KEY};
pub use stash::ReturnLocationStash;
pub use state::GateState;
pub use view::PrincipalView;
