//! Integration tests for the full request flow.
//!
//! These tests play the host's part: they build one gate, then run a
//! sequence of requests against a single client session the way a web
//! application would.

use std::sync::Arc;

use access_gate::audit::{AuditEventKind, AuditTrail};
use access_gate::testing::RecordingResponder;
use access_gate::{
    exempt_actions, AuthorizationGate, DenialKind, Forbidden, GateState, HandlerError,
    MemorySession, Outcome, PrincipalResolver, Redirect, Request, RequestContext, Session,
};

#[derive(Debug, Clone, PartialEq)]
struct User {
    id: u64,
    name: String,
    admin: bool,
}

fn find_active_user(id: &str) -> Option<User> {
    match id {
        "42" => Some(User {
            id: 42,
            name: "Ada".to_string(),
            admin: false,
        }),
        "7" => Some(User {
            id: 7,
            name: "Grace".to_string(),
            admin: true,
        }),
        _ => None,
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn gate() -> AuthorizationGate<User> {
    AuthorizationGate::new(PrincipalResolver::new(find_active_user, |u: &User| {
        u.id.to_string()
    }))
    .protect(exempt_actions(["login", "about"]))
    .authorize(|req: &Request, user: &User| {
        !req.uri().starts_with("/admin") || user.admin
    })
}

fn request(id: &str, uri: &str, action: &str) -> RequestContext<User> {
    RequestContext::new(Request::new(id, uri).with_action(action))
}

#[test]
fn login_round_trip_returns_to_stashed_location() {
    init_tracing();
    let gate = gate();
    let mut session = MemorySession::new();
    let mut responder = RecordingResponder::new();

    // Anonymous visit.
    let ctx = request("req-1", "/orders", "index");
    assert!(!gate.is_authenticated(&ctx, &session));
    assert!(!gate.check_authorization(&ctx, &mut session, &mut responder));
    assert_eq!(session.get("return_to").as_deref(), Some("/orders"));
    assert_eq!(responder.denial_count(), 1);

    // Login.
    let mut ctx = request("req-2", "/login", "login");
    assert!(gate.check_authorization(&ctx, &mut session, &mut responder));
    gate.set_current_principal(&mut ctx, &mut session, find_active_user("42"));
    assert_eq!(session.get("user_id").as_deref(), Some("42"));

    // Back to where the client was going.
    let ctx = request("req-3", "/orders", "index");
    assert!(gate.check_authorization(&ctx, &mut session, &mut responder));
    assert_eq!(ctx.gate_state(), GateState::Allowed);

    let redirect = gate.redirect_back_or_default(&mut session, &mut responder, "/home");
    assert_eq!(redirect, Redirect::Back("/orders".to_string()));
    assert!(session.get("return_to").is_none());
    assert_eq!(responder.redirects(), vec!["uri:/orders"]);
}

#[test]
fn login_without_prior_denial_goes_to_default() {
    let gate = gate();
    let mut session = MemorySession::new();
    let mut responder = RecordingResponder::new();

    let mut ctx = request("req-1", "/login", "login");
    gate.set_current_principal(&mut ctx, &mut session, find_active_user("7"));
    let redirect = gate.redirect_back_or_default(&mut session, &mut responder, "/home");

    assert_eq!(redirect, Redirect::Default("/home".to_string()));
    assert_eq!(responder.redirects(), vec!["to:/home"]);
}

#[test]
fn logout_ends_access() {
    let gate = gate();
    let mut session = MemorySession::new();
    session.insert("user_id", "42".to_string());
    let mut responder = RecordingResponder::new();

    let mut ctx = request("req-1", "/logout", "logout");
    assert!(gate.check_authorization(&ctx, &mut session, &mut responder));
    gate.set_current_principal(&mut ctx, &mut session, None);
    assert!(!gate.is_authenticated(&ctx, &session));
    assert!(session.get("user_id").is_none());

    let ctx = request("req-2", "/orders", "index");
    assert!(!gate.check_authorization(&ctx, &mut session, &mut responder));
}

#[test]
fn non_admin_is_denied_admin_area_but_stays_logged_in() {
    let gate = gate();
    let mut session = MemorySession::new();
    session.insert("user_id", "42".to_string());
    let mut responder = RecordingResponder::new();

    let ctx = request("req-1", "/admin/users", "index");
    assert!(!gate.check_authorization(&ctx, &mut session, &mut responder));

    let denial = responder.last_denial().expect("denied");
    assert_eq!(denial.kind(), DenialKind::Unauthorized);
    assert!(denial.is_authenticated());
    assert_eq!(session.get("user_id").as_deref(), Some("42"));
}

#[test]
fn dispatch_runs_handler_only_when_allowed() {
    let gate = gate();
    let mut responder = RecordingResponder::new();
    let mut calls = 0;

    let mut anonymous = MemorySession::new();
    let mut ctx = request("req-1", "/orders", "index");
    let outcome = gate.dispatch(&mut ctx, &mut anonymous, &mut responder, |_, _, _| {
        calls += 1;
        Ok::<_, HandlerError<std::io::Error>>("orders page")
    });
    assert!(matches!(outcome, Ok(Outcome::Denied)));

    let mut ada = MemorySession::new();
    ada.insert("user_id", "42".to_string());
    let mut ctx = request("req-2", "/orders", "index");
    let outcome = gate.dispatch(&mut ctx, &mut ada, &mut responder, |ctx, session, _| {
        calls += 1;
        let name = gate
            .view(ctx, session)
            .current_principal()
            .map(|u| u.name.clone())
            .unwrap_or_default();
        Ok::<_, HandlerError<std::io::Error>>(format!("orders for {name}"))
    });

    assert_eq!(
        outcome.ok().and_then(Outcome::completed).as_deref(),
        Some("orders for Ada")
    );
    assert_eq!(calls, 1);
}

#[test]
fn handler_forbidden_uses_single_denial_path() {
    init_tracing();
    let gate = gate();
    let mut session = MemorySession::new();
    session.insert("user_id", "42".to_string());
    let mut responder = RecordingResponder::new();

    let mut ctx = request("req-1", "/invoices/99", "show");
    let outcome = gate.dispatch(&mut ctx, &mut session, &mut responder, |ctx, session, _| {
        let owner = 7;
        let viewer = gate.current_principal(ctx, session).map(|u| u.id);
        if viewer != Some(owner) {
            return Err(HandlerError::<std::io::Error>::from(Forbidden));
        }
        Ok("invoice")
    });

    assert!(matches!(outcome, Ok(Outcome::Denied)));
    assert_eq!(responder.denial_count(), 1);
    assert_eq!(
        responder.last_denial().map(|d| d.kind()),
        Some(DenialKind::Forbidden)
    );
    assert_eq!(ctx.gate_state(), GateState::Allowed);
}

#[test]
fn handler_errors_reach_host() {
    let gate = gate();
    let mut session = MemorySession::new();
    let mut responder = RecordingResponder::new();

    let mut ctx = request("req-1", "/about", "about");
    let outcome: Result<Outcome<()>, std::io::Error> =
        gate.dispatch(&mut ctx, &mut session, &mut responder, |_, _, _| {
            Err(HandlerError::Other(std::io::Error::other("template missing")))
        });

    let err = outcome.expect_err("host sees the error");
    assert_eq!(err.to_string(), "template missing");
    assert_eq!(responder.denial_count(), 0);
}

#[test]
fn login_handler_can_redirect_back_inside_dispatch() {
    let gate = gate();
    let mut session = MemorySession::new();
    let mut responder = RecordingResponder::new();

    let ctx = request("req-1", "/orders?page=2", "index");
    gate.check_authorization(&ctx, &mut session, &mut responder);

    let mut ctx = request("req-2", "/login", "login");
    let outcome = gate.dispatch(
        &mut ctx,
        &mut session,
        &mut responder,
        |ctx, session, responder| {
            gate.set_current_principal(ctx, session, find_active_user("7"));
            Ok::<_, HandlerError<std::io::Error>>(
                gate.redirect_back_or_default(session, responder, "/home"),
            )
        },
    );

    assert_eq!(
        outcome.ok().and_then(Outcome::completed),
        Some(Redirect::Back("/orders?page=2".to_string()))
    );
}

#[test]
fn audit_trail_sees_whole_session_story() {
    let trail = Arc::new(AuditTrail::new());
    let gate = gate().audit(trail.clone());
    let mut session = MemorySession::new();
    let mut responder = RecordingResponder::new();

    gate.check_authorization(&request("req-1", "/orders", "index"), &mut session, &mut responder);
    let mut ctx = request("req-2", "/login", "login");
    gate.set_current_principal(&mut ctx, &mut session, find_active_user("42"));
    let mut ctx = request("req-3", "/logout", "logout");
    gate.set_current_principal(&mut ctx, &mut session, None);

    let kinds: Vec<_> = trail.events().iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            AuditEventKind::AccessDenied,
            AuditEventKind::Login,
            AuditEventKind::Logout
        ]
    );
}
