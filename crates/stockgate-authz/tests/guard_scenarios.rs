use proptest::prelude::*;
use stockgate_authz::{
    AccessConfig, Guard, Identity, IdentityId, LocationId, PolicyDecision, RoleKind,
};

const OPERATOR_AT_RENAISSANCE: &str = r#"{"id":"op-1","role":"operator","assignedLocationId":2}"#;
const MANAGER_AT_GROS: &str = r#"{"id":"mgr-1","role":"manager","assignedLocationId":3}"#;
const GLOBAL_ADMIN: &str = r#"{"id":"root","role":"global_admin"}"#;

fn guard() -> Guard {
    Guard::new(&AccessConfig::default()).expect("guard")
}

fn operator(location: u64) -> String {
    format!(r#"{{"id":"op","role":"operator","assignedLocationId":{location}}}"#)
}

#[test]
fn operator_sells_at_own_location() {
    let outcome = guard().authorize(
        OPERATOR_AT_RENAISSANCE,
        "/dashboard/stock/renaissance/cashier/sell",
    );
    assert_eq!(outcome.decision, PolicyDecision::Allow);
    assert!(!outcome.purge_session);
}

#[test]
fn operator_is_sent_home_from_other_location() {
    let outcome = guard().authorize(
        OPERATOR_AT_RENAISSANCE,
        "/dashboard/stock/al-ouloum/cashier/sell",
    );
    assert_eq!(
        outcome.decision,
        PolicyDecision::deny("/dashboard/stock/renaissance/cashier")
    );
}

#[test]
fn operator_is_sent_home_from_product_pages() {
    let outcome = guard().authorize(OPERATOR_AT_RENAISSANCE, "/products/42");
    assert_eq!(
        outcome.decision,
        PolicyDecision::deny("/dashboard/stock/renaissance/cashier")
    );
}

#[test]
fn manager_is_scoped_to_gros() {
    let guard = guard();
    let outcome = guard.authorize(MANAGER_AT_GROS, "/dashboard/stock/gros/invoices");
    assert!(outcome.is_allow());

    let outcome = guard.authorize(MANAGER_AT_GROS, "/dashboard/stock/al-ouloum/invoices");
    assert_eq!(outcome.decision, PolicyDecision::deny("/dashboard/stock/gros"));

    let manager = Identity::new(
        IdentityId::new("mgr-1"),
        RoleKind::Manager,
        Some(LocationId::new(3)),
    )
    .expect("manager");
    assert!(guard.check_location(&manager, "gros").is_allow());
    assert_eq!(
        guard.check_location(&manager, "al-ouloum").decision,
        PolicyDecision::deny("/dashboard/stock/gros")
    );
}

#[test]
fn manager_reaches_shared_pages_and_cashier() {
    let guard = guard();
    assert!(guard.authorize(MANAGER_AT_GROS, "/products/42").is_allow());
    assert!(guard.authorize(MANAGER_AT_GROS, "/").is_allow());
    assert!(
        guard
            .authorize(MANAGER_AT_GROS, "/dashboard/stock/gros/cashier")
            .is_allow()
    );
    assert_eq!(
        guard.authorize(MANAGER_AT_GROS, "/reports/monthly").decision,
        PolicyDecision::deny("/dashboard/stock/gros")
    );
}

#[test]
fn empty_session_goes_to_login_without_purge() {
    for payload in ["", "   ", "\n\t"] {
        let outcome = guard().authorize(payload, "/dashboard/stock/gros/cashier");
        assert_eq!(outcome.decision, PolicyDecision::deny("/login"));
        assert!(!outcome.purge_session);
    }
}

#[test]
fn malformed_session_is_purged() {
    for payload in ["{", "not json", "[]", r#"{"id":"x","role":"emperor"}"#] {
        let outcome = guard().authorize(payload, "/products");
        assert_eq!(outcome.decision, PolicyDecision::deny("/login"), "{payload}");
        assert!(outcome.purge_session, "{payload}");
    }
}

#[test]
fn dot_segments_cannot_escape_operator_scope() {
    let guard = guard();
    for path in [
        "/dashboard/stock/renaissance/cashier/../../../users",
        "/dashboard/stock/renaissance/cashier/%2e%2e/%2e%2e/%2e%2e/users",
        "/dashboard/stock/renaissance/cashier/%2E%2E%2f..%2f..%2fusers",
        "/dashboard/stock/renaissance/cashier/..\\..\\..\\products",
        "/dashboard/stock/renaissance/cashier/./../../al-ouloum/cashier",
    ] {
        let outcome = guard.authorize(OPERATOR_AT_RENAISSANCE, path);
        assert_eq!(
            outcome.decision,
            PolicyDecision::deny("/dashboard/stock/renaissance/cashier"),
            "{path}"
        );
    }
    assert!(
        guard
            .authorize(
                OPERATOR_AT_RENAISSANCE,
                "/dashboard/stock/renaissance/cashier/sell/../scan"
            )
            .is_allow()
    );
}

#[test]
fn dot_segments_cannot_escape_manager_location() {
    let guard = guard();
    for path in [
        "/dashboard/stock/gros/../al-ouloum/invoices",
        "/dashboard/stock/gros/%2e%2e/al-ouloum/invoices",
    ] {
        assert_eq!(
            guard.authorize(MANAGER_AT_GROS, path).decision,
            PolicyDecision::deny("/dashboard/stock/gros"),
            "{path}"
        );
    }
}

#[test]
fn tampered_session_on_login_is_purged() {
    let outcome = guard().authorize("{tampered", "/login");
    assert!(outcome.is_allow());
    assert!(outcome.purge_session);

    let outcome = guard().authorize("", "/login");
    assert!(outcome.is_allow());
    assert!(!outcome.purge_session);
}

#[test]
fn directory_roundtrips_every_entry() {
    let guard = guard();
    let directory = guard.directory();
    for entry in directory.entries() {
        let key = directory.id_to_key(entry.id).expect("id");
        assert_eq!(directory.key_to_id(key.as_str()), Ok(entry.id));
        let id = directory.key_to_id(entry.key.as_str()).expect("key");
        assert_eq!(directory.id_to_key(id), Ok(&entry.key));
    }
}

#[test]
fn swapped_configuration_changes_decisions() {
    let config = AccessConfig::from_yaml_str(
        r#"
locations:
  - { key: north, id: 10 }
  - { key: south, id: 11 }
routes:
  forbidden_prefixes: ["/admin"]
  scoped_dashboard: "/shops/{location}/till"
  location_scope: "/shops/{location}"
  allowed_prefixes: ["/", "/catalog"]
fallbacks:
  top_level: /signin
  default_location: north
  home_template: "/shops/{location}"
  cashier_template: "/shops/{location}/till"
public_prefixes: ["/signin"]
"#,
    )
    .expect("config");
    let guard = Guard::new(&config).expect("guard");
    let session = operator(11);

    assert!(guard.authorize(&session, "/shops/south/till/scan").is_allow());
    assert_eq!(
        guard.authorize(&session, "/catalog").decision,
        PolicyDecision::deny("/shops/south/till")
    );
    assert_eq!(
        guard.authorize("", "/catalog").decision,
        PolicyDecision::deny("/signin")
    );
    assert!(guard.authorize("", "/signin").is_allow());
}

#[test]
fn shared_guard_decides_identically_across_threads() {
    let guard = std::sync::Arc::new(guard());
    let expected = guard.authorize(OPERATOR_AT_RENAISSANCE, "/products/42");
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let guard = guard.clone();
            std::thread::spawn(move || guard.authorize(OPERATOR_AT_RENAISSANCE, "/products/42"))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().expect("thread"), expected);
    }
}

fn any_path() -> impl Strategy<Value = String> {
    prop_oneof![
        "(/[a-z0-9-]{1,12}){0,6}",
        "/dashboard/stock/(al-ouloum|renaissance|gros|nowhere)(/[a-z]{1,8}){0,3}",
        "/dashboard/stock/(al-ouloum|renaissance|gros)/cashier(/[a-z]{1,8}){0,2}",
    ]
}

proptest! {
    #[test]
    fn global_admin_is_always_allowed(path in any_path()) {
        let outcome = guard().authorize(GLOBAL_ADMIN, &path);
        prop_assert!(outcome.is_allow());
    }

    #[test]
    fn operator_fallback_never_loops(path in any_path(), location in 1u64..=3) {
        let guard = guard();
        let session = operator(location);
        let key = guard
            .directory()
            .id_to_key(LocationId::new(location))
            .expect("key")
            .clone();
        let home = format!("/dashboard/stock/{key}/cashier");
        let own_cashier = path == home || path.starts_with(&format!("{home}/"));
        let public = path == "/login" || path.starts_with("/login/");

        let outcome = guard.authorize(&session, &path);
        if own_cashier || public {
            prop_assert!(outcome.is_allow());
        } else {
            prop_assert_eq!(outcome.decision.clone(), PolicyDecision::deny(home.clone()));
        }
        if let Some(fallback) = outcome.decision.fallback_path() {
            prop_assert!(guard.authorize(&session, fallback).is_allow());
        }
    }

    #[test]
    fn manager_fallback_is_reachable(path in any_path(), location in 1u64..=3) {
        let guard = guard();
        let session = format!(r#"{{"id":"m","role":"manager","assignedLocationId":{location}}}"#);
        let outcome = guard.authorize(&session, &path);
        if let Some(fallback) = outcome.decision.fallback_path() {
            prop_assert!(guard.authorize(&session, fallback).is_allow());
        }
    }
}
