//! Tests for route classification and table validation.

use crate::error::DomainError;
use crate::resolver::{RouteClass, RouteTable};

fn table(public: &[&str], protected: &[&str]) -> Result<RouteTable, DomainError> {
    RouteTable::new(
        public.iter().map(ToString::to_string).collect(),
        protected.iter().map(ToString::to_string).collect(),
    )
}

// ============================================================
// Section 1: Classification
// ============================================================

#[test]
fn test_root_prefix_matches_only_the_root_path() {
    let table = RouteTable::default();

    assert_eq!(table.classify("/"), RouteClass::Public);
    assert_eq!(table.classify("/reports"), RouteClass::Other);
}

#[test]
fn test_prefix_covers_nested_paths() {
    let table = RouteTable::default();

    assert_eq!(table.classify("/auth"), RouteClass::Public);
    assert_eq!(table.classify("/auth/reset-password"), RouteClass::Public);
    assert_eq!(table.classify("/clients"), RouteClass::RoleProtected);
    assert_eq!(table.classify("/clients/42/history"), RouteClass::RoleProtected);
}

#[test]
fn test_prefix_match_respects_segment_boundaries() {
    let table = RouteTable::default();

    // "/clients" must not swallow "/clientsfoo"
    assert_eq!(table.classify("/clientsfoo"), RouteClass::Other);
    assert_eq!(table.classify("/authx"), RouteClass::Other);
}

#[test]
fn test_onboarding_flow_has_its_own_class() {
    let table = RouteTable::default();

    assert_eq!(table.classify("/onboarding"), RouteClass::Onboarding);
    assert_eq!(table.classify("/onboarding/step-3"), RouteClass::Onboarding);
}

#[test]
fn test_unlisted_paths_classify_as_other() {
    let table = RouteTable::default();

    assert_eq!(table.classify("/dashboard"), RouteClass::Other);
    assert_eq!(table.classify("/unauthorized"), RouteClass::Other);
}

// ============================================================
// Section 2: Validation
// ============================================================

#[test]
fn test_rejects_relative_and_empty_prefixes() {
    for bad in ["", "clients", "auth/"] {
        let result = table(&[bad], &[]);
        assert!(
            matches!(result, Err(DomainError::InvalidRoutePrefix { .. })),
            "should reject prefix {bad:?}"
        );
    }
}

#[test]
fn test_rejects_trailing_slash_prefixes() {
    let result = table(&["/auth/"], &[]);
    assert!(matches!(
        result,
        Err(DomainError::InvalidRoutePrefix { .. })
    ));
}

#[test]
fn test_rejects_prefix_listed_in_both_sets() {
    let result = table(&["/auth", "/clients"], &["/clients"]);
    match result {
        Err(DomainError::ConflictingRouteClass { value }) => assert_eq!(value, "/clients"),
        other => panic!("expected ConflictingRouteClass, got {other:?}"),
    }
}

#[test]
fn test_accepts_custom_tables() {
    let table = table(&["/", "/sobre"], &["/agenda"]).unwrap();

    assert_eq!(table.classify("/sobre"), RouteClass::Public);
    assert_eq!(table.classify("/agenda/hoje"), RouteClass::RoleProtected);
    assert_eq!(table.public_prefixes().len(), 2);
    assert_eq!(table.protected_prefixes().len(), 1);
}
