//! Policy override compilation.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod fixtures;
use fixtures::*;

use csrhub_core::model::{EntityKind, Operation, Survey};
use csrhub_core::policy::{assign_owner, PolicyEngine, PolicyTable, Rule};

fn engine(overrides: &[&str]) -> PolicyEngine {
    let raw: Vec<String> = overrides.iter().map(|s| s.to_string()).collect();
    PolicyEngine::new(PolicyTable::with_overrides(&raw).expect("must compile"))
}

#[test]
fn empty_overrides_match_standard_table() {
    let table = PolicyTable::with_overrides(&[]).unwrap();
    assert_eq!(
        table.mutation_rule(EntityKind::Survey, Operation::Update),
        Some(Rule::Authenticated)
    );
    assert_eq!(table.mutation_rule(EntityKind::Survey, Operation::MarkRead), None);
}

#[test]
fn override_tightens_project_assignment() {
    let e = engine(&["project:assign_user=superuser"]);
    let p = project(1, &[]);

    assert!(!e.authorize_mutation(&member(3), Some(&p), Operation::AssignUser));
    assert!(e.authorize_mutation(&superuser(1), Some(&p), Operation::AssignUser));
    // Unrelated rules keep their defaults.
    assert!(e.authorize_mutation(&member(3), Some(&p), Operation::Update));
}

#[test]
fn override_restricts_survey_creation() {
    let e = engine(&[" survey : create = superuser "]);
    assert!(!e.authorize_mutation::<Survey>(&member(3), None, Operation::Create));
    assert!(e.authorize_mutation::<Survey>(&superuser(1), None, Operation::Create));
}

#[test]
fn malformed_overrides_are_rejected() {
    let bad = [
        "survey:update",                         // no rule
        "survey=superuser",                      // no operation
        "galaxy:update=superuser",               // unknown kind
        "survey:archive=superuser",              // unknown operation
        "survey:update=everyone",                // unknown rule
        "region:mark_read=superuser",            // action not offered on kind
        "survey:update=owner_or_superuser",      // kind has no owner
        "report:create=owner_or_superuser",      // create has no target row
    ];
    for entry in bad {
        let err = PolicyTable::with_overrides(&[entry.to_string()]).expect_err(entry);
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "entry={entry}");
    }
}

#[test]
fn members_may_only_own_their_own_rows() {
    let me = member(4);
    assert_eq!(assign_owner(&me, None), Some(4));
    assert_eq!(assign_owner(&me, Some(4)), Some(4));
    assert_eq!(assign_owner(&me, Some(5)), None);

    let admin = superuser(1);
    assert_eq!(assign_owner(&admin, Some(5)), Some(5));
    assert_eq!(assign_owner(&admin, None), Some(1));
}
