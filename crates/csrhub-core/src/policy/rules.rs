//! Rule table and override compilation.
//!
//! Override entries use the form `kind:operation=rule`, e.g.
//! `survey:update=superuser`. They replace one mutation rule of the standard
//! table and are validated when compiled, never at evaluation time.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{CsrError, Result};
use crate::model::{Caller, EntityKind, Operation, UserId};

/// Who may read rows of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadRule {
    /// Every authenticated caller sees every row.
    All,
    /// Only the row's owner, superusers included.
    Owner,
    /// The row's owner, or any superuser.
    OwnerOrSuperuser,
}

impl ReadRule {
    pub fn permits(self, caller: &Caller, owner: Option<UserId>) -> bool {
        match self {
            ReadRule::All => true,
            ReadRule::Owner => caller.owns(owner),
            ReadRule::OwnerOrSuperuser => caller.is_superuser || caller.owns(owner),
        }
    }
}

/// Who may apply a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Authenticated,
    OwnerOrSuperuser,
    Superuser,
}

impl Rule {
    /// Every variant admits superusers, which keeps evaluation monotonic in
    /// privilege.
    pub fn permits(self, caller: &Caller, owner: Option<UserId>) -> bool {
        match self {
            Rule::Authenticated => true,
            Rule::OwnerOrSuperuser => caller.is_superuser || caller.owns(owner),
            Rule::Superuser => caller.is_superuser,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rule::Authenticated => "authenticated",
            Rule::OwnerOrSuperuser => "owner_or_superuser",
            Rule::Superuser => "superuser",
        }
    }

    fn needs_owner(self) -> bool {
        matches!(self, Rule::OwnerOrSuperuser)
    }
}

impl FromStr for Rule {
    type Err = CsrError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "authenticated" => Ok(Rule::Authenticated),
            "owner_or_superuser" => Ok(Rule::OwnerOrSuperuser),
            "superuser" => Ok(Rule::Superuser),
            other => Err(CsrError::BadRequest(format!("unknown policy rule: {other}"))),
        }
    }
}

/// Compiled rule table. Build once at startup, then share read-only.
///
/// Read rules are fixed per kind; only mutation rules can be overridden.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    mutations: HashMap<(EntityKind, Operation), Rule>,
}

impl PolicyTable {
    /// The observed policy of the CSR backend.
    ///
    /// Owned kinds filter reads by owner (with a superuser bypass, except
    /// notifications) and restrict update/delete to owner or superuser. Every
    /// other kind is open to any authenticated caller. Custom actions exist
    /// only on projects (`assign_user`) and notifications (`mark_read`).
    pub fn standard() -> Self {
        let mut mutations = HashMap::new();

        for kind in EntityKind::ALL {
            let write = if kind.has_owner() {
                Rule::OwnerOrSuperuser
            } else {
                Rule::Authenticated
            };
            mutations.insert((kind, Operation::Create), Rule::Authenticated);
            mutations.insert((kind, Operation::Update), write);
            mutations.insert((kind, Operation::Delete), write);
        }

        mutations.insert((EntityKind::CsrProject, Operation::AssignUser), Rule::Authenticated);
        mutations.insert((EntityKind::Notification, Operation::MarkRead), Rule::OwnerOrSuperuser);

        Self { mutations }
    }

    /// Standard table with `overrides` applied in order.
    pub fn with_overrides(raw: &[String]) -> Result<Self> {
        let mut table = Self::standard();
        for entry in raw {
            let (kind, op, rule) = table.compile_override(entry)?;
            tracing::debug!(%kind, %op, rule = rule.as_str(), "policy override compiled");
            table.mutations.insert((kind, op), rule);
        }
        Ok(table)
    }

    fn compile_override(&self, s: &str) -> Result<(EntityKind, Operation, Rule)> {
        // format: "kind:operation=rule"
        let (target, rule_s) = s.split_once('=').ok_or_else(|| {
            CsrError::BadRequest(format!("invalid policy override: {s} (expected kind:operation=rule)"))
        })?;
        let (kind_s, op_s) = target.split_once(':').ok_or_else(|| {
            CsrError::BadRequest(format!("invalid policy override: {s} (expected kind:operation=rule)"))
        })?;

        let kind: EntityKind = kind_s.trim().parse()?;
        let op: Operation = op_s.trim().parse()?;
        let rule: Rule = rule_s.trim().parse()?;

        if !self.mutations.contains_key(&(kind, op)) {
            return Err(CsrError::BadRequest(format!(
                "policy override {s}: {op} is not supported on {kind}"
            )));
        }
        if rule.needs_owner() && (op == Operation::Create || !kind.has_owner()) {
            return Err(CsrError::BadRequest(format!(
                "policy override {s}: {} needs an owned target row",
                rule.as_str()
            )));
        }

        Ok((kind, op, rule))
    }

    pub fn read_rule(&self, kind: EntityKind) -> ReadRule {
        match kind {
            // No superuser bypass: inboxes stay private.
            EntityKind::Notification => ReadRule::Owner,
            EntityKind::User
            | EntityKind::Report
            | EntityKind::SurveyResponse
            | EntityKind::Request => ReadRule::OwnerOrSuperuser,
            EntityKind::Region
            | EntityKind::Mou
            | EntityKind::CsrProject
            | EntityKind::Survey
            | EntityKind::SurveyQuestion => ReadRule::All,
        }
    }

    /// `None` when the (kind, operation) pair is not part of the table.
    pub fn mutation_rule(&self, kind: EntityKind, op: Operation) -> Option<Rule> {
        self.mutations.get(&(kind, op)).copied()
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}
