use crate::model::{Caller, EntityKind, Operation, Record, UserId};

use super::rules::PolicyTable;

/// Stateless evaluator over a compiled [`PolicyTable`].
/// Construct once at startup, then share via Arc.
#[derive(Debug, Clone, Default)]
pub struct PolicyEngine {
    table: PolicyTable,
}

impl PolicyEngine {
    pub fn new(table: PolicyTable) -> Self {
        Self { table }
    }

    /// Rows of `rows` the caller may read, in input order.
    pub fn filter_collection<'a, R: Record>(&self, caller: &Caller, rows: &'a [R]) -> Vec<&'a R> {
        let rule = self.table.read_rule(R::KIND);
        rows.iter()
            .filter(|row| rule.permits(caller, row.owner_ref()))
            .collect()
    }

    /// Single-row form of [`filter_collection`](Self::filter_collection).
    pub fn is_visible<R: Record>(&self, caller: &Caller, row: &R) -> bool {
        self.table.read_rule(R::KIND).permits(caller, row.owner_ref())
    }

    /// Whether `caller` may apply `op` to `target` (`None` for create).
    pub fn authorize_mutation<R: Record>(
        &self,
        caller: &Caller,
        target: Option<&R>,
        op: Operation,
    ) -> bool {
        self.authorize(caller, R::KIND, target.and_then(|row| row.owner_ref()), op)
    }

    /// Kind-level form for callers that only hold the owner reference.
    pub fn authorize(
        &self,
        caller: &Caller,
        kind: EntityKind,
        owner: Option<UserId>,
        op: Operation,
    ) -> bool {
        match self.table.mutation_rule(kind, op) {
            Some(rule) => rule.permits(caller, owner),
            None => false,
        }
    }
}
