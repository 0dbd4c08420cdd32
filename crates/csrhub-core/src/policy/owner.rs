use crate::model::{Caller, UserId};

/// Decide who owns a row being written.
///
/// An omitted owner defaults to the caller. Non-superusers may only name
/// themselves; superusers may name anyone. `None` means the requested
/// assignment is not allowed.
pub fn assign_owner(caller: &Caller, requested: Option<UserId>) -> Option<UserId> {
    match requested {
        None => Some(caller.id),
        Some(id) if id == caller.id || caller.is_superuser => Some(id),
        Some(_) => None,
    }
}
