//! Per-collection payloads and their `Resource` bindings.

mod accounts;
mod catalog;
mod inbox;
mod projects;
mod surveys;

pub use accounts::UserWrite;
pub use catalog::{MouWrite, RegionWrite};
pub use inbox::{NotificationWrite, RequestWrite};
pub use projects::{ProjectWrite, ReportWrite};
pub use surveys::{SurveyQuestionWrite, SurveyResponseWrite, SurveyWrite};

use chrono::NaiveDate;

use csrhub_core::error::{CsrError, Result};
use csrhub_core::model::{Id, Record, UserId};
use csrhub_core::policy::assign_owner;

use super::resource::WriteCtx;
use crate::store::Table;

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CsrError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_span(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(CsrError::BadRequest("end_date must not precede start_date".into()));
    }
    Ok(())
}

/// Referenced row must exist.
fn require_ref<R: Record + Clone>(table: &Table<R>, id: Id) -> Result<Id> {
    if !table.exists(id) {
        return Err(CsrError::BadRequest(format!("unknown {}: {id}", R::KIND)));
    }
    Ok(id)
}

/// Apply the owner assignment rule and check the owner exists.
fn resolve_owner(ctx: &WriteCtx<'_>, requested: Option<UserId>) -> Result<UserId> {
    let owner = assign_owner(ctx.caller, requested).ok_or_else(|| {
        CsrError::NotAllowed("rows can only be assigned to yourself".into())
    })?;
    require_ref(&ctx.store.users, owner)
}
