//! Data model shared by the policy engine and the gateway.
//!
//! Rows here are the storage representation. Wire shapes live in the gateway
//! (`views`), so adding a column never silently changes the API.

pub mod caller;
pub mod entities;
pub mod kind;

pub use caller::{Caller, Role};
pub use entities::{
    CsrProject, Mou, Notification, ProjectStatus, QuestionType, Region, Report, ReportStatus,
    Request, RequestType, Survey, SurveyQuestion, SurveyResponse, SurveyStatus, User,
};
pub use kind::{EntityKind, Operation};

/// Row identifier.
pub type Id = u64;

/// Reference to a `User` row.
pub type UserId = Id;

/// A stored row the policy engine can reason about.
pub trait Record {
    /// Which collection this row belongs to.
    const KIND: EntityKind;

    fn id(&self) -> Id;

    /// The single user considered the owner of this row, if the kind has one.
    fn owner_ref(&self) -> Option<UserId> {
        None
    }
}
