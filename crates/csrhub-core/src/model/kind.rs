use std::fmt;
use std::str::FromStr;

use crate::error::CsrError;

/// Entity collections known to the policy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    User,
    Region,
    Mou,
    CsrProject,
    Report,
    Survey,
    SurveyQuestion,
    SurveyResponse,
    Notification,
    Request,
}

impl EntityKind {
    pub const ALL: [EntityKind; 10] = [
        EntityKind::User,
        EntityKind::Region,
        EntityKind::Mou,
        EntityKind::CsrProject,
        EntityKind::Report,
        EntityKind::Survey,
        EntityKind::SurveyQuestion,
        EntityKind::SurveyResponse,
        EntityKind::Notification,
        EntityKind::Request,
    ];

    /// Name used in config entries, logs, and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Region => "region",
            EntityKind::Mou => "mou",
            EntityKind::CsrProject => "project",
            EntityKind::Report => "report",
            EntityKind::Survey => "survey",
            EntityKind::SurveyQuestion => "survey_question",
            EntityKind::SurveyResponse => "survey_response",
            EntityKind::Notification => "notification",
            EntityKind::Request => "request",
        }
    }

    /// Whether rows of this kind carry an owner reference.
    pub fn has_owner(self) -> bool {
        matches!(
            self,
            EntityKind::User
                | EntityKind::Report
                | EntityKind::SurveyResponse
                | EntityKind::Notification
                | EntityKind::Request
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CsrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CsrError::BadRequest(format!("unknown entity kind: {s}")))
    }
}

/// Mutations the engine can authorize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// Add a user to a project's assignment set.
    AssignUser,
    /// Flag a notification as read.
    MarkRead,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Create,
        Operation::Update,
        Operation::Delete,
        Operation::AssignUser,
        Operation::MarkRead,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::AssignUser => "assign_user",
            Operation::MarkRead => "mark_read",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = CsrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| CsrError::BadRequest(format!("unknown operation: {s}")))
    }
}
