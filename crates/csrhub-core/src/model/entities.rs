//! Stored rows for every collection.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EntityKind, Id, Record, Role, UserId};

/// Account row. `is_superuser` is never writable through the API.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub is_superuser: bool,
}

impl Record for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> Id {
        self.id
    }

    // An account is owned by itself.
    fn owner_ref(&self) -> Option<UserId> {
        Some(self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: Id,
    pub name: String,
    pub country: String,
    pub project_count: u32,
}

impl Record for Region {
    const KIND: EntityKind = EntityKind::Region;

    fn id(&self) -> Id {
        self.id
    }
}

/// Memorandum of understanding with a partner organization.
#[derive(Debug, Clone, PartialEq)]
pub struct Mou {
    pub id: Id,
    pub title: String,
    pub organization_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub description: String,
    pub document_url: String,
}

impl Record for Mou {
    const KIND: EntityKind = EntityKind::Mou;

    fn id(&self) -> Id {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Completed,
    Pending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsrProject {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    /// Percent complete, 0..=100.
    pub progress: f64,
    pub location: String,
    pub category: String,
    /// Two decimal places, below 10^8.
    pub budget: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub assigned_users: BTreeSet<UserId>,
    pub project_type: String,
    pub mou: Option<Id>,
    pub recipient: Option<UserId>,
    pub region: Option<Id>,
}

impl CsrProject {
    /// Add `user` to the assignment set. Returns false if already assigned.
    pub fn assign(&mut self, user: UserId) -> bool {
        self.assigned_users.insert(user)
    }

    pub fn is_assigned(&self, user: UserId) -> bool {
        self.assigned_users.contains(&user)
    }
}

// Assignment grants `assign_user` only; it never restricts reads, so projects
// report no owner.
impl Record for CsrProject {
    const KIND: EntityKind = EntityKind::CsrProject;

    fn id(&self) -> Id {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    Submitted,
    Approved,
}

/// Progress report filed by a project recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: Id,
    pub project: Id,
    pub recipient: UserId,
    pub summary: String,
    pub document_url: String,
    pub status: ReportStatus,
    pub submitted_at: DateTime<Utc>,
    pub feedback: Option<String>,
}

impl Record for Report {
    const KIND: EntityKind = EntityKind::Report;

    fn id(&self) -> Id {
        self.id
    }

    fn owner_ref(&self) -> Option<UserId> {
        Some(self.recipient)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStatus {
    Active,
    Expired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Survey {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub project: Id,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: SurveyStatus,
}

impl Record for Survey {
    const KIND: EntityKind = EntityKind::Survey;

    fn id(&self) -> Id {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    MultipleChoice,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurveyQuestion {
    pub id: Id,
    pub survey: Id,
    pub question: String,
    pub question_type: QuestionType,
    pub options: Option<serde_json::Value>,
    pub required: bool,
}

impl Record for SurveyQuestion {
    const KIND: EntityKind = EntityKind::SurveyQuestion;

    fn id(&self) -> Id {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurveyResponse {
    pub id: Id,
    pub survey: Id,
    pub respondent: UserId,
    pub responses: serde_json::Value,
    pub submitted_at: DateTime<Utc>,
}

impl Record for SurveyResponse {
    const KIND: EntityKind = EntityKind::SurveyResponse;

    fn id(&self) -> Id {
        self.id
    }

    fn owner_ref(&self) -> Option<UserId> {
        Some(self.respondent)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Id,
    pub user: UserId,
    pub message: String,
    pub notification_type: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    /// Set the read flag. Returns false if it was already set.
    pub fn mark_read(&mut self) -> bool {
        !std::mem::replace(&mut self.read, true)
    }
}

impl Record for Notification {
    const KIND: EntityKind = EntityKind::Notification;

    fn id(&self) -> Id {
        self.id
    }

    fn owner_ref(&self) -> Option<UserId> {
        Some(self.user)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Funding,
    Resource,
}

/// Funding or resource request raised by a recipient facility.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub id: Id,
    pub request_type: RequestType,
    pub requester: UserId,
    pub facility: String,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
    pub description: String,
}

impl Record for Request {
    const KIND: EntityKind = EntityKind::Request;

    fn id(&self) -> Id {
        self.id
    }

    fn owner_ref(&self) -> Option<UserId> {
        Some(self.requester)
    }
}
