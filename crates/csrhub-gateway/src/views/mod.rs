//! Explicit wire projections.
//!
//! Every entity has a named view struct; related rows are nested the way API
//! consumers expect (a report carries its project, a project carries its
//! assigned users, ...). References that no longer resolve project as `null`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use csrhub_core::model::{
    CsrProject, Id, Mou, Notification, ProjectStatus, QuestionType, Region, Report, ReportStatus,
    Request, RequestType, Role, Survey, SurveyQuestion, SurveyResponse, SurveyStatus, User,
};

use crate::store::Store;

/// Public account fields. The superuser flag is never exposed.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for UserView {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
            role: u.role,
            avatar: u.avatar.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
        }
    }
}

impl UserView {
    fn lookup(store: &Store, id: Id) -> Option<Self> {
        store.users.get(id).as_ref().map(Self::from)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionView {
    pub id: Id,
    pub name: String,
    pub country: String,
    pub project_count: u32,
}

impl From<&Region> for RegionView {
    fn from(r: &Region) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            country: r.country.clone(),
            project_count: r.project_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MouView {
    pub id: Id,
    pub title: String,
    pub organization_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub description: String,
    pub document_url: String,
}

impl From<&Mou> for MouView {
    fn from(m: &Mou) -> Self {
        Self {
            id: m.id,
            title: m.title.clone(),
            organization_name: m.organization_name.clone(),
            start_date: m.start_date,
            end_date: m.end_date,
            status: m.status.clone(),
            description: m.description.clone(),
            document_url: m.document_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub progress: f64,
    pub location: String,
    pub category: String,
    pub budget: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub assigned_users: Vec<UserView>,
    pub project_type: String,
    pub mou: Option<MouView>,
    pub recipient: Option<UserView>,
    pub region: Option<RegionView>,
}

impl ProjectView {
    pub fn build(p: &CsrProject, store: &Store) -> Self {
        Self {
            id: p.id,
            title: p.title.clone(),
            description: p.description.clone(),
            status: p.status,
            progress: p.progress,
            location: p.location.clone(),
            category: p.category.clone(),
            budget: p.budget,
            start_date: p.start_date,
            end_date: p.end_date,
            created_at: p.created_at,
            assigned_users: p
                .assigned_users
                .iter()
                .filter_map(|id| UserView::lookup(store, *id))
                .collect(),
            project_type: p.project_type.clone(),
            mou: p.mou.and_then(|id| store.mous.get(id)).as_ref().map(MouView::from),
            recipient: p.recipient.and_then(|id| UserView::lookup(store, id)),
            region: p.region.and_then(|id| store.regions.get(id)).as_ref().map(RegionView::from),
        }
    }

    fn lookup(store: &Store, id: Id) -> Option<Self> {
        store.projects.get(id).map(|p| Self::build(&p, store))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub id: Id,
    pub project: Option<ProjectView>,
    pub recipient: Option<UserView>,
    pub summary: String,
    pub document_url: String,
    pub status: ReportStatus,
    pub submitted_at: DateTime<Utc>,
    pub feedback: Option<String>,
}

impl ReportView {
    pub fn build(r: &Report, store: &Store) -> Self {
        Self {
            id: r.id,
            project: ProjectView::lookup(store, r.project),
            recipient: UserView::lookup(store, r.recipient),
            summary: r.summary.clone(),
            document_url: r.document_url.clone(),
            status: r.status,
            submitted_at: r.submitted_at,
            feedback: r.feedback.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyQuestionView {
    pub id: Id,
    pub survey: Id,
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Option<serde_json::Value>,
    pub required: bool,
}

impl From<&SurveyQuestion> for SurveyQuestionView {
    fn from(q: &SurveyQuestion) -> Self {
        Self {
            id: q.id,
            survey: q.survey,
            question: q.question.clone(),
            question_type: q.question_type,
            options: q.options.clone(),
            required: q.required,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyView {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub project: Option<ProjectView>,
    pub questions: Vec<SurveyQuestionView>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: SurveyStatus,
}

impl SurveyView {
    pub fn build(s: &Survey, store: &Store) -> Self {
        Self {
            id: s.id,
            title: s.title.clone(),
            description: s.description.clone(),
            project: ProjectView::lookup(store, s.project),
            questions: store
                .questions
                .all()
                .iter()
                .filter(|q| q.survey == s.id)
                .map(SurveyQuestionView::from)
                .collect(),
            created_at: s.created_at,
            expires_at: s.expires_at,
            status: s.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyResponseView {
    pub id: Id,
    pub survey: Option<SurveyView>,
    pub respondent: Option<UserView>,
    pub responses: serde_json::Value,
    pub submitted_at: DateTime<Utc>,
}

impl SurveyResponseView {
    pub fn build(r: &SurveyResponse, store: &Store) -> Self {
        Self {
            id: r.id,
            survey: store.surveys.get(r.survey).map(|s| SurveyView::build(&s, store)),
            respondent: UserView::lookup(store, r.respondent),
            responses: r.responses.clone(),
            submitted_at: r.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationView {
    pub id: Id,
    pub user: Option<UserView>,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl NotificationView {
    pub fn build(n: &Notification, store: &Store) -> Self {
        Self {
            id: n.id,
            user: UserView::lookup(store, n.user),
            message: n.message.clone(),
            notification_type: n.notification_type.clone(),
            timestamp: n.timestamp,
            read: n.read,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestView {
    pub id: Id,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub requester: Option<UserView>,
    pub facility: String,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
    pub description: String,
}

impl RequestView {
    pub fn build(r: &Request, store: &Store) -> Self {
        Self {
            id: r.id,
            request_type: r.request_type,
            requester: UserView::lookup(store, r.requester),
            facility: r.facility.clone(),
            status: r.status.clone(),
            submitted_at: r.submitted_at,
            description: r.description.clone(),
        }
    }
}
