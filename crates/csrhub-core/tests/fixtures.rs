//! Row builders shared by the policy tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::json;

use csrhub_core::model::{
    Caller, CsrProject, Notification, ProjectStatus, Region, Report, ReportStatus, Request,
    RequestType, Role, SurveyResponse, User, UserId,
};

pub fn member(id: UserId) -> Caller {
    Caller::new(id, Role::Recipient, false)
}

pub fn superuser(id: UserId) -> Caller {
    Caller::new(id, Role::Admin, true)
}

pub fn user(id: UserId) -> User {
    User {
        id,
        username: format!("user{id}"),
        email: format!("user{id}@example.org"),
        first_name: String::new(),
        last_name: String::new(),
        role: Role::Recipient,
        avatar: None,
        is_superuser: false,
    }
}

pub fn notification(id: u64, user: UserId) -> Notification {
    Notification {
        id,
        user,
        message: format!("notice {id}"),
        notification_type: "info".into(),
        timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        read: false,
    }
}

pub fn report(id: u64, recipient: UserId) -> Report {
    Report {
        id,
        project: 1,
        recipient,
        summary: "quarterly".into(),
        document_url: "https://docs.example.org/r.pdf".into(),
        status: ReportStatus::Submitted,
        submitted_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        feedback: None,
    }
}

pub fn request(id: u64, requester: UserId) -> Request {
    Request {
        id,
        request_type: RequestType::Funding,
        requester,
        facility: "clinic".into(),
        status: "pending".into(),
        submitted_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        description: "solar panels".into(),
    }
}

pub fn response(id: u64, respondent: UserId) -> SurveyResponse {
    SurveyResponse {
        id,
        survey: 1,
        respondent,
        responses: json!({"q1": "yes"}),
        submitted_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
    }
}

pub fn region(id: u64) -> Region {
    Region { id, name: format!("region {id}"), country: "KE".into(), project_count: 0 }
}

pub fn project(id: u64, assigned: &[UserId]) -> CsrProject {
    CsrProject {
        id,
        title: "Clean water".into(),
        description: "boreholes".into(),
        status: ProjectStatus::Active,
        progress: 40.0,
        location: "Kisumu".into(),
        category: "water".into(),
        budget: Decimal::new(125_000, 0),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        assigned_users: assigned.iter().copied().collect::<BTreeSet<_>>(),
        project_type: "infrastructure".into(),
        mou: None,
        recipient: None,
        region: None,
    }
}
