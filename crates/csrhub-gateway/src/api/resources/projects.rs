use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use csrhub_core::error::{CsrError, Result};
use csrhub_core::model::{CsrProject, Id, ProjectStatus, Report, ReportStatus, UserId};

use super::{require_ref, require_span, require_text, resolve_owner};
use crate::api::resource::{Resource, WriteCtx};
use crate::store::{Store, Table};
use crate::views::{ProjectView, ReportView};

/// Exclusive upper bound of a budget: ten digits, two of them decimals.
const MAX_BUDGET_UNITS: u32 = 100_000_000;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectWrite {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: ProjectStatus,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    pub budget: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub mou_id: Option<Id>,
    #[serde(default)]
    pub recipient_id: Option<UserId>,
    #[serde(default)]
    pub region_id: Option<Id>,
}

impl ProjectWrite {
    /// Validate the payload and return the budget rounded to cents.
    fn validate(&self, store: &Store) -> Result<Decimal> {
        require_text("title", &self.title)?;
        require_span(self.start_date, self.end_date)?;
        if !(0.0..=100.0).contains(&self.progress) {
            return Err(CsrError::BadRequest("progress must be between 0 and 100".into()));
        }
        let budget = self.budget.round_dp(2);
        if budget < Decimal::ZERO || budget >= Decimal::from(MAX_BUDGET_UNITS) {
            return Err(CsrError::BadRequest(
                "budget must be non-negative and below 100000000".into(),
            ));
        }
        if let Some(id) = self.mou_id {
            require_ref(&store.mous, id)?;
        }
        if let Some(id) = self.recipient_id {
            require_ref(&store.users, id)?;
        }
        if let Some(id) = self.region_id {
            require_ref(&store.regions, id)?;
        }
        Ok(budget)
    }
}

impl Resource for CsrProject {
    type Write = ProjectWrite;
    type View = ProjectView;

    fn table(store: &Store) -> &Table<Self> {
        &store.projects
    }

    fn create(id: Id, input: ProjectWrite, ctx: &WriteCtx<'_>) -> Result<Self> {
        let budget = input.validate(ctx.store)?;
        Ok(CsrProject {
            id,
            title: input.title,
            description: input.description,
            status: input.status,
            progress: input.progress,
            location: input.location,
            category: input.category,
            budget,
            start_date: input.start_date,
            end_date: input.end_date,
            created_at: ctx.now,
            assigned_users: BTreeSet::new(),
            project_type: input.project_type,
            mou: input.mou_id,
            recipient: input.recipient_id,
            region: input.region_id,
        })
    }

    // Assignments are only changed through `assign_user`.
    fn apply(&mut self, input: ProjectWrite, ctx: &WriteCtx<'_>) -> Result<()> {
        let budget = input.validate(ctx.store)?;
        self.title = input.title;
        self.description = input.description;
        self.status = input.status;
        self.progress = input.progress;
        self.location = input.location;
        self.category = input.category;
        self.budget = budget;
        self.start_date = input.start_date;
        self.end_date = input.end_date;
        self.project_type = input.project_type;
        self.mou = input.mou_id;
        self.recipient = input.recipient_id;
        self.region = input.region_id;
        Ok(())
    }

    fn to_write(&self) -> ProjectWrite {
        ProjectWrite {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            progress: self.progress,
            location: self.location.clone(),
            category: self.category.clone(),
            budget: self.budget,
            start_date: self.start_date,
            end_date: self.end_date,
            project_type: self.project_type.clone(),
            mou_id: self.mou,
            recipient_id: self.recipient,
            region_id: self.region,
        }
    }

    fn view(&self, store: &Store) -> ProjectView {
        ProjectView::build(self, store)
    }

    fn remove(store: &Store, id: Id) -> Option<Self> {
        store.delete_project(id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportWrite {
    pub project_id: Id,
    /// Defaults to the caller.
    #[serde(default)]
    pub recipient_id: Option<UserId>,
    pub summary: String,
    #[serde(default)]
    pub document_url: String,
    pub status: ReportStatus,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl Resource for Report {
    type Write = ReportWrite;
    type View = ReportView;

    fn table(store: &Store) -> &Table<Self> {
        &store.reports
    }

    fn create(id: Id, input: ReportWrite, ctx: &WriteCtx<'_>) -> Result<Self> {
        require_text("summary", &input.summary)?;
        let project = require_ref(&ctx.store.projects, input.project_id)?;
        let recipient = resolve_owner(ctx, input.recipient_id)?;
        Ok(Report {
            id,
            project,
            recipient,
            summary: input.summary,
            document_url: input.document_url,
            status: input.status,
            submitted_at: ctx.now,
            feedback: input.feedback,
        })
    }

    fn apply(&mut self, input: ReportWrite, ctx: &WriteCtx<'_>) -> Result<()> {
        require_text("summary", &input.summary)?;
        self.project = require_ref(&ctx.store.projects, input.project_id)?;
        self.recipient = resolve_owner(ctx, input.recipient_id.or(Some(self.recipient)))?;
        self.summary = input.summary;
        self.document_url = input.document_url;
        self.status = input.status;
        self.feedback = input.feedback;
        Ok(())
    }

    fn to_write(&self) -> ReportWrite {
        ReportWrite {
            project_id: self.project,
            recipient_id: Some(self.recipient),
            summary: self.summary.clone(),
            document_url: self.document_url.clone(),
            status: self.status,
            feedback: self.feedback.clone(),
        }
    }

    fn view(&self, store: &Store) -> ReportView {
        ReportView::build(self, store)
    }
}
