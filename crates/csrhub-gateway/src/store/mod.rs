//! In-memory persistence collaborator.
//!
//! Supplies full collections to the policy engine and applies approved
//! mutations. Each table is a `DashMap`, so single-row updates are atomic
//! under the shard lock; multi-table cascades are applied table by table.

mod table;

pub use table::Table;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use csrhub_core::error::{CsrError, Result};
use csrhub_core::model::{
    CsrProject, Id, Mou, Notification, Region, Report, Request, Survey, SurveyQuestion,
    SurveyResponse, User,
};

#[derive(Default)]
pub struct Store {
    pub users: Table<User>,
    pub regions: Table<Region>,
    pub mous: Table<Mou>,
    pub projects: Table<CsrProject>,
    pub reports: Table<Report>,
    pub surveys: Table<Survey>,
    pub questions: Table<SurveyQuestion>,
    pub responses: Table<SurveyResponse>,
    pub notifications: Table<Notification>,
    pub requests: Table<Request>,
    /// Username -> account id. Claimed before a name is written to a row.
    usernames: DashMap<String, Id>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `name` for account `id`. Re-claiming your own name is a no-op.
    pub fn claim_username(&self, name: &str, id: Id) -> Result<()> {
        match self.usernames.entry(name.to_owned()) {
            Entry::Occupied(held) if *held.get() != id => {
                Err(CsrError::BadRequest(format!("username already taken: {name}")))
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    pub fn release_username(&self, name: &str, id: Id) {
        self.usernames.remove_if(name, |_, holder| *holder == id);
    }

    /// Delete a user and everything they own; detach them from projects.
    pub fn delete_user(&self, id: Id) -> Option<User> {
        let user = self.users.remove(id)?;
        self.release_username(&user.username, id);

        let reports = self.reports.remove_where(|r| r.recipient == id).len();
        let responses = self.responses.remove_where(|r| r.respondent == id).len();
        let notifications = self.notifications.remove_where(|n| n.user == id).len();
        let requests = self.requests.remove_where(|r| r.requester == id).len();
        self.projects.for_each_mut(|p| {
            p.assigned_users.remove(&id);
            if p.recipient == Some(id) {
                p.recipient = None;
            }
        });

        tracing::debug!(user = id, reports, responses, notifications, requests, "user deleted");
        Some(user)
    }

    /// Delete a project with its reports and surveys.
    pub fn delete_project(&self, id: Id) -> Option<CsrProject> {
        let project = self.projects.remove(id)?;

        let reports = self.reports.remove_where(|r| r.project == id).len();
        let surveys = self.surveys.remove_where(|s| s.project == id);
        for s in &surveys {
            self.delete_survey_children(s.id);
        }

        tracing::debug!(project = id, reports, surveys = surveys.len(), "project deleted");
        Some(project)
    }

    /// Delete a survey with its questions and responses.
    pub fn delete_survey(&self, id: Id) -> Option<Survey> {
        let survey = self.surveys.remove(id)?;
        self.delete_survey_children(id);
        Some(survey)
    }

    fn delete_survey_children(&self, survey: Id) {
        let questions = self.questions.remove_where(|q| q.survey == survey).len();
        let responses = self.responses.remove_where(|r| r.survey == survey).len();
        tracing::debug!(survey, questions, responses, "survey children deleted");
    }

    /// Delete an MOU; projects referencing it keep existing without one.
    pub fn delete_mou(&self, id: Id) -> Option<Mou> {
        let mou = self.mous.remove(id)?;
        self.projects.for_each_mut(|p| {
            if p.mou == Some(id) {
                p.mou = None;
            }
        });
        Some(mou)
    }

    pub fn delete_region(&self, id: Id) -> Option<Region> {
        let region = self.regions.remove(id)?;
        self.projects.for_each_mut(|p| {
            if p.region == Some(id) {
                p.region = None;
            }
        });
        Some(region)
    }
}
