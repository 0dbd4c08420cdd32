use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use csrhub_core::error::{CsrError, Result};
use csrhub_core::model::{
    Id, QuestionType, Survey, SurveyQuestion, SurveyResponse, SurveyStatus, UserId,
};

use super::{require_ref, require_text, resolve_owner};
use crate::api::resource::{Resource, WriteCtx};
use crate::store::{Store, Table};
use crate::views::{SurveyQuestionView, SurveyResponseView, SurveyView};

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurveyWrite {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub project_id: Id,
    pub expires_at: DateTime<Utc>,
    pub status: SurveyStatus,
}

impl Resource for Survey {
    type Write = SurveyWrite;
    type View = SurveyView;

    fn table(store: &Store) -> &Table<Self> {
        &store.surveys
    }

    fn create(id: Id, input: SurveyWrite, ctx: &WriteCtx<'_>) -> Result<Self> {
        require_text("title", &input.title)?;
        let project = require_ref(&ctx.store.projects, input.project_id)?;
        Ok(Survey {
            id,
            title: input.title,
            description: input.description,
            project,
            created_at: ctx.now,
            expires_at: input.expires_at,
            status: input.status,
        })
    }

    fn apply(&mut self, input: SurveyWrite, ctx: &WriteCtx<'_>) -> Result<()> {
        require_text("title", &input.title)?;
        self.project = require_ref(&ctx.store.projects, input.project_id)?;
        self.title = input.title;
        self.description = input.description;
        self.expires_at = input.expires_at;
        self.status = input.status;
        Ok(())
    }

    fn to_write(&self) -> SurveyWrite {
        SurveyWrite {
            title: self.title.clone(),
            description: self.description.clone(),
            project_id: self.project,
            expires_at: self.expires_at,
            status: self.status,
        }
    }

    fn view(&self, store: &Store) -> SurveyView {
        SurveyView::build(self, store)
    }

    fn remove(store: &Store, id: Id) -> Option<Self> {
        store.delete_survey(id)
    }
}

fn default_required() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurveyQuestionWrite {
    pub survey_id: Id,
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Option<Value>,
    #[serde(default = "default_required")]
    pub required: bool,
}

impl SurveyQuestionWrite {
    fn validate(&self, store: &Store) -> Result<()> {
        require_ref(&store.surveys, self.survey_id)?;
        require_text("question", &self.question)?;
        match (&self.question_type, &self.options) {
            (QuestionType::Text, _) | (_, None) | (_, Some(Value::Null)) => Ok(()),
            (_, Some(Value::Array(choices))) if !choices.is_empty() => Ok(()),
            _ => Err(CsrError::BadRequest(
                "options must be a non-empty array for choice questions".into(),
            )),
        }
    }
}

impl Resource for SurveyQuestion {
    type Write = SurveyQuestionWrite;
    type View = SurveyQuestionView;

    fn table(store: &Store) -> &Table<Self> {
        &store.questions
    }

    fn create(id: Id, input: SurveyQuestionWrite, ctx: &WriteCtx<'_>) -> Result<Self> {
        input.validate(ctx.store)?;
        Ok(SurveyQuestion {
            id,
            survey: input.survey_id,
            question: input.question,
            question_type: input.question_type,
            options: input.options,
            required: input.required,
        })
    }

    fn apply(&mut self, input: SurveyQuestionWrite, ctx: &WriteCtx<'_>) -> Result<()> {
        input.validate(ctx.store)?;
        self.survey = input.survey_id;
        self.question = input.question;
        self.question_type = input.question_type;
        self.options = input.options;
        self.required = input.required;
        Ok(())
    }

    fn to_write(&self) -> SurveyQuestionWrite {
        SurveyQuestionWrite {
            survey_id: self.survey,
            question: self.question.clone(),
            question_type: self.question_type,
            options: self.options.clone(),
            required: self.required,
        }
    }

    fn view(&self, _store: &Store) -> SurveyQuestionView {
        SurveyQuestionView::from(self)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurveyResponseWrite {
    pub survey_id: Id,
    /// Defaults to the caller.
    #[serde(default)]
    pub respondent_id: Option<UserId>,
    pub responses: Value,
}

impl Resource for SurveyResponse {
    type Write = SurveyResponseWrite;
    type View = SurveyResponseView;

    fn table(store: &Store) -> &Table<Self> {
        &store.responses
    }

    fn create(id: Id, input: SurveyResponseWrite, ctx: &WriteCtx<'_>) -> Result<Self> {
        let survey = require_ref(&ctx.store.surveys, input.survey_id)?;
        let respondent = resolve_owner(ctx, input.respondent_id)?;
        Ok(SurveyResponse {
            id,
            survey,
            respondent,
            responses: input.responses,
            submitted_at: ctx.now,
        })
    }

    fn apply(&mut self, input: SurveyResponseWrite, ctx: &WriteCtx<'_>) -> Result<()> {
        self.survey = require_ref(&ctx.store.surveys, input.survey_id)?;
        self.respondent = resolve_owner(ctx, input.respondent_id.or(Some(self.respondent)))?;
        self.responses = input.responses;
        Ok(())
    }

    fn to_write(&self) -> SurveyResponseWrite {
        SurveyResponseWrite {
            survey_id: self.survey,
            respondent_id: Some(self.respondent),
            responses: self.responses.clone(),
        }
    }

    fn view(&self, store: &Store) -> SurveyResponseView {
        SurveyResponseView::build(self, store)
    }
}
