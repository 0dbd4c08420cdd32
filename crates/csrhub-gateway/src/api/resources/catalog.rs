//! Regions and MOUs: reference data open to every authenticated caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use csrhub_core::error::Result;
use csrhub_core::model::{Id, Mou, Region};

use super::{require_span, require_text};
use crate::api::resource::{Resource, WriteCtx};
use crate::store::{Store, Table};
use crate::views::{MouView, RegionView};

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionWrite {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub project_count: u32,
}

impl Resource for Region {
    type Write = RegionWrite;
    type View = RegionView;

    fn table(store: &Store) -> &Table<Self> {
        &store.regions
    }

    fn create(id: Id, input: RegionWrite, _ctx: &WriteCtx<'_>) -> Result<Self> {
        require_text("name", &input.name)?;
        Ok(Region {
            id,
            name: input.name,
            country: input.country,
            project_count: input.project_count,
        })
    }

    fn apply(&mut self, input: RegionWrite, _ctx: &WriteCtx<'_>) -> Result<()> {
        require_text("name", &input.name)?;
        self.name = input.name;
        self.country = input.country;
        self.project_count = input.project_count;
        Ok(())
    }

    fn to_write(&self) -> RegionWrite {
        RegionWrite {
            name: self.name.clone(),
            country: self.country.clone(),
            project_count: self.project_count,
        }
    }

    fn view(&self, _store: &Store) -> RegionView {
        RegionView::from(self)
    }

    fn remove(store: &Store, id: Id) -> Option<Self> {
        store.delete_region(id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MouWrite {
    pub title: String,
    pub organization_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub document_url: String,
}

impl MouWrite {
    fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        require_text("organization_name", &self.organization_name)?;
        require_span(self.start_date, self.end_date)
    }
}

impl Resource for Mou {
    type Write = MouWrite;
    type View = MouView;

    fn table(store: &Store) -> &Table<Self> {
        &store.mous
    }

    fn create(id: Id, input: MouWrite, _ctx: &WriteCtx<'_>) -> Result<Self> {
        input.validate()?;
        Ok(Mou {
            id,
            title: input.title,
            organization_name: input.organization_name,
            start_date: input.start_date,
            end_date: input.end_date,
            status: input.status,
            description: input.description,
            document_url: input.document_url,
        })
    }

    fn apply(&mut self, input: MouWrite, _ctx: &WriteCtx<'_>) -> Result<()> {
        input.validate()?;
        self.title = input.title;
        self.organization_name = input.organization_name;
        self.start_date = input.start_date;
        self.end_date = input.end_date;
        self.status = input.status;
        self.description = input.description;
        self.document_url = input.document_url;
        Ok(())
    }

    fn to_write(&self) -> MouWrite {
        MouWrite {
            title: self.title.clone(),
            organization_name: self.organization_name.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status.clone(),
            description: self.description.clone(),
            document_url: self.document_url.clone(),
        }
    }

    fn view(&self, _store: &Store) -> MouView {
        MouView::from(self)
    }

    fn remove(store: &Store, id: Id) -> Option<Self> {
        store.delete_mou(id)
    }
}
