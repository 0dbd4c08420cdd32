//! Notifications and funding/resource requests: rows owned by one user.

use serde::{Deserialize, Serialize};

use csrhub_core::error::Result;
use csrhub_core::model::{Id, Notification, Request, RequestType, UserId};

use super::{require_text, resolve_owner};
use crate::api::resource::{Resource, WriteCtx};
use crate::store::{Store, Table};
use crate::views::{NotificationView, RequestView};

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationWrite {
    /// Defaults to the caller.
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    #[serde(default)]
    pub read: bool,
}

impl Resource for Notification {
    type Write = NotificationWrite;
    type View = NotificationView;

    fn table(store: &Store) -> &Table<Self> {
        &store.notifications
    }

    fn create(id: Id, input: NotificationWrite, ctx: &WriteCtx<'_>) -> Result<Self> {
        require_text("message", &input.message)?;
        let user = resolve_owner(ctx, input.user_id)?;
        Ok(Notification {
            id,
            user,
            message: input.message,
            notification_type: input.notification_type,
            timestamp: ctx.now,
            read: input.read,
        })
    }

    fn apply(&mut self, input: NotificationWrite, ctx: &WriteCtx<'_>) -> Result<()> {
        require_text("message", &input.message)?;
        self.user = resolve_owner(ctx, input.user_id.or(Some(self.user)))?;
        self.message = input.message;
        self.notification_type = input.notification_type;
        self.read = input.read;
        Ok(())
    }

    fn to_write(&self) -> NotificationWrite {
        NotificationWrite {
            user_id: Some(self.user),
            message: self.message.clone(),
            notification_type: self.notification_type.clone(),
            read: self.read,
        }
    }

    fn view(&self, store: &Store) -> NotificationView {
        NotificationView::build(self, store)
    }
}

fn default_status() -> String {
    "pending".into()
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestWrite {
    #[serde(rename = "type")]
    pub request_type: RequestType,
    /// Defaults to the caller.
    #[serde(default)]
    pub requester_id: Option<UserId>,
    pub facility: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub description: String,
}

impl Resource for Request {
    type Write = RequestWrite;
    type View = RequestView;

    fn table(store: &Store) -> &Table<Self> {
        &store.requests
    }

    fn create(id: Id, input: RequestWrite, ctx: &WriteCtx<'_>) -> Result<Self> {
        require_text("facility", &input.facility)?;
        let requester = resolve_owner(ctx, input.requester_id)?;
        Ok(Request {
            id,
            request_type: input.request_type,
            requester,
            facility: input.facility,
            status: input.status,
            submitted_at: ctx.now,
            description: input.description,
        })
    }

    fn apply(&mut self, input: RequestWrite, ctx: &WriteCtx<'_>) -> Result<()> {
        require_text("facility", &input.facility)?;
        self.requester = resolve_owner(ctx, input.requester_id.or(Some(self.requester)))?;
        self.request_type = input.request_type;
        self.facility = input.facility;
        self.status = input.status;
        self.description = input.description;
        Ok(())
    }

    fn to_write(&self) -> RequestWrite {
        RequestWrite {
            request_type: self.request_type,
            requester_id: Some(self.requester),
            facility: self.facility.clone(),
            status: self.status.clone(),
            description: self.description.clone(),
        }
    }

    fn view(&self, store: &Store) -> RequestView {
        RequestView::build(self, store)
    }
}
