use serde::{Deserialize, Serialize};

use csrhub_core::error::{CsrError, Result};
use csrhub_core::model::{Id, Role, User};

use super::require_text;
use crate::api::resource::{Resource, WriteCtx};
use crate::store::{Store, Table};
use crate::views::UserView;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserWrite {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl UserWrite {
    fn validate(&self) -> Result<()> {
        require_text("username", &self.username)?;
        if !self.email.is_empty() && !self.email.contains('@') {
            return Err(CsrError::BadRequest(format!("invalid email: {}", self.email)));
        }
        Ok(())
    }
}

impl Resource for User {
    type Write = UserWrite;
    type View = UserView;

    fn table(store: &Store) -> &Table<Self> {
        &store.users
    }

    // Accounts created over the API are never superusers.
    fn create(id: Id, input: UserWrite, ctx: &WriteCtx<'_>) -> Result<Self> {
        input.validate()?;
        ctx.store.claim_username(&input.username, id)?;
        Ok(User {
            id,
            username: input.username,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            role: input.role,
            avatar: input.avatar,
            is_superuser: false,
        })
    }

    fn apply(&mut self, input: UserWrite, ctx: &WriteCtx<'_>) -> Result<()> {
        input.validate()?;
        if input.username != self.username {
            ctx.store.claim_username(&input.username, self.id)?;
            ctx.store.release_username(&self.username, self.id);
        }
        self.username = input.username;
        self.email = input.email;
        self.first_name = input.first_name;
        self.last_name = input.last_name;
        self.role = input.role;
        self.avatar = input.avatar;
        Ok(())
    }

    fn to_write(&self) -> UserWrite {
        UserWrite {
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
            avatar: self.avatar.clone(),
        }
    }

    fn view(&self, _store: &Store) -> UserView {
        UserView::from(self)
    }

    fn remove(store: &Store, id: Id) -> Option<Self> {
        store.delete_user(id)
    }
}
