//! User directory. Assignments and comments take display names from here.

use std::collections::BTreeSet;

use flow_core::entities::User;
use flow_core::enums::EntityType;
use flow_core::errors::WorkflowError;

use crate::error::DatabaseError;
use crate::service::FlowService;

const SELECT_COLS: &str = "id, name";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

impl FlowService {
    /// Insert a user or rename an existing one.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` for an empty id or name.
    pub async fn upsert_user(&self, id: &str, name: &str) -> Result<User, DatabaseError> {
        let id = id.trim();
        let name = name.trim();
        if id.is_empty() {
            return Err(WorkflowError::validation("id", "user id is required").into());
        }
        if name.is_empty() {
            return Err(WorkflowError::validation("name", "user name is required").into());
        }

        self.db()
            .conn()
            .execute(
                "INSERT INTO users (id, name) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET name = excluded.name",
                libsql::params![id, name],
            )
            .await?;
        tracing::info!(user_id = id, "user saved");

        Ok(User {
            id: id.to_string(),
            name: name.to_string(),
        })
    }

    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        self.find_user(id)
            .await?
            .ok_or_else(|| WorkflowError::not_found(EntityType::User, id).into())
    }

    pub async fn list_users(&self, limit: u32) -> Result<Vec<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users ORDER BY name, id LIMIT {limit}"),
                (),
            )
            .await?;
        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }

    pub(crate) async fn find_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"), [id])
            .await?;
        rows.next().await?.as_ref().map(row_to_user).transpose()
    }

    /// Fail with a validation error on `field` unless every id is a known user.
    pub(crate) async fn require_users(
        &self,
        field: &str,
        ids: impl IntoIterator<Item = &str>,
    ) -> Result<(), DatabaseError> {
        let mut unknown = BTreeSet::new();
        for id in ids {
            if self.find_user(id).await?.is_none() {
                unknown.insert(id.to_string());
            }
        }
        if unknown.is_empty() {
            Ok(())
        } else {
            let list: Vec<String> = unknown.into_iter().collect();
            Err(WorkflowError::validation(field, format!("unknown user ids: {}", list.join(", "))).into())
        }
    }
}
