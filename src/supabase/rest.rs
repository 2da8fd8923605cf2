use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{error_from_response, Credential, SupabaseClient, SupabaseError};
use crate::models::{tables, NewUserProfile, UserProfile};

/// Table access through PostgREST under a single credential.
///
/// The credential decides which rows row-level policy lets through; the store
/// never picks one itself.
pub struct ProfileStore<'a> {
    client: &'a SupabaseClient,
    credential: Credential,
}

impl<'a> ProfileStore<'a> {
    pub(super) fn new(client: &'a SupabaseClient, credential: Credential) -> Self {
        Self { client, credential }
    }

    /// `GET /rest/v1/{table}?select=*&{column}=eq.{value}`
    pub async fn select_eq(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<Vec<Value>, SupabaseError> {
        let mut url = self.client.endpoint(&format!("rest/v1/{}", table))?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair(column, &format!("eq.{}", value));

        let (apikey, bearer) = self.client.keys_for(&self.credential);
        let response = self
            .client
            .http
            .get(url)
            .header("apikey", apikey)
            .bearer_auth(bearer)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json::<Vec<Value>>().await?)
    }

    /// Raw `users` row for an identity, or `None` when no row is visible.
    pub async fn find_user_row(&self, id: &str) -> Result<Option<Value>, SupabaseError> {
        let rows = self.select_eq(tables::USERS, "id", id).await?;
        Ok(rows.into_iter().next())
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<UserProfile>, SupabaseError> {
        match self.find_user_row(id).await? {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    pub async fn insert_user(&self, record: &NewUserProfile) -> Result<UserProfile, SupabaseError> {
        let row = self.insert_related(tables::USERS, record).await?;
        Ok(serde_json::from_value(row)?)
    }

    /// Inserts one row and returns the stored representation.
    pub async fn insert_related<T: Serialize>(
        &self,
        table: &str,
        record: &T,
    ) -> Result<Value, SupabaseError> {
        let url = self.client.endpoint(&format!("rest/v1/{}", table))?;
        let (apikey, bearer) = self.client.keys_for(&self.credential);

        debug!(table, credential = self.credential.label(), "inserting row");

        let response = self
            .client
            .http
            .post(url)
            .header("apikey", apikey)
            .bearer_auth(bearer)
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let rows = response.json::<Vec<Value>>().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| SupabaseError::EmptyInsert(table.to_string()))
    }

    /// Inserts each record with its own request, in order.
    ///
    /// Stops at the first failure; rows written before it stay written.
    pub async fn insert_many<T: Serialize>(
        &self,
        table: &str,
        records: &[T],
    ) -> Result<Vec<Value>, SupabaseError> {
        let mut inserted = Vec::with_capacity(records.len());
        for record in records {
            inserted.push(self.insert_related(table, record).await?);
        }
        Ok(inserted)
    }
}
