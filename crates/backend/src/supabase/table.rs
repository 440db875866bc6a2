//! Table-style CRUD against the `/rest/v1` surface.
//!
//! Filters are equality-only (`?column=eq.value`), which is all the
//! services in this crate need. Write calls opt into row representation
//! via the `Prefer` header when the caller wants the inserted row back.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{SupabaseClient, SupabaseError};

/// Accept header requesting exactly one row as a bare object.
const ACCEPT_SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

impl SupabaseClient {
    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url())
    }

    /// Select all rows of a table.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError`] if the request fails or the response does
    /// not deserialize into `T`.
    pub async fn select_all<T: DeserializeOwned>(
        &self,
        table: &str,
    ) -> Result<Vec<T>, SupabaseError> {
        self.select_match(table, &[]).await
    }

    /// Select rows matching all given equality filters.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError`] if the request fails or the response does
    /// not deserialize into `T`.
    pub async fn select_match<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<T>, SupabaseError> {
        let query = eq_query(filters);
        let response = self
            .http
            .get(self.table_url(table))
            .query(&[("select", "*")])
            .query(&query)
            .send()
            .await?;
        let response = Self::expect_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| SupabaseError::Parse(e.to_string()))
    }

    /// Select at most one row by an equality filter.
    ///
    /// Absence is not an error: a lookup that matches zero rows returns
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError`] on transport failure, on API errors other
    /// than "no rows", or if the row does not deserialize into `T`.
    pub async fn select_one_match<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, &str)],
    ) -> Result<Option<T>, SupabaseError> {
        let query = eq_query(filters);
        let response = self
            .http
            .get(self.table_url(table))
            .query(&[("select", "*")])
            .query(&query)
            .header("Accept", ACCEPT_SINGLE_OBJECT)
            .send()
            .await?;

        match Self::expect_success(response).await {
            Ok(response) => {
                let row = response
                    .json()
                    .await
                    .map_err(|e| SupabaseError::Parse(e.to_string()))?;
                Ok(Some(row))
            }
            Err(SupabaseError::NotFound) => Ok(None),
            Err(other) => Err(other),
        }
    }

    /// Count the rows of a table without fetching them.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError`] if the request fails or the service omits
    /// the `Content-Range` header.
    pub async fn count(&self, table: &str) -> Result<u64, SupabaseError> {
        let response = self
            .http
            .head(self.table_url(table))
            .query(&[("select", "id")])
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = Self::expect_success(response).await?;

        let range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| SupabaseError::Parse("missing Content-Range header".to_string()))?;

        parse_content_range_total(range)
            .ok_or_else(|| SupabaseError::Parse(format!("unparseable Content-Range: {range}")))
    }

    /// Insert a single row and return the stored representation.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::Conflict`] when a uniqueness constraint
    /// rejects the row, or another [`SupabaseError`] on any other failure.
    pub async fn insert_returning<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        row: &B,
    ) -> Result<T, SupabaseError> {
        self.write_returning(table, row, "return=representation")
            .await
    }

    /// Insert a single row with merge-duplicates semantics and return the
    /// stored representation.
    ///
    /// A second call with the same primary key updates the existing row
    /// instead of failing, which is what makes callers idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError`] on any request or deserialization failure.
    pub async fn upsert_returning<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        row: &B,
    ) -> Result<T, SupabaseError> {
        self.write_returning(table, row, "resolution=merge-duplicates,return=representation")
            .await
    }

    async fn write_returning<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        row: &B,
        prefer: &str,
    ) -> Result<T, SupabaseError> {
        let response = self
            .http
            .post(self.table_url(table))
            .header("Prefer", prefer)
            .header("Accept", ACCEPT_SINGLE_OBJECT)
            .json(row)
            .send()
            .await?;
        let response = Self::expect_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| SupabaseError::Parse(e.to_string()))
    }

    /// Insert a batch of rows, returning the stored representations.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError`] on any request or deserialization failure.
    /// The batch is atomic on the service side: either all rows land or
    /// none do.
    pub async fn insert_many_returning<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        rows: &[B],
    ) -> Result<Vec<T>, SupabaseError> {
        let response = self
            .http
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;
        let response = Self::expect_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| SupabaseError::Parse(e.to_string()))
    }

    /// Insert a batch of rows without fetching them back.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError`] on any request failure.
    pub async fn insert_many<B: Serialize>(
        &self,
        table: &str,
        rows: &[B],
    ) -> Result<(), SupabaseError> {
        let response = self
            .http
            .post(self.table_url(table))
            .json(rows)
            .send()
            .await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    /// Update rows matching the filters and return the (single) updated row.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::NotFound`] if no row matched, or another
    /// [`SupabaseError`] on any other failure.
    pub async fn update_match_returning<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        filters: &[(&str, &str)],
        changes: &B,
    ) -> Result<T, SupabaseError> {
        let query = eq_query(filters);
        let response = self
            .http
            .patch(self.table_url(table))
            .query(&query)
            .header("Prefer", "return=representation")
            .header("Accept", ACCEPT_SINGLE_OBJECT)
            .json(changes)
            .send()
            .await?;
        let response = Self::expect_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| SupabaseError::Parse(e.to_string()))
    }

    /// Delete rows matching all given equality filters.
    ///
    /// Deleting zero rows is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError`] on any request failure.
    pub async fn delete_match(
        &self,
        table: &str,
        filters: &[(&str, &str)],
    ) -> Result<(), SupabaseError> {
        let query = eq_query(filters);
        let response = self
            .http
            .delete(self.table_url(table))
            .query(&query)
            .send()
            .await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    /// Invoke a named remote procedure.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError`] on any request failure.
    pub async fn rpc<B: Serialize>(&self, function: &str, args: &B) -> Result<(), SupabaseError> {
        let url = format!("{}/rest/v1/rpc/{function}", self.base_url());
        let response = self.http.post(url).json(args).send().await?;
        Self::expect_success(response).await?;
        Ok(())
    }
}

/// Render equality filters as PostgREST query pairs.
fn eq_query(filters: &[(&str, &str)]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|(column, value)| ((*column).to_string(), format!("eq.{value}")))
        .collect()
}

/// Extract the total from a `Content-Range` header value like `0-24/57`
/// or `*/0`.
fn parse_content_range_total(range: &str) -> Option<u64> {
    range.rsplit_once('/')?.1.parse().ok()
}
