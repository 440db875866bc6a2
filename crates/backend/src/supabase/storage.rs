//! Object storage calls against the `/storage/v1` surface.

use super::{SupabaseClient, SupabaseError};

impl SupabaseClient {
    /// Upload an object to a bucket.
    ///
    /// With `upsert` set, re-uploading to the same path replaces the
    /// object instead of failing.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError`] on any request failure.
    pub async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<(), SupabaseError> {
        let url = format!("{}/storage/v1/object/{bucket}/{path}", self.base_url());
        let response = self
            .http
            .post(url)
            .header("Content-Type", content_type)
            .header("x-upsert", if upsert { "true" } else { "false" })
            .body(bytes)
            .send()
            .await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    /// The public URL an uploaded object is served from.
    ///
    /// Pure URL construction; the bucket must be marked public on the
    /// service side for the URL to resolve.
    #[must_use]
    pub fn public_object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{path}", self.base_url())
    }
}
