//! # Petition fetchers
//!
//! One method per remote petition operation. Each takes a [`RequestScope`] and
//! returns `Result<_, FetchError>`; failures of every kind come back as a
//! [`FetchError`] rather than a panic.
//!
//! The `*_petitions` / `edit_` / `delete_` variants also maintain a petition
//! [`MirrorStore`]:
//!
//! | Method | Remote call | Mirror effect on success |
//! |--------|-------------|--------------------------|
//! | [`refresh_petitions`](ApiClient::refresh_petitions) | `GET /petitions` | `replace_all` with the response |
//! | [`edit_petition`](ApiClient::edit_petition) | `PATCH /petitions/{id}` | `update_one` with the patch |
//! | [`delete_petition`](ApiClient::delete_petition) | `DELETE /petitions/{id}` | `remove_one` |
//!
//! Mirror writes are skipped once the scope is cancelled.

use reqwest::Method;
use serde::Deserialize;
use store::{
    CategoryInfo, DurableStorage, MirrorStore, NewPetition, NewSupport, NewSupportTier, Petition,
    PetitionPatch, SupportTierPatch, Supporter,
};

use crate::client::ApiClient;
use crate::error::FetchError;
use crate::fetch::RequestScope;
use crate::image::{ImageFetch, ImageUpload};
use crate::query::PetitionQuery;

/// One page of the petition listing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PetitionPage {
    pub petitions: Vec<Petition>,
    /// Total matches across all pages, when the server reports it.
    #[serde(default)]
    pub count: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPetition {
    pub petition_id: u32,
}

impl ApiClient {
    /// `GET /petitions` with the query's sparse parameters.
    pub async fn list_petitions(
        &self,
        query: &PetitionQuery,
        scope: &RequestScope,
    ) -> Result<PetitionPage, FetchError> {
        let params = query.params();
        let request = self
            .request(Method::GET, "/petitions")
            .query(params.as_slice());
        scope.run(self.send_json(request)).await
    }

    /// List petitions and replace the whole mirror with the result.
    pub async fn refresh_petitions<S: DurableStorage>(
        &self,
        query: &PetitionQuery,
        mirror: &MirrorStore<Petition, S>,
        scope: &RequestScope,
    ) -> Result<PetitionPage, FetchError> {
        let page = self.list_petitions(query, scope).await?;
        scope.ensure_active()?;
        mirror.replace_all(page.petitions.clone())?;
        Ok(page)
    }

    pub async fn get_petition(
        &self,
        petition_id: u32,
        scope: &RequestScope,
    ) -> Result<Petition, FetchError> {
        let request = self.request(Method::GET, &format!("/petitions/{petition_id}"));
        scope.run(self.send_json(request)).await
    }

    pub async fn create_petition(
        &self,
        petition: &NewPetition,
        scope: &RequestScope,
    ) -> Result<CreatedPetition, FetchError> {
        let request = self.request(Method::POST, "/petitions").json(petition);
        scope.run(self.send_json(request)).await
    }

    pub async fn patch_petition(
        &self,
        petition_id: u32,
        patch: &PetitionPatch,
        scope: &RequestScope,
    ) -> Result<(), FetchError> {
        let request = self
            .request(Method::PATCH, &format!("/petitions/{petition_id}"))
            .json(patch);
        scope.run(self.send_empty(request)).await
    }

    /// Patch a petition and apply the same edit to its mirrored copy.
    pub async fn edit_petition<S: DurableStorage>(
        &self,
        petition_id: u32,
        patch: &PetitionPatch,
        mirror: &MirrorStore<Petition, S>,
        scope: &RequestScope,
    ) -> Result<(), FetchError> {
        self.patch_petition(petition_id, patch, scope).await?;
        scope.ensure_active()?;
        mirror.update_one(petition_id, |p| patch.apply(p))?;
        Ok(())
    }

    /// Delete a petition and drop it from the mirror.
    pub async fn delete_petition<S: DurableStorage>(
        &self,
        petition_id: u32,
        mirror: &MirrorStore<Petition, S>,
        scope: &RequestScope,
    ) -> Result<(), FetchError> {
        let request = self.request(Method::DELETE, &format!("/petitions/{petition_id}"));
        scope.run(self.send_empty(request)).await?;
        scope.ensure_active()?;
        mirror.remove_one(petition_id)?;
        Ok(())
    }

    pub async fn list_categories(
        &self,
        scope: &RequestScope,
    ) -> Result<Vec<CategoryInfo>, FetchError> {
        let request = self.request(Method::GET, "/petitions/categories");
        scope.run(self.send_json(request)).await
    }

    /// Never fails; see [`ImageFetch`].
    pub async fn petition_image(&self, petition_id: u32, scope: &RequestScope) -> ImageFetch {
        let path = format!("/petitions/{petition_id}/image");
        scope
            .run(async { Ok(self.fetch_image(&path).await) })
            .await
            .unwrap_or(ImageFetch::NoImage)
    }

    pub async fn set_petition_image(
        &self,
        petition_id: u32,
        image: &ImageUpload,
        scope: &RequestScope,
    ) -> Result<(), FetchError> {
        let request = Self::with_image(
            self.request(Method::PUT, &format!("/petitions/{petition_id}/image")),
            image,
        );
        scope.run(self.send_empty(request)).await
    }

    pub async fn add_support_tier(
        &self,
        petition_id: u32,
        tier: &NewSupportTier,
        scope: &RequestScope,
    ) -> Result<(), FetchError> {
        let request = self
            .request(Method::PUT, &format!("/petitions/{petition_id}/supportTiers"))
            .json(tier);
        scope.run(self.send_empty(request)).await
    }

    pub async fn patch_support_tier(
        &self,
        petition_id: u32,
        tier_id: u32,
        patch: &SupportTierPatch,
        scope: &RequestScope,
    ) -> Result<(), FetchError> {
        let request = self
            .request(
                Method::PATCH,
                &format!("/petitions/{petition_id}/supportTiers/{tier_id}"),
            )
            .json(patch);
        scope.run(self.send_empty(request)).await
    }

    pub async fn delete_support_tier(
        &self,
        petition_id: u32,
        tier_id: u32,
        scope: &RequestScope,
    ) -> Result<(), FetchError> {
        let request = self.request(
            Method::DELETE,
            &format!("/petitions/{petition_id}/supportTiers/{tier_id}"),
        );
        scope.run(self.send_empty(request)).await
    }

    pub async fn list_supporters(
        &self,
        petition_id: u32,
        scope: &RequestScope,
    ) -> Result<Vec<Supporter>, FetchError> {
        let request = self.request(Method::GET, &format!("/petitions/{petition_id}/supporters"));
        scope.run(self.send_json(request)).await
    }

    /// Pledge support at one of the petition's tiers.
    pub async fn support_petition(
        &self,
        petition_id: u32,
        support: &NewSupport,
        scope: &RequestScope,
    ) -> Result<(), FetchError> {
        let request = self
            .request(Method::POST, &format!("/petitions/{petition_id}/supporters"))
            .json(support);
        scope.run(self.send_empty(request)).await
    }
}
