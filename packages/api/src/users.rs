//! User account fetchers.
//!
//! Login and registration here only perform the remote call; session state is
//! driven by [`Session`](crate::session::Session), which wraps them.

use reqwest::Method;
use store::{Credentials, DurableStorage, MirrorStore, NewUser, User, UserPatch};

use crate::client::ApiClient;
use crate::error::FetchError;
use crate::fetch::RequestScope;
use crate::image::{ImageFetch, ImageUpload};
use crate::session::{LoginResponse, RegisterResponse};

impl ApiClient {
    pub async fn register(
        &self,
        new_user: &NewUser,
        scope: &RequestScope,
    ) -> Result<RegisterResponse, FetchError> {
        let request = self.request(Method::POST, "/users/register").json(new_user);
        scope.run(self.send_json(request)).await
    }

    pub async fn login(
        &self,
        credentials: &Credentials,
        scope: &RequestScope,
    ) -> Result<LoginResponse, FetchError> {
        let request = self.request(Method::POST, "/users/login").json(credentials);
        scope.run(self.send_json(request)).await
    }

    pub async fn logout(&self, scope: &RequestScope) -> Result<(), FetchError> {
        let request = self.request(Method::POST, "/users/logout");
        scope.run(self.send_empty(request)).await
    }

    /// `GET /users/{id}`. The email is only present when viewing yourself.
    pub async fn get_user(&self, user_id: u32, scope: &RequestScope) -> Result<User, FetchError> {
        let request = self.request(Method::GET, &format!("/users/{user_id}"));
        let mut user: User = scope.run(self.send_json(request)).await?;
        user.user_id = user_id;
        Ok(user)
    }

    /// Fetch a user and insert or replace it in the user mirror.
    pub async fn fetch_user_into<S: DurableStorage>(
        &self,
        user_id: u32,
        mirror: &MirrorStore<User, S>,
        scope: &RequestScope,
    ) -> Result<User, FetchError> {
        let user = self.get_user(user_id, scope).await?;
        scope.ensure_active()?;
        mirror.upsert_one(user.clone())?;
        Ok(user)
    }

    pub async fn patch_user(
        &self,
        user_id: u32,
        patch: &UserPatch,
        scope: &RequestScope,
    ) -> Result<(), FetchError> {
        let request = self
            .request(Method::PATCH, &format!("/users/{user_id}"))
            .json(patch);
        scope.run(self.send_empty(request)).await
    }

    /// Patch a user and apply the same edit to the mirrored copy.
    pub async fn edit_user<S: DurableStorage>(
        &self,
        user_id: u32,
        patch: &UserPatch,
        mirror: &MirrorStore<User, S>,
        scope: &RequestScope,
    ) -> Result<(), FetchError> {
        self.patch_user(user_id, patch, scope).await?;
        scope.ensure_active()?;
        mirror.update_one(user_id, |user| patch.apply(user))?;
        Ok(())
    }

    /// Never fails; see [`ImageFetch`].
    pub async fn user_image(&self, user_id: u32, scope: &RequestScope) -> ImageFetch {
        let path = format!("/users/{user_id}/image");
        scope
            .run(async { Ok(self.fetch_image(&path).await) })
            .await
            .unwrap_or(ImageFetch::NoImage)
    }

    pub async fn set_user_image(
        &self,
        user_id: u32,
        image: &ImageUpload,
        scope: &RequestScope,
    ) -> Result<(), FetchError> {
        let request = Self::with_image(
            self.request(Method::PUT, &format!("/users/{user_id}/image")),
            image,
        );
        scope.run(self.send_empty(request)).await
    }

    pub async fn delete_user_image(
        &self,
        user_id: u32,
        scope: &RequestScope,
    ) -> Result<(), FetchError> {
        let request = self.request(Method::DELETE, &format!("/users/{user_id}/image"));
        scope.run(self.send_empty(request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageKind;
    use crate::session::Session;
    use crate::settings::ApiSettings;
    use crate::test_server;
    use axum::body::Bytes;
    use axum::extract::Path;
    use axum::http::{header, HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use store::storage::{TOKEN_KEY, USERS_KEY, USER_ID_KEY};
    use store::MemoryStorage;

    fn is_self(headers: &HeaderMap) -> bool {
        headers.get("X-Authorization").is_some_and(|v| v == "tok-1")
    }

    async fn get_user(headers: HeaderMap, Path(id): Path<u32>) -> Result<Json<Value>, StatusCode> {
        if id != 1 {
            return Err(StatusCode::NOT_FOUND);
        }
        let mut user = json!({ "firstName": "Ana", "lastName": "Reyes" });
        if is_self(&headers) {
            user["email"] = json!("a@x.com");
        }
        Ok(Json(user))
    }

    async fn patch_user(headers: HeaderMap, Json(body): Json<Value>) -> StatusCode {
        if !is_self(&headers) {
            return StatusCode::UNAUTHORIZED;
        }
        // Only the changed field is sent
        if body == json!({ "email": "c@x.com" }) {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        }
    }

    async fn put_image(headers: HeaderMap, body: Bytes) -> StatusCode {
        let content_type = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok());
        match (is_self(&headers), content_type) {
            (false, _) => StatusCode::UNAUTHORIZED,
            (true, Some("image/gif")) if !body.is_empty() => StatusCode::OK,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn router() -> Router {
        Router::new()
            .route("/users/:id", get(get_user).patch(patch_user))
            .route(
                "/users/:id/image",
                get(|| async { ([(header::CONTENT_TYPE, "image/jpeg")], vec![9u8, 9]) })
                    .put(put_image)
                    .delete(|headers: HeaderMap| async move {
                        if is_self(&headers) {
                            StatusCode::OK
                        } else {
                            StatusCode::UNAUTHORIZED
                        }
                    }),
            )
    }

    async fn client(signed_in: bool) -> ApiClient {
        let base_url = test_server::serve(router()).await;
        let storage = MemoryStorage::new();
        if signed_in {
            storage.set(TOKEN_KEY, "tok-1").unwrap();
            storage.set(USER_ID_KEY, "1").unwrap();
        }
        let session = Session::restore(storage);
        let settings = ApiSettings {
            base_url,
            ..ApiSettings::default()
        };
        ApiClient::new(&settings, session.handle()).unwrap()
    }

    fn mirrored_user(email: &str) -> User {
        User {
            user_id: 1,
            email: email.into(),
            first_name: "Ana".into(),
            last_name: "Reyes".into(),
            image_filename: None,
            password: None,
            auth_token: None,
        }
    }

    #[tokio::test]
    async fn test_get_user_email_only_for_self() {
        let scope = RequestScope::new();

        let anonymous = client(false).await;
        let user = anonymous.get_user(1, &scope).await.unwrap();
        assert_eq!(user.user_id, 1);
        assert_eq!(user.display_name(), "Ana Reyes");
        assert!(user.email.is_empty());

        let me = client(true).await;
        let user = me.get_user(1, &scope).await.unwrap();
        assert_eq!(user.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_fetch_user_into_upserts() {
        let client = client(true).await;
        let storage = MemoryStorage::new();
        let mirror: MirrorStore<User, _> = MirrorStore::load(storage, USERS_KEY);

        client
            .fetch_user_into(1, &mirror, &RequestScope::new())
            .await
            .unwrap();
        client
            .fetch_user_into(1, &mirror, &RequestScope::new())
            .await
            .unwrap();
        assert_eq!(mirror.len(), 1);
        assert_eq!(mirror.get(1).unwrap().first_name, "Ana");

        let err = client
            .fetch_user_into(2, &mirror, &RequestScope::new())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(mirror.len(), 1);
    }

    #[tokio::test]
    async fn test_edit_user_updates_mirror() {
        let storage = MemoryStorage::new();
        let mirror: MirrorStore<User, _> = MirrorStore::load(storage.clone(), USERS_KEY);
        mirror.replace_all(vec![mirrored_user("a@x.com")]).unwrap();
        let patch = UserPatch::email("c@x.com");

        let anonymous = client(false).await;
        let err = anonymous
            .edit_user(1, &patch, &mirror, &RequestScope::new())
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(mirror.get(1).unwrap().email, "a@x.com");

        let me = client(true).await;
        me.edit_user(1, &patch, &mirror, &RequestScope::new())
            .await
            .unwrap();
        assert_eq!(mirror.get(1).unwrap().email, "c@x.com");

        let reopened: MirrorStore<User, _> = MirrorStore::load(storage, USERS_KEY);
        assert_eq!(reopened.get(1).unwrap().email, "c@x.com");
    }

    #[tokio::test]
    async fn test_cancelled_edit_skips_mirror() {
        let mirror: MirrorStore<User, _> = MirrorStore::load(MemoryStorage::new(), USERS_KEY);
        mirror.replace_all(vec![mirrored_user("a@x.com")]).unwrap();
        let scope = RequestScope::new();
        scope.cancel();

        let me = client(true).await;
        let err = me
            .edit_user(1, &UserPatch::email("c@x.com"), &mirror, &scope)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(mirror.get(1).unwrap().email, "a@x.com");
    }

    #[tokio::test]
    async fn test_user_image_roundtrip() {
        let me = client(true).await;
        let scope = RequestScope::new();

        let image = me.user_image(1, &scope).await;
        assert_eq!(image.blob().unwrap().content_type, "image/jpeg");

        let upload = ImageUpload::new(ImageKind::Gif, b"GIF89a".to_vec());
        me.set_user_image(1, &upload, &scope).await.unwrap();
        me.delete_user_image(1, &scope).await.unwrap();

        let anonymous = client(false).await;
        let err = anonymous
            .set_user_image(1, &upload, &scope)
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }
}
