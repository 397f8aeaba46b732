//! Listing hydration: one petition page plus the images each card shows.

use futures::future::join_all;
use store::Petition;

use crate::client::ApiClient;
use crate::error::FetchError;
use crate::fetch::RequestScope;
use crate::image::ImageFetch;
use crate::query::PetitionQuery;

/// A petition together with its hero image and its owner's avatar.
#[derive(Clone, Debug, PartialEq)]
pub struct PetitionCard {
    pub petition: Petition,
    pub image: ImageFetch,
    pub owner_image: ImageFetch,
}

impl ApiClient {
    /// List petitions, then fetch every card's images concurrently.
    ///
    /// Image downloads cannot fail the listing; a card whose image is missing
    /// just carries [`ImageFetch::NoImage`].
    pub async fn list_with_images(
        &self,
        query: &PetitionQuery,
        scope: &RequestScope,
    ) -> Result<Vec<PetitionCard>, FetchError> {
        let page = self.list_petitions(query, scope).await?;

        let cards = page.petitions.into_iter().map(|petition| async move {
            let (image, owner_image) = futures::join!(
                self.petition_image(petition.petition_id, scope),
                self.user_image(petition.owner_id, scope),
            );
            PetitionCard {
                petition,
                image,
                owner_image,
            }
        });
        let cards = join_all(cards).await;

        scope.ensure_active()?;
        tracing::debug!("Hydrated {} petition cards", cards.len());
        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionHandle;
    use crate::settings::ApiSettings;
    use crate::test_server;
    use axum::extract::Path;
    use axum::http::{header, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    fn router() -> Router {
        Router::new()
            .route(
                "/petitions",
                get(|| async {
                    let row = |id: u32, owner: u32| {
                        json!({
                            "petitionId": id,
                            "title": format!("Petition {id}"),
                            "categoryId": 2,
                            "creationDate": "2026-10-14T09:30:00Z",
                            "ownerId": owner,
                            "ownerFirstName": "Ana",
                            "ownerLastName": "Reyes"
                        })
                    };
                    Json(json!({ "petitions": [row(1, 10), row(2, 20)], "count": 2 }))
                }),
            )
            .route(
                "/petitions/:id/image",
                get(|Path(id): Path<u32>| async move {
                    match id {
                        1 => Ok(([(header::CONTENT_TYPE, "image/png")], vec![1u8])),
                        _ => Err(StatusCode::NOT_FOUND),
                    }
                }),
            )
            .route(
                "/users/:id/image",
                get(|Path(id): Path<u32>| async move {
                    match id {
                        20 => Ok(([(header::CONTENT_TYPE, "image/gif")], vec![2u8])),
                        _ => Err(StatusCode::NOT_FOUND),
                    }
                }),
            )
    }

    #[tokio::test]
    async fn test_cards_carry_both_images() {
        let base_url = test_server::serve(router()).await;
        let client = ApiClient::new(
            &ApiSettings {
                base_url,
                ..ApiSettings::default()
            },
            SessionHandle::default(),
        )
        .unwrap();

        let cards = client
            .list_with_images(&PetitionQuery::new(), &RequestScope::new())
            .await
            .unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].petition.petition_id, 1);
        assert!(cards[0].image.is_found());
        assert_eq!(cards[0].owner_image, ImageFetch::NoImage);
        assert_eq!(cards[1].image, ImageFetch::NoImage);
        assert_eq!(
            cards[1].owner_image.blob().unwrap().content_type,
            "image/gif"
        );
    }
}
