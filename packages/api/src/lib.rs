//! # API crate: remote petition service client
//!
//! Everything that talks to the petition service over HTTP lives here, along
//! with the session state machine that decides which requests carry a token.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | `reqwest` client, base URL, token attachment, status handling |
//! | [`error`] | [`FetchError`], the single failure type every fetcher returns |
//! | [`fetch`] | [`RequestScope`] cancellation and the success/error observer contract |
//! | [`query`] | [`PetitionQuery`] builder producing sparse listing parameters |
//! | [`image`] | Typed image uploads and [`ImageFetch`] download results |
//! | [`petitions`] | Petition, category, support tier and supporter fetchers |
//! | [`users`] | Account, profile and profile image fetchers |
//! | [`hydrate`] | Listing plus concurrent per-card image fetches |
//! | [`session`] | Anonymous/Authenticated state with durable token persistence |
//! | [`settings`] | Layered configuration (defaults, `petitions.toml`, environment) |
//!
//! Fetchers that mirror server state take a [`store::MirrorStore`] and only
//! write to it after the request succeeded and the scope is still active.

pub mod client;
pub mod error;
pub mod fetch;
pub mod hydrate;
pub mod image;
pub mod petitions;
pub mod query;
pub mod session;
pub mod settings;
pub mod users;

#[cfg(test)]
mod test_server;

pub use client::ApiClient;
pub use error::FetchError;
pub use fetch::{deliver, observe, FetchObserver, FetchState, RequestScope};
pub use hydrate::PetitionCard;
pub use image::{ImageBlob, ImageFetch, ImageKind, ImageKindError, ImageUpload};
pub use petitions::{CreatedPetition, PetitionPage};
pub use query::{PetitionQuery, QueryParams, SortOrder, UnknownSortOrder};
pub use session::{LoginResponse, RegisterResponse, Session, SessionHandle, SessionState};
pub use settings::Settings;
