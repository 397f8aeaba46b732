//! # Domain models for petitions and users
//!
//! Defines the records exchanged with the petitions API and cached locally by
//! [`crate::MirrorStore`]. Every type is `Serialize + Deserialize` with camelCase
//! field names so the same structs serve as the wire format and the durable
//! storage format.
//!
//! ## Types
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`Category`] | One of the 12 fixed petition categories. |
//! | [`Petition`] | A petition as returned by the listing (summary fields) or detail endpoint (adds description, money raised and tiers). |
//! | [`SupportTier`] | A pledge level on a petition with a monetary `cost`. |
//! | [`User`] | A registered user. The password is accepted on input but never serialized back out. |
//! | [`Supporter`] | One pledge made against a petition. |
//!
//! ## Patches
//!
//! [`PetitionPatch`], [`UserPatch`] and [`SupportTierPatch`] are explicit partial
//! edits: every field is optional and absent fields are skipped on the wire. Each
//! patch knows how to `apply` itself to the local copy so mirrors can be updated
//! optimistically after the server accepts the change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed set of petition categories, keyed by their server id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Wildlife = 1,
    EnvironmentalCauses = 2,
    AnimalRights = 3,
    HealthAndWellness = 4,
    Education = 5,
    HumanRights = 6,
    TechnologyAndInnovation = 7,
    ArtsAndCulture = 8,
    CommunityDevelopment = 9,
    EconomicEmpowerment = 10,
    ScienceAndResearch = 11,
    SportsAndRecreation = 12,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Wildlife,
        Category::EnvironmentalCauses,
        Category::AnimalRights,
        Category::HealthAndWellness,
        Category::Education,
        Category::HumanRights,
        Category::TechnologyAndInnovation,
        Category::ArtsAndCulture,
        Category::CommunityDevelopment,
        Category::EconomicEmpowerment,
        Category::ScienceAndResearch,
        Category::SportsAndRecreation,
    ];

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Wildlife => "Wildlife",
            Category::EnvironmentalCauses => "Environmental Causes",
            Category::AnimalRights => "Animal Rights",
            Category::HealthAndWellness => "Health and Wellness",
            Category::Education => "Education",
            Category::HumanRights => "Human Rights",
            Category::TechnologyAndInnovation => "Technology and Innovation",
            Category::ArtsAndCulture => "Arts and Culture",
            Category::CommunityDevelopment => "Community Development",
            Category::EconomicEmpowerment => "Economic Empowerment",
            Category::ScienceAndResearch => "Science and Research",
            Category::SportsAndRecreation => "Sports and Recreation",
        }
    }
}

/// A category as listed by the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfo {
    pub category_id: u32,
    pub name: String,
}

/// A pledge level on a petition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTier {
    pub support_tier_id: u32,
    pub title: String,
    pub description: String,
    pub cost: u64,
}

/// A petition. Listing rows carry only the summary fields; the detail-only
/// fields fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Petition {
    pub petition_id: u32,
    pub title: String,
    pub category_id: u32,
    pub creation_date: DateTime<Utc>,
    pub owner_id: u32,
    pub owner_first_name: String,
    pub owner_last_name: String,
    #[serde(default)]
    pub number_of_supporters: u32,
    /// Cost of the cheapest tier; only present on listing rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supporting_cost: Option<u64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub money_raised: Option<u64>,
    #[serde(default)]
    pub support_tiers: Vec<SupportTier>,
}

impl Petition {
    pub fn category(&self) -> Option<Category> {
        Category::from_id(self.category_id)
    }

    /// Category display name, blank when the id is not a known category.
    pub fn category_name(&self) -> &'static str {
        self.category().map(Category::name).unwrap_or("")
    }

    pub fn owner_name(&self) -> String {
        format!("{} {}", self.owner_first_name, self.owner_last_name)
    }

    /// Creation date formatted for display, e.g. `14 October 2026`.
    pub fn display_date(&self) -> String {
        self.creation_date.format("%-d %B %Y").to_string()
    }

    pub fn cheapest_tier(&self) -> Option<&SupportTier> {
        self.support_tiers.iter().min_by_key(|t| t.cost)
    }
}

/// A registered user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Absent from `GET /users/{id}` bodies; filled in from the request path.
    #[serde(default)]
    pub user_id: u32,
    /// Only returned when viewing your own account.
    #[serde(default)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_filename: Option<String>,
    /// Accepted from the server but never written back out.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Only present on the authenticated user's own record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One pledge against a petition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supporter {
    pub support_id: u32,
    pub support_tier_id: u32,
    #[serde(default)]
    pub message: Option<String>,
    pub supporter_id: u32,
    pub supporter_first_name: String,
    pub supporter_last_name: String,
    pub timestamp: DateTime<Utc>,
}

/// Partial edit of a petition's own fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetitionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u32>,
}

impl PetitionPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.category_id.is_none()
    }

    pub fn apply(&self, petition: &mut Petition) {
        if let Some(title) = &self.title {
            petition.title = title.clone();
        }
        if let Some(description) = &self.description {
            petition.description = description.clone();
        }
        if let Some(category_id) = self.category_id {
            petition.category_id = category_id;
        }
    }
}

/// Partial edit of a user profile. Password changes require `current_password`
/// server-side; neither password field is mirrored locally.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
}

impl UserPatch {
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = last_name.clone();
        }
    }
}

/// Partial edit of a support tier.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportTierPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewSupportTier {
    pub title: String,
    pub description: String,
    pub cost: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPetition {
    pub title: String,
    pub description: String,
    pub category_id: u32,
    pub support_tiers: Vec<NewSupportTier>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSupport {
    pub support_tier_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
