//! # Petition listing query builder
//!
//! [`PetitionQuery`] collects the user's search, filter, sort and paging
//! selections and turns them into the sparse parameter list sent to
//! `GET /petitions`. A dimension left empty is absent from the output entirely,
//! never sent as an empty value, so the server cannot confuse "no filter" with
//! "filter by nothing".
//!
//! | Selection | Key | Omitted when |
//! |-----------|-----|--------------|
//! | search text | `q` | blank |
//! | categories | `categoryIds` (one pair per id, ascending) | no category chosen |
//! | maximum supporting cost | `supportingCost` | blank |
//! | sort order | `sortBy` | none chosen |
//! | owner / supporter | `ownerId` / `supporterId` | unset |
//! | paging | `startIndex` / `count` | unset |
//!
//! The cost threshold is a string and is forwarded verbatim; the server is the
//! one that parses it, and a rejection surfaces as a fetch error.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use store::Category;
use thiserror::Error;

/// Listing sort orders understood by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortOrder {
    AlphabeticalAsc,
    AlphabeticalDesc,
    CostAsc,
    CostDesc,
    CreatedAsc,
    CreatedDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 6] = [
        SortOrder::AlphabeticalAsc,
        SortOrder::AlphabeticalDesc,
        SortOrder::CostAsc,
        SortOrder::CostDesc,
        SortOrder::CreatedAsc,
        SortOrder::CreatedDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::AlphabeticalAsc => "ALPHABETICAL_ASC",
            SortOrder::AlphabeticalDesc => "ALPHABETICAL_DESC",
            SortOrder::CostAsc => "COST_ASC",
            SortOrder::CostDesc => "COST_DESC",
            SortOrder::CreatedAsc => "CREATED_ASC",
            SortOrder::CreatedDesc => "CREATED_DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort order `{0}`")]
pub struct UnknownSortOrder(pub String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSortOrder(s.to_string()))
    }
}

/// Search, filter, sort and paging selections for the petition listing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PetitionQuery {
    pub search: String,
    pub category_ids: BTreeSet<u32>,
    pub supporting_cost: String,
    pub sort_by: Option<SortOrder>,
    pub owner_id: Option<u32>,
    pub supporter_id: Option<u32>,
    pub start_index: Option<u32>,
    pub count: Option<u32>,
}

impl PetitionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, q: impl Into<String>) -> Self {
        self.search = q.into();
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category_ids.insert(category.id());
        self
    }

    pub fn category_ids(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.category_ids.extend(ids);
        self
    }

    pub fn supporting_cost(mut self, max_cost: impl Into<String>) -> Self {
        self.supporting_cost = max_cost.into();
        self
    }

    pub fn sort_by(mut self, order: SortOrder) -> Self {
        self.sort_by = Some(order);
        self
    }

    pub fn owner(mut self, user_id: u32) -> Self {
        self.owner_id = Some(user_id);
        self
    }

    pub fn supporter(mut self, user_id: u32) -> Self {
        self.supporter_id = Some(user_id);
        self
    }

    pub fn page(mut self, start_index: u32, count: u32) -> Self {
        self.start_index = Some(start_index);
        self.count = Some(count);
        self
    }

    /// The sparse parameter list for this query.
    pub fn params(&self) -> QueryParams {
        let mut params = Vec::new();

        if !self.search.trim().is_empty() {
            params.push(("q", self.search.clone()));
        }
        for id in &self.category_ids {
            params.push(("categoryIds", id.to_string()));
        }
        if !self.supporting_cost.trim().is_empty() {
            params.push(("supportingCost", self.supporting_cost.clone()));
        }
        if let Some(order) = self.sort_by {
            params.push(("sortBy", order.as_str().to_string()));
        }
        if let Some(owner_id) = self.owner_id {
            params.push(("ownerId", owner_id.to_string()));
        }
        if let Some(supporter_id) = self.supporter_id {
            params.push(("supporterId", supporter_id.to_string()));
        }
        if let Some(start_index) = self.start_index {
            params.push(("startIndex", start_index.to_string()));
        }
        if let Some(count) = self.count {
            params.push(("count", count.to_string()));
        }

        QueryParams(params)
    }
}

/// Ordered `(key, value)` pairs; repeated keys encode multi-valued parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams(pub Vec<(&'static str, String)>);

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| *k == key)
    }

    /// Distinct keys in first-seen order.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = Vec::new();
        for (k, _) in &self.0 {
            if !keys.contains(k) {
                keys.push(*k);
            }
        }
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[(&'static str, String)] {
        &self.0
    }
}
