use api::{PetitionQuery, SortOrder};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse and support petitions from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a page of petitions and refresh the local mirror
    List(ListArgs),
    /// Print the mirrored petitions without touching the network
    Cached,
    /// Show one petition with its support tiers
    Show { id: u32 },
    /// List the supporters of a petition
    Supporters { id: u32 },
    /// List petition categories
    Categories,
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Pledge support for a petition at one of its tiers
    Support {
        id: u32,
        #[arg(long)]
        tier: u32,
        #[arg(long)]
        message: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Free-text search
    #[arg(long)]
    pub q: Option<String>,
    /// Category id, repeatable
    #[arg(long = "category")]
    pub categories: Vec<u32>,
    /// Only petitions whose cheapest tier costs at most this much
    #[arg(long)]
    pub max_cost: Option<String>,
    /// ALPHABETICAL_ASC, COST_DESC, CREATED_ASC, ...
    #[arg(long)]
    pub sort: Option<SortOrder>,
    #[arg(long)]
    pub owner: Option<u32>,
    #[arg(long)]
    pub supporter: Option<u32>,
    #[arg(long)]
    pub start: Option<u32>,
    #[arg(long)]
    pub count: Option<u32>,
}

impl ListArgs {
    pub fn to_query(&self) -> PetitionQuery {
        let mut query = PetitionQuery::new().category_ids(self.categories.iter().copied());
        if let Some(q) = &self.q {
            query = query.search(q.as_str());
        }
        if let Some(max_cost) = &self.max_cost {
            query = query.supporting_cost(max_cost.as_str());
        }
        if let Some(sort) = self.sort {
            query = query.sort_by(sort);
        }
        if let Some(owner) = self.owner {
            query = query.owner(owner);
        }
        if let Some(supporter) = self.supporter {
            query = query.supporter(supporter);
        }
        query.start_index = self.start;
        query.count = self.count;
        query
    }
}
