//! `petitions`: a terminal client for the petition service.
//!
//! State that must survive between invocations (the session token and the
//! mirrored petition and user lists) is kept as JSON files in the data
//! directory, `storage.dir` from settings or `<platform data dir>/petitions`.

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use api::settings::ConfigError;
use api::{ApiClient, FetchError, RequestScope, Session, Settings};
use clap::Parser;
use store::storage::{PETITIONS_KEY, USERS_KEY};
use store::{Credentials, FileStorage, MirrorStore, NewSupport, Petition, User};
use thiserror::Error;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, Command};

#[derive(Debug, Error)]
enum CliError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Not signed in. Run `petitions login` first.")]
    NotSignedIn,
}

struct App {
    client: ApiClient,
    session: Session<FileStorage>,
    petitions: MirrorStore<Petition, FileStorage>,
    users: MirrorStore<User, FileStorage>,
}

impl App {
    fn open(settings: &Settings) -> Result<Self, CliError> {
        let storage = FileStorage::new(data_dir(settings));
        tracing::debug!("Using storage at {}", storage.base().display());

        let session = Session::restore(storage.clone());
        let client = ApiClient::new(&settings.api, session.handle())?;
        Ok(Self {
            client,
            session,
            petitions: MirrorStore::load(storage.clone(), PETITIONS_KEY),
            users: MirrorStore::load(storage, USERS_KEY),
        })
    }

    fn signed_in_user(&self) -> Result<u32, CliError> {
        self.session.user_id().ok_or(CliError::NotSignedIn)
    }

    async fn run(&self, command: Command, scope: &RequestScope) -> Result<(), CliError> {
        match command {
            Command::List(args) => {
                let page = self
                    .client
                    .refresh_petitions(&args.to_query(), &self.petitions, scope)
                    .await?;
                print_rows(&page.petitions);
                if let Some(count) = page.count {
                    println!("{} of {count} petitions", page.petitions.len());
                }
            }
            Command::Cached => {
                let cached = self.petitions.list();
                if cached.is_empty() {
                    println!("No cached petitions. Run `petitions list` to fetch some.");
                }
                print_rows(&cached);
            }
            Command::Show { id } => {
                let petition = self.client.get_petition(id, scope).await?;
                println!("#{} {}", petition.petition_id, petition.title);
                println!(
                    "{} | by {} | {}",
                    petition.category_name(),
                    petition.owner_name(),
                    petition.display_date()
                );
                println!(
                    "{} supporters, ${} raised",
                    petition.number_of_supporters,
                    petition.money_raised.unwrap_or(0)
                );
                if !petition.description.is_empty() {
                    println!("\n{}\n", petition.description);
                }
                for tier in &petition.support_tiers {
                    println!(
                        "  tier {}: {} (${}) {}",
                        tier.support_tier_id, tier.title, tier.cost, tier.description
                    );
                }
            }
            Command::Supporters { id } => {
                let supporters = self.client.list_supporters(id, scope).await?;
                for s in &supporters {
                    println!(
                        "{} {} {} (tier {}) {}",
                        s.timestamp.format("%Y-%m-%d"),
                        s.supporter_first_name,
                        s.supporter_last_name,
                        s.support_tier_id,
                        s.message.as_deref().unwrap_or("")
                    );
                }
            }
            Command::Categories => {
                for category in self.client.list_categories(scope).await? {
                    println!("{:>3}  {}", category.category_id, category.name);
                }
            }
            Command::Login { email, password } => {
                let credentials = Credentials { email, password };
                let login = self.session.login(&self.client, &credentials, scope).await?;
                println!("Signed in as user {}", login.user_id);
            }
            Command::Logout => {
                if !self.session.is_authenticated() {
                    println!("Already signed out");
                    return Ok(());
                }
                // Local state is cleared even if the server refuses
                if let Err(e) = self.session.logout(&self.client, scope).await {
                    tracing::warn!("Server rejected logout: {e}");
                }
                println!("Signed out");
            }
            Command::Whoami => {
                let user_id = self.signed_in_user()?;
                let user = self.client.fetch_user_into(user_id, &self.users, scope).await?;
                println!("#{} {} <{}>", user_id, user.display_name(), user.email);
            }
            Command::Support { id, tier, message } => {
                self.signed_in_user()?;
                let support = NewSupport {
                    support_tier_id: tier,
                    message,
                };
                self.client.support_petition(id, &support, scope).await?;
                println!("Thanks for supporting petition {id}");
            }
        }
        Ok(())
    }
}

fn data_dir(settings: &Settings) -> PathBuf {
    match &settings.storage.dir {
        Some(dir) => PathBuf::from(dir),
        None => dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("petitions"),
    }
}

fn print_rows(petitions: &[Petition]) {
    for p in petitions {
        let cost = p
            .supporting_cost
            .map(|c| format!("from ${c}"))
            .unwrap_or_default();
        println!(
            "{:>5}  {:<40}  {:<16} {:>4} supporters  {}",
            p.petition_id,
            p.title,
            p.category_name(),
            p.number_of_supporters,
            cost
        );
    }
}

async fn execute(cli: Cli) -> Result<(), CliError> {
    let settings = Settings::new()?;
    let app = App::open(&settings)?;

    let scope = RequestScope::new();
    tokio::select! {
        result = app.run(cli.command, &scope) => result,
        _ = tokio::signal::ctrl_c() => {
            scope.cancel();
            Err(FetchError::Cancelled.into())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let result = execute(Cli::parse()).await;
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Fetch(e)) if e.is_unauthorized() => {
            error!("{e}");
            eprintln!("{e}\nYour session may have expired; try `petitions login` again.");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
