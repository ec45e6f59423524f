//! Command line surface of the registry client

use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use common::config::ApiConfig;
use common::dates::{parse_calendar_date, today};
use common::models::{AddressId, AddressType, Gender, UserId};
use common::validation::Field;
use tracing::info;

use crate::pages::{Alert, DetailsPage, DirectoryPage, LoadState, RegisterPage, SubmitOutcome};
use crate::prompt::{AssumeYes, Confirm, TerminalConfirm};
use crate::render::{DetailsView, DirectoryView, ErrorsView, HomeView, TableView};
use crate::routes::Route;
use crate::user_service::UserService;

/// Register, browse and edit users of the registry
#[derive(Debug, Parser)]
#[command(name = "registry", version)]
pub struct Cli {
    /// Registry API root
    #[arg(long, global = true, env = "USER_REGISTRY_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the landing menu
    Home,
    /// List all users with their age
    List,
    /// Print all users as a flat table
    Table,
    /// Show one user with addresses
    Show { id: UserId },
    /// Open a page by path, e.g. /users/3
    Open { path: String },
    /// Register a new user
    Register(RegisterArgs),
    /// Edit a user's fields
    Edit(EditArgs),
    /// Delete a user
    Delete {
        id: UserId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Manage a user's addresses
    #[command(subcommand)]
    Address(AddressCommand),
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub surname: String,
    /// M or F
    #[arg(long, default_value = "")]
    pub gender: String,
    /// YYYY-MM-DD
    #[arg(long, default_value = "")]
    pub birthdate: String,
    #[arg(long, default_value = "")]
    pub work_address: String,
    #[arg(long, default_value = "")]
    pub home_address: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: UserId,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub surname: Option<String>,
    #[arg(long)]
    pub gender: Option<Gender>,
    /// YYYY-MM-DD
    #[arg(long, value_parser = parse_date_arg)]
    pub birthdate: Option<NaiveDate>,
}

#[derive(Debug, Subcommand)]
pub enum AddressCommand {
    /// Add an address
    Add {
        user_id: UserId,
        #[arg(long = "type", default_value = "HOME")]
        address_type: AddressType,
        #[arg(long)]
        text: String,
    },
    /// Change an address
    Update {
        user_id: UserId,
        address_id: AddressId,
        #[arg(long = "type")]
        address_type: Option<AddressType>,
        #[arg(long)]
        text: Option<String>,
    },
    /// Delete an address
    Delete {
        user_id: UserId,
        address_id: AddressId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_calendar_date(value).map_err(|e| e.to_string())
}

/// Execute one command
pub async fn run(command: Command, service: &UserService, config: &ApiConfig) -> Result<()> {
    match command {
        Command::Home => print!("{}", HomeView),
        Command::List => show_directory(service).await?,
        Command::Table => show_table(service).await?,
        Command::Show { id } => show_details(service, id).await?,
        Command::Open { path } => open(service, &path).await?,
        Command::Register(args) => register(service, config, args).await?,
        Command::Edit(args) => edit(service, args).await?,
        Command::Delete { id, yes } => {
            let mut page = DirectoryPage::new();
            page.load(service).await;
            let alert = page.delete(service, id, &mut confirmer(yes)).await;
            report(alert)?;
        }
        Command::Address(command) => address(service, command).await?,
    }
    Ok(())
}

async fn open(service: &UserService, path: &str) -> Result<()> {
    match Route::parse(path) {
        Route::Home => print!("{}", HomeView),
        Route::Register => println!("Use `registry register --help` to fill in the form."),
        Route::Users => show_directory(service).await?,
        Route::UserDetails(id) => show_details(service, id).await?,
        Route::NotFound(path) => bail!("No page at {path}"),
    }
    Ok(())
}

async fn show_directory(service: &UserService) -> Result<()> {
    let mut page = DirectoryPage::new();
    page.load(service).await;
    match page.state() {
        LoadState::Loaded(users) => {
            print!("{}", DirectoryView { users, today: today() });
            Ok(())
        }
        LoadState::Failed(message) => bail!("{message}"),
        LoadState::Loading | LoadState::NotFound => Ok(()),
    }
}

async fn show_table(service: &UserService) -> Result<()> {
    let mut page = DirectoryPage::new();
    page.load(service).await;
    if let LoadState::Failed(message) = page.state() {
        bail!("{message}");
    }
    print!("{}", TableView { users: page.users() });
    Ok(())
}

async fn load_details(service: &UserService, id: UserId) -> Result<DetailsPage> {
    let mut page = DetailsPage::new(id);
    page.load(service).await;
    match page.state() {
        LoadState::Loaded(_) => Ok(page),
        LoadState::NotFound => bail!("User not found"),
        LoadState::Failed(message) => bail!("{message}"),
        LoadState::Loading => bail!("User details did not load"),
    }
}

async fn show_details(service: &UserService, id: UserId) -> Result<()> {
    let page = load_details(service, id).await?;
    if let Some(user) = page.user() {
        print!("{}", DetailsView { user, today: today() });
    }
    Ok(())
}

async fn register(service: &UserService, config: &ApiConfig, args: RegisterArgs) -> Result<()> {
    let mut page = RegisterPage::new(config.redirect_delay());
    page.set_field(Field::Name, &args.name);
    page.set_field(Field::Surname, &args.surname);
    page.set_field(Field::Gender, &args.gender);
    page.set_field(Field::Birthdate, &args.birthdate);
    page.set_field(Field::WorkAddress, &args.work_address);
    page.set_field(Field::HomeAddress, &args.home_address);

    match page.submit(service, today()).await {
        SubmitOutcome::Registered { user, redirect } => {
            println!("User registered successfully! (#{})", user.id);
            info!("Redirecting to {} in {:?}", redirect.route, redirect.after);
            tokio::time::sleep(redirect.after).await;
            show_directory(service).await
        }
        SubmitOutcome::Invalid | SubmitOutcome::Rejected => {
            eprint!("{}", ErrorsView(page.errors()));
            bail!("Registration failed")
        }
    }
}

async fn edit(service: &UserService, args: EditArgs) -> Result<()> {
    let mut page = load_details(service, args.id).await?;
    page.begin_edit();
    let form = page
        .edit_form_mut()
        .ok_or_else(|| anyhow!("User details did not load"))?;
    if let Some(name) = args.name {
        form.name = name;
    }
    if let Some(surname) = args.surname {
        form.surname = surname;
    }
    if let Some(gender) = args.gender {
        form.gender = gender;
    }
    if let Some(birthdate) = args.birthdate {
        form.birthdate = Some(birthdate);
    }

    let alert = page.save(service, today()).await;
    report(alert)?;
    if let Some(user) = page.user() {
        print!("{}", DetailsView { user, today: today() });
    }
    Ok(())
}

async fn address(service: &UserService, command: AddressCommand) -> Result<()> {
    let user_id = match &command {
        AddressCommand::Add { user_id, .. }
        | AddressCommand::Update { user_id, .. }
        | AddressCommand::Delete { user_id, .. } => *user_id,
    };
    let mut page = load_details(service, user_id).await?;
    page.begin_edit();

    let alert = match command {
        AddressCommand::Add {
            address_type, text, ..
        } => {
            page.set_new_address(address_type, &text);
            page.add_address(service).await
        }
        AddressCommand::Update {
            address_id,
            address_type,
            text,
            ..
        } => {
            if !page.begin_address_edit(address_id) {
                bail!("User #{user_id} has no address #{address_id}");
            }
            if let Some(staged) = page.staged_address_mut(address_id) {
                if let Some(address_type) = address_type {
                    staged.address_type = address_type;
                }
                if let Some(text) = text {
                    staged.address_text = text;
                }
            }
            page.save_address(service, address_id).await
        }
        AddressCommand::Delete {
            address_id, yes, ..
        } => {
            page.delete_address(service, address_id, &mut confirmer(yes))
                .await
        }
    };

    report(alert)?;
    page.cancel_edit();
    if let Some(user) = page.user() {
        print!("{}", DetailsView { user, today: today() });
    }
    Ok(())
}

/// Confirmation source picked by `--yes`
enum Confirmer {
    Assume(AssumeYes),
    Ask(TerminalConfirm),
}

impl Confirm for Confirmer {
    fn confirm(&mut self, question: &str) -> bool {
        match self {
            Confirmer::Assume(inner) => inner.confirm(question),
            Confirmer::Ask(inner) => inner.confirm(question),
        }
    }
}

fn confirmer(yes: bool) -> Confirmer {
    if yes {
        Confirmer::Assume(AssumeYes)
    } else {
        Confirmer::Ask(TerminalConfirm)
    }
}

/// Print a success alert, turn anything else into an error
fn report(alert: Option<Alert>) -> Result<()> {
    match alert {
        Some(alert) if alert.is_success() => {
            println!("{alert}");
            Ok(())
        }
        Some(alert) => bail!("{alert}"),
        None => {
            println!("Cancelled.");
            Ok(())
        }
    }
}
