use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{Value, json};

use petatwork::app::{App, AppError};
use petatwork::config::{ClientConfig, ConfigError};
use petatwork::net::ApiError;
use petatwork::net::types::{AnimalType, BookingStatus, NewAnimal, NewBooking, NewUser, PaymentRequest, PaymentType};
use petatwork::router::{RouteName, RouterError};
use petatwork::state::{AuthError, LoginOutcome, Role};
use petatwork::util::locale::Locale;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    App(#[from] AppError),
    #[error("api request failed: {0}")]
    Api(#[from] ApiError),
    #[error("registration failed: {0}")]
    Registration(#[from] AuthError),
    #[error("navigation failed: {0}")]
    Router(#[from] RouterError),
    #[error("login failed: {0}")]
    LoginFailed(String),
    #[error("not logged in; run `petatwork login` first")]
    NotLoggedIn,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "petatwork", about = "Pet at Work marketplace client")]
struct Cli {
    #[arg(long, env = "PETATWORK_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "PETATWORK_STATE_DIR")]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        email: String,
        #[arg(long, env = "PETATWORK_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, help = "View requested before logging in, e.g. /profile")]
        from: Option<String>,
    },
    Logout,
    Register(RegisterArgs),
    Whoami,
    Navigate {
        path: String,
    },
    Locale(LocaleCommand),
    Users(UsersCommand),
    Animals(AnimalsCommand),
    Bookings(BookingsCommand),
    Payments(PaymentsCommand),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "PETATWORK_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    name: String,
    #[arg(long, help = "petowner, petsitter or company")]
    role: Role,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    experience: Option<String>,
    #[arg(long)]
    capacity: Option<i32>,
}

#[derive(Args, Debug)]
struct LocaleCommand {
    #[command(subcommand)]
    command: Option<LocaleSubcommand>,
}

#[derive(Subcommand, Debug)]
enum LocaleSubcommand {
    Set { code: Locale },
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List {
        #[arg(long)]
        role: Option<Role>,
    },
    Get {
        id: i64,
    },
    Companies,
}

#[derive(Args, Debug)]
struct AnimalsCommand {
    #[command(subcommand)]
    command: AnimalsSubcommand,
}

#[derive(Subcommand, Debug)]
enum AnimalsSubcommand {
    List {
        #[arg(long)]
        owner: Option<i64>,
    },
    Get {
        id: i64,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "dog")]
        animal_type: AnimalType,
        #[arg(long)]
        breed: Option<String>,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        maladie: Option<String>,
    },
}

#[derive(Args, Debug)]
struct BookingsCommand {
    #[command(subcommand)]
    command: BookingsSubcommand,
}

#[derive(Subcommand, Debug)]
enum BookingsSubcommand {
    List,
    Get {
        id: i64,
    },
    Create {
        #[arg(long)]
        animal: i64,
        #[arg(long)]
        sitter: i64,
        #[arg(long)]
        start_date: String,
        #[arg(long)]
        end_date: String,
    },
    Status {
        id: i64,
        status: BookingStatus,
    },
    Delete {
        id: i64,
    },
    Company {
        #[arg(long)]
        petsitter: Option<i64>,
        #[arg(long)]
        company: Option<i64>,
    },
    CompanyStatus {
        id: i64,
        status: BookingStatus,
    },
}

#[derive(Args, Debug)]
struct PaymentsCommand {
    #[command(subcommand)]
    command: PaymentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PaymentsSubcommand {
    List,
    Get {
        id: i64,
    },
    Pay {
        #[arg(long, conflicts_with = "company_booking", required_unless_present = "company_booking")]
        booking: Option<i64>,
        #[arg(long)]
        company_booking: Option<i64>,
        #[arg(long, default_value = "card")]
        payment_type: PaymentType,
    },
    Company {
        booking_id: i64,
        #[arg(long, default_value = "card")]
        payment_type: PaymentType,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config.api_url = ClientConfig::new(url)?.api_url;
    }
    if let Some(dir) = cli.state_dir {
        config.state_dir = dir;
    }
    let mut app = App::from_config(&config)?;

    let result = match cli.command {
        Command::Login { email, password, from } => run_login(&mut app, &email, &password, from.as_deref()).await,
        Command::Logout => run_logout(&mut app),
        Command::Register(args) => run_register(&app, args).await,
        Command::Whoami => run_whoami(&app),
        Command::Navigate { path } => run_navigate(&mut app, &path),
        Command::Locale(locale) => run_locale(&mut app, locale),
        Command::Users(users) => run_users(&app, users).await,
        Command::Animals(animals) => run_animals(&app, animals).await,
        Command::Bookings(bookings) => run_bookings(&app, bookings).await,
        Command::Payments(payments) => run_payments(&app, payments).await,
    };

    // A rejected token queues a forced logout; apply it before exiting.
    if let Some(landing) = app.sync()? {
        if landing.name() == RouteName::Login {
            tracing::warn!("session expired; log in again");
        }
    }
    result
}

async fn run_login(app: &mut App, email: &str, password: &str, from: Option<&str>) -> Result<(), CliError> {
    if let Some(path) = from {
        let resolved = app.navigate(path)?;
        tracing::debug!(view = resolved.view(), "requested view before login");
    }
    let (outcome, landing) = app.login(email, password).await?;
    match outcome {
        LoginOutcome::Success { role, is_admin } => {
            print_json(&json!({
                "success": true,
                "role": role,
                "is_admin": is_admin,
                "landing": landing.map(|l| l.location.full_path()),
            }))
        }
        LoginOutcome::Failure { error } => Err(CliError::LoginFailed(error)),
    }
}

fn run_logout(app: &mut App) -> Result<(), CliError> {
    let landing = app.logout()?;
    print_json(&json!({ "landing": landing.map(|l| l.location.full_path()) }))
}

async fn run_register(app: &App, args: RegisterArgs) -> Result<(), CliError> {
    let user = NewUser {
        email: args.email,
        password: args.password,
        name: args.name,
        role: args.role,
        address: args.address,
        experience: args.experience,
        capacity: args.capacity,
    };
    let created = app.store().register(&user).await?;
    print_serialized(&created)
}

fn run_whoami(app: &App) -> Result<(), CliError> {
    let session = app.store().current().ok_or(CliError::NotLoggedIn)?;
    print_json(&json!({
        "user_id": session.user_id,
        "email": session.email,
        "name": session.name,
        "role": session.role,
        "is_admin": app.store().is_admin(),
    }))
}

fn run_navigate(app: &mut App, path: &str) -> Result<(), CliError> {
    let resolved = app.navigate(path)?;
    let params: serde_json::Map<String, Value> = resolved
        .matched
        .params
        .iter()
        .map(|(k, v)| ((*k).to_owned(), Value::String(v.clone())))
        .collect();
    print_json(&json!({
        "route": resolved.name().to_string(),
        "view": resolved.view(),
        "location": resolved.location.full_path(),
        "params": params,
        "redirects": resolved.redirects,
    }))
}

fn run_locale(app: &mut App, locale: LocaleCommand) -> Result<(), CliError> {
    if let Some(LocaleSubcommand::Set { code }) = locale.command {
        app.set_locale(code);
    }
    println!("{}", app.locale());
    Ok(())
}

async fn run_users(app: &App, users: UsersCommand) -> Result<(), CliError> {
    let api = app.api();
    match users.command {
        UsersSubcommand::List { role: Some(role) } => print_serialized(&api.get_users_by_role(role).await?),
        UsersSubcommand::List { role: None } => print_serialized(&api.get_all_users().await?),
        UsersSubcommand::Get { id } => print_serialized(&api.get_user_by_id(id).await?),
        UsersSubcommand::Companies => print_serialized(&api.get_available_companies().await?),
    }
}

async fn run_animals(app: &App, animals: AnimalsCommand) -> Result<(), CliError> {
    let api = app.api();
    match animals.command {
        AnimalsSubcommand::List { owner: Some(owner) } => print_serialized(&api.get_animals_by_owner(owner).await?),
        AnimalsSubcommand::List { owner: None } => print_serialized(&api.get_all_animals().await?),
        AnimalsSubcommand::Get { id } => print_serialized(&api.get_animal_by_id(id).await?),
        AnimalsSubcommand::Create { name, animal_type, breed, age, maladie } => {
            let owner = app.store().current().ok_or(CliError::NotLoggedIn)?.user_id;
            let animal = NewAnimal { owner, name, animal_type, breed, age, maladie };
            print_serialized(&api.create_animal(&animal).await?)
        }
    }
}

async fn run_bookings(app: &App, bookings: BookingsCommand) -> Result<(), CliError> {
    let api = app.api();
    match bookings.command {
        BookingsSubcommand::List => print_serialized(&api.get_all_bookings().await?),
        BookingsSubcommand::Get { id } => print_serialized(&api.get_booking_by_id(id).await?),
        BookingsSubcommand::Create { animal, sitter, start_date, end_date } => {
            let booking = NewBooking { animal, sitter, start_date, end_date };
            print_serialized(&api.create_booking(&booking).await?)
        }
        BookingsSubcommand::Status { id, status } => print_json(&api.update_booking_status(id, status).await?),
        BookingsSubcommand::Delete { id } => {
            api.delete_booking(id).await?;
            print_json(&json!({ "deleted": id }))
        }
        BookingsSubcommand::Company { petsitter, company } => {
            print_serialized(&api.get_petsitter_company_bookings(petsitter, company).await?)
        }
        BookingsSubcommand::CompanyStatus { id, status } => {
            print_json(&api.update_petsitter_company_booking_status(id, status).await?)
        }
    }
}

async fn run_payments(app: &App, payments: PaymentsCommand) -> Result<(), CliError> {
    let api = app.api();
    match payments.command {
        PaymentsSubcommand::List => print_serialized(&api.get_my_payments().await?),
        PaymentsSubcommand::Get { id } => print_serialized(&api.get_payment_by_id(id).await?),
        PaymentsSubcommand::Pay { booking, company_booking, payment_type } => {
            let request = PaymentRequest { booking, company_booking, payment_type };
            print_json(&api.process_payment(&request).await?)
        }
        PaymentsSubcommand::Company { booking_id, payment_type } => {
            print_json(&api.process_company_payment(booking_id, payment_type).await?)
        }
    }
}

fn print_serialized<T: Serialize>(value: &T) -> Result<(), CliError> {
    print_json(&serde_json::to_value(value)?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
