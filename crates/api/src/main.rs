//! EyeCare - eye-care portal command-line client
//!
//! Every command prints its result as JSON on stdout; logs go to stderr.

use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use eyecare_domain::ProfileUpdate;
use eyecare_lib::{commands, init_tracing, AppContext};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(
    name = "eyecare",
    version,
    about = "Eye-care portal client",
    after_help = "Searches fall back to filtering the last doctor or patient listing. \
                  Listings and the login session outlive the process only when \
                  EYECARE_STORE_PATH (or storage.path) names a SQLite store; \
                  otherwise every run starts with an empty cache."
)]
struct Cli {
    /// Config file to read instead of searching the standard locations
    #[arg(long, global = true, env = "EYECARE_CONFIG")]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List doctors, or the best rated with --top
    Doctors {
        #[arg(long, value_name = "N")]
        top: Option<usize>,
    },
    /// Show one doctor
    Doctor { id: String },
    /// Search doctors by name, falling back to the last listing
    SearchDoctors {
        query: String,
        #[arg(long)]
        specialty: Option<String>,
    },
    /// List patients
    Patients,
    /// Show one patient
    Patient { id: String },
    /// Search patients by name or medical history, falling back to the last
    /// listing
    SearchPatients { query: String },
    /// Medical records of a patient
    Records {
        patient_id: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Show one medical report
    Report { id: String },
    /// File a medical report given as a JSON object
    CreateReport { json: String },
    /// Change fields of a medical report, given as a JSON object
    UpdateReport { id: String, json: String },
    /// Delete a medical report
    DeleteReport { id: String },
    /// Log in; the password is read from EYECARE_PASSWORD
    Login { email: String },
    /// Show the logged-in user and role profile
    Whoami,
    /// Save account settings of the logged-in user
    UpdateProfile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long, value_name = "URL")]
        image: Option<String>,
    },
    /// Create the doctor or patient record of the logged-in user if missing
    EnsureProfile,
    /// Forget the logged-in user
    Logout,
}

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match cli.config.clone() {
        Some(path) => eyecare_infra::config::load_from_file(Some(path)).and_then(|config| {
            eyecare_infra::config::validate(&config)?;
            Ok(config)
        }),
        None => eyecare_infra::config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging);
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) => tracing::debug!(error = %e, "no .env file loaded"),
    }

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: eyecare_domain::PortalConfig) -> anyhow::Result<()> {
    let ctx = AppContext::new(config).context("failed to initialise the application")?;

    let shutdown = ctx.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    match command {
        Command::Doctors { top: Some(limit) } => {
            print_json(&commands::top_doctors(&ctx, Some(limit)).await.map_err(anyhow::Error::msg)?)
        }
        Command::Doctors { top: None } => {
            print_json(&commands::list_doctors(&ctx).await.map_err(anyhow::Error::msg)?)
        }
        Command::Doctor { id } => {
            print_json(&commands::doctor(&ctx, &id).await.map_err(anyhow::Error::msg)?)
        }
        Command::SearchDoctors { query, specialty } => print_json(
            &commands::search_doctors(&ctx, &query, specialty.as_deref())
                .await
                .map_err(anyhow::Error::msg)?,
        ),
        Command::Patients => {
            print_json(&commands::list_patients(&ctx).await.map_err(anyhow::Error::msg)?)
        }
        Command::Patient { id } => {
            print_json(&commands::patient(&ctx, &id).await.map_err(anyhow::Error::msg)?)
        }
        Command::SearchPatients { query } => print_json(
            &commands::search_patients(&ctx, &query).await.map_err(anyhow::Error::msg)?,
        ),
        Command::Records { patient_id, name } => print_json(
            &commands::patient_records(&ctx, &patient_id, name.as_deref())
                .await
                .map_err(anyhow::Error::msg)?,
        ),
        Command::Report { id } => {
            print_json(&commands::report(&ctx, &id).await.map_err(anyhow::Error::msg)?)
        }
        Command::CreateReport { json } => {
            let report = parse_json(&json)?;
            print_json(&commands::create_report(&ctx, &report).await.map_err(anyhow::Error::msg)?)
        }
        Command::UpdateReport { id, json } => {
            let changes = parse_json(&json)?;
            print_json(
                &commands::update_report(&ctx, &id, &changes).await.map_err(anyhow::Error::msg)?,
            )
        }
        Command::DeleteReport { id } => {
            commands::delete_report(&ctx, &id).await.map_err(anyhow::Error::msg)?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        Command::Login { email } => {
            let password = std::env::var("EYECARE_PASSWORD")
                .map_err(|_| anyhow!("set EYECARE_PASSWORD to log in"))?;
            let user_id =
                commands::login(&ctx, &email, &password).await.map_err(anyhow::Error::msg)?;
            print_json(&serde_json::json!({ "userId": user_id }))
        }
        Command::Whoami => {
            let user = commands::current_user(&ctx).await.map_err(anyhow::Error::msg)?;
            let profile = commands::role_profile(&ctx).await.map_err(anyhow::Error::msg)?;
            print_json(&serde_json::json!({ "user": user, "profile": profile }))
        }
        Command::UpdateProfile { name, contact, address, image } => {
            let mut update = ProfileUpdate::new(&name);
            if let Some(contact) = contact {
                update = update.with_contact(contact);
            }
            if let Some(address) = address {
                update = update.with_address(address);
            }
            if let Some(image) = image {
                update = update.with_profile_image(image);
            }
            print_json(&commands::update_profile(&ctx, &update).await.map_err(anyhow::Error::msg)?)
        }
        Command::EnsureProfile => {
            print_json(&commands::ensure_role_profile(&ctx).await.map_err(anyhow::Error::msg)?)
        }
        Command::Logout => {
            commands::logout(&ctx).await.map_err(anyhow::Error::msg)?;
            print_json(&serde_json::json!({ "loggedOut": true }))
        }
    }
}

fn parse_json(raw: &str) -> anyhow::Result<serde_json::Value> {
    serde_json::from_str(raw).context("argument is not valid JSON")
}

#[allow(clippy::print_stdout)]
fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
