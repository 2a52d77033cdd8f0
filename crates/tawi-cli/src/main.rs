//! Tawi CLI: command-line front-end for the Tawi airtime recharge API.
//!
//! Set TAWI_API_URL (or API_URL) to point at another deployment. `tawi login`
//! stores the session token in TAWI_SESSION_FILE (default ~/.tawi/session).

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tawi_api_client::{ApiClient, Auth, BulkRechargeForm, Effect, SubmissionState};
use tawi_cli::render::{self, DashboardJson, OutputFormat};
use tawi_cli::{init_tracing, write_template, SessionStore};
use tawi_core::models::{
    AirtimeForm, ChangePinRequest, RechargeForm, RegistrationForm, TimeRange, TransactionQuery,
};
use tawi_core::validation::validate_pin_change;
use tawi_core::{
    AppError, CallerRole, ClientConfig, ErrorMetadata, Pin, Role, UploadedFile, TEMPLATE_FILE_NAME,
};

#[derive(Parser)]
#[command(name = "tawi", about = "Tawi airtime recharge CLI")]
struct Cli {
    /// Output format
    #[arg(long, value_enum, global = true, default_value = "table")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        pin: String,
    },
    /// Forget the stored session
    Logout,
    /// Register a new user
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        pin: String,
        #[arg(long)]
        confirm_pin: String,
        /// admin, branchManager, dsa or retailer
        #[arg(long)]
        user_type: Role,
    },
    /// List the user types the current session may register
    Roles,
    /// Change the service PIN
    ChangePin {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
    /// Recharge a single number (KES 5 to 35,000)
    Recharge {
        #[arg(long)]
        phone: String,
        /// Amount in major units, e.g. 50 or 12.50
        #[arg(long)]
        amount: String,
        #[arg(long)]
        pin: String,
    },
    /// Send airtime in a given currency
    Airtime {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        amount: String,
        /// Currency code (defaults to TAWI_CURRENCY)
        #[arg(long)]
        currency: Option<String>,
    },
    /// Upload a CSV of receiverMsisdn,amount rows
    BulkRecharge {
        /// Path to the CSV file
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        pin: String,
    },
    /// Write the bulk recharge CSV template
    Template {
        /// Where to write it
        #[arg(long, default_value = TEMPLATE_FILE_NAME)]
        output: PathBuf,
    },
    /// Show statistics and recent transactions
    Dashboard {
        /// day, week, month, quarter or year
        #[arg(long, default_value = "month")]
        range: TimeRange,
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "5")]
        page_size: u32,
        /// Filter by phone number or transaction ID
        #[arg(long, default_value = "")]
        search: String,
    },
}

/// Turn an API error into the message the user sees. A rejected session is
/// discarded so the next command starts from login.
fn user_error(session: &SessionStore, err: AppError) -> anyhow::Error {
    if err.requires_login() {
        if let Err(clear_err) = session.clear() {
            tracing::warn!(error = %clear_err, "Failed to clear session");
        }
        return anyhow::anyhow!("{}. Run `tawi login` to sign in again", err.client_message());
    }
    tracing::debug!(code = err.error_code(), details = %err.detailed_message(), "Command failed");
    anyhow::anyhow!(err.client_message())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    // Commands that never call the API.
    let command = match cli.command {
        Commands::Template { output } => {
            write_template(&output)?;
            println!("Template written to {}", output.display());
            return Ok(());
        }
        Commands::Logout => {
            SessionStore::new(ClientConfig::session_file_from_env()).clear()?;
            println!("Logged out.");
            return Ok(());
        }
        Commands::Roles => {
            let session = SessionStore::new(ClientConfig::session_file_from_env());
            let roles = CallerRole::from_token(session.load()?.as_deref()).registrable_roles();
            match cli.format {
                OutputFormat::Json => render::print_json(&roles)?,
                OutputFormat::Table => {
                    if roles.is_empty() {
                        println!("The current session cannot register users.");
                    }
                    for role in roles {
                        println!("{}", role);
                    }
                }
            }
            return Ok(());
        }
        command => command,
    };

    let config = ClientConfig::from_env().context("Invalid Tawi configuration")?;
    let session = SessionStore::new(config.session_file.clone());
    let token = session.load()?;
    let client = ApiClient::from_config(&config, Auth::from_token(token.clone()))
        .context("Failed to create API client")?;

    match command {
        Commands::Login { phone, pin } => {
            let pin = Pin::parse(&pin).map_err(|e| anyhow::anyhow!(e.client_message()))?;
            let token = client
                .with_auth(Auth::Anonymous)
                .login(&phone, &pin)
                .await
                .map_err(|e| user_error(&session, e))?;
            session.save(&token)?;
            tracing::info!(session = %session.path().display(), "Logged in");
            println!("Logged in.");
        }
        Commands::Register {
            username,
            phone,
            pin,
            confirm_pin,
            user_type,
        } => {
            let caller = CallerRole::from_token(token.as_deref());
            let request = RegistrationForm {
                username,
                phone,
                pin,
                confirm_pin,
                user_type: Some(user_type),
            }
            .validate(&caller)
            .map_err(|e| anyhow::anyhow!(e.client_message()))?;

            let message = client
                .register(&request)
                .await
                .map_err(|e| user_error(&session, e))?;
            println!("{}", message);
        }
        Commands::ChangePin {
            current,
            new,
            confirm,
        } => {
            let (current_pin, new_pin) = validate_pin_change(&current, &new, &confirm)
                .map_err(|e| anyhow::anyhow!(e.client_message()))?;
            client
                .change_pin(&ChangePinRequest {
                    current_pin,
                    new_pin,
                })
                .await
                .map_err(|e| user_error(&session, e))?;
            // The server invalidates the session after a PIN change.
            session.clear()?;
            println!("PIN updated successfully. Please log in again.");
        }
        Commands::Recharge { phone, amount, pin } => {
            let request = RechargeForm {
                receiver_msisdn: phone,
                amount,
                pin,
            }
            .validate()
            .map_err(|e| anyhow::anyhow!(e.client_message()))?;
            let message = client
                .recharge(&request)
                .await
                .map_err(|e| user_error(&session, e))?;
            println!("{}", message);
        }
        Commands::Airtime {
            phone,
            amount,
            currency,
        } => {
            let request = AirtimeForm {
                receiver_msisdn: phone,
                amount,
                currency_code: currency.unwrap_or_else(|| config.currency.clone()),
            }
            .validate()
            .map_err(|e| anyhow::anyhow!(e.client_message()))?;
            let message = client
                .airtime_recharge(&request)
                .await
                .map_err(|e| user_error(&session, e))?;
            println!("{}", message);
        }
        Commands::BulkRecharge { file, pin } => {
            let upload = UploadedFile::from_path(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let mut form = BulkRechargeForm::new();
            form.select_file(Some(upload));
            form.set_pin(pin);
            let outcome = form.submit(&client).await;

            if outcome.effect == Some(Effect::NavigateToLogin) {
                session.clear()?;
                anyhow::bail!(
                    "{}. Run `tawi login` to sign in again",
                    outcome.status.message()
                );
            }
            if outcome.state != SubmissionState::Success {
                anyhow::bail!(outcome.status.message().to_string());
            }

            if let Some(result) = form.result() {
                match cli.format {
                    OutputFormat::Json => render::print_json(result)?,
                    OutputFormat::Table => {
                        println!("{}", outcome.status.message());
                        print!("{}", render::submission_table(result));
                    }
                }
            }
        }
        Commands::Template { .. } | Commands::Logout | Commands::Roles => {}
        Commands::Dashboard {
            range,
            page,
            page_size,
            search,
        } => {
            let query = TransactionQuery {
                page,
                page_size,
                range,
                search,
            };
            let (statistics, transactions) =
                tokio::try_join!(client.statistics(), client.transactions(&query))
                    .map_err(|e| user_error(&session, e))
                    .context("Failed to fetch dashboard data")?;

            match cli.format {
                OutputFormat::Json => render::print_json(&DashboardJson::new(
                    &statistics,
                    &transactions.transactions,
                    page,
                    transactions.pages,
                ))?,
                OutputFormat::Table => print!(
                    "{}",
                    render::dashboard_report(
                        &statistics,
                        &transactions.transactions,
                        page,
                        transactions.pages,
                        &config.currency,
                    )
                ),
            }
        }
    }

    Ok(())
}
