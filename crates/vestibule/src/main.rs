//! Command-line driver for the vestibule auth gateway.
//!
//! Thin presentation layer: collects credentials from arguments, calls
//! the gateway, and prints one outcome (or one error message) per
//! invocation. The token set is persisted to a state file between
//! invocations, standing in for the browser SDK's local storage.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{Config, Environment, File, FileFormat};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use vestibule::{
    AuthGateway, GatewayError, PoolConfig, SessionCoordinator, SignUpParams, TokenSet,
};

const APP_NAME: &str = "vestibule";
const ENV_PREFIX: &str = "VESTIBULE";

#[derive(Parser)]
#[command(name = APP_NAME, version, about = "User-pool authentication client")]
struct Cli {
    /// Path to the config file (default: $XDG_CONFIG_HOME/vestibule/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new account; a confirmation code is emailed.
    SignUp {
        email: String,
        /// Display name for the new account.
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    /// Confirm a registration with the emailed code.
    Confirm { email: String, code: String },
    /// Sign in and cache the session tokens.
    SignIn {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show the currently signed-in user.
    Whoami,
    /// Sign out and drop the cached tokens.
    SignOut,
    /// Request a password-reset code.
    ForgotPassword { email: String },
    /// Complete a password reset with the emailed code.
    ResetPassword {
        email: String,
        code: String,
        #[arg(long)]
        new_password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let pool = load_config(cli.config.as_deref())?;

    let gateway = Arc::new(AuthGateway::from_config(&pool)?);
    restore_tokens(&gateway)?;

    let outcome = run(&cli.command, &gateway).await;
    persist_tokens(&gateway)?;

    if let Err(err) = outcome {
        // Views render exactly one error message per attempt.
        match err.downcast_ref::<GatewayError>() {
            Some(gateway_err) => eprintln!("{}", gateway_err.user_message()),
            None => eprintln!("{:#}", err),
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: &Command, gateway: &Arc<AuthGateway>) -> Result<()> {
    match command {
        Command::SignUp {
            email,
            name,
            password,
        } => {
            let receipt = gateway
                .sign_up(SignUpParams::new(
                    email.clone(),
                    password.clone(),
                    name.clone(),
                ))
                .await?;
            if receipt.user_confirmed {
                println!("Account created and already confirmed. You can sign in.");
            } else {
                match receipt.code_destination {
                    Some(destination) => {
                        println!("Account created. Confirmation code sent to {}.", destination)
                    }
                    None => println!("Account created. Check your email for the code."),
                }
            }
        }
        Command::Confirm { email, code } => {
            gateway.confirm_sign_up(email, code).await?;
            println!("Email verified. You can now sign in.");
        }
        Command::SignIn { email, password } => {
            let user = gateway.sign_in(email, password).await?;
            println!("Signed in as {} ({})", user.email, user.role);
        }
        Command::Whoami => {
            let coordinator = SessionCoordinator::new(gateway.clone());
            coordinator.initialize().await;
            match coordinator.snapshot().user {
                Some(user) => {
                    println!("user id: {}", user.user_id);
                    println!("email:   {}", user.email);
                    println!("name:    {}", user.name);
                    println!("role:    {}", user.role);
                }
                None => println!("Not signed in."),
            }
        }
        Command::SignOut => {
            let coordinator = SessionCoordinator::new(gateway.clone());
            // Local state is cleared even when the provider call fails.
            if let Err(err) = coordinator.sign_out().await {
                eprintln!("Provider sign-out failed: {}", err.user_message());
            }
            println!("Signed out.");
        }
        Command::ForgotPassword { email } => {
            match gateway.reset_password(email).await? {
                Some(destination) => println!("Reset code sent to {}.", destination),
                None => println!("Reset code sent. Check your email."),
            }
        }
        Command::ResetPassword {
            email,
            code,
            new_password,
        } => {
            gateway
                .confirm_reset_password(email, code, new_password)
                .await?;
            println!("Password reset. You can sign in with the new password.");
        }
    }
    Ok(())
}

fn load_config(override_path: Option<&Path>) -> Result<PoolConfig> {
    let path = match override_path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() && override_path.is_none() {
        write_default_config(&path)?;
    }

    let built = Config::builder()
        .add_source(
            File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(false),
        )
        .add_source(Environment::with_prefix(ENV_PREFIX))
        .build()
        .context("reading configuration")?;

    let pool: PoolConfig = built
        .try_deserialize()
        .context("deserializing configuration")?;
    pool.validate()?;
    Ok(pool)
}

fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("no config directory available")?;
    Ok(base.join(APP_NAME).join("config.toml"))
}

fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating config directory {}", parent.display()))?;
    }

    let body = format!(
        "# Configuration for {}\n# File: {}\n\n{}",
        APP_NAME,
        path.display(),
        toml::to_string_pretty(&PoolConfig::default())
            .context("serializing default config to TOML")?
    );
    fs::write(path, body).with_context(|| format!("writing config file to {}", path.display()))
}

fn session_file_path() -> Result<PathBuf> {
    let base = dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .context("no state directory available")?;
    Ok(base.join(APP_NAME).join("session.json"))
}

/// Load a previously persisted token set into the gateway's store.
fn restore_tokens(gateway: &AuthGateway) -> Result<()> {
    let path = session_file_path()?;
    if !path.exists() {
        return Ok(());
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("reading session file {}", path.display()))?;
    match serde_json::from_str::<TokenSet>(&raw) {
        Ok(tokens) => {
            debug!("restored session tokens from {}", path.display());
            gateway.tokens().replace(tokens);
        }
        Err(err) => {
            // Unreadable session files are dropped, not fatal.
            debug!("discarding unreadable session file: {}", err);
            let _ = fs::remove_file(&path);
        }
    }
    Ok(())
}

/// Persist (or remove) the token set for the next invocation.
fn persist_tokens(gateway: &AuthGateway) -> Result<()> {
    let path = session_file_path()?;
    match gateway.tokens().get() {
        Some(tokens) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating state directory {}", parent.display()))?;
            }
            let raw = serde_json::to_string(&tokens).context("serializing session tokens")?;
            fs::write(&path, raw)
                .with_context(|| format!("writing session file {}", path.display()))?;
        }
        None => {
            if path.exists() {
                fs::remove_file(&path)
                    .with_context(|| format!("removing session file {}", path.display()))?;
            }
        }
    }
    Ok(())
}
