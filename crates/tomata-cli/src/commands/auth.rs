//! Account authentication commands.
//!
//! The auth client is async; each invocation owns a small tokio runtime.
//! The bearer token lives in the OS keyring between calls.

use clap::Subcommand;

use tomata_core::{AuthClient, AuthError, Config};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and discard the stored token
    Logout,
    /// Check whether the stored token is still valid
    Status,
    /// Exchange the stored token for a fresh one
    Refresh,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let client = AuthClient::from_config(&config)?;
    let rt = tokio::runtime::Runtime::new()?;

    match action {
        AuthAction::Login { email, password } => {
            let session = rt.block_on(client.login(&email, &password))?;
            AuthClient::store_token(&session.token)?;
            println!("{}", serde_json::to_string_pretty(&session.user)?);
        }
        AuthAction::Register {
            username,
            email,
            password,
        } => {
            let session = rt.block_on(client.register(&username, &email, &password))?;
            AuthClient::store_token(&session.token)?;
            println!("{}", serde_json::to_string_pretty(&session.user)?);
        }
        AuthAction::Logout => {
            // Best-effort server-side invalidation; local credentials are
            // cleared either way.
            if let Some(token) = AuthClient::stored_token()? {
                if let Err(e) = rt.block_on(client.logout(&token)) {
                    eprintln!("warning: server logout failed: {e}");
                }
            }
            AuthClient::clear_token()?;
            println!("logged out");
        }
        AuthAction::Status => {
            let token = AuthClient::stored_token()?.ok_or(AuthError::NotAuthenticated)?;
            match rt.block_on(client.check_auth(&token)) {
                Ok(session) => println!("{}", serde_json::to_string_pretty(&session.user)?),
                Err(AuthError::Api { .. }) => {
                    AuthClient::clear_token()?;
                    println!("not authenticated");
                }
                Err(e) => return Err(e.into()),
            }
        }
        AuthAction::Refresh => {
            let token = AuthClient::stored_token()?.ok_or(AuthError::NotAuthenticated)?;
            let fresh = rt.block_on(client.refresh_token(&token))?;
            AuthClient::store_token(&fresh)?;
            println!("token refreshed");
        }
    }

    Ok(())
}
