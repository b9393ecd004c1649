//! Alumni Mentorship Client
//!
//! Loads the signed-in user's mentorships for the configured role and logs them together
//! with the actions currently available on each.

use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use alumni_mentorship::workflow::allowed_transitions;
use alumni_mentorship::{
    AuthContext, Config, FileTokenStore, HttpApiClient, MentorshipCoordinator, Notifier,
    StaticToken,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting alumni mentorship client");
    tracing::info!("API base URL: {}", config.api_base_url);
    tracing::info!("Acting as: {}", config.role);

    let auth = build_auth(&config)?;
    let client = HttpApiClient::new(&config, auth)?;

    let notifier = Notifier::default();
    let coordinator = MentorshipCoordinator::new(client, config.role, notifier);

    let mentorships = coordinator.refresh().await?;
    tracing::info!("Loaded {} mentorships", mentorships.len());

    for mentorship in &mentorships {
        let actions: Vec<&str> = allowed_transitions(config.role, mentorship.status)
            .iter()
            .map(|t| t.as_str())
            .collect();

        tracing::info!(
            id = %mentorship.id,
            status = %mentorship.status,
            session_date = mentorship.session_date.as_deref().unwrap_or("-"),
            session_time = mentorship.session_time.as_deref().unwrap_or("-"),
            actions = ?actions,
            "{}",
            mentorship.request_message
        );
    }

    Ok(())
}

/// Token from `ALUMNI_TOKEN_PATH` if set, else from `ALUMNI_TOKEN`.
fn build_auth(config: &Config) -> Result<AuthContext, Box<dyn std::error::Error>> {
    if let Some(path) = &config.token_path {
        tracing::info!("Reading bearer token from {:?}", path);
        return Ok(AuthContext::new(
            FileTokenStore::new(path),
            config.token_ttl,
        ));
    }

    match std::env::var("ALUMNI_TOKEN") {
        Ok(token) if !token.trim().is_empty() => Ok(AuthContext::new(
            StaticToken(token.trim().to_string()),
            Duration::MAX,
        )),
        _ => Err("No bearer token configured (set ALUMNI_TOKEN_PATH or ALUMNI_TOKEN)".into()),
    }
}
