use anyhow::{anyhow, Result};

use aichatty_settings::credentials::ValidationOutcome;
use aichatty_settings::domain::Credential;
use aichatty_settings::App;

use super::print_toast;

pub async fn run_validate(app: &App, credential: Credential) -> Result<()> {
    let kind = credential.kind;
    println!("🔐 Validating {}...", kind);

    let outcome = app.credentials.validate(credential).await;
    print_toast(app);

    match outcome {
        ValidationOutcome::Success => Ok(()),
        ValidationOutcome::Failure(err) => {
            let title = app
                .credentials
                .alert(kind)
                .map(|alert| alert.title)
                .unwrap_or_else(|| "Validation failed".to_string());
            Err(anyhow!(err).context(title))
        }
        ValidationOutcome::Ignored => {
            println!("A validation is already running.");
            Ok(())
        }
    }
}

pub fn run_clear_key(app: &App) -> Result<()> {
    app.credentials.clear_key();
    print_toast(app);
    Ok(())
}

pub fn run_reset_host(app: &App) -> Result<()> {
    app.credentials.reset_host();
    print_toast(app);
    println!("   API host: {}", app.credentials.api_host());
    Ok(())
}
