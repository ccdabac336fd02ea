use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use aichatty_settings::credentials::ValidationOutcome;
use aichatty_settings::domain::CredentialKind;
use aichatty_settings::mode::LONG_PRESS_DURATION;
use aichatty_settings::purchase::{PurchaseOutcome, RestoreOutcome};
use aichatty_settings::App;

use super::print_toast;
use super::status::print_status;

const HELP: &str = "\
Commands:
  status              Show credentials, premium status and mode
  hold [secs]         Long-press the version label (5s toggles developer mode)
  key <api-key>       Validate and save an API key      (developer mode)
  host <url>          Validate and save an API host     (developer mode)
  clear-key           Delete the saved API key          (developer mode)
  reset-host          Restore the default API host      (developer mode)
  subscribe           Subscribe to AIChatty Premium
  restore             Restore previous purchases
  help                Show this help
  quit                Leave the shell";

pub async fn run_shell(app: &App) -> Result<()> {
    app.purchases.refresh_entitlement().await;
    if let Err(e) = app.purchases.load_paywall().await {
        println!("⚠️  Could not load the paywall: {}", e);
    }

    println!("{}\n", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("aichatty> ");
        io::stdout().flush()?;

        let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read from stdin")?
        else {
            break;
        };

        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let argument = words.next();
        let posted_before = app.state.toasts().post_count();

        match (command, argument) {
            ("quit" | "exit", _) => break,
            ("help", _) => println!("{}", HELP),
            ("status", _) => print_status(app),
            ("hold", secs) => hold(app, secs).await,
            ("key" | "host", None) => println!("Usage: {} <value>", command),
            ("key", Some(key)) if controls_visible(app) => {
                let outcome = app.credentials.validate_key(key).await;
                report_validation(app, CredentialKind::ApiKey, outcome);
            }
            ("host", Some(host)) if controls_visible(app) => {
                let outcome = app.credentials.validate_host(host).await;
                report_validation(app, CredentialKind::ApiHost, outcome);
            }
            ("clear-key", _) if controls_visible(app) => app.credentials.clear_key(),
            ("reset-host", _) if controls_visible(app) => app.credentials.reset_host(),
            ("key" | "host" | "clear-key" | "reset-host", _) => {}
            ("subscribe", _) => {
                if let PurchaseOutcome::Ignored = app.purchases.subscribe_monthly().await {
                    if app.state.is_premium() {
                        println!("Already Premium");
                    }
                }
            }
            ("restore", _) => {
                if app.purchases.restore().await == RestoreOutcome::Ignored {
                    println!("A restore is already running.");
                }
            }
            _ => println!("Unknown command '{}'. Type 'help'.", line.trim()),
        }

        if app.state.toasts().post_count() != posted_before {
            print_toast(app);
        }
    }

    Ok(())
}

/// Credential commands are only reachable in developer mode.
fn controls_visible(app: &App) -> bool {
    if app.mode.credential_controls_visible() {
        return true;
    }
    println!("Credential settings are hidden. Hold the version label to unlock them (try 'hold 5').");
    false
}

async fn hold(app: &App, secs: Option<&str>) {
    let held = match secs.map(str::parse::<u64>) {
        None => LONG_PRESS_DURATION,
        Some(Ok(secs)) => Duration::from_secs(secs),
        Some(Err(_)) => {
            println!("Usage: hold [secs]");
            return;
        }
    };

    let press = app.mode.press();
    tokio::time::sleep(held).await;
    if app.mode.release(press).is_none() {
        println!("Released after {}s, nothing happened.", held.as_secs());
    }
}

fn report_validation(app: &App, kind: CredentialKind, outcome: ValidationOutcome) {
    if let ValidationOutcome::Failure(_) = outcome {
        if let Some(alert) = app.credentials.alert(kind) {
            println!("⚠️  {} {}", alert.title, alert.message);
            app.credentials.acknowledge_alert(kind);
        }
    }
}
