use anyhow::{anyhow, Context, Result};

use aichatty_settings::purchase::{PurchaseOutcome, RestoreOutcome};
use aichatty_settings::App;

use super::print_toast;

pub async fn run_subscribe(app: &App) -> Result<()> {
    app.purchases.refresh_entitlement().await;
    app.purchases
        .load_paywall()
        .await
        .context("Failed to load the paywall")?;

    if !app.state.is_premium() {
        println!(
            "💳 Subscribing for {}/month...",
            app.purchases.price_label()
        );
    }

    match app.purchases.subscribe_monthly().await {
        PurchaseOutcome::Success => print_toast(app),
        PurchaseOutcome::Failure(Some(err)) => {
            print_toast(app);
            return Err(anyhow!(err).context("Purchase failed"));
        }
        PurchaseOutcome::Failure(None) => println!("Purchase was not completed."),
        PurchaseOutcome::Ignored if app.state.is_premium() => println!("Already Premium"),
        PurchaseOutcome::Ignored => println!("No premium product is available right now."),
    }

    Ok(())
}

pub async fn run_restore(app: &App) -> Result<()> {
    println!("🔄 Restoring purchases...");

    if app.purchases.restore().await == RestoreOutcome::Ignored {
        println!("A restore is already running.");
        return Ok(());
    }

    print_toast(app);
    Ok(())
}
