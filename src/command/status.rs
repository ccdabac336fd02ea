use anyhow::Result;
use tracing::warn;

use aichatty_settings::App;

pub async fn run_status(app: &App) -> Result<()> {
    app.purchases.refresh_entitlement().await;
    if let Err(e) = app.purchases.load_paywall().await {
        warn!("Could not load the paywall: {}", e);
    }

    print_status(app);
    Ok(())
}

pub(super) fn print_status(app: &App) {
    match app.credentials.api_key() {
        Some(key) => println!("🔑 API key:  {}", mask_key(&key)),
        None => println!("🔑 API key:  (not set)"),
    }
    println!("🌐 API host: {}", app.credentials.api_host());

    if app.state.is_premium() {
        println!("👑 AIChatty Premium: active");
    } else {
        println!(
            "👑 AIChatty Premium: not subscribed ({}/month)",
            app.purchases.price_label()
        );
    }
    println!("🛠  Mode: {}", app.state.mode());
}

/// Show only enough of a key to recognise it.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
