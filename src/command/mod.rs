mod credentials;
mod premium;
mod shell;
mod status;

pub use credentials::{run_clear_key, run_reset_host, run_validate};
pub use premium::{run_restore, run_subscribe};
pub use shell::run_shell;
pub use status::run_status;

use aichatty_settings::toast::ToastKind;
use aichatty_settings::App;

/// Print the toast currently on screen, if any.
fn print_toast(app: &App) {
    if let Some(toast) = app.state.toasts().current() {
        let icon = match toast.kind {
            ToastKind::Success => "✅",
            ToastKind::Error => "❌",
            ToastKind::Info => "ℹ️ ",
        };
        println!("{} {}", icon, toast.message);
    }
}
