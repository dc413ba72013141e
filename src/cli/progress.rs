use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub const ANALYZING_MESSAGE: &str = "Analizando Fuentes de Datos...";

/// Steady spinner shown while the provider call is pending.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}
