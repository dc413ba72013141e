use std::env;
use std::path::PathBuf;

fn fallback_dotenv_path(arka_home: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    let base = arka_home.or(home_dir)?;
    Some(base.join(".arka/.env"))
}

/// Load `.env` from the working directory, falling back to
/// `$ARKA_HOME/.arka/.env` or `~/.arka/.env`.
pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let fallback = fallback_dotenv_path(
        env::var_os("ARKA_HOME").map(PathBuf::from),
        dirs::home_dir(),
    );

    let Some(path) = fallback else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}
