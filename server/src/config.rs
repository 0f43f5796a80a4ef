use std::{env, fmt::Debug, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

/// Server settings. Provider credentials are not here: the config route
/// reads them on every request.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", 8080),
            static_dir: try_load("STATIC_DIR", PathBuf::from("dist")),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Debug,
    T::Err: Display,
{
    let Some(raw) = var(key) else {
        info!("{key} not set, using default: {default:?}");
        return default;
    };
    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default:?}");
        default
    })
}
