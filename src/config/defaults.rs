use super::Config;

pub const LRCLIB_BASE_URL: &str = "https://lrclib.net/api";
pub const LRCLIB_TIMEOUT_SECS: u64 = 10;
pub const USER_AGENT: &str = "lyricsnip/0.1.0 (https://lrclib.net/docs)";

/// Config written on first run.
pub fn defaults() -> Config {
    Config::default()
}
