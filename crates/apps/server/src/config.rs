use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "127.0.0.1:9200";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    /// Dataset JSON to serve. The embedded sample is used when unset.
    pub data_path: Option<PathBuf>,
    pub cors: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let raw_addr = env::var("AQI_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .parse()
            .map_err(|e| format!("invalid AQI_ADDR {raw_addr:?}: {e}"))?;
        let data_path = env::var("AQI_DATA")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Ok(Self {
            addr,
            data_path,
            cors: env_var_bool("AQI_CORS", true),
        })
    }
}

fn env_var_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(default)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bool_spellings() {
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool(" 0 "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn default_addr_parses() {
        assert!(DEFAULT_ADDR.parse::<SocketAddr>().is_ok());
    }
}
