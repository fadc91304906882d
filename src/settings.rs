//! Service configuration derived from environment variables.

use std::env;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3004;
const DEFAULT_BODY_LIMIT_MB: usize = 16;
const DEFAULT_DB_PATH: &str = "data/confirmations.redb";

const MASTER_KEY_HEX_LEN: usize = 64;

fn env_trim(name: &str) -> String {
    env::var(name).unwrap_or_default().trim().to_string()
}

fn env_lower(name: &str) -> String {
    env_trim(name).to_lowercase()
}

#[derive(Clone, Debug)]
pub struct Settings {
    port: u16,
    host: IpAddr,
    body_limit_mb: usize,
    body_limit_bytes: usize,
    db_path: PathBuf,
    master_key_hex: Option<String>,
    is_production: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        let master_key_hex = {
            let value = env_trim("CONFIRM_MASTER_KEY");
            if value.is_empty() {
                None
            } else {
                Some(value)
            }
        };

        let app_env = env_lower("APP_ENV");
        let rust_env = env_lower("RUST_ENV");
        let is_production =
            matches!(app_env.as_str(), "production") || matches!(rust_env.as_str(), "production");

        let port = env_trim("PORT").parse::<u16>().unwrap_or(DEFAULT_PORT);
        let host = env_trim("HOST")
            .parse::<IpAddr>()
            .unwrap_or(IpAddr::V6(Ipv6Addr::UNSPECIFIED));
        let body_limit_mb = env_trim("CONFIRM_BODY_LIMIT_MB")
            .parse::<usize>()
            .unwrap_or(DEFAULT_BODY_LIMIT_MB);
        let body_limit_bytes = body_limit_mb.saturating_mul(1024 * 1024);
        let db_path = {
            let value = env_trim("CONFIRM_DB_PATH");
            if value.is_empty() {
                PathBuf::from(DEFAULT_DB_PATH)
            } else {
                PathBuf::from(value)
            }
        };

        Self {
            port,
            host,
            body_limit_mb,
            body_limit_bytes,
            db_path,
            master_key_hex,
            is_production,
        }
    }

    pub fn for_tests() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: IpAddr::V6(Ipv6Addr::UNSPECIFIED),
            body_limit_mb: DEFAULT_BODY_LIMIT_MB,
            body_limit_bytes: DEFAULT_BODY_LIMIT_MB.saturating_mul(1024 * 1024),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            master_key_hex: None,
            is_production: false,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(hex_key) = self.master_key_hex.as_deref() {
            if self.master_key().is_none() {
                return Err(format!(
                    "CONFIRM_MASTER_KEY must be {MASTER_KEY_HEX_LEN} hex characters, got {} characters",
                    hex_key.len()
                ));
            }
        } else if self.is_production {
            return Err(
                "CONFIRM_MASTER_KEY is required in production. \
Set CONFIRM_MASTER_KEY to a 64-hex-character key."
                    .to_string(),
            );
        }
        Ok(())
    }

    /// Decoded 32-byte master key, when one is configured and well-formed.
    pub fn master_key(&self) -> Option<[u8; 32]> {
        let hex_key = self.master_key_hex.as_deref()?;
        if hex_key.len() != MASTER_KEY_HEX_LEN {
            return None;
        }
        let bytes = hex::decode(hex_key).ok()?;
        bytes.try_into().ok()
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }

    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_bytes
    }

    pub fn body_limit_mb(&self) -> usize {
        self.body_limit_mb
    }

    pub fn with_master_key_hex(mut self, hex_key: Option<String>) -> Self {
        self.master_key_hex = hex_key;
        self
    }

    pub fn with_db_path(mut self, path: PathBuf) -> Self {
        self.db_path = path;
        self
    }

    pub fn with_body_limit_bytes(mut self, bytes: usize) -> Self {
        self.body_limit_bytes = bytes;
        self.body_limit_mb = bytes / (1024 * 1024);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_master_key_decodes() {
        let settings = Settings::for_tests().with_master_key_hex(Some("ab".repeat(32)));
        assert!(settings.validate().is_ok());
        assert_eq!(settings.master_key().unwrap(), [0xab; 32]);
    }

    #[test]
    fn short_master_key_fails_validation() {
        let settings = Settings::for_tests().with_master_key_hex(Some("abcd".to_string()));
        assert!(settings.validate().is_err());
        assert!(settings.master_key().is_none());
    }

    #[test]
    fn missing_master_key_is_fine_outside_production() {
        let settings = Settings::for_tests();
        assert!(settings.validate().is_ok());
    }
}
