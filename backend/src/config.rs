//! Runtime configuration for the model registry server.
//!
//! Everything has a working default so the binary starts with no environment
//! at all: a local SQLite file, an `uploads` directory under the working
//! directory, and the server bound to `127.0.0.1:5000`.

use actix_web::http::Uri;
use log::warn;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE: &str = "models.sqlite";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_ALLOWED_ORIGIN: &str = "*";
const DEFAULT_JSON_LIMIT: usize = 10 * 1024 * 1024; // 10 MB

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to (`MODELS_HOST`).
    pub host: String,
    /// Port the HTTP server binds to (`MODELS_PORT`).
    pub port: u16,
    /// Path of the SQLite file backing the record store (`MODELS_DATABASE`).
    pub database_path: PathBuf,
    /// Flat directory receiving uploaded files (`MODELS_UPLOAD_DIR`).
    pub upload_dir: PathBuf,
    /// Comma-separated CORS origins, or `*` for any (`MODELS_ALLOWED_ORIGIN`).
    pub allowed_origin: String,
    /// Maximum accepted JSON body size in bytes (`MODELS_JSON_LIMIT`).
    pub json_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DATABASE),
            upload_dir: default_upload_dir(),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            json_limit: DEFAULT_JSON_LIMIT,
        }
    }
}

impl ServiceConfig {
    /// Builds the configuration from `MODELS_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ServiceConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup("MODELS_HOST").unwrap_or(defaults.host),
            port: parse_or("MODELS_PORT", lookup("MODELS_PORT"), defaults.port),
            database_path: lookup("MODELS_DATABASE")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            upload_dir: lookup("MODELS_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            allowed_origin: lookup("MODELS_ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
            json_limit: parse_or(
                "MODELS_JSON_LIMIT",
                lookup("MODELS_JSON_LIMIT"),
                defaults.json_limit,
            ),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty".to_string());
        }
        if self.database_path.as_os_str().is_empty() {
            return Err("database path must not be empty".to_string());
        }
        // Comma-separated list; each entry ends up verbatim in a response header.
        for origin in self.allowed_origin.split(',').map(str::trim) {
            let usable = !origin.is_empty()
                && origin.chars().all(|c| c.is_ascii_graphic())
                && (origin == "*" || origin.parse::<Uri>().is_ok());
            if !usable {
                return Err(format!("invalid allowed origin {:?}", origin));
            }
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn default_upload_dir() -> PathBuf {
    env::current_dir()
        .map(|cwd| cwd.join(DEFAULT_UPLOAD_DIR))
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR))
}

fn parse_or<T: FromStr + Copy>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid value {:?} for {}", value, key);
            default
        }),
        None => default,
    }
}
