use std::env;
use std::path::PathBuf;

use crate::errors::AppError;

pub const DEFAULT_OWNER_EMAIL: &str = "ali.khadr@example.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub jwt_secret: String,
    pub owner_email: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::InternalServerError("JWT_SECRET must be set".to_string()))?;
        if jwt_secret.is_empty() {
            return Err(AppError::InternalServerError("JWT_SECRET cannot be empty".to_string()));
        }

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            jwt_secret,
            owner_email: env::var("OWNER_EMAIL")
                .ok()
                .filter(|email| !email.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_OWNER_EMAIL.to_string()),
        })
    }
}
