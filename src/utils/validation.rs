use crate::utils::error::{Result, SourceRefError};
use std::net::SocketAddr;
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_listen_addr(field_name: &str, value: &str) -> Result<()> {
    if value.parse::<SocketAddr>().is_err() {
        return Err(SourceRefError::Config {
            message: format!("{field_name}: '{value}' is not a valid listen address"),
        });
    }
    Ok(())
}

pub fn validate_directory(field_name: &str, path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(SourceRefError::Config {
            message: format!("{field_name}: '{}' is not a directory", path.display()),
        });
    }
    Ok(())
}
