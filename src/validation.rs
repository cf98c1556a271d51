use anyhow::{anyhow, Result};
use std::path::Path;

use crate::keys;

/// Validation utilities for identifiers, key names, and paths
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a widget instance identifier
    pub fn validate_widget_id(id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(anyhow!("Widget id cannot be empty"));
        }

        if id.len() > 100 {
            return Err(anyhow!("Widget id too long (max 100 characters)"));
        }

        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(anyhow!("Widget id contains invalid characters: {id}"));
        }

        if keys::base_widget_id(id).is_empty() {
            return Err(anyhow!("Widget id has no base identifier: {id}"));
        }

        Ok(())
    }

    /// Validate a logical preference key
    pub fn validate_preference_key(key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(anyhow!("Preference key cannot be empty"));
        }

        if key.len() > 128 {
            return Err(anyhow!("Preference key too long (max 128 characters)"));
        }

        let mut chars = key.chars();
        // First character must be a letter so mode-scoped compound keys stay parseable
        if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return Err(anyhow!("Preference key must start with a letter: {key}"));
        }

        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(anyhow!("Preference key contains invalid characters: {key}"));
        }

        Ok(())
    }

    /// Validate an application mode key
    pub fn validate_mode_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(anyhow!("Mode key cannot be empty"));
        }

        if !key.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(anyhow!("Mode key must be lowercase ascii letters: {key}"));
        }

        Ok(())
    }

    /// Validate a preference store data directory path
    pub fn validate_data_dir(path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();
        if path_str.is_empty() {
            return Err(anyhow!("Data directory cannot be empty"));
        }

        // Check for path traversal attempts
        if path_str.contains("..") || path_str.contains('~') {
            return Err(anyhow!(
                "Data directory contains potentially dangerous characters"
            ));
        }

        if path_str.len() > 4096 {
            return Err(anyhow!("Data directory path too long (max 4096 characters)"));
        }

        if path.exists() && !path.is_dir() {
            return Err(anyhow!("Data directory path is not a directory: {path:?}"));
        }

        Ok(())
    }
}
