//! Waymark Settings - Preference Store and Schema Migration
//!
//! The settings core of the Waymark mapping app: a persisted key-value
//! preference store, typed preference accessors, the widget size-style table,
//! and the versioned migration engine that rewrites stored keys and widget
//! identifiers when upgrading from an older schema.
//!
//! # Features
//!
//! - Embedded preference store with per-application-mode scoping
//! - Typed preference registry validated at startup
//! - Idempotent, versioned settings migrations
//! - Migration of exported settings documents
//! - Widget size-style lookup for map-widget layout

/// Configuration management
pub mod config;
/// Error types
pub mod error;
/// Migration of exported settings documents
pub mod import;
/// Preference key catalog and rename tables
pub mod keys;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Versioned settings migration engine
pub mod migration;
/// Core data types
pub mod models;
/// External sensors plugin interface
pub mod plugin;
/// Typed preference registry
pub mod registry;
/// Persisted preference store
pub mod store;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use error::{Result, SettingsError};
pub use import::migrate_import_document;
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
pub use models::{ApplicationMode, SchemaVersionRecord, WidgetSizeStyle};
pub use plugin::{AntSensorsPlugin, SensorsPlugin};
pub use registry::{AppSettings, Preference};
pub use store::PreferenceStore;
