//! Core data types for settings storage and widget layout
//!
//! This module contains the widget size-style table consulted by map-widget
//! layout code, the set of application modes preferences are scoped by, and
//! the persisted schema version record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Size style of a simple map widget.
///
/// Layout code reads the four associated constants; all are fixed at compile
/// time. Absent or unreadable size-style preferences resolve to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WidgetSizeStyle {
    /// Compact single-line widget
    Small,
    /// Standard widget
    #[default]
    Medium,
    /// Expanded widget with a large value readout
    Large,
}

impl WidgetSizeStyle {
    /// Font size of the widget label, in points
    #[must_use]
    pub const fn label_font_size(self) -> f32 {
        match self {
            Self::Small | Self::Medium | Self::Large => 11.0,
        }
    }

    /// Font size of the widget value, in points
    #[must_use]
    pub const fn value_font_size(self) -> f32 {
        match self {
            Self::Small => 22.0,
            Self::Medium => 33.0,
            Self::Large => 55.0,
        }
    }

    /// Font size of the widget units suffix, in points
    #[must_use]
    pub const fn units_font_size(self) -> f32 {
        match self {
            Self::Small | Self::Medium | Self::Large => 11.0,
        }
    }

    /// Minimum widget height, in points
    #[must_use]
    pub const fn min_height(self) -> f32 {
        match self {
            Self::Small => 44.0,
            Self::Medium => 66.0,
            Self::Large => 88.0,
        }
    }

    /// All styles, smallest first
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Small, Self::Medium, Self::Large]
    }
}

/// A user-selectable profile under which preferences are independently scoped.
///
/// Every per-mode preference is stored once per mode, keyed by the mode's
/// stable string key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationMode {
    /// Browse-map profile
    Default,
    /// Driving profile
    Car,
    /// Cycling profile
    Bicycle,
    /// Walking profile
    Pedestrian,
    /// Nautical profile
    Boat,
}

impl ApplicationMode {
    /// All modes known to the settings subsystem
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::Car,
        Self::Bicycle,
        Self::Pedestrian,
        Self::Boat,
    ];

    /// Stable string key used to scope persisted preference keys
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Car => "car",
            Self::Bicycle => "bicycle",
            Self::Pedestrian => "pedestrian",
            Self::Boat => "boat",
        }
    }
}

/// Persisted record of the settings schema version.
///
/// Stored once under a reserved key; advanced each time a migration step
/// completes. Fresh installs are stamped with the current version directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaVersionRecord {
    /// Schema version the store conforms to
    pub version: u32,
    /// When this version was reached
    pub applied_at: DateTime<Utc>,
}

impl SchemaVersionRecord {
    /// Build a record for `version` stamped with the current time.
    #[must_use]
    pub fn now(version: u32) -> Self {
        Self {
            version,
            applied_at: Utc::now(),
        }
    }
}
