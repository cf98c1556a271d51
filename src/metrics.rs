use metrics::{counter, histogram};
use std::time::Duration;

/// Metrics collection for the settings subsystem.
///
/// Recording is a no-op until the hosting application installs a global
/// recorder.
pub struct MetricsCollector {
    /// Completed migration steps
    pub migrations_applied_total: &'static str,
    /// Wall time of a full migration pass
    pub migration_duration: &'static str,
    /// Preferences rewritten by migration steps
    pub preferences_rewritten_total: &'static str,
    /// Keys renamed while migrating import documents
    pub import_keys_renamed_total: &'static str,
    /// Errors surfaced by the settings subsystem
    pub errors_total: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            migrations_applied_total: "waymark_settings_migrations_applied_total",
            migration_duration: "waymark_settings_migration_duration_seconds",
            preferences_rewritten_total: "waymark_settings_preferences_rewritten_total",
            import_keys_renamed_total: "waymark_settings_import_keys_renamed_total",
            errors_total: "waymark_settings_errors_total",
        }
    }
}

impl MetricsCollector {
    /// Record a completed migration step and the preferences it rewrote.
    pub fn record_migration_step(&self, step: &'static str, rewritten: u64) {
        counter!(self.migrations_applied_total, "step" => step).increment(1);
        counter!(self.preferences_rewritten_total, "step" => step).increment(rewritten);
    }

    /// Record the wall time of a full migration pass.
    pub fn record_migration_pass(&self, duration: Duration) {
        histogram!(self.migration_duration).record(duration.as_secs_f64());
    }

    /// Record an import-document migration.
    pub fn record_import(&self, keys_renamed: u64) {
        counter!(self.import_keys_renamed_total).increment(keys_renamed);
    }

    /// Record an error by operation.
    pub fn record_error(&self, operation: &'static str) {
        counter!(self.errors_total, "operation" => operation).increment(1);
    }
}
