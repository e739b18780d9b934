//! Diagnostic snapshot of the running host.

use std::collections::BTreeSet;

use serde_json::{Map, Value, json};

use anvil_core::{DomainError, DomainResult};
use anvil_services::BindingTable;

use crate::config::Settings;

/// Replacement for values of sensitive settings.
pub const MASK: &str = "***";

/// Settings whose key contains one of these are always masked.
const SENSITIVE_MARKERS: [&str; 4] = ["password", "secret", "token", "credential"];

/// Collects plugin, settings and system details for support requests.
pub trait InfoDumpService: Send + Sync {
    fn collect(&self, bindings: &BindingTable) -> DomainResult<Value>;
}

#[derive(Debug, Clone)]
pub struct CommonInfoDumpService {
    plugin_id: String,
    settings: Settings,
    sensitive: BTreeSet<String>,
}

impl CommonInfoDumpService {
    pub fn new(plugin_id: impl Into<String>, settings: Settings) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            settings,
            sensitive: BTreeSet::new(),
        }
    }

    /// Mask `key` in addition to the keys matched by name.
    pub fn mark_sensitive(mut self, key: impl Into<String>) -> Self {
        self.sensitive.insert(key.into());
        self
    }

    pub fn is_sensitive(&self, key: &str) -> bool {
        let lower = key.to_ascii_lowercase();
        self.sensitive.contains(key) || SENSITIVE_MARKERS.iter().any(|m| lower.contains(m))
    }

    fn settings_value(&self) -> DomainResult<Value> {
        let value = serde_json::to_value(&self.settings)
            .map_err(|e| DomainError::validation(format!("settings are not serializable: {e}")))?;
        let Value::Object(fields) = value else {
            return Ok(value);
        };
        let masked: Map<String, Value> = fields
            .into_iter()
            .map(|(key, value)| {
                let value = if self.is_sensitive(&key) {
                    Value::from(MASK)
                } else {
                    value
                };
                (key, value)
            })
            .collect();
        Ok(Value::Object(masked))
    }
}

fn system_info() -> Value {
    json!({
        "os": std::env::consts::OS,
        "family": std::env::consts::FAMILY,
        "arch": std::env::consts::ARCH,
    })
}

impl InfoDumpService for CommonInfoDumpService {
    fn collect(&self, bindings: &BindingTable) -> DomainResult<Value> {
        let capabilities: Vec<&str> = bindings.capabilities().map(|c| c.as_str()).collect();
        let plugin = json!({
            "version": env!("CARGO_PKG_VERSION"),
            "settings": self.settings_value()?,
            "capabilities": capabilities,
        });

        let mut plugins = Map::new();
        plugins.insert(self.plugin_id.clone(), plugin);

        tracing::debug!(plugin = %self.plugin_id, "collected info dump");
        Ok(json!({
            "system": system_info(),
            "plugins": plugins,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn settings() -> Settings {
        Settings {
            date_format: "%d/%m/%Y".to_string(),
            log_filter: "debug".to_string(),
        }
    }

    fn table() -> BindingTable {
        let mut builder = BindingTable::builder();
        builder.register("Limit", Arc::new(3u8)).unwrap();
        builder.register("Greeting", Arc::new("hi")).unwrap();
        builder.build()
    }

    #[test]
    fn dump_lists_settings_and_capabilities() {
        let dump = CommonInfoDumpService::new("ontime", settings())
            .collect(&table())
            .unwrap();

        let plugin = &dump["plugins"]["ontime"];
        assert_eq!(plugin["settings"]["date_format"], "%d/%m/%Y");
        assert_eq!(plugin["settings"]["log_filter"], "debug");
        assert_eq!(plugin["capabilities"], json!(["Greeting", "Limit"]));
        assert_eq!(plugin["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn dump_reports_the_platform() {
        let dump = CommonInfoDumpService::new("anvil", settings())
            .collect(&BindingTable::default())
            .unwrap();

        assert_eq!(dump["system"]["os"], std::env::consts::OS);
        assert_eq!(dump["system"]["arch"], std::env::consts::ARCH);
        assert_eq!(dump["plugins"]["anvil"]["capabilities"], json!([]));
    }

    #[test]
    fn sensitive_settings_are_masked() {
        let dump = CommonInfoDumpService::new("anvil", settings())
            .mark_sensitive("log_filter")
            .collect(&BindingTable::default())
            .unwrap();

        let rendered = &dump["plugins"]["anvil"]["settings"];
        assert_eq!(rendered["log_filter"], MASK);
        assert_eq!(rendered["date_format"], "%d/%m/%Y");
        assert!(!dump.to_string().contains("debug"));
    }

    #[test]
    fn secret_looking_keys_are_masked_by_name() {
        let svc = CommonInfoDumpService::new("anvil", settings());
        assert!(svc.is_sensitive("db_password"));
        assert!(svc.is_sensitive("API_TOKEN"));
        assert!(!svc.is_sensitive("date_format"));
    }
}
