//! `anvil-host` — glue between the plugin host and the anvil services.

pub mod config;
pub mod info_dump;
pub mod module;

pub use config::{ConfigError, HostConfig, Settings, SettingsLoader};
pub use info_dump::{CommonInfoDumpService, InfoDumpService, MASK};
pub use module::{HOST_CONFIG, HostModule, INFO_DUMP_SERVICE, SETTINGS_LOADER};
