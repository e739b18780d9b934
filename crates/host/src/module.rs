//! The host-level service module.

use std::sync::Arc;

use anvil_core::DomainResult;
use anvil_services::{
    BindingTable, BindingTableBuilder, CommonDateFormatService, CommonServicesModule,
    ServiceModule,
};

use crate::config::{ConfigError, HostConfig, Settings, SettingsLoader};
use crate::info_dump::{CommonInfoDumpService, InfoDumpService};

pub const HOST_CONFIG: &str = "HostConfig";
pub const SETTINGS_LOADER: &str = "SettingsLoader";
pub const INFO_DUMP_SERVICE: &str = "InfoDumpService";

/// Wires the common services plus the host's config location, settings
/// loader and info dump.
///
/// Construction prepares the config directory and seeds the settings file, so
/// a `HostModule` always points at a usable location.
#[derive(Debug)]
pub struct HostModule {
    config: HostConfig,
    settings: Settings,
    loader: Arc<SettingsLoader>,
    common: CommonServicesModule,
}

impl HostModule {
    pub fn new(config: HostConfig) -> Result<Self, ConfigError> {
        config.ensure_config_dir()?;

        let loader = SettingsLoader::new(config.config_file());
        loader.write_defaults_if_missing()?;
        let settings = loader.load()?;

        let date_format = CommonDateFormatService::with_pattern(settings.date_format.as_str())?;

        Ok(Self {
            config,
            settings,
            loader: Arc::new(loader),
            common: CommonServicesModule::with_date_format(date_format),
        })
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build the process-wide binding table from this module alone.
    pub fn bindings(&self) -> DomainResult<BindingTable> {
        BindingTable::from_modules(&[self])
    }
}

impl ServiceModule for HostModule {
    fn name(&self) -> &'static str {
        "host"
    }

    fn configure(&self, bindings: &mut BindingTableBuilder) -> DomainResult<()> {
        bindings.install(&self.common)?;
        bindings
            .register(HOST_CONFIG, Arc::new(self.config.clone()))?
            .register(SETTINGS_LOADER, Arc::clone(&self.loader))?;

        let info_dump: Arc<dyn InfoDumpService> = Arc::new(CommonInfoDumpService::new(
            self.config.plugin_id(),
            self.settings.clone(),
        ));
        bindings.register(INFO_DUMP_SERVICE, info_dump)?;
        Ok(())
    }
}
