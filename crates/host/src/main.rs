use anyhow::Context;
use chrono::Utc;

use anvil_host::{HostConfig, HostModule, INFO_DUMP_SERVICE, InfoDumpService};
use anvil_services::{DATE_FORMAT_SERVICE, DateFormatService};

fn main() -> anyhow::Result<()> {
    let config = HostConfig::from_env()?;

    // The log filter comes from the settings file, so nothing logged while the
    // module seeds it reaches a subscriber.
    let module = HostModule::new(config).context("failed to prepare host module")?;
    anvil_observability::init_with_filter(&module.settings().log_filter);

    let bindings = module.bindings()?;
    for capability in bindings.capabilities() {
        tracing::info!(capability = %capability, "capability bound");
    }

    let info = bindings
        .resolve::<dyn InfoDumpService>(INFO_DUMP_SERVICE)?
        .collect(&bindings)?;
    tracing::debug!(info = %info, "host info");

    let dates = bindings.resolve::<dyn DateFormatService>(DATE_FORMAT_SERVICE)?;
    tracing::info!(
        config_dir = %module.config().config_dir().display(),
        now = %dates.format(Utc::now()),
        "anvil host ready"
    );

    Ok(())
}
