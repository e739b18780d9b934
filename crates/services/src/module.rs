//! Bindings for the common utility services.

use std::sync::Arc;

use anvil_core::DomainResult;

use crate::binding::{BindingTableBuilder, ServiceModule};
use crate::date_format::{CommonDateFormatService, DateFormatService};
use crate::time_conversion::{CommonTimeConversionService, TimeConversionService};

pub const DATE_FORMAT_SERVICE: &str = "DateFormatService";
pub const TIME_CONVERSION_SERVICE: &str = "TimeConversionService";

/// Binds [`DATE_FORMAT_SERVICE`] and [`TIME_CONVERSION_SERVICE`] to their
/// common implementations.
#[derive(Debug, Clone, Default)]
pub struct CommonServicesModule {
    date_format: CommonDateFormatService,
}

impl CommonServicesModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_format(date_format: CommonDateFormatService) -> Self {
        Self { date_format }
    }
}

impl ServiceModule for CommonServicesModule {
    fn name(&self) -> &'static str {
        "common-services"
    }

    fn configure(&self, bindings: &mut BindingTableBuilder) -> DomainResult<()> {
        bindings
            .register::<dyn DateFormatService>(
                DATE_FORMAT_SERVICE,
                Arc::new(self.date_format.clone()),
            )?
            .register::<dyn TimeConversionService>(
                TIME_CONVERSION_SERVICE,
                Arc::new(CommonTimeConversionService::new()),
            )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::BindingTable;
    use chrono::{TimeZone, Utc};

    #[test]
    fn common_services_resolve_by_capability() {
        let table = BindingTable::from_modules(&[&CommonServicesModule::new()]).unwrap();

        let dates = table.resolve::<dyn DateFormatService>(DATE_FORMAT_SERVICE).unwrap();
        let instant = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(dates.format(instant), "2020-01-02 03:04:05");

        let times = table
            .resolve::<dyn TimeConversionService>(TIME_CONVERSION_SERVICE)
            .unwrap();
        assert_eq!(times.parse_seconds("2h").unwrap(), 7_200);
    }

    #[test]
    fn configured_date_pattern_is_bound() {
        let module = CommonServicesModule::with_date_format(
            CommonDateFormatService::with_pattern("%d.%m.%Y").unwrap(),
        );
        let table = BindingTable::from_modules(&[&module]).unwrap();
        let dates = table.resolve::<dyn DateFormatService>(DATE_FORMAT_SERVICE).unwrap();
        let instant = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(dates.format(instant), "02.01.2020");
    }
}
