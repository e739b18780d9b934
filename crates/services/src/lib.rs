//! `anvil-services` — capability bindings and the common utility services.

pub mod binding;
pub mod date_format;
pub mod module;
pub mod time_conversion;

pub use binding::{BindingTable, BindingTableBuilder, Capability, ServiceModule};
pub use date_format::{CommonDateFormatService, DateFormatService};
pub use module::{CommonServicesModule, DATE_FORMAT_SERVICE, TIME_CONVERSION_SERVICE};
pub use time_conversion::{CommonTimeConversionService, TimeConversionService};
