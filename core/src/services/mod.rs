//! One service per API resource.
//!
//! Every public operation delegates to a `Backing` slot holding its current
//! implementation. Slots start with the HTTP default (or `NotImplemented`)
//! and can be swapped at runtime, either directly or through
//! `register_service_method_mock`.

mod driller;
mod history;
mod meter;
mod meter_reading;
mod permit;
mod well;

pub use driller::DrillerService;
pub use history::HistoryService;
pub use meter::MeterService;
pub use meter_reading::MeterReadingService;
pub use permit::PermitService;
pub use well::WellService;
