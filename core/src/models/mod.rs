//! Payload models returned by the services.

mod company;
mod contact;
mod driller;
mod history;
mod meter;
mod meter_reading;
mod permit;
mod well;

pub use company::{CompanyModel, CompanyUrl, CountryModel, CountyModel, StateModel};
pub use contact::{ContactModel, PhoneNumberModel};
pub use driller::DrillerModel;
pub use history::HistoryModel;
pub use meter::MeterModel;
pub use meter_reading::{MeterReadingModel, ProductionModel};
pub use permit::{AmendWellPermitsRequest, PermitMetricsModel, PermitModel, PermitTemplateModel};
pub use well::{WellModel, WellSearchResults};
