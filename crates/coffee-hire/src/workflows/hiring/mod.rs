//! Hiring workflow for the coffee-shop chain: vacancy catalog, FAQ table, and the candidate
//! intake questionnaire that ties them together.

pub mod catalog;
pub mod faq;
pub mod intake;

pub use catalog::{CatalogLoadError, ShiftPeriod, VacancyCatalog, VacancyRecord};
pub use faq::{FaqBook, FaqEntry};
pub use intake::{
    intake_router, AdminNotice, AdminNotifier, ApplicationLog, ApplicationStatus, CandidateId,
    CsvApplicationLog, IntakePolicy, IntakeService, IntakeServiceError, Reply,
};
