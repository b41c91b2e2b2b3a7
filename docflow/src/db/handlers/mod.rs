//! Repositories, one per table (or small cluster of reference tables).

pub mod employees;
pub mod ready_documents;
pub mod reference;
pub mod repository;
pub mod settings;
pub mod templates;
pub mod users;

pub use employees::Employees;
pub use ready_documents::ReadyDocuments;
pub use reference::{DocTypes, LegalEntities};
pub use repository::Repository;
pub use settings::Settings;
pub use templates::DocTemplates;
pub use users::Users;
