mod audit_event;
mod company;
mod employee;
mod module;
mod project;
mod user;

pub use audit_event::AuditEvent;
pub use company::Company;
pub use employee::{Employee, EmployeeProfile, Gender};
pub use module::Module;
pub use project::Project;
pub use user::{Role, User};
