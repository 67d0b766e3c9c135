pub mod audit;
pub mod catalog;
pub mod companies;
pub mod employees;
pub mod modules;
pub mod projects;
pub mod users;
