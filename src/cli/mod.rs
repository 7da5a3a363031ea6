pub mod dashboard;
pub mod export;
pub mod page;
pub mod setup;
pub mod ui;
