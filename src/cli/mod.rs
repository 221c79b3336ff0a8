pub mod invoke;
pub mod setup;
pub mod ui;
