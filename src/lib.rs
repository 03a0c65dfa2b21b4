pub mod config;
pub mod events;
pub mod fortune;
pub mod gui;
pub mod sys;
