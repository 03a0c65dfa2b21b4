pub mod app;
pub mod icon;
pub mod theme;
pub mod view;
pub mod widget;
