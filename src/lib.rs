/*
Heistline - heist mode overlay UI
*/
pub mod bridge;
pub mod input;
pub mod screen;
pub mod settings;
pub mod store;
pub mod ui;
