pub mod audio;
pub mod logging;
pub mod notifications;
pub mod picker;
pub mod platform;
pub mod settings;
