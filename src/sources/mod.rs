pub mod manager;
pub mod niconico;
pub mod plugin;

pub use manager::SourceManager;
pub use plugin::SourcePlugin;
