pub mod settings;
pub mod logging;

pub use settings::Settings;
