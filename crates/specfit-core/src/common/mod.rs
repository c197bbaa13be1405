pub mod constants;
pub mod settings;
pub mod wavescale;

pub use settings::{InvalidSetting, LineMode, ModelSettings, SettingsError, load_model_settings};
pub use wavescale::{WavelengthScale, WavelengthScaleError};
