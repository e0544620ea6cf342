pub mod session;
pub mod settings;

pub use session::{NewSessionLog, SessionLog};
pub use settings::{UserSettings, VibrationIntensity};
