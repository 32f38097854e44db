use super::platform::WinError;
use crate::app::layouts::layout_config::WinHandle;

#[derive(Debug, Clone, PartialEq)]
pub enum WindowStateError {
    Platform(WinError),
    NotManaged(WinHandle),
}

impl WindowStateError {
    pub fn get_log_level(&self) -> log::Level {
        match self {
            WindowStateError::Platform(e) => e.get_log_level(),
            WindowStateError::NotManaged(_) => log::Level::Debug,
        }
    }

    pub fn get_info(&self) -> String {
        match self {
            WindowStateError::Platform(e) => e.to_string(),
            WindowStateError::NotManaged(h) => format!("window {h} is not managed"),
        }
    }
}

impl From<WinError> for WindowStateError {
    fn from(e: WinError) -> Self {
        WindowStateError::Platform(e)
    }
}
