use crate::app::layouts::layout_config::WinHandle;
use crate::app::structs::area::Area;

pub const WS_BORDER: u32 = 0x0080_0000;
pub const WS_CAPTION: u32 = 0x00C0_0000;
pub const WS_THICKFRAME: u32 = 0x0004_0000;
/// Style bits removed to make a window borderless.
pub const FRAME_STYLE: u32 = WS_CAPTION | WS_BORDER | WS_THICKFRAME;
pub const WS_EX_TOPMOST: u32 = 0x0000_0008;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowInfo {
    pub handle: WinHandle,
    pub title: String,
    pub visible: bool,
    pub minimized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WinError {
    InvalidHandle(WinHandle),
    Os {
        op: &'static str,
        handle: WinHandle,
        code: i32,
    },
    Unsupported(&'static str),
}

impl WinError {
    pub fn get_log_level(&self) -> log::Level {
        match self {
            WinError::InvalidHandle(_) => log::Level::Warn,
            WinError::Os { .. } | WinError::Unsupported(_) => log::Level::Error,
        }
    }
}

impl std::fmt::Display for WinError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinError::InvalidHandle(h) => write!(f, "invalid window handle {h}"),
            WinError::Os { op, handle, code } => write!(f, "{op} failed for window {handle} (code {code})"),
            WinError::Unsupported(op) => write!(f, "{op} is not supported on this platform"),
        }
    }
}

/// Operating system window calls used by the window state manager.
///
/// Every call is independent: a handle that vanished between two calls yields an error, never a panic.
pub trait WindowPlatform {
    /// Top-level windows, in the order reported by the OS.
    fn list_top_level_windows(&self) -> Result<Vec<WindowInfo>, WinError>;
    fn get_area(&self, handle: WinHandle) -> Result<Area, WinError>;
    /// Moves and resizes without changing the z-order.
    fn set_area(&self, handle: WinHandle, area: Area) -> Result<(), WinError>;
    fn get_style(&self, handle: WinHandle) -> Result<u32, WinError>;
    fn set_style(&self, handle: WinHandle, style: u32) -> Result<(), WinError>;
    fn get_ex_style(&self, handle: WinHandle) -> Result<u32, WinError>;
    fn set_ex_style(&self, handle: WinHandle, ex_style: u32) -> Result<(), WinError>;
    /// Asks the OS to recompute the non-client frame, without moving or resizing.
    fn refresh_frame(&self, handle: WinHandle) -> Result<(), WinError>;
    /// Reorders the window in/out of the topmost band, without moving or resizing.
    fn set_topmost(&self, handle: WinHandle, topmost: bool) -> Result<(), WinError>;
    fn is_minimized(&self, handle: WinHandle) -> Result<bool, WinError>;
    fn restore(&self, handle: WinHandle) -> Result<(), WinError>;
    fn set_foreground(&self, handle: WinHandle) -> Result<(), WinError>;
}
