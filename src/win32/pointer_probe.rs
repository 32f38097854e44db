use crate::app::layouts::layout_config::WinHandle;
use crate::app::window_selector::PointerProbe;
use crate::win32::api::cursor::{get_console_window, get_cursor_pos, is_left_button_down};
use crate::win32::api::window::{root_window_from_point, to_handle};

#[derive(Debug, Default, Clone, Copy)]
pub struct Win32PointerProbe;

impl Win32PointerProbe {
    /// Window of this process that must never be selected.
    pub fn own_window() -> Option<WinHandle> {
        get_console_window().map(to_handle)
    }
}

impl PointerProbe for Win32PointerProbe {
    fn is_primary_button_down(&self) -> bool {
        is_left_button_down()
    }

    fn root_window_at_cursor(&self) -> Option<WinHandle> {
        get_cursor_pos().and_then(root_window_from_point).map(to_handle)
    }
}
