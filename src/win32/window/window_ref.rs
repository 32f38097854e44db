use std::hash::{Hash, Hasher};

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    SetWindowPos, GWL_EXSTYLE, GWL_STYLE, HWND_NOTOPMOST, HWND_TOPMOST, SET_WINDOW_POS_FLAGS, SWP_FRAMECHANGED,
    SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER, SW_RESTORE,
};

use crate::app::layouts::layout_config::WinHandle;
use crate::app::structs::area::Area;
use crate::app::window_state::platform::{WinError, WindowInfo, WindowPlatform};
use crate::win32::api::window::{
    enum_top_level_windows, get_window_long, get_window_rect, get_window_title, is_iconic, is_window,
    is_window_visible, set_foreground_window, set_window_long, show_window, to_handle, to_hwnd,
};

#[derive(Debug, Clone, Copy, Eq)]
pub struct WindowRef {
    pub hwnd: HWND,
}

impl Hash for WindowRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.hwnd.0 as isize).hash(state);
    }
}

impl PartialEq for WindowRef {
    fn eq(&self, other: &Self) -> bool {
        self.hwnd.0 == other.hwnd.0
    }
}

impl From<HWND> for WindowRef {
    fn from(hwnd: HWND) -> Self {
        WindowRef { hwnd }
    }
}

impl From<WinHandle> for WindowRef {
    fn from(handle: WinHandle) -> Self {
        to_hwnd(handle).into()
    }
}

impl WindowRef {
    pub fn handle(&self) -> WinHandle {
        to_handle(self.hwnd)
    }

    /// Fails if the handle doesn't identify a window anymore.
    pub fn check(&self) -> Result<(), WinError> {
        match is_window(self.hwnd) {
            true => Ok(()),
            false => Err(WinError::InvalidHandle(self.handle())),
        }
    }

    pub fn get_title(&self) -> Option<String> {
        get_window_title(self.hwnd)
    }

    pub fn is_visible(&self) -> bool {
        is_window_visible(self.hwnd)
    }

    pub fn is_iconic(&self) -> bool {
        is_iconic(self.hwnd)
    }

    pub fn info(&self) -> WindowInfo {
        WindowInfo {
            handle: self.handle(),
            title: self.get_title().unwrap_or_default(),
            visible: self.is_visible(),
            minimized: self.is_iconic(),
        }
    }

    pub fn get_area(&self) -> Result<Area, WinError> {
        self.check()?;
        get_window_rect(self.hwnd)
            .map(Area::from_edges)
            .ok_or_else(|| self.os_error("get_area", 0))
    }

    pub fn get_style(&self, extended: bool) -> Result<u32, WinError> {
        self.check()?;
        let (op, index) = if extended { ("get_ex_style", GWL_EXSTYLE) } else { ("get_style", GWL_STYLE) };
        get_window_long(self.hwnd, index).map_err(|code| self.os_error(op, code))
    }

    pub fn set_style(&self, style: u32, extended: bool) -> Result<(), WinError> {
        self.check()?;
        let (op, index) = if extended { ("set_ex_style", GWL_EXSTYLE) } else { ("set_style", GWL_STYLE) };
        set_window_long(self.hwnd, index, style).map_err(|code| self.os_error(op, code))
    }

    pub fn resize_and_move(&self, area: Area) -> Result<(), WinError> {
        let (w, h) = (area.width as i32, area.height as i32);
        self.set_window_pos("set_area", None, (area.x, area.y, w, h), SWP_NOZORDER | SWP_NOACTIVATE)
    }

    pub fn redraw_frame(&self) -> Result<(), WinError> {
        let flags = SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE | SWP_FRAMECHANGED;
        self.set_window_pos("refresh_frame", None, (0, 0, 0, 0), flags)
    }

    pub fn set_topmost(&self, topmost: bool) -> Result<(), WinError> {
        let hwnd_flag = if topmost { HWND_TOPMOST } else { HWND_NOTOPMOST };
        self.set_window_pos("set_topmost", Some(hwnd_flag), (0, 0, 0, 0), SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE)
    }

    pub fn restore(&self) -> Result<(), WinError> {
        self.check()?;
        show_window(self.hwnd, SW_RESTORE);
        Ok(())
    }

    pub fn focus(&self) -> Result<(), WinError> {
        self.check()?;
        match set_foreground_window(self.hwnd) {
            true => Ok(()),
            false => Err(self.os_error("set_foreground", 0)),
        }
    }

    fn set_window_pos(
        &self,
        op: &'static str,
        insert_after: Option<HWND>,
        (x, y, cx, cy): (i32, i32, i32, i32),
        flags: SET_WINDOW_POS_FLAGS,
    ) -> Result<(), WinError> {
        self.check()?;
        let insert_after = insert_after.unwrap_or(HWND(std::ptr::null_mut()));
        unsafe { SetWindowPos(self.hwnd, insert_after, x, y, cx, cy, flags) }.map_err(|e| self.os_error(op, e.code().0))
    }

    fn os_error(&self, op: &'static str, code: impl TryInto<i32>) -> WinError {
        WinError::Os {
            op,
            handle: self.handle(),
            code: code.try_into().unwrap_or(-1),
        }
    }
}

/// Win32 implementation of the window calls used by the window state manager.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Platform;

impl WindowPlatform for Win32Platform {
    fn list_top_level_windows(&self) -> Result<Vec<WindowInfo>, WinError> {
        let windows = enum_top_level_windows().map_err(|code| WinError::Os {
            op: "list_top_level_windows",
            handle: WinHandle(0),
            code: code as i32,
        })?;
        Ok(windows.into_iter().map(|hwnd| WindowRef::from(hwnd).info()).collect())
    }

    fn get_area(&self, handle: WinHandle) -> Result<Area, WinError> {
        WindowRef::from(handle).get_area()
    }

    fn set_area(&self, handle: WinHandle, area: Area) -> Result<(), WinError> {
        WindowRef::from(handle).resize_and_move(area)
    }

    fn get_style(&self, handle: WinHandle) -> Result<u32, WinError> {
        WindowRef::from(handle).get_style(false)
    }

    fn set_style(&self, handle: WinHandle, style: u32) -> Result<(), WinError> {
        WindowRef::from(handle).set_style(style, false)
    }

    fn get_ex_style(&self, handle: WinHandle) -> Result<u32, WinError> {
        WindowRef::from(handle).get_style(true)
    }

    fn set_ex_style(&self, handle: WinHandle, ex_style: u32) -> Result<(), WinError> {
        WindowRef::from(handle).set_style(ex_style, true)
    }

    fn refresh_frame(&self, handle: WinHandle) -> Result<(), WinError> {
        WindowRef::from(handle).redraw_frame()
    }

    fn set_topmost(&self, handle: WinHandle, topmost: bool) -> Result<(), WinError> {
        WindowRef::from(handle).set_topmost(topmost)
    }

    fn is_minimized(&self, handle: WinHandle) -> Result<bool, WinError> {
        let window = WindowRef::from(handle);
        window.check()?;
        Ok(window.is_iconic())
    }

    fn restore(&self, handle: WinHandle) -> Result<(), WinError> {
        WindowRef::from(handle).restore()
    }

    fn set_foreground(&self, handle: WinHandle) -> Result<(), WinError> {
        WindowRef::from(handle).focus()
    }
}
