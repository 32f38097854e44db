use std::ffi::c_void;

use crate::app::layouts::layout_config::WinHandle;
use crate::win32::callbacks::enum_windows::top_level_windows;
use windows::Win32::Foundation::{GetLastError, SetLastError, HWND, LPARAM, POINT, RECT, WIN32_ERROR};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetAncestor, GetWindowLongW, GetWindowRect, GetWindowTextLengthW, GetWindowTextW, IsIconic,
    IsWindow, IsWindowVisible, SetForegroundWindow, SetWindowLongW, ShowWindow, WindowFromPoint, GA_ROOT,
    SHOW_WINDOW_CMD, WINDOW_LONG_PTR_INDEX,
};

pub fn to_hwnd(handle: WinHandle) -> HWND {
    HWND(handle.0 as *mut c_void)
}

pub fn to_handle(hwnd: HWND) -> WinHandle {
    WinHandle(hwnd.0 as isize)
}

pub fn is_window(hwnd: HWND) -> bool {
    !hwnd.is_invalid() && unsafe { IsWindow(hwnd) }.as_bool()
}

pub fn is_window_visible(hwnd: HWND) -> bool {
    unsafe { IsWindowVisible(hwnd) }.as_bool()
}

pub fn is_iconic(hwnd: HWND) -> bool {
    unsafe { IsIconic(hwnd) }.as_bool()
}

pub fn show_window(hwnd: HWND, cmd: SHOW_WINDOW_CMD) -> bool {
    unsafe { ShowWindow(hwnd, cmd) }.as_bool()
}

pub fn set_foreground_window(hwnd: HWND) -> bool {
    unsafe { SetForegroundWindow(hwnd) }.as_bool()
}

pub fn get_window_title(hwnd: HWND) -> Option<String> {
    let len = unsafe { GetWindowTextLengthW(hwnd) };
    if len <= 0 {
        return None;
    }

    let mut buffer: Vec<u16> = vec![0; len as usize + 1];
    let copied = unsafe { GetWindowTextW(hwnd, &mut buffer) };
    Some(decode_title(&buffer, copied))
}

/// Lone surrogates become U+FFFD, which normalization drops anyway.
fn decode_title(buffer: &[u16], copied: i32) -> String {
    let len = (copied.max(0) as usize).min(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}

pub fn get_window_rect(hwnd: HWND) -> Option<[i32; 4]> {
    let mut rect = RECT::default();
    unsafe { GetWindowRect(hwnd, &mut rect) }
        .ok()
        .map(|_| [rect.left, rect.top, rect.right, rect.bottom])
}

/// Reads a window long value, returning the Win32 error code on failure.
pub fn get_window_long(hwnd: HWND, index: WINDOW_LONG_PTR_INDEX) -> Result<u32, u32> {
    unsafe {
        SetLastError(WIN32_ERROR(0));
        match GetWindowLongW(hwnd, index) {
            0 => match GetLastError() {
                WIN32_ERROR(0) => Ok(0),
                e => Err(e.0),
            },
            v => Ok(v as u32),
        }
    }
}

/// Writes a window long value, returning the Win32 error code on failure.
pub fn set_window_long(hwnd: HWND, index: WINDOW_LONG_PTR_INDEX, value: u32) -> Result<(), u32> {
    unsafe {
        SetLastError(WIN32_ERROR(0));
        match SetWindowLongW(hwnd, index, value as i32) {
            0 => match GetLastError() {
                WIN32_ERROR(0) => Ok(()),
                e => Err(e.0),
            },
            _ => Ok(()),
        }
    }
}

/// Top-level window under the given screen point.
pub fn root_window_from_point(point: (i32, i32)) -> Option<HWND> {
    let hwnd = unsafe { WindowFromPoint(POINT { x: point.0, y: point.1 }) };
    if hwnd.is_invalid() {
        return None;
    }

    match unsafe { GetAncestor(hwnd, GA_ROOT) } {
        root if root.is_invalid() => Some(hwnd),
        root => Some(root),
    }
}

pub fn enum_top_level_windows() -> Result<Vec<HWND>, u32> {
    let mut windows: Vec<HWND> = Vec::new();
    let lparam = LPARAM(&mut windows as *mut Vec<HWND> as isize);

    unsafe { EnumWindows(Some(top_level_windows), lparam) }.map_err(|e| e.code().0 as u32)?;
    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_title_keeps_text_around_lone_surrogate() {
        let mut buffer: Vec<u16> = "Mail ".encode_utf16().collect();
        buffer.push(0xD800);
        buffer.extend(" - Inbox".encode_utf16());
        let copied = buffer.len() as i32;
        buffer.push(0);

        assert_eq!(decode_title(&buffer, copied), "Mail \u{FFFD} - Inbox");
        assert_eq!(decode_title(&buffer, -1), "");
        assert_eq!(decode_title(&buffer, 1000).len(), "Mail \u{FFFD} - Inbox\0".len());
    }
}
