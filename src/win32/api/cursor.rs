use windows::Win32::Foundation::{HWND, POINT};
use windows::Win32::System::Console::GetConsoleWindow;
use windows::Win32::UI::Input::KeyboardAndMouse::{GetAsyncKeyState, VK_LBUTTON};
use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

pub fn get_cursor_pos() -> Option<(i32, i32)> {
    let mut lppoint = POINT { x: 0, y: 0 };
    unsafe { GetCursorPos(&mut lppoint) }.ok().map(|_| (lppoint.x, lppoint.y))
}

pub fn is_left_button_down() -> bool {
    // INFO: the most significant bit is set while the key is down
    (unsafe { GetAsyncKeyState(VK_LBUTTON.0 as i32) } as u16 & 0x8000) != 0
}

/// Console window hosting this process, if any.
pub fn get_console_window() -> Option<HWND> {
    let hwnd = unsafe { GetConsoleWindow() };
    (!hwnd.is_invalid()).then_some(hwnd)
}
