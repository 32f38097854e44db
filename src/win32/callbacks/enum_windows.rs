use windows::Win32::Foundation::{BOOL, HWND, LPARAM};

pub extern "system" fn top_level_windows(hwnd: HWND, param: LPARAM) -> BOOL {
    let windows = unsafe { &mut *(param.0 as *mut Vec<HWND>) };
    windows.push(hwnd);
    true.into()
}
