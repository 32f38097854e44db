use std::cell::RefCell;

use super::platform::{WinError, WindowInfo, WindowPlatform, FRAME_STYLE, WS_EX_TOPMOST};
use crate::app::layouts::layout_config::WinHandle;
use crate::app::structs::area::Area;

pub const WS_VISIBLE: u32 = 0x1000_0000;

#[derive(Debug, Clone, PartialEq)]
pub struct FakeWindow {
    pub title: String,
    pub area: Area,
    pub style: u32,
    pub ex_style: u32,
    pub visible: bool,
    pub minimized: bool,
}

impl FakeWindow {
    pub fn new(title: &str, area: Area) -> FakeWindow {
        FakeWindow {
            title: title.to_string(),
            area,
            style: WS_VISIBLE | FRAME_STYLE,
            ex_style: 0,
            visible: true,
            minimized: false,
        }
    }

    pub fn topmost(mut self) -> Self {
        self.ex_style |= WS_EX_TOPMOST;
        self
    }

    pub fn minimized(mut self) -> Self {
        self.minimized = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn is_topmost(&self) -> bool {
        self.ex_style & WS_EX_TOPMOST != 0
    }

    pub fn has_frame(&self) -> bool {
        self.style & FRAME_STYLE == FRAME_STYLE
    }
}

/// In-memory window system. Handles are assigned in insertion order, starting from 1.
#[derive(Default)]
pub struct FakePlatform {
    windows: RefCell<Vec<(WinHandle, FakeWindow)>>,
    calls: RefCell<Vec<String>>,
    failing_op: RefCell<Option<&'static str>>,
}

impl FakePlatform {
    pub fn new() -> FakePlatform {
        FakePlatform::default()
    }

    pub fn add(&self, window: FakeWindow) -> WinHandle {
        let mut windows = self.windows.borrow_mut();
        let handle = WinHandle(windows.len() as isize + 1);
        windows.push((handle, window));
        handle
    }

    pub fn window(&self, handle: WinHandle) -> Option<FakeWindow> {
        self.windows
            .borrow()
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, w)| w.clone())
    }

    /// Simulates the user closing the window.
    pub fn close(&self, handle: WinHandle) {
        self.windows.borrow_mut().retain(|(h, _)| *h != handle);
    }

    /// Makes every call named `op` fail until cleared with `None`.
    pub fn fail_on(&self, op: Option<&'static str>) {
        *self.failing_op.borrow_mut() = op;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn with_window<T>(
        &self,
        op: &'static str,
        handle: WinHandle,
        f: impl FnOnce(&mut FakeWindow) -> T,
    ) -> Result<T, WinError> {
        self.calls.borrow_mut().push(format!("{op}:{}", handle.0));
        if *self.failing_op.borrow() == Some(op) {
            return Err(WinError::Os { op, handle, code: 5 });
        }

        let mut windows = self.windows.borrow_mut();
        match windows.iter_mut().find(|(h, _)| *h == handle) {
            Some((_, w)) => Ok(f(w)),
            None => Err(WinError::InvalidHandle(handle)),
        }
    }
}

impl WindowPlatform for FakePlatform {
    fn list_top_level_windows(&self) -> Result<Vec<WindowInfo>, WinError> {
        if *self.failing_op.borrow() == Some("list_top_level_windows") {
            return Err(WinError::Unsupported("list_top_level_windows"));
        }

        Ok(self
            .windows
            .borrow()
            .iter()
            .map(|(h, w)| WindowInfo {
                handle: *h,
                title: w.title.clone(),
                visible: w.visible,
                minimized: w.minimized,
            })
            .collect())
    }

    fn get_area(&self, handle: WinHandle) -> Result<Area, WinError> {
        self.with_window("get_area", handle, |w| w.area)
    }

    fn set_area(&self, handle: WinHandle, area: Area) -> Result<(), WinError> {
        self.with_window("set_area", handle, |w| w.area = area)
    }

    fn get_style(&self, handle: WinHandle) -> Result<u32, WinError> {
        self.with_window("get_style", handle, |w| w.style)
    }

    fn set_style(&self, handle: WinHandle, style: u32) -> Result<(), WinError> {
        self.with_window("set_style", handle, |w| w.style = style)
    }

    fn get_ex_style(&self, handle: WinHandle) -> Result<u32, WinError> {
        self.with_window("get_ex_style", handle, |w| w.ex_style)
    }

    fn set_ex_style(&self, handle: WinHandle, ex_style: u32) -> Result<(), WinError> {
        // INFO: like Win32, the topmost bit can't be changed through the extended style
        self.with_window("set_ex_style", handle, |w| {
            w.ex_style = (ex_style & !WS_EX_TOPMOST) | (w.ex_style & WS_EX_TOPMOST)
        })
    }

    fn refresh_frame(&self, handle: WinHandle) -> Result<(), WinError> {
        self.with_window("refresh_frame", handle, |_| ())
    }

    fn set_topmost(&self, handle: WinHandle, topmost: bool) -> Result<(), WinError> {
        self.with_window("set_topmost", handle, |w| match topmost {
            true => w.ex_style |= WS_EX_TOPMOST,
            false => w.ex_style &= !WS_EX_TOPMOST,
        })
    }

    fn is_minimized(&self, handle: WinHandle) -> Result<bool, WinError> {
        self.with_window("is_minimized", handle, |w| w.minimized)
    }

    fn restore(&self, handle: WinHandle) -> Result<(), WinError> {
        self.with_window("restore", handle, |w| w.minimized = false)
    }

    fn set_foreground(&self, handle: WinHandle) -> Result<(), WinError> {
        self.with_window("set_foreground", handle, |_| ())
    }
}
