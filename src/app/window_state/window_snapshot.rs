use std::fmt::Display;

use super::platform::{WinError, WindowPlatform, WS_EX_TOPMOST};
use crate::app::layouts::layout_config::WinHandle;
use crate::app::structs::area::Area;

/// Geometry and style of a window, taken when it becomes managed and used to restore it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSnapshot {
    pub area: Area,
    pub style: u32,
    pub ex_style: u32,
}

impl WindowSnapshot {
    pub fn capture(platform: &impl WindowPlatform, handle: WinHandle) -> Result<WindowSnapshot, WinError> {
        Ok(WindowSnapshot {
            area: platform.get_area(handle)?,
            style: platform.get_style(handle)?,
            ex_style: platform.get_ex_style(handle)?,
        })
    }

    pub fn is_topmost(&self) -> bool {
        self.ex_style & WS_EX_TOPMOST != 0
    }
}

impl Display for WindowSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let a = self.area;
        let topmost = if self.is_topmost() { "t" } else { "!t" };
        write!(
            f,
            "(view: ({}, {}, {}, {}), style: {:x}, exstyle: {:x}, {})",
            a.x, a.y, a.width, a.height, self.style, self.ex_style, topmost
        )
    }
}
