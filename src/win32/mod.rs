pub mod api {
    pub mod cursor;
    pub mod monitor;
    pub mod window;
}

pub mod callbacks {
    pub mod enum_windows;
}

pub mod window {
    pub mod window_ref;
}

pub mod pointer_probe;
