mod app;
mod app_main;
#[cfg(windows)]
mod win32;

fn main() {
    app_main::main();
}
