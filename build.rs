use {
    std::{env, io},
    winresource::WindowsResource,
};

fn main() -> io::Result<()> {
    if env::var_os("CARGO_CFG_WINDOWS").is_some() {
        WindowsResource::new()
            .set("ProductName", "WinPlacer")
            .set("FileDescription", "Window layout manager")
            .compile()?;
    }
    Ok(())
}
