pub mod assets;
pub mod cli_args;
pub mod configs;
pub mod controller;
pub mod title;
pub mod window_selector;

pub mod layouts {
    pub mod ini;
    pub mod layout_config;
    pub mod presets;
    pub mod repair;
    pub mod settings;
    pub mod store;
}

pub mod structs {
    pub mod area;
}

pub mod window_state {
    pub mod error;
    #[cfg(test)]
    pub mod fake_platform;
    pub mod manager;
    pub mod platform;
    pub mod window_snapshot;
}
