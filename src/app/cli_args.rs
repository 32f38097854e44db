use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::app::structs::area::Area;

fn less_than_2(l: &str) -> Result<u8, String> {
    const ERROR_MSG: &str = "LOG_TYPE must be 0 (no log file), 1 (error log file) or 2 (all log files)";
    let log_type = l.parse::<u8>().map_err(|_| ERROR_MSG)?;
    if log_type <= 2 {
        Ok(log_type)
    } else {
        Err(ERROR_MSG.to_owned())
    }
}

fn valid_log_level(l: &str) -> Result<u8, String> {
    const ERROR_MSG: &str = "LOGLEVEL must be 0 (off), 1 (trace), 2 (debug), 3 (info), 4 (warn) or 5 (error)";
    let log_level = l.parse::<u8>().map_err(|_| ERROR_MSG)?;
    if log_level <= 5 {
        Ok(log_level)
    } else {
        Err(ERROR_MSG.to_owned())
    }
}

fn screen_size(s: &str) -> Result<Area, String> {
    const ERROR_MSG: &str = "SCREEN must be WIDTHxHEIGHT (e.g. 1920x1080)";
    let s = s.to_lowercase();
    let (w, h) = s.split_once('x').ok_or(ERROR_MSG)?;
    match (w.trim().parse::<u32>(), h.trim().parse::<u32>()) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok(Area::new(0, 0, w, h)),
        _ => Err(ERROR_MSG.to_owned()),
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    #[arg(id = "LOG_TYPE",  long = "log", help = "Can be 0 (no log file is created), 1 (error log file is created) or 2 (all log files are created)", value_parser=less_than_2, default_value_t = 1)]
    log_enabled: u8,

    #[arg( long = "loglevel", help = "Can be 0 (off), 1 (trace), 2 (debug), 3 (info), 4 (warn) or 5 (error)", value_parser=valid_log_level, default_value_t = 3)]
    log_level: u8,

    #[arg(long = "base-dir", help = "Directory of the configuration files (default: executable directory)")]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Lists the saved layouts, marking the detected default one
    List,
    /// Shows the rules of a layout and which windows are open
    Show { name: String },
    /// Applies a layout to the open windows
    Apply {
        name: String,
        #[arg(long, help = "Waits for Enter, then restores the windows")]
        hold: bool,
    },
    /// Lists the titles of the open windows
    Titles,
    /// Saves the open windows with the given titles as a new layout
    Save {
        name: String,
        #[arg(required = true)]
        titles: Vec<String>,
    },
    /// Waits for a click on a window and prints its title
    Select,
    /// Deletes a layout
    Delete { name: String },
    /// Opens the layouts folder
    OpenFolder,
    /// Shows or updates the UI settings
    Settings {
        #[arg(long)]
        compact: Option<bool>,
        #[arg(long = "use-images")]
        use_images: Option<bool>,
    },
    /// Shows the auto-align presets, resolved on a screen
    Presets {
        #[arg(long, help = "Number of windows (default: all presets)")]
        count: Option<u8>,
        #[arg(long, value_parser = screen_size, help = "Screen size as WIDTHxHEIGHT (default: primary work area)")]
        screen: Option<Area>,
    },
}

impl CliArgs {
    pub fn is_file_all_enabled(&self) -> bool {
        self.log_enabled == 2
    }

    pub fn is_file_error_enabled(&self) -> bool {
        self.log_enabled >= 1
    }

    pub fn get_log_level(&self) -> log::LevelFilter {
        match self.log_level {
            0 => log::LevelFilter::Off,
            1 => log::LevelFilter::Trace,
            2 => log::LevelFilter::Debug,
            3 => log::LevelFilter::Info,
            4 => log::LevelFilter::Warn,
            5 => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        }
    }
}
