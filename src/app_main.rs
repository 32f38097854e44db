use crate::app::cli_args::{CliArgs, Command};
use crate::app::configs::AppConfig;
use crate::app::controller::ApplicationController;
use crate::app::layouts::presets::load_or_create_presets;
use crate::app::layouts::store::LayoutConfigStore;
use crate::app::structs::area::Area;
use crate::app::window_state::manager::WindowStateManager;
use crate::app::window_state::platform::WindowPlatform;
use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::threshold::ThresholdFilter;
use std::path::{Path, PathBuf};

const DEFAULT_SCREEN: Area = Area {
    x: 0,
    y: 0,
    width: 1920,
    height: 1080,
};

pub fn main() {
    let args = CliArgs::parse();
    let base_dir = resolve_base_dir(args.base_dir.clone());

    if let Err(e) = init_logger(
        &base_dir.join("logs"),
        args.is_file_all_enabled(),
        args.is_file_error_enabled(),
        args.get_log_level(),
    ) {
        eprintln!("Can't initialize the logger: {e}");
    }

    log::info!("Base directory: {}", base_dir.display());
    let config = AppConfig::load(&base_dir)
        .inspect_err(|e| log::error!("Can't read config file: {}", e))
        .unwrap_or_default();

    let exit_code = start_app(args.command, &base_dir, &config);
    std::process::exit(exit_code);
}

#[cfg(windows)]
fn start_app(command: Command, base_dir: &Path, config: &AppConfig) -> i32 {
    use crate::app::window_selector::{SelectionOutcome, WindowSelector};
    use crate::win32::api::monitor::get_primary_work_area;
    use crate::win32::pointer_probe::Win32PointerProbe;
    use crate::win32::window::window_ref::Win32Platform;

    let mut app = build_controller(Win32Platform, base_dir, config);

    match command {
        Command::Select => {
            println!("Click on a window to select it...");
            let selector = WindowSelector::start(
                Win32PointerProbe,
                Win32PointerProbe::own_window(),
                config.poll_interval(),
                config.selection_timeout(),
            );

            match selector.wait() {
                SelectionOutcome::Selected(handle) => {
                    let title = app.window_title(handle).unwrap_or_default();
                    println!("{} {}", handle, title);
                    if let Some(settings) = app.manager().collect_window_settings_of(handle) {
                        println!("{:?}", settings);
                    }
                    0
                }
                SelectionOutcome::TimedOut => {
                    println!("No window selected");
                    1
                }
                SelectionOutcome::Cancelled => 1,
            }
        }
        Command::Presets { count, screen } => {
            let screen = screen.or_else(get_primary_work_area).unwrap_or(DEFAULT_SCREEN);
            print_presets(&app, count, &screen)
        }
        command => run_command(&mut app, command),
    }
}

#[cfg(not(windows))]
fn start_app(command: Command, _base_dir: &Path, _config: &AppConfig) -> i32 {
    log::error!("Command {:?} is not supported on this platform", command);
    1
}

pub fn build_controller<P: WindowPlatform>(
    platform: P,
    base_dir: &Path,
    config: &AppConfig,
) -> ApplicationController<P> {
    let store = LayoutConfigStore::new(config.configs_dir(base_dir), config.settings_file(base_dir));
    store.ensure_configs_dir();

    let presets = load_or_create_presets(&config.presets_file(base_dir));
    let manager = WindowStateManager::new(platform, &config.windows.ignored_titles);
    ApplicationController::new(store, manager, presets)
}

/// Runs a command that doesn't need OS specific services. Returns the exit code.
pub fn run_command<P: WindowPlatform>(app: &mut ApplicationController<P>, command: Command) -> i32 {
    match command {
        Command::List => {
            let default = app.default_config();
            let entries = app.list();
            if entries.is_empty() {
                println!("No layouts in {}", app.store().configs_dir().display());
            }
            for entry in entries {
                let marker = if default.as_ref() == Some(&entry.name) { "*" } else { " " };
                println!("{} {}", marker, entry.name);
            }
            0
        }
        Command::Show { name } => match app.preview(&name) {
            Some(entries) => {
                for e in entries {
                    let area = e
                        .area
                        .map(|a| format!("({}, {}) {}x{}", a.x, a.y, a.width, a.height))
                        .unwrap_or("-".to_string());
                    let name = if e.always_on_top { format!("* {} *", e.name) } else { e.name };
                    let state = if e.window_exists { "open" } else { "missing" };
                    println!("{:<40} {:<28} {}", name, area, state);
                }
                0
            }
            None => not_found(&name),
        },
        Command::Apply { name, hold } => {
            let Some(report) = app.apply_config(&name) else {
                return not_found(&name);
            };

            report.applied.iter().for_each(|n| println!("applied: {n}"));
            report.failed.iter().for_each(|n| println!("failed:  {n}"));
            report.missing.iter().for_each(|n| println!("missing: {n}"));
            println!("{}", report.status);

            if hold {
                println!("Press Enter to restore the windows...");
                let mut line = String::new();
                std::io::stdin()
                    .read_line(&mut line)
                    .inspect_err(|e| log::error!("Can't read from stdin: {}", e))
                    .ok();
                println!("{} windows restored", app.reset());
            }
            0
        }
        Command::Titles => {
            app.window_titles().iter().for_each(|t| println!("{t}"));
            0
        }
        Command::Save { name, titles } => exit_code(app.create_config(&name, &titles)),
        Command::Delete { name } => exit_code(app.delete_config(&name)),
        Command::OpenFolder => {
            let dir = app.store().configs_dir().to_path_buf();
            let opened = app.store().ensure_configs_dir()
                && open::that(&dir)
                    .inspect_err(|e| log::error!("Can't open {}: {}", dir.display(), e))
                    .is_ok();
            exit_code(opened)
        }
        Command::Settings { compact, use_images } => {
            let settings = match (compact, use_images) {
                (None, None) => Some(app.settings()),
                _ => app.update_settings(compact, use_images),
            };
            match settings {
                Some(s) => {
                    println!("compact: {}\nuse_images: {}", s.compact, s.use_images);
                    0
                }
                None => 1,
            }
        }
        Command::Presets { count, screen } => print_presets(app, count, &screen.unwrap_or(DEFAULT_SCREEN)),
        Command::Select => {
            log::error!("Window selection is not supported on this platform");
            1
        }
    }
}

fn print_presets<P: WindowPlatform>(app: &ApplicationController<P>, count: Option<u8>, screen: &Area) -> i32 {
    let counts = count.map_or_else(|| app.preset_counts(), |c| vec![c]);
    let mut found = false;

    for c in counts {
        let Some(areas) = app.preset_areas(c, screen) else {
            log::warn!("No preset for {} windows", c);
            continue;
        };

        found = true;
        println!("{} windows:", c);
        for a in areas {
            println!("  ({}, {}) {}x{}", a.x, a.y, a.width, a.height);
        }
    }

    exit_code(found)
}

fn not_found(name: &str) -> i32 {
    eprintln!("Layout '{}' not found", name);
    1
}

fn exit_code(ok: bool) -> i32 {
    if ok {
        0
    } else {
        1
    }
}

/// `--base-dir`, otherwise the directory of the executable, otherwise `~/.config/winplacer`.
fn resolve_base_dir(arg: Option<PathBuf>) -> PathBuf {
    arg.or_else(|| {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
    })
    .or_else(|| dirs::home_dir().map(|h| h.join(".config").join("winplacer")))
    .unwrap_or_else(|| PathBuf::from("."))
}

fn init_logger(logs_dir: &Path, file_all: bool, file_errors: bool, level: log::LevelFilter) -> Result<(), String> {
    let pattern = PatternEncoder::new("{h({d(%Y-%m-%d %H:%M:%S)} {({l}):5.5} {f}:{L})}: {m}{n}");
    let console: ConsoleAppender = ConsoleAppender::builder()
        .encoder(Box::new(pattern.clone()))
        .target(log4rs::append::console::Target::Stderr)
        .build();

    const FILE_SIZE: u64 = 10 * 1024 * 1024; // INFO: 10 MB
    const NUM_FILES: u32 = 3;

    let rolling_file = |name: &str| -> Result<RollingFileAppender, String> {
        let pattern_path = logs_dir.join(format!("{name}.{{}}.gz"));
        let roller = FixedWindowRoller::builder()
            .build(&pattern_path.to_string_lossy(), NUM_FILES)
            .map_err(|e| e.to_string())?;
        let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(FILE_SIZE)), Box::new(roller));

        RollingFileAppender::builder()
            .encoder(Box::new(pattern.clone()))
            .build(logs_dir.join(format!("{name}.log")), Box::new(policy))
            .map_err(|e| e.to_string())
    };

    let mut root_builder = Root::builder().appender("console");
    let mut config_builder =
        log4rs::config::Config::builder().appender(Appender::builder().build("console", Box::new(console)));

    if file_all {
        root_builder = root_builder.appender("file_all");
        config_builder =
            config_builder.appender(Appender::builder().build("file_all", Box::new(rolling_file("winplacer")?)));
    }

    if file_errors {
        root_builder = root_builder.appender("file_errors");
        config_builder = config_builder.appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Error)))
                .build("file_errors", Box::new(rolling_file("errors")?)),
        );
    }

    let config = config_builder
        .build(root_builder.build(level))
        .map_err(|e| e.to_string())?;
    log4rs::init_config(config).map_err(|e| e.to_string())?;

    log_panics::init();
    Ok(())
}
