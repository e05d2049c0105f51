//! Tusools entry point.
//!
//! Wires the configuration, toggle store, and native settings backend
//! together, then runs a small console menu on stdin/stdout.
//!
//! ```text
//! main()
//!  └─ load_config()            -- defaults written on first run
//!  └─ FileToggleStore::ensure_base_location()
//!  └─ native_backend()         -- Windows registry / GNOME gsettings
//!  └─ menu loop                -- ui_bridge::handle_action() per choice
//! ```
//!
//! Logs go to stderr so they never interleave with the menu.  `q` or end of
//! input exits with status 0.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tusools::application::{SettingsAction, SettingsEngine, ToggleStore};
use tusools::infrastructure::settings_backend::native_backend;
use tusools::infrastructure::storage::config::{config_file_path, load_config, save_config};
use tusools::infrastructure::storage::toggle_file::{FileToggleStore, StorageLayout};
use tusools::infrastructure::ui_bridge::{
    background_wallpaper_path, get_labels, handle_action, AppState, ButtonLabel,
    NotificationLevel,
};
use tusools_core::{Feature, ToggleFeature};

fn main() -> anyhow::Result<()> {
    let config = load_config();

    // RUST_LOG wins, then the configured level, then "info".
    let level = config
        .as_ref()
        .map(|c| c.general.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config.context("failed to load configuration")?;
    info!(version = env!("CARGO_PKG_VERSION"), "tusools starting");

    if let Ok(path) = config_file_path() {
        if !path.exists() {
            match save_config(&config) {
                Ok(()) => info!(path = %path.display(), "wrote default configuration"),
                Err(e) => warn!(error = %e, "could not write default configuration"),
            }
        }
    }

    let base_dir = config
        .resolve_base_dir()
        .context("failed to resolve storage directory")?;
    let layout = StorageLayout::new(base_dir);
    let store = Arc::new(FileToggleStore::new(layout.clone()));
    store
        .ensure_base_location()
        .context("failed to prepare storage directory")?;

    let engine = SettingsEngine::new(store, native_backend(&config.system));
    let state = AppState::new(engine, layout);

    run_menu(&state, &mut io::stdin().lock(), &mut io::stdout())?;

    info!("tusools stopped");
    Ok(())
}

/// One menu entry: the key the user types and what it does.
enum MenuItem {
    Wallpaper,
    Theme,
    Font,
    Transparency,
    Toggle(ToggleFeature),
}

const MENU: [(&str, MenuItem); 7] = [
    ("1", MenuItem::Wallpaper),
    ("2", MenuItem::Theme),
    ("3", MenuItem::Font),
    ("4", MenuItem::Transparency),
    ("5", MenuItem::Toggle(ToggleFeature::Telemetry)),
    ("6", MenuItem::Toggle(ToggleFeature::WindowsUpdate)),
    ("7", MenuItem::Toggle(ToggleFeature::Defender)),
];

fn run_menu(state: &AppState, input: &mut impl BufRead, out: &mut impl Write) -> io::Result<()> {
    loop {
        let labels = get_labels(state).data.unwrap_or_default();
        print_menu(out, &labels)?;

        let Some(choice) = prompt(input, out, "> ")? else {
            return Ok(());
        };
        if choice.eq_ignore_ascii_case("q") {
            return Ok(());
        }

        let Some((_, item)) = MENU.iter().find(|(key, _)| *key == choice) else {
            writeln!(out, "Unknown choice '{choice}'.")?;
            continue;
        };

        let action = match item {
            MenuItem::Wallpaper => {
                let Some(path) = prompt(input, out, "Image path (blank for background/back.png): ")?
                else {
                    return Ok(());
                };
                if path.is_empty() {
                    SettingsAction::Wallpaper(background_wallpaper_path(state))
                } else {
                    SettingsAction::Wallpaper(PathBuf::from(path))
                }
            }
            MenuItem::Theme => SettingsAction::Theme,
            MenuItem::Font => {
                let Some(path) = prompt(input, out, "Font file (.ttf, .otf): ")? else {
                    return Ok(());
                };
                if path.is_empty() {
                    continue;
                }
                SettingsAction::Font(PathBuf::from(path))
            }
            MenuItem::Transparency => {
                let Some(raw) = prompt(input, out, "Transparency percentage (20-80): ")? else {
                    return Ok(());
                };
                match raw.parse::<i64>() {
                    Ok(percent) => SettingsAction::Transparency(percent),
                    Err(_) => {
                        writeln!(out, "[Error] Invalid input. Please enter a number.")?;
                        continue;
                    }
                }
            }
            MenuItem::Toggle(feature) => {
                let clickable = labels
                    .iter()
                    .find(|l| l.feature == feature.feature())
                    .map_or(true, |l| l.enabled);
                if !clickable {
                    writeln!(out, "{} is already disabled.", feature.display_name())?;
                    continue;
                }
                SettingsAction::Toggle(*feature)
            }
        };

        let result = handle_action(state, action);
        match result.data {
            Some(response) => {
                let tag = match response.notification.level {
                    NotificationLevel::Info => "",
                    NotificationLevel::Error => "[Error] ",
                };
                writeln!(
                    out,
                    "{tag}{}: {}",
                    response.notification.title, response.notification.message
                )?;
            }
            None => writeln!(out, "[Error] {}", result.error.unwrap_or_default())?,
        }
    }
}

fn print_menu(out: &mut impl Write, labels: &[ButtonLabel]) -> io::Result<()> {
    let label = |feature: Feature| {
        labels
            .iter()
            .find(|l| l.feature == feature)
            .map(|l| {
                if l.enabled {
                    l.text.clone()
                } else {
                    format!("{} (unavailable)", l.text)
                }
            })
            .unwrap_or_else(|| feature.display_name().to_string())
    };

    writeln!(out)?;
    writeln!(out, "Tusools v{} - Personalization Settings", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "  1) Change Wallpaper")?;
    writeln!(out, "  2) {}", label(Feature::Theme))?;
    writeln!(out, "  3) Change System Font")?;
    writeln!(out, "  4) Set Terminal Transparency")?;
    writeln!(out, "Important Settings")?;
    writeln!(out, "  5) {}", label(Feature::Telemetry))?;
    writeln!(out, "  6) {}", label(Feature::WindowsUpdate))?;
    writeln!(out, "  7) {}", label(Feature::Defender))?;
    writeln!(out, "  q) Quit")
}

/// Prints `text` and reads one trimmed line.  `None` at end of input.
fn prompt(input: &mut impl BufRead, out: &mut impl Write, text: &str) -> io::Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
