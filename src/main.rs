// src/main.rs v3
//! Minimap Overlay - game minimap window with egui

#[cfg(feature = "gui")]
use clap::Parser;
#[cfg(feature = "gui")]
use minimap_overlay::OverlayConfig;
#[cfg(feature = "gui")]
use std::path::PathBuf;

#[cfg(feature = "gui")]
#[derive(Debug, Parser)]
#[command(name = "minimap-overlay", about = "Game-overlay minimap renderer")]
struct Cli {
    /// Tile cache directory (overrides the config file)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Marker JSON file to load (overrides the config file)
    #[arg(long)]
    markers: Option<PathBuf>,

    /// Tile server base URL (overrides the config file)
    #[arg(long)]
    tile_url: Option<String>,

    /// Start at a fixed world position instead of the last known one
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    position: Option<Vec<f64>>,
}

#[cfg(feature = "gui")]
fn apply_cli(config: &mut OverlayConfig, cli: &Cli) {
    if let Some(ref cache_dir) = cli.cache_dir {
        config.cache_dir = Some(cache_dir.clone());
    }
    if let Some(ref markers) = cli.markers {
        config.markers_file = Some(markers.clone());
    }
    if let Some(ref tile_url) = cli.tile_url {
        config.tile_url_base = tile_url.clone();
    }
}

#[cfg(not(feature = "gui"))]
fn main() {
    eprintln!("Error: This application requires the 'gui' feature.");
    eprintln!("Build with: cargo build --features gui");
    std::process::exit(1);
}

#[cfg(feature = "gui")]
fn main() -> minimap_overlay::Result<()> {
    use minimap_overlay::{OverlayApp, StorageScope, WorldPosition};

    let cli = Cli::parse();

    // Load configuration
    let mut config = OverlayConfig::load().unwrap_or_default();
    apply_cli(&mut config, &cli);

    // A fixed start position is written through the settings store so the
    // app picks it up as the last known position
    if let Some(position) = &cli.position {
        let mut store = minimap_overlay::SettingsStore::open(
            config.effective_settings_path()?,
            StorageScope::InGame,
        )?;
        let mut settings = store.load_settings();
        settings.last_known_position = WorldPosition::new(position[0], position[1]);
        store.save_settings(&settings)?;
    }

    println!("Starting Minimap Overlay...");
    println!("Tile server: {}", config.tile_url_base);

    let app = OverlayApp::new(config)?;

    // Create and run the egui application
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_title("Minimap Overlay")
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Minimap Overlay",
        options,
        Box::new(|cc| {
            // Set visual style
            cc.egui_ctx.set_visuals(eframe::egui::Visuals::dark());

            Ok(Box::new(app))
        }),
    )
    .map_err(|e| minimap_overlay::MinimapError::Other(format!("GUI error: {}", e)))?;

    Ok(())
}
