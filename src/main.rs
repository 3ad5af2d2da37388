//! raypick - click to cast a ray into a small 3D scene
//!
//! Runs windowed by default, or replays a click script headlessly.

mod click_script;
mod config;
mod headless;
mod raycast_app;
mod window;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::AppConfig;
use raycast_app::RaycastApp;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Ray picking demo", long_about = None)]
struct Cli {
    /// Configuration file (TOML); defaults to config/raypick.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay a click script without opening a window
    #[arg(long, requires = "clicks")]
    headless: bool,

    /// Click script (JSON) replayed in headless mode
    #[arg(long)]
    clicks: Option<PathBuf>,

    /// Write the headless report here instead of stdout
    #[arg(long)]
    report: Option<PathBuf>,

    /// Override window.width
    #[arg(long)]
    width: Option<u32>,

    /// Override window.height
    #[arg(long)]
    height: Option<u32>,

    /// Write the effective configuration to PATH and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

impl Cli {
    /// Load the config file and apply command-line overrides.
    fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_from_path(path),
            None => AppConfig::load(),
        };
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if config.window.width == 0 || config.window.height == 0 {
            bail!(
                "window size must be non-zero, got {}x{}",
                config.window.width,
                config.window.height
            );
        }
        Ok(config)
    }
}

fn write_config(config: &AppConfig, path: &Path) -> Result<()> {
    config
        .save_to_path(path)
        .with_context(|| format!("failed to write config {}", path.display()))?;
    info!("Wrote configuration to {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    // WARN by default, overridable via RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting raypick v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    if let Some(path) = &cli.write_config {
        return write_config(&config, path);
    }

    if cli.headless {
        let Some(clicks) = cli.clicks else {
            bail!("--headless requires --clicks");
        };
        return headless::run(headless::HeadlessConfig {
            app: config,
            clicks,
            report: cli.report,
        });
    }
    if cli.clicks.is_some() || cli.report.is_some() {
        tracing::warn!("--clicks/--report have no effect without --headless");
    }

    let app = RaycastApp::new(config.camera.clone(), config.picking.clone());
    window::run(app, &config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("raypick-main-{}-{name}", std::process::id()))
    }

    #[test]
    fn size_overrides_apply_on_top_of_file() {
        let path = temp_path("base.toml");
        std::fs::write(&path, "[window]\nwidth = 640\nheight = 480\n").unwrap();

        let cli = Cli::try_parse_from([
            "raypick",
            "--config",
            path.to_str().unwrap(),
            "--height",
            "300",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 300);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn zero_size_is_rejected() {
        let cli = Cli::try_parse_from(["raypick", "--width", "0"]).unwrap();
        assert!(cli.resolve_config().is_err());
    }

    #[test]
    fn headless_requires_clicks() {
        assert!(Cli::try_parse_from(["raypick", "--headless"]).is_err());
    }

    #[test]
    fn written_config_reloads_with_overrides() {
        let out = temp_path("written.toml");
        let cli = Cli::try_parse_from([
            "raypick",
            "--config",
            "/nonexistent/raypick.toml",
            "--width",
            "800",
            "--write-config",
            out.to_str().unwrap(),
        ])
        .unwrap();

        let config = cli.resolve_config().unwrap();
        write_config(&config, cli.write_config.as_deref().unwrap()).unwrap();

        let reloaded = AppConfig::load_from_path(&out);
        assert_eq!(reloaded, config);
        assert_eq!(reloaded.window.width, 800);
        assert_eq!(reloaded.camera, AppConfig::default().camera);

        std::fs::remove_file(&out).ok();
    }
}
