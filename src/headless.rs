use crate::click_script::ClickScript;
use crate::config::AppConfig;
use crate::raycast_app::{PickTarget, RaycastApp};
use anyhow::{Context, Result};
use raypick_camera::{OrbitCamera, Viewport};
use raypick_scene::{AppContext, GraphicsApp, Scene};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

pub struct HeadlessConfig {
    pub app: AppConfig,
    pub clicks: PathBuf,
    pub report: Option<PathBuf>,
}

/// Scene state after one replayed click.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClickReport {
    pub pixel: [f32; 2],
    pub hit: Option<PickTarget>,
    pub marker_visible: bool,
    pub marker_position: [f32; 3],
    pub line_position: [f32; 3],
}

pub fn run(cfg: HeadlessConfig) -> Result<()> {
    let script = ClickScript::from_path(&cfg.clicks)?;
    let reports = replay(&cfg.app, &script)?;

    let mut out: Box<dyn Write> = match &cfg.report {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("failed to create report {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    for report in &reports {
        serde_json::to_writer(&mut out, report)?;
        writeln!(out)?;
    }
    out.flush()?;

    tracing::info!(clicks = reports.len(), "headless replay finished");
    Ok(())
}

/// Build the scene at the configured window size and feed it every scripted click.
pub fn replay(config: &AppConfig, script: &ClickScript) -> Result<Vec<ClickReport>> {
    let viewport = Viewport::new(config.window.width, config.window.height);
    let mut scene = Scene::new();
    let mut camera = OrbitCamera::default();
    let mut app = RaycastApp::new(config.camera.clone(), config.picking.clone());

    let mut ctx = AppContext {
        scene: &mut scene,
        camera: &mut camera,
        viewport,
    };
    app.build_scene(&mut ctx)?;
    let nodes = app
        .nodes()
        .context("scene build did not register its meshes")?;

    let mut reports = Vec::with_capacity(script.events().len());
    for event in script.events() {
        app.on_pointer_down(&mut ctx, *event)?;

        let marker = ctx.scene.get(nodes.marker)?;
        let line = ctx.scene.get(nodes.line)?;
        let hit = app
            .last_pick()
            .and_then(|pick| pick.hit)
            .map(|(target, _)| target);

        reports.push(ClickReport {
            pixel: event.position.to_array(),
            hit,
            marker_visible: marker.visible,
            marker_position: marker.transform.position.to_array(),
            line_position: line.transform.position.to_array(),
        });
    }
    Ok(reports)
}
