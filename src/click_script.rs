use anyhow::Context;
use glam::Vec2;
use raypick_scene::{PointerButton, PointerEvent};
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
struct ClickScriptFile {
    clicks: Vec<ScriptedClick>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct ScriptedClick {
    x: f32,
    y: f32,
    #[serde(default)]
    button: PointerButton,
}

/// Pointer presses replayed by the headless host, in file order.
#[derive(Debug)]
pub struct ClickScript {
    events: Vec<PointerEvent>,
}

impl ClickScript {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read click script {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("invalid click script {}", path.display()))
    }

    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        let file: ClickScriptFile = serde_json::from_str(contents)?;
        if file.clicks.is_empty() {
            anyhow::bail!("click script contains no clicks");
        }
        let events = file
            .clicks
            .into_iter()
            .map(|click| PointerEvent {
                position: Vec2::new(click.x, click.y),
                button: click.button,
            })
            .collect();
        Ok(Self { events })
    }

    pub fn events(&self) -> &[PointerEvent] {
        &self.events
    }
}
