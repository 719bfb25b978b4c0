use anyhow::{Context, Result};
use minijinja::{Environment, Value, context};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::scene::Scene;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
  .scene { position: relative; width: 100%; min-height: 100vh; }
  .character, .zone { position: absolute; display: flex; flex-direction: column; align-items: center; }
  .character-sprite-container { display: flex; align-items: flex-end; justify-content: center; }
  .character-avatar { width: 32px; height: 32px; border-radius: 50%; display: flex; align-items: center; justify-content: center; background: #444; color: #fff; font-family: monospace; }
  .character-idle { opacity: 0.75; }
  .status-indicator { font-size: 12px; }
  .zone-sprite { overflow: hidden; }
  .zone-fallback { width: 100%; height: 100%; display: flex; align-items: center; justify-content: center; font-size: 64px; }
  .zone-label { font-family: monospace; font-size: 12px; }
</style>
</head>
<body>
<div class="scene">
{% for entity in entities %}{{ entity }}{% endfor %}
</div>
</body>
</html>
"#;

/// Render every entity of `scene`, sampling animations `elapsed` after mount.
pub fn render_page(scene: &Scene, config: &Config, elapsed: Duration) -> Result<String> {
    let views = scene.snapshot(config);
    let entities: Vec<Value> = views
        .iter()
        .map(|view| {
            let node = view.render_with(|animator| animator.sequence().frame_at(elapsed));
            Value::from_safe_string(node.to_html())
        })
        .collect();

    let mut env = Environment::new();
    env.add_template("page.html", PAGE_TEMPLATE)
        .context("Failed to parse page template")?;
    let page = env
        .get_template("page.html")?
        .render(context! {
            title => scene.title.as_deref().unwrap_or("spritemux"),
            entities => entities,
        })
        .context("Failed to render page")?;

    Ok(page)
}

pub fn run(
    scene_path: &Path,
    output: Option<&Path>,
    at_ms: u64,
    inline_sprites: bool,
    config: &Config,
) -> Result<()> {
    let mut scene = Scene::load(scene_path)
        .with_context(|| format!("Failed to load scene: {}", scene_path.display()))?;
    if inline_sprites {
        scene.inline_sprites();
    }

    let page = render_page(&scene, config, Duration::from_millis(at_ms))?;

    match output {
        Some(path) => {
            fs::write(path, &page)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), entities = scene.entities.len(), "render:written");
            println!("Wrote {}", path.display());
        }
        None => print!("{}", page),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneFormat;
    use tempfile::TempDir;

    const SCENE: &str = r#"
title: "Town <1>"
entities:
  - kind: character
    name: mayor
    status: WORKING
    sprite: mayor.png
    frame_width: 32
    frame_height: 48
    position: { left: 10, top: 20 }
  - kind: character
    name: witness
    status: IDLE
  - kind: zone
    label: Refinery
    fallback_emoji: "🏭"
"#;

    fn scene_in(dir: &TempDir) -> Scene {
        fs::write(dir.path().join("mayor.png"), b"png").unwrap();
        Scene::parse(SCENE, SceneFormat::Yaml, dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_render_page_contains_entities() {
        let dir = TempDir::new().unwrap();
        let page = render_page(&scene_in(&dir), &Config::default(), Duration::ZERO).unwrap();

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Town &lt;1&gt;</title>"));
        assert!(page.contains("background-position: 0px -48px;"));
        assert!(page.contains("<div class=\"character-avatar\">w</div>"));
        assert!(page.contains("aria-label=\"Refinery\""));
        assert!(page.contains("🏭"));
    }

    #[test]
    fn test_render_page_samples_elapsed_time() {
        let dir = TempDir::new().unwrap();
        // 8 fps: 250ms is two ticks into the working row
        let page = render_page(&scene_in(&dir), &Config::default(), Duration::from_millis(250))
            .unwrap();
        assert!(page.contains("background-position: -64px -48px;"));
    }

    #[test]
    fn test_run_writes_output_file() {
        let dir = TempDir::new().unwrap();
        let scene_path = dir.path().join("town.yaml");
        fs::write(&scene_path, SCENE).unwrap();
        fs::write(dir.path().join("mayor.png"), b"png").unwrap();
        let out = dir.path().join("town.html");

        run(&scene_path, Some(&out), 0, true, &Config::default()).unwrap();

        let page = fs::read_to_string(&out).unwrap();
        assert!(page.contains("base64,cG5n)"));
    }
}
