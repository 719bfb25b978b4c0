use anyhow::{Context, Result};
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Padding, Style, object::Columns},
};

use crate::config::Config;
use crate::scene::Scene;
use crate::view::EntityView;

#[derive(Tabled, Serialize, Debug, PartialEq)]
pub struct EntityRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "KIND")]
    kind: &'static str,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "ROW")]
    row: usize,
    #[tabled(rename = "PLAYBACK")]
    playback: String,
    #[tabled(rename = "SPRITE")]
    sprite: String,
}

fn entity_row(view: &EntityView) -> EntityRow {
    let (status, row, playback) = match view {
        EntityView::Character(character) => {
            let resolved = character.resolved();
            let status = match character.status().as_str() {
                "" => "-".to_string(),
                s => s.to_string(),
            };
            (status, resolved.row, resolved.playback.to_string())
        }
        EntityView::Zone(_) => ("-".to_string(), 0, "static".to_string()),
    };

    let sprite = match view.fallback() {
        None => "✓".to_string(),
        Some(text) => format!("fallback {}", text),
    };

    EntityRow {
        name: view.label(),
        kind: view.kind(),
        status,
        row,
        playback,
        sprite,
    }
}

pub fn entity_rows(views: &[EntityView]) -> Vec<EntityRow> {
    views.iter().map(entity_row).collect()
}

pub fn run(scene_path: &std::path::Path, json: bool, config: &Config) -> Result<()> {
    let scene = Scene::load(scene_path)
        .with_context(|| format!("Failed to load scene: {}", scene_path.display()))?;
    let rows = entity_rows(&scene.snapshot(config));

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No entities in scene");
        return Ok(());
    }

    let mut table = Table::new(rows);
    table
        .with(Style::blank())
        .modify(Columns::new(0..6), Padding::new(0, 1, 0, 0));
    println!("{table}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneFormat;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_entity_rows() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mayor.png"), b"png").unwrap();
        let yaml = r#"
entities:
  - kind: character
    name: mayor
    status: MERGING
    sprite: mayor.png
  - kind: character
    name: polecat
    status: IDLE
  - kind: character
  - kind: zone
    label: Refinery
    fallback_emoji: "🏭"
"#;
        let scene = Scene::parse(yaml, SceneFormat::Yaml, dir.path().to_path_buf()).unwrap();
        let rows = entity_rows(&scene.snapshot(&Config::default()));

        assert_eq!(
            rows[0],
            EntityRow {
                name: "mayor".to_string(),
                kind: "character",
                status: "MERGING".to_string(),
                row: 1,
                playback: "playing @ 8 fps".to_string(),
                sprite: "✓".to_string(),
            }
        );
        assert_eq!(rows[1].playback, "paused (first)");
        assert_eq!(rows[1].sprite, "fallback p");
        assert_eq!(rows[2].name, "?");
        assert_eq!(rows[2].status, "-");
        assert_eq!(rows[3].kind, "zone");
        assert_eq!(rows[3].sprite, "fallback 🏭");
    }

    #[test]
    fn test_rows_serialize_to_json() {
        let scene = Scene::parse(
            "entities:\n  - kind: zone\n    label: Depot\n",
            SceneFormat::Yaml,
            PathBuf::from("."),
        )
        .unwrap();
        let rows = entity_rows(&scene.snapshot(&Config::default()));
        let json = serde_json::to_value(&rows).unwrap();
        assert_eq!(json[0]["name"], "Depot");
        assert_eq!(json[0]["playback"], "static");
    }
}
