use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use serde::Deserialize;

use relgraph::engine::OverlayEngine;
use relgraph::metadata::StaticIndex;
use relgraph::model::{FrameView, GraphLink, Viewport};
use relgraph::settings::OverlaySettings;
use relgraph::style::StyleRegistry;
use relgraph::surface::{HeuristicMeasurer, RecordingSurface};

#[derive(Parser, Debug)]
#[command(author, version, about = "Annotate a graph snapshot with typed relation overlays", long_about = None)]
struct Cli {
    /// JSON graph snapshot (viewport, links, metadata)
    #[arg(value_name = "SNAPSHOT_FILE")]
    snapshot: Utf8PathBuf,

    /// Directory of relation style definition files
    #[arg(long)]
    relation_dir: Option<Utf8PathBuf>,

    /// Overlay settings JSON file
    #[arg(long)]
    settings: Option<Utf8PathBuf>,

    /// Number of animation frames to run
    #[arg(long, default_value_t = 30)]
    frames: u64,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    viewport: Viewport,
    links: Vec<GraphLink>,
    #[serde(default)]
    metadata: serde_json::Value,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.snapshot)
        .with_context(|| format!("Open {}", cli.snapshot))?;
    let snapshot: Snapshot =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", cli.snapshot))?;
    if snapshot.links.is_empty() {
        eprintln!("[relgraph] Warning: snapshot has no links, nothing to annotate");
    }

    let settings = match &cli.settings {
        Some(path) => OverlaySettings::load(path)?,
        None => OverlaySettings::default(),
    };
    let relation_dir = cli
        .relation_dir
        .unwrap_or_else(|| Utf8PathBuf::from(&settings.relation_dir));

    let metadata = StaticIndex::from_json(&snapshot.metadata);
    let mut styles = StyleRegistry::new(&relation_dir);
    styles.load()?;

    let mut engine = OverlayEngine::new(styles, settings);
    let mut surface = RecordingSurface::new();
    let measurer = HeuristicMeasurer::default();

    let frame = FrameView {
        viewport: snapshot.viewport,
        links: snapshot.links,
    };
    for _ in 0..cli.frames {
        engine.tick(&mut surface, &measurer, &metadata, &frame);
    }

    let annotations: Vec<serde_json::Value> = engine
        .registry()
        .records()
        .map(|(key, record)| {
            serde_json::json!({
                "source": key.source,
                "target": key.target,
                "relationType": record.relation_type,
                "label": record.display_label,
                "pair": record.pair,
                "hasStroke": record.stroke_handle.is_some(),
            })
        })
        .collect();
    let legend: Vec<serde_json::Value> = engine
        .registry()
        .legend()
        .rows()
        .iter()
        .map(|row| {
            serde_json::json!({
                "label": row.label,
                "color": format!("#{:06x}", row.color),
                "inUse": row.use_count,
            })
        })
        .collect();
    let summary = serde_json::json!({
        "frames": engine.frame(),
        "annotations": annotations,
        "legend": legend,
        "drawables": surface.len(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
