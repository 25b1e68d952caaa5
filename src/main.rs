//! Replays a JSON list of touch samples through a sketch session and prints
//! what came out.
//!
//! ```text
//! sketch-replay <samples.json> [--config cfg.json] [--size WxH] [--out sketch.json]
//! ```

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use log::{info, warn};
use sketch_input::brush::BrushSet;
use sketch_input::config::SketchConfig;
use sketch_input::document::Sketch;
use sketch_input::event::EditorEvent;
use sketch_input::input::TouchSample;
use sketch_input::state::{JsonFileRepository, SketchSession};

const DEFAULT_WIDTH: u32 = 1080;
const DEFAULT_HEIGHT: u32 = 1920;
const PEN_COLORS: [u32; 4] = [0xFF00_0000, 0xFFE5_3935, 0xFF1E_88E5, 0xFF43_A047];

#[derive(Debug, Default)]
struct ReplayArgs {
    samples: PathBuf,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    size: Option<(u32, u32)>,
}

impl ReplayArgs {
    fn from_args() -> Result<Self, String> {
        let mut args = std::env::args().skip(1);
        let mut parsed = ReplayArgs::default();
        let mut samples = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => parsed.config = Some(required_value(&mut args, "--config")?.into()),
                "--out" => parsed.out = Some(required_value(&mut args, "--out")?.into()),
                "--size" => parsed.size = Some(parse_size(&required_value(&mut args, "--size")?)?),
                other if other.starts_with("--") => return Err(format!("unknown option {other}")),
                other => samples = Some(PathBuf::from(other)),
            }
        }

        parsed.samples = samples.ok_or_else(|| {
            "usage: sketch-replay <samples.json> [--config cfg.json] [--size WxH] [--out sketch.json]".to_string()
        })?;
        Ok(parsed)
    }
}

fn required_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("{flag} needs a value"))
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once('x')
        .ok_or_else(|| format!("size must look like WIDTHxHEIGHT, got {value}"))?;
    let parse = |s: &str| s.trim().parse::<u32>().map_err(|e| format!("bad size {value}: {e}"));
    Ok((parse(w)?, parse(h)?))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args = ReplayArgs::from_args()?;
    let config = match &args.config {
        Some(path) => SketchConfig::load(path)?,
        None => SketchConfig::default(),
    };
    let samples: Vec<TouchSample> = serde_json::from_str(&fs::read_to_string(&args.samples)?)?;
    let (width, height) = args.size.unwrap_or((DEFAULT_WIDTH, DEFAULT_HEIGHT));

    let sketch = Sketch::new(width, height)?;
    let pen_size = 4.0 / f64::from(width);
    let brushes = BrushSet::new(&PEN_COLORS, pen_size, pen_size * 6.0)?;
    let session_sketch_id = sketch.id();
    let mut session = SketchSession::new(config, sketch, brushes)?;

    session.event_bus().subscribe(Box::new(|event: &EditorEvent| match event {
        EditorEvent::Gesture(gesture) => log::debug!("{gesture:?}"),
        EditorEvent::TransformChanged(transform) => log::debug!("canvas transform {:?}", transform.decompose()),
        other => info!("{other:?}"),
    }));

    info!("Replaying {} samples into sketch {}", samples.len(), session_sketch_id);
    let mut gesture_count = 0;
    for sample in &samples {
        gesture_count += session.handle_touch(sample).len();
    }
    if session.active_stroke().is_some() {
        warn!("Samples ended mid-stroke; the open stroke is not saved");
    }

    let sketch = session.sketch();
    println!("samples:   {}", samples.len());
    println!("gestures:  {gesture_count}");
    println!("strokes:   {}", sketch.strokes().len());
    match sketch.strokes_bound() {
        Some(bound) => println!(
            "bound:     ({:.4}, {:.4}) - ({:.4}, {:.4})",
            bound.left, bound.top, bound.right, bound.bottom
        ),
        None => println!("bound:     none"),
    }
    println!("transform: {:?}", session.canvas_transform().decompose());

    if let Some(out) = args.out {
        let repository = JsonFileRepository::new(out);
        session.save(&repository)?;
        println!("saved:     {}", repository.path().display());
    }
    Ok(())
}
