use antcolony_core::{SimConfig, Snapshot, Surface, World};
use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Desktop,
    Mobile,
}

/// Run the ant colony headless and emit a JSON run summary.
#[derive(Parser, Debug)]
#[command(name = "antcolony", version)]
struct Args {
    /// Base parameter set.
    #[arg(long, value_enum, default_value_t = Preset::Desktop)]
    preset: Preset,
    /// JSON file whose keys override the preset.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    /// Population size.
    #[arg(long)]
    ants: Option<usize>,
    #[arg(long, default_value_t = 1000)]
    steps: usize,
    #[arg(long, default_value_t = 100)]
    sample_every: usize,
    /// Extra food source as `x,y`; repeatable.
    #[arg(long = "food", value_parser = parse_point)]
    food: Vec<(f64, f64)>,
    /// Start without the default three food sources.
    #[arg(long)]
    no_default_food: bool,
    /// Print a coarse heat map of the final field to stderr.
    #[arg(long)]
    ascii: bool,
    /// Write the summary here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_point(s: &str) -> Result<(f64, f64)> {
    let Some((x, y)) = s.split_once(',') else {
        bail!("expected x,y but got {s:?}");
    };
    let x: f64 = x.trim().parse().with_context(|| format!("bad x in {s:?}"))?;
    let y: f64 = y.trim().parse().with_context(|| format!("bad y in {s:?}"))?;
    ensure!(x.is_finite() && y.is_finite(), "food coordinates must be finite");
    Ok((x, y))
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let base = match args.preset {
        Preset::Desktop => SimConfig::desktop(),
        Preset::Mobile => SimConfig::mobile(),
    };
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            base.with_overrides(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => base,
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(ants) = args.ants {
        config.ant_count = ants;
    }
    Ok(config)
}

/// Downsampled field intensity as text, with the nest and food sources marked.
struct AsciiHeatmap {
    cols: usize,
    text: String,
}

impl Surface for AsciiHeatmap {
    fn draw(&mut self, snapshot: &Snapshot<'_>) {
        const RAMP: &[u8] = b" .:-=+*#%@";
        let cell_w = snapshot.width / self.cols as f64;
        // Terminal glyphs are roughly twice as tall as wide.
        let cell_h = cell_w * 2.0;
        let rows = (snapshot.height / cell_h).ceil().max(1.0) as usize;
        let peak = snapshot.field.max_value();

        let mut grid = vec![vec![b' '; self.cols]; rows];
        for (r, line) in grid.iter_mut().enumerate() {
            for (c, ch) in line.iter_mut().enumerate() {
                let x = (c as f64 + 0.5) * cell_w;
                let y = (r as f64 + 0.5) * cell_h;
                let v = snapshot.field.sample(x, y);
                if peak > 0.0 {
                    let level = ((v / peak) * (RAMP.len() - 1) as f32).round() as usize;
                    *ch = RAMP[level.min(RAMP.len() - 1)];
                }
            }
        }
        let mut mark = |pos: [f64; 2], glyph: u8| {
            let c = (pos[0] / cell_w) as usize;
            let r = (pos[1] / cell_h) as usize;
            if let Some(ch) = grid.get_mut(r).and_then(|line| line.get_mut(c)) {
                *ch = glyph;
            }
        };
        for food in snapshot.food {
            mark(food.position, if food.remaining > 0 { b'F' } else { b'f' });
        }
        mark(snapshot.nest.position, b'N');

        self.text = grid
            .into_iter()
            .map(|line| String::from_utf8_lossy(&line).into_owned())
            .collect::<Vec<_>>()
            .join("\n");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let mut world = World::try_new(config).context("building world")?;
    if args.no_default_food {
        world.clear_food();
    }
    for &(x, y) in &args.food {
        world.add_food_at(x, y);
    }

    info!(
        steps = args.steps,
        ants = world.ants().len(),
        food_sources = world.food().len(),
        "starting run"
    );
    let summary = world
        .try_run_experiment(args.steps, args.sample_every)
        .context("running simulation")?;
    info!(
        pickups = summary.pickups,
        deliveries = summary.deliveries,
        food_remaining = summary.final_food_remaining,
        "run finished"
    );

    if args.ascii {
        let mut heatmap = AsciiHeatmap {
            cols: 80,
            text: String::new(),
        };
        world.draw(&mut heatmap);
        eprintln!("{}", heatmap.text);
    }

    let json = serde_json::to_string_pretty(&summary)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote summary");
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_point_accepts_pairs() {
        assert_eq!(parse_point("10, 20.5").unwrap(), (10.0, 20.5));
        assert!(parse_point("10").is_err());
        assert!(parse_point("nan,1").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn cli_flags_override_preset() {
        let args = Args::parse_from([
            "antcolony", "--preset", "mobile", "--seed", "9", "--ants", "12",
        ]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.ant_count, 12);
        assert_eq!(config.width, SimConfig::mobile().width);
    }

    #[test]
    fn config_file_overlays_selected_preset() {
        let name = format!("antcolony-overlay-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        fs::write(&path, r#"{"ant_speed": 2.5}"#).unwrap();
        let path_arg = path.to_string_lossy().into_owned();
        let args = Args::parse_from([
            "antcolony", "--preset", "mobile", "--config", path_arg.as_str(),
        ]);
        let config = load_config(&args).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.ant_speed, 2.5);
        assert_eq!(config.width, SimConfig::mobile().width);
        assert_eq!(config.ant_count, SimConfig::mobile().ant_count);
    }

    #[test]
    fn heatmap_marks_nest() {
        let world = World::new(SimConfig {
            ant_count: 0,
            ..SimConfig::default()
        });
        let mut heatmap = AsciiHeatmap {
            cols: 40,
            text: String::new(),
        };
        world.draw(&mut heatmap);
        assert!(heatmap.text.contains('N'));
        assert_eq!(heatmap.text.matches('F').count(), 3);
    }
}
