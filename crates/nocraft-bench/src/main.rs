use std::path::PathBuf;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use nocraft_bench::report;
use nocraft_bench::runner::GenerationRunner;
use nocraft_bench::scenes;
use nocraft_render::VertexLayout;
use nocraft_world::config::{load_config, WorldConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut repeats = 3u32;
    let mut seeds: Option<Vec<u64>> = None;
    let mut radius: Option<u32> = None;
    let mut layout = VertexLayout::Split;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                config_path = Some(PathBuf::from(value(&args, &mut i)));
            }
            "--baseline" => {
                baseline_path = Some(PathBuf::from(value(&args, &mut i)));
            }
            "--output" => {
                output_path = Some(PathBuf::from(value(&args, &mut i)));
            }
            "--regression-threshold" => {
                regression_threshold = parse(value(&args, &mut i), "--regression-threshold");
            }
            "--repeats" => {
                repeats = parse(value(&args, &mut i), "--repeats");
            }
            "--seeds" => {
                let list = value(&args, &mut i);
                seeds = Some(list.split(',').map(|s| parse(s.trim(), "--seeds")).collect());
            }
            "--radius" => {
                radius = Some(parse(value(&args, &mut i), "--radius"));
            }
            "--interleaved" => {
                layout = VertexLayout::Interleaved;
            }
            "--help" | "-h" => {
                eprintln!("Usage: nocraft-gen [OPTIONS]");
                eprintln!("  --config <path>                World config RON (default: built-in defaults)");
                eprintln!("  --seeds <a,b,...>              Seeds to generate (default: config seed)");
                eprintln!("  --radius <n>                   Load radius (default: standard suite)");
                eprintln!("  --repeats <n>                  Runs per scene (default: 3)");
                eprintln!("  --interleaved                  Upload interleaved vertices");
                eprintln!("  --baseline <path>              Load baseline JSON for comparison");
                eprintln!("  --output <path>                Save current results as JSON baseline");
                eprintln!(
                    "  --regression-threshold <pct>   Regression threshold percentage (default: 10)"
                );
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = match &config_path {
        Some(path) => load_config(path).unwrap_or_else(|e| {
            eprintln!("ERROR: {e}");
            process::exit(1);
        }),
        None => WorldConfig::default(),
    };

    let scene_configs = match (seeds, radius) {
        (None, None) => scenes::standard_scenes(&config, layout),
        (seeds, radius) => scenes::scenes_for(
            &config,
            &seeds.unwrap_or_else(|| vec![config.seed]),
            &[radius.unwrap_or(config.load_radius)],
            layout,
        ),
    };
    for scene in &scene_configs {
        if let Err(e) = scene.world.validate() {
            eprintln!("ERROR: scene '{}': {e}", scene.name);
            process::exit(1);
        }
    }

    let runner = GenerationRunner::new(repeats);
    let results: Vec<_> = scene_configs
        .iter()
        .map(|scene| runner.run_scene(scene))
        .collect();

    // Print markdown summary
    println!("\n## Generation Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            timestamp: timestamp(),
            results: results.clone(),
        };
        if let Err(e) = report::save_baseline(path, &baseline) {
            eprintln!("ERROR: failed to save baseline {}: {e}", path.display());
            process::exit(1);
        }
        log::info!("Saved baseline to {}", path.display());
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Generation run complete.");
}

/// Advance past a flag and return its value, exiting when it is missing.
fn value<'a>(args: &'a [String], i: &mut usize) -> &'a str {
    *i += 1;
    match args.get(*i) {
        Some(v) => v.as_str(),
        None => {
            eprintln!("Missing value for {}", args[*i - 1]);
            process::exit(1);
        }
    }
}

fn parse<T: std::str::FromStr>(raw: &str, flag: &str) -> T {
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid {flag} value: {raw}");
        process::exit(1);
    })
}

fn timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("gen-{secs}")
}
