use std::path::Path;

use crate::runner::BenchmarkResult;

/// A complete baseline containing results from all scenes.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub timestamp: String,
    pub results: Vec<BenchmarkResult>,
}

/// Why a scene failed its baseline comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Regression {
    /// Mean generation time grew by this many percent.
    Slower { scene: String, pct_change: f64 },
    /// Same seed and radius produced different geometry.
    OutputChanged {
        scene: String,
        baseline_vertices: usize,
        current_vertices: usize,
    },
}

/// Load a baseline from a JSON file. Returns None if the file is missing or unreadable.
pub fn load_baseline(path: &Path) -> Option<Baseline> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save a baseline to a JSON file.
pub fn save_baseline(path: &Path, baseline: &Baseline) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// Compare current results against a baseline, matching scenes by name.
pub fn compare(
    current: &[BenchmarkResult],
    baseline: &Baseline,
    threshold_pct: f64,
) -> Vec<Regression> {
    let mut regressions = Vec::new();

    for result in current {
        let Some(base) = baseline
            .results
            .iter()
            .find(|b| b.scene_name == result.scene_name)
        else {
            continue;
        };

        if base.vertex_count != result.vertex_count || base.solid_voxels != result.solid_voxels {
            regressions.push(Regression::OutputChanged {
                scene: result.scene_name.clone(),
                baseline_vertices: base.vertex_count,
                current_vertices: result.vertex_count,
            });
        }

        if base.generate.mean_ms > 0.0 {
            let pct_change = (result.generate.mean_ms - base.generate.mean_ms)
                / base.generate.mean_ms
                * 100.0;
            if pct_change > threshold_pct {
                regressions.push(Regression::Slower {
                    scene: result.scene_name.clone(),
                    pct_change,
                });
            }
        }
    }

    regressions
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Chunks | Solid voxels | Vertices | Uploaded (KiB) | Generate mean (ms) | Generate p95 (ms) | Upload mean (ms) | Reseed mean (ms) |\n");
    out.push_str("|-------|--------|--------------|----------|----------------|--------------------|-------------------|------------------|------------------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {:.1} | {:.2} | {:.2} | {:.2} | {:.2} |\n",
            r.scene_name,
            r.chunk_count,
            r.solid_voxels,
            r.vertex_count,
            r.uploaded_bytes as f64 / 1024.0,
            r.generate.mean_ms,
            r.generate.p95_ms,
            r.upload.mean_ms,
            r.reseed.mean_ms,
        ));
    }

    out
}

/// Format a comparison report showing regressions.
pub fn format_comparison(regressions: &[Regression], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!(
            "All scenes within {:.0}% threshold. No regressions detected.\n",
            threshold_pct
        );
    }

    let mut out = String::new();
    out.push_str(&format!(
        "REGRESSIONS DETECTED (>{:.0}% threshold):\n",
        threshold_pct
    ));
    for regression in regressions {
        match regression {
            Regression::Slower { scene, pct_change } => {
                out.push_str(&format!("  - {}: +{:.1}%\n", scene, pct_change));
            }
            Regression::OutputChanged {
                scene,
                baseline_vertices,
                current_vertices,
            } => {
                out.push_str(&format!(
                    "  - {}: output changed ({} -> {} vertices)\n",
                    scene, baseline_vertices, current_vertices
                ));
            }
        }
    }
    out
}
