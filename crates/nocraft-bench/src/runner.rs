use std::time::Instant;

use nocraft_render::{ChunkResourceTable, HeadlessBackend};
use nocraft_world::World;

use crate::scenes::SceneConfig;

/// Timing statistics over repeated runs, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of generating and uploading one scene.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub seed: u64,
    pub radius: u32,
    pub chunk_count: usize,
    pub solid_voxels: usize,
    pub vertex_count: usize,
    pub uploaded_bytes: usize,
    pub repeats: u32,
    /// Terrain population plus meshing for the whole area.
    pub generate: TimingSeries,
    /// Buffer creation through the headless backend.
    pub upload: TimingSeries,
    /// Reseed and regeneration of every loaded chunk.
    pub reseed: TimingSeries,
}

/// Generates worlds on the CPU and times each stage.
pub struct GenerationRunner {
    repeats: u32,
}

impl GenerationRunner {
    pub fn new(repeats: u32) -> Self {
        Self {
            repeats: repeats.max(1),
        }
    }

    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    /// Run one scene `repeats` times. Every repeat builds a fresh world, so the
    /// counts are identical across repeats and only timings vary.
    pub fn run_scene(&self, scene: &SceneConfig) -> BenchmarkResult {
        log::info!(
            "Running scene '{}' ({} chunks)...",
            scene.name,
            scene.chunk_count()
        );

        let mut generate_times = Vec::with_capacity(self.repeats as usize);
        let mut upload_times = Vec::with_capacity(self.repeats as usize);
        let mut reseed_times = Vec::with_capacity(self.repeats as usize);
        let mut last_stats = None;
        let mut uploaded_bytes = 0;

        for _ in 0..self.repeats {
            let mut world = World::new(scene.world);

            let start = Instant::now();
            world.load();
            generate_times.push(elapsed_ms(start));

            let mut table = ChunkResourceTable::with_layout(HeadlessBackend::new(), scene.layout);
            let start = Instant::now();
            table.sync(&world);
            upload_times.push(elapsed_ms(start));
            uploaded_bytes = table.backend().live_bytes();
            last_stats = Some(world.stats());

            let start = Instant::now();
            world.reseed(scene.world.seed.wrapping_add(1));
            reseed_times.push(elapsed_ms(start));

            table.clear();
        }

        let stats = last_stats.unwrap_or_default();
        let generate = compute_timings(&generate_times);
        log::info!(
            "  Done: {} vertices, generate mean={:.2}ms, p95={:.2}ms",
            stats.vertices,
            generate.mean_ms,
            generate.p95_ms
        );

        BenchmarkResult {
            scene_name: scene.name.clone(),
            seed: scene.world.seed,
            radius: scene.world.load_radius,
            chunk_count: stats.chunks,
            solid_voxels: stats.solid_voxels,
            vertex_count: stats.vertices,
            uploaded_bytes,
            repeats: self.repeats,
            generate,
            upload: compute_timings(&upload_times),
            reseed: compute_timings(&reseed_times),
        }
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Compute timing statistics from a list of durations in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries::default();
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
