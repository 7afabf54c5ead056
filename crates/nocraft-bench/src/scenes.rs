use nocraft_render::VertexLayout;
use nocraft_world::WorldConfig;

/// One generation run: a world built from `world` with the given seed and radius.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub name: String,
    pub world: WorldConfig,
    pub layout: VertexLayout,
}

impl SceneConfig {
    pub fn new(base: &WorldConfig, seed: u64, radius: u32, layout: VertexLayout) -> Self {
        let world = WorldConfig {
            seed,
            load_radius: radius,
            ..*base
        };
        Self {
            name: format!("seed{seed}-r{radius}"),
            world,
            layout,
        }
    }

    /// Chunks a full load of this scene generates: a (2r+1)^2 square.
    pub fn chunk_count(&self) -> usize {
        let side = 2 * self.world.load_radius as usize + 1;
        side * side
    }
}

/// Radii of the standard suite, smallest first. The configured radius is appended.
pub const STANDARD_RADII: [u32; 3] = [1, 2, 4];

/// One scene per (seed, radius) pair, seeds outermost.
pub fn scenes_for(
    base: &WorldConfig,
    seeds: &[u64],
    radii: &[u32],
    layout: VertexLayout,
) -> Vec<SceneConfig> {
    seeds
        .iter()
        .flat_map(|&seed| {
            radii
                .iter()
                .map(move |&radius| SceneConfig::new(base, seed, radius, layout))
        })
        .collect()
}

/// The default suite: the configured seed at the standard radii plus the configured radius.
pub fn standard_scenes(base: &WorldConfig, layout: VertexLayout) -> Vec<SceneConfig> {
    let mut radii = STANDARD_RADII.to_vec();
    if !radii.contains(&base.load_radius) {
        radii.push(base.load_radius);
    }
    scenes_for(base, &[base.seed], &radii, layout)
}
