use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::WorldGenConfig;
use crate::rng::RngExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Grass,
    Water,
    Sand,
    Stone,
    Swamp,
    Snow,
    Lava,
}

impl TileKind {
    /// Tiles that never receive objects and never host the player spawn.
    pub fn is_hazard(self) -> bool {
        matches!(self, TileKind::Water | TileKind::Lava)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Grassland,
    Forest,
    Desert,
    Swamp,
    Tundra,
    Volcanic,
}

impl Biome {
    pub const ALL: [Biome; 6] = [
        Biome::Grassland,
        Biome::Forest,
        Biome::Desert,
        Biome::Swamp,
        Biome::Tundra,
        Biome::Volcanic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Biome::Grassland => "grassland",
            Biome::Forest => "forest",
            Biome::Desert => "desert",
            Biome::Swamp => "swamp",
            Biome::Tundra => "tundra",
            Biome::Volcanic => "volcanic",
        }
    }
}

/// One value per biome. Used for every biome-keyed configuration table so a
/// missing biome is a compile error rather than a lookup failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiomeTable<T> {
    pub grassland: T,
    pub forest: T,
    pub desert: T,
    pub swamp: T,
    pub tundra: T,
    pub volcanic: T,
}

impl<T> BiomeTable<T> {
    pub fn get(&self, biome: Biome) -> &T {
        match biome {
            Biome::Grassland => &self.grassland,
            Biome::Forest => &self.forest,
            Biome::Desert => &self.desert,
            Biome::Swamp => &self.swamp,
            Biome::Tundra => &self.tundra,
            Biome::Volcanic => &self.volcanic,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Biome, &T)> {
        Biome::ALL.into_iter().map(move |biome| (biome, self.get(biome)))
    }
}

/// Row-major tile and biome grids of identical dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    tiles: Vec<TileKind>,
    biomes: Vec<Biome>,
}

impl TerrainGrid {
    pub fn filled(width: u32, height: u32, tile: TileKind, biome: Biome) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            tiles: vec![tile; len],
            biomes: vec![biome; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Out-of-bounds coordinates read as water.
    pub fn tile(&self, x: i32, y: i32) -> TileKind {
        self.index(x, y)
            .map(|i| self.tiles[i])
            .unwrap_or(TileKind::Water)
    }

    /// Out-of-bounds coordinates read as grassland.
    pub fn biome(&self, x: i32, y: i32) -> Biome {
        self.index(x, y)
            .map(|i| self.biomes[i])
            .unwrap_or(Biome::Grassland)
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile: TileKind) {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = tile;
        }
    }

    pub fn set_biome(&mut self, x: i32, y: i32, biome: Biome) {
        if let Some(i) = self.index(x, y) {
            self.biomes[i] = biome;
        }
    }

    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    pub fn biomes(&self) -> &[Biome] {
        &self.biomes
    }

    pub fn count_tiles(&self, tile: TileKind) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }

    /// First tile, scanning rings of growing Chebyshev radius outward from
    /// the center, that is neither water nor lava.
    pub fn find_spawn(&self) -> Option<(i32, i32)> {
        let cx = (self.width / 2) as i32;
        let cy = (self.height / 2) as i32;
        let max_radius = self.width.max(self.height) as i32;
        for radius in 0..=max_radius {
            for y in (cy - radius)..=(cy + radius) {
                for x in (cx - radius)..=(cx + radius) {
                    let on_ring = (x - cx).abs() == radius || (y - cy).abs() == radius;
                    if on_ring && self.in_bounds(x, y) && !self.tile(x, y).is_hazard() {
                        return Some((x, y));
                    }
                }
            }
        }
        None
    }
}

#[derive(Debug, Clone, Copy)]
struct BiomeAnchor {
    biome: Biome,
    x: f32,
    y: f32,
}

/// Jittered-Voronoi biome partition followed by lake carving.
pub struct TerrainGenerator<'a> {
    config: &'a WorldGenConfig,
}

impl<'a> TerrainGenerator<'a> {
    pub fn new(config: &'a WorldGenConfig) -> Self {
        Self { config }
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> TerrainGrid {
        let width = self.config.width;
        let height = self.config.height;
        let mut grid = TerrainGrid::filled(width, height, TileKind::Grass, Biome::Grassland);

        let anchors: Vec<BiomeAnchor> = self
            .config
            .biome_anchors
            .iter()
            .map(|(biome, anchor)| BiomeAnchor {
                biome,
                x: anchor.x * width as f32,
                y: anchor.y * height as f32,
            })
            .collect();

        let noise = self.config.biome_noise;
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let mut best = Biome::Grassland;
                let mut best_dist = f32::INFINITY;
                for anchor in &anchors {
                    let dx = x as f32 - anchor.x;
                    let dy = y as f32 - anchor.y;
                    let dist = (dx * dx + dy * dy).sqrt() + rng.random_f32(-noise, noise);
                    if dist < best_dist {
                        best_dist = dist;
                        best = anchor.biome;
                    }
                }
                grid.set_biome(x, y, best);
                grid.set_tile(x, y, self.base_tile(best, rng));
            }
        }

        self.carve_lakes(&mut grid, rng);
        grid
    }

    fn base_tile<R: Rng>(&self, biome: Biome, rng: &mut R) -> TileKind {
        match biome {
            Biome::Desert => TileKind::Sand,
            Biome::Swamp => {
                if rng.chance(self.config.swamp_water_chance) {
                    TileKind::Water
                } else {
                    TileKind::Swamp
                }
            }
            Biome::Tundra => TileKind::Snow,
            Biome::Volcanic => {
                if rng.chance(self.config.lava_chance) {
                    TileKind::Lava
                } else {
                    TileKind::Stone
                }
            }
            Biome::Grassland | Biome::Forest => TileKind::Grass,
        }
    }

    /// Lakes overwrite whatever the biome pass produced.
    fn carve_lakes<R: Rng>(&self, grid: &mut TerrainGrid, rng: &mut R) {
        let margin = self.config.lake_margin as i32;
        let max_x = (grid.width() as i32 - margin).max(margin);
        let max_y = (grid.height() as i32 - margin).max(margin);
        for _ in 0..self.config.lake_count {
            let lake_x = rng.gen_range(margin..=max_x);
            let lake_y = rng.gen_range(margin..=max_y);
            let radius = rng.gen_range(self.config.lake_radius_min..=self.config.lake_radius_max) as i32;
            for dy in -radius..radius {
                for dx in -radius..radius {
                    if dx * dx + dy * dy < radius * radius {
                        grid.set_tile(lake_x + dx, lake_y + dy, TileKind::Water);
                    }
                }
            }
        }
    }
}
