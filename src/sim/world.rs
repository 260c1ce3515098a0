//! Chunked parallax starfield
//!
//! The background is an endless grid of fixed-size chunks per parallax layer.
//! Each layer follows a *virtual* camera (camera position × parallax factor),
//! so layers never share chunks. A chunk's contents are a pure function of
//! `(chunk x, chunk y, layer index, world seed)`: leaving a region and coming
//! back regenerates exactly what was there before.

use std::collections::HashMap;

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::tuning::{LayerRole, WorldTuning};

/// What a decoration draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationKind {
    Star { variant: u8 },
    Planet { variant: u8 },
    Dust,
}

/// One decorative sprite inside a chunk (world space of its layer)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub pos: Vec2,
    pub scale: f32,
    /// Radians
    pub rotation: f32,
    pub tint: [u8; 4],
}

/// Which decorative art is available to the generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorationCatalog {
    pub star_variants: u8,
    pub planet_variants: u8,
    /// Multiplier on dust per chunk
    pub dust_density: f32,
}

impl Default for DecorationCatalog {
    fn default() -> Self {
        Self {
            star_variants: 5,
            planet_variants: 9,
            dust_density: 1.0,
        }
    }
}

/// A generated grid cell; immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub coord: IVec2,
    pub decorations: Vec<Decoration>,
}

/// A parallax plane and the chunks currently streamed in for it
#[derive(Debug, Clone)]
pub struct WorldLayer {
    pub parallax: f32,
    pub role: LayerRole,
    chunks: HashMap<IVec2, Chunk>,
}

impl WorldLayer {
    pub fn chunk(&self, coord: IVec2) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Chunks generated and evicted by one `update`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub generated: usize,
    pub evicted: usize,
}

/// Streams chunks in and out around the camera for every layer
#[derive(Debug, Clone)]
pub struct WorldStreamer {
    seed: u64,
    chunk_size: f32,
    margin: i32,
    catalog: DecorationCatalog,
    layers: Vec<WorldLayer>,
}

impl WorldStreamer {
    pub fn new(seed: u64, tuning: &WorldTuning, catalog: DecorationCatalog) -> Self {
        let layers = tuning
            .layers
            .iter()
            .map(|l| WorldLayer {
                parallax: l.parallax,
                role: l.role,
                chunks: HashMap::new(),
            })
            .collect();
        Self {
            seed,
            chunk_size: tuning.chunk_size,
            margin: tuning.stream_margin,
            catalog,
            layers,
        }
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    pub fn layers(&self) -> &[WorldLayer] {
        &self.layers
    }

    /// Chunk radius kept loaded for a view of this size
    pub fn streaming_radius(&self, view_size: Vec2) -> i32 {
        let rx = (view_size.x / self.chunk_size).ceil() as i32 / 2 + self.margin;
        let ry = (view_size.y / self.chunk_size).ceil() as i32 / 2 + self.margin;
        rx.max(ry)
    }

    /// Chunk under the layer's virtual camera
    pub fn virtual_chunk(&self, layer_index: usize, camera: Vec2) -> IVec2 {
        let parallax = self.layers.get(layer_index).map_or(1.0, |l| l.parallax);
        chunk_coord(camera * parallax, self.chunk_size)
    }

    /// Generate every chunk within the streaming radius and evict every chunk
    /// beyond `radius + 1`, independently per layer
    pub fn update(&mut self, camera: Vec2, view_size: Vec2) -> StreamStats {
        let radius = self.streaming_radius(view_size);
        let mut stats = StreamStats::default();

        for index in 0..self.layers.len() {
            let center = self.virtual_chunk(index, camera);
            let role = self.layers[index].role;

            for x in center.x - radius..=center.x + radius {
                for y in center.y - radius..=center.y + radius {
                    let coord = IVec2::new(x, y);
                    if self.layers[index].chunks.contains_key(&coord) {
                        continue;
                    }
                    let chunk =
                        generate_chunk(coord, index, role, self.seed, self.chunk_size, &self.catalog);
                    self.layers[index].chunks.insert(coord, chunk);
                    stats.generated += 1;
                }
            }

            let keep = radius + 1;
            let before = self.layers[index].chunks.len();
            self.layers[index].chunks.retain(|coord, _| {
                let d = (*coord - center).abs();
                d.x <= keep && d.y <= keep
            });
            stats.evicted += before - self.layers[index].chunks.len();
        }

        if stats.generated > 0 || stats.evicted > 0 {
            log::debug!(
                "World stream: +{} / -{} chunks (radius {})",
                stats.generated,
                stats.evicted,
                radius
            );
        }
        stats
    }
}

/// Grid coordinate containing a (virtual) world position
pub fn chunk_coord(pos: Vec2, chunk_size: f32) -> IVec2 {
    IVec2::new(
        (pos.x / chunk_size).floor() as i32,
        (pos.y / chunk_size).floor() as i32,
    )
}

fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed for a chunk's generator
pub fn chunk_seed(coord: IVec2, layer_index: usize, world_seed: u64) -> u64 {
    let mut h = mix64(world_seed);
    h = mix64(h ^ coord.x as u32 as u64);
    h = mix64(h ^ coord.y as u32 as u64);
    mix64(h ^ layer_index as u64)
}

/// Build a chunk's decorations; identical inputs give identical output
pub fn generate_chunk(
    coord: IVec2,
    layer_index: usize,
    role: LayerRole,
    world_seed: u64,
    chunk_size: f32,
    catalog: &DecorationCatalog,
) -> Chunk {
    let mut rng = Pcg32::seed_from_u64(chunk_seed(coord, layer_index, world_seed));
    let origin = coord.as_vec2() * chunk_size;
    let mut decorations = Vec::new();

    let local = |rng: &mut Pcg32| {
        origin + Vec2::new(rng.random_range(0.0..=chunk_size), rng.random_range(0.0..=chunk_size))
    };

    match role {
        LayerRole::DistantStars | LayerRole::MidStars => {
            // No star art loaded: the layer stays empty
            if catalog.star_variants > 0 {
                let (min_scale, max_scale) = if role == LayerRole::DistantStars {
                    (0.1, 0.3)
                } else {
                    (0.2, 0.5)
                };
                let count = rng.random_range(12..=15);
                for _ in 0..count {
                    let variant = rng.random_range(0..catalog.star_variants);
                    let pos = local(&mut rng);
                    let scale = rng.random_range(min_scale..max_scale);
                    let tint = [
                        rng.random_range(200..=255),
                        rng.random_range(200..=255),
                        rng.random_range(200..=255),
                        rng.random_range(150..=255),
                    ];
                    decorations.push(Decoration {
                        kind: DecorationKind::Star { variant },
                        pos,
                        scale,
                        rotation: 0.0,
                        tint,
                    });
                }
            }
        }
        LayerRole::Planets => {
            if catalog.planet_variants > 0 && rng.random_bool(0.5) {
                let variant = rng.random_range(0..catalog.planet_variants);
                let pos = local(&mut rng);
                let scale = rng.random_range(1.0..1.5);
                let rotation = rng.random_range(0.0..std::f32::consts::TAU);
                decorations.push(Decoration {
                    kind: DecorationKind::Planet { variant },
                    pos,
                    scale,
                    rotation,
                    tint: [220, 220, 220, 255],
                });
            }
        }
        LayerRole::Dust => {
            let base: u32 = rng.random_range(8..=12);
            let count = (base as f32 * catalog.dust_density.max(0.0)).round() as usize;
            for _ in 0..count {
                let pos = local(&mut rng);
                let alpha = rng.random_range(50..=150);
                decorations.push(Decoration {
                    kind: DecorationKind::Dust,
                    pos,
                    scale: 2.0,
                    rotation: 0.0,
                    tint: [255, 255, 255, alpha],
                });
            }
        }
    }

    Chunk { coord, decorations }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VIEW: Vec2 = Vec2::new(1920.0, 1080.0);

    fn streamer(seed: u64) -> WorldStreamer {
        WorldStreamer::new(seed, &WorldTuning::default(), DecorationCatalog::default())
    }

    #[test]
    fn test_radius_uses_larger_axis_plus_margin() {
        let world = streamer(1);
        // ceil(1920/1024)=2 -> 1 + 2; ceil(1080/1024)=2 -> 1 + 2
        assert_eq!(world.streaming_radius(VIEW), 3);
        assert_eq!(world.streaming_radius(Vec2::new(5000.0, 100.0)), 2 + 2);
    }

    #[test]
    fn test_layers_track_their_own_virtual_camera() {
        let mut world = streamer(7);
        let camera = Vec2::new(50_000.0, 0.0);
        world.update(camera, VIEW);

        let deep = world.virtual_chunk(0, camera);
        let dust = world.virtual_chunk(3, camera);
        assert_eq!(deep, chunk_coord(Vec2::new(2500.0, 0.0), 1024.0));
        assert_eq!(dust, chunk_coord(Vec2::new(40_000.0, 0.0), 1024.0));
        assert!(world.layers()[0].chunk(deep).is_some());
        assert!(world.layers()[3].chunk(dust).is_some());
        assert!(world.layers()[0].chunk(dust).is_none());
    }

    #[test]
    fn test_revisiting_regenerates_identical_content() {
        let mut world = streamer(42);
        world.update(Vec2::ZERO, VIEW);
        let before = world.layers()[3].chunk(IVec2::ZERO).cloned().unwrap();

        let stats = world.update(Vec2::new(1.0e6, 1.0e6), VIEW);
        assert!(stats.evicted > 0);
        assert!(world.layers()[3].chunk(IVec2::ZERO).is_none());

        world.update(Vec2::ZERO, VIEW);
        let after = world.layers()[3].chunk(IVec2::ZERO).cloned().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_update_is_idempotent_for_a_still_camera() {
        let mut world = streamer(3);
        let first = world.update(Vec2::new(300.0, -800.0), VIEW);
        assert!(first.generated > 0);
        let second = world.update(Vec2::new(300.0, -800.0), VIEW);
        assert_eq!(second, StreamStats::default());
    }

    #[test]
    fn test_missing_art_degrades_to_empty_layers() {
        let catalog = DecorationCatalog {
            star_variants: 0,
            planet_variants: 0,
            dust_density: 1.0,
        };
        let stars = generate_chunk(IVec2::ZERO, 0, LayerRole::DistantStars, 9, 1024.0, &catalog);
        let planets = generate_chunk(IVec2::ZERO, 2, LayerRole::Planets, 9, 1024.0, &catalog);
        let dust = generate_chunk(IVec2::ZERO, 3, LayerRole::Dust, 9, 1024.0, &catalog);
        assert!(stars.decorations.is_empty());
        assert!(planets.decorations.is_empty());
        assert!((8..=12).contains(&dust.decorations.len()));
    }

    #[test]
    fn test_decorations_stay_inside_their_chunk() {
        let chunk = generate_chunk(
            IVec2::new(-3, 5),
            1,
            LayerRole::MidStars,
            11,
            1024.0,
            &DecorationCatalog::default(),
        );
        assert!((12..=15).contains(&chunk.decorations.len()));
        for d in &chunk.decorations {
            assert!(d.pos.x >= -3.0 * 1024.0 && d.pos.x <= -2.0 * 1024.0);
            assert!(d.pos.y >= 5.0 * 1024.0 && d.pos.y <= 6.0 * 1024.0);
            assert!(d.scale >= 0.2 && d.scale < 0.5);
        }
    }

    proptest! {
        #[test]
        fn test_generation_is_deterministic(x in -10_000i32..10_000, y in -10_000i32..10_000, layer in 0usize..4, seed in any::<u64>()) {
            let role = WorldTuning::default().layers[layer].role;
            let catalog = DecorationCatalog::default();
            let a = generate_chunk(IVec2::new(x, y), layer, role, seed, 1024.0, &catalog);
            let b = generate_chunk(IVec2::new(x, y), layer, role, seed, 1024.0, &catalog);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn test_streamed_set_matches_radius(
            cams in proptest::collection::vec((-1.0e5f32..1.0e5, -1.0e5f32..1.0e5), 1..6),
            w in 320.0f32..4000.0,
            h in 240.0f32..3000.0,
        ) {
            let mut world = streamer(5);
            let view = Vec2::new(w, h);
            for (cx, cy) in cams {
                let camera = Vec2::new(cx, cy);
                world.update(camera, view);
                let radius = world.streaming_radius(view);
                for (index, layer) in world.layers().iter().enumerate() {
                    let center = world.virtual_chunk(index, camera);
                    for chunk in layer.chunks() {
                        let d = (chunk.coord - center).abs();
                        prop_assert!(d.x.max(d.y) <= radius + 1);
                    }
                    for x in -radius..=radius {
                        for y in -radius..=radius {
                            prop_assert!(layer.chunk(center + IVec2::new(x, y)).is_some());
                        }
                    }
                }
            }
        }
    }
}
