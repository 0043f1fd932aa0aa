//! Built-in background scenes.
//!
//! Five procedurally painted landscapes stand in for bundled photos so the
//! app has something to show when no image paths are given.  Rendering is
//! deterministic: the same scene at the same size always yields the same
//! pixels.

use image::{Rgba, RgbaImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scene {
    Cascade,
    Jungle,
    Desert,
    Snow,
    Spring,
}

/// Colours for one scene.
struct Palette {
    sky_top: [u8; 3],
    sky_low: [u8; 3],
    ground_far: [u8; 3],
    ground_near: [u8; 3],
    accent: [u8; 3],
}

impl Scene {
    /// Display order of the built-in gallery.
    pub const ALL: &[Scene] = &[
        Scene::Cascade,
        Scene::Jungle,
        Scene::Desert,
        Scene::Snow,
        Scene::Spring,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Scene::Cascade => "cascade",
            Scene::Jungle => "jungle",
            Scene::Desert => "desert",
            Scene::Snow => "snow",
            Scene::Spring => "spring",
        }
    }

    fn palette(self) -> Palette {
        match self {
            Scene::Cascade => Palette {
                sky_top: [38, 84, 124],
                sky_low: [150, 196, 214],
                ground_far: [46, 96, 72],
                ground_near: [22, 54, 40],
                accent: [226, 242, 250],
            },
            Scene::Jungle => Palette {
                sky_top: [92, 150, 120],
                sky_low: [196, 222, 160],
                ground_far: [34, 110, 46],
                ground_near: [12, 58, 24],
                accent: [246, 196, 64],
            },
            Scene::Desert => Palette {
                sky_top: [236, 126, 70],
                sky_low: [252, 214, 150],
                ground_far: [218, 160, 96],
                ground_near: [168, 104, 56],
                accent: [255, 240, 200],
            },
            Scene::Snow => Palette {
                sky_top: [70, 100, 150],
                sky_low: [200, 214, 236],
                ground_far: [210, 222, 236],
                ground_near: [244, 248, 252],
                accent: [120, 140, 170],
            },
            Scene::Spring => Palette {
                sky_top: [110, 170, 236],
                sky_low: [214, 236, 250],
                ground_far: [120, 186, 92],
                ground_near: [70, 142, 58],
                accent: [240, 110, 160],
            },
        }
    }

    /// Paint the scene at `width × height` pixels.
    pub fn render(self, width: u32, height: u32) -> RgbaImage {
        let p = self.palette();
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;

        RgbaImage::from_fn(width, height, |x, y| {
            let fx = x as f32 / w;
            let fy = y as f32 / h;
            let horizon = self.horizon(fx);

            let mut rgb = if fy < horizon {
                lerp3(p.sky_top, p.sky_low, fy / horizon.max(f32::EPSILON))
            } else {
                let t = (fy - horizon) / (1.0 - horizon).max(f32::EPSILON);
                lerp3(p.ground_far, p.ground_near, t)
            };

            if self.accent_at(fx, fy, horizon, x, y) {
                rgb = lerp3(rgb, p.accent, 0.85);
            }
            Rgba([rgb[0], rgb[1], rgb[2], 255])
        })
    }

    /// Horizon line (fraction of height) at horizontal position `fx`.
    fn horizon(self, fx: f32) -> f32 {
        use std::f32::consts::TAU;
        match self {
            Scene::Cascade => 0.35 + 0.05 * (fx * TAU).sin(),
            Scene::Jungle => 0.45 + 0.06 * (fx * TAU * 5.0).sin().abs(),
            Scene::Desert => 0.6 + 0.07 * (fx * TAU * 1.5).sin(),
            // A single peak.
            Scene::Snow => 0.3 + 0.5 * (fx - 0.55).abs(),
            Scene::Spring => 0.55 + 0.03 * (fx * TAU * 2.0).cos(),
        }
    }

    fn accent_at(self, fx: f32, fy: f32, horizon: f32, x: u32, y: u32) -> bool {
        match self {
            // Waterfall: a bright band falling from the horizon.
            Scene::Cascade => fy >= horizon && (fx - 0.5).abs() < 0.06 + 0.04 * fy,
            // Sun above the canopy.
            Scene::Jungle => {
                let (dx, dy) = (fx - 0.78, (fy - 0.18) * 0.6);
                dx * dx + dy * dy < 0.004
            }
            // Low sun sitting on the dunes.
            Scene::Desert => {
                let (dx, dy) = (fx - 0.3, (fy - horizon + 0.05) * 0.6);
                fy < horizon && dx * dx + dy * dy < 0.006
            }
            // Rock face streaks on the mountain.
            Scene::Snow => fy >= horizon && fy < horizon + 0.12 && hash(x / 3, y) % 5 == 0,
            // Scattered blossoms in the meadow.
            Scene::Spring => fy > horizon + 0.05 && hash(x / 2, y / 2) % 17 == 0,
        }
    }
}

fn lerp3(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

/// Cheap integer hash for stable pseudo-random speckles.
fn hash(x: u32, y: u32) -> u32 {
    let mut h = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA77);
    h ^= h >> 15;
    h = h.wrapping_mul(0xC2B2_AE3D);
    h ^ (h >> 13)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_scenes_in_demo_order() {
        let labels: Vec<_> = Scene::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, ["cascade", "jungle", "desert", "snow", "spring"]);
    }

    #[test]
    fn render_is_deterministic_and_opaque() {
        for &scene in Scene::ALL {
            let a = scene.render(48, 32);
            let b = scene.render(48, 32);
            assert_eq!(a.dimensions(), (48, 32));
            assert_eq!(a.as_raw(), b.as_raw());
            assert!(a.pixels().all(|p| p[3] == 255));
        }
    }

    #[test]
    fn sky_differs_from_ground() {
        let img = Scene::Desert.render(10, 40);
        assert_ne!(img.get_pixel(0, 0), img.get_pixel(0, 39));
    }
}
