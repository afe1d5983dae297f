//! Arena geometry: a flat circular floor scattered with vertical
//! cylinder obstacles.
//!
//! All spatial queries the systems need go through here: navigability
//! sampling, sight-line and projectile occlusion, and the cover search
//! radius query. Obstacles are cylinders standing on the floor (base at
//! y = 0); a line test hits one when its horizontal projection crosses
//! the circle below the obstacle's height.

use glam::{Vec3, Vec3Swizzles};
use serde::{Deserialize, Serialize};

use skirmish_core::constants::ARENA_RADIUS;
use skirmish_core::types::flatten;

/// A vertical cylinder standing on the arena floor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    /// Base center (y = 0).
    pub position: Vec3,
    pub radius: f32,
    pub height: f32,
    /// Whether the cover locator may hide behind this obstacle.
    /// Non-cover obstacles still block sight and projectiles.
    pub provides_cover: bool,
}

/// The combat arena: a disc of navigable floor plus obstacles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub radius: f32,
    pub obstacles: Vec<Obstacle>,
}

impl Arena {
    /// An empty disc with no obstacles.
    pub fn open(radius: f32) -> Self {
        Self {
            radius,
            obstacles: Vec::new(),
        }
    }

    pub fn with_obstacles(radius: f32, obstacles: Vec<Obstacle>) -> Self {
        Self { radius, obstacles }
    }

    /// Default layout: crates usable as cover at mid range plus a solid
    /// pillar that blocks sight but offers no cover.
    pub fn training_ground() -> Self {
        let cover = |x: f32, z: f32| Obstacle {
            position: Vec3::new(x, 0.0, z),
            radius: 1.0,
            height: 2.0,
            provides_cover: true,
        };
        Self::with_obstacles(
            ARENA_RADIUS,
            vec![
                cover(6.0, 4.0),
                cover(-8.0, -3.0),
                cover(3.0, -9.0),
                cover(-4.0, 8.0),
                Obstacle {
                    position: Vec3::new(0.0, 0.0, 15.0),
                    radius: 1.5,
                    height: 3.0,
                    provides_cover: false,
                },
            ],
        )
    }

    /// Whether a point lies on navigable floor: inside the disc and
    /// outside every obstacle footprint.
    pub fn is_navigable(&self, point: Vec3) -> bool {
        if point.xz().length() > self.radius {
            return false;
        }
        self.obstacles
            .iter()
            .all(|o| (point.xz() - o.position.xz()).length() >= o.radius)
    }

    /// Find a navigable point near `near`, pushing it out of the arena
    /// edge and obstacle footprints. Returns `None` when the nearest
    /// navigable surface is further than `tolerance` away.
    pub fn sample_reachable_point(&self, near: Vec3, tolerance: f32) -> Option<Vec3> {
        let mut point = flatten(near);

        let dist_from_center = point.xz().length();
        if dist_from_center > self.radius {
            if dist_from_center - self.radius > tolerance {
                return None;
            }
            point *= (self.radius - f32::EPSILON) / dist_from_center;
        }

        for o in &self.obstacles {
            let offset = point.xz() - o.position.xz();
            let dist = offset.length();
            if dist >= o.radius {
                continue;
            }
            if o.radius - dist > tolerance {
                return None;
            }
            // Push straight out of the footprint; a point exactly at
            // the obstacle center escapes along +x.
            let dir = if dist > f32::EPSILON {
                offset / dist
            } else {
                glam::Vec2::X
            };
            let escaped = o.position.xz() + dir * (o.radius + 0.01);
            point = Vec3::new(escaped.x, 0.0, escaped.y);
        }

        if point.xz().length() > self.radius {
            return None;
        }
        Some(point)
    }

    /// Whether any obstacle interrupts the segment from `from` to `to`.
    /// With `ignore_cover`, cover-tagged obstacles are transparent
    /// (visibility checks see through cover; projectiles do not).
    pub fn line_blocked(&self, from: Vec3, to: Vec3, ignore_cover: bool) -> bool {
        self.segment_obstacle_hit(from, to, ignore_cover).is_some()
    }

    /// Nearest obstacle intersection along the segment, as a fraction
    /// of its length in `[0, 1]`.
    pub fn segment_obstacle_hit(&self, from: Vec3, to: Vec3, ignore_cover: bool) -> Option<f32> {
        let mut best: Option<f32> = None;
        for o in &self.obstacles {
            if ignore_cover && o.provides_cover {
                continue;
            }
            if let Some(t) = segment_circle_hit(from, to, o.position.xz(), o.radius) {
                let hit_y = from.y + (to.y - from.y) * t;
                if hit_y <= o.height && best.map_or(true, |b| t < b) {
                    best = Some(t);
                }
            }
        }
        best
    }

    /// Nearest obstacle hit along a ray, as a distance from the origin.
    pub fn ray_obstacle_hit(
        &self,
        origin: Vec3,
        dir: Vec3,
        max_dist: f32,
        ignore_cover: bool,
    ) -> Option<f32> {
        self.segment_obstacle_hit(origin, origin + dir * max_dist, ignore_cover)
            .map(|t| t * max_dist)
    }

    /// Cover-tagged obstacles within `radius` of `center` (horizontal).
    pub fn cover_obstacles_within(
        &self,
        center: Vec3,
        radius: f32,
    ) -> impl Iterator<Item = &Obstacle> {
        let center = center.xz();
        self.obstacles
            .iter()
            .filter(move |o| o.provides_cover && (o.position.xz() - center).length() <= radius)
    }
}

/// Intersection of a segment with a circle in the horizontal plane,
/// as a fraction of the segment length. A start point inside the circle
/// counts as an immediate hit.
fn segment_circle_hit(from: Vec3, to: Vec3, center: glam::Vec2, radius: f32) -> Option<f32> {
    let p = from.xz();
    let d = to.xz() - p;
    let f = p - center;

    let a = d.dot(d);
    if a <= f32::EPSILON {
        // Degenerate segment: point-in-circle test.
        return (f.length() < radius).then_some(0.0);
    }

    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let t_enter = (-b - sqrt_disc) / (2.0 * a);
    let t_exit = (-b + sqrt_disc) / (2.0 * a);
    if t_enter >= 0.0 && t_enter <= 1.0 {
        return Some(t_enter);
    }
    if t_enter < 0.0 && t_exit > 0.0 {
        // Started inside the circle.
        return Some(0.0);
    }
    None
}

/// Intersection of a segment with a sphere, as a fraction of the
/// segment length. Used for body hit tests on agents and the target.
pub fn segment_sphere_hit(from: Vec3, to: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let d = to - from;
    let f = from - center;

    let a = d.dot(d);
    if a <= f32::EPSILON {
        return (f.length() < radius).then_some(0.0);
    }

    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let t_enter = (-b - sqrt_disc) / (2.0 * a);
    let t_exit = (-b + sqrt_disc) / (2.0 * a);
    if t_enter >= 0.0 && t_enter <= 1.0 {
        return Some(t_enter);
    }
    if t_enter < 0.0 && t_exit > 0.0 {
        return Some(0.0);
    }
    None
}

/// Distance along a ray to a sphere, or `None` if the ray misses.
/// `dir` must be normalized.
pub fn ray_sphere_hit(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let f = origin - center;
    let b = 2.0 * f.dot(dir);
    let c = f.dot(f) - radius * radius;
    let disc = b * b - 4.0 * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / 2.0;
    if t >= 0.0 {
        Some(t)
    } else {
        None
    }
}
