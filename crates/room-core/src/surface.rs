//! Bounded planar surfaces and image-source geometry.
//!
//! A surface is described by a [`SurfaceShape`]: something that can provide a
//! plane and answer whether a world-space point lies inside its bounds. The
//! plane is only an approximation for mesh shapes (planarity is assumed, not
//! checked); the bounds test alone decides whether a reflection is valid.

use std::fmt;
use std::sync::Arc;

use glam::{DQuat, DVec3};

use crate::material::AcousticMaterial;

/// Slack added to bounds tests so zero-thickness slabs still contain the
/// points on their own plane.
const BOUNDS_TOLERANCE: f64 = 1e-6;

/// Infinite plane through `point` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: DVec3,
    pub point: DVec3,
}

impl Plane {
    /// Returns `None` for a zero-length normal.
    pub fn new(normal: DVec3, point: DVec3) -> Option<Self> {
        let normal = normal.try_normalize()?;
        Some(Self { normal, point })
    }

    /// Signed distance from the plane, positive on the normal side.
    pub fn signed_distance(&self, p: DVec3) -> f64 {
        self.normal.dot(p - self.point)
    }

    /// Mirror image of `p` across the plane.
    pub fn mirror(&self, p: DVec3) -> DVec3 {
        let on_plane = p - self.normal * self.signed_distance(p);
        on_plane - (p - on_plane)
    }

    /// Distance along the ray `origin + t·dir` at which it enters the plane.
    ///
    /// `None` when the ray is parallel to the plane or points away from it.
    /// `dir` does not need to be normalised; `t` is in units of `dir`.
    pub fn raycast(&self, origin: DVec3, dir: DVec3) -> Option<f64> {
        let denom = dir.dot(self.normal);
        if denom.abs() < 1e-12 {
            return None;
        }
        let t = (self.point - origin).dot(self.normal) / denom;
        (t > 0.0).then_some(t)
    }
}

/// World placement of a shape: scale, then rotate, then translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub translation: DVec3,
    pub rotation: DQuat,
    pub scale: DVec3,
}

impl Placement {
    pub fn new(translation: DVec3, rotation: DQuat, scale: DVec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn from_translation(translation: DVec3) -> Self {
        Self::new(translation, DQuat::IDENTITY, DVec3::ONE)
    }

    pub fn from_translation_rotation(translation: DVec3, rotation: DQuat) -> Self {
        Self::new(translation, rotation, DVec3::ONE)
    }

    pub fn transform_point(&self, local: DVec3) -> DVec3 {
        self.translation + self.rotation * (self.scale * local)
    }

    /// Local +Y axis in world space.
    pub fn up(&self) -> DVec3 {
        self.rotation * DVec3::Y
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::from_translation(DVec3::ZERO)
    }
}

/// A bounded region that may stand in for a planar surface.
pub trait SurfaceShape: fmt::Debug + Send + Sync {
    /// Plane used for mirroring and ray intersection, if the shape has one.
    fn plane(&self) -> Option<Plane>;

    /// Whether the world-space point lies within the shape's bounds.
    fn contains(&self, point: DVec3) -> bool;

    /// Estimated one-sided surface area in m², if it can be estimated.
    fn area(&self) -> Option<f64>;
}

/// Axis-aligned bounds in world space.
#[derive(Debug, Clone, Copy)]
struct Aabb {
    min: DVec3,
    max: DVec3,
}

impl Aabb {
    fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    fn contains(&self, p: DVec3) -> bool {
        let lo = self.min - DVec3::splat(BOUNDS_TOLERANCE);
        let hi = self.max + DVec3::splat(BOUNDS_TOLERANCE);
        p.cmpge(lo).all() && p.cmple(hi).all()
    }
}

/// Box-shaped slab. Its plane passes through the box centre with the
/// placement's local up axis as normal.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxRegion {
    /// Box centre in local coordinates.
    pub center: DVec3,
    /// Full extents along the local axes.
    pub size: DVec3,
    pub placement: Placement,
}

impl BoxRegion {
    pub fn new(center: DVec3, size: DVec3, placement: Placement) -> Self {
        Self {
            center,
            size,
            placement,
        }
    }

    fn corners(&self) -> impl Iterator<Item = DVec3> + '_ {
        let half = self.size * 0.5;
        (0..8).map(move |i| {
            let sign = DVec3::new(
                if i & 1 == 0 { -1.0 } else { 1.0 },
                if i & 2 == 0 { -1.0 } else { 1.0 },
                if i & 4 == 0 { -1.0 } else { 1.0 },
            );
            self.placement.transform_point(self.center + half * sign)
        })
    }
}

impl SurfaceShape for BoxRegion {
    fn plane(&self) -> Option<Plane> {
        Plane::new(
            self.placement.up(),
            self.placement.transform_point(self.center),
        )
    }

    fn contains(&self, point: DVec3) -> bool {
        Aabb::from_points(self.corners()).is_some_and(|b| b.contains(point))
    }

    /// Product of the two largest scaled extents.
    fn area(&self) -> Option<f64> {
        let scaled = (self.size * self.placement.scale).abs();
        let mut extents = [scaled.x, scaled.y, scaled.z];
        extents.sort_by(|a, b| b.total_cmp(a));
        Some(extents[0] * extents[1])
    }
}

/// Triangle mesh assumed to be planar. The plane uses the placement's local up
/// axis through the placement origin.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRegion {
    pub vertices: Vec<DVec3>,
    pub triangles: Vec<[usize; 3]>,
    pub placement: Placement,
}

impl MeshRegion {
    pub fn new(vertices: Vec<DVec3>, triangles: Vec<[usize; 3]>, placement: Placement) -> Self {
        Self {
            vertices,
            triangles,
            placement,
        }
    }

    /// Axis-aligned rectangle in the local XZ plane, two triangles.
    pub fn quad(width: f64, depth: f64, placement: Placement) -> Self {
        let (hw, hd) = (width * 0.5, depth * 0.5);
        Self::new(
            vec![
                DVec3::new(-hw, 0.0, -hd),
                DVec3::new(hw, 0.0, -hd),
                DVec3::new(hw, 0.0, hd),
                DVec3::new(-hw, 0.0, hd),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
            placement,
        )
    }
}

impl SurfaceShape for MeshRegion {
    fn plane(&self) -> Option<Plane> {
        if self.vertices.is_empty() {
            return None;
        }
        Plane::new(self.placement.up(), self.placement.translation)
    }

    fn contains(&self, point: DVec3) -> bool {
        Aabb::from_points(self.vertices.iter().map(|&v| self.placement.transform_point(v)))
            .is_some_and(|b| b.contains(point))
    }

    /// Local triangle area scaled by |sx·sy|. Only exact under uniform
    /// scale in the mesh plane.
    fn area(&self) -> Option<f64> {
        if self.vertices.is_empty() {
            return None;
        }
        let local: f64 = self
            .triangles
            .iter()
            .filter_map(|&[a, b, c]| {
                let (a, b, c) = (
                    self.vertices.get(a)?,
                    self.vertices.get(b)?,
                    self.vertices.get(c)?,
                );
                Some((*b - *a).cross(*c - *a).length() * 0.5)
            })
            .sum();
        let s = self.placement.scale;
        Some(local * (s.x * s.y).abs())
    }
}

/// Non-planar ground (terrain). It occupies space but cannot reflect or be
/// measured.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainRegion {
    pub min: DVec3,
    pub max: DVec3,
}

impl SurfaceShape for TerrainRegion {
    fn plane(&self) -> Option<Plane> {
        None
    }

    fn contains(&self, point: DVec3) -> bool {
        Aabb::from_points([self.min, self.max]).is_some_and(|b| b.contains(point))
    }

    fn area(&self) -> Option<f64> {
        None
    }
}

/// One room boundary: a shape plus the material assigned to it.
#[derive(Debug)]
pub struct RoomSurface {
    pub name: String,
    pub shape: Box<dyn SurfaceShape>,
    pub material: Option<Arc<AcousticMaterial>>,
    pub enabled: bool,
}

impl RoomSurface {
    /// Enabled surface without a material.
    pub fn new(name: impl Into<String>, shape: impl SurfaceShape + 'static) -> Self {
        Self {
            name: name.into(),
            shape: Box::new(shape),
            material: None,
            enabled: true,
        }
    }

    pub fn with_material(mut self, material: Arc<AcousticMaterial>) -> Self {
        self.material = Some(material);
        self
    }

    pub fn plane(&self) -> Option<Plane> {
        self.shape.plane()
    }

    pub fn contains(&self, point: DVec3) -> bool {
        self.shape.contains(point)
    }

    pub fn area(&self) -> Option<f64> {
        self.shape.area()
    }

    /// Image source of `source` across this surface. `None` if the surface
    /// is disabled or has no plane.
    pub fn reflected_source(&self, source: DVec3) -> Option<DVec3> {
        if !self.enabled {
            return None;
        }
        Some(self.plane()?.mirror(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn floor_box() -> BoxRegion {
        BoxRegion::new(
            DVec3::ZERO,
            DVec3::new(6.0, 0.02, 4.0),
            Placement::default(),
        )
    }

    #[test]
    fn test_mirror_across_floor() {
        let plane = floor_box().plane().unwrap();
        let image = plane.mirror(DVec3::new(1.0, 1.5, -2.0));
        assert!((image - DVec3::new(1.0, -1.5, -2.0)).length() < 1e-12);
    }

    #[test]
    fn test_raycast_rejects_parallel_and_backwards_rays() {
        let plane = Plane::new(DVec3::Y, DVec3::ZERO).unwrap();
        let origin = DVec3::new(0.0, -1.0, 0.0);
        assert_eq!(plane.raycast(origin, DVec3::X), None);
        assert_eq!(plane.raycast(origin, -DVec3::Y), None);
        let t = plane.raycast(origin, DVec3::new(0.0, 2.0, 6.0)).unwrap();
        assert!((t - 0.5).abs() < 1e-12, "t = {t}");
    }

    #[test]
    fn test_zero_normal_has_no_plane() {
        assert!(Plane::new(DVec3::ZERO, DVec3::ONE).is_none());
    }

    #[test]
    fn test_box_bounds_and_area() {
        let b = floor_box();
        assert!(b.contains(DVec3::new(2.9, 0.0, 1.9)));
        assert!(!b.contains(DVec3::new(3.1, 0.0, 0.0)));
        assert!(!b.contains(DVec3::new(0.0, 0.5, 0.0)));
        assert!((b.area().unwrap() - 24.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotated_box_uses_local_up_as_normal() {
        // Local up rotated onto world -X: a wall at x = 3.
        let wall = BoxRegion::new(
            DVec3::ZERO,
            DVec3::new(2.5, 0.02, 4.0),
            Placement::from_translation_rotation(
                DVec3::new(3.0, 1.25, 0.0),
                DQuat::from_rotation_z(FRAC_PI_2),
            ),
        );
        let plane = wall.plane().unwrap();
        assert!((plane.normal - DVec3::NEG_X).length() < 1e-12);
        assert!(wall.contains(DVec3::new(3.0, 2.0, 1.5)));
        assert!(!wall.contains(DVec3::new(3.0, 2.6, 0.0)));
        assert!((wall.area().unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_box_area_applies_world_scale() {
        let b = BoxRegion::new(
            DVec3::ZERO,
            DVec3::new(1.0, 0.01, 1.0),
            Placement::new(DVec3::ZERO, DQuat::IDENTITY, DVec3::new(3.0, 1.0, 2.0)),
        );
        assert!((b.area().unwrap() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_mesh_quad_area_and_plane() {
        let quad = MeshRegion::quad(2.0, 3.0, Placement::from_translation(DVec3::Y));
        assert!((quad.area().unwrap() - 6.0).abs() < 1e-12);
        let plane = quad.plane().unwrap();
        assert_eq!(plane.normal, DVec3::Y);
        assert_eq!(plane.point, DVec3::Y);
        assert!(quad.contains(DVec3::new(0.5, 1.0, 1.0)));
    }

    #[test]
    fn test_empty_mesh_has_no_plane() {
        let mesh = MeshRegion::new(Vec::new(), Vec::new(), Placement::default());
        assert!(mesh.plane().is_none());
        assert!(mesh.area().is_none());
        assert!(!mesh.contains(DVec3::ZERO));
    }

    #[test]
    fn test_terrain_has_no_plane() {
        let terrain = TerrainRegion {
            min: DVec3::splat(-1.0),
            max: DVec3::splat(1.0),
        };
        let surface = RoomSurface::new("ground", terrain);
        assert!(surface.plane().is_none());
        assert!(surface.reflected_source(DVec3::Y).is_none());
        assert!(surface.contains(DVec3::ZERO));
    }

    #[test]
    fn test_disabled_surface_has_no_image_source() {
        let mut surface = RoomSurface::new("floor", floor_box());
        assert!(surface.reflected_source(DVec3::Y).is_some());
        surface.enabled = false;
        assert!(surface.reflected_source(DVec3::Y).is_none());
    }
}
