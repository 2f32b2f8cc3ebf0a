use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

use glam::{DQuat, DVec3};

use crate::constants::MIN_VOLUME;
use crate::material::AcousticMaterial;
use crate::surface::{BoxRegion, Placement, RoomSurface};

/// Thickness of the slabs built by [`Room::shoebox`], in metres.
const SLAB_THICKNESS: f64 = 0.02;

/// Rectangular room: its dimensions plus the surfaces that bound it.
///
/// Width runs along X, height along Y and length along Z.
#[derive(Debug)]
pub struct Room {
    pub width: f64,
    pub length: f64,
    pub height: f64,
    pub surfaces: Vec<RoomSurface>,
}

impl Room {
    /// Room with no surfaces.
    pub fn new(width: f64, length: f64, height: f64) -> Self {
        Self {
            width,
            length,
            height,
            surfaces: Vec::new(),
        }
    }

    /// Six-sided room with every surface using `material`.
    ///
    /// The floor sits at y = 0 and spans x ∈ [−w/2, w/2], z ∈ [−l/2, l/2].
    pub fn shoebox(width: f64, length: f64, height: f64, material: Arc<AcousticMaterial>) -> Self {
        let (hw, hl, hh) = (width * 0.5, length * 0.5, height * 0.5);
        let slab = |name: &str, at: DVec3, rotation: DQuat, size: DVec3| {
            RoomSurface::new(
                name,
                BoxRegion::new(
                    DVec3::ZERO,
                    size,
                    Placement::from_translation_rotation(at, rotation),
                ),
            )
            .with_material(Arc::clone(&material))
        };

        let surfaces = vec![
            slab(
                "floor",
                DVec3::ZERO,
                DQuat::IDENTITY,
                DVec3::new(width, SLAB_THICKNESS, length),
            ),
            slab(
                "ceiling",
                DVec3::new(0.0, height, 0.0),
                DQuat::from_rotation_x(PI),
                DVec3::new(width, SLAB_THICKNESS, length),
            ),
            // Rotations about Z map local X onto world ±Y, so the wall's
            // local X extent is the room height.
            slab(
                "wall_left",
                DVec3::new(-hw, hh, 0.0),
                DQuat::from_rotation_z(-FRAC_PI_2),
                DVec3::new(height, SLAB_THICKNESS, length),
            ),
            slab(
                "wall_right",
                DVec3::new(hw, hh, 0.0),
                DQuat::from_rotation_z(FRAC_PI_2),
                DVec3::new(height, SLAB_THICKNESS, length),
            ),
            // Rotations about X map local Z onto world ±Y.
            slab(
                "wall_back",
                DVec3::new(0.0, hh, -hl),
                DQuat::from_rotation_x(FRAC_PI_2),
                DVec3::new(width, SLAB_THICKNESS, height),
            ),
            slab(
                "wall_front",
                DVec3::new(0.0, hh, hl),
                DQuat::from_rotation_x(-FRAC_PI_2),
                DVec3::new(width, SLAB_THICKNESS, height),
            ),
        ];

        Self {
            width,
            length,
            height,
            surfaces,
        }
    }

    pub fn with_surface(mut self, surface: RoomSurface) -> Self {
        self.surfaces.push(surface);
        self
    }

    /// Volume in m³, never below [`MIN_VOLUME`].
    pub fn volume(&self) -> f64 {
        (self.width * self.length * self.height).max(MIN_VOLUME)
    }

    /// Summed area of every surface whose area can be estimated.
    pub fn total_surface_area(&self) -> f64 {
        self.surfaces.iter().filter_map(RoomSurface::area).sum()
    }

    pub fn surface(&self, name: &str) -> Option<&RoomSurface> {
        self.surfaces.iter().find(|s| s.name == name)
    }

    pub fn surface_mut(&mut self, name: &str) -> Option<&mut RoomSurface> {
        self.surfaces.iter_mut().find(|s| s.name == name)
    }

    /// Reassign the material of the named surface. Returns `false` if no
    /// surface has that name.
    pub fn set_material(&mut self, name: &str, material: Arc<AcousticMaterial>) -> bool {
        match self.surface_mut(name) {
            Some(surface) => {
                surface.material = Some(material);
                true
            }
            None => false,
        }
    }

    /// Enable or disable the named surface. Returns `false` if no surface
    /// has that name.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.surface_mut(name) {
            Some(surface) => {
                surface.enabled = enabled;
                true
            }
            None => false,
        }
    }
}
