//! Image-source path tracing: the direct path plus first-order reflections
//! from every speaker to the listener.

use glam::DVec3;
use log::trace;

use crate::constants::{MIN_DISTANCE, SPEED_OF_SOUND};
use crate::material::AcousticMaterial;
use crate::room::Room;
use crate::speaker::{Listener, Speaker};
use crate::surface::RoomSurface;

/// Where and how a first-order path bounced.
#[derive(Debug, Clone)]
pub struct Reflection<'a> {
    pub point: DVec3,
    /// Index of the reflecting surface in `Room::surfaces`.
    pub surface_index: usize,
    pub material: &'a AcousticMaterial,
    /// Pressure reflection coefficient per material band.
    pub coefficients: Vec<f64>,
}

/// One propagation path from a speaker to the listener.
#[derive(Debug, Clone)]
pub struct AcousticPath<'a> {
    pub speaker: &'a Speaker,
    pub start: DVec3,
    pub end: DVec3,
    /// Total travelled distance in metres.
    pub distance: f64,
    /// Propagation delay in seconds.
    pub delay: f64,
    /// Spherical spreading 1 / max(ε, distance).
    pub amplitude: f64,
    /// Present exactly for first-order paths.
    pub reflection: Option<Reflection<'a>>,
}

impl<'a> AcousticPath<'a> {
    fn new(
        speaker: &'a Speaker,
        end: DVec3,
        distance: f64,
        speed_of_sound: f64,
        reflection: Option<Reflection<'a>>,
    ) -> Self {
        Self {
            speaker,
            start: speaker.position,
            end,
            distance,
            delay: distance / speed_of_sound,
            amplitude: 1.0 / distance.max(MIN_DISTANCE),
            reflection,
        }
    }

    /// 0 for the direct path, 1 for a single reflection.
    pub fn order(&self) -> u8 {
        u8::from(self.reflection.is_some())
    }

    pub fn reflection_point(&self) -> Option<DVec3> {
        self.reflection.as_ref().map(|r| r.point)
    }

    pub fn reflection_coefficients(&self) -> Option<&[f64]> {
        self.reflection.as_ref().map(|r| r.coefficients.as_slice())
    }
}

impl std::fmt::Display for AcousticPath<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} order={} d={:.2}m tau={:.4}s amp={:.3}",
            self.speaker.channel,
            self.order(),
            self.distance,
            self.delay,
            self.amplitude
        )
    }
}

/// Enumerates direct and first-order reflected paths.
#[derive(Debug, Clone, Copy)]
pub struct PathTracer {
    /// Speed of sound in m/s.
    pub speed_of_sound: f64,
}

impl PathTracer {
    pub fn new(speed_of_sound: f64) -> Self {
        Self { speed_of_sound }
    }

    /// All paths from every speaker to the listener.
    ///
    /// Each speaker contributes its direct path first, followed by one path
    /// per surface that produces a valid in-bounds reflection.
    pub fn compute_paths<'a>(
        &self,
        room: &'a Room,
        speakers: &'a [Speaker],
        listener: &Listener,
    ) -> Vec<AcousticPath<'a>> {
        let mut paths = Vec::with_capacity(speakers.len() * (1 + room.surfaces.len()));

        for speaker in speakers {
            paths.push(self.direct_path(speaker, listener));

            for (index, surface) in room.surfaces.iter().enumerate() {
                if let Some(path) = self.first_order_path(speaker, listener, surface, index) {
                    paths.push(path);
                }
            }
        }

        paths
    }

    pub fn direct_path<'a>(&self, speaker: &'a Speaker, listener: &Listener) -> AcousticPath<'a> {
        let distance = speaker.position.distance(listener.position);
        AcousticPath::new(speaker, listener.position, distance, self.speed_of_sound, None)
    }

    /// Reflection of `speaker` off `surface`, or `None` if the surface cannot
    /// produce one.
    pub fn first_order_path<'a>(
        &self,
        speaker: &'a Speaker,
        listener: &Listener,
        surface: &'a RoomSurface,
        surface_index: usize,
    ) -> Option<AcousticPath<'a>> {
        let drop_candidate = |reason: &str| {
            trace!(
                "dropping {} reflection off '{}': {reason}",
                speaker.channel,
                surface.name
            );
        };

        if !surface.enabled {
            drop_candidate("surface disabled");
            return None;
        }
        let Some(material) = surface.material.as_deref() else {
            drop_candidate("no material");
            return None;
        };
        let Some(plane) = surface.plane() else {
            drop_candidate("no plane");
            return None;
        };
        let Some(image) = surface.reflected_source(speaker.position) else {
            drop_candidate("no image source");
            return None;
        };

        // Half-line from the image source through the listener.
        let to_listener = listener.position - image;
        let hit = match plane.raycast(image, to_listener) {
            Some(t) => image + to_listener * t,
            None => {
                drop_candidate("ray misses plane");
                return None;
            }
        };

        if !surface.contains(hit) {
            drop_candidate("hit outside surface bounds");
            return None;
        }

        let distance = speaker.position.distance(hit) + hit.distance(listener.position);
        let reflection = Reflection {
            point: hit,
            surface_index,
            material,
            coefficients: material.reflection_bands(),
        };

        Some(AcousticPath::new(
            speaker,
            listener.position,
            distance,
            self.speed_of_sound,
            Some(reflection),
        ))
    }
}

impl Default for PathTracer {
    fn default() -> Self {
        Self::new(SPEED_OF_SOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{BoxRegion, Placement};
    use std::sync::Arc;

    fn floor(alpha: f64) -> RoomSurface {
        RoomSurface::new(
            "floor",
            BoxRegion::new(
                DVec3::ZERO,
                DVec3::new(6.0, 0.02, 4.0),
                Placement::default(),
            ),
        )
        .with_material(Arc::new(AcousticMaterial::uniform("floor", alpha, 6)))
    }

    #[test]
    fn test_single_direct_path_without_surfaces() {
        let room = Room::new(6.0, 4.0, 2.5);
        let speakers = [Speaker::new("C", DVec3::new(1.0, 1.0, 0.0))];
        let listener = Listener::new(DVec3::new(4.0, 5.0, 0.0));

        let paths = PathTracer::default().compute_paths(&room, &speakers, &listener);

        assert_eq!(paths.len(), 1);
        let p = &paths[0];
        assert_eq!(p.order(), 0);
        assert!(p.reflection_coefficients().is_none());
        assert!((p.distance - 5.0).abs() < 1e-12);
        assert!((p.delay - 5.0 / 343.0).abs() < 1e-12);
        assert!((p.amplitude - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_coincident_speaker_and_listener_amplitude_is_clamped() {
        let room = Room::new(6.0, 4.0, 2.5);
        let speakers = [Speaker::new("C", DVec3::ONE)];
        let paths = PathTracer::default().compute_paths(&room, &speakers, &Listener::new(DVec3::ONE));
        assert_eq!(paths[0].distance, 0.0);
        assert_eq!(paths[0].amplitude, 1.0 / MIN_DISTANCE);
        assert!(paths[0].amplitude.is_finite());
    }

    #[test]
    fn test_floor_reflection_geometry() {
        let room = Room::new(6.0, 4.0, 2.5).with_surface(floor(0.1));
        let speakers = [Speaker::new("C", DVec3::new(0.0, 1.0, 0.0))];
        let listener = Listener::new(DVec3::new(0.0, 1.0, 3.0));

        let paths = PathTracer::default().compute_paths(&room, &speakers, &listener);
        assert_eq!(paths.len(), 2);

        let reflected = paths.iter().find(|p| p.order() == 1).unwrap();
        let hit = reflected.reflection_point().unwrap();
        assert!((hit - DVec3::new(0.0, 0.0, 1.5)).length() < 1e-9, "hit = {hit}");

        let expected = 2.0 * (1.0f64 + 1.5 * 1.5).sqrt();
        assert!((reflected.distance - expected).abs() < 1e-9);

        let coeffs = reflected.reflection_coefficients().unwrap();
        assert_eq!(coeffs.len(), 6);
        for &r in coeffs {
            assert!((r - 0.9f64.sqrt()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_hit_outside_bounds_is_dropped() {
        // Listener far beyond the floor's extent: the specular point lands
        // at z = 5, outside the 4 m deep floor.
        let room = Room::new(6.0, 4.0, 2.5).with_surface(floor(0.1));
        let speakers = [Speaker::new("C", DVec3::new(0.0, 1.0, 0.0))];
        let listener = Listener::new(DVec3::new(0.0, 1.0, 10.0));
        let paths = PathTracer::default().compute_paths(&room, &speakers, &listener);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].order(), 0);
    }

    #[test]
    fn test_listener_behind_surface_still_reflects_in_bounds() {
        // The image-to-listener ray crosses the floor plane beyond the
        // listener, at z = 2, which is still on the floor.
        let room = Room::new(6.0, 4.0, 2.5).with_surface(floor(0.1));
        let speakers = [Speaker::new("C", DVec3::new(0.0, 1.0, 0.0))];
        let listener = Listener::new(DVec3::new(0.0, -0.5, 1.0));
        let paths = PathTracer::default().compute_paths(&room, &speakers, &listener);
        assert_eq!(paths.len(), 2);
        let hit = paths[1].reflection_point().unwrap();
        assert!(hit.distance(DVec3::new(0.0, 0.0, 2.0)) < 1e-9, "hit = {hit}");
    }

    #[test]
    fn test_ray_away_from_plane_gets_no_reflection() {
        // Listener directly below the image source: the ray points away
        // from the floor.
        let room = Room::new(6.0, 4.0, 2.5).with_surface(floor(0.1));
        let speakers = [Speaker::new("C", DVec3::new(0.0, 1.0, 0.0))];
        let listener = Listener::new(DVec3::new(0.0, -2.0, 0.0));
        let paths = PathTracer::default().compute_paths(&room, &speakers, &listener);
        assert!(paths.iter().all(|p| p.order() == 0));
    }

    #[test]
    fn test_disabled_or_bare_surfaces_are_skipped() {
        let mut disabled = floor(0.1);
        disabled.enabled = false;
        let mut bare = floor(0.1);
        bare.material = None;
        let room = Room::new(6.0, 4.0, 2.5)
            .with_surface(disabled)
            .with_surface(bare);
        let speakers = [Speaker::new("C", DVec3::new(0.0, 1.0, 0.0))];
        let listener = Listener::new(DVec3::new(0.0, 1.0, 3.0));
        let paths = PathTracer::default().compute_paths(&room, &speakers, &listener);
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_every_speaker_gets_a_direct_path() {
        let room = Room::shoebox(6.0, 4.0, 2.5, Arc::new(AcousticMaterial::default()));
        let speakers = [
            Speaker::new("L", DVec3::new(-2.0, 1.0, 1.5)),
            Speaker::new("R", DVec3::new(2.0, 1.0, 1.5)),
        ];
        let listener = Listener::new(DVec3::new(0.0, 1.2, -0.5));
        let paths = PathTracer::default().compute_paths(&room, &speakers, &listener);

        for channel in ["L", "R"] {
            let direct = paths
                .iter()
                .filter(|p| p.speaker.channel == channel && p.order() == 0)
                .count();
            let reflected = paths
                .iter()
                .filter(|p| p.speaker.channel == channel && p.order() == 1)
                .count();
            assert_eq!(direct, 1, "{channel}");
            // Inside a closed shoebox every wall yields a specular point.
            assert_eq!(reflected, 6, "{channel}");
        }
        for p in paths.iter().filter(|p| p.order() == 1) {
            assert!(p.distance > p.speaker.position.distance(p.end));
        }
    }
}
