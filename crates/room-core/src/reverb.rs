use crate::constants::{MIN_TOTAL_ABSORPTION, SABINE_CONSTANT, T60_SENTINEL};
use crate::room::Room;

/// Total absorption A = Σ αᵢ·Sᵢ in m² sabins for one band.
///
/// Surfaces without a material or without an estimable area do not count.
/// Disabled surfaces still absorb: `enabled` only controls reflections.
pub fn total_absorption(room: &Room, band: usize) -> f64 {
    room.surfaces
        .iter()
        .filter_map(|s| {
            let material = s.material.as_ref()?;
            Some(material.absorption_at_band(band) * s.area()?)
        })
        .sum()
}

/// Sabine reverberation time T60 = 0.161·V/A in seconds.
///
/// Returns [`T60_SENTINEL`] (999 s) when A is effectively zero.
pub fn sabine_t60(room: &Room, band: usize) -> f64 {
    let absorption = total_absorption(room, band);
    if absorption <= MIN_TOTAL_ABSORPTION {
        return T60_SENTINEL;
    }
    SABINE_CONSTANT * room.volume() / absorption
}

/// T60 for every band of the room's widest material.
pub fn t60_per_band(room: &Room) -> Vec<f64> {
    let bands = room
        .surfaces
        .iter()
        .filter_map(|s| s.material.as_ref().map(|m| m.band_count()))
        .max()
        .unwrap_or(0);
    (0..bands).map(|band| sabine_t60(room, band)).collect()
}
