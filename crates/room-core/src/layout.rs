//! Preset surround speaker layouts.

use glam::DVec3;

use crate::speaker::Speaker;

/// Named speaker arrangement: one position per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct SurroundLayout {
    pub name: &'static str,
    pub channels: Vec<(&'static str, DVec3)>,
}

impl SurroundLayout {
    /// 5.1: front L/C/R, side surrounds, subwoofer.
    pub fn surround_5_1() -> Self {
        Self {
            name: "5.1",
            channels: vec![
                ("L", DVec3::new(-2.0, 1.0, 3.0)),
                ("R", DVec3::new(2.0, 1.0, 3.0)),
                ("C", DVec3::new(0.0, 1.0, 3.0)),
                ("LS", DVec3::new(-3.0, 1.0, -1.0)),
                ("RS", DVec3::new(3.0, 1.0, -1.0)),
                ("SUB", DVec3::new(0.0, 1.0, 1.0)),
            ],
        }
    }

    /// 7.1: 5.1 plus rear back channels.
    pub fn surround_7_1() -> Self {
        Self {
            name: "7.1",
            channels: vec![
                ("L", DVec3::new(-2.0, 1.0, 3.0)),
                ("R", DVec3::new(2.0, 1.0, 3.0)),
                ("C", DVec3::new(0.0, 1.0, 3.0)),
                ("LS", DVec3::new(-3.0, 1.0, 1.0)),
                ("RS", DVec3::new(3.0, 1.0, 1.0)),
                ("LB", DVec3::new(-3.0, 1.0, -2.0)),
                ("RB", DVec3::new(3.0, 1.0, -2.0)),
                ("SUB", DVec3::new(0.0, 1.0, 1.0)),
            ],
        }
    }

    /// Look a preset up by name ("5.1" or "7.1").
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "5.1" => Some(Self::surround_5_1()),
            "7.1" => Some(Self::surround_7_1()),
            _ => None,
        }
    }

    /// Speakers for every channel, each aimed at `listening_position`, with
    /// unit level and default directivity. `origin` offsets the whole layout.
    pub fn build(&self, origin: DVec3, listening_position: DVec3) -> Vec<Speaker> {
        self.channels
            .iter()
            .map(|&(channel, offset)| {
                Speaker::new(channel, origin + offset).looking_at(listening_position)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_presets_have_unique_channels() {
        for layout in [SurroundLayout::surround_5_1(), SurroundLayout::surround_7_1()] {
            let names: HashSet<_> = layout.channels.iter().map(|(c, _)| *c).collect();
            assert_eq!(names.len(), layout.channels.len(), "{}", layout.name);
        }
        assert_eq!(SurroundLayout::surround_5_1().channels.len(), 6);
        assert_eq!(SurroundLayout::surround_7_1().channels.len(), 8);
    }

    #[test]
    fn test_built_speakers_face_the_listener() {
        let listening = DVec3::new(0.0, 1.0, 0.0);
        let speakers = SurroundLayout::surround_5_1().build(DVec3::ZERO, listening);
        assert_eq!(speakers.len(), 6);
        for sp in &speakers {
            assert!(sp.off_axis_angle(listening) < 1e-6, "{}", sp.channel);
            assert!((sp.directivity_gain(listening) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(SurroundLayout::by_name("7.1").unwrap().name, "7.1");
        assert!(SurroundLayout::by_name("9.1").is_none());
    }
}
