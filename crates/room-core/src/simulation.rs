//! End-to-end run: trace → H(f) → h(t) → convolution → levels.

use std::sync::{Mutex, PoisonError};

use log::{debug, warn};

use crate::constants;
use crate::convolution;
use crate::error::{Error, Result};
use crate::impulse_response;
use crate::levels::{self, ListenerLevels};
use crate::room::Room;
use crate::spectrum::{self, ReflectionMode, TransferFunction};
use crate::speaker::{Listener, Speaker};
use crate::tracer::{AcousticPath, PathTracer};

/// How the time-domain impulse response is derived from H(f).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImpulseMode {
    /// Inverse FFT over all bins, keeping the real part.
    #[default]
    Full,
    /// Inverse real FFT over bins 0..=N/2 (output is real by construction).
    Hermitian,
}

/// Numerical parameters of one simulation run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of frequency bins / impulse response samples. Power of two.
    pub fft_size: usize,
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Speed of sound in m/s.
    pub speed_of_sound: f64,
    /// SPL reference pressure in Pa.
    pub reference_pressure: f64,
    pub reflection_mode: ReflectionMode,
    pub impulse_mode: ImpulseMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fft_size: 4096,
            sample_rate: 44100.0,
            speed_of_sound: constants::SPEED_OF_SOUND,
            reference_pressure: constants::REFERENCE_PRESSURE,
            reflection_mode: ReflectionMode::default(),
            impulse_mode: ImpulseMode::default(),
        }
    }
}

impl SimulationConfig {
    /// Default config with the speed of sound for air at `temperature_c` °C.
    pub fn from_temperature(temperature_c: f64) -> Self {
        Self {
            speed_of_sound: constants::speed_of_sound_at(temperature_c),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.fft_size < 2 || !self.fft_size.is_power_of_two() {
            return Err(Error::NotPowerOfTwo(self.fft_size));
        }
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if !(self.speed_of_sound.is_finite() && self.speed_of_sound > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "speed of sound must be positive, got {}",
                self.speed_of_sound
            )));
        }
        if !(self.reference_pressure.is_finite() && self.reference_pressure > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "reference pressure must be positive, got {}",
                self.reference_pressure
            )));
        }
        Ok(())
    }
}

/// Results of a simulation run. Paths borrow the speakers and room surfaces
/// they were traced from.
#[derive(Debug, Clone)]
pub struct SimulationResult<'a> {
    pub paths: Vec<AcousticPath<'a>>,
    /// Complex transfer function H(f), `fft_size` bins.
    pub transfer_function: TransferFunction,
    /// Time-domain impulse response h(t), `fft_size` samples.
    pub impulse_response: Vec<f64>,
    /// The reference speaker's test signal convolved with h(t), if it has one.
    pub convolved_signal: Option<Vec<f64>>,
    pub levels: ListenerLevels,
    /// Sample rate used for the impulse response (Hz).
    pub sample_rate: f64,
}

impl SimulationResult<'_> {
    pub fn overall_db(&self) -> f64 {
        self.levels.overall_db
    }

    pub fn speaker_db(&self, channel: &str) -> Option<f64> {
        self.levels.per_speaker_db.get(channel).copied()
    }
}

/// Runs the acoustic pipeline. Create one and share it by reference with
/// whatever needs to trigger a run; overlapping runs are serialised.
#[derive(Debug, Default)]
pub struct Simulator {
    config: SimulationConfig,
    run_lock: Mutex<()>,
    last_overall_db: Mutex<Option<f64>>,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            run_lock: Mutex::new(()),
            last_overall_db: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Overall level of the most recent successful run.
    pub fn last_overall_db(&self) -> Option<f64> {
        *self
            .last_overall_db
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Trace paths, build H(f) and h(t), convolve the reference speaker's
    /// test signal and compute listener levels.
    ///
    /// The first speaker is the reference speaker. Fails without a partial
    /// result when there are no speakers or the room has no extent.
    pub fn run<'a>(
        &self,
        room: &'a Room,
        speakers: &'a [Speaker],
        listener: &Listener,
    ) -> Result<SimulationResult<'a>> {
        let _guard = self.run_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let config = &self.config;

        check_input(room, speakers, listener).inspect_err(|e| {
            warn!("simulation aborted: {e}");
        })?;

        // 1. Geometry
        let tracer = PathTracer::new(config.speed_of_sound);
        let paths = tracer.compute_paths(room, speakers, listener);

        // 2. Transfer function H(f)
        let transfer_function = spectrum::synthesize(
            &paths,
            config.fft_size,
            config.sample_rate,
            config.reflection_mode,
        );

        // 3. h(t)
        let impulse_response = match config.impulse_mode {
            ImpulseMode::Full => impulse_response::generate(&transfer_function)?,
            ImpulseMode::Hermitian => impulse_response::generate_hermitian(&transfer_function)?,
        };

        // 4. Reference speaker's test signal through the room
        let convolved_signal = speakers[0]
            .test_signal
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| convolution::convolve(s, &impulse_response));

        // 5. Levels at the listener
        let levels = levels::listener_levels(
            &paths,
            speakers,
            listener.position,
            config.reference_pressure,
        );

        debug!(
            "simulation complete: paths={}, IR length={}, speakers={}, overall={:.1} dB",
            paths.len(),
            impulse_response.len(),
            speakers.len(),
            levels.overall_db
        );

        *self
            .last_overall_db
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(levels.overall_db);

        Ok(SimulationResult {
            paths,
            transfer_function,
            impulse_response,
            convolved_signal,
            levels,
            sample_rate: config.sample_rate,
        })
    }
}

fn check_input(room: &Room, speakers: &[Speaker], listener: &Listener) -> Result<()> {
    if speakers.is_empty() {
        return Err(Error::DegenerateInput("no speakers".into()));
    }
    let dims = [room.width, room.length, room.height];
    if dims.iter().any(|d| !(d.is_finite() && *d > 0.0)) {
        return Err(Error::DegenerateInput(format!(
            "room dimensions must be positive, got {} x {} x {}",
            room.width, room.length, room.height
        )));
    }
    if !listener.position.is_finite() {
        return Err(Error::DegenerateInput("listener position is not finite".into()));
    }
    Ok(())
}

/// Run the full pipeline once with `config`.
pub fn run_simulation<'a>(
    room: &'a Room,
    speakers: &'a [Speaker],
    listener: &Listener,
    config: SimulationConfig,
) -> Result<SimulationResult<'a>> {
    Simulator::new(config)?.run(room, speakers, listener)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::AcousticMaterial;
    use glam::DVec3;
    use std::sync::Arc;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
        let warm = SimulationConfig::from_temperature(20.0);
        assert!((warm.speed_of_sound - 343.2).abs() < 0.5);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let bad_fft = SimulationConfig {
            fft_size: 1000,
            ..SimulationConfig::default()
        };
        assert!(matches!(bad_fft.validate(), Err(Error::NotPowerOfTwo(1000))));

        let bad_rate = SimulationConfig {
            sample_rate: 0.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(bad_rate.validate(), Err(Error::InvalidConfig(_))));

        let bad_c = SimulationConfig {
            speed_of_sound: f64::NAN,
            ..SimulationConfig::default()
        };
        assert!(matches!(Simulator::new(bad_c), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_no_speakers_is_degenerate() {
        let room = Room::shoebox(6.0, 4.0, 2.5, Arc::new(AcousticMaterial::default()));
        let sim = Simulator::default();
        let result = sim.run(&room, &[], &Listener::new(DVec3::Y));
        assert!(matches!(result, Err(Error::DegenerateInput(_))));
        assert_eq!(sim.last_overall_db(), None);
    }

    #[test]
    fn test_flat_room_is_degenerate() {
        let room = Room::new(6.0, 0.0, 2.5);
        let speakers = [Speaker::new("C", DVec3::ZERO)];
        let result = Simulator::default().run(&room, &speakers, &Listener::new(DVec3::Y));
        assert!(matches!(result, Err(Error::DegenerateInput(_))));
    }

    #[test]
    fn test_run_records_last_level() {
        let room = Room::shoebox(6.0, 4.0, 2.5, Arc::new(AcousticMaterial::default()));
        let speakers = [Speaker::new("C", DVec3::new(0.0, 1.0, 1.5))];
        let sim = Simulator::new(SimulationConfig {
            fft_size: 256,
            ..SimulationConfig::default()
        })
        .unwrap();
        let result = sim.run(&room, &speakers, &Listener::new(DVec3::new(0.0, 1.0, -1.0))).unwrap();
        assert_eq!(result.impulse_response.len(), 256);
        assert_eq!(result.transfer_function.len(), 256);
        assert!(result.convolved_signal.is_none());
        assert_eq!(sim.last_overall_db(), Some(result.overall_db()));
        assert_eq!(result.speaker_db("C"), Some(result.overall_db()));
    }
}
