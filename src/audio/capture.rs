use thiserror::Error;

/// Faults surfaced once at session start. Nothing in the per-frame path
/// produces errors; an inactive source simply yields fade-only frames.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("audio capture device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("microphone permission denied")]
    PermissionDenied,
}

/// Boundary contract for the live input device.
///
/// The platform refreshes its internal buffers asynchronously; `refresh`
/// takes a synchronous snapshot, and the accessor slices stay stable until
/// the next `refresh`. Effects only ever see a completed snapshot.
pub trait CaptureSource {
    /// Acquire the device, once at session start. Failure is the only error
    /// this system surfaces; afterwards the source just reports inactive
    /// and the engine degrades to fade-only frames.
    fn open(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    fn is_active(&self) -> bool;

    /// Snapshot the most recent completed capture data.
    fn refresh(&mut self);

    /// Frequency-magnitude snapshot, one byte per bin, 0-255.
    fn frequency_bins(&self) -> &[u8];

    /// Waveform snapshot, one byte per sample, 128 = silence.
    fn waveform(&self) -> &[u8];
}

/// Deterministic stand-in for a live device: a couple of detuned partials
/// plus a periodic bass pulse, synthesized from elapsed time alone. Used by
/// the demo binary and tests; real capture backends live outside the core.
pub struct SyntheticCapture {
    bins: Vec<u8>,
    wave: Vec<u8>,
    time: f32,
    active: bool,
}

impl SyntheticCapture {
    pub fn new(bin_count: usize, wave_count: usize) -> Self {
        Self {
            bins: vec![0; bin_count],
            wave: vec![128; wave_count],
            time: 0.0,
            active: true,
        }
    }

    /// Source with a fixed snapshot that `refresh` leaves untouched.
    pub fn fixed(bins: Vec<u8>, wave: Vec<u8>) -> Self {
        Self {
            bins,
            wave,
            time: f32::NAN,
            active: true,
        }
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Advance synthesized time by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.time += dt;
    }
}

impl CaptureSource for SyntheticCapture {
    fn is_active(&self) -> bool {
        self.active
    }

    fn refresh(&mut self) {
        if self.time.is_nan() {
            return;
        }
        let t = self.time;
        // Bass pulse every 0.5s with exponential falloff
        let beat = (-(t % 0.5) * 8.0).exp();
        let n = self.bins.len().max(1) as f32;
        for (i, bin) in self.bins.iter_mut().enumerate() {
            let x = i as f32 / n;
            let rolloff = (1.0 - x).powi(2);
            let partial_a = ((x * 37.0 + t * 2.1).sin() * 0.5 + 0.5) * 0.35;
            let partial_b = ((x * 11.0 - t * 3.3).sin() * 0.5 + 0.5) * 0.25;
            let bass = if x < 0.1 { beat } else { 0.0 };
            let v = (rolloff * (partial_a + partial_b) + bass).clamp(0.0, 1.0);
            *bin = (v * 255.0) as u8;
        }
        let m = self.wave.len().max(1) as f32;
        for (i, s) in self.wave.iter_mut().enumerate() {
            let x = i as f32 / m;
            let v = (x * 9.0 * std::f32::consts::TAU + t * 5.0).sin() * (0.3 + beat * 0.5);
            *s = (128.0 + v * 127.0).clamp(0.0, 255.0) as u8;
        }
    }

    fn frequency_bins(&self) -> &[u8] {
        &self.bins
    }

    fn waveform(&self) -> &[u8] {
        &self.wave
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesis_is_deterministic() {
        let mut a = SyntheticCapture::new(128, 256);
        let mut b = SyntheticCapture::new(128, 256);
        for _ in 0..10 {
            a.advance(1.0 / 60.0);
            b.advance(1.0 / 60.0);
            a.refresh();
            b.refresh();
        }
        assert_eq!(a.frequency_bins(), b.frequency_bins());
        assert_eq!(a.waveform(), b.waveform());
    }

    #[test]
    fn fixed_snapshot_survives_refresh() {
        let mut c = SyntheticCapture::fixed(vec![9; 16], vec![1; 8]);
        c.refresh();
        assert_eq!(c.frequency_bins(), &[9; 16]);
        assert_eq!(c.waveform(), &[1; 8]);
    }

    #[test]
    fn open_failure_reads_like_a_session_error() {
        struct Denied;
        impl CaptureSource for Denied {
            fn open(&mut self) -> Result<(), CaptureError> {
                Err(CaptureError::PermissionDenied)
            }
            fn is_active(&self) -> bool {
                false
            }
            fn refresh(&mut self) {}
            fn frequency_bins(&self) -> &[u8] {
                &[]
            }
            fn waveform(&self) -> &[u8] {
                &[]
            }
        }

        let err = Denied.open().unwrap_err();
        assert_eq!(err.to_string(), "microphone permission denied");
        let err = CaptureError::DeviceUnavailable("no default input".into());
        assert!(err.to_string().contains("no default input"));
    }

    #[test]
    fn inactive_flag_round_trips() {
        let mut c = SyntheticCapture::new(4, 4);
        assert!(c.is_active());
        c.set_active(false);
        assert!(!c.is_active());
    }
}
