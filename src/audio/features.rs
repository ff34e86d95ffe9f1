/// Per-frame scalar summaries of the capture snapshot, plus borrowed access
/// to the raw sequences they were computed from.
///
/// Band splits are fixed proportions of the bin sequence: bass 0-10%,
/// mid 10-50%, treble 50-100%, boundaries floored. All values 0.0-1.0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioFeatures<'a> {
    pub average: f32,
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
    bins: &'a [u8],
    waveform: &'a [u8],
}

impl<'a> AudioFeatures<'a> {
    /// Pure function of the current snapshot contents; recomputes every band
    /// on every call. Empty bins yield all-zero features.
    pub fn extract(bins: &'a [u8], waveform: &'a [u8]) -> Self {
        let n = bins.len();
        let bass_end = n / 10;
        let mid_end = n / 2;
        Self {
            average: mean(bins),
            bass: mean(&bins[..bass_end]),
            mid: mean(&bins[bass_end..mid_end]),
            treble: mean(&bins[mid_end..]),
            bins,
            waveform,
        }
    }

    pub fn silent() -> AudioFeatures<'static> {
        AudioFeatures::extract(&[], &[])
    }

    /// Raw frequency-magnitude snapshot, one byte per bin, 0-255.
    pub fn frequency_bins(&self) -> &[u8] {
        self.bins
    }

    /// Raw waveform snapshot, one byte per sample, 128 = silence.
    pub fn waveform(&self) -> &[u8] {
        self.waveform
    }
}

fn mean(values: &[u8]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u32 = values.iter().map(|&v| v as u32).sum();
    sum as f32 / values.len() as f32 / 255.0
}
