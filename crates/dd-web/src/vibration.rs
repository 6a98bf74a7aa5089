//! Vibration API
//!
//! Navigator.vibrate() for haptic feedback.

/// Longest accepted pattern
pub const MAX_PATTERN_LEN: usize = 10;

/// Longest single pulse or pause, in ms
pub const MAX_PULSE_MS: u32 = 10_000;

/// Alternating vibrate/pause durations in ms
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VibrationPattern(pub Vec<u32>);

impl VibrationPattern {
    /// Truncate to `MAX_PATTERN_LEN` entries, each clamped to `MAX_PULSE_MS`
    pub fn normalized(self) -> Self {
        Self(
            self.0
                .into_iter()
                .take(MAX_PATTERN_LEN)
                .map(|ms| ms.min(MAX_PULSE_MS))
                .collect(),
        )
    }

    /// Empty or all-zero patterns stop vibration
    pub fn is_cancel(&self) -> bool {
        self.0.iter().all(|&ms| ms == 0)
    }

    /// Total duration
    pub fn total_duration(&self) -> u64 {
        self.0.iter().map(|&ms| u64::from(ms)).sum()
    }
}

impl From<u32> for VibrationPattern {
    fn from(ms: u32) -> Self {
        Self(vec![ms])
    }
}

impl From<Vec<u32>> for VibrationPattern {
    fn from(pattern: Vec<u32>) -> Self {
        Self(pattern)
    }
}

impl From<&[u32]> for VibrationPattern {
    fn from(pattern: &[u32]) -> Self {
        Self(pattern.to_vec())
    }
}

/// Vibration hardware
#[derive(Debug, Default)]
pub struct Vibrator {
    supported: bool,
    received: Vec<VibrationPattern>,
}

impl Vibrator {
    pub fn new(supported: bool) -> Self {
        Self {
            supported,
            received: Vec::new(),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Pulse the device. Returns `false` when there is no hardware.
    pub fn vibrate(&mut self, pattern: impl Into<VibrationPattern>) -> bool {
        if !self.supported {
            tracing::warn!("vibrate ignored: no vibration hardware");
            return false;
        }
        let pattern = pattern.into().normalized();
        tracing::debug!(total_ms = pattern.total_duration(), "vibrating");
        self.received.push(pattern);
        true
    }

    /// Patterns accepted so far, normalized
    pub fn received(&self) -> &[VibrationPattern] {
        &self.received
    }

    /// Currently playing pattern, if the last one did not cancel
    pub fn current(&self) -> Option<&VibrationPattern> {
        self.received.last().filter(|p| !p.is_cancel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vibration() {
        let mut vibrator = Vibrator::new(true);
        assert!(vibrator.vibrate(200u32));
        assert_eq!(vibrator.current(), Some(&VibrationPattern(vec![200])));

        assert!(vibrator.vibrate(0u32));
        assert_eq!(vibrator.current(), None);
        assert_eq!(vibrator.received().len(), 2);
    }

    #[test]
    fn test_vibration_unsupported() {
        let mut vibrator = Vibrator::new(false);
        assert!(!vibrator.vibrate(200u32));
        assert!(vibrator.received().is_empty());
    }

    #[test]
    fn test_pattern_normalized() {
        let mut vibrator = Vibrator::new(true);
        let long: Vec<u32> = (0..15).map(|i| if i == 0 { 60_000 } else { 100 }).collect();
        vibrator.vibrate(long);

        let pattern = &vibrator.received()[0];
        assert_eq!(pattern.0.len(), MAX_PATTERN_LEN);
        assert_eq!(pattern.0[0], MAX_PULSE_MS);
        assert_eq!(pattern.total_duration(), 10_000 + 9 * 100);
    }
}
