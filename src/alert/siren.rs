//! Siren effect model.
//!
//! Each trigger starts an independent voice: a square wave starting at
//! 900Hz that alternates between 1200Hz and 700Hz every 240ms. A voice is
//! released exactly [`SIREN_DURATION`] after its own start, regardless of
//! any later triggers.

use std::time::{Duration, Instant};

/// How long one voice holds its audio resource.
pub const SIREN_DURATION: Duration = Duration::from_secs(3);
/// Interval between frequency flips.
pub const SWEEP_INTERVAL: Duration = Duration::from_millis(240);
/// Frequency before the first flip.
pub const BASE_FREQUENCY: f32 = 900.0;
pub const HIGH_FREQUENCY: f32 = 1200.0;
pub const LOW_FREQUENCY: f32 = 700.0;
/// Output gain of a voice.
pub const GAIN: f32 = 0.3;

/// Active siren voices.
#[derive(Debug, Clone, Default)]
pub struct Siren {
    voices: Vec<Instant>,
    triggered: u64,
}

impl Siren {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new voice at `now`. Voices whose window ended by `now` are
    /// released first.
    pub fn trigger(&mut self, now: Instant) {
        self.release_expired(now);
        self.voices.push(now);
        self.triggered += 1;
    }

    /// Total number of triggers since creation.
    pub fn triggered(&self) -> u64 {
        self.triggered
    }

    /// Voices held, including expired ones not yet released.
    pub fn held_voices(&self) -> usize {
        self.voices.len()
    }

    /// Release every voice whose window has ended. Returns how many were
    /// released.
    pub fn release_expired(&mut self, now: Instant) -> usize {
        let before = self.voices.len();
        self.voices
            .retain(|start| now.saturating_duration_since(*start) < SIREN_DURATION);
        before - self.voices.len()
    }

    /// Number of voices still inside their window at `now`.
    pub fn active_voices(&self, now: Instant) -> usize {
        self.voices
            .iter()
            .filter(|start| now.saturating_duration_since(**start) < SIREN_DURATION)
            .count()
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.active_voices(now) > 0
    }

    /// Current frequency of the newest active voice.
    pub fn frequency(&self, now: Instant) -> Option<f32> {
        let newest = self
            .voices
            .iter()
            .filter(|start| now.saturating_duration_since(**start) < SIREN_DURATION)
            .max()?;
        Some(voice_frequency(now.saturating_duration_since(*newest)))
    }
}

/// Frequency of a voice `elapsed` after its start.
pub fn voice_frequency(elapsed: Duration) -> f32 {
    let flips = elapsed.as_millis() / SWEEP_INTERVAL.as_millis();
    match flips {
        0 => BASE_FREQUENCY,
        n if n % 2 == 1 => HIGH_FREQUENCY,
        _ => LOW_FREQUENCY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_released_after_duration() {
        let start = Instant::now();
        let mut siren = Siren::new();
        siren.trigger(start);

        assert!(siren.is_active(start + Duration::from_millis(2999)));
        assert!(!siren.is_active(start + SIREN_DURATION));
        assert_eq!(siren.release_expired(start + SIREN_DURATION), 1);
    }

    #[test]
    fn test_retrigger_does_not_extend_first_voice() {
        let start = Instant::now();
        let mut siren = Siren::new();
        siren.trigger(start);
        siren.trigger(start + Duration::from_secs(2));

        let at = start + Duration::from_millis(3500);
        assert_eq!(siren.active_voices(at), 1);
        assert_eq!(siren.release_expired(at), 1);
        assert!(!siren.is_active(start + Duration::from_secs(5)));
        assert_eq!(siren.triggered(), 2);
    }

    #[test]
    fn test_trigger_releases_expired_voices() {
        let start = Instant::now();
        let mut siren = Siren::new();
        for i in 0..10_000u64 {
            siren.trigger(start + Duration::from_millis(i * 100));
        }

        // 3s window at 100ms spacing
        assert_eq!(siren.held_voices(), 30);
        assert_eq!(siren.triggered(), 10_000);
    }

    #[test]
    fn test_sweep_alternates() {
        assert_eq!(voice_frequency(Duration::ZERO), 900.0);
        assert_eq!(voice_frequency(Duration::from_millis(239)), 900.0);
        assert_eq!(voice_frequency(Duration::from_millis(240)), 1200.0);
        assert_eq!(voice_frequency(Duration::from_millis(480)), 700.0);
        assert_eq!(voice_frequency(Duration::from_millis(720)), 1200.0);
    }

    #[test]
    fn test_frequency_none_when_silent() {
        let start = Instant::now();
        let mut siren = Siren::new();
        assert_eq!(siren.frequency(start), None);
        siren.trigger(start);
        assert_eq!(siren.frequency(start + Duration::from_millis(250)), Some(1200.0));
        assert_eq!(siren.frequency(start + SIREN_DURATION), None);
    }
}
