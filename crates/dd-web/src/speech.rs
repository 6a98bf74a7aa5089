//! Speech synthesis
//!
//! Utterances are queued in order. There is no audio backend, so an
//! utterance stays pending until the host takes it with `take_next`.

use std::collections::VecDeque;

/// A request to speak some text
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// 0.0 to 1.0
    pub volume: f32,
    /// 0.1 to 10.0
    pub rate: f32,
    /// 0.0 to 2.0
    pub pitch: f32,
    pub lang: Option<String>,
}

impl Utterance {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            volume: 1.0,
            rate: 1.0,
            pitch: 1.0,
            lang: None,
        }
    }

    fn clamped(mut self) -> Self {
        self.volume = self.volume.clamp(0.0, 1.0);
        self.rate = self.rate.clamp(0.1, 10.0);
        self.pitch = self.pitch.clamp(0.0, 2.0);
        self
    }
}

/// Speech synthesis queue
#[derive(Debug, Default)]
pub struct SpeechSynthesis {
    queue: VecDeque<Utterance>,
    spoken: usize,
}

impl SpeechSynthesis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an utterance; out-of-range parameters are clamped
    pub fn speak(&mut self, utterance: Utterance) {
        tracing::debug!(chars = utterance.text.chars().count(), "queued utterance");
        self.queue.push_back(utterance.clamped());
    }

    /// Drop everything queued
    pub fn cancel(&mut self) {
        self.queue.clear();
    }

    /// Whether anything is waiting to be spoken
    pub fn pending(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn queue(&self) -> impl Iterator<Item = &Utterance> {
        self.queue.iter()
    }

    /// Take the next utterance to speak
    pub fn take_next(&mut self) -> Option<Utterance> {
        let utterance = self.queue.pop_front()?;
        self.spoken += 1;
        Some(utterance)
    }

    /// Utterances handed out so far
    pub fn spoken(&self) -> usize {
        self.spoken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_order() {
        let mut speech = SpeechSynthesis::new();
        speech.speak(Utterance::new("one"));
        speech.speak(Utterance::new("two"));
        assert!(speech.pending());
        assert_eq!(speech.take_next().unwrap().text, "one");
        assert_eq!(speech.take_next().unwrap().text, "two");
        assert!(!speech.pending());
        assert_eq!(speech.spoken(), 2);
    }

    #[test]
    fn test_cancel() {
        let mut speech = SpeechSynthesis::new();
        speech.speak(Utterance::new("one"));
        speech.cancel();
        assert!(!speech.pending());
        assert_eq!(speech.take_next(), None);
    }

    #[test]
    fn test_parameters_clamped() {
        let mut speech = SpeechSynthesis::new();
        let mut loud = Utterance::new("x");
        loud.volume = 3.0;
        loud.rate = 0.0;
        speech.speak(loud);
        let queued = speech.queue().next().unwrap();
        assert_eq!(queued.volume, 1.0);
        assert_eq!(queued.rate, 0.1);
        assert_eq!(queued.pitch, 1.0);
    }
}
