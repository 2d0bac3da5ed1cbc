use std::collections::HashMap;

use tracing::info;

use reelspin_core::AudioTrack;

/// Whatever actually produces sound. Volumes are already resolved.
pub trait AudioBackend {
    fn play(&mut self, track: &AudioTrack, volume: f32, looped: bool);
    fn set_volume(&mut self, key: &str, volume: f32);
    /// Stops the clip and rewinds it.
    fn pause(&mut self, key: &str);
}

/// Backend for terminals: cues are logged, not played.
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, track: &AudioTrack, volume: f32, looped: bool) {
        info!(target: "audio", key = %track.key, url = %track.url, volume, looped, "play");
    }

    fn set_volume(&mut self, key: &str, volume: f32) {
        info!(target: "audio", key, volume, "volume");
    }

    fn pause(&mut self, key: &str) {
        info!(target: "audio", key, "pause");
    }
}

pub struct AudioMixer<B> {
    tracks: HashMap<String, AudioTrack>,
    enabled: bool,
    backend: B,
}

impl<B: AudioBackend> AudioMixer<B> {
    /// Starts muted, like a page that has not had user interaction yet.
    pub fn new(tracks: Vec<AudioTrack>, backend: B) -> Self {
        Self {
            tracks: tracks.into_iter().map(|t| (t.key.clone(), t)).collect(),
            enabled: false,
            backend,
        }
    }

    pub fn enable(&mut self, enable: bool) {
        self.enabled = enable;
        for track in self.tracks.values() {
            let volume = if enable { track.volume } else { 0.0 };
            self.backend.set_volume(&track.key, volume);
        }
    }

    /// Unknown keys are ignored.
    pub fn play(&mut self, key: &str, looped: bool) {
        if let Some(track) = self.tracks.get(key) {
            let volume = if self.enabled { track.volume } else { 0.0 };
            self.backend.play(track, volume, looped);
        }
    }

    pub fn pause(&mut self, key: &str) {
        if self.tracks.contains_key(key) {
            self.backend.pause(key);
        }
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelspin_core::reference_audio_tracks;

    #[derive(Default)]
    struct Recorder {
        events: Vec<(String, f32, bool)>,
        paused: Vec<String>,
    }

    impl AudioBackend for Recorder {
        fn play(&mut self, track: &AudioTrack, volume: f32, looped: bool) {
            self.events.push((track.key.clone(), volume, looped));
        }

        fn set_volume(&mut self, _key: &str, _volume: f32) {}

        fn pause(&mut self, key: &str) {
            self.paused.push(key.to_string());
        }
    }

    #[test]
    fn muted_until_enabled() {
        let mut mixer = AudioMixer::new(reference_audio_tracks("/static"), Recorder::default());
        mixer.play("spin", false);
        mixer.enable(true);
        mixer.play("bigWin", false);
        mixer.play("bgMusic", true);
        mixer.play("missing", false);
        assert_eq!(
            mixer.backend().events,
            vec![
                ("spin".to_string(), 0.0, false),
                ("bigWin".to_string(), 0.7, false),
                ("bgMusic".to_string(), 0.2, true),
            ]
        );
    }

    #[test]
    fn pause_only_known_tracks() {
        let mut mixer = AudioMixer::new(reference_audio_tracks("/static"), Recorder::default());
        mixer.pause("spinning");
        mixer.pause("nope");
        assert_eq!(mixer.backend().paused, vec!["spinning".to_string()]);
    }
}
