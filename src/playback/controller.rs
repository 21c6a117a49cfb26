use std::fmt;

use crate::domain::AlignedRow;
use crate::playback::audio::{AudioOutput, OutputEvent, PlaybackToken};

/// Where playback is. Pausing is not a state: stopping forgets the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    /// One verse, no auto-advance.
    PlayingSingle(usize),
    /// Continuous chapter playback, currently at this row.
    PlayingSequence(usize),
}

impl PlaybackState {
    pub fn index(&self) -> Option<usize> {
        match *self {
            PlaybackState::Idle => None,
            PlaybackState::PlayingSingle(i) | PlaybackState::PlayingSequence(i) => Some(i),
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, PlaybackState::PlayingSequence(_))
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "stopped"),
            PlaybackState::PlayingSingle(i) => write!(f, "playing verse {}", i + 1),
            PlaybackState::PlayingSequence(i) => write!(f, "playing chapter from verse {}", i + 1),
        }
    }
}

/// Inputs to the playback state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    PlayOne(usize),
    PlayAll,
    AudioEnded(PlaybackToken),
    PlaybackFailed(PlaybackToken, String),
    /// A different chapter was selected or the rows were replaced.
    ChapterChanged,
    /// Previous/next chapter navigation.
    Navigate,
}

impl From<OutputEvent> for PlaybackEvent {
    fn from(event: OutputEvent) -> Self {
        match event {
            OutputEvent::Ended(token) => PlaybackEvent::AudioEnded(token),
            OutputEvent::Failed(token, message) => PlaybackEvent::PlaybackFailed(token, message),
        }
    }
}

#[derive(Debug, Clone)]
struct Loaded {
    token: PlaybackToken,
    url: String,
}

/// Sole owner of the audio output. Every state change goes through
/// [`handle`](Self::handle).
pub struct PlaybackController<O: AudioOutput> {
    output: O,
    state: PlaybackState,
    loaded: Option<Loaded>,
    last_token: u64,
}

impl<O: AudioOutput> PlaybackController<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            state: PlaybackState::Idle,
            loaded: None,
            last_token: 0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state.index()
    }

    pub fn loaded_url(&self) -> Option<&str> {
        self.loaded.as_ref().map(|l| l.url.as_str())
    }

    pub fn loaded_token(&self) -> Option<PlaybackToken> {
        self.loaded.as_ref().map(|l| l.token)
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Apply one event against the current rows and return the new state.
    pub fn handle(&mut self, event: PlaybackEvent, rows: &[AlignedRow]) -> PlaybackState {
        let before = self.state;
        match event {
            PlaybackEvent::PlayOne(index) => self.play_one(index, rows),
            PlaybackEvent::PlayAll => self.play_all(rows),
            PlaybackEvent::AudioEnded(token) => {
                if self.is_current(token) {
                    self.advance(rows);
                } else {
                    tracing::debug!("Ignoring end of abandoned audio {:?}", token);
                }
            }
            PlaybackEvent::PlaybackFailed(token, message) => {
                if self.is_current(token) {
                    tracing::warn!("Playback failed: {}", message);
                    self.stop();
                }
            }
            PlaybackEvent::ChapterChanged | PlaybackEvent::Navigate => self.stop(),
        }
        if self.state != before {
            tracing::debug!("Playback {:?} -> {:?}", before, self.state);
        }
        self.state
    }

    /// Feed every pending output event through [`handle`](Self::handle).
    /// Returns true if the state changed.
    pub fn poll(&mut self, rows: &[AlignedRow]) -> bool {
        let before = self.state;
        while let Some(event) = self.output.poll_event() {
            self.handle(event.into(), rows);
        }
        self.state != before
    }

    fn play_one(&mut self, index: usize, rows: &[AlignedRow]) {
        let Some(url) = audio_url(rows, index) else {
            tracing::debug!("Row {} has no audio", index);
            return;
        };
        if self.state.index() == Some(index) && self.loaded_url() == Some(url) {
            self.stop();
            return;
        }
        let url = url.to_string();
        self.load(&url, PlaybackState::PlayingSingle(index));
    }

    fn play_all(&mut self, rows: &[AlignedRow]) {
        if self.state.is_sequence() {
            self.stop();
            return;
        }
        match audio_url(rows, 0) {
            Some(url) => {
                let url = url.to_string();
                self.load(&url, PlaybackState::PlayingSequence(0));
            }
            None => tracing::debug!("First row has no audio, nothing to play"),
        }
    }

    fn advance(&mut self, rows: &[AlignedRow]) {
        let PlaybackState::PlayingSequence(index) = self.state else {
            // A single verse finished on its own.
            self.stop();
            return;
        };
        let next = index + 1;
        match audio_url(rows, next) {
            Some(url) => {
                let url = url.to_string();
                self.load(&url, PlaybackState::PlayingSequence(next));
            }
            None => {
                if next < rows.len() {
                    tracing::info!("Row {} has no audio, stopping sequence", next);
                }
                self.stop();
            }
        }
    }

    fn load(&mut self, url: &str, target: PlaybackState) {
        self.last_token += 1;
        let token = PlaybackToken(self.last_token);
        match self.output.load(url, token) {
            Ok(()) => {
                self.loaded = Some(Loaded {
                    token,
                    url: url.to_string(),
                });
                self.state = target;
            }
            Err(e) => {
                tracing::warn!("Could not start audio: {}", e);
                self.stop();
            }
        }
    }

    fn stop(&mut self) {
        self.output.stop();
        self.loaded = None;
        self.state = PlaybackState::Idle;
    }

    fn is_current(&self, token: PlaybackToken) -> bool {
        self.loaded_token() == Some(token)
    }
}

fn audio_url(rows: &[AlignedRow], index: usize) -> Option<&str> {
    rows.get(index)
        .and_then(|row| row.audio_url.as_deref())
        .filter(|url| !url.is_empty())
}
