use std::collections::VecDeque;
use std::io::Cursor;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app::{MushafError, Result};

/// Stamped on every load so events from an abandoned resource can be told
/// apart from events for the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackToken(pub u64);

/// Something the output reports back about a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// The resource played to its natural end.
    Ended(PlaybackToken),
    /// The resource could not be fetched, decoded or started.
    Failed(PlaybackToken, String),
}

/// The single audio resource. Loading replaces whatever was loaded before.
pub trait AudioOutput {
    /// Start fetching and playing `url`. An error means playback could not
    /// even be attempted.
    fn load(&mut self, url: &str, token: PlaybackToken) -> Result<()>;

    /// Release the current resource, if any. Pending events for it are dropped.
    fn stop(&mut self);

    /// Next event for the current resource, if one is ready.
    fn poll_event(&mut self) -> Option<OutputEvent>;
}

impl<T: AudioOutput + ?Sized> AudioOutput for Box<T> {
    fn load(&mut self, url: &str, token: PlaybackToken) -> Result<()> {
        (**self).load(url, token)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn poll_event(&mut self) -> Option<OutputEvent> {
        (**self).poll_event()
    }
}

/// Used when no audio device could be opened. Every load is refused.
#[derive(Debug, Default)]
pub struct NullOutput;

impl AudioOutput for NullOutput {
    fn load(&mut self, _url: &str, _token: PlaybackToken) -> Result<()> {
        Err(MushafError::PlaybackStart("no audio output device".into()))
    }

    fn stop(&mut self) {}

    fn poll_event(&mut self) -> Option<OutputEvent> {
        None
    }
}

struct Download {
    token: PlaybackToken,
    result: std::result::Result<Vec<u8>, String>,
}

/// Streams verse recitations to the default output device.
///
/// Audio is downloaded whole on the runtime, then decoded into a fresh sink
/// on the next poll. Must be driven from inside a tokio runtime.
pub struct RodioOutput {
    stream: OutputStream,
    sink: Option<Sink>,
    client: reqwest::Client,
    current: Option<PlaybackToken>,
    download: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<Download>,
    rx: mpsc::UnboundedReceiver<Download>,
    pending: VecDeque<OutputEvent>,
}

impl RodioOutput {
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut stream = OutputStreamBuilder::from_default_device()
            .and_then(|builder| builder.open_stream_or_fallback())
            .map_err(|e| MushafError::PlaybackStart(e.to_string()))?;
        stream.log_on_drop(false);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mushaf/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            stream,
            sink: None,
            client,
            current: None,
            download: None,
            tx,
            rx,
            pending: VecDeque::new(),
        })
    }

    fn start(&mut self, token: PlaybackToken, bytes: Vec<u8>) {
        match Decoder::new(Cursor::new(bytes)) {
            Ok(source) => {
                let sink = Sink::connect_new(self.stream.mixer());
                sink.append(source);
                self.sink = Some(sink);
            }
            Err(e) => {
                self.current = None;
                self.pending.push_back(OutputEvent::Failed(token, e.to_string()));
            }
        }
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, url: &str, token: PlaybackToken) -> Result<()> {
        self.stop();
        let url = url::Url::parse(url)?;

        let client = self.client.clone();
        let tx = self.tx.clone();
        self.current = Some(token);
        self.download = Some(tokio::spawn(async move {
            let result = async {
                let response = client.get(url).send().await?.error_for_status()?;
                Ok::<_, reqwest::Error>(response.bytes().await?.to_vec())
            }
            .await
            .map_err(|e| e.to_string());
            let _ = tx.send(Download { token, result });
        }));
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(download) = self.download.take() {
            download.abort();
        }
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.current = None;
        self.pending.clear();
    }

    fn poll_event(&mut self) -> Option<OutputEvent> {
        while let Ok(download) = self.rx.try_recv() {
            if Some(download.token) != self.current {
                continue;
            }
            self.download = None;
            match download.result {
                Ok(bytes) => self.start(download.token, bytes),
                Err(message) => {
                    self.current = None;
                    self.pending
                        .push_back(OutputEvent::Failed(download.token, message));
                }
            }
        }

        let finished = self.sink.as_ref().is_some_and(Sink::empty);
        if finished {
            self.sink = None;
            if let Some(token) = self.current.take() {
                self.pending.push_back(OutputEvent::Ended(token));
            }
        }

        self.pending.pop_front()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records every call; events are queued by the test.
    #[derive(Debug, Default)]
    pub(crate) struct FakeOutput {
        pub loads: Vec<(String, PlaybackToken)>,
        pub stops: usize,
        pub refuse_loads: bool,
        pub queued: VecDeque<OutputEvent>,
        pub active: Option<PlaybackToken>,
    }

    impl FakeOutput {
        pub(crate) fn last_url(&self) -> Option<&str> {
            self.loads.last().map(|(url, _)| url.as_str())
        }

        /// Report that the most recent load finished playing.
        pub(crate) fn finish(&mut self) {
            if let Some((_, token)) = self.loads.last() {
                self.queued.push_back(OutputEvent::Ended(*token));
            }
        }
    }

    impl AudioOutput for FakeOutput {
        fn load(&mut self, url: &str, token: PlaybackToken) -> Result<()> {
            if self.refuse_loads {
                return Err(MushafError::PlaybackStart("refused".into()));
            }
            self.loads.push((url.to_string(), token));
            self.active = Some(token);
            Ok(())
        }

        fn stop(&mut self) {
            self.stops += 1;
            self.active = None;
        }

        fn poll_event(&mut self) -> Option<OutputEvent> {
            self.queued.pop_front()
        }
    }

    #[test]
    fn test_null_output_refuses_loads() {
        let mut output = NullOutput;
        assert!(matches!(
            output.load("https://cdn.example/1.mp3", PlaybackToken(1)),
            Err(MushafError::PlaybackStart(_))
        ));
        assert_eq!(output.poll_event(), None);
    }

    #[test]
    fn test_boxed_output_delegates() {
        let mut output: Box<dyn AudioOutput> = Box::new(FakeOutput::default());
        output.load("https://cdn.example/1.mp3", PlaybackToken(7)).unwrap();
        output.stop();
        assert_eq!(output.poll_event(), None);
    }
}
