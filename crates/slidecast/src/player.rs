//! Audio playback engine and position feed.
//!
//! Decoding and output go through rodio; the rest of the application only
//! sees the control surface (`seek_to`/`seek_by`/`set_paused`/`duration`)
//! and the [`FeedEvent`] channel. A producer thread samples the sink
//! position on a fixed interval and pushes events; the UI drains them in
//! delivery order.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryIter, channel};
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::source::SeekError;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::{Error, Result};

const FEED_INTERVAL: Duration = Duration::from_millis(100);

/// One notification from the position feed. A `None` payload means "no
/// definite value yet" (nothing queued, or the container reports no
/// duration) and must not drive a slide resolution or a bar update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedEvent {
    Position(Option<f64>),
    Progress(Option<f32>),
}

pub struct AudioPlayer {
    // Keeps the output device open for the lifetime of the player.
    _stream: OutputStream,
    sink: Arc<Sink>,
    duration: Option<Duration>,
    seekable: AtomicBool,
    events: Receiver<FeedEvent>,
    feed_running: Arc<AtomicBool>,
    feed_thread: Option<JoinHandle<()>>,
}

impl AudioPlayer {
    /// Open `path`, queue it on a new sink and start the position feed.
    /// Playback starts paused; call `set_paused(false)` once the window is
    /// up.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            Error::resource(format!("Cannot open audio file {}: {e}", path.display()))
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| {
            Error::resource(format!("Cannot decode audio file {}: {e}", path.display()))
        })?;
        let duration = source.total_duration();

        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| Error::resource(format!("Cannot open audio output: {e}")))?;
        let sink = Sink::try_new(&handle)
            .map_err(|e| Error::resource(format!("Cannot create audio sink: {e}")))?;
        sink.pause();
        sink.append(source);
        let sink = Arc::new(sink);

        let (tx, rx) = channel();
        let feed_running = Arc::new(AtomicBool::new(true));
        let feed_thread = {
            let sink = Arc::clone(&sink);
            let running = Arc::clone(&feed_running);
            std::thread::spawn(move || run_feed_loop(&sink, duration, &tx, &running))
        };

        Ok(Self {
            _stream: stream,
            sink,
            duration,
            seekable: AtomicBool::new(true),
            events: rx,
            feed_running,
            feed_thread: Some(feed_thread),
        })
    }

    /// Drain whatever the feed has delivered so far, oldest first.
    pub fn try_events(&self) -> TryIter<'_, FeedEvent> {
        self.events.try_iter()
    }

    pub fn set_paused(&self, paused: bool) {
        if paused {
            self.sink.pause();
        } else {
            self.sink.play();
        }
    }

    pub fn duration_secs(&self) -> Option<f64> {
        self.duration.map(|d| d.as_secs_f64())
    }

    pub fn position_secs(&self) -> f64 {
        self.sink.get_pos().as_secs_f64()
    }

    /// Whether the backend is expected to honor seeks. Latches to false the
    /// first time the source reports seeking unsupported.
    pub fn is_seekable(&self) -> bool {
        self.seekable.load(Ordering::Relaxed)
    }

    /// Absolute seek, clamped to the track. Returns false when the backend
    /// refused.
    pub fn seek_to(&self, secs: f64) -> bool {
        let mut target = secs.max(0.0);
        if let Some(duration) = self.duration_secs() {
            target = target.min(duration);
        }
        match self.sink.try_seek(Duration::from_secs_f64(target)) {
            Ok(()) => true,
            Err(err) => {
                if matches!(err, SeekError::NotSupported { .. }) {
                    self.seekable.store(false, Ordering::Relaxed);
                }
                false
            }
        }
    }

    /// Relative seek from the current sink position.
    pub fn seek_by(&self, delta_secs: f64) -> bool {
        self.seek_to(self.position_secs() + delta_secs)
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.feed_running.store(false, Ordering::Relaxed);
        if let Some(thread) = self.feed_thread.take() {
            let _ = thread.join();
        }
        self.sink.stop();
    }
}

fn run_feed_loop(
    sink: &Sink,
    duration: Option<Duration>,
    tx: &Sender<FeedEvent>,
    running: &AtomicBool,
) {
    while running.load(Ordering::Relaxed) {
        let (position, progress) = if sink.empty() {
            (None, None)
        } else {
            let pos = sink.get_pos();
            let fraction = duration
                .filter(|d| !d.is_zero())
                .map(|d| (pos.as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0) as f32);
            (Some(pos.as_secs_f64()), fraction)
        };
        if tx.send(FeedEvent::Position(position)).is_err() {
            break;
        }
        if tx.send(FeedEvent::Progress(progress)).is_err() {
            break;
        }
        std::thread::sleep(FEED_INTERVAL);
    }
}
