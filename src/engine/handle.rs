use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use super::thread::{EngineCmd, spawn_engine_thread};
use super::types::{AudioEngine, EngineError, EngineEvent, StreamId};

/// Handle to the `rodio` playback thread.
///
/// Implements [`AudioEngine`] by forwarding commands over a channel; events
/// come back on the receiver returned by [`RodioEngine::start`]. Dropping
/// the handle asks the thread to quit and waits for it.
pub struct RodioEngine {
    tx: Sender<EngineCmd>,
    next_id: u64,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioEngine {
    /// Spawn the playback thread. The caller pumps the returned receiver
    /// into the playback controller.
    pub fn start() -> (Self, Receiver<EngineEvent>) {
        let (tx, rx) = mpsc::channel::<EngineCmd>();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();
        let join = spawn_engine_thread(rx, event_tx);

        (
            Self {
                tx,
                next_id: 0,
                join: Mutex::new(Some(join)),
            },
            event_rx,
        )
    }

    fn send(&self, cmd: EngineCmd) {
        let _ = self.tx.send(cmd);
    }
}

impl AudioEngine for RodioEngine {
    fn load(&mut self, url: &str) -> Result<StreamId, EngineError> {
        self.next_id += 1;
        let stream = StreamId(self.next_id);
        self.tx
            .send(EngineCmd::Load {
                stream,
                url: url.to_string(),
            })
            .map_err(|_| EngineError::Unavailable("playback thread is gone".to_string()))?;
        Ok(stream)
    }

    fn play(&mut self) {
        self.send(EngineCmd::Play);
    }

    fn pause(&mut self) {
        self.send(EngineCmd::Pause);
    }

    fn stop(&mut self) {
        self.send(EngineCmd::Stop);
    }

    fn seek_to(&mut self, seconds: f64) {
        self.send(EngineCmd::SeekTo(seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(EngineCmd::SetVolume(volume));
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        let _ = self.tx.send(EngineCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
