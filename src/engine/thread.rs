use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};

use super::sink::{create_sink_at, fetch_bytes};
use super::types::{EngineEvent, EngineEventKind, StreamId};

/// Commands sent from the engine handle to the playback thread.
#[derive(Debug)]
pub(super) enum EngineCmd {
    Load { stream: StreamId, url: String },
    Play,
    Pause,
    Stop,
    SeekTo(f64),
    SetVolume(f32),
    Quit,
}

fn emit(events: &Sender<EngineEvent>, stream: StreamId, kind: EngineEventKind) {
    let _ = events.send(EngineEvent { stream, kind });
}

pub(super) fn spawn_engine_thread(
    rx: Receiver<EngineCmd>,
    events: Sender<EngineEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        let mut stream = stream;
        stream.log_on_drop(false);

        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(30))
            .build();

        let mut current: Option<StreamId> = None;
        let mut sink: Option<Sink> = None;
        // Retained so SeekTo can re-decode without refetching.
        let mut bytes: Option<Arc<[u8]>> = None;
        let mut duration: Option<Duration> = None;

        let mut paused = true;
        let mut volume: f32 = 1.0;

        // Position = accumulated + time since last unpause.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(EngineCmd::Load { stream: id, url }) => {
                    // Release the old stream before anything else. A slow
                    // event from the old sink can then never be tagged with
                    // the new id.
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    current = Some(id);
                    bytes = None;
                    duration = None;
                    paused = true;
                    started_at = None;
                    accumulated = Duration::ZERO;

                    let fetched = match fetch_bytes(&agent, &url) {
                        Ok(b) => b,
                        Err(msg) => {
                            emit(&events, id, EngineEventKind::Errored(msg));
                            continue;
                        }
                    };

                    match create_sink_at(&stream, fetched.clone(), Duration::ZERO) {
                        Ok((new_sink, total)) => {
                            new_sink.set_volume(volume);
                            bytes = Some(fetched);
                            duration = total;
                            if let Some(total) = total {
                                emit(
                                    &events,
                                    id,
                                    EngineEventKind::DurationKnown(total.as_secs_f64()),
                                );
                            }
                            sink = Some(new_sink);
                        }
                        Err(msg) => emit(&events, id, EngineEventKind::Errored(msg)),
                    }
                }
                Ok(EngineCmd::Play) => {
                    if let (Some(s), Some(id)) = (sink.as_ref(), current) {
                        if paused {
                            s.play();
                            paused = false;
                            started_at = Some(Instant::now());
                            // First progress report doubles as the
                            // playback-start confirmation.
                            emit(
                                &events,
                                id,
                                EngineEventKind::Progress(accumulated.as_secs_f64()),
                            );
                        }
                    }
                }
                Ok(EngineCmd::Pause) => {
                    if let Some(s) = sink.as_ref() {
                        if !paused {
                            s.pause();
                            if let Some(st) = started_at.take() {
                                accumulated += st.elapsed();
                            }
                            paused = true;
                        }
                    }
                }
                Ok(EngineCmd::Stop) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    current = None;
                    bytes = None;
                    duration = None;
                    paused = true;
                    started_at = None;
                    accumulated = Duration::ZERO;
                }
                Ok(EngineCmd::SeekTo(seconds)) => {
                    // Scrubbing: rebuild the sink and skip into the retained bytes.
                    let (Some(b), Some(id)) = (bytes.clone(), current) else {
                        continue;
                    };
                    let target = Duration::from_secs_f64(seconds.max(0.0));

                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    match create_sink_at(&stream, b, target) {
                        Ok((new_sink, _)) => {
                            new_sink.set_volume(volume);
                            if paused {
                                started_at = None;
                            } else {
                                new_sink.play();
                                started_at = Some(Instant::now());
                            }
                            accumulated = target;
                            sink = Some(new_sink);
                            emit(&events, id, EngineEventKind::Progress(target.as_secs_f64()));
                        }
                        Err(msg) => emit(&events, id, EngineEventKind::Errored(msg)),
                    }
                }
                Ok(EngineCmd::SetVolume(v)) => {
                    volume = v.clamp(0.0, 1.0);
                    if let Some(s) = sink.as_ref() {
                        s.set_volume(volume);
                    }
                }
                Ok(EngineCmd::Quit) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    // Periodic progress report + completion check.
                    let Some(id) = current else {
                        continue;
                    };
                    let finished = match sink.as_ref() {
                        Some(s) if !paused => s.empty(),
                        _ => continue,
                    };

                    if finished {
                        // Played to completion. Drop the sink; whether to
                        // advance is the controller's call.
                        sink = None;
                        bytes = None;
                        paused = true;
                        started_at = None;
                        emit(&events, id, EngineEventKind::Ended);
                    } else {
                        let elapsed =
                            accumulated + started_at.map_or(Duration::ZERO, |st| st.elapsed());
                        let elapsed = duration.map_or(elapsed, |d| elapsed.min(d));
                        emit(&events, id, EngineEventKind::Progress(elapsed.as_secs_f64()));
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
