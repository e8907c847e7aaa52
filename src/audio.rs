use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use rodio::{OutputStream, Sink};
use tokio::sync::mpsc::{self, error::TryRecvError, Receiver, Sender};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Commands from the controller to the engine thread.
#[derive(Debug, Clone)]
pub enum Command {
    /// Set the playback source without starting playback.
    Load(PathBuf),
    /// Set the playback source and start playing.
    Play(PathBuf),
    Pause,
    Resume,
    SetVolume(f32),
}

/// Events from the engine thread back to the controller.
#[derive(Debug, Clone)]
pub enum Event {
    /// The playing source drained to the end.
    Finished,
    Error(String),
}

/// Starts the blocking audio engine and returns its channel endpoints.
///
/// The engine owns the output stream and sink on a dedicated blocking task.
/// It alternates between draining commands and polling the sink so that the
/// end of a playing track is noticed and reported exactly once.
pub fn spawn() -> (Sender<Command>, Receiver<Event>) {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(100);
    let (event_tx, event_rx) = mpsc::channel::<Event>(100);

    tokio::task::spawn_blocking(move || {
        let (_stream, stream_handle) = match OutputStream::try_default() {
            Ok(output) => output,
            Err(e) => {
                tracing::error!(%e, "no audio output device");
                let _ = event_tx.blocking_send(Event::Error(e.to_string()));
                return;
            }
        };
        let sink = match Sink::try_new(&stream_handle) {
            Ok(sink) => sink,
            Err(e) => {
                tracing::error!(%e, "unable to create audio sink");
                let _ = event_tx.blocking_send(Event::Error(e.to_string()));
                return;
            }
        };

        let mut current: Option<PathBuf> = None;
        let mut playing = false;

        loop {
            match cmd_rx.try_recv() {
                Ok(command) => match command {
                    Command::Load(path) => {
                        sink.stop();
                        if append(&sink, &path, &event_tx) {
                            sink.pause();
                            current = Some(path);
                        }
                        playing = false;
                    }
                    Command::Play(path) => {
                        sink.stop();
                        if append(&sink, &path, &event_tx) {
                            sink.play();
                            current = Some(path);
                            playing = true;
                        } else {
                            playing = false;
                        }
                    }
                    Command::Pause => {
                        sink.pause();
                        playing = false;
                    }
                    Command::Resume => {
                        // A drained sink holds nothing to resume; reload the
                        // current source from the start.
                        if sink.empty() {
                            if let Some(path) = current.clone() {
                                if !append(&sink, &path, &event_tx) {
                                    continue;
                                }
                            }
                        }
                        sink.play();
                        playing = true;
                    }
                    Command::SetVolume(volume) => sink.set_volume(volume),
                },
                Err(TryRecvError::Empty) => {
                    if playing && sink.empty() {
                        playing = false;
                        let _ = event_tx.blocking_send(Event::Finished);
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(TryRecvError::Disconnected) => break,
            }
        }

        tracing::debug!("audio engine stopped");
    });

    (cmd_tx, event_rx)
}

fn append(sink: &Sink, path: &PathBuf, events: &Sender<Event>) -> bool {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::error!(path = %path.display(), %e, "unable to open audio source");
            let _ = events.blocking_send(Event::Error(e.to_string()));
            return false;
        }
    };

    match rodio::Decoder::new(BufReader::new(file)) {
        Ok(source) => {
            sink.append(source);
            true
        }
        Err(e) => {
            tracing::error!(path = %path.display(), %e, "unable to decode audio source");
            let _ = events.blocking_send(Event::Error(e.to_string()));
            false
        }
    }
}
