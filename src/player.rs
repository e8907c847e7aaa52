use iced::widget::{button, center, column, container, keyed_column, row, slider, text};
use iced::{Element, Length};

use crate::audio::Command;
use crate::song::{Song, SongMessage};

pub const PLAY_ICON: &str = "|>";
pub const PAUSE_ICON: &str = "||";
pub const EMPTY_PLAYLIST: &str = "No songs loaded.";

#[derive(Debug, Clone)]
pub enum PlayerMessage {
    Song(usize, SongMessage),
    TogglePlayPause,
    Next,
    Previous,
    VolumeChanged(f32),
}

/// Playlist state and transport logic.
///
/// The controller never touches the audio device itself: every operation
/// returns at most one [`Command`] for the engine thread, and the app
/// forwards it. Indices come from enumerating the playlist, so they are in
/// range by construction whenever the playlist is non-empty.
#[derive(Debug)]
pub struct PlayerController {
    playlist: Vec<Song>,
    current: usize,
    is_paused: bool,
    volume: f32,
}

impl PlayerController {
    /// Builds the controller and preloads the first song, paused, the way
    /// the initial render expects. An empty playlist loads nothing.
    pub fn new(playlist: Vec<Song>) -> (Self, Option<Command>) {
        let mut controller = Self {
            playlist,
            current: 0,
            is_paused: true,
            volume: 1.0,
        };

        let command = if controller.playlist.is_empty() {
            None
        } else {
            controller.select(0)
        };

        (controller, command)
    }

    pub fn update(&mut self, message: PlayerMessage) -> Option<Command> {
        match message {
            PlayerMessage::Song(index, SongMessage::Choose) => self.select(index),
            PlayerMessage::TogglePlayPause => self.toggle_play_pause(),
            PlayerMessage::Next => self.play_next(),
            PlayerMessage::Previous => self.play_previous(),
            PlayerMessage::VolumeChanged(volume) => self.set_volume(volume),
        }
    }

    /// Sets the current index and playback source without starting playback.
    pub fn select(&mut self, index: usize) -> Option<Command> {
        let song = self.playlist.get(index)?;
        let command = Command::Load(song.src.clone());
        self.current = index;
        Some(command)
    }

    pub fn toggle_play_pause(&mut self) -> Option<Command> {
        if self.playlist.is_empty() {
            return None;
        }

        if self.is_paused {
            self.is_paused = false;
            Some(Command::Resume)
        } else {
            self.is_paused = true;
            Some(Command::Pause)
        }
    }

    /// Selects the given index and starts playback immediately.
    pub fn play_at(&mut self, index: usize) -> Option<Command> {
        let song = self.playlist.get(index)?;
        let command = Command::Play(song.src.clone());
        self.current = index;
        self.is_paused = false;
        Some(command)
    }

    pub fn play_next(&mut self) -> Option<Command> {
        if self.playlist.is_empty() {
            return None;
        }
        self.play_at((self.current + 1) % self.playlist.len())
    }

    pub fn play_previous(&mut self) -> Option<Command> {
        if self.playlist.is_empty() {
            return None;
        }
        let len = self.playlist.len();
        self.play_at((self.current + len - 1) % len)
    }

    /// Stores and forwards the level as-is; the slider supplies values
    /// already clamped to [0, 1].
    pub fn set_volume(&mut self, volume: f32) -> Option<Command> {
        self.volume = volume;
        Some(Command::SetVolume(volume))
    }

    /// Route for the engine's finished event: advance to the next song.
    /// Registered once at initialization, so repeated play/pause cycles
    /// never stack duplicate advancement.
    pub fn on_finished(&mut self) -> Option<Command> {
        self.play_next()
    }

    /// Route for an engine error: nothing is playing anymore, so the
    /// indicator falls back to the play glyph.
    pub fn on_error(&mut self) {
        self.is_paused = true;
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn indicator(&self) -> &'static str {
        if self.is_paused {
            PLAY_ICON
        } else {
            PAUSE_ICON
        }
    }

    pub fn now_playing_label(&self) -> String {
        self.playlist
            .get(self.current)
            .map(Song::label)
            .unwrap_or_else(|| EMPTY_PLAYLIST.to_string())
    }

    pub fn view(&self) -> Element<PlayerMessage> {
        if self.playlist.is_empty() {
            return center(text(EMPTY_PLAYLIST).size(16).color([0.7, 0.7, 0.7]))
                .height(80)
                .into();
        }

        let title = text(self.now_playing_label()).size(18);

        let songs: Element<_> = keyed_column(self.playlist.iter().enumerate().map(|(i, song)| {
            (
                song.uuid,
                song.view(i == self.current)
                    .map(move |message| PlayerMessage::Song(i, message)),
            )
        }))
        .spacing(10)
        .into();

        let transport = row![
            button("<").on_press(PlayerMessage::Previous),
            button(self.indicator()).on_press(PlayerMessage::TogglePlayPause),
            button(">").on_press(PlayerMessage::Next),
        ]
        .spacing(50);

        let volume = slider(0.0..=1.0, self.volume, PlayerMessage::VolumeChanged)
            .step(0.01)
            .width(150);

        let controls = container(row![transport, volume].spacing(30)).center_x(Length::Fill);

        column![title, songs, controls].spacing(15).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn three_songs() -> Vec<Song> {
        vec![
            Song::new("A", "X", "a.mp3"),
            Song::new("B", "Y", "b.mp3"),
            Song::new("C", "Z", "c.mp3"),
        ]
    }

    #[test]
    fn new_preloads_first_song_paused() {
        let (player, command) = PlayerController::new(three_songs());
        assert_eq!(player.current_index(), 0);
        assert_eq!(player.indicator(), PLAY_ICON);
        assert!(matches!(command, Some(Command::Load(path)) if path == PathBuf::from("a.mp3")));
    }

    #[test]
    fn empty_playlist_loads_nothing_and_transport_is_inert() {
        let (mut player, command) = PlayerController::new(vec![]);
        assert!(command.is_none());
        assert!(player.toggle_play_pause().is_none());
        assert!(player.play_next().is_none());
        assert!(player.play_previous().is_none());
        assert_eq!(player.now_playing_label(), EMPTY_PLAYLIST);
    }

    #[test]
    fn select_sets_source_without_playing() {
        let (mut player, _) = PlayerController::new(three_songs());
        let command = player.select(1);
        assert!(matches!(command, Some(Command::Load(path)) if path == PathBuf::from("b.mp3")));
        assert_eq!(player.current_index(), 1);
        assert_eq!(player.indicator(), PLAY_ICON);
    }

    #[test]
    fn play_at_updates_title_source_and_indicator() {
        let songs = vec![Song::new("A", "X", "a.mp3"), Song::new("B", "Y", "b.mp3")];
        let (mut player, _) = PlayerController::new(songs);

        let command = player.play_at(1);

        assert_eq!(player.now_playing_label(), "B - Y");
        assert!(matches!(command, Some(Command::Play(path)) if path == PathBuf::from("b.mp3")));
        assert_eq!(player.indicator(), PAUSE_ICON);
    }

    #[test]
    fn next_and_previous_wrap_around() {
        let (mut player, _) = PlayerController::new(three_songs());

        player.play_at(2);
        player.play_next();
        assert_eq!(player.current_index(), 0);

        player.play_at(0);
        player.play_previous();
        assert_eq!(player.current_index(), 2);
    }

    #[test]
    fn toggle_alternates_pause_and_resume() {
        let (mut player, _) = PlayerController::new(three_songs());

        let first = player.toggle_play_pause();
        assert!(matches!(first, Some(Command::Resume)));
        assert_eq!(player.indicator(), PAUSE_ICON);

        let second = player.toggle_play_pause();
        assert!(matches!(second, Some(Command::Pause)));
        assert_eq!(player.indicator(), PLAY_ICON);
    }

    #[test]
    fn volume_reads_back_exactly() {
        let (mut player, _) = PlayerController::new(three_songs());
        let command = player.set_volume(0.5);
        assert_eq!(player.volume(), 0.5);
        assert!(matches!(command, Some(Command::SetVolume(v)) if v == 0.5));
    }

    #[test]
    fn highlight_is_stable_across_renders() {
        let (mut player, _) = PlayerController::new(three_songs());
        player.select(1);

        let _ = player.view();
        let first = player.current_index();
        let _ = player.view();
        assert_eq!(player.current_index(), first);
    }

    #[test]
    fn engine_error_resets_indicator_to_play() {
        let (mut player, _) = PlayerController::new(three_songs());
        player.play_at(1);
        assert_eq!(player.indicator(), PAUSE_ICON);

        player.on_error();
        assert_eq!(player.indicator(), PLAY_ICON);
    }

    #[test]
    fn finished_event_advances_once() {
        let (mut player, _) = PlayerController::new(three_songs());
        player.play_at(1);

        let command = player.on_finished();
        assert_eq!(player.current_index(), 2);
        assert!(matches!(command, Some(Command::Play(path)) if path == PathBuf::from("c.mp3")));
    }
}
