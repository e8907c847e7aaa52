use std::time::Duration;

use chrono::Utc;
use iced::futures::stream;
use iced::widget::{button, center, column, container, row, scrollable, text};
use iced::Length::Fill;
use iced::{time, window, Element, Subscription, Task};
use tokio::sync::mpsc::Sender;

mod audio;
mod config;
mod confetti;
mod countdown;
mod player;
mod quotes;
mod section;
mod song;

use crate::config::{Config, MUSIC_SECTION_ID};
use crate::countdown::Countdown;
use crate::player::{PlayerController, PlayerMessage};
use crate::quotes::Quotes;
use crate::section::{Section, SectionError};
use crate::song::Song;

fn main() -> iced::Result {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    iced::application(App::title, App::update, App::view)
        .subscription(App::subscription)
        .window(window::Settings {
            ..Default::default()
        })
        .run_with(App::new)
}

/// Bootstrap phases. Sections load strictly one at a time; every feature
/// that depends on their content initializes only after the last one has
/// settled. `Ready` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BootState {
    NotStarted,
    LoadingFragments,
    Initializing,
    Ready,
}

struct App {
    state: BootState,
    sections: Vec<Section>,
    playlist: Vec<Song>,
    countdown: Countdown,
    quotes: Quotes,
    quote: Option<String>,
    player: Option<PlayerController>,
    confetti: Box<dyn confetti::Launcher>,
    commands: Sender<audio::Command>,
}

#[derive(Debug, Clone)]
enum Message {
    ConfigLoaded(Config),
    SectionLoaded(usize, Result<String, SectionError>),
    Tick,
    Player(PlayerMessage),
    Engine(audio::Event),
    NewQuote,
    LaunchConfetti,
}

impl App {
    fn new() -> (Self, Task<Message>) {
        let (commands, events) = audio::spawn();

        let app = App {
            state: BootState::NotStarted,
            sections: vec![],
            playlist: vec![],
            countdown: Countdown::new(Utc::now()),
            quotes: Quotes::new(vec![]),
            quote: None,
            player: None,
            confetti: Box::new(confetti::LogLauncher),
            commands,
        };

        let events = stream::unfold(events, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        });

        let task = Task::batch([
            Task::run(events, Message::Engine),
            Task::perform(Config::load(), Message::ConfigLoaded),
        ]);

        (app, task)
    }

    fn title(&self) -> String {
        "Serenade".to_string()
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ConfigLoaded(config) => {
                self.sections = config
                    .sections
                    .iter()
                    .map(|entry| Section::new(&entry.id, &entry.path))
                    .collect();
                self.playlist = config.playlist;
                self.quotes = Quotes::new(config.quotes);
                self.countdown = Countdown::new(config.target_date);

                self.state = BootState::LoadingFragments;
                if self.sections.is_empty() {
                    self.initialize()
                } else {
                    self.load_section(0)
                }
            }
            Message::SectionLoaded(index, result) => {
                if let Some(section) = self.sections.get_mut(index) {
                    section.apply(result);
                }

                let next = index + 1;
                if next < self.sections.len() {
                    self.load_section(next)
                } else {
                    self.initialize()
                }
            }
            Message::Tick => {
                self.countdown.tick(Utc::now());
                Task::none()
            }
            Message::NewQuote => {
                self.quote = self.quotes.random().map(str::to_string);
                Task::none()
            }
            Message::LaunchConfetti => {
                self.confetti.launch(&confetti::BURST);
                Task::none()
            }
            Message::Player(player_message) => {
                let Some(player) = self.player.as_mut() else {
                    tracing::warn!("player control before initialization, ignoring");
                    return Task::none();
                };
                let command = player.update(player_message);
                self.forward(command)
            }
            Message::Engine(audio::Event::Finished) => {
                let Some(player) = self.player.as_mut() else {
                    return Task::none();
                };
                let command = player.on_finished();
                self.forward(command)
            }
            Message::Engine(audio::Event::Error(e)) => {
                tracing::error!(%e, "audio engine error");
                if let Some(player) = self.player.as_mut() {
                    player.on_error();
                }
                Task::none()
            }
        }
    }

    /// Kicks off the fetch for one section; its settled result re-enters
    /// `update` and chains the next, keeping loads strictly sequential.
    fn load_section(&self, index: usize) -> Task<Message> {
        let path = self.sections[index].path().to_path_buf();
        Task::perform(section::fetch(path), move |result| {
            Message::SectionLoaded(index, result)
        })
    }

    /// Runs once every section has settled: starts the countdown and, if
    /// the music section actually loaded, the player. Synchronous, ends in
    /// `Ready`.
    fn initialize(&mut self) -> Task<Message> {
        self.state = BootState::Initializing;

        self.countdown.start(Utc::now());

        let music_loaded = self
            .sections
            .iter()
            .any(|section| section.id == MUSIC_SECTION_ID && section.is_loaded());

        let task = if music_loaded {
            let (player, command) = PlayerController::new(std::mem::take(&mut self.playlist));
            self.player = Some(player);
            self.forward(command)
        } else {
            tracing::warn!("music section unavailable, player disabled");
            Task::none()
        };

        self.state = BootState::Ready;
        task
    }

    fn forward(&self, command: Option<audio::Command>) -> Task<Message> {
        let Some(command) = command else {
            return Task::none();
        };
        let sender = self.commands.clone();
        Task::perform(
            async move {
                let _ = sender.send(command).await;
            },
            |_| (),
        )
        .discard()
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.state == BootState::Ready && self.countdown.is_running() {
            time::every(Duration::from_secs(1)).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    fn view(&self) -> Element<Message> {
        if self.state != BootState::Ready {
            return center(text("Loading...").size(25).color([0.7, 0.7, 0.7])).into();
        }

        let sections = column(
            self.sections
                .iter()
                .map(|section| container(text(section.text())).padding(10).width(Fill).into()),
        )
        .spacing(10);

        let countdown = container(text(self.countdown.display()).size(20)).center_x(Fill);

        let quote_line = self
            .quote
            .as_deref()
            .map(|quote| format!("\"{quote}\""))
            .unwrap_or_default();

        let mut buttons = row![].spacing(20);
        if !self.quotes.is_empty() {
            buttons = buttons.push(button("New quote").on_press(Message::NewQuote));
        }
        buttons = buttons.push(button("Celebrate").on_press(Message::LaunchConfetti));

        let triggers = column![text(quote_line).size(16), buttons].spacing(10);

        let player: Element<Message> = match &self.player {
            Some(player) => player.view().map(Message::Player),
            None => text("").into(),
        };

        let content = column![sections, countdown, triggers, player]
            .spacing(20)
            .padding([10, 20]);
        scrollable(container(content).width(Fill)).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn transport_before_initialization_is_a_silent_no_op() {
        let (mut app, _) = App::new();
        assert!(app.player.is_none());

        let _ = app.update(Message::Player(PlayerMessage::TogglePlayPause));
        let _ = app.update(Message::Player(PlayerMessage::Next));
        let _ = app.update(Message::Player(PlayerMessage::VolumeChanged(0.5)));

        assert!(app.player.is_none());
        assert_eq!(app.state, BootState::NotStarted);
        assert!(!app.countdown.is_running());
    }

    #[tokio::test]
    async fn engine_events_before_initialization_are_ignored() {
        let (mut app, _) = App::new();

        let _ = app.update(Message::Engine(audio::Event::Finished));
        let _ = app.update(Message::Engine(audio::Event::Error("boom".to_string())));

        assert!(app.player.is_none());
        assert_eq!(app.state, BootState::NotStarted);
    }
}
