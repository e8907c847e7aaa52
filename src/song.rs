use std::path::PathBuf;

use iced::{
    widget::{button, column, container, row, text},
    Element, Length,
};
use serde::Deserialize;
use uuid::Uuid;

/// One playlist entry. Immutable once defined; playback order is the
/// playlist's insertion order.
#[derive(Debug, Clone, Deserialize)]
pub struct Song {
    #[serde(default = "Uuid::new_v4")]
    pub uuid: Uuid,
    pub title: String,
    pub artist: String,
    pub src: PathBuf,
    #[serde(skip)]
    pub duration_str: Option<String>,
}

#[derive(Debug, Clone)]
pub enum SongMessage {
    Choose,
}

impl Song {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, src: impl Into<PathBuf>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title: title.into(),
            artist: artist.into(),
            src: src.into(),
            duration_str: None,
        }
    }

    pub fn label(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }

    pub fn view(&self, is_current: bool) -> Element<SongMessage> {
        let name = button(
            column![
                text(&self.title),
                text(&self.artist).size(12).color([0.6, 0.6, 0.6]),
            ]
            .spacing(2),
        )
        .on_press(SongMessage::Choose)
        .width(Length::FillPortion(6));

        let duration = text(self.duration_str.as_deref().unwrap_or(""))
            .width(Length::FillPortion(1))
            .center();

        let badge = container(if is_current {
            text("Now playing").size(12).color([0.8, 0.2, 0.2])
        } else {
            text("")
        })
        .width(Length::FillPortion(2))
        .center_x(Length::Fill);

        row![name, duration, badge].spacing(10).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_joins_title_and_artist() {
        let song = Song::new("B", "Y", "b.mp3");
        assert_eq!(song.label(), "B - Y");
    }

    #[test]
    fn deserializes_from_config_entry() {
        let song: Song =
            serde_json::from_str(r#"{"title":"A","artist":"X","src":"songs/a.mp3"}"#).unwrap();
        assert_eq!(song.title, "A");
        assert_eq!(song.src, PathBuf::from("songs/a.mp3"));
        assert_eq!(song.duration_str, None);
    }
}
