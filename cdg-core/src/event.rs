use alloc::{string::String, vec::Vec};
use core::time::Duration;

/// Which part of the frame buffer goes into [`Event::Frame`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum FrameMode {
    /// 300x216, border included
    Full,
    /// 288x192, border cropped and shifted by the scroll offsets
    #[default]
    Visible,
}

/// Snapshot of the screen, RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub height: u32,
    pub rgba: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(rename = "timestamp_ms", with = "duration_ms"))]
    pub timestamp: Duration,
    pub width: u32,
}

/// Metadata the host attaches to a song when loading it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SongInfo {
    pub audio_path: String,
    pub singer_name: String,
    pub song_id: Option<i64>,
    pub title: String,
}

/// Read-only view of the player handed to consumers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    pub audio_path: String,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "current_time_ms", with = "duration_ms")
    )]
    pub current_time: Duration,
    #[cfg_attr(feature = "serde", serde(rename = "duration_ms", with = "duration_ms"))]
    pub duration: Duration,
    pub paused: bool,
    pub playing: bool,
    pub singer_name: String,
    pub song_id: Option<i64>,
    pub title: String,
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "event", content = "data", rename_all = "snake_case")
)]
pub enum Event {
    End(PlayerState),
    Frame(Frame),
    Loaded(PlayerState),
    Pause(PlayerState),
    Play(PlayerState),
    /// Coarse position update, emitted every progress interval
    Progress(PlayerState),
    Seek(PlayerState),
    Stop(PlayerState),
}

impl Event {
    /// The player state carried by the event, if any.
    #[must_use]
    #[inline]
    pub const fn state(&self) -> Option<&PlayerState> {
        match self {
            Self::Frame(_) => None,
            Self::End(state)
            | Self::Loaded(state)
            | Self::Pause(state)
            | Self::Play(state)
            | Self::Progress(state)
            | Self::Seek(state)
            | Self::Stop(state) => Some(state),
        }
    }
}

/// Receives player events in emission order.
///
/// Implementations should return quickly, they run while the player is
/// borrowed.
pub trait Observer {
    fn notify(&mut self, event: Event);

    /// Frames are costly to build, observers that ignore them can opt out.
    #[inline]
    fn wants_frames(&self) -> bool {
        true
    }
}

impl Observer for () {
    #[inline]
    fn notify(&mut self, _event: Event) {}

    #[inline]
    fn wants_frames(&self) -> bool {
        false
    }
}

impl Observer for Vec<Event> {
    #[inline]
    fn notify(&mut self, event: Event) {
        self.push(event);
    }
}

#[cfg(feature = "serde")]
mod duration_ms {
    use core::time::Duration;
    use serde::{Deserialize as _, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
