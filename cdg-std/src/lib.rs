#[cfg(feature = "cli")]
pub mod cli;
pub mod export;
pub mod logging;

mod broadcast;
mod config;
mod error;
#[cfg(feature = "screenshot")]
mod screenshot;
mod thread;

pub use broadcast::Broadcast;
pub use cdg_core::{Event, Frame, FrameMode, PlayerState, SongInfo, VISIBLE_HEIGHT, VISIBLE_WIDTH};
pub use config::{ClockSource, Config};
pub use error::Error;
#[cfg(feature = "screenshot")]
pub use screenshot::save_png;
pub use thread::PlayerThread;
