//! # CD+Graphics decoder and renderer
//!
//! CD+Graphics (CDG) is the subcode graphics format used by karaoke discs and
//! `.cdg` files. This crate contains the packet decoder, the 300x216 indexed
//! frame buffer the instructions draw into and a playback clock that keeps the
//! screen in step with song time.
//!
//! Nothing here reads a clock or spawns a thread: the host passes the current
//! time to every [`Player`] operation and receives [`Event`]s through an
//! [`Observer`].
//!
//! ## Tracing
//!
//! Every applied instruction is reported on the `cdg_render` target at TRACE
//! level, see [`trace`]. Song level events (load, seek, end) are logged at
//! INFO and DEBUG under the crate's own target.

extern crate alloc;

mod error;
mod event;
mod instruction;
mod player;
mod screen;
mod stream;
mod timing;
pub mod trace;

pub use {
    error::Error,
    event::{Event, Frame, FrameMode, Observer, PlayerState, SongInfo},
    instruction::{Instruction, Rgb, Scroll, Tile},
    player::{MIN_CHECKPOINT_INTERVAL, Player, PlayerOptions},
    screen::{
        BPP, PALETTE_SIZE, PX_HEIGHT, PX_WIDTH, Palette, RGBA_BUF_SIZE, Renderer, TILE_HEIGHT,
        TILE_WIDTH, VISIBLE_HEIGHT, VISIBLE_RGBA_BUF_SIZE, VISIBLE_WIDTH,
    },
    stream::{Stream, TimedInstruction, decode},
    timing::{
        PACKET_SIZE, PACKETS_PER_SEC, PROGRESS_INTERVAL, RESEEK_THRESHOLD, TICK_INTERVAL,
        packet_time, stream_duration,
    },
};
