pub use clap;
use cdg_core::SongInfo;
use std::path::{Path, PathBuf};

pub const QUALIFIER: &str = "com.github";
pub const ORGANIZATION: &str = "remind-me-later";
pub const CDG_BIN: &str = "cdg";
pub const CDG_STYLIZED: &str = "Cdg";
const ABOUT: &str = "Decode, play and inspect CD+Graphics karaoke files.";
const AFTER_HELP: &str = "Examples:

    cdg info song.cdg
    cdg play song.cdg --title \"Song\" --singer \"Singer\"
    cdg snapshot song.cdg --at 42.5 -o frame.png
";

#[derive(clap::Parser)]
#[command(name = CDG_BIN, about = ABOUT, after_help = AFTER_HELP, version)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
    #[arg(
        long,
        global = true,
        help = "JSON configuration file",
        required = false
    )]
    config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Log filter directives, overrides RUST_LOG",
        long_help = "Log filter directives in tracing-subscriber EnvFilter syntax, \
           overrides RUST_LOG. Use `cdg_render=trace` to log every applied \
           instruction.",
        required = false
    )]
    log: Option<String>,
}

impl Cli {
    #[must_use]
    #[inline]
    pub const fn command(&self) -> &Command {
        &self.command
    }

    #[must_use]
    #[inline]
    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    #[must_use]
    #[inline]
    pub fn log(&self) -> Option<&str> {
        self.log.as_deref()
    }
}

#[derive(clap::Subcommand)]
pub enum Command {
    /// Print a JSON summary of a CDG file
    Info {
        #[arg(help = "CDG file")]
        file: PathBuf,
    },
    /// Play a CDG file to the end on the internal clock
    Play {
        #[arg(help = "CDG file")]
        file: PathBuf,
        #[command(flatten)]
        song: SongArgs,
    },
    /// Save the screen at a given time as a PNG
    Snapshot {
        #[arg(long, help = "Song position in seconds")]
        at: f64,
        #[arg(help = "CDG file")]
        file: PathBuf,
        #[arg(long, help = "Include the border")]
        full: bool,
        #[arg(
            short,
            long,
            help = "Output PNG, defaults to the data directory",
            required = false
        )]
        output: Option<PathBuf>,
    },
}

/// Metadata echoed back in every player state.
#[derive(clap::Args, Default)]
pub struct SongArgs {
    #[arg(long, help = "Path of the matching audio track")]
    audio: Option<String>,
    #[arg(long, help = "Singer name")]
    singer: Option<String>,
    #[arg(long, help = "Numeric song id")]
    song_id: Option<i64>,
    #[arg(long, help = "Song title")]
    title: Option<String>,
}

impl SongArgs {
    /// Song metadata, the title defaults to the file stem.
    #[must_use]
    pub fn song_info(&self, file: &Path) -> SongInfo {
        let title = self.title.clone().unwrap_or_else(|| {
            file.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        SongInfo {
            audio_path: self.audio.clone().unwrap_or_default(),
            singer_name: self.singer.clone().unwrap_or_default(),
            song_id: self.song_id,
            title,
        }
    }
}
