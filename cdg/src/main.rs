use anyhow::Context as _;
use cdg_core::{FrameMode, Player, SongInfo};
use cdg_std::{
    ClockSource, Config, Event, PlayerThread,
    cli::{CDG_STYLIZED, Cli, Command, ORGANIZATION, QUALIFIER, SongArgs, clap::Parser as _},
};
use core::time::Duration;
use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cdg_std::logging::init(cli.log());

    let config = match cli.config() {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command() {
        Command::Info { file } => info(file, &config),
        Command::Play { file, song } => play(file, song, &config),
        Command::Snapshot {
            at,
            file,
            full,
            output,
        } => snapshot(file, *at, *full, output.as_deref(), &config),
    }
}

fn read(file: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(file).with_context(|| format!("reading {}", file.display()))
}

fn info(file: &Path, config: &Config) -> anyhow::Result<()> {
    let data = read(file)?;
    let mut player = Player::with_options((), config.player_options());
    player
        .load_song(&data, SongArgs::default().song_info(file))
        .with_context(|| format!("decoding {}", file.display()))?;

    let json = cdg_std::export::export_state_json(&player)?;
    writeln!(std::io::stdout().lock(), "{json}")?;
    Ok(())
}

fn play(file: &Path, song: &SongArgs, config: &Config) -> anyhow::Result<()> {
    let config = Config {
        clock_source: ClockSource::Internal,
        ..config.clone()
    };

    let thread = PlayerThread::new(&config)?;
    let events = thread.subscribe()?;
    thread
        .load_path(file, song.song_info(file))
        .with_context(|| format!("loading {}", file.display()))?;
    thread.play()?;

    loop {
        match events.recv().context("player thread stopped")? {
            Event::Progress(state) => tracing::info!(
                position_ms = state.current_time.as_millis(),
                duration_ms = state.duration.as_millis(),
                "playing {}",
                state.title
            ),
            Event::End(state) => {
                tracing::info!(title = %state.title, "finished");
                return Ok(());
            }
            _ => {}
        }
    }
}

fn snapshot(
    file: &Path,
    at: f64,
    full: bool,
    output: Option<&Path>,
    config: &Config,
) -> anyhow::Result<()> {
    let at = Duration::try_from_secs_f64(at).context("--at must be a positive number of seconds")?;

    let mut options = config.player_options();
    if full {
        options.frame_mode = FrameMode::Full;
    }

    let data = read(file)?;
    let mut player = Player::with_options((), options);
    player
        .load_song(&data, SongInfo::default())
        .with_context(|| format!("decoding {}", file.display()))?;
    player.seek(at, Duration::ZERO);

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => default_snapshot_path(file, player.current_time())?,
    };

    cdg_std::save_png(&player.frame(), &path)
        .with_context(|| format!("saving {}", path.display()))?;
    tracing::info!(path = %path.display(), at_ms = player.current_time().as_millis(), "saved snapshot");

    Ok(())
}

fn default_snapshot_path(file: &Path, at: Duration) -> anyhow::Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, CDG_STYLIZED)
        .context("no home directory to store snapshots in")?;

    let dir = project_dirs.data_dir().join("snapshots");
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let stem = file
        .file_stem()
        .map_or_else(|| "snapshot".into(), |stem| stem.to_string_lossy());
    Ok(dir.join(format!("{stem}-{}.png", at.as_millis())))
}
