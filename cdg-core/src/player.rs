use crate::{
    Error, Event, FrameMode, Observer, PlayerState, Renderer, SongInfo, Stream,
    event::Frame,
    screen::{PX_HEIGHT, PX_WIDTH, VISIBLE_HEIGHT, VISIBLE_WIDTH},
    stream::decode,
    timing::{PROGRESS_INTERVAL, RESEEK_THRESHOLD},
};
use alloc::vec::Vec;
use core::time::Duration;

/// Shorter checkpoint intervals are raised to this, every checkpoint holds a
/// full renderer copy.
pub const MIN_CHECKPOINT_INTERVAL: Duration = Duration::from_secs(1);

/// Tuning knobs for [`Player`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerOptions {
    /// Store a renderer snapshot every interval so seeks only replay the
    /// tail of the stream. `None` or zero always replays from the start,
    /// non-zero values below [`MIN_CHECKPOINT_INTERVAL`] are raised to it.
    pub checkpoint_interval: Option<Duration>,
    pub frame_mode: FrameMode,
    pub progress_interval: Duration,
    pub reseek_threshold: Duration,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            checkpoint_interval: None,
            frame_mode: FrameMode::default(),
            progress_interval: PROGRESS_INTERVAL,
            reseek_threshold: RESEEK_THRESHOLD,
        }
    }
}

/// Maps wall clock time to song time while playing.
#[derive(Clone, Copy, Default)]
struct Anchor {
    // Song position at `wall`
    media: Duration,
    wall: Duration,
}

impl Anchor {
    fn elapsed(self, now: Duration) -> Duration {
        self.media + now.saturating_sub(self.wall)
    }
}

struct Checkpoint {
    cursor: usize,
    renderer: Renderer,
    time: Duration,
}

struct Song {
    checkpoints: Vec<Checkpoint>,
    info: SongInfo,
    stream: Stream,
}

impl Song {
    fn checkpoint_before(&self, time: Duration) -> Option<&Checkpoint> {
        let after = self.checkpoints.partition_point(|cp| cp.time <= time);
        after.checked_sub(1).and_then(|i| self.checkpoints.get(i))
    }
}

/// Playback clock for a CDG stream.
///
/// Keeps the renderer in step with song time, either advancing on its own
/// from wall clock time passed to [`Player::tick`] or following the position
/// reported by an audio player through [`Player::sync_to_audio_time`].
///
/// The player never reads a clock, every operation that depends on the
/// current time takes it as `now`: any monotonic [`Duration`] works as long
/// as the same source is used for every call.
///
/// Until a song is loaded every operation is a no-op.
pub struct Player<O: Observer> {
    anchor: Anchor,
    // Index of the next instruction to apply
    cursor: usize,
    current_time: Duration,
    ended: bool,
    last_progress: Duration,
    observer: O,
    options: PlayerOptions,
    paused: bool,
    paused_at: Duration,
    playing: bool,
    renderer: Renderer,
    song: Option<Song>,
}

impl<O: Observer> Player<O> {
    /// Applies every pending instruction with a timestamp at or before
    /// `target`, returns how many were applied.
    fn advance_to(&mut self, target: Duration) -> usize {
        let Some(song) = &self.song else {
            return 0;
        };

        let pending = song
            .stream
            .instructions()
            .get(self.cursor..)
            .unwrap_or_default();
        let due = pending.partition_point(|timed| timed.time <= target);

        for timed in pending.iter().take(due) {
            self.renderer.apply(&timed.instruction);
        }

        self.cursor += due;
        due
    }

    #[must_use]
    #[inline]
    pub fn current_time(&self) -> Duration {
        self.current_time
    }

    #[must_use]
    #[inline]
    pub fn duration(&self) -> Option<Duration> {
        self.song.as_ref().map(|song| song.stream.duration())
    }

    fn emit_frame(&mut self) {
        if self.observer.wants_frames() {
            let frame = self.frame();
            self.observer.notify(Event::Frame(frame));
        }
    }

    fn emit_progress(&mut self) {
        if self.current_time.abs_diff(self.last_progress) >= self.options.progress_interval {
            self.last_progress = self.current_time;
            self.emit_state(Event::Progress);
        }
    }

    fn emit_state(&mut self, event: fn(PlayerState) -> Event) {
        let state = self.state();
        self.observer.notify(event(state));
    }

    fn finish(&mut self) {
        if self.ended {
            return;
        }

        tracing::info!(
            duration_ms = self.duration().unwrap_or_default().as_millis(),
            "song ended"
        );

        self.stop();
        self.ended = true;
        self.emit_state(Event::End);
    }

    /// Snapshot of the screen in the configured [`FrameMode`].
    #[must_use]
    #[inline]
    pub fn frame(&self) -> Frame {
        let (width, height, rgba) = match self.options.frame_mode {
            FrameMode::Full => (PX_WIDTH, PX_HEIGHT, self.renderer.rgba_frame()),
            FrameMode::Visible => (
                VISIBLE_WIDTH,
                VISIBLE_HEIGHT,
                self.renderer.visible_rgba_frame(),
            ),
        };

        Frame {
            height: u32::from(height),
            rgba,
            timestamp: self.current_time,
            width: u32::from(width),
        }
    }

    #[must_use]
    #[inline]
    pub const fn is_loaded(&self) -> bool {
        self.song.is_some()
    }

    #[must_use]
    #[inline]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    #[inline]
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    /// Playing and not paused, the free running clock has work to do.
    #[must_use]
    #[inline]
    pub const fn is_running(&self) -> bool {
        self.playing && !self.paused
    }

    /// Replaces the current song with the one in `data`.
    ///
    /// Instructions at time zero are applied right away and the first frame
    /// is emitted. On error the previously loaded song is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` doesn't hold a single complete packet.
    #[inline]
    pub fn load_song(&mut self, data: &[u8], info: SongInfo) -> Result<(), Error> {
        let stream = decode(data);
        if stream.packets() == 0 {
            return Err(Error::EmptyStream { len: data.len() });
        }

        let checkpoints = match self.options.checkpoint_interval {
            Some(interval) if !interval.is_zero() => {
                build_checkpoints(&stream, interval.max(MIN_CHECKPOINT_INTERVAL))
            }
            _ => Vec::new(),
        };

        tracing::info!(
            title = %info.title,
            singer = %info.singer_name,
            packets = stream.packets(),
            instructions = stream.instructions().len(),
            duration_ms = stream.duration().as_millis(),
            checkpoints = checkpoints.len(),
            "loaded song"
        );

        self.reset_playback();
        self.anchor = Anchor::default();
        self.ended = false;
        self.song = Some(Song {
            checkpoints,
            info,
            stream,
        });

        self.advance_to(Duration::ZERO);
        self.emit_state(Event::Loaded);
        self.emit_frame();

        Ok(())
    }

    #[must_use]
    #[inline]
    pub fn new(observer: O) -> Self {
        Self::with_options(observer, PlayerOptions::default())
    }

    #[must_use]
    #[inline]
    pub const fn observer(&self) -> &O {
        &self.observer
    }

    #[inline]
    pub const fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    #[must_use]
    #[inline]
    pub const fn options(&self) -> &PlayerOptions {
        &self.options
    }

    #[inline]
    pub fn pause(&mut self, now: Duration) {
        if !self.is_loaded() || !self.is_running() {
            return;
        }

        tracing::debug!(position_ms = self.current_time.as_millis(), "pause");

        self.paused = true;
        self.paused_at = now;
        self.emit_state(Event::Pause);
    }

    #[inline]
    pub fn play(&mut self, now: Duration) {
        if !self.is_loaded() || self.is_running() {
            return;
        }

        if self.paused {
            // Shift the anchor past the pause so song time continues where it stopped
            let paused_for = now.saturating_sub(self.paused_at);
            self.anchor.wall += paused_for;
            tracing::debug!(paused_ms = paused_for.as_millis(), "resume");
        } else {
            self.anchor = Anchor {
                media: self.current_time,
                wall: now,
            };
            tracing::debug!(position_ms = self.current_time.as_millis(), "play");
        }

        self.ended = false;
        self.paused = false;
        self.playing = true;
        self.emit_state(Event::Play);
    }

    #[must_use]
    #[inline]
    pub const fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Rebuilds the screen from scratch up to `target`.
    fn replay_to(&mut self, target: Duration) {
        self.renderer.reset();
        self.cursor = 0;

        if let Some(song) = &self.song
            && let Some(checkpoint) = song.checkpoint_before(target)
        {
            self.renderer.clone_from(&checkpoint.renderer);
            self.cursor = checkpoint.cursor;
        }

        self.advance_to(target);
    }

    fn reset_playback(&mut self) {
        self.cursor = 0;
        self.current_time = Duration::ZERO;
        self.last_progress = Duration::ZERO;
        self.paused = false;
        self.playing = false;
        self.renderer.reset();
    }

    /// Jumps to `target`, clamped to the song length.
    ///
    /// Screen state is cumulative, so this replays the stream up to `target`
    /// instead of jumping.
    #[inline]
    pub fn seek(&mut self, target: Duration, now: Duration) {
        let Some(duration) = self.duration() else {
            return;
        };

        let target = target.min(duration);
        tracing::debug!(target_ms = target.as_millis(), "seek");

        self.replay_to(target);
        self.current_time = target;
        self.last_progress = target;
        self.ended = false;

        if self.playing {
            // While paused the anchor moves again on resume
            let wall = if self.paused { self.paused_at } else { now };
            self.anchor = Anchor {
                media: target,
                wall,
            };
        }

        self.emit_frame();
        self.emit_state(Event::Seek);
    }

    #[must_use]
    #[inline]
    pub fn song_info(&self) -> Option<&SongInfo> {
        self.song.as_ref().map(|song| &song.info)
    }

    #[must_use]
    #[inline]
    pub fn state(&self) -> PlayerState {
        let info = self.song_info().cloned().unwrap_or_default();

        PlayerState {
            audio_path: info.audio_path,
            current_time: self.current_time,
            duration: self.duration().unwrap_or_default(),
            paused: self.paused,
            playing: self.playing,
            singer_name: info.singer_name,
            song_id: info.song_id,
            title: info.title,
        }
    }

    #[inline]
    pub fn stop(&mut self) {
        if !self.is_loaded() {
            return;
        }

        tracing::debug!(position_ms = self.current_time.as_millis(), "stop");

        self.reset_playback();
        self.emit_state(Event::Stop);
    }

    #[must_use]
    #[inline]
    pub fn stream(&self) -> Option<&Stream> {
        self.song.as_ref().map(|song| &song.stream)
    }

    /// Follows the position reported by the audio player.
    ///
    /// Moving forward applies only the newly reached instructions. A jump
    /// backwards larger than the reseek threshold is treated as a seek,
    /// smaller ones are jitter and don't touch the screen. Reaching the end of
    /// the song stops the player and emits [`Event::End`].
    #[inline]
    pub fn sync_to_audio_time(&mut self, audio_time: Duration, now: Duration) {
        let Some(duration) = self.duration() else {
            return;
        };

        // Already stopped at the end, hosts keep reporting the final position
        if self.ended && audio_time >= duration {
            return;
        }

        if audio_time > self.current_time {
            let applied = self.advance_to(audio_time);
            self.current_time = audio_time;

            if applied > 0 {
                self.emit_frame();
            }
            self.emit_progress();
        } else if self.current_time - audio_time > self.options.reseek_threshold {
            tracing::debug!(
                from_ms = self.current_time.as_millis(),
                to_ms = audio_time.as_millis(),
                "audio jumped back"
            );
            self.seek(audio_time, now);
        } else {
            self.current_time = audio_time;
        }

        if audio_time >= duration {
            self.finish();
        } else {
            self.ended = false;
        }
    }

    /// One step of the free running clock.
    ///
    /// Meant to be called periodically while [`Player::is_running`], emits a
    /// frame on every call and progress every progress interval.
    #[inline]
    pub fn tick(&mut self, now: Duration) {
        let Some(duration) = self.duration() else {
            return;
        };

        if !self.is_running() {
            return;
        }

        let elapsed = self.anchor.elapsed(now);
        self.advance_to(elapsed);
        self.current_time = elapsed.min(duration);

        self.emit_frame();
        self.emit_progress();

        if elapsed >= duration {
            self.finish();
        }
    }

    #[must_use]
    #[inline]
    pub fn with_options(observer: O, options: PlayerOptions) -> Self {
        Self {
            anchor: Anchor::default(),
            cursor: 0,
            current_time: Duration::ZERO,
            ended: false,
            last_progress: Duration::ZERO,
            observer,
            options,
            paused: false,
            paused_at: Duration::ZERO,
            playing: false,
            renderer: Renderer::default(),
            song: None,
        }
    }
}

fn build_checkpoints(stream: &Stream, interval: Duration) -> Vec<Checkpoint> {
    let mut checkpoints = Vec::new();
    let mut renderer = Renderer::default();
    let mut cursor = 0;
    let mut time = interval;

    while time <= stream.duration() {
        let due = stream.count_until(time);
        for timed in stream.instructions().get(cursor..due).unwrap_or_default() {
            renderer.apply(&timed.instruction);
        }
        cursor = due;

        checkpoints.push(Checkpoint {
            cursor,
            renderer: renderer.clone(),
            time,
        });
        time += interval;
    }

    checkpoints
}
