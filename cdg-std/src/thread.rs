use crate::{Broadcast, ClockSource, Config, Error};
use cdg_core::{Event, Frame, Player, PlayerState, SongInfo};
use core::sync::atomic::{AtomicBool, Ordering::Relaxed};
use std::{
    path::Path,
    sync::{Arc, Condvar, Mutex, MutexGuard, mpsc::Receiver},
    thread::JoinHandle,
    time::{Duration, Instant},
};
use thread_priority::ThreadBuilderExt;

type Shared = Arc<(Mutex<Player<Broadcast>>, Condvar)>;

/// A [`Player`] clocked by a dedicated thread.
///
/// With [`ClockSource::Internal`] the thread ticks the player every tick
/// interval while it plays. With [`ClockSource::External`] the thread stays
/// asleep and song time only moves through
/// [`PlayerThread::sync_to_audio_time`].
///
/// Every call locks the player, so host calls and ticks never interleave.
pub struct PlayerThread {
    clock_source: ClockSource,
    exiting: Arc<AtomicBool>,
    // Time zero for every `now` passed to the player
    origin: Instant,
    shared: Shared,
    thread_handle: Option<JoinHandle<()>>,
}

impl PlayerThread {
    #[must_use]
    pub const fn clock_source(&self) -> ClockSource {
        self.clock_source
    }

    /// Stops the thread and waits for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if no thread is running or if joining the thread fails.
    pub fn exit(&mut self) -> Result<(), Error> {
        self.exiting.store(true, Relaxed);

        // Wake the thread up so it sees the flag
        let (lock, cvar) = &*self.shared;
        if let Ok(_player) = lock.lock() {
            cvar.notify_one();
        }

        self.thread_handle
            .take()
            .ok_or(Error::NoThreadRunning)?
            .join()
            .map_err(|_e| Error::ThreadJoin)?;

        tracing::debug!("player thread exited");
        Ok(())
    }

    /// Snapshot of the screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the player thread panicked.
    pub fn frame(&self) -> Result<Frame, Error> {
        self.player().map(|player| player.frame())
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.player().is_ok_and(|player| player.is_playing())
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.player().is_ok_and(|player| player.is_paused())
    }

    /// Reads `path` and loads it as the current song.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or holds no CDG packet.
    pub fn load_path<P: AsRef<Path>>(&self, path: P, info: SongInfo) -> Result<(), Error> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(Error::Io)?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "read CDG file");
        self.load_song(&data, info)
    }

    /// # Errors
    ///
    /// Returns an error if `data` holds no CDG packet.
    pub fn load_song(&self, data: &[u8], info: SongInfo) -> Result<(), Error> {
        self.player()?.load_song(data, info).map_err(Error::Cdg)
    }

    /// Spawns the player thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread can't be spawned.
    pub fn new(config: &Config) -> Result<Self, Error> {
        fn player_loop(
            shared: &Shared,
            exiting: &AtomicBool,
            origin: Instant,
            tick_interval: Duration,
            clock_source: ClockSource,
        ) {
            let (lock, cvar) = &**shared;

            loop {
                let Ok(mut player) = lock.lock() else {
                    return;
                };

                while !exiting.load(Relaxed)
                    && (clock_source == ClockSource::External || !player.is_running())
                {
                    if let Ok(woken) = cvar.wait(player) {
                        player = woken;
                    } else {
                        return; // Poisoned
                    }
                }

                if exiting.load(Relaxed) {
                    break;
                }

                let start = origin.elapsed();
                player.tick(start);
                drop(player);

                let elapsed = origin.elapsed().saturating_sub(start);
                if elapsed < tick_interval {
                    spin_sleep::sleep(tick_interval - elapsed);
                }
            }
        }

        let player = Player::with_options(Broadcast::default(), config.player_options());
        let shared = Arc::new((Mutex::new(player), Condvar::new()));
        let exiting = Arc::new(AtomicBool::new(false));
        let origin = Instant::now();
        let clock_source = config.clock_source;
        let tick_interval = config.tick_interval();

        let thread_builder = std::thread::Builder::new().name("cdg_player".to_owned());
        let thread_handle = {
            let shared = Arc::clone(&shared);
            let exiting = Arc::clone(&exiting);

            thread_builder.spawn_with_priority(thread_priority::ThreadPriority::Max, move |_| {
                player_loop(&shared, &exiting, origin, tick_interval, clock_source);
            })?
        };

        tracing::debug!(
            ?clock_source,
            tick_interval_ms = tick_interval.as_millis(),
            "player thread started"
        );

        Ok(Self {
            clock_source,
            exiting,
            origin,
            shared,
            thread_handle: Some(thread_handle),
        })
    }

    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    /// # Errors
    ///
    /// Returns an error if the player thread panicked.
    pub fn pause(&self) -> Result<(), Error> {
        let now = self.now();
        self.player()?.pause(now);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the player thread panicked.
    pub fn play(&self) -> Result<(), Error> {
        let now = self.now();
        let (_, cvar) = &*self.shared;
        self.player()?.play(now);
        cvar.notify_one();
        Ok(())
    }

    fn player(&self) -> Result<MutexGuard<'_, Player<Broadcast>>, Error> {
        let (lock, _) = &*self.shared;
        lock.lock().map_err(|_err| Error::NoThreadRunning)
    }

    /// Saves a PNG of the current frame to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the player thread panicked, if creating the image
    /// fails or if writing the file fails.
    #[cfg(feature = "screenshot")]
    pub fn save_screenshot<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        // Build the frame first so the lock is released before encoding
        let frame = self.frame()?;
        crate::screenshot::save_png(&frame, path)
    }

    /// # Errors
    ///
    /// Returns an error if the player thread panicked.
    pub fn seek(&self, target: Duration) -> Result<(), Error> {
        let now = self.now();
        self.player()?.seek(target, now);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the player thread panicked.
    pub fn state(&self) -> Result<PlayerState, Error> {
        self.player().map(|player| player.state())
    }

    /// # Errors
    ///
    /// Returns an error if the player thread panicked.
    pub fn stop(&self) -> Result<(), Error> {
        self.player()?.stop();
        Ok(())
    }

    /// Registers a new event receiver.
    ///
    /// # Errors
    ///
    /// Returns an error if the player thread panicked.
    pub fn subscribe(&self) -> Result<Receiver<Event>, Error> {
        self.player().map(|mut player| player.observer_mut().subscribe())
    }

    /// # Errors
    ///
    /// Returns an error if the player thread panicked.
    pub fn sync_to_audio_time(&self, audio_time: Duration) -> Result<(), Error> {
        let now = self.now();
        self.player()?.sync_to_audio_time(audio_time, now);
        Ok(())
    }
}

impl Drop for PlayerThread {
    fn drop(&mut self) {
        if self.thread_handle.is_some()
            && let Err(err) = self.exit()
        {
            tracing::error!(%err, "error exiting player thread");
        }
    }
}
