//! Drives `PlayerThread` through its channel API.

#![expect(clippy::unwrap_used, reason = "Test code")]

use cdg_std::{ClockSource, Config, Error, Event, PlayerThread, SongInfo};
use std::{
    sync::mpsc::{Receiver, RecvTimeoutError},
    time::Duration,
};

const PACKET_SIZE: usize = 24;
const TIMEOUT: Duration = Duration::from_secs(5);

/// `packets` long song with a memory preset to `color` at the start.
fn song(packets: usize, color: u8) -> Vec<u8> {
    let mut bytes = vec![0; packets * PACKET_SIZE];
    bytes[0] = 0x09;
    bytes[1] = 1;
    bytes[4] = color;
    bytes
}

fn info() -> SongInfo {
    SongInfo {
        title: "Song".into(),
        ..SongInfo::default()
    }
}

fn config(clock_source: ClockSource) -> Config {
    Config {
        clock_source,
        tick_interval_ms: 5,
        ..Config::default()
    }
}

/// Receives until `done` matches, returns everything received.
fn recv_until(receiver: &Receiver<Event>, done: fn(&Event) -> bool) -> Vec<Event> {
    let mut events = Vec::new();
    loop {
        let event = receiver.recv_timeout(TIMEOUT).unwrap();
        let finished = done(&event);
        events.push(event);
        if finished {
            return events;
        }
    }
}

#[test]
fn test_load_emits_loaded_then_frame() {
    let thread = PlayerThread::new(&config(ClockSource::Internal)).unwrap();
    let events = thread.subscribe().unwrap();

    thread.load_song(&song(300, 1), info()).unwrap();

    let Event::Loaded(state) = events.recv_timeout(TIMEOUT).unwrap() else {
        panic!("expected loaded");
    };
    assert_eq!(state.title, "Song");
    assert_eq!(state.duration, Duration::from_secs(1));

    let Event::Frame(frame) = events.recv_timeout(TIMEOUT).unwrap() else {
        panic!("expected frame");
    };
    assert_eq!((frame.width, frame.height), (288, 192));
}

#[test]
fn test_empty_file_is_rejected() {
    let thread = PlayerThread::new(&Config::default()).unwrap();
    let err = thread.load_song(&[0x09; 23], info()).unwrap_err();
    assert!(matches!(err, Error::Cdg(_)));
}

#[test]
fn test_missing_file() {
    let thread = PlayerThread::new(&Config::default()).unwrap();
    let err = thread
        .load_path("/definitely/not/here.cdg", info())
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_load_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.cdg");
    std::fs::write(&path, song(30, 2)).unwrap();

    let thread = PlayerThread::new(&Config::default()).unwrap();
    thread.load_path(&path, info()).unwrap();
    assert_eq!(thread.state().unwrap().duration, Duration::from_millis(100));
}

#[test]
fn test_internal_clock_plays_to_end() {
    let thread = PlayerThread::new(&config(ClockSource::Internal)).unwrap();
    let events = thread.subscribe().unwrap();
    thread.load_song(&song(60, 3), info()).unwrap();
    thread.play().unwrap();

    let received = recv_until(&events, |event| matches!(event, Event::End(_)));

    assert!(received.iter().any(|event| matches!(event, Event::Play(_))));
    assert!(
        received
            .iter()
            .filter(|event| matches!(event, Event::Frame(_)))
            .count()
            > 1
    );

    let stop = received.len() - 2;
    assert!(matches!(received[stop], Event::Stop(_)));
    assert!(!thread.is_playing());

    // Nothing after the end
    assert_eq!(
        events.recv_timeout(Duration::from_millis(100)).unwrap_err(),
        RecvTimeoutError::Timeout
    );
}

#[test]
fn test_pause_halts_ticks() {
    let thread = PlayerThread::new(&config(ClockSource::Internal)).unwrap();
    let events = thread.subscribe().unwrap();
    thread.load_song(&song(3000, 1), info()).unwrap();
    thread.play().unwrap();

    recv_until(&events, |event| matches!(event, Event::Frame(f) if !f.timestamp.is_zero()));
    thread.pause().unwrap();
    assert!(thread.is_paused());

    let paused_at = recv_until(&events, |event| matches!(event, Event::Pause(_)));
    let Some(Event::Pause(state)) = paused_at.last() else {
        panic!("expected pause");
    };
    let position = state.current_time;

    assert_eq!(
        events.recv_timeout(Duration::from_millis(100)).unwrap_err(),
        RecvTimeoutError::Timeout
    );
    assert_eq!(thread.state().unwrap().current_time, position);

    thread.play().unwrap();
    recv_until(&events, |event| matches!(event, Event::Frame(_)));
    thread.stop().unwrap();
    recv_until(&events, |event| matches!(event, Event::Stop(_)));
    assert_eq!(thread.state().unwrap().current_time, Duration::ZERO);
}

#[test]
fn test_external_clock_follows_audio() {
    let thread = PlayerThread::new(&config(ClockSource::External)).unwrap();
    assert_eq!(thread.clock_source(), ClockSource::External);

    let events = thread.subscribe().unwrap();
    thread.load_song(&song(3000, 1), info()).unwrap();
    thread.play().unwrap();
    recv_until(&events, |event| matches!(event, Event::Play(_)));

    // The thread doesn't tick on its own
    assert_eq!(
        events.recv_timeout(Duration::from_millis(100)).unwrap_err(),
        RecvTimeoutError::Timeout
    );

    thread
        .sync_to_audio_time(Duration::from_millis(500))
        .unwrap();
    assert_eq!(
        thread.state().unwrap().current_time,
        Duration::from_millis(500)
    );

    thread.sync_to_audio_time(Duration::from_secs(10)).unwrap();
    recv_until(&events, |event| matches!(event, Event::End(_)));
}

#[test]
fn test_seek() {
    let thread = PlayerThread::new(&config(ClockSource::External)).unwrap();
    let events = thread.subscribe().unwrap();
    thread.load_song(&song(3000, 1), info()).unwrap();

    thread.seek(Duration::from_secs(4)).unwrap();
    let received = recv_until(&events, |event| matches!(event, Event::Seek(_)));
    let Some(Event::Seek(state)) = received.last() else {
        panic!("expected seek");
    };
    assert_eq!(state.current_time, Duration::from_secs(4));
    assert_eq!(thread.frame().unwrap().timestamp, Duration::from_secs(4));
}

#[test]
fn test_exit() {
    let mut thread = PlayerThread::new(&Config::default()).unwrap();
    thread.exit().unwrap();
    assert!(matches!(thread.exit(), Err(Error::NoThreadRunning)));
}
