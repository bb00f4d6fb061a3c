use core::time::Duration;

pub const PACKET_SIZE: usize = 24;
pub const PACKETS_PER_SEC: u64 = 300;

// Cadence of the free running clock, roughly 30 frames per second
pub const TICK_INTERVAL: Duration = Duration::from_millis(33);
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);
// Audio jumping back further than this is a scrub, not jitter
pub const RESEEK_THRESHOLD: Duration = Duration::from_millis(1000);

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Nominal presentation time of the packet at `index`.
///
/// CDG carries no timestamps, packets are delivered at a fixed rate so the
/// position in the stream is the time.
#[must_use]
#[inline]
pub const fn packet_time(index: usize) -> Duration {
    Duration::from_nanos((index as u64).saturating_mul(NANOS_PER_SEC) / PACKETS_PER_SEC)
}

/// Playing time of a stream `len` bytes long, a trailing partial packet
/// doesn't count.
#[must_use]
#[inline]
pub const fn stream_duration(len: usize) -> Duration {
    packet_time(len / PACKET_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_second_of_packets() {
        assert_eq!(stream_duration(300 * PACKET_SIZE), Duration::from_secs(1));
    }

    #[test]
    fn test_half_second_of_packets() {
        assert_eq!(stream_duration(150 * PACKET_SIZE), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_packet_is_dropped() {
        assert_eq!(
            stream_duration(300 * PACKET_SIZE + 10),
            Duration::from_secs(1)
        );
        assert_eq!(stream_duration(PACKET_SIZE - 1), Duration::ZERO);
    }

    #[test]
    fn test_packet_time_is_monotonic() {
        assert_eq!(packet_time(0), Duration::ZERO);
        assert_eq!(packet_time(3), Duration::from_millis(10));
        assert!(packet_time(1) < packet_time(2));
    }
}
