use crate::{
    Instruction, PACKET_SIZE,
    timing::{packet_time, stream_duration},
};
use alloc::vec::Vec;
use core::time::Duration;

/// An instruction together with the packet it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimedInstruction {
    pub instruction: Instruction,
    pub packet: usize,
    pub time: Duration,
}

/// A decoded CDG file.
#[derive(Clone, Debug, Default)]
pub struct Stream {
    duration: Duration,
    // Sorted by time, only packets that produced an instruction
    instructions: Vec<TimedInstruction>,
    packets: usize,
}

impl Stream {
    #[must_use]
    #[inline]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    #[inline]
    pub fn instructions(&self) -> &[TimedInstruction] {
        &self.instructions
    }

    /// Number of instructions with a timestamp at or before `time`.
    #[must_use]
    #[inline]
    pub fn count_until(&self, time: Duration) -> usize {
        self.instructions.partition_point(|timed| timed.time <= time)
    }

    /// Number of whole packets in the file, including the ones that didn't
    /// decode to an instruction.
    #[must_use]
    #[inline]
    pub const fn packets(&self) -> usize {
        self.packets
    }
}

/// Splits `bytes` into packets and decodes every graphics instruction.
///
/// Decoding can't fail: packets for other subcode channels and unknown
/// opcodes are skipped and a trailing partial packet is dropped.
#[must_use]
#[inline]
pub fn decode(bytes: &[u8]) -> Stream {
    let chunks = bytes.chunks_exact(PACKET_SIZE);
    let packets = chunks.len();

    let instructions: Vec<_> = chunks
        .enumerate()
        .filter_map(|(packet, chunk)| {
            let chunk: &[u8; PACKET_SIZE] = chunk.try_into().ok()?;
            Instruction::from_packet(chunk).map(|instruction| TimedInstruction {
                instruction,
                packet,
                time: packet_time(packet),
            })
        })
        .collect();

    tracing::debug!(
        packets,
        instructions = instructions.len(),
        skipped = packets - instructions.len(),
        trailing_bytes = bytes.len() % PACKET_SIZE,
        "decoded CDG stream"
    );

    Stream {
        duration: stream_duration(bytes.len()),
        instructions,
        packets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::tests::{border_preset, memory_preset, packet};

    fn concat(packets: &[[u8; PACKET_SIZE]]) -> Vec<u8> {
        packets.iter().flatten().copied().collect()
    }

    #[test]
    fn test_empty_input() {
        let stream = decode(&[]);
        assert_eq!(stream.packets(), 0);
        assert!(stream.instructions().is_empty());
        assert_eq!(stream.duration(), Duration::ZERO);
    }

    #[test]
    fn test_skipped_packets_keep_their_slot() {
        let mut other_channel = memory_preset(3, 0);
        other_channel[0] = 0x3F;

        let bytes = concat(&[
            memory_preset(1, 0),
            [0; PACKET_SIZE],
            other_channel,
            packet(0x05, &[]),
            border_preset(2),
        ]);

        let stream = decode(&bytes);
        assert_eq!(stream.packets(), 5);
        assert_eq!(stream.instructions().len(), 2);

        let last = stream.instructions()[1];
        assert_eq!(last.packet, 4);
        assert_eq!(last.time, packet_time(4));
        assert_eq!(last.instruction, Instruction::BorderPreset { color: 2 });
    }

    #[test]
    fn test_duration_ignores_trailing_bytes() {
        let mut bytes = vec![0; 300 * PACKET_SIZE];
        bytes.extend_from_slice(&[0x09; 10]);

        let stream = decode(&bytes);
        assert_eq!(stream.packets(), 300);
        assert_eq!(stream.duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_count_until() {
        let bytes = concat(&[
            memory_preset(1, 0),
            memory_preset(1, 1),
            [0; PACKET_SIZE],
            border_preset(2),
        ]);

        let stream = decode(&bytes);
        assert_eq!(stream.count_until(Duration::ZERO), 1);
        assert_eq!(stream.count_until(packet_time(2)), 2);
        assert_eq!(stream.count_until(packet_time(3)), 3);
        assert_eq!(stream.count_until(Duration::from_secs(10)), 3);
    }
}
