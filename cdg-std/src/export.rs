//! JSON export of a loaded song and the player state.
//!
//! Meant for scripts and tooling (jq and friends) that want to look at a CDG
//! file without linking the decoder.

use cdg_core::{Observer, Player, PlayerState};
use serde::Serialize;
use std::collections::BTreeMap;

/// What the decoder found in the file.
#[derive(Debug, Default, Serialize)]
pub struct StreamSummary {
    pub duration_ms: u64,
    /// Instruction count by name
    pub instruction_counts: BTreeMap<&'static str, usize>,
    pub instructions: usize,
    pub packets: usize,
}

#[derive(Debug, Serialize)]
pub struct StateExport {
    pub state: PlayerState,
    pub stream: StreamSummary,
}

impl StateExport {
    #[must_use]
    pub fn new<O: Observer>(player: &Player<O>) -> Self {
        let stream = player
            .stream()
            .map(|stream| {
                let mut instruction_counts = BTreeMap::new();
                for timed in stream.instructions() {
                    *instruction_counts
                        .entry(timed.instruction.name())
                        .or_default() += 1;
                }

                StreamSummary {
                    duration_ms: u64::try_from(stream.duration().as_millis())
                        .unwrap_or(u64::MAX),
                    instruction_counts,
                    instructions: stream.instructions().len(),
                    packets: stream.packets(),
                }
            })
            .unwrap_or_default();

        Self {
            state: player.state(),
            stream,
        }
    }
}

/// Player state and stream summary as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails
pub fn export_state_json<O: Observer>(player: &Player<O>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&StateExport::new(player))
}

/// Same as [`export_state_json`] on a single line.
///
/// # Errors
///
/// Returns an error if JSON serialization fails
pub fn export_state_json_compact<O: Observer>(
    player: &Player<O>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&StateExport::new(player))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Test code")]
mod tests {
    use super::*;
    use cdg_core::{PACKET_SIZE, SongInfo};

    fn song() -> Vec<u8> {
        let mut bytes = vec![0; 600 * PACKET_SIZE];
        // memory preset then border preset
        bytes[0] = 0x09;
        bytes[1] = 1;
        bytes[PACKET_SIZE] = 0x09;
        bytes[PACKET_SIZE + 1] = 2;
        bytes
    }

    #[test]
    fn test_export_unloaded() {
        let player = Player::new(());
        let json = export_state_json(&player).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["stream"]["packets"], 0);
        assert_eq!(parsed["state"]["playing"], false);
    }

    #[test]
    fn test_export_loaded() {
        let mut player = Player::new(());
        let info = SongInfo {
            title: "Title".into(),
            ..SongInfo::default()
        };
        player.load_song(&song(), info).unwrap();

        let pretty = export_state_json(&player).unwrap();
        let compact = export_state_json_compact(&player).unwrap();
        assert!(compact.len() < pretty.len());

        let parsed: serde_json::Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(parsed["stream"]["packets"], 600);
        assert_eq!(parsed["stream"]["instructions"], 2);
        assert_eq!(parsed["stream"]["duration_ms"], 2000);
        assert_eq!(parsed["stream"]["instruction_counts"]["memory_preset"], 1);
        assert_eq!(parsed["state"]["title"], "Title");
        assert_eq!(parsed["state"]["duration_ms"], 2000);
    }
}
