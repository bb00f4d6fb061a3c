use core::{error, fmt};
use fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    EmptyStream { len: usize },
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyStream { len } => write!(
                f,
                "no complete CDG packet in stream: got {len} bytes, a packet is {} bytes",
                crate::PACKET_SIZE
            ),
        }
    }
}

impl error::Error for Error {}
