#[derive(Debug)]
pub enum Error {
    Cdg(cdg_core::Error),
    Config(serde_json::Error),
    #[cfg(feature = "screenshot")]
    Image(image::ImageError),
    ImageCreate,
    Io(std::io::Error),
    NoThreadRunning,
    ThreadJoin,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Cdg(err) => Some(err),
            Self::Config(err) => Some(err),
            #[cfg(feature = "screenshot")]
            Self::Image(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::ImageCreate | Self::NoThreadRunning | Self::ThreadJoin => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cdg(err) => write!(f, "cdg error: {err}"),
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            #[cfg(feature = "screenshot")]
            Self::Image(err) => write!(f, "image error: {err}"),
            Self::ImageCreate => write!(f, "failed to create image"),
            Self::Io(err) => write!(f, "os error: {err}"),
            Self::NoThreadRunning => write!(f, "no thread running"),
            Self::ThreadJoin => write!(f, "thread join error"),
        }
    }
}

impl From<cdg_core::Error> for Error {
    fn from(err: cdg_core::Error) -> Self {
        Self::Cdg(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
