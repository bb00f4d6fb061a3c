use crate::Error;
use cdg_core::Frame;
use std::path::Path;

/// Saves `frame` as a PNG.
///
/// # Errors
///
/// Returns an error if the frame buffer doesn't match its dimensions or if
/// writing the file fails.
pub fn save_png<P: AsRef<Path>>(frame: &Frame, path: P) -> Result<(), Error> {
    let img = image::ImageBuffer::<image::Rgba<u8>, Vec<u8>>::from_raw(
        frame.width,
        frame.height,
        frame.rgba.clone(),
    )
    .ok_or(Error::ImageCreate)?;

    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(Error::Image)?;

    Ok(())
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Test code")]
mod tests {
    use super::*;
    use core::time::Duration;

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let frame = Frame {
            height: 2,
            rgba: vec![0xFF; 3 * 2 * 4],
            timestamp: Duration::ZERO,
            width: 3,
        };

        save_png(&frame, &path).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
    }

    #[test]
    fn test_short_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let frame = Frame {
            height: 2,
            rgba: vec![0; 4],
            timestamp: Duration::ZERO,
            width: 3,
        };

        assert!(matches!(
            save_png(&frame, dir.path().join("frame.png")),
            Err(Error::ImageCreate)
        ));
    }
}
