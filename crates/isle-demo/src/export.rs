//! PNG export of debug images.

use std::io::Cursor;
use std::path::Path;

use isle_terrain::debug_viz::DebugImage;

/// Errors that can occur while exporting an image.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The PNG encoder rejected the image.
    #[error("failed to encode png: {0}")]
    Encode(#[from] png::EncodingError),

    /// Writing the file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Nothing was painted, so there is no image to write.
    #[error("no tiles were painted")]
    Empty,
}

/// Encode an RGBA image as an 8-bit PNG.
pub fn encode_png(image: &DebugImage) -> Result<Vec<u8>, ExportError> {
    let mut png_buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(Cursor::new(&mut png_buf), image.width, image.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&image.pixels)?;
    }
    Ok(png_buf)
}

/// Encode `image` and write it to `path`, creating parent directories.
pub fn write_png(path: &Path, image: &DebugImage) -> Result<(), ExportError> {
    let bytes = encode_png(image)?;
    let write_err = |source| ExportError::Write {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, bytes).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> DebugImage {
        let mut image = DebugImage::new(3, 2);
        image.set_pixel(0, 0, [255, 0, 0, 255]);
        image.set_pixel(2, 1, [0, 0, 255, 255]);
        image
    }

    #[test]
    fn test_encode_produces_decodable_png() {
        let bytes = encode_png(&checker()).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        let decoder = png::Decoder::new(Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!((info.width, info.height), (3, 2));
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert_eq!(&buf[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_write_png_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps").join("isle.png");
        write_png(&path, &checker()).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 8);
    }

    #[test]
    fn test_write_png_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let err = write_png(&blocker.join("isle.png"), &checker()).unwrap_err();
        assert!(
            matches!(err, ExportError::Write { .. }),
            "unexpected error {err}"
        );
    }
}
