//! PNG output and file path generation

use image::imageops::FilterType;
use image::RgbaImage;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name used when the output argument is a directory.
pub const DEFAULT_FILE_NAME: &str = "render";

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Save an RGBA image to a PNG file, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// Returns the image unchanged for factors of 0 or 1.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    let new_w = w * factor as u32;
    let new_h = h * factor as u32;
    image::imageops::resize(&image, new_w, new_h, FilterType::Nearest)
}

/// Crop away fully transparent rows and columns.
///
/// An image with no visible pixels is returned unchanged.
pub fn trim_transparent(image: RgbaImage) -> RgbaImage {
    let (w, h) = image.dimensions();
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    match bounds {
        Some((x0, y0, x1, y1)) if (x0, y0, x1, y1) != (0, 0, w - 1, h - 1) => {
            image::imageops::crop_imm(&image, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image()
        }
        _ => image,
    }
}

/// Surround the image with `padding` transparent pixels on every side.
pub fn pad_image(image: RgbaImage, padding: u32) -> RgbaImage {
    if padding == 0 {
        return image;
    }
    let (w, h) = image.dimensions();
    let mut padded = RgbaImage::new(w + padding * 2, h + padding * 2);
    image::imageops::overlay(&mut padded, &image, i64::from(padding), i64::from(padding));
    padded
}

/// Replace path separators and `:` in a user supplied file name.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars().map(|c| if matches!(c, '\\' | '/' | ':') { '_' } else { c }).collect()
}

fn has_png_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// Hands out output paths for each rendered pose.
///
/// # Output Naming Rules
///
/// | Scenario | Output |
/// |----------|--------|
/// | Single pose, `out.png` | `out.png` |
/// | Single pose, existing directory `dir` | `dir/render.png` |
/// | Single pose, `out` | `out.png` |
/// | Multiple poses or `--increment` | `{prefix}.{n}.png` |
/// | Pose with an explicit name | `{name}.png` next to the output |
///
/// Numbered names skip paths already handed out in this run, and with
/// `--increment` also paths that exist on disk. With `--increment` numbering
/// starts at the first index whose file does not exist.
#[derive(Debug)]
pub struct OutputNamer {
    out: PathBuf,
    multi_pose: bool,
    increment: bool,
    start: usize,
    used: HashSet<PathBuf>,
}

impl OutputNamer {
    pub fn new(out: PathBuf, multi_pose: bool, increment: bool) -> Self {
        let mut namer = Self { out, multi_pose, increment, start: 0, used: HashSet::new() };
        if increment {
            let prefix = namer.numbered_prefix(&namer.out);
            namer.start = (0..).find(|n| !numbered(&prefix, *n).exists()).unwrap_or(0);
        }
        namer
    }

    /// Folder explicit file names are written to.
    pub fn output_dir(&self) -> PathBuf {
        if self.out.is_dir() {
            self.out.clone()
        } else {
            self.out.parent().map(Path::to_path_buf).unwrap_or_default()
        }
    }

    fn numbered_prefix(&self, base: &Path) -> PathBuf {
        if has_png_extension(base) {
            let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or(DEFAULT_FILE_NAME);
            base.with_file_name(stem)
        } else if base.is_dir() {
            base.join(DEFAULT_FILE_NAME)
        } else {
            base.to_path_buf()
        }
    }

    fn single_path(&self) -> PathBuf {
        if has_png_extension(&self.out) {
            self.out.clone()
        } else if self.out.is_dir() {
            self.out.join(format!("{}.png", DEFAULT_FILE_NAME))
        } else {
            let mut name = self.out.clone().into_os_string();
            name.push(".png");
            PathBuf::from(name)
        }
    }

    fn next_numbered(&self, prefix: &Path, index: usize) -> PathBuf {
        let mut n = self.start + index;
        loop {
            let candidate = numbered(prefix, n);
            if !self.used.contains(&candidate) && !(self.increment && candidate.exists()) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Claim the path for the pose at `index`, optionally named explicitly.
    pub fn claim(&mut self, index: usize, explicit: Option<&str>) -> PathBuf {
        let path = match explicit {
            Some(name) => {
                let mut file_name = sanitize_file_name(name);
                if !file_name.to_ascii_lowercase().ends_with(".png") {
                    file_name.push_str(".png");
                }
                let path = self.output_dir().join(file_name);
                if self.used.contains(&path) || (self.increment && path.exists()) {
                    let prefix = self.numbered_prefix(&path);
                    self.next_numbered(&prefix, index)
                } else {
                    path
                }
            }
            None if !self.multi_pose && !self.increment => self.single_path(),
            None => {
                let prefix = self.numbered_prefix(&self.out);
                self.next_numbered(&prefix, index)
            }
        };
        self.used.insert(path.clone());
        path
    }
}

fn numbered(prefix: &Path, n: usize) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(format!(".{}.png", n));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_single_pose_names() {
        let mut namer = OutputNamer::new(PathBuf::from("/nowhere/norn.png"), false, false);
        assert_eq!(namer.claim(0, None), PathBuf::from("/nowhere/norn.png"));

        let mut namer = OutputNamer::new(PathBuf::from("/nowhere/norn"), false, false);
        assert_eq!(namer.claim(0, None), PathBuf::from("/nowhere/norn.png"));
    }

    #[test]
    fn test_single_pose_into_directory() {
        let dir = tempdir().unwrap();
        let mut namer = OutputNamer::new(dir.path().to_path_buf(), false, false);
        assert_eq!(namer.claim(0, None), dir.path().join("render.png"));
    }

    #[test]
    fn test_multiple_poses_are_numbered() {
        let mut namer = OutputNamer::new(PathBuf::from("/nowhere/norn.png"), true, false);
        assert_eq!(namer.claim(0, None), PathBuf::from("/nowhere/norn.0.png"));
        assert_eq!(namer.claim(1, None), PathBuf::from("/nowhere/norn.1.png"));
        assert_eq!(namer.claim(2, None), PathBuf::from("/nowhere/norn.2.png"));
    }

    #[test]
    fn test_numbering_skips_names_used_this_run() {
        let mut namer = OutputNamer::new(PathBuf::from("/nowhere/norn"), true, false);
        assert_eq!(namer.claim(1, None), PathBuf::from("/nowhere/norn.1.png"));
        assert_eq!(namer.claim(0, None), PathBuf::from("/nowhere/norn.0.png"));
        assert_eq!(namer.claim(0, None), PathBuf::from("/nowhere/norn.2.png"));
    }

    #[test]
    fn test_increment_starts_after_existing_files() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("norn.0.png"), b"").unwrap();
        std::fs::write(dir.path().join("norn.1.png"), b"").unwrap();
        std::fs::write(dir.path().join("norn.3.png"), b"").unwrap();

        let mut namer = OutputNamer::new(dir.path().join("norn.png"), false, true);
        assert_eq!(namer.claim(0, None), dir.path().join("norn.2.png"));
        assert_eq!(namer.claim(1, None), dir.path().join("norn.4.png"));
    }

    #[test]
    fn test_increment_into_directory() {
        let dir = tempdir().unwrap();
        let mut namer = OutputNamer::new(dir.path().to_path_buf(), false, true);
        assert_eq!(namer.claim(0, None), dir.path().join("render.0.png"));
    }

    #[test]
    fn test_explicit_names() {
        let mut namer = OutputNamer::new(PathBuf::from("/nowhere/out.png"), true, false);
        assert_eq!(namer.claim(0, Some("front")), PathBuf::from("/nowhere/front.png"));
        assert_eq!(namer.claim(1, Some("a/b:c.PNG")), PathBuf::from("/nowhere/a_b_c.PNG"));
        // A repeated explicit name falls back to numbering
        assert_eq!(namer.claim(2, Some("front")), PathBuf::from("/nowhere/front.2.png"));
    }

    #[test]
    fn test_explicit_name_with_increment_avoids_existing() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("side.png"), b"").unwrap();
        let mut namer = OutputNamer::new(dir.path().join("out.png"), false, true);
        assert_eq!(namer.claim(0, Some("side")), dir.path().join("side.0.png"));
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name(r"a\b/c:d"), "a_b_c_d");
        assert_eq!(sanitize_file_name("plain name"), "plain name");
    }

    #[test]
    fn test_save_png_basic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.png");

        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        image.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        image.put_pixel(1, 1, Rgba([0, 0, 0, 0]));

        let result = save_png(&image, &path);
        assert!(result.is_ok());
        assert!(path.exists());

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (2, 2));
        assert_eq!(*loaded.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*loaded.get_pixel(1, 1), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_save_png_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dirs/test.png");

        let result = save_png(&RgbaImage::new(1, 1), &path);
        assert!(result.is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_save_png_reports_io_error() {
        use std::error::Error as _;

        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("blocker"), b"file").unwrap();
        let path = dir.path().join("blocker/nested/test.png");

        let err = save_png(&RgbaImage::new(1, 1), &path).unwrap_err();
        assert!(matches!(err, OutputError::Io(_)));
        assert!(err.to_string().starts_with("IO error: "), "{}", err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_scale_image_factor_one_returns_original() {
        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        let scaled = scale_image(image, 1);
        assert_eq!(scaled.dimensions(), (2, 2));
        assert_eq!(*scaled.get_pixel(1, 0), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_scale_image_factor_two() {
        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 1, Rgba([255, 255, 0, 255]));

        let scaled = scale_image(image, 2);
        assert_eq!(scaled.dimensions(), (4, 4));
        assert_eq!(*scaled.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*scaled.get_pixel(3, 3), Rgba([255, 255, 0, 255]));
        assert_eq!(*scaled.get_pixel(2, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_trim_transparent() {
        let mut image = RgbaImage::new(10, 8);
        image.put_pixel(3, 2, Rgba([1, 2, 3, 255]));
        image.put_pixel(5, 6, Rgba([1, 2, 3, 10]));
        let trimmed = trim_transparent(image);
        assert_eq!(trimmed.dimensions(), (3, 5));
        assert_eq!(*trimmed.get_pixel(0, 0), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_trim_empty_image_is_unchanged() {
        let trimmed = trim_transparent(RgbaImage::new(4, 4));
        assert_eq!(trimmed.dimensions(), (4, 4));
    }

    #[test]
    fn test_pad_image() {
        let mut image = RgbaImage::new(1, 1);
        image.put_pixel(0, 0, Rgba([9, 9, 9, 255]));
        let padded = pad_image(image, 3);
        assert_eq!(padded.dimensions(), (7, 7));
        assert_eq!(*padded.get_pixel(3, 3), Rgba([9, 9, 9, 255]));
        assert_eq!(*padded.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    }
}
