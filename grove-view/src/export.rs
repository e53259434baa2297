use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

/// Encodes rendered frames as a looping GIF at `fps` frames per second.
pub fn write_gif(path: &Path, frames: Vec<RgbaImage>, fps: u32) -> Result<()> {
    anyhow::ensure!(!frames.is_empty(), "no frames to encode");
    let fps = fps.max(1);

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_numer_denom_ms(1000, fps);
    encoder.encode_frames(
        frames
            .into_iter()
            .map(move |img| Frame::from_parts(img, 0, 0, delay)),
    )?;
    Ok(())
}

/// Writes frames as `frame_0000.png`, `frame_0001.png`, ... under `dir`,
/// creating it first.
pub fn save_frames(dir: &Path, frames: &[RgbaImage]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    for (i, frame) in frames.iter().enumerate() {
        let path = dir.join(format!("frame_{i:04}.png"));
        frame
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

/// Re-encodes a directory of numbered still images as a GIF.
///
/// Files are ordered by the first digit run in their name, compared
/// numerically, so `frame_2` precedes `frame_10`. Files without a digit run
/// are skipped with a warning.
pub fn write_gif_from_dir(dir: &Path, out: &Path, fps: u32) -> Result<()> {
    let mut numbered: Vec<(u64, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        match frame_index(name) {
            Some(number) => numbered.push((number, path)),
            None => log::warn!("skipping {}: no frame number in name", path.display()),
        }
    }
    anyhow::ensure!(!numbered.is_empty(), "no numbered frames in {}", dir.display());
    numbered.sort_by_key(|(number, _)| *number);

    let mut frames = Vec::with_capacity(numbered.len());
    for (_, path) in &numbered {
        let img = image::open(path).with_context(|| format!("reading {}", path.display()))?;
        frames.push(img.to_rgba8());
    }
    write_gif(out, frames, fps)
}

/// First run of ASCII digits in a file name, taken as its frame number.
fn frame_index(name: &str) -> Option<u64> {
    let digits: String = name
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::io::BufReader;

    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Rgba};

    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("grove-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn solid(color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(2, 2, Rgba(color))
    }

    #[test]
    fn frame_numbers_come_from_the_first_digit_run() {
        assert_eq!(frame_index("frame_2.png"), Some(2));
        assert_eq!(frame_index("frame_0010.png"), Some(10));
        assert_eq!(frame_index("10.png"), Some(10));
        assert_eq!(frame_index("v2_frame_10.png"), Some(2));
        assert_eq!(frame_index("cover.png"), None);
    }

    #[test]
    fn written_gif_carries_the_gif_signature() {
        let dir = scratch_dir("gif");
        let path = dir.join("out.gif");
        let frames = vec![solid([255, 0, 0, 255]), solid([0, 255, 0, 255])];

        write_gif(&path, frames, 30).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"GIF8"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_frame_lists_are_rejected() {
        let dir = scratch_dir("gif-empty");
        let path = dir.join("out.gif");
        assert!(write_gif(&path, Vec::new(), 30).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn saved_frames_reencode_in_numeric_order() {
        let dir = scratch_dir("stills");
        solid([255, 0, 0, 255]).save(dir.join("frame_2.png")).unwrap();
        solid([0, 255, 0, 255]).save(dir.join("frame_10.png")).unwrap();
        solid([0, 0, 255, 255]).save(dir.join("frame_1.png")).unwrap();
        fs::write(dir.join("notes.txt"), "not a frame").unwrap();

        let out = dir.join("out.gif");
        write_gif_from_dir(&dir, &out, 10).unwrap();

        // Numeric order is 1, 2, 10 (blue, red, green), not the lexical
        // 1, 10, 2. Quantization may nudge channel values, so compare the
        // dominant channel per frame rather than exact colors.
        let decoder = GifDecoder::new(BufReader::new(File::open(&out).unwrap())).unwrap();
        let decoded = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(decoded.len(), 3);
        let dominant: Vec<usize> = decoded
            .iter()
            .map(|frame| {
                let px = frame.buffer().get_pixel(0, 0).0;
                (0..3).max_by_key(|&i| px[i]).unwrap()
            })
            .collect();
        assert_eq!(dominant, vec![2, 0, 1]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn save_frames_uses_zero_padded_names() {
        let dir = scratch_dir("dump");
        let frames = vec![solid([9, 9, 9, 255]); 3];
        save_frames(&dir, &frames).unwrap();
        for i in 0..3 {
            assert!(dir.join(format!("frame_{i:04}.png")).is_file());
        }
        fs::remove_dir_all(&dir).unwrap();
    }
}
