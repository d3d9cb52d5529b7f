use super::mapper::GradientMapper;
use crate::error::{Error, Result};
use crate::models::StopList;
use image::{DynamicImage, RgbImage};
use rayon::prelude::*;
use std::path::Path;

/// Single-channel luminance in [0, 1], row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct LuminancePlane {
    width: u32,
    height: u32,
    values: Vec<f64>,
}

impl LuminancePlane {
    /// Reduces any image to 8-bit ITU-R 601-2 luma scaled to [0, 1]. Alpha is
    /// dropped.
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let values = rgb
            .pixels()
            .map(|p| luma_601(p.0) as f64 / 255.0)
            .collect();
        LuminancePlane {
            width,
            height,
            values,
        }
    }

    /// Wraps precomputed values. Returns `None` if the length does not match.
    pub fn from_values(width: u32, height: u32, values: Vec<f64>) -> Option<Self> {
        (values.len() == width as usize * height as usize).then_some(LuminancePlane {
            width,
            height,
            values,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// `L = R*299/1000 + G*587/1000 + B*114/1000` in 16-bit fixed point, rounded.
fn luma_601([r, g, b]: [u8; 3]) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

/// Applies a gradient to every pixel of an image.
#[derive(Debug)]
pub struct ImageRecolorer {
    mapper: GradientMapper,
}

impl ImageRecolorer {
    /// Fails with `EmptyGradient` when the list has fewer than two stops.
    pub fn new(stops: &StopList, invert: bool) -> Result<Self> {
        let mapper = GradientMapper::new(stops, invert)?;
        for warning in mapper.degenerate_segments() {
            tracing::warn!("{}", warning);
        }
        Ok(ImageRecolorer { mapper })
    }

    pub fn mapper(&self) -> &GradientMapper {
        &self.mapper
    }

    pub fn recolor(&self, image: &DynamicImage) -> RgbImage {
        self.recolor_plane(&LuminancePlane::from_image(image))
    }

    /// Maps each luminance value independently; rows are filled in parallel.
    pub fn recolor_plane(&self, plane: &LuminancePlane) -> RgbImage {
        let (width, height) = plane.dimensions();
        let mut out = RgbImage::new(width, height);
        if width == 0 || height == 0 {
            return out;
        }

        let row_len = width as usize;
        let buffer: &mut [u8] = &mut out;
        buffer
            .par_chunks_mut(row_len * 3)
            .zip(plane.values().par_chunks(row_len))
            .for_each(|(dst, src)| {
                for (px, &t) in dst.chunks_exact_mut(3).zip(src) {
                    px.copy_from_slice(&self.mapper.colour_at(t).to_array());
                }
            });
        out
    }

    /// Decodes the image at `path` and recolours it.
    pub fn recolor_path<P: AsRef<Path>>(&self, path: P) -> Result<RgbImage> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            "Recolouring {:?} ({}x{})",
            path,
            image.width(),
            image.height()
        );
        Ok(self.recolor(&image))
    }
}

/// Recolours `image` with `stops` in one call.
pub fn recolor_image(image: &DynamicImage, stops: &StopList, invert: bool) -> Result<RgbImage> {
    Ok(ImageRecolorer::new(stops, invert)?.recolor(image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Colour, PositionMode};
    use image::{GrayImage, Luma, Rgb};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use tempfile::TempDir;

    fn black_to_white() -> StopList {
        StopList::from_lines(["#000000", "#FFFFFF"], PositionMode::Uniform)
    }

    #[test]
    fn test_luminance_plane_mapping() {
        let plane = LuminancePlane::from_values(2, 2, vec![0.0, 0.25, 0.5, 0.75]).unwrap();
        let out = ImageRecolorer::new(&black_to_white(), false)
            .unwrap()
            .recolor_plane(&plane);
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(out.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(out.get_pixel(1, 0), &Rgb([63, 63, 63]));
        assert_eq!(out.get_pixel(0, 1), &Rgb([127, 127, 127]));
        assert_eq!(out.get_pixel(1, 1), &Rgb([191, 191, 191]));
    }

    #[test]
    fn test_plane_length_must_match() {
        assert!(LuminancePlane::from_values(3, 2, vec![0.0; 5]).is_none());
        assert!(LuminancePlane::from_values(0, 0, Vec::new()).is_some());
    }

    #[test]
    fn test_parallel_output_matches_per_pixel_mapping() {
        let (width, height) = (97u32, 61u32);
        let mut rng = StdRng::seed_from_u64(42);
        let values: Vec<f64> = (0..width * height).map(|_| rng.random_range(0.0..1.0)).collect();
        let plane = LuminancePlane::from_values(width, height, values.clone()).unwrap();

        let stops = StopList::from_lines(["#ff0000", "#00ff00", "#0000ff"], PositionMode::Uniform);
        let recolorer = ImageRecolorer::new(&stops, false).unwrap();
        let out = recolorer.recolor_plane(&plane);

        for (i, &t) in values.iter().enumerate() {
            let x = i as u32 % width;
            let y = i as u32 / width;
            let expected = recolorer.mapper().colour_at(t).to_array();
            assert_eq!(out.get_pixel(x, y).0, expected);
        }
    }

    #[test]
    fn test_white_pixels_fall_outside_the_ramp() {
        let mut gray = GrayImage::new(2, 1);
        gray.put_pixel(0, 0, Luma([0]));
        gray.put_pixel(1, 0, Luma([255]));
        let out = recolor_image(&DynamicImage::ImageLuma8(gray), &black_to_white(), false).unwrap();
        assert_eq!(out.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(out.get_pixel(1, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_colour_source_is_reduced_to_luminance() {
        let mut rgb = RgbImage::new(1, 1);
        rgb.put_pixel(0, 0, Rgb([128, 128, 128]));
        let stops = StopList::from_colours(
            [Colour::new(0, 0, 0), Colour::new(0, 0, 255)],
            PositionMode::Uniform,
        );
        let out = recolor_image(&DynamicImage::ImageRgb8(rgb), &stops, false).unwrap();
        let expected = (128.0 / 255.0 * 255.0f64).floor() as u8;
        assert_eq!(out.get_pixel(0, 0), &Rgb([0, 0, expected]));
    }

    #[test]
    fn test_primaries_use_601_weights() {
        let mut rgb = RgbImage::new(4, 1);
        rgb.put_pixel(0, 0, Rgb([255, 0, 0]));
        rgb.put_pixel(1, 0, Rgb([0, 255, 0]));
        rgb.put_pixel(2, 0, Rgb([0, 0, 255]));
        rgb.put_pixel(3, 0, Rgb([200, 100, 50]));
        let out = recolor_image(&DynamicImage::ImageRgb8(rgb), &black_to_white(), false).unwrap();
        let greys: Vec<u8> = out.pixels().map(|p| p.0[0]).collect();
        assert_eq!(greys, vec![76, 150, 29, 124]);
        assert!(out.pixels().all(|p| p.0[0] == p.0[1] && p.0[1] == p.0[2]));
    }

    #[test]
    fn test_luma_601_keeps_greys() {
        for l in 0..=255u8 {
            assert_eq!(luma_601([l, l, l]), l);
        }
    }

    #[test]
    fn test_invert_flips_the_ramp() {
        let mut gray = GrayImage::new(1, 1);
        gray.put_pixel(0, 0, Luma([0]));
        let image = DynamicImage::ImageLuma8(gray);
        let out = recolor_image(&image, &black_to_white(), true).unwrap();
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_deleting_below_two_stops_fails_cleanly() {
        let mut stops = black_to_white();
        stops.delete_at(0).unwrap();
        let image = DynamicImage::ImageLuma8(GrayImage::new(4, 4));
        assert!(matches!(
            recolor_image(&image, &stops, false),
            Err(Error::EmptyGradient(1))
        ));
    }

    #[test]
    fn test_recolor_path_round_trip() {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let path = tmp.path().join("gray.png");
        let mut gray = GrayImage::new(3, 1);
        for (x, l) in [0u8, 64, 128].into_iter().enumerate() {
            gray.put_pixel(x as u32, 0, Luma([l]));
        }
        gray.save(&path).unwrap();

        let recolorer = ImageRecolorer::new(&black_to_white(), false).unwrap();
        let out = recolorer.recolor_path(&path).unwrap();
        assert_eq!(out.dimensions(), (3, 1));
        assert_eq!(out.get_pixel(1, 0), &Rgb([64, 64, 64]));
    }

    #[test]
    fn test_unreadable_image_is_a_decode_error() {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        let recolorer = ImageRecolorer::new(&black_to_white(), false).unwrap();
        assert!(matches!(
            recolorer.recolor_path(&path),
            Err(Error::Decode { .. })
        ));
        assert!(matches!(
            recolorer.recolor_path(tmp.path().join("missing.png")),
            Err(Error::Decode { .. })
        ));
    }
}
