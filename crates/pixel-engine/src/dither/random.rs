//! Random-noise dithering.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::output::IndexedImage;
use crate::palette::Palette;
use crate::raster::Raster;

use super::{alpha_plane, match_clamped, Dither, DitherOptions};

/// Random dithering.
///
/// Each pixel draws one uniform sample in `[-0.5, 0.5)`, scales it by
/// [`DitherOptions::amplitude`] and adds it to all three channels before
/// matching.
///
/// With `options.seed` set the noise sequence, and therefore the output, is
/// reproducible. Without a seed the generator is seeded from OS entropy and
/// two runs on the same input generally differ.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDither;

impl Dither for RandomDither {
    fn dither(&self, raster: &Raster, palette: &Palette, options: &DitherOptions) -> IndexedImage {
        let width = raster.width();
        let height = raster.height();
        let amplitude = options.amplitude(palette.len());

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => {
                tracing::warn!("Random dithering without a seed; output is not reproducible");
                StdRng::from_entropy()
            }
        };

        let mut indices = Vec::with_capacity(width * height);
        for idx in 0..raster.pixel_count() {
            let noise = (rng.gen::<f32>() - 0.5) * amplitude;
            let source = raster.rgb_at(idx).to_f32();
            indices.push(match_clamped(palette, source.map(|v| v + noise)));
        }

        IndexedImage::new(indices, alpha_plane(raster), width, height, palette.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn bw() -> Palette {
        Palette::new(vec![Rgb::BLACK, Rgb::WHITE]).unwrap()
    }

    #[test]
    fn test_same_seed_same_output() {
        let raster = Raster::filled(12, 12, [128, 128, 128, 255]);
        let options = DitherOptions::new().seed(99);
        let a = RandomDither.dither(&raster, &bw(), &options);
        let b = RandomDither.dither(&raster, &bw(), &options);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let raster = Raster::filled(16, 16, [128, 128, 128, 255]);
        let a = RandomDither.dither(&raster, &bw(), &DitherOptions::new().seed(1));
        let b = RandomDither.dither(&raster, &bw(), &DitherOptions::new().seed(2));
        assert_ne!(a.indices(), b.indices());
    }

    #[test]
    fn test_noise_mixes_mid_gray() {
        let raster = Raster::filled(16, 16, [128, 128, 128, 255]);
        let image = RandomDither.dither(&raster, &bw(), &DitherOptions::new().seed(5));
        let white = image.indices().iter().filter(|&&i| i == 1).count();
        assert!(white > 64 && white < 192, "white count {white}");
    }

    #[test]
    fn test_single_color_palette_has_no_noise() {
        let palette = Palette::new(vec![Rgb::new(9, 9, 9)]).unwrap();
        let raster = Raster::filled(3, 3, [200, 10, 10, 255]);
        let image = RandomDither.dither(&raster, &palette, &DitherOptions::new().seed(0));
        assert!(image.indices().iter().all(|&i| i == 0));
    }
}
