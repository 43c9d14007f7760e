use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use ndarray::Array4;
use std::borrow::Cow;

/// Side length of the square the classifier was trained on.
pub const INPUT_SIZE: u32 = 224;

/// Uploads are first bounded to this box, as they are for the on-screen
/// preview the classifier was calibrated against.
pub const THUMBNAIL_BOUND: u32 = 300;

/// (1, 224, 224, 3) float tensor, NHWC, values in [-1, 1].
pub type ModelInput = Array4<f32>;

/// Shrinks `image` to fit within `THUMBNAIL_BOUND` on both sides, keeping
/// its aspect ratio. Smaller images are left alone.
pub fn thumbnail(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    if image.width() <= THUMBNAIL_BOUND && image.height() <= THUMBNAIL_BOUND {
        Cow::Borrowed(image)
    } else {
        Cow::Owned(image.resize(THUMBNAIL_BOUND, THUMBNAIL_BOUND, FilterType::CatmullRom))
    }
}

/// Scales `image` to cover `INPUT_SIZE`×`INPUT_SIZE` keeping its aspect
/// ratio, then crops the centre. Never stretches.
pub fn fit(image: &DynamicImage) -> RgbImage {
    image
        .resize_to_fill(INPUT_SIZE, INPUT_SIZE, FilterType::Lanczos3)
        .to_rgb8()
}

/// Maps every channel value from [0, 255] to [-1, 1] via `v / 127.5 - 1`.
pub fn normalize(image: &RgbImage) -> ModelInput {
    let (width, height) = image.dimensions();
    Array4::from_shape_fn(
        (1, height as usize, width as usize, 3),
        |(_, y, x, c)| {
            let value = image.get_pixel(x as u32, y as u32)[c];
            (value as f32 / 127.5) - 1.0
        },
    )
}

pub fn to_model_input(image: &DynamicImage) -> ModelInput {
    normalize(&fit(&thumbnail(image)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const SIZE: usize = INPUT_SIZE as usize;

    #[test]
    fn solid_color_normalizes_to_constant() {
        let color = [200u8, 64, 0];
        let image = RgbImage::from_pixel(INPUT_SIZE, INPUT_SIZE, Rgb(color));
        let input = to_model_input(&DynamicImage::ImageRgb8(image));

        assert_eq!(input.shape(), &[1, SIZE, SIZE, 3]);
        for ((_, _, _, c), &value) in input.indexed_iter() {
            assert_eq!(value, (color[c] as f32 / 127.5) - 1.0);
        }
    }

    #[test]
    fn extremes_hit_the_range_bounds() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(0, 0, Rgb([0, 0, 0]));
        image.put_pixel(1, 0, Rgb([255, 255, 255]));
        let input = normalize(&image);

        assert_eq!(input[[0, 0, 0, 0]], -1.0);
        assert_eq!(input[[0, 0, 1, 2]], 1.0);
        assert!(input.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn wide_image_is_cropped_not_stretched() {
        // Green band on the far left of a 2:1 image. Fitting scales the
        // image to 448x224 and keeps the centre, which drops the band;
        // stretching would keep it in the first ~56 columns.
        let mut image = RgbImage::from_pixel(400, 200, Rgb([255, 255, 255]));
        for x in 0..100 {
            for y in 0..200 {
                image.put_pixel(x, y, Rgb([0, 255, 0]));
            }
        }
        let fitted = fit(&DynamicImage::ImageRgb8(image));

        assert_eq!(fitted.dimensions(), (INPUT_SIZE, INPUT_SIZE));
        let left = fitted.get_pixel(10, 112);
        assert!(left[0] > 200 && left[2] > 200, "left edge should be white, got {:?}", left);
    }

    #[test]
    fn tall_image_keeps_centre() {
        // Top third red, rest blue, 1:3 aspect. The centre crop must not
        // contain the red band at its middle row.
        let mut image = RgbImage::from_pixel(100, 300, Rgb([0, 0, 255]));
        for y in 0..100 {
            for x in 0..100 {
                image.put_pixel(x, y, Rgb([255, 0, 0]));
            }
        }
        let fitted = fit(&DynamicImage::ImageRgb8(image));

        assert_eq!(fitted.dimensions(), (INPUT_SIZE, INPUT_SIZE));
        let centre = fitted.get_pixel(112, 112);
        assert!(centre[2] > 200 && centre[0] < 50, "centre should be blue, got {:?}", centre);
    }

    #[test]
    fn small_image_is_upscaled() {
        let image = RgbImage::from_pixel(10, 30, Rgb([10, 20, 30]));
        let input = to_model_input(&DynamicImage::ImageRgb8(image));
        assert_eq!(input.shape(), &[1, SIZE, SIZE, 3]);
    }

    #[test]
    fn large_upload_is_thumbnailed_first() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(1200, 600));
        let bounded = thumbnail(&image);
        assert!(matches!(bounded, Cow::Owned(_)));
        assert_eq!((bounded.width(), bounded.height()), (300, 150));

        let small = DynamicImage::ImageRgb8(RgbImage::new(300, 120));
        assert!(matches!(thumbnail(&small), Cow::Borrowed(_)));
    }

    #[test]
    fn thumbnail_then_fit_still_crops_the_centre() {
        let mut image = RgbImage::from_pixel(1600, 800, Rgb([255, 255, 255]));
        for x in 0..400 {
            for y in 0..800 {
                image.put_pixel(x, y, Rgb([0, 255, 0]));
            }
        }
        let input = to_model_input(&DynamicImage::ImageRgb8(image));
        assert_eq!(input.shape(), &[1, SIZE, SIZE, 3]);
        // White maps to 1.0; the green band is cropped away.
        assert!(input[[0, 112, 10, 0]] > 0.6);
    }
}
