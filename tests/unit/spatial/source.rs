//! Tests for source image storage and row strip extraction

#[cfg(test)]
mod tests {
    use tilemosaic::ErrorKind;
    use tilemosaic::color::PixelSample;
    use tilemosaic::spatial::SourceImage;
    use tilemosaic::spatial::source::CHANNELS;

    fn gradient(width: usize, height: usize) -> SourceImage {
        let mut image = SourceImage::filled(width, height, PixelSample::default());
        for y in 0..height {
            for x in 0..width {
                image.set_pixel(x, y, PixelSample::new(x as u8, y as u8, 1, 255));
            }
        }
        image
    }

    // Tests buffers must match the declared dimensions
    // Verified by skipping the shape check
    #[test]
    fn test_from_rgba_validates_length() {
        let image = SourceImage::from_rgba(2, 3, vec![7; 2 * 3 * CHANNELS]).unwrap();
        assert_eq!((image.width(), image.height()), (2, 3));

        let error = SourceImage::from_rgba(2, 3, vec![0; 10]).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }

    // Tests pixels are addressed by x then y
    // Verified by transposing the pixel lookup
    #[test]
    fn test_pixel_addressing() {
        let image = gradient(4, 3);
        assert_eq!(image.pixel(3, 1), Some(PixelSample::new(3, 1, 1, 255)));
        assert_eq!(image.pixel(4, 0), None);
        assert_eq!(image.pixel(0, 3), None);
    }

    // Tests a strip holds tile_height full-width rows starting at the row top
    // Verified by offsetting strips by row instead of row * tile_height
    #[test]
    fn test_row_strip_copies_tile_rows() {
        let image = gradient(3, 4);
        let strip = image.row_strip(1, 2);

        assert_eq!(strip.len(), 2 * 3 * CHANNELS);
        assert_eq!(strip.get(..4), Some(&[0, 2, 1, 255][..]));
        let last = strip.len() - CHANNELS;
        assert_eq!(strip.get(last..), Some(&[2, 3, 1, 255][..]));
    }

    // Tests rows beyond the bottom edge are padded with transparent black
    // Verified by truncating the strip at the image edge
    #[test]
    fn test_partial_row_strip_is_padded() {
        let image = SourceImage::filled(2, 3, PixelSample::new(9, 9, 9, 255));
        let strip = image.row_strip(1, 2);

        assert_eq!(strip.len(), 2 * 2 * CHANNELS);
        let (present, padding) = strip.split_at(2 * CHANNELS);
        assert!(present.chunks(CHANNELS).all(|p| p == [9, 9, 9, 255]));
        assert!(padding.iter().all(|&b| b == 0));
    }

    // Tests decoded RGBA images keep dimensions and pixel layout
    // Verified by swapping width and height in the conversion
    #[test]
    fn test_from_rgba_image() {
        let mut rgba = image::RgbaImage::new(5, 2);
        rgba.put_pixel(4, 1, image::Rgba([1, 2, 3, 4]));
        let image = SourceImage::from(rgba);

        assert_eq!((image.width(), image.height()), (5, 2));
        assert_eq!(image.pixel(4, 1), Some(PixelSample::new(1, 2, 3, 4)));
    }
}
