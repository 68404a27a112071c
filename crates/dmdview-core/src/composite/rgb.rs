use super::{Canvas, CompositeError};
use crate::colour;
use crate::matrix::Dimensions;
use crate::protocol::layout::BGR_TRIPLET_LEN;

/// Validated `rgb24` pixel data: one blue-green-red triplet per pixel.
#[derive(Debug, Clone, Copy)]
pub struct RgbImage<'a> {
    planes: &'a [u8],
    dimensions: Dimensions,
}

impl<'a> RgbImage<'a> {
    /// Triplets past the image area are ignored; too few is an error.
    pub fn new(planes: &'a [u8], dimensions: Dimensions) -> Result<Self, CompositeError> {
        let area = dimensions.area();
        let whole = planes.len() % BGR_TRIPLET_LEN == 0;
        if !whole || planes.len() / BGR_TRIPLET_LEN < area {
            return Err(CompositeError::InvalidRgbShape {
                length: planes.len(),
                area,
            });
        }
        Ok(Self { planes, dimensions })
    }

    pub fn composite(&self, canvas: &mut Canvas<'_>) {
        let width = self.dimensions.width as usize;
        if width == 0 {
            return;
        }
        let triplets = self
            .planes
            .chunks_exact(BGR_TRIPLET_LEN)
            .take(self.dimensions.area());
        for (pixel, bgr) in triplets.enumerate() {
            let x = (pixel % width) as u32;
            let y = (pixel / width) as u32;
            canvas.set_pixel(x, y, colour::rgb(bgr[2], bgr[1], bgr[0]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RgbImage;
    use crate::composite::{Canvas, CompositeError};
    use crate::matrix::{Dimensions, LedMatrix};

    #[test]
    fn triplets_are_blue_green_red() {
        let dims = Dimensions::new(2, 1);
        let planes = [0x01, 0x02, 0x03, 0xFF, 0x00, 0x00];
        let image = RgbImage::new(&planes, dims).unwrap();

        let mut buffer = vec![0u32; 2];
        let mut canvas = Canvas::new(&mut buffer, dims, LedMatrix::disabled()).unwrap();
        image.composite(&mut canvas);

        assert_eq!(buffer, vec![0xFF03_0201, 0xFF00_00FF]);
    }

    #[test]
    fn partial_triplet_is_rejected() {
        let err = RgbImage::new(&[0, 0, 0, 0], Dimensions::new(1, 1)).unwrap_err();
        assert_eq!(err, CompositeError::InvalidRgbShape { length: 4, area: 1 });
    }

    #[test]
    fn too_few_triplets_is_rejected() {
        let err = RgbImage::new(&[1, 2, 3], Dimensions::new(2, 1)).unwrap_err();
        assert_eq!(err, CompositeError::InvalidRgbShape { length: 3, area: 2 });
    }

    #[test]
    fn extra_triplets_are_ignored() {
        let dims = Dimensions::new(1, 1);
        let image = RgbImage::new(&[9, 9, 9, 7, 7, 7], dims).unwrap();
        let mut buffer = vec![0u32; 1];
        let mut canvas = Canvas::new(&mut buffer, dims, LedMatrix::disabled()).unwrap();
        image.composite(&mut canvas);
        assert_eq!(buffer, vec![0xFF09_0909]);
    }

    #[test]
    fn black_triplets_keep_background() {
        let dims = Dimensions::new(2, 1);
        let image = RgbImage::new(&[0, 0, 0, 0, 0, 0x80], dims).unwrap();
        let mut buffer = vec![0xFF11_1111; 2];
        let mut canvas = Canvas::new(&mut buffer, dims, LedMatrix::disabled()).unwrap();
        image.composite(&mut canvas);
        assert_eq!(buffer, vec![0xFF11_1111, 0xFF80_0000]);
    }
}
