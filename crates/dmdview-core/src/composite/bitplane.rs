use super::{Canvas, CompositeError};
use crate::colour::Hsl;
use crate::matrix::Dimensions;
use crate::protocol::BitDepth;

/// Check that `planes` holds exactly `depth` planes of `area / 8` bytes.
pub fn planes_are_valid(planes: &[u8], depth: BitDepth, dimensions: Dimensions) -> bool {
    let area = dimensions.area();
    let count = depth.planes();
    area % 8 == 0 && planes.len() % count == 0 && planes.len() / count == area / 8
}

/// Merge `depth` bit-planes into one palette index per pixel.
///
/// Plane `k` covers bytes `[k * area / 8, (k + 1) * area / 8)`. Pixel `p`
/// takes bit `p % 8` (least significant first) of byte `p / 8` in each plane
/// and places it at bit `k` of the index. The caller validates the shape.
///
/// # Examples
/// ```
/// use dmdview_core::Dimensions;
/// use dmdview_core::composite::join_planes;
/// use dmdview_core::protocol::BitDepth;
///
/// let indices = join_planes(&[0xA5, 0xC3], BitDepth::Two, Dimensions::new(8, 1));
/// assert_eq!(indices, vec![3, 2, 1, 0, 0, 1, 2, 3]);
/// ```
pub fn join_planes(planes: &[u8], depth: BitDepth, dimensions: Dimensions) -> Vec<u8> {
    let area = dimensions.area();
    let plane_len = area / 8;
    let mut indices = vec![0u8; area];
    for (k, plane) in planes.chunks_exact(plane_len.max(1)).take(depth.planes()).enumerate() {
        for (pixel, index) in indices.iter_mut().enumerate() {
            let bit = (plane[pixel / 8] >> (pixel % 8)) & 1;
            *index |= bit << k;
        }
    }
    indices
}

/// Where the colour for a palette index comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ColourSource<'p> {
    Palette(&'p [u32]),
    /// Base colour darkened by `index / levels`, one entry per index.
    Gradient(Vec<u32>),
}

impl<'p> ColourSource<'p> {
    /// Palette lookup; the palette must cover every index the depth can produce.
    pub fn palette(palette: &'p [u32], depth: BitDepth) -> Result<Self, CompositeError> {
        if palette.len() < depth.levels() {
            return Err(CompositeError::PaletteTooShort {
                needed: depth.levels(),
                actual: palette.len(),
            });
        }
        Ok(ColourSource::Palette(palette))
    }

    pub fn gradient(base: Hsl, depth: BitDepth) -> Self {
        let levels = depth.levels();
        let ramp = (0..levels)
            .map(|index| base.scale_lightness(index as f32 / levels as f32).to_rgb())
            .collect();
        ColourSource::Gradient(ramp)
    }

    pub fn lookup(&self, index: u8) -> u32 {
        let table = match self {
            ColourSource::Palette(palette) => *palette,
            ColourSource::Gradient(ramp) => ramp.as_slice(),
        };
        table.get(usize::from(index)).copied().unwrap_or_default()
    }
}

/// Validated bit-plane image ready to draw.
#[derive(Debug, Clone)]
pub struct BitplaneImage<'p> {
    indices: Vec<u8>,
    colours: ColourSource<'p>,
    dimensions: Dimensions,
}

impl<'p> BitplaneImage<'p> {
    pub fn new(
        planes: &[u8],
        depth: BitDepth,
        dimensions: Dimensions,
        colours: ColourSource<'p>,
    ) -> Result<Self, CompositeError> {
        if !planes_are_valid(planes, depth, dimensions) {
            return Err(CompositeError::InvalidPlaneShape {
                planes: planes.len(),
                depth: depth.planes(),
                area: dimensions.area(),
            });
        }
        Ok(Self {
            indices: join_planes(planes, depth, dimensions),
            colours,
            dimensions,
        })
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn composite(&self, canvas: &mut Canvas<'_>) {
        let width = self.dimensions.width as usize;
        if width == 0 {
            return;
        }
        for (pixel, index) in self.indices.iter().enumerate() {
            let x = (pixel % width) as u32;
            let y = (pixel / width) as u32;
            canvas.set_pixel(x, y, self.colours.lookup(*index));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BitplaneImage, ColourSource, join_planes, planes_are_valid};
    use crate::colour::Hsl;
    use crate::composite::{Canvas, CompositeError};
    use crate::matrix::{Dimensions, LedMatrix};
    use crate::protocol::BitDepth;

    #[test]
    fn join_two_planes_over_one_row() {
        let indices = join_planes(&[0xA5, 0xC3], BitDepth::Two, Dimensions::new(8, 1));
        assert_eq!(indices, vec![3, 2, 1, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn join_four_planes_sets_high_bits() {
        let dims = Dimensions::new(8, 2);
        let planes = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x80];
        let indices = join_planes(&planes, BitDepth::Four, dims);
        assert_eq!(indices[0], 8);
        assert_eq!(indices[8], 0);
        assert_eq!(indices[15], 8);

        let all = [0x01, 0x00, 0x01, 0x00, 0x01, 0x00, 0x01, 0x00];
        assert_eq!(join_planes(&all, BitDepth::Four, dims)[0], 15);
    }

    #[test]
    fn shape_checks() {
        let dims = Dimensions::new(8, 1);
        assert!(planes_are_valid(&[0, 0], BitDepth::Two, dims));
        assert!(!planes_are_valid(&[0, 0, 0], BitDepth::Two, dims));
        assert!(!planes_are_valid(&[0, 0], BitDepth::Two, Dimensions::new(3, 3)));
        assert!(!planes_are_valid(&[0, 0, 0, 0], BitDepth::Two, dims));
    }

    #[test]
    fn gradient_from_red_ramps_lightness() {
        let source = ColourSource::gradient(Hsl::from_rgb(0xFF0000), BitDepth::Two);
        assert_eq!(
            source,
            ColourSource::Gradient(vec![0xFF00_0000, 0xFF40_0000, 0xFF80_0000, 0xFFBF_0000])
        );
    }

    #[test]
    fn short_palette_is_rejected() {
        let err = ColourSource::palette(&[1, 2, 3], BitDepth::Two).unwrap_err();
        assert_eq!(
            err,
            CompositeError::PaletteTooShort {
                needed: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn mismatched_plane_length_is_rejected() {
        let palette = [0, 1, 2, 3];
        let colours = ColourSource::palette(&palette, BitDepth::Two).unwrap();
        let err =
            BitplaneImage::new(&[0xFF], BitDepth::Two, Dimensions::new(8, 1), colours).unwrap_err();
        assert_eq!(
            err,
            CompositeError::InvalidPlaneShape {
                planes: 1,
                depth: 2,
                area: 8
            }
        );
    }

    #[test]
    fn palette_composite_skips_black_entries() {
        let palette = [0x000000, 0x0000FF, 0x00FF00, 0xFF0000];
        let colours = ColourSource::palette(&palette, BitDepth::Two).unwrap();
        let dims = Dimensions::new(8, 1);
        let image = BitplaneImage::new(&[0xA5, 0xC3], BitDepth::Two, dims, colours).unwrap();

        let mut buffer = vec![0u32; 8];
        let mut canvas = Canvas::new(&mut buffer, dims, LedMatrix::disabled()).unwrap();
        image.composite(&mut canvas);

        assert_eq!(
            buffer,
            vec![
                0xFFFF_0000,
                0xFF00_FF00,
                0xFF00_00FF,
                0,
                0,
                0xFF00_00FF,
                0xFF00_FF00,
                0xFFFF_0000,
            ]
        );
    }
}
