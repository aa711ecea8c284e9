use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed mapping from dest pixels to the nearest src pixel
pub struct ScaleLut {
    xs: Vec<usize>,
    ys: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            xs: Vec::new(),
            ys: Vec::new(),
        }
    }

    #[inline]
    pub fn dst_size(&self) -> (usize, usize) {
        (self.xs.len(), self.ys.len())
    }
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    let map = |dst: usize, src: usize| -> Vec<usize> {
        let s = src as f32 / dst as f32;
        (0..dst)
            .map(|d| ((d as f32 * s) as usize).min(src.saturating_sub(1)))
            .collect()
    };
    ScaleLut {
        xs: map(dst_w, src_w),
        ys: map(dst_h, src_h),
    }
}

/// RGBA8 to the 0RGB word softbuffer expects
#[inline]
pub fn pack_rgb(px: [u8; 4]) -> u32 {
    (px[2] as u32) | ((px[1] as u32) << 8) | ((px[0] as u32) << 16)
}

/// Parallel nearest-neighbor stretch, keeps the pixel-art look.
/// Rows are processed in parallel for cache friendly writes
pub fn blit_nearest_stretch(dst: &mut [u32], dw: usize, src: &[[u8; 4]], sw: usize, lut: &ScaleLut) {
    if dw == 0 {
        return;
    }
    dst.par_chunks_mut(dw).enumerate().for_each(|(y, dst_row)| {
        let Some(&sy) = lut.ys.get(y) else {
            return;
        };
        let row = &src[sy * sw..(sy + 1) * sw];
        for (d, &sx) in dst_row.iter_mut().zip(&lut.xs) {
            *d = pack_rgb(row[sx]);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lut_maps_every_dest_pixel_into_source() {
        let lut = build_scale_lut(7, 5, 3, 2);
        assert_eq!(lut.dst_size(), (7, 5));
        assert!(lut.xs.iter().all(|&x| x < 3));
        assert!(lut.ys.iter().all(|&y| y < 2));
        assert_eq!(lut.xs.first(), Some(&0));
        assert_eq!(lut.xs.last(), Some(&2));
    }

    #[test]
    fn pack_drops_alpha() {
        assert_eq!(pack_rgb([0x12, 0x34, 0x56, 0xFF]), 0x0012_3456);
    }

    #[test]
    fn integer_upscale_repeats_pixels() {
        let src = [[255, 0, 0, 255], [0, 0, 255, 255]];
        let lut = build_scale_lut(4, 2, 2, 1);
        let mut dst = vec![0u32; 8];
        blit_nearest_stretch(&mut dst, 4, &src, 2, &lut);
        assert_eq!(
            dst,
            vec![
                0xFF0000, 0xFF0000, 0x0000FF, 0x0000FF, //
                0xFF0000, 0xFF0000, 0x0000FF, 0x0000FF,
            ]
        );
    }
}
