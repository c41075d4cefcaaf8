//! Grayscale segmentation for buffers without an alpha channel: luminance
//! conversion, automatic thresholding, optional mask cleanup, and extraction
//! of the largest foreground region.
use ndarray::Array2;

use crate::types::{BoundingBox, PixelBuffer};

/// Side length of the square structuring element used by the opening.
const OPENING_KERNEL: usize = 5;

/// BT.601 luminance of the color channels, one byte per pixel.
/// Layout is (rows, cols); the alpha channel, if any, is ignored.
pub fn luminance(buffer: &PixelBuffer) -> Array2<u8> {
    let mut gray = Array2::zeros((buffer.height(), buffer.width()));
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            let p = buffer.pixel(x, y);
            let lum = 0.299 * p[0] as f64 + 0.587 * p[1] as f64 + 0.114 * p[2] as f64;
            gray[[y, x]] = lum.round() as u8;
        }
    }
    gray
}

/// Threshold that maximizes the between-class variance of the histogram.
pub fn otsu_threshold(gray: &Array2<u8>) -> u8 {
    let mut hist = [0u64; 256];
    for &v in gray.iter() {
        hist[v as usize] += 1;
    }

    let total = gray.len() as f64;
    let sum_all: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut weight_bg = 0.0;
    let mut sum_bg = 0.0;
    let mut best_threshold = 0u8;
    let mut best_variance = 0.0;

    for t in 0..256 {
        weight_bg += hist[t] as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }
        sum_bg += t as f64 * hist[t] as f64;

        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let variance = weight_bg * weight_fg * (mean_bg - mean_fg) * (mean_bg - mean_fg);

        if variance > best_variance {
            best_variance = variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}

/// Binary mask with inverted polarity: luminance at or below the threshold
/// becomes foreground (255). Content is typically darker than the light
/// background it sits on.
pub fn binarize_inverted(gray: &Array2<u8>, threshold: u8) -> Array2<u8> {
    gray.map(|&v| if v <= threshold { 255u8 } else { 0u8 })
}

fn erode(mask: &Array2<u8>) -> Array2<u8> {
    let (rows, cols) = mask.dim();
    let half = OPENING_KERNEL / 2;
    let mut out = Array2::zeros((rows, cols));
    for r in 0..rows {
        for c in 0..cols {
            let r0 = r.saturating_sub(half);
            let r1 = (r + half).min(rows - 1);
            let c0 = c.saturating_sub(half);
            let c1 = (c + half).min(cols - 1);
            let mut keep = true;
            'window: for wr in r0..=r1 {
                for wc in c0..=c1 {
                    if mask[[wr, wc]] == 0 {
                        keep = false;
                        break 'window;
                    }
                }
            }
            if keep {
                out[[r, c]] = 255;
            }
        }
    }
    out
}

fn dilate(mask: &Array2<u8>) -> Array2<u8> {
    let (rows, cols) = mask.dim();
    let half = OPENING_KERNEL / 2;
    let mut out = Array2::zeros((rows, cols));
    for r in 0..rows {
        for c in 0..cols {
            let r0 = r.saturating_sub(half);
            let r1 = (r + half).min(rows - 1);
            let c0 = c.saturating_sub(half);
            let c1 = (c + half).min(cols - 1);
            let mut hit = false;
            'window: for wr in r0..=r1 {
                for wc in c0..=c1 {
                    if mask[[wr, wc]] != 0 {
                        hit = true;
                        break 'window;
                    }
                }
            }
            if hit {
                out[[r, c]] = 255;
            }
        }
    }
    out
}

/// Morphological opening (erosion then dilation) with a 5x5 structuring
/// element; removes isolated noise pixels while keeping larger regions.
pub fn open_mask(mask: &Array2<u8>) -> Array2<u8> {
    dilate(&erode(mask))
}

/// Bounding box of the largest 8-connected foreground region, by pixel count.
/// Returns None when the mask has no foreground pixels.
pub fn largest_region_bounds(mask: &Array2<u8>) -> Option<BoundingBox> {
    let (rows, cols) = mask.dim();
    let mut visited = Array2::from_elem((rows, cols), false);
    let mut best: Option<(usize, BoundingBox)> = None;
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for seed_r in 0..rows {
        for seed_c in 0..cols {
            if mask[[seed_r, seed_c]] == 0 || visited[[seed_r, seed_c]] {
                continue;
            }

            let mut area = 0usize;
            let (mut min_r, mut max_r) = (seed_r, seed_r);
            let (mut min_c, mut max_c) = (seed_c, seed_c);

            visited[[seed_r, seed_c]] = true;
            stack.push((seed_r, seed_c));
            while let Some((r, c)) = stack.pop() {
                area += 1;
                min_r = min_r.min(r);
                max_r = max_r.max(r);
                min_c = min_c.min(c);
                max_c = max_c.max(c);

                let r0 = r.saturating_sub(1);
                let r1 = (r + 1).min(rows - 1);
                let c0 = c.saturating_sub(1);
                let c1 = (c + 1).min(cols - 1);
                for nr in r0..=r1 {
                    for nc in c0..=c1 {
                        if mask[[nr, nc]] != 0 && !visited[[nr, nc]] {
                            visited[[nr, nc]] = true;
                            stack.push((nr, nc));
                        }
                    }
                }
            }

            let bounds = BoundingBox {
                x: min_c,
                y: min_r,
                width: max_c - min_c + 1,
                height: max_r - min_r + 1,
            };
            match best {
                Some((best_area, _)) if best_area >= area => {}
                _ => best = Some((area, bounds)),
            }
        }
    }

    best.map(|(_, bounds)| bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Channels;

    fn mask_from_rows(rows: &[&[u8]]) -> Array2<u8> {
        let height = rows.len();
        let width = rows[0].len();
        let mut mask = Array2::zeros((height, width));
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                mask[[r, c]] = v;
            }
        }
        mask
    }

    #[test]
    fn luminance_weights_green_heaviest() {
        let mut buf = PixelBuffer::filled(3, 1, Channels::Rgb, &[0, 0, 0]).unwrap();
        buf.pixel_mut(0, 0).copy_from_slice(&[255, 0, 0]);
        buf.pixel_mut(1, 0).copy_from_slice(&[0, 255, 0]);
        buf.pixel_mut(2, 0).copy_from_slice(&[0, 0, 255]);

        let gray = luminance(&buf);
        assert_eq!(gray[[0, 0]], 76); // 0.299 * 255
        assert_eq!(gray[[0, 1]], 150); // 0.587 * 255
        assert_eq!(gray[[0, 2]], 29); // 0.114 * 255
    }

    #[test]
    fn otsu_separates_a_bimodal_histogram() {
        let mut gray = Array2::zeros((10, 10));
        for ((r, c), v) in gray.indexed_iter_mut() {
            *v = if r < 5 && c < 5 { 30u8 } else { 220u8 };
        }
        let threshold = otsu_threshold(&gray);
        assert!((30..220).contains(&(threshold as i32)));

        let mask = binarize_inverted(&gray, threshold);
        assert_eq!(mask[[0, 0]], 255); // dark pixels become foreground
        assert_eq!(mask[[9, 9]], 0);
    }

    #[test]
    fn binarize_keeps_threshold_pixels_as_foreground() {
        let gray = Array2::from_elem((1, 2), 100u8);
        let mask = binarize_inverted(&gray, 100);
        assert!(mask.iter().all(|&v| v == 255));
    }

    #[test]
    fn opening_removes_isolated_pixels() {
        let mut mask = Array2::zeros((20, 20));
        // 8x8 block plus one stray pixel far away
        for r in 5..13 {
            for c in 5..13 {
                mask[[r, c]] = 255u8;
            }
        }
        mask[[18, 18]] = 255;

        let opened = open_mask(&mask);
        assert_eq!(opened[[18, 18]], 0);
        assert_eq!(opened[[8, 8]], 255);
    }

    #[test]
    fn largest_region_wins_over_smaller_ones() {
        let mask = mask_from_rows(&[
            &[255, 0, 0, 0, 0, 0],
            &[0, 0, 0, 255, 255, 255],
            &[0, 0, 0, 255, 255, 255],
            &[0, 0, 0, 255, 255, 255],
        ]);
        let bounds = largest_region_bounds(&mask).unwrap();
        assert_eq!(
            bounds,
            BoundingBox {
                x: 3,
                y: 1,
                width: 3,
                height: 3
            }
        );
    }

    #[test]
    fn diagonal_pixels_are_one_region() {
        let mask = mask_from_rows(&[&[255, 0, 0], &[0, 255, 0], &[0, 0, 255]]);
        let bounds = largest_region_bounds(&mask).unwrap();
        assert_eq!(
            bounds,
            BoundingBox {
                x: 0,
                y: 0,
                width: 3,
                height: 3
            }
        );
    }

    #[test]
    fn empty_mask_has_no_region() {
        let mask = Array2::zeros((4, 4));
        assert!(largest_region_bounds(&mask).is_none());
    }
}
