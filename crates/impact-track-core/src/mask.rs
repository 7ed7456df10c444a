//! Binary-mask utilities shared by the color and motion detectors:
//! connected-region extraction and morphological opening.

/// Row-major binary mask; any non-zero byte counts as set.
#[derive(Clone, Debug)]
pub struct BinaryMask {
    pub width: usize,
    pub height: usize,
    data: Vec<u8>,
}

impl BinaryMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        self.data[y * self.width + x] = u8::from(value);
    }

    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

/// One 8-connected region of set pixels.
#[derive(Clone, Debug)]
pub struct Region {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
    /// Number of set pixels.
    pub area: usize,
    /// Linear indices (y * width + x) of the region's pixels.
    pub pixels: Vec<usize>,
}

impl Region {
    /// Bounding-box center, matching the `x + w/2` convention of a
    /// bounding-rect readout.
    pub fn center(&self) -> (i32, i32) {
        let w = self.max_x - self.min_x + 1;
        let h = self.max_y - self.min_y + 1;
        ((self.min_x + w / 2) as i32, (self.min_y + h / 2) as i32)
    }
}

/// Extract all 8-connected regions of set pixels.
pub fn connected_regions(mask: &BinaryMask) -> Vec<Region> {
    let (w, h) = (mask.width, mask.height);
    let mut visited = vec![false; w * h];
    let mut regions = Vec::new();
    let mut stack = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            if visited[idx] || !mask.get(x, y) {
                continue;
            }
            let mut region = Region {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
                area: 0,
                pixels: Vec::new(),
            };
            visited[idx] = true;
            stack.push((x, y));
            while let Some((cx, cy)) = stack.pop() {
                region.area += 1;
                region.pixels.push(cy * w + cx);
                region.min_x = region.min_x.min(cx);
                region.min_y = region.min_y.min(cy);
                region.max_x = region.max_x.max(cx);
                region.max_y = region.max_y.max(cy);
                for dy in -1i32..=1 {
                    for dx in -1i32..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = cx as i32 + dx;
                        let ny = cy as i32 + dy;
                        if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                            continue;
                        }
                        let (nx, ny) = (nx as usize, ny as usize);
                        let nidx = ny * w + nx;
                        if !visited[nidx] && mask.get(nx, ny) {
                            visited[nidx] = true;
                            stack.push((nx, ny));
                        }
                    }
                }
            }
            regions.push(region);
        }
    }
    regions
}

/// Morphological opening (erosion then dilation) with a disk structuring
/// element of the given radius. Suppresses speckle noise smaller than the
/// element without shrinking larger blobs.
pub fn morph_open(mask: &BinaryMask, radius: usize) -> BinaryMask {
    if radius == 0 {
        return mask.clone();
    }
    let offsets = disk_offsets(radius);
    let eroded = erode(mask, &offsets);
    dilate(&eroded, &offsets)
}

fn disk_offsets(radius: usize) -> Vec<(i32, i32)> {
    let r = radius as i32;
    let r_sq = r * r;
    let mut out = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r_sq {
                out.push((dx, dy));
            }
        }
    }
    out
}

fn erode(mask: &BinaryMask, offsets: &[(i32, i32)]) -> BinaryMask {
    let mut out = BinaryMask::new(mask.width, mask.height);
    for y in 0..mask.height {
        for x in 0..mask.width {
            let keep = offsets.iter().all(|&(dx, dy)| {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                nx >= 0
                    && ny >= 0
                    && nx < mask.width as i32
                    && ny < mask.height as i32
                    && mask.get(nx as usize, ny as usize)
            });
            out.set(x, y, keep);
        }
    }
    out
}

fn dilate(mask: &BinaryMask, offsets: &[(i32, i32)]) -> BinaryMask {
    let mut out = BinaryMask::new(mask.width, mask.height);
    for y in 0..mask.height {
        for x in 0..mask.width {
            if !mask.get(x, y) {
                continue;
            }
            for &(dx, dy) in offsets {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx >= 0 && ny >= 0 && nx < mask.width as i32 && ny < mask.height as i32 {
                    out.set(nx as usize, ny as usize, true);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from_rows(rows: &[&[u8]]) -> BinaryMask {
        let mut mask = BinaryMask::new(rows[0].len(), rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                mask.set(x, y, v != 0);
            }
        }
        mask
    }

    #[test]
    fn labels_two_separated_regions() {
        let mask = mask_from_rows(&[
            &[1, 1, 0, 0, 0],
            &[1, 1, 0, 0, 1],
            &[0, 0, 0, 1, 1],
        ]);
        let mut regions = connected_regions(&mask);
        regions.sort_by_key(|r| r.min_x);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].area, 4);
        assert_eq!(regions[0].center(), (1, 1));
        assert_eq!(regions[1].area, 3);
    }

    #[test]
    fn diagonal_pixels_are_one_region() {
        let mask = mask_from_rows(&[&[1, 0, 0], &[0, 1, 0], &[0, 0, 1]]);
        assert_eq!(connected_regions(&mask).len(), 1);
    }

    #[test]
    fn opening_removes_single_pixel_speckles() {
        let mut mask = BinaryMask::new(20, 20);
        mask.set(3, 3, true); // speckle
        for y in 8..16 {
            for x in 8..16 {
                mask.set(x, y, true); // solid blob
            }
        }
        let opened = morph_open(&mask, 2);
        assert!(!opened.get(3, 3));
        assert!(opened.get(11, 11));
        let regions = connected_regions(&opened);
        assert_eq!(regions.len(), 1);
    }

    #[test]
    fn zero_radius_opening_is_identity() {
        let mask = mask_from_rows(&[&[1, 0], &[0, 1]]);
        let opened = morph_open(&mask, 0);
        assert_eq!(opened.count_set(), 2);
    }
}
