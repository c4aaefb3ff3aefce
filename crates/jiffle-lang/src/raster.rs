//! The raster-buffer collaborator: anything that can report its bounds and
//! get/set one numeric sample per (x, y, band). Callers own the buffers; the
//! engine only borrows them for the length of a run.

use std::sync::{Arc, Mutex};

/// Pixel rectangle `[x, x + width) × [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub x: i64,
    pub y: i64,
    pub width: usize,
    pub height: usize,
}

impl Bounds {
    pub fn new(x: i64, y: i64, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x + self.width as i64
            && y < self.y + self.height as i64
    }
}

pub trait Raster {
    fn bounds(&self) -> Bounds;

    fn bands(&self) -> usize { 1 }

    /// Sample at absolute pixel `(x, y)`. NaN is the no-value marker.
    fn sample(&self, x: i64, y: i64, band: usize) -> f64;

    fn set_sample(&mut self, x: i64, y: i64, band: usize, value: f64);
}

/// Shared handle the caller keeps while a script reads and writes through it.
pub type RasterHandle = Arc<Mutex<dyn Raster + Send>>;

// ─── In-memory raster ─────────────────────────────────────────────────────────

/// Dense row-major, band-interleaved `f64` raster.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRaster {
    bounds: Bounds,
    bands: usize,
    data: Vec<f64>,
}

impl MemoryRaster {
    /// Single-band raster filled with `value`.
    pub fn filled(bounds: Bounds, value: f64) -> Self {
        Self::with_bands(bounds, 1, value)
    }

    pub fn with_bands(bounds: Bounds, bands: usize, value: f64) -> Self {
        let bands = bands.max(1);
        Self { bounds, bands, data: vec![value; bounds.pixel_count() * bands] }
    }

    /// Single-band raster whose samples are `f(x, y)` at absolute coordinates.
    pub fn from_fn(bounds: Bounds, mut f: impl FnMut(i64, i64) -> f64) -> Self {
        let mut r = Self::filled(bounds, 0.0);
        for y in bounds.y..bounds.y + bounds.height as i64 {
            for x in bounds.x..bounds.x + bounds.width as i64 {
                r.set_sample(x, y, 0, f(x, y));
            }
        }
        r
    }

    /// Wrap into the shared form the engine binds to.
    pub fn shared(self) -> Arc<Mutex<MemoryRaster>> {
        Arc::new(Mutex::new(self))
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Replace every sample with `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|v| *v = value);
    }

    fn index(&self, x: i64, y: i64, band: usize) -> Option<usize> {
        if !self.bounds.contains(x, y) || band >= self.bands {
            return None;
        }
        let col = (x - self.bounds.x) as usize;
        let row = (y - self.bounds.y) as usize;
        Some((row * self.bounds.width + col) * self.bands + band)
    }
}

impl Raster for MemoryRaster {
    fn bounds(&self) -> Bounds { self.bounds }

    fn bands(&self) -> usize { self.bands }

    /// Out-of-range reads yield the no-value marker.
    fn sample(&self, x: i64, y: i64, band: usize) -> f64 {
        self.index(x, y, band).map_or(f64::NAN, |i| self.data[i])
    }

    /// Out-of-range writes are ignored.
    fn set_sample(&mut self, x: i64, y: i64, band: usize, value: f64) {
        if let Some(i) = self.index(x, y, band) {
            self.data[i] = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_use_absolute_coordinates() {
        let r = MemoryRaster::from_fn(Bounds::new(10, 20, 3, 2), |x, y| (x * 100 + y) as f64);
        assert_eq!(r.sample(10, 20, 0), 1020.0);
        assert_eq!(r.sample(12, 21, 0), 1221.0);
    }

    #[test]
    fn out_of_bounds_read_is_null() {
        let r = MemoryRaster::filled(Bounds::new(0, 0, 2, 2), 1.0);
        assert!(r.sample(2, 0, 0).is_nan());
        assert!(r.sample(0, -1, 0).is_nan());
        assert!(r.sample(0, 0, 1).is_nan());
    }

    #[test]
    fn bands_are_interleaved() {
        let mut r = MemoryRaster::with_bands(Bounds::new(0, 0, 2, 1), 2, 0.0);
        r.set_sample(1, 0, 1, 5.0);
        assert_eq!(r.data(), &[0.0, 0.0, 0.0, 5.0]);
        assert_eq!(r.sample(1, 0, 1), 5.0);
    }

    #[test]
    fn shared_handle_coerces_to_dyn() {
        let typed = MemoryRaster::filled(Bounds::new(0, 0, 1, 1), 3.0).shared();
        let handle: RasterHandle = typed.clone();
        handle.lock().unwrap().set_sample(0, 0, 0, 4.0);
        assert_eq!(typed.lock().unwrap().sample(0, 0, 0), 4.0);
    }
}
