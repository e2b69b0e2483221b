//! Surface size bookkeeping that normalizes platform quirks.
//!
//! Wayland may report zero-size windows before the compositor assigns a
//! size, and DPI changes alter physical size without a logical resize. This
//! wrapper always reports clamped physical pixels plus the scale factor.

/// Minimum surface dimension (prevents zero-size panics).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Physical pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

/// Produced when the surface dimensions actually change.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceResizeEvent {
    pub physical: PhysicalSize,
    pub scale_factor: f64,
}

/// Tracks the current surface size and scale factor.
pub struct SurfaceWrapper {
    physical_width: u32,
    physical_height: u32,
    scale_factor: f64,
    configured: bool,
}

impl SurfaceWrapper {
    /// Zero initial dimensions are clamped to 1 and leave the wrapper unconfigured.
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            physical_width: physical_width.max(MIN_SURFACE_DIMENSION),
            physical_height: physical_height.max(MIN_SURFACE_DIMENSION),
            scale_factor,
            configured: physical_width > 0 && physical_height > 0,
        }
    }

    /// Returns a resize event if the clamped dimensions changed.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let width = physical_width.max(MIN_SURFACE_DIMENSION);
        let height = physical_height.max(MIN_SURFACE_DIMENSION);

        if width == self.physical_width && height == self.physical_height {
            return None;
        }

        self.physical_width = width;
        self.physical_height = height;
        self.configured = true;

        Some(SurfaceResizeEvent {
            physical: PhysicalSize { width, height },
            scale_factor: self.scale_factor,
        })
    }

    /// Record a new scale factor, then treat the new physical size as a resize.
    pub fn handle_scale_factor_changed(
        &mut self,
        new_scale_factor: f64,
        new_physical_width: u32,
        new_physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        self.scale_factor = new_scale_factor;
        self.handle_resize(new_physical_width, new_physical_height)
    }

    pub fn physical_size(&self) -> PhysicalSize {
        PhysicalSize {
            width: self.physical_width,
            height: self.physical_height,
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn is_ready(&self) -> bool {
        self.configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_is_clamped_and_not_ready() {
        let s = SurfaceWrapper::new(0, 0, 1.0);
        assert_eq!(s.physical_size(), PhysicalSize { width: 1, height: 1 });
        assert!(!s.is_ready());
    }

    #[test]
    fn test_resize_same_dimensions_is_none() {
        let mut s = SurfaceWrapper::new(800, 600, 1.0);
        assert!(s.handle_resize(800, 600).is_none());
    }

    #[test]
    fn test_resize_reports_new_size() {
        let mut s = SurfaceWrapper::new(0, 0, 1.0);
        let event = s.handle_resize(1024, 768).unwrap();
        assert_eq!(event.physical.width, 1024);
        assert!(s.is_ready());
    }

    #[test]
    fn test_scale_factor_change() {
        let mut s = SurfaceWrapper::new(800, 600, 1.0);
        let event = s.handle_scale_factor_changed(2.0, 1600, 1200).unwrap();
        assert_eq!(event.scale_factor, 2.0);
        assert_eq!(s.scale_factor(), 2.0);
    }
}
