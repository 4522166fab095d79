// View transform of the grid: ctrl-drag pans, the buttons zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub panning: bool,
    pub last_x: f64,
    pub last_y: f64,
}

pub const MIN_ZOOM: f64 = 0.4;
pub const MAX_ZOOM: f64 = 3.0;
const ZOOM_STEP: f64 = 1.2;
pub const PAN_STEP: f64 = 64.0;

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            panning: false,
            last_x: 0.0,
            last_y: 0.0,
        }
    }
}

impl Camera {
    pub fn begin_pan(&mut self, x: f64, y: f64) {
        self.panning = true;
        self.last_x = x;
        self.last_y = y;
    }

    /// Follow the pointer while panning. Returns whether anything moved.
    pub fn drag_to(&mut self, x: f64, y: f64) -> bool {
        if !self.panning {
            return false;
        }
        self.pan_by(x - self.last_x, y - self.last_y);
        self.last_x = x;
        self.last_y = y;
        true
    }

    pub fn end_pan(&mut self) {
        self.panning = false;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    pub fn center(&mut self) {
        self.offset_x = 0.0;
        self.offset_y = 0.0;
        self.zoom = 1.0;
    }

    /// CSS transform for the grid element.
    pub fn transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.offset_x.round(),
            self.offset_y.round(),
            self.zoom
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_only_moves_while_panning() {
        let mut cam = Camera::default();
        assert!(!cam.drag_to(10.0, 10.0));
        cam.begin_pan(5.0, 5.0);
        assert!(cam.drag_to(15.0, 2.0));
        assert_eq!((cam.offset_x, cam.offset_y), (10.0, -3.0));
        cam.end_pan();
        assert!(!cam.drag_to(50.0, 50.0));
        assert_eq!(cam.transform(), "translate(10px, -3px) scale(1)");
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = Camera::default();
        for _ in 0..20 {
            cam.zoom_in();
        }
        assert_eq!(cam.zoom, MAX_ZOOM);
        for _ in 0..40 {
            cam.zoom_out();
        }
        assert_eq!(cam.zoom, MIN_ZOOM);
        cam.center();
        assert_eq!(cam, Camera::default());
    }
}
