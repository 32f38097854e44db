#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Area {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Area {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Area {
        Area { x, y, width, height }
    }

    /// Builds an area from `[left, top, right, bottom]` edges, as returned by `GetWindowRect`.
    pub fn from_edges(edges: [i32; 4]) -> Area {
        let [l, t, r, b] = edges;
        Area::new(l, t, r.saturating_sub(l).max(0) as u32, b.saturating_sub(t).max(0) as u32)
    }

    pub fn get_origin(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn get_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Sub-area expressed as fractions (0.0..=1.0) of this one.
    pub fn fraction(&self, x: f32, y: f32, width: f32, height: f32) -> Area {
        let (w, h) = (self.width as f32, self.height as f32);
        Area::new(
            self.x + (w * x).round() as i32,
            self.y + (h * y).round() as i32,
            (w * width).round().max(1.0) as u32,
            (h * height).round().max(1.0) as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Area;

    #[test]
    fn test_area() {
        let area1 = Area::new(-10, 0, 100, 100);
        let area2 = Area {
            x: -10,
            y: 0,
            width: 100,
            height: 100,
        };

        assert_eq!(area1, area2);
        assert_eq!(area1.get_origin(), (-10, 0));
        assert_eq!(area1.get_size(), (100, 100));
    }

    #[test]
    fn test_from_edges() {
        assert_eq!(Area::from_edges([10, 20, 210, 120]), Area::new(10, 20, 200, 100));
        assert_eq!(Area::from_edges([-1920, 0, 0, 1080]), Area::new(-1920, 0, 1920, 1080));
        assert_eq!(Area::from_edges([5, 5, 0, 0]), Area::new(5, 5, 0, 0));
    }

    #[test]
    fn test_fraction() {
        let screen = Area::new(0, 0, 1920, 1080);
        assert_eq!(screen.fraction(0.5, 0.5, 0.5, 0.5), Area::new(960, 540, 960, 540));
        assert_eq!(screen.fraction(0.0, 0.0, 1.0, 1.0), screen);

        let second = Area::new(1920, 0, 1280, 1024);
        assert_eq!(second.fraction(0.25, 0.0, 0.5, 1.0), Area::new(2240, 0, 640, 1024));
    }
}
