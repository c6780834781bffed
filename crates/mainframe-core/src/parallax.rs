// Decorative parallax offset derived from the pointer position.

/// Largest offset, in cells, along either axis.
pub const PARALLAX_STRENGTH: f64 = 3.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parallax {
    strength: f64,
}

impl Default for Parallax {
    fn default() -> Self {
        Self::new(PARALLAX_STRENGTH)
    }
}

impl Parallax {
    pub fn new(strength: f64) -> Self {
        Self {
            strength: strength.abs(),
        }
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Offset for a pointer at `pointer` inside an area of `size`, both in
    /// the same units. The center maps to zero and each axis is clamped to
    /// `±strength`, so pointers outside the area stay bounded.
    pub fn offset(&self, pointer: (f64, f64), size: (f64, f64)) -> Offset {
        let (width, height) = size;
        if width <= 0.0 || height <= 0.0 {
            return Offset::default();
        }
        let axis = |pos: f64, len: f64| {
            let centered = (pos / len - 0.5) * 2.0;
            (centered * self.strength).clamp(-self.strength, self.strength)
        };
        Offset {
            x: axis(pointer.0, width),
            y: axis(pointer.1, height),
        }
    }
}
