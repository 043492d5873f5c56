/// Supported paper identifiers for quick selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaperId {
    A4,
    Custom,
}

/// Represents a physical paper size in millimetres.
/// 以公釐表示的實體紙張尺寸。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperSize {
    pub id: PaperId,
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PaperSize {
    pub const fn new(id: PaperId, width_mm: f32, height_mm: f32) -> Self {
        Self {
            id,
            width_mm,
            height_mm,
        }
    }

    /// Portrait A4, the only size contracts are issued on.
    pub const fn a4() -> Self {
        Self::new(PaperId::A4, 210.0, 297.0)
    }

    /// Converts to PostScript points (1 pt = 1/72") for PDF media boxes.
    pub const fn to_points(&self) -> (f32, f32) {
        const MM_PER_INCH: f32 = 25.4;
        let width_in = self.width_mm / MM_PER_INCH;
        let height_in = self.height_mm / MM_PER_INCH;
        (width_in * 72.0, height_in * 72.0)
    }

    /// Pixel density implied by a raster spanning the full paper width.
    pub fn pixels_per_mm(&self, image_width: u32) -> f32 {
        image_width as f32 / self.width_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_points() {
        let (width_pt, height_pt) = PaperSize::a4().to_points();
        assert!((width_pt - 595.28).abs() < 0.01);
        assert!((height_pt - 841.89).abs() < 0.01);
    }

    #[test]
    fn density_follows_raster_width() {
        let paper = PaperSize::a4();
        assert!((paper.pixels_per_mm(420) - 2.0).abs() < f32::EPSILON);
    }
}
