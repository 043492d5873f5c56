use thiserror::Error;

use crate::geometry::PaperSize;
use crate::raster::RasterImage;

/// Fraction of one page's pixel height treated as usable before a break is forced.
pub const DEFAULT_MAX_FILL_RATIO: f32 = 0.95;

/// Fraction of one page's pixel height the cut search may walk back through.
pub const DEFAULT_SEARCH_RATIO: f32 = 0.15;

/// Tuning knobs for the whitespace-seeking cut search.
/// 留白切點搜尋所依據的調整參數。
#[derive(Debug, Clone, Copy)]
pub struct PaginateOptions {
    pub max_fill_ratio: f32,
    pub search_ratio: f32,
}

impl Default for PaginateOptions {
    fn default() -> Self {
        Self {
            max_fill_ratio: DEFAULT_MAX_FILL_RATIO,
            search_ratio: DEFAULT_SEARCH_RATIO,
        }
    }
}

/// One horizontal band of the source raster, becoming one output page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub start_row: u32,
    pub height_px: u32,
}

impl Slice {
    /// First row past the slice.
    pub const fn end_row(&self) -> u32 {
        self.start_row + self.height_px
    }
}

/// Summary produced after slicing.
#[derive(Debug, Clone)]
pub struct PaginationSummary {
    pub total_pages: u32,
    pub source_height_px: u32,
}

/// Result from running the paginator.
/// 分頁器執行後的整體結果。
#[derive(Debug, Clone)]
pub struct PaginationResult {
    pub slices: Vec<Slice>,
    pub summary: PaginationSummary,
}

/// Degenerate inputs rejected before any slicing happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaginateError {
    #[error("source image has no rows")]
    EmptyImage,
    #[error("paper width must be positive, got {0}mm")]
    InvalidPaper(f32),
}

/// Contract implemented by the slicing engine.
/// 切頁引擎需實作的介面契約。
pub trait Paginator {
    fn paginate(
        &self,
        image: &RasterImage,
        paper: PaperSize,
        options: &PaginateOptions,
    ) -> Result<PaginationResult, PaginateError>;
}

/// Paginator that prefers to cut on fully blank rows near each nominal page
/// boundary.
///
/// The source is one continuously rendered document, so a fixed-height cut
/// would regularly bisect a line of text or a table row. Scanning a bounded
/// window above the nominal boundary for a row of paper-white pixels finds
/// paragraph and section gaps without any knowledge of the document
/// structure. The window also caps how much page space the search can give
/// up while hunting for whitespace.
#[derive(Debug, Default)]
pub struct WhitespacePaginator;

impl WhitespacePaginator {
    /// Walks from `nominal` back towards the start of the current page and
    /// returns the first fully blank row, or `nominal` when the window holds
    /// none (hard cut).
    fn find_cut_row(image: &RasterImage, nominal: u32, search_range_px: u32) -> u32 {
        let min_row = nominal.saturating_sub(search_range_px);
        let mut y = nominal;
        loop {
            if image.is_row_blank(y) {
                return y;
            }
            if y == min_row {
                break;
            }
            y -= 1;
        }
        nominal
    }
}

impl Paginator for WhitespacePaginator {
    fn paginate(
        &self,
        image: &RasterImage,
        paper: PaperSize,
        options: &PaginateOptions,
    ) -> Result<PaginationResult, PaginateError> {
        if image.height() == 0 {
            return Err(PaginateError::EmptyImage);
        }
        if paper.width_mm <= 0.0 {
            return Err(PaginateError::InvalidPaper(paper.width_mm));
        }

        let px_per_mm = paper.pixels_per_mm(image.width());
        let page_height_px = paper.height_mm * px_per_mm;
        // Clamped to one row so degenerate geometry cannot stall the cursor.
        let max_page_height_px =
            ((page_height_px * options.max_fill_ratio).floor() as u32).max(1);
        let search_range_px = (page_height_px * options.search_ratio).floor() as u32;

        let mut slices = Vec::new();
        let mut y_offset = 0u32;
        while y_offset < image.height() {
            let remaining = image.height() - y_offset;
            let height_px = if remaining <= max_page_height_px {
                // Last (or only) page takes whatever is left.
                remaining
            } else {
                let nominal = y_offset + max_page_height_px;
                let cut_at = Self::find_cut_row(image, nominal, search_range_px);
                if cut_at <= y_offset {
                    // A cut at or before the slice start would produce an
                    // empty slice; take a full nominal page instead.
                    max_page_height_px
                } else {
                    cut_at - y_offset
                }
            };
            slices.push(Slice {
                start_row: y_offset,
                height_px,
            });
            y_offset += height_px;
        }

        let summary = PaginationSummary {
            total_pages: slices.len() as u32,
            source_height_px: image.height(),
        };
        Ok(PaginationResult { slices, summary })
    }
}
