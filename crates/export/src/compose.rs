use image::{ImageBuffer, Rgba};

use crate::geometry::PaperSize;
use crate::paginate::{PaginationResult, Slice};
use crate::raster::RasterImage;

/// A composed output page, ready for preview encoding or PDF embedding.
pub type PageCanvas = ImageBuffer<Rgba<u8>, Vec<u8>>;

/// Full-page pixel dimensions at the density implied by the source raster.
pub fn page_pixel_size(image_width: u32, paper: PaperSize) -> (u32, u32) {
    let px_per_mm = paper.pixels_per_mm(image_width);
    let height = (paper.height_mm * px_per_mm).round().max(1.0) as u32;
    (image_width, height)
}

/// Draws one slice onto a blank page-sized canvas.
///
/// The slice is aligned to the top-left corner; the remainder of the page
/// stays paper-white, matching how the on-screen contract sits on A4.
pub fn compose_page(image: &RasterImage, slice: Slice, paper: PaperSize) -> PageCanvas {
    let (page_width, page_height) = page_pixel_size(image.width(), paper);
    let mut canvas = ImageBuffer::from_pixel(page_width, page_height, Rgba([255, 255, 255, 255]));

    for dy in 0..slice.height_px.min(page_height) {
        let sy = slice.start_row + dy;
        if sy >= image.height() {
            break;
        }
        let row = image.row(sy);
        for x in 0..image.width().min(page_width) {
            let idx = x as usize * 4;
            canvas.put_pixel(
                x,
                dy,
                Rgba([row[idx], row[idx + 1], row[idx + 2], row[idx + 3]]),
            );
        }
    }
    canvas
}

/// Maps every slice of a pagination result to its output page, in order.
pub fn compose_pages(
    image: &RasterImage,
    pagination: &PaginationResult,
    paper: PaperSize,
) -> Vec<PageCanvas> {
    pagination
        .slices
        .iter()
        .map(|slice| compose_page(image, *slice, paper))
        .collect()
}
