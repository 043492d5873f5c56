//! Contract export pipeline shared by the ClientDesk UI layers.
//!
//! A renderer produces one tall raster of the whole contract; the paginator
//! slices it into page-sized bands, cutting on blank rows where it can; the
//! slices are composed onto A4 canvases, assembled into a PDF and handed to
//! a download sink.

pub mod compose;
pub mod controller;
pub mod geometry;
pub mod job;
pub mod paginate;
pub mod pdf;
pub mod preview;
pub mod raster;
pub mod renderer;
pub mod sink;

pub use compose::{compose_page, compose_pages, page_pixel_size, PageCanvas};
pub use controller::{run_export_job, ExportError, ExportResult, PreviewConfig};
pub use geometry::{PaperId, PaperSize};
pub use job::{export_file_name, ExportJobId, ExportJobState, ExportOptions};
pub use paginate::{
    PaginateError, PaginateOptions, PaginationResult, PaginationSummary, Paginator, Slice,
    WhitespacePaginator, DEFAULT_MAX_FILL_RATIO, DEFAULT_SEARCH_RATIO,
};
pub use pdf::assemble_pdf;
pub use preview::{render_preview_entry, PreviewCache, PreviewEntry, PreviewKey};
pub use raster::{RasterCanvas, RasterError, RasterImage, WHITE_THRESHOLD};
pub use renderer::{ColorOverrides, DocumentRenderer, RenderRequest};
pub use sink::{DirectorySink, DownloadSink};
