use log::{debug, warn};
use thiserror::Error;

use crate::compose::{compose_pages, PageCanvas};
use crate::job::{ExportJobState, ExportOptions};
use crate::paginate::{PaginateError, PaginationSummary, Paginator};
use crate::pdf::assemble_pdf;
use crate::preview::{render_preview_entry, PreviewCache, PreviewKey};
use crate::renderer::{DocumentRenderer, RenderRequest};
use crate::sink::DownloadSink;

/// Result produced after a completed export run.
/// 匯出作業完成後所產生的結果。
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub summary: PaginationSummary,
    pub pdf_data: Vec<u8>,
    pub file_name: String,
    pub state: ExportJobState,
}

/// Configuration for preview generation alongside the export.
#[derive(Debug)]
pub struct PreviewConfig<'a> {
    pub cache: &'a mut PreviewCache,
    pub zoom_levels: &'a [u32],
}

/// Errors raised while running the export pipeline.
///
/// There is no partial success: the first failing stage aborts the run and
/// nothing is saved. The UI layer turns any of these into a single
/// "failed to generate document" notification.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid export input: {0}")]
    InvalidInput(#[from] PaginateError),
    #[error("document rendering failed: {0}")]
    Render(String),
    #[error("preview rendering failed: {0}")]
    Preview(String),
    #[error("document assembly failed: {0}")]
    Assembly(String),
    #[error("saving the document failed: {0}")]
    Save(String),
}

/// Drives the export pipeline end-to-end: render, slice, compose, optional
/// previews, PDF assembly, save.
pub fn run_export_job<R, P, S>(
    renderer: &R,
    paginator: &P,
    request: &RenderRequest,
    options: &ExportOptions,
    sink: &S,
    preview: Option<PreviewConfig<'_>>,
) -> Result<ExportResult, ExportError>
where
    R: DocumentRenderer,
    P: Paginator,
    S: DownloadSink,
    S::Error: std::fmt::Display,
{
    let image = renderer
        .render(request)
        .map_err(|err| ExportError::Render(err.to_string()))?;
    debug!(
        "{}: rendered source raster {}x{}",
        options.job_id,
        image.width(),
        image.height()
    );

    let pagination = paginator.paginate(&image, options.paper, &options.paginate)?;
    let summary = pagination.summary.clone();
    debug!("{}: split into {} page(s)", options.job_id, summary.total_pages);

    let pages = compose_pages(&image, &pagination, options.paper);

    if let Some(config) = preview {
        cache_previews(config, options, &pages).map_err(ExportError::Preview)?;
    }

    let pdf_data = assemble_pdf(&pages, options.paper).map_err(ExportError::Assembly)?;

    let file_name = options.file_name();
    if let Err(err) = sink.save(&file_name, &pdf_data) {
        warn!("{}: save failed: {err}", options.job_id);
        return Err(ExportError::Save(err.to_string()));
    }

    Ok(ExportResult {
        summary,
        pdf_data,
        file_name,
        state: ExportJobState::Completed,
    })
}

fn cache_previews(
    config: PreviewConfig<'_>,
    options: &ExportOptions,
    pages: &[PageCanvas],
) -> Result<(), String> {
    for (index, canvas) in pages.iter().enumerate() {
        for zoom in config.zoom_levels {
            let entry = render_preview_entry(canvas, *zoom)?;
            config.cache.insert(
                PreviewKey {
                    job_id: options.job_id,
                    page: index as u32 + 1,
                    zoom_percent: *zoom,
                },
                entry,
            );
        }
    }
    Ok(())
}
