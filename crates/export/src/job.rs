use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use regex::Regex;

use crate::geometry::PaperSize;
use crate::paginate::PaginateOptions;

/// Opaque identifier for one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExportJobId(u64);

impl ExportJobId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ExportJobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExportJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "export-job-{}", self.0)
    }
}

/// Progress marker for UI/analytics hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportJobState {
    Idle,
    Render,
    Paginate,
    Assemble,
    Save,
    Completed,
    Failed,
}

/// Options supplied when requesting a contract export.
/// 要求匯出合約時所提供的選項。
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub job_id: ExportJobId,
    pub paper: PaperSize,
    pub paginate: PaginateOptions,
    /// Usually the client name; whitespace is collapsed for the filename.
    pub file_stem: String,
    /// Issue date pre-formatted upstream (ISO `YYYY-MM-DD`). Kept as data so
    /// the pipeline itself stays clock-free.
    pub issued_on: String,
}

impl ExportOptions {
    pub fn new(file_stem: impl Into<String>, issued_on: impl Into<String>) -> Self {
        Self {
            job_id: ExportJobId::new(),
            paper: PaperSize::a4(),
            paginate: PaginateOptions::default(),
            file_stem: file_stem.into(),
            issued_on: issued_on.into(),
        }
    }

    pub fn file_name(&self) -> String {
        export_file_name(&self.file_stem, &self.issued_on)
    }
}

/// Builds `Contrato_<stem>_<date>.pdf`, collapsing whitespace runs to
/// underscores so the name survives every download dialog.
pub fn export_file_name(stem: &str, issued_on: &str) -> String {
    let whitespace = Regex::new(r"\s+").expect("static pattern");
    format!(
        "Contrato_{}_{}.pdf",
        whitespace.replace_all(stem.trim(), "_"),
        issued_on
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_ids_are_unique() {
        let first = ExportJobId::new();
        let second = ExportJobId::new();
        assert_ne!(first, second);
    }

    #[test]
    fn file_name_collapses_whitespace() {
        assert_eq!(
            export_file_name("Ana  Clara\tSouza", "2025-07-01"),
            "Contrato_Ana_Clara_Souza_2025-07-01.pdf"
        );
    }

    #[test]
    fn file_name_trims_edges() {
        assert_eq!(
            export_file_name("  Loja do Pedro ", "2025-01-15"),
            "Contrato_Loja_do_Pedro_2025-01-15.pdf"
        );
    }

    #[test]
    fn default_options_target_a4() {
        let options = ExportOptions::new("Cliente", "2025-03-09");
        assert_eq!(options.paper, PaperSize::a4());
        assert_eq!(options.file_name(), "Contrato_Cliente_2025-03-09.pdf");
    }
}
