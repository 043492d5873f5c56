//! Contract domain model for ClientDesk.
//!
//! Client records and provider settings are composed into a block-level
//! contract document, which the renderer turns into the tall raster the
//! export pipeline paginates and assembles into a PDF.

pub mod client;
pub mod document;
pub mod render;
pub mod settings;
pub mod template;

pub use client::{Client, PaymentMethod};
pub use document::{Block, ContractDocument, ExportFlags, Signatory};
pub use render::{ContractRenderer, RenderError, BASE_PIXELS_PER_MM, PAGE_MARGIN_MM};
pub use settings::{Color, ColorParseError, ContractSettings};
pub use template::{ClauseTemplate, ContractContext, TemplateError, Token, MISSING_FIELD};
