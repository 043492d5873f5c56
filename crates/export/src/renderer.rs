use std::collections::BTreeMap;

use crate::raster::RasterImage;

/// Named colours pinned to absolute RGBA values before rasterization.
///
/// Rendering surfaces resolve theme-dependent colours (OS dark mode, CSS
/// variables) at draw time, which would make the captured pixels vary by
/// environment. Overrides registered here take precedence over whatever the
/// renderer would compute, keeping the output visually deterministic.
#[derive(Debug, Clone, Default)]
pub struct ColorOverrides {
    entries: BTreeMap<String, [u8; 4]>,
}

impl ColorOverrides {
    pub fn set(&mut self, name: impl Into<String>, rgba: [u8; 4]) {
        self.entries.insert(name.into(), rgba);
    }

    pub fn get(&self, name: &str) -> Option<[u8; 4]> {
        self.entries.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parameters handed to a renderer ahead of rasterization.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Supersampling factor; 1 is native resolution.
    pub scale: u32,
    pub palette: ColorOverrides,
}

impl RenderRequest {
    pub fn with_scale(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
            palette: ColorOverrides::default(),
        }
    }
}

impl Default for RenderRequest {
    fn default() -> Self {
        // Contracts are captured at 2x for crisp text in the PDF.
        Self::with_scale(2)
    }
}

/// Abstraction over whatever turns a document view into pixels.
/// 將文件畫面轉為像素的渲染介面抽象。
pub trait DocumentRenderer {
    type Error: std::fmt::Display;

    fn render(&self, request: &RenderRequest) -> Result<RasterImage, Self::Error>;
}

/// Renderer returning a pre-baked raster (or a scripted failure) for tests.
#[cfg(test)]
pub struct MockRenderer {
    pub image: Result<RasterImage, String>,
}

#[cfg(test)]
impl MockRenderer {
    pub fn fixed(image: RasterImage) -> Self {
        Self { image: Ok(image) }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            image: Err(message.to_string()),
        }
    }
}

#[cfg(test)]
impl DocumentRenderer for MockRenderer {
    type Error = String;

    fn render(&self, _request: &RenderRequest) -> Result<RasterImage, Self::Error> {
        self.image.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_clamped_to_one() {
        assert_eq!(RenderRequest::with_scale(0).scale, 1);
        assert_eq!(RenderRequest::default().scale, 2);
    }

    #[test]
    fn overrides_resolve_by_name() {
        let mut palette = ColorOverrides::default();
        palette.set("primary", [124, 58, 237, 255]);
        assert_eq!(palette.get("primary"), Some([124, 58, 237, 255]));
        assert_eq!(palette.get("accent"), None);
    }
}
