use std::collections::hash_map::Entry;
use std::collections::HashMap;

use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ColorType, ImageEncoder};

use crate::compose::PageCanvas;
use crate::job::ExportJobId;

/// Cache key for rendered preview bitmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewKey {
    pub job_id: ExportJobId,
    pub page: u32,
    pub zoom_percent: u32,
}

/// Stored preview entry (PNG payload shown in the contract modal).
#[derive(Debug, Clone)]
pub struct PreviewEntry {
    pub width_px: u32,
    pub height_px: u32,
    pub data: Vec<u8>,
}

/// Scales a composed page to the requested zoom and encodes it as PNG.
pub fn render_preview_entry(canvas: &PageCanvas, zoom_percent: u32) -> Result<PreviewEntry, String> {
    let zoom = zoom_percent.max(1) as u64;
    let width_px = ((canvas.width() as u64 * zoom) / 100).max(1) as u32;
    let height_px = ((canvas.height() as u64 * zoom) / 100).max(1) as u32;

    let scaled;
    let raw = if (width_px, height_px) == canvas.dimensions() {
        canvas.as_raw().as_slice()
    } else {
        scaled = imageops::resize(canvas, width_px, height_px, FilterType::Triangle);
        scaled.as_raw().as_slice()
    };

    let mut data = Vec::new();
    PngEncoder::new(&mut data)
        .write_image(raw, width_px, height_px, ColorType::Rgba8)
        .map_err(|err| err.to_string())?;

    Ok(PreviewEntry {
        width_px,
        height_px,
        data,
    })
}

/// In-memory LRU-ish cache for preview pages.
/// 預覽頁面使用的記憶體內快取。
#[derive(Debug, Default)]
pub struct PreviewCache {
    entries: HashMap<PreviewKey, PreviewEntry>,
    order: Vec<PreviewKey>,
    capacity: usize,
}

impl PreviewCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            capacity,
        }
    }

    pub fn insert(&mut self, key: PreviewKey, entry: PreviewEntry) {
        if self.capacity == 0 {
            return;
        }
        let exists = self.entries.contains_key(&key);
        if !exists && self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.first().copied() {
                self.entries.remove(&oldest);
                self.order.remove(0);
            }
        }

        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(entry);
                self.touch(key);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
                self.order.push(key);
            }
        }
    }

    pub fn get(&mut self, key: &PreviewKey) -> Option<&PreviewEntry> {
        if self.entries.contains_key(key) {
            self.touch(*key);
            self.entries.get(key)
        } else {
            None
        }
    }

    /// Drops every cached page belonging to one export job.
    pub fn remove_job(&mut self, job_id: ExportJobId) {
        self.entries.retain(|key, _| key.job_id != job_id);
        self.order.retain(|key| key.job_id != job_id);
    }

    /// Drops the cached entries for a span of pages of one job, at every
    /// zoom level. Used when a re-render shifts page boundaries mid-document.
    pub fn invalidate_page_range(
        &mut self,
        job_id: ExportJobId,
        pages: std::ops::RangeInclusive<u32>,
    ) {
        let stale =
            |key: &PreviewKey| key.job_id == job_id && pages.contains(&key.page);
        self.entries.retain(|key, _| !stale(key));
        self.order.retain(|key| !stale(key));
    }

    fn touch(&mut self, key: PreviewKey) {
        if let Some(idx) = self.order.iter().position(|k| *k == key) {
            let key = self.order.remove(idx);
            self.order.push(key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn page(width: u32, height: u32) -> PageCanvas {
        ImageBuffer::from_pixel(width, height, Rgba([255, 255, 255, 255]))
    }

    fn entry() -> PreviewEntry {
        PreviewEntry {
            width_px: 1,
            height_px: 1,
            data: vec![0],
        }
    }

    #[test]
    fn preview_png_has_magic_and_zoomed_size() {
        let preview = render_preview_entry(&page(100, 200), 50).unwrap();
        assert_eq!((preview.width_px, preview.height_px), (50, 100));
        assert_eq!(&preview.data[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn full_zoom_keeps_native_dimensions() {
        let preview = render_preview_entry(&page(30, 40), 100).unwrap();
        assert_eq!((preview.width_px, preview.height_px), (30, 40));
    }

    #[test]
    fn cache_evicts_oldest_when_full() {
        let job_a = ExportJobId::new();
        let job_b = ExportJobId::new();
        let mut cache = PreviewCache::with_capacity(2);

        let key = |job_id, n| PreviewKey {
            job_id,
            page: n,
            zoom_percent: 100,
        };
        cache.insert(key(job_a, 1), entry());
        cache.insert(key(job_a, 2), entry());
        cache.insert(key(job_b, 1), entry());

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key(job_a, 1)).is_none());
        assert!(cache.get(&key(job_b, 1)).is_some());
    }

    #[test]
    fn invalidating_a_page_range_spares_later_pages() {
        let job = ExportJobId::new();
        let mut cache = PreviewCache::with_capacity(8);
        for page in 1..=4 {
            cache.insert(
                PreviewKey {
                    job_id: job,
                    page,
                    zoom_percent: 100,
                },
                entry(),
            );
        }

        cache.invalidate_page_range(job, 2..=3);
        let cached: Vec<u32> = (1..=4)
            .filter(|&page| {
                cache
                    .get(&PreviewKey {
                        job_id: job,
                        page,
                        zoom_percent: 100,
                    })
                    .is_some()
            })
            .collect();
        assert_eq!(cached, vec![1, 4]);
    }

    #[test]
    fn remove_job_clears_only_that_job() {
        let job_a = ExportJobId::new();
        let job_b = ExportJobId::new();
        let mut cache = PreviewCache::with_capacity(8);
        cache.insert(
            PreviewKey {
                job_id: job_a,
                page: 1,
                zoom_percent: 100,
            },
            entry(),
        );
        cache.insert(
            PreviewKey {
                job_id: job_b,
                page: 1,
                zoom_percent: 100,
            },
            entry(),
        );

        cache.remove_job(job_a);
        assert_eq!(cache.len(), 1);
        assert!(cache
            .get(&PreviewKey {
                job_id: job_b,
                page: 1,
                zoom_percent: 100,
            })
            .is_some());
    }
}
