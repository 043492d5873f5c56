use std::io::Write as _;

use crate::compose::PageCanvas;
use crate::geometry::PaperSize;

/// Encodes composed page canvases as one PDF document.
///
/// Every page holds a single uncompressed `/DeviceRGB` image XObject drawn
/// over the full media box, mirroring how the browser export stamped each
/// canvas slice onto its page. Assembly is atomic: either every page encodes
/// or the whole export fails.
pub fn assemble_pdf(pages: &[PageCanvas], paper: PaperSize) -> Result<Vec<u8>, String> {
    if pages.is_empty() {
        return Err("pagination produced no pages".to_string());
    }

    let (page_width_pt, page_height_pt) = paper.to_points();
    let mut builder = PdfBuilder::new();

    // Objects are numbered sequentially (image, contents, page dict per
    // page), so the parent /Pages reference can be computed up front.
    let pages_object = pages.len() * 3 + 1;
    let mut page_objects = Vec::with_capacity(pages.len());

    for (index, canvas) in pages.iter().enumerate() {
        let image_object = builder.add_image_xobject(canvas);
        let content = format!(
            "q\n{width} 0 0 {height} 0 0 cm\n/Im{index} Do\nQ\n",
            width = fmt_float(page_width_pt),
            height = fmt_float(page_height_pt),
            index = index,
        );
        let content_object = builder.add_stream(content.as_bytes());
        let page_object = builder.add_object(format!(
            "<< /Type /Page /Parent {parent} 0 R /MediaBox [0 0 {width} {height}] \
             /Resources << /XObject << /Im{index} {image} 0 R >> >> /Contents {content} 0 R >>",
            parent = pages_object,
            width = fmt_float(page_width_pt),
            height = fmt_float(page_height_pt),
            index = index,
            image = image_object,
            content = content_object,
        ));
        page_objects.push(page_object);
    }

    let kids = page_objects
        .iter()
        .map(|obj| format!("{obj} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");
    let pages_obj = builder.add_object(format!(
        "<< /Type /Pages /Count {count} /Kids [{kids}] >>",
        count = pages.len()
    ));
    debug_assert_eq!(pages_obj, pages_object);
    builder.set_catalog(format!("<< /Type /Catalog /Pages {pages_obj} 0 R >>"));

    Ok(builder.finish())
}

fn fmt_float(value: f32) -> String {
    format!("{:.3}", value)
}

struct PdfBuilder {
    objects: Vec<PdfObject>,
    catalog: Option<String>,
}

impl PdfBuilder {
    fn new() -> Self {
        Self {
            objects: Vec::new(),
            catalog: None,
        }
    }

    fn add_object(&mut self, body: impl Into<Vec<u8>>) -> usize {
        let number = self.objects.len() + 1;
        self.objects.push(PdfObject {
            number,
            body: body.into(),
        });
        number
    }

    fn add_stream(&mut self, stream: &[u8]) -> usize {
        let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        body.extend_from_slice(stream);
        body.extend_from_slice(b"\nendstream");
        self.add_object(body)
    }

    /// Adds an RGB image stream; the alpha channel is dropped since the page
    /// ground is already opaque white.
    fn add_image_xobject(&mut self, canvas: &PageCanvas) -> usize {
        let mut rgb = Vec::with_capacity(canvas.width() as usize * canvas.height() as usize * 3);
        for pixel in canvas.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
        }
        let mut body = format!(
            "<< /Type /XObject /Subtype /Image /Width {width} /Height {height} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Length {length} >>\nstream\n",
            width = canvas.width(),
            height = canvas.height(),
            length = rgb.len(),
        )
        .into_bytes();
        body.extend_from_slice(&rgb);
        body.extend_from_slice(b"\nendstream");
        self.add_object(body)
    }

    fn set_catalog(&mut self, catalog: String) {
        self.catalog = Some(catalog);
    }

    fn finish(mut self) -> Vec<u8> {
        if let Some(catalog) = self.catalog.take() {
            self.add_object(catalog);
        }

        let mut output = Vec::new();
        output.extend_from_slice(b"%PDF-1.4\n%\xFF\xFF\xFF\xFF\n");
        let mut offsets = Vec::with_capacity(self.objects.len() + 1);
        offsets.push(0);

        for object in &self.objects {
            offsets.push(output.len());
            let _ = write!(&mut output, "{} 0 obj\n", object.number);
            output.extend_from_slice(&object.body);
            output.extend_from_slice(b"\nendobj\n");
        }

        let xref_start = output.len();
        let _ = writeln!(
            &mut output,
            "xref\n0 {}\n0000000000 65535 f ",
            self.objects.len() + 1
        );
        for offset in offsets.iter().skip(1) {
            let _ = writeln!(&mut output, "{:010} 00000 n ", offset);
        }

        let _ = writeln!(
            &mut output,
            "trailer\n<< /Size {} /Root {} 0 R >>",
            self.objects.len() + 1,
            self.objects.len()
        );
        let _ = writeln!(&mut output, "startxref\n{}\n%%EOF", xref_start);

        output
    }
}

struct PdfObject {
    number: usize,
    body: Vec<u8>,
}
