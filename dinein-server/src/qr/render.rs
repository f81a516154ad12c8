//! QR artifacts: guest URL, PNG image, data URL and printable PDF

use std::io::Cursor;

use base64::Engine;
use image::{DynamicImage, ImageFormat, Luma, imageops};
use qrcode::{Color, QrCode};
use thiserror::Error;
use uuid::Uuid;

/// Width of the downloadable PNG in pixels
pub const PNG_WIDTH: u32 = 500;

// A4 in PostScript points
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const PDF_QR_SIZE: f32 = 200.0;
const PDF_QR_TOP: f32 = 150.0;
const QUIET_ZONE: usize = 4;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Guest link embedded in the QR code
pub fn menu_url(base: &str, table_id: Uuid, token: &str) -> String {
    format!("{base}/menu?table={table_id}&token={token}")
}

/// Square PNG of exactly `width` pixels
pub fn png_bytes(url: &str, width: u32) -> Result<Vec<u8>, RenderError> {
    let code = QrCode::new(url.as_bytes())?;
    let mut img = code
        .render::<Luma<u8>>()
        .min_dimensions(width, width)
        .build();
    if img.width() != width {
        img = imageops::resize(&img, width, width, imageops::FilterType::Nearest);
    }

    let mut buffer = Vec::new();
    DynamicImage::ImageLuma8(img).write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}

/// `data:image/png;base64,...` for inline display in the admin UI
pub fn png_data_url(url: &str) -> Result<String, RenderError> {
    let png = png_bytes(url, PNG_WIDTH)?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    ))
}

/// Single A4 page: "Table N" heading, the QR code, and "Scan to Order"
pub fn pdf_bytes(table_number: &str, url: &str) -> Result<Vec<u8>, RenderError> {
    let code = QrCode::new(url.as_bytes())?;
    let modules = code.width();
    let colors = code.to_colors();

    let mut content = String::new();
    let heading = shared::models::display_name(table_number);
    centered_text(&mut content, &heading, 24.0, PAGE_HEIGHT - 80.0);

    // QR modules as filled squares, y axis grows upwards in PDF space
    let cell = PDF_QR_SIZE / (modules + 2 * QUIET_ZONE) as f32;
    let left = (PAGE_WIDTH - PDF_QR_SIZE) / 2.0 + cell * QUIET_ZONE as f32;
    let top = PAGE_HEIGHT - PDF_QR_TOP - cell * QUIET_ZONE as f32;
    content.push_str("0 g\n");
    for (i, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let (row, col) = (i / modules, i % modules);
        let x = left + col as f32 * cell;
        let y = top - (row + 1) as f32 * cell;
        content.push_str(&format!("{x:.2} {y:.2} {cell:.2} {cell:.2} re\n"));
    }
    content.push_str("f\n");

    let below_qr = PAGE_HEIGHT - PDF_QR_TOP - PDF_QR_SIZE - 40.0;
    centered_text(&mut content, "Scan to Order", 16.0, below_qr);

    Ok(PdfWriter::single_page(&content))
}

/// Helvetica advance widths (1/1000 em) for `' '..='~'`, from the standard AFM metrics
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 222, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    222, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Rendered width in points; unmappable characters are drawn as `?`
fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c {
            ' '..='~' => u32::from(HELVETICA_WIDTHS[c as usize - 0x20]),
            _ => u32::from(HELVETICA_WIDTHS[usize::from(b'?' - 0x20)]),
        })
        .sum();
    units as f32 * size / 1000.0
}

fn centered_text(out: &mut String, text: &str, size: f32, y: f32) {
    let x = ((PAGE_WIDTH - text_width(text, size)) / 2.0).max(36.0);
    out.push_str(&format!(
        "BT /F1 {size:.0} Tf {x:.2} {y:.2} Td ({}) Tj ET\n",
        escape_pdf_text(text)
    ));
}

/// Escape a string literal for a PDF content stream; non-ASCII becomes `?`
fn escape_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Minimal PDF 1.4 serializer for a one-page document with Helvetica
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn single_page(content: &str) -> Vec<u8> {
        let mut pdf = Self {
            buf: b"%PDF-1.4\n".to_vec(),
            offsets: Vec::new(),
        };

        pdf.object("<< /Type /Catalog /Pages 2 0 R >>");
        pdf.object("<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
        pdf.object(&format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
        ));
        pdf.object("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>");
        pdf.object(&format!(
            "<< /Length {} >>\nstream\n{content}endstream",
            content.len()
        ));
        pdf.finish()
    }

    fn object(&mut self, body: &str) {
        self.offsets.push(self.buf.len());
        let number = self.offsets.len();
        self.buf
            .extend_from_slice(format!("{number} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_at = self.buf.len();
        let count = self.offsets.len() + 1;
        let mut xref = format!("xref\n0 {count}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {count} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n"
        ));
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_url_format() {
        let id = Uuid::nil();
        assert_eq!(
            menu_url("http://localhost:5173", id, "abc.def.ghi"),
            "http://localhost:5173/menu?table=00000000-0000-0000-0000-000000000000&token=abc.def.ghi"
        );
    }

    #[test]
    fn png_has_requested_width() {
        let png = png_bytes("http://localhost:5173/menu?table=x&token=y", PNG_WIDTH).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (PNG_WIDTH, PNG_WIDTH));
    }

    #[test]
    fn data_url_prefix() {
        let url = png_data_url("http://example.test/menu").unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBOR"));
    }

    #[test]
    fn pdf_structure_and_text() {
        let pdf = pdf_bytes("T1", "http://example.test/menu?table=1&token=t").unwrap();
        let text = String::from_utf8(pdf.clone()).unwrap();

        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("(Table T1) Tj"));
        assert!(text.contains("(Scan to Order) Tj"));
        assert!(text.contains(" re\n"));

        // xref offsets point at the object headers
        let xref = text.rfind("xref\n").unwrap();
        let entries: Vec<usize> = text[xref..]
            .lines()
            .skip(3)
            .take(5)
            .map(|l| l[..10].parse().unwrap())
            .collect();
        for (i, offset) in entries.iter().enumerate() {
            assert!(text[*offset..].starts_with(&format!("{} 0 obj", i + 1)));
        }
    }

    #[test]
    fn text_width_uses_glyph_metrics() {
        // "Il" = 278 + 222, "WM" = 944 + 833
        assert!((text_width("Il", 10.0) - 5.0).abs() < 1e-4);
        assert!((text_width("WM", 10.0) - 17.77).abs() < 1e-4);
        assert_eq!(text_width("à", 10.0), text_width("?", 10.0));
    }

    #[test]
    fn heading_is_centered_on_the_page() {
        let mut content = String::new();
        centered_text(&mut content, "Scan to Order", 16.0, 100.0);
        let x = (PAGE_WIDTH - text_width("Scan to Order", 16.0)) / 2.0;
        assert!(content.starts_with(&format!("BT /F1 16 Tf {x:.2} 100.00 Td")));
    }

    #[test]
    fn pdf_text_is_escaped() {
        assert_eq!(escape_pdf_text("A (1)\\"), "A \\(1\\)\\\\");
        assert_eq!(escape_pdf_text("Bàn 5"), "B?n 5");
    }
}
