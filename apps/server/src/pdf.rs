//! PDF report rendering.
//!
//! Minimal title + table renderer on top of printpdf's builtin
//! Helvetica. Layout is intentionally plain: left-aligned columns of
//! equal width, new page when the cursor reaches the bottom margin.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::error::ApiError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const TOP_MM: f32 = 280.0;

/// One titled table inside a report.
pub struct Section {
    pub heading: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Renders a multi-section report to PDF bytes.
pub fn render_report(title: &str, sections: &[Section]) -> Result<Vec<u8>, ApiError> {
    let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Capa 1");

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ApiError::Internal(format!("PDF font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ApiError::Internal(format!("PDF font error: {e}")))?;

    let mut layer_ref = doc.get_page(page).get_layer(layer);
    let mut y = TOP_MM;

    layer_ref.use_text(title, 16.0, Mm(MARGIN_MM), Mm(y), &bold);
    y -= 12.0;

    for section in sections {
        let mut next_line = |layer_ref: &mut PdfLayerReference, y: &mut f32, needed: f32| {
            if *y < MARGIN_MM + needed {
                let (p, l) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Capa 1");
                *layer_ref = doc.get_page(p).get_layer(l);
                *y = TOP_MM;
            }
        };

        if !section.heading.is_empty() {
            next_line(&mut layer_ref, &mut y, 20.0);
            layer_ref.use_text(section.heading.as_str(), 13.0, Mm(MARGIN_MM), Mm(y), &bold);
            y -= 9.0;
        }

        let columns = section.headers.len().max(1);
        let col_width = (PAGE_WIDTH_MM - 2.0 * MARGIN_MM) / columns as f32;

        next_line(&mut layer_ref, &mut y, 14.0);
        write_row(&layer_ref, &section.headers, col_width, y, 11.0, &bold);
        y -= 7.0;

        for row in &section.rows {
            next_line(&mut layer_ref, &mut y, 6.0);
            write_row(&layer_ref, row, col_width, y, 10.0, &font);
            y -= 6.0;
        }

        y -= 6.0;
    }

    doc.save_to_bytes()
        .map_err(|e| ApiError::Internal(format!("PDF render error: {e}")))
}

/// Renders a single-table report.
pub fn render_table(
    title: &str,
    headers: &[&str],
    rows: Vec<Vec<String>>,
) -> Result<Vec<u8>, ApiError> {
    render_report(
        title,
        &[Section {
            heading: String::new(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }],
    )
}

fn write_row(
    layer: &PdfLayerReference,
    cells: &[String],
    col_width: f32,
    y: f32,
    size: f32,
    font: &IndirectFontRef,
) {
    for (i, cell) in cells.iter().enumerate() {
        layer.use_text(cell.as_str(), size, Mm(MARGIN_MM + i as f32 * col_width), Mm(y), font);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render_table(
            "Reporte de Inventario",
            &["Producto", "Stock"],
            vec![
                vec!["Protein".to_string(), "40".to_string()],
                vec!["Creatine".to_string(), "12".to_string()],
            ],
        )
        .unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_tables_paginate() {
        let rows = (0..200)
            .map(|i| vec![format!("Producto {i}"), i.to_string()])
            .collect();
        let bytes = render_table("Reporte", &["Producto", "Stock"], rows).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
