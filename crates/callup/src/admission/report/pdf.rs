use super::render::RenderError;
use super::views::{ReportData, ReportRow, ReportSummary};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

// A4 landscape, millimetres.
const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 10.0;
const ROW_HEIGHT: f32 = 5.0;
const MAX_ROWS_PER_PAGE: usize = 25;
const LAYER: &str = "Layer 1";

const COLUMNS: [(f32, &str); 7] = [
    (10.0, "#"),
    (20.0, "Registration"),
    (50.0, "Candidate name"),
    (145.0, "Seat type"),
    (190.0, "General rank"),
    (215.0, "Quota rank"),
    (240.0, "Note"),
];

pub(super) struct Heading<'a> {
    pub(super) title: &'a str,
    pub(super) subtitle: &'a str,
    pub(super) generated_at: String,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Lays the call-up list out as a paginated PDF using the built-in Helvetica faces.
pub(super) fn render_pdf(
    data: &ReportData,
    heading: &Heading<'_>,
    rows_per_page: usize,
) -> Result<Vec<u8>, RenderError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(heading.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?,
    };

    let pages: Vec<&[ReportRow]> = data
        .rows
        .chunks(rows_per_page.clamp(1, MAX_ROWS_PER_PAGE))
        .collect();
    let total_pages = pages.len();

    let mut canvas = doc.get_page(first_page).get_layer(first_layer);
    let mut top = write_heading(&canvas, &fonts, heading, &data.summary);

    for (index, rows) in pages.iter().enumerate() {
        if index > 0 {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
            canvas = doc.get_page(page).get_layer(layer);
            top = PAGE_HEIGHT - 15.0;
        }
        write_table(&canvas, &fonts, rows, top);
        canvas.use_text(
            format!("Page {} of {}", index + 1, total_pages),
            8.0,
            Mm(PAGE_WIDTH - 35.0),
            Mm(8.0),
            &fonts.regular,
        );
    }

    doc.save_to_bytes().map_err(pdf_error)
}

/// Writes title and summary; returns the baseline where the table starts.
fn write_heading(
    canvas: &PdfLayerReference,
    fonts: &Fonts,
    heading: &Heading<'_>,
    summary: &ReportSummary,
) -> f32 {
    let mut y = PAGE_HEIGHT - 15.0;
    canvas.use_text(heading.title, 16.0, Mm(MARGIN), Mm(y), &fonts.bold);
    y -= 7.0;
    canvas.use_text(heading.subtitle, 12.0, Mm(MARGIN), Mm(y), &fonts.regular);
    y -= 6.0;
    canvas.use_text(
        format!("Generated at: {}", heading.generated_at),
        9.0,
        Mm(MARGIN),
        Mm(y),
        &fonts.regular,
    );
    y -= 7.0;

    for line in summary_lines(summary) {
        canvas.use_text(line, 9.0, Mm(MARGIN), Mm(y), &fonts.regular);
        y -= ROW_HEIGHT;
    }
    y - 3.0
}

fn summary_lines(summary: &ReportSummary) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Total called: {} of {} seats",
            summary.total_seated, summary.requested_seats
        ),
        format!(
            "Called on general merit: {} ({} quota-eligible)",
            summary.general_total, summary.quota_eligible_via_general
        ),
        format!("Called on quota seats: {}", summary.quota_total),
        format!(
            "Quota-eligible candidates called: {}",
            summary.quota_eligible_seated
        ),
    ];
    if summary.reallocated > 0 {
        lines.push(format!(
            "Seats reallocated from unfilled quota: {}",
            summary.reallocated
        ));
    }
    if summary.unfilled_seats > 0 {
        lines.push(format!(
            "Seats left unfilled (pool exhausted): {}",
            summary.unfilled_seats
        ));
    }
    lines
}

fn write_table(canvas: &PdfLayerReference, fonts: &Fonts, rows: &[ReportRow], top: f32) {
    for (x, label) in COLUMNS {
        canvas.use_text(label, 9.0, Mm(x), Mm(top), &fonts.bold);
    }

    for (offset, row) in rows.iter().enumerate() {
        let y = top - ROW_HEIGHT * (offset as f32 + 1.0);
        let cells = [
            row.index.to_string(),
            row.registration_id.to_string(),
            row.name.clone(),
            row.track_label.to_string(),
            row.general_rank.clone(),
            row.quota_rank.clone(),
            row.note.to_string(),
        ];
        for ((x, _), cell) in COLUMNS.iter().zip(cells) {
            canvas.use_text(cell, 8.0, Mm(*x), Mm(y), &fonts.regular);
        }
    }
}

fn pdf_error<E: std::fmt::Debug>(err: E) -> RenderError {
    RenderError::Pdf(format!("{err:?}"))
}
