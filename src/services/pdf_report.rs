//! PDF session report composition
//!
//! Builds a multi-section open-house report (header, session info,
//! statistics, visitor table, notes, footer) on US Letter portrait
//! pages. The builder owns the document, the page list, and a single
//! top-down cursor; footers are stamped in a second pass once the final
//! page count is known.
//!
//! The result is a finished byte buffer - no disk or network I/O here.

use crate::domain::{Session, Visitor};
use crate::services::format::{
    average_interest, calculate_duration, capitalize, format_date, format_duration, format_time,
    interest_percentage,
};
use anyhow::Context;
use chrono::{DateTime, Utc};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex,
    PdfLayerReference, PdfPageIndex, Point,
};

/// US Letter portrait (millimeters)
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
/// Uniform page margin (0.75 in)
const MARGIN_MM: f32 = 19.05;
const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
/// Minimum room required before starting a new section (~2 in)
const SECTION_MIN_ROOM_MM: f32 = 50.8;
/// Vertical reserve above the footer line
const FOOTER_RESERVE_MM: f32 = 16.0;

const PT_TO_MM: f32 = 0.352_778;
/// Approximate average glyph width as a fraction of the font size
const AVG_GLYPH_EM: f32 = 0.5;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 8.0;

/// Visitor table column offsets from the left margin (mm)
const COL_NAME_MM: f32 = 0.0;
const COL_EMAIL_MM: f32 = 52.0;
const COL_PHONE_MM: f32 = 112.0;
const COL_INTEREST_MM: f32 = 150.0;

const NAME_MAX_CHARS: usize = 20;
const EMAIL_MAX_CHARS: usize = 22;

/// Font face selector for [`ReportBuilder::write_line`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
    Italic,
}

/// Paginated document builder with an explicit top-down cursor
///
/// The cursor is the distance in millimeters from the top edge to the
/// next text baseline. Content writes advance it; `ensure_room` breaks
/// to a new page when the requested space would cross into the footer
/// reserve.
pub struct ReportBuilder {
    doc: PdfDocumentReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    current_page: usize,
    cursor_mm: f32,
}

impl ReportBuilder {
    pub fn new(title: &str) -> anyhow::Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .context("Failed to register Helvetica")?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .context("Failed to register Helvetica-Bold")?;
        let italic = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .context("Failed to register Helvetica-Oblique")?;

        Ok(Self {
            doc,
            regular,
            bold,
            italic,
            pages: vec![(page, layer)],
            current_page: 0,
            cursor_mm: MARGIN_MM + line_height(TITLE_SIZE),
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn font(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
            Face::Italic => &self.italic,
        }
    }

    fn layer(&self) -> PdfLayerReference {
        let (page, layer) = self.pages[self.current_page];
        self.doc.get_page(page).get_layer(layer)
    }

    fn layer_at(&self, index: usize) -> PdfLayerReference {
        let (page, layer) = self.pages[index];
        self.doc.get_page(page).get_layer(layer)
    }

    /// Start a fresh page and move the cursor to its top margin
    fn new_page(&mut self) {
        let (page, layer) =
            self.doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
        self.pages.push((page, layer));
        self.current_page = self.pages.len() - 1;
        self.cursor_mm = MARGIN_MM + line_height(BODY_SIZE);
    }

    /// Break to a new page unless `needed_mm` fits above the footer
    /// reserve. Returns true when a page break happened.
    fn ensure_room(&mut self, needed_mm: f32) -> bool {
        if self.cursor_mm + needed_mm > PAGE_HEIGHT_MM - MARGIN_MM - FOOTER_RESERVE_MM {
            self.new_page();
            return true;
        }
        false
    }

    /// Write one line at the cursor and advance by the line height
    fn write_line(&mut self, text: &str, size: f32, face: Face, x_offset_mm: f32) {
        self.ensure_room(line_height(size));
        let y = PAGE_HEIGHT_MM - self.cursor_mm;
        let font = self.font(face).clone();
        self.layer().use_text(text, size, Mm(MARGIN_MM + x_offset_mm), Mm(y), &font);
        self.cursor_mm += line_height(size);
    }

    /// Write one table row: column cells share a baseline, then the
    /// cursor advances once
    fn write_row(&mut self, cells: &[(f32, String)], size: f32, face: Face) {
        let y = PAGE_HEIGHT_MM - self.cursor_mm;
        let font = self.font(face).clone();
        let layer = self.layer();
        for (x_offset, text) in cells {
            layer.use_text(text.as_str(), size, Mm(MARGIN_MM + x_offset), Mm(y), &font);
        }
        self.cursor_mm += line_height(size);
    }

    /// Horizontal rule across the content width at the cursor
    fn divider(&mut self) {
        let y = PAGE_HEIGHT_MM - self.cursor_mm + 2.0;
        let layer = self.layer();
        layer.set_outline_thickness(0.5);
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN_MM), Mm(y)), false),
                (Point::new(Mm(PAGE_WIDTH_MM - MARGIN_MM), Mm(y)), false),
            ],
            is_closed: false,
        });
        self.cursor_mm += 3.0;
    }

    /// Section heading: requires ~2 in of room or breaks the page first
    fn section_heading(&mut self, title: &str) {
        self.ensure_room(SECTION_MIN_ROOM_MM);
        self.cursor_mm += 2.0;
        self.write_line(title, HEADING_SIZE, Face::Bold, 0.0);
        self.divider();
    }

    /// Stamp the footer on every page and serialize the document
    ///
    /// Footers can only be written once the page count is final.
    pub fn finish(self, generated_at: DateTime<Utc>) -> anyhow::Result<Vec<u8>> {
        let total = self.pages.len();
        let stamp = format!(
            "Generated {} at {}",
            format_date(generated_at),
            format_time(generated_at)
        );

        for index in 0..total {
            let layer = self.layer_at(index);
            let page_text = format!("Page {} of {}", index + 1, total);
            layer.use_text(
                page_text.as_str(),
                FOOTER_SIZE,
                Mm(centered_x(&page_text, FOOTER_SIZE)),
                Mm(12.0),
                &self.regular,
            );
            layer.use_text(
                stamp.as_str(),
                FOOTER_SIZE,
                Mm(centered_x(&stamp, FOOTER_SIZE)),
                Mm(8.0),
                &self.regular,
            );
        }

        self.doc.save_to_bytes().context("Failed to serialize PDF document")
    }
}

#[inline]
fn line_height(size: f32) -> f32 {
    size * 1.4 * PT_TO_MM
}

/// Approximate rendered width in millimeters (average glyph metric)
#[inline]
fn approx_width_mm(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_EM * PT_TO_MM
}

#[inline]
fn centered_x(text: &str, size: f32) -> f32 {
    (PAGE_WIDTH_MM - approx_width_mm(text, size)) / 2.0
}

/// Truncate to `max` characters, appending an ellipsis when shortened
fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max).collect();
    format!("{}...", head)
}

/// Greedy word wrap to a character budget; words longer than the
/// budget get a line of their own
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn visitor_table_header(builder: &mut ReportBuilder) {
    builder.write_row(
        &[
            (COL_NAME_MM, "Name".to_string()),
            (COL_EMAIL_MM, "Email".to_string()),
            (COL_PHONE_MM, "Phone".to_string()),
            (COL_INTEREST_MM, "Interest".to_string()),
        ],
        BODY_SIZE,
        Face::Bold,
    );
    builder.divider();
}

/// Compose the full session report and return the document bytes
pub fn generate_session_pdf(session: &Session, visitors: &[Visitor]) -> anyhow::Result<Vec<u8>> {
    let mut builder = ReportBuilder::new("Open House Session Report")?;

    // Header
    builder.write_line("Open House Session Report", TITLE_SIZE, Face::Bold, 0.0);
    builder.write_line(&session.property_address, 12.0, Face::Regular, 0.0);
    builder.write_line(
        &format!(
            "{} at {}",
            format_date(session.scheduled_date),
            format_time(session.scheduled_start_time)
        ),
        BODY_SIZE,
        Face::Regular,
        0.0,
    );
    builder.divider();

    // Session info
    builder.section_heading("Session Information");
    builder.write_line(
        &format!("Status: {}", capitalize(session.status.as_str())),
        BODY_SIZE,
        Face::Regular,
        0.0,
    );
    if let Some(start) = session.actual_start_time {
        builder.write_line(
            &format!("Actual Start: {}", format_time(start)),
            BODY_SIZE,
            Face::Regular,
            0.0,
        );
    }
    if let Some(end) = session.actual_end_time {
        builder.write_line(
            &format!("Actual End: {}", format_time(end)),
            BODY_SIZE,
            Face::Regular,
            0.0,
        );
    }
    if let Some(minutes) = calculate_duration(session) {
        builder.write_line(
            &format!("Duration: {}", format_duration(minutes)),
            BODY_SIZE,
            Face::Regular,
            0.0,
        );
    }

    // Statistics
    let dist = session.interest_level_distribution;
    builder.section_heading("Statistics");
    builder.write_line(
        &format!("Total Visitors: {}", session.visitor_count),
        BODY_SIZE,
        Face::Regular,
        0.0,
    );
    builder.write_line(
        &format!(
            "High Interest: {} ({}%)",
            dist.high,
            interest_percentage(dist.high, session.visitor_count)
        ),
        BODY_SIZE,
        Face::Regular,
        0.0,
    );
    builder.write_line(
        &format!(
            "Medium Interest: {} ({}%)",
            dist.medium,
            interest_percentage(dist.medium, session.visitor_count)
        ),
        BODY_SIZE,
        Face::Regular,
        0.0,
    );
    builder.write_line(
        &format!(
            "Low Interest: {} ({}%)",
            dist.low,
            interest_percentage(dist.low, session.visitor_count)
        ),
        BODY_SIZE,
        Face::Regular,
        0.0,
    );
    builder.write_line(
        &format!("Average Interest: {}", average_interest(session)),
        BODY_SIZE,
        Face::Regular,
        0.0,
    );

    // Visitor table, paginated row-by-row with the column header
    // re-emitted whenever a row lands on a fresh page
    builder.section_heading("Visitors");
    if visitors.is_empty() {
        builder.write_line("No visitors checked in", BODY_SIZE, Face::Italic, 0.0);
    } else {
        visitor_table_header(&mut builder);
        for visitor in visitors {
            if builder.ensure_room(line_height(BODY_SIZE)) {
                visitor_table_header(&mut builder);
            }
            builder.write_row(
                &[
                    (COL_NAME_MM, truncate_with_ellipsis(&visitor.name, NAME_MAX_CHARS)),
                    (COL_EMAIL_MM, truncate_with_ellipsis(&visitor.email, EMAIL_MAX_CHARS)),
                    (COL_PHONE_MM, visitor.phone.clone()),
                    (COL_INTEREST_MM, capitalize(visitor.interest_level.as_str())),
                ],
                BODY_SIZE,
                Face::Regular,
            );
        }
    }

    // Notes, wrapped to the content width and paginated line-by-line
    if let Some(notes) = session.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        let wrap_budget = (CONTENT_WIDTH_MM / (BODY_SIZE * AVG_GLYPH_EM * PT_TO_MM)) as usize;
        builder.section_heading("Notes");
        for line in wrap_text(notes, wrap_budget) {
            builder.write_line(&line, BODY_SIZE, Face::Regular, 0.0);
        }
    }

    builder.finish(Utc::now())
}
