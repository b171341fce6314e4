//! Claim report composer.
//!
//! Renders a [`ClaimReportInput`] into a paginated PDF with a fixed visual
//! grammar: branded header, status box, incident/claimant/counterparty
//! sections, optional witness section, a photo page, and a summary page.
//! A photo that cannot be embedded is replaced by a placeholder line; one
//! bad photo never loses the rest of the report.

pub mod fields;
pub mod layout;
pub mod pdf;

use crate::claim::{ClaimReportInput, LabeledPhoto, Party};
use crate::cli::PdfQuality;
use crate::error::Result;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use self::fields::{or_na, Row};
use self::layout::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use self::pdf::{FontStyle, PreparedPhoto, ReportWriter, BLUE, GOLD, GREEN, INDIGO, RED};
use std::path::Path;

const WHITE: (u8, u8, u8) = (255, 255, 255);
const BLACK: (u8, u8, u8) = (0, 0, 0);
const DARK: (u8, u8, u8) = (30, 30, 30);
const HEADING_GRAY: (u8, u8, u8) = (50, 50, 50);
const LABEL_GRAY: (u8, u8, u8) = (80, 80, 80);
const MUTED_GRAY: (u8, u8, u8) = (100, 100, 100);
const FOOTER_GRAY: (u8, u8, u8) = (120, 120, 120);
const PLACEHOLDER_GRAY: (u8, u8, u8) = (150, 150, 150);
const BORDER_GRAY: (u8, u8, u8) = (200, 200, 200);
const BOX_BORDER_GRAY: (u8, u8, u8) = (220, 220, 220);
const BOX_FILL_GRAY: (u8, u8, u8) = (240, 240, 240);
const CARD_FILL_GRAY: (u8, u8, u8) = (250, 250, 250);

pub const EMBED_PLACEHOLDER: &str = "[Photo could not be embedded]";

const FOOTER_GENERATED: &str =
    "This document was generated by QCAR Insurance Claims System.";
const FOOTER_RETAIN: &str = "Please retain this report for your records.";

/// Why one photo could not be turned into an embeddable image.
#[derive(Debug, Clone)]
pub struct EmbedError(pub String);

type EmbedResult = std::result::Result<PreparedPhoto, EmbedError>;

/// Resolves a photo source to raw bytes: a `data:` URL is base64-decoded,
/// anything else is read as a file path.
pub fn resolve_photo_source(source: &str) -> std::result::Result<Vec<u8>, EmbedError> {
    if let Some(rest) = source.strip_prefix("data:") {
        let payload = rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| EmbedError("malformed data URL".to_string()))?;
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| EmbedError(e.to_string()))
    } else {
        std::fs::read(source).map_err(|e| EmbedError(e.to_string()))
    }
}

/// Converts raw photo bytes to an embeddable JPEG at the given quality.
pub fn prepare_photo(bytes: &[u8], quality: PdfQuality) -> EmbedResult {
    let img = image::load_from_memory(bytes).map_err(|e| EmbedError(e.to_string()))?;

    let img = if img.width() > quality.max_width() {
        img.resize(quality.max_width(), u32::MAX, FilterType::Triangle)
    } else {
        img
    };

    let rgb = img.to_rgb8();
    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality.jpeg_quality());
    encoder
        .encode_image(&rgb)
        .map_err(|e| EmbedError(e.to_string()))?;

    Ok(PreparedPhoto {
        jpeg,
        width_px: rgb.width(),
        height_px: rgb.height(),
    })
}

/// Converts every photo, collecting per-photo outcomes without ever
/// short-circuiting: a failed photo stays in the sequence as an error so
/// the renderer can substitute its placeholder in position.
pub async fn prepare_photos(
    photos: Vec<LabeledPhoto>,
    quality: PdfQuality,
) -> Vec<(String, EmbedResult)> {
    let mut prepared = Vec::with_capacity(photos.len());

    for photo in photos {
        let label = photo.label.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let bytes = resolve_photo_source(&photo.source)?;
            prepare_photo(&bytes, quality)
        })
        .await
        .unwrap_or_else(|e| Err(EmbedError(e.to_string())));

        prepared.push((label, outcome));
    }

    prepared
}

/// Renders the full report and returns the PDF bytes.
pub async fn compose_report(claim: &ClaimReportInput, quality: PdfQuality) -> Result<Vec<u8>> {
    let prepared = prepare_photos(claim.labeled_photos(), quality).await;
    render(claim, &prepared)
}

/// Composes and writes the report next to the given path.
pub async fn generate_report(
    claim: &ClaimReportInput,
    quality: PdfQuality,
    output_path: &Path,
) -> Result<()> {
    let bytes = compose_report(claim, quality).await?;
    std::fs::write(output_path, bytes)?;
    Ok(())
}

/// Default download-style file name: `Claim-<ID8>.pdf`.
pub fn default_output_name(claim: &ClaimReportInput) -> String {
    format!("Claim-{}.pdf", claim.report_id())
}

fn render(claim: &ClaimReportInput, photos: &[(String, EmbedResult)]) -> Result<Vec<u8>> {
    let mut w = ReportWriter::new("Insurance Claim Report")?;

    draw_header(&mut w, claim);
    draw_status_box(&mut w, claim);
    draw_incident_section(&mut w, claim);

    draw_party_section(&mut w, "CLAIMANT DETAILS (YOUR INFORMATION)", BLUE, &claim.claimant);

    if claim.other_party.has_name() {
        draw_party_section(&mut w, "THIRD PARTY DETAILS", RED, &claim.other_party);
    }

    draw_witness_section(&mut w, claim);
    draw_photo_section(&mut w, photos);
    draw_summary_page(&mut w, claim);

    w.save()
}

fn section_header(w: &mut ReportWriter, title: &str, color: (u8, u8, u8)) {
    w.ensure_space(20.0);
    let y = w.cursor.y();
    w.fill_rect(15.0, y - 5.0, PAGE_WIDTH_MM - 30.0, 10.0, color);
    w.text(title, 12.0, 20.0, y + 2.0, FontStyle::Bold, BLACK);
    w.cursor.advance(12.0);
}

/// Full-width label/value row; the value wraps to the remaining width.
fn info_row(w: &mut ReportWriter, label: &str, value: &str) {
    w.ensure_space(8.0);
    let y = w.cursor.y();
    let indent = 20.0;

    let label_text = format!("{}:", label);
    w.text(&label_text, 9.0, indent, y, FontStyle::Bold, LABEL_GRAY);

    let label_width = layout::text_width_mm(&format!("{}: ", label), 9.0);
    let max_value_width = PAGE_WIDTH_MM - indent - label_width - 20.0;
    let lines = layout::wrap_text(value, max_value_width, 9.0);
    for (i, line) in lines.iter().enumerate() {
        w.text(
            line,
            9.0,
            indent + label_width,
            y + i as f32 * 5.0,
            FontStyle::Regular,
            DARK,
        );
    }
    w.cursor.advance(lines.len() as f32 * 5.0 + 2.0);
}

fn two_column_row(w: &mut ReportWriter, label1: &str, value1: &str, label2: &str, value2: &str) {
    w.ensure_space(8.0);
    let y = w.cursor.y();
    let col1_x = 20.0;
    let col2_x = PAGE_WIDTH_MM / 2.0 + 5.0;

    w.text(&format!("{}:", label1), 9.0, col1_x, y, FontStyle::Bold, LABEL_GRAY);
    w.text(&format!("{}:", label2), 9.0, col2_x, y, FontStyle::Bold, LABEL_GRAY);

    w.text(value1, 9.0, col1_x + 45.0, y, FontStyle::Regular, DARK);
    w.text(value2, 9.0, col2_x + 45.0, y, FontStyle::Regular, DARK);
    w.cursor.advance(7.0);
}

fn draw_row(w: &mut ReportWriter, row: &Row) {
    match row {
        Row::Two {
            label1,
            value1,
            label2,
            value2,
        } => two_column_row(w, label1, value1, label2, value2),
        Row::Single { label, value } => info_row(w, label, value),
    }
}

/// Wrapped paragraph block with a page-break check before every line.
fn wrapped_paragraph(w: &mut ReportWriter, text: &str, style: FontStyle, color: (u8, u8, u8)) {
    let lines = layout::wrap_text(text, PAGE_WIDTH_MM - 40.0, 9.0);
    for line in &lines {
        w.ensure_space(6.0);
        w.text(line, 9.0, 20.0, w.cursor.y(), style, color);
        w.cursor.advance(5.0);
    }
}

fn draw_header(w: &mut ReportWriter, claim: &ClaimReportInput) {
    w.fill_rect(0.0, 0.0, PAGE_WIDTH_MM, 35.0, GOLD);

    w.text("QCAR", 24.0, 20.0, 18.0, FontStyle::Bold, BLACK);
    w.text("Insurance Claim Report", 14.0, 20.0, 28.0, FontStyle::Regular, BLACK);

    let generated = match claim.generated_at.as_deref() {
        Some(g) => fields::format_date(Some(g)),
        None => chrono::Local::now().format("%m/%d/%Y").to_string(),
    };
    w.text_right(
        &format!("Report ID: {}", claim.report_id()),
        10.0,
        PAGE_WIDTH_MM - 20.0,
        18.0,
        FontStyle::Regular,
        (40, 40, 40),
    );
    w.text_right(
        &format!("Generated: {}", generated),
        10.0,
        PAGE_WIDTH_MM - 20.0,
        26.0,
        FontStyle::Regular,
        (40, 40, 40),
    );

    w.cursor.set(50.0);
}

fn draw_status_box(w: &mut ReportWriter, claim: &ClaimReportInput) {
    let y = w.cursor.y();
    w.fill_rect(15.0, y - 5.0, PAGE_WIDTH_MM - 30.0, 25.0, BOX_FILL_GRAY);

    w.text("CLAIM STATUS:", 10.0, 20.0, y + 5.0, FontStyle::Bold, HEADING_GRAY);

    let status = claim.status.as_deref().unwrap_or("draft");
    let status_color = if status == "submitted" { GREEN } else { MUTED_GRAY };
    w.text(&status.to_uppercase(), 10.0, 70.0, y + 5.0, FontStyle::Bold, status_color);

    w.text("DATE FILED:", 10.0, 120.0, y + 5.0, FontStyle::Bold, HEADING_GRAY);
    w.text(
        &fields::format_date(claim.created_at.as_deref()),
        10.0,
        155.0,
        y + 5.0,
        FontStyle::Regular,
        HEADING_GRAY,
    );

    w.cursor.advance(35.0);
}

fn draw_incident_section(w: &mut ReportWriter, claim: &ClaimReportInput) {
    section_header(w, "INCIDENT DETAILS", GOLD);

    two_column_row(
        w,
        "Location",
        &or_na(claim.incident_location.as_deref()),
        "Date & Time",
        &fields::format_date_time(claim.incident_time.as_deref()),
    );
    info_row(w, "Weather Conditions", &or_na(claim.weather_conditions.as_deref()));
    w.cursor.advance(5.0);

    w.ensure_space(12.0);
    w.text(
        "Description of Incident:",
        9.0,
        20.0,
        w.cursor.y(),
        FontStyle::Bold,
        LABEL_GRAY,
    );
    w.cursor.advance(6.0);

    let description = claim
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("No description provided");
    wrapped_paragraph(w, description, FontStyle::Regular, DARK);
    w.cursor.advance(10.0);
}

fn draw_party_section(w: &mut ReportWriter, title: &str, color: (u8, u8, u8), party: &Party) {
    section_header(w, title, color);

    for subsection in fields::party_subsections(party) {
        w.ensure_space(16.0);
        w.text(subsection.title, 10.0, 20.0, w.cursor.y(), FontStyle::Bold, color);
        w.cursor.advance(8.0);

        for row in &subsection.rows {
            draw_row(w, row);
        }
        w.cursor.advance(5.0);
    }
    w.cursor.advance(5.0);
}

fn draw_witness_section(w: &mut ReportWriter, claim: &ClaimReportInput) {
    let witnesses = claim.present_witnesses();
    if witnesses.is_empty() {
        return;
    }

    w.ensure_space(60.0);
    section_header(w, "WITNESS INFORMATION", INDIGO);

    for (i, (number, witness)) in witnesses.iter().enumerate() {
        if i > 0 {
            w.ensure_space(40.0);
        }

        w.text(
            &format!("Witness {}", number),
            10.0,
            20.0,
            w.cursor.y(),
            FontStyle::Bold,
            INDIGO,
        );
        w.cursor.advance(8.0);

        two_column_row(
            w,
            "Full Name",
            &witness.name,
            "Phone",
            &or_na(witness.phone.as_deref()),
        );
        info_row(w, "Address", &or_na(witness.address.as_deref()));

        if let Some(statement) = witness.statement.as_deref().filter(|s| !s.trim().is_empty()) {
            w.ensure_space(12.0);
            w.text("Statement:", 9.0, 20.0, w.cursor.y(), FontStyle::Bold, LABEL_GRAY);
            w.cursor.advance(6.0);
            wrapped_paragraph(w, &format!("\"{}\"", statement), FontStyle::Italic, HEADING_GRAY);
        }
        w.cursor.advance(5.0);
    }
    w.cursor.advance(5.0);
}

fn draw_photo_section(w: &mut ReportWriter, photos: &[(String, EmbedResult)]) {
    if photos.is_empty() {
        return;
    }

    // Photos always start on a fresh page with their own banner.
    w.new_page();
    w.fill_rect(0.0, 0.0, PAGE_WIDTH_MM, 25.0, GOLD);
    w.text("SCENE PHOTOGRAPHS", 16.0, 20.0, 16.0, FontStyle::Bold, BLACK);
    w.text_right(
        &format!("{} Photos Attached", photos.len()),
        10.0,
        PAGE_WIDTH_MM - 20.0,
        16.0,
        FontStyle::Bold,
        BLACK,
    );
    w.cursor.set(40.0);

    for (i, (label, outcome)) in photos.iter().enumerate() {
        if w.cursor.y() > PAGE_HEIGHT_MM - 90.0 {
            w.new_page();
        }

        let y = w.cursor.y();

        // Numbered badge and guide label.
        w.fill_circle(25.0, y + 3.0, 4.0, BLUE);
        w.text(&(i + 1).to_string(), 8.0, 23.5, y + 5.0, FontStyle::Regular, WHITE);
        w.text(label, 11.0, 35.0, y + 5.0, FontStyle::Bold, (40, 40, 40));
        w.cursor.advance(12.0);

        let y = w.cursor.y();
        let embedded = match outcome {
            Ok(photo) => {
                w.stroke_rect(19.0, y - 1.0, 82.0, 62.0, BORDER_GRAY, 0.5);
                w.image_at(photo, 20.0, y, 80.0, 60.0).is_ok()
            }
            Err(_) => false,
        };

        if embedded {
            w.cursor.advance(70.0);
        } else {
            w.text(
                EMBED_PLACEHOLDER,
                9.0,
                20.0,
                y + 10.0,
                FontStyle::Regular,
                PLACEHOLDER_GRAY,
            );
            w.cursor.advance(20.0);
        }
    }
}

fn draw_summary_box(
    w: &mut ReportWriter,
    title: &str,
    items: &[(&'static str, String)],
    x: f32,
    width: f32,
    color: (u8, u8, u8),
) {
    let y = w.cursor.y();
    let box_height = 12.0 + items.len() as f32 * 12.0 + 4.0;

    w.fill_rect(x, y, width, 12.0, color);
    w.text(title, 9.0, x + 5.0, y + 8.0, FontStyle::Bold, WHITE);

    w.fill_rect(x, y + 12.0, width, box_height - 12.0, CARD_FILL_GRAY);
    w.stroke_rect(x, y, width, box_height, BOX_BORDER_GRAY, 0.5);

    let mut item_y = y + 20.0;
    for (label, value) in items {
        w.text(&format!("{}:", label), 8.0, x + 5.0, item_y, FontStyle::Bold, MUTED_GRAY);
        w.text(
            &fields::truncate_value(value),
            8.0,
            x + 5.0,
            item_y + 5.0,
            FontStyle::Regular,
            DARK,
        );
        item_y += 12.0;
    }
}

fn draw_summary_page(w: &mut ReportWriter, claim: &ClaimReportInput) {
    w.new_page();

    w.fill_rect(0.0, 0.0, PAGE_WIDTH_MM, 45.0, GOLD);
    w.text_center("CLAIM SUMMARY", 20.0, PAGE_WIDTH_MM / 2.0, 20.0, FontStyle::Bold, BLACK);
    w.text_center(
        &format!("Quick Reference Card - Claim ID: {}", claim.report_id()),
        10.0,
        PAGE_WIDTH_MM / 2.0,
        32.0,
        FontStyle::Regular,
        BLACK,
    );

    w.cursor.set(60.0);

    let col_width = (PAGE_WIDTH_MM - 50.0) / 3.0;
    draw_summary_box(w, "CLAIMANT", &fields::party_summary(&claim.claimant), 15.0, col_width, BLUE);
    draw_summary_box(
        w,
        "THIRD PARTY",
        &fields::party_summary(&claim.other_party),
        20.0 + col_width,
        col_width,
        RED,
    );
    draw_summary_box(
        w,
        "INCIDENT",
        &fields::incident_summary(claim),
        25.0 + col_width * 2.0,
        col_width,
        GOLD,
    );

    let mut y = PAGE_HEIGHT_MM - 30.0;
    w.line(20.0, y, PAGE_WIDTH_MM - 20.0, y, BORDER_GRAY, 0.5);
    y += 10.0;

    w.text_center(FOOTER_GENERATED, 8.0, PAGE_WIDTH_MM / 2.0, y, FontStyle::Regular, FOOTER_GRAY);
    w.text_center(
        FOOTER_RETAIN,
        8.0,
        PAGE_WIDTH_MM / 2.0,
        y + 6.0,
        FontStyle::Regular,
        FOOTER_GRAY,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_wording() {
        assert_eq!(
            FOOTER_GENERATED,
            "This document was generated by QCAR Insurance Claims System."
        );
        assert_eq!(FOOTER_RETAIN, "Please retain this report for your records.");
    }
}
