//! The booklet page-generation pipeline.
//!
//! Five stages run in fixed order against one [`BookletRenderer`]: title,
//! welcome, exhibitor name cards, line/room directory, thank-you/notes.  A
//! progress callback receives a monotonically increasing fraction after each
//! stage.  Any stage failure aborts the whole attempt; no partial file is
//! ever written.

use std::fs;
use std::path::Path;

use genpdf::Alignment;

use crate::config::Config;
use crate::error::BookletError;
use crate::model::{ExhibitorCard, LineRoomEntry, Show};
use crate::provider::ShowProvider;
use crate::renderer::BookletRenderer;
use crate::table::{ColumnSpec, TableSpec};
use crate::{dates, elements};

/// Width of each exhibitor-card column (3.25 inches).
const CARD_COLUMN_WIDTH_MM: f64 = 3.25 * 25.4;

/// Vertical gap between exhibitor-card rows (0.2 inches).
const CARD_ROW_GAP_MM: f64 = 0.2 * 25.4;

/// Generates the booklet for `show_id` and writes it to `output_path`.
///
/// This is the command interface any front end invokes; the write is atomic
/// (temp file in the target directory, then rename) so a failed run leaves no
/// partial file behind.
pub fn generate<P: ShowProvider + ?Sized>(
    provider: &P,
    config: &Config,
    show_id: &str,
    output_path: &Path,
    progress: impl FnMut(f64),
) -> Result<(), BookletError> {
    log::info!(
        "creating booklet for show ({}) in {}",
        show_id,
        output_path.display()
    );
    let bytes = render_booklet(provider, config, show_id, progress)?;
    write_atomic(output_path, &bytes)?;
    log::info!(
        "done creating booklet for show ({}) in {}",
        show_id,
        output_path.display()
    );
    Ok(())
}

/// Runs the five page-generation stages and serializes the document.
///
/// `progress` is invoked with the fractions 0.10, 0.20, 0.30, 0.50 and 0.70
/// as each page stage completes, then 0.90 once the document is serialized.
pub fn render_booklet<P: ShowProvider + ?Sized>(
    provider: &P,
    config: &Config,
    show_id: &str,
    mut progress: impl FnMut(f64),
) -> Result<Vec<u8>, BookletError> {
    let show = provider.get_show_detail(show_id)?;
    let mut renderer = BookletRenderer::new(config.fonts_dir.clone());

    title_page(&mut renderer, config, &show)?;
    progress(0.10);

    welcome_page(&mut renderer, &show);
    progress(0.20);

    exhibitor_name_cards(&mut renderer, &provider.get_exhibitor_cards(show_id)?);
    progress(0.30);

    line_room_directory(&mut renderer, &provider.get_line_room_entries(show_id)?);
    progress(0.50);

    thank_you(&mut renderer, &show)?;
    progress(0.70);

    let bytes = renderer.into_bytes()?;
    progress(0.90);
    Ok(bytes)
}

/// Title page: background image, program title, date range and venue block,
/// weekend schedule table and the appointment-only notice.
fn title_page(
    renderer: &mut BookletRenderer,
    config: &Config,
    show: &Show,
) -> Result<(), BookletError> {
    if let Some(path) = &config.title_image {
        renderer.image(path, Alignment::Center, true)?;
    } else {
        log::debug!("no title image configured, skipping");
    }

    renderer.text("**Rocky Mountain**", 30, Alignment::Center);
    renderer.move_down(36.0);
    renderer.text("**Shoe Show**", 30, Alignment::Center);
    renderer.move_down(72.0);

    renderer.text("**Denver Market**", 20, Alignment::Center);
    renderer.move_down(144.0);

    let date_range = dates::date_range_label(&show.start_date, &show.end_date);
    renderer.text(&format!("**{}**", date_range), 20, Alignment::Center);
    renderer.text(&format!("**{}**", show.location), 20, Alignment::Center);
    renderer.text(
        &format!("**{}**", show.location_address),
        20,
        Alignment::Center,
    );
    renderer.text(
        &format!(
            "**{}, {} {}**",
            show.location_city, show.location_state, show.location_postal_code
        ),
        20,
        Alignment::Center,
    );
    renderer.move_down(72.0);

    let mut schedule = TableSpec::new(vec![
        ColumnSpec::new(elements::mm_to_f64(elements::mm_from_inches(3.75))),
        ColumnSpec::new(elements::mm_to_f64(elements::mm_from_inches(3.75))),
    ]);
    schedule.push_row(vec!["Saturday".to_string(), "9am to 5pm".to_string()]);
    schedule.push_row(vec!["Sunday".to_string(), "9am to 5pm".to_string()]);
    renderer.table(schedule);

    renderer.text(
        "Friday & Monday - by Appointment only",
        15,
        Alignment::Center,
    );
    renderer.new_page();
    Ok(())
}

/// Welcome page: promotional copy with the computed month/year and next-show
/// tokens interleaved.
fn welcome_page(renderer: &mut BookletRenderer, show: &Show) {
    renderer.text("__**Welcome to the Market**__", 20, Alignment::Center);
    renderer.move_down(20.0);
    renderer.text(
        &format!(
            "Members of the Rocky Mountain Shoe Club welcome you to the {} Denver Shoe Market.",
            dates::month_year_label(&show.start_date)
        ),
        20,
        Alignment::Left,
    );
    renderer.move_down(20.0);
    renderer.text(
        "We have over 69 Reps, marketing over 204 lines including shoes, socks, slippers and handbags.",
        20,
        Alignment::Left,
    );
    renderer.move_down(72.0);

    renderer.text("__**Lunch**__", 20, Alignment::Center);
    renderer.move_down(20.0);
    renderer.text(
        "Lunch will be served Saturday and Sunday from 11:30am to 1:30pm in the Aspen room and lounge area",
        20,
        Alignment::Left,
    );
    renderer.move_down(20.0);
    renderer.text(
        "Retailers and exhibitors - We will be having a Saturday night social hour that will start @ 5:00pm in the Aspen room.",
        20,
        Alignment::Left,
    );
    renderer.move_down(20.0);
    renderer.text("Snacks and soft drinks will be provided.", 20, Alignment::Left);
    renderer.move_down(20.0);
    renderer.text(
        "Alcoholic beverages will be provided by the exhibitors.",
        20,
        Alignment::Left,
    );
    renderer.move_down(72.0);

    renderer.text("**NEXT SHOE MARKET**", 30, Alignment::Center);
    renderer.text(&format!("**{}**", show.next_show), 30, Alignment::Center);
    renderer.move_down(144.0);

    renderer.text(
        &format!("Show Coordinator: {}", show.coordinator),
        20,
        Alignment::Center,
    );
    renderer.text(
        &format!("Phone: {}", show.coordinator_phone),
        20,
        Alignment::Center,
    );
    renderer.text(&show.coordinator_email, 20, Alignment::Center);
    renderer.new_page();
}

/// Builds the multi-line text block for one exhibitor card.
///
/// Optional contact lines appear in fixed order (phone, fax, cell, email) and
/// are skipped individually when empty; the "Lines:" line is always present.
fn card_text(card: &ExhibitorCard) -> String {
    let mut text = format!("**{}**\n**Room #{}**", card.full_name, card.room);
    text.push_str(&format!(
        "\n{}\n{}, {} {}",
        card.address, card.city, card.state, card.postal_code
    ));
    if !card.phone.is_empty() {
        text.push_str(&format!("\n**Phone: ** {}", card.phone));
    }
    if !card.fax.is_empty() {
        text.push_str(&format!("\n**Fax: **{}", card.fax));
    }
    if !card.cell.is_empty() {
        text.push_str(&format!("\n**Cell: **{}", card.cell));
    }
    if !card.email.is_empty() {
        text.push_str(&format!("\n__{}__", card.email));
    }
    text.push_str(&format!("\n**Lines: **{}", card.lines));
    text
}

/// Packs exhibitor cards two per row, first of each pair in column 1.
///
/// An odd card count leaves the final row's second column empty.
fn pack_card_rows(cards: &[ExhibitorCard]) -> Vec<[String; 2]> {
    cards
        .chunks(2)
        .map(|pair| {
            let left = card_text(&pair[0]);
            let right = pair.get(1).map(card_text).unwrap_or_default();
            [left, right]
        })
        .collect()
}

/// Exhibitor name cards packed into a two-column table to save paper.
fn exhibitor_name_cards(renderer: &mut BookletRenderer, cards: &[ExhibitorCard]) {
    let mut table = TableSpec::new(vec![
        ColumnSpec::new(CARD_COLUMN_WIDTH_MM),
        ColumnSpec::new(CARD_COLUMN_WIDTH_MM),
    ])
    .with_row_gap_mm(CARD_ROW_GAP_MM);

    for [left, right] in pack_card_rows(cards) {
        table.push_row(vec![left, right]);
    }

    renderer.table(table);
    renderer.new_page();
}

/// Line/room directory: three columns with bold headings, no trailing page
/// break (the thank-you stage manages pagination from here).
fn line_room_directory(renderer: &mut BookletRenderer, entries: &[LineRoomEntry]) {
    let mut table = TableSpec::new(vec![
        ColumnSpec::new(76.2).with_heading("LINES"),
        ColumnSpec::new(38.1)
            .with_alignment(Alignment::Right)
            .with_heading("ROOM"),
        ColumnSpec::new(76.2).with_heading("EXHIBITOR"),
    ]);

    for entry in entries {
        table.push_row(vec![
            entry.line.clone(),
            entry.room.clone(),
            entry.exhibitor.clone(),
        ]);
    }

    renderer.table(table);
}

/// Notes pages to insert so the bound booklet folds into signatures of four.
///
/// The rule is kept exactly as historically observed: `remainder - 1` pages
/// when the current count is not a multiple of four, otherwise three.
fn notes_page_count(current_pages: usize) -> usize {
    let remainder = current_pages % 4;
    if remainder > 0 {
        remainder - 1
    } else {
        3
    }
}

/// Thank-you stage: pads with "NOTES" pages based on the current page count,
/// then renders the final thank-you page.
fn thank_you(renderer: &mut BookletRenderer, show: &Show) -> Result<(), BookletError> {
    let current_pages = renderer.page_count()?;
    for _ in 0..notes_page_count(current_pages) {
        renderer.new_page();
        renderer.text("__**NOTES**__", 20, Alignment::Center);
    }

    renderer.new_page();
    renderer.text("**THANK YOU**", 20, Alignment::Center);
    renderer.move_down(20.0);
    renderer.text("FOR COMING TO THE SHOW", 20, Alignment::Center);
    renderer.move_down(144.0);

    renderer.text("NEXT MARKET", 20, Alignment::Center);
    renderer.text(&show.next_show, 20, Alignment::Center);
    renderer.move_down(144.0);

    renderer.text(&show.location, 20, Alignment::Center);
    renderer.text(&show.location_address, 20, Alignment::Center);
    renderer.text(
        &format!(
            "{}, {}  {}",
            show.location_city, show.location_state, show.location_postal_code
        ),
        20,
        Alignment::Center,
    );
    renderer.text(
        &format!("Phone: {}", show.location_phone),
        20,
        Alignment::Center,
    );
    renderer.text(&format!("Fax: {}", show.location_fax), 20, Alignment::Center);
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "booklet.pdf".to_string());
    let temp_path = directory.join(format!(".{}.tmp", file_name));

    if let Err(err) = fs::write(&temp_path, bytes) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }
    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Op;

    fn card(name: &str) -> ExhibitorCard {
        ExhibitorCard {
            full_name: name.to_string(),
            room: "101".to_string(),
            address: "123 Main St".to_string(),
            city: "Denver".to_string(),
            state: "CO".to_string(),
            postal_code: "80202".to_string(),
            lines: "Acme Boots".to_string(),
            ..ExhibitorCard::default()
        }
    }

    #[test]
    fn notes_padding_at_signature_boundary_inserts_three_pages() {
        assert_eq!(notes_page_count(4), 3);
        assert_eq!(notes_page_count(8), 3);
    }

    #[test]
    fn notes_padding_inserts_remainder_minus_one_pages() {
        assert_eq!(notes_page_count(5), 0);
        assert_eq!(notes_page_count(6), 1);
        assert_eq!(notes_page_count(7), 2);
    }

    #[test]
    fn card_text_always_has_name_room_and_lines() {
        let text = card_text(&card("Mary Smith"));
        let lines: Vec<_> = text.split('\n').collect();
        assert_eq!(
            lines,
            [
                "**Mary Smith**",
                "**Room #101**",
                "123 Main St",
                "Denver, CO 80202",
                "**Lines: **Acme Boots",
            ]
        );
    }

    #[test]
    fn card_text_includes_optional_contacts_in_fixed_order() {
        let mut full = card("Mary Smith");
        full.phone = "555-1111".to_string();
        full.fax = "555-2222".to_string();
        full.cell = "555-3333".to_string();
        full.email = "mary@example.com".to_string();

        let text = card_text(&full);
        let lines: Vec<_> = text.split('\n').collect();
        assert_eq!(
            &lines[4..],
            &[
                "**Phone: ** 555-1111",
                "**Fax: **555-2222",
                "**Cell: **555-3333",
                "__mary@example.com__",
                "**Lines: **Acme Boots",
            ]
        );
    }

    #[test]
    fn card_text_skips_individual_empty_contacts() {
        let mut partial = card("Mary Smith");
        partial.cell = "555-3333".to_string();
        let text = card_text(&partial);
        assert!(!text.contains("**Phone: **"));
        assert!(!text.contains("**Fax: **"));
        assert!(text.contains("**Cell: **555-3333"));
        assert!(text.contains("**Lines: **"));
    }

    #[test]
    fn even_card_count_fills_both_columns_of_every_row() {
        let cards = vec![card("A A"), card("B B"), card("C C"), card("D D")];
        let rows = pack_card_rows(&cards);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|[left, right]| {
            !left.is_empty() && !right.is_empty()
        }));
    }

    #[test]
    fn odd_card_count_leaves_final_second_column_empty() {
        let cards = vec![card("A A"), card("B B"), card("C C")];
        let rows = pack_card_rows(&cards);
        assert_eq!(rows.len(), 2);
        assert!(rows[1][0].contains("C C"));
        assert!(rows[1][1].is_empty());
    }

    #[test]
    fn no_cards_yield_no_rows_but_still_a_table() {
        let mut renderer = BookletRenderer::new(None);
        exhibitor_name_cards(&mut renderer, &[]);
        assert!(matches!(renderer.ops()[0], Op::Table(ref spec) if spec.rows().is_empty()));
        assert!(matches!(renderer.ops()[1], Op::PageBreak));
    }

    #[test]
    fn directory_stage_does_not_force_a_page_break() {
        let mut renderer = BookletRenderer::new(None);
        line_room_directory(&mut renderer, &[]);
        assert_eq!(renderer.ops().len(), 1);
        assert!(matches!(renderer.ops()[0], Op::Table(_)));
    }

    #[test]
    fn title_and_welcome_stages_end_with_a_page_break() {
        let mut renderer = BookletRenderer::new(None);
        let show = Show::default();
        title_page(&mut renderer, &Config::default(), &show).expect("title page");
        assert!(matches!(renderer.ops().last(), Some(Op::PageBreak)));

        let mut renderer = BookletRenderer::new(None);
        welcome_page(&mut renderer, &show);
        assert!(matches!(renderer.ops().last(), Some(Op::PageBreak)));
    }
}
