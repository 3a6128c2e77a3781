use sha2::{Digest, Sha256};

use show_booklet::fonts;
use show_booklet::model::{ExhibitorCard, LineRoomEntry, Show, ShowSummary};
use show_booklet::provider::{ProviderError, ShowProvider};
use show_booklet::{booklet, Config};

struct FakeProvider {
    show: Show,
    cards: Vec<ExhibitorCard>,
    entries: Vec<LineRoomEntry>,
}

impl FakeProvider {
    fn sample() -> Self {
        let show = Show {
            id: "7".to_string(),
            description: "Spring 2024".to_string(),
            start_date: "2024-03-09".to_string(),
            end_date: "2024-03-11".to_string(),
            location: "Crowne Plaza DIA".to_string(),
            location_address: "15500 East 40th Avenue".to_string(),
            location_city: "Denver".to_string(),
            location_state: "CO".to_string(),
            location_postal_code: "80239".to_string(),
            location_phone: "303-371-9494".to_string(),
            location_fax: "303-371-9606".to_string(),
            coordinator: "Pat Jones".to_string(),
            coordinator_phone: "303-555-0100".to_string(),
            coordinator_email: "pat@example.com".to_string(),
            next_show: "August 17-19, 2024".to_string(),
        };
        let cards = vec![
            ExhibitorCard {
                full_name: "Al Adams".to_string(),
                room: "205".to_string(),
                address: "12 Elm St".to_string(),
                city: "Denver".to_string(),
                state: "CO".to_string(),
                postal_code: "80202".to_string(),
                phone: "555-1212".to_string(),
                email: "al@example.com".to_string(),
                lines: "Acme".to_string(),
                ..ExhibitorCard::default()
            },
            ExhibitorCard {
                full_name: "Mary Smith".to_string(),
                room: "101".to_string(),
                address: "9 Oak Ave".to_string(),
                city: "Boulder".to_string(),
                state: "CO".to_string(),
                postal_code: "80301".to_string(),
                lines: "Birkshire".to_string(),
                ..ExhibitorCard::default()
            },
        ];
        let entries = vec![
            LineRoomEntry {
                line: "Acme".to_string(),
                room: "205".to_string(),
                exhibitor: "Al Adams".to_string(),
            },
            LineRoomEntry {
                line: "Birkshire".to_string(),
                room: "101".to_string(),
                exhibitor: "Mary Smith".to_string(),
            },
        ];
        Self {
            show,
            cards,
            entries,
        }
    }

    fn empty() -> Self {
        Self {
            show: Show {
                id: "7".to_string(),
                ..Show::default()
            },
            cards: Vec::new(),
            entries: Vec::new(),
        }
    }
}

impl ShowProvider for FakeProvider {
    fn list_shows(&self) -> Result<Vec<ShowSummary>, ProviderError> {
        Ok(vec![ShowSummary {
            id: self.show.id.clone(),
            description: self.show.description.clone(),
        }])
    }

    fn get_show_detail(&self, show_id: &str) -> Result<Show, ProviderError> {
        if show_id == self.show.id {
            Ok(self.show.clone())
        } else {
            Err(ProviderError::ShowNotFound(show_id.to_string()))
        }
    }

    fn get_exhibitor_cards(&self, show_id: &str) -> Result<Vec<ExhibitorCard>, ProviderError> {
        self.get_show_detail(show_id)?;
        Ok(self.cards.clone())
    }

    fn get_line_room_entries(&self, show_id: &str) -> Result<Vec<LineRoomEntry>, ProviderError> {
        self.get_show_detail(show_id)?;
        Ok(self.entries.clone())
    }
}

fn render_sample(provider: &FakeProvider) -> Option<Vec<u8>> {
    if !fonts::fonts_available(None) {
        eprintln!(
            "Skipping booklet rendering test: fonts missing. Set {} or populate assets/fonts.",
            fonts::FONTS_DIR_ENV
        );
        return None;
    }
    let bytes = booklet::render_booklet(provider, &Config::default(), "7", |_| {})
        .expect("render booklet");
    Some(bytes)
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_after(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() && data[cursor] != terminator {
                    if terminator == b')' || !data[cursor].is_ascii_whitespace() {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_between(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            let Some(found) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            else {
                break;
            };
            let begin = offset + found + start.len();
            let Some(stop) = data[begin..]
                .windows(end.len())
                .position(|window| window == end)
            else {
                break;
            };
            for byte in &mut data[begin..begin + stop] {
                if !byte.is_ascii_whitespace() {
                    *byte = b'0';
                }
            }
            offset = begin + stop + end.len();
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_after(&mut normalized, b"/CreationDate(", b')');
    scrub_after(&mut normalized, b"/ModDate(", b')');
    scrub_after(&mut normalized, b"/Producer(", b')');
    scrub_after(&mut normalized, b"/ID[", b']');
    // The XMP packet carries the same timestamps and document ids again.
    for tag in [
        "xmp:CreateDate",
        "xmp:ModifyDate",
        "xmp:MetadataDate",
        "xmpMM:DocumentID",
        "xmpMM:InstanceID",
        "xmpMM:VersionID",
    ] {
        let start = format!("<{}>", tag).into_bytes();
        let end = format!("</{}>", tag).into_bytes();
        scrub_between(&mut normalized, &start, &end);
    }
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

#[test]
fn renders_non_empty_output() {
    let provider = FakeProvider::sample();
    let Some(bytes) = render_sample(&provider) else {
        return;
    };
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn page_count_is_a_multiple_of_four() {
    let provider = FakeProvider::sample();
    let Some(bytes) = render_sample(&provider) else {
        return;
    };
    let document = lopdf::Document::load_mem(&bytes).expect("parse rendered booklet");
    let pages = document.get_pages().len();
    // Title, welcome, cards and directory fill four pages; padding adds three
    // notes pages before the thank-you page.
    assert_eq!(pages, 8);
}

#[test]
fn progress_fractions_are_reported_in_order() {
    if !fonts::fonts_available(None) {
        eprintln!("Skipping progress test: fonts missing.");
        return;
    }
    let provider = FakeProvider::sample();
    let mut fractions = Vec::new();
    booklet::render_booklet(&provider, &Config::default(), "7", |fraction| {
        fractions.push(fraction)
    })
    .expect("render booklet");
    assert_eq!(fractions, [0.10, 0.20, 0.30, 0.50, 0.70, 0.90]);
}

#[test]
fn scrubbing_hides_info_dict_and_xmp_metadata() {
    let first = b"/CreationDate(D:20240309120000Z)\n\
        <xmp:CreateDate>2024-03-09T12:00:00Z</xmp:CreateDate>\n\
        <xmpMM:DocumentID>uuid:aaaaaaaa-1111-2222-3333-444444444444</xmpMM:DocumentID>";
    let second = b"/CreationDate(D:20250830093015Z)\n\
        <xmp:CreateDate>2025-08-30T09:30:15Z</xmp:CreateDate>\n\
        <xmpMM:DocumentID>uuid:bbbbbbbb-5555-6666-7777-888888888888</xmpMM:DocumentID>";
    assert_eq!(scrub_pdf(first), scrub_pdf(second));
}

#[test]
fn rendering_is_deterministic() {
    let provider = FakeProvider::sample();
    let Some(first) = render_sample(&provider) else {
        return;
    };
    let second = render_sample(&provider).expect("second render");
    assert_eq!(normalized_hash(&first), normalized_hash(&second));
}

#[test]
fn empty_show_still_renders() {
    let provider = FakeProvider::empty();
    let Some(bytes) = render_sample(&provider) else {
        return;
    };
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn generate_writes_the_output_file() {
    if !fonts::fonts_available(None) {
        eprintln!("Skipping generate test: fonts missing.");
        return;
    }
    let provider = FakeProvider::sample();
    let dir = tempfile::tempdir().expect("create temp dir");
    let output = dir.path().join("booklet.pdf");
    booklet::generate(&provider, &Config::default(), "7", &output, |_| {})
        .expect("generate booklet");
    let bytes = std::fs::read(&output).expect("read output");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn unknown_show_does_not_write_output() {
    let provider = FakeProvider::sample();
    let dir = tempfile::tempdir().expect("create temp dir");
    let output = dir.path().join("booklet.pdf");
    let err = booklet::generate(&provider, &Config::default(), "99", &output, |_| {});
    assert!(err.is_err());
    assert!(!output.exists());
}
