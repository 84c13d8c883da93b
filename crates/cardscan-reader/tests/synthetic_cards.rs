use approx::assert_relative_eq;
use cardscan_core::{CardImage, EdgeLine, Polarity};
use cardscan_hollerith::{ebcdic_from_hollerith, CodePage, COLUMNS};
use cardscan_reader::{CardReader, ReadError, ReaderParams, ReadingOrder, SyntheticCard};

const PANGRAM: &str = "THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG 0123456789 +-*/=(),.'$";

fn reader() -> CardReader {
    CardReader::new(ReaderParams::default())
}

fn pangram_card() -> SyntheticCard {
    SyntheticCard::from_text(PANGRAM, CodePage::Cp037).expect("encodable text")
}

#[test]
fn reads_back_every_placed_hole() {
    let card = pangram_card();
    let image = card.render_front().expect("render");
    let reading = reader()
        .read(&image.view(), ReadingOrder::Front)
        .expect("read");

    assert_eq!(reading.values(), card.values());
    assert_eq!(reading.grid(), &card.grid());
    assert_eq!(reading.text().trim_end(), PANGRAM);
    assert_eq!(reading.text().chars().count(), COLUMNS);
}

#[test]
fn straight_card_is_calibrated_exactly() {
    let card = pangram_card();
    let image = card.render_front().expect("render");
    let reading = reader()
        .read(&image.view(), ReadingOrder::Front)
        .expect("read");

    assert_eq!(reading.edges.left, EdgeLine::vertical(51.0));
    assert_eq!(reading.edges.right, EdgeLine::vertical(539.0));
    assert!(reading.front_edge.found);
    assert_eq!(reading.front_edge.y, 1141);

    let quality = reading.quality();
    assert!(!quality.is_degraded());
    assert_relative_eq!(quality.width_deviation_px, 0.5);
    assert_eq!(quality.punched, card.grid().punched());
}

#[test]
fn drift_stays_at_zero_on_an_ideal_card() {
    let image = pangram_card().render_front().expect("render");
    let reading = reader()
        .read(&image.view(), ReadingOrder::Front)
        .expect("read");

    assert_eq!(reading.drift.magnitude(), 0.0);
    assert_eq!(reading.quality.peak_drift_px, 0.0);
}

#[test]
fn repeated_reads_are_identical() {
    let image = pangram_card().render_front().expect("render");
    let reader = reader();
    let first = reader
        .read(&image.view(), ReadingOrder::Front)
        .expect("read");
    let second = reader
        .read(&image.view(), ReadingOrder::Front)
        .expect("read");
    assert_eq!(first, second);
}

#[test]
fn both_faces_give_the_same_card() {
    let card = pangram_card();
    let front = card.render_front().expect("render");
    let back = card.render_back().expect("render");
    let reader = reader();

    let fs = reader
        .read(&front.view(), ReadingOrder::Front)
        .expect("front");
    let bs = reader.read(&back.view(), ReadingOrder::Back).expect("back");
    assert_eq!(fs.values(), bs.values());
    assert_eq!(fs.dump(), bs.dump());
}

#[test]
fn back_face_read_as_front_is_row_reversed() {
    let mut card = SyntheticCard::blank();
    card.punch(5, 1);
    let back = card.render_back().expect("render");
    let reading = reader()
        .read(&back.view(), ReadingOrder::Front)
        .expect("read");
    assert!(reading.grid().is_punched(5, 12));
    assert!(!reading.grid().is_punched(5, 1));
}

#[test]
fn skewed_card_still_decodes() {
    let mut card = pangram_card();
    card.left_edge = 48.0;
    card.skew = 0.004;
    let image = card.render_front().expect("render");
    let reading = reader()
        .read(&image.view(), ReadingOrder::Front)
        .expect("read");

    assert_relative_eq!(reading.edges.left.slope, 0.004, epsilon = 1e-3);
    assert_relative_eq!(reading.edges.right.slope, 0.004, epsilon = 1e-3);
    assert_eq!(reading.values(), card.values());
    assert!(reading.drift.magnitude() < 2.0);
}

#[test]
fn colour_scan_reads_like_grey() {
    let mut card = pangram_card();
    card.channels = 3;
    let image = card.render_front().expect("render");
    let reading = reader()
        .read(&image.view(), ReadingOrder::Front)
        .expect("read");
    assert_eq!(reading.values(), card.values());
}

#[test]
fn bright_hole_scan_with_a_single_hole() {
    let (width, height) = (590, 1181);
    let mut image = CardImage::filled(width, height, 1, 0).expect("image");
    // card outline is never found here, so the expected edges and the image
    // bottom place hole (1, 1) at (88.75, 1143.5)
    image.fill_rect(88 - 8, 1143 - 6, 88 + 9, 1143 + 7, 255);

    let params = ReaderParams {
        polarity: Polarity::BrightHoles,
        ..ReaderParams::default()
    };
    let reading = CardReader::new(params)
        .read(&image.view(), ReadingOrder::Front)
        .expect("read");

    assert_eq!(reading.values()[0], 1 << 11);
    assert!(reading.values()[1..].iter().all(|&v| v == 0));
    assert_eq!(ebcdic_from_hollerith(1 << 11), 0x50);
    assert_eq!(ebcdic_from_hollerith(0b1011_0000_0001), 0x41);

    let quality = reading.quality();
    assert!(quality.is_degraded());
    assert!(!quality.front_edge_found);
    assert_eq!(quality.edges.left_degraded_rows, quality.edges.sampled_rows);
    assert_eq!(reading.front_edge.y, 1181);
}

#[test]
fn debug_render_marks_found_and_missing_holes() {
    let mut card = SyntheticCard::blank();
    card.punch(1, 1);
    let image = card.render_front().expect("render");
    let (reading, debug) = reader()
        .read_with_debug(&image.view(), ReadingOrder::Front)
        .expect("read");

    assert!(reading.grid().is_punched(1, 1));
    assert_eq!((debug.width, debug.height), (image.width, image.height));
    let v = debug.view();
    // outline around the hole at (88, 1103)
    assert_eq!(v.get(82, 1103, 0), 255);
    assert_eq!(v.get(88, 1103, 0), 0);
    // row 2 has no hole: card pixels dimmed once
    assert_eq!(v.get(126, 1103, 0), 200 / 3 + 128);
}

#[test]
fn truncated_buffer_is_rejected() {
    let image = SyntheticCard::blank().render_front().expect("render");
    let data = image.data.as_slice();
    let mut view = image.view();
    view.data = &data[..data.len() - 1];
    assert!(reader().read(&view, ReadingOrder::Front).is_err());
}

#[test]
fn oversized_extents_are_rejected_before_reading() {
    let image = SyntheticCard::blank().render_front().expect("render");

    let mut huge_box = ReaderParams::default();
    huge_box.holes.half_x = 100_000;
    huge_box.holes.half_y = 100_000;
    let mut huge_step = ReaderParams::default();
    huge_step.edges.row_step = i32::MAX;

    for params in [huge_box, huge_step] {
        let err = CardReader::new(params)
            .read(&image.view(), ReadingOrder::Front)
            .unwrap_err();
        assert!(matches!(err, ReadError::InvalidParams { .. }), "{err:?}");
    }
}
