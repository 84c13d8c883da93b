//! Read one card face and print its text, hole rows and calibration report.
//!
//! Usage: `cargo run --example read_card -- <image> [--back] [params.json]`

use std::env;

use cardscan::io::{load_params, read_card_file};
use cardscan::{CardReader, ReaderParams, ReadingOrder};
use log::LevelFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    cardscan::core::init_with_level(LevelFilter::Info)?;

    let mut args = env::args().skip(1);
    let image = args
        .next()
        .ok_or("usage: read_card <image> [--back] [params.json]")?;
    let mut order = ReadingOrder::Front;
    let mut params = ReaderParams::default();
    for arg in args {
        if arg == "--back" {
            order = ReadingOrder::Back;
        } else {
            params = load_params(&arg)?;
        }
    }

    let reader = CardReader::new(params);
    let reading = read_card_file(&reader, &image, order)?;
    for line in reading.dump() {
        println!("{line}");
    }

    let q = reading.quality();
    log::info!(
        "edges clean: {}, front edge found: {}, width deviation {:+.2} px, {} holes",
        q.edges.is_clean(),
        q.front_edge_found,
        q.width_deviation_px,
        q.punched
    );
    Ok(())
}
