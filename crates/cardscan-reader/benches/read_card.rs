use cardscan_hollerith::CodePage;
use cardscan_reader::{CardReader, ReaderParams, ReadingOrder, SyntheticCard};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_read(c: &mut Criterion) {
    let card = SyntheticCard::from_text("       PROGRAM BENCH                      0001", CodePage::Cp037)
        .expect("encodable text");
    let front = card.render_front().expect("render");
    let back = card.render_back().expect("render");
    let reader = CardReader::new(ReaderParams::default());

    c.bench_function("read front 590x1181", |b| {
        b.iter(|| reader.read(black_box(&front.view()), ReadingOrder::Front))
    });
    c.bench_function("read back 590x1181", |b| {
        b.iter(|| reader.read(black_box(&back.view()), ReadingOrder::Back))
    });
    c.bench_function("read front with debug 590x1181", |b| {
        b.iter(|| reader.read_with_debug(black_box(&front.view()), ReadingOrder::Front))
    });
}

criterion_group!(benches, bench_read);
criterion_main!(benches);
