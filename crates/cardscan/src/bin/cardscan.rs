//! cardscan CLI: read punched cards from duplex sheet-scanner images.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cardscan::duplex::{DuplexReading, Verdict};
use cardscan::hollerith::{punch_label, table, CodePage, National};
use cardscan::io::{load_card_image, load_params, save_card_image};
use cardscan::reader::SyntheticCard;
use cardscan::{CalibrationQuality, CardReader, CardReading, Polarity, ReaderParams, ReadingOrder};
use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use serde::Serialize;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "cardscan")]
#[command(about = "Read 80-column punched cards from duplex sheet-scanner images")]
#[command(version)]
struct Cli {
    /// Reader parameters (JSON); missing fields keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// National letters substituted into decoded text.
    #[arg(long, global = true, value_enum, default_value_t = NationalArg::None)]
    national: NationalArg,

    /// Scanner polarity; overrides the parameter file.
    #[arg(long, global = true, value_enum)]
    polarity: Option<PolarityArg>,

    /// More log output (repeat for trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read front/back image pairs and check that both faces agree.
    Verify {
        /// Images as FRONT BACK pairs.
        #[arg(required = true, num_args = 2..)]
        images: Vec<PathBuf>,

        /// Write annotated debug images into this directory.
        #[arg(long)]
        debug_dir: Option<PathBuf>,
    },

    /// Read a single card face.
    Read {
        image: PathBuf,

        /// The image shows the back of the card.
        #[arg(long)]
        back: bool,

        /// Write an annotated debug image.
        #[arg(long)]
        debug_image: Option<PathBuf>,

        /// Print a JSON report instead of the dump.
        #[arg(long)]
        json: bool,
    },

    /// Render a synthetic card scan.
    Render {
        /// Text to punch, at most 80 characters.
        #[arg(long)]
        text: String,

        /// Render the back face.
        #[arg(long)]
        back: bool,

        /// Output image path.
        #[arg(long)]
        out: PathBuf,
    },

    /// Print the Hollerith to EBCDIC to cp037 table.
    Table,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum NationalArg {
    None,
    Danish,
}

impl From<NationalArg> for National {
    fn from(arg: NationalArg) -> Self {
        match arg {
            NationalArg::None => National::None,
            NationalArg::Danish => National::Danish,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolarityArg {
    DarkHoles,
    BrightHoles,
}

impl From<PolarityArg> for Polarity {
    fn from(arg: PolarityArg) -> Self {
        match arg {
            PolarityArg::DarkHoles => Polarity::DarkHoles,
            PolarityArg::BrightHoles => Polarity::BrightHoles,
        }
    }
}

fn main() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let national = National::from(cli.national);
    match &cli.command {
        Commands::Verify { images, debug_dir } => {
            if images.len() % 2 != 0 {
                Cli::command()
                    .error(
                        ErrorKind::WrongNumberOfValues,
                        "images must be given as FRONT BACK pairs",
                    )
                    .exit();
            }
            let reader = build_reader(&cli)?;
            run_verify(&reader, images, debug_dir.as_deref(), national)
        }
        Commands::Read {
            image,
            back,
            debug_image,
            json,
        } => {
            let reader = build_reader(&cli)?;
            run_read(&reader, image, order(*back), debug_image.as_deref(), *json, national)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Render { text, back, out } => {
            run_render(text, order(*back), out)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Table => {
            run_table();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: u8) -> CliResult<()> {
    #[cfg(not(feature = "tracing"))]
    {
        let level = match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        cardscan::core::init_with_level(level)?;
    }
    #[cfg(feature = "tracing")]
    {
        let _ = verbose;
        cardscan::core::init_tracing(false);
        let _ = tracing_log::LogTracer::init();
        log::set_max_level(LevelFilter::Trace);
    }
    Ok(())
}

fn order(back: bool) -> ReadingOrder {
    if back {
        ReadingOrder::Back
    } else {
        ReadingOrder::Front
    }
}

fn build_reader(cli: &Cli) -> CliResult<CardReader> {
    let mut params = match &cli.config {
        Some(path) => load_params(path)?,
        None => ReaderParams::default(),
    };
    if let Some(polarity) = cli.polarity {
        params.polarity = polarity.into();
    }
    params
        .validate()
        .map_err(|reason| -> CliError { format!("invalid reader parameters: {reason}").into() })?;
    Ok(CardReader::new(params))
}

fn read_face(
    reader: &CardReader,
    path: &Path,
    order: ReadingOrder,
    debug_out: Option<&Path>,
) -> CliResult<CardReading> {
    let image = load_card_image(path)?;
    match debug_out {
        Some(out) => {
            let (reading, debug) = reader.read_with_debug(&image.view(), order)?;
            save_card_image(&debug, out)?;
            log::info!("debug image written to {}", out.display());
            Ok(reading)
        }
        None => Ok(reader.read(&image.view(), order)?),
    }
}

/// `<pair>-<face>-<stem>.png`; the pair number keeps equal stems apart.
fn debug_path(dir: &Path, pair: usize, order: ReadingOrder, image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "card".to_string());
    dir.join(format!("{pair:03}-{}-{stem}.png", order.label()))
}

// ── verify ─────────────────────────────────────────────────────────────

fn run_verify(
    reader: &CardReader,
    images: &[PathBuf],
    debug_dir: Option<&Path>,
    national: National,
) -> CliResult<ExitCode> {
    if let Some(dir) = debug_dir {
        std::fs::create_dir_all(dir)?;
    }

    let mut bad = 0usize;
    for (index, pair) in images.chunks_exact(2).enumerate() {
        let (front_path, back_path) = (&pair[0], &pair[1]);
        let number = index + 1;
        let front_debug =
            debug_dir.map(|d| debug_path(d, number, ReadingOrder::Front, front_path));
        let back_debug = debug_dir.map(|d| debug_path(d, number, ReadingOrder::Back, back_path));

        let duplex = DuplexReading {
            front: read_face(reader, front_path, ReadingOrder::Front, front_debug.as_deref())?,
            back: read_face(reader, back_path, ReadingOrder::Back, back_debug.as_deref())?,
        };
        if duplex.verdict() == Verdict::Bad {
            bad += 1;
        }
        let report = duplex.report(
            &front_path.display().to_string(),
            &back_path.display().to_string(),
            national,
        );
        for line in report {
            println!("{line}");
        }
    }

    let pairs = images.len() / 2;
    log::info!("{} of {} cards verified", pairs - bad, pairs);
    Ok(if bad == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

// ── read ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ReadReport<'a> {
    image: &'a Path,
    text: String,
    ebcdic: Vec<u8>,
    quality: &'a CalibrationQuality,
    reading: &'a CardReading,
}

fn run_read(
    reader: &CardReader,
    image: &Path,
    order: ReadingOrder,
    debug_image: Option<&Path>,
    json: bool,
    national: National,
) -> CliResult<()> {
    let reading = read_face(reader, image, order, debug_image)?;
    let text = national.apply(&reading.text());

    if json {
        let report = ReadReport {
            image,
            text,
            ebcdic: reading.ebcdic(),
            quality: reading.quality(),
            reading: &reading,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{text}");
    for line in reading.grid().rows_ascii() {
        println!("{line}");
    }
    if reading.quality().is_degraded() {
        log::warn!("calibration degraded for {}", image.display());
    }
    Ok(())
}

// ── render ─────────────────────────────────────────────────────────────

fn run_render(text: &str, order: ReadingOrder, out: &Path) -> CliResult<()> {
    let card = SyntheticCard::from_text(text, CodePage::Cp037).ok_or_else(|| -> CliError {
        "text must be at most 80 characters of code page 037".into()
    })?;
    save_card_image(&card.render(order)?, out)?;
    log::info!("{} face written to {}", order.label(), out.display());
    Ok(())
}

// ── table ──────────────────────────────────────────────────────────────

fn run_table() {
    let code_page = CodePage::Cp037;
    println!("ebcdic  pattern       punches     {}", code_page.name());
    for (pattern, code) in table::entries() {
        let ch = code_page.decode_byte(code);
        let shown = if ch.is_control() {
            format!("U+{:04X}", ch as u32)
        } else {
            ch.to_string()
        };
        println!(
            "0x{code:02X}    {pattern:012b}  {:<11} {shown}",
            punch_label(pattern)
        );
    }
}
