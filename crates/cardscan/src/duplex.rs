//! Front/back verification of duplex scans.
//!
//! A duplex scanner sees both faces of every card. Reading each face on its
//! own and comparing the column values catches most misreads without any
//! reference data.

use cardscan_core::CardImageView;
use cardscan_hollerith::National;
use cardscan_reader::{CardReader, CardReading, ReadError, ReadingOrder};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Both faces decoded to the same column values.
    Good,
    Bad,
}

impl Verdict {
    /// Four-character label used in report lines.
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Good => "good",
            Verdict::Bad => "bad ",
        }
    }
}

/// Readings of both faces of one card.
#[derive(Clone, Debug)]
pub struct DuplexReading {
    pub front: CardReading,
    pub back: CardReading,
}

impl DuplexReading {
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
    pub fn read(
        reader: &CardReader,
        front: &CardImageView<'_>,
        back: &CardImageView<'_>,
    ) -> Result<Self, ReadError> {
        let front = reader.read(front, ReadingOrder::Front)?;
        let back = reader.read(back, ReadingOrder::Back)?;
        Ok(Self { front, back })
    }

    pub fn matches(&self) -> bool {
        self.front.values() == self.back.values()
    }

    pub fn verdict(&self) -> Verdict {
        if self.matches() {
            Verdict::Good
        } else {
            Verdict::Bad
        }
    }

    /// Report for one card pair.
    ///
    /// The first line is `<verdict> <front text padded to 80> <front> <back>`.
    /// A bad pair is followed by both dumps, prefixed `# fs ` and `# bs `.
    pub fn report(&self, front_name: &str, back_name: &str, national: National) -> Vec<String> {
        let verdict = self.verdict();
        let text = national.apply(&self.front.text());
        let mut lines = vec![format!(
            "{} {:<80} {} {}",
            verdict.label(),
            text,
            front_name,
            back_name
        )];
        if verdict == Verdict::Bad {
            for (prefix, reading) in [("# fs", &self.front), ("# bs", &self.back)] {
                let mut dump = reading.dump().into_iter();
                if let Some(text) = dump.next() {
                    lines.push(format!("{prefix} {}", national.apply(&text)));
                }
                lines.extend(dump.map(|line| format!("{prefix} {line}")));
            }
        }
        lines
    }
}
