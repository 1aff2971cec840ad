//! Single-pass line classification.
//!
//! Maps a raw log line onto a [`LineEvent`] variant with a fixed
//! precedence order: section marker, kill+loot, bag contents, event
//! points, unrecognized. The first matching shape wins.

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::warn;

use crate::models::LineEvent;

/// Marker prefix carried by lines that anchor an absolute date.
const SECTION_MARKER_PREFIX: &str = "Channel saved at ";

/// Date format of the section marker payload, e.g. `Sat Jan 01 00:03:00 2025`.
const SECTION_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Compiled patterns for the recognized line shapes.
///
/// Construct once and reuse; compilation is not free and the classifier
/// runs on every new line of every poll.
pub struct LineClassifier {
    loot: Regex,
    bag: Regex,
    event: Regex,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LineClassifier {
    pub fn new() -> Self {
        Self {
            loot: Regex::new(r"Loot of ([^:]+): (.*)").expect("regex is valid"),
            bag: Regex::new(r"Content of a bag within the corpse of ([^:]+): (.*)")
                .expect("regex is valid"),
            event: Regex::new(r"Looted (\d+) (\w+) points?").expect("regex is valid"),
        }
    }

    /// Classify one raw line.
    ///
    /// Monster names are lower-cased here; no mixed-case key ever leaves
    /// the classifier. Items text is passed through raw for the
    /// normalizer to handle.
    pub fn classify(&self, line: &str) -> LineEvent {
        let line = line.trim();

        if let Some(idx) = line.find(SECTION_MARKER_PREFIX) {
            let date_str = line[idx + SECTION_MARKER_PREFIX.len()..].trim();
            match NaiveDateTime::parse_from_str(date_str, SECTION_DATE_FORMAT) {
                Ok(dt) => return LineEvent::SectionMarker(dt),
                Err(e) => {
                    warn!("malformed section marker \"{}\": {}", date_str, e);
                    return LineEvent::Unrecognized;
                }
            }
        }

        if let Some(caps) = self.loot.captures(line) {
            return LineEvent::KillLoot {
                monster: caps[1].trim().to_lowercase(),
                items: caps[2].trim().to_string(),
            };
        }

        if let Some(caps) = self.bag.captures(line) {
            return LineEvent::BagContents {
                monster: caps[1].trim().to_lowercase(),
                items: caps[2].trim().to_string(),
            };
        }

        if let Some(caps) = self.event.captures(line) {
            // The capture is all digits; it can only fail on overflow.
            match caps[1].parse::<u64>() {
                Ok(quantity) => {
                    return LineEvent::EventPoints {
                        kind: format!("{} point", caps[2].to_lowercase()),
                        quantity,
                    }
                }
                Err(e) => {
                    warn!("unparseable event point quantity \"{}\": {}", &caps[1], e);
                    return LineEvent::Unrecognized;
                }
            }
        }

        LineEvent::Unrecognized
    }
}
