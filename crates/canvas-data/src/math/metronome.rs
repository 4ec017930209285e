use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::error;

pub const MIN_BPM: u32 = 1;
pub const MAX_BPM: u32 = 300;
pub const MAX_BEATS: u32 = 8;

/// A validated tempo together with the numerator of its time signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metronome {
    pub bpm: u32,
    pub beats: u32,
}

/// Parses inputs such as `120bpm`, `allegro`, `andante/3` or `presto in 4`.
pub fn parse_metronome(specification: &str) -> Option<Metronome> {
    let spec: String = specification
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    let (tempo, beats) = if spec.contains('/') || (spec.contains("in") && spec != "andantino") {
        let separator = if spec.contains('/') { "/" } else { "in" };
        let parts: Vec<&str> = spec.split(separator).collect();
        let [tempo, beats] = parts.as_slice() else {
            return None;
        };
        let beats = beats
            .parse::<u32>()
            .ok()
            .filter(|beats| (1..=MAX_BEATS).contains(beats))?;
        (*tempo, beats)
    } else {
        (spec.as_str(), 1)
    };

    let bpm = tempo_name_to_bpm(tempo).or_else(|| {
        tempo
            .strip_suffix("bpm")?
            .parse::<u32>()
            .ok()
            .filter(|bpm| (MIN_BPM..=MAX_BPM).contains(bpm))
    })?;

    Some(Metronome { bpm, beats })
}

/// Italian tempo markings and their usual BPM ranges, resolved to the midpoint.
fn tempo_name_to_bpm(name: &str) -> Option<u32> {
    let (low, high) = match name {
        "larghissimo" => (1, 24),
        "adagissimo" | "grave" => (24, 40),
        "largo" => (40, 66),
        "larghetto" | "adagio" => (44, 66),
        "adagietto" => (46, 80),
        "lento" => (52, 108),
        "andante" => (56, 108),
        "andantino" | "andantemoderato" => (80, 108),
        "marciamoderato" => (66, 80),
        "moderato" => (108, 120),
        "allegretto" => (112, 120),
        "allegromoderato" => (116, 120),
        "allegro" => (120, 156),
        "moltoallegro" | "allegrovivace" => (124, 156),
        "vivace" => (156, 176),
        "vivacissimo" | "allegrissimo" => (172, 176),
        "presto" => (168, 200),
        "prestissimo" => (200, 300),
        _ => return None,
    };
    Some((low + high) / 2)
}

/// Coarse tempo categories used to label a metronome result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TempoName {
    Larghissimo,
    Grave,
    Adagio,
    Andante,
    Moderato,
    Allegro,
    Presto,
    Prestissimo,
}

impl TempoName {
    pub fn all() -> &'static [TempoName] {
        &[
            TempoName::Larghissimo,
            TempoName::Grave,
            TempoName::Adagio,
            TempoName::Andante,
            TempoName::Moderato,
            TempoName::Allegro,
            TempoName::Presto,
            TempoName::Prestissimo,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TempoName::Larghissimo => "larghissimo",
            TempoName::Grave => "grave",
            TempoName::Adagio => "adagio",
            TempoName::Andante => "andante",
            TempoName::Moderato => "moderato",
            TempoName::Allegro => "allegro",
            TempoName::Presto => "presto",
            TempoName::Prestissimo => "prestissimo",
        }
    }
}

impl fmt::Display for TempoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a BPM to its display category. Values outside `1..=300` are a
/// programming error upstream and yield `None`.
pub fn bpm_to_tempo_name(bpm: u32) -> Option<TempoName> {
    let name = match bpm {
        1..=24 => TempoName::Larghissimo,
        25..=42 => TempoName::Grave,
        43..=61 => TempoName::Adagio,
        62..=108 => TempoName::Andante,
        109..=120 => TempoName::Moderato,
        121..=156 => TempoName::Allegro,
        157..=200 => TempoName::Presto,
        201..=300 => TempoName::Prestissimo,
        _ => {
            error!(target: "canvas_data", bpm, "invalid bpm for tempo name");
            return None;
        }
    };
    Some(name)
}

impl Metronome {
    pub fn tempo_name(&self) -> Option<TempoName> {
        bpm_to_tempo_name(self.bpm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metronome(bpm: u32, beats: u32) -> Option<Metronome> {
        Some(Metronome { bpm, beats })
    }

    #[test]
    fn numeric_tempos() {
        assert_eq!(parse_metronome("120bpm"), metronome(120, 1));
        assert_eq!(parse_metronome(" 60 BPM "), metronome(60, 1));
        assert_eq!(parse_metronome("300bpm"), metronome(300, 1));
        assert_eq!(parse_metronome("400bpm"), None);
        assert_eq!(parse_metronome("0bpm"), None);
        assert_eq!(parse_metronome("120"), None);
    }

    #[test]
    fn named_tempos_use_the_midpoint() {
        assert_eq!(parse_metronome("allegro"), metronome(138, 1));
        assert_eq!(parse_metronome("Andantino"), metronome(94, 1));
        assert_eq!(parse_metronome("allegro vivace"), metronome(140, 1));
        assert_eq!(parse_metronome("larghissimo"), metronome(12, 1));
    }

    #[test]
    fn time_signatures() {
        assert_eq!(parse_metronome("allegro in 4"), metronome(138, 4));
        assert_eq!(parse_metronome("90bpm/3"), metronome(90, 3));
        assert_eq!(parse_metronome("x/9"), None);
        assert_eq!(parse_metronome("allegro/0"), None);
        assert_eq!(parse_metronome("allegro/4/4"), None);
        assert_eq!(parse_metronome("andantino/2"), metronome(94, 2));
        assert_eq!(parse_metronome("andantino in 2"), None);
        assert_eq!(parse_metronome("120bpm in 4"), metronome(120, 4));
        assert_eq!(parse_metronome("120 bpm in 3/4"), None);
    }

    #[test]
    fn tempo_names_cover_the_valid_range() {
        assert_eq!(bpm_to_tempo_name(24), Some(TempoName::Larghissimo));
        assert_eq!(bpm_to_tempo_name(25), Some(TempoName::Grave));
        assert_eq!(bpm_to_tempo_name(138), Some(TempoName::Allegro));
        assert_eq!(bpm_to_tempo_name(200), Some(TempoName::Presto));
        assert_eq!(bpm_to_tempo_name(201), Some(TempoName::Prestissimo));
        assert_eq!(bpm_to_tempo_name(0), None);
        assert_eq!(bpm_to_tempo_name(301), None);
    }
}
