use crate::core::parser::SequenceType;
use ratatui::prelude::{Color, Span, Style, Stylize};

/// Residue colouring used by the alignment panes and the spreadsheet export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorScheme {
    #[default]
    #[value(name = "amino-acid")]
    AminoAcid,
    #[value(name = "amino-acid-background")]
    AminoAcidBackground,
    Nucleotide,
    #[value(name = "nucleotide-background")]
    NucleotideBackground,
}

impl ColorScheme {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ColorScheme::AminoAcid => "Amino Acid",
            ColorScheme::AminoAcidBackground => "Amino Acid - Background",
            ColorScheme::Nucleotide => "Nucleotide",
            ColorScheme::NucleotideBackground => "Nucleotide - Background",
        }
    }

    #[must_use]
    pub fn all() -> [ColorScheme; 4] {
        [
            ColorScheme::AminoAcid,
            ColorScheme::AminoAcidBackground,
            ColorScheme::Nucleotide,
            ColorScheme::NucleotideBackground,
        ]
    }

    #[must_use]
    pub fn get_default_scheme(sequence_type: SequenceType) -> Self {
        match sequence_type {
            SequenceType::Dna => ColorScheme::Nucleotide,
            SequenceType::AminoAcid => ColorScheme::AminoAcid,
        }
    }

    #[must_use]
    pub fn cycle(current: Self) -> Self {
        let schemes = Self::all();
        let current_index = schemes.iter().position(|&s| s == current).unwrap_or(0);
        let next_index = (current_index + 1) % schemes.len();
        schemes[next_index]
    }

    fn is_background(self) -> bool {
        matches!(
            self,
            ColorScheme::AminoAcidBackground | ColorScheme::NucleotideBackground
        )
    }
}

/// A plain RGB triple, shared by the terminal and spreadsheet renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#RRGGBB`, as spreadsheet styles expect.
    #[must_use]
    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    #[must_use]
    pub fn color(self) -> Color {
        Color::Rgb(self.0, self.1, self.2)
    }
}

// colours from clustal default
// http://www.jalview.org/help/html/colourSchemes/clustal.html
const HYDROPHOBIC: Rgb = Rgb(0x80, 0xA0, 0xF0);
const POSITIVE_CHARGE: Rgb = Rgb(0xF0, 0x15, 0x05);
const NEGATIVE_CHARGE: Rgb = Rgb(0xC0, 0x48, 0xC0);
const POLAR: Rgb = Rgb(0x15, 0xC0, 0x15);
const CYSTEINE: Rgb = Rgb(0xF0, 0x80, 0x80);
const GLYCINE: Rgb = Rgb(0xF0, 0x90, 0x48);
const PROLINE: Rgb = Rgb(0xC0, 0xC0, 0x00);
const AROMATIC: Rgb = Rgb(0x15, 0xA4, 0xA4);

const ADENINE: Rgb = Rgb(0x64, 0xF7, 0x3F);
const THYMINE: Rgb = Rgb(0xEB, 0x41, 0x3C);
const CYTOSINE: Rgb = Rgb(0xFF, 0xB3, 0x40);
const GUANINE: Rgb = Rgb(0x3C, 0x88, 0xEE);
const AMBIGUOUS: Rgb = Rgb(0xB0, 0xB0, 0xB0);

fn amino_acid_colour(byte: u8) -> Option<Rgb> {
    match byte.to_ascii_uppercase() {
        b'A' | b'V' | b'L' | b'I' | b'M' | b'F' | b'W' => Some(HYDROPHOBIC),
        b'K' | b'R' => Some(POSITIVE_CHARGE),
        b'D' | b'E' => Some(NEGATIVE_CHARGE),
        b'S' | b'T' | b'N' | b'Q' => Some(POLAR),
        b'C' => Some(CYSTEINE),
        b'G' => Some(GLYCINE),
        b'P' => Some(PROLINE),
        b'H' | b'Y' => Some(AROMATIC),
        _ => None,
    }
}

fn nucleotide_colour(byte: u8) -> Option<Rgb> {
    match byte.to_ascii_uppercase() {
        b'A' => Some(ADENINE),
        b'T' | b'U' => Some(THYMINE),
        b'C' => Some(CYTOSINE),
        b'G' => Some(GUANINE),
        b'N' | b'R' | b'Y' | b'M' | b'K' | b'S' | b'W' | b'H' | b'B' | b'V' | b'D' => {
            Some(AMBIGUOUS)
        }
        _ => None,
    }
}

/// Colour for a residue under `scheme`, or `None` for gaps and unknown characters.
#[must_use]
pub fn residue_colour(byte: u8, scheme: ColorScheme) -> Option<Rgb> {
    match scheme {
        ColorScheme::AminoAcid | ColorScheme::AminoAcidBackground => amino_acid_colour(byte),
        ColorScheme::Nucleotide | ColorScheme::NucleotideBackground => nucleotide_colour(byte),
    }
}

/// Residue characters that receive a colour under `scheme`, upper case, in byte order.
#[must_use]
pub fn coloured_residues(scheme: ColorScheme) -> Vec<u8> {
    (b'A'..=b'Z')
        .filter(|&byte| residue_colour(byte, scheme).is_some())
        .collect()
}

#[inline]
#[must_use]
pub fn residue_style(byte: u8, scheme: ColorScheme) -> Style {
    match residue_colour(byte, scheme) {
        Some(rgb) if scheme.is_background() => Style::default().bg(rgb.color()).fg(Color::Black),
        Some(rgb) => Style::default().fg(rgb.color()).bold(),
        None => Style::default(),
    }
}

#[inline]
#[must_use]
pub fn format_sequence_bytes(sequence: &[u8], scheme: ColorScheme) -> Vec<Span<'static>> {
    sequence
        .iter()
        .map(|&byte| {
            let ch = if byte.is_ascii_graphic() || byte == b' ' {
                char::from(byte)
            } else {
                '?'
            };
            Span::styled(ch.to_string(), residue_style(byte, scheme))
        })
        .collect()
}
