//! Seven-segment masks and the mask-to-character table.
//!
//! Segment bits, in order: TL=1, TM=2, TR=4, BR=8, BM=16, BL=32, MM=64.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Number of segments in a digit.
pub const SEGMENTS: usize = 7;

/// Marker placed in decoded text for a digit whose mask is not in the table.
pub const INVALID_CHAR: char = 'X';

pub const M_TL: u8 = 1 << 0;
pub const M_TM: u8 = 1 << 1;
pub const M_TR: u8 = 1 << 2;
pub const M_BR: u8 = 1 << 3;
pub const M_BM: u8 = 1 << 4;
pub const M_BL: u8 = 1 << 5;
pub const M_MM: u8 = 1 << 6;

/// One of the seven segments. The discriminant is the segment's bit number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    TopLeft = 0,
    TopMiddle = 1,
    TopRight = 2,
    BottomRight = 3,
    BottomMiddle = 4,
    BottomLeft = 5,
    Middle = 6,
}

impl Segment {
    pub const ALL: [Segment; SEGMENTS] = [
        Segment::TopLeft,
        Segment::TopMiddle,
        Segment::TopRight,
        Segment::BottomRight,
        Segment::BottomMiddle,
        Segment::BottomLeft,
        Segment::Middle,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn mask(self) -> u8 {
        1 << (self as u8)
    }

    /// Short label used in logs and previews.
    pub fn label(self) -> &'static str {
        match self {
            Self::TopLeft => "TL",
            Self::TopMiddle => "TM",
            Self::TopRight => "TR",
            Self::BottomRight => "BR",
            Self::BottomMiddle => "BM",
            Self::BottomLeft => "BL",
            Self::Middle => "MM",
        }
    }
}

/// Every recognised mask and the character it displays.
pub const CHARACTERS: [(u8, char); 28] = [
    (0, ' '),
    (M_MM, '-'),
    (M_TL | M_TM | M_TR | M_BR | M_BM | M_BL, '0'),
    (M_TR | M_BR, '1'),
    (M_TM | M_TR | M_MM | M_BL | M_BM, '2'),
    (M_TM | M_TR | M_MM | M_BR | M_BM, '3'),
    (M_TL | M_MM | M_TR | M_BR, '4'),
    (M_TM | M_TL | M_MM | M_BR | M_BM, '5'),
    (M_TM | M_TL | M_MM | M_BL | M_BM | M_BR, '6'),
    (M_TL | M_TM | M_TR | M_BR, '7'),
    (M_TM | M_TR | M_BR, '7'),
    (M_TL | M_TM | M_TR | M_BR | M_BM | M_BL | M_MM, '8'),
    (M_TL | M_TM | M_TR | M_MM | M_BR | M_BM, '9'),
    (M_TL | M_TM | M_TR | M_MM | M_BL | M_BR, 'A'),
    (M_TL | M_MM | M_BL | M_BM | M_BR, 'b'),
    (M_TM | M_TL | M_BL | M_BM, 'C'),
    (M_TR | M_MM | M_BL | M_BM | M_BR, 'd'),
    (M_TM | M_TL | M_MM | M_BL | M_BM, 'E'),
    (M_TM | M_TL | M_MM | M_BL, 'F'),
    (M_TL | M_MM | M_BL | M_BR, 'h'),
    (M_TL | M_TR | M_MM | M_BL | M_BR, 'H'),
    (M_TL | M_BL | M_BM, 'L'),
    (M_TL | M_TM | M_TR | M_BL | M_BR, 'N'),
    (M_MM | M_BL | M_BR, 'n'),
    (M_MM | M_BL | M_BM | M_BR, 'o'),
    (M_TL | M_TM | M_TR | M_MM | M_BL, 'P'),
    (M_MM | M_BL, 'r'),
    (M_TL | M_MM | M_BL | M_BM, 't'),
];

const fn build_forward() -> [Option<char>; 128] {
    let mut table = [None; 128];
    let mut i = 0;
    while i < CHARACTERS.len() {
        let (mask, c) = CHARACTERS[i];
        table[mask as usize] = Some(c);
        i += 1;
    }
    table
}

static FORWARD: [Option<char>; 128] = build_forward();

static REVERSE: OnceLock<HashMap<char, u8>> = OnceLock::new();

fn reverse_table() -> &'static HashMap<char, u8> {
    REVERSE.get_or_init(|| {
        let mut map: HashMap<char, u8> = HashMap::new();
        for &(mask, c) in CHARACTERS.iter() {
            map.entry(c)
                .and_modify(|m| {
                    if mask.count_ones() < m.count_ones() {
                        *m = mask;
                    }
                })
                .or_insert(mask);
        }
        map
    })
}

/// Returns the character shown by a segment mask, or None for an
/// unrecognised mask.
pub fn lookup(mask: u8) -> Option<char> {
    FORWARD[(mask & 0x7F) as usize]
}

/// Returns the mask with the fewest lit segments that displays `c`.
pub fn mask_for(c: char) -> Option<u8> {
    reverse_table().get(&c).copied()
}
