use embassy_time::Instant;

/// One of the two bit lines of the link
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// Pulsed for a `0` bit, also the first half of the start symbol
    Zero,
    /// Pulsed for a `1` bit, also the second half of the start symbol
    One,
}

impl Line {
    /// The line which carries `bit`
    pub const fn from_bit(bit: bool) -> Self {
        if bit { Line::One } else { Line::Zero }
    }

    /// Bit value carried by the line
    pub const fn bit(self) -> u8 {
        match self {
            Line::Zero => 0,
            Line::One => 1,
        }
    }

    /// Index of the line, used to address pins and debounce state
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A debounced inactive -> active transition of a line
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeEvent {
    pub line: Line,
    /// Time at which the debounced transition was observed
    pub at: Instant,
}

impl EdgeEvent {
    pub fn new(line: Line, at: Instant) -> Self {
        Self { line, at }
    }
}
