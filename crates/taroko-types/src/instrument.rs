//! Tradable instrument definitions.

use serde::{Deserialize, Serialize};

/// Exchange board an instrument is listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Board {
    /// Taiwan Stock Exchange listed equities.
    Tse,
    /// Over-the-counter (Taipei Exchange) equities.
    Otc,
    /// Market-wide index series.
    Index,
}

impl Board {
    /// Returns the board as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tse => "TSE",
            Self::Otc => "OTC",
            Self::Index => "INDEX",
        }
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tradable instrument as reported by the catalog.
///
/// Immutable once obtained for a run; the category is an opaque exchange
/// tag matched against the configured exclusion map, not interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Exchange code (e.g. "2330"), unique across boards in practice.
    code: String,
    /// Human-readable name.
    name: String,
    /// Listing board.
    board: Board,
    /// Exchange category tag (industry or product group code).
    category: String,
}

impl Instrument {
    /// Creates a new instrument.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        board: Board,
        category: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            board,
            category: category.into(),
        }
    }

    /// Returns the exchange code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the listing board.
    #[must_use]
    pub const fn board(&self) -> Board {
        self.board
    }

    /// Returns the exchange category tag.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns true if this is an index series rather than an equity.
    #[must_use]
    pub const fn is_index(&self) -> bool {
        matches!(self.board, Board::Index)
    }

    /// Returns true if the code is purely numeric.
    ///
    /// Warrants and other leveraged wrappers carry alphanumeric codes and
    /// are never archived.
    #[must_use]
    pub fn has_numeric_code(&self) -> bool {
        !self.code.is_empty() && self.code.bytes().all(|b| b.is_ascii_digit())
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_creation() {
        let instrument = Instrument::new("2330", "台積電", Board::Tse, "24");

        assert_eq!(instrument.code(), "2330");
        assert_eq!(instrument.name(), "台積電");
        assert_eq!(instrument.board(), Board::Tse);
        assert_eq!(instrument.category(), "24");
        assert!(!instrument.is_index());
        assert!(instrument.has_numeric_code());
    }

    #[test]
    fn test_numeric_code() {
        let warrant = Instrument::new("03001P", "某權證", Board::Tse, "W1");
        assert!(!warrant.has_numeric_code());

        let empty = Instrument::new("", "?", Board::Otc, "");
        assert!(!empty.has_numeric_code());
    }

    #[test]
    fn test_index_board() {
        let taiex = Instrument::new("001", "加權指數", Board::Index, "00");
        assert!(taiex.is_index());
        assert_eq!(taiex.to_string(), "加權指數 (001)");
    }
}
