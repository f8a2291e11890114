use std::{fmt, num::NonZeroUsize, str::FromStr};

/// Largest ordinal that is written as a plain three digit number.
const DIGIT_CEILING: usize = 999;

/// The width of the zero padded digit block.
const DIGITS: usize = 3;

/// A 1-based position of a node within its parent's children.
///
/// Ordinals are written into on-disk names so that sibling order survives a
/// round trip through the filesystem. Each parent directory numbers its own
/// children from 1.
///
/// Format:
/// - `1..=999` are written as zero padded three digit numbers (`001`, `042`)
/// - larger values are written as `999` followed by a lowercase letter suffix
///   read as a bijective base-26 number (`999a` = 1000, `999z` = 1025, `999aa`
///   = 1026)
///
/// # Examples
///
/// ```
/// use postman_fs::Ordinal;
///
/// let ordinal: Ordinal = "999b".parse().unwrap();
/// assert_eq!(ordinal.get(), 1001);
/// assert_eq!(Ordinal::new(7).unwrap().to_string(), "007");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ordinal(NonZeroUsize);

impl Ordinal {
    /// The first ordinal in every scope.
    pub const FIRST: Self = Self(NonZeroUsize::MIN);

    /// Creates an ordinal, returning `None` for zero.
    #[must_use]
    pub const fn new(value: usize) -> Option<Self> {
        match NonZeroUsize::new(value) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Returns the ordinal as an integer.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }

    /// Returns the ordinal of the following sibling.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl From<NonZeroUsize> for Ordinal {
    fn from(value: NonZeroUsize) -> Self {
        Self(value)
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.get();
        if value <= DIGIT_CEILING {
            return write!(f, "{value:0DIGITS$}");
        }
        write!(f, "{DIGIT_CEILING}{}", letter_suffix(value - DIGIT_CEILING))
    }
}

impl FromStr for Ordinal {
    type Err = ParseOrdinalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseOrdinalError(s.to_string());

        if s.len() < DIGITS || !s.is_char_boundary(DIGITS) {
            return Err(invalid());
        }
        let (digits, suffix) = s.split_at(DIGITS);

        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let base: usize = digits.parse().map_err(|_| invalid())?;
        let offset = parse_letter_suffix(suffix).ok_or_else(invalid)?;

        base.checked_add(offset)
            .and_then(Self::new)
            .ok_or_else(invalid)
    }
}

/// Error returned when a string is not an encoded ordinal.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid ordinal '{0}': expected three digits and an optional lowercase suffix")]
pub struct ParseOrdinalError(String);

/// Encodes an ordinal into its on-disk token.
#[must_use]
pub fn encode_ordinal(ordinal: Ordinal) -> String {
    ordinal.to_string()
}

/// Decodes an on-disk ordinal token.
///
/// Returns `0` when the token is not a valid ordinal. Callers treat `0` as "no
/// ordinal present".
#[must_use]
pub fn decode_ordinal(token: &str) -> usize {
    token.parse::<Ordinal>().map_or(0, Ordinal::get)
}

/// Writes `n >= 1` as a bijective base-26 lowercase string (`1` = `a`, `27` =
/// `aa`).
fn letter_suffix(mut n: usize) -> String {
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        // n % 26 < 26, so the cast cannot truncate
        #[allow(clippy::cast_possible_truncation)]
        letters.push(char::from(b'a' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Reads a bijective base-26 suffix. An empty suffix is an offset of `0`.
fn parse_letter_suffix(suffix: &str) -> Option<usize> {
    suffix.bytes().try_fold(0usize, |acc, b| {
        if !b.is_ascii_lowercase() {
            return None;
        }
        acc.checked_mul(26)?
            .checked_add(usize::from(b - b'a') + 1)
    })
}
