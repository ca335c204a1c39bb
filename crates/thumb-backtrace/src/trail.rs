//! Symbolizer-ready rendering of a backtrace.
//!
//! The trail is what ends up in the fault log: each address as exactly eight
//! lowercase hex digits, separated by single spaces, with no trailing
//! separator. It can be pasted straight after `addr2line -a -f -p`.
//!
//! ```text
//! 10004a1c 10004a02 100021f6 1000015a
//! ```

use core::fmt::{self, Write};

use heapless::{String, Vec};

use crate::config::{MAX_DEPTH, TRAIL_CAPACITY};

const HEX_DIGITS: usize = 8;

/// Why a trail could not be produced or read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrailError {
    /// No address was recorded, so there is nothing to symbolize.
    Unavailable,
    /// Token `index` (0-based) is not exactly eight hex digits.
    MalformedToken {
        /// Position of the offending token.
        index: usize,
    },
    /// The trail holds more than [`MAX_DEPTH`] addresses.
    TooManyAddresses,
}

impl fmt::Display for TrailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "no backtrace available"),
            Self::MalformedToken { index } => {
                write!(f, "token {index} is not an 8-digit hex address")
            }
            Self::TooManyAddresses => write!(f, "trail exceeds {MAX_DEPTH} addresses"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TrailError {}

/// A rendered address trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressTrail {
    text: String<TRAIL_CAPACITY>,
}

impl AddressTrail {
    /// Render `addresses` as fixed-width hex tokens.
    ///
    /// Only the first [`MAX_DEPTH`] addresses are rendered; the buffer is
    /// sized for exactly that many.
    ///
    /// # Errors
    ///
    /// [`TrailError::Unavailable`] when `addresses` is empty. Callers must
    /// report that case explicitly rather than log an empty trail.
    pub fn render(addresses: &[u32]) -> Result<Self, TrailError> {
        if addresses.is_empty() {
            return Err(TrailError::Unavailable);
        }

        let mut text = String::new();
        for (i, address) in addresses.iter().take(MAX_DEPTH).enumerate() {
            let separator = if i == 0 { "" } else { " " };
            // Cannot fail: MAX_DEPTH tokens of 9 bytes fit TRAIL_CAPACITY.
            if write!(text, "{separator}{address:08x}").is_err() {
                break;
            }
        }
        Ok(Self { text })
    }

    /// Parse a rendered trail back into addresses.
    ///
    /// Accepts upper- or lowercase digits and any run of ASCII whitespace
    /// between tokens, so trails copied out of a terminal still parse.
    ///
    /// # Errors
    ///
    /// - [`TrailError::Unavailable`] for a blank trail
    /// - [`TrailError::MalformedToken`] for a token that is not 8 hex digits
    /// - [`TrailError::TooManyAddresses`] past [`MAX_DEPTH`] tokens
    pub fn parse(text: &str) -> Result<Vec<u32, MAX_DEPTH>, TrailError> {
        let mut addresses = Vec::new();
        for (index, token) in text.split_ascii_whitespace().enumerate() {
            let well_formed =
                token.len() == HEX_DIGITS && token.bytes().all(|b| b.is_ascii_hexdigit());
            let address = well_formed
                .then(|| u32::from_str_radix(token, 16).ok())
                .flatten()
                .ok_or(TrailError::MalformedToken { index })?;
            addresses
                .push(address)
                .map_err(|_| TrailError::TooManyAddresses)?;
        }
        if addresses.is_empty() {
            return Err(TrailError::Unavailable);
        }
        Ok(addresses)
    }

    /// The rendered text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Number of addresses in the trail.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.split(' ').count()
    }

    /// Always `false`: an empty trail is reported as [`TrailError::Unavailable`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for AddressTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
