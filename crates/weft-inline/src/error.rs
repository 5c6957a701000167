//! Errors that cross the layout boundary.
//!
//! Ordinary layout outcomes (nothing fits, a line was clipped) are expressed
//! as [`LayoutStatus`](crate::result::LayoutStatus) values, not errors. The
//! variants here are either configuration problems the caller must fix
//! before layout can run, or engine defects caught by precondition checks.

use thiserror::Error;

/// Unrecoverable layout failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// No font could be resolved for a text run's `font-family`.
    #[error("no font available for family '{family}'")]
    FontResolution {
        /// The requested family name.
        family: String,
    },

    /// The shaper returned a glyph sequence that does not map 1:1 onto the
    /// code points it was given.
    #[error("shaper returned {glyphs} glyphs for {chars} code points")]
    InvalidShaping {
        /// Number of code points passed to the shaper.
        chars: usize,
        /// Number of glyphs it returned.
        glyphs: usize,
    },

    /// A requested window does not lie inside the run it narrows.
    #[error("window {start}..{end} is outside {window_start}..{window_end}")]
    InvariantViolation {
        /// Requested start.
        start: usize,
        /// Requested end.
        end: usize,
        /// Start of the enclosing window.
        window_start: usize,
        /// End of the enclosing window.
        window_end: usize,
    },
}
