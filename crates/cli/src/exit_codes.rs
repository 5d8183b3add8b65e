//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range | Domain     | Description                              |
//! |-------|------------|------------------------------------------|
//! | 0     | Universal  | Success (and `judge` verdict success)    |
//! | 1     | Universal  | General error (unspecified)              |
//! | 2     | Universal  | CLI usage error (bad args, no allergens) |
//! | 3-4   | judge      | Non-success verdicts                     |
//! | 5-9   | dictionary | Dictionary and file codes                |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use allercheck_engine::Verdict;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Judge (3-4)
// =============================================================================

/// Verdict `warning`: uncertain label or cross-contact risk.
pub const EXIT_JUDGE_WARNING: u8 = 3;

/// Verdict `danger`: a selected allergen is on the label.
pub const EXIT_JUDGE_DANGER: u8 = 4;

// =============================================================================
// Dictionary / files (5-9)
// =============================================================================

/// Dictionary file failed to parse or validate.
pub const EXIT_DICTIONARY_INVALID: u8 = 5;

/// Cannot read input or write output.
pub const EXIT_IO: u8 = 6;

/// Exit code for a judge verdict.
pub fn verdict_exit_code(verdict: Verdict) -> u8 {
    match verdict {
        Verdict::Success => EXIT_SUCCESS,
        Verdict::Warning => EXIT_JUDGE_WARNING,
        Verdict::Danger => EXIT_JUDGE_DANGER,
    }
}
