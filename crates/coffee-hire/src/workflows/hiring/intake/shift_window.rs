use serde::{Deserialize, Serialize};
use std::fmt;

const SEPARATORS: [char; 2] = ['-', '–'];

/// Working hours a partial-schedule candidate offered, as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub start_minute: u16,
    pub end_minute: u16,
}

impl ShiftWindow {
    /// Same-day length; negative when the window wraps past midnight.
    pub fn duration_minutes(&self) -> i32 {
        i32::from(self.end_minute) - i32::from(self.start_minute)
    }
}

impl fmt::Display for ShiftWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start_minute / 60,
            self.start_minute % 60,
            self.end_minute / 60,
            self.end_minute % 60
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{input}' is not a time range like 10:00-17:00")]
pub struct ShiftWindowFormatError {
    pub input: String,
}

/// Parse `H[:MM]-H[:MM]` with a hyphen or en dash and optional spaces around it.
pub fn parse_shift_window(input: &str) -> Result<ShiftWindow, ShiftWindowFormatError> {
    let format_error = || ShiftWindowFormatError {
        input: input.trim().to_string(),
    };

    let trimmed = input.trim();
    let split_at = trimmed.find(SEPARATORS).ok_or_else(format_error)?;
    let separator_len = trimmed[split_at..]
        .chars()
        .next()
        .map(char::len_utf8)
        .ok_or_else(format_error)?;

    let start = parse_clock(trimmed[..split_at].trim()).ok_or_else(format_error)?;
    let end = parse_clock(trimmed[split_at + separator_len..].trim()).ok_or_else(format_error)?;

    Ok(ShiftWindow {
        start_minute: start,
        end_minute: end,
    })
}

/// `H`, `HH`, `H:MM` or `HH:MM`; minutes default to zero.
fn parse_clock(value: &str) -> Option<u16> {
    let (hours, minutes) = match value.split_once(':') {
        Some((hours, minutes)) if minutes.len() == 2 => (hours, Some(minutes)),
        Some(_) => return None,
        None => (value, None),
    };

    if hours.is_empty() || hours.len() > 2 || !hours.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: u16 = hours.parse().ok()?;

    let minutes: u16 = match minutes {
        Some(digits) if digits.chars().all(|c| c.is_ascii_digit()) => digits.parse().ok()?,
        Some(_) => return None,
        None => 0,
    };

    if hours > 23 || minutes > 59 {
        return None;
    }

    Some(hours * 60 + minutes)
}
