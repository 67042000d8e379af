// Display helpers for lap and race times

use crate::errors::LapChartError;

const SECONDS_PER_MINUTE: i64 = 60;
const MINUTES_PER_HOUR: i64 = 60;
const MILLIS_PER_SECOND: i64 = 1000;

/// Options controlling how a lap time is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LapTimeFormat {
    /// Render the seconds with three decimals instead of rounding to whole seconds
    pub include_micros: bool,
    /// Render a `0:` prefix for times under one minute
    pub always_show_minutes: bool,
}

impl LapTimeFormat {
    pub fn new(include_micros: bool) -> Self {
        Self {
            include_micros,
            always_show_minutes: false,
        }
    }

    fn decimals(&self) -> u32 {
        if self.include_micros { 3 } else { 0 }
    }
}

/// A time rounded to the display precision and split into its components.
struct RoundedTime {
    negative: bool,
    minutes: i64,
    /// Remaining seconds within the minute, in units of 10^-decimals seconds
    remainder: i64,
    decimals: u32,
}

impl RoundedTime {
    fn new(seconds: f64, decimals: u32) -> Self {
        let scale = 10_i64.pow(decimals);
        // rounding happens before the minute split so 59.9996 becomes 1:00.000, never 60.000
        let units = (seconds.abs() * scale as f64).round() as i64;
        let per_minute = SECONDS_PER_MINUTE * scale;
        Self {
            negative: seconds < 0. && units > 0,
            minutes: units / per_minute,
            remainder: units % per_minute,
            decimals,
        }
    }

    fn seconds_part(&self) -> String {
        if self.decimals == 0 {
            format!("{:02}", self.remainder)
        } else {
            let scale = 10_i64.pow(self.decimals);
            format!(
                "{:02}.{:0width$}",
                self.remainder / scale,
                self.remainder % scale,
                width = self.decimals as usize
            )
        }
    }
}

/// Converts a duration in seconds to a lap time string such as `1:23.456`.
///
/// The seconds are zero padded to two digits and the minutes prefix is only
/// rendered when the time is a minute or longer, so five seconds renders as
/// `05.000` with micros and `05` without. Non-finite input renders as `-`.
pub fn seconds_to_lap_string(seconds: f64, include_micros: bool) -> String {
    format_lap_time(seconds, &LapTimeFormat::new(include_micros))
}

/// Converts a duration in seconds to a lap time string using the given format.
pub fn format_lap_time(seconds: f64, format: &LapTimeFormat) -> String {
    if !seconds.is_finite() {
        return "-".to_string();
    }

    let time = RoundedTime::new(seconds, format.decimals());
    let sign = if time.negative { "-" } else { "" };
    if time.minutes > 0 || format.always_show_minutes {
        format!("{}{}:{}", sign, time.minutes, time.seconds_part())
    } else {
        format!("{}{}", sign, time.seconds_part())
    }
}

/// Formats a signed gap, always carrying an explicit `+` or `-`.
pub fn format_gap(seconds: f64, include_micros: bool) -> String {
    if !seconds.is_finite() {
        return "-".to_string();
    }

    let format = LapTimeFormat::new(include_micros);
    let time = RoundedTime::new(seconds, format.decimals());
    let sign = if time.negative { '-' } else { '+' };
    format!("{}{}", sign, format_lap_time(seconds.abs(), &format))
}

/// Parses a string produced by [`seconds_to_lap_string`] back into seconds.
///
/// Accepts `SS`, `SS.fff`, `M:SS` and `M:SS.fff`, with an optional leading
/// minus sign.
pub fn parse_lap_string(input: &str) -> Result<f64, LapChartError> {
    let invalid = || LapChartError::InvalidLapString {
        input: input.to_string(),
    };

    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (minutes, seconds) = match unsigned.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes = minutes.parse::<u64>().map_err(|_| invalid())?;
            (minutes, seconds)
        }
        None => (0, unsigned),
    };

    // the seconds part must look like a plain decimal, no exponents or signs
    if seconds.is_empty() || !seconds.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(invalid());
    }
    let seconds = seconds.parse::<f64>().map_err(|_| invalid())?;
    if seconds >= SECONDS_PER_MINUTE as f64 && unsigned.contains(':') {
        return Err(invalid());
    }

    let total = minutes as f64 * SECONDS_PER_MINUTE as f64 + seconds;
    Ok(if negative { -total } else { total })
}

/// Formats a total race time the way the results tables show it:
/// `1h02m03.000`, `60m00.000`, `2m05.500` or `5.000`.
pub fn format_race_time(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "-".to_string();
    }

    let millis = (seconds.abs() * MILLIS_PER_SECOND as f64).round() as i64;
    let sign = if seconds < 0. && millis > 0 { "-" } else { "" };
    let whole_seconds = millis / MILLIS_PER_SECOND;
    let fraction = millis % MILLIS_PER_SECOND;
    let total_minutes = whole_seconds / SECONDS_PER_MINUTE;
    let secs = whole_seconds % SECONDS_PER_MINUTE;

    // a full hour still reads as minutes, hours start past sixty minutes
    if total_minutes > MINUTES_PER_HOUR {
        let hours = total_minutes / MINUTES_PER_HOUR;
        let minutes = total_minutes % MINUTES_PER_HOUR;
        format!("{sign}{hours}h{minutes:02}m{secs:02}.{fraction:03}")
    } else if total_minutes > 0 {
        format!("{sign}{total_minutes}m{secs:02}.{fraction:03}")
    } else {
        format!("{sign}{secs}.{fraction:03}")
    }
}
