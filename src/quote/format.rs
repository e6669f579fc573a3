//! Fixed-precision number rendering for chat replies

use rust_decimal::Decimal;

/// Render `value` rounded to exactly `places` decimal places
pub fn format_fixed(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp(places).to_string();
    pad_fraction(&rounded, places)
}

/// Like [`format_fixed`], with `,` separating thousands in the integer part
pub fn format_grouped(value: Decimal, places: u32) -> String {
    let fixed = format_fixed(value.abs(), places);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value.is_sign_negative() && !value.round_dp(places).is_zero() {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

fn pad_fraction(rendered: &str, places: u32) -> String {
    let places = places as usize;
    let current = rendered.split_once('.').map_or(0, |(_, f)| f.len());
    if places == 0 {
        return rendered.to_string();
    }

    let mut out = rendered.to_string();
    if current == 0 {
        out.push('.');
    }
    out.extend(std::iter::repeat('0').take(places.saturating_sub(current)));
    out
}
