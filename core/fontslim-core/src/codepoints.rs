//! Extra characters to keep regardless of page content (made by FontLab https://www.fontlab.com/)

use anyhow::{anyhow, bail, Result};

/// Widest range accepted; the expanded characters travel in one argument.
pub const MAX_RANGE_LEN: u32 = 0x2000;

/// Parse comma-delimited codepoints and ranges (e.g. `U+0030-U+0039,€`).
///
/// A token that is a single character stands for itself; anything longer is
/// read as hex, with or without a `U+` prefix. Reversed ranges are accepted.
pub fn parse_codepoint_list(input: &str) -> Result<Vec<char>> {
    let mut result = Vec::new();
    if input.trim().is_empty() {
        return Ok(result);
    }

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        match part.split_once('-') {
            Some((start, end)) if !start.is_empty() && !end.is_empty() => {
                let start = parse_codepoint(start)? as u32;
                let end = parse_codepoint(end)? as u32;
                let (lo, hi) = if start <= end {
                    (start, end)
                } else {
                    (end, start)
                };
                let len = hi - lo + 1;
                if len > MAX_RANGE_LEN {
                    bail!(
                        "range {part} spans {len} codepoints; at most {MAX_RANGE_LEN} allowed"
                    );
                }
                result.extend((lo..=hi).filter_map(char::from_u32));
            }
            Some(_) if part.chars().count() > 1 => {
                return Err(anyhow!("invalid range: {part}"));
            }
            _ => result.push(parse_codepoint(part)?),
        }
    }

    Ok(result)
}

fn parse_codepoint(token: &str) -> Result<char> {
    let mut chars = token.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Ok(ch);
    }

    let trimmed = token.trim_start_matches("U+").trim_start_matches("u+");
    let cp =
        u32::from_str_radix(trimmed, 16).map_err(|_| anyhow!("invalid codepoint: {token}"))?;
    char::from_u32(cp).ok_or_else(|| anyhow!("invalid Unicode scalar: U+{cp:04X}"))
}
