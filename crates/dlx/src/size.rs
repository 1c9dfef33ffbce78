use anyhow::{Result, anyhow, bail};

/// Parse a human byte size such as `4GiB`, `512mb` or `1.5k`.
///
/// Every unit is a binary multiple, so `kb` and `kib` both mean 1024.
pub fn parse_byte_size(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("size cannot be empty");
    }
    let lower = trimmed.to_ascii_lowercase();

    let split = lower
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(lower.len());
    if split == 0 {
        bail!("invalid size: {input:?}");
    }

    let (number, unit) = lower.split_at(split);
    let unit = unit.trim();
    let multiplier = multiplier(unit).ok_or_else(|| anyhow!("invalid size unit {unit:?}"))?;
    let value: f64 = number.parse().map_err(|_| anyhow!("invalid size {input:?}"))?;

    let bytes = value * multiplier as f64;
    if bytes >= i64::MAX as f64 {
        bail!("size out of range");
    }
    Ok(bytes as u64)
}

fn multiplier(unit: &str) -> Option<u64> {
    let exp = match unit {
        "" | "b" => 0,
        "k" | "kb" | "kib" => 1,
        "m" | "mb" | "mib" => 2,
        "g" | "gb" | "gib" => 3,
        "t" | "tb" | "tib" => 4,
        _ => return None,
    };
    Some(1u64 << (10 * exp))
}
