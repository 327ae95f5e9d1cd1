use anyhow::{Context, Result};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse a seed given in decimal or `0x`-prefixed hex.
pub fn parse_seed(token: &str) -> Result<u64> {
    let trimmed = token.trim();
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        let digits = hex.replace('_', "");
        return u64::from_str_radix(&digits, 16)
            .with_context(|| format!("invalid hex seed '{token}'"));
    }
    trimmed
        .replace('_', "")
        .parse::<u64>()
        .with_context(|| format!("invalid seed '{token}'"))
}

pub fn parse_seeds(csv: &str) -> Result<Vec<u64>> {
    let seeds = split_csv(csv)
        .iter()
        .map(|token| parse_seed(token))
        .collect::<Result<Vec<_>>>()?;
    anyhow::ensure!(!seeds.is_empty(), "at least one seed is required");
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn seeds_accept_decimal_and_hex() {
        assert_eq!(parse_seed("1337").unwrap(), 1337);
        assert_eq!(parse_seed("0xC0_FFEE").unwrap(), 0x00C0_FFEE);
        assert_eq!(parse_seeds("1, 0x10").unwrap(), vec![1, 16]);
        assert!(parse_seed("summit").is_err());
        assert!(parse_seeds(" , ").is_err());
    }
}
