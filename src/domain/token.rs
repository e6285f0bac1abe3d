//! Self-describing document identifiers
//!
//! Token format: `{prefix}_{generation}{timestamp}{entropy}`
//! - `prefix` - the document type; may itself contain underscores
//!   (e.g. `cal_event`), so the delimiter is the *last* underscore
//! - `generation` - single format-version digit, currently `0`
//! - `timestamp` - issuance time in Unix seconds, base-62, zero-padded to
//!   8 characters
//! - `entropy` - random base-62 characters for collision resistance
//!
//! The suffix is fixed-width up to the entropy, so for tokens of one
//! generation the lexicographic order of the suffix equals issuance order.
//! Tokens are immutable once issued; uniqueness is probabilistic in the
//! entropy length.

use chrono::Utc;
use rand::seq::SliceRandom;

use super::base62;

/// Width of the encoded timestamp field.
const TIMESTAMP_WIDTH: usize = 8;

/// Entropy characters appended by default.
pub const DEFAULT_ENTROPY: usize = 10;

/// Format generation stamped on newly minted tokens.
pub const CURRENT_GENERATION: char = '0';

/// The decoded fields of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedToken {
    pub prefix: String,
    pub generation: char,
    pub timestamp: i64,
    pub entropy: String,
}

/// Mints a token of the given type with default parameters.
pub fn generate(prefix: &str) -> String {
    generate_with(prefix, CURRENT_GENERATION, None, DEFAULT_ENTROPY)
}

/// Mints a token with explicit generation, timestamp, and entropy length.
///
/// Uses the current wall-clock time when `timestamp` is `None`. Entropy is
/// sampled from the alphabet without replacement, so lengths beyond 62
/// saturate at 62.
pub fn generate_with(
    prefix: &str,
    generation: char,
    timestamp: Option<i64>,
    entropy_len: usize,
) -> String {
    let seconds = timestamp.unwrap_or_else(|| Utc::now().timestamp()).max(0);
    let encoded = base62::encode(seconds as u64);
    let padded = format!("{:0>width$}", encoded, width = TIMESTAMP_WIDTH);

    let mut alphabet = *base62::ALPHABET;
    let (sample, _) = alphabet.partial_shuffle(&mut rand::thread_rng(), entropy_len);
    let entropy: String = sample.iter().map(|&b| b as char).collect();

    format!("{prefix}_{generation}{padded}{entropy}")
}

/// Charset heuristic for whether a string is plausibly a token.
///
/// Splits on the last underscore: prefix characters may be base-62 or
/// underscore, suffix characters must be strictly base-62. Generation,
/// timestamp range, and entropy length are not checked.
pub fn is_valid(token: &str) -> bool {
    let Some(boundary) = token.rfind('_') else {
        return false;
    };
    let prefix = &token[..boundary];
    let suffix = &token[boundary + 1..];
    prefix.chars().all(|c| c == '_' || base62::is_digit(c)) && suffix.chars().all(base62::is_digit)
}

/// Splits a token into its fields, or `None` when it is not well-formed.
pub fn parse(token: &str) -> Option<ParsedToken> {
    if !is_valid(token) {
        return None;
    }
    let boundary = token.rfind('_')?;
    let prefix = &token[..boundary];
    let suffix = &token[boundary + 1..];
    let generation = suffix.chars().next()?;

    // Generation-1 tokens carry a stray character before the timestamp
    // field. Decoded for compatibility with already-issued tokens, never
    // minted for new ones.
    let start = if generation == '1' { 2 } else { 1 };
    let end = suffix.len().min(start + TIMESTAMP_WIDTH);
    let field = suffix.get(start..end).unwrap_or("");
    let timestamp = base62::decode(field.trim_start_matches('0'))?;
    let entropy = suffix.get(end..).unwrap_or("").to_string();

    Some(ParsedToken {
        prefix: prefix.to_string(),
        generation,
        timestamp,
        entropy,
    })
}

/// Rebinds a token to a different type.
///
/// The suffix (generation, timestamp, entropy) is preserved byte-for-byte,
/// which links documents created together under different types.
pub fn swap_prefix(token: &str, new_prefix: &str) -> String {
    let suffix = token.rfind('_').map_or(token, |i| &token[i + 1..]);
    format!("{new_prefix}_{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    // 62^8, one past the widest timestamp the 8-char field can hold.
    const TIMESTAMP_LIMIT: i64 = 218_340_105_584_896;

    #[test]
    fn generated_token_has_expected_shape() {
        let token = generate("plan");
        assert!(token.starts_with("plan_0"));
        assert_eq!(token.len(), "plan".len() + 1 + 1 + 8 + DEFAULT_ENTROPY);
        assert!(is_valid(&token));
    }

    #[test]
    fn parse_roundtrips_explicit_fields() {
        let token = generate_with("plan", '0', Some(1_700_000_000), 6);
        let parsed = parse(&token).unwrap();
        assert_eq!(parsed.prefix, "plan");
        assert_eq!(parsed.generation, '0');
        assert_eq!(parsed.timestamp, 1_700_000_000);
        assert_eq!(parsed.entropy.len(), 6);
    }

    #[test]
    fn default_timestamp_is_current_time() {
        let before = Utc::now().timestamp();
        let parsed = parse(&generate("plan")).unwrap();
        let after = Utc::now().timestamp();
        assert!(parsed.timestamp >= before && parsed.timestamp <= after);
    }

    #[test]
    fn compound_prefix_splits_on_last_underscore() {
        let token = generate_with("cal_event", '0', Some(42), 4);
        let parsed = parse(&token).unwrap();
        assert_eq!(parsed.prefix, "cal_event");
        assert_eq!(parsed.timestamp, 42);
    }

    #[test]
    fn zero_entropy_is_allowed() {
        let token = generate_with("plan", '0', Some(0), 0);
        assert_eq!(token, "plan_000000000");
        let parsed = parse(&token).unwrap();
        assert_eq!(parsed.timestamp, 0);
        assert!(parsed.entropy.is_empty());
    }

    #[test]
    fn entropy_characters_are_distinct() {
        let parsed = parse(&generate_with("plan", '0', None, 62)).unwrap();
        let unique: HashSet<char> = parsed.entropy.chars().collect();
        assert_eq!(unique.len(), 62);
    }

    #[test]
    fn entropy_saturates_at_alphabet_size() {
        let parsed = parse(&generate_with("plan", '0', None, 100)).unwrap();
        assert_eq!(parsed.entropy.len(), 62);
    }

    #[test]
    fn is_valid_rejects_missing_underscore() {
        assert!(!is_valid("plan00000000abcdef"));
        assert!(!is_valid(""));
    }

    #[test]
    fn is_valid_rejects_foreign_characters() {
        assert!(!is_valid("plan_09!abcdef"));
        assert!(!is_valid("pl-an_09abcdef"));
        assert!(!is_valid("plan_09abc def"));
    }

    #[test]
    fn is_valid_permits_underscores_in_the_prefix() {
        assert!(is_valid(&generate("cal_event")));
    }

    #[test]
    fn parse_returns_none_for_malformed_input() {
        assert_eq!(parse("not a token"), None);
        assert_eq!(parse("nounderscore"), None);
        // Well-formed charset but an empty suffix carries no generation.
        assert_eq!(parse("plan_"), None);
    }

    #[test]
    fn legacy_generation_one_shifts_the_timestamp_field() {
        let field = format!("{:0>8}", base62::encode(1_700_000_000));
        let token = format!("plan_1x{field}abcdef");
        let parsed = parse(&token).unwrap();
        assert_eq!(parsed.generation, '1');
        assert_eq!(parsed.timestamp, 1_700_000_000);
        assert_eq!(parsed.entropy, "abcdef");
    }

    #[test]
    fn swap_prefix_preserves_the_suffix() {
        let token = generate_with("plan", '0', Some(1_700_000_000), 6);
        let companion = swap_prefix(&token, "sched");
        assert!(companion.starts_with("sched_"));

        let original = parse(&token).unwrap();
        let derived = parse(&companion).unwrap();
        assert_eq!(derived.prefix, "sched");
        assert_eq!(derived.generation, original.generation);
        assert_eq!(derived.timestamp, original.timestamp);
        assert_eq!(derived.entropy, original.entropy);
    }

    #[test]
    fn token_order_matches_issuance_order() {
        let older = generate_with("plan", '0', Some(1_700_000_000), 10);
        let newer = generate_with("plan", '0', Some(1_700_000_001), 10);
        assert!(older < newer);
    }

    proptest! {
        #[test]
        fn any_generated_token_roundtrips(
            prefix in "[0-9A-Za-z_]{0,12}",
            timestamp in 0..TIMESTAMP_LIMIT,
            entropy_len in 0usize..=62,
        ) {
            let token = generate_with(&prefix, '0', Some(timestamp), entropy_len);
            prop_assert!(is_valid(&token));
            let parsed = parse(&token).unwrap();
            prop_assert_eq!(parsed.prefix, prefix);
            prop_assert_eq!(parsed.generation, '0');
            prop_assert_eq!(parsed.timestamp, timestamp);
            prop_assert_eq!(parsed.entropy.len(), entropy_len);
        }

        #[test]
        fn any_string_with_a_foreign_character_is_invalid(
            s in "[0-9A-Za-z_]{0,8}[^0-9A-Za-z_][0-9A-Za-z_]{0,8}",
        ) {
            prop_assert!(!is_valid(&s));
        }
    }
}
