use anyhow::{Result, bail};
use sandlot_game::{ReplayDecision, decisions_from_url, encode_seed, parse_seed, seed_from_url};
use std::collections::HashSet;

const DEFAULT_SEED: u32 = 1337;

/// Seed metadata resolved from a CLI token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u32,
    /// Canonical text form, as it appears in a replay link.
    pub code: String,
    /// Link the seed was read from, when the token was a replay URL.
    pub replay_url: Option<String>,
    pub decisions: Vec<ReplayDecision>,
}

impl SeedInfo {
    #[must_use]
    pub fn from_numeric(seed: u32) -> Self {
        Self {
            seed,
            code: encode_seed(seed),
            replay_url: None,
            decisions: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_replay_url(seed: u32, url: &str) -> Self {
        Self {
            seed,
            code: encode_seed(seed),
            replay_url: Some(url.to_string()),
            decisions: decisions_from_url(url),
        }
    }
}

fn looks_like_url(token: &str) -> bool {
    token.contains('?') || token.contains("seed=")
}

/// Resolve a list of CLI seed arguments into canonical seed metadata.
///
/// Accepts decimal seeds, base-36 seed codes, and replay URLs. Duplicate
/// seeds collapse into the first occurrence unless a later one carries a
/// replay log. An empty list falls back to a fixed default seed.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending: Vec<SeedInfo> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if looks_like_url(token) {
            let Some(seed) = seed_from_url(token) else {
                bail!("Replay URL carries no usable seed: {token}");
            };
            pending.push(SeedInfo::from_replay_url(seed, token));
            continue;
        }

        if let Some(seed) = parse_seed(token) {
            pending.push(SeedInfo::from_numeric(seed));
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    let mut deduped: Vec<SeedInfo> = Vec::new();
    let mut seen: HashSet<u32> = HashSet::new();

    for info in pending {
        if seen.insert(info.seed) {
            deduped.push(info);
        } else if info.replay_url.is_some()
            && let Some(entry) = deduped
                .iter_mut()
                .find(|entry| entry.seed == info.seed && entry.replay_url.is_none())
        {
            *entry = info;
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }

    Ok(deduped)
}
