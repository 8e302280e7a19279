use rapidfuzz::distance::jaro_winkler;

/// Case-insensitive Jaro-Winkler similarity (0.0 - 1.0)
pub fn title_similarity(query: &str, candidate: &str) -> f64 {
    let query_lower = query.trim().to_lowercase();
    let candidate_lower = candidate.trim().to_lowercase();

    jaro_winkler::normalized_similarity(query_lower.chars(), candidate_lower.chars())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_ignores_case() {
        assert_eq!(title_similarity("Counter-Strike 2", "counter-strike 2"), 1.0);
    }

    #[test]
    fn test_closer_title_scores_higher() {
        let good = title_similarity("vampire survivor", "Vampire Survivors");
        let bad = title_similarity("vampire survivor", "Left 4 Dead");

        assert!(good > bad);
        assert!((0.0..=1.0).contains(&good));
        assert!((0.0..=1.0).contains(&bad));
    }
}
