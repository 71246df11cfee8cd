// monojust/src/fuzzy.rs

//! Fuzzy ranking of completion candidates against a partial query.
//!
//! Tiers, compared case-insensitively: an exact match scores [`EXACT_SCORE`];
//! a prefix match scores [`PREFIX_BASE`] plus the query length; anything else
//! must contain the query as an in-order subsequence and is scored from its
//! matched characters, capped at [`PREFIX_BASE`] so the tiers never overlap.
//! Non-matching candidates score 0 and are dropped.

pub const EXACT_SCORE: u32 = 1000;
pub const PREFIX_BASE: u32 = 900;

const MATCH_POINTS: u32 = 5;
const RUN_POINTS: u32 = 10;
const BOUNDARY_BONUS: u32 = 15;
const SHORT_CANDIDATE_LEN: usize = 50;

fn is_boundary(c: char) -> bool { matches!(c, '-' | '/' | '_') }

/// A candidate's position in the input list and its score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub index: usize,
    pub score: u32,
}

/// Score of `candidate` for `query`; 0 means no match.
pub fn score(query: &str, candidate: &str) -> u32 {
    let query = query.to_lowercase();
    let candidate = candidate.to_lowercase();

    if query == candidate { return EXACT_SCORE; }

    let query: Vec<char> = query.chars().collect();
    if query.is_empty() { return 0; }
    let cand: Vec<char> = candidate.chars().collect();

    if cand.starts_with(&query) {
        return PREFIX_BASE + (query.len() as u32).min(EXACT_SCORE - PREFIX_BASE - 1);
    }

    let mut total = 0u32;
    let mut qi = 0usize;
    let mut run = 0u32;
    for (i, &c) in cand.iter().enumerate() {
        if qi < query.len() && c == query[qi] {
            qi += 1;
            run = run.saturating_add(1);
            let points = if run > 1 { RUN_POINTS.saturating_mul(run) } else { MATCH_POINTS };
            total = total.saturating_add(points);
            if i == 0 || is_boundary(cand[i - 1]) { total = total.saturating_add(BOUNDARY_BONUS); }
        } else {
            run = 0;
        }
    }
    if qi < query.len() { return 0; }

    // long contiguous runs must not climb into the prefix tier
    total.saturating_add(SHORT_CANDIDATE_LEN.saturating_sub(cand.len()) as u32).min(PREFIX_BASE)
}

/// Scores every candidate and returns the matches best-first; ties keep input order.
pub fn rank<S: AsRef<str>>(query: &str, candidates: &[S]) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .enumerate()
        .map(|(index, c)| ScoredCandidate { index, score: score(query, c.as_ref()) })
        .filter(|s| s.score > 0)
        .collect();
    // stable
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Filters and orders `candidates` for `query`. An empty query returns the input untouched.
pub fn fuzzy_match<S: AsRef<str> + Clone>(query: &str, candidates: &[S]) -> Vec<S> {
    if query.is_empty() { return candidates.to_vec(); }
    rank(query, candidates).into_iter().map(|s| candidates[s.index].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_subsequence(q: &str, c: &str) -> bool {
        let c = c.to_lowercase();
        let mut it = c.chars();
        q.to_lowercase().chars().all(|qc| it.any(|cc| cc == qc))
    }

    #[test]
    fn empty_query_is_identity() {
        let c = vec!["b", "a", "c"];
        assert_eq!(fuzzy_match("", &c), c);
        let empty: Vec<String> = vec![];
        assert!(fuzzy_match("x", &empty).is_empty());
        assert!(fuzzy_match("", &empty).is_empty());
    }

    #[test]
    fn exact_beats_prefix_beats_subsequence() {
        let c = vec!["b-u-i-l-d", "build-all", "build"];
        assert_eq!(fuzzy_match("build", &c), vec!["build", "build-all", "b-u-i-l-d"]);
        assert_eq!(score("build", "BUILD"), EXACT_SCORE);
        assert_eq!(score("bu", "build"), PREFIX_BASE + 2);
    }

    #[test]
    fn longer_prefix_ranks_higher() {
        assert!(score("buil", "build") > score("bu", "build"));
    }

    #[test]
    fn returns_candidate_casing() {
        assert_eq!(fuzzy_match("DEP", &["Deploy", "nope"]), vec!["Deploy"]);
    }

    #[test]
    fn subsequence_scoring_details() {
        // d(5 + boundary 15), p(5), run continues: l(20), o(30), y(40); length bonus 50 - 10
        assert_eq!(score("dploy", "deploy-all"), 20 + 5 + 20 + 30 + 40 + 40);
        assert_eq!(score("xyz", "deploy"), 0);
    }

    #[test]
    fn segment_aligned_matches_rank_first() {
        let c = vec!["xtxe", "test (@services/e2e)", "t-e"];
        let got = fuzzy_match("te", &c);
        assert_eq!(got[0], "test (@services/e2e)");
        assert!(got.contains(&"t-e") && got.contains(&"xtxe"));
    }

    #[test]
    fn ties_keep_input_order() {
        let c = vec!["a-x", "b-x", "c-x"];
        assert_eq!(fuzzy_match("x", &c), c);
    }

    #[test]
    fn results_are_exactly_the_subsequence_matches() {
        let c = vec!["build", "test (@backend)", "lint", "deploy-prod", "bench", "db-migrate", "Docs"];
        for q in ["b", "bd", "te", "dp", "zz", "DO", "@b", "(@"] {
            let got = fuzzy_match(q, &c);
            for cand in &c {
                assert_eq!(got.contains(cand), is_subsequence(q, cand), "query {q:?} candidate {cand:?}");
            }
            assert_eq!(got, fuzzy_match(q, &c));
        }
    }

    #[test]
    fn long_infix_run_stays_below_prefix_tier() {
        let q = "abcdefghijklmnop";
        assert_eq!(score(q, &format!("x{q}")), PREFIX_BASE);
        assert!(score("x", &format!("x{q}")) > score(q, &format!("x{q}")));
    }

    #[test]
    fn very_long_run_saturates() {
        let run = "a".repeat(30_000);
        assert_eq!(score(&run, &format!("x{run}")), PREFIX_BASE);
        assert_eq!(fuzzy_match(&run, &[format!("x{run}"), "b".to_string()]), vec![format!("x{run}")]);
    }

    #[test]
    fn ranking_is_descending() {
        let c = vec!["migrate", "db-migrate", "m", "remigrate-all", "mig"];
        let ranked = rank("mig", &c);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
