//! Candidate branch selection and choice of the representative branch.

use crate::model::BranchStats;

pub const FALLBACK_DEFAULT: &str = "main";
pub const CONVENTIONAL_BRANCH: &str = "master";
pub const DEFAULT_MARKER: &str = "dev";

/// Which branches of a project get counted.
#[derive(Debug, Clone)]
pub struct BranchPolicy {
    markers: Vec<String>,
}

impl Default for BranchPolicy {
    fn default() -> Self {
        Self::new([DEFAULT_MARKER])
    }
}

impl BranchPolicy {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let markers = markers
            .into_iter()
            .map(|m| m.as_ref().trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();
        Self { markers }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    pub fn is_marked(&self, branch: &str) -> bool {
        let lower = branch.to_lowercase();
        self.markers.iter().any(|m| lower.contains(m.as_str()))
    }

    /// Ordered, deduplicated candidate set: the configured default (or
    /// `main`), then `master`, then marked branches in listing order.
    pub fn candidates<'a, I>(&self, default_branch: Option<&str>, listed: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut out: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            if !out.iter().any(|b| b == name) {
                out.push(name.to_string());
            }
        };

        push(default_branch.unwrap_or(FALLBACK_DEFAULT));
        push(CONVENTIONAL_BRANCH);
        for name in listed {
            if self.is_marked(name) {
                push(name);
            }
        }
        out
    }
}

/// Pick the branch with the strictly highest total. Equal totals keep the
/// branch evaluated first.
pub fn choose_branch<I>(results: I) -> Option<(String, BranchStats)>
where
    I: IntoIterator<Item = (String, Option<BranchStats>)>,
{
    let mut best: Option<(String, BranchStats)> = None;
    for (branch, stats) in results {
        let Some(stats) = stats.filter(|s| !s.is_empty()) else {
            continue;
        };
        match &best {
            Some((_, current)) if stats.total <= current.total => {}
            _ => best = Some((branch, stats)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stats(total: u64) -> BranchStats {
        let mut s = BranchStats::new();
        s.add_lines("C#", total);
        s
    }

    #[test]
    fn candidates_include_default_master_and_marked() {
        let policy = BranchPolicy::default();
        let listed = ["main", "feature/login", "develop", "DEV-42", "release"];
        let got = policy.candidates(Some("main"), listed);
        assert_eq!(got, vec!["main", "master", "develop", "DEV-42"]);
    }

    #[test]
    fn candidates_fall_back_to_main_without_default() {
        let policy = BranchPolicy::default();
        let got = policy.candidates(None, std::iter::empty());
        assert_eq!(got, vec!["main", "master"]);
    }

    #[test]
    fn candidates_dedupe_default_equal_to_master() {
        let policy = BranchPolicy::default();
        let got = policy.candidates(Some("master"), ["master", "dev"]);
        assert_eq!(got, vec!["master", "dev"]);
    }

    #[test]
    fn markers_are_configurable() {
        let policy = BranchPolicy::new(["Staging", " ", "qa"]);
        assert_eq!(policy.markers(), &["staging".to_string(), "qa".to_string()]);
        let got = policy.candidates(Some("trunk"), ["develop", "pre-STAGING", "qa/1"]);
        assert_eq!(got, vec!["trunk", "master", "pre-STAGING", "qa/1"]);
    }

    #[test]
    fn tie_keeps_first_evaluated() {
        let chosen = choose_branch(vec![
            ("main".to_string(), Some(stats(10))),
            ("master".to_string(), Some(stats(10))),
        ]);
        assert_eq!(chosen.map(|(b, _)| b), Some("main".to_string()));
    }

    #[test]
    fn highest_total_wins() {
        let chosen = choose_branch(vec![
            ("main".to_string(), Some(stats(3))),
            ("master".to_string(), None),
            ("develop".to_string(), Some(stats(12))),
        ]);
        let (branch, s) = chosen.unwrap();
        assert_eq!(branch, "develop");
        assert_eq!(s.total, 12);
    }

    #[test]
    fn nothing_counted_means_no_choice() {
        let chosen = choose_branch(vec![
            ("main".to_string(), None),
            ("master".to_string(), Some(BranchStats::new())),
        ]);
        assert!(chosen.is_none());
    }
}
