//! Pure query functions over an in-memory repository list. None of these
//! touch stored state.

use time::OffsetDateTime;

use crate::{
    freshness::Freshness,
    models::{FreshnessSummary, Repository},
};

/// Count repositories per freshness bucket at the given reference time.
pub fn summarize(repos: &[Repository], now: OffsetDateTime) -> FreshnessSummary {
    let mut summary = FreshnessSummary { total: repos.len(), ..Default::default() };
    for repo in repos {
        match Freshness::classify(repo.last_updated, now) {
            Freshness::Green => summary.green += 1,
            Freshness::Yellow => summary.yellow += 1,
            Freshness::Red => summary.red += 1,
        }
    }
    summary
}

/// Sort oldest-first. Stable: equal timestamps keep their relative order.
pub fn sort_by_age(repos: &mut [Repository]) { repos.sort_by_key(|r| r.last_updated) }

/// Sort newest-first. Stable: equal timestamps keep their relative order.
pub fn sort_by_age_desc(repos: &mut [Repository]) {
    repos.sort_by(|a, b| b.last_updated.cmp(&a.last_updated))
}

/// Repositories classified at the given level, in input order.
pub fn filter_by_freshness(
    repos: &[Repository],
    freshness: Freshness,
    now: OffsetDateTime,
) -> Vec<Repository> {
    repos
        .iter()
        .filter(|r| Freshness::classify(r.last_updated, now) == freshness)
        .cloned()
        .collect()
}

/// The `n` oldest repositories, oldest first. Does not mutate the input.
pub fn top_stale(repos: &[Repository], n: usize) -> Vec<Repository> {
    let mut sorted = repos.to_vec();
    sort_by_age(&mut sorted);
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use time::{Duration, macros::datetime};

    use super::*;

    const NOW: OffsetDateTime = datetime!(2024-06-15 12:00 UTC);

    fn repo(name: &str, age_days: i64) -> Repository {
        Repository {
            name: name.to_string(),
            full_name: format!("acme/{name}"),
            last_updated: NOW - Duration::days(age_days),
            html_url: format!("https://github.com/acme/{name}"),
        }
    }

    fn names(repos: &[Repository]) -> Vec<&str> {
        repos.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_summarize() {
        let repos = vec![
            repo("fresh1", 1),
            repo("fresh2", 30),
            repo("aging1", 90),
            repo("aging2", 120),
            repo("stale1", 400),
            repo("stale2", 800),
        ];
        let summary = summarize(&repos, NOW);
        assert_eq!(
            summary,
            FreshnessSummary { green: 2, yellow: 2, red: 2, total: 6 }
        );
        assert_eq!(summary.green + summary.yellow + summary.red, summary.total);
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[], NOW), FreshnessSummary::default());
    }

    #[test]
    fn test_sort_by_age() {
        let mut repos = vec![repo("middle", 30), repo("newest", 1), repo("oldest", 365)];
        sort_by_age(&mut repos);
        assert_eq!(names(&repos), ["oldest", "middle", "newest"]);
    }

    #[test]
    fn test_sort_by_age_desc() {
        let mut repos = vec![repo("middle", 30), repo("oldest", 365), repo("newest", 1)];
        sort_by_age_desc(&mut repos);
        assert_eq!(names(&repos), ["newest", "middle", "oldest"]);
    }

    #[test]
    fn test_sorts_are_reverses_without_ties() {
        let repos = vec![repo("a", 10), repo("b", 200), repo("c", 75), repo("d", 1)];
        let mut asc = repos.clone();
        sort_by_age(&mut asc);
        let mut desc = repos;
        sort_by_age_desc(&mut desc);
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut repos = vec![repo("first", 30), repo("second", 30), repo("third", 30)];
        sort_by_age(&mut repos);
        assert_eq!(names(&repos), ["first", "second", "third"]);
    }

    #[test]
    fn test_filter_by_freshness() {
        let repos = vec![
            repo("green1", 1),
            repo("green2", 30),
            repo("yellow1", 90),
            repo("red1", 365),
            repo("red2", 730),
        ];
        let cases: &[(Freshness, &[&str])] = &[
            (Freshness::Green, &["green1", "green2"]),
            (Freshness::Yellow, &["yellow1"]),
            (Freshness::Red, &["red1", "red2"]),
        ];
        for &(freshness, expected) in cases {
            let filtered = filter_by_freshness(&repos, freshness, NOW);
            assert_eq!(names(&filtered), expected, "filter {freshness}");
        }
    }

    #[test]
    fn test_filter_by_freshness_empty() {
        assert!(filter_by_freshness(&[], Freshness::Green, NOW).is_empty());
    }

    #[test]
    fn test_top_stale() {
        let repos = vec![
            repo("repo1", 30),
            repo("repo2", 730),
            repo("repo3", 365),
            repo("repo4", 90),
            repo("repo5", 1),
        ];
        let top3 = top_stale(&repos, 3);
        assert_eq!(names(&top3), ["repo2", "repo3", "repo4"]);
        // Input order untouched
        assert_eq!(repos[0].name, "repo1");
    }

    #[test]
    fn test_top_stale_with_fewer_repos() {
        let repos = vec![repo("repo1", 30), repo("repo2", 365)];
        let top5 = top_stale(&repos, 5);
        assert_eq!(names(&top5), ["repo2", "repo1"]);
    }

    #[test]
    fn test_top_stale_empty_and_zero() {
        assert!(top_stale(&[], 10).is_empty());
        assert!(top_stale(&[repo("repo1", 30)], 0).is_empty());
    }
}
