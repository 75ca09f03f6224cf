//! Autocomplete candidates derived from the user's projects and entry history.

use std::collections::HashSet;

use toggl::domain::{Project, UserProfile};

/// Project names prefixed with `#` in server order, then distinct entry
/// descriptions newest first. Order-preserving de-duplication across both.
pub fn base_candidates(profile: &UserProfile) -> Vec<String> {
    let projects = profile.projects.iter().map(|p| format!("#{}", p.name));
    let descriptions = profile
        .entries_newest_first()
        .into_iter()
        .filter_map(|entry| entry.description.clone())
        .filter(|description| !description.is_empty());

    let mut seen = HashSet::new();
    projects
        .chain(descriptions)
        .filter(|candidate| seen.insert(candidate.clone()))
        .collect()
}

/// Case-insensitive substring filter. A candidate identical to the input is
/// never offered.
pub fn filter_candidates(candidates: &[String], input: &str) -> Vec<String> {
    if input.is_empty() {
        return candidates.to_vec();
    }

    let needle = input.to_lowercase();
    candidates
        .iter()
        .filter(|candidate| candidate.as_str() != input)
        .filter(|candidate| candidate.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

pub fn completions(profile: Option<&UserProfile>, input: &str) -> Vec<String> {
    match profile {
        Some(profile) => filter_candidates(&base_candidates(profile), input),
        None => Vec::new(),
    }
}

/// First `#name` token in the input, where `name` runs until whitespace or
/// the end of the string.
pub fn extract_project_hint(input: &str) -> Option<&str> {
    input.match_indices('#').find_map(|(idx, _)| {
        let rest = &input[idx + 1..];
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let name = &rest[..end];
        (!name.is_empty()).then_some(name)
    })
}

pub fn resolve_project<'a>(projects: &'a [Project], hint: &str) -> Option<&'a Project> {
    let hint = hint.to_lowercase();
    projects.iter().find(|p| p.name.to_lowercase() == hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use toggl::domain::TimeEntry;

    fn entry(id: u64, start: time::OffsetDateTime, description: Option<&str>) -> TimeEntry {
        TimeEntry {
            id,
            start,
            description: description.map(str::to_string),
        }
    }

    fn acme_profile() -> UserProfile {
        UserProfile {
            id: 1,
            display_name: "Ada".to_string(),
            projects: vec![Project::new(10, "Acme")],
            time_entries: vec![
                entry(1, datetime!(2017-10-23 09:00 UTC), Some("Fix bug")),
                entry(2, datetime!(2017-10-24 09:00 UTC), Some("Write report")),
            ],
        }
    }

    #[test]
    fn empty_input_offers_everything() {
        assert_eq!(
            completions(Some(&acme_profile()), ""),
            vec!["#Acme", "Write report", "Fix bug"]
        );
    }

    #[test]
    fn filters_case_insensitively() {
        assert_eq!(
            completions(Some(&acme_profile()), "wr"),
            vec!["Write report"]
        );
        assert_eq!(completions(Some(&acme_profile()), "ACME"), vec!["#Acme"]);
    }

    #[test]
    fn exact_match_is_not_suggested() {
        assert!(completions(Some(&acme_profile()), "Write report").is_empty());
        // Only the exact spelling is excluded.
        assert_eq!(
            completions(Some(&acme_profile()), "write report"),
            vec!["Write report"]
        );
    }

    #[test]
    fn no_profile_no_completions() {
        assert!(completions(None, "").is_empty());
    }

    #[test]
    fn base_candidates_dedupe_and_sort_history() {
        let mut profile = acme_profile();
        profile.projects.push(Project::new(11, "Beta"));
        profile.time_entries.extend([
            entry(3, datetime!(2017-10-25 09:00 UTC), Some("Fix bug")),
            entry(4, datetime!(2017-10-22 09:00 UTC), None),
            entry(5, datetime!(2017-10-21 09:00 UTC), Some("#Acme")),
        ]);

        assert_eq!(
            base_candidates(&profile),
            vec!["#Acme", "#Beta", "Fix bug", "Write report"]
        );
    }

    #[test]
    fn filtered_results_always_contain_input() {
        let profile = acme_profile();
        for input in ["a", "e", "R", "bug", "#", "zzz"] {
            for suggestion in completions(Some(&profile), input) {
                assert!(suggestion.to_lowercase().contains(&input.to_lowercase()));
                assert_ne!(suggestion, input);
            }
        }
    }

    #[test]
    fn project_hint_extraction() {
        assert_eq!(extract_project_hint("#Acme new task"), Some("Acme"));
        assert_eq!(extract_project_hint("new task #Acme"), Some("Acme"));
        assert_eq!(extract_project_hint("#Acme\tnew"), Some("Acme"));
        assert_eq!(extract_project_hint("# lonely #Beta"), Some("Beta"));
        assert_eq!(extract_project_hint("#Acme #Beta"), Some("Acme"));
        assert_eq!(extract_project_hint("no project"), None);
        assert_eq!(extract_project_hint("#"), None);
    }

    #[test]
    fn project_resolution_ignores_case() {
        let projects = vec![Project::new(10, "Acme"), Project::new(11, "Beta")];
        assert_eq!(resolve_project(&projects, "acme").map(|p| p.id), Some(10));
        assert!(resolve_project(&projects, "Gamma").is_none());
    }
}
