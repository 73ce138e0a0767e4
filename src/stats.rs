use std::collections::HashMap;

use crate::log::{LogEntry, SearchRecord, Verdict};

/// Accuracy counters over the whole log.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AccuracyStats {
    pub total: usize,
    pub rated: usize,
    pub correct: usize,
    pub partial: usize,
    pub wrong: usize,
}

/// Compute accuracy counts by joining search and feedback events on id.
///
/// When several feedback events reference one search id, the last one in
/// log order wins.
pub fn compute_stats(entries: &[LogEntry]) -> AccuracyStats {
    let resolved = resolve_feedback(entries);

    let mut stats = AccuracyStats::default();
    for entry in entries {
        let LogEntry::Search(search) = entry else { continue };
        stats.total += 1;
        let Some(verdict) = resolved.get(search.id.as_str()) else {
            continue;
        };
        stats.rated += 1;
        match verdict {
            Verdict::Yes => stats.correct += 1,
            Verdict::Partial => stats.partial += 1,
            Verdict::No => stats.wrong += 1,
        }
    }
    stats
}

/// One row of the recent-searches view.
#[derive(Debug)]
pub struct RecentRow {
    pub id: String,
    pub display: String,
    pub confidence: String,
    pub verdict: Option<Verdict>,
}

/// The last `limit` searches, newest first, each with its resolved verdict.
pub fn recent(entries: &[LogEntry], limit: usize) -> Vec<RecentRow> {
    let resolved = resolve_feedback(entries);

    entries
        .iter()
        .filter_map(|entry| match entry {
            LogEntry::Search(s) => Some(s),
            _ => None,
        })
        .rev()
        .take(limit)
        .map(|search| RecentRow {
            id: search.id.clone(),
            display: display_name(search),
            confidence: search.confidence.clone().unwrap_or_else(|| "?".to_string()),
            verdict: resolved.get(search.id.as_str()).copied(),
        })
        .collect()
}

/// Feedback verdict per search id, last write in log order winning.
fn resolve_feedback(entries: &[LogEntry]) -> HashMap<&str, Verdict> {
    let mut resolved = HashMap::new();
    for entry in entries {
        if let LogEntry::Feedback(f) = entry {
            resolved.insert(f.search_id.as_str(), f.correct);
        }
    }
    resolved
}

fn display_name(search: &SearchRecord) -> String {
    if let Some(name) = &search.extracted_name {
        return name.clone();
    }
    let snippet: String = search.narrative.chars().take(30).collect();
    if search.narrative.chars().count() > 30 {
        format!("{snippet}…")
    } else {
        snippet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{FeedbackRecord, SearchRecord};
    use crate::parser::parse_response;

    fn search(id: &str, narrative: &str) -> LogEntry {
        let result = parse_response("", None, None);
        let mut record = SearchRecord::new(narrative, &result, "test-model");
        record.id = id.to_string();
        LogEntry::Search(record)
    }

    fn feedback(search_id: &str, correct: Verdict) -> LogEntry {
        LogEntry::Feedback(FeedbackRecord::new(search_id, correct, ""))
    }

    #[test]
    fn empty_log_is_all_zero() {
        assert_eq!(compute_stats(&[]), AccuracyStats::default());
    }

    #[test]
    fn searches_without_feedback_count_only_toward_total() {
        let entries = vec![search("a", "one"), search("b", "two")];
        let stats = compute_stats(&entries);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.rated, 0);
    }

    #[test]
    fn round_trip_counts_add_up() {
        let entries = vec![
            search("a", "one"),
            search("b", "two"),
            search("c", "three"),
            feedback("a", Verdict::Yes),
            feedback("b", Verdict::Partial),
        ];
        let stats = compute_stats(&entries);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.rated, 2);
        assert_eq!(stats.correct + stats.partial + stats.wrong, stats.rated);
        assert_eq!(stats.correct, 1);
        assert_eq!(stats.partial, 1);
        assert_eq!(stats.wrong, 0);
    }

    #[test]
    fn duplicate_feedback_resolves_to_last_in_log_order() {
        let entries = vec![
            search("a", "one"),
            feedback("a", Verdict::No),
            feedback("a", Verdict::Yes),
        ];
        let stats = compute_stats(&entries);
        assert_eq!(stats.rated, 1);
        assert_eq!(stats.correct, 1);
        assert_eq!(stats.wrong, 0);
    }

    #[test]
    fn feedback_for_unknown_search_id_is_ignored() {
        let entries = vec![search("a", "one"), feedback("ghost", Verdict::Yes)];
        let stats = compute_stats(&entries);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.rated, 0);
    }

    #[test]
    fn recent_is_newest_first_and_capped() {
        let entries: Vec<LogEntry> = (0..5)
            .map(|i| search(&format!("id{i}"), &format!("narrative {i}")))
            .collect();
        let rows = recent(&entries, 3);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].id, "id4");
        assert_eq!(rows[2].id, "id2");
    }

    #[test]
    fn recent_shows_verdict_badge_source() {
        let entries = vec![search("a", "one"), feedback("a", Verdict::Partial)];
        let rows = recent(&entries, 8);
        assert_eq!(rows[0].verdict, Some(Verdict::Partial));
        assert_eq!(rows[0].verdict.unwrap().badge(), "~");
    }

    #[test]
    fn recent_falls_back_to_narrative_snippet() {
        let long = "met a very tall person at the annual robotics conference in Boston";
        let entries = vec![search("a", long)];
        let rows = recent(&entries, 1);
        assert!(rows[0].display.ends_with('…'));
        assert_eq!(rows[0].display.chars().count(), 31);
        assert_eq!(rows[0].confidence, "?");
    }
}
