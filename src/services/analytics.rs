use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::models::{
    CalendarDay, EmotionCount, Insight, InsightKind, JournalEntry, MoodStats, Sentiment,
    TrendPoint, WeeklySentiment,
};

// All functions here are pure over the entry list (most-recent-first) and are
// recomputed from scratch on every call. Calendar math uses the UTC date of
// each entry; "today"/"now" come in as parameters.

const TREND_WINDOW: usize = 14;
const TOP_EMOTIONS: usize = 8;
const WEEK_WINDOW: usize = 8;
const RECENT_WINDOW: usize = 5;
const MAX_INSIGHTS: usize = 4;

/// Up to the 14 most recent entries, oldest to newest, for the trend chart.
pub fn mood_trend(entries: &[JournalEntry]) -> Vec<TrendPoint> {
    entries
        .iter()
        .take(TREND_WINDOW)
        .rev()
        .map(|entry| TrendPoint {
            date: entry.date.format("%b %-d").to_string(),
            day: entry.date.format("%a").to_string(),
            user_mood: entry.mood,
            ai_mood: entry.analysis.as_ref().map(|a| a.mood_score),
        })
        .collect()
}

/// Frequency of each emotion label across all entries, top 8 by count.
/// Labels are case-normalized to capitalized form; ties keep the order the
/// labels were first encountered in (stable sort).
pub fn emotion_distribution(entries: &[JournalEntry]) -> Vec<EmotionCount> {
    let mut counts: Vec<EmotionCount> = Vec::new();
    for entry in entries {
        for emotion in &entry.emotions {
            let name = capitalize(emotion);
            if name.is_empty() {
                continue;
            }
            match counts.iter_mut().find(|c| c.name == name) {
                Some(count) => count.value += 1,
                None => counts.push(EmotionCount { name, value: 1 }),
            }
        }
    }
    counts.sort_by(|a, b| b.value.cmp(&a.value));
    counts.truncate(TOP_EMOTIONS);
    counts
}

/// Sentiment counts grouped by Sunday-starting week, most recent 8 weeks in
/// chronological order. Weeks without entries are omitted, not zero-filled.
pub fn weekly_sentiment(entries: &[JournalEntry]) -> Vec<WeeklySentiment> {
    let mut buckets: BTreeMap<NaiveDate, (u32, u32, u32)> = BTreeMap::new();
    for entry in entries {
        let start = week_start(entry.date.date_naive());
        let slot = buckets.entry(start).or_insert((0, 0, 0));
        match entry.sentiment {
            Sentiment::Positive => slot.0 += 1,
            Sentiment::Negative => slot.1 += 1,
            Sentiment::Neutral => slot.2 += 1,
        }
    }

    let skip = buckets.len().saturating_sub(WEEK_WINDOW);
    buckets
        .into_iter()
        .skip(skip)
        .map(|(start, (positive, negative, neutral))| WeeklySentiment {
            week: start.format("%b %-d").to_string(),
            positive,
            negative,
            neutral,
        })
        .collect()
}

pub fn mood_stats(entries: &[JournalEntry], today: NaiveDate) -> MoodStats {
    if entries.is_empty() {
        return MoodStats::default();
    }

    let total = entries.len();
    let average_mood = entries.iter().map(|e| f64::from(e.mood)).sum::<f64>() / total as f64;

    let scored: Vec<f64> = entries
        .iter()
        .filter_map(|e| e.analysis.as_ref().map(|a| a.mood_score))
        .collect();
    let average_ai_mood = if scored.is_empty() {
        0.0
    } else {
        scored.iter().sum::<f64>() / scored.len() as f64
    };

    let positive_entries = entries
        .iter()
        .filter(|e| e.sentiment == Sentiment::Positive)
        .count();

    // Last 3 entries vs the 3 before them; 0 until both windows are full.
    let mood_trend = if total >= 6 {
        let recent = entries[..3].iter().map(|e| f64::from(e.mood)).sum::<f64>() / 3.0;
        let previous = entries[3..6].iter().map(|e| f64::from(e.mood)).sum::<f64>() / 3.0;
        recent - previous
    } else {
        0.0
    };

    MoodStats {
        average_mood,
        average_ai_mood,
        total_entries: total,
        positive_entries,
        mood_trend,
        streak_days: current_streak(entries, today),
    }
}

/// Consecutive calendar days with at least one entry, counting back from
/// today. A day without an entry ends the streak; no entry today means 0.
pub fn current_streak(entries: &[JournalEntry], today: NaiveDate) -> u32 {
    let days: HashSet<NaiveDate> = entries.iter().map(|e| e.date.date_naive()).collect();
    let mut streak = 0;
    let mut day = today;
    while days.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

/// Fixed heuristics over recent and historical entries, evaluated in order,
/// first four kept.
pub fn wellness_insights(entries: &[JournalEntry], now: DateTime<Utc>) -> Vec<Insight> {
    if entries.is_empty() {
        return Vec::new();
    }

    let mut insights = Vec::new();

    let recent = &entries[..entries.len().min(RECENT_WINDOW)];
    let avg_recent_mood =
        recent.iter().map(|e| f64::from(e.mood)).sum::<f64>() / recent.len() as f64;

    if avg_recent_mood < 4.0 {
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: "Low Mood Pattern".to_string(),
            description: "Your recent mood scores have been below 4/10. Consider reaching out \
                          to someone or practicing self-care."
                .to_string(),
        });
    } else if avg_recent_mood > 7.0 {
        insights.push(Insight {
            kind: InsightKind::Positive,
            title: "Great Mood Streak".to_string(),
            description: "You've been feeling great lately! Keep up the positive momentum."
                .to_string(),
        });
    }

    let recent_negative = recent
        .iter()
        .filter(|e| e.sentiment == Sentiment::Negative)
        .count();
    if recent_negative >= 3 {
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: "Negative Sentiment Alert".to_string(),
            description: "You've had several negative entries recently. Consider talking to a \
                          mental health professional."
                .to_string(),
        });
    }

    let positive = entries
        .iter()
        .filter(|e| e.sentiment == Sentiment::Positive)
        .count();
    let positive_ratio = positive as f64 / entries.len() as f64;
    if positive_ratio > 0.7 {
        insights.push(Insight {
            kind: InsightKind::Positive,
            title: "Positive Outlook".to_string(),
            description: format!(
                "{}% of your entries show positive sentiment. Great job maintaining a positive \
                 mindset!",
                (positive_ratio * 100.0).round()
            ),
        });
    }

    if let Some(oldest) = entries.last() {
        let days_since_first = (now - oldest.date).num_days().max(1);
        let entries_per_day = entries.len() as f64 / days_since_first as f64;
        if entries_per_day > 0.8 {
            insights.push(Insight {
                kind: InsightKind::Positive,
                title: "Consistent Journaling".to_string(),
                description: "You're maintaining great journaling consistency. This habit \
                              supports your mental wellness journey."
                    .to_string(),
            });
        }
    }

    let unique_emotions: HashSet<&String> = entries.iter().flat_map(|e| &e.emotions).collect();
    if unique_emotions.len() > 10 {
        insights.push(Insight {
            kind: InsightKind::Neutral,
            title: "Emotional Awareness".to_string(),
            description: format!(
                "You've expressed {} different emotions. This shows good emotional awareness \
                 and vocabulary.",
                unique_emotions.len()
            ),
        });
    }

    insights.truncate(MAX_INSIGHTS);
    insights
}

/// Days of the given month that have at least one entry, each represented by
/// its most recent entry.
pub fn month_calendar(entries: &[JournalEntry], year: i32, month: u32) -> Vec<CalendarDay> {
    let mut days = Vec::new();
    for day in 1..=31 {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };
        if let Some(entry) = entries.iter().find(|e| e.date.date_naive() == date) {
            days.push(CalendarDay {
                day,
                mood: entry.mood,
                sentiment: entry.sentiment,
            });
        }
    }
    days
}

// ─── Helpers ───

fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_sunday()))
}

fn capitalize(label: &str) -> String {
    let mut chars = label.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryAnalysis;

    // Fixed reference date: Sunday 2025-06-15.
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn at(date: NaiveDate) -> DateTime<Utc> {
        date.and_hms_opt(12, 0, 0).unwrap().and_utc()
    }

    fn entry(days_ago: i64, mood: u8, sentiment: Sentiment, emotions: &[&str]) -> JournalEntry {
        let date = today() - Duration::days(days_ago);
        JournalEntry {
            id: 1_000_000 - days_ago,
            date: at(date),
            mood,
            content: "test".to_string(),
            sentiment,
            emotions: emotions.iter().map(|e| e.to_string()).collect(),
            analysis: None,
        }
    }

    fn with_score(mut entry: JournalEntry, mood_score: f64) -> JournalEntry {
        entry.analysis = Some(EntryAnalysis {
            mood_score,
            confidence: 0.9,
            key_phrases: vec![],
            insights: String::new(),
            recommendations: vec![],
        });
        entry
    }

    #[test]
    fn trend_maps_last_fourteen_entries_oldest_first() {
        let entries: Vec<JournalEntry> = (0..20)
            .map(|i| entry(i, 5, Sentiment::Neutral, &[]))
            .collect();

        let trend = mood_trend(&entries);
        assert_eq!(trend.len(), 14);
        assert_eq!(trend.first().unwrap().date, "Jun 2");
        assert_eq!(trend.last().unwrap().date, "Jun 15");
        assert!(trend.iter().all(|p| p.ai_mood.is_none()));
    }

    #[test]
    fn trend_carries_ai_scores_when_present() {
        let entries = vec![
            with_score(entry(0, 8, Sentiment::Positive, &[]), 8.5),
            entry(1, 4, Sentiment::Neutral, &[]),
        ];
        let trend = mood_trend(&entries);
        assert_eq!(trend[0].ai_mood, None);
        assert_eq!(trend[1].ai_mood, Some(8.5));
        assert_eq!(trend[1].user_mood, 8);
    }

    #[test]
    fn emotion_distribution_counts_and_breaks_ties_by_first_encounter() {
        let entries = vec![
            entry(0, 5, Sentiment::Neutral, &["joy"]),
            entry(1, 5, Sentiment::Neutral, &["joy"]),
            entry(2, 5, Sentiment::Neutral, &["calm"]),
        ];

        let top = emotion_distribution(&entries);
        assert_eq!(
            top,
            vec![
                EmotionCount {
                    name: "Joy".to_string(),
                    value: 2
                },
                EmotionCount {
                    name: "Calm".to_string(),
                    value: 1
                },
            ]
        );
    }

    #[test]
    fn emotion_distribution_normalizes_case_and_truncates_to_eight() {
        let mut entries = vec![entry(0, 5, Sentiment::Neutral, &["Joy", "JOY", "joy"])];
        entries.push(entry(
            1,
            5,
            Sentiment::Neutral,
            &["a", "b", "c", "d", "e", "f", "g", "h", "i"],
        ));

        let top = emotion_distribution(&entries);
        assert_eq!(top.len(), 8);
        assert_eq!(top[0].name, "Joy");
        assert_eq!(top[0].value, 3);
    }

    #[test]
    fn weekly_buckets_never_include_empty_weeks() {
        // Two entries in one week, one entry five weeks back; the gap weeks
        // must not appear.
        let entries = vec![
            entry(1, 6, Sentiment::Positive, &[]),
            entry(2, 4, Sentiment::Negative, &[]),
            entry(35, 5, Sentiment::Neutral, &[]),
        ];

        let weeks = weekly_sentiment(&entries);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].neutral, 1);
        assert_eq!(weeks[1].positive, 1);
        assert_eq!(weeks[1].negative, 1);
        assert!(weeks
            .iter()
            .all(|w| w.positive + w.negative + w.neutral > 0));
    }

    #[test]
    fn weekly_buckets_split_on_sunday() {
        // 2025-06-15 is a Sunday; the 14th belongs to the previous week.
        let entries = vec![
            entry(0, 6, Sentiment::Positive, &[]),
            entry(1, 4, Sentiment::Negative, &[]),
        ];

        let weeks = weekly_sentiment(&entries);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].week, "Jun 8");
        assert_eq!(weeks[1].week, "Jun 15");
    }

    #[test]
    fn weekly_buckets_keep_only_the_most_recent_eight() {
        let entries: Vec<JournalEntry> = (0..12)
            .map(|week| entry(week * 7, 5, Sentiment::Neutral, &[]))
            .collect();

        let weeks = weekly_sentiment(&entries);
        assert_eq!(weeks.len(), 8);
        assert_eq!(weeks.last().unwrap().week, "Jun 15");
    }

    #[test]
    fn stats_cover_averages_counts_and_trend() {
        let entries = vec![
            with_score(entry(0, 8, Sentiment::Positive, &[]), 9.0),
            entry(1, 8, Sentiment::Positive, &[]),
            with_score(entry(2, 8, Sentiment::Neutral, &[]), 7.0),
            entry(3, 5, Sentiment::Negative, &[]),
            entry(4, 5, Sentiment::Neutral, &[]),
            entry(5, 5, Sentiment::Neutral, &[]),
        ];

        let stats = mood_stats(&entries, today());
        assert_eq!(stats.total_entries, 6);
        assert!((stats.average_mood - 6.5).abs() < 1e-9);
        assert!((stats.average_ai_mood - 8.0).abs() < 1e-9);
        assert_eq!(stats.positive_entries, 2);
        assert!((stats.mood_trend - 3.0).abs() < 1e-9);
        assert_eq!(stats.streak_days, 6);
    }

    #[test]
    fn stats_trend_is_zero_with_fewer_than_six_entries() {
        let entries = vec![
            entry(0, 9, Sentiment::Positive, &[]),
            entry(1, 9, Sentiment::Positive, &[]),
            entry(2, 2, Sentiment::Negative, &[]),
            entry(3, 2, Sentiment::Negative, &[]),
        ];
        assert_eq!(mood_stats(&entries, today()).mood_trend, 0.0);
    }

    #[test]
    fn stats_ai_average_is_zero_without_any_scores() {
        let entries = vec![entry(0, 5, Sentiment::Neutral, &[])];
        assert_eq!(mood_stats(&entries, today()).average_ai_mood, 0.0);
    }

    #[test]
    fn empty_history_produces_default_stats_and_no_insights() {
        assert_eq!(mood_stats(&[], today()).total_entries, 0);
        assert!(wellness_insights(&[], at(today())).is_empty());
        assert!(mood_trend(&[]).is_empty());
        assert!(emotion_distribution(&[]).is_empty());
        assert!(weekly_sentiment(&[]).is_empty());
    }

    #[test]
    fn streak_stops_at_the_first_gap() {
        // Entries today, yesterday, and three days ago: the day-2 gap caps
        // the streak at 2.
        let entries = vec![
            entry(0, 5, Sentiment::Neutral, &[]),
            entry(1, 5, Sentiment::Neutral, &[]),
            entry(3, 5, Sentiment::Neutral, &[]),
        ];
        assert_eq!(current_streak(&entries, today()), 2);
    }

    #[test]
    fn streak_is_zero_without_an_entry_today() {
        let entries = vec![entry(1, 5, Sentiment::Neutral, &[])];
        assert_eq!(current_streak(&entries, today()), 0);
    }

    #[test]
    fn streak_counts_multiple_same_day_entries_once() {
        let entries = vec![
            entry(0, 5, Sentiment::Neutral, &[]),
            entry(0, 7, Sentiment::Positive, &[]),
            entry(1, 5, Sentiment::Neutral, &[]),
        ];
        assert_eq!(current_streak(&entries, today()), 2);
    }

    #[test]
    fn low_recent_mood_triggers_the_warning() {
        let entries: Vec<JournalEntry> = [2, 3, 3, 2, 4]
            .iter()
            .enumerate()
            .map(|(i, &mood)| entry(i as i64, mood, Sentiment::Neutral, &[]))
            .collect();

        let insights = wellness_insights(&entries, at(today()));
        assert!(insights.iter().any(|i| i.title == "Low Mood Pattern"));
        assert!(!insights.iter().any(|i| i.title == "Great Mood Streak"));
    }

    #[test]
    fn high_recent_mood_triggers_the_streak_and_suppresses_the_warning() {
        let entries: Vec<JournalEntry> = [8, 9, 8, 9, 9]
            .iter()
            .enumerate()
            .map(|(i, &mood)| entry(i as i64, mood, Sentiment::Neutral, &[]))
            .collect();

        let insights = wellness_insights(&entries, at(today()));
        assert!(insights.iter().any(|i| i.title == "Great Mood Streak"));
        assert!(!insights.iter().any(|i| i.title == "Low Mood Pattern"));
    }

    #[test]
    fn three_negative_recent_entries_raise_the_alert() {
        let entries = vec![
            entry(0, 5, Sentiment::Negative, &[]),
            entry(1, 5, Sentiment::Negative, &[]),
            entry(2, 5, Sentiment::Negative, &[]),
            entry(3, 5, Sentiment::Positive, &[]),
            entry(4, 5, Sentiment::Neutral, &[]),
        ];
        let insights = wellness_insights(&entries, at(today()));
        assert!(insights
            .iter()
            .any(|i| i.title == "Negative Sentiment Alert" && i.kind == InsightKind::Warning));
    }

    #[test]
    fn positive_outlook_reports_the_percentage() {
        let entries = vec![
            entry(0, 6, Sentiment::Positive, &[]),
            entry(1, 6, Sentiment::Positive, &[]),
            entry(2, 6, Sentiment::Positive, &[]),
            entry(3, 6, Sentiment::Neutral, &[]),
        ];
        let insights = wellness_insights(&entries, at(today()));
        let outlook = insights
            .iter()
            .find(|i| i.title == "Positive Outlook")
            .unwrap();
        assert!(outlook.description.starts_with("75%"));
    }

    #[test]
    fn dense_journaling_earns_the_consistency_insight() {
        let entries: Vec<JournalEntry> = (0..5)
            .map(|i| entry(i, 5, Sentiment::Neutral, &[]))
            .collect();
        let insights = wellness_insights(&entries, at(today()));
        assert!(insights.iter().any(|i| i.title == "Consistent Journaling"));
    }

    #[test]
    fn emotion_variety_earns_the_awareness_insight() {
        let labels = [
            "joy", "calm", "anger", "fear", "hope", "pride", "awe", "envy", "grief", "trust",
            "shame",
        ];
        let entries: Vec<JournalEntry> = labels
            .iter()
            .enumerate()
            .map(|(i, &label)| entry(i as i64 * 3, 5, Sentiment::Neutral, &[label]))
            .collect();

        let insights = wellness_insights(&entries, at(today()));
        let awareness = insights
            .iter()
            .find(|i| i.title == "Emotional Awareness")
            .unwrap();
        assert_eq!(awareness.kind, InsightKind::Neutral);
        assert!(awareness.description.contains("11 different emotions"));
    }

    #[test]
    fn at_most_four_insights_in_evaluation_order() {
        // High mood, all positive, daily, and 11 distinct emotions: rules
        // 2, 4, 5 and 6 all qualify but only the first four survive.
        let labels = [
            "joy", "calm", "hope", "pride", "awe", "love", "peace", "zest", "glee", "bliss",
            "cheer",
        ];
        let entries: Vec<JournalEntry> = labels
            .iter()
            .enumerate()
            .map(|(i, &label)| entry(i as i64, 9, Sentiment::Positive, &[label]))
            .collect();

        let insights = wellness_insights(&entries, at(today()));
        assert_eq!(insights.len(), 4);
        assert_eq!(insights[0].title, "Great Mood Streak");
        assert_eq!(insights[1].title, "Positive Outlook");
        assert_eq!(insights[2].title, "Consistent Journaling");
        assert_eq!(insights[3].title, "Emotional Awareness");
    }

    #[test]
    fn calendar_lists_only_days_with_entries() {
        let entries = vec![
            entry(0, 8, Sentiment::Positive, &[]),
            entry(5, 3, Sentiment::Negative, &[]),
            entry(40, 5, Sentiment::Neutral, &[]),
        ];

        let june = month_calendar(&entries, 2025, 6);
        assert_eq!(june.len(), 2);
        assert_eq!(june[0].day, 10);
        assert_eq!(june[0].sentiment, Sentiment::Negative);
        assert_eq!(june[1].day, 15);
        assert_eq!(june[1].mood, 8);

        let may = month_calendar(&entries, 2025, 5);
        assert_eq!(may.len(), 1);
        assert_eq!(may[0].day, 6);
    }

    #[test]
    fn calendar_prefers_the_most_recent_entry_per_day() {
        let newer = entry(0, 9, Sentiment::Positive, &[]);
        let older = entry(0, 2, Sentiment::Negative, &[]);
        let june = month_calendar(&[newer, older], 2025, 6);
        assert_eq!(june.len(), 1);
        assert_eq!(june[0].mood, 9);
    }
}
