//! Analytics reduction: folds stored quiz attempts into the dashboard report.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::types::{
    ActivityDay, AnalyticsReport, AnalyticsStats, Attempt, QuestionClassification, QuestionTag,
    TaggedQuestion, TimelinePoint,
};

/// Number of days covered by the activity heatmap, including today.
pub const ACTIVITY_WINDOW_DAYS: i64 = 14;

/// Fold attempt rows into a full analytics report.
///
/// Single pass over the attempts: rolling totals, best score, a timeline
/// point per attempt, per-day activity counts for the trailing
/// [`ACTIVITY_WINDOW_DAYS`] window, and tag classification buckets.
/// `today` anchors the activity window so callers (and tests) control time.
pub fn reduce(attempts: &[Attempt], today: NaiveDate) -> AnalyticsReport {
    let mut stats = AnalyticsStats {
        total_questions: 0,
        correct_answers: 0,
        incorrect_answers: 0,
        total_time_spent: 0,
        total_quizzes: attempts.len(),
        best_score: 0,
    };
    let mut classification = QuestionClassification::default();
    let mut timeline = Vec::with_capacity(attempts.len());
    let mut activity_counts: HashMap<NaiveDate, usize> = HashMap::new();
    let window_start = today - Duration::days(ACTIVITY_WINDOW_DAYS - 1);

    for attempt in attempts {
        stats.correct_answers += attempt.correct_answers;
        stats.incorrect_answers += attempt.incorrect_answers;
        stats.total_time_spent += attempt.total_time_spent;
        stats.total_questions += attempt.question_answers.len();

        let score = percentage(attempt.correct_answers, attempt.question_answers.len() as u32);
        stats.best_score = stats.best_score.max(score);

        let date = attempt.completed_at.date_naive();
        timeline.push(TimelinePoint {
            label: day_label(date),
            score,
            accuracy: percentage(
                attempt.correct_answers,
                attempt.correct_answers + attempt.incorrect_answers,
            ),
            date: attempt.completed_at,
        });

        if date >= window_start && date <= today {
            *activity_counts.entry(date).or_insert(0) += 1;
        }

        for answer in &attempt.question_answers {
            let tagged = TaggedQuestion {
                question_id: answer.question_id,
                notes: answer.notes.clone(),
            };
            match answer.tag {
                Some(QuestionTag::Ok) => classification.ok.push(tagged.clone()),
                Some(QuestionTag::Bad) => classification.bad.push(tagged.clone()),
                Some(QuestionTag::Important) => classification.important.push(tagged.clone()),
                None => {}
            }
            if answer.notes.is_some() {
                classification.common.push(tagged);
            }
        }
    }

    let activity = (0..ACTIVITY_WINDOW_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            ActivityDay {
                day: day_label(date),
                count: activity_counts.get(&date).copied().unwrap_or(0),
            }
        })
        .collect();

    AnalyticsReport {
        stats,
        question_classification: classification,
        timeline,
        activity,
    }
}

/// Rounded percentage; zero when the denominator is zero.
fn percentage(num: u32, den: u32) -> u32 {
    if den == 0 {
        return 0;
    }
    (f64::from(num) / f64::from(den) * 100.0).round() as u32
}

/// Short day label, e.g. "Mar 5".
fn day_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QuestionAnswer;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn attempt(correct: u32, incorrect: u32, days_ago: i64) -> Attempt {
        let completed_at =
            Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap() - Duration::days(days_ago);
        let answers = (0..correct + incorrect)
            .map(|i| QuestionAnswer::new(i as i64 + 1))
            .collect();
        Attempt {
            correct_answers: correct,
            incorrect_answers: incorrect,
            total_time_spent: 60,
            question_answers: answers,
            completed_at,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()
    }

    #[test]
    fn empty_attempts_produce_zeroed_report() {
        let report = reduce(&[], today());
        assert_eq!(report.stats.total_quizzes, 0);
        assert_eq!(report.stats.best_score, 0);
        assert!(report.timeline.is_empty());
        assert_eq!(report.activity.len(), ACTIVITY_WINDOW_DAYS as usize);
        assert!(report.activity.iter().all(|d| d.count == 0));
    }

    #[test]
    fn totals_accumulate_across_attempts() {
        let report = reduce(&[attempt(3, 2, 0), attempt(4, 1, 1)], today());
        assert_eq!(report.stats.total_quizzes, 2);
        assert_eq!(report.stats.correct_answers, 7);
        assert_eq!(report.stats.incorrect_answers, 3);
        assert_eq!(report.stats.total_questions, 10);
        assert_eq!(report.stats.total_time_spent, 120);
    }

    #[test]
    fn best_score_is_max_rounded_percentage() {
        // 3/5 = 60, 4/5 = 80, 2/3 = 67 (rounded)
        let report = reduce(&[attempt(3, 2, 0), attempt(4, 1, 1), attempt(2, 1, 2)], today());
        assert_eq!(report.stats.best_score, 80);

        let report = reduce(&[attempt(2, 1, 0)], today());
        assert_eq!(report.stats.best_score, 67);
    }

    #[test]
    fn best_score_with_no_questions_is_zero() {
        let mut empty = attempt(0, 0, 0);
        empty.question_answers.clear();
        let report = reduce(&[empty], today());
        assert_eq!(report.stats.best_score, 0);
    }

    #[test]
    fn timeline_has_one_point_per_attempt_in_order() {
        let report = reduce(&[attempt(1, 1, 3), attempt(2, 0, 0)], today());
        assert_eq!(report.timeline.len(), 2);
        assert_eq!(report.timeline[0].label, "Mar 17");
        assert_eq!(report.timeline[0].score, 50);
        assert_eq!(report.timeline[0].accuracy, 50);
        assert_eq!(report.timeline[1].label, "Mar 20");
        assert_eq!(report.timeline[1].score, 100);
    }

    #[test]
    fn activity_window_is_fourteen_days_ending_today() {
        let report = reduce(
            &[
                attempt(1, 0, 0),
                attempt(1, 0, 0),
                attempt(1, 0, 13),
                attempt(1, 0, 14), // outside the window
            ],
            today(),
        );
        assert_eq!(report.activity.len(), 14);
        assert_eq!(report.activity[0].day, "Mar 7");
        assert_eq!(report.activity[0].count, 1);
        assert_eq!(report.activity[13].day, "Mar 20");
        assert_eq!(report.activity[13].count, 2);
        let total: usize = report.activity.iter().map(|d| d.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn tags_and_notes_are_bucketed() {
        let mut a = attempt(2, 1, 0);
        a.question_answers[0].tag = Some(QuestionTag::Bad);
        a.question_answers[0].notes = Some("review pointers".into());
        a.question_answers[1].tag = Some(QuestionTag::Ok);
        a.question_answers[2].tag = Some(QuestionTag::Important);

        let report = reduce(&[a], today());
        let cls = &report.question_classification;
        assert_eq!(cls.bad.len(), 1);
        assert_eq!(cls.ok.len(), 1);
        assert_eq!(cls.important.len(), 1);
        assert_eq!(cls.common.len(), 1);
        assert_eq!(cls.bad[0].question_id, 1);
        assert_eq!(cls.common[0].notes.as_deref(), Some("review pointers"));
    }

    #[test]
    fn untagged_answer_with_note_still_lands_in_common() {
        let mut a = attempt(1, 0, 0);
        a.question_answers[0].notes = Some("tricky".into());
        let report = reduce(&[a], today());
        assert!(report.question_classification.ok.is_empty());
        assert_eq!(report.question_classification.common.len(), 1);
    }
}
