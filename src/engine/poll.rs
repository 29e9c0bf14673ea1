//! Poll lifecycle rules and read-time result aggregation.
//!
//! A poll is created inactive, then toggled between active and inactive;
//! ending the
//! presentation freezes every poll at its current flag. Results are a pure
//! function of the response list and are recomputed on every read; they
//! are never stored, so they cannot drift out of sync with the responses.

use std::collections::HashSet;

use crate::engine::types::{
    Answer, AnswerCount, LivePoll, LivePresentation, PollResults, PollType,
    PresentationAnalytics, WordWeight,
};
use crate::errors::EngineError;

/// Round to two decimals for display figures (rates, averages).
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Two-decimal answer percentages that sum to exactly 100.00. Naive
/// per-entry rounding can drift (a six-way even split rounds to 6 x 16.67
/// = 100.02), so each share is floored to hundredths and the leftover
/// hundredths go to the largest remainders, ties broken by tally order.
fn apportion_percentages(answers: &mut [AnswerCount], total: usize) {
    let total = total as u64;
    let mut hundredths: Vec<u64> = Vec::with_capacity(answers.len());
    let mut remainders: Vec<(usize, u64)> = Vec::with_capacity(answers.len());
    for (i, entry) in answers.iter().enumerate() {
        let scaled = entry.count as u64 * 10_000;
        hundredths.push(scaled / total);
        remainders.push((i, scaled % total));
    }
    let mut leftover = 10_000 - hundredths.iter().sum::<u64>();
    remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (i, _) in remainders {
        if leftover == 0 {
            break;
        }
        hundredths[i] += 1;
        leftover -= 1;
    }
    for (entry, h) in answers.iter_mut().zip(hundredths) {
        entry.percentage = h as f64 / 100.0;
    }
}

/// Activation guard: a multiple-choice poll must have options before it can
/// start accepting responses. Options may legitimately be empty at creation.
pub fn ensure_can_activate(poll: &LivePoll) -> Result<(), EngineError> {
    if poll.poll_type == PollType::MultipleChoice && poll.options.is_empty() {
        return Err(EngineError::Validation(format!(
            "poll {} is multiple_choice but has no options",
            poll.id
        )));
    }
    Ok(())
}

/// Submission guard: the answer shape must match the poll type.
/// Duplicate submissions from one user are allowed by design; activity is
/// checked by the store before any mutation.
pub fn ensure_answer_shape(poll: &LivePoll, answer: &Answer) -> Result<(), EngineError> {
    let ok = match (poll.poll_type, answer) {
        (PollType::Rating, Answer::Number(_)) => true,
        (PollType::Rating, _) => false,
        (_, Answer::Number(_)) => false,
        (PollType::MultipleChoice | PollType::WordCloud, Answer::Multi(_)) => true,
        (_, Answer::Multi(_)) => false,
        (_, Answer::Text(_)) => true,
    };
    if ok {
        Ok(())
    } else {
        Err(EngineError::Validation(format!(
            "answer shape does not match {:?} poll {}",
            poll.poll_type, poll.id
        )))
    }
}

/// Compute the derived results for one poll within its presentation.
pub fn poll_results(presentation: &LivePresentation, poll: &LivePoll) -> PollResults {
    let total = poll.responses.len();

    let responders: HashSet<&str> = poll
        .responses
        .iter()
        .map(|r| r.user_id.as_str())
        .collect();
    let present = presentation
        .participants
        .iter()
        .filter(|p| p.left_at.is_none())
        .count();
    let participation_rate = if present == 0 {
        0.0
    } else {
        round2(responders.len() as f64 / present as f64 * 100.0)
    };

    // Tally per distinct answer key, preserving first-seen order.
    let mut answers: Vec<AnswerCount> = Vec::new();
    for response in &poll.responses {
        let key = response.answer.key();
        match answers.iter_mut().find(|a| a.answer == key) {
            Some(entry) => entry.count += 1,
            None => answers.push(AnswerCount {
                answer: key,
                count: 1,
                percentage: 0.0,
            }),
        }
    }
    if total > 0 {
        apportion_percentages(&mut answers, total);
    }

    let average_rating = match poll.poll_type {
        PollType::Rating => {
            let numbers: Vec<f64> = poll
                .responses
                .iter()
                .filter_map(|r| match r.answer {
                    Answer::Number(n) => Some(n),
                    _ => None,
                })
                .collect();
            if numbers.is_empty() {
                None
            } else {
                Some(round2(numbers.iter().sum::<f64>() / numbers.len() as f64))
            }
        }
        _ => None,
    };

    // Open-ended answers surface verbatim, most recent first; any display
    // cap is the caller's concern.
    let open_responses = match poll.poll_type {
        PollType::OpenEnded => Some(
            poll.responses
                .iter()
                .rev()
                .filter_map(|r| match &r.answer {
                    Answer::Text(s) => Some(s.clone()),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    };

    let word_cloud = match poll.poll_type {
        PollType::WordCloud => Some(word_weights(poll)),
        _ => None,
    };

    let times: Vec<u64> = poll
        .responses
        .iter()
        .filter_map(|r| r.response_time_ms)
        .collect();
    let average_response_ms = if times.is_empty() {
        None
    } else {
        Some(round2(times.iter().sum::<u64>() as f64 / times.len() as f64))
    };

    PollResults {
        poll_id: poll.id.clone(),
        total_responses: total,
        participation_rate,
        answers,
        average_rating,
        open_responses,
        word_cloud,
        average_response_ms,
    }
}

/// Per-token frequency across all word-cloud answers, heaviest first,
/// ties broken alphabetically for determinism.
fn word_weights(poll: &LivePoll) -> Vec<WordWeight> {
    let mut weights: Vec<WordWeight> = Vec::new();
    let mut bump = |token: &str| {
        let word = token.trim().to_lowercase();
        if word.is_empty() {
            return;
        }
        match weights.iter_mut().find(|w| w.word == word) {
            Some(entry) => entry.weight += 1,
            None => weights.push(WordWeight { word, weight: 1 }),
        }
    };
    for response in &poll.responses {
        match &response.answer {
            Answer::Text(s) => {
                for token in s.split_whitespace() {
                    bump(token);
                }
            }
            Answer::Multi(items) => {
                for item in items {
                    bump(item);
                }
            }
            Answer::Number(_) => {}
        }
    }
    weights.sort_by(|a, b| b.weight.cmp(&a.weight).then(a.word.cmp(&b.word)));
    weights
}

/// Derived presentation analytics: attendance, poll volume, and the mean
/// of per-poll participation rates.
pub fn analytics(presentation: &LivePresentation) -> PresentationAnalytics {
    let active_participants = presentation
        .participants
        .iter()
        .filter(|p| p.left_at.is_none())
        .count();
    let total_responses = presentation
        .polls
        .iter()
        .map(|p| p.responses.len())
        .sum();
    let average_poll_participation = if presentation.polls.is_empty() {
        0.0
    } else {
        let sum: f64 = presentation
            .polls
            .iter()
            .map(|p| poll_results(presentation, p).participation_rate)
            .sum();
        round2(sum / presentation.polls.len() as f64)
    };
    let duration_secs = match (presentation.started_at, presentation.ended_at) {
        (Some(start), Some(end)) => Some((end - start).num_seconds()),
        _ => None,
    };

    PresentationAnalytics {
        total_participants: presentation.participants.len(),
        active_participants,
        poll_count: presentation.polls.len(),
        total_responses,
        average_poll_participation,
        duration_secs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{Participant, PollResponse, PresentationStatus};
    use chrono::Utc;

    fn poll(poll_type: PollType, options: &[&str]) -> LivePoll {
        LivePoll {
            id: "poll_test".into(),
            question: "Q?".into(),
            poll_type,
            options: options.iter().map(|s| s.to_string()).collect(),
            is_active: true,
            time_limit_secs: None,
            created_at: Utc::now(),
            responses: Vec::new(),
        }
    }

    fn respond(poll: &mut LivePoll, user: &str, answer: Answer) {
        poll.responses.push(PollResponse {
            id: format!("resp_{}", poll.responses.len()),
            poll_id: poll.id.clone(),
            user_id: user.into(),
            answer,
            submitted_at: Utc::now(),
            response_time_ms: None,
        });
    }

    fn presentation_with(poll: LivePoll, participants: &[&str]) -> LivePresentation {
        LivePresentation {
            id: "prs_test".into(),
            title: "T".into(),
            description: None,
            trainer_id: "trainer".into(),
            group_id: None,
            status: PresentationStatus::Live,
            current_slide: 1,
            total_slides: 5,
            started_at: Some(Utc::now()),
            ended_at: None,
            participants: participants
                .iter()
                .map(|u| Participant {
                    user_id: u.to_string(),
                    joined_at: Utc::now(),
                    left_at: None,
                })
                .collect(),
            polls: vec![poll],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn multiple_choice_needs_options_to_activate() {
        let empty = poll(PollType::MultipleChoice, &[]);
        assert!(matches!(
            ensure_can_activate(&empty),
            Err(EngineError::Validation(_))
        ));

        let filled = poll(PollType::MultipleChoice, &["A", "B"]);
        assert!(ensure_can_activate(&filled).is_ok());

        // Other poll types never need options.
        assert!(ensure_can_activate(&poll(PollType::OpenEnded, &[])).is_ok());
    }

    #[test]
    fn answer_shape_is_validated_per_poll_type() {
        let rating = poll(PollType::Rating, &[]);
        assert!(ensure_answer_shape(&rating, &Answer::Number(4.0)).is_ok());
        assert!(ensure_answer_shape(&rating, &Answer::Text("4".into())).is_err());

        let tf = poll(PollType::TrueFalse, &[]);
        assert!(ensure_answer_shape(&tf, &Answer::Text("Yes".into())).is_ok());
        assert!(ensure_answer_shape(&tf, &Answer::Number(1.0)).is_err());
        assert!(ensure_answer_shape(&tf, &Answer::Multi(vec!["a".into()])).is_err());

        let wc = poll(PollType::WordCloud, &[]);
        assert!(ensure_answer_shape(&wc, &Answer::Multi(vec!["a".into()])).is_ok());
    }

    #[test]
    fn tally_counts_and_percentages() {
        let mut p = poll(PollType::TrueFalse, &[]);
        respond(&mut p, "u1", Answer::Text("Yes".into()));
        respond(&mut p, "u2", Answer::Text("Yes".into()));
        respond(&mut p, "u3", Answer::Text("No".into()));
        let pres = presentation_with(p, &["u1", "u2", "u3"]);

        let results = poll_results(&pres, &pres.polls[0]);
        assert_eq!(results.total_responses, 3);
        assert_eq!(results.answers.len(), 2);
        assert_eq!(results.answers[0].answer, "Yes");
        assert_eq!(results.answers[0].count, 2);
        assert_eq!(results.answers[0].percentage, 66.67);
        assert_eq!(results.answers[1].answer, "No");
        assert_eq!(results.answers[1].percentage, 33.33);
        assert_eq!(results.participation_rate, 100.0);
    }

    #[test]
    fn percentages_sum_to_one_hundred_within_tolerance() {
        let mut p = poll(PollType::MultipleChoice, &["A", "B", "C"]);
        respond(&mut p, "u1", Answer::Text("A".into()));
        respond(&mut p, "u2", Answer::Text("B".into()));
        respond(&mut p, "u3", Answer::Text("C".into()));
        respond(&mut p, "u4", Answer::Text("C".into()));
        respond(&mut p, "u5", Answer::Text("A".into()));
        respond(&mut p, "u6", Answer::Text("A".into()));
        respond(&mut p, "u7", Answer::Text("B".into()));
        let pres = presentation_with(p, &["u1"]);

        let results = poll_results(&pres, &pres.polls[0]);
        let sum: f64 = results.answers.iter().map(|a| a.percentage).sum();
        assert!((99.99..=100.01).contains(&sum), "sum was {}", sum);
    }

    #[test]
    fn even_split_apportions_to_exactly_one_hundred() {
        // Six-way even split: naive rounding gives 6 x 16.67 = 100.02.
        let mut p = poll(PollType::MultipleChoice, &["A", "B", "C", "D", "E", "F"]);
        for (i, opt) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
            respond(&mut p, &format!("u{i}"), Answer::Text(opt.to_string()));
        }
        let pres = presentation_with(p, &["u1"]);

        let results = poll_results(&pres, &pres.polls[0]);
        assert!(results
            .answers
            .iter()
            .all(|a| a.percentage == 16.66 || a.percentage == 16.67));
        let bumped = results
            .answers
            .iter()
            .filter(|a| a.percentage == 16.67)
            .count();
        assert_eq!(bumped, 4);
        let sum: f64 = results.answers.iter().map(|a| a.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9, "sum was {}", sum);
    }

    #[test]
    fn rating_polls_average_numeric_answers() {
        let mut p = poll(PollType::Rating, &[]);
        respond(&mut p, "u1", Answer::Number(3.0));
        respond(&mut p, "u2", Answer::Number(5.0));
        respond(&mut p, "u3", Answer::Number(4.0));
        let pres = presentation_with(p, &["u1", "u2", "u3"]);

        let results = poll_results(&pres, &pres.polls[0]);
        assert_eq!(results.average_rating, Some(4.0));
        assert!(results.open_responses.is_none());
        assert!(results.word_cloud.is_none());
    }

    #[test]
    fn open_ended_surfaces_most_recent_first() {
        let mut p = poll(PollType::OpenEnded, &[]);
        respond(&mut p, "u1", Answer::Text("first".into()));
        respond(&mut p, "u2", Answer::Text("second".into()));
        let pres = presentation_with(p, &["u1", "u2"]);

        let results = poll_results(&pres, &pres.polls[0]);
        let open = results.open_responses.unwrap();
        assert_eq!(open, vec!["second".to_string(), "first".to_string()]);
    }

    #[test]
    fn word_cloud_accumulates_token_frequency() {
        let mut p = poll(PollType::WordCloud, &[]);
        respond(&mut p, "u1", Answer::Text("Rust rust speed".into()));
        respond(&mut p, "u2", Answer::Multi(vec!["rust".into(), "safety".into()]));
        let pres = presentation_with(p, &["u1", "u2"]);

        let results = poll_results(&pres, &pres.polls[0]);
        let cloud = results.word_cloud.unwrap();
        assert_eq!(cloud[0], WordWeight { word: "rust".into(), weight: 3 });
        // Ties are alphabetical.
        assert_eq!(cloud[1].word, "safety");
        assert_eq!(cloud[2].word, "speed");
    }

    #[test]
    fn participation_counts_distinct_responders() {
        let mut p = poll(PollType::TrueFalse, &[]);
        respond(&mut p, "u1", Answer::Text("Yes".into()));
        respond(&mut p, "u1", Answer::Text("No".into()));
        let pres = presentation_with(p, &["u1", "u2", "u3", "u4"]);

        let results = poll_results(&pres, &pres.polls[0]);
        assert_eq!(results.total_responses, 2);
        assert_eq!(results.participation_rate, 25.0);
    }

    #[test]
    fn analytics_rolls_up_polls_and_attendance() {
        let mut p = poll(PollType::TrueFalse, &[]);
        respond(&mut p, "u1", Answer::Text("Yes".into()));
        let mut pres = presentation_with(p, &["u1", "u2"]);
        pres.participants[1].left_at = Some(Utc::now());

        let stats = analytics(&pres);
        assert_eq!(stats.total_participants, 2);
        assert_eq!(stats.active_participants, 1);
        assert_eq!(stats.poll_count, 1);
        assert_eq!(stats.total_responses, 1);
        assert_eq!(stats.average_poll_participation, 100.0);
        assert!(stats.duration_secs.is_none());
    }
}
