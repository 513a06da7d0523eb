use super::common::*;
use crate::assessments::inventory::{
    percentile_of, score_responses, QuestionBank, ResponseSet, ScoringError,
};

#[test]
fn raw_scores_stay_on_scale_for_valid_responses() {
    for bank in [
        QuestionBank::bfi2().expect("builtin bank loads"),
        QuestionBank::hexaco().expect("builtin bank loads"),
    ] {
        for responses in [
            uniform_responses(&bank, 1),
            uniform_responses(&bank, 5),
            patterned_responses(&bank),
        ] {
            let report = score_responses(&bank, &responses).expect("complete set scores");
            for domain in &report.domains {
                assert!(
                    (1.0..=5.0).contains(&domain.raw_score),
                    "{} raw score {} off scale",
                    domain.domain,
                    domain.raw_score
                );
                for facet in &domain.facets {
                    assert!((1.0..=5.0).contains(&facet.raw_score));
                }
            }
        }
    }
}

#[test]
fn reverse_keyed_items_score_as_their_reflection() {
    let bank = single_domain_bank(true);
    for value in 1..=5u8 {
        let responses = uniform_responses(&bank, value);
        let report = score_responses(&bank, &responses).expect("scores");
        let expected = f64::from(6 - value);
        let domain = &report.domains[0];
        assert_eq!(domain.raw_score, expected);
        for facet in &domain.facets {
            assert_eq!(facet.raw_score, expected);
        }
    }
}

#[test]
fn percentile_hits_the_anchor_points() {
    assert_eq!(percentile_of(1.0), 0);
    assert_eq!(percentile_of(3.0), 50);
    assert_eq!(percentile_of(4.0), 75);
    assert_eq!(percentile_of(5.0), 100);
}

#[test]
fn percentile_is_monotone_over_the_scale() {
    let mut previous = percentile_of(1.0);
    let mut raw = 1.0;
    while raw <= 5.0 {
        let current = percentile_of(raw);
        assert!(current >= previous, "percentile decreased at raw {raw}");
        previous = current;
        raw += 0.01;
    }
}

#[test]
fn scoring_is_idempotent() {
    let bank = QuestionBank::bfi2().expect("builtin bank loads");
    let responses = patterned_responses(&bank);

    let first = score_responses(&bank, &responses).expect("scores");
    let second = score_responses(&bank, &responses).expect("scores");

    assert_eq!(first, second);
}

#[test]
fn domain_mean_matches_mean_of_facet_means() {
    for bank in [
        QuestionBank::bfi2().expect("builtin bank loads"),
        QuestionBank::hexaco().expect("builtin bank loads"),
    ] {
        let responses = patterned_responses(&bank);
        let report = score_responses(&bank, &responses).expect("scores");

        for domain in &report.domains {
            let facet_mean = domain
                .facets
                .iter()
                .map(|facet| facet.raw_score)
                .sum::<f64>()
                / domain.facets.len() as f64;
            assert!(
                (facet_mean - domain.raw_score).abs() < 1e-9,
                "{}: facet mean {} != domain mean {}",
                domain.domain,
                facet_mean,
                domain.raw_score
            );
        }
    }
}

#[test]
fn bfi2_uniform_fours_score_high_extraversion() {
    let bank = mini_bfi2_bank();
    let responses = uniform_responses(&bank, 4);

    let report = score_responses(&bank, &responses).expect("scores");
    let extraversion = report.domain("Extraversion").expect("domain present");

    assert_eq!(extraversion.raw_score, 4.0);
    assert_eq!(extraversion.percentile, 75);
    assert_eq!(extraversion.level, "high");
    assert_eq!(
        extraversion.description,
        "You are outgoing, energetic, and enjoy being around people."
    );
}

#[test]
fn hexaco_reverse_keyed_twos_score_high_honesty_humility() {
    let bank = mini_hexaco_bank();
    let mut responses = ResponseSet::new();
    for item in bank.questions() {
        // The Honesty-Humility items are reverse-keyed; a raw 2 contributes 4.
        let value = if item.domain == "Honesty-Humility" { 2 } else { 3 };
        responses.record(item.item_number, likert(value));
    }

    let report = score_responses(&bank, &responses).expect("scores");
    let honesty = report.domain("Honesty-Humility").expect("domain present");

    assert_eq!(honesty.raw_score, 4.0);
    assert_eq!(honesty.level, "high");
    for facet in &honesty.facets {
        assert_eq!(facet.raw_score, 4.0);
    }
}

#[test]
fn missing_response_aborts_the_pass() {
    let bank = single_domain_bank(false);
    let mut responses = ResponseSet::new();
    responses.record(1, likert(4));
    responses.record(2, likert(4));

    match score_responses(&bank, &responses) {
        Err(ScoringError::MissingResponse(3)) => {}
        other => panic!("expected missing response error, got {other:?}"),
    }
}

#[test]
fn stray_response_aborts_the_pass() {
    let bank = single_domain_bank(false);
    let mut responses = uniform_responses(&bank, 3);
    responses.record(99, likert(3));

    match score_responses(&bank, &responses) {
        Err(ScoringError::UnknownItem(99)) => {}
        other => panic!("expected unknown item error, got {other:?}"),
    }
}

#[test]
fn chart_vector_follows_canonical_domain_order() {
    let bank = QuestionBank::bfi2().expect("builtin bank loads");
    let responses = patterned_responses(&bank);
    let report = score_responses(&bank, &responses).expect("scores");

    let vector = report.chart_vector();
    assert_eq!(vector.len(), report.domains.len());
    for (value, domain) in vector.iter().zip(&report.domains) {
        assert_eq!(*value, domain.raw_score);
    }

    let names: Vec<&str> = report
        .domains
        .iter()
        .map(|domain| domain.domain.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "Extraversion",
            "Agreeableness",
            "Conscientiousness",
            "Negative Emotionality",
            "Open-Mindedness"
        ]
    );
}
