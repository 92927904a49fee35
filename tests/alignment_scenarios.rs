use nw_aligner::{
    align, AlignError, AlignmentMode, EndGaps, InvalidInput, ScoringConfig, Sequence, SequenceSlot,
};

fn seq(s: &str) -> Sequence {
    s.parse().expect("valid nucleotide sequence")
}

fn aligned(seq1: &str, seq2: &str, scoring: ScoringConfig) -> (String, String, f64) {
    let result = align(&seq(seq1), &seq(seq2), &scoring).expect("alignment");
    let (a, b) = result.aligned_strings();
    (a, b, result.score)
}

fn optimal() -> ScoringConfig {
    ScoringConfig::default().with_mode(AlignmentMode::Optimal)
}

const PAIRS: &[(&str, &str)] = &[
    ("AAAAAAAAGGTGGCCTTTTTTTT", "AAAAAAAAGGGGCCTTTTTTTT"),
    ("AAAATTT", "AAAAGGTTT"),
    ("GATTACA", "GCATGCT"),
    ("ACGTACGTAC", "ACGAC"),
    ("CCCGGG", "CCCAAAGGG"),
    ("TTTT", "AAAA"),
    ("A", "ACGT"),
    ("ACGTNACGT", "ACGTACGTT"),
];

fn configs() -> Vec<ScoringConfig> {
    vec![
        ScoringConfig::default(),
        ScoringConfig::default().with_match_score(10.0),
        ScoringConfig::default().with_gap_open_penalty(0.01),
        ScoringConfig::default()
            .with_gap_open_penalty(0.01)
            .with_gap_extend_penalty(0.001),
        ScoringConfig::default()
            .with_gap_open_penalty(0.1)
            .with_mismatch_score(-0.1),
        ScoringConfig::default()
            .with_match_score(2.0)
            .with_mismatch_score(-1.0)
            .with_gap_open_penalty(2.0)
            .with_gap_extend_penalty(1.0),
    ]
}

#[test]
fn single_interior_gap() {
    let (a, b, score) = aligned(
        "AAAAAAAAGGTGGCCTTTTTTTT",
        "AAAAAAAAGGGGCCTTTTTTTT",
        ScoringConfig::default(),
    );
    assert_eq!(a, "AAAAAAAAGGTGGCCTTTTTTTT");
    assert_eq!(b, "AAAAAAAAGG-GGCCTTTTTTTT");
    assert_eq!(score, 17.0);
}

#[test]
fn leading_gaps_with_default_scoring() {
    let (a, b, score) = aligned("AAAATTT", "AAAAGGTTT", ScoringConfig::default());
    assert_eq!(a, "--AAAATTT");
    assert_eq!(b, "AAAAGGTTT");
    assert_eq!(score, 1.0);
}

#[test]
fn high_match_reward_pulls_gap_inside() {
    let scoring = ScoringConfig::default().with_match_score(10.0);
    let (a, b, score) = aligned("AAAATTT", "AAAAGGTTT", scoring);
    assert_eq!(a, "AAAA--TTT");
    assert_eq!(b, "AAAAGGTTT");
    assert_eq!(score, 63.0);
}

#[test]
fn cheap_gap_opening_fragments_alignment() {
    let scoring = ScoringConfig::default().with_gap_open_penalty(0.01);
    let (a, b, score) = aligned("AAAATTT", "AAAAGGTTT", scoring);
    assert_eq!(a, "AAAA-T-TT-");
    assert_eq!(b, "AAAAG-GTTT");
    assert_eq!(score, 5.97);
}

#[test]
fn cheap_extension_keeps_gap_in_one_run() {
    let scoring = ScoringConfig::default()
        .with_gap_open_penalty(0.01)
        .with_gap_extend_penalty(0.001);
    let (a, b, score) = aligned("AAAATTT", "AAAAGGTTT", scoring);
    assert_eq!(a, "AAAA--TTT");
    assert_eq!(b, "AAAAGGTTT");
    assert_eq!(score, 6.989);
}

#[test]
fn mild_mismatch_with_cheap_gaps() {
    let scoring = ScoringConfig::default()
        .with_gap_open_penalty(0.1)
        .with_mismatch_score(-0.1);
    let (a, b, score) = aligned("AAAATTT", "AAAAGGTTT", scoring);
    assert_eq!(a, "-AAA-ATTT");
    assert_eq!(b, "AAAAGGTTT");
    assert_eq!(score, 5.8);
}

#[test]
fn penalized_end_gaps() {
    let penalized = ScoringConfig::default().with_end_gaps(EndGaps::Penalized);

    assert_eq!(
        aligned("AAAATTT", "AAAAGGTTT", penalized),
        ("AAAA--TTT".into(), "AAAAGGTTT".into(), 0.0)
    );
    assert_eq!(
        aligned("ACGTACGTAC", "ACGAC", penalized),
        ("ACGTACGTAC".into(), "----ACG-AC".into(), -11.0)
    );
    assert_eq!(
        aligned("CCCGGG", "CCCAAAGGG", penalized),
        ("CCC---GGG".into(), "CCCAAAGGG".into(), -3.0)
    );
    assert_eq!(
        aligned(
            "CCCGGG",
            "CCCAAAGGG",
            penalized
                .with_gap_open_penalty(3.0)
                .with_gap_extend_penalty(0.5)
        ),
        ("CCC---GGG".into(), "CCCAAAGGG".into(), 2.0)
    );
}

#[test]
fn optimal_mode_finds_the_best_gap_placement() {
    let penalized = optimal().with_end_gaps(EndGaps::Penalized);
    assert_eq!(
        aligned("ACGTACGTAC", "ACGAC", penalized),
        ("ACGTACGTAC".into(), "ACG-----AC".into(), -8.0)
    );

    let (a, b, score) = aligned(
        "AAAATTT",
        "AAAAGGTTT",
        optimal().with_gap_open_penalty(0.01),
    );
    assert_eq!(a, "-AAA-A-TTT");
    assert_eq!(b, "AAAAG-GTTT");
    assert_eq!(score, 5.97);
}

#[test]
fn modes_agree_on_the_fixture_pairs() {
    for (seq1, seq2) in [
        ("AAAAAAAAGGTGGCCTTTTTTTT", "AAAAAAAAGGGGCCTTTTTTTT"),
        ("AAAATTT", "AAAAGGTTT"),
    ] {
        assert_eq!(
            aligned(seq1, seq2, ScoringConfig::default()),
            aligned(seq1, seq2, optimal())
        );
    }
}

#[test]
fn disjoint_sequences_with_free_end_gaps() {
    let (a, b, score) = aligned("GATTACA", "GCATGCT", ScoringConfig::default());
    assert_eq!(a, "----GATTACA");
    assert_eq!(b, "GCATGCT----");
    assert_eq!(score, 0.0);

    let scoring = ScoringConfig::default()
        .with_match_score(2.0)
        .with_mismatch_score(-1.0)
        .with_gap_open_penalty(2.0)
        .with_gap_extend_penalty(1.0);
    let (a, b, score) = aligned("GATTACA", "GCATGCT", scoring);
    assert_eq!(a, "G-AT--TACA");
    assert_eq!(b, "GCATGCT---");
    assert_eq!(score, 3.0);
}

#[test]
fn symmetric_score_under_swap() {
    for scoring in configs() {
        for end_gaps in [EndGaps::Free, EndGaps::Penalized] {
            let scoring = scoring.with_mode(AlignmentMode::Optimal).with_end_gaps(end_gaps);
            for (seq1, seq2) in PAIRS {
                let forward = align(&seq(seq1), &seq(seq2), &scoring).unwrap();
                let reverse = align(&seq(seq2), &seq(seq1), &scoring).unwrap();
                assert_eq!(forward.score, reverse.score, "{seq1} / {seq2} {scoring:?}");
            }
        }
    }
}

#[test]
fn greedy_fill_can_differ_under_swap() {
    let scoring = ScoringConfig::default().with_gap_open_penalty(0.01);
    let (a, b, score) = aligned("AAAAGGTTT", "AAAATTT", scoring);
    assert_eq!(a, "AAAAGGTTT");
    assert_eq!(b, "AAAA--TTT");
    assert_eq!(score, 4.99);
}

fn padded_score(seq1: &str, seq2: &str, scoring: &ScoringConfig, leading: bool) -> f64 {
    let pad = |short: &str, long: &str| {
        let gaps = "-".repeat(long.len() - short.len());
        if leading {
            format!("{gaps}{short}")
        } else {
            format!("{short}{gaps}")
        }
    };
    let (a, b) = if seq1.len() < seq2.len() {
        (pad(seq1, seq2), seq2.to_string())
    } else {
        (seq1.to_string(), pad(seq2, seq1))
    };
    scoring.score_alignment(a.as_bytes(), b.as_bytes()).unwrap()
}

#[test]
fn never_worse_than_padding_the_shorter_sequence() {
    for scoring in configs() {
        for end_gaps in [EndGaps::Free, EndGaps::Penalized] {
            let scoring = scoring.with_mode(AlignmentMode::Optimal).with_end_gaps(end_gaps);
            for (seq1, seq2) in PAIRS {
                let result = align(&seq(seq1), &seq(seq2), &scoring).unwrap();
                for leading in [true, false] {
                    let trivial = padded_score(seq1, seq2, &scoring, leading);
                    assert!(
                        result.score >= trivial,
                        "{seq1} / {seq2}: {} < {trivial}",
                        result.score
                    );
                }
            }
        }
    }
}

#[test]
fn reported_score_matches_column_rescoring() {
    for scoring in configs() {
        for mode in [AlignmentMode::Greedy, AlignmentMode::Optimal] {
            for end_gaps in [EndGaps::Free, EndGaps::Penalized] {
                let scoring = scoring.with_mode(mode).with_end_gaps(end_gaps);
                for (seq1, seq2) in PAIRS {
                    let result = align(&seq(seq1), &seq(seq2), &scoring).unwrap();
                    let rescored = scoring
                        .score_alignment(&result.aligned_seq1, &result.aligned_seq2)
                        .unwrap();
                    assert_eq!(result.score, rescored, "{seq1} / {seq2} {scoring:?}");
                }
            }
        }
    }
}

#[test]
fn gapped_rows_spell_the_inputs() {
    for scoring in configs() {
        for (seq1, seq2) in PAIRS {
            let result = align(&seq(seq1), &seq(seq2), &scoring).unwrap();
            let (a, b) = result.aligned_strings();
            assert_eq!(a.len(), b.len());
            assert!(a.len() >= seq1.len().max(seq2.len()));
            assert_eq!(a.replace('-', ""), *seq1);
            assert_eq!(b.replace('-', ""), *seq2);
            assert!(a.bytes().zip(b.bytes()).all(|(x, y)| x != b'-' || y != b'-'));
        }
    }
}

#[test]
fn repeated_calls_are_identical() {
    let scoring = ScoringConfig::default().with_gap_open_penalty(0.01);
    let first = align(&seq("AAAATTT"), &seq("AAAAGGTTT"), &scoring).unwrap();
    for _ in 0..10 {
        assert_eq!(align(&seq("AAAATTT"), &seq("AAAAGGTTT"), &scoring).unwrap(), first);
    }
}

#[test]
fn self_alignment_has_no_gaps() {
    for scoring in [ScoringConfig::default(), optimal().with_end_gaps(EndGaps::Penalized)] {
        for s in ["A", "ACGT", "GATTACA", "NNRYACGTSW", "AAAAAAAAGGTGGCCTTTTTTTT"] {
            let result = align(&seq(s), &seq(s), &scoring).unwrap();
            assert_eq!(result.aligned_seq1, s.as_bytes());
            assert_eq!(result.aligned_seq2, s.as_bytes());
            assert_eq!(result.score, s.len() as f64 * scoring.match_score);
            assert_eq!(result.stats().gaps, 0);
        }
    }
}

#[test]
fn empty_input_is_rejected() {
    let err = align(&seq(""), &seq("ACGT"), &ScoringConfig::default()).unwrap_err();
    assert_eq!(
        err,
        AlignError::InvalidInput(InvalidInput::EmptySequence(SequenceSlot::First))
    );
    let err = align(&seq("ACGT"), &seq(""), &ScoringConfig::default()).unwrap_err();
    assert_eq!(
        err,
        AlignError::InvalidInput(InvalidInput::EmptySequence(SequenceSlot::Second))
    );
}
