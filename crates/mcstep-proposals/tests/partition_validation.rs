
use fixtures::{AdaptiveWalk, UniformWalk};
use mcstep_core::{RandomSource, SamplerError};
use mcstep_proposals::{CompositeProposal, Proposal};

#[test]
fn disjoint_children_construct_in_encounter_order() {
    let children: Vec<Box<dyn Proposal>> = vec![
        Box::new(UniformWalk::new(&["x"], 1.0)),
        Box::new(AdaptiveWalk::new(&["y", "z"], 0.5)),
    ];
    let composite = CompositeProposal::new(children, Some(RandomSource::from_seed(1))).unwrap();
    assert_eq!(composite.parameters(), &["x", "y", "z"]);
    assert_eq!(composite.num_children(), 2);
}

#[test]
fn symmetric_flag_is_the_and_over_children() {
    let children: Vec<Box<dyn Proposal>> = vec![
        Box::new(UniformWalk::new(&["x"], 1.0)),
        Box::new(AdaptiveWalk::new(&["y", "z"], 0.5)),
    ];
    let composite = CompositeProposal::new(children, Some(RandomSource::from_seed(1))).unwrap();
    assert!(!composite.symmetric());

    let all_symmetric: Vec<Box<dyn Proposal>> = vec![
        Box::new(UniformWalk::new(&["a"], 1.0)),
        Box::new(UniformWalk::new(&["b"], 2.0)),
    ];
    let composite =
        CompositeProposal::new(all_symmetric, Some(RandomSource::from_seed(1))).unwrap();
    assert!(composite.symmetric());
}

#[test]
fn duplicate_parameter_fails_naming_the_offender() {
    let children: Vec<Box<dyn Proposal>> = vec![
        Box::new(UniformWalk::new(&["x"], 1.0)),
        Box::new(UniformWalk::new(&["x"], 2.0)),
    ];
    let err = CompositeProposal::new(children, Some(RandomSource::from_seed(1))).unwrap_err();
    match err {
        SamplerError::Configuration(info) => {
            assert_eq!(info.code, "duplicate-parameter");
            assert_eq!(info.context.get("parameters").map(String::as_str), Some("x"));
        }
        other => panic!("expected configuration error, got {other}"),
    }
}

#[test]
fn every_repeated_parameter_is_reported() {
    let children: Vec<Box<dyn Proposal>> = vec![
        Box::new(UniformWalk::new(&["x", "y"], 1.0)),
        Box::new(AdaptiveWalk::new(&["y", "z"], 0.5)),
        Box::new(UniformWalk::new(&["z", "x"], 2.0)),
    ];
    let err = CompositeProposal::new(children, Some(RandomSource::from_seed(1))).unwrap_err();
    let info = err.info();
    let reported = info.context.get("parameters").unwrap();
    assert_eq!(reported, "x, y, z");
}

#[test]
fn childless_proposal_is_rejected() {
    let children: Vec<Box<dyn Proposal>> = vec![
        Box::new(UniformWalk::new(&[], 1.0)),
        Box::new(UniformWalk::new(&["x"], 1.0)),
    ];
    let err = CompositeProposal::new(children, Some(RandomSource::from_seed(1))).unwrap_err();
    assert!(matches!(err, SamplerError::Configuration(_)));
}

#[test]
fn composite_renders_a_debug_summary() {
    let children: Vec<Box<dyn Proposal>> = vec![
        Box::new(UniformWalk::new(&["x"], 1.0)),
        Box::new(AdaptiveWalk::new(&["y", "z"], 0.5)),
    ];
    let composite = CompositeProposal::new(children, Some(RandomSource::from_seed(1))).unwrap();
    let rendered = format!("{composite:?}");
    assert!(rendered.contains("CompositeProposal"));
    assert!(rendered.contains("\"x\""));
    assert!(rendered.contains("symmetric: false"));
    assert!(rendered.contains("num_children: 2"));
}

#[test]
fn empty_composite_is_vacuously_valid() {
    let composite =
        CompositeProposal::new(Vec::new(), Some(RandomSource::from_seed(1))).unwrap();
    assert!(composite.parameters().is_empty());
    assert!(composite.symmetric());
}
