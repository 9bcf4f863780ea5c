
use fixtures::UniformWalk;
use mcstep_core::{RandomSource, SamplerError};
use mcstep_proposals::{CompositeProposal, Proposal};
use proptest::prelude::*;

proptest! {
    #[test]
    fn disjoint_partitions_always_construct(
        names in prop::collection::btree_set("[a-z]{1,4}", 1..10),
        chunk in 1usize..4,
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let children: Vec<Box<dyn Proposal>> = names
            .chunks(chunk)
            .map(|group| {
                let refs: Vec<&str> = group.iter().map(String::as_str).collect();
                Box::new(UniformWalk::new(&refs, 1.0)) as Box<dyn Proposal>
            })
            .collect();
        let composite =
            CompositeProposal::new(children, Some(RandomSource::from_seed(0))).unwrap();
        // the flattened union preserves encounter order, without duplicates
        prop_assert_eq!(composite.parameters(), names.as_slice());
        prop_assert!(composite.symmetric());
    }

    #[test]
    fn any_duplicate_always_fails_configuration(
        names in prop::collection::btree_set("[a-z]{1,4}", 2..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let dup = names[pick.index(names.len())].clone();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let children: Vec<Box<dyn Proposal>> = vec![
            Box::new(UniformWalk::new(&refs, 1.0)),
            Box::new(UniformWalk::new(&[dup.as_str()], 1.0)),
        ];
        let err =
            CompositeProposal::new(children, Some(RandomSource::from_seed(0))).unwrap_err();
        prop_assert!(matches!(err, SamplerError::Configuration(_)));
        let reported = err.info().context.get("parameters").unwrap();
        prop_assert_eq!(reported, &dup);
    }
}
