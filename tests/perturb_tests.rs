use tunespace::prelude::*;
use tunespace::SampleSpace::{Raw, Scaled};

fn catalog() -> Vec<Param> {
    vec![
        Param::int(),
        Param::categorical(),
        Param::boolean(),
        Param::categorical(),
        Param::categorical(),
        Param::float(),
    ]
}

fn helper() -> ConstraintHelper<IdentityScaler, OneHotEncoding> {
    let params = catalog();
    let encoding = OneHotEncoding::new(&params, vec![3, 2, 4]).unwrap();
    ConstraintHelper::new(params, IdentityScaler::new(12), encoding).unwrap()
}

fn hot_indices(helper: &ConstraintHelper<impl Scaler, OneHotEncoding>, raw: &[f64]) -> Vec<usize> {
    let enc = helper.encoding();
    enc.start_indices()
        .iter()
        .zip(enc.n_values())
        .map(|(&s, &n)| {
            let block = &raw[s..s + n];
            assert_eq!(block.iter().filter(|&&v| v == 1.0).count(), 1);
            assert_eq!(block.iter().filter(|&&v| v == 0.0).count(), n - 1);
            block.iter().position(|&v| v == 1.0).unwrap()
        })
        .collect()
}

// int, cat3, bool, cat2, cat4, float
const VALID: [f64; 12] = [
    5.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.75,
];

#[test]
fn test_at_least_one_group_changes() {
    let helper = helper();
    let mut rng = fastrand::Rng::with_seed(31);
    let before = hot_indices(&helper, &VALID);

    for _ in 0..500 {
        let out = helper
            .randomize_categorical(&VALID, Raw, Raw, &mut rng)
            .unwrap();
        let after = hot_indices(&helper, &out);
        assert!(before.iter().zip(&after).any(|(a, b)| a != b));
    }
}

#[test]
fn test_zero_flip_probability_changes_exactly_one_group() {
    let params = catalog();
    let encoding = OneHotEncoding::new(&params, vec![3, 2, 4]).unwrap();
    let helper = ConstraintHelper::builder(params, IdentityScaler::new(12), encoding)
        .flip_probability(0.0)
        .build()
        .unwrap();
    let mut rng = fastrand::Rng::with_seed(33);
    let before = hot_indices(&helper, &VALID);

    for _ in 0..1000 {
        let out = helper
            .randomize_categorical(&VALID, Raw, Raw, &mut rng)
            .unwrap();
        let after = hot_indices(&helper, &out);
        let changed = before.iter().zip(&after).filter(|(a, b)| a != b).count();
        assert_eq!(changed, 1);
    }
}

#[test]
fn test_numeric_and_boolean_dimensions_are_untouched() {
    let helper = helper();
    let mut rng = fastrand::Rng::with_seed(32);

    for _ in 0..200 {
        let out = helper
            .randomize_categorical(&VALID, Raw, Raw, &mut rng)
            .unwrap();
        assert_eq!(out[0], VALID[0]);
        assert_eq!(out[4], VALID[4]);
        assert_eq!(out[11], VALID[11]);
    }
}

#[test]
fn test_every_group_gets_the_forced_flip() {
    let helper = helper();
    let mut rng = fastrand::Rng::with_seed(33);
    let before = hot_indices(&helper, &VALID);
    let mut changed = [0_u32; 3];

    for _ in 0..3000 {
        let out = helper
            .randomize_categorical(&VALID, Raw, Raw, &mut rng)
            .unwrap();
        for (g, (a, b)) in before.iter().zip(hot_indices(&helper, &out)).enumerate() {
            if *a != b {
                changed[g] += 1;
            }
        }
    }
    // each group flips with probability (1 + 0.3 + 0.15) / 3 ~ 0.48
    for count in changed {
        assert!((1200..1700).contains(&count), "{changed:?}");
    }
}

#[test]
fn test_seeded_rng_is_reproducible() {
    let helper = helper();
    let mut a = fastrand::Rng::with_seed(77);
    let mut b = fastrand::Rng::with_seed(77);
    for _ in 0..20 {
        assert_eq!(
            helper.randomize_categorical(&VALID, Raw, Raw, &mut a).unwrap(),
            helper.randomize_categorical(&VALID, Raw, Raw, &mut b).unwrap()
        );
    }
}

#[test]
fn test_invalid_configuration_must_be_repaired_first() {
    let helper = helper();
    let mut rng = fastrand::Rng::with_seed(34);
    let mut raw = VALID;
    raw[7] = 0.6;
    raw[8] = 0.4;

    let result = helper.randomize_categorical(&raw, Raw, Raw, &mut rng);
    assert!(matches!(
        result,
        Err(Error::IllegalCategoricalState { group: 2, .. })
    ));

    let repaired = helper.valid_config(&raw, Raw, Raw).unwrap();
    assert!(
        helper
            .randomize_categorical(&repaired, Raw, Raw, &mut rng)
            .is_ok()
    );
}

#[test]
fn test_scaled_samples_stay_legal() {
    let params = catalog();
    let encoding = OneHotEncoding::new(&params, vec![3, 2, 4]).unwrap();
    let scaler = StandardScaler::from_parts(
        vec![4.0, 0.3, 0.3, 0.3, 0.5, 0.5, 0.5, 0.25, 0.25, 0.25, 0.25, 0.1],
        vec![2.0, 0.45, 0.45, 0.45, 0.5, 0.5, 0.5, 0.4, 0.4, 0.4, 0.4, 0.7],
    )
    .unwrap();
    let helper = ConstraintHelper::new(params, scaler, encoding).unwrap();
    let mut rng = fastrand::Rng::with_seed(35);

    let scaled = helper.scaler().transform(&VALID).unwrap();
    for _ in 0..100 {
        let out = helper
            .randomize_categorical(&scaled, Scaled, Scaled, &mut rng)
            .unwrap();
        assert_eq!(out[0].to_bits(), scaled[0].to_bits());
        assert_eq!(out[11].to_bits(), scaled[11].to_bits());
        let raw = helper.scaler().inverse_transform(&out).unwrap();
        let repaired = helper.apply_constraints(&raw, Raw, Raw).unwrap();
        let moved = helper
            .randomize_categorical(&repaired, Raw, Raw, &mut rng)
            .unwrap();
        assert_eq!(hot_indices(&helper, &moved).len(), 3);
    }
}
