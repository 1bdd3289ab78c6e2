use eps_core::{ParamValue, RngHandle};
use eps_param::{SamplerKind, SamplerRegistry};

fn numbers(values: &[ParamValue]) -> Vec<f64> {
    values
        .iter()
        .map(|value| value.as_f64().expect("numeric"))
        .collect()
}

#[test]
fn constant_repeats_its_value() {
    let registry = SamplerRegistry::builtin();
    let mut rng = RngHandle::from_seed(1);
    let values = registry
        .resolve("constant")
        .expect("resolve")
        .generate(
            &[ParamValue::Number(21.5), ParamValue::Number(3.0)],
            &mut rng,
        )
        .expect("generate");
    assert_eq!(numbers(&values), [21.5, 21.5, 21.5]);
}

#[test]
fn linspace_is_inclusive_of_both_ends() {
    let registry = SamplerRegistry::builtin();
    let mut rng = RngHandle::from_seed(1);
    let values = registry
        .resolve("linspace")
        .expect("resolve")
        .generate(
            &[
                ParamValue::Number(0.0),
                ParamValue::Number(10.0),
                ParamValue::Number(5.0),
            ],
            &mut rng,
        )
        .expect("generate");
    assert_eq!(numbers(&values), [0.0, 2.5, 5.0, 7.5, 10.0]);
}

#[test]
fn arange_excludes_the_end() {
    let registry = SamplerRegistry::builtin();
    let mut rng = RngHandle::from_seed(1);
    let values = registry
        .resolve("arange")
        .expect("resolve")
        .generate(
            &[
                ParamValue::Number(1.0),
                ParamValue::Number(2.0),
                ParamValue::Number(0.25),
            ],
            &mut rng,
        )
        .expect("generate");
    assert_eq!(numbers(&values), [1.0, 1.25, 1.5, 1.75]);
}

#[test]
fn arange_rejects_zero_step() {
    let registry = SamplerRegistry::builtin();
    let mut rng = RngHandle::from_seed(1);
    let err = registry
        .resolve("arange")
        .expect("resolve")
        .generate(
            &[
                ParamValue::Number(0.0),
                ParamValue::Number(1.0),
                ParamValue::Number(0.0),
            ],
            &mut rng,
        )
        .expect_err("zero step");
    assert_eq!(err.info().code, "arange-zero-step");
}

#[test]
fn numeric_arguments_coerce_from_text() {
    let registry = SamplerRegistry::builtin();
    let mut rng = RngHandle::from_seed(1);
    let values = registry
        .resolve("linspace")
        .expect("resolve")
        .generate(
            &[
                ParamValue::Text("1".into()),
                ParamValue::Text("3".into()),
                ParamValue::Text("3".into()),
            ],
            &mut rng,
        )
        .expect("generate");
    assert_eq!(numbers(&values), [1.0, 2.0, 3.0]);
}

#[test]
fn non_numeric_argument_is_rejected_with_context() {
    let registry = SamplerRegistry::builtin();
    let mut rng = RngHandle::from_seed(1);
    let err = registry
        .resolve("linspace")
        .expect("resolve")
        .generate(
            &[
                ParamValue::Text("brick".into()),
                ParamValue::Number(3.0),
                ParamValue::Number(3.0),
            ],
            &mut rng,
        )
        .expect_err("bad argument");
    assert_eq!(err.info().code, "sampler-arg");
    assert_eq!(err.info().context.get("argument").map(String::as_str), Some("start"));
}

#[test]
fn wrong_arity_is_rejected() {
    let registry = SamplerRegistry::builtin();
    let mut rng = RngHandle::from_seed(1);
    let err = registry
        .resolve("uniform")
        .expect("resolve")
        .generate(&[ParamValue::Number(0.0)], &mut rng)
        .expect_err("arity");
    assert_eq!(err.info().code, "sampler-arity");
}

#[test]
fn enumerate_passes_literals_verbatim() {
    let registry = SamplerRegistry::builtin();
    let mut rng = RngHandle::from_seed(1);
    let sampler = registry.resolve("enumerate").expect("resolve");

    let literal = sampler
        .generate(
            &[
                ParamValue::Number(1.0),
                ParamValue::Text("red".into()),
                ParamValue::Number(3.0),
            ],
            &mut rng,
        )
        .expect("generate");
    assert_eq!(
        literal,
        [
            ParamValue::Number(1.0),
            ParamValue::Text("red".into()),
            ParamValue::Number(3.0),
        ]
    );

    let split = sampler
        .generate(&[ParamValue::Text("4,5.5,blue".into())], &mut rng)
        .expect("generate");
    assert_eq!(
        split,
        [
            ParamValue::Number(4.0),
            ParamValue::Number(5.5),
            ParamValue::Text("blue".into()),
        ]
    );

    let empty = sampler.generate(&[], &mut rng).expect("generate");
    assert!(empty.is_empty());
}

#[test]
fn stochastic_samplers_reproduce_under_the_same_seed() {
    let registry = SamplerRegistry::builtin();
    for name in ["uniform", "gaussian", "bernoulli", "power"] {
        let sampler = registry.resolve(name).expect("resolve");
        assert!(sampler.is_stochastic());
        let args = [
            ParamValue::Number(2.0),
            ParamValue::Number(0.5),
            ParamValue::Number(16.0),
        ];
        let mut rng_a = RngHandle::from_seed(77);
        let mut rng_b = RngHandle::from_seed(77);
        let draws_a = sampler.generate(&args, &mut rng_a).expect("generate");
        let draws_b = sampler.generate(&args, &mut rng_b).expect("generate");
        assert_eq!(draws_a, draws_b, "{name} must be seed-reproducible");
        assert_eq!(draws_a.len(), 16);
    }
}

#[test]
fn uniform_draws_stay_in_bounds() {
    let registry = SamplerRegistry::builtin();
    let mut rng = RngHandle::from_seed(9);
    let values = registry
        .resolve("uniform")
        .expect("resolve")
        .generate(
            &[
                ParamValue::Number(100.0),
                ParamValue::Number(200.0),
                ParamValue::Number(64.0),
            ],
            &mut rng,
        )
        .expect("generate");
    for number in numbers(&values) {
        assert!((100.0..200.0).contains(&number));
    }
}

#[test]
fn power_draws_scale_into_zero_to_max() {
    let registry = SamplerRegistry::builtin();
    let mut rng = RngHandle::from_seed(9);
    let values = registry
        .resolve("power")
        .expect("resolve")
        .generate(
            &[
                ParamValue::Number(5.0),
                ParamValue::Number(2.0),
                ParamValue::Number(64.0),
            ],
            &mut rng,
        )
        .expect("generate");
    for number in numbers(&values) {
        assert!((0.0..=5.0).contains(&number));
    }
}

#[test]
fn registry_resolves_case_insensitively_and_rejects_unknown() {
    let registry = SamplerRegistry::builtin();
    assert_eq!(registry.resolve("Linspace").expect("resolve").name(), "linspace");
    assert_eq!(
        registry.resolve("random").expect("resolve").kind(),
        SamplerKind::Uniform
    );

    let err = registry.resolve("latin_hypercube").expect_err("unknown");
    assert_eq!(err.info().code, "sampler-unknown");
}

#[test]
fn catalogue_metadata_is_parallel() {
    let registry = SamplerRegistry::builtin();
    for name in registry.names() {
        let sampler = registry.resolve(name).expect("resolve");
        assert_eq!(
            sampler.parameter_names().len(),
            sampler.parameter_descriptions().len(),
            "{name} metadata arrays must stay parallel"
        );
    }
}
