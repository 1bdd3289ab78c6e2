use eps_core::{BindingPath, MemoryModel, ParamValue, RngHandle};
use eps_param::{
    load_table, modified_time, save_table, BindingGroup, FieldBinding, SamplerRegistry,
    TableFormat,
};
use tempfile::tempdir;

fn sample_model() -> MemoryModel {
    let mut model = MemoryModel::new();
    model.insert_object("Zone", "Core", [("Volume", 250.0), ("Height", 3.0)]);
    model.insert_object(
        "Construction",
        "ExteriorWall",
        [("Outside_Layer", ParamValue::Text("Brick".into()))],
    );
    model
}

fn sample_group(model: &MemoryModel, registry: &SamplerRegistry) -> BindingGroup {
    let mut rng = RngHandle::from_seed(0);
    let numeric = FieldBinding::bind(
        model,
        registry,
        BindingPath::new("Zone", "Core", "Volume"),
        "enumerate",
        Some(vec![
            ParamValue::Number(12.0),
            ParamValue::Number(13.5),
            ParamValue::Number(-7.25),
        ]),
        &mut rng,
    )
    .expect("bind numeric");
    let textual = FieldBinding::bind(
        model,
        registry,
        BindingPath::new("Construction", "ExteriorWall", "Outside_Layer"),
        "enumerate",
        Some(vec![
            ParamValue::Text("Brick".into()),
            ParamValue::Text("Stone".into()),
            ParamValue::Text("Render".into()),
        ]),
        &mut rng,
    )
    .expect("bind textual");
    BindingGroup::assemble(model, registry, 0, vec![numeric, textual]).expect("assemble")
}

fn assert_same_values(original: &BindingGroup, reloaded: &BindingGroup) {
    assert_eq!(reloaded.param_count(), original.param_count());
    assert_eq!(reloaded.bindings().len(), original.bindings().len());
    for (old, new) in original.bindings().iter().zip(reloaded.bindings()) {
        assert_eq!(new.path(), old.path());
        for (old_value, new_value) in old.params().iter().zip(new.params()) {
            // string-formatted equality is the round-trip contract
            assert_eq!(new_value.to_string(), old_value.to_string());
        }
    }
}

#[test]
fn csv_round_trip_reproduces_every_value() {
    let model = sample_model();
    let registry = SamplerRegistry::builtin();
    let group = sample_group(&model, &registry);
    let dir = tempdir().expect("tempdir");
    let target = TableFormat::from_path(dir.path().join("variants.csv"));
    assert!(matches!(target, TableFormat::Csv(_)));

    save_table(&group, None, &target).expect("save");
    let (reloaded, names) = load_table(&model, &registry, &target).expect("load");

    assert_same_values(&group, &reloaded);
    assert!(names.is_none());
    // the original sampler identity is deliberately lost
    assert_eq!(reloaded.bindings()[0].sampler_name(), "enumerate");
}

#[test]
fn binary_round_trip_reproduces_every_value() {
    let model = sample_model();
    let registry = SamplerRegistry::builtin();
    let group = sample_group(&model, &registry);
    let dir = tempdir().expect("tempdir");
    let target = TableFormat::from_path(dir.path().join("variants.bin"));
    assert!(matches!(target, TableFormat::Binary(_)));

    save_table(&group, None, &target).expect("save");
    let (reloaded, _) = load_table(&model, &registry, &target).expect("load");

    assert_same_values(&group, &reloaded);
}

#[test]
fn ged_extension_reads_as_csv() {
    let model = sample_model();
    let registry = SamplerRegistry::builtin();
    let group = sample_group(&model, &registry);
    let dir = tempdir().expect("tempdir");
    let target = TableFormat::from_path(dir.path().join("variants.ged"));
    assert!(matches!(target, TableFormat::Csv(_)));

    save_table(&group, None, &target).expect("save");
    let (reloaded, _) = load_table(&model, &registry, &target).expect("load");
    assert_same_values(&group, &reloaded);
}

#[test]
fn reserved_column_carries_artifact_names() {
    let model = sample_model();
    let registry = SamplerRegistry::builtin();
    let group = sample_group(&model, &registry);
    let dir = tempdir().expect("tempdir");
    let target = TableFormat::from_path(dir.path().join("named.csv"));
    let names = vec![
        "south_facing.idf".to_string(),
        "north_facing".to_string(),
        "retrofit".to_string(),
    ];

    save_table(&group, Some(&names), &target).expect("save");
    let (_, reloaded_names) = load_table(&model, &registry, &target).expect("load");

    // missing extensions are suffixed on load
    assert_eq!(
        reloaded_names.expect("names"),
        ["south_facing.idf", "north_facing.idf", "retrofit.idf"]
    );
}

#[test]
fn name_count_mismatch_is_rejected_on_save() {
    let model = sample_model();
    let registry = SamplerRegistry::builtin();
    let group = sample_group(&model, &registry);
    let dir = tempdir().expect("tempdir");
    let target = TableFormat::from_path(dir.path().join("bad.csv"));
    let names = vec!["only_one.idf".to_string()];

    let err = save_table(&group, Some(&names), &target).expect_err("mismatch");
    assert_eq!(err.info().code, "name-count-mismatch");
}

#[test]
fn unresolvable_path_fails_the_whole_load() {
    let model = sample_model();
    let registry = SamplerRegistry::builtin();
    let group = sample_group(&model, &registry);
    let dir = tempdir().expect("tempdir");
    let target = TableFormat::from_path(dir.path().join("stale.csv"));
    save_table(&group, None, &target).expect("save");

    // a model that lost the Zone object can no longer host the table
    let mut stale = MemoryModel::new();
    stale.insert_object(
        "Construction",
        "ExteriorWall",
        [("Outside_Layer", ParamValue::Text("Brick".into()))],
    );
    let err = load_table(&stale, &registry, &target).expect_err("stale model");
    assert_eq!(err.info().code, "field-missing");
}

#[test]
fn empty_table_is_rejected() {
    let model = sample_model();
    let registry = SamplerRegistry::builtin();
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "").expect("write");

    let err = load_table(&model, &registry, &TableFormat::from_path(&path))
        .expect_err("empty table");
    assert_eq!(err.info().code, "table-empty");
}

#[test]
fn modified_time_tracks_rewrites() {
    let model = sample_model();
    let registry = SamplerRegistry::builtin();
    let group = sample_group(&model, &registry);
    let dir = tempdir().expect("tempdir");
    let target = TableFormat::from_path(dir.path().join("watched.csv"));

    save_table(&group, None, &target).expect("save");
    let first = modified_time(target.path()).expect("mtime");

    std::thread::sleep(std::time::Duration::from_millis(20));
    save_table(&group, None, &target).expect("save again");
    let second = modified_time(target.path()).expect("mtime");

    assert!(second >= first);
}

#[test]
fn missing_file_mtime_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let err = modified_time(dir.path().join("absent.csv")).expect_err("missing file");
    assert_eq!(err.info().code, "table-mtime");
}
