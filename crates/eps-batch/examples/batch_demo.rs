use eps_batch::{materialize, ArtifactNaming};
use eps_core::{BindingPath, MemoryModel, ParamValue, RngHandle};
use eps_param::{BindingGroup, FieldBinding, SamplerRegistry};

fn main() {
    let mut model = MemoryModel::new();
    model.insert_object("Zone", "Core", [("Volume", 250.0), ("Height", 3.0)]);
    model.insert_object("Material", "Concrete200", [("Thickness", 0.2)]);
    let registry = SamplerRegistry::builtin();
    let mut rng = RngHandle::from_seed(4242);

    let volumes = FieldBinding::bind(
        &model,
        &registry,
        BindingPath::new("Zone", "Core", "Volume"),
        "linspace",
        Some(vec![
            ParamValue::Number(200.0),
            ParamValue::Number(400.0),
            ParamValue::Number(5.0),
        ]),
        &mut rng,
    )
    .expect("bind volumes");
    let thicknesses = FieldBinding::bind(
        &model,
        &registry,
        BindingPath::new("Material", "Concrete200", "Thickness"),
        "enumerate",
        Some(vec![
            ParamValue::Number(0.1),
            ParamValue::Number(0.2),
            ParamValue::Number(0.3),
        ]),
        &mut rng,
    )
    .expect("bind thicknesses");

    let volume_group =
        BindingGroup::assemble(&model, &registry, 4242, vec![volumes]).expect("volume group");
    let thickness_group = BindingGroup::assemble(&model, &registry, 4242, vec![thicknesses])
        .expect("thickness group");
    let crossed = volume_group.cross(&thickness_group);
    println!("{crossed}");

    let report = materialize(&mut model, &crossed, &ArtifactNaming::indexed("demo"))
        .expect("materialize");
    println!(
        "written: {}, skipped: {}",
        report.written(),
        report.skipped()
    );
}
