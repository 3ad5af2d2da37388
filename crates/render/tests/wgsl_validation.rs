use wgpu::naga;

fn validate_wgsl(source: &str) -> Result<naga::Module, String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|err| err.emit_to_string(source))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );

    validator
        .validate(&module)
        .map_err(|err| err.emit_to_string(source))?;
    Ok(module)
}

#[test]
fn mesh_shader_is_valid_wgsl() {
    validate_wgsl(include_str!("../src/shaders/mesh.wgsl")).unwrap();
}

#[test]
fn mesh_shader_exposes_expected_entry_points() {
    let module = validate_wgsl(include_str!("../src/shaders/mesh.wgsl")).unwrap();
    let names: Vec<_> = module
        .entry_points
        .iter()
        .map(|entry| entry.name.as_str())
        .collect();
    assert!(names.contains(&"vs_main"));
    assert!(names.contains(&"fs_main"));
}
