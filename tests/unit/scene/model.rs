use super::*;

#[test]
fn textured_material_defaults_to_white_tint() {
    let m = Material::textured(TextureHandle(0), Rgba8Premul::BLACK);
    assert_eq!(m.color, Rgba8Premul::WHITE);
    assert_eq!(m.placeholder, Rgba8Premul::BLACK);
    assert_eq!(m.side, Side::Front);
    assert!(!m.mirror_u);

    let m = m.with_side(Side::Back).mirrored(true);
    assert_eq!(m.side, Side::Back);
    assert!(m.mirror_u);
}

#[test]
fn spin_rotates_only_spinning_objects() {
    let mut scene = Scene::new(Rgba8Premul::WHITE);
    let still = scene.add(Sphere::new(Vec3::ZERO, 1.0, Material::solid(Rgba8Premul::WHITE)));
    let spinning = scene.add(
        Sphere::new(Vec3::X, 0.05, Material::solid(Rgba8Premul::BLACK)).with_spin(0.5),
    );
    scene.spin();
    scene.spin();

    assert_eq!(scene.objects()[still].rotation, Quat::IDENTITY);
    let expected = Quat::from_rotation_y(1.0);
    assert!(scene.objects()[spinning].rotation.angle_between(expected) < 1e-5);
    assert_eq!(scene.objects()[spinning].center, Vec3::X);
}
