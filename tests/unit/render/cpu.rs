use super::*;
use crate::foundation::core::{Rgba8Premul, Viewport};

const RED: Rgba8Premul = Rgba8Premul::opaque(255, 0, 0);

fn buffer(n: u32) -> ColorBuffer {
    ColorBuffer::new(Viewport::new(n, n).unwrap()).unwrap()
}

fn camera_at(z: f32) -> PerspectiveCamera {
    let mut cam =
        PerspectiveCamera::new(70.0, 1.0, 0.001, 1000.0).with_position(Vec3::new(0.0, 0.0, z));
    cam.look_at(Vec3::ZERO);
    cam
}

fn serial() -> CpuRaycaster {
    CpuRaycaster::new(RenderSettings { parallel: false })
}

#[test]
fn sphere_uv_matches_uv_sphere_layout() {
    let (u, v) = sphere_uv(Vec3::NEG_X);
    assert!(u.abs() < 1e-6);
    assert!((v - 0.5).abs() < 1e-6);

    let (u, _) = sphere_uv(Vec3::Z);
    assert!((u - 0.25).abs() < 1e-6);
    let (u, _) = sphere_uv(Vec3::X);
    assert!((u - 0.5).abs() < 1e-6);
    let (u, _) = sphere_uv(Vec3::NEG_Z);
    assert!((u - 0.75).abs() < 1e-6);

    assert!(sphere_uv(Vec3::Y).1.abs() < 1e-6);
    assert!((sphere_uv(Vec3::NEG_Y).1 - 1.0).abs() < 1e-6);
}

#[test]
fn ray_sphere_entry_and_exit() {
    let ray = Ray {
        origin: Vec3::new(0.0, 0.0, 3.0),
        dir: Vec3::NEG_Z,
    };
    let (t0, t1) = intersect_sphere(&ray, Vec3::ZERO, 1.0).unwrap();
    assert!((t0 - 2.0).abs() < 1e-5);
    assert!((t1 - 4.0).abs() < 1e-5);

    let miss = Ray {
        origin: Vec3::new(5.0, 0.0, 3.0),
        dir: Vec3::NEG_Z,
    };
    assert!(intersect_sphere(&miss, Vec3::ZERO, 1.0).is_none());
}

#[test]
fn front_sphere_over_background() {
    let mut scene = Scene::new(Rgba8Premul::WHITE);
    scene.add(Sphere::new(Vec3::ZERO, 1.0, Material::solid(RED)));
    let mut dst = buffer(9);
    serial()
        .render_scene(&scene, &camera_at(3.0), &TextureStore::new(), &mut dst)
        .unwrap();
    assert_eq!(dst.pixel(4, 4), [255, 0, 0, 255]);
    assert_eq!(dst.pixel(0, 0), [255, 255, 255, 255]);
    assert_eq!(dst.pixel(8, 8), [255, 255, 255, 255]);
}

#[test]
fn inside_view_needs_back_side_material() {
    let cam = camera_at(3.0);
    let textures = TextureStore::new();

    let mut front = Scene::new(Rgba8Premul::WHITE);
    front.add(Sphere::new(Vec3::ZERO, 10.0, Material::solid(RED)));
    let mut dst = buffer(5);
    serial().render_scene(&front, &cam, &textures, &mut dst).unwrap();
    assert_eq!(dst.pixel(2, 2), [255, 255, 255, 255]);

    let mut back = Scene::new(Rgba8Premul::WHITE);
    back.add(Sphere::new(
        Vec3::ZERO,
        10.0,
        Material::solid(RED).with_side(Side::Back),
    ));
    serial().render_scene(&back, &cam, &textures, &mut dst).unwrap();
    assert!(dst.data().chunks_exact(4).all(|px| px == [255, 0, 0, 255]));
}

#[test]
fn near_plane_clips_front_face() {
    let mut cam = camera_at(3.0);
    cam.near = 2.5;
    let textures = TextureStore::new();

    let mut scene = Scene::new(Rgba8Premul::WHITE);
    scene.add(Sphere::new(Vec3::ZERO, 1.0, Material::solid(RED)));
    let mut dst = buffer(9);
    serial().render_scene(&scene, &cam, &textures, &mut dst).unwrap();
    assert_eq!(dst.pixel(4, 4), [255, 255, 255, 255]);

    scene.objects_mut()[0].material.side = Side::Double;
    serial().render_scene(&scene, &cam, &textures, &mut dst).unwrap();
    assert_eq!(dst.pixel(4, 4), [255, 0, 0, 255]);
}

#[test]
fn pending_texture_draws_placeholder_then_texture() {
    let mut textures = TextureStore::new();
    let h = textures.reserve("globe");
    let mut scene = Scene::new(Rgba8Premul::WHITE);
    scene.add(Sphere::new(
        Vec3::ZERO,
        1.0,
        Material::textured(h, Rgba8Premul::opaque(9, 9, 9)),
    ));
    let cam = camera_at(3.0);
    let mut dst = buffer(9);

    serial().render_scene(&scene, &cam, &textures, &mut dst).unwrap();
    assert_eq!(dst.pixel(4, 4), [9, 9, 9, 255]);

    textures.complete(h, Texture::solid(4, 4, Rgba8Premul::opaque(0, 200, 0)));
    serial().render_scene(&scene, &cam, &textures, &mut dst).unwrap();
    assert_eq!(dst.pixel(4, 4), [0, 200, 0, 255]);
}

#[test]
fn mirrored_panorama_flips_horizontally() {
    let mut textures = TextureStore::new();
    let tex = Texture::from_premul_rgba8(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
    let h = textures.insert("pano", tex);

    let mut cam = PerspectiveCamera::new(70.0, 1.0, 0.001, 1000.0);
    cam.look_at(Vec3::NEG_Z);

    let material = Material::textured(h, Rgba8Premul::WHITE).with_side(Side::Back);
    let mut plain = Scene::new(Rgba8Premul::WHITE);
    plain.add(Sphere::new(Vec3::ZERO, 10.0, material.clone()));
    let mut mirrored = Scene::new(Rgba8Premul::WHITE);
    mirrored.add(Sphere::new(Vec3::ZERO, 10.0, material.mirrored(true)));

    let mut dst = buffer(9);
    serial().render_scene(&plain, &cam, &textures, &mut dst).unwrap();
    assert_eq!(dst.pixel(4, 4), [0, 0, 255, 255]);
    serial().render_scene(&mirrored, &cam, &textures, &mut dst).unwrap();
    assert_eq!(dst.pixel(4, 4), [255, 0, 0, 255]);
}

#[test]
fn parallel_and_serial_rows_agree() {
    let mut scene = Scene::new(Rgba8Premul::from_hex(0x336699));
    scene.add(Sphere::new(Vec3::ZERO, 1.0, Material::solid(RED)));
    scene.add(Sphere::new(
        Vec3::new(0.8, 0.4, 0.5),
        0.3,
        Material::solid(Rgba8Premul::opaque(0, 0, 255)),
    ));
    let cam = camera_at(3.0);
    let textures = TextureStore::new();

    let mut a = buffer(32);
    let mut b = buffer(32);
    serial().render_scene(&scene, &cam, &textures, &mut a).unwrap();
    CpuRaycaster::new(RenderSettings { parallel: true })
        .render_scene(&scene, &cam, &textures, &mut b)
        .unwrap();
    assert_eq!(a.data(), b.data());
}

#[test]
fn invalid_clip_range_is_a_render_error() {
    let mut cam = camera_at(3.0);
    cam.far = cam.near;
    let err = serial()
        .render_scene(&Scene::new(Rgba8Premul::WHITE), &cam, &TextureStore::new(), &mut buffer(2))
        .unwrap_err();
    assert!(matches!(err, PanoglobeError::Render(_)));
}
