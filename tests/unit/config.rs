use super::*;

#[test]
fn defaults_match_demo_constants() {
    let cfg = DemoConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.planet.camera.fov_deg, 70.0);
    assert_eq!(cfg.planet.camera.distance, 2.5);
    assert_eq!(cfg.planet.camera.damping, None);
    assert_eq!(cfg.panorama.camera.distance, 3.0);
    assert_eq!(cfg.panorama.camera.damping, Some(0.05));
    assert_eq!(cfg.panorama.sphere.radius, 10.0);
    assert!(cfg.panorama.sphere.mirror);
    assert_eq!(cfg.planet.background, ColorDef::WHITE);
    assert_eq!(cfg.locations.len(), 3);
    assert_eq!(cfg.transition.delay_secs, 0.5);
}

#[test]
fn empty_object_parses_to_defaults() {
    let cfg = DemoConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, DemoConfig::default());
}

#[test]
fn partial_override() {
    let json = r##"{
        "viewport": { "width": 32, "height": 16 },
        "progress": 0.25,
        "panorama": { "background": "#000000", "sphere": { "radius": 5, "mirror": false } },
        "locations": [ { "title": "Null Island", "lat": 0, "lon": 0 } ]
    }"##;
    let cfg = DemoConfig::from_reader(json.as_bytes()).unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.viewport, Viewport::new(32, 16).unwrap());
    assert_eq!(cfg.progress, 0.25);
    assert_eq!(cfg.panorama.background, ColorDef::rgb(0, 0, 0));
    assert_eq!(cfg.panorama.sphere.radius, 5.0);
    assert_eq!(cfg.panorama.sphere.texture, None);
    assert_eq!(cfg.locations[0].title, "Null Island");
    assert_eq!(cfg.planet, DemoConfig::default().planet);
}

#[test]
fn colors_accept_hex_and_arrays() {
    let c: ColorDef = serde_json::from_str("\"#FF336680\"").unwrap();
    assert_eq!(
        c,
        ColorDef {
            r: 0xff,
            g: 0x33,
            b: 0x66,
            a: 0x80
        }
    );
    let c: ColorDef = serde_json::from_str("[1, 2, 3]").unwrap();
    assert_eq!(c, ColorDef::rgb(1, 2, 3));
    assert!(serde_json::from_str::<ColorDef>("\"#abc\"").is_err());
    assert!(serde_json::from_str::<ColorDef>("[1, 2]").is_err());

    assert_eq!(serde_json::to_string(&ColorDef::rgb(255, 0, 16)).unwrap(), "\"#ff0010\"");
    assert_eq!(
        ColorDef { r: 255, g: 0, b: 0, a: 0 }.to_rgba8_premul(),
        Rgba8Premul::transparent()
    );
}

#[test]
fn serialized_defaults_round_trip() {
    let cfg = DemoConfig::default();
    let json = cfg.to_json_pretty().unwrap();
    assert_eq!(DemoConfig::from_reader(json.as_bytes()).unwrap(), cfg);
}

#[test]
fn validation_rejects_bad_values() {
    let mut cfg = DemoConfig::default();
    cfg.planet.camera.near = 0.0;
    assert!(matches!(cfg.validate(), Err(PanoglobeError::Validation(_))));

    let mut cfg = DemoConfig::default();
    cfg.panorama.camera.damping = Some(1.5);
    assert!(cfg.validate().is_err());

    let mut cfg = DemoConfig::default();
    cfg.locations.push(Location::new("Nowhere", 95.0, 0.0));
    assert!(cfg.validate().is_err());

    let mut cfg = DemoConfig::default();
    cfg.transition.duration_secs = -1.0;
    assert!(cfg.validate().is_err());

    let mut cfg = DemoConfig::default();
    cfg.fps.den = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = DemoConfig::from_reader("{ \"fps\": 3 }".as_bytes()).unwrap_err();
    assert!(matches!(err, PanoglobeError::Serde(_)));
}

#[test]
fn missing_file_is_a_validation_error() {
    let err = DemoConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, PanoglobeError::Validation(_)));
}
