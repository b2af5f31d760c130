use taylor::slip::{CrystalFamily, SlipSystem, SlipSystemCatalog, TemperatureRegime};
use taylor::TaylorError;
use nalgebra::Vector3;

const TOL: f64 = 1e-9;

fn all_configurations() -> Vec<(CrystalFamily, TemperatureRegime, usize)> {
    vec![
        (CrystalFamily::Fcc, TemperatureRegime::Room, 12),
        (CrystalFamily::Fcc, TemperatureRegime::Elevated, 12),
        (CrystalFamily::Bcc, TemperatureRegime::Room, 12),
        (CrystalFamily::Bcc, TemperatureRegime::Elevated, 48),
    ]
}

#[test]
fn test_catalog_sizes() {
    for (family, regime, expected) in all_configurations() {
        let catalog = SlipSystemCatalog::generate(family, regime).unwrap();
        assert_eq!(catalog.len(), expected, "{family}-{regime} should have {expected} systems");
    }
}

#[test]
fn test_systems_are_unit_and_orthogonal() {
    for (family, regime, _) in all_configurations() {
        let catalog = SlipSystemCatalog::generate(family, regime).unwrap();
        for s in catalog.iter() {
            assert!((s.normal.norm() - 1.0).abs() < TOL, "{} normal not unit", s.label());
            assert!((s.slip.norm() - 1.0).abs() < TOL, "{} direction not unit", s.label());
            assert!(s.normal.dot(&s.slip).abs() < TOL, "{} direction not in plane", s.label());
        }
    }
}

#[test]
fn test_no_sign_equivalent_duplicates() {
    let catalog = SlipSystemCatalog::generate(CrystalFamily::Bcc, TemperatureRegime::Elevated).unwrap();
    let systems = catalog.systems();
    for i in 0..systems.len() {
        for j in (i + 1)..systems.len() {
            assert!(
                !systems[i].is_equivalent(&systems[j]),
                "systems {} and {} are the same physical system",
                systems[i].label(),
                systems[j].label()
            );
        }
    }
}

#[test]
fn test_fcc_planes_carry_three_directions() {
    let catalog = SlipSystemCatalog::generate(CrystalFamily::Fcc, TemperatureRegime::Room).unwrap();
    let mut planes: Vec<[i32; 3]> = catalog.iter().map(|s| s.plane.unwrap()).collect();
    planes.dedup();
    assert_eq!(planes.len(), 4, "fcc has four {{111}} planes");
    for p in &planes {
        let count = catalog.iter().filter(|s| s.plane == Some(*p)).count();
        assert_eq!(count, 3);
        assert!(p.iter().all(|c| c.abs() == 1));
    }
    for s in catalog.iter() {
        let mut d: Vec<i32> = s.direction.unwrap().iter().map(|c| c.abs()).collect();
        d.sort();
        assert_eq!(d, vec![0, 1, 1], "fcc slip directions are <110>");
    }
}

#[test]
fn test_bcc_elevated_families() {
    let catalog = SlipSystemCatalog::generate(CrystalFamily::Bcc, TemperatureRegime::Elevated).unwrap();
    let family_count = |template: [i32; 3]| {
        catalog
            .iter()
            .filter(|s| {
                let mut p: Vec<i32> = s.plane.unwrap().iter().map(|c| c.abs()).collect();
                p.sort();
                p == template.to_vec()
            })
            .count()
    };
    assert_eq!(family_count([0, 1, 1]), 12);
    assert_eq!(family_count([1, 1, 2]), 12);
    assert_eq!(family_count([1, 2, 3]), 24);

    // The room-temperature systems come first and are unchanged.
    let room = SlipSystemCatalog::generate(CrystalFamily::Bcc, TemperatureRegime::Room).unwrap();
    assert_eq!(&catalog.systems()[..12], room.systems());
}

#[test]
fn test_generation_is_deterministic() {
    let a = SlipSystemCatalog::generate(CrystalFamily::Bcc, TemperatureRegime::Elevated).unwrap();
    let b = SlipSystemCatalog::generate(CrystalFamily::Bcc, TemperatureRegime::Elevated).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_string_keys() {
    let catalog = SlipSystemCatalog::from_keys("BCC", "elevated").unwrap();
    assert_eq!(catalog.len(), 48);
    assert_eq!(catalog.name(), "bcc-elevated");
}

#[test]
fn test_unknown_family_is_configuration_error() {
    let err = SlipSystemCatalog::from_keys("hcp", "room").unwrap_err();
    assert!(matches!(err, TaylorError::Configuration(_)), "got {err:?}");
    assert!(!err.is_per_sample());

    let err = SlipSystemCatalog::from_keys("fcc", "cryogenic").unwrap_err();
    assert!(matches!(err, TaylorError::Configuration(_)), "got {err:?}");
}

#[test]
fn test_custom_systems_are_validated() {
    let bad = SlipSystem::new(Vector3::new(1.0, 1.0, 1.0), Vector3::new(1.0, 0.0, 0.0));
    assert!(matches!(bad, Err(TaylorError::Configuration(_))));

    let zero = SlipSystem::from_miller([0, 0, 0], [1, 0, 0]);
    assert!(matches!(zero, Err(TaylorError::Configuration(_))));

    let s = SlipSystem::from_miller([1, 1, 1], [1, -1, 0]).unwrap();
    let flipped = SlipSystem::from_miller([-1, -1, -1], [1, -1, 0]).unwrap();
    assert!(s.is_equivalent(&flipped));
    assert!(SlipSystemCatalog::custom("dup", vec![s.clone(), flipped]).is_err());
    assert!(SlipSystemCatalog::custom("empty", vec![]).is_err());
    assert_eq!(s.label(), "(1 1 1)[1 -1 0]");
}
