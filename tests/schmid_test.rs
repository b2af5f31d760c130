use nalgebra::Vector3;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use taylor::schmid::{deviatoric_components, rank, schmid_factors, schmid_tensor, uniaxial_strain, ConstraintSystem};
use taylor::slip::{CrystalFamily, SlipSystemCatalog, TemperatureRegime};
use taylor::{Orientation, TaylorError};

fn fcc() -> SlipSystemCatalog {
    SlipSystemCatalog::generate(CrystalFamily::Fcc, TemperatureRegime::Room).unwrap()
}

#[test]
fn test_schmid_tensors_are_symmetric_and_traceless() {
    let catalog = SlipSystemCatalog::generate(CrystalFamily::Bcc, TemperatureRegime::Elevated).unwrap();
    let mut rng = Pcg64::seed_from_u64(3);
    for _ in 0..20 {
        let o = Orientation::random(&mut rng);
        for s in catalog.iter() {
            let p = schmid_tensor(s, &o);
            assert!((p - p.transpose()).abs().max() < 1e-12, "Schmid tensor not symmetric");
            assert!(p.trace().abs() < 1e-12, "Schmid tensor has trace {}", p.trace());
        }
    }
}

#[test]
fn test_uniaxial_target() {
    let system = ConstraintSystem::build(&fcc(), &Orientation::identity(), &Vector3::x()).unwrap();
    let expected = [1.0, -0.5, 0.0, 0.0, 0.0];
    for (got, want) in system.target.iter().zip(expected.iter()) {
        assert!((got - want).abs() < 1e-12, "target {:?}", system.target);
    }
    assert_eq!(system.matrix.shape(), (5, 12));

    // Any axis: traceless with unit axial strain.
    let axis = Vector3::new(1.0, -2.0, 0.5);
    let eps = uniaxial_strain(&axis).unwrap();
    let a = axis.normalize();
    assert!(eps.trace().abs() < 1e-12);
    assert!(((a.transpose() * eps * a)[(0, 0)] - 1.0).abs() < 1e-12);
    assert_eq!(deviatoric_components(&eps)[0], eps[(0, 0)]);
}

#[test]
fn test_standard_catalogs_have_full_rank() {
    let mut rng = Pcg64::seed_from_u64(17);
    for (family, regime, cols) in [
        (CrystalFamily::Fcc, TemperatureRegime::Room, 12),
        (CrystalFamily::Bcc, TemperatureRegime::Room, 12),
        (CrystalFamily::Bcc, TemperatureRegime::Elevated, 48),
    ] {
        let catalog = SlipSystemCatalog::generate(family, regime).unwrap();
        let mut orientations = vec![Orientation::identity()];
        orientations.extend((0..25).map(|_| Orientation::random(&mut rng)));
        for o in &orientations {
            let system = ConstraintSystem::build(&catalog, o, &Vector3::x()).unwrap();
            assert_eq!(system.n_systems(), cols);
            assert_eq!(rank(&system.matrix), 5);
        }
    }
}

#[test]
fn test_reduced_catalog_is_geometry_error() {
    let full = fcc();
    let reduced = SlipSystemCatalog::custom("first-four", full.systems()[..4].to_vec()).unwrap();
    let err = ConstraintSystem::build(&reduced, &Orientation::identity(), &Vector3::x()).unwrap_err();
    assert!(err.is_per_sample());
    match err {
        TaylorError::Geometry { rank: r } => assert!(r <= 4, "rank {r}"),
        other => panic!("expected geometry error, got {other:?}"),
    }
}

#[test]
fn test_bad_loading_axis() {
    let err = ConstraintSystem::build(&fcc(), &Orientation::identity(), &Vector3::zeros()).unwrap_err();
    assert!(matches!(err, TaylorError::Configuration(_)));
    let nan = Vector3::new(f64::NAN, 0.0, 0.0);
    assert!(uniaxial_strain(&nan).is_err());
}

#[test]
fn test_schmid_factors_for_cube_axis() {
    let catalog = fcc();
    let factors = schmid_factors(&catalog, &Orientation::identity(), &Vector3::x()).unwrap();
    assert_eq!(factors.len(), 12);

    let m_max = 1.0 / 6f64.sqrt();
    let loaded = factors.iter().filter(|f| (f.factor.abs() - m_max).abs() < 1e-12).count();
    let idle = factors.iter().filter(|f| f.factor.abs() < 1e-12).count();
    assert_eq!(loaded, 8, "eight equally stressed systems under [100] tension");
    assert_eq!(idle, 4);

    for pair in factors.windows(2) {
        assert!(pair[0].factor.abs() >= pair[1].factor.abs(), "ranking not descending");
    }
}

#[test]
fn test_schmid_factor_bound() {
    let catalog = SlipSystemCatalog::generate(CrystalFamily::Bcc, TemperatureRegime::Elevated).unwrap();
    let mut rng = Pcg64::seed_from_u64(8);
    for _ in 0..50 {
        let o = Orientation::random(&mut rng);
        for f in schmid_factors(&catalog, &o, &Vector3::new(1.0, 1.0, 0.0)).unwrap() {
            assert!(f.factor.abs() <= 0.5 + 1e-12, "Schmid factor {} exceeds 1/2", f.factor);
        }
    }
}
