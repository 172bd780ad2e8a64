#![cfg(feature = "serde")]

use isp_core::units::psia;
use isp_perf::{CoreConfig, Efficiencies, EfficiencyKind, GeometryConfig, ThrusterSettings};
use isp_thermo::Propellants;

#[test]
fn stream_inputs_survive_json() {
    let config = CoreConfig {
        propellants: Propellants::new("LOX", "CH4"),
        mixture_ratio: 3.6,
        pc: psia(500.0),
        ffc_percent: 5.0,
        ..CoreConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: CoreConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.propellants, config.propellants);
    assert_eq!(back.mixture_ratio, 3.6);
    assert!((back.pc.value - config.pc.value).abs() < 1e-9);

    let geometry = GeometryConfig {
        area_ratio: 35.0,
        ..GeometryConfig::default()
    };
    let json = serde_json::to_string(&geometry).unwrap();
    let back: GeometryConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.area_ratio, 35.0);
    assert_eq!(back.nozzle_length, None);

    let settings = ThrusterSettings {
        pulse_width: Some(0.05),
        ..ThrusterSettings::default()
    };
    let json = serde_json::to_string(&settings).unwrap();
    assert_eq!(serde_json::from_str::<ThrusterSettings>(&json).unwrap(), settings);
}

#[test]
fn held_efficiencies_survive_json() {
    let effs = Efficiencies::with_constants(&[("ERE", 0.98)]).unwrap();
    let json = serde_json::to_string(&effs).unwrap();
    let back: Efficiencies = serde_json::from_str(&json).unwrap();
    assert!(back.is_held(EfficiencyKind::ERE));
    assert_eq!(back.value(EfficiencyKind::ERE), 0.98);
    assert_eq!(back.get(EfficiencyKind::Div).source(), "default");
}
