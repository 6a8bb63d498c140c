//! Integration tests for plan files and builder settings.

mod common;

use std::path::PathBuf;

use mgrid_builder::assembly::Assembler;
use mgrid_builder::config::BuilderConfig;
use mgrid_builder::plan::SystemPlan;
use mgrid_builder::store::MemoryStore;

fn demos() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos")
}

#[test]
fn island_demo_plan_builds_a_ready_system() {
    let plan = SystemPlan::from_toml_file(&demos().join("island.toml"));
    assert!(plan.is_ok(), "{:?}", plan.err());
    let plan = plan.ok();

    let config = BuilderConfig::default();
    let asm = Assembler::from_config(MemoryStore::new(), &config);
    assert!(asm.is_ok());
    let Some(mut asm) = asm.ok() else { return };

    let sys = plan.and_then(|p| p.apply(&mut asm, &demos()).ok());
    let Some(sys) = sys else {
        panic!("plan should apply");
    };

    assert_eq!(asm.list_unconfigured(sys).map(|c| c.len()).ok(), Some(0));
    let doc = asm.build_document(sys).unwrap_or_default();
    assert_eq!(doc.len(), 5);

    let demand = asm.component_details(sys, "dmn1").ok().and_then(|d| d.series);
    assert_eq!(demand.map(|s| s.len()), Some(24));

    let solar = asm.component_details(sys, "slr1").ok().and_then(|d| d.series);
    let steps = config.solar.steps_per_day * config.solar.days;
    assert_eq!(solar.as_ref().map(Vec::len), Some(steps));
    assert!(solar.is_some_and(|s| s.iter().all(|v| *v >= 0.0)));
}

#[test]
fn settings_flow_from_config_into_the_assembler() {
    let config = BuilderConfig::from_toml_str(
        "[controller]\ndefault_mode = \"idle\"\nrequire_configured = false\n",
    );
    let Ok(config) = config else {
        panic!("config should parse");
    };
    let asm = Assembler::from_config(MemoryStore::new(), &config).ok();
    let Some(mut asm) = asm else {
        panic!("assembler should build");
    };
    let sys = asm.create_system("S1");
    assert!(asm.add_component(sys, common::battery()).is_ok());

    let doc = asm.build_document(sys).unwrap_or_default();
    let mode = doc
        .get("btt1")
        .and_then(|e| e.configure.get("mode"))
        .and_then(|m| m.as_str().map(str::to_string));
    assert_eq!(mode.as_deref(), Some("idle"));
    assert!(asm.run(sys, &common::answering(serde_json::json!({"components": {}}))).is_ok());
}
