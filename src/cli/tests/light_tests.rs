use crate::cli::config::ResolvedOptions;
use crate::cli::light::{LightProgramFactory, SuppressionPolicy};
use crate::cli::test_support::{FakeProgram, FakeToolkit, bare_diag, config_with};
use crate::toolkit::EmitResult;

fn toolkit_with_all_diagnostics() -> FakeToolkit {
    FakeToolkit::with_template(FakeProgram {
        syntactic: vec![bare_diag(1005, "';' expected.")],
        global: vec![bare_diag(2318, "Cannot find global type 'Array'.")],
        semantic: vec![bare_diag(2322, "Type 'string' is not assignable to type 'number'.")],
        emit_result: EmitResult {
            emit_skipped: false,
            diagnostics: vec![bare_diag(2354, "This syntax requires an imported helper.")],
            emitted_files: vec!["out/main.js".into()],
        },
        ..FakeProgram::default()
    })
}

fn light_options() -> ResolvedOptions {
    ResolvedOptions {
        no_lib: true,
        ..ResolvedOptions::default()
    }
}

#[test]
fn semantic_diagnostics_are_always_empty() {
    let toolkit = toolkit_with_all_diagnostics();
    let factory = LightProgramFactory::new(&toolkit);

    for options in [light_options(), ResolvedOptions::default()] {
        let program = factory.create(&config_with(options));
        assert!(program.semantic_diagnostics().is_empty());
    }
}

#[test]
fn syntactic_diagnostics_pass_through() {
    let toolkit = toolkit_with_all_diagnostics();
    let program = LightProgramFactory::new(&toolkit).create(&config_with(light_options()));
    assert_eq!(program.syntactic_diagnostics().len(), 1);
    assert_eq!(program.syntactic_diagnostics()[0].code, 1005);
}

#[test]
fn global_diagnostics_dropped_only_without_lib() {
    let toolkit = toolkit_with_all_diagnostics();
    let factory = LightProgramFactory::new(&toolkit);

    let without_lib = factory.create(&config_with(light_options()));
    assert!(without_lib.global_diagnostics().is_empty());

    let with_lib = factory.create(&config_with(ResolvedOptions::default()));
    assert_eq!(with_lib.global_diagnostics().len(), 1);
}

#[test]
fn emit_diagnostics_dropped_only_without_lib() {
    let toolkit = toolkit_with_all_diagnostics();
    let factory = LightProgramFactory::new(&toolkit);

    let mut without_lib = factory.create(&config_with(light_options()));
    assert!(without_lib.emit().diagnostics.is_empty());

    let mut with_lib = factory.create(&config_with(ResolvedOptions::default()));
    assert_eq!(with_lib.emit().diagnostics.len(), 1);
}

#[test]
fn emit_outcome_passes_through_unchanged() {
    let toolkit = FakeToolkit::with_template(FakeProgram {
        emit_result: EmitResult {
            emit_skipped: true,
            diagnostics: vec![bare_diag(5, "skipped")],
            emitted_files: vec!["out/a.js".into(), "out/a.js.map".into()],
        },
        ..FakeProgram::default()
    });

    let mut program = LightProgramFactory::new(&toolkit).create(&config_with(light_options()));
    let result = program.emit();
    assert!(result.emit_skipped);
    assert_eq!(
        result.emitted_files,
        vec![std::path::PathBuf::from("out/a.js"), "out/a.js.map".into()]
    );
    // Only the diagnostics are scrubbed.
    assert!(result.diagnostics.is_empty());
}

#[test]
fn policy_can_let_semantic_diagnostics_through() {
    let toolkit = toolkit_with_all_diagnostics();
    let policy = SuppressionPolicy {
        semantic: false,
        ..SuppressionPolicy::default()
    };
    let program =
        LightProgramFactory::with_policy(&toolkit, policy).create(&config_with(light_options()));
    assert_eq!(program.semantic_diagnostics().len(), 1);
}

#[test]
fn policy_can_keep_global_and_emit_diagnostics() {
    let toolkit = toolkit_with_all_diagnostics();
    let policy = SuppressionPolicy {
        semantic: true,
        global_without_lib: false,
        emit_without_lib: false,
    };
    let mut program =
        LightProgramFactory::with_policy(&toolkit, policy).create(&config_with(light_options()));
    assert_eq!(program.global_diagnostics().len(), 1);
    assert_eq!(program.emit().diagnostics.len(), 1);
}

#[test]
fn factory_callback_wraps_every_construction() {
    let toolkit = toolkit_with_all_diagnostics();
    let callback = LightProgramFactory::new(&toolkit).into_callback();

    let config = config_with(light_options());
    let first = callback(&config);
    let second = callback(&config);
    assert!(first.semantic_diagnostics().is_empty());
    assert!(second.semantic_diagnostics().is_empty());
    assert_eq!(
        toolkit
            .calls
            .borrow()
            .iter()
            .filter(|call| *call == "create_builder_program")
            .count(),
        2
    );
}
