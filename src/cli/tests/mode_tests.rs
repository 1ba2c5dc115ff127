use crate::cli::config::ResolvedOptions;
use crate::cli::mode::{CompilationMode, EmitFidelity};

fn options(build: bool, watch: bool) -> ResolvedOptions {
    ResolvedOptions {
        build,
        watch,
        ..ResolvedOptions::default()
    }
}

#[test]
fn selection_covers_every_flag_combination() {
    assert_eq!(
        CompilationMode::select(&options(false, false)),
        CompilationMode::Compile
    );
    assert_eq!(
        CompilationMode::select(&options(false, true)),
        CompilationMode::WatchCompile
    );
    assert_eq!(
        CompilationMode::select(&options(true, false)),
        CompilationMode::Build
    );
    assert_eq!(
        CompilationMode::select(&options(true, true)),
        CompilationMode::WatchBuild
    );
}

#[test]
fn unrelated_options_do_not_affect_selection() {
    let mut opts = options(false, true);
    opts.incremental = true;
    opts.declaration = true;
    opts.composite = true;
    assert_eq!(
        CompilationMode::select(&opts),
        CompilationMode::WatchCompile
    );
}

#[test]
fn fidelity_is_light_by_default() {
    assert_eq!(
        EmitFidelity::of(&ResolvedOptions::default()),
        EmitFidelity::Light
    );
}

#[test]
fn declaration_features_force_full_fidelity() {
    let setters: [fn(&mut ResolvedOptions); 3] = [
        |o| o.declaration = true,
        |o| o.emit_declaration_only = true,
        |o| o.composite = true,
    ];
    for set in setters {
        let mut opts = ResolvedOptions::default();
        set(&mut opts);
        assert_eq!(EmitFidelity::of(&opts), EmitFidelity::Full);
    }
}

#[test]
fn incremental_alone_stays_light() {
    let mut opts = ResolvedOptions::default();
    opts.incremental = true;
    assert_eq!(EmitFidelity::of(&opts), EmitFidelity::Light);
}
