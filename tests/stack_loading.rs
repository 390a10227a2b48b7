mod common;

use std::path::Path;

use common::{FISSION_TWO_ENVS, KNATIVE_SERVICES, KUBELESS_SPEC, OPENFAAS_SPEC, STACK_DIR, stack_files};
use faas_stacks::errors::StackError;
use faas_stacks::fs::MemoryFileSystem;
use faas_stacks::spec::fission::FissionSpec;
use faas_stacks::spec::knative::parse_services;
use faas_stacks::spec::kubeless::KubelessSpec;
use faas_stacks::spec::openfaas::OpenFaasSpec;
use faas_stacks::spec::{SourceDefaults, StackInfo, non_empty_or};
use faas_stacks::stack::{Stack, open_stack};
use faas_stacks::types::BackendKind;
use faas_stacks_test_utils::builders::StackFiles;
use faas_stacks_test_utils::fake_runner::FakeRunner;
use faas_stacks_test_utils::fast_settings;

fn platform_file(kind: BackendKind) -> (&'static str, &'static str) {
    match kind {
        BackendKind::Fission => ("fission.yml", FISSION_TWO_ENVS),
        BackendKind::Knative => ("service.yml", KNATIVE_SERVICES),
        BackendKind::Kubeless => ("kubeless.yml", KUBELESS_SPEC),
        BackendKind::OpenFaas => ("openfaas.yml", OPENFAAS_SPEC),
    }
}

#[test]
fn every_backend_opens_through_the_same_entry_point() {
    for kind in BackendKind::ALL {
        let (file, contents) = platform_file(kind);
        let (dir, fs) = stack_files(file, contents);

        let stack = open_stack(kind, &fs, dir, FakeRunner::new(), &fast_settings())
            .unwrap_or_else(|e| panic!("{kind} failed to load: {e}"));

        assert_eq!(stack.kind(), kind);
        assert_eq!(stack.stack_id(), "demo");
        assert_eq!(stack.project(), "faastest");
        assert_eq!(stack.stage(), "dev");
        assert!(!stack.functions().is_empty());
    }
}

#[test]
fn monitored_functions_follow_construction_order() {
    let names = |kind: BackendKind| -> Vec<String> {
        let (file, contents) = platform_file(kind);
        let (dir, fs) = stack_files(file, contents);
        let stack = open_stack(kind, &fs, dir, FakeRunner::new(), &fast_settings()).unwrap();
        stack.functions().iter().map(|f| f.name.clone()).collect()
    };

    assert_eq!(names(BackendKind::Fission), vec!["hello", "alpha", "zeta"]);
    assert_eq!(names(BackendKind::Knative), vec!["svc-b", "svc-a"]);
    assert_eq!(names(BackendKind::Kubeless), vec!["alpha", "beta"]);
    assert_eq!(names(BackendKind::OpenFaas), vec!["api", "worker"]);
}

#[test]
fn missing_platform_document_is_a_read_error() {
    let (dir, fs) = StackFiles::new(STACK_DIR)
        .with_stack("demo", "faastest", "dev")
        .build();

    let err = open_stack(BackendKind::Kubeless, &fs, dir, FakeRunner::new(), &fast_settings())
        .unwrap_err();

    match err {
        StackError::Read { path, .. } => assert_eq!(path, Path::new(STACK_DIR).join("kubeless.yml")),
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn missing_stack_descriptor_is_a_read_error() {
    let (dir, fs) = StackFiles::new(STACK_DIR)
        .with_file("openfaas.yml", OPENFAAS_SPEC)
        .build();

    let err = open_stack(BackendKind::OpenFaas, &fs, dir, FakeRunner::new(), &fast_settings())
        .unwrap_err();

    match err {
        StackError::Read { path, .. } => assert_eq!(path, Path::new(STACK_DIR).join("stack.yaml")),
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn stack_descriptor_without_stage_is_a_parse_error() {
    let fs = MemoryFileSystem::new();
    fs.add_file(Path::new(STACK_DIR).join("stack.yaml"), "name: demo\nproject: faastest\n");

    let err = StackInfo::load(&fs, Path::new(STACK_DIR)).unwrap_err();

    assert!(matches!(err, StackError::Parse { .. }), "got {err:?}");
    assert!(err.to_string().contains("stage"), "{err}");
}

#[test]
fn malformed_platform_document_is_a_parse_error() {
    let (dir, fs) = stack_files("fission.yml", "envs: [this is not a map");

    let err = open_stack(BackendKind::Fission, &fs, dir, FakeRunner::new(), &fast_settings())
        .unwrap_err();

    assert!(matches!(err, StackError::Parse { .. }), "got {err:?}");
}

#[test]
fn fission_names_fall_back_to_map_keys() {
    let (dir, fs) = stack_files("fission.yml", FISSION_TWO_ENVS);
    let envs = FissionSpec::load(&fs, &dir).unwrap().into_environments();

    let env_names: Vec<&str> = envs.iter().map(|e| e.spec.name.as_str()).collect();
    assert_eq!(env_names, vec!["nodejs", "python"]);

    let python = &envs[1];
    assert_eq!(python.spec.builder, "fission/python-builder");
    let fn_names: Vec<&str> = python.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fn_names, vec!["alpha", "zeta"]);
    assert_eq!(python.functions[1].target_cpu, "60");
    assert_eq!(python.functions[0].max_memory, "");
}

#[test]
fn fission_entries_are_ordered_by_resolved_name_not_key() {
    let contents = r#"
envs:
  a-env:
    env:
      name: zz-runtime
      image: img/z
    functions:
      first:
        name: omega
        handler: omega.js
      second:
        handler: second.js
  b-env:
    env:
      name: aa-runtime
      image: img/a
    functions:
      only:
        handler: only.js
"#;
    let (dir, fs) = stack_files("fission.yml", contents);
    let envs = FissionSpec::load(&fs, &dir).unwrap().into_environments();

    let env_names: Vec<&str> = envs.iter().map(|e| e.spec.name.as_str()).collect();
    assert_eq!(env_names, vec!["aa-runtime", "zz-runtime"]);

    let fn_names: Vec<&str> = envs[1].functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fn_names, vec!["omega", "second"]);
}

#[test]
fn kubeless_functions_are_ordered_by_resolved_name_not_key() {
    let contents = r#"
hostname: kubeless.example.com
file: handler.js
functions:
  a-key:
    name: zulu
    handler: handler.zulu
  b-key:
    name: bravo
    handler: handler.bravo
  c-key:
    handler: handler.c
"#;
    let (dir, fs) = stack_files("kubeless.yml", contents);
    let spec = KubelessSpec::load(&fs, &dir).unwrap();

    let names: Vec<String> = spec.ordered_functions().into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["bravo", "c-key", "zulu"]);
}

#[test]
fn knative_reads_names_and_skips_empty_documents() {
    let functions = parse_services(Path::new("service.yml"), KNATIVE_SERVICES).unwrap();
    let names: Vec<&str> = functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["svc-b", "svc-a"]);

    assert!(parse_services(Path::new("service.yml"), "").unwrap().is_empty());
}

#[test]
fn knative_document_without_name_is_rejected() {
    let contents = "metadata:\n  name: ok\n---\nkind: Service\nmetadata:\n  labels: {}\n";

    let err = parse_services(Path::new("service.yml"), contents).unwrap_err();

    match err {
        StackError::Invalid { reason, .. } => assert!(reason.contains("document 2"), "{reason}"),
        other => panic!("expected invalid document, got {other:?}"),
    }
}

#[test]
fn kubeless_overlay_prefers_non_empty_function_values() {
    let (dir, fs) = stack_files("kubeless.yml", KUBELESS_SPEC);
    let spec = KubelessSpec::load(&fs, &dir).unwrap();
    let defaults = spec.defaults();
    let functions = spec.ordered_functions();

    let alpha = defaults.overlay(&functions[0].overrides());
    assert_eq!(
        alpha,
        SourceDefaults {
            file: "alpha.js".into(),
            dependencies: "alpha-package.json".into(),
            env: "MODE=fast".into(),
        }
    );

    let beta = defaults.overlay(&functions[1].overrides());
    assert_eq!(
        beta,
        SourceDefaults {
            file: "handler.js".into(),
            dependencies: "package.json".into(),
            env: String::new(),
        }
    );

    assert!(functions[0].is_autoscaled());
    assert!(!functions[1].is_autoscaled());
}

#[test]
fn openfaas_autoscaling_block_is_optional() {
    let (dir, fs) = stack_files("openfaas.yml", OPENFAAS_SPEC);
    let functions = OpenFaasSpec::load(&fs, &dir).unwrap().into_named_functions();

    assert_eq!(functions[0].name, "api");
    let scaling = functions[0].function.autoscaling.as_ref().unwrap();
    assert_eq!((scaling.min.as_str(), scaling.max.as_str()), ("1", "5"));
    assert_eq!(scaling.target_cpu, "50");
    assert_eq!(functions[0].summary().memory, "128Mi");

    assert_eq!(functions[1].name, "worker");
    assert!(functions[1].function.autoscaling.is_none());
    assert_eq!(functions[1].summary().runtime, "python3");
}

#[test]
fn non_empty_or_keeps_set_values() {
    assert_eq!(non_empty_or("override", "default"), "override");
    assert_eq!(non_empty_or("", "default"), "default");
    assert_eq!(non_empty_or("", ""), "");
}
