mod common;

use std::path::PathBuf;

use common::{KUBELESS_SPEC, args_of, stack_files, strings};
use faas_stacks::errors::StackError;
use faas_stacks::spec::kubeless::SPEC_FILE;
use faas_stacks::stack::{KubelessStack, Stack};
use faas_stacks_test_utils::fake_runner::{FakeRunner, Reply};
use faas_stacks_test_utils::{fast_settings, init_tracing, with_timeout};

fn open(runner: FakeRunner) -> KubelessStack<FakeRunner> {
    let (dir, fs) = stack_files(SPEC_FILE, KUBELESS_SPEC);
    KubelessStack::open(&fs, dir, runner, &fast_settings()).expect("stack should load")
}

#[tokio::test]
async fn deploy_runs_function_probe_trigger_autoscale_per_function() {
    init_tracing();

    let runner = FakeRunner::all_ready();
    let stack = open(runner.clone());

    with_timeout(stack.deploy_stack()).await.unwrap();

    let heads: Vec<String> = runner
        .calls()
        .into_iter()
        .map(|line| line.split(" -").next().unwrap_or_default().to_string())
        .collect();

    assert_eq!(
        heads,
        vec![
            "npm i",
            "kubeless function deploy alpha",
            "kubectl get pods",
            "kubeless trigger http create alpha",
            "kubeless autoscale create alpha",
            "kubeless function deploy beta",
            "kubectl get pods",
            "kubeless trigger http create beta",
        ]
    );
}

#[tokio::test]
async fn function_overrides_win_over_stack_defaults() {
    init_tracing();

    let runner = FakeRunner::all_ready();
    let stack = open(runner.clone());
    with_timeout(stack.deploy_stack()).await.unwrap();

    assert_eq!(
        args_of(&runner.invocations(), "kubeless function deploy alpha"),
        strings(&[
            "function", "deploy", "alpha", "-r", "nodejs8", "-f", "alpha.js", "--handler",
            "handler.alpha", "--cpu", "200m", "--memory", "128Mi", "--dependencies",
            "alpha-package.json", "--env", "MODE=fast",
        ])
    );
}

#[tokio::test]
async fn function_without_overrides_uses_stack_defaults() {
    init_tracing();

    let runner = FakeRunner::all_ready();
    let stack = open(runner.clone());
    with_timeout(stack.deploy_stack()).await.unwrap();

    // No stack-wide env either, so no --env flag at all.
    assert_eq!(
        args_of(&runner.invocations(), "kubeless function deploy beta"),
        strings(&[
            "function", "deploy", "beta", "-r", "nodejs8", "-f", "handler.js", "--handler",
            "handler.beta", "--cpu", "100m", "--memory", "64Mi", "--dependencies",
            "package.json",
        ])
    );
}

#[tokio::test]
async fn trigger_and_autoscaler_arguments() {
    init_tracing();

    let runner = FakeRunner::all_ready();
    let stack = open(runner.clone());
    with_timeout(stack.deploy_stack()).await.unwrap();

    let invocations = runner.invocations();
    assert_eq!(
        args_of(&invocations, "kubeless trigger http create beta"),
        strings(&[
            "trigger", "http", "create", "beta", "--function-name", "beta", "--hostname",
            "kubeless.example.com", "--path", "/beta",
        ])
    );
    assert_eq!(
        args_of(&invocations, "kubeless autoscale create alpha"),
        strings(&[
            "autoscale", "create", "alpha", "--metric", "cpu", "--min", "1", "--max", "4",
            "--value", "70",
        ])
    );
    assert!(runner.calls_matching("autoscale create beta").is_empty());
}

#[tokio::test]
async fn trigger_waits_for_pod_readiness() {
    init_tracing();

    let runner = FakeRunner::all_ready().sequence(
        "function=alpha",
        vec![Reply::stdout("False"), Reply::stdout("True")],
    );
    let stack = open(runner.clone());
    with_timeout(stack.deploy_stack()).await.unwrap();

    let calls = runner.calls();
    assert_eq!(
        &calls[1..5],
        &[
            "kubeless function deploy alpha -r nodejs8 -f alpha.js --handler handler.alpha --cpu 200m --memory 128Mi --dependencies alpha-package.json --env MODE=fast".to_string(),
            "kubectl get pods -l function=alpha -o jsonpath={.items[0].status.conditions[1].status}".to_string(),
            "kubectl get pods -l function=alpha -o jsonpath={.items[0].status.conditions[1].status}".to_string(),
            "kubeless trigger http create alpha --function-name alpha --hostname kubeless.example.com --path /alpha".to_string(),
        ]
    );
}

#[tokio::test]
async fn failed_trigger_aborts_remaining_functions() {
    init_tracing();

    let runner = FakeRunner::all_ready().fail("trigger http create alpha", "trigger exists");
    let stack = open(runner.clone());

    let err = with_timeout(stack.deploy_stack()).await.unwrap_err();

    assert!(matches!(err, StackError::Command(_)));
    assert!(runner.calls_matching("autoscale").is_empty());
    assert!(runner.calls_matching("beta").is_empty());
}

#[tokio::test]
async fn remove_deletes_in_reverse_creation_order_per_function() {
    init_tracing();

    let runner = FakeRunner::new();
    let stack = open(runner.clone());

    with_timeout(stack.remove_stack()).await.unwrap();

    assert_eq!(
        runner.calls(),
        vec![
            "kubeless autoscale delete alpha",
            "kubeless trigger http delete alpha",
            "kubeless function delete alpha",
            "kubeless trigger http delete beta",
            "kubeless function delete beta",
        ]
    );
}

#[tokio::test]
async fn remove_continues_past_failures_and_returns_ok() {
    init_tracing();

    let runner = FakeRunner::new()
        .fail("trigger http delete alpha", "trigger not found")
        .fail("function delete beta", "function not found");
    let stack = open(runner.clone());

    with_timeout(stack.remove_stack()).await.unwrap();

    assert_eq!(runner.calls().len(), 5);
    assert_eq!(
        runner.calls_matching("function delete"),
        vec!["kubeless function delete alpha", "kubeless function delete beta"]
    );
}

#[tokio::test]
async fn platform_cli_gets_kubeconfig_through_environment() {
    init_tracing();

    let mut settings = fast_settings();
    settings.kubeless.kubeconfig = Some(PathBuf::from("/kc/kubeless"));

    let runner = FakeRunner::all_ready();
    let (dir, fs) = stack_files(SPEC_FILE, KUBELESS_SPEC);
    let stack = KubelessStack::open(&fs, dir, runner.clone(), &settings).unwrap();
    with_timeout(stack.deploy_stack()).await.unwrap();

    for invocation in runner.invocations() {
        match invocation.program.as_str() {
            "kubeless" => {
                assert_eq!(
                    invocation.env,
                    vec![("KUBECONFIG".to_string(), "/kc/kubeless".to_string())]
                );
                assert!(!invocation.args.contains(&"--kubeconfig".to_string()));
            }
            "kubectl" => {
                assert!(invocation.command_line().ends_with("--kubeconfig /kc/kubeless"));
            }
            "npm" => assert!(invocation.env.is_empty()),
            other => panic!("unexpected program {other}"),
        }
    }
}
