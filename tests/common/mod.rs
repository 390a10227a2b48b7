#![allow(dead_code)]

use std::path::PathBuf;

use faas_stacks::exec::Invocation;
use faas_stacks::fs::MemoryFileSystem;
use faas_stacks_test_utils::builders::StackFiles;

pub const STACK_DIR: &str = "/stacks/demo";

/// One environment `env-a` with one function `fn-a`, no scaling.
pub const FISSION_SINGLE: &str = r#"
envs:
  env-a:
    env:
      name: env-a
      image: repo/img:1
    functions:
      fn-a:
        name: fn-a
        handler: fn-a.js
        maxmemory: 128Mi
"#;

/// Two environments, keys deliberately out of order, names partly left to
/// the map keys.
pub const FISSION_TWO_ENVS: &str = r#"
envs:
  python:
    env:
      image: fission/python-env
      builder: fission/python-builder
    functions:
      zeta:
        handler: zeta.zip
        entrypoint: main.handler
        mincpu: "100"
        maxcpu: "200"
        minscale: "1"
        maxscale: "3"
        targetcpu: "60"
      alpha:
        handler: alpha.zip
        entrypoint: main.handler
  node:
    env:
      name: nodejs
      image: fission/node-env
    functions:
      hello:
        handler: hello.js
"#;

pub const KNATIVE_SERVICES: &str = r#"
apiVersion: serving.knative.dev/v1
kind: Service
metadata:
  name: svc-b
spec:
  template:
    spec:
      containers:
        - image: repo/svc-b:1
---
---
apiVersion: serving.knative.dev/v1
kind: Service
metadata:
  name: svc-a
spec:
  template:
    spec:
      containers:
        - image: repo/svc-a:1
"#;

pub const KUBELESS_SPEC: &str = r#"
hostname: kubeless.example.com
file: handler.js
dependencies: package.json
functions:
  beta:
    handler: handler.beta
    runtime: nodejs8
    memory: 64Mi
    cpu: 100m
    path: /beta
  alpha:
    name: alpha
    handler: handler.alpha
    runtime: nodejs8
    memory: 128Mi
    cpu: 200m
    path: /alpha
    file: alpha.js
    dependencies: alpha-package.json
    env: MODE=fast
    min-scale: "1"
    max-scale: "4"
    target-cpu: "70"
"#;

pub const OPENFAAS_SPEC: &str = r#"
provider:
  name: openfaas
functions:
  worker:
    lang: python3
    handler: ./worker
    limits:
      memory: 256Mi
  api:
    lang: node12
    handler: ./api
    limits:
      memory: 128Mi
    autoscaling:
      min: "1"
      max: "5"
      target-cpu: "50"
"#;

/// A stack directory with `stack.yaml` and one platform document.
pub fn stack_files(platform_file: &str, contents: &str) -> (PathBuf, MemoryFileSystem) {
    StackFiles::new(STACK_DIR)
        .with_stack("demo", "faastest", "dev")
        .with_file(platform_file, contents)
        .build()
}

/// Arguments of the first recorded invocation whose command line starts
/// with `prefix`.
pub fn args_of(invocations: &[Invocation], prefix: &str) -> Vec<String> {
    invocations
        .iter()
        .find(|inv| inv.command_line().starts_with(prefix))
        .map(|inv| inv.args.clone())
        .unwrap_or_else(|| panic!("no invocation starting with {prefix:?}"))
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
