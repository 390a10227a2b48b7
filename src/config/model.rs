// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Settings file as read from TOML, before validation.
///
/// ```toml
/// [polling]
/// interval = "5s"
/// timeout = "15m"
///
/// [runner]
/// echo_output = true
///
/// [fission]
/// kubeconfig = "/app/kubeconfigs/kubeconfig_fission"
/// settle = "10s"
///
/// [openfaas]
/// gateway = "http://gateway.openfaas:8080"
/// ```
///
/// Every section is optional. Durations are strings such as `"250ms"`,
/// `"5s"`, `"1m"`. An empty `kubeconfig` means "do not pass one".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSettings {
    #[serde(default)]
    pub polling: RawPolling,

    #[serde(default)]
    pub runner: RawRunner,

    #[serde(default)]
    pub fission: RawPlatform,

    #[serde(default)]
    pub knative: RawPlatform,

    #[serde(default)]
    pub kubeless: RawPlatform,

    #[serde(default)]
    pub openfaas: RawPlatform,
}

/// `[polling]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPolling {
    /// Pause before every readiness tick.
    #[serde(default = "default_poll_interval")]
    pub interval: String,

    /// Give up waiting for readiness after this long.
    ///
    /// If `None`, readiness is awaited indefinitely.
    #[serde(default)]
    pub timeout: Option<String>,
}

fn default_poll_interval() -> String {
    "5s".to_string()
}

impl Default for RawPolling {
    fn default() -> Self {
        Self {
            interval: default_poll_interval(),
            timeout: None,
        }
    }
}

/// `[runner]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRunner {
    #[serde(default = "default_echo_output")]
    pub echo_output: bool,
}

fn default_echo_output() -> bool {
    true
}

impl Default for RawRunner {
    fn default() -> Self {
        Self {
            echo_output: default_echo_output(),
        }
    }
}

/// `[fission]`, `[knative]`, `[kubeless]` and `[openfaas]` sections.
///
/// Unset keys take the platform's defaults. Keys that do not apply to a
/// platform (e.g. `gateway` under `[knative]`) are rejected during
/// validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPlatform {
    #[serde(default)]
    pub kubeconfig: Option<String>,

    #[serde(default)]
    pub settle: Option<String>,

    #[serde(default)]
    pub function_namespace: Option<String>,

    #[serde(default)]
    pub gateway: Option<String>,
}

pub const DEFAULT_KUBECONFIG_DIR: &str = "/app/kubeconfigs";
pub const FISSION_FUNCTION_NAMESPACE: &str = "fission-function";
pub const OPENFAAS_FUNCTION_NAMESPACE: &str = "openfaas-fn";
pub const OPENFAAS_GATEWAY: &str = "http://gateway.openfaas:8080";

/// Validated settings handed to the stack backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub polling: PollingSettings,
    pub runner: RunnerSettings,
    pub fission: FissionSettings,
    pub knative: PlatformSettings,
    pub kubeless: PlatformSettings,
    pub openfaas: OpenFaasSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingSettings {
    pub interval: Duration,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerSettings {
    pub echo_output: bool,
}

/// What every platform needs: where its cluster lives and how long to let
/// it settle after a deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSettings {
    pub kubeconfig: Option<PathBuf>,
    pub settle: Duration,
}

impl PlatformSettings {
    pub fn new(platform: &str, settle: Duration) -> Self {
        Self {
            kubeconfig: Some(default_kubeconfig(platform)),
            settle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FissionSettings {
    pub platform: PlatformSettings,
    pub function_namespace: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenFaasSettings {
    pub platform: PlatformSettings,
    pub gateway: String,
    pub function_namespace: String,
}

pub fn default_kubeconfig(platform: &str) -> PathBuf {
    PathBuf::from(DEFAULT_KUBECONFIG_DIR).join(format!("kubeconfig_{platform}"))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            polling: PollingSettings {
                interval: Duration::from_secs(5),
                timeout: None,
            },
            runner: RunnerSettings { echo_output: true },
            fission: FissionSettings {
                platform: PlatformSettings::new("fission", Duration::from_secs(10)),
                function_namespace: FISSION_FUNCTION_NAMESPACE.to_string(),
            },
            knative: PlatformSettings::new("knative", Duration::ZERO),
            kubeless: PlatformSettings::new("kubeless", Duration::from_secs(5)),
            openfaas: OpenFaasSettings {
                platform: PlatformSettings::new("openfaas", Duration::ZERO),
                gateway: OPENFAAS_GATEWAY.to_string(),
                function_namespace: OPENFAAS_FUNCTION_NAMESPACE.to_string(),
            },
        }
    }
}
