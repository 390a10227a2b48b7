// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::config::duration::parse_duration;
use crate::config::model::{
    FissionSettings, OpenFaasSettings, PlatformSettings, PollingSettings, RawPlatform,
    RawSettings, RunnerSettings, Settings,
};
use crate::errors::{Result, StackError};

impl TryFrom<RawSettings> for Settings {
    type Error = StackError;

    fn try_from(raw: RawSettings) -> std::result::Result<Self, Self::Error> {
        let defaults = Settings::default();

        let polling = validate_polling(&raw)?;
        let runner = RunnerSettings {
            echo_output: raw.runner.echo_output,
        };

        ensure_unset("fission", "gateway", &raw.fission.gateway)?;
        let fission = FissionSettings {
            platform: validate_platform("fission", &raw.fission, &defaults.fission.platform)?,
            function_namespace: non_empty_setting(
                "fission.function_namespace",
                raw.fission.function_namespace.as_deref(),
                &defaults.fission.function_namespace,
            )?,
        };

        ensure_unset("knative", "gateway", &raw.knative.gateway)?;
        ensure_unset("knative", "function_namespace", &raw.knative.function_namespace)?;
        let knative = validate_platform("knative", &raw.knative, &defaults.knative)?;

        ensure_unset("kubeless", "gateway", &raw.kubeless.gateway)?;
        ensure_unset("kubeless", "function_namespace", &raw.kubeless.function_namespace)?;
        let kubeless = validate_platform("kubeless", &raw.kubeless, &defaults.kubeless)?;

        let openfaas = OpenFaasSettings {
            platform: validate_platform("openfaas", &raw.openfaas, &defaults.openfaas.platform)?,
            gateway: non_empty_setting(
                "openfaas.gateway",
                raw.openfaas.gateway.as_deref(),
                &defaults.openfaas.gateway,
            )?,
            function_namespace: non_empty_setting(
                "openfaas.function_namespace",
                raw.openfaas.function_namespace.as_deref(),
                &defaults.openfaas.function_namespace,
            )?,
        };

        Ok(Settings {
            polling,
            runner,
            fission,
            knative,
            kubeless,
            openfaas,
        })
    }
}

fn validate_polling(raw: &RawSettings) -> Result<PollingSettings> {
    let interval = duration_setting("polling.interval", &raw.polling.interval)?;
    if interval.is_zero() {
        return Err(StackError::Config(
            "[polling].interval must be greater than zero".to_string(),
        ));
    }

    let timeout = raw
        .polling
        .timeout
        .as_deref()
        .map(|t| duration_setting("polling.timeout", t))
        .transpose()?;

    Ok(PollingSettings { interval, timeout })
}

fn validate_platform(
    section: &str,
    raw: &RawPlatform,
    defaults: &PlatformSettings,
) -> Result<PlatformSettings> {
    let kubeconfig = match raw.kubeconfig.as_deref() {
        None => defaults.kubeconfig.clone(),
        Some("") => None,
        Some(path) => Some(PathBuf::from(path)),
    };

    let settle = match raw.settle.as_deref() {
        None => defaults.settle,
        Some(s) => duration_setting(&format!("{section}.settle"), s)?,
    };

    Ok(PlatformSettings { kubeconfig, settle })
}

fn ensure_unset(section: &str, key: &str, value: &Option<String>) -> Result<()> {
    if value.is_some() {
        return Err(StackError::Config(format!(
            "[{section}] does not support `{key}`"
        )));
    }
    Ok(())
}

fn duration_setting(key: &str, value: &str) -> Result<Duration> {
    parse_duration(value).map_err(|e| StackError::Config(format!("{key}: {e}")))
}

fn non_empty_setting(key: &str, value: Option<&str>, default: &str) -> Result<String> {
    match value {
        None => Ok(default.to_string()),
        Some(v) if v.trim().is_empty() => {
            Err(StackError::Config(format!("{key} must not be empty")))
        }
        Some(v) => Ok(v.trim().to_string()),
    }
}
