// src/types.rs

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

/// The FaaS platform a stack is deployed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum BackendKind {
    Fission,
    Knative,
    Kubeless,
    #[value(name = "openfaas")]
    OpenFaas,
}

impl BackendKind {
    pub const ALL: [BackendKind; 4] = [
        BackendKind::Fission,
        BackendKind::Knative,
        BackendKind::Kubeless,
        BackendKind::OpenFaas,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Fission => "fission",
            BackendKind::Knative => "knative",
            BackendKind::Kubeless => "kubeless",
            BackendKind::OpenFaas => "openfaas",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fission" => Ok(BackendKind::Fission),
            "knative" => Ok(BackendKind::Knative),
            "kubeless" => Ok(BackendKind::Kubeless),
            "openfaas" => Ok(BackendKind::OpenFaas),
            other => Err(format!(
                "invalid backend: {other} (expected \"fission\", \"knative\", \"kubeless\" or \"openfaas\")"
            )),
        }
    }
}
