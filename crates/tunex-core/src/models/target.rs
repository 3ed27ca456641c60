use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{CoreError, CoreErrorKind};

/// Compilation target in the conventional `"<kind> -attr=value ..."` form.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub kind: String,
    pub device: Option<String>,
    pub keys: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub host: Option<Box<Target>>,
}

impl Target {
    pub fn new(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        let keys = default_keys(&kind, None);
        Self {
            kind,
            device: None,
            keys,
            attrs: BTreeMap::new(),
            host: None,
        }
    }

    pub fn parse(spec: &str) -> Result<Self, CoreError> {
        let mut tokens = spec.split_whitespace();
        let kind = tokens
            .next()
            .ok_or_else(|| invalid_target(spec, "target string is empty"))?;
        if kind.starts_with('-') {
            return Err(invalid_target(spec, "target kind must come first"));
        }

        let mut target = Target::new(kind);
        let mut explicit_keys = None;
        for token in tokens {
            let option = token
                .strip_prefix('-')
                .ok_or_else(|| invalid_target(spec, &format!("unexpected token '{token}'")))?;
            let (name, value) = option.split_once('=').unwrap_or((option, "true"));
            if name.is_empty() {
                return Err(invalid_target(spec, "option name is empty"));
            }
            match name {
                "device" => target.device = Some(value.to_string()),
                "keys" => {
                    explicit_keys = Some(
                        value
                            .split(',')
                            .filter(|key| !key.is_empty())
                            .map(str::to_string)
                            .collect::<Vec<_>>(),
                    );
                }
                _ => {
                    target.attrs.insert(name.to_string(), value.to_string());
                }
            }
        }

        target.keys = explicit_keys
            .unwrap_or_else(|| default_keys(&target.kind, target.device.as_deref()));
        Ok(target)
    }

    pub fn with_host(mut self, host: Target) -> Self {
        self.host = Some(Box::new(host));
        self
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device.as_deref()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

impl FromStr for Target {
    type Err = CoreError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        Target::parse(spec)
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(device) = &self.device {
            write!(f, " -device={device}")?;
        }
        if self.keys != default_keys(&self.kind, self.device.as_deref()) {
            write!(f, " -keys={}", self.keys.join(","))?;
        }
        for (name, value) in &self.attrs {
            write!(f, " -{name}={value}")?;
        }
        Ok(())
    }
}

/// Canonical `(target, host)` pair produced by target resolution.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TargetPair {
    pub target: Target,
    pub host: Option<Target>,
}

fn default_keys(kind: &str, device: Option<&str>) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(device) = device {
        keys.push(device.to_string());
    }
    match kind {
        "llvm" | "c" => keys.push("cpu".to_string()),
        "cuda" | "rocm" | "opencl" | "vulkan" | "metal" => {
            keys.push(kind.to_string());
            keys.push("gpu".to_string());
        }
        other => keys.push(other.to_string()),
    }
    keys
}

fn invalid_target(spec: &str, reason: &str) -> CoreError {
    CoreError {
        operator: None,
        program: None,
        kind: CoreErrorKind::TargetResolution,
        message: format!("invalid target '{spec}': {reason}"),
    }
}
