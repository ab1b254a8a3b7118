//! One-shot, non-interactive routing: `opwiz run <provider> <operation> [args]`.

use std::sync::Arc;

use anyhow::{Context, anyhow};
use serde_json::{Value as JsonValue, json};

use crate::wizard::execution::parse_value;
use crate::wizard::provider::{Args, Operation, Provider};
use crate::wizard::registry::RegistrySnapshot;

#[derive(Clone, Debug)]
pub struct RunRequest {
    pub provider: String,
    pub operation: String,
    /// `name=value` pairs or positional values, filled in declaration order.
    pub arguments: Vec<String>,
}

pub fn resolve_provider(snapshot: &RegistrySnapshot, name: &str) -> anyhow::Result<Arc<Provider>> {
    snapshot.find(name).cloned().ok_or_else(|| {
        let available = snapshot
            .providers()
            .iter()
            .map(|provider| provider.display_name())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow!("unknown provider `{name}`; available providers: {available}")
    })
}

pub fn resolve_operation(provider: &Provider, name: &str) -> anyhow::Result<Arc<Operation>> {
    provider
        .find_operation(name)
        .map(|entry| entry.operation.clone())
        .ok_or_else(|| {
            let available = provider
                .operations()
                .iter()
                .map(|entry| entry.operation.name())
                .collect::<Vec<_>>()
                .join(", ");
            anyhow!(
                "unknown operation `{name}` for {}; available operations: {available}",
                provider.display_name()
            )
        })
}

/// Bind raw arguments to the operation's parameters, filling defaults.
pub fn bind_arguments(operation: &Operation, raw: &[String]) -> anyhow::Result<Args> {
    let mut args = Args::new();
    let mut positional = operation.params().iter();

    for item in raw {
        let named = item.split_once('=').and_then(|(name, value)| {
            operation.param(name.trim()).map(|param| (param, value))
        });
        let (param, value) = match named {
            Some(bound) => bound,
            None => {
                let param = positional
                    .find(|param| !args.contains(&param.name))
                    .ok_or_else(|| {
                        anyhow!(
                            "too many arguments for `{}`: `{item}` is not expected",
                            operation.name()
                        )
                    })?;
                (param, item.as_str())
            }
        };
        if args.contains(&param.name) {
            return Err(anyhow!("argument `{}` given more than once", param.name));
        }
        let value = parse_value(value, param.ty)
            .with_context(|| format!("invalid value for `{}`", param.name))?;
        args.insert(param.name.clone(), value);
    }

    for param in operation.params() {
        if args.contains(&param.name) {
            continue;
        }
        let default = param
            .default
            .clone()
            .ok_or_else(|| anyhow!("missing required argument `{}`", param.name))?;
        args.insert(param.name.clone(), default);
    }
    Ok(args)
}

pub fn run(snapshot: &RegistrySnapshot, request: &RunRequest) -> anyhow::Result<JsonValue> {
    let provider = resolve_provider(snapshot, &request.provider)?;
    let operation = resolve_operation(&provider, &request.operation)?;
    let args = bind_arguments(&operation, &request.arguments)?;
    tracing::info!(
        provider = provider.name(),
        operation = operation.name(),
        "router: invoking operation"
    );
    operation
        .invoke(&args)
        .with_context(|| format!("{}.{} failed", provider.display_name(), operation.name()))
}

/// The registered catalog as JSON, for `opwiz list --json`.
pub fn catalog(snapshot: &RegistrySnapshot) -> JsonValue {
    let providers = snapshot
        .providers()
        .iter()
        .map(|provider| {
            let operations = provider
                .operations()
                .iter()
                .map(|entry| {
                    let params = entry
                        .operation
                        .params()
                        .iter()
                        .map(|param| {
                            json!({
                                "name": param.name,
                                "type": param.ty,
                                "default": param.default.as_ref().map(|value| value.to_json()),
                                "description": param.description,
                            })
                        })
                        .collect::<Vec<_>>();
                    json!({
                        "key": entry.key,
                        "name": entry.operation.name(),
                        "help": entry.operation.help(),
                        "params": params,
                    })
                })
                .collect::<Vec<_>>();
            json!({
                "name": provider.name(),
                "display_name": provider.display_name(),
                "help": provider.help(),
                "operations": operations,
            })
        })
        .collect::<Vec<_>>();
    json!({ "providers": providers })
}

/// Human-readable catalog listing.
pub fn render_catalog(snapshot: &RegistrySnapshot) -> Vec<String> {
    let mut lines = Vec::new();
    for provider in snapshot.providers() {
        lines.push(format!("{}  {}", provider.display_name(), provider.help()));
        for entry in provider.operations() {
            lines.push(format!(
                "  {}. {}  {}",
                entry.key,
                entry.operation.signature(),
                entry.operation.help()
            ));
        }
    }
    lines
}
