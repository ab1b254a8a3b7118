use serde_json::{Map, Value as JsonValue, json};

use crate::wizard::error::{OperationError, RegistrationError};
use crate::wizard::provider::{Operation, ParamSpec, Provider};

pub const REQUIRED_CREDENTIALS: [&str; 2] = ["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY"];
pub const OPTIONAL_CREDENTIALS: [&str; 1] = ["AWS_SESSION_TOKEN"];

pub fn provider(region: String) -> Result<Provider, RegistrationError> {
    let check_credentials = Operation::builder("check_credentials")
        .help("Reports which cloud credentials are exported in the environment.")
        .handler(|_| Ok(credential_report(|key| std::env::var(key).ok())))
        .build()?;

    let get_variable = Operation::builder("get_variable")
        .help("Reads one environment variable.")
        .param(ParamSpec::string("name"))
        .describe("name", "Name of the variable, e.g. HOME", None)
        .handler(|args| {
            let name = args.string("name")?.trim();
            std::env::var(name).map(JsonValue::String).map_err(|_| {
                OperationError::failed(format!("environment variable `{name}` is not set"))
            })
        })
        .build()?;

    let list_variables = Operation::builder("list_variables")
        .help("Lists environment variable names, optionally filtered by prefix.")
        .param(ParamSpec::string("prefix").default_value(""))
        .handler(|args| {
            let prefix = args.string("prefix")?.trim().to_string();
            let mut names = std::env::vars_os()
                .filter_map(|(key, _)| key.into_string().ok())
                .filter(|key| key.starts_with(&prefix))
                .collect::<Vec<_>>();
            names.sort();
            Ok(json!(names))
        })
        .build()?;

    let region_op = Operation::builder("region")
        .help("Shows the region configured for cloud operations.")
        .handler(move |_| Ok(JsonValue::String(region.clone())))
        .build()?;

    Provider::builder("EnvironmentAPI")
        .help("Environment: credentials and variables visible to the wizard.")
        .operation(check_credentials)
        .operation(get_variable)
        .operation(list_variables)
        .operation(region_op)
        .build()
}

/// Presence report for the credential variables; never includes values.
pub fn credential_report(lookup: impl Fn(&str) -> Option<String>) -> JsonValue {
    let present = |key: &str| lookup(key).is_some_and(|value| !value.is_empty());
    let mut report = Map::new();
    let mut ready = true;
    for key in REQUIRED_CREDENTIALS {
        let found = present(key);
        ready &= found;
        report.insert(key.to_string(), json!(if found { "present" } else { "missing" }));
    }
    for key in OPTIONAL_CREDENTIALS {
        let state = if present(key) { "present" } else { "not set" };
        report.insert(key.to_string(), json!(state));
    }
    report.insert("ready".to_string(), json!(ready));
    JsonValue::Object(report)
}
