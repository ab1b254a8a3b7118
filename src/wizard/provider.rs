//! Declarative description of providers and the operations they expose.
//!
//! A [`Provider`] is assembled once at start-up through [`ProviderBuilder`];
//! every [`Operation`] carries its parameter descriptors explicitly so the
//! wizard never has to discover signatures at runtime.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value as JsonValue, json};

use crate::wizard::error::{OperationError, RegistrationError};

/// Semantic type tag of an operation parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamType {
    String,
    Integer,
    Boolean,
    #[serde(rename = "list-of-string")]
    StringList,
    #[serde(rename = "list-of-integer")]
    IntegerList,
}

impl ParamType {
    /// Human label shown before a parameter prompt.
    pub fn label(self) -> &'static str {
        match self {
            ParamType::String => "String",
            ParamType::Integer => "Int",
            ParamType::Boolean => "Boolean [True|False]",
            ParamType::StringList => "List of Strings",
            ParamType::IntegerList => "List of Integers",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
            ParamType::StringList => "list-of-string",
            ParamType::IntegerList => "list-of-integer",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed argument value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    StringList(Vec<String>),
    IntegerList(Vec<i64>),
}

impl ArgValue {
    pub fn param_type(&self) -> ParamType {
        match self {
            ArgValue::String(_) => ParamType::String,
            ArgValue::Integer(_) => ParamType::Integer,
            ArgValue::Boolean(_) => ParamType::Boolean,
            ArgValue::StringList(_) => ParamType::StringList,
            ArgValue::IntegerList(_) => ParamType::IntegerList,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            ArgValue::String(value) => json!(value),
            ArgValue::Integer(value) => json!(value),
            ArgValue::Boolean(value) => json!(value),
            ArgValue::StringList(values) => json!(values),
            ArgValue::IntegerList(values) => json!(values),
        }
    }
}

impl fmt::Display for ArgValue {
    /// Renders the value the way a user would type it at the prompt.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::String(value) => f.write_str(value),
            ArgValue::Integer(value) => write!(f, "{value}"),
            ArgValue::Boolean(true) => f.write_str("True"),
            ArgValue::Boolean(false) => f.write_str("False"),
            ArgValue::StringList(values) => f.write_str(&values.join(" ")),
            ArgValue::IntegerList(values) => {
                let rendered = values
                    .iter()
                    .map(|value| value.to_string())
                    .collect::<Vec<_>>();
                f.write_str(&rendered.join(" "))
            }
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::String(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::String(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Integer(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Integer(i64::from(value))
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Boolean(value)
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(values: Vec<String>) -> Self {
        ArgValue::StringList(values)
    }
}

impl From<Vec<i64>> for ArgValue {
    fn from(values: Vec<i64>) -> Self {
        ArgValue::IntegerList(values)
    }
}

pub type OptionsProducer = Arc<dyn Fn() -> Vec<String> + Send + Sync>;

/// Where the selectable options of a parameter come from.
#[derive(Clone)]
pub enum OptionsSource {
    Static(Vec<String>),
    /// Evaluated each time the parameter is prompted for.
    Lazy(OptionsProducer),
}

impl OptionsSource {
    pub fn fixed<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Static(options.into_iter().map(Into::into).collect())
    }

    pub fn lazy(producer: impl Fn() -> Vec<String> + Send + Sync + 'static) -> Self {
        Self::Lazy(Arc::new(producer))
    }

    pub fn resolve(&self) -> Vec<String> {
        match self {
            OptionsSource::Static(options) => options.clone(),
            OptionsSource::Lazy(producer) => producer(),
        }
    }
}

impl fmt::Debug for OptionsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsSource::Static(options) => f.debug_tuple("Static").field(options).finish(),
            OptionsSource::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ParamSpec {
    pub name: String,
    pub ty: ParamType,
    pub default: Option<ArgValue>,
    pub description: Option<String>,
    pub options: Option<OptionsSource>,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            description: None,
            options: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Integer)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Boolean)
    }

    pub fn string_list(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::StringList)
    }

    pub fn integer_list(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::IntegerList)
    }

    pub fn default_value(mut self, value: impl Into<ArgValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Prompt label: `role_name` becomes `Role Name`.
    pub fn title(&self) -> String {
        title_case(&self.name)
    }
}

pub type OperationFn = Arc<dyn Fn(&Args) -> Result<JsonValue, OperationError> + Send + Sync>;

/// Arguments collected for one invocation, keyed by parameter name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    values: BTreeMap<String, ArgValue>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    fn require(&self, name: &str) -> Result<&ArgValue, OperationError> {
        self.values
            .get(name)
            .ok_or_else(|| OperationError::MissingArgument(name.to_string()))
    }

    pub fn string(&self, name: &str) -> Result<&str, OperationError> {
        match self.require(name)? {
            ArgValue::String(value) => Ok(value),
            _ => Err(type_error(name, ParamType::String)),
        }
    }

    pub fn integer(&self, name: &str) -> Result<i64, OperationError> {
        match self.require(name)? {
            ArgValue::Integer(value) => Ok(*value),
            _ => Err(type_error(name, ParamType::Integer)),
        }
    }

    pub fn boolean(&self, name: &str) -> Result<bool, OperationError> {
        match self.require(name)? {
            ArgValue::Boolean(value) => Ok(*value),
            _ => Err(type_error(name, ParamType::Boolean)),
        }
    }

    pub fn strings(&self, name: &str) -> Result<&[String], OperationError> {
        match self.require(name)? {
            ArgValue::StringList(values) => Ok(values),
            _ => Err(type_error(name, ParamType::StringList)),
        }
    }

    pub fn integers(&self, name: &str) -> Result<&[i64], OperationError> {
        match self.require(name)? {
            ArgValue::IntegerList(values) => Ok(values),
            _ => Err(type_error(name, ParamType::IntegerList)),
        }
    }
}

fn type_error(name: &str, expected: ParamType) -> OperationError {
    OperationError::ArgumentType {
        name: name.to_string(),
        expected,
    }
}

/// A leaf callable with an explicit parameter signature.
#[derive(Clone)]
pub struct Operation {
    name: String,
    help: String,
    params: Vec<ParamSpec>,
    handler: OperationFn,
}

impl Operation {
    pub fn builder(name: impl Into<String>) -> OperationBuilder {
        OperationBuilder {
            name: name.into(),
            help: String::new(),
            params: Vec::new(),
            descriptions: Vec::new(),
            handler: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Menu label: `list_all` becomes `List All`.
    pub fn display_name(&self) -> String {
        title_case(&self.name)
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|param| param.name == name)
    }

    pub fn invoke(&self, args: &Args) -> Result<JsonValue, OperationError> {
        (self.handler)(args)
    }

    /// `name(limit: integer = 10, tags: list-of-string)`
    pub fn signature(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|param| match &param.default {
                Some(default) => format!("{}: {} = {}", param.name, param.ty, default),
                None => format!("{}: {}", param.name, param.ty),
            })
            .collect::<Vec<_>>();
        format!("{}({})", self.name, params.join(", "))
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

struct ParamDescription {
    parameter: String,
    description: String,
    options: Option<OptionsSource>,
}

pub struct OperationBuilder {
    name: String,
    help: String,
    params: Vec<ParamSpec>,
    descriptions: Vec<ParamDescription>,
    handler: Option<OperationFn>,
}

impl OperationBuilder {
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Attach a human description and optional options source to a declared
    /// parameter. Describing an undeclared parameter fails at [`Self::build`].
    pub fn describe(
        mut self,
        parameter: impl Into<String>,
        description: impl Into<String>,
        options: Option<OptionsSource>,
    ) -> Self {
        self.descriptions.push(ParamDescription {
            parameter: parameter.into(),
            description: description.into(),
            options,
        });
        self
    }

    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Args) -> Result<JsonValue, OperationError> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> Result<Operation, RegistrationError> {
        let Self {
            name,
            help,
            mut params,
            descriptions,
            handler,
        } = self;

        let mut seen = BTreeSet::new();
        for param in &params {
            if !seen.insert(param.name.as_str()) {
                return Err(RegistrationError::DuplicateParameter {
                    operation: name,
                    parameter: param.name.clone(),
                });
            }
            if let Some(default) = &param.default
                && default.param_type() != param.ty
            {
                return Err(RegistrationError::DefaultTypeMismatch {
                    operation: name.clone(),
                    parameter: param.name.clone(),
                    expected: param.ty,
                });
            }
        }

        for described in descriptions {
            let Some(param) = params
                .iter_mut()
                .find(|param| param.name == described.parameter)
            else {
                return Err(RegistrationError::UnknownParameter {
                    operation: name,
                    parameter: described.parameter,
                });
            };
            param.description = Some(described.description);
            if described.options.is_some() {
                param.options = described.options;
            }
        }

        let handler = handler.ok_or_else(|| RegistrationError::MissingHandler(name.clone()))?;
        Ok(Operation {
            name,
            help,
            params,
            handler,
        })
    }
}

/// An operation together with the stable menu key its provider assigned.
#[derive(Clone, Debug)]
pub struct OperationEntry {
    pub key: String,
    pub operation: Arc<Operation>,
}

/// A named, documented group of operations shown as one menu.
#[derive(Clone, Debug)]
pub struct Provider {
    name: String,
    help: String,
    operations: Vec<OperationEntry>,
}

impl Provider {
    pub fn builder(name: impl Into<String>) -> ProviderBuilder {
        ProviderBuilder {
            name: name.into(),
            help: String::new(),
            operations: Vec::new(),
            curated: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name without its trailing `API` marker, e.g. `S3API` becomes `S3`.
    pub fn display_name(&self) -> String {
        let trimmed = self.name.trim_end();
        let stripped = trimmed
            .strip_suffix("API")
            .or_else(|| trimmed.strip_suffix("Api"))
            .unwrap_or(trimmed)
            .trim();
        if stripped.is_empty() {
            trimmed.to_string()
        } else {
            stripped.to_string()
        }
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn operations(&self) -> &[OperationEntry] {
        &self.operations
    }

    pub fn has_operations(&self) -> bool {
        !self.operations.is_empty()
    }

    /// Look an operation up by its snake name, menu key or display name.
    pub fn find_operation(&self, needle: &str) -> Option<&OperationEntry> {
        let needle = needle.trim();
        self.operations.iter().find(|entry| {
            entry.key == needle
                || entry.operation.name() == needle
                || entry.operation.name() == needle.replace('-', "_")
                || entry.operation.display_name().eq_ignore_ascii_case(needle)
        })
    }
}

pub struct ProviderBuilder {
    name: String,
    help: String,
    operations: Vec<Operation>,
    curated: Option<Vec<String>>,
}

impl ProviderBuilder {
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Expose only the named operations, in the given order.
    pub fn curate<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.curated = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<Provider, RegistrationError> {
        let Self {
            name,
            help,
            operations,
            curated,
        } = self;

        let mut by_name: BTreeMap<String, Operation> = BTreeMap::new();
        let mut declared = Vec::with_capacity(operations.len());
        for operation in operations {
            let op_name = operation.name().to_string();
            if by_name.insert(op_name.clone(), operation).is_some() {
                return Err(RegistrationError::DuplicateOperation {
                    provider: name,
                    operation: op_name,
                });
            }
            declared.push(op_name);
        }

        let order = match curated {
            Some(curated) => {
                if let Some(unknown) = curated.iter().find(|op| !by_name.contains_key(*op)) {
                    return Err(RegistrationError::UnknownCuratedOperation {
                        provider: name.clone(),
                        operation: unknown.clone(),
                    });
                }
                curated
            }
            None => declared,
        };

        let mut entries = Vec::with_capacity(order.len());
        for op_name in order {
            if let Some(operation) = by_name.remove(&op_name) {
                entries.push(OperationEntry {
                    key: (entries.len() + 1).to_string(),
                    operation: Arc::new(operation),
                });
            }
        }

        Ok(Provider {
            name,
            help,
            operations: entries,
        })
    }
}

pub(crate) fn title_case(raw: &str) -> String {
    raw.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
