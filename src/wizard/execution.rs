//! Argument collection and operation execution.
//!
//! Each declared parameter is prompted for in order and parsed against its
//! type tag; invalid input re-prompts the same parameter. Once every value is
//! known the operation runs and its outcome is printed.

use tracing::{debug, info};

use crate::operator_i18n;
use crate::wizard::console::{Console, Palette, render_value};
use crate::wizard::error::{InputValidationError, WizardError};
use crate::wizard::provider::{ArgValue, Args, Operation, ParamSpec, ParamType};
use crate::wizard::{Step, WizardExit};

pub const DEFAULT_MAX_PROMPT_ATTEMPTS: u32 = 10;

/// Parse raw console text against a type tag.
pub fn parse_value(raw: &str, ty: ParamType) -> Result<ArgValue, InputValidationError> {
    let parse_error = || InputValidationError::Parse {
        expected: ty,
        raw: raw.to_string(),
    };
    match ty {
        ParamType::String => Ok(ArgValue::String(raw.to_string())),
        ParamType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(ArgValue::Integer)
            .map_err(|_| parse_error()),
        ParamType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(ArgValue::Boolean(true)),
            "false" => Ok(ArgValue::Boolean(false)),
            _ => Err(parse_error()),
        },
        ParamType::StringList => Ok(ArgValue::StringList(
            raw.split_whitespace().map(str::to_string).collect(),
        )),
        ParamType::IntegerList => raw
            .split_whitespace()
            .map(str::parse::<i64>)
            .collect::<Result<Vec<_>, _>>()
            .map(ArgValue::IntegerList)
            .map_err(|_| parse_error()),
    }
}

/// Resolve one line of input for `param`: empty input falls back to the
/// default, or is rejected when there is none.
pub fn resolve_input(raw: &str, param: &ParamSpec) -> Result<ArgValue, InputValidationError> {
    let blank = match param.ty {
        ParamType::String => raw.is_empty(),
        _ => raw.trim().is_empty(),
    };
    if blank {
        return param
            .default
            .clone()
            .ok_or_else(|| InputValidationError::Required(param.name.clone()));
    }
    parse_value(raw, param.ty)
}

/// Outcome of collecting arguments for one operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Collected {
    Args(Args),
    /// The attempt limit was reached for `parameter`.
    Abandoned { parameter: String },
    Exhausted,
}

pub struct ArgumentCollector<'a> {
    console: &'a mut dyn Console,
    palette: Palette,
    max_attempts: u32,
}

impl<'a> ArgumentCollector<'a> {
    /// `max_attempts` of zero means no limit.
    pub fn new(console: &'a mut dyn Console, palette: Palette, max_attempts: u32) -> Self {
        Self {
            console,
            palette,
            max_attempts,
        }
    }

    pub fn collect(&mut self, operation: &Operation) -> Result<Collected, WizardError> {
        let mut args = Args::new();
        for param in operation.params() {
            self.describe(param)?;
            match self.prompt(param)? {
                Some(Some(value)) => args.insert(param.name.clone(), value),
                Some(None) => {
                    return Ok(Collected::Abandoned {
                        parameter: param.name.clone(),
                    });
                }
                None => return Ok(Collected::Exhausted),
            }
        }
        Ok(Collected::Args(args))
    }

    fn describe(&mut self, param: &ParamSpec) -> Result<(), WizardError> {
        if let Some(description) = &param.description {
            self.console.write_line("")?;
            self.console.write_line(&operator_i18n::trf(
                "wizard.param.description",
                "Description: {}",
                &[description],
            ))?;
        }
        if let Some(source) = &param.options {
            self.console.write_line(&operator_i18n::tr(
                "wizard.param.options",
                "The following options are available:",
            ))?;
            for option in source.resolve() {
                self.console.write_line(&format!("    {option}"))?;
            }
        }
        self.console.write_line(&operator_i18n::trf(
            "wizard.param.type",
            "Type: {}",
            &[param.ty.label()],
        ))
    }

    /// `None` on exhausted input, `Some(None)` when the attempt limit is hit.
    fn prompt(&mut self, param: &ParamSpec) -> Result<Option<Option<ArgValue>>, WizardError> {
        let prompt = match &param.default {
            Some(default) => operator_i18n::trf(
                "wizard.param.prompt_default",
                "Input [{} (default={})]: ",
                &[&param.title(), &default.to_string()],
            ),
            None => operator_i18n::trf("wizard.param.prompt", "Input [{}]: ", &[&param.title()]),
        };

        let mut attempts = 0u32;
        loop {
            let Some(raw) = self.console.read_line(&prompt)? else {
                return Ok(None);
            };
            match resolve_input(&raw, param) {
                Ok(value) => return Ok(Some(Some(value))),
                Err(err) => {
                    debug!(parameter = %param.name, error = %err, "wizard: rejected input");
                    let notice = match err {
                        InputValidationError::Required(_) => operator_i18n::tr(
                            "wizard.param.required",
                            "Please provide a value, this argument is required.",
                        ),
                        other => operator_i18n::trf(
                            "wizard.param.invalid",
                            "ERROR: Invalid type. Please try again ({})",
                            &[&other.to_string()],
                        ),
                    };
                    self.console.write_line(&self.palette.red(&notice))?;
                }
            }
            attempts += 1;
            if self.max_attempts != 0 && attempts >= self.max_attempts {
                return Ok(Some(None));
            }
        }
    }
}

/// Runs a selected operation end to end and asks whether to continue.
#[derive(Clone, Copy, Debug)]
pub struct ExecutionHandler {
    palette: Palette,
    max_attempts: u32,
}

impl Default for ExecutionHandler {
    fn default() -> Self {
        Self::new(Palette::plain(), DEFAULT_MAX_PROMPT_ATTEMPTS)
    }
}

impl ExecutionHandler {
    pub fn new(palette: Palette, max_attempts: u32) -> Self {
        Self {
            palette,
            max_attempts,
        }
    }

    pub fn handle(
        &self,
        operation: &Operation,
        console: &mut dyn Console,
    ) -> Result<Step, WizardError> {
        let collected =
            ArgumentCollector::new(&mut *console, self.palette, self.max_attempts)
                .collect(operation)?;
        match collected {
            Collected::Args(args) => {
                self.execute(operation, &args, console)?;
            }
            Collected::Abandoned { parameter } => {
                let notice = operator_i18n::trf(
                    "wizard.param.abandoned",
                    "Too many invalid attempts for {}; the operation was not run.",
                    &[&parameter],
                );
                console.write_line(&self.palette.red(&notice))?;
            }
            Collected::Exhausted => return Ok(Step::Exit(WizardExit::InputExhausted)),
        }
        self.ask_to_continue(console)
    }

    /// Invoke the operation and print its outcome. Returns whether it succeeded.
    pub fn execute(
        &self,
        operation: &Operation,
        args: &Args,
        console: &mut dyn Console,
    ) -> Result<bool, WizardError> {
        debug!(operation = operation.name(), args = args.len(), "wizard: invoking operation");
        console.write_line("")?;
        match operation.invoke(args) {
            Ok(result) => {
                let label = operator_i18n::tr("wizard.exec.success", "SUCCESS:");
                console.write_line(&self.palette.green(&label))?;
                console.write_lines(&render_value(&result, self.palette))?;
                console.write_line("")?;
                Ok(true)
            }
            Err(err) => {
                info!(operation = operation.name(), error = %err, "wizard: operation failed");
                let label = operator_i18n::tr("wizard.exec.failure", "ERROR:");
                console.write_line(&self.palette.red(&label))?;
                console.write_line(&self.palette.red(&err.to_string()))?;
                console.write_line("")?;
                Ok(false)
            }
        }
    }

    fn ask_to_continue(&self, console: &mut dyn Console) -> Result<Step, WizardError> {
        let prompt = operator_i18n::tr("wizard.exec.continue", "Continue? [Y/n]: ");
        match console.read_line(&prompt)? {
            None => Ok(Step::Exit(WizardExit::InputExhausted)),
            Some(answer) if answer.trim() == "n" => {
                let notice = operator_i18n::tr("wizard.exec.exit", "Exiting the wizard...");
                console.write_line(&self.palette.red(&notice))?;
                Ok(Step::Exit(WizardExit::Declined))
            }
            Some(_) => Ok(Step::Continue),
        }
    }
}
