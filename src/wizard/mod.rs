//! Interactive menu wizard over registered providers.

pub mod commands;
pub mod console;
pub mod engine;
pub mod error;
pub mod execution;
pub mod history;
pub mod menu;
pub mod provider;
pub mod registry;

pub use commands::{Command, CommandDispatcher};
pub use console::{Console, LineConsole, Palette};
pub use engine::{EngineOptions, EngineState, WizardEngine};
pub use error::{InputValidationError, OperationError, RegistrationError, WizardError};
pub use execution::{ArgumentCollector, ExecutionHandler};
pub use history::NavigationHistory;
pub use menu::{Menu, MenuEntry, MenuFactory, MenuTarget};
pub use provider::{
    ArgValue, Args, OptionsSource, Operation, OperationEntry, ParamSpec, ParamType, Provider,
};
pub use registry::{Registration, Registry, RegistrySnapshot};

/// How a wizard session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardExit {
    Quit,
    Declined,
    InputExhausted,
}

impl WizardExit {
    pub fn code(self) -> i32 {
        match self {
            WizardExit::Quit => 0,
            WizardExit::Declined => 2,
            WizardExit::InputExhausted => 130,
        }
    }
}

/// Whether the root loop keeps going after a command or an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit(WizardExit),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            WizardExit::Quit.code(),
            WizardExit::Declined.code(),
            WizardExit::InputExhausted.code(),
        ];
        assert_eq!(codes, [0, 2, 130]);
    }
}
