use std::sync::Arc;

use tracing::{debug, error};

use crate::operator_i18n;
use crate::wizard::commands::{CommandContext, CommandDispatcher};
use crate::wizard::console::{Console, Palette};
use crate::wizard::error::{InputValidationError, WizardError};
use crate::wizard::execution::{DEFAULT_MAX_PROMPT_ATTEMPTS, ExecutionHandler};
use crate::wizard::history::NavigationHistory;
use crate::wizard::menu::{Menu, MenuEntry, MenuFactory, MenuTarget};
use crate::wizard::registry::RegistrySnapshot;
use crate::wizard::{Step, WizardExit};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    MenuDisplayed,
    AwaitingSelection,
    Executing,
    Terminated,
}

#[derive(Clone, Copy, Debug)]
pub struct EngineOptions {
    pub palette: Palette,
    /// Invalid answers tolerated per parameter; zero disables the limit.
    pub max_prompt_attempts: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            palette: Palette::plain(),
            max_prompt_attempts: DEFAULT_MAX_PROMPT_ATTEMPTS,
        }
    }
}

/// The interactive root loop: display, select, resolve, act, repeat.
pub struct WizardEngine<C> {
    console: C,
    snapshot: RegistrySnapshot,
    factory: MenuFactory,
    history: NavigationHistory,
    dispatcher: CommandDispatcher,
    executor: ExecutionHandler,
    palette: Palette,
    state: EngineState,
}

impl<C: Console> WizardEngine<C> {
    pub fn new(console: C, snapshot: RegistrySnapshot, options: EngineOptions) -> Self {
        Self {
            console,
            snapshot,
            factory: MenuFactory::default(),
            history: NavigationHistory::new(),
            dispatcher: CommandDispatcher::new(),
            executor: ExecutionHandler::new(options.palette, options.max_prompt_attempts),
            palette: options.palette,
            state: EngineState::Idle,
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: CommandDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    /// Run the session until the user quits, declines to continue or the
    /// input runs out. Only fatal errors are returned as `Err`.
    pub fn run(&mut self) -> Result<WizardExit, WizardError> {
        let outcome = self.run_loop();
        self.state = EngineState::Terminated;
        match &outcome {
            Ok(exit) => debug!(exit = ?exit, "wizard: session finished"),
            Err(err) => error!(error = %err, "wizard: session aborted"),
        }
        outcome
    }

    fn run_loop(&mut self) -> Result<WizardExit, WizardError> {
        self.start()?;
        loop {
            let menu = self.current_menu()?;
            self.state = EngineState::MenuDisplayed;
            self.display(&menu)?;

            self.state = EngineState::AwaitingSelection;
            let Some(entry) = self.await_selection(&menu)? else {
                return Ok(WizardExit::InputExhausted);
            };

            if let Step::Exit(exit) = self.act(entry)? {
                return Ok(exit);
            }
        }
    }

    fn start(&mut self) -> Result<(), WizardError> {
        let welcome = operator_i18n::tr(
            "wizard.welcome",
            "Welcome to the operation wizard! Pick a provider to get started.",
        );
        self.console.write_line(&self.palette.cyan(&welcome))?;
        let top = self.factory.top_level(&self.snapshot)?;
        self.history.push(Arc::new(top));
        Ok(())
    }

    fn current_menu(&self) -> Result<Arc<Menu>, WizardError> {
        self.history.current().cloned().ok_or_else(|| {
            WizardError::NavigationConsistency("no current menu after start".to_string())
        })
    }

    fn display(&mut self, menu: &Menu) -> Result<(), WizardError> {
        self.console.write_line("")?;
        self.console.write_lines(&menu.render(self.palette))?;
        self.console.write_line("")
    }

    /// `None` when the input is exhausted.
    fn await_selection(&mut self, menu: &Menu) -> Result<Option<MenuEntry>, WizardError> {
        let prompt = operator_i18n::tr("wizard.prompt.selection", "Please select an option: ");
        loop {
            let Some(raw) = self.console.read_line(&prompt)? else {
                return Ok(None);
            };
            let key = raw.trim();
            if key.is_empty() {
                self.display(menu)?;
                self.console.write_line(&operator_i18n::tr(
                    "wizard.notice.empty_selection",
                    "Please choose one of the options above.",
                ))?;
                continue;
            }
            match menu.get(key) {
                Some(entry) => return Ok(Some(entry.clone())),
                None => {
                    let err = InputValidationError::UnknownSelection(key.to_string());
                    debug!(error = %err, "wizard: invalid selection");
                    self.display(menu)?;
                    let notice = operator_i18n::trf(
                        "wizard.notice.invalid_selection",
                        "Invalid selection, please try again. {} is not an option.",
                        &[key],
                    );
                    self.console.write_line(&self.palette.red(&notice))?;
                }
            }
        }
    }

    fn act(&mut self, entry: MenuEntry) -> Result<Step, WizardError> {
        match entry.target {
            MenuTarget::Provider(provider) => {
                debug!(provider = provider.name(), "wizard: entering provider");
                let nested = self.factory.nested(&provider)?;
                self.history.push(Arc::new(nested));
                Ok(Step::Continue)
            }
            MenuTarget::Command(command) => {
                let mut ctx = CommandContext {
                    history: &mut self.history,
                    console: &mut self.console,
                    palette: self.palette,
                };
                self.dispatcher.dispatch(command, &[], &mut ctx)
            }
            MenuTarget::Operation(operation) => {
                self.state = EngineState::Executing;
                self.executor.handle(&operation, &mut self.console)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::console::LineConsole;
    use crate::wizard::provider::{Operation, ParamSpec, Provider};
    use crate::wizard::registry::Registry;
    use serde_json::json;
    use std::io::Cursor;

    fn snapshot() -> RegistrySnapshot {
        let list_all = Operation::builder("list_all")
            .help("List every widget.")
            .param(ParamSpec::integer("limit").default_value(10))
            .handler(|args| {
                let limit = args.integer("limit")?;
                Ok(json!({ "limit": limit }))
            })
            .build()
            .unwrap();
        let mut registry = Registry::new();
        registry.register(
            Provider::builder("Widgets")
                .help("Widget inventory.")
                .operation(list_all)
                .build()
                .unwrap(),
        );
        registry.snapshot()
    }

    fn engine(input: &str) -> WizardEngine<LineConsole<Cursor<String>, Vec<u8>>> {
        let console = LineConsole::new(Cursor::new(input.to_string()), Vec::new());
        WizardEngine::new(console, snapshot(), EngineOptions::default())
    }

    fn output(engine: WizardEngine<LineConsole<Cursor<String>, Vec<u8>>>) -> String {
        String::from_utf8(engine.into_console().into_output()).unwrap()
    }

    #[test]
    fn exhausted_input_terminates() {
        let mut engine = engine("");
        assert_eq!(engine.run().unwrap(), WizardExit::InputExhausted);
        assert_eq!(engine.state(), EngineState::Terminated);
        assert_eq!(engine.history().depth(), 1);
    }

    #[test]
    fn provider_selection_goes_one_level_deeper() {
        let mut engine = engine("1\n");
        engine.run().unwrap();
        assert_eq!(engine.history().depth(), 2);
        assert_eq!(engine.history().current().unwrap().title(), "Widgets");
    }

    #[test]
    fn operation_selection_keeps_depth() {
        let mut engine = engine("1\n1\n\ny\n");
        assert_eq!(engine.run().unwrap(), WizardExit::InputExhausted);
        assert_eq!(engine.history().depth(), 2);
        let text = output(engine);
        assert!(text.contains("Input [Limit (default=10)]: "));
        assert!(text.contains("limit: 10"));
    }

    #[test]
    fn quit_from_nested_menu() {
        let mut engine = engine("1\nb\nf\nq\n1\n");
        assert_eq!(engine.run().unwrap(), WizardExit::Quit);
        assert_eq!(engine.history().depth(), 2);
        assert_eq!(engine.history().back_len(), 1);
    }

    #[test]
    fn invalid_and_empty_selection_redisplay_menu() {
        let mut engine = engine("\n9\nq\n");
        assert_eq!(engine.run().unwrap(), WizardExit::Quit);
        let text = output(engine);
        assert!(text.contains("Please choose one of the options above."));
        assert!(text.contains("9 is not an option."));
        assert_eq!(text.matches("1: Widgets").count(), 3);
    }
}
