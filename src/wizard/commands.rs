use std::collections::HashMap;

use tracing::{debug, error};

use crate::operator_i18n;
use crate::wizard::console::{Console, Palette};
use crate::wizard::error::WizardError;
use crate::wizard::history::NavigationHistory;
use crate::wizard::{Step, WizardExit};

/// Control actions available next to every menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    GoBack,
    GoForward,
    Quit,
}

impl Command {
    pub const ALL: [Command; 3] = [Command::GoBack, Command::GoForward, Command::Quit];

    pub fn key(self) -> char {
        match self {
            Command::GoBack => 'b',
            Command::GoForward => 'f',
            Command::Quit => 'q',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::GoBack => "GoBack",
            Command::GoForward => "GoForward",
            Command::Quit => "Quit",
        }
    }

    pub fn help(self) -> String {
        match self {
            Command::GoBack => operator_i18n::tr("wizard.command.back.help", "Go back."),
            Command::GoForward => operator_i18n::tr("wizard.command.forward.help", "Go forward."),
            Command::Quit => operator_i18n::tr("wizard.command.quit.help", "Exits the wizard."),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|command| key.len() == 1 && key.starts_with(command.key()))
    }
}

pub struct CommandContext<'a> {
    pub history: &'a mut NavigationHistory,
    pub console: &'a mut dyn Console,
    pub palette: Palette,
}

pub type CommandHandler = fn(&mut CommandContext<'_>) -> Result<Step, WizardError>;

/// Routes commands to their handlers by identity.
pub struct CommandDispatcher {
    handlers: HashMap<Command, CommandHandler>,
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDispatcher {
    pub fn new() -> Self {
        let mut dispatcher = Self::empty();
        dispatcher.handle(Command::Quit, handle_quit);
        dispatcher.handle(Command::GoBack, handle_go_back);
        dispatcher.handle(Command::GoForward, handle_go_forward);
        dispatcher
    }

    /// A dispatcher with no handlers; every command falls through.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn handle(&mut self, command: Command, handler: CommandHandler) {
        self.handlers.insert(command, handler);
    }

    pub fn dispatch(
        &self,
        command: Command,
        args: &[String],
        ctx: &mut CommandContext<'_>,
    ) -> Result<Step, WizardError> {
        match self.handlers.get(&command) {
            Some(handler) => {
                debug!(command = command.name(), "wizard: dispatching command");
                handler(ctx)
            }
            None => {
                error!(
                    command = ?command,
                    args = ?args,
                    "wizard: command isn't handled, ignoring"
                );
                Ok(Step::Continue)
            }
        }
    }
}

fn handle_quit(ctx: &mut CommandContext<'_>) -> Result<Step, WizardError> {
    let notice = operator_i18n::tr(
        "wizard.command.exiting",
        "Exiting the wizard, bye for now...",
    );
    ctx.console.write_line(&ctx.palette.red(&notice))?;
    Ok(Step::Exit(WizardExit::Quit))
}

fn handle_go_back(ctx: &mut CommandContext<'_>) -> Result<Step, WizardError> {
    ctx.console.write_line(&operator_i18n::tr(
        "wizard.command.going_back",
        "Going back...",
    ))?;
    if ctx.history.go_back().is_none() {
        ctx.console.write_line(&operator_i18n::tr(
            "wizard.command.at_first_menu",
            "Already at the first menu.",
        ))?;
    }
    Ok(Step::Continue)
}

fn handle_go_forward(ctx: &mut CommandContext<'_>) -> Result<Step, WizardError> {
    ctx.console.write_line(&operator_i18n::tr(
        "wizard.command.going_forward",
        "Going forward...",
    ))?;
    if ctx.history.go_forward().is_none() {
        ctx.console.write_line(&operator_i18n::tr(
            "wizard.command.at_last_menu",
            "Nothing to go forward to.",
        ))?;
    }
    Ok(Step::Continue)
}
