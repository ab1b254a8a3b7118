use std::io::Write;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};

use crate::operator_i18n;
use crate::operator_log;
use crate::providers;
use crate::router::{self, RunRequest};
use crate::settings::{self, ColorMode, WizardSettings};
use crate::wizard::console::{LineConsole, Palette, render_value};
use crate::wizard::engine::{EngineOptions, WizardEngine};
use crate::wizard::registry::{self, RegistrySnapshot};

#[derive(Parser)]
#[command(name = "opwiz")]
#[command(about = "Interactive wizard for running provider operations", version)]
pub struct Cli {
    #[arg(long, global = true, help = "CLI locale (for translated output).")]
    locale: Option<String>,
    #[arg(long, global = true, value_enum, help = "Colorize output.")]
    color: Option<ColorMode>,
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Start the interactive wizard (default)")]
    Wizard(WizardArgs),
    #[command(about = "List registered providers and their operations")]
    List(ListArgs),
    #[command(about = "Run a single operation without the menus")]
    Run(RunArgs),
    #[command(about = "Inspect or change persisted settings")]
    Config(ConfigCommand),
}

#[derive(Parser, Default)]
struct WizardArgs {
    #[arg(
        long,
        help = "Invalid answers tolerated per parameter before giving up (0 = unlimited)."
    )]
    max_attempts: Option<u32>,
}

#[derive(Parser)]
struct ListArgs {
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct RunArgs {
    provider: String,
    operation: String,
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Arguments as name=value pairs or positional values."
    )]
    args: Vec<String>,
    #[arg(long, help = "Print the raw JSON result.")]
    json: bool,
}

#[derive(Parser)]
struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    #[command(about = "Print the effective settings")]
    Show,
    #[command(about = "Persist the default locale")]
    SetLocale(SetLocaleArgs),
    #[command(about = "Print the settings file path")]
    Path,
}

#[derive(Parser)]
struct SetLocaleArgs {
    #[arg(value_name = "LOCALE")]
    tag: String,
}

struct AppCtx {
    settings: WizardSettings,
    palette: Palette,
}

impl Cli {
    /// Run the selected command and return the process exit code.
    pub fn run(self) -> anyhow::Result<i32> {
        let settings = settings::load_settings()?;
        let level =
            operator_log::resolve_level(self.verbose, self.quiet, settings.log_level.as_deref());
        operator_log::init(level)?;

        let requested = self.locale.as_deref().or(settings.locale.as_deref());
        let selected_locale = operator_i18n::select_locale(requested);
        operator_i18n::set_locale(&selected_locale);

        let color = self.color.unwrap_or(settings.color);
        let ctx = AppCtx {
            palette: Palette::new(color.enabled()),
            settings,
        };
        match self.command.unwrap_or(Command::Wizard(WizardArgs::default())) {
            Command::Wizard(args) => args.run(&ctx),
            Command::List(args) => args.run(&ctx),
            Command::Run(args) => args.run(&ctx),
            Command::Config(config) => config.run(&ctx),
        }
    }
}

impl AppCtx {
    fn snapshot(&self) -> RegistrySnapshot {
        let added = providers::register_builtin_global(&self.settings);
        tracing::debug!(added, "cli: built-in providers registered");
        registry::global_snapshot()
    }
}

impl WizardArgs {
    fn run(self, ctx: &AppCtx) -> anyhow::Result<i32> {
        let options = EngineOptions {
            palette: ctx.palette,
            max_prompt_attempts: self
                .max_attempts
                .unwrap_or(ctx.settings.max_prompt_attempts),
        };
        let mut engine = WizardEngine::new(LineConsole::stdio(), ctx.snapshot(), options);
        let exit = engine.run().context("wizard session failed")?;
        Ok(exit.code())
    }
}

impl ListArgs {
    fn run(self, ctx: &AppCtx) -> anyhow::Result<i32> {
        let snapshot = ctx.snapshot();
        let mut stdout = std::io::stdout().lock();
        if self.json {
            let catalog = router::catalog(&snapshot);
            writeln!(stdout, "{}", serde_json::to_string_pretty(&catalog)?)?;
        } else {
            for line in router::render_catalog(&snapshot) {
                writeln!(stdout, "{line}")?;
            }
        }
        Ok(0)
    }
}

impl RunArgs {
    fn run(self, ctx: &AppCtx) -> anyhow::Result<i32> {
        let request = RunRequest {
            provider: self.provider,
            operation: self.operation,
            arguments: self.args,
        };
        let result = router::run(&ctx.snapshot(), &request)?;
        let mut stdout = std::io::stdout().lock();
        if self.json {
            writeln!(stdout, "{}", serde_json::to_string_pretty(&result)?)?;
        } else {
            for line in render_value(&result, ctx.palette) {
                writeln!(stdout, "{line}")?;
            }
        }
        Ok(0)
    }
}

impl ConfigCommand {
    fn run(self, ctx: &AppCtx) -> anyhow::Result<i32> {
        let mut stdout = std::io::stdout().lock();
        match self.command {
            ConfigSubcommand::Show => {
                write!(stdout, "{}", serde_yaml_bw::to_string(&ctx.settings)?)?;
            }
            ConfigSubcommand::Path => {
                writeln!(stdout, "{}", settings::settings_path()?.display())?;
            }
            ConfigSubcommand::SetLocale(args) => {
                let locale = operator_i18n::supported_locale(&args.tag).ok_or_else(|| {
                    anyhow!(
                        "unsupported locale `{}`; supported locales: {}",
                        args.tag,
                        operator_i18n::supported_locales().join(", ")
                    )
                })?;
                let mut settings = ctx.settings.clone();
                settings.locale = Some(locale.clone());
                settings::save_settings(&settings)?;
                let message = operator_i18n::trf(
                    "cli.config.locale_saved",
                    "Default locale set to {}.",
                    &[&locale],
                );
                writeln!(stdout, "{message}")?;
            }
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_defaults_to_wizard() {
        let cli = Cli::try_parse_from(["opwiz", "--locale", "de"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.locale.as_deref(), Some("de"));
    }

    #[test]
    fn run_collects_trailing_arguments() {
        let cli =
            Cli::try_parse_from(["opwiz", "run", "math", "divide", "7", "divisor=2"]).unwrap();
        let Some(Command::Run(args)) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.provider, "math");
        assert_eq!(args.operation, "divide");
        assert_eq!(args.args, vec!["7".to_string(), "divisor=2".to_string()]);
    }

    #[test]
    fn set_locale_tag_does_not_replace_global_locale() {
        let cli = Cli::try_parse_from(["opwiz", "--locale", "en", "config", "set-locale", "de_DE"])
            .unwrap();
        assert_eq!(cli.locale.as_deref(), Some("en"));
        let Some(Command::Config(config)) = cli.command else {
            panic!("expected config command");
        };
        let ConfigSubcommand::SetLocale(args) = config.command else {
            panic!("expected set-locale");
        };
        assert_eq!(args.tag, "de_DE");
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["opwiz", "-v", "-q", "list"]).is_err());
    }
}
