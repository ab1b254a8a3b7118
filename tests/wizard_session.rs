// The locale is process-wide; translated sessions live in wizard_locale.rs.
use std::io::Cursor;

use opwiz::providers;
use opwiz::settings::WizardSettings;
use opwiz::wizard::{
    CommandDispatcher, EngineOptions, LineConsole, Operation, ParamSpec, Palette, Provider,
    Registry, WizardEngine, WizardExit,
};
use serde_json::json;

type TestConsole = LineConsole<Cursor<String>, Vec<u8>>;

fn engine(input: &str, max_prompt_attempts: u32) -> WizardEngine<TestConsole> {
    opwiz::operator_i18n::set_locale("en");
    let mut registry = Registry::new();
    providers::register_builtin(&mut registry, &WizardSettings::default());
    let console = LineConsole::new(Cursor::new(input.to_string()), Vec::new());
    let options = EngineOptions {
        palette: Palette::plain(),
        max_prompt_attempts,
    };
    WizardEngine::new(console, registry.snapshot(), options)
}

fn finish(engine: WizardEngine<TestConsole>) -> String {
    String::from_utf8(engine.into_console().into_output()).expect("utf8 output")
}

#[test]
fn top_menu_lists_providers_then_commands() {
    let mut engine = engine("q\n", 10);
    assert_eq!(engine.run().unwrap(), WizardExit::Quit);
    let text = finish(engine);
    let environment = text.find("1: Environment").expect("environment entry");
    let math = text.find("2: Math").expect("math entry");
    let text_entry = text.find("3: Text").expect("text entry");
    let quit = text.find("q: Quit").expect("quit entry");
    assert!(environment < math && math < text_entry && text_entry < quit);
    assert!(text.contains("Exiting the wizard, bye for now..."));
}

#[test]
fn successful_operation_prints_result_and_declining_exits() {
    let mut engine = engine("2\n1\n1 2 3\nn\n", 10);
    assert_eq!(engine.run().unwrap(), WizardExit::Declined);
    let text = finish(engine);
    assert!(text.contains("Description: Integers separated by spaces, e.g. 1 2 3"));
    assert!(text.contains("Type: List of Integers"));
    assert!(text.contains("Input [Values]: "));
    assert!(text.contains("SUCCESS:\n6\n"));
    assert!(text.contains("Exiting the wizard..."));
}

#[test]
fn failing_operation_reports_error_and_returns_to_menu() {
    let mut engine = engine("2\n2\n7\n0\ny\nq\n", 10);
    assert_eq!(engine.run().unwrap(), WizardExit::Quit);
    assert_eq!(engine.history().depth(), 2);
    let text = finish(engine);
    assert!(text.contains("ERROR:\ncannot divide 7 by 0"));
    assert_eq!(text.matches("2: Divide").count(), 2);
}

#[test]
fn invalid_typed_input_reprompts_until_valid() {
    let mut engine = engine("2\n3\nseven\n\n8\nn\n", 10);
    assert_eq!(engine.run().unwrap(), WizardExit::Declined);
    let text = finish(engine);
    assert!(text.contains("ERROR: Invalid type. Please try again"));
    assert!(text.contains("Please provide a value, this argument is required."));
    assert!(text.contains("SUCCESS:\ntrue\n"));
}

#[test]
fn attempt_limit_skips_the_operation() {
    let mut engine = engine("2\n3\nx\ny\ny\nq\n", 2);
    assert_eq!(engine.run().unwrap(), WizardExit::Quit);
    let text = finish(engine);
    assert!(text.contains("Too many invalid attempts for value; the operation was not run."));
    assert!(!text.contains("SUCCESS:"));
}

#[test]
fn defaults_and_lazy_options_are_offered() {
    let mut engine = engine("3\n4\na b c\n\nn\n", 10);
    assert_eq!(engine.run().unwrap(), WizardExit::Declined);
    let text = finish(engine);
    assert!(text.contains("The following options are available:"));
    assert!(text.contains("    ;"));
    assert!(text.contains("Input [Separator (default=,)]: "));
    assert!(text.contains("SUCCESS:\na,b,c\n"));
}

#[test]
fn back_and_forward_walk_the_history() {
    let mut engine = engine("1\nb\nb\nf\nf\nq\n", 10);
    assert_eq!(engine.run().unwrap(), WizardExit::Quit);
    assert_eq!(engine.history().depth(), 2);
    assert_eq!(engine.history().current().unwrap().title(), "Environment");
    let text = finish(engine);
    assert!(text.contains("Already at the first menu."));
    assert!(text.contains("Nothing to go forward to."));
}

#[test]
fn selecting_a_provider_after_going_back_drops_forward_history() {
    let mut engine = engine("1\nb\n2\nf\nq\n", 10);
    assert_eq!(engine.run().unwrap(), WizardExit::Quit);
    assert_eq!(engine.history().current().unwrap().title(), "Math");
    assert_eq!(engine.history().forward_len(), 0);
    let text = finish(engine);
    assert!(text.contains("Nothing to go forward to."));
}

#[test]
fn command_without_handler_is_reported_and_ignored() {
    let mut engine = engine("b\nq\n", 10).with_dispatcher(CommandDispatcher::empty());
    assert_eq!(engine.run().unwrap(), WizardExit::InputExhausted);
    assert_eq!(engine.history().depth(), 1);
}


#[test]
fn widgets_list_all_uses_default_limit_and_returns_to_submenu() {
    opwiz::operator_i18n::set_locale("en");
    let list_all = Operation::builder("list_all")
        .help("List every widget.")
        .param(ParamSpec::integer("limit").default_value(10))
        .handler(|args| Ok(json!({ "limit": args.integer("limit")? })))
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
    let console = LineConsole::new(Cursor::new("1\n1\n\ny\n".to_string()), Vec::new());
    let mut engine = WizardEngine::new(console, registry.snapshot(), EngineOptions::default());

    assert_eq!(engine.run().unwrap(), WizardExit::InputExhausted);
    assert_eq!(engine.history().depth(), 2);
    assert_eq!(engine.history().current().unwrap().title(), "Widgets");

    let text = finish(engine);
    for entry in ["1: Widgets", "b: GoBack", "f: GoForward", "q: Quit"] {
        assert!(text.contains(entry), "missing `{entry}` in:\n{text}");
    }
    assert!(text.contains("Input [Limit (default=10)]: "));
    assert!(text.contains("SUCCESS:\nlimit: 10\n"));
    assert_eq!(text.matches("1: List All").count(), 2);
}
