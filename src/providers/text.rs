use serde_json::json;

use crate::wizard::error::{OperationError, RegistrationError};
use crate::wizard::provider::{OptionsSource, Operation, ParamSpec, Provider};

const MAX_REPEAT: i64 = 1_000;

pub fn provider() -> Result<Provider, RegistrationError> {
    let upper = Operation::builder("upper")
        .help("Upper-cases text.")
        .param(ParamSpec::string("text"))
        .handler(|args| Ok(json!(args.string("text")?.to_uppercase())))
        .build()?;

    let split_words = Operation::builder("split_words")
        .help("Splits text into words.")
        .param(ParamSpec::string("text"))
        .handler(|args| {
            let words = args
                .string("text")?
                .split_whitespace()
                .collect::<Vec<_>>();
            Ok(json!(words))
        })
        .build()?;

    let repeat = Operation::builder("repeat")
        .help("Repeats text a number of times.")
        .param(ParamSpec::string("text"))
        .param(ParamSpec::integer("times").default_value(2))
        .handler(|args| {
            let times = args.integer("times")?;
            if !(0..=MAX_REPEAT).contains(&times) {
                return Err(OperationError::failed(format!(
                    "times must be between 0 and {MAX_REPEAT}"
                )));
            }
            let text = args.string("text")?;
            Ok(json!(vec![text; times as usize].join(" ")))
        })
        .build()?;

    let join = Operation::builder("join")
        .help("Joins words with a separator.")
        .param(ParamSpec::string_list("words"))
        .param(ParamSpec::string("separator").default_value(","))
        .describe(
            "separator",
            "Text placed between words",
            Some(OptionsSource::lazy(separators)),
        )
        .handler(|args| {
            let words = args.strings("words")?;
            let separator = args.string("separator")?;
            Ok(json!(words.join(separator)))
        })
        .build()?;

    Provider::builder("TextAPI")
        .help("Text: small string utilities.")
        .operation(upper)
        .operation(split_words)
        .operation(repeat)
        .operation(join)
        .build()
}

fn separators() -> Vec<String> {
    [",", ";", "|", "-", "/"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::provider::{ArgValue, Args};

    #[test]
    fn join_uses_separator() {
        let provider = provider().unwrap();
        let entry = provider.find_operation("join").unwrap();
        let mut args = Args::new();
        args.insert(
            "words",
            ArgValue::StringList(vec!["a".into(), "b".into(), "c".into()]),
        );
        args.insert("separator", ArgValue::String("|".into()));
        assert_eq!(entry.operation.invoke(&args).unwrap(), json!("a|b|c"));
    }

    #[test]
    fn repeat_rejects_negative_counts() {
        let provider = provider().unwrap();
        let entry = provider.find_operation("repeat").unwrap();
        let mut args = Args::new();
        args.insert("text", ArgValue::String("hi".into()));
        args.insert("times", ArgValue::Integer(-1));
        assert!(entry.operation.invoke(&args).is_err());
        args.insert("times", ArgValue::Integer(3));
        assert_eq!(entry.operation.invoke(&args).unwrap(), json!("hi hi hi"));
    }

    #[test]
    fn separator_options_are_listed_lazily() {
        let provider = provider().unwrap();
        let entry = provider.find_operation("join").unwrap();
        let options = entry
            .operation
            .param("separator")
            .and_then(|param| param.options.as_ref())
            .map(OptionsSource::resolve)
            .unwrap();
        assert!(options.contains(&"|".to_string()));
    }
}
