use serde_json::json;

use crate::wizard::error::{OperationError, RegistrationError};
use crate::wizard::provider::{Operation, ParamSpec, Provider};

const MAX_RANGE_LEN: usize = 10_000;

pub fn provider() -> Result<Provider, RegistrationError> {
    let sum = Operation::builder("sum")
        .help("Adds a list of integers.")
        .param(ParamSpec::integer_list("values"))
        .describe("values", "Integers separated by spaces, e.g. 1 2 3", None)
        .handler(|args| {
            let values = args.integers("values")?;
            values
                .iter()
                .try_fold(0i64, |acc, value| acc.checked_add(*value))
                .map(|total| json!(total))
                .ok_or_else(|| OperationError::failed("sum overflowed a 64-bit integer"))
        })
        .build()?;

    let divide = Operation::builder("divide")
        .help("Integer division with remainder.")
        .param(ParamSpec::integer("dividend"))
        .param(ParamSpec::integer("divisor"))
        .handler(|args| {
            let dividend = args.integer("dividend")?;
            let divisor = args.integer("divisor")?;
            let (Some(quotient), Some(remainder)) = (
                dividend.checked_div_euclid(divisor),
                dividend.checked_rem_euclid(divisor),
            ) else {
                return Err(OperationError::failed(format!(
                    "cannot divide {dividend} by {divisor}"
                )));
            };
            Ok(json!({ "quotient": quotient, "remainder": remainder }))
        })
        .build()?;

    let is_even = Operation::builder("is_even")
        .help("Checks whether an integer is even.")
        .param(ParamSpec::integer("value"))
        .handler(|args| Ok(json!(args.integer("value")? % 2 == 0)))
        .build()?;

    let range = Operation::builder("range")
        .help("Produces a sequence of integers.")
        .param(ParamSpec::integer("start").default_value(0))
        .param(ParamSpec::integer("end").default_value(10))
        .param(ParamSpec::integer("step").default_value(1))
        .param(ParamSpec::boolean("inclusive").default_value(false))
        .handler(|args| {
            let values = range(
                args.integer("start")?,
                args.integer("end")?,
                args.integer("step")?,
                args.boolean("inclusive")?,
            )?;
            Ok(json!(values))
        })
        .build()?;

    Provider::builder("MathAPI")
        .help("Math: integer arithmetic.")
        .operation(sum)
        .operation(divide)
        .operation(is_even)
        .operation(range)
        .build()
}

fn range(start: i64, end: i64, step: i64, inclusive: bool) -> Result<Vec<i64>, OperationError> {
    if step == 0 {
        return Err(OperationError::failed("step must not be zero"));
    }
    let mut values = Vec::new();
    let mut current = start;
    loop {
        let in_bounds = match (step > 0, inclusive) {
            (true, true) => current <= end,
            (true, false) => current < end,
            (false, true) => current >= end,
            (false, false) => current > end,
        };
        if !in_bounds {
            break;
        }
        if values.len() == MAX_RANGE_LEN {
            return Err(OperationError::failed(format!(
                "range would exceed {MAX_RANGE_LEN} values"
            )));
        }
        values.push(current);
        match current.checked_add(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(values)
}
