use serde_json::Value;

use s3lens_core::api as core_api;

use crate::commands::cli::InvokeArgs;
use crate::error::CliError;

pub async fn handle_invoke(
    args: InvokeArgs,
    dispatcher: &core_api::CommandDispatcher,
) -> Result<(), CliError> {
    let params = parse_params(args.args.as_deref())?;
    let mut req = core_api::CommandRequest::new(args.command);
    req.args = params;
    req.limit = args.limit;

    println!("{}", dispatcher.invoke_request(&req).await);
    Ok(())
}

pub fn handle_operations(dispatcher: &core_api::CommandDispatcher) {
    for name in dispatcher.surface().operation_names() {
        println!("{name}");
    }
}

pub fn handle_tool(dispatcher: &core_api::CommandDispatcher) -> Result<(), CliError> {
    let def = core_api::ToolDefinition::for_dispatcher(dispatcher);
    let json = serde_json::to_string_pretty(&def)
        .map_err(|e| CliError::Command(format!("failed to encode tool definition: {e}")))?;
    println!("{json}");
    Ok(())
}

fn parse_params(raw: Option<&str>) -> Result<core_api::Params, CliError> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(core_api::Params::new());
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CliError::Command(format!(
            "--args must be a JSON object, got {other}"
        ))),
        Err(e) => Err(CliError::Command(format!("--args is not valid JSON: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_args_are_an_empty_map() {
        assert!(parse_params(None).unwrap().is_empty());
        assert!(parse_params(Some("  ")).unwrap().is_empty());
    }

    #[test]
    fn object_args_parse() {
        let p = parse_params(Some(r#"{"Bucket": "alpha", "MaxKeys": 5}"#)).unwrap();
        assert_eq!(p.get("MaxKeys"), Some(&json!(5)));
    }

    #[test]
    fn non_object_args_are_rejected() {
        assert!(parse_params(Some("[1, 2]")).is_err());
        assert!(parse_params(Some("{oops")).is_err());
    }
}
