//! Tool definition published to agent frameworks.

use serde::Serialize;
use serde_json::{json, Value};

use crate::dispatcher::CommandDispatcher;

pub const TOOL_NAME: &str = "AWSReadOnlyS3";
pub const TOOL_FUNCTION: &str = "run_s3_command";

const TOOL_DESCRIPTION: &str = "\
Run a read-only command on S3. The command is the name of the S3 client \
operation to call (for example list_buckets). The args are the named \
parameters for that operation, as an object mapping parameter names to \
values; leave it empty when none are needed. The result is returned as text \
and cut to `limit` characters (default 2500). Only read-only operations are \
permitted; anything else is refused without being executed. Use small limits \
where possible.";

const AGENT_INSTRUCTIONS: &str = "\
You are an agent for interacting with S3 on AWS. You may only use the tools \
provided to you; you cannot use any other tools or the internet, and you do \
not write code, you only call tools. Run the tools as many times as needed to \
get the desired result. If an error cannot be overcome, report it to the user.";

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub function: &'static str,
    pub description: &'static str,
    pub parameters: Value,
    pub allowed_operations: Vec<String>,
    pub instructions: &'static str,
}

impl ToolDefinition {
    pub fn for_dispatcher(dispatcher: &CommandDispatcher) -> Self {
        let default_limit = dispatcher.options().default_limit;
        Self {
            name: TOOL_NAME,
            function: TOOL_FUNCTION,
            description: TOOL_DESCRIPTION,
            parameters: json!({
                "type": "object",
                "properties": {
                    "command": {
                        "type": "string",
                        "description": "The S3 client operation to run, e.g. list_buckets"
                    },
                    "args": {
                        "type": "object",
                        "description": "Named parameters for the operation",
                        "additionalProperties": true,
                        "default": {}
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of characters returned",
                        "minimum": 0,
                        "default": default_limit
                    }
                },
                "required": ["command"]
            }),
            allowed_operations: dispatcher.surface().operation_names(),
            instructions: AGENT_INSTRUCTIONS,
        }
    }
}
