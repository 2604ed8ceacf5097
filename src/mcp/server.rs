/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin, one per line
/// 2. Routes tool calls to the habit tools
/// 3. Writes JSON-RPC responses to stdout, one per line

use chrono::{Local, NaiveDate};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{self, ToolError};
use crate::{HabitTrackerServer, ServerError};

/// MCP server wrapping a habit tracker
pub struct McpServer {
    habit_tracker: HabitTrackerServer,
    /// Set once the client sends its `initialized` notification
    initialized: bool,
}

impl McpServer {
    pub fn new(habit_tracker: HabitTrackerServer) -> Self {
        Self {
            habit_tracker,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let mut reader = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        let Some(id) = request.id.clone() else {
            self.handle_notification(&request.method);
            return None;
        };

        Some(self.handle_request(id, request))
    }

    /// Whether the client completed the initialization handshake
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "notifications/initialized" | "initialized" => {
                self.initialized = true;
                info!("MCP client finished initialization");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    fn handle_request(&mut self, id: Value, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => respond(id, &ListToolsResult { tools: tool_definitions() }),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    fn handle_initialize(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();

        match &params.client_info {
            Some(client) => info!(
                "MCP client connected: {} {} (protocol {})",
                client.name,
                client.version.as_deref().unwrap_or("?"),
                params.protocol_version.as_deref().unwrap_or("?")
            ),
            None => info!("MCP client connected"),
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Habit Streaks",
                version: env!("CARGO_PKG_VERSION"),
            },
        };

        respond(id, &result)
    }

    fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let result = self.call_tool(&tool_params.name, tool_params.arguments, Local::now().date_naive());
        respond(id, &result)
    }

    /// Dispatch one tool call
    ///
    /// `today` bounds every date argument.
    pub fn call_tool(&self, name: &str, args: Map<String, Value>, today: NaiveDate) -> ToolCallResult {
        let storage = self.habit_tracker.storage();

        match name {
            "habit_create" => run_tool(name, args, |p| {
                tools::create_habit(storage, p, today).map(|r| r.message)
            }),
            "habit_complete" => run_tool(name, args, |p| {
                tools::complete_habit(storage, self.habit_tracker.engine(), p, today).map(|outcome| {
                    format!(
                        "{}\nCurrent streak: {} | Longest streak: {}",
                        outcome.message(),
                        outcome.streak_count,
                        outcome.longest_streak
                    )
                })
            }),
            "habit_delete" => run_tool(name, args, |p| {
                tools::delete_habit(storage, p).map(|r| r.message)
            }),
            "habit_list" => run_tool(name, args, |p| {
                tools::list_habits(storage, p).map(|r| r.message)
            }),
            "habit_streaks" => run_tool(name, args, |p| {
                tools::streak_report(storage, self.habit_tracker.analytics(), p).map(|r| r.message)
            }),
            _ => ToolCallResult::error(format!("Unknown tool: {}", name)),
        }
    }
}

/// Deserialize a tool's arguments and run it
fn run_tool<P, F>(name: &str, args: Map<String, Value>, tool: F) -> ToolCallResult
where
    P: DeserializeOwned,
    F: FnOnce(P) -> Result<String, ToolError>,
{
    let params: P = match serde_json::from_value(Value::Object(args)) {
        Ok(p) => p,
        Err(e) => return ToolCallResult::error(format!("Invalid arguments for {}: {}", name, e)),
    };

    match tool(params) {
        Ok(text) => ToolCallResult::success(text),
        Err(e) => {
            warn!("Tool {} failed: {}", name, e);
            ToolCallResult::error(e.to_string())
        }
    }
}

fn respond<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to serialize result: {}", e),
            None,
        ),
    }
}

fn input_schema<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|_| json!({ "type": "object" }))
}

/// Tools advertised in `tools/list`
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "habit_create",
            description: "Create a new daily or weekly habit",
            input_schema: input_schema::<tools::CreateHabitParams>(),
        },
        ToolDefinition {
            name: "habit_complete",
            description: "Check off a habit for today or a past date and update its streak",
            input_schema: input_schema::<tools::CompleteHabitParams>(),
        },
        ToolDefinition {
            name: "habit_delete",
            description: "Delete a habit and its completion history",
            input_schema: input_schema::<tools::DeleteHabitParams>(),
        },
        ToolDefinition {
            name: "habit_list",
            description: "List habits, optionally only those of one periodicity",
            input_schema: input_schema::<tools::ListHabitsParams>(),
        },
        ToolDefinition {
            name: "habit_streaks",
            description: "Streak reports: one habit's longest streak, the longest-streak leaderboard, or the weakest habits",
            input_schema: input_schema::<tools::StreaksParams>(),
        },
    ]
}
