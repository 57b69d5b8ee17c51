//! MCP server exposing the documentation lookup tools.

use crate::state::FindState;
use crate::tools::find::{FindRequest, handle_find};
use crate::tools::index_status::{IndexStatusRequest, handle_index_status};
use crate::tools::reload_index::{ReloadIndexRequest, handle_reload_index};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP server for computer-vision SDK documentation lookups
#[derive(Clone)]
pub struct FindServer {
    /// Shared index cache and query settings
    state: Arc<FindState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for FindServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FindServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl FindServer {
    pub fn new(state: FindState) -> Self {
        Self {
            state: Arc::new(state),
            tool_router: Self::tool_router(),
        }
    }

    /// Get a reference to the shared state.
    pub fn state(&self) -> &Arc<FindState> {
        &self.state
    }

    #[tool(
        description = "Find documented SDK objects (modules, classes, methods, functions, attributes) whose qualified name contains the query text. Case-insensitive; returns sorted links to the reference documentation.",
        input_schema = inline_schema_for_type::<FindRequest>()
    )]
    async fn find(
        &self,
        Parameters(request): Parameters<FindRequest>,
    ) -> std::result::Result<String, String> {
        handle_find(&self.state, request).await
    }

    #[tool(
        description = "Discard the cached documentation index so it is fetched and parsed again. Use after the upstream documentation has been republished.",
        input_schema = inline_schema_for_type::<ReloadIndexRequest>()
    )]
    async fn reload_index(
        &self,
        Parameters(request): Parameters<ReloadIndexRequest>,
    ) -> std::result::Result<String, String> {
        handle_reload_index(&self.state, request).await
    }

    #[tool(
        description = "Show whether the documentation index is built, with its size, fingerprint and age.",
        input_schema = inline_schema_for_type::<IndexStatusRequest>()
    )]
    async fn index_status(
        &self,
        Parameters(request): Parameters<IndexStatusRequest>,
    ) -> std::result::Result<String, String> {
        handle_index_status(&self.state, request).await
    }
}

#[tool_handler]
impl ServerHandler for FindServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "docfind-mcp: substring lookup over the computer-vision SDK reference \
                 documentation. Use find with part of a class, method or function name. \
                 The index is fetched on first use and kept until reload_index is called.",
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this function sets `inline_subschemas = true`
/// to generate inline definitions instead of $ref patterns.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();
    let object = serde_json::to_value(schema).expect("failed to serialize schema");

    let json_object = match object {
        serde_json::Value::Object(object) => object,
        _ => panic!("Schema serialization produced non-object value"),
    };

    Arc::new(json_object)
}
