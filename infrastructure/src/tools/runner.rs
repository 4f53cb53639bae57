//! Local tool runner
//!
//! Implements [`ToolRunnerPort`] by dispatching on tool name to the
//! built-in implementations. The runner owns the catalog the pipeline
//! looks tools up in, so the set of dispatchable names and the set of
//! cataloged names cannot drift apart.

use crate::tools;
use async_trait::async_trait;
use tracing::debug;
use weave_application::ToolRunnerPort;
use weave_domain::{ToolCall, ToolCatalog, ToolError, ToolResult};

#[cfg(feature = "mesh-tools")]
use crate::tools::mesh::MeshClient;

/// Tool runner executing built-in tools in-process
pub struct LocalToolRunner {
    catalog: ToolCatalog,
    /// Default working directory for run_command, from configuration
    working_dir: Option<String>,
    #[cfg(feature = "mesh-tools")]
    mesh: MeshClient,
}

impl LocalToolRunner {
    pub fn new(catalog: ToolCatalog, working_dir: Option<String>, daemon_url: &str) -> Self {
        #[cfg(not(feature = "mesh-tools"))]
        let _ = daemon_url;
        Self {
            catalog,
            working_dir,
            #[cfg(feature = "mesh-tools")]
            mesh: MeshClient::new(daemon_url),
        }
    }
}

#[async_trait]
impl ToolRunnerPort for LocalToolRunner {
    fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    async fn run(&self, call: &ToolCall) -> ToolResult {
        debug!(tool = %call.tool_name, "running tool");
        match call.tool_name.as_str() {
            tools::file::READ_FILE => tools::file::execute_read_file(call),
            tools::file::WRITE_FILE => tools::file::execute_write_file(call),
            tools::file::LIST_DIR => tools::file::execute_list_dir(call),
            tools::search::GLOB_SEARCH => tools::search::execute_glob_search(call),
            tools::search::GREP_SEARCH => tools::search::execute_grep_search(call),
            tools::command::RUN_COMMAND => {
                tools::command::execute_run_command(call, self.working_dir.as_deref()).await
            }
            #[cfg(feature = "mesh-tools")]
            tools::mesh::WEB_FETCH => self.mesh.execute_web_fetch(call).await,
            #[cfg(feature = "mesh-tools")]
            tools::mesh::MESH_SEND => self.mesh.execute_mesh_send(call).await,
            #[cfg(feature = "mesh-tools")]
            tools::mesh::MESH_QUERY => self.mesh.execute_mesh_query(call).await,
            other => ToolResult::failure(other, ToolError::not_found(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::default_catalog;
    use std::fs;

    fn runner() -> LocalToolRunner {
        LocalToolRunner::new(default_catalog(), None, "http://127.0.0.1:7777")
    }

    #[tokio::test]
    async fn test_runner_dispatches_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.txt");
        fs::write(&path, "payload").unwrap();

        let call = ToolCall::new("read_file").with_arg("path", path.to_str().unwrap());
        let result = runner().run(&call).await;

        assert!(result.is_success());
        assert_eq!(result.output(), Some("payload"));
    }

    #[tokio::test]
    async fn test_runner_rejects_unknown_tool() {
        let call = ToolCall::new("imaginary");
        let result = runner().run(&call).await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
    }

    #[test]
    fn test_catalog_and_dispatch_agree() {
        let runner = runner();
        for name in runner.catalog().names() {
            assert!(runner.has_tool(name));
        }
    }
}
