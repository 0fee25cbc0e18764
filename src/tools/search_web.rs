//! The `searchWeb` tool.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::arguments::ToolArguments;
use super::tool::Tool;
use crate::error::DeepSearchError;
use crate::search::SearchClient;

/// Web search exposed to the model: `searchWeb(query: string)`.
pub struct SearchWebTool {
    client: SearchClient,
    result_count: usize,
}

impl SearchWebTool {
    pub fn new(client: SearchClient, result_count: usize) -> Self {
        Self {
            client,
            result_count,
        }
    }
}

#[async_trait]
impl Tool for SearchWebTool {
    fn name(&self) -> &str {
        "searchWeb"
    }

    fn description(&self) -> &str {
        "Search the web for relevant pages. Results include title, link, snippet, \
         and publication date when available."
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The query to search the web for"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        cancel: CancellationToken,
    ) -> Result<serde_json::Value, DeepSearchError> {
        let query = args.get_str("query")?;
        let results = self.client.search(query, self.result_count, cancel).await?;
        tracing::debug!(query, results = results.len(), "searchWeb completed");
        Ok(serde_json::to_value(results)?)
    }
}
