use std::sync::Arc;

use quotes_core::{QuoteView, SubcategoryPolicy};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct QuotesServer {
    /// Current view; every transition replaces it wholesale.
    state: Arc<Mutex<QuoteView>>,
    tool_router: ToolRouter<Self>,
}

impl QuotesServer {
    pub fn new(view: QuoteView) -> Self {
        Self {
            state: Arc::new(Mutex::new(view)),
            tool_router: Self::tool_router(),
        }
    }

    fn selection_json(view: &QuoteView) -> serde_json::Value {
        let selection = view.selection();
        serde_json::json!({
            "category": selection.category(),
            "subcategory": selection.subcategory(),
            "subcategories": view.subcategories(),
            "visible": view.visible().count(),
            "total": view.quotes().len(),
        })
    }

    fn json_result(value: &serde_json::Value) -> CallToolResult {
        CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(value).unwrap_or_default(),
        )])
    }
}

// --- Tool parameter types ---

#[derive(Debug, Deserialize, JsonSchema)]
struct SubcategoriesRequest {
    /// Category to restrict to. Omit or pass "" for no category.
    category: Option<String>,
    /// Optional override of the server's policy for the no-category case:
    /// "strict" (no subcategories) or "union" (all subcategories).
    policy: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SelectCategoryRequest {
    /// Category to select. Omit or pass "" to select all categories.
    category: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SelectSubcategoryRequest {
    /// Subcategory to select. Omit or pass "" to select all subcategories.
    subcategory: Option<String>,
}

#[tool_router]
impl QuotesServer {
    #[tool(description = "List every distinct quote category, in the order first seen in the collection.")]
    async fn quotes_categories(&self) -> Result<CallToolResult, McpError> {
        let view = self.state.lock().await;
        let result = serde_json::json!({
            "categories": view.categories(),
        });
        Ok(Self::json_result(&result))
    }

    #[tool(
        description = "List the distinct subcategories of quotes tagged with a category. Does not change the current selection."
    )]
    async fn quotes_subcategories(
        &self,
        Parameters(req): Parameters<SubcategoriesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let view = self.state.lock().await;
        let policy = match req.policy.as_deref() {
            Some(p) => p
                .parse::<SubcategoryPolicy>()
                .map_err(|e| McpError::invalid_params(e, None))?,
            None => view.policy(),
        };
        let preview = view
            .with_policy(policy)
            .select_category(req.category.as_deref());
        let result = serde_json::json!({
            "category": preview.selection().category(),
            "policy": policy,
            "subcategories": preview.subcategories(),
        });
        Ok(Self::json_result(&result))
    }

    #[tool(
        description = "Select a category. Always clears the selected subcategory. Returns the new selection, the subcategories now available, and how many quotes are visible."
    )]
    async fn quotes_select_category(
        &self,
        Parameters(req): Parameters<SelectCategoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut view = self.state.lock().await;
        *view = view.select_category(req.category.as_deref());
        Ok(Self::json_result(&Self::selection_json(&view)))
    }

    #[tool(
        description = "Select a subcategory, keeping the selected category. Returns the new selection and how many quotes are visible."
    )]
    async fn quotes_select_subcategory(
        &self,
        Parameters(req): Parameters<SelectSubcategoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut view = self.state.lock().await;
        *view = view.select_subcategory(req.subcategory.as_deref());
        Ok(Self::json_result(&Self::selection_json(&view)))
    }

    #[tool(
        description = "Render the current view: selector options for category and subcategory, and one card per visible quote with its text, categories and subcategories."
    )]
    async fn quotes_view(&self) -> Result<CallToolResult, McpError> {
        let view = self.state.lock().await;
        let snapshot = serde_json::to_value(view.snapshot())
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(Self::json_result(&snapshot))
    }
}

#[tool_handler]
impl ServerHandler for QuotesServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Browse a fixed collection of categorized quotes.\n\n\
                 - quotes_categories lists the categories.\n\
                 - quotes_select_category narrows the view to one category and clears the subcategory.\n\
                 - quotes_select_subcategory narrows further within the selected category.\n\
                 - quotes_view returns the visible quotes.\n\
                 Pass an empty string or omit the value to select \"All\"."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotes_core::{Quote, QuoteCollection};

    fn make_server() -> QuotesServer {
        let quotes: QuoteCollection = vec![
            Quote::new(1, "A", ["x"], ["p"]),
            Quote::new(2, "B", ["y"], ["q"]),
        ]
        .into();
        QuotesServer::new(QuoteView::new(quotes, SubcategoryPolicy::Strict))
    }

    fn text_from_result(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| match &c.raw {
                RawContent::Text(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    fn parse_result(result: &CallToolResult) -> serde_json::Value {
        let text = text_from_result(result);
        serde_json::from_str(&text).expect("handler should return valid JSON")
    }

    async fn select_category(server: &QuotesServer, category: &str) -> serde_json::Value {
        let result = server
            .quotes_select_category(Parameters(SelectCategoryRequest {
                category: Some(category.to_string()),
            }))
            .await
            .unwrap();
        parse_result(&result)
    }

    async fn select_subcategory(server: &QuotesServer, subcategory: &str) -> serde_json::Value {
        let result = server
            .quotes_select_subcategory(Parameters(SelectSubcategoryRequest {
                subcategory: Some(subcategory.to_string()),
            }))
            .await
            .unwrap();
        parse_result(&result)
    }

    #[tokio::test]
    async fn test_categories() {
        let server = make_server();
        let json = parse_result(&server.quotes_categories().await.unwrap());
        assert_eq!(json["categories"], serde_json::json!(["x", "y"]));
    }

    #[tokio::test]
    async fn test_initial_view_shows_everything() {
        let server = make_server();
        let json = parse_result(&server.quotes_view().await.unwrap());
        assert_eq!(json["visible"], 2);
        assert_eq!(json["subcategories"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_select_category_then_subcategory() {
        let server = make_server();

        let json = select_category(&server, "x").await;
        assert_eq!(json["category"], "x");
        assert_eq!(json["subcategories"], serde_json::json!(["p"]));
        assert_eq!(json["visible"], 1);

        let json = select_subcategory(&server, "p").await;
        assert_eq!(json["category"], "x");
        assert_eq!(json["subcategory"], "p");
        assert_eq!(json["visible"], 1);

        let view = parse_result(&server.quotes_view().await.unwrap());
        assert_eq!(view["cards"][0]["text"], "A");
    }

    #[tokio::test]
    async fn test_switching_category_clears_subcategory() {
        let server = make_server();
        select_category(&server, "x").await;
        select_subcategory(&server, "p").await;

        let json = select_category(&server, "y").await;
        assert_eq!(json["category"], "y");
        assert!(json["subcategory"].is_null());
        assert_eq!(json["visible"], 1);
    }

    #[tokio::test]
    async fn test_subcategory_without_category_is_shown_selected() {
        let server = make_server();
        select_subcategory(&server, "p").await;

        let view = parse_result(&server.quotes_view().await.unwrap());
        assert_eq!(view["visible"], 1);
        let selected: Vec<_> = view["subcategories"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|o| o["selected"] == true)
            .map(|o| o["value"].clone())
            .collect();
        assert_eq!(selected, vec![serde_json::json!("p")]);
    }

    #[tokio::test]
    async fn test_empty_string_selects_all() {
        let server = make_server();
        select_category(&server, "x").await;
        let json = select_category(&server, "").await;
        assert!(json["category"].is_null());
        assert_eq!(json["visible"], 2);
    }

    #[tokio::test]
    async fn test_subcategories_does_not_change_selection() {
        let server = make_server();
        let result = server
            .quotes_subcategories(Parameters(SubcategoriesRequest {
                category: Some("y".to_string()),
                policy: None,
            }))
            .await
            .unwrap();
        assert_eq!(parse_result(&result)["subcategories"], serde_json::json!(["q"]));

        let view = parse_result(&server.quotes_view().await.unwrap());
        assert!(view["selection"]["category"].is_null());
    }

    #[tokio::test]
    async fn test_subcategories_policy_override() {
        let server = make_server();
        let result = server
            .quotes_subcategories(Parameters(SubcategoriesRequest {
                category: None,
                policy: Some("union".to_string()),
            }))
            .await
            .unwrap();
        let json = parse_result(&result);
        assert_eq!(json["policy"], "union");
        assert_eq!(json["subcategories"], serde_json::json!(["p", "q"]));
    }

    #[tokio::test]
    async fn test_subcategories_invalid_policy() {
        let server = make_server();
        let result = server
            .quotes_subcategories(Parameters(SubcategoriesRequest {
                category: None,
                policy: Some("everything".to_string()),
            }))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let server = QuotesServer::new(QuoteView::empty(SubcategoryPolicy::Strict));
        let json = parse_result(&server.quotes_view().await.unwrap());
        assert_eq!(json["total"], 0);
        assert!(json["cards"].as_array().unwrap().is_empty());
        assert_eq!(json["categories"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_tool_registration() {
        let server = make_server();
        let info = server.get_info();

        assert!(info.instructions.is_some());
        assert!(info.capabilities.tools.is_some());
    }
}
