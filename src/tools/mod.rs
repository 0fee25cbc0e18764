//! Model-dispatched tools.

pub mod arguments;
pub mod scrape_pages;
pub mod search_web;
pub mod tool;
pub mod validation;

pub use arguments::ToolArguments;
pub use scrape_pages::ScrapePagesTool;
pub use search_web::SearchWebTool;
pub use tool::Tool;
