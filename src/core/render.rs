//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ResultItem, ResultSet};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render and print to stdout; empty output prints nothing
    pub fn print(&self, result_set: &ResultSet) {
        let output = self.render(result_set);
        if !output.is_empty() {
            println!("{}", output);
        }
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let (errors, items): (Vec<&ResultItem>, Vec<&ResultItem>) = result_set
            .items
            .iter()
            .partition(|item| item.kind == Kind::Error);

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}\n", error.code, error.message));
                }
            }
            output.push('\n');
        }

        for item in items {
            self.render_item_md(&mut output, item);
        }

        output
    }

    fn render_item_md(&self, output: &mut String, item: &ResultItem) {
        let title = match item.kind {
            Kind::Generation => "Generation",
            Kind::Uri => "URI",
            Kind::Flush => "Flushed",
            Kind::Query => "Query",
            Kind::Error => return,
        };
        output.push_str(&format!("## {}\n\n", title));

        if let Some(generation) = &item.generation {
            output.push_str(&format!("- generation: `{}`", generation));
            if item.meta.created {
                output.push_str(" (created)");
            }
            output.push('\n');
        }
        if let Some(path) = &item.path {
            output.push_str(&format!("- path: `{}`\n", path));
        }
        if let Some(uri) = &item.uri {
            output.push_str(&format!("- uri: `{}`\n", uri));
        }
        if let Some(serde_json::Value::Object(map)) = &item.data {
            for (key, value) in map {
                match value {
                    serde_json::Value::String(s) => {
                        output.push_str(&format!("- {}: `{}`\n", key, s))
                    }
                    other => output.push_str(&format!("- {}: {}\n", key, other)),
                }
            }
        }

        output.push('\n');
    }

    /// Render as raw output: the single headline value of each item
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(raw_value)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn raw_value(item: &ResultItem) -> Option<String> {
    match item.kind {
        Kind::Uri => item.uri.clone(),
        Kind::Generation | Kind::Flush => item.generation.clone(),
        Kind::Query => item
            .data
            .as_ref()
            .and_then(|d| d.get("canonical"))
            .and_then(|c| c.as_str())
            .map(str::to_string),
        Kind::Error => item.errors.first().map(|e| e.message.clone()),
    }
}
