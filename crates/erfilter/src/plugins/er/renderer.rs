//! Renderers for filtered ER diagrams
//!
//! Rendering itself is Mermaid's job. These renderers either pass the
//! filtered source through or wrap it in a page that runs Mermaid in the
//! browser with the configured options.

use tracing::{debug, span, Level};

use crate::core::{DiagramRenderer, FilterError, RenderConfig};

/// Mermaid ES module loaded by [`HtmlRenderer`] pages
pub const MERMAID_MODULE_URL: &str =
    "https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.esm.min.mjs";

/// Emits the filtered diagram source unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct MermaidSourceRenderer;

impl MermaidSourceRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl DiagramRenderer for MermaidSourceRenderer {
    fn render(&self, diagram: &str, _config: &RenderConfig) -> Result<String, FilterError> {
        Ok(diagram.to_string())
    }

    fn name(&self) -> &'static str {
        "mermaid-source"
    }

    fn format(&self) -> &'static str {
        "mmd"
    }
}

/// Emits a standalone HTML page that renders the diagram with Mermaid
///
/// Render failures in the browser are written to the page's `#error`
/// element instead of breaking the page.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    title: String,
    module_url: String,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self {
            title: "ER Diagram".to_string(),
            module_url: MERMAID_MODULE_URL.to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Load Mermaid from somewhere other than the public CDN
    pub fn with_module_url(mut self, url: impl Into<String>) -> Self {
        self.module_url = url.into();
        self
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON-encode for embedding inside a `<script>` element
fn script_literal<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, FilterError> {
    let json = serde_json::to_string(value).map_err(|e| FilterError::render_error(e.to_string()))?;
    Ok(json.replace("</", "<\\/"))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl DiagramRenderer for HtmlRenderer {
    fn render(&self, diagram: &str, config: &RenderConfig) -> Result<String, FilterError> {
        let render_span = span!(Level::DEBUG, "render_html", diagram_len = diagram.len());
        let _enter = render_span.enter();

        let config_json = script_literal(config)?;
        let diagram_json = script_literal(diagram)?;
        let module_json = script_literal(&self.module_url)?;
        debug!(config = config_json.as_str(), "Embedding render config");

        Ok(format!(
            r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
  #error {{ color: #b00020; font-family: monospace; white-space: pre-wrap; }}
</style>
</head>
<body>
<div id="error"></div>
<div id="diagram"></div>
<script type="module">
  const errorBox = document.querySelector("#error");
  try {{
    const {{ default: mermaid }} = await import({module});
    mermaid.initialize({config});
    const {{ svg }} = await mermaid.render("graphDiv", {diagram});
    document.querySelector("#diagram").innerHTML = svg;
  }} catch (error) {{
    console.error("Error rendering diagram:", error);
    errorBox.textContent = "Error rendering diagram: " + (error && error.message ? error.message : error);
  }}
</script>
</body>
</html>
"##,
            title = escape_html(&self.title),
            module = module_json,
            config = config_json,
            diagram = diagram_json,
        ))
    }

    fn name(&self) -> &'static str {
        "html"
    }

    fn format(&self) -> &'static str {
        "html"
    }
}
