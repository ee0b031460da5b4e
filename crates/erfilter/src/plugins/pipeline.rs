//! Pipeline coordinating load, filter and render
//!
//! Sources → combined text → detector (advisory) → filter → renderer.
//! The combined text is filtered exactly once per run, after every source
//! has loaded.

use anyhow::Result;
use tracing::{debug, error, info, span, warn, Level};

use crate::core::{
    combine_sources, Detector, DiagramRenderer, ExclusionSet, FileSystemLoader, FilterError,
    RenderConfig, Selection, SourceLoader,
};
use crate::plugins::er::{DiagramFilter, ErDetector, FilterStats, Filtered, MermaidSourceRenderer};

/// Rendered output of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub rendered: String,
    /// The filtered diagram text that was handed to the renderer
    pub diagram: String,
    pub stats: FilterStats,
}

/// Runs a selection of diagram files through filter and renderer
pub struct Pipeline {
    loader: Box<dyn SourceLoader>,
    detector: ErDetector,
    filter: DiagramFilter,
    renderer: Box<dyn DiagramRenderer>,
    config: RenderConfig,
}

impl Pipeline {
    pub fn new(loader: Box<dyn SourceLoader>, renderer: Box<dyn DiagramRenderer>) -> Self {
        Self {
            loader,
            detector: ErDetector::new(),
            filter: DiagramFilter::default(),
            renderer,
            config: RenderConfig::default(),
        }
    }

    pub fn with_filter(mut self, filter: DiagramFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn filter(&self) -> DiagramFilter {
        self.filter
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn renderer_format(&self) -> &'static str {
        self.renderer.format()
    }

    /// Filter already-combined text without touching sources or renderer
    pub fn filter_only(&self, text: &str, exclude: &ExclusionSet) -> Filtered {
        if !self.detector.detect(text) {
            warn!(
                confidence = self.detector.confidence(text),
                "Input does not look like an ER diagram, filtering anyway"
            );
        }
        self.filter.filter_with_stats(text, exclude)
    }

    /// Load, filter and render the selection
    pub fn run(&self, selection: &Selection) -> Result<String> {
        Ok(self.run_with_stats(selection)?.rendered)
    }

    /// Load, filter and render the selection, keeping the intermediate text
    pub fn run_with_stats(&self, selection: &Selection) -> Result<PipelineOutput> {
        let run_span = span!(
            Level::INFO,
            "run_pipeline",
            files = selection.files.len(),
            excluded = selection.exclude.len()
        );
        let _enter = run_span.enter();

        info!(mode = %self.filter.mode(), renderer = self.renderer.name(), "Starting pipeline");

        let combined = combine_sources(self.loader.as_ref(), &selection.files)?;
        debug!(combined_len = combined.len(), "Sources combined");

        let filtered = self.filter_only(&combined, &selection.exclude);
        debug!(diagram = filtered.text.as_str(), "Filtered diagram");

        let rendered = self
            .renderer
            .render(&filtered.text, &self.config)
            .map_err(|e| match e {
                FilterError::Render { .. } => e,
                other => FilterError::render_error(other.to_string()),
            })
            .inspect_err(|e| error!(error = %e, "Error rendering diagram"))?;

        info!(output_len = rendered.len(), "Pipeline completed successfully");

        Ok(PipelineOutput {
            rendered,
            diagram: filtered.text,
            stats: filtered.stats,
        })
    }
}

impl Default for Pipeline {
    /// Filesystem sources, orphan pruning, source passthrough
    fn default() -> Self {
        Self::new(
            Box::new(FileSystemLoader::new()),
            Box::new(MermaidSourceRenderer::new()),
        )
    }
}
