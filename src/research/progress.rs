// src/research/progress.rs
use std::fmt;

/// Stages of a research run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressStage {
    Starting,
    KeywordSuggestions,
    KeywordMetrics,
    KeywordAnalysis,
    SearchResults,
    AnalyzerSetup,
    CompetitorScrape,
    OutlineSynthesis,
    Complete,
}

impl ProgressStage {
    pub const ALL: [ProgressStage; 9] = [
        ProgressStage::Starting,
        ProgressStage::KeywordSuggestions,
        ProgressStage::KeywordMetrics,
        ProgressStage::KeywordAnalysis,
        ProgressStage::SearchResults,
        ProgressStage::AnalyzerSetup,
        ProgressStage::CompetitorScrape,
        ProgressStage::OutlineSynthesis,
        ProgressStage::Complete,
    ];

    /// Share of the run completed once this stage starts.
    pub fn fraction(self) -> f32 {
        match self {
            ProgressStage::Starting => 0.05,
            ProgressStage::KeywordSuggestions => 0.1,
            ProgressStage::KeywordMetrics => 0.2,
            ProgressStage::KeywordAnalysis => 0.3,
            ProgressStage::SearchResults => 0.5,
            ProgressStage::AnalyzerSetup => 0.6,
            ProgressStage::CompetitorScrape => 0.7,
            ProgressStage::OutlineSynthesis => 0.9,
            ProgressStage::Complete => 1.0,
        }
    }

    pub fn percent(self) -> u8 {
        (self.fraction() * 100.0).round() as u8
    }

    pub fn message(self) -> &'static str {
        match self {
            ProgressStage::Starting => "Initializing analysis process",
            ProgressStage::KeywordSuggestions => "Getting keyword suggestions",
            ProgressStage::KeywordMetrics => "Processing keyword metrics",
            ProgressStage::KeywordAnalysis => "Analyzing keywords",
            ProgressStage::SearchResults => "Fetching search results",
            ProgressStage::AnalyzerSetup => "Preparing competitor analysis",
            ProgressStage::CompetitorScrape => "Scanning competitor content",
            ProgressStage::OutlineSynthesis => "Crafting content outline",
            ProgressStage::Complete => "Analysis complete",
        }
    }
}

impl fmt::Display for ProgressStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>3}%] {}", self.percent(), self.message())
    }
}
