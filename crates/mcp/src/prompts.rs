// Prompt templates guiding FRED tool usage

use crate::protocol::{GetPromptResult, PromptArgumentSchema, PromptMessage, PromptSchema};
use std::collections::HashMap;

/// A registered prompt: its schema plus user/assistant message templates.
///
/// Templates carry `{name}` placeholders. Rendering fills them from the
/// caller's arguments, then from the per-argument default, then with the
/// empty string; prompts are guidance text and rendering never fails.
pub struct PromptDefinition {
    schema: PromptSchema,
    user_template: &'static str,
    assistant_template: &'static str,
    defaults: &'static [(&'static str, &'static str)],
}

/// Registry of available prompts, built once at startup.
pub struct PromptRegistry {
    prompts: HashMap<String, PromptDefinition>,
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self {
            prompts: HashMap::new(),
        }
    }

    /// Registry preloaded with the standard FRED guidance prompts.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for prompt in default_prompts() {
            registry.register(prompt);
        }
        registry
    }

    pub fn register(&mut self, prompt: PromptDefinition) {
        self.prompts.insert(prompt.schema.name.clone(), prompt);
    }

    /// List all prompt schemas, sorted by name for a stable listing.
    pub fn list_schemas(&self) -> Vec<PromptSchema> {
        let mut schemas: Vec<PromptSchema> =
            self.prompts.values().map(|p| p.schema.clone()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Number of registered prompts.
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Render a prompt with the given arguments.
    ///
    /// Returns `None` only for an unknown prompt name; rendering itself
    /// cannot fail.
    pub fn render(&self, name: &str, arguments: &HashMap<String, String>) -> Option<GetPromptResult> {
        let prompt = self.prompts.get(name)?;
        Some(GetPromptResult {
            description: Some(prompt.schema.description.clone()),
            messages: vec![
                PromptMessage::user(substitute(
                    prompt.user_template,
                    arguments,
                    prompt.defaults,
                )),
                PromptMessage::assistant(substitute(
                    prompt.assistant_template,
                    arguments,
                    prompt.defaults,
                )),
            ],
        })
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace `{name}` placeholders, leaving no marker behind.
fn substitute(
    template: &str,
    arguments: &HashMap<String, String>,
    defaults: &[(&str, &str)],
) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        rest = &rest[open + 1..];
        match rest.find('}') {
            Some(close) => {
                let name = &rest[..close];
                if let Some(value) = arguments.get(name) {
                    out.push_str(value);
                } else if let Some((_, default)) = defaults.iter().find(|(n, _)| *n == name) {
                    out.push_str(default);
                }
                rest = &rest[close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

fn argument(name: &str, description: &str, required: bool) -> PromptArgumentSchema {
    PromptArgumentSchema {
        name: name.to_string(),
        description: description.to_string(),
        required,
    }
}

fn default_prompts() -> Vec<PromptDefinition> {
    vec![
        PromptDefinition {
            schema: PromptSchema {
                name: "search-guidance".to_string(),
                description: "How to effectively search FRED data series".to_string(),
                arguments: vec![argument(
                    "topic",
                    "Economic topic to search for (e.g., inflation, GDP)",
                    false,
                )],
            },
            user_template: "I want to find information about {topic} in FRED data. \
                What's the best approach?",
            assistant_template: "To find {topic} series in FRED, start with the \
                `search_fred_series` tool:\n\n\
                - Set `query` to a specific term, e.g. \"{topic} rate\" or \"{topic} index\"\n\
                - Use `limit` to control how many results come back (default: 10)\n\
                - Use `order_by` to rank by popularity, title, or search_rank\n\n\
                Well-known starting points include CPIAUCSL (consumer prices), UNRATE \
                (unemployment), GDP (output), and FEDFUNDS (policy rate).\n\n\
                Once you have a series ID, fetch its data points with \
                `fred_get_series_data` and its description with `fred_get_series_metadata`.",
            defaults: &[("topic", "inflation")],
        },
        PromptDefinition {
            schema: PromptSchema {
                name: "data-analysis-guidance".to_string(),
                description: "How to analyze FRED economic data".to_string(),
                arguments: vec![argument(
                    "series_id",
                    "FRED series ID (e.g., 'GDP', 'UNRATE')",
                    false,
                )],
            },
            user_template: "How can I analyze the {series_id} data series from FRED?",
            assistant_template: "To analyze {series_id}, work through the tools in order:\n\n\
                1. Retrieve the raw data: `fred_get_series_data` with \
                `series_id=\"{series_id}\"` and an `observation_start` to bound the window.\n\
                2. Summarize it: `fred_calculate_statistics` reports count, mean, sample \
                standard deviation, min, and max over the non-missing observations.\n\
                3. Classify its direction: `fred_detect_trends` fits a least-squares slope \
                and reports increasing, decreasing, or flat plus the percent change.\n\
                4. Put it in context: `fred_compare_series` lines it up against related \
                indicators date by date.\n\n\
                Check the units and seasonal adjustment in the metadata before drawing \
                conclusions from the numbers.",
            defaults: &[("series_id", "GDP")],
        },
        PromptDefinition {
            schema: PromptSchema {
                name: "trend-analysis-guide".to_string(),
                description: "Interpreting trend direction and percent change".to_string(),
                arguments: vec![argument(
                    "series_id",
                    "FRED series ID (e.g., 'GDP', 'UNRATE')",
                    false,
                )],
            },
            user_template: "How do I detect and interpret trends in {series_id}?",
            assistant_template: "Run `fred_detect_trends` with `series_id=\"{series_id}\"` \
                and, ideally, an explicit date window:\n\n\
                - The tool fits a least-squares line through the non-missing observations \
                and classifies the series as increasing, decreasing, or flat from the sign \
                of the slope.\n\
                - Percent change is measured endpoint to endpoint over the window, so a \
                volatile series can show a small change with a large spread; pair it with \
                `fred_calculate_statistics` to see the standard deviation.\n\
                - Narrow windows answer \"what is happening now\"; wide windows answer \
                \"what is the long-run tendency\". Run both before calling a turning point.\n\
                - Missing observations are skipped, not treated as zero, so gaps in a \
                series do not fake a decline.",
            defaults: &[("series_id", "GDP")],
        },
        PromptDefinition {
            schema: PromptSchema {
                name: "economic-indicators-guide".to_string(),
                description: "Understanding key economic indicators in FRED".to_string(),
                arguments: vec![],
            },
            user_template: "What are the most important economic indicators available in FRED?",
            assistant_template: "Key FRED indicators and when to reach for them:\n\n\
                GDP: total output, quarterly. The broadest read on economic health.\n\
                UNRATE: unemployment rate, monthly. Labor market conditions.\n\
                CPIAUCSL: consumer price index, monthly. Inflation and purchasing power.\n\
                FEDFUNDS: federal funds rate, monthly. The stance of monetary policy.\n\
                INDPRO: industrial production, monthly. Manufacturing sector health.\n\
                DGS10: 10-year treasury yield, daily. Long-run rate expectations.\n\n\
                These combine well: unemployment typically falls as GDP rises, and \
                FEDFUNDS reacts to CPIAUCSL. Use `fred_get_series_data` with any of \
                these IDs, or `fred_compare_series` to line several up.",
            defaults: &[],
        },
        PromptDefinition {
            schema: PromptSchema {
                name: "compare-indicators-guidance".to_string(),
                description: "How to compare multiple economic indicators".to_string(),
                arguments: vec![argument(
                    "indicators",
                    "Comma-separated list of series IDs to compare (e.g., 'GDP,UNRATE')",
                    false,
                )],
            },
            user_template: "How can I compare the {indicators} indicators?",
            assistant_template: "To compare {indicators}, call `fred_compare_series` with \
                the series IDs and a shared date range. The tool aligns the series date by \
                date, printing one row per date with a column per series.\n\n\
                For a meaningful comparison, keep in mind:\n\
                - Frequencies differ (GDP is quarterly, UNRATE monthly); rows where one \
                series has no observation show a '.' in that column.\n\
                - Scales differ; compare directions and turning points rather than raw \
                magnitudes, or look at the per-series percent change in the summary.\n\
                - Leading vs. lagging: some series move ahead of the cycle, others confirm \
                it after the fact.",
            defaults: &[("indicators", "GDP,UNRATE")],
        },
        PromptDefinition {
            schema: PromptSchema {
                name: "seasonal-adjustment-guide".to_string(),
                description: "Understanding seasonal adjustments in economic data".to_string(),
                arguments: vec![],
            },
            user_template: "What is seasonal adjustment in economic data?",
            assistant_template: "Seasonal adjustment removes the predictable within-year \
                swings from a series (retail sales spike every December; construction slows \
                every winter) so that the underlying movement is visible.\n\n\
                In FRED:\n\
                - A series' metadata states its adjustment, e.g. \"Seasonally Adjusted\" \
                for UNRATE. Many indicators exist in both forms (UNRATE vs. UNRATENSA).\n\
                - Use the seasonally adjusted form to study trends, cycles, and \
                month-over-month changes.\n\
                - Use the unadjusted form when the seasonal pattern itself is the object \
                of study, or when you need the actual recorded values.\n\n\
                To see the difference directly, compare both forms of the same indicator \
                with `fred_compare_series`.",
            defaults: &[],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_six_prompts() {
        let registry = PromptRegistry::with_defaults();
        assert_eq!(registry.len(), 6);
        let names: Vec<String> = registry
            .list_schemas()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert!(names.contains(&"trend-analysis-guide".to_string()));
        assert!(names.contains(&"search-guidance".to_string()));
    }

    #[test]
    fn unknown_prompt_renders_none() {
        let registry = PromptRegistry::with_defaults();
        assert!(registry.render("no-such-prompt", &HashMap::new()).is_none());
    }

    #[test]
    fn every_prompt_renders_clean_with_empty_arguments() {
        let registry = PromptRegistry::with_defaults();
        for schema in registry.list_schemas() {
            let result = registry.render(&schema.name, &HashMap::new()).unwrap();
            assert_eq!(result.messages.len(), 2);
            for message in &result.messages {
                let text = message.content.as_text();
                assert!(!text.is_empty(), "{} rendered empty", schema.name);
                assert!(
                    !text.contains('{') && !text.contains('}'),
                    "{} left unresolved placeholders: {}",
                    schema.name,
                    text
                );
            }
        }
    }

    #[test]
    fn trend_analysis_guide_renders_non_empty() {
        let registry = PromptRegistry::with_defaults();
        let result = registry
            .render("trend-analysis-guide", &HashMap::new())
            .unwrap();
        let text = result.messages[1].content.as_text();
        assert!(text.contains("fred_detect_trends"));
        assert!(!text.contains('{'));
    }

    #[test]
    fn arguments_override_defaults() {
        let registry = PromptRegistry::with_defaults();
        let mut arguments = HashMap::new();
        arguments.insert("series_id".to_string(), "UNRATE".to_string());
        let result = registry
            .render("data-analysis-guidance", &arguments)
            .unwrap();
        assert!(result.messages[0].content.as_text().contains("UNRATE"));
        assert!(!result.messages[1].content.as_text().contains("GDP"));
    }

    #[test]
    fn missing_argument_without_default_becomes_empty() {
        let substituted = substitute("value: {missing}!", &HashMap::new(), &[]);
        assert_eq!(substituted, "value: !");
    }

    #[test]
    fn substitute_handles_multiple_placeholders() {
        let mut arguments = HashMap::new();
        arguments.insert("a".to_string(), "1".to_string());
        let substituted = substitute("{a} and {b}", &arguments, &[("b", "2")]);
        assert_eq!(substituted, "1 and 2");
    }
}
