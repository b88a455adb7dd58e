//! Output formatting for terminal and JSON

use crate::app::OutputFormat;
use anyhow::Result;
use folio_core::{SearchMethod, SearchResponse, SearchableEntity};
use std::fmt::Write;

pub fn method_label(method: SearchMethod) -> &'static str {
    match method {
        SearchMethod::Vector => "vector",
        SearchMethod::Keyword => "keyword",
        SearchMethod::Hybrid => "hybrid",
        SearchMethod::Rerank => "rerank",
        SearchMethod::Browse => "browse",
    }
}

/// Render a search response in the requested format
pub fn format_search_response(response: &SearchResponse, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(response)?)),
        OutputFormat::Cli => format_terminal(response),
    }
}

fn format_terminal(response: &SearchResponse) -> Result<String> {
    let mut out = String::new();

    if response.results.is_empty() {
        writeln!(out, "No results.")?;
        return Ok(out);
    }

    for item in &response.results {
        let kind = item.entity.entity_type().as_str();
        writeln!(
            out,
            "{:3}. {}  [{}]  score {:.3}  ({})",
            item.rank,
            item.entity.name(),
            kind,
            item.score,
            method_label(item.method),
        )?;
        if let Some(detail) = detail_line(&item.entity) {
            writeln!(out, "     {}", detail)?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{} of {} results in {} ms",
        response.results.len(),
        response.total_count,
        response.timing.total
    )?;
    Ok(out)
}

fn detail_line(entity: &SearchableEntity) -> Option<String> {
    match entity {
        SearchableEntity::Profile(p) => {
            let mut parts = Vec::new();
            if let Some(ref headline) = p.headline {
                parts.push(headline.clone());
            }
            if let Some(ref location) = p.location {
                parts.push(location.clone());
            }
            if !p.skills.is_empty() {
                parts.push(p.skills.join(", "));
            }
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" | "))
            }
        }
        SearchableEntity::Project(p) => p.oneliner.clone().or_else(|| p.description.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ParsedQuery, Profile, SearchResultItem, SearchTiming};

    fn sample_response() -> SearchResponse {
        SearchResponse {
            results: vec![SearchResultItem {
                entity: SearchableEntity::Profile(Profile {
                    id: 1,
                    handle: "mina".into(),
                    display_name: "Mina K".into(),
                    headline: Some("ML engineer".into()),
                    bio: None,
                    skills: vec!["ai".into()],
                    interests: vec![],
                    location: Some("Berlin".into()),
                    availability: Default::default(),
                    active: true,
                    updated_at: "2024-01-01T00:00:00Z".into(),
                }),
                score: 0.91,
                method: SearchMethod::Hybrid,
                rank: 1,
            }],
            total_count: 1,
            timing: SearchTiming::default(),
            parsed_query: ParsedQuery::browse(),
        }
    }

    #[test]
    fn test_terminal_format_lists_rank_and_method() {
        let text = format_search_response(&sample_response(), OutputFormat::Cli).unwrap();
        assert!(text.contains("Mina K"));
        assert!(text.contains("(hybrid)"));
        assert!(text.contains("1 of 1 results"));
    }

    #[test]
    fn test_json_format_is_valid_json() {
        let text = format_search_response(&sample_response(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["results"][0]["display_name"], "Mina K");
        assert_eq!(value["results"][0]["method"], "hybrid");
    }

    #[test]
    fn test_empty_results_message() {
        let mut response = sample_response();
        response.results.clear();
        response.total_count = 0;
        let text = format_search_response(&response, OutputFormat::Cli).unwrap();
        assert!(text.contains("No results."));
    }
}
