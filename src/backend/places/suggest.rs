/**
 * Attraction Suggestions
 *
 * Asks a chat model for the names of attractions in a city. The answer is
 * free text that is supposed to look like `[place1, place2, ...]`; parsing
 * is lenient because models wrap, quote and number list items freely.
 */

use async_trait::async_trait;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("suggestion model failed: {0}")]
    Model(String),

    #[error("suggestion model returned no attractions")]
    EmptyAnswer,
}

impl From<genai::Error> for SuggestionError {
    fn from(err: genai::Error) -> Self {
        Self::Model(err.to_string())
    }
}

/// Names attractions worth visiting in a location
#[async_trait]
pub trait AttractionSuggester: Send + Sync {
    /// Up to `count` attraction names for `location` ("Austin, TX")
    async fn suggest(&self, location: &str, count: usize, keywords: Option<&str>) -> Result<Vec<String>, SuggestionError>;
}

/// Split a list-shaped model answer into distinct names
///
/// Accepts `[a, b]`, newline separated lists, numbered or bulleted items
/// and quoted names. Blank items and case-insensitive duplicates are
/// dropped; at most `limit` names are returned in answer order.
pub fn parse_place_names(text: &str, limit: usize) -> Vec<String> {
    let body = text.trim().trim_start_matches('[').trim_end_matches(']');

    let mut names: Vec<String> = Vec::new();
    for item in body.split(&[',', '\n'][..]) {
        let name = clean_item(item);
        if name.is_empty() || names.iter().any(|seen| seen.eq_ignore_ascii_case(name)) {
            continue;
        }
        names.push(name.to_string());
        if names.len() == limit {
            break;
        }
    }
    names
}

fn clean_item(item: &str) -> &str {
    let item = item.trim().trim_start_matches(&['-', '*', '•'][..]).trim_start();
    // "1." / "2)" numbering
    let digits = item.chars().take_while(char::is_ascii_digit).count();
    let item = if digits > 0 && item[digits..].starts_with(&['.', ')'][..]) {
        &item[digits + 1..]
    } else {
        item
    };
    item.trim().trim_matches(&['"', '\'', '`', '[', ']'][..]).trim()
}

/// Suggester backed by a genai chat model
pub struct GenaiSuggester {
    client: genai::Client,
    model: String,
}

impl GenaiSuggester {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: genai::Client::default(),
            model: model.into(),
        }
    }
}

/// Prompt asking for `count` attraction names
pub fn suggestion_prompt(location: &str, count: usize, keywords: Option<&str>) -> String {
    let focus = match keywords.map(str::trim).filter(|k| !k.is_empty()) {
        Some(keywords) => format!(" that match these interests: {keywords}"),
        None => String::new(),
    };
    format!(
        "Return a list of the names of {count} attractions in {location}{focus}, \
         in a list format, ex. [place1, place2, place3]. Return only the list."
    )
}

/// Names from a model answer, failing when there are none
pub fn names_from_answer(answer: Option<&str>, limit: usize) -> Result<Vec<String>, SuggestionError> {
    let names = parse_place_names(answer.ok_or(SuggestionError::EmptyAnswer)?, limit);
    if names.is_empty() {
        return Err(SuggestionError::EmptyAnswer);
    }
    Ok(names)
}

#[async_trait]
impl AttractionSuggester for GenaiSuggester {
    async fn suggest(&self, location: &str, count: usize, keywords: Option<&str>) -> Result<Vec<String>, SuggestionError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system("You are a local travel guide. You only answer with attraction names."),
            ChatMessage::user(suggestion_prompt(location, count, keywords)),
        ]);
        let options = ChatOptions::default().with_max_tokens(1000);

        let response = self
            .client
            .exec_chat(self.model.as_str(), request, Some(&options))
            .await?;
        let answer = response.first_text();
        tracing::debug!(location, ?answer, "attraction suggestions received");

        names_from_answer(answer, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_names_from_answer() {
        assert_eq!(
            names_from_answer(Some("[Zilker Park, Mount Bonnell]"), 5).unwrap(),
            vec!["Zilker Park", "Mount Bonnell"]
        );
        assert_matches!(names_from_answer(None, 5), Err(SuggestionError::EmptyAnswer));
        assert_matches!(names_from_answer(Some("[]"), 5), Err(SuggestionError::EmptyAnswer));
        assert_matches!(names_from_answer(Some("  \n, ,\n"), 5), Err(SuggestionError::EmptyAnswer));
    }

    #[test]
    fn test_parse_bracketed_list() {
        let names = parse_place_names("[Zilker Park, Barton Springs Pool, Texas State Capitol]", 5);
        assert_eq!(names, vec!["Zilker Park", "Barton Springs Pool", "Texas State Capitol"]);
    }

    #[test]
    fn test_parse_strips_quotes_and_blanks() {
        let names = parse_place_names(r#"["Zilker Park", 'Alamo', , "  "]"#, 5);
        assert_eq!(names, vec!["Zilker Park", "Alamo"]);
    }

    #[test]
    fn test_parse_numbered_lines() {
        let text = "1. Zilker Park\n2) Mount Bonnell\n- Lady Bird Lake\n* 6th Street";
        assert_eq!(
            parse_place_names(text, 10),
            vec!["Zilker Park", "Mount Bonnell", "Lady Bird Lake", "6th Street"]
        );
    }

    #[test]
    fn test_parse_dedupes_and_limits() {
        let names = parse_place_names("[Alamo, alamo, River Walk, Pearl, Mission San Jose]", 3);
        assert_eq!(names, vec!["Alamo", "River Walk", "Pearl"]);
    }

    #[test]
    fn test_parse_empty_answer() {
        assert!(parse_place_names("[]", 5).is_empty());
        assert!(parse_place_names("   ", 5).is_empty());
    }

    #[test]
    fn test_prompt_mentions_keywords() {
        let prompt = suggestion_prompt("Austin, TX", 5, Some("live music"));
        assert!(prompt.contains("5 attractions in Austin, TX"));
        assert!(prompt.contains("live music"));
        assert!(!suggestion_prompt("Austin, TX", 5, Some("  ")).contains("interests"));
    }
}
