use serde::{Deserialize, Deserializer, Serialize};

/// Output of the resume stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub summary: String,
    /// Skills and experiences in the order the runtime listed them.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Output of the job-description stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
}

/// Output of the scoring stage and the body of a successful review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CVAnalysis {
    /// Intended range 0-100. Returned as produced, never clamped.
    pub ats_score: u32,
    pub analysis: AtsBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsBreakdown {
    #[serde(default, deserialize_with = "string_or_list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    List(Vec<String>),
    Text(String),
}

/// Accepts either a JSON string array or a single string of `;`/newline
/// separated items.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match StringOrList::deserialize(deserializer)? {
        StringOrList::List(items) => items,
        StringOrList::Text(text) => text
            .split(|c| c == ';' || c == '\n')
            .map(String::from)
            .collect(),
    };

    Ok(items
        .iter()
        .map(|item| normalize_item(item))
        .filter(|item| !item.is_empty())
        .collect())
}

fn normalize_item(item: &str) -> String {
    item.trim()
        .trim_start_matches(['-', '*', '•'])
        .trim()
        .to_string()
}
