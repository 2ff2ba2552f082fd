//! Match result model and the normalization applied to whatever shape the
//! matching service returns.
//!
//! The service is lenient about shapes: list fields may be a JSON array or
//! one comma-delimited string, candidate ids may be numbers, and team
//! suggestions may be plain strings. Everything is normalized on the way in
//! so nothing downstream has to care.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The requesting user's profile as extracted by the matching service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_string_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "de_string_list")]
    pub interests: Vec<String>,
    #[serde(default, alias = "lookingFor", deserialize_with = "de_text")]
    pub looking_for: String,
}

/// One ranked collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    #[serde(default, deserialize_with = "de_opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub role: String,
    #[serde(default, deserialize_with = "de_text")]
    pub bio: String,
    #[serde(default, deserialize_with = "de_string_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "de_string_list")]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(
        default,
        alias = "compatibility_score",
        deserialize_with = "de_opt_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A suggested grouping of matches.
///
/// Accepts a plain string (kept as `summary`), `null`, or an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTeamSuggestion")]
pub struct TeamSuggestion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    pub members: Vec<TeamMember>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTeamSuggestion {
    Null(()),
    Text(String),
    Detailed {
        #[serde(default, alias = "teamName")]
        team_name: Option<String>,
        #[serde(default)]
        members: Vec<Option<TeamMember>>,
        #[serde(default)]
        reasoning: Option<String>,
        #[serde(default)]
        summary: Option<String>,
    },
}

impl From<RawTeamSuggestion> for TeamSuggestion {
    fn from(raw: RawTeamSuggestion) -> Self {
        match raw {
            RawTeamSuggestion::Null(()) => Self::default(),
            RawTeamSuggestion::Text(text) => Self {
                summary: non_blank(text),
                ..Self::default()
            },
            RawTeamSuggestion::Detailed {
                team_name,
                members,
                reasoning,
                summary,
            } => Self {
                team_name: team_name.and_then(non_blank),
                members: members.into_iter().flatten().collect(),
                reasoning: reasoning.and_then(non_blank),
                summary: summary.and_then(non_blank),
            },
        }
    }
}

/// Everything one successful matching cycle produced.
///
/// Starts empty, is replaced wholesale when a cycle succeeds, and is
/// cleared on reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub profile: Option<Profile>,
    pub matches: Vec<MatchCandidate>,
    pub suggestions: Vec<TeamSuggestion>,
    /// Id under which the backend stored the extracted profile.
    pub user_id: Option<String>,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.profile.is_none() && self.matches.is_empty() && self.suggestions.is_empty()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Presentation helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Strong,
    Good,
}

impl ScoreBand {
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent match",
            Self::Strong => "strong match",
            Self::Good => "good match",
        }
    }
}

impl MatchCandidate {
    /// Compatibility as a whole percentage. Scores in `0.0..=1.0` are
    /// treated as fractions.
    pub fn score_percent(&self) -> Option<u8> {
        let raw = self.score?;
        if !raw.is_finite() {
            return None;
        }
        let pct = if (0.0..=1.0).contains(&raw) {
            raw * 100.0
        } else {
            raw
        };
        Some(pct.round().clamp(0.0, 100.0) as u8)
    }

    pub fn score_band(&self) -> Option<ScoreBand> {
        self.score_percent().map(|pct| match pct {
            90..=u8::MAX => ScoreBand::Excellent,
            80..=89 => ScoreBand::Strong,
            _ => ScoreBand::Good,
        })
    }
}

/// One-line label for a team suggestion, e.g.
/// `"Infra Squad: Ada (Engineer) + Lin (Designer)"`.
///
/// `index` is zero-based and only used for the `Team N` fallback.
pub fn format_team_suggestion(suggestion: &TeamSuggestion, index: usize) -> String {
    let fallback = || format!("Team {}", index + 1);

    if let Some(summary) = &suggestion.summary {
        return summary.clone();
    }
    if suggestion.members.is_empty() {
        return fallback();
    }

    let label = suggestion.team_name.clone().unwrap_or_else(fallback);
    let roster = suggestion
        .members
        .iter()
        .map(|m| {
            let name = if m.name.trim().is_empty() {
                "Match"
            } else {
                m.name.as_str()
            };
            match m.role.as_deref().map(str::trim) {
                Some(role) if !role.is_empty() => format!("{name} ({role})"),
                _ => name.to_owned(),
            }
        })
        .collect::<Vec<_>>()
        .join(" + ");
    format!("{label}: {roster}")
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Normalization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Split a comma-delimited string into trimmed, non-empty items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Normalize a list-ish JSON value (array, comma string, or anything else)
/// into trimmed, non-empty strings.
pub fn normalize_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => split_list(s),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_owned()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == s.len() {
        Some(s)
    } else {
        Some(trimmed.to_owned())
    }
}

fn de_string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().map(normalize_list).unwrap_or_default())
}

/// Strings stay as-is (trimmed); `null` becomes empty.
fn de_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) => s.trim().to_owned(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn de_opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) => non_blank(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn de_opt_score<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
