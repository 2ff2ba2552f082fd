//! Plain-text rendering of conversation output for the terminal.

use std::fmt::Write as _;

use sy_domain::{format_team_suggestion, MatchCandidate, MatchResult, Profile, Speaker, Turn};

/// `"synergy> ..."` for the assistant; user turns echo with `"you> "`.
pub fn turn(turn: &Turn) -> String {
    match turn.speaker {
        Speaker::Assistant => format!("synergy> {}", turn.text),
        Speaker::User => format!("you> {}", turn.text),
    }
}

pub fn candidate(c: &MatchCandidate) -> String {
    let mut out = String::new();
    let name = if c.name.trim().is_empty() { "Match" } else { c.name.as_str() };
    out.push_str(name);
    if !c.role.is_empty() {
        let _ = write!(out, " ({})", c.role);
    }
    if let (Some(pct), Some(band)) = (c.score_percent(), c.score_band()) {
        let _ = write!(out, "  {pct}% {}", band.label());
    }
    if !c.skills.is_empty() {
        let _ = write!(out, "\n    skills: {}", c.skills.join(", "));
    }
    if !c.bio.is_empty() {
        let _ = write!(out, "\n    {}", c.bio);
    }
    if let Some(availability) = c.availability.as_deref().filter(|a| !a.is_empty()) {
        let _ = write!(out, "\n    availability: {availability}");
    }
    out
}

fn profile(p: &Profile) -> String {
    let mut out = format!("Your profile: {}", if p.name.is_empty() { "(unnamed)" } else { p.name.as_str() });
    if !p.skills.is_empty() {
        let _ = write!(out, "\n  skills: {}", p.skills.join(", "));
    }
    if !p.interests.is_empty() {
        let _ = write!(out, "\n  interests: {}", p.interests.join(", "));
    }
    if !p.looking_for.is_empty() {
        let _ = write!(out, "\n  looking for: {}", p.looking_for);
    }
    out
}

/// Everything a matching cycle produced, ready to print.
pub fn result(r: &MatchResult) -> String {
    let mut sections = Vec::new();

    if let Some(p) = &r.profile {
        sections.push(profile(p));
    }

    if r.matches.is_empty() {
        sections.push("No matches yet. Try telling me more about what you're looking for.".into());
    } else {
        let list = r
            .matches
            .iter()
            .enumerate()
            .map(|(i, c)| format!("  {}. {}", i + 1, candidate(c)))
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(format!("Matches:\n{list}"));
    }

    if !r.suggestions.is_empty() {
        let list = r
            .suggestions
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let line = format!("  - {}", format_team_suggestion(s, i));
                match &s.reasoning {
                    Some(reason) => format!("{line}\n    {reason}"),
                    None => line,
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(format!("Suggested teams:\n{list}"));
    }

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use sy_domain::{TeamMember, TeamSuggestion};

    use super::*;

    #[test]
    fn candidate_shows_score_band_and_skills() {
        let c = MatchCandidate {
            name: "Lin".into(),
            role: "Designer".into(),
            skills: vec!["Figma".into(), "UX".into()],
            score: Some(0.92),
            ..Default::default()
        };
        assert_eq!(
            candidate(&c),
            "Lin (Designer)  92% excellent match\n    skills: Figma, UX"
        );
    }

    #[test]
    fn empty_result_suggests_more_detail() {
        let out = result(&MatchResult::default());
        assert!(out.starts_with("No matches yet"));
    }

    #[test]
    fn result_lists_matches_and_teams() {
        let r = MatchResult {
            profile: Some(Profile {
                name: "Ada".into(),
                skills: vec!["Rust".into()],
                ..Default::default()
            }),
            matches: vec![MatchCandidate {
                name: "Lin".into(),
                ..Default::default()
            }],
            suggestions: vec![TeamSuggestion {
                team_name: Some("Launch crew".into()),
                members: vec![TeamMember {
                    name: "Lin".into(),
                    role: Some("Designer".into()),
                }],
                reasoning: Some("Design plus Rust covers the MVP".into()),
                summary: None,
            }],
            user_id: None,
        };

        let out = result(&r);
        assert!(out.contains("Your profile: Ada\n  skills: Rust"));
        assert!(out.contains("  1. Lin"));
        assert!(out.contains("  - Launch crew: Lin (Designer)\n    Design plus Rust covers the MVP"));
    }

    #[test]
    fn turns_are_prefixed_by_speaker() {
        assert_eq!(turn(&Turn::assistant("Hi")), "synergy> Hi");
        assert_eq!(turn(&Turn::user("hello")), "you> hello");
    }
}
