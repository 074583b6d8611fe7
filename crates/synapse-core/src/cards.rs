use serde::Serialize;

use crate::model::{AtomicCard, Relation};

#[derive(Serialize)]
struct CardFrontmatter<'a> {
    description: &'a str,
    tags: &'a [String],
}

/// Render a card as a markdown document: YAML frontmatter, bullet body,
/// then relation and position lines with wiki links.
pub fn render_card(card: &AtomicCard) -> String {
    let frontmatter = serde_yaml::to_string(&CardFrontmatter {
        description: &card.description,
        tags: &card.tags,
    })
    .unwrap_or_default();

    let mut out = String::new();
    out.push_str("---\n");
    out.push_str(&frontmatter);
    out.push_str("---\n\n");
    out.push_str(&format!("- **Content**: {}\n", card.content));
    out.push_str(&format!("- **Explanation**: {}\n", card.explanation));

    if !card.relations.is_empty() {
        let rendered: Vec<String> = card.relations.iter().map(render_relation).collect();
        out.push_str(&format!("- **Relations**: {}\n", rendered.join(" | ")));
    }

    let mut position = Vec::new();
    if let Some(parent) = &card.position.parent {
        position.push(format!("[trace up] [[{parent}]]"));
    }
    if !card.position.children.is_empty() {
        let children: Vec<String> = card
            .position
            .children
            .iter()
            .map(|child| format!("[[{child}]]"))
            .collect();
        position.push(format!("[trace down] {}", children.join(", ")));
    }
    if !position.is_empty() {
        out.push_str(&format!("- **Position**: {}\n", position.join("; ")));
    }

    out
}

fn render_relation(relation: &Relation) -> String {
    if relation.logic.is_empty() {
        format!("[[{}]]", relation.concept)
    } else {
        format!("{} [[{}]]", relation.logic, relation.concept)
    }
}

/// Banner section appended to the source note after decomposition, linking
/// each generated card.
pub fn render_banner(cards: &[AtomicCard]) -> String {
    let links: Vec<String> = cards
        .iter()
        .map(|card| format!("- [[{}]]", card.title))
        .collect();
    format!(
        "\n\n---\n## Decomposed into atomic cards\n\n{}\n",
        links.join("\n")
    )
}

/// Turn a card title into a file stem, replacing path-hostile characters.
pub fn card_file_name(title: &str) -> String {
    title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CardPosition;

    fn card() -> AtomicCard {
        AtomicCard {
            title: "Affordance".to_string(),
            description: "Perceived action possibilities".to_string(),
            tags: vec!["concept".to_string(), "design".to_string()],
            content: "Objects suggest how they can be used".to_string(),
            explanation: "Coined by Gibson, popularized by Norman".to_string(),
            relations: vec![
                Relation::new("contrast", "Signifier"),
                Relation::new("", "Mental Model"),
            ],
            position: CardPosition {
                parent: Some("Interaction Design".to_string()),
                children: vec!["False Affordance".to_string()],
            },
        }
    }

    #[test]
    fn renders_frontmatter_body_and_links() {
        let md = render_card(&card());

        assert!(md.starts_with("---\n"));
        assert!(md.contains("description: Perceived action possibilities"));
        assert!(md.contains("- concept"));
        assert!(md.contains("- **Content**: Objects suggest how they can be used"));
        assert!(md.contains("- **Relations**: contrast [[Signifier]] | [[Mental Model]]"));
        assert!(md.contains("[trace up] [[Interaction Design]]"));
        assert!(md.contains("[trace down] [[False Affordance]]"));
    }

    #[test]
    fn omits_empty_relation_and_position_lines() {
        let mut bare = card();
        bare.relations.clear();
        bare.position = CardPosition::default();

        let md = render_card(&bare);
        assert!(!md.contains("**Relations**"));
        assert!(!md.contains("**Position**"));
    }

    #[test]
    fn banner_links_every_card() {
        let banner = render_banner(&[card()]);
        assert!(banner.contains("## Decomposed into atomic cards"));
        assert!(banner.contains("- [[Affordance]]"));
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(card_file_name("A/B: C?"), "A-B- C-");
        assert_eq!(card_file_name("  Plain title  "), "Plain title");
    }
}
