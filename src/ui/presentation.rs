//! Display-only badges derived from category and priority strings.

use serde::Serialize;
use serde_json::{json, Value};
use strum::IntoEnumIterator;

use crate::items::{Category, Priority};

/// Colour family a badge is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Learning.
    Blue,
    /// Development, low priority.
    Green,
    /// Design.
    Purple,
    /// Personal.
    Pink,
    /// High priority.
    Red,
    /// Medium priority.
    Yellow,
    /// Anything without a dedicated badge.
    Gray,
}

/// Icon glyph plus colour for a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    /// Glyph shown before the label.
    pub icon: &'static str,
    /// Colour of the badge.
    pub tone: Tone,
}

impl Badge {
    const fn new(icon: &'static str, tone: Tone) -> Self {
        Self { icon, tone }
    }
}

/// Badge for a category. Unknown categories, and "Work", get the star.
pub fn category_badge(category: &str) -> Badge {
    match category.parse::<Category>() {
        Ok(Category::Learning) => Badge::new("📖", Tone::Blue),
        Ok(Category::Development) => Badge::new("💻", Tone::Green),
        Ok(Category::Design) => Badge::new("🍒", Tone::Purple),
        Ok(Category::Personal) => Badge::new("❤", Tone::Pink),
        _ => Badge::new("⭐", Tone::Gray),
    }
}

/// Badge for a priority.
pub fn priority_badge(priority: &str) -> Badge {
    match priority.parse::<Priority>() {
        Ok(Priority::High) => Badge::new("⚠", Tone::Red),
        Ok(Priority::Medium) => Badge::new("🕒", Tone::Yellow),
        Ok(Priority::Low) => Badge::new("⚡", Tone::Green),
        Err(_) => Badge::new("🕒", Tone::Gray),
    }
}

/// Suggested values with their badges, plus the fallbacks for anything else.
/// Embedded into the page by [`super::render_index`].
pub fn presentation_table() -> Value {
    let categories: Vec<Value> = Category::iter()
        .map(|c| json!({ "name": c.to_string(), "badge": category_badge(c.as_ref()) }))
        .collect();
    let priorities: Vec<Value> = Priority::iter()
        .map(|p| json!({ "name": p.to_string(), "badge": priority_badge(p.as_ref()) }))
        .collect();

    json!({
        "categories": categories,
        "priorities": priorities,
        "defaults": {
            "category": Category::default().to_string(),
            "priority": Priority::default().to_string(),
        },
        "fallback": {
            "category": category_badge(""),
            "priority": priority_badge(""),
        },
    })
}
