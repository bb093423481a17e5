use serde::{Deserialize, Serialize};

/// A user-facing string in both site languages. Both keys are required
/// when decoding, so a half-translated field never reaches storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Localized {
    pub ru: String,
    pub en: String,
}

impl Localized {
    pub fn new(ru: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            ru: ru.into(),
            en: en.into(),
        }
    }

    /// Same text in both languages (brand names, handles).
    pub fn both(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            ru: text.clone(),
            en: text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Stat {
    pub value: Localized,
    pub label: Localized,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AboutContent {
    #[serde(default = "default_about_id")]
    pub id: i64,
    pub name: Localized,
    #[serde(default)]
    pub username: String,
    pub title: Localized,
    pub bio: Localized,
    #[serde(default = "default_photo")]
    pub photo: String,
    #[serde(default)]
    pub stats: Vec<Stat>,
    /// Unix milliseconds of the last write, assigned by the store.
    #[serde(default)]
    pub updated_at: i64,
}

fn default_about_id() -> i64 {
    1
}

fn default_photo() -> String {
    "/logo.png".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Project {
    pub id: String,
    pub title: Localized,
    #[serde(default)]
    pub description: Localized,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub links: ProjectLinks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glow_color: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SkillCategory {
    pub id: String,
    pub title: Localized,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<Localized>,
    #[serde(default)]
    pub is_learning: bool,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Contact {
    pub id: String,
    #[serde(rename = "type", default = "default_contact_type")]
    pub kind: String,
    pub label: Localized,
    pub value: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub order: i64,
}

fn default_contact_type() -> String {
    "social".to_string()
}

/// Everything the public site renders, in one document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SiteContent {
    pub about: AboutContent,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub skills: Vec<SkillCategory>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

/// Collections whose position is persisted as a 1-based `order`.
pub trait Ordered {
    fn set_order(&mut self, order: i64);
}

impl Ordered for Project {
    fn set_order(&mut self, order: i64) {
        self.order = order;
    }
}

impl Ordered for SkillCategory {
    fn set_order(&mut self, order: i64) {
        self.order = order;
    }
}

impl Ordered for Contact {
    fn set_order(&mut self, order: i64) {
        self.order = order;
    }
}

/// Rewrite `order` to the dense 1..N sequence of list positions.
pub fn renumber<T: Ordered>(items: &mut [T]) {
    for (i, item) in items.iter_mut().enumerate() {
        item.set_order(i as i64 + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_requires_both_keys() {
        let err = serde_json::from_str::<Localized>(r#"{"ru":"Привет"}"#);
        assert!(err.is_err(), "missing en key must be rejected");

        let ok: Localized = serde_json::from_str(r#"{"ru":"Привет","en":"Hello"}"#).unwrap();
        assert_eq!(ok, Localized::new("Привет", "Hello"));
    }

    #[test]
    fn test_renumber_ignores_supplied_order() {
        let mut contacts: Vec<Contact> = (0..3)
            .map(|i| Contact {
                id: format!("c{i}"),
                kind: "social".into(),
                label: Localized::both("x"),
                value: "v".into(),
                link: String::new(),
                icon: String::new(),
                color: String::new(),
                order: 40 - i,
            })
            .collect();
        renumber(&mut contacts);
        let orders: Vec<i64> = contacts.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn test_contact_type_field_renamed() {
        let c: Contact = serde_json::from_str(
            r#"{"id":"tg","type":"messenger","label":{"ru":"Телеграм","en":"Telegram"},"value":"@me"}"#,
        )
        .unwrap();
        assert_eq!(c.kind, "messenger");
        let back = serde_json::to_value(&c).unwrap();
        assert_eq!(back["type"], "messenger");
    }

    #[test]
    fn test_project_optional_fields_default() {
        let p: Project =
            serde_json::from_str(r#"{"id":"p","title":{"ru":"П","en":"P"}}"#).unwrap();
        assert!(p.tags.is_empty());
        assert!(p.links.github.is_none());
        assert!(!p.featured);
        let v = serde_json::to_value(&p).unwrap();
        assert!(v.get("glow_color").is_none());
    }
}
