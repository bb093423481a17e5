use crate::content::defaults::default_content;
use crate::content::types::{
    AboutContent, Contact, Localized, Project, ProjectLinks, SiteContent, Skill, SkillCategory,
    Stat,
};
use crate::error::{AppError, AppResult};
use crate::storage::sqlite::with_conn;
use deadpool_sqlite::Pool;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

/// Normalized relational content storage. Every update is a
/// delete-all-then-insert inside a single transaction.
#[derive(Clone)]
pub struct SqliteContentStore {
    pool: Pool,
}

impl SqliteContentStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Write the default dataset if the `about` row is missing.
    /// Returns whether seeding happened.
    pub async fn seed_if_empty(&self) -> AppResult<bool> {
        let now = chrono::Utc::now().timestamp_millis();
        with_conn(&self.pool, move |conn| {
            let tx = conn.transaction()?;
            let existing: i64 = tx.query_row("SELECT COUNT(*) FROM about", [], |row| row.get(0))?;
            if existing > 0 {
                return Ok(false);
            }
            let mut content = default_content();
            content.about.updated_at = now;
            write_about(&tx, &content.about)?;
            write_projects(&tx, &content.projects)?;
            write_skills(&tx, &content.skills)?;
            write_contacts(&tx, &content.contacts)?;
            tx.commit()?;
            Ok(true)
        })
        .await
    }

    pub async fn get_all(&self) -> AppResult<SiteContent> {
        let (about, projects, skills, contacts) = with_conn(&self.pool, |conn| {
            // One read transaction so the four sections come from the same snapshot.
            let tx = conn.transaction()?;
            let about = read_about(&tx)?;
            let projects = read_projects(&tx)?;
            let skills = read_skills(&tx)?;
            let contacts = read_contacts(&tx)?;
            tx.commit()?;
            Ok((about, projects, skills, contacts))
        })
        .await?;

        Ok(SiteContent {
            about: about.ok_or_else(missing_about)?,
            projects,
            skills,
            contacts,
        })
    }

    pub async fn get_about(&self) -> AppResult<AboutContent> {
        with_conn(&self.pool, |conn| read_about(conn))
            .await?
            .ok_or_else(missing_about)
    }

    pub async fn get_projects(&self) -> AppResult<Vec<Project>> {
        with_conn(&self.pool, |conn| read_projects(conn)).await
    }

    pub async fn get_skills(&self) -> AppResult<Vec<SkillCategory>> {
        with_conn(&self.pool, |conn| read_skills(conn)).await
    }

    pub async fn get_contacts(&self) -> AppResult<Vec<Contact>> {
        with_conn(&self.pool, |conn| read_contacts(conn)).await
    }

    pub async fn update_about(&self, about: AboutContent) -> AppResult<AboutContent> {
        with_conn(&self.pool, move |conn| {
            let tx = conn.transaction()?;
            write_about(&tx, &about)?;
            tx.commit()?;
            Ok(about)
        })
        .await
    }

    pub async fn update_projects(&self, projects: Vec<Project>) -> AppResult<Vec<Project>> {
        with_conn(&self.pool, move |conn| {
            let tx = conn.transaction()?;
            write_projects(&tx, &projects)?;
            tx.commit()?;
            Ok(projects)
        })
        .await
    }

    pub async fn update_skills(&self, skills: Vec<SkillCategory>) -> AppResult<Vec<SkillCategory>> {
        with_conn(&self.pool, move |conn| {
            let tx = conn.transaction()?;
            write_skills(&tx, &skills)?;
            tx.commit()?;
            Ok(skills)
        })
        .await
    }

    pub async fn update_contacts(&self, contacts: Vec<Contact>) -> AppResult<Vec<Contact>> {
        with_conn(&self.pool, move |conn| {
            let tx = conn.transaction()?;
            write_contacts(&tx, &contacts)?;
            tx.commit()?;
            Ok(contacts)
        })
        .await
    }
}

fn missing_about() -> AppError {
    AppError::NotFound("about content has not been seeded".to_string())
}

fn to_json_text(values: &[String]) -> rusqlite::Result<String> {
    serde_json::to_string(values).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn from_json_text(idx: usize, text: &str) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn read_about(conn: &Connection) -> rusqlite::Result<Option<AboutContent>> {
    let about = conn
        .query_row(
            "SELECT id, name_ru, name_en, username, title_ru, title_en, bio_ru, bio_en, photo, updated_at
             FROM about WHERE id = 1",
            [],
            |row| {
                Ok(AboutContent {
                    id: row.get(0)?,
                    name: Localized::new(row.get::<_, String>(1)?, row.get::<_, String>(2)?),
                    username: row.get(3)?,
                    title: Localized::new(row.get::<_, String>(4)?, row.get::<_, String>(5)?),
                    bio: Localized::new(row.get::<_, String>(6)?, row.get::<_, String>(7)?),
                    photo: row.get(8)?,
                    stats: Vec::new(),
                    updated_at: row.get(9)?,
                })
            },
        )
        .optional()?;

    let Some(mut about) = about else {
        return Ok(None);
    };

    let mut stmt = conn.prepare_cached(
        "SELECT value_ru, value_en, label_ru, label_en, icon, color
         FROM stats ORDER BY sort_order",
    )?;
    about.stats = stmt
        .query_map([], |row| {
            Ok(Stat {
                value: Localized::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?),
                label: Localized::new(row.get::<_, String>(2)?, row.get::<_, String>(3)?),
                icon: row.get(4)?,
                color: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(about))
}

fn write_about(conn: &Connection, about: &AboutContent) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO about (id, name_ru, name_en, username, title_ru, title_en, bio_ru, bio_en, photo, updated_at)
         VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT (id) DO UPDATE SET
            name_ru = excluded.name_ru,
            name_en = excluded.name_en,
            username = excluded.username,
            title_ru = excluded.title_ru,
            title_en = excluded.title_en,
            bio_ru = excluded.bio_ru,
            bio_en = excluded.bio_en,
            photo = excluded.photo,
            updated_at = excluded.updated_at",
        params![
            about.name.ru,
            about.name.en,
            about.username,
            about.title.ru,
            about.title.en,
            about.bio.ru,
            about.bio.en,
            about.photo,
            about.updated_at,
        ],
    )?;

    conn.execute("DELETE FROM stats", [])?;
    let mut insert = conn.prepare_cached(
        "INSERT INTO stats (value_ru, value_en, label_ru, label_en, icon, color, sort_order)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for (i, stat) in about.stats.iter().enumerate() {
        insert.execute(params![
            stat.value.ru,
            stat.value.en,
            stat.label.ru,
            stat.label.en,
            stat.icon,
            stat.color,
            i as i64 + 1,
        ])?;
    }
    Ok(())
}

fn read_projects(conn: &Connection) -> rusqlite::Result<Vec<Project>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, title_ru, title_en, description_ru, description_en, image, tags, categories,
                github_url, demo_url, glow_color, featured, sort_order
         FROM projects ORDER BY sort_order",
    )?;
    let rows = stmt.query_map([], |row| {
        let tags: String = row.get(6)?;
        let categories: String = row.get(7)?;
        Ok(Project {
            id: row.get(0)?,
            title: Localized::new(row.get::<_, String>(1)?, row.get::<_, String>(2)?),
            description: Localized::new(row.get::<_, String>(3)?, row.get::<_, String>(4)?),
            image: row.get(5)?,
            tags: from_json_text(6, &tags)?,
            categories: from_json_text(7, &categories)?,
            links: ProjectLinks {
                github: row.get(8)?,
                demo: row.get(9)?,
            },
            glow_color: row.get(10)?,
            featured: row.get(11)?,
            order: row.get(12)?,
        })
    })?;
    rows.collect()
}

fn write_projects(conn: &Connection, projects: &[Project]) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM projects", [])?;
    let mut insert = conn.prepare_cached(
        "INSERT INTO projects (
            id, title_ru, title_en, description_ru, description_en, image, tags, categories,
            github_url, demo_url, glow_color, featured, sort_order
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    )?;
    for (i, p) in projects.iter().enumerate() {
        insert.execute(params![
            p.id,
            p.title.ru,
            p.title.en,
            p.description.ru,
            p.description.en,
            p.image,
            to_json_text(&p.tags)?,
            to_json_text(&p.categories)?,
            p.links.github,
            p.links.demo,
            p.glow_color,
            p.featured,
            i as i64 + 1,
        ])?;
    }
    Ok(())
}

fn read_skills(conn: &Connection) -> rusqlite::Result<Vec<SkillCategory>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, title_ru, title_en, badge_ru, badge_en, is_learning, sort_order
         FROM skill_categories ORDER BY sort_order",
    )?;
    let mut categories = stmt
        .query_map([], |row| {
            let badge_ru: Option<String> = row.get(3)?;
            let badge_en: Option<String> = row.get(4)?;
            Ok(SkillCategory {
                id: row.get(0)?,
                title: Localized::new(row.get::<_, String>(1)?, row.get::<_, String>(2)?),
                badge: match (badge_ru, badge_en) {
                    (Some(ru), Some(en)) => Some(Localized { ru, en }),
                    _ => None,
                },
                is_learning: row.get(5)?,
                skills: Vec::new(),
                order: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut skill_stmt = conn.prepare_cached(
        "SELECT id, name, icon, color FROM skills WHERE category_id = ?1 ORDER BY sort_order",
    )?;
    for category in &mut categories {
        category.skills = skill_stmt
            .query_map(params![category.id], |row| {
                Ok(Skill {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    icon: row.get(2)?,
                    color: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
    }

    Ok(categories)
}

fn write_skills(conn: &Connection, categories: &[SkillCategory]) -> rusqlite::Result<()> {
    // Skills go with their category through ON DELETE CASCADE.
    conn.execute("DELETE FROM skill_categories", [])?;
    let mut insert_category = conn.prepare_cached(
        "INSERT INTO skill_categories (id, title_ru, title_en, badge_ru, badge_en, is_learning, sort_order)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    let mut insert_skill = conn.prepare_cached(
        "INSERT INTO skills (id, category_id, name, icon, color, sort_order)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for (i, c) in categories.iter().enumerate() {
        insert_category.execute(params![
            c.id,
            c.title.ru,
            c.title.en,
            c.badge.as_ref().map(|b| b.ru.as_str()),
            c.badge.as_ref().map(|b| b.en.as_str()),
            c.is_learning,
            i as i64 + 1,
        ])?;
        for (j, s) in c.skills.iter().enumerate() {
            insert_skill.execute(params![s.id, c.id, s.name, s.icon, s.color, j as i64 + 1])?;
        }
    }
    Ok(())
}

fn read_contacts(conn: &Connection) -> rusqlite::Result<Vec<Contact>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, type, label_ru, label_en, value, link, icon, color, sort_order
         FROM contacts ORDER BY sort_order",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Contact {
            id: row.get(0)?,
            kind: row.get(1)?,
            label: Localized::new(row.get::<_, String>(2)?, row.get::<_, String>(3)?),
            value: row.get(4)?,
            link: row.get(5)?,
            icon: row.get(6)?,
            color: row.get(7)?,
            order: row.get(8)?,
        })
    })?;
    rows.collect()
}

fn write_contacts(conn: &Connection, contacts: &[Contact]) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM contacts", [])?;
    let mut insert = conn.prepare_cached(
        "INSERT INTO contacts (id, type, label_ru, label_en, value, link, icon, color, sort_order)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    for (i, c) in contacts.iter().enumerate() {
        insert.execute(params![
            c.id,
            c.kind,
            c.label.ru,
            c.label.en,
            c.value,
            c.link,
            c.icon,
            c.color,
            i as i64 + 1,
        ])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::migrations::run_migrations;
    use crate::storage::sqlite::apply_connection_pragmas;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        apply_connection_pragmas(&conn).unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_about_round_trips_with_stats_in_order() {
        let conn = conn();
        let about = default_content().about;
        write_about(&conn, &about).unwrap();
        let stored = read_about(&conn).unwrap().unwrap();
        assert_eq!(stored, about);
    }

    #[test]
    fn test_read_about_missing_is_none() {
        let conn = conn();
        assert!(read_about(&conn).unwrap().is_none());
    }

    #[test]
    fn test_skill_rewrite_cascades_old_skills() {
        let conn = conn();
        write_skills(&conn, &default_content().skills).unwrap();
        write_skills(&conn, &[]).unwrap();

        let orphaned: i64 = conn
            .query_row("SELECT COUNT(*) FROM skills", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphaned, 0);
    }

    #[test]
    fn test_badge_requires_both_locales_to_surface() {
        let conn = conn();
        let mut skills = default_content().skills;
        skills[0].badge = Some(Localized::new("изучаю", "learning"));
        write_skills(&conn, &skills).unwrap();
        let stored = read_skills(&conn).unwrap();
        assert_eq!(stored[0].badge, Some(Localized::new("изучаю", "learning")));
    }

    #[test]
    fn test_project_lists_survive_json_columns() {
        let conn = conn();
        let projects = default_content().projects;
        write_projects(&conn, &projects).unwrap();
        let stored = read_projects(&conn).unwrap();
        assert_eq!(stored[0].tags, projects[0].tags);
        assert_eq!(stored[0].categories, projects[0].categories);
    }
}
