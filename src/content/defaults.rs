use crate::content::types::{
    AboutContent, Contact, Localized, Project, ProjectLinks, SiteContent, Skill, SkillCategory,
    Stat,
};

const BIO_RU: &str = "Я full-stack разработчик, в IT с 2021 года. На фронтенде использую \
TypeScript, React, Next.js, Vue.js и Nuxt, стилизую через Tailwind и Sass. Бэкенды пишу на Go, \
Python и Node.js. Работаю с PostgreSQL, MongoDB, Redis. Также изучаю Rust и Java. Использую \
Docker, GitHub Actions и Nginx для CI/CD и деплоя.";

const BIO_EN: &str = "I'm a full-stack developer, in IT since 2021. On the frontend I use \
TypeScript, React, Next.js, Vue.js and Nuxt, styling with Tailwind and Sass. Backends are \
written in Go, Python and Node.js. I work with PostgreSQL, MongoDB, Redis. Also learning Rust \
and Java. Using Docker, GitHub Actions and Nginx for CI/CD and deployment.";

/// First-run dataset. Deterministic apart from `updated_at`, which the
/// store stamps when it persists the seed.
pub fn default_content() -> SiteContent {
    SiteContent {
        about: AboutContent {
            id: 1,
            name: Localized::new("Георгий", "Georgy"),
            username: "@Kyureno".to_string(),
            title: Localized::new("Full-stack разработчик", "Full-stack developer"),
            bio: Localized::new(BIO_RU, BIO_EN),
            photo: "/logo.png".to_string(),
            stats: vec![
                stat(
                    ("4+ лет", "4+ years"),
                    ("в разработке", "in development"),
                    "calendar",
                    "#3178C6",
                ),
                stat(("10+", "10+"), ("проектов", "projects"), "rocket", "#8B5CF6"),
                stat(("40+", "40+"), ("технологий", "technologies"), "code", "#00ADD8"),
                stat(("РАНХиГС", "RANEPA"), ("обучение", "studying"), "graduation", "#10B981"),
            ],
            updated_at: 0,
        },
        projects: vec![Project {
            id: "portfolio".to_string(),
            title: Localized::new("Портфолио", "Portfolio"),
            description: Localized::new(
                "Персональный сайт-портфолио",
                "Personal portfolio website",
            ),
            image: "/portfolio.jpg".to_string(),
            tags: ["Next.js", "TypeScript", "Tailwind", "Rust"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            categories: vec!["fullstack".to_string()],
            links: ProjectLinks {
                github: Some("https://github.com/Kyureno2374/portfolio-v3".to_string()),
                demo: None,
            },
            glow_color: Some("#3178C6".to_string()),
            featured: true,
            order: 1,
        }],
        skills: vec![SkillCategory {
            id: "frontend".to_string(),
            title: Localized::new("Фронтенд", "Frontend"),
            badge: None,
            is_learning: false,
            skills: vec![
                skill("typescript", "TypeScript", "SiTypescript", "#3178C6"),
                skill("react", "React", "SiReact", "#61DAFB"),
                skill("nextjs", "Next.js", "SiNextdotjs", "#000000"),
            ],
            order: 1,
        }],
        contacts: vec![
            contact(
                "telegram",
                "Telegram",
                "@kyurenodev",
                "https://t.me/kyurenodev",
                "FaTelegram",
                "#0088cc",
                1,
            ),
            contact(
                "discord",
                "Discord",
                "kyureno",
                "https://discord.com/users/kyureno",
                "FaDiscord",
                "#5865F2",
                2,
            ),
            contact(
                "github",
                "GitHub",
                "Kyureno2374",
                "https://github.com/Kyureno2374",
                "FaGithub",
                "#333333",
                3,
            ),
        ],
    }
}

fn stat(value: (&str, &str), label: (&str, &str), icon: &str, color: &str) -> Stat {
    Stat {
        value: Localized::new(value.0, value.1),
        label: Localized::new(label.0, label.1),
        icon: icon.to_string(),
        color: color.to_string(),
    }
}

fn skill(id: &str, name: &str, icon: &str, color: &str) -> Skill {
    Skill {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
    }
}

fn contact(
    id: &str,
    label: &str,
    value: &str,
    link: &str,
    icon: &str,
    color: &str,
    order: i64,
) -> Contact {
    Contact {
        id: id.to_string(),
        kind: "social".to_string(),
        label: Localized::both(label),
        value: value.to_string(),
        link: link.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        order,
    }
}
