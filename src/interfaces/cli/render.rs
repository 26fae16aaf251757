//! Plain-text views of the gallery and the project detail page.

use std::fmt::Write as _;

use crate::{
    entities::{
        content::{ContentEntry, ContentKind},
        project::Project,
        user::User,
    },
    use_cases::timeline::ContentTimeline,
};

const SUMMARY_WIDTH: usize = 72;

pub fn gallery(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects yet.\n".to_string();
    }

    let mut out = String::new();
    for project in projects {
        let _ = writeln!(out, "[{}] {}", project.id, project.title);
        if !project.date.is_empty() {
            let _ = writeln!(out, "    {}", project.date);
        }
        if !project.description.is_empty() {
            let _ = writeln!(out, "    {}", summary(&project.description, SUMMARY_WIDTH));
        }
        if !project.technologies.is_empty() {
            let _ = writeln!(out, "    Tools: {}", project.technologies.join(", "));
        }
        if !project.image.is_empty() {
            let _ = writeln!(out, "    Cover: {}", image_label(&project.image));
        }
        out.push('\n');
    }
    out
}

/// Detail page. Each timeline entry is rendered by its kind; `focus` marks the entry to jump to.
pub fn detail(project: &Project, focus: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", project.title);
    let _ = writeln!(out, "{}", "=".repeat(project.title.chars().count().max(1)));
    let _ = writeln!(out, "By {}", project.creator_name());
    if !project.date.is_empty() {
        let _ = writeln!(out, "Date: {}", project.date);
    }
    if !project.link.is_empty() {
        let _ = writeln!(out, "Link: {}", project.link);
    }
    if project.technologies.is_empty() {
        let _ = writeln!(out, "Tools: none");
    } else {
        let _ = writeln!(out, "Tools: {}", project.technologies.join(", "));
    }
    out.push('\n');

    let timeline = ContentTimeline::from_project(project);
    if timeline.is_empty() {
        out.push_str("No content yet.\n");
        return out;
    }
    for entry in timeline.entries() {
        let marker = if focus == Some(entry.id.as_str()) { ">>" } else { "  " };
        out.push_str(&timeline_entry(entry, marker));
    }
    out
}

fn timeline_entry(entry: &ContentEntry, marker: &str) -> String {
    match entry.kind {
        ContentKind::Image => format!("{} [{}] image: {}\n", marker, entry.id, image_label(&entry.content)),
        ContentKind::Description => {
            let mut block = format!("{} [{}]\n", marker, entry.id);
            for line in entry.content.lines() {
                let _ = writeln!(block, "     {}", line);
            }
            block
        }
    }
}

pub fn user_card(user: &User) -> String {
    format!("{} <{}> ({})\n", user.display_name(), user.email, user.role)
}

/// Inline images are summarized by type and size; anything else is assumed to be a URL.
fn image_label(image: &str) -> String {
    match image.strip_prefix("data:").and_then(|rest| rest.split_once(";base64,")) {
        Some((media_type, payload)) => {
            let bytes = payload.len() / 4 * 3;
            format!("{} inline, ~{} KB", media_type, bytes.div_ceil(1024))
        }
        None => image.to_string(),
    }
}

fn summary(text: &str, width: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() <= width && first_line.len() == text.len() {
        return first_line.to_string();
    }
    let cut: String = first_line.chars().take(width).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::project::{NewProject, ProjectId};

    fn project() -> Project {
        let mut project = NewProject {
            title: "Salt Flats".into(),
            description: "White ground, white sky".into(),
            image: "https://example.com/cover.jpg".into(),
            technologies: vec!["Sony A7".into()],
            ..Default::default()
        }
        .into_project(ProjectId::Number(9));
        project.content_timeline = vec![
            ContentEntry::image("image-1", "data:image/jpeg;base64,AAAA"),
            ContentEntry::description("desc-2", "Shot at noon"),
        ];
        project
    }

    #[test]
    fn gallery_lists_every_card() {
        let out = gallery(&[project()]);

        assert!(out.contains("[9] Salt Flats"));
        assert!(out.contains("Tools: Sony A7"));
        assert!(out.contains("Cover: https://example.com/cover.jpg"));
    }

    #[test]
    fn detail_renders_entries_by_kind_in_order() {
        let out = detail(&project(), Some("desc-2"));

        let image_at = out.find("[image-1] image: image/jpeg inline").unwrap();
        let text_at = out.find(">> [desc-2]").unwrap();
        assert!(image_at < text_at);
        assert!(out.contains("     Shot at noon"));
        assert!(out.contains("By Unknown"));
    }

    #[test]
    fn long_descriptions_are_shortened() {
        let text = "word ".repeat(40);

        let short = summary(&text, 20);

        assert!(short.ends_with("..."));
        assert!(short.chars().count() <= 23);
    }
}
