use parking_lot::Mutex;

use crate::{
    clock::Clock,
    constants::{DESCRIPTION_ENTRY_PREFIX, IMAGE_ENTRY_PREFIX, INITIAL_DESCRIPTION_ID, INITIAL_IMAGE_ID},
    entities::{
        content::{ContentEntry, ContentKind},
        project::{Project, ProjectPatch},
    },
};

/// Display order of a project's images and text blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTimeline {
    entries: Vec<ContentEntry>,
}

/// A new entry together with the single update that persists it.
#[derive(Debug, Clone, PartialEq)]
pub struct AppendPlan {
    pub entry: ContentEntry,
    pub patch: ProjectPatch,
}

impl ContentTimeline {
    /// A stored timeline wins. Older projects only have the cover image and description,
    /// which become the first two entries.
    pub fn from_project(project: &Project) -> Self {
        if !project.content_timeline.is_empty() {
            return ContentTimeline {
                entries: project.content_timeline.clone(),
            };
        }

        let mut entries = Vec::with_capacity(2);
        if !project.image.is_empty() {
            entries.push(ContentEntry::image(INITIAL_IMAGE_ID, project.image.clone()));
        }
        if !project.description.is_empty() {
            entries.push(ContentEntry::description(INITIAL_DESCRIPTION_ID, project.description.clone()));
        }
        ContentTimeline { entries }
    }

    pub fn entries(&self) -> &[ContentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    fn appended(&self, entry: ContentEntry) -> Vec<ContentEntry> {
        let mut entries = self.entries.clone();
        entries.push(entry);
        entries
    }

    /// Both `images` and `contentTimeline` travel in the same patch so readers never see one without the other.
    pub fn plan_image(&self, project: &Project, id: String, blob: String) -> AppendPlan {
        let entry = ContentEntry {
            id,
            kind: ContentKind::Image,
            content: blob.clone(),
        };
        let mut images = project.images.clone();
        images.push(blob);

        AppendPlan {
            patch: ProjectPatch {
                images: Some(images),
                content_timeline: Some(self.appended(entry.clone())),
                ..Default::default()
            },
            entry,
        }
    }

    pub fn plan_description(&self, project: &Project, id: String, text: String) -> AppendPlan {
        let entry = ContentEntry {
            id,
            kind: ContentKind::Description,
            content: text.clone(),
        };
        let mut descriptions = project.descriptions.clone();
        descriptions.push(text);

        AppendPlan {
            patch: ProjectPatch {
                descriptions: Some(descriptions),
                content_timeline: Some(self.appended(entry.clone())),
                ..Default::default()
            },
            entry,
        }
    }
}

/// Issues `<prefix>-<millis>` ids that never repeat, even within one millisecond.
pub struct EntryIdGenerator<C: Clock> {
    clock: C,
    last: Mutex<i64>,
}

impl<C: Clock> EntryIdGenerator<C> {
    pub fn new(clock: C) -> Self {
        EntryIdGenerator {
            clock,
            last: Mutex::new(0),
        }
    }

    pub fn next(&self, kind: ContentKind, timeline: &ContentTimeline) -> String {
        let prefix = match kind {
            ContentKind::Image => IMAGE_ENTRY_PREFIX,
            ContentKind::Description => DESCRIPTION_ENTRY_PREFIX,
        };

        let mut last = self.last.lock();
        let mut stamp = self.clock.now_millis().max(*last + 1);
        let mut id = format!("{}-{}", prefix, stamp);
        while timeline.contains(&id) {
            stamp += 1;
            id = format!("{}-{}", prefix, stamp);
        }
        *last = stamp;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::project::{NewProject, ProjectId};

    struct StoppedClock(i64);

    impl Clock for StoppedClock {
        fn now_millis(&self) -> i64 {
            self.0
        }
    }

    fn project() -> Project {
        NewProject {
            title: "Fjords".into(),
            description: "Blue hour over the water".into(),
            image: "data:image/jpeg;base64,COVER".into(),
            ..Default::default()
        }
        .into_project(ProjectId::Number(1))
    }

    #[test]
    fn legacy_fields_become_image_then_description() {
        let timeline = ContentTimeline::from_project(&project());

        let entries = timeline.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ContentEntry::image("initial-image", "data:image/jpeg;base64,COVER"));
        assert_eq!(entries[1], ContentEntry::description("initial-desc", "Blue hour over the water"));
    }

    #[test]
    fn missing_legacy_fields_are_skipped() {
        let mut project = project();
        project.image.clear();

        let timeline = ContentTimeline::from_project(&project);

        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.entries()[0].id, "initial-desc");
    }

    #[test]
    fn stored_timeline_is_the_only_source_of_order() {
        let mut project = project();
        project.content_timeline = vec![ContentEntry::description("desc-5", "Later thoughts")];

        let timeline = ContentTimeline::from_project(&project);

        assert_eq!(timeline.entries(), &project.content_timeline[..]);
    }

    #[test]
    fn image_plan_updates_both_lists_in_one_patch() {
        let project = project();
        let timeline = ContentTimeline::from_project(&project);

        let plan = timeline.plan_image(&project, "image-10".into(), "data:image/jpeg;base64,NEW".into());

        assert_eq!(plan.patch.images, Some(vec!["data:image/jpeg;base64,NEW".to_string()]));
        let stored = plan.patch.content_timeline.unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[2], plan.entry);
        assert!(plan.patch.descriptions.is_none());
    }

    #[test]
    fn description_plan_appends_to_descriptions() {
        let mut project = project();
        project.descriptions = vec!["first".into()];
        let timeline = ContentTimeline::from_project(&project);

        let plan = timeline.plan_description(&project, "desc-3".into(), "second".into());

        assert_eq!(plan.patch.descriptions, Some(vec!["first".to_string(), "second".to_string()]));
        assert_eq!(plan.entry.kind, ContentKind::Description);
        assert!(plan.patch.images.is_none());
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let ids = EntryIdGenerator::new(StoppedClock(1_700_000_000_000));
        let timeline = ContentTimeline::from_project(&project());

        let first = ids.next(ContentKind::Image, &timeline);
        let second = ids.next(ContentKind::Description, &timeline);
        let third = ids.next(ContentKind::Image, &timeline);

        assert_eq!(first, "image-1700000000000");
        assert_eq!(second, "desc-1700000000001");
        assert_eq!(third, "image-1700000000002");
    }

    #[test]
    fn ids_skip_ones_already_in_the_timeline() {
        let ids = EntryIdGenerator::new(StoppedClock(500));
        let mut project = project();
        project.content_timeline = vec![
            ContentEntry::image("image-500", "a"),
            ContentEntry::image("image-501", "b"),
        ];
        let timeline = ContentTimeline::from_project(&project);

        assert_eq!(ids.next(ContentKind::Image, &timeline), "image-502");
    }
}
