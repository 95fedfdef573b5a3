use crate::media::{MediaProbe, SlideMedia};
use crate::registry::{Registry, SlideRecord};
use crate::reveal::{self, RevealTimeline};

/// Character budget for one description line.
pub const DESCRIPTION_LINE_CHARS: usize = 48;

pub const CTA_LABEL: &str = "View Project";
pub const TAGS_LABEL: &str = "Tags";

/// Call-to-action on a slide. `source_index` is the zero-based position of
/// the originating record, used to look it up when the link is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallToAction {
    pub label: String,
    pub source_index: usize,
}

/// Everything the renderer needs to draw one slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideView {
    /// 1-based position in the deck.
    pub index: usize,
    pub media: SlideMedia,
    pub title_words: Vec<String>,
    pub description_lines: Vec<String>,
    pub cta: CallToAction,
    /// Zero-padded current index, separator and total.
    pub index_lines: Vec<String>,
    /// The "Tags" label followed by each tag.
    pub tag_lines: Vec<String>,
    pub timeline: RevealTimeline,
}

impl SlideView {
    pub fn build(
        record: &SlideRecord,
        index: usize,
        total: usize,
        registry: &Registry,
        probe: &dyn MediaProbe,
    ) -> Self {
        let title_words = reveal::split_words(&record.title);
        let description_lines = reveal::wrap_lines(&record.description, DESCRIPTION_LINE_CHARS);
        let index_lines = vec![pad2(index), "/".to_string(), pad2(total)];
        let tag_lines: Vec<String> = std::iter::once(TAGS_LABEL.to_string())
            .chain(record.tags.iter().cloned())
            .collect();
        let cta = CallToAction {
            label: CTA_LABEL.to_string(),
            source_index: index.saturating_sub(1),
        };

        let timeline = RevealTimeline::for_counts(
            title_words.len(),
            tag_lines.len(),
            index_lines.len(),
            description_lines.len(),
            1,
        );

        Self {
            index,
            media: SlideMedia::for_record(record, registry, probe),
            title_words,
            description_lines,
            cta,
            index_lines,
            tag_lines,
            timeline,
        }
    }

    /// Build the view for 1-based `index` of `registry`.
    pub fn from_registry(registry: &Registry, index: usize, probe: &dyn MediaProbe) -> Option<Self> {
        let record = registry.get(index)?;
        Some(Self::build(record, index, registry.len(), registry, probe))
    }
}

fn pad2(n: usize) -> String {
    format!("{n:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::FsProbe;

    fn record() -> SlideRecord {
        SlideRecord {
            slug: Some("toner".into()),
            title: "Toner Package Design".into(),
            description: "A refill-friendly toner bottle with a clean label system and a soft gradient palette."
                .into(),
            tags: vec!["Branding".into(), "Package".into()],
            image_path: "img/toner.png".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_segments_text() {
        let reg = Registry::from_records(vec![record()]);
        let view = SlideView::build(&record(), 3, 12, &reg, &FsProbe);
        assert_eq!(view.title_words, vec!["Toner", "Package", "Design"]);
        assert_eq!(view.index_lines, vec!["03", "/", "12"]);
        assert_eq!(view.tag_lines, vec!["Tags", "Branding", "Package"]);
        assert!(view.description_lines.len() >= 2);
        assert!(
            view.description_lines
                .iter()
                .all(|l| l.chars().count() <= DESCRIPTION_LINE_CHARS)
        );
    }

    #[test]
    fn test_cta_carries_zero_based_source_index() {
        let reg = Registry::from_records(vec![record()]);
        let view = SlideView::build(&record(), 3, 5, &reg, &FsProbe);
        assert_eq!(view.cta.label, "View Project");
        assert_eq!(view.cta.source_index, 2);
    }

    #[test]
    fn test_timeline_counts_match_units() {
        let reg = Registry::from_records(vec![record()]);
        let view = SlideView::build(&record(), 1, 5, &reg, &FsProbe);
        assert_eq!(view.timeline.title.units, 3);
        assert_eq!(view.timeline.tags.units, 3);
        assert_eq!(view.timeline.index.units, 3);
        assert_eq!(view.timeline.link.units, 1);
    }

    #[test]
    fn test_from_registry_out_of_range() {
        let reg = Registry::from_records(vec![record()]);
        assert!(SlideView::from_registry(&reg, 2, &FsProbe).is_none());
        assert!(SlideView::from_registry(&reg, 0, &FsProbe).is_none());
        assert_eq!(
            SlideView::from_registry(&reg, 1, &FsProbe).map(|v| v.index),
            Some(1)
        );
    }
}
