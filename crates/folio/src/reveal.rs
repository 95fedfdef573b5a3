//! Staggered text reveal played while a slide enters.
//!
//! Text is cut into units (title words, wrapped lines) that start one line
//! below their mask and slide up into place. Each group of units is a
//! [`Track`]; [`RevealTimeline`] places the tracks relative to the moment the
//! slide is mounted.

use std::time::Duration;

use crate::render::transition::Ease;

const UNIT_DURATION: f32 = 1.0;
const UNIT_STAGGER: f32 = 0.1;
const TITLE_START: f32 = 0.75;
/// Tags, index and description begin this long before the title finishes.
const BODY_OVERLAP: f32 = 0.75;
/// The link begins this long before everything else finishes.
const LINK_OVERLAP: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealGroup {
    TitleWords,
    Tags,
    Index,
    Description,
    Link,
}

/// A run of `units` that start `stagger` seconds apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub start: f32,
    pub duration: f32,
    pub stagger: f32,
    pub units: usize,
}

impl Track {
    fn new(start: f32, units: usize, stagger: f32) -> Self {
        Self {
            start,
            duration: UNIT_DURATION,
            stagger,
            units,
        }
    }

    /// Time the last unit settles. A track with no units still occupies
    /// its base duration.
    pub fn end(&self) -> f32 {
        self.start + self.duration + self.stagger * self.units.saturating_sub(1) as f32
    }

    pub fn unit_start(&self, unit: usize) -> f32 {
        self.start + self.stagger * unit as f32
    }

    /// Vertical offset of `unit` at `t`, as a fraction of its line height.
    /// 1.0 is fully hidden below the mask, 0.0 is in place.
    pub fn offset(&self, unit: usize, t: f32) -> f32 {
        let p = ((t - self.unit_start(unit)) / self.duration).clamp(0.0, 1.0);
        1.0 - Ease::Power4Out.apply(p)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealTimeline {
    pub title: Track,
    pub tags: Track,
    pub index: Track,
    pub description: Track,
    pub link: Track,
}

impl RevealTimeline {
    /// Lay out the tracks for a slide with the given unit counts.
    pub fn for_counts(
        title_words: usize,
        tag_lines: usize,
        index_lines: usize,
        description_lines: usize,
        link_lines: usize,
    ) -> Self {
        let title = Track::new(TITLE_START, title_words, UNIT_STAGGER);
        let body_start = (title.end() - BODY_OVERLAP).max(0.0);
        let tags = Track::new(body_start, tag_lines, UNIT_STAGGER);
        let index = Track::new(body_start, index_lines, UNIT_STAGGER);
        let description = Track::new(body_start, description_lines, UNIT_STAGGER);

        let so_far = title
            .end()
            .max(tags.end())
            .max(index.end())
            .max(description.end());
        let link = Track::new((so_far - LINK_OVERLAP).max(0.0), link_lines, 0.0);

        Self {
            title,
            tags,
            index,
            description,
            link,
        }
    }

    pub fn track(&self, group: RevealGroup) -> &Track {
        match group {
            RevealGroup::TitleWords => &self.title,
            RevealGroup::Tags => &self.tags,
            RevealGroup::Index => &self.index,
            RevealGroup::Description => &self.description,
            RevealGroup::Link => &self.link,
        }
    }

    /// Offset of unit `unit` of `group`, `elapsed` after the slide mounted.
    pub fn offset(&self, group: RevealGroup, unit: usize, elapsed: Duration) -> f32 {
        self.track(group).offset(unit, elapsed.as_secs_f32())
    }

    /// Seconds from mount until every unit is in place.
    pub fn end(&self) -> f32 {
        [
            &self.title,
            &self.tags,
            &self.index,
            &self.description,
            &self.link,
        ]
        .iter()
        .map(|t| t.end())
        .fold(0.0, f32::max)
    }
}

/// Split a title into word units.
pub fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Greedy word wrap into lines of at most `max_chars` characters. A single
/// word longer than the budget gets a line of its own.
pub fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_title_track() {
        let tl = RevealTimeline::for_counts(3, 2, 3, 2, 1);
        assert!(approx(tl.title.start, 0.75));
        assert!(approx(tl.title.end(), 0.75 + 1.0 + 0.2));
    }

    #[test]
    fn test_body_tracks_share_start() {
        let tl = RevealTimeline::for_counts(4, 3, 3, 5, 1);
        let body = tl.title.end() - 0.75;
        assert!(approx(tl.tags.start, body));
        assert!(approx(tl.index.start, body));
        assert!(approx(tl.description.start, body));
    }

    #[test]
    fn test_link_overlaps_end_by_one_second() {
        let tl = RevealTimeline::for_counts(2, 2, 3, 6, 1);
        let before_link = tl.title.end().max(tl.description.end());
        assert!(approx(tl.link.start, before_link - 1.0));
        assert_eq!(tl.link.stagger, 0.0);
        assert!(approx(tl.end(), before_link));
    }

    #[test]
    fn test_title_words_reveal_first() {
        let tl = RevealTimeline::for_counts(3, 2, 3, 2, 1);
        for group in [
            RevealGroup::Tags,
            RevealGroup::Index,
            RevealGroup::Description,
            RevealGroup::Link,
        ] {
            assert!(tl.track(group).start >= tl.title.start, "{group:?}");
        }
    }

    #[test]
    fn test_unit_offsets() {
        let tl = RevealTimeline::for_counts(3, 1, 3, 1, 1);
        assert_eq!(tl.offset(RevealGroup::TitleWords, 0, Duration::ZERO), 1.0);
        assert!(approx(
            tl.offset(RevealGroup::TitleWords, 0, Duration::from_millis(750)),
            1.0
        ));
        let mid = tl.offset(RevealGroup::TitleWords, 0, Duration::from_millis(1250));
        assert!(mid > 0.0 && mid < 1.0);
        // Later words lag earlier ones.
        let t = Duration::from_millis(1000);
        assert!(
            tl.offset(RevealGroup::TitleWords, 2, t) > tl.offset(RevealGroup::TitleWords, 0, t)
        );
        let done = Duration::from_secs_f32(tl.end() + 0.01);
        for unit in 0..3 {
            assert_eq!(tl.offset(RevealGroup::TitleWords, unit, done), 0.0);
        }
    }

    #[test]
    fn test_empty_tracks_do_not_panic() {
        let tl = RevealTimeline::for_counts(0, 0, 0, 0, 0);
        assert!(tl.end() > 0.0);
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("  Pine  Cut "), vec!["Pine", "Cut"]);
        assert!(split_words("").is_empty());
    }

    #[test]
    fn test_wrap_lines() {
        let lines = wrap_lines("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 9));
    }

    #[test]
    fn test_wrap_long_word_and_paragraphs() {
        let lines = wrap_lines("supercalifragilistic\nshort", 5);
        assert_eq!(lines, vec!["supercalifragilistic", "short"]);
        assert!(wrap_lines("   ", 10).is_empty());
    }
}
