use crate::registry::SlideRecord;

/// Query parameters that choose the starting slide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartQuery {
    /// Slug or fuzzy-match text.
    pub project: Option<String>,
    /// 1-based slide number, unparsed.
    pub slide: Option<String>,
}

impl StartQuery {
    /// Parse a full URL (`https://host/projects.html?project=toner`) or a bare
    /// query string (`?slide=3`, `project=toner&slide=2`). Unknown keys are
    /// ignored; the first occurrence of a key wins.
    pub fn parse(input: &str) -> Self {
        let query = match url::Url::parse(input) {
            Ok(u) => u.query().unwrap_or_default().to_string(),
            Err(_) => input
                .split_once('?')
                .map(|(_, q)| q)
                .unwrap_or(input)
                .split('#')
                .next()
                .unwrap_or_default()
                .to_string(),
        };

        let mut out = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "project" if out.project.is_none() => out.project = Some(value.into_owned()),
                "slide" if out.slide.is_none() => out.slide = Some(value.into_owned()),
                _ => {}
            }
        }
        out
    }

    /// Overlay explicit values (e.g. CLI flags) on top of this query.
    pub fn with_overrides(mut self, project: Option<String>, slide: Option<String>) -> Self {
        if project.is_some() {
            self.project = project;
        }
        if slide.is_some() {
            self.slide = slide;
        }
        self
    }
}

/// Map a start query to a 1-based slide index. Never fails: anything that
/// does not match falls back to slide 1.
pub fn resolve(query: &StartQuery, records: &[SlideRecord]) -> usize {
    let total = records.len();

    if let Some(project) = query.project.as_deref().filter(|p| !p.is_empty()) {
        if let Some(pos) = records
            .iter()
            .position(|r| r.slug.as_deref().unwrap_or_default() == project)
        {
            return pos + 1;
        }

        let needle = project.to_lowercase();
        if let Some(pos) = records.iter().position(|r| {
            r.image_path.contains(project) || r.title.to_lowercase().contains(&needle)
        }) {
            return pos + 1;
        }
        tracing::debug!(project, "no slide matches project parameter");
    }

    if let Some(slide) = query.slide.as_deref() {
        match slide_number(slide) {
            Some(n) if (1..=total).contains(&n) => return n,
            _ => tracing::debug!(slide, total, "ignoring out-of-range slide parameter"),
        }
    }

    1
}

/// Numeric value of a `slide` parameter. Any integral number is accepted,
/// so `3`, `3.0` and `3e0` all mean slide 3.
fn slide_number(raw: &str) -> Option<usize> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > usize::MAX as f64 {
        return None;
    }
    Some(value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<SlideRecord> {
        let rec = |slug: &str, title: &str, image: &str| SlideRecord {
            slug: Some(slug.to_string()),
            title: title.to_string(),
            image_path: image.to_string(),
            ..Default::default()
        };
        vec![
            rec("pinecut", "Pineapple Enzyme", "./projects_img/project_pinecut.gif"),
            rec("shampoobar", "Nature Rocks Bar", "./projects_img/project_shampoo.jpg"),
            rec("toner", "Coral Refresh Toner", "./projects_img/project_toner.jpg"),
            rec("salad", "Organic Fresh Salad", "./projects_img/project_salad.jpg"),
            rec("banner", "Event Banner", "./projects_img/project_banner.jpg"),
        ]
    }

    fn q(project: Option<&str>, slide: Option<&str>) -> StartQuery {
        StartQuery {
            project: project.map(String::from),
            slide: slide.map(String::from),
        }
    }

    #[test]
    fn test_exact_slug() {
        assert_eq!(resolve(&q(Some("toner"), None), &records()), 3);
        assert_eq!(resolve(&q(Some("banner"), None), &records()), 5);
    }

    #[test]
    fn test_unmatched_project_defaults_to_first() {
        assert_eq!(resolve(&q(Some("nonexistent"), None), &records()), 1);
    }

    #[test]
    fn test_slide_number() {
        assert_eq!(resolve(&q(None, Some("3")), &records()), 3);
        assert_eq!(resolve(&q(None, Some("99")), &records()), 1);
        assert_eq!(resolve(&q(None, Some("0")), &records()), 1);
        assert_eq!(resolve(&q(None, Some("two")), &records()), 1);
        assert_eq!(resolve(&q(None, Some("2.5")), &records()), 1);
    }

    #[test]
    fn test_integral_slide_number_forms() {
        assert_eq!(resolve(&q(None, Some("3.0")), &records()), 3);
        assert_eq!(resolve(&q(None, Some("3e0")), &records()), 3);
        assert_eq!(resolve(&q(None, Some(" 4 ")), &records()), 4);
        assert_eq!(resolve(&q(None, Some("5.00")), &records()), 5);
        assert_eq!(resolve(&q(None, Some("-1")), &records()), 1);
        assert_eq!(resolve(&q(None, Some("NaN")), &records()), 1);
        assert_eq!(resolve(&q(None, Some("inf")), &records()), 1);
        assert_eq!(resolve(&q(None, Some("")), &records()), 1);
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(resolve(&StartQuery::default(), &records()), 1);
    }

    #[test]
    fn test_fuzzy_title_is_case_insensitive() {
        assert_eq!(resolve(&q(Some("FRESH SALAD"), None), &records()), 4);
    }

    #[test]
    fn test_fuzzy_image_path() {
        assert_eq!(resolve(&q(Some("project_shampoo"), None), &records()), 2);
    }

    #[test]
    fn test_short_fuzzy_text_takes_first_match() {
        // "e" appears in the first title; permissive on purpose.
        assert_eq!(resolve(&q(Some("e"), None), &records()), 1);
    }

    #[test]
    fn test_project_wins_over_slide() {
        assert_eq!(resolve(&q(Some("salad"), Some("2")), &records()), 4);
        assert_eq!(resolve(&q(Some("nope"), Some("2")), &records()), 2);
    }

    #[test]
    fn test_duplicate_slugs_first_wins() {
        let mut recs = records();
        recs[4].slug = Some("toner".into());
        assert_eq!(resolve(&q(Some("toner"), None), &recs), 3);
    }

    #[test]
    fn test_parse_query_forms() {
        assert_eq!(
            StartQuery::parse("https://site.test/projects.html?project=toner&slide=2"),
            q(Some("toner"), Some("2"))
        );
        assert_eq!(StartQuery::parse("?slide=3"), q(None, Some("3")));
        assert_eq!(StartQuery::parse("project=coral%20refresh"), q(Some("coral refresh"), None));
        assert_eq!(StartQuery::parse("projects.html?project=a#top"), q(Some("a"), None));
        assert_eq!(StartQuery::parse(""), StartQuery::default());
    }

    #[test]
    fn test_overrides() {
        let query = StartQuery::parse("?project=toner&slide=2").with_overrides(None, Some("4".into()));
        assert_eq!(query, q(Some("toner"), Some("4")));
    }
}
