use askama::Template;
use chrono::NaiveDateTime;
use tracing::info;

use crate::fetcher::{Fetcher, Headline, HEADLINES_PER_SOURCE};
use crate::registry::{Category, Registry};
use crate::view::ViewState;

/// Widest grid the stylesheet defines.
pub const MAX_COLUMNS: usize = 4;

const ALL_PILL_LABEL: &str = "✦ All";

pub struct HeadlineRow {
    pub number: String,
    pub title: String,
    pub link: String,
}

/// One source's box in a section grid. No headlines renders the placeholder.
pub struct SourceCard {
    pub name: String,
    pub headlines: Vec<HeadlineRow>,
}

impl SourceCard {
    pub fn new(name: impl Into<String>, headlines: Vec<Headline>) -> Self {
        let headlines = headlines
            .into_iter()
            .enumerate()
            .map(|(i, h)| HeadlineRow {
                number: format!("{:02}", i + 1),
                title: h.title,
                link: h.link,
            })
            .collect();

        Self {
            name: name.into(),
            headlines,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.headlines.is_empty()
    }
}

#[derive(Template)]
#[template(path = "section.html")]
pub struct SectionTemplate<'a> {
    pub category: &'a Category,
    pub cards: &'a [SourceCard],
    pub columns: usize,
    pub hidden: bool,
    pub collapsed: bool,
}

pub struct PillView<'a> {
    pub target: &'a str,
    pub label: &'a str,
    pub active: bool,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub owner: &'a str,
    pub date: String,
    pub time: String,
    pub source_count: usize,
    pub pills: Vec<PillView<'a>>,
    pub sections: Vec<String>,
}

pub fn render_section(
    category: &Category,
    cards: &[SourceCard],
    view: &ViewState,
) -> Result<String, askama::Error> {
    SectionTemplate {
        category,
        cards,
        columns: category.sources.len().clamp(1, MAX_COLUMNS),
        hidden: !view.is_visible(&category.id),
        collapsed: view.is_collapsed(&category.id),
    }
    .render()
}

pub fn render_page(
    owner: &str,
    registry: &Registry,
    view: &ViewState,
    sections: Vec<String>,
    now: NaiveDateTime,
) -> Result<String, askama::Error> {
    let pills = view
        .pills()
        .into_iter()
        .map(|pill| PillView {
            target: pill.target,
            label: registry
                .get(pill.target)
                .map(|c| c.label.as_str())
                .unwrap_or(ALL_PILL_LABEL),
            active: pill.active,
        })
        .collect();

    DashboardTemplate {
        owner,
        date: now.format("%A, %B %d, %Y").to_string(),
        time: now.format("%I:%M %p").to_string(),
        source_count: registry.source_count(),
        pills,
        sections,
    }
    .render()
}

pub struct Dashboard {
    registry: Registry,
    fetcher: Fetcher,
    owner: String,
    max_items: usize,
}

impl Dashboard {
    pub fn new(registry: Registry, fetcher: Fetcher, owner: impl Into<String>) -> Self {
        Self {
            registry,
            fetcher,
            owner: owner.into(),
            max_items: HEADLINES_PER_SOURCE,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Fetch every source of a category, one after another.
    pub async fn fetch_cards(&self, category: &Category) -> Vec<SourceCard> {
        let mut cards = Vec::with_capacity(category.sources.len());
        for source in &category.sources {
            let headlines = self.fetcher.fetch(&source.url, self.max_items).await;
            cards.push(SourceCard::new(source.name.clone(), headlines));
        }
        cards
    }

    pub async fn build_section(
        &self,
        category: &Category,
        view: &ViewState,
    ) -> Result<String, askama::Error> {
        let cards = self.fetch_cards(category).await;

        let unavailable = cards.iter().filter(|c| c.is_unavailable()).count();
        if unavailable > 0 {
            info!(
                "Section '{}': {} of {} feeds unavailable",
                category.id,
                unavailable,
                cards.len()
            );
        }

        render_section(category, &cards, view)
    }

    /// Run one full render pass. `now` is the time shown in the masthead.
    pub async fn assemble(&self, now: NaiveDateTime) -> Result<String, askama::Error> {
        info!(
            "Rendering dashboard: {} categories, {} sources",
            self.registry.categories().len(),
            self.registry.source_count()
        );

        let view = ViewState::new(&self.registry);

        let mut sections = Vec::with_capacity(self.registry.categories().len());
        for category in self.registry.categories() {
            sections.push(self.build_section(category, &view).await?);
        }

        render_page(&self.owner, &self.registry, &view, sections, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Source;
    use chrono::NaiveDate;

    fn source(name: &str) -> Source {
        Source {
            name: name.to_string(),
            url: format!("https://{}.example.com/rss", name.to_lowercase()),
        }
    }

    fn headline(title: &str, link: &str) -> Headline {
        Headline {
            title: title.to_string(),
            link: link.to_string(),
        }
    }

    fn registry() -> Registry {
        Registry::new(vec![
            ("🗞️ National", vec![source("CNN"), source("NPR")]),
            ("🏈 Sports", vec![source("ESPN")]),
        ])
    }

    fn monday_afternoon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, 9)
            .unwrap()
            .and_hms_opt(15, 5, 0)
            .unwrap()
    }

    mod source_card_tests {
        use super::*;

        #[test]
        fn test_numbers_are_zero_padded() {
            let headlines = (1..=10)
                .map(|i| headline(&format!("Story {}", i), "https://x.example.com"))
                .collect();
            let card = SourceCard::new("CNN", headlines);

            let numbers: Vec<&str> = card.headlines.iter().map(|h| h.number.as_str()).collect();
            assert_eq!(
                numbers,
                vec!["01", "02", "03", "04", "05", "06", "07", "08", "09", "10"]
            );
        }

        #[test]
        fn test_empty_card_is_unavailable() {
            assert!(SourceCard::new("CNN", vec![]).is_unavailable());
            assert!(!SourceCard::new("CNN", vec![headline("a", "b")]).is_unavailable());
        }
    }

    mod render_section_tests {
        use super::*;

        #[test]
        fn test_section_markup() {
            let registry = registry();
            let view = ViewState::new(&registry);
            let category = &registry.categories()[0];
            let cards = vec![
                SourceCard::new("CNN", vec![headline("First", "https://cnn.example.com/1")]),
                SourceCard::new("NPR", vec![]),
            ];

            let html = render_section(category, &cards, &view).unwrap();

            assert!(html.contains(r#"id="section-National""#));
            assert!(html.contains(r#"data-filter="National""#));
            assert!(html.contains(r#"id="content-National""#));
            assert!(html.contains(r#"id="toggle-National""#));
            assert!(html.contains("toggleSection('National')"));
            assert!(html.contains("🗞️ National"));
            assert!(html.contains("grid cols-2"));
            assert!(html.contains(r#"<span class="num">01</span>"#));
            assert!(html.contains(r#"href="https://cnn.example.com/1""#));
            assert!(html.contains(r#"target="_blank""#));
            assert!(html.contains("Feed unavailable"));
        }

        #[test]
        fn test_unavailable_card_has_no_headline_list() {
            let registry = registry();
            let view = ViewState::new(&registry);
            let category = &registry.categories()[1];
            let cards = vec![SourceCard::new("ESPN", vec![])];

            let html = render_section(category, &cards, &view).unwrap();

            assert!(html.contains("ESPN"));
            assert!(html.contains(r#"<div class="no-feed">Feed unavailable</div>"#));
            assert!(!html.contains(r#"class="headline-item""#));
            assert!(html.contains("grid cols-1"));
        }

        #[test]
        fn test_columns_are_bounded() {
            let sources: Vec<Source> = (0..7).map(|i| source(&format!("S{}", i))).collect();
            let registry = Registry::new(vec![("Wide", sources)]);
            let view = ViewState::new(&registry);
            let category = &registry.categories()[0];

            let html = render_section(category, &[], &view).unwrap();
            assert!(html.contains(&format!("grid cols-{}", MAX_COLUMNS)));
        }

        #[test]
        fn test_title_and_link_are_escaped() {
            let registry = registry();
            let view = ViewState::new(&registry);
            let category = &registry.categories()[1];
            let cards = vec![SourceCard::new(
                "ESPN",
                vec![headline(
                    "<script>alert(1)</script>",
                    r#"https://x.example.com/" onmouseover="alert(2)"#,
                )],
            )];

            let html = render_section(category, &cards, &view).unwrap();

            assert!(!html.contains("<script>"));
            assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
            assert!(!html.contains(r#"" onmouseover"#));
            assert!(html.contains(r#"href="https://x.example.com/&quot; onmouseover=&quot;alert(2)" target="_blank""#));
        }

        #[test]
        fn test_view_state_drives_classes() {
            let registry = registry();
            let mut view = ViewState::new(&registry);
            view.filter_section("National");
            view.toggle_section("Sports");
            let sports = &registry.categories()[1];

            let html = render_section(sports, &[], &view).unwrap();

            assert!(html.contains(r#"class="section hidden""#));
            assert!(html.contains(r#"class="section-content collapsed""#));
            assert!(html.contains(r#"class="section-toggle collapsed""#));
        }
    }

    mod render_page_tests {
        use super::*;

        #[test]
        fn test_masthead_metadata() {
            let registry = registry();
            let view = ViewState::new(&registry);

            let html = render_page("Jake", &registry, &view, vec![], monday_afternoon()).unwrap();

            assert!(html.starts_with("<!DOCTYPE html>"));
            assert!(html.contains("Jake <span>Daily</span> Dashboard"));
            assert!(html.contains("Monday, December 09, 2024"));
            assert!(html.contains("Updated 03:05 PM"));
            assert!(html.contains("3 sources"));
        }

        #[test]
        fn test_pills_in_registry_order_with_all_active() {
            let registry = registry();
            let view = ViewState::new(&registry);

            let html = render_page("Jake", &registry, &view, vec![], monday_afternoon()).unwrap();

            let all = html
                .find(r#"<span class="pill active" data-filter="all" onclick="filterSection('all', this)">✦ All</span>"#)
                .unwrap();
            let national = html
                .find(r#"<span class="pill" data-filter="National" onclick="filterSection('National', this)">🗞️ National</span>"#)
                .unwrap();
            let sports = html
                .find(r#"<span class="pill" data-filter="Sports" onclick="filterSection('Sports', this)">🏈 Sports</span>"#)
                .unwrap();

            assert!(all < national && national < sports);
            assert_eq!(html.matches("pill active").count(), 1);
        }

        #[test]
        fn test_sections_are_embedded_unescaped_in_order() {
            let registry = registry();
            let view = ViewState::new(&registry);
            let sections = vec![
                r#"<div id="first"></div>"#.to_string(),
                r#"<div id="second"></div>"#.to_string(),
            ];

            let html = render_page("Jake", &registry, &view, sections, monday_afternoon()).unwrap();

            let first = html.find(r#"<div id="first"></div>"#).unwrap();
            let second = html.find(r#"<div id="second"></div>"#).unwrap();
            assert!(first < second);
        }

        #[test]
        fn test_page_is_self_contained() {
            let registry = registry();
            let view = ViewState::new(&registry);

            let html = render_page("Jake", &registry, &view, vec![], monday_afternoon()).unwrap();

            assert!(html.contains("function filterSection(target, el)"));
            assert!(html.contains("function toggleSection(id)"));
            assert!(html.contains("<style>"));
            assert!(!html.contains("<script src"));
            assert_eq!(html.matches("<link ").count(), 1);
        }

        #[test]
        fn test_empty_registry_still_renders() {
            let registry = Registry::default();
            let view = ViewState::new(&registry);

            let html = render_page("Jake", &registry, &view, vec![], monday_afternoon()).unwrap();

            assert!(html.contains("0 sources"));
            assert!(html.contains("✦ All"));
            assert!(html.ends_with("</html>\n") || html.ends_with("</html>"));
        }
    }

    mod assemble_tests {
        use super::*;

        #[tokio::test]
        async fn test_unreachable_feeds_degrade_to_placeholders() {
            let registry = Registry::new(vec![(
                "🏈 Sports",
                vec![Source {
                    name: "Nowhere".to_string(),
                    url: "not a url".to_string(),
                }],
            )]);
            let dashboard = Dashboard::new(registry, Fetcher::new().unwrap(), "Jake's");

            let html = dashboard.assemble(monday_afternoon()).await.unwrap();

            assert!(html.contains("Nowhere"));
            assert!(html.contains("Feed unavailable"));
            assert!(!html.contains(r#"class="headline-item""#));
            assert!(!html.contains("not a url"));
            assert!(html.contains("1 sources"));
        }
    }
}
