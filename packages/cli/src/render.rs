//! Plain-text rendering of query results.

use kehilot_map_calendar::dual_year_label;
use kehilot_map_engine::QueryResult;
use kehilot_map_engine::classify::{SizeScale, confidence_style, format_population};
use kehilot_map_history_models::{ClusterGroup, Language};

fn localized<'a>(english: &'a str, hebrew: &'a str, language: Language) -> &'a str {
    if language == Language::He && !hebrew.is_empty() {
        hebrew
    } else {
        english
    }
}

/// One-line overview of a query result.
#[must_use]
pub fn summary_line(result: &QueryResult<'_>) -> String {
    format!(
        "{}: {} settlement(s), population {}, {} migration(s), {} event(s)",
        dual_year_label(result.year),
        result.settlements.len(),
        format_population(result.total_population()),
        result.arrows.len(),
        result.events.len(),
    )
}

/// One line per active settlement.
#[must_use]
pub fn settlement_lines(
    result: &QueryResult<'_>,
    scale: &SizeScale,
    language: Language,
) -> Vec<String> {
    result
        .settlements
        .iter()
        .map(|projection| {
            let settlement = projection.settlement;
            let population = projection
                .interpolated_population
                .map_or_else(|| "?".to_string(), format_population);
            format!(
                "{:<28} {:<16} {:>7}  r={:<3} {}",
                settlement.names.display(language),
                settlement.country,
                population,
                scale.radius(projection.interpolated_population),
                confidence_style(settlement.confidence).label,
            )
        })
        .collect()
}

/// One line per active migration arrow and area event.
#[must_use]
pub fn event_lines(result: &QueryResult<'_>, language: Language) -> Vec<String> {
    let arrows = result.arrows.iter().map(|arrow| {
        format!(
            "migration  {}",
            localized(&arrow.title_en, &arrow.title_he, language)
        )
    });
    let events = result.events.iter().map(|event| {
        let details = &event.details;
        let category = details.category.map_or("event", |c| c.label());
        format!(
            "{category:<10} {}",
            localized(&details.description_en, &details.description_he, language)
        )
    });
    arrows.chain(events).collect()
}

/// One line per cluster group.
#[must_use]
pub fn cluster_lines(groups: &[ClusterGroup]) -> Vec<String> {
    groups
        .iter()
        .map(|group| {
            format!(
                "({:>8.3}, {:>8.3})  {:>3} member(s)  population {}",
                group.center.lat,
                group.center.lng,
                group.count,
                format_population(group.population),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use kehilot_map_engine::{QueryEngine, YearRange};
    use kehilot_map_history_models::{
        AreaEvent, Confidence, EventCategory, EventDetails, EventGeometry, LatLng, MigrationArrow,
        SettlementNames, SettlementRecord,
    };
    use kehilot_map_source::store::Snapshot;

    use super::*;

    fn engine() -> QueryEngine {
        let settlement = SettlementRecord {
            id: 0,
            country: "Lithuania".to_string(),
            names: SettlementNames {
                local: "Wilno".to_string(),
                hebrew: Some("וילנה".to_string()),
                english: Some("Vilnius".to_string()),
                ..SettlementNames::default()
            },
            location: Some(LatLng::new(54.68, 25.28)),
            year_established: Some(1320),
            year_start: Some(1800),
            year_end: None,
            population_start: Some(63_996),
            population_end: None,
            confidence: Confidence::High,
            kind: None,
            symbol: None,
            source: String::new(),
            comment: String::new(),
        };
        let arrow = MigrationArrow {
            id: 0,
            start: None,
            end: None,
            control: None,
            year_start: Some(1881),
            year_end: Some(1914),
            title_en: "Great migration".to_string(),
            title_he: "ההגירה הגדולה".to_string(),
            color: String::new(),
            description: String::new(),
            reference_url: None,
        };
        let event = AreaEvent {
            id: 0,
            details: EventDetails {
                year_start: Some(1903),
                year_end: Some(1903),
                description_en: "Kishinev pogrom".to_string(),
                description_he: String::new(),
                source: String::new(),
                category: Some(EventCategory::Pogrom),
                stroke_color: String::new(),
                fill_color: String::new(),
                fill_opacity: None,
                reference_url: None,
            },
            geometry: EventGeometry::Polygon { ring: Vec::new() },
        };
        QueryEngine::new(
            Snapshot::from_entities(vec![settlement], vec![arrow], Vec::new(), vec![event]),
            YearRange::default(),
        )
    }

    #[test]
    fn summarizes_a_year() {
        let engine = engine();
        let result = engine.set_query_year(1903).unwrap();
        assert_eq!(
            summary_line(&result),
            "1903 CE / ה'תרס\"ג: 1 settlement(s), population 64.0k, 1 migration(s), 1 event(s)"
        );
    }

    #[test]
    fn settlement_lines_use_the_requested_language() {
        let engine = engine();
        let result = engine.set_query_year(1900).unwrap();
        let scale = SizeScale::default();

        let english = settlement_lines(&result, &scale, Language::En);
        assert!(english[0].starts_with("Vilnius"));
        assert!(english[0].contains("64.0k"));
        assert!(english[0].ends_with("High confidence"));

        let hebrew = settlement_lines(&result, &scale, Language::He);
        assert!(hebrew[0].starts_with("וילנה"));
    }

    #[test]
    fn event_lines_fall_back_to_english() {
        let engine = engine();
        let result = engine.set_query_year(1904).unwrap();
        let lines = event_lines(&result, Language::He);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("ההגירה הגדולה"));
        assert!(lines[1].starts_with("Pogrom"));
        assert!(lines[1].ends_with("Kishinev pogrom"));
    }

    #[test]
    fn cluster_lines_report_counts() {
        let groups = vec![ClusterGroup {
            member_ids: vec![0, 3],
            count: 2,
            population: 1_500_000,
            center: LatLng::new(52.2, 21.0),
        }];
        let lines = cluster_lines(&groups);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("2 member(s)"));
        assert!(lines[0].ends_with("population 1.5M"));
    }
}
