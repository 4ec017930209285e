use canvas_data::{
    Activity, BuiltinTag, CalendarEvent, Catalog, CatalogSnapshot, Contact, InitialResults,
    Labeled, SearchResult, Settings, Shortcut, ShortcutKind, Tag,
};
use canvas_search_core::{rank_results, Candidate};

fn labels(results: &[Candidate<'_>]) -> Vec<String> {
    results
        .iter()
        .map(|candidate| format!("{}:{}", candidate.kind(), candidate.label()))
        .collect()
}

fn listing(term: &str, catalog: &Catalog) -> String {
    labels(&rank_results(term, InitialResults::AllApps, catalog)).join("\n")
}

fn two_apps(camera_favorite: bool) -> Catalog {
    Catalog {
        activities: vec![
            Activity::new("org.camera", "Main", "Camera")
                .with_favorite(camera_favorite),
            Activity::new("org.calendar", "Main", "Calendar"),
        ],
        ..Catalog::default()
    }
}

fn sample_catalog() -> Catalog {
    let commute = Tag::Custom("commute".to_string());
    CatalogSnapshot {
        activities: vec![
            Activity::new("org.maps", "Main", "Maps")
                .with_tags(vec![BuiltinTag::Maps.into()]),
            Activity::new("org.music", "Main", "Music Player")
                .with_tags(vec![BuiltinTag::Audio.into()])
                .with_times_opened(2),
            Activity::new("org.podcasts", "Main", "Podcasts")
                .with_tags(vec![commute, BuiltinTag::Audio.into()])
                .with_times_opened(9),
            Activity::new("org.mail", "Main", "Mail")
                .with_favorite(true),
        ],
        shortcuts: vec![
            Shortcut::new("org.maps", "home", ShortcutKind::Pinned, "Navigate home"),
            Shortcut::new("org.music", "mix", ShortcutKind::Static, "Shuffle music"),
            Shortcut::new("org.mail", "compose", ShortcutKind::Dynamic, "Mail Mom"),
            Shortcut::new("org.chat", "recent", ShortcutKind::Cached, "Martha"),
        ],
        contacts: vec![
            Contact::new(1, "mom", "Mom"),
            Contact::new(2, "max", "Max Mustermann"),
        ],
        calendar: vec![CalendarEvent::single(5, "Music lesson", 10_000, 20_000)],
    }
    .into_catalog(
        &Settings {
            calendar_search_enabled: true,
            ..Settings::default()
        },
        0,
    )
}

#[test]
fn exact_prefix_without_favorite() {
    let catalog = two_apps(false);
    assert_eq!(
        labels(&rank_results("Cam", InitialResults::AllApps, &catalog)),
        ["activity:Camera"]
    );
    assert_eq!(
        labels(&rank_results("ca", InitialResults::AllApps, &catalog)),
        ["activity:Camera", "activity:Calendar"]
    );
    assert!(rank_results("Cab", InitialResults::AllApps, &catalog).is_empty());
}

#[test]
fn favorites_tolerate_one_substitution() {
    let catalog = two_apps(true);
    assert_eq!(
        labels(&rank_results("Cab", InitialResults::AllApps, &catalog)),
        ["activity:Camera"]
    );
    assert!(rank_results("Cxb", InitialResults::AllApps, &catalog).is_empty());
}

#[test]
fn exact_matches_rank_before_typo_matches() {
    let catalog = Catalog {
        activities: vec![
            Activity::new("a", "a", "Mall").with_favorite(true),
            Activity::new("b", "b", "Mail"),
        ],
        ..Catalog::default()
    };
    assert_eq!(
        labels(&rank_results("mai", InitialResults::AllApps, &catalog)),
        ["activity:Mail", "activity:Mall"]
    );
}

#[test]
fn free_text_search_keeps_category_order() {
    let catalog = sample_catalog();
    insta::assert_snapshot!(listing("m", &catalog), @r###"
    activity:Music Player
    activity:Mail
    activity:Maps
    shortcut:Shuffle music
    shortcut:Mail Mom
    shortcut:Martha
    contact:Max Mustermann
    contact:Mom
    calendar:Music lesson
    "###);
}

#[test]
fn later_tokens_rank_after_earlier_ones() {
    let catalog = sample_catalog();
    insta::assert_snapshot!(listing("mu", &catalog), @r###"
    activity:Music Player
    activity:Mail
    shortcut:Shuffle music
    contact:Max Mustermann
    calendar:Music lesson
    "###);
}

#[test]
fn tag_search_orders_by_tag_position_then_usage() {
    let catalog = sample_catalog();
    assert_eq!(
        labels(&rank_results("#AUD", InitialResults::AllApps, &catalog)),
        ["activity:Music Player", "activity:Podcasts"]
    );
    assert_eq!(
        labels(&rank_results("#", InitialResults::AllApps, &catalog)),
        ["activity:Podcasts", "activity:Music Player", "activity:Maps"]
    );
    assert_eq!(
        labels(&rank_results("#com", InitialResults::AllApps, &catalog)),
        ["activity:Podcasts"]
    );
}

#[test]
fn usage_breaks_ties() {
    let catalog = Catalog {
        activities: vec![
            Activity::new("a", "a", "Notes").with_times_opened(1),
            Activity::new("b", "b", "Notebook").with_times_opened(7),
            Activity::new("c", "c", "Nothing"),
        ],
        ..Catalog::default()
    };
    assert_eq!(
        labels(&rank_results("no", InitialResults::AllApps, &catalog)),
        ["activity:Notebook", "activity:Notes", "activity:Nothing"]
    );
}

#[test]
fn commands_list_categories_unfiltered() {
    let catalog = sample_catalog();
    insta::assert_snapshot!(listing("/all", &catalog), @r###"
    activity:Mail
    activity:Maps
    activity:Music Player
    activity:Podcasts
    shortcut:Navigate home
    shortcut:Shuffle music
    shortcut:Mail Mom
    shortcut:Martha
    contact:Max Mustermann
    contact:Mom
    "###);
    assert_eq!(
        labels(&rank_results("/calendar", InitialResults::AllApps, &catalog)),
        ["calendar:Music lesson"]
    );
    assert_eq!(
        labels(&rank_results("/cached", InitialResults::AllApps, &catalog)),
        ["shortcut:Martha"]
    );
    assert!(rank_results("/nope", InitialResults::AllApps, &catalog).is_empty());
}

#[test]
fn empty_term_uses_initial_results() {
    let catalog = sample_catalog();
    assert_eq!(
        labels(&rank_results("", InitialResults::AllApps, &catalog)),
        [
            "activity:Mail",
            "activity:Maps",
            "activity:Music Player",
            "activity:Podcasts"
        ]
    );
    assert_eq!(
        labels(&rank_results("", InitialResults::Favorites, &catalog)),
        ["activity:Mail"]
    );
    assert!(rank_results("", InitialResults::Nothing, &catalog).is_empty());
}

#[test]
fn ranking_is_deterministic() {
    let catalog = sample_catalog();
    for term in ["", "m", "#audio", "/all", "mom", "x"] {
        let first = rank_results(term, InitialResults::Favorites, &catalog);
        let second = rank_results(term, InitialResults::Favorites, &catalog);
        assert_eq!(first, second, "{term}");
        let uids: Vec<&str> = first.iter().map(|c| c.uid().as_str()).collect();
        let again: Vec<&str> = second.iter().map(|c| c.uid().as_str()).collect();
        assert_eq!(uids, again);
    }
}
