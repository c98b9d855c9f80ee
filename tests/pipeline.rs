use std::fs;
use std::path::PathBuf;

use league_strength::InvalidFixtureError;
use league_strength::fixture::{LeagueData, parse_league_data_json};
use league_strength::pipeline::{merge_league_data, process_league, process_leagues};
use league_strength::standings::Standing;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn season() -> LeagueData {
    parse_league_data_json(&read_fixture("season.json")).expect("season fixture should parse")
}

fn standing(gp: u32, w: u32, d: u32, l: u32, gf: u32, ga: u32, gd: i64, pts: u32) -> Standing {
    Standing {
        gp,
        w,
        d,
        l,
        gf,
        ga,
        gd,
        pts,
    }
}

#[test]
fn epl_fixture_file_produces_reference_tables() {
    let data =
        parse_league_data_json(&read_fixture("epl-2024.json")).expect("fixture should parse");
    let report = process_league("EPL-2024", &data["EPL-2024"]).expect("league should process");

    assert_eq!(report.played, 2);
    assert_eq!(report.unplayed, 0);
    assert_eq!(report.standings.home["A"], standing(1, 1, 0, 0, 3, 1, 2, 3));
    assert_eq!(report.standings.home["B"], standing(1, 0, 1, 0, 2, 2, 0, 1));
    assert_eq!(report.standings.away["B"], standing(1, 0, 0, 1, 1, 3, -2, 0));
    assert_eq!(report.standings.away["A"], standing(1, 0, 1, 0, 2, 2, 0, 1));

    let home = &report.home_analysis;
    assert_eq!(home.stats.total_gf, 5);
    assert_eq!(home.stats.total_ga, 3);
    assert_eq!(home.teams["A"].ahg, 3.0);
    assert_eq!(home.teams["A"].attack_strength, 5.0 / 3.0);
    assert_eq!(home.teams["B"].defense_strength, 3.0 / 2.0);
}

#[test]
fn season_run_isolates_the_broken_league() {
    let summary = process_leagues(&season());

    assert_eq!(summary.reports.len(), 2);
    assert_eq!(summary.errors.len(), 1);

    let err = &summary.errors[0];
    assert_eq!(err.league, "la-liga-2024");
    assert_eq!(
        err.source,
        InvalidFixtureError::at(
            1,
            InvalidFixtureError::InvalidScore {
                team: "Betis".to_string(),
                value: "\"two\"".to_string(),
            }
        )
    );
    assert!(err.to_string().starts_with("league la-liga-2024: fixture #1:"));

    let leagues: Vec<&str> = summary.reports.iter().map(|r| r.league.as_str()).collect();
    assert_eq!(leagues, vec!["epl-2024", "serie-a-2024"]);
}

#[test]
fn season_epl_skips_unplayed_and_splits_sides() {
    let summary = process_leagues(&season());
    let epl = summary
        .reports
        .iter()
        .find(|r| r.league == "epl-2024")
        .expect("epl report");

    assert_eq!(epl.played, 5);
    assert_eq!(epl.unplayed, 1);

    let home = &epl.standings.home;
    assert_eq!(home["Arsenal"], standing(2, 1, 1, 0, 2, 0, 2, 4));
    assert_eq!(home["Chelsea"], standing(2, 0, 1, 1, 2, 5, -3, 1));
    assert_eq!(home["Liverpool"], standing(1, 1, 0, 0, 3, 2, 1, 3));

    let away = &epl.standings.away;
    assert_eq!(away["Arsenal"], standing(2, 1, 0, 1, 6, 4, 2, 3));
    assert_eq!(away["Chelsea"], standing(1, 0, 0, 1, 0, 2, -2, 0));
    assert_eq!(away["Liverpool"], standing(2, 0, 2, 0, 1, 1, 0, 2));

    let arsenal = epl.home_analysis.teams["Arsenal"];
    assert_eq!(arsenal.ahg, 1.0);
    assert_eq!(arsenal.ahcg, 0.0);
    assert_eq!(arsenal.attack_strength, 3.5);
    assert_eq!(arsenal.defense_strength, 0.0);

    let chelsea_away = epl.away_analysis.teams["Chelsea"];
    assert_eq!(chelsea_away.ahg, 0.0);
    assert_eq!(chelsea_away.attack_strength, 0.0);
    assert_eq!(chelsea_away.ahcg, 2.0);
    assert_eq!(chelsea_away.defense_strength, 3.5);
}

#[test]
fn empty_league_yields_empty_tables() {
    let summary = process_leagues(&season());
    let serie_a = summary
        .reports
        .iter()
        .find(|r| r.league == "serie-a-2024")
        .expect("serie-a report");

    assert_eq!(serie_a.played, 0);
    assert!(serie_a.standings.home.is_empty());
    assert!(serie_a.standings.away.is_empty());
    assert!(serie_a.home_analysis.teams.is_empty());
    assert_eq!(serie_a.away_analysis.stats.total_gf, 0);
}

#[test]
fn merged_documents_append_fixtures_for_shared_leagues() {
    let first =
        parse_league_data_json(&read_fixture("epl-2024.json")).expect("fixture should parse");
    let second = parse_league_data_json(
        r#"{ "EPL-2024": [
                 { "HomeTeam": "A", "AwayTeam": "C", "HomeTeamScore": 1, "AwayTeamScore": 0 }
             ],
             "MLS-2024": [] }"#,
    )
    .expect("inline doc should parse");

    let merged = merge_league_data([first, second]);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged["EPL-2024"].len(), 3);

    let report = process_league("EPL-2024", &merged["EPL-2024"]).expect("league should process");
    assert_eq!(report.standings.home["A"], standing(2, 2, 0, 0, 4, 1, 3, 6));
    assert_eq!(report.standings.away["C"], standing(1, 0, 0, 1, 0, 1, -1, 0));
}

#[test]
fn malformed_entries_fail_only_their_league() {
    let data = parse_league_data_json(
        r#"{ "epl-2024": [
                 { "HomeTeam": "A", "AwayTeam": "B", "HomeTeamScore": 2, "AwayTeamScore": 1 }
             ],
             "la-liga-2024": [
                 { "HomeTeam": 7, "AwayTeam": "B", "HomeTeamScore": 1, "AwayTeamScore": 0 }
             ],
             "serie-a-2024": [ null ] }"#,
    )
    .expect("document should parse");

    let summary = process_leagues(&data);
    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].league, "epl-2024");
    assert_eq!(summary.reports[0].standings.home["A"], standing(1, 1, 0, 0, 2, 1, 1, 3));

    assert_eq!(summary.errors.len(), 2);
    assert_eq!(summary.errors[0].league, "la-liga-2024");
    assert_eq!(
        summary.errors[0].source,
        InvalidFixtureError::at(
            0,
            InvalidFixtureError::InvalidTeam {
                side: "home",
                value: "7".to_string(),
            }
        )
    );
    assert_eq!(summary.errors[1].league, "serie-a-2024");
    assert_eq!(
        summary.errors[1].source,
        InvalidFixtureError::at(
            0,
            InvalidFixtureError::NotAnObject {
                value: "null".to_string(),
            }
        )
    );
}

#[test]
fn unplayed_fixture_without_teams_is_counted_not_rejected() {
    let data = parse_league_data_json(
        r#"{ "epl-2024": [
                 { "HomeTeam": "A", "AwayTeam": "B", "HomeTeamScore": 0, "AwayTeamScore": 0 },
                 { "AwayTeam": "A", "HomeTeamScore": null, "AwayTeamScore": null }
             ] }"#,
    )
    .expect("document should parse");

    let report = process_league("epl-2024", &data["epl-2024"]).expect("league should process");
    assert_eq!(report.played, 1);
    assert_eq!(report.unplayed, 1);
}
