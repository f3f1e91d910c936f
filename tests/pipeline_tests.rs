use pretty_assertions::assert_eq;
use std::path::Path;
use vidstats::aggregator::PerformanceCategory;
use vidstats::commands::{
    execute_analyze, execute_flatten, execute_run, AnalysisOptions, AnalyzeArgs, FlattenArgs,
    RunArgs,
};
use vidstats::dashboard::FilterCriteria;
use vidstats::output::{read_report, PersistOutcome};
use vidstats::utils::AppConfig;

const EXPORT: &str = r##"{
  "itemList": [
    {"id": "1", "desc": "#fun #dance", "author": {"uniqueId": "ana"},
     "stats": {"playCount": 100, "diggCount": 10, "commentCount": 2, "shareCount": 1}},
    {"id": "2", "desc": "morning #Dance", "author": {"uniqueId": "ben"},
     "stats": {"playCount": 4000, "diggCount": 300, "commentCount": 40, "shareCount": 60},
     "textExtra": [{"hashtagName": "dance"}]},
    {"id": "3", "desc": "no tags here", "author": {"uniqueId": "ana"},
     "stats": {"playCount": 0, "diggCount": 1, "commentCount": 0, "shareCount": 0}},
    {"id": "4", "desc": "#cat #cat #fyp", "author": {"uniqueId": "cy"},
     "stats": {"playCount": 900, "diggCount": 90, "commentCount": 9, "shareCount": 9}}
  ]
}"##;

fn write_export(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("export.json");
    std::fs::write(&path, EXPORT).unwrap();
    path
}

#[test]
fn test_run_matches_flatten_then_analyze() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = AppConfig::default();
    let input = write_export(temp_dir.path());

    let run = execute_run(
        &RunArgs {
            input: input.clone(),
            table_output: temp_dir.path().join("run.csv"),
            options: AnalysisOptions::default(),
        },
        &config,
    )
    .unwrap();
    assert!(matches!(run.persistence, PersistOutcome::Persisted { rows: 4, .. }));

    let table_path = temp_dir.path().join("videos.csv");
    execute_flatten(
        &FlattenArgs {
            input,
            output: table_path.clone(),
        },
        &config,
    )
    .unwrap();

    let analyzed = execute_analyze(
        &AnalyzeArgs {
            input: table_path,
            options: AnalysisOptions::default(),
        },
        &config,
    )
    .unwrap();

    let (a, b) = (&run.analysis.report, &analyzed.report);
    assert_eq!(a.kpis, b.kpis);
    assert_eq!(a.thresholds, b.thresholds);
    assert_eq!(a.engagement_distribution, b.engagement_distribution);
    assert_eq!(a.top_hashtags, b.top_hashtags);
    assert_eq!(a.top_creators, b.top_creators);
}

#[test]
fn test_run_report_contents() {
    let temp_dir = tempfile::tempdir().unwrap();
    let report_path = temp_dir.path().join("out/report.json");

    let run = execute_run(
        &RunArgs {
            input: write_export(temp_dir.path()),
            table_output: temp_dir.path().join("videos.csv"),
            options: AnalysisOptions {
                output_report: Some(report_path.clone()),
                top_n: Some(2),
                ..Default::default()
            },
        },
        &AppConfig::default(),
    )
    .unwrap();

    let report = read_report(&report_path).unwrap();
    assert_eq!(report, run.analysis.report);

    assert_eq!(report.kpis.video_count, 4);
    assert_eq!(report.kpis.total_plays, 5000.0);

    // "#cat #cat" counts twice, "dance" and "Dance" merge
    assert_eq!(report.top_hashtags.len(), 2);
    assert_eq!(report.top_hashtags[0].hashtag, "cat");
    assert_eq!(report.top_hashtags[0].occurrences, 2);
    assert_eq!(report.top_hashtags[1].hashtag, "dance");

    assert_eq!(report.top_creators[0].creator, "ben");
    assert_eq!(report.top_creators[1].creator, "cy");
}

#[test]
fn test_run_with_filters_recomputes_categories() {
    let temp_dir = tempfile::tempdir().unwrap();

    let run = execute_run(
        &RunArgs {
            input: write_export(temp_dir.path()),
            table_output: temp_dir.path().join("videos.csv"),
            options: AnalysisOptions {
                filters: FilterCriteria {
                    creators: vec!["ana".to_string()],
                    categories: vec![PerformanceCategory::High],
                    ..Default::default()
                },
                ..Default::default()
            },
        },
        &AppConfig::default(),
    )
    .unwrap();

    // Among ana's videos (100 and 0 plays) the 100-play one is High
    let table = &run.analysis.table;
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows[0].counters.plays, 100.0);
    assert_eq!(table.rows[0].performance_category, PerformanceCategory::High);
}

#[test]
fn test_run_with_custom_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("vidstats.toml");
    std::fs::write(
        &config_path,
        "[flatten]\nnested_fields = [\"stats\"]\nskip_fields = []\n\n\
         [dashboard]\ncreator_field = \"owner\"\n",
    )
    .unwrap();
    let config = AppConfig::load(&config_path).unwrap();

    let input = temp_dir.path().join("export.json");
    std::fs::write(
        &input,
        r#"[{"desc": "x", "owner": "zed", "stats": {"playCount": 10, "diggCount": 5, "commentCount": 0, "shareCount": 0}}]"#,
    )
    .unwrap();

    let run = execute_run(
        &RunArgs {
            input,
            table_output: temp_dir.path().join("videos.csv"),
            options: AnalysisOptions::default(),
        },
        &config,
    )
    .unwrap();

    assert_eq!(run.analysis.report.top_creators[0].creator, "zed");
    assert_eq!(run.analysis.report.kpis.avg_engagement_rate, Some(50.0));
}

#[test]
fn test_analyze_on_persisted_table_keeps_creator_identity() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = AppConfig::default();
    let input = temp_dir.path().join("export.json");
    std::fs::write(
        &input,
        r##"[
          {"id": "0123", "desc": "[1] #bond", "author": {"uniqueId": "007"},
           "stats": {"playCount": 70, "diggCount": 7, "commentCount": 0, "shareCount": 0}},
          {"id": "0456", "desc": "#other", "author": {"uniqueId": "7"},
           "stats": {"playCount": 10, "diggCount": 1, "commentCount": 0, "shareCount": 0}}
        ]"##,
    )
    .unwrap();

    let only_007 = || AnalysisOptions {
        filters: FilterCriteria {
            creators: vec!["007".to_string()],
            ..Default::default()
        },
        ..Default::default()
    };

    let table_path = temp_dir.path().join("videos.csv");
    let run = execute_run(
        &RunArgs {
            input,
            table_output: table_path.clone(),
            options: only_007(),
        },
        &config,
    )
    .unwrap();

    let analyzed = execute_analyze(
        &AnalyzeArgs {
            input: table_path,
            options: only_007(),
        },
        &config,
    )
    .unwrap();

    for outcome in [&run.analysis, &analyzed] {
        assert_eq!(outcome.table.len(), 1);
        assert_eq!(outcome.table.rows[0].hashtags, vec!["bond"]);
        assert_eq!(outcome.report.top_creators[0].creator, "007");
    }
}
