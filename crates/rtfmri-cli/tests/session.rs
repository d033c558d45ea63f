//! Explore-session and config-file behaviour through the library API.

use std::io::Write;

use rtfmri_cli::config::{ConfigError, DashboardConfig, EnvOverrides, Settings};
use rtfmri_cli::session::{Session, SessionError, Step};
use rtfmri_core::Explorer;
use rtfmri_model::{Dataset, ViewError};

fn explorer() -> Explorer {
    let rows = [
        ("Siemens", "3T", "TBV"),
        ("Siemens", "3T", "AFNI"),
        ("GE", "1.5T", "in-house"),
        ("Siemens", "7T", "TBV"),
        ("Philips", "3T", "in-house"),
    ];
    let dataset = Dataset::new(
        vec![
            "author".into(),
            "vendor".into(),
            "magnet".into(),
            "software".into(),
            "doi".into(),
        ],
        rows.iter()
            .enumerate()
            .map(|(i, (vendor, magnet, software))| {
                vec![
                    format!("Author {i}"),
                    (*vendor).to_string(),
                    (*magnet).to_string(),
                    (*software).to_string(),
                    format!("10.1/{i}"),
                ]
            })
            .collect(),
    )
    .unwrap();
    Explorer::new(dataset).unwrap().with_max_rows(2)
}

#[test]
fn script_drives_the_view() {
    let mut session = Session::new(explorer().open_view().unwrap());
    let script = "\
# compare software by vendor
primary software
secondary vendor
hover TBV
click in-house
show
";
    let steps: Vec<Step> = script
        .lines()
        .map(|line| session.handle_line(line).unwrap())
        .collect();
    assert_eq!(
        steps,
        vec![
            Step::Skip,
            Step::Applied,
            Step::Applied,
            Step::Applied,
            Step::Applied,
            Step::Show
        ]
    );
    assert_eq!(session.applied(), 4);

    let view = session.view();
    let secondary = view.secondary_aggregate().unwrap();
    assert_eq!(secondary.field(), "vendor");
    assert_eq!(secondary.count("Siemens"), 2);
    assert_eq!(view.detail_rows().len(), 2);
    assert_eq!(
        view.detail_heading().as_deref(),
        Some("Showing studies where Software = in-house")
    );
}

#[test]
fn rejected_lines_leave_the_view_alone() {
    let mut session = Session::new(explorer().open_view().unwrap());
    session.handle_line("hover Siemens").unwrap();
    let before = session.view().snapshot();

    assert_eq!(
        session.handle_line("secondary vendor"),
        Err(SessionError::View(ViewError::InvalidSelection {
            field: "vendor".into()
        }))
    );
    assert!(matches!(
        session.handle_line("primary doi"),
        Err(SessionError::View(ViewError::UnknownField { .. }))
    ));
    assert!(matches!(
        session.handle_line("zoom"),
        Err(SessionError::UnknownCommand { .. })
    ));
    assert_eq!(session.view().snapshot(), before);
    assert_eq!(session.applied(), 1);
    assert_eq!(session.handle_line("quit"), Ok(Step::Quit));
}

#[test]
fn config_file_feeds_settings() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "dataset = \"studies.tsv\"\n\n[view]\nmax_rows = 3\nsecondary = \"software\"\n\n[browse]\nlimit = 7"
    )
    .unwrap();
    let config = DashboardConfig::load(file.path()).unwrap();
    let settings = Settings::resolve(
        None,
        &EnvOverrides::default(),
        &config,
        Some(file.path().to_path_buf()),
    );
    assert_eq!(settings.dataset, std::path::PathBuf::from("studies.tsv"));
    assert_eq!(settings.max_rows, 3);
    assert_eq!(settings.primary, None);
    assert_eq!(settings.secondary.as_deref(), Some("software"));
    assert_eq!(settings.browse_limit, Some(7));
}

#[test]
fn missing_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = DashboardConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
