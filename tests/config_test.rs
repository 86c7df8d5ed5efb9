mod helpers;

use spindle::config::{ScheduleConfig, SpindleConfig};
use spindle::material::schedule::ScheduleError;
use spindle::material::service::MaterialService;

#[test]
fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[schedule]\nbatch_size = 8\nrecent_days = 3\n").unwrap();

    let config = SpindleConfig::load_from(&path).unwrap();

    assert_eq!(config.schedule.batch_size, 8);
    assert_eq!(config.schedule.recent_days, 3);
    assert_eq!(config.schedule.refresh_rate, ScheduleConfig::default().refresh_rate);
}

#[test]
fn zero_batch_size_is_a_configuration_error() {
    let mut conn = helpers::test_db();
    let schedule = ScheduleConfig {
        batch_size: 0,
        ..ScheduleConfig::default()
    };

    let err = MaterialService::new(&mut conn, &schedule).err().unwrap();

    assert_eq!(
        err.downcast_ref::<ScheduleError>(),
        Some(&ScheduleError::InvalidBatchSize)
    );
    assert!(err.to_string().contains("[schedule]"));
}

#[test]
fn invalid_toml_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[schedule\nbatch_size = ").unwrap();

    assert!(SpindleConfig::load_from(&path).is_err());
}
