#![allow(non_snake_case)]

use super::*;
use test_case::test_case;
use tracing_subscriber::prelude::*;

#[test]
fn ReloadHandle___reload_level___fails_before_initialization() {
    let handle = ReloadHandle::new();

    let result = handle.reload_level(LogLevel::Debug);

    assert!(matches!(result, Err(ReloadError::NotInitialized)));
    assert!(!handle.is_initialized());
}

#[test]
fn ReloadHandle___reload_level___updates_filter_and_sink_level() {
    let (filter, reload) = reload::Layer::<_, Registry>::new(LevelFilter::WARN);
    let _subscriber = tracing_subscriber::registry().with(filter);
    let inspect = reload.clone();
    let handle = ReloadHandle::new();
    handle.set_handle(reload);

    handle.reload_level(LogLevel::Debug).unwrap();

    assert!(handle.is_initialized());
    assert_eq!(inspect.clone_current(), Some(LevelFilter::DEBUG));
    assert_eq!(crate::LogSinkManager::global().level(), LogLevel::Debug);
}

#[test_case(LogLevel::Trace, LevelFilter::TRACE)]
#[test_case(LogLevel::Info, LevelFilter::INFO)]
#[test_case(LogLevel::Error, LevelFilter::ERROR)]
#[test_case(LogLevel::Off, LevelFilter::OFF)]
fn level_filter___maps_log_level(level: LogLevel, expected: LevelFilter) {
    assert_eq!(level_filter(level), expected);
}
