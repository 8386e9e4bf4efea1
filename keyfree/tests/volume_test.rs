//! 音量模块集成测试
//!
//! 通过内存后端验证会话解析与音量操作

use std::sync::Arc;

use keyfree_lib::test_support::MemoryBackend;
use keyfree_lib::volume::{
    VolumeController, VolumeError, VolumeIdentifier, VolumeState, default_backend, resolve,
};

fn setup() -> (MemoryBackend, VolumeController) {
    let backend = MemoryBackend::new();
    let controller = VolumeController::new(Arc::new(backend.clone()));
    (backend, controller)
}

#[test]
fn test_two_chrome_processes_set_to_half() {
    let (backend, controller) = setup();
    backend.add_session(100, "chrome.exe", 0.1);
    backend.add_session(200, "chrome.exe", 0.9);

    let message = controller.set_volume(&"chrome.exe".into(), 0.5).unwrap();

    assert_eq!(message, "Volume set to 50% (2 process(es))");
    assert_eq!(backend.volume_of(100), Some(0.5));
    assert_eq!(backend.volume_of(200), Some(0.5));
}

#[test]
fn test_unknown_pid_is_not_found() {
    let (backend, controller) = setup();
    backend.add_session(100, "chrome.exe", 0.1);

    assert_eq!(
        controller.get_volume(&VolumeIdentifier::Pid(9999)),
        Err(VolumeError::AppNotFound("9999".to_string()))
    );
}

#[test]
fn test_toggle_three_firefox_sessions() {
    let (backend, controller) = setup();
    for pid in [1, 2, 3] {
        backend.add_session(pid, "firefox.exe", 0.5);
    }
    backend.set_muted_of(3, true);

    // 第一个会话未静音，取反后全部静音
    let outcome = controller.toggle_mute(&"Firefox".into()).unwrap();
    assert!(outcome.muted);
    for pid in [1, 2, 3] {
        assert_eq!(backend.muted_of(pid), Some(true));
    }

    let outcome = controller.toggle_mute(&"firefox".into()).unwrap();
    assert!(!outcome.muted);
    assert_eq!(outcome.message, "Unmuted (3 process(es))");
}

#[test]
fn test_steps_never_leave_unit_range() {
    let (backend, controller) = setup();
    backend.add_session(5, "player.exe", 0.5);
    let id: VolumeIdentifier = 5.into();

    for _ in 0..20 {
        controller.volume_up(&id, Some(0.3)).unwrap();
        let level = backend.volume_of(5).unwrap();
        assert!((0.0..=1.0).contains(&level));
    }
    assert_eq!(backend.volume_of(5), Some(1.0));

    for _ in 0..20 {
        controller.volume_down(&id, Some(0.3)).unwrap();
        let level = backend.volume_of(5).unwrap();
        assert!((0.0..=1.0).contains(&level));
    }
    assert_eq!(backend.volume_of(5), Some(0.0));
}

#[test]
fn test_resolve_by_pid_returns_at_most_one() {
    let (backend, _) = setup();
    backend.add_session(7, "a.exe", 0.5);
    backend.add_session(7, "b.exe", 0.5);

    let sessions = resolve(&backend, &VolumeIdentifier::Pid(7)).unwrap();
    assert_eq!(sessions.len(), 1);
}

#[test]
fn test_system_session_volume() {
    let (backend, controller) = setup();
    backend.add_system_session(0.75);

    let state = controller.get_volume(&"system".into()).unwrap();
    assert_eq!(state, VolumeState { volume: 0.75, muted: false });
}

#[test]
fn test_enumeration_failure_surfaces_as_backend_error() {
    let (backend, controller) = setup();
    backend.fail_enumeration(true);

    assert!(matches!(controller.list_apps(), Err(VolumeError::Backend(_))));
}

#[test]
fn test_default_backend_matches_platform() {
    let controller = VolumeController::new(default_backend());

    if cfg!(target_os = "windows") {
        assert!(controller.is_available());
    } else {
        assert!(!controller.is_available());
        assert_eq!(controller.list_apps(), Err(VolumeError::Unavailable));
    }
}
