//! Unit tests for the desktop

use super::*;
use crate::store::MockWindowStateStore;
use crate::window::MinimizePolicy;
use std::sync::{Arc, Mutex};

fn group(id: &str, x: i32, y: i32) -> ProgramGroup {
    ProgramGroup {
        id: GroupId::from(id),
        ..ProgramGroup::new(
            id.to_uppercase(),
            WindowGeometry {
                x,
                y,
                width: 200,
                height: 150,
                minimized: false,
                maximized: false,
            },
        )
    }
}

fn three_groups() -> Vec<ProgramGroup> {
    vec![group("a", 0, 0), group("b", 300, 0), group("c", 0, 300)]
}

fn desktop() -> MdiDesktop<GroupStore> {
    let groups = three_groups();
    MdiDesktop::new(
        ProgmanConfig::default(),
        GroupStore::with_groups(groups.clone()),
        groups,
    )
}

fn id(s: &str) -> GroupId {
    GroupId::from(s)
}

fn at(x: f64, y: f64) -> PointerEvent {
    PointerEvent::primary(x, y)
}

#[test]
fn test_new_opens_every_visible_group() {
    let mut groups = three_groups();
    groups[1].window_state.minimized = true;
    let desktop = MdiDesktop::new(ProgmanConfig::default(), GroupStore::in_memory(), groups);

    assert_eq!(desktop.registry().stacking_order(), vec![id("a"), id("c")]);
    assert_eq!(desktop.active_window(), Some(&id("c")));
    assert_eq!(desktop.minimized_windows().len(), 1);
}

#[test]
fn test_drag_persists_exactly_once() {
    let mut store = MockWindowStateStore::new();
    store
        .expect_set_group_window_state()
        .withf(|group_id, update| {
            group_id.as_str() == "b" && *update == WindowStateUpdate::position(Point::new(330, 40))
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let mut desktop = MdiDesktop::new(ProgmanConfig::default(), store, three_groups());
    assert_eq!(desktop.begin_drag(&id("b"), &at(310.0, 5.0)), Ok(true));
    assert_eq!(desktop.active_window(), Some(&id("b")));

    for step in 1..=10 {
        assert!(desktop.pointer_move(&at(310.0 + 3.0 * step as f64, 5.0 + 4.0 * step as f64)));
    }
    assert_eq!(desktop.pointer_up(&at(340.0, 45.0)), Some(id("b")));
    assert_eq!(desktop.pointer_up(&at(340.0, 45.0)), None);

    let geometry = desktop.group(&id("b")).unwrap().window_state;
    assert_eq!(geometry.position(), Point::new(330, 40));
}

#[test]
fn test_resize_persists_bounds_once() {
    let mut store = MockWindowStateStore::new();
    store
        .expect_set_group_window_state()
        .withf(|_, update| {
            *update == WindowStateUpdate::bounds(Size::new(150, 150), Point::new(50, 0))
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let mut desktop = MdiDesktop::new(ProgmanConfig::default(), store, three_groups());
    assert_eq!(
        desktop.begin_resize(&id("a"), &at(0.0, 50.0), ResizeDirection::W),
        Ok(true)
    );
    desktop.pointer_move(&at(30.0, 50.0));
    desktop.pointer_move(&at(100.0, 50.0));
    desktop.pointer_up(&at(100.0, 50.0));

    assert_eq!(
        desktop.group(&id("a")).unwrap().window_state.rect(),
        Rectangle { x: 50, y: 0, width: 150, height: 150 }
    );
}

#[test]
fn test_persistence_failure_does_not_abort_commit() {
    let mut store = MockWindowStateStore::new();
    store
        .expect_set_group_window_state()
        .times(1)
        .returning(|_, _| Err(anyhow::anyhow!("disk full")));

    let mut desktop = MdiDesktop::new(ProgmanConfig::default(), store, three_groups());
    desktop.begin_drag(&id("a"), &at(10.0, 10.0)).unwrap();
    desktop.pointer_move(&at(60.0, 10.0));
    desktop.pointer_up(&at(60.0, 10.0));

    assert_eq!(desktop.group(&id("a")).unwrap().window_state.x, 50);
}

#[test]
fn test_close_active_falls_back_to_highest_z() {
    let mut desktop = desktop();
    desktop.focus_window(&id("a")).unwrap();
    desktop.focus_window(&id("b")).unwrap();

    // Stacking is now c, a, b
    desktop.close_window(&id("b")).unwrap();
    assert_eq!(desktop.active_window(), Some(&id("a")));
    assert!(desktop.group(&id("b")).unwrap().window_state.minimized);

    desktop.close_window(&id("c")).unwrap();
    assert_eq!(desktop.active_window(), Some(&id("a")));
    desktop.close_window(&id("a")).unwrap();
    assert_eq!(desktop.active_window(), None);
    assert!(desktop.visible_windows().is_empty());
}

#[test]
fn test_focus_of_closed_window_is_not_found() {
    let mut desktop = desktop();
    desktop.close_window(&id("a")).unwrap();
    assert_eq!(desktop.focus_window(&id("a")), Err(MdiError::NotOpen(id("a"))));
    assert_eq!(
        desktop.open_window(&id("zzz")),
        Err(MdiError::UnknownGroup(id("zzz")))
    );
}

#[test]
fn test_minimize_policy_remove_and_keep() {
    let mut desktop = desktop();
    desktop.minimize_window(&id("c")).unwrap();
    assert!(!desktop.registry().contains(&id("c")));
    assert_eq!(desktop.active_window(), Some(&id("b")));

    let config = ProgmanConfig {
        window: crate::config::WindowConfig {
            minimize_policy: MinimizePolicy::Keep,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut desktop = MdiDesktop::new(config, GroupStore::in_memory(), three_groups());
    desktop.minimize_window(&id("c")).unwrap();
    assert!(desktop.registry().contains(&id("c")));
    assert_eq!(desktop.active_window(), Some(&id("c")));
    assert!(desktop.visible_windows().iter().all(|v| v.group_id != id("c")));

    desktop.restore_window(&id("c")).unwrap();
    assert!(!desktop.group(&id("c")).unwrap().window_state.minimized);
    assert_eq!(desktop.visible_windows().len(), 3);
}

#[test]
fn test_restore_reopens_removed_window() {
    let mut desktop = desktop();
    desktop.minimize_window(&id("a")).unwrap();
    assert!(!desktop.registry().contains(&id("a")));

    desktop.restore_window(&id("a")).unwrap();
    assert_eq!(desktop.active_window(), Some(&id("a")));
    assert_eq!(desktop.visible_windows().last().map(|v| v.group_id.clone()), Some(id("a")));
}

#[test]
fn test_second_gesture_on_same_window_is_refused() {
    let mut desktop = desktop();
    assert_eq!(desktop.begin_drag(&id("a"), &at(10.0, 10.0)), Ok(true));

    let other_pointer = PointerEvent {
        pointer_id: 7,
        ..at(0.0, 50.0)
    };
    assert_eq!(
        desktop.begin_resize(&id("a"), &other_pointer, ResizeDirection::W),
        Err(MdiError::GestureInProgress(id("a")))
    );
    // The same pointer cannot start a second gesture elsewhere
    assert_eq!(
        desktop.begin_drag(&id("b"), &at(310.0, 10.0)),
        Err(MdiError::GestureInProgress(id("a")))
    );

    // A different pointer may drag a different window
    let second = PointerEvent {
        pointer_id: 7,
        ..at(310.0, 10.0)
    };
    assert_eq!(desktop.begin_drag(&id("b"), &second), Ok(true));
}

#[test]
fn test_non_primary_button_does_not_start_gesture() {
    let mut desktop = desktop();
    let event = PointerEvent {
        button: crate::input::PointerButton::Secondary,
        ..at(10.0, 10.0)
    };
    assert_eq!(desktop.begin_drag(&id("a"), &event), Ok(false));
    assert!(!desktop.has_gesture(&id("a")));
}

#[test]
fn test_maximized_window_ignores_drag() {
    let mut store = MockWindowStateStore::new();
    store
        .expect_set_group_window_state()
        .withf(|_, update| *update == WindowStateUpdate::maximized(true))
        .times(1)
        .returning(|_, _| Ok(()));

    let mut desktop = MdiDesktop::new(ProgmanConfig::default(), store, three_groups());
    desktop.set_container(Some(Size::new(800, 600)));
    assert_eq!(desktop.toggle_maximize(&id("a")), Ok(true));

    assert_eq!(desktop.begin_drag(&id("a"), &at(10.0, 10.0)), Ok(false));
    assert!(!desktop.pointer_move(&at(50.0, 50.0)));
    assert_eq!(desktop.pointer_up(&at(50.0, 50.0)), None);

    let top = desktop.visible_windows().pop().unwrap();
    assert_eq!(top.group_id, id("a"));
    assert!(top.maximized);
    assert_eq!(top.rect, Rectangle { x: 0, y: 0, width: 800, height: 600 });
}

#[test]
fn test_frames_carry_latest_live_rect() {
    let mut desktop = desktop();
    desktop.begin_drag(&id("a"), &at(10.0, 10.0)).unwrap();
    assert!(desktop.on_frame().is_empty());

    desktop.pointer_move(&at(20.0, 10.0));
    desktop.pointer_move(&at(40.0, 30.0));
    assert_eq!(
        desktop.on_frame(),
        vec![RenderUpdate {
            group_id: id("a"),
            rect: Rectangle { x: 30, y: 20, width: 200, height: 150 },
        }]
    );
    assert!(desktop.on_frame().is_empty());

    // Views show the live rect before commit, the store still has the old one
    assert_eq!(desktop.window_rect(&id("a")).map(|r| r.position()), Some(Point::new(30, 20)));
    assert_eq!(desktop.group(&id("a")).unwrap().window_state.x, 0);
    assert_eq!(desktop.store().group_window_state(&id("a")).map(|g| g.x), Some(0));

    desktop.pointer_up(&at(40.0, 30.0));
    assert_eq!(desktop.store().group_window_state(&id("a")).map(|g| g.x), Some(30));
}

#[test]
fn test_drag_clamped_to_container_captured_at_start() {
    let mut desktop = desktop();
    desktop.set_container(Some(Size::new(640, 480)));
    desktop.begin_drag(&id("a"), &at(10.0, 10.0)).unwrap();

    // Later container changes do not affect the running gesture
    desktop.set_container(None);
    desktop.pointer_move(&at(5000.0, 5000.0));
    desktop.pointer_up(&at(5000.0, 5000.0));

    let geometry = desktop.group(&id("a")).unwrap().window_state;
    assert_eq!(geometry.position(), Point::new(540, 450));
}

#[test]
fn test_pointer_down_routes_by_hit_region() {
    let mut desktop = desktop();

    // b sits at (300, 0) with size 200x150
    assert_eq!(
        desktop.pointer_down(&id("b"), &at(350.0, 10.0)),
        Ok(Some(HitRegion::TitleBar))
    );
    assert!(desktop.has_gesture(&id("b")));
    desktop.pointer_up(&at(350.0, 10.0));

    assert_eq!(
        desktop.pointer_down(&id("b"), &at(499.0, 149.0)),
        Ok(Some(HitRegion::Edge(ResizeDirection::SE)))
    );
    desktop.pointer_move(&at(549.0, 199.0));
    desktop.pointer_up(&at(549.0, 199.0));
    assert_eq!(desktop.group(&id("b")).unwrap().window_state.size(), Size::new(250, 200));

    desktop.focus_window(&id("c")).unwrap();
    assert_eq!(
        desktop.pointer_down(&id("b"), &at(400.0, 100.0)),
        Ok(Some(HitRegion::Content))
    );
    assert_eq!(desktop.active_window(), Some(&id("b")));
    assert!(!desktop.has_gesture(&id("b")));

    assert_eq!(desktop.pointer_down(&id("b"), &at(0.0, 400.0)), Ok(None));
}

#[test]
fn test_extreme_pointer_coordinates_saturate() {
    let mut desktop = desktop();
    assert_eq!(desktop.pointer_down(&id("a"), &at(-1e12, 0.0)), Ok(None));
    assert_eq!(desktop.pointer_down(&id("a"), &at(1e12, 1e12)), Ok(None));
    assert!(!desktop.has_gesture(&id("a")));

    desktop.set_container(Some(Size::new(800, 600)));
    assert_eq!(
        desktop.pointer_down(&id("a"), &at(10.0, 10.0)),
        Ok(Some(HitRegion::TitleBar))
    );
    assert!(desktop.pointer_move(&at(-1e12, -1e12)));
    assert!(desktop.pointer_move(&at(1e12, 1e12)));
    desktop.pointer_up(&at(1e12, 1e12));
    assert_eq!(
        desktop.group(&id("a")).unwrap().window_state.position(),
        Point::new(700, 570)
    );

    // a now spans (700, 570) to (900, 720); grab its south-east corner
    desktop.set_container(None);
    assert_eq!(
        desktop.pointer_down(&id("a"), &at(899.0, 719.0)),
        Ok(Some(HitRegion::Edge(ResizeDirection::SE)))
    );
    assert!(desktop.pointer_move(&at(1e12, 1e12)));
    assert!(desktop.pointer_move(&at(-1e12, -1e12)));
    desktop.pointer_up(&at(-1e12, -1e12));
    assert_eq!(
        desktop.group(&id("a")).unwrap().window_state.rect(),
        Rectangle { x: 700, y: 570, width: 150, height: 100 }
    );
}

#[test]
fn test_frame_requested_until_next_frame() {
    let mut desktop = desktop();
    desktop.begin_drag(&id("a"), &at(10.0, 10.0)).unwrap();
    assert!(!desktop.frame_requested());

    assert!(desktop.pointer_move(&at(20.0, 10.0)));
    assert!(desktop.frame_requested());
    desktop.pointer_move(&at(25.0, 10.0));
    assert!(desktop.frame_requested());

    assert_eq!(desktop.on_frame().len(), 1);
    assert!(!desktop.frame_requested());

    desktop.pointer_move(&at(30.0, 10.0));
    assert!(desktop.frame_requested());
    desktop.pointer_up(&at(30.0, 10.0));
    assert!(!desktop.frame_requested());
}

#[test]
fn test_non_positive_container_is_treated_as_unknown() {
    let mut desktop = desktop();
    desktop.set_container(Some(Size::new(0, 400)));
    assert_eq!(desktop.container(), None);
    assert!(!desktop.dispatch(MdiCommand::Tile));

    desktop.set_container(Some(Size::new(600, -1)));
    assert_eq!(desktop.container(), None);

    desktop.set_container(Some(Size::new(600, 400)));
    assert_eq!(desktop.container(), Some(Size::new(600, 400)));
    assert!(desktop.dispatch(MdiCommand::Tile));
}

#[test]
fn test_rename_persists_through_store() {
    let mut store = MockWindowStateStore::new();
    store
        .expect_rename_group()
        .withf(|group_id, name| group_id.as_str() == "b" && name == "Games")
        .times(1)
        .returning(|_, _| Ok(()));

    let mut desktop = MdiDesktop::new(ProgmanConfig::default(), store, three_groups());
    desktop.rename_group(&id("b"), "Games").unwrap();
    assert_eq!(desktop.group(&id("b")).unwrap().name, "Games");

    assert_eq!(
        desktop.rename_group(&id("zzz"), "Nope"),
        Err(MdiError::UnknownGroup(id("zzz")))
    );
}

#[test]
fn test_delete_group_mid_gesture_discards_it() {
    let mut store = MockWindowStateStore::new();
    store
        .expect_remove_group()
        .withf(|group_id| group_id.as_str() == "a")
        .times(1)
        .returning(|_| Ok(()));

    let mut desktop = MdiDesktop::new(ProgmanConfig::default(), store, three_groups());
    desktop.begin_drag(&id("a"), &at(10.0, 10.0)).unwrap();
    desktop.pointer_move(&at(50.0, 50.0));

    desktop.delete_group(&id("a")).unwrap();
    assert!(!desktop.pointer_move(&at(60.0, 60.0)));
    assert_eq!(desktop.pointer_up(&at(60.0, 60.0)), None);
    assert!(desktop.group(&id("a")).is_none());
    assert_eq!(
        desktop.delete_group(&id("a")),
        Err(MdiError::UnknownGroup(id("a")))
    );
}

#[test]
fn test_create_group_offsets_and_opens() {
    let mut desktop = desktop();
    let created = desktop.create_group("Games");

    let group = desktop.group(&created).unwrap();
    assert_eq!(group.name, "Games");
    assert_eq!(group.icon, "folder");
    assert_eq!(
        group.window_state.rect(),
        Rectangle { x: 110, y: 110, width: 300, height: 200 }
    );
    assert_eq!(desktop.active_window(), Some(&created));
    assert!(desktop.store().group_window_state(&created).is_some());

    desktop.rename_group(&created, "Fun").unwrap();
    assert_eq!(desktop.group(&created).unwrap().name, "Fun");
}

#[test]
fn test_tile_requires_container() {
    let mut desktop = desktop();
    assert!(!desktop.dispatch(MdiCommand::Tile));

    desktop.set_container(Some(Size::new(600, 400)));
    desktop.minimize_window(&id("c")).unwrap();
    assert!(desktop.dispatch(MdiCommand::Tile));

    let rects: Vec<Rectangle> = desktop.visible_windows().iter().map(|v| v.rect).collect();
    assert!(rects.contains(&Rectangle { x: 0, y: 0, width: 300, height: 400 }));
    assert!(rects.contains(&Rectangle { x: 300, y: 0, width: 300, height: 400 }));
    assert!(desktop.group(&id("c")).unwrap().window_state.minimized);
}

#[test]
fn test_cascade_key_restores_and_keeps_active() {
    let mut desktop = desktop();
    desktop.close_window(&id("b")).unwrap();
    desktop.focus_window(&id("a")).unwrap();

    assert_eq!(desktop.handle_key("shift+f5"), Some(MdiCommand::Cascade));
    assert_eq!(desktop.visible_windows().len(), 3);
    assert_eq!(desktop.active_window(), Some(&id("a")));

    let b = desktop.group(&id("b")).unwrap().window_state;
    assert_eq!(b.rect(), Rectangle { x: 50, y: 50, width: 300, height: 200 });
    assert!(!b.minimized);

    assert_eq!(desktop.handle_key("F12"), None);
}

#[test]
fn test_arrange_icons_moves_only_minimized() {
    let mut desktop = desktop();
    desktop.minimize_window(&id("b")).unwrap();
    desktop.minimize_window(&id("c")).unwrap();
    assert!(desktop.dispatch(MdiCommand::ArrangeIcons));

    let positions: Vec<Point> = desktop
        .minimized_windows()
        .iter()
        .map(|g| g.window_state.position())
        .collect();
    assert_eq!(positions, vec![Point::new(10, 10), Point::new(85, 10)]);
    assert_eq!(desktop.group(&id("a")).unwrap().window_state.position(), Point::new(0, 0));
}

#[test]
fn test_close_and_minimize_active_commands() {
    let mut desktop = desktop();
    assert!(desktop.dispatch(MdiCommand::CloseActive));
    assert!(!desktop.registry().contains(&id("c")));
    assert!(desktop.dispatch(MdiCommand::MinimizeActive));
    assert!(!desktop.registry().contains(&id("b")));
    assert!(desktop.dispatch(MdiCommand::CloseActive));
    assert!(!desktop.dispatch(MdiCommand::CloseActive));
}

#[test]
fn test_listeners_see_lifecycle_events() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut desktop = desktop();
    let sink = Arc::clone(&events);
    desktop.add_listener(move |event| sink.lock().unwrap().push(event.clone()));

    let created = desktop.create_group("New");
    desktop.focus_window(&id("a")).unwrap();
    desktop.delete_group(&created).unwrap();

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            DesktopEvent::GroupCreated(created.clone()),
            DesktopEvent::WindowOpened(created.clone()),
            DesktopEvent::WindowFocused(id("a")),
            DesktopEvent::WindowClosed(created.clone()),
            DesktopEvent::GroupDeleted(created),
        ]
    );
}
