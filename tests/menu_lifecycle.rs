use glam::Vec3;
use holomenu_core::{ActorId, Pose};
use holomenu_testkit::MenuHarness;
use holomenu_ui3d::{
    project, DisplayContent, DisplayKind, ElementBuilder, ElementGroup, ItemPayload, MenuError,
    MenuState, SpinningAnchor, WorldHost,
};

const OWNER: ActorId = ActorId(1);

#[test]
fn element_follows_anchor_turning_to_ninety_degrees() {
    let harness = MenuHarness::new();
    let anchor = Vec3::new(10.0, 64.0, -4.0);
    let menu = harness.open_menu(Pose::at(anchor), OWNER).unwrap();
    let element = harness
        .text_element(&menu, Vec3::new(1.0, 0.0, 0.0), "a")
        .unwrap();
    assert_eq!(element.pose().position, anchor + Vec3::new(1.0, 0.0, 0.0));

    menu.set_anchor_pose(Pose::new(anchor, 90.0));
    assert_eq!(element.pose().position, anchor + Vec3::new(0.0, 0.0, 1.0));

    let world = harness.server().world();
    for id in [element.display_id(), element.interaction_id()] {
        let record = world.primitive(id).unwrap();
        assert_eq!(record.pose.position, anchor + Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(record.pose.yaw, 90.0);
    }
}

#[test]
fn scheduled_sync_places_every_live_element() {
    let harness = MenuHarness::new();
    let menu = harness
        .server()
        .manager()
        .open(
            harness
                .builder()
                .root(Pose::at(Vec3::new(0.0, 70.0, 0.0)))
                .owner(OWNER)
                .motion(SpinningAnchor::new(35.0)),
        )
        .unwrap();
    let offsets = [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 2.0),
        Vec3::new(-2.0, 0.5, 1.0),
    ];
    for (i, offset) in offsets.iter().enumerate() {
        harness
            .text_element(&menu, *offset, &format!("e{i}"))
            .unwrap();
    }

    let world = harness.server().world();
    for _ in 0..12 {
        harness.step(5);
        let anchor = menu.anchor_pose();
        for element in menu.elements() {
            let expected = project(anchor, element.offset()).position;
            assert_eq!(element.pose().position, expected);
            assert_eq!(
                world.primitive(element.interaction_id()).unwrap().pose.position,
                expected
            );
        }
    }
    assert_ne!(menu.anchor_pose().yaw, 0.0);
}

#[test]
fn mismatched_payload_spawns_nothing() {
    let harness = MenuHarness::new();
    let menu = harness.open_menu(Pose::default(), OWNER).unwrap();
    let before = harness.server().world().live_count();

    let result = ElementBuilder::new(&menu)
        .flag("bad")
        .display(
            DisplayKind::Text,
            DisplayContent::Item(ItemPayload::new("apple")),
        )
        .build();

    assert_eq!(
        result.unwrap_err(),
        MenuError::PayloadMismatch {
            expected: DisplayKind::Text,
            found: DisplayKind::Item,
        }
    );
    assert_eq!(harness.server().world().live_count(), before);
    assert_eq!(menu.element_count(), 0);
}

#[test]
fn failed_hitbox_spawn_leaves_no_display_behind() {
    let harness = MenuHarness::new();
    let menu = harness.open_menu(Pose::default(), OWNER).unwrap();
    let before = harness.server().world().live_count();

    harness.server().world().set_available(false);
    let result = harness.text_element(&menu, Vec3::X, "late");
    harness.server().world().set_available(true);

    assert!(matches!(result, Err(MenuError::Host(_))));
    assert_eq!(harness.server().world().live_count(), before);
    assert_eq!(menu.element_count(), 0);
}

#[test]
fn builders_report_missing_fields() {
    let harness = MenuHarness::new();
    assert_eq!(
        harness.builder().owner(OWNER).build().unwrap_err(),
        MenuError::MissingField("root")
    );

    let menu = harness.open_menu(Pose::default(), OWNER).unwrap();
    assert_eq!(
        ElementBuilder::new(&menu).text("x").build().unwrap_err(),
        MenuError::MissingField("flag")
    );
    assert_eq!(
        ElementBuilder::new(&menu).flag("x").build().unwrap_err(),
        MenuError::MissingField("content")
    );
}

#[test]
fn element_cleanup_is_idempotent() {
    let harness = MenuHarness::new();
    let menu = harness.open_menu(Pose::default(), OWNER).unwrap();
    let element = harness.text_element(&menu, Vec3::X, "a").unwrap();
    let world = harness.server().world();

    element.cleanup();
    let live_once = world.live_count();
    element.cleanup();

    assert!(element.is_destroyed());
    assert_eq!(world.live_count(), live_once);
    assert!(world.is_destroyed(element.display_id()));
    assert!(world.is_destroyed(element.interaction_id()));
    assert_eq!(menu.element_count(), 0);
    assert!(harness.server().manager().index().lookup(element.interaction_id()).is_none());
}

#[test]
fn menu_cleanup_is_idempotent_and_removes_everything() {
    let harness = MenuHarness::new();
    let menu = harness.open_menu(Pose::default(), OWNER).unwrap();
    for i in 0..3 {
        harness
            .text_element(&menu, Vec3::new(i as f32, 0.0, 0.0), &format!("e{i}"))
            .unwrap();
    }
    assert_eq!(harness.server().world().live_count(), 7);

    menu.cleanup();
    menu.cleanup();

    assert_eq!(menu.state(), MenuState::Cleaned);
    assert_eq!(menu.element_count(), 0);
    assert_eq!(harness.server().world().live_count(), 0);
    assert!(harness.server().manager().index().is_empty());

    harness.step(100);
    assert_eq!(harness.server().scheduler().pending(), 0);
}

#[test]
fn closed_menu_rejects_new_elements() {
    let harness = MenuHarness::new();
    let menu = harness.open_menu(Pose::default(), OWNER).unwrap();
    menu.cleanup();
    assert_eq!(
        harness.text_element(&menu, Vec3::X, "late").unwrap_err(),
        MenuError::MenuClosed(menu.id())
    );
}

#[test]
fn idle_menu_times_out_on_watchdog() {
    let harness = MenuHarness::new();
    let menu = harness
        .server()
        .manager()
        .open(harness.builder().root(Pose::default()).owner(OWNER).timeout_secs(5))
        .unwrap();
    harness.text_element(&menu, Vec3::X, "a").unwrap();

    harness.advance_secs(4);
    assert!(menu.is_active());

    harness.advance_secs(1);
    assert!(menu.is_cleaned());
    assert_eq!(harness.server().world().live_count(), 0);
}

#[test]
fn interaction_resets_the_timeout_window() {
    let harness = MenuHarness::new();
    let menu = harness
        .server()
        .manager()
        .open(harness.builder().root(Pose::default()).owner(OWNER).timeout_secs(5))
        .unwrap();
    let element = harness.text_element(&menu, Vec3::X, "a").unwrap();

    harness.advance_secs(4);
    harness.press(&element, OWNER);

    harness.advance_secs(1);
    assert!(menu.is_active(), "pressed at t=4, must survive t=5");

    harness.advance_secs(3);
    assert!(menu.is_active());
    harness.advance_secs(1);
    assert!(menu.is_cleaned());
}

#[test]
fn timeout_counts_milliseconds_not_second_boundaries() {
    let harness = MenuHarness::new();
    let menu = harness
        .server()
        .manager()
        .open(harness.builder().root(Pose::default()).owner(OWNER).timeout_secs(5))
        .unwrap();
    let element = harness.text_element(&menu, Vec3::X, "a").unwrap();

    harness.clock().set_millis(1_001_999);
    harness.press(&element, OWNER);
    assert_eq!(menu.last_interaction_millis(), 1_001_999);

    // 4.001 s idle, though the second counter moved by five.
    harness.clock().set_millis(1_006_000);
    harness.step(21);
    assert!(menu.is_active());
    assert_eq!(menu.idle_millis(), 4_001);

    harness.clock().set_millis(1_006_999);
    harness.step(20);
    assert!(menu.is_cleaned());
}

#[test]
fn timed_out_menus_are_forgotten() {
    let harness = MenuHarness::new();
    let menu = harness
        .server()
        .manager()
        .open(harness.builder().root(Pose::default()).owner(OWNER).timeout_secs(1))
        .unwrap();
    let element = harness.text_element(&menu, Vec3::X, "a").unwrap();
    assert_eq!(harness.server().manager().menu_count(), 1);

    harness.advance_secs(2);
    assert!(menu.is_cleaned());
    assert_eq!(harness.server().manager().menu_count(), 0);

    let world = harness.server().world();
    assert_eq!(world.live_count(), 0);
    assert!(world.primitive(element.display_id()).is_none());
    assert!(world.primitive(element.interaction_id()).is_none());
    assert_eq!(harness.press(&element, OWNER), None);
}

#[test]
fn disabled_auto_cleanup_keeps_menu_open() {
    let harness = MenuHarness::new();
    let menu = harness
        .server()
        .manager()
        .open(
            harness
                .builder()
                .root(Pose::default())
                .owner(OWNER)
                .timeout_secs(1)
                .auto_cleanup(false),
        )
        .unwrap();

    harness.advance_secs(10);
    assert!(menu.is_active());

    menu.set_auto_cleanup(true);
    harness.advance_secs(1);
    assert!(menu.is_cleaned());
}

#[test]
fn groups_share_an_origin_and_clean_up_together() {
    let harness = MenuHarness::new();
    let menu = harness.open_menu(Pose::default(), OWNER).unwrap();
    let row = ElementGroup::new(7, Vec3::new(0.0, 2.0, 0.0));

    let left = ElementBuilder::new(&menu)
        .group(row)
        .offset(Vec3::new(-1.0, 0.0, 0.0))
        .flag("left")
        .text("<")
        .build()
        .unwrap();
    ElementBuilder::new(&menu)
        .group(row)
        .offset(Vec3::new(1.0, 0.0, 0.0))
        .flag("right")
        .text(">")
        .build()
        .unwrap();
    harness.text_element(&menu, Vec3::ZERO, "title").unwrap();

    assert_eq!(left.offset(), Vec3::new(-1.0, 2.0, 0.0));
    assert_eq!(menu.group_elements(row.id).len(), 2);

    assert_eq!(menu.cleanup_group(row.id), 2);
    assert_eq!(menu.element_count(), 1);
    assert!(left.is_destroyed());
}

#[test]
fn claim_nearest_owner_picks_closest_actor_in_radius() {
    let harness = MenuHarness::new();
    let world = harness.server().world();
    world.place_actor(ActorId(5), Vec3::new(6.0, 0.0, 0.0));
    world.place_actor(ActorId(6), Vec3::new(2.0, 0.0, 0.0));
    world.place_actor(ActorId(7), Vec3::new(50.0, 0.0, 0.0));

    let menu = harness
        .server()
        .manager()
        .open(harness.builder().root(Pose::default()))
        .unwrap();
    assert_eq!(menu.owner(), None);
    assert_eq!(menu.claim_nearest_owner(), Some(ActorId(6)));
    assert_eq!(menu.owner(), Some(ActorId(6)));
}

#[test]
fn sync_tolerates_concurrent_element_removal() {
    let harness = MenuHarness::new();
    let menu = harness.open_menu(Pose::default(), OWNER).unwrap();
    let elements: Vec<_> = (0..32)
        .map(|i| {
            harness
                .text_element(&menu, Vec3::new(i as f32, 0.0, 0.0), &format!("e{i}"))
                .unwrap()
        })
        .collect();

    std::thread::scope(|scope| {
        let syncing = menu.clone();
        scope.spawn(move || {
            for yaw in 0..200 {
                syncing.set_anchor_pose(Pose::new(Vec3::ZERO, yaw as f32 * 7.0));
                syncing.sync_pass();
            }
        });
        for element in &elements {
            element.cleanup();
        }
    });

    assert_eq!(menu.element_count(), 0);
    assert_eq!(harness.server().world().live_count(), 1);
}

#[test]
fn externally_removed_primitive_does_not_stop_sync() {
    let harness = MenuHarness::new();
    let menu = harness.open_menu(Pose::default(), OWNER).unwrap();
    let gone = harness.text_element(&menu, Vec3::X, "gone").unwrap();
    let kept = harness.text_element(&menu, Vec3::Z, "kept").unwrap();

    harness.server().world().force_remove(gone.display_id());
    menu.set_anchor_pose(Pose::new(Vec3::ZERO, 180.0));

    assert_eq!(kept.pose().position, Vec3::new(0.0, 0.0, -1.0));
    assert_eq!(
        harness.server().world().primitive(kept.display_id()).unwrap().pose.position,
        Vec3::new(0.0, 0.0, -1.0)
    );

    gone.cleanup();
    assert_eq!(menu.element_count(), 1);
}

#[test]
fn hitbox_size_defaults_to_settings_and_can_be_overridden() {
    let harness = MenuHarness::new();
    let menu = harness.open_menu(Pose::default(), OWNER).unwrap();
    let default = harness.text_element(&menu, Vec3::X, "a").unwrap();
    let wide = ElementBuilder::new(&menu)
        .flag("wide")
        .text("Wide")
        .hitbox(3.0, 0.5)
        .build()
        .unwrap();

    let world = harness.server().world();
    let size = |id| match world.primitive(id).unwrap().spec {
        holomenu_ui3d::PrimitiveSpec::Interaction {
            width,
            height,
            responsive,
        } => {
            assert!(responsive);
            (width, height)
        }
        other => panic!("unexpected spec {other:?}"),
    };
    assert_eq!(size(default.interaction_id()), (1.0, 1.0));
    assert_eq!(size(wide.interaction_id()), (3.0, 0.5));

    let anchor = world.primitive(menu.anchor_primitive().unwrap()).unwrap();
    assert_eq!(
        anchor.spec,
        holomenu_ui3d::PrimitiveSpec::Interaction {
            width: 0.0,
            height: 0.0,
            responsive: false,
        }
    );
}

#[test]
fn menu_survives_missing_world_for_anchor() {
    let harness = MenuHarness::new();
    harness.server().world().set_available(false);
    let menu = harness.open_menu(Pose::default(), OWNER).unwrap();
    harness.server().world().set_available(true);

    assert!(menu.is_active());
    assert_eq!(menu.anchor_primitive(), None);
    let element = harness.text_element(&menu, Vec3::X, "a").unwrap();
    harness.step(10);
    assert_eq!(element.pose().position, Vec3::X);
    menu.cleanup();
    assert_eq!(harness.server().world().live_count(), 0);
}
