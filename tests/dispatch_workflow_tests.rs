mod utils;

use rstest::rstest;
use serde_json::json;
use std::sync::{Arc, Barrier};
use std::thread;

use roomlog::{ErrorReplyHandler, InboundEvent, NoRoomPolicy, ReplyHandler, ReplyTag, StoreError};
use utils::{payload, TestSetupBuilder};

#[test]
fn not_on_channel_reply_lands_in_current_room() {
    let setup = TestSetupBuilder::new()
        .with_rooms(vec!["#test", "#other"])
        .with_current("#test")
        .build();

    let report = setup
        .store
        .dispatch_raw(
            "ERR_NOTONCHANNEL",
            &payload(json!({"reason": "You are not on that channel", "channel": "#test"})),
        )
        .expect("tag should be recognized");

    assert_eq!(report.delivered, 1);
    assert_eq!(report.failed, 0);

    let events = setup.rooms.get("#test").unwrap().events();
    assert_eq!(events.len(), 1, "exactly one entry should be appended");

    let entry = &events[0];
    assert_eq!(entry.kind, "error:err_notonchannel");
    assert_eq!(entry.reason, "You are not on that channel");
    assert_eq!(entry.field("channel"), Some(&json!("#test")));
    assert_eq!(entry.field("isMe"), Some(&json!(true)));
    assert!(entry.is_me);

    assert!(
        setup.rooms.get("#other").unwrap().is_empty(),
        "non-current rooms should be untouched"
    );
}

#[rstest]
#[case("ERR_NOSUCHNICK", "error:err_nosuchnick")]
#[case("403", "error:err_nosuchchannel")]
#[case("ERR_CHANOPRIVSNEEDED", "error:err_chanoprivsneeded")]
#[case("474", "error:err_bannedfromchan")]
fn every_default_tag_logs_its_kind(#[case] tag: &str, #[case] kind: &str) {
    let setup = TestSetupBuilder::new()
        .with_rooms(vec!["#rust"])
        .with_current("#rust")
        .build();

    setup
        .store
        .dispatch_raw(tag, &payload(json!({"reason": "denied"})))
        .unwrap();

    let entry = setup.rooms.current().unwrap().last_event().unwrap();
    assert_eq!(entry.kind, kind);
    assert_eq!(entry.reason, "denied");
    assert!(entry.is_me);
}

#[test]
fn replies_follow_the_current_room_as_focus_moves() {
    let setup = TestSetupBuilder::new()
        .with_rooms(vec!["#a", "#b"])
        .with_current("#a")
        .build();

    setup
        .store
        .dispatch(ReplyTag::CannotSendToChan, &json!({"reason": "to a"}));
    setup.rooms.set_current("#b").unwrap();
    setup
        .store
        .dispatch(ReplyTag::CannotSendToChan, &json!({"reason": "to b"}));

    assert_eq!(setup.rooms.get("#a").unwrap().events()[0].reason, "to a");
    assert_eq!(setup.rooms.get("#b").unwrap().events()[0].reason, "to b");
}

#[test]
fn sequential_replies_keep_arrival_order() {
    let setup = TestSetupBuilder::new()
        .with_rooms(vec!["#a"])
        .with_current("#a")
        .build();

    for reason in ["one", "two", "three"] {
        setup
            .store
            .dispatch(ReplyTag::NoSuchNick, &json!({"reason": reason}));
    }

    let events = setup.rooms.current().unwrap().events();
    let reasons: Vec<&str> = events.iter().map(|e| e.reason.as_str()).collect();
    assert_eq!(reasons, vec!["one", "two", "three"]);
    let seqs: Vec<u64> = events.iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2]);
}

#[test]
fn no_current_room_drops_and_leaves_rooms_unchanged() {
    let setup = TestSetupBuilder::new().with_rooms(vec!["#a", "#b"]).build();

    let report = setup
        .store
        .dispatch(ReplyTag::NotOnChannel, &json!({"reason": "nowhere"}));

    assert_eq!(report.failed, 0);
    for room in setup.rooms.list() {
        assert!(room.is_empty(), "{} should have no entries", room.name());
    }
}

#[test]
fn buffered_replies_arrive_when_a_room_is_focused() {
    let setup = TestSetupBuilder::new()
        .with_rooms(vec!["#a"])
        .with_policy(NoRoomPolicy::Buffer)
        .build();

    setup
        .store
        .dispatch(ReplyTag::NicknameInUse, &json!({"reason": "first"}));
    setup
        .store
        .dispatch(ReplyTag::NoSuchChannel, &json!({"reason": "second"}));
    assert_eq!(setup.rooms.pending_len(), 2);

    let room = setup.rooms.set_current("#a").unwrap();
    let kinds: Vec<String> = room.events().into_iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec!["error:err_nicknameinuse", "error:err_nosuchchannel"]
    );
}

#[test]
fn buffered_replies_stay_ahead_of_replies_racing_the_focus_change() {
    for _ in 0..500 {
        let setup = TestSetupBuilder::new()
            .with_rooms(vec!["#a"])
            .with_policy(NoRoomPolicy::Buffer)
            .build();
        setup
            .store
            .dispatch(ReplyTag::NoSuchNick, &json!({"reason": "early"}));

        let barrier = Barrier::new(2);
        thread::scope(|s| {
            s.spawn(|| {
                barrier.wait();
                setup.rooms.set_current("#a").unwrap();
            });
            s.spawn(|| {
                barrier.wait();
                setup
                    .store
                    .dispatch(ReplyTag::NoSuchNick, &json!({"reason": "late"}));
            });
        });

        // The late reply either lands after the flush or is buffered behind
        // the early one; it is never stranded and never overtakes it.
        assert_eq!(setup.rooms.pending_len(), 0);
        let reasons: Vec<String> = setup
            .rooms
            .get("#a")
            .unwrap()
            .events()
            .into_iter()
            .map(|e| e.reason)
            .collect();
        assert_eq!(reasons, vec!["early", "late"]);
    }
}

#[test]
fn fail_policy_is_contained_by_the_store() {
    let setup = TestSetupBuilder::new()
        .with_policy(NoRoomPolicy::Fail)
        .build();

    let report = setup
        .store
        .dispatch(ReplyTag::NotOnChannel, &json!({"reason": "x"}));

    assert_eq!(report.delivered, 0);
    assert_eq!(report.failed, 1);
}

#[test]
fn malformed_payload_is_skipped_and_later_replies_still_land() {
    let setup = TestSetupBuilder::new()
        .with_rooms(vec!["#a"])
        .with_current("#a")
        .build();

    let bad = setup
        .store
        .dispatch(ReplyTag::NotOnChannel, &json!({"channel": "#a"}));
    assert_eq!(bad.failed, 1);

    let good = setup
        .store
        .dispatch(ReplyTag::NotOnChannel, &json!({"reason": "ok"}));
    assert_eq!(good.delivered, 1);
    assert_eq!(setup.rooms.current().unwrap().len(), 1);
}

#[test]
fn extra_listener_on_a_tag_fans_out() {
    let setup = TestSetupBuilder::new()
        .with_rooms(vec!["#a"])
        .with_current("#a")
        .build();

    let observer = Arc::new(
        ErrorReplyHandler::new(&setup.store, ReplyTag::NotOnChannel).with_is_me(false),
    );
    observer.listen();

    let report = setup
        .store
        .dispatch(ReplyTag::NotOnChannel, &json!({"reason": "twice"}));

    assert_eq!(report.delivered, 2);
    let flags: Vec<bool> = setup
        .rooms
        .current()
        .unwrap()
        .events()
        .iter()
        .map(|e| e.is_me)
        .collect();
    assert_eq!(flags, vec![true, false]);
}

#[test]
fn inbound_wire_events_parse_and_dispatch() {
    let setup = TestSetupBuilder::new()
        .with_rooms(vec!["#a"])
        .with_current("#a")
        .build();

    let event: InboundEvent = serde_json::from_str(
        r##"{"tag": "442", "payload": {"reason": "You're not on that channel", "channel": "#a"}}"##,
    )
    .unwrap();
    setup.store.dispatch_inbound(&event).unwrap();

    let unknown: InboundEvent = serde_json::from_str(r#"{"tag": "RPL_WELCOME"}"#).unwrap();
    assert_eq!(
        setup.store.dispatch_inbound(&unknown).unwrap_err(),
        StoreError::UnknownTag("RPL_WELCOME".to_string())
    );

    assert_eq!(setup.rooms.current().unwrap().len(), 1);
}

#[test]
fn store_without_handlers_accepts_replies_silently() {
    let setup = TestSetupBuilder::new()
        .with_rooms(vec!["#a"])
        .with_current("#a")
        .without_default_handlers()
        .build();

    let report = setup
        .store
        .dispatch(ReplyTag::NotOnChannel, &json!({"reason": "x"}));

    assert_eq!(report.delivered, 0);
    assert!(setup.rooms.current().unwrap().is_empty());
}
