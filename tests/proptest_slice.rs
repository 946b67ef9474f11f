//! Property tests for slice annotations

use proptest::prelude::*;

use paderbox_audio::audio::{parse_audio_slice, SlicedPath};
use paderbox_audio::{AudioError, ChannelSelection};

fn channel() -> impl Strategy<Value = Option<ChannelSelection>> {
    prop_oneof![
        Just(None),
        (0usize..64).prop_map(|i| Some(ChannelSelection::Index(i))),
        (0usize..64, proptest::option::of(0usize..64)).prop_map(|(start, stop)| {
            Some(ChannelSelection::Range {
                start: Some(start),
                stop,
            })
        }),
        (0usize..64).prop_map(|stop| {
            Some(ChannelSelection::Range {
                start: None,
                stop: Some(stop),
            })
        }),
    ]
}

fn sliced_path() -> impl Strategy<Value = SlicedPath> {
    (
        "[a-z0-9_/.~-]{1,24}",
        0i64..10_000_000,
        proptest::option::of(0i64..10_000_000),
        channel(),
    )
        .prop_map(|(path, start, stop, channel)| SlicedPath {
            path,
            start,
            stop,
            channel,
        })
}

proptest! {
    #[test]
    fn prop_display_parses_back(sliced in sliced_path()) {
        let parsed = parse_audio_slice(&sliced.to_string()).unwrap();
        prop_assert_eq!(parsed, sliced);
    }

    #[test]
    fn prop_whitespace_is_rejected(sliced in sliced_path(), at in 0usize..64, ws in "[ \t\n]") {
        let text = sliced.to_string();
        let annotation_start = text.rfind("::").unwrap() + 2;
        let at = annotation_start + at % (text.len() - annotation_start + 1);
        let mut broken = text.clone();
        broken.insert_str(at, &ws);
        let err = parse_audio_slice(&broken).unwrap_err();
        prop_assert!(matches!(err, AudioError::Format { .. }), "{}", err);
    }

    #[test]
    fn prop_real_path_is_everything_before_last_delimiter(
        prefix in "[a-z]{1,8}(::[a-z]{1,8})?",
        start in 0i64..1000,
    ) {
        let parsed = parse_audio_slice(&format!("{prefix}::[{start}:]")).unwrap();
        prop_assert_eq!(parsed.path, prefix);
        prop_assert_eq!(parsed.start, start);
        prop_assert_eq!(parsed.stop, None);
    }
}
