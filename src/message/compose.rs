//! Calendar digests.
//!
//! Every digest has the same frame: a header line, then events in
//! chronological order under one `【M/D(曜)】` section per day. Empty input
//! produces an empty string (no header) so callers can skip sending.

use std::collections::HashSet;

use super::{
    deadline_tag, MessageBuilder, MessageOptions, CLUB_PRACTICE_HEADER,
    EXTERNAL_PRACTICE_HEADER, MATCH_HEADER,
};
use crate::calendar::extract::EXTERNAL_PRACTICE_MARKER;
use crate::calendar::group::sort_chronological;
use crate::helpers::strip_leading;
use crate::types::{ClubPracticeEvent, ExternalPracticeEvent, MatchEvent, Scheduled};
use crate::util::{format_md_weekday, signed_days_between};

/// Header, then day sections with `render` called once per event.
///
/// The builder is only lent to `render` for the duration of each call.
pub fn compose_chronological<T, F>(
    events: &[T],
    header: &str,
    options: &MessageOptions,
    mut render: F,
) -> String
where
    T: Scheduled,
    F: FnMut(&mut MessageBuilder, &T),
{
    if events.is_empty() {
        return String::new();
    }

    let mut builder = MessageBuilder::new();
    builder.line(header);

    let mut current_day = None;
    for event in sort_chronological(events) {
        let day = event.starts_at().date();
        if current_day != Some(day) {
            builder.section(&format_md_weekday(day, &options.day_labels));
            current_day = Some(day);
        }
        render(&mut builder, event);
    }
    builder.render()
}

/// Club practice digest.
///
/// ```text
/// 🔵練習のお知らせ🔵
///
/// 【9/8(月)】
/// ・1300-1830 岸町基本
///   久下、伊藤
///   対象: 全級
/// ```
pub fn compose_club_practice(events: &[ClubPracticeEvent], options: &MessageOptions) -> String {
    let header = options.header_or(CLUB_PRACTICE_HEADER);
    compose_chronological(events, header, options, |b, e| {
        b.bullet(
            format!(
                "{} {}{}",
                e.time_range, e.location.short_building_name, e.practice_type
            ),
            &options.bullet,
        );
        if options.show_person_in_charge && !e.person_in_charge.is_empty() {
            b.indent(&e.person_in_charge);
        }
        if options.show_target_classes && !e.classes.is_empty() {
            b.indent(format!("対象: {}", e.classes));
        }
    })
}

/// External practice digest, with a countdown to each practice's sign-up deadline.
pub fn compose_external_practice(
    events: &[ExternalPracticeEvent],
    options: &MessageOptions,
) -> String {
    let header = options.header_or(EXTERNAL_PRACTICE_HEADER);
    compose_chronological(events, header, options, |b, e| {
        let title = strip_leading(&e.title, EXTERNAL_PRACTICE_MARKER);
        let tag = e
            .deadline
            .map(|d| format!("【{}】", deadline_tag(signed_days_between(options.today, d))))
            .unwrap_or_default();
        b.bullet(format!("{}{}", title, tag), &options.bullet);
        b.indent(format!("時間: {}", e.time_range));
        if options.show_target_classes && !e.classes.is_empty() {
            b.indent(format!("対象: {}", e.classes));
        }
        if options.show_description && !e.description.is_empty() {
            b.indent(&e.description);
        }
    })
}

/// Upcoming matches: one bullet per match, target classes appended.
pub fn compose_matches(events: &[MatchEvent], options: &MessageOptions) -> String {
    let header = options.header_or(MATCH_HEADER);
    compose_chronological(events, header, options, |b, e| {
        let classes = if options.show_target_classes {
            e.classes.to_string()
        } else {
            String::new()
        };
        b.bullet(format!("{}{}", e.title, classes), &options.bullet);
    })
}

/// Venues used by `events`, first-seen in chronological order, with map links.
pub fn compose_location_guide(events: &[ClubPracticeEvent], options: &MessageOptions) -> String {
    let mut seen = HashSet::new();
    let mut builder = MessageBuilder::new();
    for event in sort_chronological(events) {
        let location = &event.location;
        if !seen.insert(location.building_name.as_str()) {
            continue;
        }
        builder.bullet(&location.building_name, &options.bullet);
        builder.line(&location.map_url);
    }
    builder.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::{parse_lenient, ClassLabel, ClassSet};
    use crate::types::PracticeLocation;
    use chrono::{NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 8).unwrap()
    }

    fn at(m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn venue(short: &str) -> PracticeLocation {
        PracticeLocation {
            club_name: "かるた会".to_string(),
            map_url: format!("https://maps.example/{}", short),
            building_name: format!("{}公民館", short),
            short_building_name: short.to_string(),
        }
    }

    fn practice(d: u32, range: &str, short: &str) -> ClubPracticeEvent {
        ClubPracticeEvent {
            date: at(9, d),
            location: venue(short),
            practice_type: String::new(),
            time_range: range.to_string(),
            classes: ClassLabel::Set(ClassSet::all()),
            person_in_charge: "久下、伊藤".to_string(),
            description: String::new(),
        }
    }

    fn external(deadline: Option<NaiveDate>) -> ExternalPracticeEvent {
        ExternalPracticeEvent {
            date: at(10, 25),
            title: "外部千葉練".to_string(),
            time_range: "0900-1600".to_string(),
            classes: parse_lenient("E以上"),
            location: "千葉公民館".to_string(),
            description: "外部練習です".to_string(),
            deadline,
        }
    }

    #[test]
    fn test_club_practice_layout() {
        let events = vec![practice(8, "1300-1830", "岸町")];
        let text = compose_club_practice(&events, &MessageOptions::for_day(today()));
        assert_eq!(
            text,
            "🔵練習のお知らせ🔵\n\n【9/8(月)】\n・1300-1830 岸町\n  久下、伊藤\n  対象: 全級"
        );
    }

    #[test]
    fn test_club_practice_empty_input() {
        let options = MessageOptions::for_day(today()).with_header("今週の練習");
        assert_eq!(compose_club_practice(&[], &options), "");
    }

    #[test]
    fn test_club_practice_same_day_ordered_by_start() {
        let events = vec![
            practice(8, "13:00-17:00", "富士見"),
            practice(8, "9:00-12:00", "岸町"),
        ];
        let text = compose_club_practice(&events, &MessageOptions::for_day(today()));
        let morning = text.find("9:00-12:00").unwrap();
        let afternoon = text.find("13:00-17:00").unwrap();
        assert!(morning < afternoon);
        assert_eq!(text.matches("【9/8(月)】").count(), 1);
    }

    #[test]
    fn test_club_practice_options() {
        let mut event = practice(9, "1300-1830", "岸町");
        event.practice_type = "基本".to_string();
        event.description = "※G基向け特練".to_string();
        let options = MessageOptions {
            show_person_in_charge: false,
            show_target_classes: false,
            bullet: "◆".to_string(),
            ..MessageOptions::for_day(today())
        };
        let text = compose_club_practice(&[event], &options);
        assert_eq!(
            text,
            "🔵練習のお知らせ🔵\n\n【9/9(火)】\n◆1300-1830 岸町基本"
        );
    }

    #[test]
    fn test_club_practice_custom_day_labels() {
        let options = MessageOptions {
            day_labels: ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ..MessageOptions::for_day(today())
        };
        let text = compose_club_practice(&[practice(8, "1300-1830", "岸町")], &options);
        assert!(text.contains("【9/8(Mo)】"));
    }

    #[test]
    fn test_external_practice_deadline_tags() {
        let options = MessageOptions::for_day(today());
        let tag_for = |deadline: NaiveDate| {
            let text = compose_external_practice(&[external(Some(deadline))], &options);
            text.lines().nth(3).unwrap().to_string()
        };

        assert_eq!(tag_for(today()), "・千葉練【本日〆切】");
        assert_eq!(tag_for(today().succ_opt().unwrap()), "・千葉練【〆切まであと1日】");
        assert_eq!(tag_for(today().pred_opt().unwrap()), "・千葉練【期限超過1日】");
    }

    #[test]
    fn test_external_practice_layout() {
        let text = compose_external_practice(&[external(None)], &MessageOptions::for_day(today()));
        assert_eq!(
            text,
            "🟠外部練習のお知らせ🟠\n\n【10/25(土)】\n・千葉練\n  時間: 0900-1600\n  対象: ABCDE\n  外部練習です"
        );
    }

    #[test]
    fn test_matches() {
        let m = |d: u32, title: &str, classes: &str| MatchEvent {
            date: at(9, d),
            title: title.to_string(),
            classes: parse_lenient(classes),
            location: String::new(),
        };
        let events = vec![m(21, "府中大会", ""), m(14, "全国選手権", "CDE")];
        let text = compose_matches(&events, &MessageOptions::for_day(today()));
        assert_eq!(
            text,
            "🟢近日大会のお知らせ🟢\n\n【9/14(日)】\n・全国選手権CDE\n\n【9/21(日)】\n・府中大会"
        );
    }

    #[test]
    fn test_location_guide_dedupes() {
        let events = vec![
            practice(10, "1300-1830", "岸町"),
            practice(8, "1300-1830", "富士見"),
            practice(9, "1300-1830", "岸町"),
        ];
        let text = compose_location_guide(&events, &MessageOptions::for_day(today()));
        assert_eq!(
            text,
            "・富士見公民館\nhttps://maps.example/富士見\n・岸町公民館\nhttps://maps.example/岸町"
        );
        assert_eq!(compose_location_guide(&[], &MessageOptions::for_day(today())), "");
    }

    fn week() -> Vec<ClubPracticeEvent> {
        vec![
            practice(8, "1300-1830", "岸町"),
            practice(8, "0900-1200", "富士見"),
            practice(10, "1800-2100", "上落合"),
            practice(12, "9:30-12:00", "岸町"),
            practice(13, "未定", "富士見"),
        ]
    }

    #[test]
    fn test_reversed_input_is_identical() {
        let options = MessageOptions::for_day(today());
        let forward = week();
        let mut reversed = week();
        reversed.reverse();
        assert_eq!(
            compose_club_practice(&forward, &options),
            compose_club_practice(&reversed, &options)
        );
    }

    proptest! {
        #[test]
        fn prop_output_independent_of_input_order(shuffled in Just(week()).prop_shuffle()) {
            let options = MessageOptions::for_day(today());
            prop_assert_eq!(
                compose_club_practice(&shuffled, &options),
                compose_club_practice(&week(), &options)
            );
        }
    }
}
