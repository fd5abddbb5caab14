//! Registration deadline reminders.
//!
//! Match sign-ups are collected per class, so the main reminder is grouped by
//! class with each class's registration form link. The event-wise variant
//! regroups the same rows by match for organizers.

use super::{
    deadline_tag, Announcement, MessageBuilder, MessageOptions,
    EVENTWISE_DEADLINE_HEADER, EXTERNAL_PRACTICE_DEADLINE_HEADER, MATCH_DEADLINE_HEADER,
};
use crate::calendar::group::sort_chronological;
use crate::classes::OrdinalClass;
use crate::types::{ClassTable, ClubDirectory, InternalDeadlineEvent, Registration};
use crate::util::{format_md, signed_days_between};

fn participant_lines(builder: &mut MessageBuilder, registration: &Registration, options: &MessageOptions) {
    let participants = &registration.participants;
    if options.show_attending {
        builder.line("⭕参加:");
        for name in &participants.attending {
            builder.line(name.as_str());
        }
    }
    if !participants.undecided.is_empty() {
        builder.line("❓未回答:");
        for name in &participants.undecided {
            builder.line(name.as_str());
        }
    }
}

fn sorted_by_deadline(registrations: &[Registration]) -> Vec<&Registration> {
    let mut sorted: Vec<&Registration> = registrations.iter().collect();
    sorted.sort_by_key(|r| (r.deadline, r.event_date));
    sorted
}

/// Per-class match deadlines.
///
/// ```text
/// 🔔近日の〆切(大会)🔔
///
/// 🟦E級｜https://forms.example/e
///
/// ・10/12府中大会（9/20〆切）
/// ⭕参加:
/// 久下
/// ❓未回答:
/// 伊藤
/// ```
pub fn compose_classwise_deadlines(
    registrations: &ClassTable<Vec<Registration>>,
    directory: &ClubDirectory,
    options: &MessageOptions,
) -> Announcement {
    let mut builder = MessageBuilder::new();
    builder.line(options.header_or(MATCH_DEADLINE_HEADER));

    let mut has_any = false;
    for (class, rows) in registrations {
        if rows.is_empty() {
            continue;
        }
        has_any = true;

        let color = directory.class_color(*class);
        builder.blank();
        match directory.registration_url(*class) {
            Some(url) => builder.line(format!("{}{}級｜{}", color, class, url)),
            None => builder.line(format!("{}{}級", color, class)),
        };

        for registration in sorted_by_deadline(rows) {
            builder.blank();
            builder.bullet(
                format!(
                    "{}{}（{}〆切）",
                    format_md(registration.event_date),
                    registration.title,
                    format_md(registration.deadline)
                ),
                &options.bullet,
            );
            participant_lines(&mut builder, registration, options);
        }
    }

    if !has_any {
        return Announcement::none();
    }
    Announcement::from_text(builder.render())
}

/// The same registrations regrouped by match, classes ascending under each.
pub fn compose_eventwise_deadlines(
    registrations: &ClassTable<Vec<Registration>>,
    directory: &ClubDirectory,
    options: &MessageOptions,
) -> Announcement {
    let mut by_title: Vec<(&str, Vec<(OrdinalClass, &Registration)>)> = Vec::new();

    let mut rows: Vec<(OrdinalClass, &Registration)> = registrations
        .iter()
        .flat_map(|(class, rows)| rows.iter().map(move |r| (*class, r)))
        .collect();
    rows.sort_by_key(|(class, r)| (r.event_date, *class));

    for (class, registration) in rows {
        match by_title
            .iter_mut()
            .find(|(title, _)| *title == registration.title)
        {
            Some((_, entries)) => entries.push((class, registration)),
            None => by_title.push((registration.title.as_str(), vec![(class, registration)])),
        }
    }

    if by_title.is_empty() {
        return Announcement::none();
    }

    let mut builder = MessageBuilder::new();
    builder.line(options.header_or(EVENTWISE_DEADLINE_HEADER));
    for (title, mut entries) in by_title {
        entries.sort_by_key(|(class, _)| *class);
        builder.blank();
        builder.line(format!("🔷{}", title));
        for (class, registration) in entries {
            builder.line(format!(
                "{}{}級 {}（会〆{}）",
                directory.class_color(class),
                class,
                format_md(registration.event_date),
                format_md(registration.deadline)
            ));
            participant_lines(&mut builder, registration, options);
        }
    }
    Announcement::from_text(builder.render())
}

/// Internal sign-up cutoffs for external practices, soonest first.
pub fn compose_external_practice_deadlines(
    deadlines: &[InternalDeadlineEvent],
    options: &MessageOptions,
) -> Announcement {
    let items: Vec<&InternalDeadlineEvent> = sort_chronological(deadlines)
        .into_iter()
        .filter(|d| d.is_external_practice_deadline)
        .collect();
    if items.is_empty() {
        return Announcement::none();
    }

    let mut builder = MessageBuilder::new();
    builder.line(options.header_or(EXTERNAL_PRACTICE_DEADLINE_HEADER));
    builder.blank();
    for item in items {
        let days = signed_days_between(options.today, item.date.date());
        builder.bullet(format!("【{}】{}", deadline_tag(days), item.title), &options.bullet);
    }
    Announcement::from_text(builder.render())
}
