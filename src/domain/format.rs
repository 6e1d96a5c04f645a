//! Pure formatting rules applied while compiling invitation content.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use time::{Date, Time, Weekday};

use super::types::{EventType, Locale};

const WEEKDAYS_ID: [&str; 7] = ["Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu"];
const WEEKDAYS_EN: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];
const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];
const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Generic labels for custom ceremonies without user-supplied names.
pub const CUSTOM_EVENT1_FALLBACK: &str = "Acara Pertama";
pub const CUSTOM_EVENT2_FALLBACK: &str = "Acara Kedua";

fn weekday_index(weekday: Weekday) -> usize {
    usize::from(weekday.number_days_from_monday())
}

/// Long date form, e.g. `Minggu, 1 Juni 2025` or `Sunday, 1 June 2025`.
pub fn long_date(date: Date, locale: Locale) -> String {
    let (weekdays, months) = match locale {
        Locale::Id => (&WEEKDAYS_ID, &MONTHS_ID),
        Locale::En => (&WEEKDAYS_EN, &MONTHS_EN),
    };
    let weekday = weekdays[weekday_index(date.weekday())];
    let month = months[usize::from(u8::from(date.month())) - 1];
    format!("{weekday}, {} {month} {}", date.day(), date.year())
}

pub fn iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn clock(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// `08:00–10:00 WIB`, or `08:00 WIB – Selesai` when the end is open.
pub fn time_label(start: Time, end: Option<Time>, zone: &str, locale: Locale) -> String {
    match end {
        Some(end) => format!("{}–{} {zone}", clock(start), clock(end)),
        None => {
            let open_end = match locale {
                Locale::Id => "Selesai",
                Locale::En => "Ends",
            };
            format!("{} {zone} – {open_end}", clock(start))
        }
    }
}

fn to_naive(date: Date, time: Time) -> Option<NaiveDateTime> {
    let day = NaiveDate::from_ymd_opt(
        date.year(),
        u32::from(u8::from(date.month())),
        u32::from(date.day()),
    )?;
    let clock = NaiveTime::from_hms_opt(
        u32::from(time.hour()),
        u32::from(time.minute()),
        u32::from(time.second()),
    )?;
    Some(NaiveDateTime::new(day, clock))
}

/// Abbreviation in effect for the zone at the given local instant (`WIB` for
/// `Asia/Jakarta`). Falls back to the IANA name.
pub fn zone_abbreviation(tz: Tz, date: Date, time: Time) -> String {
    to_naive(date, time)
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|local| local.format("%Z").to_string())
        .unwrap_or_else(|| tz.name().to_string())
}

/// RFC 3339 instant for the countdown widget, e.g. `2025-06-01T08:00:00+07:00`.
pub fn countdown_target(tz: Tz, date: Date, time: Time) -> String {
    to_naive(date, time)
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|local| local.to_rfc3339())
        .unwrap_or_else(|| format!("{}T{}:00", iso_date(date), clock(time)))
}

/// Joins address parts with `", "`, skipping absent and blank parts.
pub fn join_address(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .filter_map(|part| part.map(str::trim))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Coerces a stored opacity into `[0, 1]`.
///
/// Accepts fractions (`"0.4"`), percentages (`"40%"`) and bare numbers above
/// one, which are read as percentages (`"40"`). Anything unparsable yields
/// `fallback`.
pub fn coerce_opacity(raw: Option<&str>, fallback: f64) -> f64 {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return fallback;
    };

    let (number, percent) = match raw.strip_suffix('%') {
        Some(stripped) => (stripped.trim(), true),
        None => (raw, false),
    };

    let Ok(value) = number.parse::<f64>() else {
        return fallback;
    };
    if !value.is_finite() {
        return fallback;
    }

    let value = if percent || value > 1.0 {
        value / 100.0
    } else {
        value
    };
    value.clamp(0.0, 1.0)
}

/// Reduces profile URLs and `@handle` forms to the bare handle.
pub fn normalize_instagram(raw: Option<&str>) -> Option<String> {
    let mut handle = raw?.trim();
    for prefix in ["https://", "http://", "www.", "instagram.com/"] {
        if let Some(rest) = handle.strip_prefix(prefix) {
            handle = rest;
        }
    }
    let handle = handle
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_start_matches('@')
        .trim_end_matches('/');

    (!handle.is_empty()).then(|| handle.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partner {
    Bride,
    Groom,
}

/// `Putri dari Bapak X & Ibu Y`; blank parent names are left out.
pub fn parents_label(
    partner: Partner,
    father: Option<&str>,
    mother: Option<&str>,
    locale: Locale,
) -> String {
    let father = father.map(str::trim).filter(|name| !name.is_empty());
    let mother = mother.map(str::trim).filter(|name| !name.is_empty());

    let (lead, mr, mrs) = match (locale, partner) {
        (Locale::Id, Partner::Bride) => ("Putri dari", "Bapak", "Ibu"),
        (Locale::Id, Partner::Groom) => ("Putra dari", "Bapak", "Ibu"),
        (Locale::En, Partner::Bride) => ("Daughter of", "Mr.", "Mrs."),
        (Locale::En, Partner::Groom) => ("Son of", "Mr.", "Mrs."),
    };

    let parents = match (father, mother) {
        (Some(father), Some(mother)) => format!("{mr} {father} & {mrs} {mother}"),
        (Some(father), None) => format!("{mr} {father}"),
        (None, Some(mother)) => format!("{mrs} {mother}"),
        (None, None) => return String::new(),
    };
    format!("{lead} {parents}")
}

/// Titles of the two ceremonies for an event type.
pub fn ceremony_titles(
    event_type: EventType,
    custom_event1: Option<&str>,
    custom_event2: Option<&str>,
) -> (String, String) {
    let (first, second) = match event_type {
        EventType::Islam => ("Akad Nikah", "Resepsi"),
        EventType::Kristen | EventType::Katolik => ("Holy Matrimony", "Reception"),
        EventType::Hindu => ("Pawiwahan", "Resepsi"),
        EventType::Buddha => ("Pemberkatan", "Resepsi"),
        EventType::Custom => {
            let pick = |label: Option<&str>, fallback: &str| {
                label
                    .map(str::trim)
                    .filter(|label| !label.is_empty())
                    .unwrap_or(fallback)
                    .to_string()
            };
            return (
                pick(custom_event1, CUSTOM_EVENT1_FALLBACK),
                pick(custom_event2, CUSTOM_EVENT2_FALLBACK),
            );
        }
    };
    (first.to_string(), second.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    #[test]
    fn long_date_in_both_locales() {
        assert_eq!(long_date(date!(2025 - 06 - 01), Locale::Id), "Minggu, 1 Juni 2025");
        assert_eq!(long_date(date!(2025 - 06 - 01), Locale::En), "Sunday, 1 June 2025");
        assert_eq!(long_date(date!(2024 - 12 - 20), Locale::Id), "Jumat, 20 Desember 2024");
    }

    #[test]
    fn time_label_with_and_without_end() {
        assert_eq!(
            time_label(time!(08:00), Some(time!(10:30)), "WIB", Locale::Id),
            "08:00–10:30 WIB"
        );
        assert_eq!(
            time_label(time!(19:00), None, "WITA", Locale::Id),
            "19:00 WITA – Selesai"
        );
        assert_eq!(time_label(time!(19:00), None, "WIB", Locale::En), "19:00 WIB – Ends");
    }

    #[test]
    fn jakarta_abbreviation_and_countdown() {
        let tz: Tz = "Asia/Jakarta".parse().expect("known zone");
        assert_eq!(zone_abbreviation(tz, date!(2025 - 06 - 01), time!(08:00)), "WIB");
        assert_eq!(
            countdown_target(tz, date!(2025 - 06 - 01), time!(08:00)),
            "2025-06-01T08:00:00+07:00"
        );
    }

    #[test]
    fn address_join_skips_blank_parts() {
        assert_eq!(
            join_address(&[Some("Jl. Mawar"), Some("  "), Some("Jakarta")]),
            "Jl. Mawar, Jakarta"
        );
        assert_eq!(join_address(&[None, Some("Bandung"), None]), "Bandung");
        assert_eq!(join_address(&[None, None, Some("")]), "");
        assert_eq!(
            join_address(&[Some(" Jl. Melati 3 "), Some("Bogor"), Some("Jawa Barat")]),
            "Jl. Melati 3, Bogor, Jawa Barat"
        );
    }

    #[test]
    fn opacity_coercion() {
        assert_eq!(coerce_opacity(Some("0.4"), 0.5), 0.4);
        assert_eq!(coerce_opacity(Some("40%"), 0.5), 0.4);
        assert_eq!(coerce_opacity(Some("40"), 0.5), 0.4);
        assert_eq!(coerce_opacity(Some("1"), 0.5), 1.0);
        assert_eq!(coerce_opacity(Some("-3"), 0.5), 0.0);
        assert_eq!(coerce_opacity(Some("250%"), 0.5), 1.0);
        assert_eq!(coerce_opacity(Some("dark"), 0.5), 0.5);
        assert_eq!(coerce_opacity(Some("NaN"), 0.5), 0.5);
        assert_eq!(coerce_opacity(None, 0.3), 0.3);
    }

    #[test]
    fn instagram_handles_are_normalized() {
        assert_eq!(normalize_instagram(Some("@ayu.lestari")), Some("ayu.lestari".into()));
        assert_eq!(
            normalize_instagram(Some("https://www.instagram.com/budi_s/?hl=en")),
            Some("budi_s".into())
        );
        assert_eq!(normalize_instagram(Some("  @ ")), None);
        assert_eq!(normalize_instagram(None), None);
    }

    #[test]
    fn parents_label_variants() {
        assert_eq!(
            parents_label(Partner::Bride, Some("Ahmad"), Some("Siti"), Locale::Id),
            "Putri dari Bapak Ahmad & Ibu Siti"
        );
        assert_eq!(
            parents_label(Partner::Groom, None, Some("Maria"), Locale::En),
            "Son of Mrs. Maria"
        );
        assert_eq!(parents_label(Partner::Groom, Some(" "), None, Locale::Id), "");
    }

    #[test]
    fn ceremony_titles_lookup() {
        assert_eq!(
            ceremony_titles(EventType::Islam, None, None),
            ("Akad Nikah".to_string(), "Resepsi".to_string())
        );
        assert_eq!(
            ceremony_titles(EventType::Katolik, Some("ignored"), None),
            ("Holy Matrimony".to_string(), "Reception".to_string())
        );
        assert_eq!(
            ceremony_titles(EventType::Custom, Some("Tea Pai"), Some(" ")),
            ("Tea Pai".to_string(), CUSTOM_EVENT2_FALLBACK.to_string())
        );
    }
}
