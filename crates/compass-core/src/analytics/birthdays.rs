//! Upcoming birthdays

use chrono::{Datelike, NaiveDate};

use crate::models::Contact;

/// The birthday's date in `year`; Feb 29 falls on Feb 28 in common years
fn in_year(birthday: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day() - 1))
}

/// Next occurrence on or after `today`
pub fn next_birthday(birthday: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = in_year(birthday, today.year())?;
    if this_year >= today {
        Some(this_year)
    } else {
        in_year(birthday, today.year() + 1)
    }
}

/// Contacts whose next birthday is within `days` of `today`, soonest first
pub fn upcoming_birthdays(contacts: &[Contact], days: i64, today: NaiveDate) -> Vec<Contact> {
    let mut upcoming: Vec<(NaiveDate, &Contact)> = contacts
        .iter()
        .filter_map(|contact| {
            let next = next_birthday(contact.birthday?, today)?;
            let days_until = (next - today).num_days();
            (0..=days).contains(&days_until).then_some((next, contact))
        })
        .collect();
    upcoming.sort_by_key(|(next, _)| *next);
    upcoming.into_iter().map(|(_, c)| c.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Relationship;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn contact(name: &str, birthday: Option<NaiveDate>) -> Contact {
        Contact {
            id: 0,
            name: name.to_string(),
            relationship: Relationship::Friend,
            email: None,
            phone: None,
            birthday,
            address: None,
            notes: None,
            gift_preferences: vec![],
        }
    }

    #[test]
    fn test_wraps_into_next_year() {
        assert_eq!(
            next_birthday(date(1990, 1, 5), date(2024, 12, 20)),
            Some(date(2025, 1, 5))
        );
        assert_eq!(
            next_birthday(date(1990, 12, 20), date(2024, 12, 20)),
            Some(date(2024, 12, 20))
        );
    }

    #[test]
    fn test_leap_day_in_common_year() {
        assert_eq!(
            next_birthday(date(2000, 2, 29), date(2025, 1, 1)),
            Some(date(2025, 2, 28))
        );
    }

    #[test]
    fn test_upcoming_sorted_by_proximity() {
        let contacts = vec![
            contact("later", Some(date(1985, 7, 20))),
            contact("none", None),
            contact("soon", Some(date(1992, 7, 3))),
            contact("far", Some(date(1970, 11, 1))),
        ];
        let upcoming = upcoming_birthdays(&contacts, 30, date(2024, 7, 1));
        let names: Vec<&str> = upcoming.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["soon", "later"]);
    }
}
